use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::label::Label;

/// One sampled response together with the label parsed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub run_id: Uuid,
    pub dataset: String,
    pub example_id: String,
    pub model: String,
    /// Position of this sample among the example's N samples.
    pub sample_index: usize,
    pub raw_response: Option<String>,
    pub label: Label,
    pub recorded_at: DateTime<Utc>,
}

/// Destination for per-sample records of a run.
///
/// Recording must not fail the run, so sinks swallow their own errors.
pub trait TrackingSink: Send + Sync {
    fn record(&self, record: &SampleRecord);
}

/// Discards every record.
pub struct NoopSink;

impl TrackingSink for NoopSink {
    fn record(&self, _record: &SampleRecord) {}
}

/// Emits every record as a structured `tracing` event.
pub struct TracingSink;

impl TrackingSink for TracingSink {
    fn record(&self, record: &SampleRecord) {
        let label = serde_json::to_string(&record.label).unwrap_or_default();
        tracing::info!(
            run_id = %record.run_id,
            dataset = %record.dataset,
            example_id = %record.example_id,
            model = %record.model,
            sample_index = record.sample_index,
            valid = record.label.is_valid(),
            label = %label,
            "sample recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tally_core::label::Sentiment;

    #[derive(Default)]
    struct CollectingSink {
        records: Mutex<Vec<SampleRecord>>,
    }

    impl TrackingSink for CollectingSink {
        fn record(&self, record: &SampleRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn record() -> SampleRecord {
        SampleRecord {
            run_id: Uuid::new_v4(),
            dataset: "fpb_sentiment".into(),
            example_id: "ex1".into(),
            model: "test-model".into(),
            sample_index: 2,
            raw_response: Some("Positive".into()),
            label: Sentiment::Positive.into(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn sinks_accept_records() {
        let rec = record();
        NoopSink.record(&rec);
        TracingSink.record(&rec);

        let collecting = CollectingSink::default();
        collecting.record(&rec);
        assert_eq!(collecting.records.lock().unwrap().len(), 1);
    }

    #[test]
    fn record_serializes_label_code() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["label"], 2);
        assert_eq!(json["sample_index"], 2);
        assert_eq!(json["raw_response"], "Positive");
    }
}
