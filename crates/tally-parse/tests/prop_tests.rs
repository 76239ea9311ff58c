use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tally_core::label::{GoldKey, Label, Sentiment};
use tally_core::task::Task;
use tally_parse::prelude::*;

/// A plain sentence built from letters that cannot spell any boilerplate
/// keyword or filler phrase.
fn arb_sentence() -> impl Strategy<Value = String> {
    "[A-H][abcdegh]{1,8}( [abcdegh]{1,8}){0,5}\\."
}

fn arb_marker() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("* ".to_string()),
        Just("- ".to_string()),
        Just("• ".to_string()),
        (1u8..20).prop_map(|n| format!("{n}. ")),
    ]
}

fn arb_summary_output() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just(String::new()),
            Just("Here is a summary of the article:\n".to_string()),
            Just("## Key points\n".to_string()),
            Just("Here are 4 bullet points:\n\n".to_string()),
        ],
        prop::collection::vec((arb_marker(), arb_sentence()), 1..6),
        prop_oneof![
            Just(String::new()),
            Just("\n\nI hope it is correct".to_string()),
            Just("\n(Note: shortened)".to_string()),
            Just("\n\n\n\nPlease let me know if anything is missing.".to_string()),
        ],
    )
        .prop_map(|(intro, lines, outro)| {
            let body: Vec<String> = lines
                .into_iter()
                .map(|(marker, sentence)| format!("{marker}{sentence}"))
                .collect();
            format!("{intro}{}{outro}", body.join("\n"))
        })
}

proptest! {
    /// Cleaning a cleaned summary changes nothing.
    #[test]
    fn summary_cleaning_is_idempotent(text in arb_summary_output()) {
        let once = clean_summary(&text);
        let twice = clean_summary(&once);
        prop_assert_eq!(twice, once);
    }

    /// Cleaned output never carries surrounding whitespace or blank-line runs.
    #[test]
    fn summary_cleaning_normalizes_whitespace(text in any::<String>()) {
        let cleaned = clean_summary(&text);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(!cleaned.contains("\n\n\n"));
        prop_assert!(!cleaned.contains('`'));
    }

    /// Gold extraction always yields all nine keys, whatever the input.
    #[test]
    fn gold_extraction_is_total(text in any::<String>()) {
        let label = extract_gold(text.as_str());
        let json = serde_json::to_value(label).unwrap();
        let obj = json.as_object().unwrap();
        prop_assert_eq!(obj.len(), 9);
        for key in GoldKey::ALL {
            let code = obj[key.as_str()].as_i64().unwrap();
            prop_assert!(code == -1 || code == 0 || code == 1);
        }
    }

    /// A valid sentiment is always a class mentioned in the text.
    #[test]
    fn sentiment_is_mentioned_or_invalid(text in "[a-zA-Z ,.]{0,80}", seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sentiment = extract_sentiment_with(Some(text.as_str()), &mut rng);
        match sentiment.keyword() {
            Some(keyword) => prop_assert!(text.to_lowercase().contains(keyword)),
            None => prop_assert_eq!(sentiment, Sentiment::Invalid),
        }
    }

    /// Parsing never panics and returns a label of the requested task.
    #[test]
    fn parse_response_matches_task(text in any::<Option<String>>(), task_idx in 0usize..3) {
        let task = Task::ALL[task_idx];
        let label: Label = parse_response(task, text.as_deref());
        prop_assert_eq!(label.task(), task);
    }
}
