use std::sync::Arc;

use proptest::prelude::*;

use tally_core::label::{GoldFlag, GoldKey, GoldLabel, Label, Sentiment};
use tally_core::task::Task;
use tally_eval::prelude::*;
use tally_parse::extract::parse_response;

fn arb_flag() -> impl Strategy<Value = GoldFlag> {
    prop_oneof![Just(GoldFlag::No), Just(GoldFlag::Yes), Just(GoldFlag::Invalid)]
}

fn arb_gold_label() -> impl Strategy<Value = GoldLabel> {
    prop::collection::vec(arb_flag(), 9).prop_map(|flags| {
        GoldKey::ALL
            .iter()
            .zip(flags)
            .fold(GoldLabel::invalid(), |label, (key, flag)| label.with(*key, flag))
    })
}

fn arb_sentiment() -> impl Strategy<Value = Sentiment> {
    prop_oneof![
        Just(Sentiment::Negative),
        Just(Sentiment::Neutral),
        Just(Sentiment::Positive),
        Just(Sentiment::Invalid),
    ]
}

proptest! {
    /// Gold key accuracy always lies in [0, 1].
    #[test]
    fn gold_accuracy_in_unit_interval(expected in arb_gold_label(), actual in arb_gold_label()) {
        let example = Example::new("p", "headline").with_expected(expected);
        let score = GoldKeyAccuracyEvaluator.evaluate(&example, &actual.into());
        prop_assert!((0.0..=1.0).contains(&score.value));
    }

    /// A label compared with itself is fully accurate whenever anything is answered.
    #[test]
    fn gold_accuracy_of_identical_labels(label in arb_gold_label()) {
        let example = Example::new("p", "headline").with_expected(label);
        let score = GoldKeyAccuracyEvaluator.evaluate(&example, &label.into());
        let answered = label.iter().any(|(_, flag)| flag != GoldFlag::Invalid);
        prop_assert_eq!(score.value, if answered { 1.0 } else { 0.0 });
    }

    /// Exact match is binary.
    #[test]
    fn exact_match_is_binary(expected in arb_sentiment(), actual in arb_sentiment()) {
        let example = Example::new("p", "text").with_expected(expected);
        let score = ExactMatchEvaluator.evaluate(&example, &actual.into());
        prop_assert_eq!(score.value, if expected == actual { 1.0 } else { 0.0 });
    }

    /// Rendered prompts carry the input and end with the task separator.
    #[test]
    fn rendered_prompt_ends_with_separator(input in any::<String>(), task_idx in 0usize..3) {
        let task = Task::ALL[task_idx];
        let prompt = PromptBook::new().render(task, &input).unwrap();
        prop_assert!(prompt.contains(input.as_str()));
        prop_assert!(prompt.ends_with(task.prompt_separator()));
    }

    /// With identical samples the consensus is the single-sample parse.
    #[test]
    fn unanimous_samples_vote_to_their_label(
        response in "(positive|negative|neutral|Neutral\\.|[bcdfhjkm ]{0,20})",
        samples in 1usize..6,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ds = Dataset::new("tweets_sentiment");
        ds.add_example(Example::new("a", "Shares fell"));

        let runner = SelfConsistencyRunner::new(Arc::new(ScriptedProvider::with_response(response.clone())))
            .with_samples(samples);
        let report = rt.block_on(runner.run("m", &ds)).unwrap();

        let single = parse_response(Task::Sentiment, Some(response.as_str()));
        prop_assert_eq!(&report.results[0].consensus, &single);
        let expected_rate = if single.is_valid() { 0.0 } else { 1.0 };
        prop_assert_eq!(report.invalid_sample_rate, expected_rate);
    }

    /// Datasets with typed labels survive JSON serialization.
    #[test]
    fn dataset_roundtrip(
        gold in prop::collection::vec(arb_gold_label(), 0..5),
    ) {
        let mut ds = Dataset::new("gold_news");
        for (i, label) in gold.iter().enumerate() {
            ds.add_example(Example::new(i.to_string(), "headline").with_expected(*label));
        }
        let ds2 = Dataset::from_json(&ds.to_json().unwrap()).unwrap();
        prop_assert_eq!(ds2.len(), gold.len());
        for (label, example) in gold.iter().zip(&ds2.examples) {
            prop_assert_eq!(example.expected.as_ref(), Some(&Label::Gold(*label)));
        }
    }
}
