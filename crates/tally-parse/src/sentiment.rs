use std::iter;

use rand::Rng;

use tally_core::label::Sentiment;
use tally_core::vote::majority_vote;

/// Extract a sentiment class from model output.
///
/// An exact keyword (after trimming and lowercasing) maps directly. Otherwise
/// every occurrence of `negative`, `neutral` or `positive` counts as one
/// vote, and the votes are resolved by [`majority_vote`], so a tie between
/// mentioned classes is broken at random. Output naming no class is
/// [`Sentiment::Invalid`].
pub fn extract_sentiment_with<R: Rng>(text: Option<&str>, rng: &mut R) -> Sentiment {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        tracing::warn!("received no text, marking sentiment as invalid");
        return Sentiment::Invalid;
    };

    let normalized = text.trim().to_lowercase();
    if let Some(exact) = Sentiment::from_keyword(&normalized) {
        return exact;
    }

    let mentions: Vec<Sentiment> = Sentiment::CLASSES
        .into_iter()
        .flat_map(|class| {
            let count = class
                .keyword()
                .map_or(0, |keyword| normalized.matches(keyword).count());
            iter::repeat(class).take(count)
        })
        .collect();

    if mentions.is_empty() {
        tracing::warn!(output = %text, "no sentiment keyword found, marking as invalid");
        return Sentiment::Invalid;
    }

    majority_vote(&mentions, rng)
}

/// [`extract_sentiment_with`] using the thread-local RNG.
pub fn extract_sentiment(text: Option<&str>) -> Sentiment {
    extract_sentiment_with(text, &mut rand::thread_rng())
}
