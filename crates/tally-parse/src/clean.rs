//! Boilerplate removal for free-text summaries.
//!
//! Rules run in a fixed order and each one sees the output of the previous
//! one:
//!
//! 1. lines announcing "N bullet points"
//! 2. intro sentences mentioning a summary, bullet points, key points or
//!    important facts, up to the first `.`, `:` or newline
//! 3. markdown headers
//! 4. leading bullet markers, then enumeration markers (`1. `)
//! 5. backticks
//! 6. everything after "Here is the response in the correct format:"
//! 7. `(Note: ...)` remarks up to the end of their line
//! 8. a denylist of filler phrases
//! 9. runs of blank lines, then surrounding whitespace

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid cleaning pattern {pattern:?}: {e}"))
}

fn case_insensitive_literal(phrase: &str) -> Regex {
    compile(&format!("(?i){}", regex::escape(phrase)))
}

static BULLET_COUNT_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?im)^.*?\d+\s+bullet points?.*$"));

static INTRO_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?im)^.*?(?:bullet points?|summary|summariz|key points|important facts).*?[.:\n]")
});

static MARKDOWN_HEADER: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^#+\s+.*$"));

static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*[*\-•]\s*"));

static ENUMERATION_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*\d+\.\s+"));

static BACKTICKS: Lazy<Regex> = Lazy::new(|| compile(r"`+"));

static TRAILING_SECTIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["Here is the response in the correct format:"]
        .into_iter()
        .map(|phrase| compile(&format!(r"(?is){}.*\z", regex::escape(phrase))))
        .collect()
});

static LINE_REMARKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["(Note:"]
        .into_iter()
        .map(|phrase| compile(&format!(r"(?im){}.*$", regex::escape(phrase))))
        .collect()
});

static FILLER_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "i hope it is correct",
        "please let me know if",
        "(Note: I added the last point as it was not in the format you requested)",
        "Here is the corrected response:",
        "(Note: I added the last point as it was not in",
        "I hope this is what you were looking for.",
        "$0.00",
        "$$",
    ]
    .into_iter()
    .map(case_insensitive_literal)
    .collect()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| compile(r"\n{3,}"));

/// Strip headlines, list markers, code fences and filler from a generated
/// summary.
pub fn clean_summary(text: &str) -> String {
    let mut cleaned = BULLET_COUNT_LINE.replace_all(text, "").into_owned();
    cleaned = INTRO_SENTENCE.replace_all(&cleaned, "").into_owned();
    cleaned = MARKDOWN_HEADER.replace_all(&cleaned, "").into_owned();
    cleaned = BULLET_MARKER.replace_all(&cleaned, "").into_owned();
    cleaned = ENUMERATION_MARKER.replace_all(&cleaned, "").into_owned();
    cleaned = BACKTICKS.replace_all(&cleaned, "").into_owned();

    for re in TRAILING_SECTIONS.iter().chain(LINE_REMARKS.iter()) {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    for re in FILLER_PHRASES.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    cleaned = EXCESS_NEWLINES.replace_all(&cleaned, "\n\n").into_owned();
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_bullet_count_line() {
        let text = "Here are 3 bullet points about gold\nPrices rose sharply";
        assert_eq!(clean_summary(text), "Prices rose sharply");
    }

    #[test]
    fn removes_intro_sentence_up_to_colon() {
        let text = "Here is a summary of the article: Gold rallied on Friday.";
        assert_eq!(clean_summary(text), "Gold rallied on Friday.");
    }

    #[test]
    fn removes_key_points_headline_case_insensitive() {
        let text = "KEY POINTS.\nThe central bank held rates.";
        assert_eq!(clean_summary(text), "The central bank held rates.");
    }

    #[test]
    fn removes_markdown_headers() {
        let text = "## Overview\nCopper fell 3%.\n# Details\nZinc was flat.";
        assert_eq!(clean_summary(text), "Copper fell 3%.\n\nZinc was flat.");
    }

    #[test]
    fn header_without_space_is_kept() {
        assert_eq!(clean_summary("#hashtag stays"), "#hashtag stays");
    }

    #[test]
    fn strips_bullet_markers() {
        let text = "* First point\n- Second point\n• Third point";
        assert_eq!(
            clean_summary(text),
            "First point\nSecond point\nThird point"
        );
    }

    #[test]
    fn strips_enumeration_markers() {
        let text = "1. Oil rose.\n2. Gas fell.\n10. Coal was flat.";
        assert_eq!(clean_summary(text), "Oil rose.\nGas fell.\nCoal was flat.");
    }

    #[test]
    fn removes_backticks() {
        assert_eq!(clean_summary("```Silver gained``` `today`"), "Silver gained today");
    }

    #[test]
    fn truncates_after_correct_format_phrase() {
        let text = "Gold rose.\nhere is the response in the correct format:\nGold rose again.\nMore.";
        assert_eq!(clean_summary(text), "Gold rose.");
    }

    #[test]
    fn note_removed_to_end_of_line_only() {
        let text = "Gold rose. (Note: this is approximate)\nSilver fell.";
        assert_eq!(clean_summary(text), "Gold rose. \nSilver fell.");
    }

    #[test]
    fn filler_phrases_deleted_in_place() {
        let text = "Gold rose. I HOPE IT IS CORRECT and steady.";
        assert_eq!(clean_summary(text), "Gold rose.  and steady.");
    }

    #[test]
    fn dollar_fillers_removed_in_order() {
        // "$0.00" goes first, then "$$".
        assert_eq!(clean_summary("Cost $$0.00 total"), "Cost $ total");
        assert_eq!(clean_summary("Price $$ gone"), "Price  gone");
    }

    #[test]
    fn collapses_blank_lines_and_trims() {
        let text = "\n\nGold rose.\n\n\n\n\nSilver fell.\n\n  ";
        assert_eq!(clean_summary(text), "Gold rose.\n\nSilver fell.");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_summary(""), "");
    }

    #[test]
    fn full_response_cleanup() {
        let text = "Here is a summary of the article in 3 bullet points:\n\n\
            * Gold prices rose 2% on Monday.\n\
            * The Fed held rates steady.\n\
            - Analysts expect volatility.\n\n\
            I hope it is correct";
        assert_eq!(
            clean_summary(text),
            "Gold prices rose 2% on Monday.\nThe Fed held rates steady.\nAnalysts expect volatility."
        );
    }

    #[test]
    fn cleaning_is_idempotent_on_typical_output() {
        let samples = [
            "Here is a summary of the news:\n\n* Gold rose.\n* Silver fell.\n\nPlease let me know if you need more.",
            "## Market wrap\n1. Oil climbed 4%.\n2. Stocks slipped.\n\n\n\n(Note: figures are rounded)",
            "`Copper` hit a record.\nHere is the response in the correct format:\n- Copper hit a record.",
        ];
        for sample in samples {
            let once = clean_summary(sample);
            assert_eq!(clean_summary(&once), once, "not idempotent for {sample:?}");
        }
    }
}
