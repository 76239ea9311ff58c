pub mod clean;
pub mod extract;
pub mod gold;
pub mod sentiment;

pub mod prelude {
    pub use crate::clean::clean_summary;
    pub use crate::extract::{
        clean, extract, extract_with, parse_response, parse_response_with,
    };
    pub use crate::gold::{extract_gold, GoldInput};
    pub use crate::sentiment::{extract_sentiment, extract_sentiment_with};
}
