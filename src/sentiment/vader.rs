//! VADER scoring backed by the `vader_sentiment` crate and its full English
//! lexicon.

use super::{PolarityScores, SentimentScorer};
use vader_sentiment::SentimentIntensityAnalyzer;

#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        // The analyzer only borrows the crate's static lexicons
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        PolarityScores {
            positive: get("pos"),
            negative: get("neg"),
            neutral: get("neu"),
            compound: get("compound"),
        }
    }
}
