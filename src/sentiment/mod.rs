//! Sentiment scoring for matched pages
//!
//! Scoring is optional and always best-effort: a scorer failure downgrades a
//! match to "no sentiment" instead of failing the page. The [`SentimentScorer`]
//! trait is the seam for plugging in an external scorer; [`LexiconScorer`] is
//! the built-in wordlist-based implementation.

use crate::ScorerError;
use serde::Serialize;
use std::collections::HashSet;

/// Discrete label derived from a polarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Sentiment of a page's text: a polarity in [-1, 1] plus its label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    /// Builds a sentiment from a raw polarity, clamping it into [-1, 1]
    ///
    /// Label rule: positive if polarity > 0, negative if < 0, else neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        let polarity = polarity.clamp(-1.0, 1.0);
        let label = if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self { polarity, label }
    }
}

/// Computes a polarity score in [-1, 1] for a text blob
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64, ScorerError>;
}

/// Collapses all whitespace runs in a text to single spaces
///
/// Scorers see page text with HTML-induced line breaks and indentation
/// flattened away.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "love", "happy", "win", "gain", "profit", "success",
    "bullish", "strong", "growth", "improve", "improved", "positive", "best", "soar", "surge",
    "rally", "optimistic", "secure", "safe", "rise", "up", "boom", "thriving",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "sad", "loss", "lose", "crash", "fail", "failure",
    "bearish", "weak", "decline", "worse", "worst", "negative", "drop", "fall", "plunge", "scam",
    "fraud", "fear", "panic", "volatile", "risky", "down", "bust", "collapse",
];

/// Wordlist-based sentiment scorer
///
/// Counts positive and negative lexicon hits and returns their normalized
/// difference, `(pos - neg) / (pos + neg)`, which lands in [-1, 1] by
/// construction. Text with no lexicon hits scores 0.
pub struct LexiconScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, ScorerError> {
        if text.trim().is_empty() {
            return Err(ScorerError::EmptyInput);
        }

        let mut positive = 0u32;
        let mut negative = 0u32;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            if self.positive.contains(token.as_str()) {
                positive += 1;
            } else if self.negative.contains(token.as_str()) {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 {
            return Ok(0.0);
        }

        Ok((f64::from(positive) - f64::from(negative)) / f64::from(total))
    }
}
