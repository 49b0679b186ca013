//! Recognition results
//!
//! All confidences here are on the 0-1 scale. OCR engines report percentages;
//! the adapter converts them before they reach these types.

use serde::{Deserialize, Serialize};

/// Number of digit classes (0-9)
pub const DIGIT_CLASSES: usize = 10;

/// Shape features extracted from the rendered raster.
///
/// Every field is a ratio in `[0, 1]`. Ratios over the dark-pixel count are 0
/// when there are no dark pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Dark pixels / all pixels
    pub density: f64,
    pub top_heavy: f64,
    pub bottom_heavy: f64,
    pub left_heavy: f64,
    pub right_heavy: f64,
    /// Dark pixels inside the central window / dark pixels
    pub center_density: f64,
}

impl FeatureVector {
    pub fn ratios(&self) -> [f64; 6] {
        [
            self.density,
            self.top_heavy,
            self.bottom_heavy,
            self.left_heavy,
            self.right_heavy,
            self.center_density,
        ]
    }
}

/// Which row of the heuristic decision table a feature vector falls into
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ShapeRule {
    /// Almost nothing drawn
    Sparse,
    /// Little ink in the middle: 1 or 7
    Narrow,
    TopHeavy,
    BottomHeavy,
    /// Fallback bucket for loops: 8, 0, 3, 5
    Round,
}

/// A digit with its confidence
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DigitScore {
    pub digit: u8,
    pub confidence: f64,
}

/// Pseudo-probabilities over the ten digits, index = digit
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(transparent)]
pub struct ConfidenceDistribution([f64; DIGIT_CLASSES]);

impl ConfidenceDistribution {
    /// Scale `scores` to sum to 1. An all-zero vector is kept as-is.
    pub fn normalized(scores: [f64; DIGIT_CLASSES]) -> Self {
        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            Self(scores.map(|s| s / sum))
        } else {
            Self([0.0; DIGIT_CLASSES])
        }
    }

    pub fn values(&self) -> &[f64; DIGIT_CLASSES] {
        &self.0
    }

    pub fn get(&self, digit: usize) -> Option<f64> {
        self.0.get(digit).copied()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Highest-confidence digit; the lowest digit wins ties
    pub fn argmax(&self) -> DigitScore {
        let mut best = DigitScore { digit: 0, confidence: self.0[0] };
        for (digit, &confidence) in self.0.iter().enumerate().skip(1) {
            if confidence > best.confidence {
                best = DigitScore { digit: digit as u8, confidence };
            }
        }
        best
    }

    /// `n` best digits, confidence descending (stable on ties)
    pub fn top(&self, n: usize) -> Vec<DigitScore> {
        let mut scores: Vec<DigitScore> = self
            .0
            .iter()
            .enumerate()
            .map(|(digit, &confidence)| DigitScore { digit: digit as u8, confidence })
            .collect();
        scores.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        scores.truncate(n);
        scores
    }
}

/// Outcome of a digit recognition pass
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigitResult {
    pub digit: u8,
    pub confidence: f64,
    pub top_predictions: Vec<DigitScore>,
    pub distribution: ConfidenceDistribution,
    pub rule: ShapeRule,
    pub features: FeatureVector,
}

impl DigitResult {
    pub fn from_distribution(
        distribution: ConfidenceDistribution,
        rule: ShapeRule,
        features: FeatureVector,
    ) -> Self {
        let best = distribution.argmax();
        Self {
            digit: best.digit,
            confidence: best.confidence,
            top_predictions: distribution.top(3),
            distribution,
            rule,
            features,
        }
    }
}

/// Where extracted text came from
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OcrSource {
    /// The external OCR engine
    Engine,
    /// Canned stand-in after an engine failure
    Simulated,
}

/// Outcome of a text extraction pass
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    pub text: String,
    /// 0-1, converted from the engine's percentage
    pub confidence: f64,
    pub source: OcrSource,
}

impl OcrResult {
    pub fn is_simulated(&self) -> bool {
        self.source == OcrSource::Simulated
    }
}
