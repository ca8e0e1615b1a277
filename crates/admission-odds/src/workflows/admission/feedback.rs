use serde::{Deserialize, Serialize};

/// Qualitative reading of a probability for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackBand {
    Low,
    Moderate,
    Good,
    Excellent,
}

/// Lower bounds checked from the highest band down; anything below falls to `Low`.
const BAND_THRESHOLDS: [(f64, FeedbackBand); 3] = [
    (0.9, FeedbackBand::Excellent),
    (0.7, FeedbackBand::Good),
    (0.4, FeedbackBand::Moderate),
];

pub fn classify(probability: f64) -> FeedbackBand {
    BAND_THRESHOLDS
        .iter()
        .find(|(threshold, _)| probability >= *threshold)
        .map(|(_, band)| *band)
        .unwrap_or(FeedbackBand::Low)
}

impl FeedbackBand {
    pub const fn label(self) -> &'static str {
        match self {
            FeedbackBand::Low => "low",
            FeedbackBand::Moderate => "moderate",
            FeedbackBand::Good => "good",
            FeedbackBand::Excellent => "excellent",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            FeedbackBand::Excellent => {
                "Excellent profile: past cohorts like yours almost always received a proposal."
            }
            FeedbackBand::Good => {
                "Good chances: your profile sits above most historical candidates."
            }
            FeedbackBand::Moderate => {
                "Moderate chances: the motivation letter and projects will make the difference."
            }
            FeedbackBand::Low => {
                "Low chances on the numbers alone: widen your list of programs."
            }
        }
    }
}
