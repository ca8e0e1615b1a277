use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bonus::{applicant_scholarship_multiplier, mention_multiplier};
use super::domain::{
    canonical_label, ApplicantProfile, HistoricalDataset, PredictionError, ProgramId,
};
use super::feedback::{classify, FeedbackBand};
use super::rate::{program_statistics, program_wide_rate, ProgramStatistics};

/// Which slice of history the base rate was computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    #[default]
    Category,
    ProgramWide,
}

/// Individual factors behind a probability so the display layer can explain it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub base_rate: f64,
    pub mention_multiplier: f64,
    pub scholarship_multiplier: f64,
    /// Product before the 1.0 ceiling.
    pub raw_probability: f64,
    pub basis: RateBasis,
}

/// Probability of receiving a proposal for one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub program: ProgramId,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<FeedbackBand>,
    pub factors: FactorBreakdown,
}

impl PredictionResult {
    /// Attach the qualitative band for display.
    pub fn classified(mut self) -> Self {
        self.band = Some(classify(self.probability));
        self
    }

    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn is_capped(&self) -> bool {
        self.factors.raw_probability > 1.0
    }
}

/// `min(1, base × mention × scholarship)` for the applicant's category.
///
/// Errors from the rate calculator are returned as-is; choosing a fallback is up to the caller
/// (see [`predict_with_fallback`]).
pub fn predict(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    profile: &ApplicantProfile,
) -> Result<PredictionResult, PredictionError> {
    let statistics = program_statistics(dataset, program, profile.category)?;
    predict_from_statistics(dataset, program, profile, &statistics)
}

pub(crate) fn predict_from_statistics(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    profile: &ApplicantProfile,
    statistics: &ProgramStatistics,
) -> Result<PredictionResult, PredictionError> {
    let base = statistics.base_rate(program, Some(profile.category))?;
    compose(dataset, program, profile, base, RateBasis::Category)
}

fn compose(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    profile: &ApplicantProfile,
    base_rate: f64,
    basis: RateBasis,
) -> Result<PredictionResult, PredictionError> {
    let mention = mention_multiplier(profile.mention);
    let scholarship = applicant_scholarship_multiplier(
        profile.scholarship_holder,
        dataset.scholarship_rate(program)?,
    );
    let raw_probability = base_rate * mention * scholarship;

    Ok(PredictionResult {
        program: program.clone(),
        probability: raw_probability.clamp(0.0, 1.0),
        band: None,
        factors: FactorBreakdown {
            base_rate,
            mention_multiplier: mention,
            scholarship_multiplier: scholarship,
            raw_probability,
            basis,
        },
    })
}

/// Policy applied by callers when a (program, category) slice has no candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateFallback {
    /// Report the gap; the display layer shows "insufficient data".
    #[default]
    Surface,
    /// Substitute the program's rate across all categories.
    ProgramWide,
}

impl FromStr for RateFallback {
    type Err = UnknownFallback;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "surface" | "none" => Ok(Self::Surface),
            "program_wide" | "program" => Ok(Self::ProgramWide),
            _ => Err(UnknownFallback(raw.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rate fallback '{0}' (expected surface or program_wide)")]
pub struct UnknownFallback(pub String);

/// [`predict`], then apply `fallback` if the category slice is empty.
///
/// With [`RateFallback::ProgramWide`] the result is marked [`RateBasis::ProgramWide`]; if the
/// whole program has no candidates the gap is still reported.
pub fn predict_with_fallback(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    profile: &ApplicantProfile,
    fallback: RateFallback,
) -> Result<PredictionResult, PredictionError> {
    match predict(dataset, program, profile) {
        Err(PredictionError::InsufficientData { .. }) if fallback == RateFallback::ProgramWide => {
            let base = program_wide_rate(dataset, program)?;
            compose(dataset, program, profile, base, RateBasis::ProgramWide)
        }
        outcome => outcome,
    }
}
