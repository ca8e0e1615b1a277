use std::sync::Arc;

use tracing::{debug, info};

use super::comparison::compare_all;
use super::domain::{ApplicantProfile, HistoricalDataset, PredictionError, ProgramId};
use super::engine::{predict_with_fallback, PredictionResult, RateFallback};
use super::summary::{summarize, ProgramSummary};

/// Shares one dataset snapshot across requests and applies the configured fallback policy.
pub struct AdmissionPredictionService {
    dataset: Arc<HistoricalDataset>,
    fallback: RateFallback,
}

impl AdmissionPredictionService {
    pub fn new(dataset: Arc<HistoricalDataset>, fallback: RateFallback) -> Self {
        Self { dataset, fallback }
    }

    pub fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }

    pub fn fallback(&self) -> RateFallback {
        self.fallback
    }

    /// Classified prediction for one program.
    pub fn predict(
        &self,
        program: &ProgramId,
        profile: &ApplicantProfile,
    ) -> Result<PredictionResult, PredictionError> {
        let result =
            predict_with_fallback(&self.dataset, program, profile, self.fallback)?.classified();

        info!(
            %program,
            category = %profile.category,
            mention = %profile.mention,
            scholarship_holder = profile.scholarship_holder,
            probability = result.probability,
            basis = ?result.factors.basis,
            "admission prediction computed"
        );

        Ok(result)
    }

    /// Classified ranking across every program.
    pub fn compare(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<PredictionResult>, PredictionError> {
        let results: Vec<PredictionResult> = compare_all(&self.dataset, profile)?
            .into_iter()
            .map(PredictionResult::classified)
            .collect();

        debug!(
            ranked = results.len(),
            programs = self.dataset.program_count(),
            "program comparison computed"
        );

        Ok(results)
    }

    pub fn summary(&self) -> Result<Vec<ProgramSummary>, PredictionError> {
        summarize(&self.dataset)
    }
}
