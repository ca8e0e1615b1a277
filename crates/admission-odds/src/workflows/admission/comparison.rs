use tracing::debug;

use super::domain::{ApplicantProfile, HistoricalDataset, PredictionError};
use super::engine::{predict_from_statistics, PredictionResult};
use super::rate::statistics_by_program;

/// Predict every program in the dataset and rank the outcomes.
///
/// Programs without candidates in the applicant's category are left out of the ranking;
/// validation failures and overflowing totals abort the whole comparison. Ordering is probability descending, then
/// program identifier ascending.
pub fn compare_all(
    dataset: &HistoricalDataset,
    profile: &ApplicantProfile,
) -> Result<Vec<PredictionResult>, PredictionError> {
    let statistics = statistics_by_program(dataset, profile.category)?;
    let mut results = Vec::with_capacity(statistics.len());

    for (program, slice) in &statistics {
        match predict_from_statistics(dataset, program, profile, slice) {
            Ok(result) => results.push(result),
            Err(error @ PredictionError::InsufficientData { .. }) => {
                debug!(%program, %error, "program excluded from comparison");
            }
            Err(error) => return Err(error),
        }
    }

    results.sort_by(|left, right| {
        right
            .probability
            .total_cmp(&left.probability)
            .then_with(|| left.program.cmp(&right.program))
    });

    Ok(results)
}
