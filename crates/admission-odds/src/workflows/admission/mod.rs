//! Admission proposal probability engine.
//!
//! Every operation is a pure function over an immutable [`HistoricalDataset`]; the dataset can
//! be shared behind an `Arc` by any number of concurrent callers.

mod bonus;
mod comparison;
pub mod domain;
mod engine;
mod feedback;
mod rate;
pub mod router;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use bonus::{mention_multiplier, scholarship_multiplier, SCHOLARSHIP_BONUS_FLOOR};
pub use comparison::compare_all;
pub use domain::{
    ApplicantCategory, ApplicantProfile, HistoricalDataset, HistoricalRecord, Mention,
    PredictionError, ProgramId, ValidationError,
};
pub use engine::{
    predict, predict_with_fallback, FactorBreakdown, PredictionResult, RateBasis, RateFallback,
    UnknownFallback,
};
pub use feedback::{classify, FeedbackBand};
pub use rate::{
    base_rate, program_statistics, program_totals, program_wide_rate, ProgramStatistics,
};
pub use router::{
    invalid_payload, prediction_router, ComparisonRequest, PredictionRequest, PredictionView,
};
pub use service::AdmissionPredictionService;
pub use summary::{summarize, CategoryRateEntry, ProgramSummary};
