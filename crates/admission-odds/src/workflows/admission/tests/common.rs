use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::admission::domain::{
    ApplicantCategory, ApplicantProfile, HistoricalDataset, HistoricalRecord, Mention, ProgramId,
};
use crate::workflows::admission::{AdmissionPredictionService, RateFallback};

pub(super) fn program(id: &str) -> ProgramId {
    ProgramId::from(id)
}

pub(super) fn record(
    program_id: &str,
    category: ApplicantCategory,
    mention: Mention,
    scholarship_holder: bool,
    candidates: u64,
    proposals: u64,
    rate: f64,
) -> HistoricalRecord {
    HistoricalRecord {
        program: program(program_id),
        category,
        mention,
        scholarship_holder,
        candidates,
        proposals,
        institution_scholarship_rate: rate,
    }
}

/// P1 general slice totals 100 candidates / 40 proposals; P2 has an empty `other` slice;
/// P4 has no candidates at all.
pub(super) fn cohort_dataset(p1_scholarship_rate: f64) -> HistoricalDataset {
    use ApplicantCategory::{General, Other, Technological};

    HistoricalDataset::new(vec![
        record("P1", General, Mention::Bien, true, 60, 25, p1_scholarship_rate),
        record("P1", General, Mention::NoMention, false, 40, 15, p1_scholarship_rate),
        record("P1", Technological, Mention::NoMention, false, 20, 4, p1_scholarship_rate),
        record("P2", General, Mention::AssezBien, false, 50, 10, 0.15),
        record("P2", Other, Mention::NoMention, false, 0, 0, 0.15),
        record("P3", General, Mention::TresBien, true, 30, 27, 0.05),
        record("P3", Other, Mention::NoMention, false, 10, 2, 0.05),
        record("P4", General, Mention::NoMention, false, 0, 0, 0.1),
    ])
}

pub(super) fn profile(
    category: ApplicantCategory,
    mention: Mention,
    scholarship_holder: bool,
) -> ApplicantProfile {
    ApplicantProfile {
        category,
        mention,
        scholarship_holder,
    }
}

pub(super) fn all_profiles() -> Vec<ApplicantProfile> {
    let mut profiles = Vec::new();
    for category in ApplicantCategory::ordered() {
        for mention in Mention::ordered() {
            for scholarship_holder in [false, true] {
                profiles.push(profile(category, mention, scholarship_holder));
            }
        }
    }
    profiles
}

pub(super) fn build_service(fallback: RateFallback) -> Arc<AdmissionPredictionService> {
    Arc::new(AdmissionPredictionService::new(
        Arc::new(cohort_dataset(0.2)),
        fallback,
    ))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
