use super::common::*;
use crate::workflows::admission::domain::{ApplicantCategory, Mention, PredictionError};
use crate::workflows::admission::{FeedbackBand, RateBasis, RateFallback};

#[test]
fn service_classifies_predictions() {
    let service = build_service(RateFallback::Surface);

    let result = service
        .predict(
            &program("P1"),
            &profile(ApplicantCategory::General, Mention::Bien, true),
        )
        .expect("prediction");

    assert_eq!(result.band, Some(FeedbackBand::Good));
}

#[test]
fn service_applies_configured_fallback() {
    let applicant = profile(ApplicantCategory::Other, Mention::NoMention, true);

    let surfaced = build_service(RateFallback::Surface)
        .predict(&program("P2"), &applicant)
        .expect_err("gap surfaced");
    assert!(matches!(surfaced, PredictionError::InsufficientData { .. }));

    let substituted = build_service(RateFallback::ProgramWide)
        .predict(&program("P2"), &applicant)
        .expect("program-wide rate");
    assert_eq!(substituted.factors.basis, RateBasis::ProgramWide);
    assert_eq!(substituted.band, Some(FeedbackBand::Low));
}

#[test]
fn comparison_ignores_fallback_policy() {
    let applicant = profile(ApplicantCategory::Other, Mention::Bien, false);

    let results = build_service(RateFallback::ProgramWide)
        .compare(&applicant)
        .expect("comparison");

    assert_eq!(results.len(), 1);
    assert!(results.iter().all(|result| result.band.is_some()));
    assert!(results
        .iter()
        .all(|result| result.factors.basis == RateBasis::Category));
}

#[test]
fn summary_reports_every_program() {
    let service = build_service(RateFallback::Surface);

    let summary = service.summary().expect("summary");

    assert_eq!(summary.len(), 4);
    let p1 = &summary[0];
    assert_eq!(p1.program.as_str(), "P1");
    assert_eq!(p1.candidates, 120);
    assert_eq!(p1.proposals, 44);
    assert_eq!(p1.categories.len(), 3);
    assert_eq!(p1.categories[0].candidates, 100);
    assert_eq!(p1.categories[2].proposal_rate, None);
    assert_close(p1.scholarship_holder_share.expect("share"), 0.5);
    assert_close(p1.mention_share.expect("share"), 0.5);
    assert_close(p1.scholarship_rate, 0.2);

    let p4 = &summary[3];
    assert_eq!(p4.proposal_rate, None);
    assert_eq!(p4.scholarship_holder_share, None);
}
