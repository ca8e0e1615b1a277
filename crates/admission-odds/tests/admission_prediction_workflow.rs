use std::io::Cursor;
use std::sync::Arc;

use admission_odds::workflows::admission::{
    base_rate, classify, compare_all, predict, AdmissionPredictionService, ApplicantCategory,
    ApplicantProfile, FeedbackBand, Mention, PredictionError, ProgramId, RateFallback,
};
use admission_odds::workflows::parcoursup::DatasetImporter;

const COHORTS: &str = "\
program,category,mention,scholarship_holder,candidates,proposals,institution_scholarship_rate
P1,general,none,false,70,26,0.2
P1,general,bien,true,30,14,0.2
P1,technological,none,false,40,8,0.2
P2,general,assez_bien,false,50,20,0.3
P2,other,none,false,0,0,0.3
P3,general,tres_bien,true,20,19,0.05
P3,other,assez_bien,false,10,3,0.05
";

fn profile(
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

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn imported_cohorts_drive_single_predictions() {
    let dataset = DatasetImporter::from_reader(Cursor::new(COHORTS)).expect("import succeeds");
    let p1 = ProgramId::from("P1");

    assert!(approx(
        base_rate(&dataset, &p1, ApplicantCategory::General).expect("rate"),
        0.4
    ));

    let good = predict(
        &dataset,
        &p1,
        &profile(ApplicantCategory::General, Mention::Bien, true),
    )
    .expect("prediction");
    assert!(approx(good.probability, 0.768));
    assert_eq!(classify(good.probability), FeedbackBand::Good);
}

#[test]
fn capped_prediction_is_excellent() {
    let dataset = DatasetImporter::from_reader(Cursor::new(COHORTS.replace(",0.2\n", ",0.3\n")))
        .expect("import succeeds");

    let result = predict(
        &dataset,
        &ProgramId::from("P1"),
        &profile(ApplicantCategory::General, Mention::TresBien, true),
    )
    .expect("prediction");

    assert!(approx(result.factors.raw_probability, 1.04));
    assert_eq!(result.probability, 1.0);
    assert_eq!(classify(result.probability), FeedbackBand::Excellent);
}

#[test]
fn empty_slice_is_excluded_from_comparison_but_propagated_by_predict() {
    let dataset = DatasetImporter::from_reader(Cursor::new(COHORTS)).expect("import succeeds");
    let applicant = profile(ApplicantCategory::Other, Mention::AssezBien, false);

    let error = base_rate(&dataset, &ProgramId::from("P2"), ApplicantCategory::Other)
        .expect_err("no candidates");
    assert!(matches!(error, PredictionError::InsufficientData { .. }));

    let error = predict(&dataset, &ProgramId::from("P2"), &applicant).expect_err("propagates");
    assert!(error.is_insufficient_data());

    let ranking = compare_all(&dataset, &applicant).expect("comparison");
    let ids: Vec<&str> = ranking.iter().map(|result| result.program.as_str()).collect();
    assert_eq!(ids, vec!["P3"]);
}

#[test]
fn bundled_dataset_ranks_every_program_with_candidates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/admissions.csv");
    let dataset = DatasetImporter::from_path(path).expect("bundled dataset loads");
    let service = AdmissionPredictionService::new(Arc::new(dataset), RateFallback::Surface);

    let general = service
        .compare(&profile(ApplicantCategory::General, Mention::AssezBien, false))
        .expect("comparison");
    assert_eq!(general.len(), service.dataset().program_count());
    assert!(general.iter().all(|result| result.band.is_some()));

    let other = service
        .compare(&profile(ApplicantCategory::Other, Mention::Bien, true))
        .expect("comparison");
    assert_eq!(other.len(), service.dataset().program_count() - 1);
    assert!(other
        .iter()
        .all(|result| !result.program.as_str().contains("Vannes")));

    for pair in general.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}
