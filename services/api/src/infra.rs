use admission_odds::config::AppConfig;
use admission_odds::error::AppError;
use admission_odds::workflows::admission::{
    AdmissionPredictionService, ApplicantCategory, ApplicantProfile, Mention, RateFallback,
};
use admission_odds::workflows::parcoursup::DatasetImporter;
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DatasetArgs {
    /// Cohort CSV export (defaults to APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// How to handle programs without candidates in the applicant's category
    #[arg(long, value_parser = parse_fallback)]
    pub(crate) fallback: Option<RateFallback>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ProfileArgs {
    /// Applicant category: general, technological or other
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: ApplicantCategory,
    /// Bac mention: none, assez_bien, bien or tres_bien
    #[arg(long, value_parser = parse_mention, default_value = "none")]
    pub(crate) mention: Mention,
    /// The applicant holds a scholarship
    #[arg(long)]
    pub(crate) scholarship: bool,
}

impl ProfileArgs {
    pub(crate) fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            category: self.category,
            mention: self.mention,
            scholarship_holder: self.scholarship,
        }
    }
}

/// Resolve dataset path and fallback from flags, falling back to the environment config.
pub(crate) fn load_service(
    args: DatasetArgs,
    config: &AppConfig,
) -> Result<AdmissionPredictionService, AppError> {
    let path = args
        .dataset
        .unwrap_or_else(|| config.prediction.dataset_path.clone());
    let fallback = args.fallback.unwrap_or(config.prediction.fallback);
    let dataset = DatasetImporter::from_path(path)?;
    Ok(AdmissionPredictionService::new(Arc::new(dataset), fallback))
}

pub(crate) fn parse_category(raw: &str) -> Result<ApplicantCategory, String> {
    raw.parse::<ApplicantCategory>().map_err(|err| format!("{err}"))
}

pub(crate) fn parse_mention(raw: &str) -> Result<Mention, String> {
    raw.parse::<Mention>().map_err(|err| format!("{err}"))
}

pub(crate) fn parse_fallback(raw: &str) -> Result<RateFallback, String> {
    raw.parse::<RateFallback>().map_err(|err| format!("{err}"))
}
