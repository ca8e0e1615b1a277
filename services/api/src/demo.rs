use crate::infra::{load_service, DatasetArgs, ProfileArgs};
use admission_odds::config::AppConfig;
use admission_odds::error::AppError;
use admission_odds::workflows::admission::{
    AdmissionPredictionService, ApplicantCategory, ApplicantProfile, Mention, PredictionResult,
    ProgramId, ProgramSummary, RateBasis, RateFallback,
};
use admission_odds::workflows::parcoursup::{program_id, DatasetImporter};
use clap::Args;
use std::io::Cursor;
use std::sync::Arc;

const SAMPLE_COHORTS: &str = include_str!("../../../data/admissions.csv");

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Program identifier as it appears in the dataset (spacing is normalized)
    #[arg(long)]
    pub(crate) program: String,
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
    /// Only print the first N programs of the ranking
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fallback used for the single-program part of the demo
    #[arg(long, value_parser = crate::infra::parse_fallback)]
    pub(crate) fallback: Option<RateFallback>,
    /// Skip the per-program statistics table
    #[arg(long)]
    pub(crate) skip_summary: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = load_service(args.dataset, &config)?;
    let program = program_id(&args.program);
    let profile = args.profile.profile();

    render_profile(&profile);
    match service.predict(&program, &profile) {
        Ok(result) => render_prediction(&result),
        Err(err) if err.is_insufficient_data() => render_insufficient(&program, service.fallback()),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = load_service(args.dataset, &config)?;
    let profile = args.profile.profile();

    render_profile(&profile);
    let results = service.compare(&profile)?;
    render_comparison(&service, &results, args.top);

    Ok(())
}

pub(crate) fn run_summary(args: DatasetArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = load_service(args, &config)?;
    render_summary(&service.summary()?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fallback,
        skip_summary,
    } = args;

    let dataset = DatasetImporter::from_reader(Cursor::new(SAMPLE_COHORTS))?;
    let service = AdmissionPredictionService::new(
        Arc::new(dataset),
        fallback.unwrap_or(RateFallback::ProgramWide),
    );

    println!("Admission odds demo");
    println!(
        "Dataset: bundled sample ({} records, {} programs)",
        service.dataset().len(),
        service.dataset().program_count()
    );

    if !skip_summary {
        render_summary(&service.summary()?);
    }

    let profile = ApplicantProfile {
        category: ApplicantCategory::Technological,
        mention: Mention::Bien,
        scholarship_holder: true,
    };
    println!();
    render_profile(&profile);

    let results = service.compare(&profile)?;
    render_comparison(&service, &results, Some(3));

    let alternative_entry = ApplicantProfile {
        category: ApplicantCategory::Other,
        mention: Mention::NoMention,
        scholarship_holder: false,
    };
    println!();
    render_profile(&alternative_entry);
    for program in service.dataset().programs() {
        match service.predict(program, &alternative_entry) {
            Ok(result) => render_prediction(&result),
            Err(err) if err.is_insufficient_data() => {
                render_insufficient(program, service.fallback())
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn render_profile(profile: &ApplicantProfile) {
    println!(
        "Profile: {} | mention {} | {}",
        profile.category.label(),
        profile.mention.label(),
        if profile.scholarship_holder {
            "scholarship holder"
        } else {
            "no scholarship"
        }
    );
}

fn render_prediction(result: &PredictionResult) {
    let factors = &result.factors;
    let basis_note = match factors.basis {
        RateBasis::Category => "",
        RateBasis::ProgramWide => " [program-wide rate, no data for this category]",
    };
    let cap_note = if result.is_capped() {
        format!(" (capped from {:.1}%)", factors.raw_probability * 100.0)
    } else {
        String::new()
    };

    println!(
        "- {}: {:.1}%{}{}",
        result.program,
        result.percentage(),
        cap_note,
        basis_note
    );
    println!(
        "  base rate {:.1}% x mention {:.1} x scholarship {:.2}",
        factors.base_rate * 100.0,
        factors.mention_multiplier,
        factors.scholarship_multiplier
    );
    if let Some(band) = result.band {
        println!("  {} - {}", band.label(), band.message());
    }
}

fn render_insufficient(program: &ProgramId, fallback: RateFallback) {
    match fallback {
        RateFallback::Surface => println!(
            "- {}: insufficient data (no past candidates with this profile; try --fallback program_wide)",
            program
        ),
        RateFallback::ProgramWide => {
            println!("- {}: insufficient data (no past candidates at all)", program)
        }
    }
}

fn render_comparison(
    service: &AdmissionPredictionService,
    results: &[PredictionResult],
    top: Option<usize>,
) {
    let excluded = service.dataset().program_count() - results.len();
    println!(
        "\nProgram ranking ({} ranked, {} without data for this category)",
        results.len(),
        excluded
    );

    let shown = top.unwrap_or(results.len()).min(results.len());
    for (rank, result) in results.iter().take(shown).enumerate() {
        let band = result.band.map(|band| band.label()).unwrap_or("unclassified");
        println!(
            "{:>2}. {} - {:.1}% ({})",
            rank + 1,
            result.program,
            result.percentage(),
            band
        );
    }
    if shown < results.len() {
        println!("    ... {} more", results.len() - shown);
    }
}

fn render_summary(summary: &[ProgramSummary]) {
    println!("\nProgram statistics");
    for program in summary {
        let overall = program
            .proposal_rate
            .map(|rate| format!("{:.1}%", rate * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "- {}: {} candidates, {} proposals ({}), scholarship rate {:.0}%",
            program.program,
            program.candidates,
            program.proposals,
            overall,
            program.scholarship_rate * 100.0
        );
        for entry in &program.categories {
            match entry.proposal_rate {
                Some(rate) => println!(
                    "    {}: {}/{} ({:.1}%)",
                    entry.category_label,
                    entry.proposals,
                    entry.candidates,
                    rate * 100.0
                ),
                None => println!("    {}: no candidates", entry.category_label),
            }
        }
    }
}
