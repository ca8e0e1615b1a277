use serde::Serialize;

use super::domain::{ApplicantCategory, HistoricalDataset, Mention, PredictionError, ProgramId};
use super::rate::ProgramStatistics;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRateEntry {
    pub category: ApplicantCategory,
    pub category_label: &'static str,
    pub candidates: u64,
    pub proposals: u64,
    pub proposal_rate: Option<f64>,
}

/// Headline figures for one program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramSummary {
    pub program: ProgramId,
    pub candidates: u64,
    pub proposals: u64,
    pub proposal_rate: Option<f64>,
    pub categories: Vec<CategoryRateEntry>,
    /// Share of candidates who hold a scholarship.
    pub scholarship_holder_share: Option<f64>,
    /// Share of candidates who obtained any mention.
    pub mention_share: Option<f64>,
    pub scholarship_rate: f64,
}

pub fn summarize(dataset: &HistoricalDataset) -> Result<Vec<ProgramSummary>, PredictionError> {
    dataset
        .programs()
        .map(|program| summarize_program(dataset, program))
        .collect()
}

pub fn summarize_program(
    dataset: &HistoricalDataset,
    program: &ProgramId,
) -> Result<ProgramSummary, PredictionError> {
    let mut overall = ProgramStatistics::default();
    let mut by_category = [ProgramStatistics::default(); 3];
    let mut scholarship_holders = 0_u64;
    let mut with_mention = 0_u64;

    for record in dataset.records_for(program)? {
        overall.absorb(record)?;
        by_category[category_slot(record.category)].absorb(record)?;
        // Both subsets stay below `overall.candidates`, which has not overflowed.
        if record.scholarship_holder {
            scholarship_holders += record.candidates;
        }
        if record.mention != Mention::NoMention {
            with_mention += record.candidates;
        }
    }

    let categories = ApplicantCategory::ordered()
        .into_iter()
        .map(|category| {
            let slice = by_category[category_slot(category)];
            CategoryRateEntry {
                category,
                category_label: category.label(),
                candidates: slice.candidates,
                proposals: slice.proposals,
                proposal_rate: slice.proposal_rate(),
            }
        })
        .collect();

    Ok(ProgramSummary {
        program: program.clone(),
        candidates: overall.candidates,
        proposals: overall.proposals,
        proposal_rate: overall.proposal_rate(),
        categories,
        scholarship_holder_share: share(scholarship_holders, overall.candidates),
        mention_share: share(with_mention, overall.candidates),
        scholarship_rate: dataset.scholarship_rate(program)?,
    })
}

fn category_slot(category: ApplicantCategory) -> usize {
    match category {
        ApplicantCategory::General => 0,
        ApplicantCategory::Technological => 1,
        ApplicantCategory::Other => 2,
    }
}

fn share(part: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64)
}
