use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{
    ApplicantCategory, HistoricalDataset, HistoricalRecord, PredictionError, ProgramId,
};

/// Candidate and proposal totals for one (program, category) slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgramStatistics {
    pub candidates: u64,
    pub proposals: u64,
}

impl ProgramStatistics {
    /// Adds the record's counts; a total that no longer fits in `u64` is reported, not wrapped.
    pub(crate) fn absorb(&mut self, record: &HistoricalRecord) -> Result<(), PredictionError> {
        let overflow = || PredictionError::CountOverflow {
            program: record.program.clone(),
        };
        self.candidates = self
            .candidates
            .checked_add(record.candidates)
            .ok_or_else(overflow)?;
        self.proposals = self
            .proposals
            .checked_add(record.proposals)
            .ok_or_else(overflow)?;
        Ok(())
    }

    /// `None` when no candidate was recorded for the slice.
    pub fn proposal_rate(&self) -> Option<f64> {
        if self.candidates == 0 {
            None
        } else {
            Some(self.proposals as f64 / self.candidates as f64)
        }
    }

    pub(crate) fn base_rate(
        &self,
        program: &ProgramId,
        category: Option<ApplicantCategory>,
    ) -> Result<f64, PredictionError> {
        self.proposal_rate()
            .ok_or_else(|| PredictionError::InsufficientData {
                program: program.clone(),
                category,
            })
    }
}

/// Totals for the records matching both `program` and `category`.
pub fn program_statistics(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    category: ApplicantCategory,
) -> Result<ProgramStatistics, PredictionError> {
    let mut statistics = ProgramStatistics::default();
    for record in dataset
        .records_for(program)?
        .filter(|record| record.category == category)
    {
        statistics.absorb(record)?;
    }
    Ok(statistics)
}

/// Totals for every record of `program`, regardless of category.
pub fn program_totals(
    dataset: &HistoricalDataset,
    program: &ProgramId,
) -> Result<ProgramStatistics, PredictionError> {
    let mut statistics = ProgramStatistics::default();
    for record in dataset.records_for(program)? {
        statistics.absorb(record)?;
    }
    Ok(statistics)
}

/// Historical proposals / candidates for one program and applicant category.
pub fn base_rate(
    dataset: &HistoricalDataset,
    program: &ProgramId,
    category: ApplicantCategory,
) -> Result<f64, PredictionError> {
    program_statistics(dataset, program, category)?.base_rate(program, Some(category))
}

/// Proposals / candidates for the program across every applicant category.
pub fn program_wide_rate(
    dataset: &HistoricalDataset,
    program: &ProgramId,
) -> Result<f64, PredictionError> {
    program_totals(dataset, program)?.base_rate(program, None)
}

/// Single pass over the dataset collecting one slice per program for `category`.
///
/// Programs without a matching row still get an (empty) entry so callers see every program.
pub(crate) fn statistics_by_program(
    dataset: &HistoricalDataset,
    category: ApplicantCategory,
) -> Result<BTreeMap<&ProgramId, ProgramStatistics>, PredictionError> {
    let mut statistics: BTreeMap<&ProgramId, ProgramStatistics> = dataset
        .programs()
        .map(|program| (program, ProgramStatistics::default()))
        .collect();

    for record in dataset
        .records()
        .iter()
        .filter(|record| record.category == category)
    {
        statistics
            .entry(&record.program)
            .or_default()
            .absorb(record)?;
    }

    Ok(statistics)
}
