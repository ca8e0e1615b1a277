use super::mapping::{category_for, flag_for, mention_for};
use super::normalizer::{normalize_program, parse_share};
use crate::workflows::admission::{HistoricalRecord, ProgramId, ValidationError};
use serde::Deserialize;
use std::io::Read;

/// Problem with a single CSV row.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("missing program identifier")]
    MissingProgram,
    #[error("unrecognised scholarship flag '{0}'")]
    InvalidFlag(String),
    #[error("scholarship rate '{0}' is not a share between 0 and 1 (or a percentage)")]
    InvalidRate(String),
    #[error("{proposals} proposals exceed {candidates} candidates")]
    ProposalsExceedCandidates { candidates: u64, proposals: u64 },
}

#[derive(Debug)]
pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row { line: u64, source: RowError },
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<HistoricalRecord>, ParseFailure> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|position| position.line()).unwrap_or(0);
        let raw: CohortRow = row.deserialize(Some(&headers))?;
        let record = raw
            .into_record()
            .map_err(|source| ParseFailure::Row { line, source })?;
        records.push(record);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CohortRow {
    #[serde(alias = "formation", alias = "Formation")]
    program: String,
    #[serde(alias = "categorie", alias = "Catégorie", alias = "type_bac")]
    category: String,
    #[serde(alias = "Mention")]
    mention: String,
    #[serde(alias = "boursier", alias = "Boursier")]
    scholarship_holder: String,
    #[serde(alias = "candidats", alias = "Candidats")]
    candidates: u64,
    #[serde(alias = "propositions", alias = "Propositions")]
    proposals: u64,
    #[serde(alias = "taux_boursiers", alias = "Taux boursiers")]
    institution_scholarship_rate: String,
}

impl CohortRow {
    fn into_record(self) -> Result<HistoricalRecord, RowError> {
        let program = normalize_program(&self.program);
        if program.is_empty() {
            return Err(RowError::MissingProgram);
        }

        let category = category_for(&self.category)?;
        let mention = mention_for(&self.mention)?;
        let scholarship_holder = flag_for(&self.scholarship_holder)
            .ok_or_else(|| RowError::InvalidFlag(self.scholarship_holder.clone()))?;
        let institution_scholarship_rate = parse_share(&self.institution_scholarship_rate)
            .ok_or_else(|| RowError::InvalidRate(self.institution_scholarship_rate.clone()))?;

        if self.proposals > self.candidates {
            return Err(RowError::ProposalsExceedCandidates {
                candidates: self.candidates,
                proposals: self.proposals,
            });
        }

        Ok(HistoricalRecord {
            program: ProgramId(program),
            category,
            mention,
            scholarship_holder,
            candidates: self.candidates,
            proposals: self.proposals,
            institution_scholarship_rate,
        })
    }
}
