use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of an academic program (one Parcoursup "formation").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub String);

impl ProgramId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProgramId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Applicant track used to segment historical rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ApplicantCategory {
    General,
    Technological,
    /// Professional bac holders and alternative entry routes such as the DAEU.
    Other,
}

impl ApplicantCategory {
    pub const fn ordered() -> [ApplicantCategory; 3] {
        [
            ApplicantCategory::General,
            ApplicantCategory::Technological,
            ApplicantCategory::Other,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            ApplicantCategory::General => "general",
            ApplicantCategory::Technological => "technological",
            ApplicantCategory::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicantCategory::General => "Bac général",
            ApplicantCategory::Technological => "Bac technologique",
            ApplicantCategory::Other => "Autres (DAEU, bac pro...)",
        }
    }
}

impl fmt::Display for ApplicantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ApplicantCategory {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "general" | "generale" | "bac_general" => Ok(Self::General),
            "technological" | "technologique" | "techno" | "bac_technologique" => {
                Ok(Self::Technological)
            }
            "other" | "autre" | "autres" => Ok(Self::Other),
            _ => Err(ValidationError::UnknownCategory(raw.trim().to_string())),
        }
    }
}

impl TryFrom<String> for ApplicantCategory {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Distinction awarded at the baccalauréat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Mention {
    #[serde(rename = "none")]
    NoMention,
    AssezBien,
    Bien,
    TresBien,
}

impl Mention {
    pub const fn ordered() -> [Mention; 4] {
        [
            Mention::NoMention,
            Mention::AssezBien,
            Mention::Bien,
            Mention::TresBien,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Mention::NoMention => "none",
            Mention::AssezBien => "assez_bien",
            Mention::Bien => "bien",
            Mention::TresBien => "tres_bien",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mention::NoMention => "Sans mention",
            Mention::AssezBien => "Assez bien",
            Mention::Bien => "Bien",
            Mention::TresBien => "Très bien",
        }
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mention {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "none" | "sans_mention" | "sans" => Ok(Self::NoMention),
            "assez_bien" | "ab" => Ok(Self::AssezBien),
            "bien" | "b" => Ok(Self::Bien),
            "tres_bien" | "tb" => Ok(Self::TresBien),
            _ => Err(ValidationError::UnknownMention(raw.trim().to_string())),
        }
    }
}

impl TryFrom<String> for Mention {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lowercases, strips French accents and joins words with underscores.
pub(crate) fn canonical_label(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '-' | '\'' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join("_")
}

/// One row of the historical cohort table.
///
/// Proposals never exceed candidates on a well-formed row; the importer rejects rows that
/// break this, the engine itself only assumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub program: ProgramId,
    pub category: ApplicantCategory,
    pub mention: Mention,
    pub scholarship_holder: bool,
    pub candidates: u64,
    pub proposals: u64,
    /// Share of scholarship holders at the hosting institution, in `[0, 1]`.
    pub institution_scholarship_rate: f64,
}

/// Immutable snapshot of past admission cycles, indexed by program.
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
    programs: BTreeMap<ProgramId, Vec<usize>>,
}

impl HistoricalDataset {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        let mut programs: BTreeMap<ProgramId, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            programs
                .entry(record.program.clone())
                .or_default()
                .push(index);
        }

        Self { records, programs }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct programs in ascending identifier order.
    pub fn programs(&self) -> impl Iterator<Item = &ProgramId> + '_ {
        self.programs.keys()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn contains_program(&self, program: &ProgramId) -> bool {
        self.programs.contains_key(program)
    }

    pub fn records_for(
        &self,
        program: &ProgramId,
    ) -> Result<impl Iterator<Item = &HistoricalRecord> + '_, ValidationError> {
        let indices = self
            .programs
            .get(program)
            .ok_or_else(|| ValidationError::UnknownProgram(program.clone()))?;
        Ok(indices.iter().map(move |&index| &self.records[index]))
    }

    /// Mean institution scholarship rate over the program's rows.
    pub fn scholarship_rate(&self, program: &ProgramId) -> Result<f64, ValidationError> {
        let (sum, count) = self
            .records_for(program)?
            .fold((0.0_f64, 0_u32), |(sum, count), record| {
                (sum + record.institution_scholarship_rate, count + 1)
            });
        // Index entries are only created alongside a record, so count is never zero.
        Ok(sum / f64::from(count.max(1)))
    }
}

impl FromIterator<HistoricalRecord> for HistoricalDataset {
    fn from_iter<I: IntoIterator<Item = HistoricalRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Query input for a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub category: ApplicantCategory,
    pub mention: Mention,
    #[serde(default)]
    pub scholarship_holder: bool,
}

/// Caller supplied a value outside one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown mention '{0}' (expected none, assez_bien, bien or tres_bien)")]
    UnknownMention(String),
    #[error("unknown applicant category '{0}' (expected general, technological or other)")]
    UnknownCategory(String),
    #[error("program '{0}' is not present in the historical dataset")]
    UnknownProgram(ProgramId),
}

/// Failure raised by the rate, bonus, prediction and comparison operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "insufficient data for program '{program}' ({}): no candidates recorded",
        scope_label(.category)
    )]
    InsufficientData {
        program: ProgramId,
        /// `None` when the gap covers every category of the program.
        category: Option<ApplicantCategory>,
    },
    #[error("candidate or proposal totals for program '{program}' exceed the supported range")]
    CountOverflow { program: ProgramId },
}

impl PredictionError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, PredictionError::InsufficientData { .. })
    }
}

fn scope_label(category: &Option<ApplicantCategory>) -> &'static str {
    match category {
        Some(category) => category.key(),
        None => "all categories",
    }
}
