//! Import of historical cohort statistics exported from Parcoursup as CSV.

mod mapping;
mod normalizer;
mod parser;

pub use parser::RowError;

use crate::workflows::admission::{program_totals, HistoricalDataset, PredictionError, ProgramId};
use parser::ParseFailure;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum DatasetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, source: RowError },
    /// Summed counts of one program do not fit in `u64`.
    CountOverflow { program: ProgramId },
    Empty,
}

impl std::fmt::Display for DatasetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetImportError::Io(err) => write!(f, "failed to read cohort export: {}", err),
            DatasetImportError::Csv(err) => write!(f, "invalid cohort CSV data: {}", err),
            DatasetImportError::Row { line, source } => {
                write!(f, "invalid cohort row on line {}: {}", line, source)
            }
            DatasetImportError::CountOverflow { program } => write!(
                f,
                "candidate or proposal totals for program '{}' exceed the supported range",
                program
            ),
            DatasetImportError::Empty => write!(f, "cohort export contains no records"),
        }
    }
}

impl std::error::Error for DatasetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetImportError::Io(err) => Some(err),
            DatasetImportError::Csv(err) => Some(err),
            DatasetImportError::Row { source, .. } => Some(source),
            DatasetImportError::CountOverflow { .. } | DatasetImportError::Empty => None,
        }
    }
}

impl From<std::io::Error> for DatasetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ParseFailure> for DatasetImportError {
    fn from(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::Csv(err) => Self::Csv(err),
            ParseFailure::Row { line, source } => Self::Row { line, source },
        }
    }
}

/// Program identifier normalized the way imported rows are, so user input matches the dataset.
pub fn program_id(raw: &str) -> ProgramId {
    ProgramId(normalizer::normalize_program(raw))
}

/// Loads the historical dataset once; the result is shared read-only afterwards.
pub struct DatasetImporter;

impl DatasetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<HistoricalDataset, DatasetImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            programs = dataset.program_count(),
            "historical dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<HistoricalDataset, DatasetImportError> {
        let records = parser::parse_records(reader)?;
        if records.is_empty() {
            return Err(DatasetImportError::Empty);
        }
        let dataset = HistoricalDataset::new(records);
        ensure_totals_fit(&dataset)?;
        Ok(dataset)
    }
}

fn ensure_totals_fit(dataset: &HistoricalDataset) -> Result<(), DatasetImportError> {
    for program in dataset.programs() {
        if let Err(PredictionError::CountOverflow { program }) = program_totals(dataset, program) {
            return Err(DatasetImportError::CountOverflow { program });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admission::{ApplicantCategory, Mention, ProgramId, ValidationError};
    use std::io::Cursor;

    const HEADER: &str = "program,category,mention,scholarship_holder,candidates,proposals,institution_scholarship_rate\n";

    #[test]
    fn imports_canonical_rows() {
        let csv = format!(
            "{HEADER}P1,general,bien,true,60,25,0.2\nP1,general,none,false,40,15,0.2\nP2,other,none,false,0,0,0.15\n"
        );

        let dataset = DatasetImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.program_count(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.program, ProgramId::from("P1"));
        assert_eq!(first.category, ApplicantCategory::General);
        assert_eq!(first.mention, Mention::Bien);
        assert!(first.scholarship_holder);
        assert_eq!(first.institution_scholarship_rate, 0.2);
    }

    #[test]
    fn imports_french_export_headings() {
        let csv = "formation,categorie,mention,boursier,candidats,propositions,taux_boursiers\n\
\u{feff}BUT  Science des Données - IUT Paris,Bac technologique,Mention très bien,oui,12,7,\"18,5%\"\n\
BUT Science des Données - IUT Paris,DAEU,Sans mention,non,3,1,18.5%\n";

        let dataset = DatasetImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let record = &dataset.records()[0];
        assert_eq!(
            record.program.as_str(),
            "BUT Science des Données - IUT Paris"
        );
        assert_eq!(record.category, ApplicantCategory::Technological);
        assert_eq!(record.mention, Mention::TresBien);
        assert!(record.scholarship_holder);
        assert!((record.institution_scholarship_rate - 0.185).abs() < 1e-12);
        assert_eq!(dataset.records()[1].category, ApplicantCategory::Other);
        assert_eq!(dataset.program_count(), 1);
    }

    #[test]
    fn rejects_unknown_mention_with_line_number() {
        let csv = format!("{HEADER}P1,general,bien,true,10,5,0.2\nP1,general,passable,true,10,5,0.2\n");

        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("closed table");

        match error {
            DatasetImportError::Row {
                line,
                source: RowError::Validation(ValidationError::UnknownMention(label)),
            } => {
                assert_eq!(line, 3);
                assert_eq!(label, "passable");
            }
            other => panic!("expected unknown mention, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inconsistent_counts() {
        let csv = format!("{HEADER}P1,general,bien,true,10,11,0.2\n");

        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("bad counts");

        assert!(matches!(
            error,
            DatasetImportError::Row {
                source: RowError::ProposalsExceedCandidates { .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_rates_outside_unit_interval() {
        let csv = format!("{HEADER}P1,general,bien,true,10,5,25\n");

        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("bare percent");

        assert!(matches!(
            error,
            DatasetImportError::Row {
                source: RowError::InvalidRate(_),
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_flags_and_empty_exports() {
        let csv = format!("{HEADER}P1,general,bien,maybe,10,5,0.2\n");
        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("flag");
        assert!(matches!(
            error,
            DatasetImportError::Row {
                source: RowError::InvalidFlag(_),
                ..
            }
        ));

        let error = DatasetImporter::from_reader(Cursor::new(HEADER)).expect_err("empty");
        assert!(matches!(error, DatasetImportError::Empty));
    }

    #[test]
    fn negative_counts_are_csv_errors() {
        let csv = format!("{HEADER}P1,general,bien,true,-4,0,0.2\n");

        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("unsigned");

        assert!(matches!(error, DatasetImportError::Csv(_)));
    }

    #[test]
    fn rejects_program_totals_beyond_u64() {
        let csv = format!(
            "{HEADER}P1,general,bien,true,18446744073709551615,1,0.2\nP1,general,none,false,2,2,0.2\n"
        );

        let error = DatasetImporter::from_reader(Cursor::new(csv)).expect_err("overflow");

        match error {
            DatasetImportError::CountOverflow { program } => assert_eq!(program.as_str(), "P1"),
            other => panic!("expected count overflow, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = DatasetImporter::from_path("./does-not-exist.csv").expect_err("io error");

        match error {
            DatasetImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn share_parser_accepts_decimals_and_percentages() {
        assert_eq!(normalizer::parse_share("0.25"), Some(0.25));
        assert_eq!(normalizer::parse_share("25%"), Some(0.25));
        assert_eq!(normalizer::parse_share(" 0,5 "), Some(0.5));
        assert_eq!(normalizer::parse_share("1.5"), None);
        assert_eq!(normalizer::parse_share("-0.1"), None);
        assert_eq!(normalizer::parse_share("n/a"), None);
    }

    #[test]
    fn normalize_program_collapses_whitespace() {
        let normalized = normalizer::normalize_for_tests("\u{feff}BUT   SD  -  IUT  Lyon ");
        assert_eq!(normalized, "BUT SD - IUT Lyon");
    }

    #[test]
    fn program_ids_from_user_input_match_imported_rows() {
        let csv = format!("{HEADER}\u{feff}BUT SD - IUT Lyon,general,bien,true,10,5,0.2\n");
        let dataset = DatasetImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert!(dataset.contains_program(&program_id("  BUT  SD -   IUT Lyon ")));
        assert!(!dataset.contains_program(&ProgramId::from("  BUT  SD -   IUT Lyon ")));
    }

    #[test]
    fn mapping_recognizes_export_labels() {
        assert_eq!(
            mapping::lookup_category_for_tests("Néo bacheliers généraux"),
            Some(ApplicantCategory::General)
        );
        assert_eq!(
            mapping::lookup_category_for_tests("Bac professionnel"),
            Some(ApplicantCategory::Other)
        );
        assert_eq!(
            mapping::lookup_mention_for_tests("Mention Très Bien avec félicitations du jury"),
            Some(Mention::TresBien)
        );
        assert_eq!(mapping::lookup_mention_for_tests("Passable"), None);
    }
}
