use super::normalizer::normalize_label;
use crate::workflows::admission::{ApplicantCategory, Mention, ValidationError};
use std::collections::HashMap;
use std::sync::OnceLock;

static CATEGORY_LABELS: OnceLock<HashMap<String, ApplicantCategory>> = OnceLock::new();
static MENTION_LABELS: OnceLock<HashMap<String, Mention>> = OnceLock::new();

/// Export headings first, then the canonical keys accepted by the domain parser.
pub(crate) fn category_for(raw: &str) -> Result<ApplicantCategory, ValidationError> {
    match category_labels().get(&normalize_label(raw)) {
        Some(category) => Ok(*category),
        None => raw.parse(),
    }
}

pub(crate) fn mention_for(raw: &str) -> Result<Mention, ValidationError> {
    match mention_labels().get(&normalize_label(raw)) {
        Some(mention) => Ok(*mention),
        None => raw.parse(),
    }
}

pub(crate) fn flag_for(raw: &str) -> Option<bool> {
    match normalize_label(raw).as_str() {
        "true" | "1" | "yes" | "oui" | "boursier" | "boursière" => Some(true),
        "false" | "0" | "no" | "non" | "non boursier" | "non boursière" => Some(false),
        _ => None,
    }
}

fn category_labels() -> &'static HashMap<String, ApplicantCategory> {
    CATEGORY_LABELS.get_or_init(|| {
        const LABELS: &[(&str, ApplicantCategory)] = &[
            ("bac général", ApplicantCategory::General),
            ("bacheliers généraux", ApplicantCategory::General),
            ("néo bacheliers généraux", ApplicantCategory::General),
            ("bac technologique", ApplicantCategory::Technological),
            ("bacheliers technologiques", ApplicantCategory::Technological),
            ("néo bacheliers technologiques", ApplicantCategory::Technological),
            ("bac professionnel", ApplicantCategory::Other),
            ("bacheliers professionnels", ApplicantCategory::Other),
            ("daeu", ApplicantCategory::Other),
            ("autres candidats", ApplicantCategory::Other),
            ("autres profils", ApplicantCategory::Other),
        ];

        LABELS
            .iter()
            .map(|(label, category)| (normalize_label(label), *category))
            .collect()
    })
}

fn mention_labels() -> &'static HashMap<String, Mention> {
    MENTION_LABELS.get_or_init(|| {
        const LABELS: &[(&str, Mention)] = &[
            ("sans mention", Mention::NoMention),
            ("aucune", Mention::NoMention),
            ("mention assez bien", Mention::AssezBien),
            ("mention bien", Mention::Bien),
            ("mention très bien", Mention::TresBien),
            ("très bien avec félicitations du jury", Mention::TresBien),
            ("mention très bien avec félicitations du jury", Mention::TresBien),
        ];

        LABELS
            .iter()
            .map(|(label, mention)| (normalize_label(label), *mention))
            .collect()
    })
}

#[cfg(test)]
pub(crate) fn lookup_category_for_tests(raw: &str) -> Option<ApplicantCategory> {
    category_for(raw).ok()
}

#[cfg(test)]
pub(crate) fn lookup_mention_for_tests(raw: &str) -> Option<Mention> {
    mention_for(raw).ok()
}
