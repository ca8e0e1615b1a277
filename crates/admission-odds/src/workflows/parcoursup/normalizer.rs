pub(crate) fn normalize_program(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_label(value: &str) -> String {
    normalize_program(value).to_lowercase()
}

/// Parses `0.25`, `0,25` or `25%` into a share in `[0, 1]`.
pub(crate) fn parse_share(value: &str) -> Option<f64> {
    let cleaned = normalize_program(value).replace(',', ".");
    let (number, percent) = match cleaned.strip_suffix('%') {
        Some(number) => (number.trim(), true),
        None => (cleaned.as_str(), false),
    };

    let parsed = number.parse::<f64>().ok()?;
    let share = if percent { parsed / 100.0 } else { parsed };

    (share.is_finite() && (0.0..=1.0).contains(&share)).then_some(share)
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_program(value)
}
