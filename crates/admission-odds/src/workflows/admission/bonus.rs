use super::domain::Mention;

/// Lowest bonus a scholarship holder receives, whatever the institution's rate.
pub const SCHOLARSHIP_BONUS_FLOOR: f64 = 0.1;

/// Multiplier for the applicant's distinction. The table is closed: every [`Mention`] maps to
/// exactly one factor and unknown labels are rejected when the mention is parsed.
pub const fn mention_multiplier(mention: Mention) -> f64 {
    match mention {
        Mention::NoMention => 1.0,
        Mention::AssezBien => 1.3,
        Mention::Bien => 1.6,
        Mention::TresBien => 2.0,
    }
}

/// `1 + max(0.1, rate)`: never below 1.1, proportional above the floor.
pub fn scholarship_multiplier(program_scholarship_rate: f64) -> f64 {
    1.0 + program_scholarship_rate.max(SCHOLARSHIP_BONUS_FLOOR)
}

/// Factor applied to a given applicant; non-holders are neutral.
pub(crate) fn applicant_scholarship_multiplier(
    scholarship_holder: bool,
    program_scholarship_rate: f64,
) -> f64 {
    if scholarship_holder {
        scholarship_multiplier(program_scholarship_rate)
    } else {
        1.0
    }
}
