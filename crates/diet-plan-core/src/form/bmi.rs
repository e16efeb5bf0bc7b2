//! Body-mass-index derivation.

/// Parse a strictly positive, finite number.
fn positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// Compute BMI from weight (kg) and height (cm), rounded to one decimal.
///
/// Returns `None` when either input is missing, non-numeric or not positive.
pub fn compute_bmi(weight_kg: &str, height_cm: &str) -> Option<f64> {
    let weight = positive(weight_kg)?;
    let height_m = positive(height_cm)? / 100.0;
    let bmi = weight / (height_m * height_m);
    // Half away from zero on the scaled value: 22.45 becomes 22.5.
    Some((bmi * 10.0).round() / 10.0)
}

/// Format a BMI the way the form displays it ("22.9", "25.0").
pub fn format_bmi(bmi: f64) -> String {
    format!("{:.1}", bmi)
}

/// Derive the BMI field text, or `None` when the inputs don't allow it.
pub fn derive_bmi(weight_kg: &str, height_cm: &str) -> Option<String> {
    compute_bmi(weight_kg, height_cm).map(format_bmi)
}
