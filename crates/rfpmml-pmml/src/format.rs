//! Literal formatting shared by scores, thresholds and arrays.

/// Render a numeric literal.
///
/// Values that are mathematically integral print in plain integer form
/// (`5.0` becomes `"5"`, `-0.0` becomes `"0"`). Everything else uses the
/// shortest decimal string that round-trips to the same `f64`, without
/// exponent notation. Non-finite values fall through to `Display` and
/// render as `inf`, `-inf` or `NaN`; the converter rejects them before
/// they reach a document.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    value.to_string()
}

/// Render category literals as a whitespace-delimited array body.
///
/// Literals containing a space are wrapped in double quotes so the list
/// can be split back unambiguously.
#[must_use]
pub fn format_string_array<S: AsRef<str>>(values: &[S]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        let value = value.as_ref();
        if i > 0 {
            out.push(' ');
        }
        if value.contains(' ') {
            out.push('"');
            out.push_str(value);
            out.push('"');
        } else {
            out.push_str(value);
        }
    }
    out
}
