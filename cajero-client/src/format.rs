//! Display formatting

/// Format an amount as Chilean pesos
///
/// Rounded to whole pesos with `.` as the thousands separator.
///
/// ```
/// use cajero_client::format_clp;
///
/// assert_eq!(format_clp(1234567.0), "$1.234.567");
/// assert_eq!(format_clp(-4500.0), "-$4.500");
/// ```
pub fn format_clp(amount: f64) -> String {
    let pesos = if amount.is_finite() {
        amount.round() as i64
    } else {
        0
    };
    let digits = pesos.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if pesos < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
