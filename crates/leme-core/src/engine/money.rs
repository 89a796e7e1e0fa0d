//! pt-BR number rendering: `.` groups thousands, `,` separates decimals.

/// Formats a monetary value as `R$ 1.234,56`. Negative values keep the sign
/// after the symbol (`R$ -1.234,56`).
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_number(value, 2))
}

pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction_part) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let grouped = group_thousands(integer_part);
    let is_zero = rendered.chars().all(|value| value == '0' || value == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match fraction_part {
        Some(fraction) => format!("{sign}{grouped},{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{}%", format_number(value, decimals))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - lead) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_number, format_percent};

    #[test]
    fn currency_uses_brazilian_separators() {
        assert_eq!(format_currency(10306.0), "R$ 10.306,00");
        assert_eq!(format_currency(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(0.5), "R$ 0,50");
        assert_eq!(format_currency(999.999), "R$ 1.000,00");
    }

    #[test]
    fn negative_values_keep_sign_after_symbol() {
        assert_eq!(format_currency(-10000.0), "R$ -10.000,00");
        assert_eq!(format_currency(-0.001), "R$ 0,00");
    }

    #[test]
    fn numbers_and_percentages() {
        assert_eq!(format_number(15000.0, 0), "15.000");
        assert_eq!(format_number(100.0, 0), "100");
        assert_eq!(format_percent(32.456, 1), "32,5%");
        assert_eq!(format_percent(-12.0, 1), "-12,0%");
    }
}
