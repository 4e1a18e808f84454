use chrono::NaiveDateTime;
use ratatui::style::Color;

use crate::models::TransactionType;

/// Color for a transaction kind
pub fn type_color(kind: TransactionType) -> Color {
    match kind {
        TransactionType::Income => Color::Green,
        TransactionType::Expense => Color::Red,
        TransactionType::Transfer => Color::Blue,
    }
}

/// Sign prefix shown next to a ledger amount
pub fn amount_sign(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
        TransactionType::Transfer => "",
    }
}

/// USD currency formatting with thousands separators, e.g. `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${grouped}.{frac:02}")
    } else {
        format!("${grouped}.{frac:02}")
    }
}

/// Human month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

/// Short date for list rows; falls back to the raw server string
/// when the timestamp doesn't parse
pub fn format_date(raw: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S GMT"));
    match parsed {
        Ok(dt) => dt.format("%b %e, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.5), "$5.50");
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn currency_handles_negatives() {
        assert_eq!(format_currency(-42.1), "-$42.10");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
    }

    #[test]
    fn currency_rounds_to_cents() {
        assert_eq!(format_currency(9.999), "$10.00");
        assert_eq!(format_currency(0.005), "$0.01");
    }

    #[test]
    fn date_formats_known_shapes() {
        assert_eq!(format_date("2025-03-07T14:30:00"), "Mar  7, 2025");
        assert_eq!(format_date("2025-03-07 14:30:00"), "Mar  7, 2025");
    }

    #[test]
    fn date_falls_back_to_raw() {
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "?");
    }
}
