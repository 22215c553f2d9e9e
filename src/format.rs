//! Number formatting for report text.

use crate::analysis::round_half_up;

/// Format a monetary amount with thousands separators and at most two
/// decimals, dropping trailing zeros (`24500` -> `24,500`, `12.5` -> `12.5`).
pub fn format_currency(value: f64) -> String {
    let cents = round_half_up(value.abs() * 100.0) as u64;
    let mut out = group_thousands(cents / 100);

    let fraction = cents % 100;
    if fraction != 0 {
        let digits = format!("{:02}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }

    if value < 0.0 && cents != 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format a value rounded to a whole number, without separators.
pub fn format_whole(value: f64) -> String {
    format!("{}", round_half_up(value) as i64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(950.0), "950");
        assert_eq!(format_currency(24500.0), "24,500");
        assert_eq!(format_currency(1234567.0), "1,234,567");
        assert_eq!(format_currency(12.5), "12.5");
        assert_eq!(format_currency(1999.99), "1,999.99");
        assert_eq!(format_currency(-1500.0), "-1,500");
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_whole(150.0), "150");
        assert_eq!(format_whole(876.4), "876");
        assert_eq!(format_whole(510.5), "511");
    }
}
