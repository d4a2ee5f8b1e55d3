//! Display formatting for influencer cards.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};

/// Formats an amount as Indian-locale rupees: `₹1,23,456.50`.
pub fn format_inr(amount: &BigDecimal) -> String {
    let rounded = amount.with_scale_round(2, RoundingMode::HalfUp).to_string();
    let (negative, digits) = match rounded.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rounded.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let sign = if negative { "-" } else { "" };
    format!("{}₹{}.{}", sign, group_indian(integer), fraction)
}

/// Groups digits the Indian way: the last three, then pairs.
fn group_indian(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_string();
    }
    let (head, tail) = integer.split_at(integer.len() - 3);

    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats a percentage-like number without trailing zeros: `30`, `12.5`.
pub fn format_number(value: &BigDecimal) -> String {
    let text = value.with_scale_round(2, RoundingMode::HalfUp).to_string();
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Join date as `16 Oct 2026`.
pub fn format_join_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-d %b %Y").to_string()
}

/// Uppercased first character of the name, for the avatar.
pub fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(&dec("0")), "₹0.00");
        assert_eq!(format_inr(&dec("999.5")), "₹999.50");
        assert_eq!(format_inr(&dec("1000")), "₹1,000.00");
        assert_eq!(format_inr(&dec("123456.5")), "₹1,23,456.50");
        assert_eq!(format_inr(&dec("12345678.999")), "₹1,23,45,679.00");
        assert_eq!(format_inr(&dec("-2500.25")), "-₹2,500.25");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(&dec("30.00")), "30");
        assert_eq!(format_number(&dec("12.50")), "12.5");
        assert_eq!(format_number(&dec("0")), "0");
        assert_eq!(format_number(&dec("7.125")), "7.13");
    }

    #[test]
    fn test_format_join_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_join_date(&date), "5 Mar 2024");
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("asha"), "A");
        assert_eq!(initial("élan"), "É");
        assert_eq!(initial(""), "");
    }
}
