use colored::*;

use crate::error::{BenchError, Result};

pub fn log_info(label: &str, value: &str) {
    println!("{:>20}: {}", label.bold(), value);
}

pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

pub fn ordinal(n: u32) -> String {
    format!("{}{}", n, ordinal_suffix(n))
}

/// Cleans a typed dollar amount: strips everything but digits and dots, keeps the first dot
/// and at most two decimals.
pub fn sanitize_rate(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.split_once('.') {
        Some((whole, rest)) => {
            let decimals: String = rest.chars().filter(|c| *c != '.').take(2).collect();
            format!("{}.{}", whole, decimals)
        }
        None => cleaned,
    }
}

pub fn parse_rate(input: &str) -> Result<f64> {
    let sanitized = sanitize_rate(input);
    match sanitized.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(BenchError::InvalidRate(input.to_string())),
    }
}
