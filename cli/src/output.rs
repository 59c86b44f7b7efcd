//! Human and JSON rendering of command results

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use stableswap_math::PRICE_PRECISION;

/// A command result that can be printed for humans or serialized
pub trait Report: Serialize {
    fn title(&self) -> &'static str;

    /// `(label, value)` rows for the human-readable form
    fn rows(&self) -> Vec<(&'static str, String)>;
}

pub fn emit<R: Report>(report: &R, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize result")?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", format!("=== {} ===", report.title()).bright_green().bold());
    for (label, value) in report.rows() {
        println!("{} {}", format!("{}:", label).bright_cyan(), value);
    }
    Ok(())
}

/// 1e18-scaled fixed point as a decimal string
pub fn fixed_18(value: u128) -> String {
    format!(
        "{}.{:018}",
        value / PRICE_PRECISION,
        value % PRICE_PRECISION
    )
}

pub fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn pass_fail(ok: bool) -> String {
    if ok {
        "ok".green().to_string()
    } else {
        "FAIL".red().bold().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_18() {
        assert_eq!(fixed_18(PRICE_PRECISION), "1.000000000000000000");
        assert_eq!(fixed_18(999_157_828_903_225_249), "0.999157828903225249");
        assert_eq!(fixed_18(2 * PRICE_PRECISION + 5), "2.000000000000000005");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&[1, 2, 3]), "1, 2, 3");
        assert_eq!(join(&[]), "");
    }
}
