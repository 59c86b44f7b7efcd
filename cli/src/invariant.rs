//! Invariant, spot price and amp commands

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use stableswap_math::{calc_d, calc_d_n, calc_spot_price};

use crate::config::PoolConfig;
use crate::output::{emit, fixed_18, join, Report};

#[derive(Debug, Serialize)]
pub struct InvariantReport {
    pub balances: Vec<u64>,
    pub amp: u64,
    pub d: u64,
    pub sum: u128,
}

impl Report for InvariantReport {
    fn title(&self) -> &'static str {
        "Invariant"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Balances", join(&self.balances)),
            ("Amp", self.amp.to_string()),
            ("D", self.d.to_string()),
            ("Sum", self.sum.to_string()),
        ]
    }
}

/// D over the pool balances at the effective amp
pub fn compute_d(config: &PoolConfig, amp: u64) -> Result<u64> {
    let result = if config.is_two_token() {
        calc_d(config.balances[0], config.balances[1], amp)
    } else {
        calc_d_n(&config.balances, amp)
    };
    let d = result.context("Invariant solve failed")?;
    debug!("D = {} (balances [{}], amp {})", d, join(&config.balances), amp);
    Ok(d)
}

pub fn show_invariant(config: &PoolConfig, now: i64, json: bool) -> Result<()> {
    let amp = config.effective_amp(now);
    let d = compute_d(config, amp)?;
    let report = InvariantReport {
        balances: config.balances.clone(),
        amp,
        d,
        sum: config.balances.iter().map(|&b| b as u128).sum(),
    };
    emit(&report, json)
}

#[derive(Debug, Serialize)]
pub struct PriceReport {
    pub from: usize,
    pub to: usize,
    pub amp: u64,
    /// 1e18 scale
    pub price: u128,
}

impl Report for PriceReport {
    fn title(&self) -> &'static str {
        "Spot Price"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pair", format!("{} -> {}", self.from, self.to)),
            ("Amp", self.amp.to_string()),
            ("Price", fixed_18(self.price)),
        ]
    }
}

pub fn show_price(config: &PoolConfig, from: usize, to: usize, now: i64, json: bool) -> Result<()> {
    let amp = config.effective_amp(now);
    let price = calc_spot_price(&config.balances, from, to, amp)
        .with_context(|| format!("Failed to price token {} in token {}", from, to))?;
    emit(
        &PriceReport {
            from,
            to,
            amp,
            price,
        },
        json,
    )
}

#[derive(Debug, Serialize)]
pub struct AmpReport {
    pub now: i64,
    pub base_amp: u64,
    pub target_amp: Option<u64>,
    pub ramp_start: Option<i64>,
    pub ramp_end: Option<i64>,
    pub effective_amp: u64,
}

impl Report for AmpReport {
    fn title(&self) -> &'static str {
        "Amplification"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("Now", self.now.to_string()), ("Base amp", self.base_amp.to_string())];
        if let (Some(target), Some(start), Some(end)) =
            (self.target_amp, self.ramp_start, self.ramp_end)
        {
            rows.push(("Target amp", target.to_string()));
            rows.push(("Ramp", format!("{} .. {}", start, end)));
        } else {
            rows.push(("Ramp", "none".to_string()));
        }
        rows.push(("Effective amp", self.effective_amp.to_string()));
        rows
    }
}

pub fn show_amp(config: &PoolConfig, now: i64, json: bool) -> Result<()> {
    let report = AmpReport {
        now,
        base_amp: config.amp,
        target_amp: config.ramp.map(|r| r.target_amp),
        ramp_start: config.ramp.map(|r| r.start),
        ramp_end: config.ramp.map(|r| r.end),
        effective_amp: config.effective_amp(now),
    };
    emit(&report, json)
}
