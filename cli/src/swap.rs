//! Swap quotes

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use stableswap_math::{
    calc_min_output, check_min_amount, quote_swap, quote_swap_n,
    split_admin_fee, SwapQuote, MIN_SWAP,
};

use crate::config::PoolConfig;
use crate::output::{emit, join, Report};

#[derive(Debug, Serialize)]
pub struct SwapReport {
    pub from: usize,
    pub to: usize,
    pub amp: u64,
    pub amount_in: u64,
    pub amount_out: u64,
    pub gross_out: u64,
    pub fee: u64,
    pub admin_fee: u64,
    pub lp_fee: u64,
    pub min_output: u64,
    pub price_impact_pct: f64,
    pub new_balances: Vec<u64>,
}

impl Report for SwapReport {
    fn title(&self) -> &'static str {
        "Swap Quote"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Route", format!("{} -> {}", self.from, self.to)),
            ("Amp", self.amp.to_string()),
            ("Amount in", self.amount_in.to_string()),
            ("Amount out", self.amount_out.to_string()),
            ("Fee", format!("{} (admin {}, lp {})", self.fee, self.admin_fee, self.lp_fee)),
            ("Min output", self.min_output.to_string()),
            ("Price impact", format!("{:.4}%", self.price_impact_pct)),
            ("New balances", join(&self.new_balances)),
        ]
    }
}

pub fn quote(
    config: &PoolConfig,
    from: usize,
    to: usize,
    amount: u64,
    slippage_bps: u64,
    now: i64,
    json: bool,
) -> Result<()> {
    let amp = config.effective_amp(now);
    let report = build_report(config, from, to, amount, slippage_bps, amp)?;
    emit(&report, json)
}

pub fn build_report(
    config: &PoolConfig,
    from: usize,
    to: usize,
    amount: u64,
    slippage_bps: u64,
    amp: u64,
) -> Result<SwapReport> {
    if !check_min_amount(amount, MIN_SWAP) {
        warn!("swap amount {} below minimum {}", amount, MIN_SWAP);
    }

    let q = swap_quote(config, from, to, amount, amp)
        .with_context(|| format!("Failed to quote swap {} -> {}", from, to))?;
    debug!("quote: {:?}", q);

    let price_impact = price_impact(&q, amount);

    let (admin_fee, lp_fee) = split_admin_fee(q.fee, config.admin_fee_pct);

    let mut new_balances = config.balances.clone();
    new_balances[from] = q.new_balance_in;
    new_balances[to] = q.new_balance_out;

    Ok(SwapReport {
        from,
        to,
        amp,
        amount_in: amount,
        amount_out: q.amount_out,
        gross_out: q.gross_out,
        fee: q.fee,
        admin_fee,
        lp_fee,
        min_output: calc_min_output(q.amount_out, slippage_bps),
        price_impact_pct: price_impact * 100.0,
        new_balances,
    })
}

/// `1 - amount_out / amount_in` against a 1:1 stable expectation, fee included
fn price_impact(q: &SwapQuote, amount_in: u64) -> f64 {
    if amount_in == 0 {
        return 0.0;
    }
    1.0 - q.amount_out as f64 / amount_in as f64
}

fn swap_quote(
    config: &PoolConfig,
    from: usize,
    to: usize,
    amount: u64,
    amp: u64,
) -> Result<SwapQuote> {
    if config.is_two_token() {
        let bal_in = config.token(from)?;
        let bal_out = config.token(to)?;
        if from == to {
            anyhow::bail!("Input and output token are the same ({})", from);
        }
        Ok(quote_swap(bal_in, bal_out, amount, amp, config.fee_bps)?)
    } else {
        Ok(quote_swap_n(&config.balances, from, to, amount, amp, config.fee_bps)?)
    }
}
