//! Deposit, withdrawal and virtual price

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use stableswap_math::{
    calc_lp_tokens, calc_lp_tokens_n, calc_virtual_price, calc_virtual_price_n, calc_withdraw,
    calc_withdraw_n, check_min_deposit,
};

use crate::config::PoolConfig;
use crate::output::{emit, fixed_18, join, Report};

#[derive(Debug, Serialize)]
pub struct DepositReport {
    pub amp: u64,
    pub amounts: Vec<u64>,
    pub lp_minted: u64,
    pub new_lp_supply: u64,
    pub new_balances: Vec<u64>,
    pub initial: bool,
}

impl Report for DepositReport {
    fn title(&self) -> &'static str {
        "Deposit"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Amp", self.amp.to_string()),
            ("Amounts", join(&self.amounts)),
            ("LP minted", self.lp_minted.to_string()),
            ("New LP supply", self.new_lp_supply.to_string()),
            ("New balances", join(&self.new_balances)),
            ("Initial deposit", self.initial.to_string()),
        ]
    }
}

pub fn deposit(config: &PoolConfig, amounts: &[u64], now: i64, json: bool) -> Result<()> {
    let report = build_deposit(config, amounts, config.effective_amp(now))?;
    emit(&report, json)
}

pub fn build_deposit(config: &PoolConfig, amounts: &[u64], amp: u64) -> Result<DepositReport> {
    if amounts.len() != config.balances.len() {
        anyhow::bail!(
            "Expected {} deposit amounts, got {}",
            config.balances.len(),
            amounts.len()
        );
    }

    let initial = config.lp_supply == 0;
    if initial {
        for (i, &a) in amounts.iter().enumerate() {
            if !check_min_deposit(a) {
                warn!("initial deposit of token {} ({}) below minimum", i, a);
            }
        }
    }

    let result = if config.is_two_token() {
        calc_lp_tokens(
            amounts[0],
            amounts[1],
            config.balances[0],
            config.balances[1],
            config.lp_supply,
            amp,
        )
    } else {
        calc_lp_tokens_n(amounts, &config.balances, config.lp_supply, amp)
    };
    let lp_minted = result.context("Failed to compute LP tokens")?;
    debug!("lp minted {} against supply {}", lp_minted, config.lp_supply);

    let new_balances = config
        .balances
        .iter()
        .zip(amounts)
        .map(|(&b, &a)| b.checked_add(a))
        .collect::<Option<Vec<_>>>()
        .context("Deposit overflows a pool balance")?;
    let new_lp_supply = config
        .lp_supply
        .checked_add(lp_minted)
        .context("LP supply overflow")?;

    Ok(DepositReport {
        amp,
        amounts: amounts.to_vec(),
        lp_minted,
        new_lp_supply,
        new_balances,
        initial,
    })
}

#[derive(Debug, Serialize)]
pub struct WithdrawReport {
    pub lp_burned: u64,
    pub amounts: Vec<u64>,
    pub new_lp_supply: u64,
    pub new_balances: Vec<u64>,
}

impl Report for WithdrawReport {
    fn title(&self) -> &'static str {
        "Withdraw"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LP burned", self.lp_burned.to_string()),
            ("Amounts out", join(&self.amounts)),
            ("New LP supply", self.new_lp_supply.to_string()),
            ("New balances", join(&self.new_balances)),
        ]
    }
}

pub fn withdraw(config: &PoolConfig, lp: u64, json: bool) -> Result<()> {
    emit(&build_withdraw(config, lp)?, json)
}

pub fn build_withdraw(config: &PoolConfig, lp: u64) -> Result<WithdrawReport> {
    let amounts = if config.is_two_token() {
        let (a0, a1) = calc_withdraw(lp, config.balances[0], config.balances[1], config.lp_supply)
            .context("Failed to compute withdrawal")?;
        vec![a0, a1]
    } else {
        calc_withdraw_n(lp, &config.balances, config.lp_supply)
            .context("Failed to compute withdrawal")?
            .to_vec()
    };

    // Payouts never exceed balances and lp <= supply after a successful call
    let new_balances = config
        .balances
        .iter()
        .zip(&amounts)
        .map(|(&b, &a)| b - a)
        .collect();

    Ok(WithdrawReport {
        lp_burned: lp,
        amounts,
        new_lp_supply: config.lp_supply - lp,
        new_balances,
    })
}

#[derive(Debug, Serialize)]
pub struct VirtualPriceReport {
    pub amp: u64,
    pub lp_supply: u64,
    /// 1e18 scale
    pub virtual_price: u128,
}

impl Report for VirtualPriceReport {
    fn title(&self) -> &'static str {
        "Virtual Price"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Amp", self.amp.to_string()),
            ("LP supply", self.lp_supply.to_string()),
            ("Virtual price", fixed_18(self.virtual_price)),
        ]
    }
}

pub fn virtual_price(config: &PoolConfig, now: i64, json: bool) -> Result<()> {
    let amp = config.effective_amp(now);
    let result = if config.is_two_token() {
        calc_virtual_price(config.balances[0], config.balances[1], config.lp_supply, amp)
    } else {
        calc_virtual_price_n(&config.balances, config.lp_supply, amp)
    };
    let virtual_price = result.context("Failed to compute virtual price (is --lp-supply set?)")?;
    emit(
        &VirtualPriceReport {
            amp,
            lp_supply: config.lp_supply,
            virtual_price,
        },
        json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAL: u64 = 1_000_000_000_000;

    fn pool(balances: Vec<u64>, lp_supply: u64) -> PoolConfig {
        PoolConfig {
            balances,
            amp: 1000,
            fee_bps: 4,
            admin_fee_pct: 50,
            lp_supply,
            ramp: None,
        }
    }

    #[test]
    fn test_initial_deposit() {
        let config = pool(vec![0, 0], 0);
        let report = build_deposit(&config, &[100_000_000, 400_000_000], 1000).unwrap();
        assert!(report.initial);
        assert_eq!(report.lp_minted, 200_000_000);
        assert_eq!(report.new_lp_supply, 200_000_000);
        assert_eq!(report.new_balances, vec![100_000_000, 400_000_000]);
    }

    #[test]
    fn test_proportional_deposit_three_tokens() {
        let config = pool(vec![BAL; 3], 3 * BAL);
        let report = build_deposit(&config, &[BAL / 100; 3], 100).unwrap();
        assert_eq!(report.lp_minted, 30_000_000_000);
        assert!(!report.initial);
    }

    #[test]
    fn test_deposit_length_mismatch() {
        let config = pool(vec![BAL; 3], 3 * BAL);
        assert!(build_deposit(&config, &[1, 2], 100).is_err());
    }

    #[test]
    fn test_withdraw_all() {
        let config = pool(vec![BAL, BAL / 2], 2 * BAL);
        let report = build_withdraw(&config, 2 * BAL).unwrap();
        assert_eq!(report.amounts, vec![BAL, BAL / 2]);
        assert_eq!(report.new_balances, vec![0, 0]);
        assert_eq!(report.new_lp_supply, 0);
    }

    #[test]
    fn test_withdraw_more_than_supply() {
        let config = pool(vec![BAL; 4], BAL);
        let err = build_withdraw(&config, BAL + 1).unwrap_err();
        assert!(err.to_string().contains("Failed to compute withdrawal"));
    }
}
