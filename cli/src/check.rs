//! Parameter range checks

use anyhow::Result;
use log::warn;
use serde::Serialize;
use stableswap_math::{
    check_amp, check_fee, check_imbalance, check_ramp, check_token_count,
    DEFAULT_MAX_IMBALANCE_RATIO,
};

use crate::config::PoolConfig;
use crate::output::{emit, pass_fail, Report};

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub checks: Vec<Check>,
    pub ok: bool,
}

impl Report for CheckReport {
    fn title(&self) -> &'static str {
        "Pool Checks"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        self.checks
            .iter()
            .map(|c| (c.name, pass_fail(c.ok)))
            .collect()
    }
}

pub fn build_checks(config: &PoolConfig, now: i64) -> CheckReport {
    let mut checks = vec![
        Check {
            name: "token count",
            ok: check_token_count(config.balances.len()),
        },
        Check {
            name: "amp",
            ok: check_amp(config.amp),
        },
        Check {
            name: "effective amp",
            ok: check_amp(config.effective_amp(now)),
        },
        Check {
            name: "fee",
            ok: check_fee(config.fee_bps),
        },
        Check {
            name: "admin fee",
            ok: config.admin_fee_pct <= 100,
        },
    ];

    if config.is_two_token() {
        checks.push(Check {
            name: "imbalance",
            ok: check_imbalance(
                config.balances[0],
                config.balances[1],
                DEFAULT_MAX_IMBALANCE_RATIO,
            ),
        });
    }

    if let Some(ramp) = config.ramp {
        checks.push(Check {
            name: "ramp",
            ok: check_ramp(ramp.target_amp, ramp.end.saturating_sub(ramp.start)),
        });
    }

    for c in checks.iter().filter(|c| !c.ok) {
        warn!("check failed: {}", c.name);
    }

    let ok = checks.iter().all(|c| c.ok);
    CheckReport { checks, ok }
}

pub fn run_checks(config: &PoolConfig, now: i64, json: bool) -> Result<()> {
    let report = build_checks(config, now);
    emit(&report, json)?;
    if !report.ok {
        anyhow::bail!("Pool failed one or more checks");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RampConfig;
    use stableswap_math::RAMP_MIN_DURATION;

    fn pool() -> PoolConfig {
        PoolConfig {
            balances: vec![1_000, 5_000],
            amp: 100,
            fee_bps: 30,
            admin_fee_pct: 50,
            lp_supply: 0,
            ramp: None,
        }
    }

    #[test]
    fn test_healthy_pool_passes() {
        let report = build_checks(&pool(), 0);
        assert!(report.ok);
        assert_eq!(report.checks.len(), 6);
    }

    #[test]
    fn test_imbalanced_pool_fails() {
        let config = PoolConfig {
            balances: vec![1_000, 20_000],
            ..pool()
        };
        let report = build_checks(&config, 0);
        assert!(!report.ok);
        assert!(report.checks.iter().any(|c| c.name == "imbalance" && !c.ok));
    }

    #[test]
    fn test_short_ramp_fails() {
        let config = PoolConfig {
            ramp: Some(RampConfig {
                target_amp: 200,
                start: 0,
                end: RAMP_MIN_DURATION - 1,
            }),
            ..pool()
        };
        let report = build_checks(&config, 0);
        assert!(report.checks.iter().any(|c| c.name == "ramp" && !c.ok));
    }

    #[test]
    fn test_invalid_amp_and_fee_fail() {
        let config = PoolConfig {
            amp: 0,
            fee_bps: 20_000,
            ..pool()
        };
        let report = build_checks(&config, 0);
        let failed: Vec<_> = report
            .checks
            .iter()
            .filter(|c| !c.ok)
            .map(|c| c.name)
            .collect();
        assert_eq!(failed, vec!["amp", "effective amp", "fee"]);
    }
}
