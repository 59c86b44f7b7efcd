//! Pool description loading and validation

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use stableswap_math::{
    check_amp, check_fee, check_token_count, get_current_amp, ADMIN_FEE_PCT, DEFAULT_FEE_BPS,
};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Amp used when neither the pool file nor a flag sets one
pub const DEFAULT_AMP: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pool needs 2 to 8 balances, got {0} (set `balances` in --pool or pass --balances)")]
    TokenCount(usize),

    #[error("amp {0} outside [1, 100000]")]
    Amp(u64),

    #[error("fee {0} bps above 10000")]
    Fee(u64),

    #[error("admin fee {0}% above 100%")]
    AdminFee(u64),

    #[error("ramp target amp {0} outside [1, 100000]")]
    RampTarget(u64),

    #[error("ramp ends ({end}) before it starts ({start})")]
    RampWindow { start: i64, end: i64 },
}

/// Amplification ramp as stored in the pool file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RampConfig {
    pub target_amp: u64,
    pub start: i64,
    pub end: i64,
}

/// Pool file as written on disk; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolFile {
    #[serde(default)]
    pub balances: Vec<u64>,
    pub amp: Option<u64>,
    pub fee_bps: Option<u64>,
    pub admin_fee_pct: Option<u64>,
    pub lp_supply: Option<u64>,
    pub ramp: Option<RampConfig>,
}

impl PoolFile {
    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool file: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Failed to parse pool file: {}", path.display()))
    }
}

/// Command-line values that take precedence over the pool file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub balances: Option<Vec<u64>>,
    pub amp: Option<u64>,
    pub fee_bps: Option<u64>,
    pub lp_supply: Option<u64>,
}

/// Resolved pool parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolConfig {
    pub balances: Vec<u64>,
    pub amp: u64,
    pub fee_bps: u64,
    pub admin_fee_pct: u64,
    pub lp_supply: u64,
    pub ramp: Option<RampConfig>,
}

impl PoolConfig {
    /// Read the optional pool file, apply overrides and validate.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config = Self::load_unchecked(path, overrides)?;
        config.validate()?;
        info!(
            "pool: {} tokens, amp {}, fee {} bps, lp supply {}",
            config.balances.len(),
            config.amp,
            config.fee_bps,
            config.lp_supply
        );
        Ok(config)
    }

    /// Same as `load` without range validation.
    pub fn load_unchecked(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match path {
            Some(p) => {
                debug!("loading pool file {}", p.display());
                PoolFile::read(p)?
            }
            None => PoolFile::default(),
        };
        Ok(Self::resolve(file, overrides))
    }

    pub fn resolve(file: PoolFile, overrides: Overrides) -> Self {
        PoolConfig {
            balances: overrides.balances.unwrap_or(file.balances),
            amp: overrides.amp.or(file.amp).unwrap_or(DEFAULT_AMP),
            fee_bps: overrides.fee_bps.or(file.fee_bps).unwrap_or(DEFAULT_FEE_BPS),
            admin_fee_pct: file.admin_fee_pct.unwrap_or(ADMIN_FEE_PCT),
            lp_supply: overrides.lp_supply.or(file.lp_supply).unwrap_or(0),
            ramp: file.ramp,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !check_token_count(self.balances.len()) {
            return Err(ConfigError::TokenCount(self.balances.len()));
        }
        if !check_amp(self.amp) {
            return Err(ConfigError::Amp(self.amp));
        }
        if !check_fee(self.fee_bps) {
            return Err(ConfigError::Fee(self.fee_bps));
        }
        if self.admin_fee_pct > 100 {
            return Err(ConfigError::AdminFee(self.admin_fee_pct));
        }
        if let Some(ramp) = self.ramp {
            if !check_amp(ramp.target_amp) {
                return Err(ConfigError::RampTarget(ramp.target_amp));
            }
            if ramp.end < ramp.start {
                return Err(ConfigError::RampWindow {
                    start: ramp.start,
                    end: ramp.end,
                });
            }
        }
        Ok(())
    }

    /// Amp in effect at `now`; recomputed on every call
    pub fn effective_amp(&self, now: i64) -> u64 {
        match self.ramp {
            Some(r) => get_current_amp(self.amp, r.target_amp, r.start, r.end, now),
            None => self.amp,
        }
    }

    pub fn is_two_token(&self) -> bool {
        self.balances.len() == 2
    }

    /// Index into `balances`, or an error naming the pool size
    pub fn token(&self, idx: usize) -> Result<u64> {
        self.balances.get(idx).copied().with_context(|| {
            format!(
                "token index {} out of range for a {}-token pool",
                idx,
                self.balances.len()
            )
        })
    }
}
