//! Farm reward arithmetic

use anyhow::Result;
use serde::Serialize;
use stableswap_math::{
    calc_farm_emission, calc_new_acc_reward, calc_pending_reward, calc_reward_debt,
    is_farm_active,
};

use crate::output::{emit, Report};

#[derive(Debug, Serialize)]
pub struct PendingReport {
    pub staked: u64,
    pub acc_reward_per_share: u64,
    pub reward_debt: u64,
    pub pending: u64,
    /// Debt to record once the pending amount is claimed
    pub debt_after_claim: u64,
}

impl Report for PendingReport {
    fn title(&self) -> &'static str {
        "Pending Reward"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Staked", self.staked.to_string()),
            ("Acc per share", self.acc_reward_per_share.to_string()),
            ("Debt", self.reward_debt.to_string()),
            ("Pending", self.pending.to_string()),
            ("Debt after claim", self.debt_after_claim.to_string()),
        ]
    }
}

pub fn pending(staked: u64, acc: u64, debt: u64, json: bool) -> Result<()> {
    let report = PendingReport {
        staked,
        acc_reward_per_share: acc,
        reward_debt: debt,
        pending: calc_pending_reward(staked, acc, debt),
        debt_after_claim: calc_reward_debt(staked, acc),
    };
    emit(&report, json)
}

#[derive(Debug, Serialize)]
pub struct AccrueReport {
    pub acc_before: u64,
    pub reward: u64,
    pub total_staked: u64,
    pub acc_after: u64,
}

impl Report for AccrueReport {
    fn title(&self) -> &'static str {
        "Accumulator"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Before", self.acc_before.to_string()),
            ("Reward", self.reward.to_string()),
            ("Total staked", self.total_staked.to_string()),
            ("After", self.acc_after.to_string()),
        ]
    }
}

pub fn accrue(acc: u64, reward: u64, total_staked: u64, json: bool) -> Result<()> {
    if total_staked == 0 {
        log::warn!("nothing staked, accumulator unchanged");
    }
    let report = AccrueReport {
        acc_before: acc,
        reward,
        total_staked,
        acc_after: calc_new_acc_reward(acc, reward, total_staked),
    };
    emit(&report, json)
}

#[derive(Debug, Serialize)]
pub struct EmissionReport {
    pub now: i64,
    pub active: bool,
    pub emitted: u64,
}

impl Report for EmissionReport {
    fn title(&self) -> &'static str {
        "Farm Emission"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Now", self.now.to_string()),
            ("Active", self.active.to_string()),
            ("Emitted", self.emitted.to_string()),
        ]
    }
}

pub fn emission(
    rate: u64,
    start: i64,
    end: i64,
    last_update: i64,
    now: i64,
    json: bool,
) -> Result<()> {
    let report = EmissionReport {
        now,
        active: is_farm_active(start, end, now),
        emitted: calc_farm_emission(rate, start, end, last_update, now),
    };
    emit(&report, json)
}
