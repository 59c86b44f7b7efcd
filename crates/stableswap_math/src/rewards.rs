//! Farming reward accumulators
//!
//! MasterChef-style accounting: a pool-wide reward-per-share accumulator
//! scaled by `REWARD_PRECISION`, and a per-position debt that records the
//! accumulator value already paid out.

use crate::fixed_point::wide_mul;
use crate::REWARD_PRECISION;

#[inline]
fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Rewards owed to a position: `staked · acc / 1e12 - debt`, floored at zero.
pub fn calc_pending_reward(staked: u64, acc_reward_per_share: u64, reward_debt: u64) -> u64 {
    let earned = wide_mul(staked, acc_reward_per_share) / REWARD_PRECISION as u128;
    saturate(earned.saturating_sub(reward_debt as u128))
}

/// Advance the accumulator by `reward / total_staked` (scaled).
///
/// Unchanged when nothing is staked.
pub fn calc_new_acc_reward(current_acc: u64, reward: u64, total_staked: u64) -> u64 {
    if total_staked == 0 {
        return current_acc;
    }
    let increase = wide_mul(reward, REWARD_PRECISION) / total_staked as u128;
    current_acc.saturating_add(saturate(increase))
}

/// Debt to record for a position after stake or claim.
pub fn calc_reward_debt(staked: u64, acc_reward_per_share: u64) -> u64 {
    saturate(wide_mul(staked, acc_reward_per_share) / REWARD_PRECISION as u128)
}

/// Rewards emitted between `last_update` and `now`, clipped to the farm window.
pub fn calc_farm_emission(
    reward_per_second: u64,
    start_time: i64,
    end_time: i64,
    last_update: i64,
    now: i64,
) -> u64 {
    let from = last_update.max(start_time);
    let to = now.min(end_time);
    if to <= from {
        return 0;
    }
    let elapsed = (to as i128 - from as i128) as u128;
    saturate((reward_per_second as u128).saturating_mul(elapsed))
}

/// Farm window is inclusive at both ends.
pub fn is_farm_active(start_time: i64, end_time: i64, now: i64) -> bool {
    now >= start_time && now <= end_time
}

pub fn is_locked(lock_end: i64, now: i64) -> bool {
    now < lock_end
}
