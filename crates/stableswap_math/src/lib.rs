//! StableSwap Math - Pure invariant solver and derived pool formulas
//!
//! This crate contains the numerical core of a StableSwap AMM: the Newton
//! solvers for the invariant `D` and for a single output balance `y`, plus the
//! swap, liquidity, amplification-ramp and farming formulas built on top of
//! them.
//!
//! Every function is total and side-effect free. Inputs are plain integers
//! supplied by the caller (balances, amp, fee rate, LP supply); nothing is
//! stored between calls, so the functions can be called concurrently from any
//! number of threads.
//!
//! # Numeric model
//! - Amounts, rates and timestamps are 64-bit integers
//! - The Newton solvers and spot prices run on checked 256-bit intermediates
//!   and narrow to `u64` at the end; fee, LP and reward formulas use checked
//!   `u128`; N-token geometric means use 512 bits
//! - No floating point on any solver path (`calc_price_impact` is the only
//!   `f64` output, layered on top of an integer swap simulation)

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

use core::fmt;

pub mod checks;
pub mod fixed_point;
pub mod invariant;
pub mod liquidity;
pub mod output;
pub mod ramp;
pub mod rewards;
pub mod swap;

pub use checks::*;
pub use fixed_point::{isqrt, isqrt_wide, nth_root_of_product, wide_div, wide_mul};
pub use invariant::{calc_d, calc_d_n, d_product};
pub use liquidity::{
    calc_initial_lp, calc_initial_lp_n, calc_lp_tokens, calc_lp_tokens_n, calc_virtual_price,
    calc_virtual_price_n, calc_withdraw, calc_withdraw_n,
};
pub use output::{calc_y, calc_y_n};
pub use ramp::{check_ramp, get_current_amp};
pub use rewards::{
    calc_farm_emission, calc_new_acc_reward, calc_pending_reward, calc_reward_debt,
    is_farm_active, is_locked,
};
pub use swap::{
    calc_min_output, calc_price_impact, calc_spot_price, quote_swap, quote_swap_n, simulate_swap,
    simulate_swap_n, split_admin_fee, SwapQuote,
};

/// Fixed-capacity balance vector (2 to `MAX_TOKENS` entries)
pub type Balances = arrayvec::ArrayVec<u64, MAX_TOKENS>;

/// Minimum amplification coefficient
pub const MIN_AMP: u64 = 1;

/// Maximum amplification coefficient
pub const MAX_AMP: u64 = 100_000;

/// Default swap fee (30 bps = 0.3%)
pub const DEFAULT_FEE_BPS: u64 = 30;

/// Default share of the swap fee routed to the pool admin (percent)
pub const ADMIN_FEE_PCT: u64 = 50;

/// Smallest swap input accepted by `check_min_amount` callers
pub const MIN_SWAP: u64 = 100_000;

/// Smallest initial deposit accepted by `check_min_deposit`
pub const MIN_DEPOSIT: u64 = 100_000_000;

/// Newton iteration cap for both solvers.
///
/// This is a domain boundary: inputs that need more steps are rejected with
/// `MathError::DidNotConverge`.
pub const NEWTON_ITERATIONS: usize = 255;

/// Minimum amplification ramp duration (1 day, seconds)
pub const RAMP_MIN_DURATION: i64 = 86_400;

/// Fewest tokens a pool may hold
pub const MIN_TOKENS: usize = 2;

/// Most tokens a pool may hold
pub const MAX_TOKENS: usize = 8;

/// Basis points denominator (10,000 bps = 100%)
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Reward-per-share accumulator scale (1e12)
pub const REWARD_PRECISION: u64 = 1_000_000_000_000;

/// Virtual price scale (1e18)
pub const VIRTUAL_PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Spot price scale (1e18)
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Default ratio bound for `check_imbalance`
pub const DEFAULT_MAX_IMBALANCE_RATIO: u64 = 10;

/// Error types for StableSwap math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Newton iteration hit `NEWTON_ITERATIONS` without `|Δ| <= 1`
    DidNotConverge,
    /// A zero balance, amp, or supply would be used as a divisor
    DivisionByZero,
    /// An intermediate or result does not fit its integer type
    Overflow,
    /// Invariant after a deposit is smaller than before
    InvariantDecreased,
    /// LP burn larger than the outstanding supply
    BurnExceedsSupply,
    /// Balance vector length outside `MIN_TOKENS..=MAX_TOKENS`, or vectors
    /// that must line up have different lengths
    InvalidTokenCount,
    /// Token index out of range, or input and output index are equal
    InvalidTokenIndex,
    /// Amplification coefficient is zero
    InvalidAmp,
    /// Amount must be non-zero
    ZeroAmount,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MathError::DidNotConverge => "newton iteration did not converge",
            MathError::DivisionByZero => "division by zero (empty balance or supply)",
            MathError::Overflow => "arithmetic overflow",
            MathError::InvariantDecreased => "invariant decreased after deposit",
            MathError::BurnExceedsSupply => "lp burn exceeds supply",
            MathError::InvalidTokenCount => "invalid token count",
            MathError::InvalidTokenIndex => "invalid token index",
            MathError::InvalidAmp => "invalid amplification coefficient",
            MathError::ZeroAmount => "zero amount",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for MathError {}

/// `Ann = amp * n^n`
#[inline]
pub(crate) fn ann(amp: u64, n: usize) -> Result<u128, MathError> {
    if amp == 0 {
        return Err(MathError::InvalidAmp);
    }
    let n = n as u128;
    let mut nn: u128 = 1;
    for _ in 0..n {
        nn *= n;
    }
    (amp as u128).checked_mul(nn).ok_or(MathError::Overflow)
}

/// Narrow a `u128` result back to `u64`
#[inline]
pub(crate) fn to_u64(value: u128) -> Result<u64, MathError> {
    u64::try_from(value).map_err(|_| MathError::Overflow)
}

/// Reject balance vectors outside `MIN_TOKENS..=MAX_TOKENS`
#[inline]
pub(crate) fn token_count(balances: &[u64]) -> Result<usize, MathError> {
    let n = balances.len();
    if !(MIN_TOKENS..=MAX_TOKENS).contains(&n) {
        return Err(MathError::InvalidTokenCount);
    }
    Ok(n)
}
