//! Parameter validation
//!
//! Boolean predicates for pool parameters. Callers turn a `false` into
//! whatever rejection their surface uses.

use crate::fixed_point::wide_mul;
use crate::{FEE_DENOMINATOR, MAX_AMP, MAX_TOKENS, MIN_AMP, MIN_DEPOSIT, MIN_TOKENS};

#[inline]
pub fn check_amp(amp: u64) -> bool {
    (MIN_AMP..=MAX_AMP).contains(&amp)
}

/// Fee rate in basis points, at most 100%
#[inline]
pub fn check_fee(fee_bps: u64) -> bool {
    fee_bps <= FEE_DENOMINATOR
}

/// Neither balance is more than `max_ratio` times the other.
///
/// An empty side is always rejected.
pub fn check_imbalance(bal0: u64, bal1: u64, max_ratio: u64) -> bool {
    if bal0 == 0 || bal1 == 0 {
        return false;
    }
    let (hi, lo) = if bal0 >= bal1 { (bal0, bal1) } else { (bal1, bal0) };
    hi as u128 <= wide_mul(lo, max_ratio)
}

#[inline]
pub fn check_min_amount(amount: u64, min: u64) -> bool {
    amount >= min
}

#[inline]
pub fn check_min_deposit(amount: u64) -> bool {
    amount >= MIN_DEPOSIT
}

#[inline]
pub fn check_token_count(n: usize) -> bool {
    (MIN_TOKENS..=MAX_TOKENS).contains(&n)
}
