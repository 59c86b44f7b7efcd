//! StableSwap invariant solver (D)
//!
//! The invariant for `n` balances `x_i` and amplification `A`:
//!
//! ```text
//! A·n^n·Σx_i + D = A·D·n^n + D^(n+1) / (n^n·Πx_i)
//! ```
//!
//! Newton iteration, starting from `D = S`:
//!
//! ```text
//! D_P    = D^(n+1) / (n^n·Πx_i)
//! D_next = (Ann·S + D_P·n)·D / ((Ann - 1)·D + (n + 1)·D_P)
//! ```
//!
//! where `S = Σx_i` and `Ann = A·n^n`. Iteration stops once two successive
//! values differ by at most 1.

use arrayvec::ArrayVec;
use primitive_types::U256;

use crate::{ann, token_count, MathError, MAX_TOKENS, NEWTON_ITERATIONS};

/// Calculate invariant D for a 2-token pool.
///
/// # Arguments
/// * `x` - Balance of token 0
/// * `y` - Balance of token 1
/// * `amp` - Amplification coefficient
///
/// # Returns
/// * `D`, or 0 for an empty pool
/// * `MathError::DivisionByZero` if exactly one side is empty
/// * `MathError::DidNotConverge` if the iteration cap is reached
pub fn calc_d(x: u64, y: u64, amp: u64) -> Result<u64, MathError> {
    calc_d_n(&[x, y], amp)
}

/// Calculate invariant D for an N-token pool (2 to 8 tokens).
///
/// # Arguments
/// * `balances` - Token balances, one per pool token
/// * `amp` - Amplification coefficient
///
/// # Returns
/// * `D`, or 0 when every balance is zero
/// * `MathError::InvalidTokenCount` for fewer than 2 or more than 8 balances
/// * `MathError::DivisionByZero` if any (but not every) balance is zero
/// * `MathError::Overflow` if D does not fit in 64 bits or an intermediate
///   exceeds 256 bits
/// * `MathError::DidNotConverge` if the iteration cap is reached
pub fn calc_d_n(balances: &[u64], amp: u64) -> Result<u64, MathError> {
    solve_d(balances, amp, NEWTON_ITERATIONS)
}

pub(crate) fn solve_d(balances: &[u64], amp: u64, iterations: usize) -> Result<u64, MathError> {
    let n = token_count(balances)?;

    let s: u128 = balances.iter().map(|&b| b as u128).sum();
    if s == 0 {
        return Ok(0);
    }
    if balances.contains(&0) {
        return Err(MathError::DivisionByZero);
    }

    let ann = U256::from(ann(amp, n)?);
    let n = U256::from(n);
    let s = U256::from(s);
    let ann_s = ann.checked_mul(s).ok_or(MathError::Overflow)?;
    let ann_sub_one = ann - 1;
    let n_add_one = n + 1;

    let mut d = s;
    for _ in 0..iterations {
        let d_p = d_product_wide(balances, d)?;
        let d_prev = d;

        // (Ann·S + D_P·n)·D
        let num = d_p
            .checked_mul(n)
            .and_then(|v| v.checked_add(ann_s))
            .and_then(|v| v.checked_mul(d))
            .ok_or(MathError::Overflow)?;
        // (Ann - 1)·D + (n + 1)·D_P
        let denom = ann_sub_one
            .checked_mul(d)
            .and_then(|v| d_p.checked_mul(n_add_one).and_then(|w| v.checked_add(w)))
            .ok_or(MathError::Overflow)?;
        if denom.is_zero() {
            return Err(MathError::DivisionByZero);
        }

        d = num / denom;

        if abs_diff(d, d_prev) <= U256::one() {
            return narrow(d);
        }
    }

    Err(MathError::DidNotConverge)
}

/// `D_P = D^(n+1) / (n^n·Πx_i)` for a 128-bit D.
///
/// Fails on a zero balance rather than dividing by it.
pub fn d_product(balances: &[u64], d: u128) -> Result<u128, MathError> {
    let d_p = d_product_wide(balances, U256::from(d))?;
    if d_p > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(d_p.as_u128())
}

/// `D_P` computed one balance at a time so the intermediate stays near the
/// magnitude of D. Balances are folded smallest first, so the result does
/// not depend on their order.
pub(crate) fn d_product_wide(balances: &[u64], d: U256) -> Result<U256, MathError> {
    let n = U256::from(balances.len());
    let mut sorted: ArrayVec<u64, MAX_TOKENS> = balances.iter().copied().collect();
    sorted.sort_unstable();

    let mut d_p = d;
    for &x in &sorted {
        if x == 0 {
            return Err(MathError::DivisionByZero);
        }
        d_p = d_p.checked_mul(d).ok_or(MathError::Overflow)? / (n * U256::from(x));
    }
    Ok(d_p)
}

#[inline]
pub(crate) fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Narrow a solver result back to `u64`
#[inline]
pub(crate) fn narrow(value: U256) -> Result<u64, MathError> {
    if value > U256::from(u64::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(value.as_u64())
}
