//! Output solver (y)
//!
//! Holding `D` fixed, solve the invariant for the balance of one output token
//! given every other balance. With `S'` and `P'` the sum and product of the
//! non-output balances (input balance already including the deposit):
//!
//! ```text
//! c = D^(n+1) / (n^n·P'·Ann)
//! b = S' + D/Ann
//! y_next = (y² + c) / (2y + b - D)
//! ```
//!
//! starting from `y = D`, with the same `|Δ| <= 1` stop rule and iteration cap
//! as the invariant solver.

use arrayvec::ArrayVec;
use primitive_types::U256;

use crate::invariant::{abs_diff, calc_d_n, narrow};
use crate::{ann, token_count, MathError, MAX_TOKENS, NEWTON_ITERATIONS};

/// Calculate the new output balance of a 2-token pool.
///
/// # Arguments
/// * `x_new` - Balance of the input token after the deposit
/// * `d` - Invariant computed over the pre-trade balances
/// * `amp` - Amplification coefficient
///
/// # Returns
/// * New balance of the output token
/// * `MathError::DivisionByZero` if `x_new` is zero
/// * `MathError::DidNotConverge` if the iteration cap is reached
pub fn calc_y(x_new: u64, d: u64, amp: u64) -> Result<u64, MathError> {
    solve_y(&[x_new], 2, d, amp, NEWTON_ITERATIONS)
}

/// Calculate the new balance of `to_idx` after depositing `amount_in` of
/// `from_idx` into an N-token pool.
///
/// D is computed here over the pre-trade `balances`; the fold then uses the
/// post-deposit balance for `from_idx` and pre-trade balances elsewhere.
///
/// # Returns
/// * New balance of the output token
/// * `MathError::InvalidTokenIndex` if an index is out of range or
///   `from_idx == to_idx`
/// * `MathError::DivisionByZero` if any folded balance is zero
/// * Any failure from `calc_d_n`
pub fn calc_y_n(
    balances: &[u64],
    from_idx: usize,
    to_idx: usize,
    amount_in: u64,
    amp: u64,
) -> Result<u64, MathError> {
    let n = token_count(balances)?;
    if from_idx >= n || to_idx >= n || from_idx == to_idx {
        return Err(MathError::InvalidTokenIndex);
    }

    let d = calc_d_n(balances, amp)?;

    let new_from = balances[from_idx]
        .checked_add(amount_in)
        .ok_or(MathError::Overflow)?;
    let folded: ArrayVec<u64, MAX_TOKENS> = balances
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != to_idx)
        .map(|(i, &x)| if i == from_idx { new_from } else { x })
        .collect();

    solve_y(&folded, n, d, amp, NEWTON_ITERATIONS)
}

/// Newton solve for y over the `n - 1` non-output balances in `folded`
pub(crate) fn solve_y(
    folded: &[u64],
    n: usize,
    d: u64,
    amp: u64,
    iterations: usize,
) -> Result<u64, MathError> {
    let ann = U256::from(ann(amp, n)?);
    let n = U256::from(n);
    let d = U256::from(d);

    let mut sorted: ArrayVec<u64, MAX_TOKENS> = folded.iter().copied().collect();
    sorted.sort_unstable();

    // c = D^(n+1) / (n^n·P'·Ann), one balance at a time
    let mut c = d;
    let mut s = U256::zero();
    for &x in &sorted {
        if x == 0 {
            return Err(MathError::DivisionByZero);
        }
        s += U256::from(x);
        c = c.checked_mul(d).ok_or(MathError::Overflow)? / (n * U256::from(x));
    }
    c = c.checked_mul(d).ok_or(MathError::Overflow)? / (ann * n);

    let b = s + d / ann;

    let mut y = d;
    for _ in 0..iterations {
        let y_prev = y;

        let num = y
            .checked_mul(y)
            .and_then(|v| v.checked_add(c))
            .ok_or(MathError::Overflow)?;
        // 2y + b - D
        let denom = y
            .checked_mul(U256::from(2))
            .and_then(|v| v.checked_add(b))
            .ok_or(MathError::Overflow)?
            .saturating_sub(d);
        if denom.is_zero() {
            return Err(MathError::DivisionByZero);
        }

        y = num / denom;

        if abs_diff(y, y_prev) <= U256::one() {
            return narrow(y);
        }
    }

    Err(MathError::DidNotConverge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariant::calc_d;

    const BAL: u64 = 1_000_000_000_000;

    #[test]
    fn test_calc_y_balanced_pool() {
        let d = calc_d(BAL, BAL, 1000).unwrap();
        let y = calc_y(BAL + 10_000_000_000, d, 1000).unwrap();
        assert_eq!(y, 990_000_049_979);
        // Output slightly below the 1:1 constant-sum amount
        assert!(BAL - y < 10_000_000_000);
    }

    #[test]
    fn test_calc_y_without_deposit_returns_balance() {
        let d = calc_d(BAL, BAL, 1000).unwrap();
        let y = calc_y(BAL, d, 1000).unwrap();
        assert!(y.abs_diff(BAL) <= 1);
    }

    #[test]
    fn test_calc_y_zero_input_balance() {
        assert_eq!(calc_y(0, 2 * BAL, 1000), Err(MathError::DivisionByZero));
        assert_eq!(calc_y(BAL, 2 * BAL, 0), Err(MathError::InvalidAmp));
    }

    #[test]
    fn test_n_token_matches_two_token() {
        let balances = [BAL, BAL / 2];
        let d = calc_d(balances[0], balances[1], 500).unwrap();
        let two = calc_y(BAL + 1_000_000_000, d, 500).unwrap();
        let n = calc_y_n(&balances, 0, 1, 1_000_000_000, 500).unwrap();
        assert_eq!(two, n);
        assert_eq!(n, 499_000_844_697);
    }

    #[test]
    fn test_calc_y_three_tokens() {
        let y = calc_y_n(&[BAL; 3], 0, 1, 1_000_000_000, 100).unwrap();
        assert_eq!(y, 999_000_001_109);
    }

    #[test]
    fn test_calc_y_n_invalid_indices() {
        let balances = [BAL; 3];
        assert_eq!(calc_y_n(&balances, 0, 0, 1, 100), Err(MathError::InvalidTokenIndex));
        assert_eq!(calc_y_n(&balances, 3, 0, 1, 100), Err(MathError::InvalidTokenIndex));
        assert_eq!(calc_y_n(&balances, 0, 7, 1, 100), Err(MathError::InvalidTokenIndex));
    }

    #[test]
    fn test_calc_y_n_zero_balance() {
        assert_eq!(
            calc_y_n(&[BAL, 0, BAL], 0, 2, 1_000, 100),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_calc_y_large_pool() {
        let bal = 100_000_000_000_000_000;
        let d = calc_d(bal, bal, 100_000).unwrap();
        let y = calc_y(bal + 1_000_000_000, d, 100_000).unwrap();
        assert_eq!(bal - y, 1_000_000_000);
    }

    #[test]
    fn test_iteration_cap() {
        // Needs 23 steps at amp 1
        let balances = [1, 1, 1, 1, 1, 1, 1, 1_000_000_000];
        assert_eq!(calc_y_n(&balances, 0, 7, 1, 1), Ok(706_519_122));

        let d = calc_d_n(&balances, 1).unwrap();
        let folded = [2, 1, 1, 1, 1, 1, 1];
        assert_eq!(solve_y(&folded, 8, d, 1, 23), Ok(706_519_122));
        assert_eq!(solve_y(&folded, 8, d, 1, 22), Err(MathError::DidNotConverge));
    }

    #[test]
    fn test_calc_y_n_deposit_overflow() {
        assert_eq!(
            calc_y_n(&[u64::MAX / 4, u64::MAX / 4], 0, 1, u64::MAX, 1),
            Err(MathError::Overflow)
        );
    }
}
