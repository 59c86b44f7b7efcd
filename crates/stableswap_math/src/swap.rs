//! Swap simulation
//!
//! Composes the invariant and output solvers with fee application:
//! - D = calc_d(pre-trade balances)
//! - y = calc_y(balance_in + amount_in, D)
//! - gross = balance_out - y (0 if y >= balance_out)
//! - fee = gross · fee_bps / 10000
//! - net = gross - fee
//!
//! The fee stays in the pool, so the post-trade output reserve is
//! `balance_out - net`.

use primitive_types::U256;

use crate::fixed_point::wide_mul;
use crate::invariant::{calc_d, calc_d_n, d_product_wide};
use crate::output::{calc_y, calc_y_n};
use crate::{ann, to_u64, token_count, MathError, FEE_DENOMINATOR, PRICE_PRECISION};

/// Swap quote with fee breakdown and post-trade reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Amount of output token the trader receives (after fee)
    pub amount_out: u64,

    /// Output implied by the curve before the fee
    pub gross_out: u64,

    /// Fee withheld from `gross_out`
    pub fee: u64,

    /// Input token reserve after the trade
    pub new_balance_in: u64,

    /// Output token reserve after the trade (fee retained)
    pub new_balance_out: u64,
}

/// Quote a 2-token swap of `amount_in` into the pool.
///
/// # Arguments
/// * `bal_in` - Current balance of the input token
/// * `bal_out` - Current balance of the output token
/// * `amount_in` - Amount being swapped in
/// * `amp` - Amplification coefficient
/// * `fee_bps` - Fee in basis points, applied to the gross output
///
/// # Returns
/// * `SwapQuote` with net output, fee, and the new reserves
/// * Any solver failure from `calc_d` or `calc_y`
pub fn quote_swap(
    bal_in: u64,
    bal_out: u64,
    amount_in: u64,
    amp: u64,
    fee_bps: u64,
) -> Result<SwapQuote, MathError> {
    let d = calc_d(bal_in, bal_out, amp)?;

    let new_bal_in = bal_in.checked_add(amount_in).ok_or(MathError::Overflow)?;
    let new_bal_out = calc_y(new_bal_in, d, amp)?;

    build_quote(new_bal_in, bal_out, new_bal_out, fee_bps)
}

/// Quote an N-token swap from `from_idx` into `to_idx`.
///
/// Same steps as `quote_swap`, over the whole balance vector.
pub fn quote_swap_n(
    balances: &[u64],
    from_idx: usize,
    to_idx: usize,
    amount_in: u64,
    amp: u64,
    fee_bps: u64,
) -> Result<SwapQuote, MathError> {
    let new_bal_out = calc_y_n(balances, from_idx, to_idx, amount_in, amp)?;

    // calc_y_n has validated both indices and the deposit
    let new_bal_in = balances[from_idx] + amount_in;
    build_quote(new_bal_in, balances[to_idx], new_bal_out, fee_bps)
}

/// Net output of a 2-token swap (see `quote_swap`)
pub fn simulate_swap(
    bal_in: u64,
    bal_out: u64,
    amount_in: u64,
    amp: u64,
    fee_bps: u64,
) -> Result<u64, MathError> {
    quote_swap(bal_in, bal_out, amount_in, amp, fee_bps).map(|q| q.amount_out)
}

/// Net output of an N-token swap (see `quote_swap_n`)
pub fn simulate_swap_n(
    balances: &[u64],
    from_idx: usize,
    to_idx: usize,
    amount_in: u64,
    amp: u64,
    fee_bps: u64,
) -> Result<u64, MathError> {
    quote_swap_n(balances, from_idx, to_idx, amount_in, amp, fee_bps).map(|q| q.amount_out)
}

fn build_quote(
    new_bal_in: u64,
    bal_out: u64,
    solved_bal_out: u64,
    fee_bps: u64,
) -> Result<SwapQuote, MathError> {
    // Degenerate trade below rounding resolution
    let gross_out = bal_out.saturating_sub(solved_bal_out);

    let fee = to_u64(wide_mul(gross_out, fee_bps) / FEE_DENOMINATOR as u128)?;
    let amount_out = gross_out.saturating_sub(fee);

    Ok(SwapQuote {
        amount_out,
        gross_out,
        fee: gross_out - amount_out,
        new_balance_in: new_bal_in,
        new_balance_out: bal_out - amount_out,
    })
}

/// Split a swap fee between the pool admin and liquidity providers.
///
/// Returns `(admin_fee, lp_fee)`; `admin_fee_pct` is clamped to 100.
pub fn split_admin_fee(fee: u64, admin_fee_pct: u64) -> (u64, u64) {
    let pct = admin_fee_pct.min(100);
    let admin = (wide_mul(fee, pct) / 100) as u64;
    (admin, fee - admin)
}

/// Price impact of a 2-token swap as a fraction (0.01 = 1%).
///
/// Measured against a 1:1 stable expectation: `1 - amount_out / amount_in`.
/// Includes the fee.
pub fn calc_price_impact(
    bal_in: u64,
    bal_out: u64,
    amount_in: u64,
    amp: u64,
    fee_bps: u64,
) -> Result<f64, MathError> {
    if amount_in == 0 {
        return Err(MathError::ZeroAmount);
    }
    let amount_out = simulate_swap(bal_in, bal_out, amount_in, amp, fee_bps)?;
    Ok(1.0 - amount_out as f64 / amount_in as f64)
}

/// Minimum acceptable output for a given slippage tolerance (bps).
pub fn calc_min_output(expected_output: u64, slippage_bps: u64) -> u64 {
    let keep = FEE_DENOMINATOR - slippage_bps.min(FEE_DENOMINATOR);
    (wide_mul(expected_output, keep) / FEE_DENOMINATOR as u128) as u64
}

/// Marginal price of token `i` in units of token `j`, scaled by 1e18.
///
/// With `D_P = D^(n+1) / (n^n·Πx)` the partial derivatives of the invariant
/// give
///
/// ```text
/// price = x_j·(Ann·x_i + D_P) / (x_i·(Ann·x_j + D_P))
/// ```
///
/// A balanced pool prices every pair at exactly 1e18.
pub fn calc_spot_price(balances: &[u64], i: usize, j: usize, amp: u64) -> Result<u128, MathError> {
    let n = token_count(balances)?;
    if i >= n || j >= n {
        return Err(MathError::InvalidTokenIndex);
    }

    let d = calc_d_n(balances, amp)?;
    let d_p = d_product_wide(balances, U256::from(d))?;
    let ann = U256::from(ann(amp, n)?);

    let x_i = U256::from(balances[i]);
    let x_j = U256::from(balances[j]);

    let num = ann
        .checked_mul(x_i)
        .and_then(|v| v.checked_add(d_p))
        .and_then(|v| v.checked_mul(x_j))
        .and_then(|v| v.checked_mul(U256::from(PRICE_PRECISION)))
        .ok_or(MathError::Overflow)?;
    let denom = ann
        .checked_mul(x_j)
        .and_then(|v| v.checked_add(d_p))
        .and_then(|v| v.checked_mul(x_i))
        .ok_or(MathError::Overflow)?;
    if denom.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let price = num / denom;
    if price > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(price.as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_AMP;

    const BAL: u64 = 1_000_000_000_000;

    #[test]
    fn test_balanced_swap_with_fee() {
        let quote = quote_swap(BAL, BAL, 10_000_000_000, 1000, 30).unwrap();

        assert_eq!(quote.gross_out, 9_999_950_021);
        assert_eq!(quote.amount_out, 9_969_950_171);
        assert_eq!(quote.fee, 29_999_850);

        // Slightly below 10e9 · (1 - 0.003) from curve slippage
        assert!(quote.amount_out < 9_970_000_000);
        assert!(quote.amount_out > 9_960_000_000);

        assert_eq!(quote.new_balance_in, BAL + 10_000_000_000);
        assert_eq!(quote.new_balance_out, BAL - quote.amount_out);
    }

    #[test]
    fn test_simulate_swap_matches_quote() {
        let quote = quote_swap(BAL, BAL / 2, 1_000_000_000, 500, 4).unwrap();
        let out = simulate_swap(BAL, BAL / 2, 1_000_000_000, 500, 4).unwrap();
        assert_eq!(out, quote.amount_out);
        assert_eq!(out, 998_755_641);
    }

    #[test]
    fn test_large_pool_swap() {
        let bal = 100_000_000_000_000_000;
        assert_eq!(simulate_swap(bal, bal, 1_000_000_000, MAX_AMP, 30), Ok(997_000_000));
    }

    #[test]
    fn test_zero_amount_in_gives_zero_out() {
        let out = simulate_swap(BAL, BAL, 0, 1000, 30).unwrap();
        assert_eq!(out, 0);
    }

    #[test]
    fn test_fee_accounting() {
        let no_fee = simulate_swap(BAL, BAL, 1_000_000_000, 100, 0).unwrap();
        let with_fee = simulate_swap(BAL, BAL, 1_000_000_000, 100, 30).unwrap();
        assert!(with_fee < no_fee);

        // 100% fee leaves nothing
        assert_eq!(simulate_swap(BAL, BAL, 1_000_000_000, 100, 10_000), Ok(0));
    }

    #[test]
    fn test_swap_propagates_solver_failure() {
        assert_eq!(
            simulate_swap(0, BAL, 1_000_000, 100, 30),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(simulate_swap(BAL, BAL, 1_000_000, 0, 30), Err(MathError::InvalidAmp));
    }

    #[test]
    fn test_n_token_swap() {
        let balances = [BAL; 3];
        let quote = quote_swap_n(&balances, 0, 1, 1_000_000_000, 100, 0).unwrap();
        assert_eq!(quote.amount_out, 999_998_891);
        assert_eq!(quote.new_balance_in, BAL + 1_000_000_000);

        // Two-token N variant agrees with the dedicated entry point
        let two = simulate_swap(BAL, BAL / 2, 1_000_000_000, 500, 4).unwrap();
        let n = simulate_swap_n(&[BAL, BAL / 2], 0, 1, 1_000_000_000, 500, 4).unwrap();
        assert_eq!(two, n);
    }

    #[test]
    fn test_n_token_swap_eight_tokens() {
        let out = simulate_swap_n(&[BAL; 8], 2, 5, 10_000_000_000, 100, 0).unwrap();
        assert!(out <= 10_000_000_000);
        assert!(out > 9_999_000_000);
    }

    #[test]
    fn test_split_admin_fee() {
        assert_eq!(split_admin_fee(1_001, 50), (500, 501));
        assert_eq!(split_admin_fee(1_000, 0), (0, 1_000));
        assert_eq!(split_admin_fee(1_000, 250), (1_000, 0));
    }

    #[test]
    fn test_price_impact() {
        let impact = calc_price_impact(BAL, BAL, 10_000_000_000, 1000, 30).unwrap();
        // Mostly the 0.3% fee
        assert!(impact > 0.003 && impact < 0.0031);

        assert_eq!(
            calc_price_impact(BAL, BAL, 0, 1000, 30),
            Err(MathError::ZeroAmount)
        );
    }

    #[test]
    fn test_min_output() {
        assert_eq!(calc_min_output(1_000_000, 50), 995_000);
        assert_eq!(calc_min_output(1_000_000, 0), 1_000_000);
        assert_eq!(calc_min_output(1_000_000, 20_000), 0);
        assert_eq!(calc_min_output(u64::MAX, 1), 18_444_899_399_302_180_659);
    }

    #[test]
    fn test_spot_price() {
        assert_eq!(calc_spot_price(&[BAL, BAL], 0, 1, 1000), Ok(PRICE_PRECISION));
        assert_eq!(calc_spot_price(&[BAL; 4], 3, 1, 50), Ok(PRICE_PRECISION));

        // Abundant token is cheaper than the scarce one
        let p = calc_spot_price(&[BAL, BAL / 2], 0, 1, 500).unwrap();
        assert_eq!(p, 999_157_828_903_225_249);

        // Close to a small trade's execution price
        let out = simulate_swap(BAL, BAL / 2, 1_000_000, 500, 0).unwrap();
        let exec = out as u128 * PRICE_PRECISION / 1_000_000;
        assert!(p.abs_diff(exec) < 1_000_000_000_000);

        assert_eq!(calc_spot_price(&[BAL, BAL], 0, 2, 1000), Err(MathError::InvalidTokenIndex));
    }
}
