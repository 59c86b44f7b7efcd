//! Liquidity accounting
//!
//! - Initial deposit: LP = geometric mean of the deposited amounts
//! - Incremental deposit: LP = lp_supply · (D1 - D0) / D0
//! - Withdrawal: amount_i = balance_i · lp_amount / lp_supply
//! - Virtual price: D · 1e18 / lp_supply
//!
//! The running LP supply is owned by the caller; these functions only
//! compute deltas.

use crate::fixed_point::{isqrt_wide, nth_root_of_product, wide_div, wide_mul};
use crate::invariant::{calc_d, calc_d_n};
use crate::{token_count, Balances, MathError, VIRTUAL_PRICE_PRECISION};

/// LP tokens for the first deposit into a 2-token pool: `sqrt(amount0 · amount1)`
pub fn calc_initial_lp(amount0: u64, amount1: u64) -> u64 {
    isqrt_wide(wide_mul(amount0, amount1))
}

/// LP tokens for the first deposit into an N-token pool.
///
/// N-th root of the product of the deposited amounts. Equal to
/// `calc_initial_lp` for two tokens.
pub fn calc_initial_lp_n(amounts: &[u64]) -> Result<u64, MathError> {
    token_count(amounts)?;
    Ok(nth_root_of_product(amounts))
}

/// Calculate LP tokens to mint for a deposit into a 2-token pool.
///
/// # Arguments
/// * `amt0` - Amount of token 0 to deposit
/// * `amt1` - Amount of token 1 to deposit
/// * `bal0` - Current balance of token 0
/// * `bal1` - Current balance of token 1
/// * `lp_supply` - Current LP token supply (0 for the initial deposit)
/// * `amp` - Amplification coefficient
///
/// # Returns
/// * LP tokens to mint
/// * `MathError::DivisionByZero` if the pool has supply but D0 is zero
/// * `MathError::InvariantDecreased` if D1 < D0
/// * Any failure from `calc_d`
pub fn calc_lp_tokens(
    amt0: u64,
    amt1: u64,
    bal0: u64,
    bal1: u64,
    lp_supply: u64,
    amp: u64,
) -> Result<u64, MathError> {
    if lp_supply == 0 {
        return Ok(calc_initial_lp(amt0, amt1));
    }

    let new0 = bal0.checked_add(amt0).ok_or(MathError::Overflow)?;
    let new1 = bal1.checked_add(amt1).ok_or(MathError::Overflow)?;

    let d0 = calc_d(bal0, bal1, amp)?;
    let d1 = calc_d(new0, new1, amp)?;

    mint_for_growth(d0, d1, lp_supply)
}

/// Calculate LP tokens to mint for a deposit into an N-token pool.
///
/// `amounts` and `balances` must have the same length.
pub fn calc_lp_tokens_n(
    amounts: &[u64],
    balances: &[u64],
    lp_supply: u64,
    amp: u64,
) -> Result<u64, MathError> {
    token_count(balances)?;
    if amounts.len() != balances.len() {
        return Err(MathError::InvalidTokenCount);
    }
    if lp_supply == 0 {
        return calc_initial_lp_n(amounts);
    }

    let mut after = Balances::new();
    for (&b, &a) in balances.iter().zip(amounts) {
        after.push(b.checked_add(a).ok_or(MathError::Overflow)?);
    }

    let d0 = calc_d_n(balances, amp)?;
    let d1 = calc_d_n(&after, amp)?;

    mint_for_growth(d0, d1, lp_supply)
}

fn mint_for_growth(d0: u64, d1: u64, lp_supply: u64) -> Result<u64, MathError> {
    if d0 == 0 {
        return Err(MathError::DivisionByZero);
    }
    let growth = d1.checked_sub(d0).ok_or(MathError::InvariantDecreased)?;
    wide_div(wide_mul(lp_supply, growth), d0)
}

/// Calculate tokens paid out for burning `lp_amount` from a 2-token pool.
///
/// Proportional redemption, no invariant solve. Returns `(amount0, amount1)`.
pub fn calc_withdraw(
    lp_amount: u64,
    bal0: u64,
    bal1: u64,
    lp_supply: u64,
) -> Result<(u64, u64), MathError> {
    check_burn(lp_amount, lp_supply)?;
    Ok((
        wide_div(wide_mul(bal0, lp_amount), lp_supply)?,
        wide_div(wide_mul(bal1, lp_amount), lp_supply)?,
    ))
}

/// Calculate tokens paid out for burning `lp_amount` from an N-token pool.
pub fn calc_withdraw_n(
    lp_amount: u64,
    balances: &[u64],
    lp_supply: u64,
) -> Result<Balances, MathError> {
    token_count(balances)?;
    check_burn(lp_amount, lp_supply)?;

    let mut out = Balances::new();
    for &b in balances {
        out.push(wide_div(wide_mul(b, lp_amount), lp_supply)?);
    }
    Ok(out)
}

fn check_burn(lp_amount: u64, lp_supply: u64) -> Result<(), MathError> {
    if lp_supply == 0 {
        return Err(MathError::DivisionByZero);
    }
    if lp_amount > lp_supply {
        return Err(MathError::BurnExceedsSupply);
    }
    Ok(())
}

/// Virtual price of one LP share in a 2-token pool, scaled by 1e18.
pub fn calc_virtual_price(
    bal0: u64,
    bal1: u64,
    lp_supply: u64,
    amp: u64,
) -> Result<u128, MathError> {
    if lp_supply == 0 {
        return Err(MathError::DivisionByZero);
    }
    let d = calc_d(bal0, bal1, amp)?;
    virtual_price(d, lp_supply)
}

/// Virtual price of one LP share in an N-token pool, scaled by 1e18.
pub fn calc_virtual_price_n(balances: &[u64], lp_supply: u64, amp: u64) -> Result<u128, MathError> {
    if lp_supply == 0 {
        return Err(MathError::DivisionByZero);
    }
    let d = calc_d_n(balances, amp)?;
    virtual_price(d, lp_supply)
}

fn virtual_price(d: u64, lp_supply: u64) -> Result<u128, MathError> {
    (d as u128)
        .checked_mul(VIRTUAL_PRICE_PRECISION)
        .map(|v| v / lp_supply as u128)
        .ok_or(MathError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAL: u64 = 1_000_000_000_000;

    #[test]
    fn test_initial_deposit_geometric_mean() {
        assert_eq!(calc_initial_lp(100_000_000, 400_000_000), 200_000_000);
        assert_eq!(calc_lp_tokens(100_000_000, 400_000_000, 0, 0, 0, 100), Ok(200_000_000));
        assert_eq!(calc_initial_lp(0, 400_000_000), 0);
    }

    #[test]
    fn test_initial_deposit_n_tokens() {
        assert_eq!(
            calc_initial_lp_n(&[1_000_000, 8_000_000, 27_000_000]),
            Ok(6_000_000)
        );
        assert_eq!(
            calc_initial_lp_n(&[100_000_000, 400_000_000]),
            Ok(calc_initial_lp(100_000_000, 400_000_000))
        );
        assert_eq!(calc_initial_lp_n(&[1]), Err(MathError::InvalidTokenCount));
    }

    #[test]
    fn test_proportional_deposit() {
        // 10% more of each token mints 10% more supply
        let lp = calc_lp_tokens(BAL / 10, BAL / 10, BAL, BAL, 2 * BAL, 1000).unwrap();
        assert_eq!(lp, 200_000_000_000);
    }

    #[test]
    fn test_single_sided_deposit_mints_less() {
        let lp = calc_lp_tokens(BAL / 10, 0, BAL, BAL, 2 * BAL, 1000).unwrap();
        assert_eq!(lp, 99_998_807_416);
        assert!(lp < 100_000_000_000);
    }

    #[test]
    fn test_deposit_into_empty_pool_with_supply_fails() {
        assert_eq!(
            calc_lp_tokens(1_000, 1_000, 0, 0, 1_000, 100),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_deposit_n_tokens() {
        let lp = calc_lp_tokens_n(&[10_000_000_000; 3], &[BAL; 3], 3 * BAL, 100).unwrap();
        assert_eq!(lp, 30_000_000_000);

        let two = calc_lp_tokens(BAL / 10, 0, BAL, BAL, 2 * BAL, 1000).unwrap();
        let n = calc_lp_tokens_n(&[BAL / 10, 0], &[BAL, BAL], 2 * BAL, 1000).unwrap();
        assert_eq!(two, n);

        assert_eq!(
            calc_lp_tokens_n(&[1, 2], &[BAL; 3], BAL, 100),
            Err(MathError::InvalidTokenCount)
        );
    }

    #[test]
    fn test_full_withdrawal_returns_balances() {
        let supply = 2 * BAL;
        assert_eq!(calc_withdraw(supply, BAL, BAL / 2, supply), Ok((BAL, BAL / 2)));
    }

    #[test]
    fn test_partial_withdrawal() {
        assert_eq!(
            calc_withdraw(BAL, BAL, BAL / 2, 2 * BAL),
            Ok((BAL / 2, BAL / 4))
        );
        // Rounds down
        assert_eq!(calc_withdraw(1, 10, 10, 3), Ok((3, 3)));
    }

    #[test]
    fn test_withdraw_errors() {
        assert_eq!(calc_withdraw(10, BAL, BAL, 0), Err(MathError::DivisionByZero));
        assert_eq!(calc_withdraw(11, BAL, BAL, 10), Err(MathError::BurnExceedsSupply));
    }

    #[test]
    fn test_withdraw_n_tokens() {
        let out = calc_withdraw_n(BAL, &[BAL, 2 * BAL, 3 * BAL, 4 * BAL], 4 * BAL).unwrap();
        assert_eq!(out.as_slice(), &[BAL / 4, BAL / 2, 3 * BAL / 4, BAL]);
    }

    #[test]
    fn test_virtual_price() {
        assert_eq!(calc_virtual_price(BAL, BAL, 2 * BAL, 1000), Ok(VIRTUAL_PRICE_PRECISION));
        assert_eq!(
            calc_virtual_price_n(&[BAL; 4], 2 * BAL, 100),
            Ok(2 * VIRTUAL_PRICE_PRECISION)
        );
        assert_eq!(calc_virtual_price(BAL, BAL, 0, 1000), Err(MathError::DivisionByZero));
    }
}
