//! Kani proofs for StableSwap accounting and fee formulas
//!
//! Properties:
//! - **S1: Square Root Floor** - isqrt(n)² <= n < (isqrt(n) + 1)²
//! - **S2: Ramp Bounded** - effective amp stays between amp and target_amp
//! - **S3: Reward Clamp** - pending reward never underflows or exceeds earned
//! - **S4: Withdraw Bounded** - redemption never pays more than the reserve
//! - **S5: Fee Conservation** - admin and LP fee shares sum to the fee
//! - **S6: Slippage Floor** - minimum output never exceeds the expectation
//! - **S7: Emission Window** - farm emission only accrues inside the window

use arrayvec::ArrayVec;
use stableswap_math::*;

/// S1: isqrt returns the floor root
#[kani::proof]
#[kani::unwind(24)]
fn s1_isqrt_floor() {
    let n: u64 = kani::any();
    kani::assume(n < 1 << 16);

    let r = isqrt(n) as u128;
    let n = n as u128;
    assert!(r * r <= n, "S1: root squared must not exceed input");
    assert!((r + 1) * (r + 1) > n, "S1: root must be the floor");
}

/// S2: Effective amp is bounded by the ramp endpoints
#[kani::proof]
fn s2_ramp_bounded() {
    let amp: u64 = kani::any();
    let target: u64 = kani::any();
    let start: i64 = kani::any();
    let end: i64 = kani::any();
    let now: i64 = kani::any();

    kani::assume(check_amp(amp) && check_amp(target));

    let current = get_current_amp(amp, target, start, end, now);
    assert!(current >= amp.min(target), "S2: amp below ramp range");
    assert!(current <= amp.max(target), "S2: amp above ramp range");
}

/// S2: Ramp endpoints are exact
#[kani::proof]
fn s2_ramp_endpoints() {
    let amp: u64 = kani::any();
    let target: u64 = kani::any();
    let start: i64 = kani::any();
    let end: i64 = kani::any();

    kani::assume(start < end);

    assert_eq!(get_current_amp(amp, target, start, end, start), amp);
    assert_eq!(get_current_amp(amp, target, start, end, end), target);
}

/// S3: Pending reward is clamped at zero and bounded by the earned amount
#[kani::proof]
fn s3_reward_clamp() {
    let staked: u64 = kani::any();
    let acc: u64 = kani::any();
    let debt: u64 = kani::any();

    // Earned amount representable without saturation
    kani::assume(wide_mul(staked, acc) / (REWARD_PRECISION as u128) < u64::MAX as u128);

    let earned = calc_reward_debt(staked, acc);
    let pending = calc_pending_reward(staked, acc, debt);

    assert!(pending <= earned, "S3: pending exceeds earned");
    if debt >= earned {
        assert_eq!(pending, 0, "S3: debt above earned must clamp to zero");
    } else {
        assert_eq!(pending, earned - debt);
    }
}

/// S3: Accumulator never decreases
#[kani::proof]
fn s3_accumulator_monotonic() {
    let acc: u64 = kani::any();
    let reward: u64 = kani::any();
    let total: u64 = kani::any();

    assert!(calc_new_acc_reward(acc, reward, total) >= acc);
}

/// S4: Withdrawal pays at most the reserve and exactly the reserve on full burn
#[kani::proof]
fn s4_withdraw_bounded() {
    let lp: u64 = kani::any();
    let bal0: u64 = kani::any();
    let bal1: u64 = kani::any();
    let supply: u64 = kani::any();

    match calc_withdraw(lp, bal0, bal1, supply) {
        Ok((a0, a1)) => {
            assert!(a0 <= bal0 && a1 <= bal1, "S4: payout exceeds reserve");
            if lp == supply {
                assert!(a0 == bal0 && a1 == bal1, "S4: full burn must drain reserves");
            }
        }
        Err(e) => {
            assert!(supply == 0 || lp > supply);
            assert!(e == MathError::DivisionByZero || e == MathError::BurnExceedsSupply);
        }
    }
}

/// S4: N-token withdrawal matches the 2-token formula
#[kani::proof]
#[kani::unwind(4)]
fn s4_withdraw_n_matches_two_token() {
    let lp: u64 = kani::any();
    let bal0: u64 = kani::any();
    let bal1: u64 = kani::any();
    let supply: u64 = kani::any();

    let mut balances: ArrayVec<u64, 2> = ArrayVec::new();
    balances.push(bal0);
    balances.push(bal1);

    let two = calc_withdraw(lp, bal0, bal1, supply);
    let n = calc_withdraw_n(lp, &balances, supply);
    match (two, n) {
        (Ok((a0, a1)), Ok(out)) => assert!(out[0] == a0 && out[1] == a1),
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("S4: 2-token and N-token withdraw disagree"),
    }
}

/// S5: Fee split conserves the fee
#[kani::proof]
fn s5_fee_split_conserves() {
    let fee: u64 = kani::any();
    let pct: u64 = kani::any();

    let (admin, lp) = split_admin_fee(fee, pct);
    assert_eq!(admin as u128 + lp as u128, fee as u128, "S5: fee split lost value");
    if pct >= 100 {
        assert_eq!(lp, 0);
    }
}

/// S6: Slippage floor never exceeds the expectation
#[kani::proof]
fn s6_min_output_bounded() {
    let expected: u64 = kani::any();
    let slippage: u64 = kani::any();

    let min = calc_min_output(expected, slippage);
    assert!(min <= expected, "S6: min output above expected");
    if slippage == 0 {
        assert_eq!(min, expected);
    }
}

/// S7: Farm emission never covers time outside the window
#[kani::proof]
fn s7_emission_within_window() {
    let rate: u64 = kani::any();
    let start: i64 = kani::any();
    let end: i64 = kani::any();
    let last: i64 = kani::any();
    let now: i64 = kani::any();

    kani::assume(rate <= 1_000_000);
    kani::assume(start <= end && (end as i128 - start as i128) <= 1_000_000);

    let emitted = calc_farm_emission(rate, start, end, last, now);
    assert!(emitted as u128 <= rate as u128 * (end - start) as u128);
    if now <= start || last >= end {
        assert_eq!(emitted, 0);
    }
}
