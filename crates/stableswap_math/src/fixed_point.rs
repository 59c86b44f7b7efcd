//! Fixed-point arithmetic helpers
//!
//! Wide multiply/divide and integer roots shared by every solver.

use primitive_types::U512;

use crate::MathError;

/// Multiply two u64 values and return the exact u128 product
#[inline]
pub fn wide_mul(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// Divide u128 by u64, rounding down
///
/// Fails with `DivisionByZero` when `d == 0` and with `Overflow` when the
/// quotient does not fit in 64 bits.
#[inline]
pub fn wide_div(n: u128, d: u64) -> Result<u64, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    crate::to_u64(n / d as u128)
}

/// Integer square root (floor) using Newton's method.
///
/// `isqrt(0) == 0`, and `1..=3` map to 1.
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    if n <= 3 {
        return 1;
    }

    let mut x = n;
    // (x + 1) / 2 without overflowing at u64::MAX
    let mut y = x / 2 + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Integer square root (floor) of a 128-bit value.
///
/// The root of any u128 fits in 64 bits.
pub fn isqrt_wide(n: u128) -> u64 {
    if n == 0 {
        return 0;
    }
    if n <= 3 {
        return 1;
    }

    let mut x = n;
    let mut y = x / 2 + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as u64
}

/// Integer N-th root (floor) of the product of `values`, N = `values.len()`.
///
/// The product of up to 8 u64 values is held exactly in 512 bits. The root
/// lies between the smallest and the largest value, so it is found by
/// bisection over that range. Returns 0 when any value is 0 or the slice is
/// empty.
pub fn nth_root_of_product(values: &[u64]) -> u64 {
    let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) else {
        return 0;
    };
    if lo == 0 {
        return 0;
    }
    if lo == hi {
        return lo;
    }
    let n = values.len();

    let mut product = U512::one();
    for &v in values {
        product = match product.checked_mul(U512::from(v)) {
            Some(p) => p,
            None => return 0,
        };
    }

    // lo^n <= product <= hi^n
    let (mut lo, mut hi) = (lo as u128, hi as u128);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        match checked_pow(mid as u64, n) {
            Some(p) if p <= product => lo = mid,
            _ => hi = mid - 1,
        }
    }
    lo as u64
}

fn checked_pow(base: u64, exp: usize) -> Option<U512> {
    let base = U512::from(base);
    let mut acc = U512::one();
    for _ in 0..exp {
        acc = acc.checked_mul(base)?;
    }
    Some(acc)
}
