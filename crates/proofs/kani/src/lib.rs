//! Kani harnesses for the StableSwap math
//!
//! Run with: cargo kani -p proofs-kani
//! Single harness: cargo kani -p proofs-kani --harness <name>
//!
//! The Newton solvers are covered by the property tests; the harnesses here
//! target the closed-form formulas layered around them.

#[cfg(kani)]
mod stableswap;
