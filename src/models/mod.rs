//! Instrument valuation.
//!
//! Kept as small, pure functions so the curve assembler and the CLI share them:
//!
//! - `coupon_bond`: fixed-coupon bonds, price ↔ yield
//! - `discount`: zero-coupon bills, yield → price

pub mod coupon_bond;
pub mod discount;

pub use coupon_bond::*;
pub use discount::*;
