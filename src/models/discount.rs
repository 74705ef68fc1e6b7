//! Zero-coupon bill pricing (ACT/360 money-market discount, 10-unit face).

/// Face value of a bill.
pub const BILL_FACE: f64 = 10.0;

/// Implied price of a bill from its yield (percent) and days to maturity.
pub fn discount_price(yield_pct: f64, dtm: i64) -> f64 {
    BILL_FACE / (1.0 + (yield_pct * dtm as f64) / 36_000.0)
}
