//! Fixed-coupon bond valuation (semi-annual coupons, 182-day periods, 360-day year).
//!
//! Notation:
//!
//! - `P`  dirty price per 100 nominal
//! - `r`  annualized yield in percent
//! - `TC` annual coupon rate in percent
//! - `K`  coupons left to maturity
//! - `d`  days accrued in the current coupon period
//!
//! with `R = 0.01·r·DPP/YB` (periodic rate) and `C = VN·DPP·0.01·TC/YB`
//! (coupon cash flow):
//!
//! ```text
//! P = [C + C·(1/R − 1/(R·(1+R)^(K−1))) + VN/(1+R)^(K−1)] / (1+R)^(1 − d/DPP) − C·d/DPP
//! ```
//!
//! Price → yield has no closed form; it goes through a [`YieldSolver`].

use std::ops::RangeInclusive;

use crate::error::CurveError;
use crate::io::ingest::round_to;
use crate::math::{SafeguardedNewton, SolverConfig};

/// Par value.
pub const VN: f64 = 100.0;
/// Days per coupon period.
pub const DPP: i64 = 182;
/// Money-market year base in days.
pub const YB: f64 = 360.0;

/// Repricing mismatch above which a solved yield is rejected.
const REPRICE_TOLERANCE: f64 = 2e-6;

/// Yield search interval in percent. The lower end keeps `1 + R` well above 0.
const YIELD_FLOOR: f64 = -99.0;
const YIELD_CEILING: f64 = 10_000.0;

/// Coupons left until maturity. Decreases on payment dates.
pub fn coupon_periods(dtm: i64) -> i64 {
    (dtm - 1) / DPP + 1
}

/// Days accrued in the current coupon period; resets to 0 on payment dates.
pub fn accrued_days(dtm: i64) -> i64 {
    let remainder = DPP - dtm.rem_euclid(DPP);
    if remainder == DPP { 0 } else { remainder }
}

fn periodic_rate(r: f64) -> f64 {
    0.01 * r * DPP as f64 / YB
}

fn coupon_cash_flow(coupon: f64) -> f64 {
    VN * DPP as f64 * 0.01 * coupon / YB
}

/// Below this periodic rate the annuity is summed term by term instead of using
/// `1/R`, which cancels catastrophically near zero.
const SMALL_RATE: f64 = 1e-6;

/// Exponents `j` and sign of the annuity `±Σ (1+R)^−j` equal to the closed form
/// `1/R − 1/(R·(1+R)^(K−1))`.
///
/// For `K ≥ 1` this is `+Σ_{j=1}^{K−1}`; for `K < 1` (bonds past maturity) the
/// closed form extends to `−Σ_{j=K}^{0}`.
fn annuity_terms(k: i64) -> (f64, RangeInclusive<i64>) {
    if k >= 1 { (1.0, 1..=k - 1) } else { (-1.0, k..=0) }
}

/// Dirty price for yield `r` (percent), `k` coupons left and `d` accrued days.
pub fn price_from_periods(r: f64, coupon: f64, k: i64, d: i64) -> f64 {
    let rate = periodic_rate(r);
    let c = coupon_cash_flow(coupon);
    let growth = 1.0 + rate;
    let remaining = (k - 1) as f64;

    let annuity = if rate.abs() < SMALL_RATE {
        let (sign, terms) = annuity_terms(k);
        c * sign * terms.map(|j| growth.powf(-(j as f64))).sum::<f64>()
    } else {
        c * (1.0 / rate - 1.0 / (rate * growth.powf(remaining)))
    };
    let accrual = d as f64 / DPP as f64;

    (c + annuity + VN / growth.powf(remaining)) / growth.powf(1.0 - accrual) - c * accrual
}

/// `∂P/∂r` of [`price_from_periods`].
///
/// Written with `g = 1+R` and `a = d/DPP` as
/// `P = C·g^(a−1) ± C·Σ_j g^(a−1−j) + VN·g^(a−K) − C·a` (terms from [`annuity_terms`]).
fn price_derivative(r: f64, coupon: f64, k: i64, d: i64) -> f64 {
    let rate = periodic_rate(r);
    let c = coupon_cash_flow(coupon);
    let accrual = d as f64 / DPP as f64;
    let growth = 1.0 + rate;
    let kf = k as f64;

    let lead = c * (accrual - 1.0) * growth.powf(accrual - 2.0);
    let (sign, terms) = annuity_terms(k);
    let annuity = c * sign
        * terms
            .map(|j| {
                let p = accrual - 1.0 - j as f64;
                p * growth.powf(p - 1.0)
            })
            .sum::<f64>();
    let principal = VN * (accrual - kf) * growth.powf(accrual - kf - 1.0);

    0.01 * DPP as f64 / YB * (lead + annuity + principal)
}

/// Dirty price of a coupon bond at yield `r` (percent).
pub fn coupon_bond_price(r: f64, dtm: i64, coupon: f64) -> f64 {
    price_from_periods(r, coupon, coupon_periods(dtm), accrued_days(dtm))
}

/// Price → yield for coupon-bearing bonds.
///
/// Implementations must return a yield that reprices to `price` within 1e-6, or
/// fail with [`CurveError::YieldSolverDidNotConverge`].
pub trait YieldSolver {
    fn solve_yield(&self, price: f64, dtm: i64, coupon: f64) -> Result<f64, CurveError>;
}

/// Default solver: safeguarded Newton–Raphson on the closed-form price.
#[derive(Debug, Clone)]
pub struct NewtonBisection {
    root: SafeguardedNewton,
}

impl NewtonBisection {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            root: SafeguardedNewton::new(config),
        }
    }
}

impl Default for NewtonBisection {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl YieldSolver for NewtonBisection {
    fn solve_yield(&self, price: f64, dtm: i64, coupon: f64) -> Result<f64, CurveError> {
        let fail = |reason: String| CurveError::YieldSolverDidNotConverge {
            price,
            dtm,
            coupon,
            reason,
        };

        if !(price.is_finite() && coupon.is_finite()) || price <= 0.0 {
            return Err(fail("price and coupon must be finite and price positive".to_string()));
        }

        let p = round_to(price, 6);
        let tc = round_to(coupon, 2);
        let k = coupon_periods(dtm);
        let d = accrued_days(dtm);

        // Current yield as the first guess.
        let guess = tc * 100.0 / p;

        let yld = self
            .root
            .find_root(
                |r| price_from_periods(r, tc, k, d) - p,
                |r| price_derivative(r, tc, k, d),
                guess,
                YIELD_FLOOR,
                YIELD_CEILING,
            )
            .map_err(|e| fail(e.to_string()))?;

        let check = round_to(price_from_periods(yld, tc, k, d), 6);
        if !yld.is_finite() || (check - p).abs() >= REPRICE_TOLERANCE {
            return Err(fail(format!("repriced to {check}, expected {p}")));
        }

        Ok(yld)
    }
}
