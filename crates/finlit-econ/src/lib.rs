#![deny(warnings)]

//! Return maths for the simulator.
//!
//! Every figure that shows "returns" or "current value" goes through
//! [`simple_interest`]:
//! - Fixed-horizon quotes (6 months for the invest screen, 1..=24 months in the simulator)
//! - Accrued value since an investment date using flat 30-day months
//! - Portfolio aggregates for dashboard, history, profile and chart views

use chrono::{DateTime, Months, Utc};
use std::ops::RangeInclusive;
use finlit_core::{Investment, InvestmentStatus, ProductType};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Length of the flat month used for accrual, in milliseconds.
const MONTH_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Horizon of the quote shown on the invest screen.
pub const QUOTE_MONTHS: u32 = 6;

/// Amounts the invest screen compares side by side.
pub const COMPARISON_AMOUNTS: [i64; 3] = [10, 50, 100];

/// Horizons the what-if simulator accepts, in months.
pub const SIMULATOR_MONTHS: RangeInclusive<u32> = 1..=24;

/// Errors produced by return helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    #[error("principal must be >= 0, got {0}")]
    NegativePrincipal(Decimal),
    #[error("rate must be >= 0, got {0}")]
    NegativeRate(Decimal),
    #[error("horizon must be >= 0 years, got {0}")]
    NegativeHorizon(Decimal),
    #[error("simulator horizon must be within {min}..={max} months, got {months}")]
    HorizonOutOfRange { months: u32, min: u32, max: u32 },
    #[error("amount too large to project")]
    Overflow,
}

/// Round to paise, half away from zero (0.325 -> 0.33).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole rupees, half away from zero.
pub fn round_rupees(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Simple interest: `principal * rate * years / 100`.
///
/// Example:
/// let i = simple_interest(Decimal::from(10), Decimal::new(65, 1), Decimal::new(5, 1)).unwrap();
/// assert_eq!(i, Decimal::new(325, 3));
pub fn simple_interest(
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: Decimal,
) -> Result<Decimal, EconError> {
    if principal < Decimal::ZERO {
        return Err(EconError::NegativePrincipal(principal));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(EconError::NegativeRate(annual_rate_pct));
    }
    if years < Decimal::ZERO {
        return Err(EconError::NegativeHorizon(years));
    }
    principal
        .checked_mul(annual_rate_pct)
        .and_then(|v| v.checked_mul(years))
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(EconError::Overflow)
}

/// Whole-month horizon expressed in years.
pub fn months_to_years(months: u32) -> Decimal {
    Decimal::from(months) / Decimal::from(12)
}

/// Flat 30-day months between `since` and `now`, never negative.
pub fn months_elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
    let ms = (now - since).num_milliseconds().max(0);
    Decimal::from(ms) / Decimal::from(MONTH_MS)
}

/// A rounded projection for a fixed horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub principal: Decimal,
    /// Interest over the horizon, rounded to paise.
    pub returns: Decimal,
    /// Principal plus unrounded interest, rounded to paise.
    pub total: Decimal,
}

/// Project `amount` at `annual_rate_pct` over `months`.
pub fn project(amount: Decimal, annual_rate_pct: Decimal, months: u32) -> Result<Projection, EconError> {
    let interest = simple_interest(amount, annual_rate_pct, months_to_years(months))?;
    let total = amount.checked_add(interest).ok_or(EconError::Overflow)?;
    Ok(Projection {
        principal: amount,
        returns: round_money(interest),
        total: round_money(total),
    })
}

/// Six-month quote shown before confirming an investment.
pub fn quote(amount: Decimal, annual_rate_pct: Decimal) -> Result<Projection, EconError> {
    project(amount, annual_rate_pct, QUOTE_MONTHS)
}

/// Six-month quotes for the fixed comparison amounts.
pub fn comparison_quotes(annual_rate_pct: Decimal) -> Result<Vec<Projection>, EconError> {
    COMPARISON_AMOUNTS
        .iter()
        .map(|&a| quote(Decimal::from(a), annual_rate_pct))
        .collect()
}

/// What-if simulator over a horizon in [`SIMULATOR_MONTHS`].
pub fn simulate(amount: Decimal, annual_rate_pct: Decimal, months: u32) -> Result<Projection, EconError> {
    if !SIMULATOR_MONTHS.contains(&months) {
        return Err(EconError::HorizonOutOfRange {
            months,
            min: *SIMULATOR_MONTHS.start(),
            max: *SIMULATOR_MONTHS.end(),
        });
    }
    project(amount, annual_rate_pct, months)
}

/// Interest accrued on an investment up to `now`, unrounded.
pub fn accrued_interest(inv: &Investment, now: DateTime<Utc>) -> Decimal {
    let years = months_elapsed(inv.date, now) / Decimal::from(12);
    // Inputs are validated on creation; a negative amount cannot be recorded.
    simple_interest(inv.amount, inv.product.annual_rate(), years).unwrap_or(Decimal::ZERO)
}

/// Principal plus accrued interest, unrounded. Saturates at `Decimal::MAX`.
pub fn current_value(inv: &Investment, now: DateTime<Utc>) -> Decimal {
    inv.amount.saturating_add(accrued_interest(inv, now))
}

/// Date the investment matures: start plus its tenure in calendar months.
pub fn maturity_date(inv: &Investment) -> DateTime<Utc> {
    inv.date
        .checked_add_months(Months::new(inv.duration_months))
        .unwrap_or(inv.date)
}

pub fn total_invested(investments: &[Investment]) -> Decimal {
    investments.iter().map(|i| i.amount).sum()
}

/// Sum of the projections stored at creation time.
pub fn total_projected_return(investments: &[Investment]) -> Decimal {
    investments.iter().map(|i| i.projected_return).sum()
}

/// Sum of interest accrued so far across the portfolio.
pub fn total_accrued_return(investments: &[Investment], now: DateTime<Utc>) -> Decimal {
    investments.iter().map(|i| accrued_interest(i, now)).sum()
}

/// Headline numbers for the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardTotals {
    pub total_invested: Decimal,
    pub total_projected_return: Decimal,
    pub total_value: Decimal,
    /// Investments made after the previous visit.
    pub new_since_last_visit: usize,
    /// Projected return of those investments.
    pub growth_since_last_visit: Decimal,
}

pub fn dashboard_totals(
    investments: &[Investment],
    last_visit: Option<DateTime<Utc>>,
) -> DashboardTotals {
    let invested = total_invested(investments);
    let projected = total_projected_return(investments);
    let (count, growth) = match last_visit {
        Some(lv) => investments
            .iter()
            .filter(|i| i.date > lv)
            .fold((0, Decimal::ZERO), |(n, g), i| (n + 1, g + i.projected_return)),
        None => (0, Decimal::ZERO),
    };
    DashboardTotals {
        total_invested: invested,
        total_projected_return: projected,
        total_value: invested + projected,
        new_since_last_visit: count,
        growth_since_last_visit: growth,
    }
}

/// Portfolio totals for the profile screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileTotals {
    pub total_invested: Decimal,
    pub total_returns: Decimal,
    pub current_value: Decimal,
}

pub fn profile_totals(investments: &[Investment], now: DateTime<Utc>) -> ProfileTotals {
    let invested = total_invested(investments);
    let returns = total_accrued_return(investments, now);
    ProfileTotals {
        total_invested: invested,
        total_returns: returns,
        current_value: invested + returns,
    }
}

/// One row of the investment history view.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub amount: Decimal,
    pub fund_name: String,
    pub product: ProductType,
    pub date: DateTime<Utc>,
    pub duration_months: u32,
    pub rate: Decimal,
    /// `Pending` is displayed as `Active`.
    pub status: InvestmentStatus,
    pub maturity_date: DateTime<Utc>,
    /// Rounded to whole rupees.
    pub current_value: Decimal,
}

pub fn history(investments: &[Investment], now: DateTime<Utc>) -> Vec<HistoryEntry> {
    investments
        .iter()
        .map(|inv| HistoryEntry {
            id: inv.id.clone(),
            amount: inv.amount,
            fund_name: inv.fund_name.clone(),
            product: inv.product,
            date: inv.date,
            duration_months: inv.duration_months,
            rate: inv.product.annual_rate(),
            status: match inv.status {
                InvestmentStatus::Pending => InvestmentStatus::Active,
                s => s,
            },
            maturity_date: maturity_date(inv),
            current_value: round_rupees(current_value(inv, now)),
        })
        .collect()
}

/// Share of the total projected return realised at each chart point.
const GROWTH_FRACTIONS: [(i64, u32); 7] = [(0, 0), (16, 2), (33, 2), (5, 1), (66, 2), (83, 2), (1, 0)];

/// Seven-point projected growth curve, "now" through month 6.
pub fn growth_curve(investments: &[Investment]) -> Vec<Decimal> {
    let invested = total_invested(investments);
    let projected = total_projected_return(investments);
    GROWTH_FRACTIONS
        .iter()
        .map(|&(m, s)| invested + projected * Decimal::new(m, s))
        .collect()
}

/// Invested principal per product, in first-seen order.
pub fn breakdown_by_type(investments: &[Investment]) -> Vec<(ProductType, Decimal)> {
    let mut out: Vec<(ProductType, Decimal)> = Vec::new();
    for inv in investments {
        match out.iter_mut().find(|(p, _)| *p == inv.product) {
            Some((_, amt)) => *amt += inv.amount,
            None => out.push((inv.product, inv.amount)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap()
    }

    fn inv(id: &str, amount: i64, product: ProductType, date: DateTime<Utc>) -> Investment {
        let projected = quote(Decimal::from(amount), product.annual_rate()).unwrap().returns;
        Investment {
            id: id.into(),
            amount: Decimal::from(amount),
            product,
            date,
            projected_return: projected,
            duration_months: 6,
            goal: None,
            fund_name: "Aurora Yield Fund".into(),
            status: InvestmentStatus::Active,
        }
    }

    #[test]
    fn half_up_rounding_at_two_places() {
        let i = simple_interest(Decimal::from(10), Decimal::new(65, 1), Decimal::new(5, 1)).unwrap();
        assert_eq!(i, Decimal::new(325, 3));
        assert_eq!(round_money(i), Decimal::new(33, 2));
        assert_eq!(round_money(Decimal::new(-325, 3)), Decimal::new(-33, 2));
    }

    #[test]
    fn quote_matches_six_month_formula() {
        let q = quote(Decimal::from(10), Decimal::new(65, 1)).unwrap();
        assert_eq!(q.returns, Decimal::new(33, 2));
        assert_eq!(q.total, Decimal::new(1033, 2));
        let cmp = comparison_quotes(Decimal::new(75, 1)).unwrap();
        assert_eq!(cmp.len(), 3);
        assert_eq!(cmp[2].principal, Decimal::from(100));
        assert_eq!(cmp[2].returns, Decimal::new(375, 2));
    }

    #[test]
    fn simulator_uses_months_over_twelve() {
        let p = simulate(Decimal::from(1000), Decimal::from(6), 24).unwrap();
        assert_eq!(p.returns, Decimal::from(120));
        assert_eq!(p.total, Decimal::from(1120));
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(simple_interest(Decimal::from(-1), Decimal::ONE, Decimal::ONE).is_err());
        assert!(simple_interest(Decimal::ONE, Decimal::from(-1), Decimal::ONE).is_err());
        assert!(simple_interest(Decimal::ONE, Decimal::ONE, Decimal::from(-1)).is_err());
    }

    #[test]
    fn simulator_rejects_horizons_outside_slider_range() {
        assert_eq!(
            simulate(Decimal::from(100), Decimal::from(6), 0),
            Err(EconError::HorizonOutOfRange { months: 0, min: 1, max: 24 })
        );
        assert!(simulate(Decimal::from(100), Decimal::from(6), 25).is_err());
        assert!(simulate(Decimal::from(100), Decimal::from(6), 1).is_ok());
    }

    #[test]
    fn huge_principal_is_an_error_not_a_panic() {
        assert_eq!(
            simple_interest(Decimal::MAX / Decimal::TWO, Decimal::new(75, 1), Decimal::new(5, 1)),
            Err(EconError::Overflow)
        );
        let flat = quote(Decimal::MAX, Decimal::ZERO).unwrap();
        assert_eq!(flat.returns, Decimal::ZERO);
        assert_eq!(flat.total, Decimal::MAX);
    }

    #[test]
    fn elapsed_months_are_flat_thirty_days_and_clamped() {
        assert_eq!(months_elapsed(t0(), t0() + Duration::days(30)), Decimal::ONE);
        assert_eq!(months_elapsed(t0(), t0() + Duration::days(45)), Decimal::new(15, 1));
        assert_eq!(months_elapsed(t0(), t0() - Duration::days(3)), Decimal::ZERO);
    }

    #[test]
    fn accrued_value_after_one_year_of_flat_months() {
        let i = inv("1", 1000, ProductType::Govt, t0());
        let now = t0() + Duration::days(360);
        assert_eq!(accrued_interest(&i, now), Decimal::from(65));
        assert_eq!(current_value(&i, now), Decimal::from(1065));
        let totals = profile_totals(&[i], now);
        assert_eq!(totals.current_value, Decimal::from(1065));
    }

    #[test]
    fn maturity_uses_calendar_months() {
        let i = inv("1", 10, ProductType::Fd, t0());
        assert_eq!(
            maturity_date(&i),
            Utc.with_ymd_and_hms(2024, 7, 31, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn history_shows_pending_as_active_and_rounds_value() {
        let mut i = inv("1", 1000, ProductType::Fd, t0());
        i.status = InvestmentStatus::Pending;
        let rows = history(&[i], t0() + Duration::days(30));
        assert_eq!(rows[0].status, InvestmentStatus::Active);
        // 1000 * 7.5 * (1/12) / 100 = 6.25
        assert_eq!(rows[0].current_value, Decimal::from(1006));
        assert_eq!(rows[0].rate, Decimal::new(75, 1));
    }

    #[test]
    fn dashboard_counts_only_investments_after_last_visit() {
        let a = inv("a", 100, ProductType::Govt, t0());
        let b = inv("b", 100, ProductType::Govt, t0() + Duration::days(2));
        let d = dashboard_totals(&[a.clone(), b.clone()], Some(t0() + Duration::days(1)));
        assert_eq!(d.total_invested, Decimal::from(200));
        assert_eq!(d.new_since_last_visit, 1);
        assert_eq!(d.growth_since_last_visit, b.projected_return);
        assert_eq!(d.total_value, Decimal::from(200) + a.projected_return + b.projected_return);
        assert_eq!(dashboard_totals(&[a], None).new_since_last_visit, 0);
    }

    #[test]
    fn growth_curve_and_breakdown() {
        let list = vec![
            inv("a", 100, ProductType::Liquid, t0()),
            inv("b", 50, ProductType::Fd, t0()),
            inv("c", 25, ProductType::Liquid, t0()),
        ];
        let curve = growth_curve(&list);
        assert_eq!(curve.len(), 7);
        assert_eq!(curve[0], Decimal::from(175));
        assert_eq!(curve[6], Decimal::from(175) + total_projected_return(&list));
        let b = breakdown_by_type(&list);
        assert_eq!(
            b,
            vec![
                (ProductType::Liquid, Decimal::from(125)),
                (ProductType::Fd, Decimal::from(50))
            ]
        );
    }

    proptest! {
        #[test]
        fn interest_is_linear_in_principal(p in 0i64..1_000_000, rate_tenths in 0i64..200, half_years in 0i64..=4) {
            let rate = Decimal::new(rate_tenths, 1);
            let years = Decimal::new(5 * half_years, 1);
            let one = simple_interest(Decimal::from(p), rate, years).unwrap();
            let two = simple_interest(Decimal::from(2 * p), rate, years).unwrap();
            prop_assert_eq!(one * Decimal::TWO, two);
        }

        #[test]
        fn accrual_never_decreases_over_time(days in 0i64..3650, extra in 0i64..365) {
            let i = inv("p", 500, ProductType::Fd, t0());
            let a = current_value(&i, t0() + Duration::days(days));
            let b = current_value(&i, t0() + Duration::days(days + extra));
            prop_assert!(b >= a);
            prop_assert!(a >= i.amount);
        }
    }
}
