//! Extensive-margin participation
//!
//! Compares the utility of working the interior hours against not working at
//! all. Non-participants work zero hours, pay neither the fixed cost nor the
//! lump-sum tax, and consume their non-labor income.

use crate::model::{Outcome, PreferenceConfig, TaxConfig};

/// Consumption under work: `c1 = w·h + μ − β0 − r`.
///
/// `wage` is the effective wage, with `rho` already applied by the caller.
#[must_use]
pub fn work_consumption(
    hours: f64,
    wage: f64,
    mu: f64,
    tax: &TaxConfig,
    preferences: &PreferenceConfig,
) -> f64 {
    wage * hours + tax.adjusted_income(mu, preferences.fixed_cost)
}

/// Choose between the interior candidate and not working
#[must_use]
pub fn resolve(
    h_interior: f64,
    wage: f64,
    mu: f64,
    tax: &TaxConfig,
    preferences: &PreferenceConfig,
    beta: f64,
) -> Outcome {
    let c1 = work_consumption(h_interior, wage, mu, tax, preferences);
    let u1 = preferences.utility(c1, h_interior, beta);
    let u0 = preferences.consumption_utility(mu);
    let p1 = u1 > u0;

    let (h, c) = if p1 { (h_interior, c1) } else { (0.0, mu) };

    Outcome {
        h_interior,
        h,
        c,
        u1,
        u0,
        p1,
    }
}

/// Outcome when the participation stage is switched off: every agent works
/// the interior hours, `u0` is still reported for reference.
#[must_use]
pub fn interior_only(
    h_interior: f64,
    wage: f64,
    mu: f64,
    tax: &TaxConfig,
    preferences: &PreferenceConfig,
    beta: f64,
) -> Outcome {
    let c1 = work_consumption(h_interior, wage, mu, tax, preferences);

    Outcome {
        h_interior,
        h: h_interior,
        c: c1,
        u1: preferences.utility(c1, h_interior, beta),
        u0: preferences.consumption_utility(mu),
        p1: true,
    }
}
