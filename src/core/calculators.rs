use serde::Serialize;

use super::engine::{annuity_due_future_value, growth_factor, monthly_rate};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiSummary {
    pub emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// SIP deposited at the start of each month plus a lump sum invested on day
/// one, both compounding monthly at `annual_return_pct`.
pub fn sip_future_value(monthly: f64, lump_sum: f64, annual_return_pct: f64, months: u64) -> f64 {
    let rate = monthly_rate(annual_return_pct);
    let n = months as f64;
    annuity_due_future_value(monthly, rate, n) + lump_sum * growth_factor(rate, n)
}

/// Compound annual growth rate in percent. Undefined for a non-positive start
/// value or duration, or a negative end value.
pub fn cagr_pct(initial: f64, final_value: f64, years: f64) -> Option<f64> {
    if !(initial > 0.0 && years > 0.0 && final_value >= 0.0) {
        return None;
    }
    let cagr = ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0;
    cagr.is_finite().then_some(cagr)
}

/// Reducing-balance loan instalment.
pub fn emi(principal: f64, annual_rate_pct: f64, months: u32) -> Option<EmiSummary> {
    if months == 0 {
        return None;
    }
    let n = f64::from(months);
    let rate = monthly_rate(annual_rate_pct);
    let emi = if rate == 0.0 {
        principal / n
    } else {
        let growth = growth_factor(rate, n);
        principal * rate * growth / (growth - 1.0)
    };
    let total_payment = emi * n;
    Some(EmiSummary {
        emi,
        total_payment,
        total_interest: total_payment - principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sip_without_growth_is_sum_of_deposits() {
        assert_approx(sip_future_value(2_500.0, 10_000.0, 0.0, 36), 100_000.0);
    }

    #[test]
    fn sip_one_year_at_twelve_percent() {
        assert_approx(sip_future_value(5_000.0, 0.0, 12.0, 12), 64_046.640_216_644_73);
    }

    #[test]
    fn sip_zero_months_returns_lump_sum() {
        assert_approx(sip_future_value(5_000.0, 42_000.0, 12.0, 0), 42_000.0);
    }

    #[test]
    fn cagr_doubling_over_five_years() {
        let cagr = cagr_pct(100_000.0, 200_000.0, 5.0).expect("defined");
        assert_approx(cagr, 14.869_835_499_703_509);
    }

    #[test]
    fn cagr_flat_and_total_loss() {
        assert_approx(cagr_pct(5_000.0, 5_000.0, 3.0).expect("defined"), 0.0);
        assert_approx(cagr_pct(5_000.0, 0.0, 3.0).expect("defined"), -100.0);
    }

    #[test]
    fn cagr_rejects_degenerate_inputs() {
        assert_eq!(cagr_pct(0.0, 100.0, 3.0), None);
        assert_eq!(cagr_pct(100.0, 200.0, 0.0), None);
        assert_eq!(cagr_pct(100.0, -1.0, 3.0), None);
        assert_eq!(cagr_pct(f64::NAN, 100.0, 3.0), None);
    }

    #[test]
    fn emi_home_loan_matches_hand_calculation() {
        let summary = emi(1_000_000.0, 9.0, 240).expect("defined");
        assert_approx(summary.emi, 8_997.259_558_501_704);
        assert_approx(summary.total_interest, 1_159_342.294_040_409);
        assert_approx(summary.total_payment, summary.emi * 240.0);
    }

    #[test]
    fn emi_zero_rate_splits_principal_evenly() {
        let summary = emi(120_000.0, 0.0, 12).expect("defined");
        assert_approx(summary.emi, 10_000.0);
        assert_approx(summary.total_interest, 0.0);
    }

    #[test]
    fn emi_requires_at_least_one_month() {
        assert_eq!(emi(120_000.0, 9.0, 0), None);
    }
}
