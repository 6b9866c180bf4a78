// =============================================================================
// Historical VaR / CVaR
// =============================================================================
//
// VaR at confidence c is the (1-c) percentile of the historical return
// sample (linear interpolation between order statistics). CVaR (expected
// shortfall) is the mean of the returns at or below that percentile. The
// 10-day figure scales the 1-day figure by sqrt(10) per the
// square-root-of-time rule.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum number of daily returns required for a VaR estimate.
pub const VAR_MIN_OBSERVATIONS: usize = 30;

/// Historical VaR/CVaR estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VarEstimate {
    /// 1-day VaR as a return (negative for a loss).
    pub var_1day: f64,
    /// 10-day VaR via sqrt-of-time scaling.
    pub var_10day: f64,
    /// Expected shortfall: mean return at or below the 1-day VaR.
    pub cvar: f64,
    pub confidence_level: f64,
    /// False when fewer than [`VAR_MIN_OBSERVATIONS`] returns were supplied;
    /// all figures are 0.0 in that case.
    pub sufficient_data: bool,
}

/// Compute historical VaR and CVaR from daily returns at `confidence_level`
/// (e.g. 0.95).
pub fn historical_var(returns: &[f64], confidence_level: f64) -> VarEstimate {
    if returns.len() < VAR_MIN_OBSERVATIONS {
        debug!(
            observations = returns.len(),
            required = VAR_MIN_OBSERVATIONS,
            "var: insufficient data, returning zeroed estimate"
        );
        return VarEstimate {
            var_1day: 0.0,
            var_10day: 0.0,
            cvar: 0.0,
            confidence_level,
            sufficient_data: false,
        };
    }

    let var_1day = percentile(returns, (1.0 - confidence_level) * 100.0);
    let var_10day = var_1day * 10.0_f64.sqrt();

    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var_1day).collect();
    let cvar = if tail.is_empty() {
        var_1day
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    VarEstimate {
        var_1day,
        var_10day,
        cvar,
        confidence_level,
        sufficient_data: true,
    }
}

/// Percentile with linear interpolation between order statistics.
///
/// `p` is in [0, 100]. For a sorted sample of n values the p-th percentile
/// sits at rank `(n - 1) * p / 100`, interpolated between neighbours.
fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (n as f64 - 1.0) * p.clamp(0.0, 100.0) / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_is_zeroed() {
        let returns = vec![0.01; 29];
        let var = historical_var(&returns, 0.95);
        assert!(!var.sufficient_data);
        assert!((var.var_1day - 0.0).abs() < f64::EPSILON);
        assert!((var.cvar - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_flat_distribution() {
        // 30 identical returns: VaR and CVaR both equal the constant.
        let returns = vec![0.01; 30];
        let var = historical_var(&returns, 0.95);
        assert!(var.sufficient_data);
        assert!((var.var_1day - 0.01).abs() < 1e-12);
        assert!((var.cvar - 0.01).abs() < 1e-12);
    }

    #[test]
    fn ten_day_scaling() {
        let returns = vec![-0.02; 30];
        let var = historical_var(&returns, 0.95);
        assert!((var.var_10day - -0.02 * 10.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn var_sits_in_the_left_tail() {
        // Sorted tail: -0.20, -0.10, -0.05, then 27 positives. With n=30 the
        // 5 % percentile interpolates at rank 1.45, between -0.10 and -0.05.
        let mut returns = vec![0.001; 27];
        returns.extend([-0.20, -0.10, -0.05]);
        let var = historical_var(&returns, 0.95);
        let expected = -0.10 + 0.45 * (-0.05 - -0.10);
        assert!((var.var_1day - expected).abs() < 1e-12);
        // Tail at or below -0.0775 holds the two worst losses.
        assert!((var.cvar - -0.15).abs() < 1e-12);
    }

    #[test]
    fn percentile_interpolates() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&values, 50.0) - 3.0).abs() < 1e-12);
        assert!((percentile(&values, 25.0) - 2.0).abs() < 1e-12);
        assert!((percentile(&values, 10.0) - 1.4).abs() < 1e-12);
        assert!((percentile(&values, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&values, 100.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn cvar_averages_the_tail() {
        // Sorted: -0.10, -0.05, then 28 positives. Rank 1.45 interpolates
        // between -0.05 and 0.01; the tail mean still averages both losses.
        let mut returns = vec![0.01; 28];
        returns.push(-0.10);
        returns.push(-0.05);
        let var = historical_var(&returns, 0.95);
        let expected = -0.05 + 0.45 * (0.01 - -0.05);
        assert!((var.var_1day - expected).abs() < 1e-12);
        assert!((var.cvar - -0.075).abs() < 1e-12);
        assert!(var.cvar <= var.var_1day);
    }
}
