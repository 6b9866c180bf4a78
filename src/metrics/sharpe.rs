// =============================================================================
// Sharpe Ratio — annualized risk-adjusted return
// =============================================================================

use tracing::debug;

/// Minimum number of daily returns required for a meaningful Sharpe ratio.
pub const SHARPE_MIN_OBSERVATIONS: usize = 20;

/// Trading days per year used for annualization.
const TRADING_DAYS: f64 = 252.0;

/// Annualized Sharpe ratio from daily returns:
/// `(mean * 252 - risk_free_rate) / (std * sqrt(252))`.
///
/// Returns 0.0 (with a logged low-data condition) when:
/// - fewer than [`SHARPE_MIN_OBSERVATIONS`] returns are supplied, or
/// - the return series has zero variance.
pub fn annualized_sharpe(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < SHARPE_MIN_OBSERVATIONS {
        debug!(
            observations = returns.len(),
            required = SHARPE_MIN_OBSERVATIONS,
            "sharpe: insufficient data, defaulting to 0.0"
        );
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let annual_return = mean * TRADING_DAYS;
    let annual_volatility = std_dev * TRADING_DAYS.sqrt();

    if annual_volatility == 0.0 {
        return 0.0;
    }

    (annual_return - risk_free_rate) / annual_volatility
}
