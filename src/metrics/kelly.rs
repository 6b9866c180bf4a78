// =============================================================================
// Kelly Criterion — optimal position fraction
// =============================================================================
//
// f* = (p*b - q) / b  where p = win rate, q = 1-p, b = avg_win / |avg_loss|.
// The engine recommends half-Kelly capped at 25 % of the portfolio; a
// negative Kelly fraction means the edge is negative and the recommended
// size is zero.

use serde::{Deserialize, Serialize};

/// Hard cap on the recommended position fraction.
pub const MAX_POSITION_FRACTION: f64 = 0.25;

/// Kelly sizing result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KellySizing {
    /// Raw Kelly fraction (can be negative).
    pub kelly_fraction: f64,
    /// Half-Kelly, clamped to [0, 0.25].
    pub half_kelly: f64,
    /// Final recommended fraction of portfolio.
    pub recommended_fraction: f64,
}

/// Compute the half-Kelly position size.
///
/// Degenerate inputs (win rate outside (0, 1), zero average loss) yield an
/// all-zero sizing rather than an error.
pub fn kelly_position(win_rate: f64, avg_win: f64, avg_loss: f64) -> KellySizing {
    if !(0.0..=1.0).contains(&win_rate) || win_rate == 0.0 || win_rate == 1.0 || avg_loss == 0.0 {
        return KellySizing {
            kelly_fraction: 0.0,
            half_kelly: 0.0,
            recommended_fraction: 0.0,
        };
    }

    let p = win_rate;
    let q = 1.0 - win_rate;
    let b = avg_win / avg_loss.abs();

    if b == 0.0 || !b.is_finite() {
        return KellySizing {
            kelly_fraction: 0.0,
            half_kelly: 0.0,
            recommended_fraction: 0.0,
        };
    }

    let kelly_fraction = (p * b - q) / b;
    let half_kelly = (kelly_fraction * 0.5).clamp(0.0, MAX_POSITION_FRACTION);

    let recommended_fraction = if kelly_fraction < 0.0 { 0.0 } else { half_kelly };

    KellySizing {
        kelly_fraction,
        half_kelly,
        recommended_fraction,
    }
}
