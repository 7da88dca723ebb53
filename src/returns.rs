//! Return Series Builder: price series -> daily fractional returns.

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::quotes::PricePoint;

/// Build the daily fractional return series for a chronological price
/// series: `r[0] = 0` (no prior day), `r[t] = close[t]/close[t-1] - 1`.
///
/// A missing close on either side of a transition, or a zero previous
/// close, is treated as a flat day (return 0). This is a deliberate
/// simplification, not a statistical treatment of missing data.
pub fn daily_returns(prices: &[PricePoint]) -> Result<Array1<f64>> {
    if prices.len() < 2 {
        return Err(Error::InvalidConfig(format!(
            "need at least 2 trading days, got {}",
            prices.len()
        )));
    }

    let mut returns = Array1::zeros(prices.len());
    for t in 1..prices.len() {
        if let (Some(prev), Some(curr)) = (prices[t - 1].close, prices[t].close) {
            if prev != 0.0 {
                returns[t] = curr / prev - 1.0;
            }
        }
    }

    Ok(returns)
}
