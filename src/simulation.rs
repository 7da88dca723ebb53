//! Vectorized Monte Carlo engine: T×N random in/out decisions applied
//! against the realized daily return series.
//!
//! All T×N work is expressed as bulk ndarray operations (broadcast
//! multiply, axis-wise cumulative product); nothing iterates path by
//! path, since N is expected to be in the thousands.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{Error, Result};

/// Number of independent random strategies to simulate, plus an optional
/// seed for reproducible runs. Production runs normally leave the seed
/// unset; the in-market probability is fixed at 0.5 by design.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub num_simulations: usize,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { num_simulations: 10_000, seed: None }
    }
}

/// Everything a run produces: the decision grid, one equity curve per
/// strategy, the buy & hold benchmark, and each strategy's terminal
/// wealth multiplier (the last equity row).
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// T×N grid of in/out decisions, entries in {0, 1}.
    pub decisions: Array2<u8>,
    /// T×N compounded equity trajectories, normalized to start at 1.0.
    pub equity_curves: Array2<f64>,
    /// Length-T always-invested trajectory.
    pub benchmark_curve: Array1<f64>,
    /// Length-N terminal multipliers, `equity_curves` row T-1.
    pub final_values: Array1<f64>,
}

impl SimulationOutput {
    pub fn benchmark_final(&self) -> f64 {
        self.benchmark_curve[self.benchmark_curve.len() - 1]
    }
}

/// Run the full simulation: draw the decision matrix and compound every
/// path plus the benchmark.
///
/// Fails on a non-positive simulation count, an empty return series, or
/// non-finite returns. A path compounding to exactly zero (a -100% day)
/// is a valid degenerate outcome, not an error.
pub fn simulate(returns: &Array1<f64>, config: &SimulationConfig) -> Result<SimulationOutput> {
    if config.num_simulations == 0 {
        return Err(Error::InvalidConfig(
            "simulation count must be positive".to_string(),
        ));
    }
    if returns.is_empty() {
        return Err(Error::InvalidConfig("return series is empty".to_string()));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(Error::InvalidConfig(
            "return series contains non-finite values".to_string(),
        ));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "Simulating {} random strategies over {} trading days",
        config.num_simulations,
        returns.len()
    );

    let decisions = random_decisions(returns.len(), config.num_simulations, &mut rng);
    simulate_with_decisions(returns, decisions)
}

/// T×N independent Bernoulli(0.5) draws: 0 = cash, 1 = invested.
pub fn random_decisions(days: usize, num_simulations: usize, rng: &mut impl Rng) -> Array2<u8> {
    Array2::from_shape_simple_fn((days, num_simulations), || rng.gen_bool(0.5) as u8)
}

/// Compound a fixed decision grid against the return series. Split out
/// of [`simulate`] so a caller can inject a known matrix.
///
/// The grid must have one row per trading day.
pub fn simulate_with_decisions(
    returns: &Array1<f64>,
    decisions: Array2<u8>,
) -> Result<SimulationOutput> {
    if returns.is_empty() {
        return Err(Error::InvalidConfig("return series is empty".to_string()));
    }
    if decisions.nrows() != returns.len() {
        return Err(Error::InvalidConfig(format!(
            "decision matrix has {} rows for {} trading days",
            decisions.nrows(),
            returns.len()
        )));
    }

    let days = returns.len();

    // Broadcast the length-T return vector across all N columns:
    // a cell is the market return where invested, 0 where in cash.
    let simulated = simulated_returns(returns, &decisions);

    // Column-wise cumulative product of (1 + r), all columns at once.
    let mut equity_curves = simulated;
    equity_curves.mapv_inplace(|r| 1.0 + r);
    equity_curves.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr *= prev);

    let benchmark_curve = cumulative_growth(returns);
    let final_values = equity_curves.row(days - 1).to_owned();

    Ok(SimulationOutput { decisions, equity_curves, benchmark_curve, final_values })
}

/// Elementwise product of the return vector (broadcast column-wise)
/// with the decision grid.
pub fn simulated_returns(returns: &Array1<f64>, decisions: &Array2<u8>) -> Array2<f64> {
    decisions.mapv(f64::from) * &returns.view().insert_axis(Axis(1))
}

/// Cumulative product of (1 + r): the buy & hold trajectory.
pub fn cumulative_growth(returns: &Array1<f64>) -> Array1<f64> {
    let mut curve = returns.mapv(|r| 1.0 + r);
    curve.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr *= prev);
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn test_decision_matrix_shape_and_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        let decisions = random_decisions(50, 20, &mut rng);

        assert_eq!(decisions.dim(), (50, 20));
        assert!(decisions.iter().all(|&d| d == 0 || d == 1));
        // 1000 fair coin flips should land on both sides
        assert!(decisions.iter().any(|&d| d == 0));
        assert!(decisions.iter().any(|&d| d == 1));
    }

    #[test]
    fn test_simulated_returns_identity() {
        let returns = array![0.0, 0.10, -0.10, 0.05];
        let decisions = array![[1u8, 0], [1, 1], [0, 1], [1, 0]];

        let sim = simulated_returns(&returns, &decisions);

        for t in 0..4 {
            for n in 0..2 {
                let expected = if decisions[[t, n]] == 1 { returns[t] } else { 0.0 };
                assert_eq!(sim[[t, n]], expected);
            }
        }
    }

    #[test]
    fn test_equity_base_row() {
        // First equity row is exactly 1 + simulated return on day 0
        let returns = array![0.5, 0.1];
        let decisions = array![[1u8, 0], [1, 1]];

        let out = simulate_with_decisions(&returns, decisions).unwrap();
        assert_eq!(out.equity_curves[[0, 0]], 1.5);
        assert_eq!(out.equity_curves[[0, 1]], 1.0);
    }

    #[test]
    fn test_all_ones_column_matches_benchmark() {
        let returns = array![0.0, 0.02, -0.01, 0.03, 0.005];
        let decisions = Array2::ones((5, 3));

        let out = simulate_with_decisions(&returns, decisions).unwrap();
        for t in 0..5 {
            for n in 0..3 {
                assert_close(out.equity_curves[[t, n]], out.benchmark_curve[t]);
            }
        }
    }

    #[test]
    fn test_zero_returns_break_even() {
        let returns = Array1::zeros(10);
        let out = simulate(&returns, &SimulationConfig { num_simulations: 8, seed: Some(1) })
            .unwrap();

        assert!(out.equity_curves.iter().all(|&v| v == 1.0));
        assert!(out.benchmark_curve.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_known_scenario_end_to_end() {
        // Path 0 sits out the losing day; path 1 holds only the losing day
        let returns = array![0.0, 0.10, -0.10, 0.05];
        let decisions = array![[1u8, 0], [1, 0], [0, 1], [1, 0]];

        let out = simulate_with_decisions(&returns, decisions).unwrap();

        let col0 = [1.0, 1.10, 1.10, 1.155];
        let col1 = [1.0, 1.0, 0.90, 0.90];
        let benchmark = [1.0, 1.10, 0.99, 1.0395];
        for t in 0..4 {
            assert_close(out.equity_curves[[t, 0]], col0[t]);
            assert_close(out.equity_curves[[t, 1]], col1[t]);
            assert_close(out.benchmark_curve[t], benchmark[t]);
        }

        assert_close(out.final_values[0], 1.155);
        assert_close(out.final_values[1], 0.90);
        assert_close(out.benchmark_final(), 1.0395);
    }

    #[test]
    fn test_simulation_count_preserved() {
        let returns = array![0.0, 0.01, -0.02];
        for n in [1usize, 100, 10_000] {
            let out = simulate(&returns, &SimulationConfig { num_simulations: n, seed: Some(3) })
                .unwrap();
            assert_eq!(out.decisions.dim(), (3, n));
            assert_eq!(out.equity_curves.dim(), (3, n));
            assert_eq!(out.final_values.len(), n);
        }
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let returns = array![0.0, 0.02, -0.01, 0.04];
        let config = SimulationConfig { num_simulations: 64, seed: Some(42) };

        let a = simulate(&returns, &config).unwrap();
        let b = simulate(&returns, &config).unwrap();
        assert_eq!(a.decisions, b.decisions);
        assert_eq!(a.final_values, b.final_values);

        let c = simulate(&returns, &SimulationConfig { num_simulations: 64, seed: Some(43) })
            .unwrap();
        assert_ne!(a.decisions, c.decisions);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let returns = array![0.0, 0.01];
        assert!(simulate(&returns, &SimulationConfig { num_simulations: 0, seed: None }).is_err());

        let empty = Array1::zeros(0);
        assert!(simulate(&empty, &SimulationConfig::default()).is_err());

        let bad = array![0.0, f64::NAN];
        assert!(simulate(&bad, &SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_decision_shape_mismatch_rejected() {
        let returns = array![0.0, 0.01, -0.02];
        let short = Array2::ones((2, 4));
        assert!(simulate_with_decisions(&returns, short).is_err());

        let empty = Array1::zeros(0);
        assert!(simulate_with_decisions(&empty, Array2::ones((0, 4))).is_err());
    }

    #[test]
    fn test_total_loss_is_degenerate_not_error() {
        // A -100% day zeroes the path permanently; still a valid outcome
        let returns = array![0.0, -1.0, 0.10];
        let decisions = Array2::ones((3, 1));

        let out = simulate_with_decisions(&returns, decisions).unwrap();
        assert_eq!(out.equity_curves[[1, 0]], 0.0);
        assert_eq!(out.equity_curves[[2, 0]], 0.0);
        assert_eq!(out.final_values[0], 0.0);
    }
}
