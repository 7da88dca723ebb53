//! Summary statistics over the simulation's terminal values, plus the
//! console report.

use ndarray::Array1;

/// Aggregate view of the N terminal wealth multipliers against the
/// buy & hold benchmark.
#[derive(Debug, Clone)]
pub struct Summary {
    pub mean: f64,
    pub best: f64,
    pub worst: f64,
    /// Paths that ended strictly above the benchmark final value.
    pub beat_benchmark: usize,
    pub beat_fraction: f64,
    pub benchmark_final: f64,
}

impl Summary {
    pub fn from_final_values(final_values: &Array1<f64>, benchmark_final: f64) -> Self {
        let n = final_values.len();
        let mean = final_values.mean().unwrap_or(0.0);
        let best = final_values.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let worst = final_values.fold(f64::INFINITY, |a, &b| a.min(b));
        let beat_benchmark = final_values.iter().filter(|&&v| v > benchmark_final).count();
        let beat_fraction = if n > 0 { beat_benchmark as f64 / n as f64 } else { 0.0 };

        Self { mean, best, worst, beat_benchmark, beat_fraction, benchmark_final }
    }
}

/// Multiplier -> total return percentage (1.0 = break even = 0%).
pub fn total_return_pct(multiplier: f64) -> f64 {
    (multiplier - 1.0) * 100.0
}

/// Plain key-value console report.
pub fn print_summary(ticker: &str, num_simulations: usize, summary: &Summary) {
    println!("\n--- ANALYSIS OF RANDOMNESS ---");
    println!(
        "Asset: {} (Buy & Hold Total Return: {:.2}%)",
        ticker,
        total_return_pct(summary.benchmark_final)
    );
    println!("Simulations: {}", num_simulations);
    println!("{}", "-".repeat(30));
    println!("Average Random Return: {:.2}%", total_return_pct(summary.mean));
    println!("Best Random Run:      {:.2}%", total_return_pct(summary.best));
    println!("Worst Random Run:     {:.2}%", total_return_pct(summary.worst));
    println!("{}", "-".repeat(30));
    println!(
        "Probability of beating Buy & Hold randomly: {:.2}%",
        summary.beat_fraction * 100.0
    );
}
