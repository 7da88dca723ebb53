use thiserror::Error;

/// Errors produced by the simulation pipeline.
///
/// A simulated path whose equity collapses to zero is a valid outcome,
/// not an error; only data and configuration problems abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Quote source returned zero rows or could not resolve the request.
    /// Fatal: the run aborts before any simulation.
    #[error("no price data for {ticker}: {detail}")]
    DataUnavailable { ticker: String, detail: String },

    /// Run parameters that cannot produce a valid simulation
    /// (non-positive simulation count, fewer than 2 trading days,
    /// non-finite returns).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure persisting the output figure. Statistics computed before
    /// rendering remain valid.
    #[error("failed to write figure: {0}")]
    Render(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
