// Library crate - simulation core plus peripheral collaborators

pub mod analysis;
pub mod error;
pub mod plot;
pub mod quotes;
pub mod returns;
pub mod simulation;

// Re-export commonly used types
pub use analysis::{print_summary, Summary};
pub use error::{Error, Result};
pub use plot::render_report;
pub use quotes::{PricePoint, QuoteSource, StooqClient};
pub use returns::daily_returns;
pub use simulation::{simulate, SimulationConfig, SimulationOutput};
