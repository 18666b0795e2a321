mod engine;
mod error;
mod expander;
mod types;

pub use engine::{project, run_projection};
pub use error::InvalidInputError;
pub use expander::expand;
pub use types::{
    FinancialInputs, MonthlySeries, ProjectionResult, ProjectionRow, ProjectionSummary,
};
