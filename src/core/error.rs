use thiserror::Error;

/// Rejection raised while expanding inputs into monthly series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("initial capital cannot be negative, got {0}")]
    NegativeInitialCapital(f64),
    #[error("monthly contribution cannot be negative, got {0}")]
    NegativeMonthlyContribution(f64),
    #[error("current age cannot be negative, got {0}")]
    NegativeCurrentAge(i32),
}
