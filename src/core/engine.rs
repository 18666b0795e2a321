use super::error::InvalidInputError;
use super::expander::expand;
use super::types::{FinancialInputs, MonthlySeries, ProjectionResult};

#[derive(Debug, Clone, Copy)]
struct AccountState {
    principal: f64,
    contributions: f64,
    take_home: f64,
}

impl AccountState {
    fn opening(initial_capital: f64) -> Self {
        Self {
            principal: initial_capital,
            contributions: initial_capital,
            take_home: 0.0,
        }
    }

    fn advance(&mut self, contribution: f64, draw: f64, pension: f64, growth_rate: f64) {
        self.principal += contribution;
        self.contributions += contribution;
        self.principal -= draw;
        self.take_home = draw + pension;
        // Floor before growth so an exhausted account cannot compound back up.
        if self.principal <= 0.0 {
            self.principal = 0.0;
        }
        self.principal *= 1.0 + growth_rate;
    }
}

/// Walks the horizon forward once, recording the state entering each month
/// before that month's cash flows and growth are applied.
pub fn project(initial_capital: f64, series: &MonthlySeries) -> ProjectionResult {
    let len = series.len();
    let mut result = ProjectionResult {
        months: Vec::with_capacity(len),
        years: Vec::with_capacity(len),
        principal: Vec::with_capacity(len),
        contributions: Vec::with_capacity(len),
        take_home: Vec::with_capacity(len),
    };
    let mut state = AccountState::opening(initial_capital);

    for month in 0..len {
        result.months.push(month);
        result.years.push(month as f64 / 12.0);
        result.principal.push(state.principal);
        result.contributions.push(state.contributions);
        result.take_home.push(state.take_home);

        state.advance(
            series.contribution[month],
            series.draw_amount[month],
            series.pension[month],
            series.growth_rate[month],
        );
    }

    result
}

pub fn run_projection(inputs: &FinancialInputs) -> Result<ProjectionResult, InvalidInputError> {
    let series = expand(inputs)?;
    Ok(project(inputs.initial_capital, &series))
}
