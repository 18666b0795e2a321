use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialInputs {
    pub initial_capital: f64,
    pub monthly_contribution: f64,
    /// Nominal annual rate as a fraction, e.g. 0.07 for 7%.
    pub annual_growth_rate: f64,
    /// Counted from the first simulated month, not from `current_age`.
    pub contribution_years: i32,
    pub current_age: i32,
    pub draw_down_age: i32,
    pub monthly_draw_amount: f64,
    pub expected_death_age: i32,
    pub monthly_pension: f64,
    pub expected_pension_age: i32,
}

/// Per-month resolved parameters covering the whole horizon.
///
/// Only [`super::expand`] builds this, so every series has the same length
/// and that length is always `total_months + 1` for a non-negative horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub(super) total_months: i64,
    pub(super) contribution: Vec<f64>,
    pub(super) draw_amount: Vec<f64>,
    pub(super) pension: Vec<f64>,
    pub(super) growth_rate: Vec<f64>,
}

impl MonthlySeries {
    pub fn total_months(&self) -> i64 {
        self.total_months
    }

    pub fn len(&self) -> usize {
        self.contribution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contribution.is_empty()
    }

    pub fn contribution(&self) -> &[f64] {
        &self.contribution
    }

    pub fn draw_amount(&self) -> &[f64] {
        &self.draw_amount
    }

    pub fn pension(&self) -> &[f64] {
        &self.pension
    }

    pub fn growth_rate(&self) -> &[f64] {
        &self.growth_rate
    }
}

/// Month-by-month trajectory. Entry `m` is the state entering month `m`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub months: Vec<usize>,
    pub years: Vec<f64>,
    pub principal: Vec<f64>,
    pub contributions: Vec<f64>,
    pub take_home: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub month: usize,
    pub year: f64,
    pub principal: f64,
    pub contributions: f64,
    pub take_home: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub final_balance: f64,
    pub peak_balance: f64,
    pub total_contributions: f64,
    pub depleted_at_month: Option<usize>,
    pub depleted_at_age: Option<f64>,
    pub lasts_lifetime: bool,
}

impl ProjectionResult {
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Stops at the shortest series.
    pub fn rows(&self) -> impl Iterator<Item = ProjectionRow> + '_ {
        self.months
            .iter()
            .zip(&self.years)
            .zip(&self.principal)
            .zip(&self.contributions)
            .zip(&self.take_home)
            .map(
                |((((&month, &year), &principal), &contributions), &take_home)| ProjectionRow {
                    month,
                    year,
                    principal,
                    contributions,
                    take_home,
                },
            )
    }

    /// Depletion is the first month whose entering balance is zero after a
    /// month that started with money in the account.
    pub fn summary(&self, current_age: i32) -> ProjectionSummary {
        let depleted_at_month = self
            .principal
            .windows(2)
            .position(|pair| pair[0] > 0.0 && pair[1] <= 0.0)
            .and_then(|idx| self.months.get(idx + 1).copied());

        ProjectionSummary {
            final_balance: self.principal.last().copied().unwrap_or(0.0),
            peak_balance: self.principal.iter().copied().fold(0.0, f64::max),
            total_contributions: self.contributions.last().copied().unwrap_or(0.0),
            depleted_at_month,
            depleted_at_age: depleted_at_month
                .map(|month| f64::from(current_age) + month as f64 / 12.0),
            lasts_lifetime: depleted_at_month.is_none(),
        }
    }
}
