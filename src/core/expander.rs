use tracing::debug;

use super::error::InvalidInputError;
use super::types::{FinancialInputs, MonthlySeries};

pub fn expand(inputs: &FinancialInputs) -> Result<MonthlySeries, InvalidInputError> {
    validate(inputs)?;

    let current_age = i64::from(inputs.current_age);
    let total_months = (i64::from(inputs.expected_death_age) - current_age) * 12 + 1;
    let contribution_months = i64::from(inputs.contribution_years) * 12;
    let draw_down_start = (i64::from(inputs.draw_down_age) - current_age) * 12;
    let pension_start = (i64::from(inputs.expected_pension_age) - current_age) * 12;
    let monthly_growth_rate = inputs.annual_growth_rate / 12.0;

    debug!(
        total_months,
        contribution_months, draw_down_start, pension_start, "expanding monthly series"
    );

    // Inclusive bound: the series holds one entry more than `total_months`.
    let len = usize::try_from(total_months + 1).unwrap_or(0);
    let mut contribution = Vec::with_capacity(len);
    let mut draw_amount = Vec::with_capacity(len);
    let mut pension = Vec::with_capacity(len);
    let mut growth_rate = Vec::with_capacity(len);

    for month in 0..=total_months {
        contribution.push(if month <= contribution_months {
            inputs.monthly_contribution
        } else {
            0.0
        });
        draw_amount.push(if month >= draw_down_start {
            inputs.monthly_draw_amount
        } else {
            0.0
        });
        pension.push(if month >= pension_start {
            inputs.monthly_pension
        } else {
            0.0
        });
        growth_rate.push(monthly_growth_rate);
    }

    Ok(MonthlySeries {
        total_months,
        contribution,
        draw_amount,
        pension,
        growth_rate,
    })
}

fn validate(inputs: &FinancialInputs) -> Result<(), InvalidInputError> {
    if inputs.initial_capital < 0.0 {
        return Err(InvalidInputError::NegativeInitialCapital(
            inputs.initial_capital,
        ));
    }
    if inputs.monthly_contribution < 0.0 {
        return Err(InvalidInputError::NegativeMonthlyContribution(
            inputs.monthly_contribution,
        ));
    }
    if inputs.current_age < 0 {
        return Err(InvalidInputError::NegativeCurrentAge(inputs.current_age));
    }
    Ok(())
}
