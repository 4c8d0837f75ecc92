use crate::models::budget::BudgetConfig;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn parse_budget(amount_str: &str) -> Result<Decimal, String> {
    let amount_str = amount_str.trim();
    let amount = Decimal::from_str(amount_str)
        .map_err(|_| format!("Invalid budget amount '{}'. Must be a valid number", amount_str))?;
    if amount < Decimal::ZERO {
        return Err("Budget cannot be negative".to_string());
    }
    Ok(amount)
}

/// Replaces both budgets. Nothing changes unless both values are valid.
pub fn set_budgets(
    config: &mut BudgetConfig,
    total_str: &str,
    salesman_str: &str,
) -> Result<(), String> {
    let total_budget = parse_budget(total_str).map_err(|e| format!("Total budget: {}", e))?;
    let salesman_budget =
        parse_budget(salesman_str).map_err(|e| format!("Salesperson budget: {}", e))?;
    *config = BudgetConfig::new(total_budget, salesman_budget);
    Ok(())
}
