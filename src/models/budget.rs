use rust_decimal::Decimal;

/// Targets the sales are compared against. The two values are independent:
/// `total_budget` is not required to equal `salesman_budget` times the
/// number of salespeople.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetConfig {
    pub total_budget: Decimal,
    pub salesman_budget: Decimal,
}

impl BudgetConfig {
    pub fn new(total_budget: Decimal, salesman_budget: Decimal) -> Self {
        Self {
            total_budget,
            salesman_budget,
        }
    }
}
