use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_sales: Decimal,
    pub total_budget: Decimal,
    pub difference: Decimal,
    /// `None` when the total budget is zero.
    pub percent_of_total_budget: Option<Decimal>,
    pub salesman_budget: Decimal,
    pub num_salesmen: usize,
    pub salesmen: Vec<SalesmanReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesmanReport {
    pub name: String,
    pub sales: Decimal,
    pub budget: Decimal,
    pub difference: Decimal,
    /// `None` when the individual budget is zero.
    pub percent_of_budget: Option<Decimal>,
}
