use crate::models::sales::{Row, RowOutcome, SalesTable, SkipReason};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

const NAME_COLUMN: usize = 0;
const AMOUNT_COLUMN: usize = 5;
const MIN_FIELDS: usize = 6;
const TOTAL_ROW_LABEL: &str = "total";

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub table: SalesTable,
    /// One entry per data row, header excluded.
    pub outcomes: Vec<RowOutcome>,
}

impl Aggregation {
    pub fn counted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == RowOutcome::Counted)
            .count()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == RowOutcome::Skipped(reason))
            .count()
    }
}

/// Parses an amount written as `$1.234,50`: every `$` and `.` is dropped
/// and `,` becomes the decimal point. A plain `1234.56` therefore reads as
/// 123456.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized = raw.replace('$', "").replace('.', "").replace(',', ".");
    let normalized = normalized.trim();
    Decimal::from_str(normalized)
        .or_else(|_| Decimal::from_scientific(normalized))
        .ok()
}

fn evaluate_row(row: &Row) -> Result<(&str, Decimal), SkipReason> {
    if row.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields);
    }
    let salesman = row[NAME_COLUMN].as_str();
    if salesman.to_lowercase() == TOTAL_ROW_LABEL {
        return Err(SkipReason::TotalRow);
    }
    let amount = parse_amount(&row[AMOUNT_COLUMN]).ok_or(SkipReason::InvalidAmount)?;
    Ok((salesman, amount))
}

/// Sums the sale amount of every data row per salesperson. The first row is
/// the header. Rows that cannot be used are recorded as skipped and never
/// touch the table.
pub fn calculate_sales_per_salesman(data: &[Row]) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for row in data.iter().skip(1) {
        let outcome = match evaluate_row(row) {
            Ok((salesman, amount)) => {
                if aggregation.table.try_add(salesman, amount) {
                    RowOutcome::Counted
                } else {
                    // out of Decimal range
                    RowOutcome::Skipped(SkipReason::InvalidAmount)
                }
            }
            Err(reason) => RowOutcome::Skipped(reason),
        };
        aggregation.outcomes.push(outcome);
    }

    debug!(
        salesmen = aggregation.table.len(),
        counted = aggregation.counted(),
        skipped = aggregation.outcomes.len() - aggregation.counted(),
        "aggregated sales"
    );
    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn header() -> Row {
        row(&["Vendedor", "A", "B", "C", "D", "Venta"])
    }

    #[test]
    fn test_parse_amount_localized() {
        assert_eq!(parse_amount("$1.234,50"), Some(Decimal::new(123450, 2)));
        assert_eq!(parse_amount("$12,00"), Some(Decimal::new(12, 0)));
        assert_eq!(parse_amount("1.000.000"), Some(Decimal::new(1_000_000, 0)));
        assert_eq!(parse_amount(" $ 5,5 "), Some(Decimal::new(55, 1)));
        assert_eq!(parse_amount("-$20,25"), Some(Decimal::new(-2025, 2)));
    }

    #[test]
    fn test_parse_amount_treats_dot_as_thousands_separator() {
        assert_eq!(parse_amount("1234.56"), Some(Decimal::new(123456, 0)));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$"), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_parse_amount_outside_decimal_range() {
        assert_eq!(parse_amount("1e3"), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_amount("1e40"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-inf"), None);
        assert_eq!(parse_amount("nan"), None);
        assert_eq!(parse_amount("1234567890123456789012345678901"), None);
    }

    #[test]
    fn test_parse_amount_excess_fraction_digits_are_rounded() {
        let amount = parse_amount("0,1234567890123456789012345678901").unwrap();
        assert!(amount.scale() <= 28);
        assert!(amount > Decimal::new(1234, 4) && amount < Decimal::new(1235, 4));
    }

    #[test]
    fn test_parse_amount_is_deterministic() {
        for raw in ["$1.234,50", "abc", "7,1", ""] {
            assert_eq!(parse_amount(raw), parse_amount(raw));
        }
    }

    #[test]
    fn test_total_row_is_excluded() {
        let data = vec![
            header(),
            row(&["Ana", "-", "-", "-", "-", "$1.234,50"]),
            row(&["total", "-", "-", "-", "-", "$1.234,50"]),
        ];

        let aggregation = calculate_sales_per_salesman(&data);
        assert_eq!(aggregation.table.len(), 1);
        assert_eq!(aggregation.table.get("Ana"), Some(Decimal::new(123450, 2)));
        assert_eq!(
            aggregation.outcomes,
            vec![RowOutcome::Counted, RowOutcome::Skipped(SkipReason::TotalRow)]
        );
    }

    #[test]
    fn test_total_row_matched_case_insensitively() {
        let data = vec![
            header(),
            row(&["TOTAL", "-", "-", "-", "-", "$10,00"]),
            row(&["Total", "-", "-", "-", "-", "abc"]),
        ];

        let aggregation = calculate_sales_per_salesman(&data);
        assert!(aggregation.table.is_empty());
        assert_eq!(aggregation.skipped(SkipReason::TotalRow), 2);
    }

    #[test]
    fn test_unparseable_amount_leaves_table_unchanged() {
        let mut data = vec![header(), row(&["Luis", "-", "-", "-", "-", "$100,00"])];
        let before = calculate_sales_per_salesman(&data);

        data.push(row(&["Luis", "-", "-", "-", "-", "abc"]));
        let after = calculate_sales_per_salesman(&data);

        assert_eq!(before.table, after.table);
        assert_eq!(after.skipped(SkipReason::InvalidAmount), 1);
    }

    #[test]
    fn test_short_rows_never_contribute() {
        let data = vec![
            header(),
            row(&["Ana", "-", "-", "-", "$50,00"]),
            row(&["Ana"]),
            row(&[""]),
        ];

        let aggregation = calculate_sales_per_salesman(&data);
        assert!(aggregation.table.is_empty());
        assert_eq!(aggregation.skipped(SkipReason::TooFewFields), 3);
        assert_eq!(aggregation.counted(), 0);
    }

    #[test]
    fn test_header_is_always_skipped() {
        let data = vec![row(&["Ana", "-", "-", "-", "-", "$99,00"])];
        let aggregation = calculate_sales_per_salesman(&data);
        assert!(aggregation.table.is_empty());
        assert!(aggregation.outcomes.is_empty());
    }

    #[test]
    fn test_amounts_grouped_by_exact_name() {
        let data = vec![
            header(),
            row(&["Ana", "-", "-", "-", "-", "$1.000,00"]),
            row(&["Luis", "-", "-", "-", "-", "$200,50", "extra"]),
            row(&["Ana", "-", "-", "-", "-", "$0,25"]),
            row(&["ana", "-", "-", "-", "-", "$1,00"]),
        ];

        let aggregation = calculate_sales_per_salesman(&data);
        assert_eq!(aggregation.table.get("Ana"), Some(Decimal::new(100025, 2)));
        assert_eq!(aggregation.table.get("Luis"), Some(Decimal::new(20050, 2)));
        assert_eq!(aggregation.table.get("ana"), Some(Decimal::ONE));
        assert_eq!(aggregation.table.total(), Decimal::new(120175, 2));
        assert_eq!(aggregation.counted(), 4);
    }
}
