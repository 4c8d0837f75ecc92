use rust_decimal::Decimal;
use std::collections::HashMap;

/// One line of the uploaded file, split into fields.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields,
    TotalRow,
    InvalidAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Counted,
    Skipped(SkipReason),
}

/// Accumulated sales per salesperson, kept in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    entries: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
    total: Decimal,
}

impl SalesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the salesperson's running total, creating the entry
    /// if needed. Returns `false` and leaves the table untouched when the
    /// sum would not fit in a `Decimal`.
    pub fn try_add(&mut self, salesman: &str, amount: Decimal) -> bool {
        let new_total = match self.total.checked_add(amount) {
            Some(total) => total,
            None => return false,
        };

        match self.index.get(salesman) {
            Some(&idx) => {
                let entry = &mut self.entries[idx].1;
                match entry.checked_add(amount) {
                    Some(sum) => *entry = sum,
                    None => return false,
                }
            }
            None => {
                self.index.insert(salesman.to_string(), self.entries.len());
                self.entries.push((salesman.to_string(), amount));
            }
        }

        self.total = new_total;
        true
    }

    pub fn get(&self, salesman: &str) -> Option<Decimal> {
        self.index.get(salesman).map(|&idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_add_accumulates_per_name() {
        let mut table = SalesTable::new();
        assert!(table.try_add("Ana", Decimal::new(100, 0)));
        assert!(table.try_add("Luis", Decimal::new(50, 0)));
        assert!(table.try_add("Ana", Decimal::new(2550, 2)));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Ana"), Some(Decimal::new(12550, 2)));
        assert_eq!(table.get("Luis"), Some(Decimal::new(50, 0)));
        assert_eq!(table.total(), Decimal::new(17550, 2));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = SalesTable::new();
        table.try_add("ana", Decimal::ONE);
        table.try_add("Ana", Decimal::ONE);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_iter_keeps_first_appearance_order() {
        let mut table = SalesTable::new();
        table.try_add("Zoe", Decimal::ONE);
        table.try_add("Ana", Decimal::ONE);
        table.try_add("Zoe", Decimal::ONE);

        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zoe", "Ana"]);
    }

    #[test]
    fn test_try_add_rejects_overflow() {
        let mut table = SalesTable::new();
        assert!(table.try_add("Ana", Decimal::MAX));
        assert!(!table.try_add("Ana", Decimal::MAX));
        assert!(!table.try_add("Luis", Decimal::MAX));

        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), Decimal::MAX);
    }
}
