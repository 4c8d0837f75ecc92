use crate::models::budget::BudgetConfig;
use crate::models::report::Report;
use crate::models::sales::Row;
use crate::operations::aggregate::{Aggregation, calculate_sales_per_salesman};
use crate::operations::ask::{CompletionService, Credential, get_answer};
use crate::operations::budget::set_budgets;
use crate::operations::import::read_csv;
use crate::operations::preview::{PREVIEW_ROWS, preview_lines};
use crate::operations::report::generate_report;
use tracing::info;
use uuid::Uuid;

pub const NO_SALES_DATA: &str = "No valid sales data found in the CSV file.";
pub const NOT_READY: &str = "Load a CSV file with valid sales data first.";

/// Everything one user works with. A new upload replaces the data and the
/// aggregate; budgets are kept until changed.
pub struct Session {
    id: Uuid,
    data: Vec<Row>,
    aggregation: Option<Aggregation>,
    budgets: BudgetConfig,
}

impl Session {
    pub fn new(budgets: BudgetConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Vec::new(),
            aggregation: None,
            budgets,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Parses and aggregates an uploaded file. When the file parses but has
    /// no usable sales rows, the rows stay available for the preview and the
    /// error is returned.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&Aggregation, String> {
        self.data.clear();
        self.aggregation = None;

        self.data = read_csv(bytes)?;
        let aggregation = calculate_sales_per_salesman(&self.data);
        if aggregation.table.is_empty() {
            return Err(NO_SALES_DATA.to_string());
        }

        info!(
            rows = self.data.len(),
            salesmen = aggregation.table.len(),
            "file loaded"
        );
        Ok(&*self.aggregation.insert(aggregation))
    }

    pub fn preview(&self) -> Vec<String> {
        if self.data.is_empty() {
            return Vec::new();
        }
        preview_lines(&self.data, PREVIEW_ROWS)
    }

    pub fn is_ready(&self) -> bool {
        self.aggregation.is_some()
    }

    pub fn budgets(&self) -> BudgetConfig {
        self.budgets
    }

    pub fn set_budgets(&mut self, total_str: &str, salesman_str: &str) -> Result<(), String> {
        set_budgets(&mut self.budgets, total_str, salesman_str)
    }

    pub fn report(&self) -> Result<Report, String> {
        let aggregation = self.aggregation.as_ref().ok_or_else(|| NOT_READY.to_string())?;
        Ok(generate_report(&aggregation.table, &self.budgets))
    }

    pub fn ask(
        &self,
        service: &dyn CompletionService,
        question: &str,
        credential: &Credential,
    ) -> Result<String, String> {
        if !self.is_ready() {
            return Err(NOT_READY.to_string());
        }
        if question.trim().is_empty() {
            return Err("Question cannot be empty".to_string());
        }
        if credential.is_empty() {
            return Err("API key cannot be empty".to_string());
        }
        Ok(get_answer(service, question, &self.data, credential))
    }
}
