use crate::models::budget::BudgetConfig;
use crate::operations::ask::{Credential, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::operations::budget::parse_budget;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Sales vs. budget analysis for semicolon-delimited CSV exports.
#[derive(Parser)]
#[command(name = "salsa", version, about)]
pub struct Cli {
    /// CSV file to load on start-up
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Sales target for all salespeople combined
    #[arg(long, default_value = "0", value_parser = parse_budget)]
    pub total_budget: Decimal,

    /// Sales target for each individual salesperson
    #[arg(long, default_value = "0", value_parser = parse_budget)]
    pub salesman_budget: Decimal,

    /// Key for the completion service; asked for interactively when missing
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name sent with each question
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Cli {
    pub fn budgets(&self) -> BudgetConfig {
        BudgetConfig::new(self.total_budget, self.salesman_budget)
    }

    pub fn credential(&self) -> Option<Credential> {
        self.api_key
            .as_deref()
            .map(Credential::new)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["salsa"]).unwrap();
        assert!(cli.file.is_none());
        assert_eq!(cli.budgets(), BudgetConfig::default());
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_budgets() {
        let cli = Cli::try_parse_from([
            "salsa",
            "--file",
            "ventas.csv",
            "--total-budget",
            "1000",
            "--salesman-budget",
            "250.5",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("ventas.csv")));
        assert_eq!(
            cli.budgets(),
            BudgetConfig::new(Decimal::new(1000, 0), Decimal::new(2505, 1))
        );
    }

    #[test]
    fn test_cli_rejects_negative_budget() {
        let result = Cli::try_parse_from(["salsa", "--total-budget=-5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let cli = Cli::try_parse_from(["salsa", "--api-key", " "]).unwrap();
        assert!(cli.credential().is_none());

        let cli = Cli::try_parse_from(["salsa", "--api-key", "sk-1"]).unwrap();
        assert_eq!(cli.credential().unwrap().expose(), "sk-1");
    }
}
