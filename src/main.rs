mod config;
mod models;
mod operations;
mod prompt;
mod session;

use clap::Parser;
use config::Cli;
use models::sales::SkipReason;
use operations::ask::{Credential, OpenAiClient};
use operations::import::read_upload;
use operations::report::{format_money, render_report_lines, run_chart};
use prompt::{read_secret, read_user_input};
use session::{NOT_READY, Session};
use std::path::Path;
use tracing::info_span;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq, Eq)]
pub enum UserCommands {
    Load,
    Preview,
    Budget,
    Report,
    Chart,
    Ask,
    Help,
    Exit,
    Unknown,
}

const HELP: &str = "\
load <path>  load a semicolon-delimited sales CSV
preview      show the first rows of the loaded file
budget       set the total and per-salesperson budgets
report       print sales against budgets
chart        open the sales vs. budget chart (q to close)
ask          ask a question about the data
exit         quit";

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut session = Session::new(cli.budgets());
    let span = info_span!("session", id = %session.id());
    let _enter = span.enter();

    let mut credential = cli.credential();
    let mut client: Option<OpenAiClient> = None;

    println!("Welcome to the sales analyzer!");
    if let Some(path) = &cli.file {
        handle_load(&mut session, path);
    }

    loop {
        println!("Please enter a command (load, preview, budget, report, chart, ask, help, exit):");

        let input = match read_user_input() {
            Ok(Some(cmd)) => cmd,
            Ok(None) => break,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let (command, argument) = match input.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (input.as_str(), ""),
        };
        if command.is_empty() {
            continue;
        }

        match check_for_command(command) {
            UserCommands::Load => {
                let path = if argument.is_empty() {
                    println!("Please enter the path of the CSV file:");
                    match read_user_input() {
                        Ok(Some(path)) => path,
                        Ok(None) => break,
                        Err(e) => {
                            println!("Error reading input: {}", e);
                            continue;
                        }
                    }
                } else {
                    argument.to_string()
                };
                handle_load(&mut session, Path::new(&path));
            }
            UserCommands::Preview => {
                let lines = session.preview();
                if lines.is_empty() {
                    println!("No file loaded.");
                }
                for line in lines {
                    println!("{}", line);
                }
            }
            UserCommands::Budget => {
                let current = session.budgets();
                println!(
                    "Enter the total sales target for all salespeople combined (current {}):",
                    format_money(current.total_budget)
                );
                let total = match read_user_input() {
                    Ok(Some(value)) => value,
                    Ok(None) => break,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                println!(
                    "Enter the individual budget for each salesperson (current {}):",
                    format_money(current.salesman_budget)
                );
                let salesman = match read_user_input() {
                    Ok(Some(value)) => value,
                    Ok(None) => break,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match session.set_budgets(&total, &salesman) {
                    Ok(_) => println!("Budgets updated."),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Report => match session.report() {
                Ok(report) => {
                    for line in render_report_lines(&report) {
                        println!("{}", line);
                    }
                }
                Err(err) => println!("Error: {}", err),
            },
            UserCommands::Chart => {
                let result = session.report().and_then(|report| run_chart(&report));
                if let Err(err) = result {
                    println!("Error: {}", err);
                }
            }
            UserCommands::Ask => {
                if !session.is_ready() {
                    println!("Error: {}", NOT_READY);
                    continue;
                }
                println!("Ask a question about the CSV data:");
                let question = match read_user_input() {
                    Ok(Some(question)) => question,
                    Ok(None) => break,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                if credential.is_none() {
                    println!("Enter your completion API key (input is hidden):");
                    match read_secret() {
                        Ok(key) => credential = Some(Credential::new(key)).filter(|c| !c.is_empty()),
                        Err(e) => {
                            println!("Error reading input: {}", e);
                            continue;
                        }
                    }
                }
                let Some(key) = credential.as_ref() else {
                    println!("Error: API key cannot be empty");
                    continue;
                };
                if client.is_none() {
                    match OpenAiClient::new(cli.model.clone(), cli.base_url.clone()) {
                        Ok(c) => client = Some(c),
                        Err(err) => {
                            println!("Error: {}", err);
                            continue;
                        }
                    }
                }
                let Some(service) = client.as_ref() else {
                    continue;
                };
                match session.ask(service, &question, key) {
                    Ok(answer) => println!("Answer: {}", answer),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Help => println!("{}", HELP),
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("Unknown command '{}'. Type 'help' for the list.", command);
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_load(session: &mut Session, path: &Path) {
    let bytes = match read_upload(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("Error: {}", err);
            return;
        }
    };

    let result = session
        .upload(&bytes)
        .map(|aggregation| {
            (
                aggregation.table.len(),
                aggregation.counted(),
                aggregation.outcomes.len() - aggregation.counted(),
                aggregation.skipped(SkipReason::InvalidAmount),
            )
        });

    let preview = session.preview();
    if !preview.is_empty() {
        println!("CSV file preview:");
        for line in preview {
            println!("{}", line);
        }
    }

    match result {
        Ok((salesmen, counted, skipped, invalid)) => {
            println!(
                "Loaded {} sales rows for {} salespeople ({} rows skipped, {} with unreadable amounts).",
                counted, salesmen, skipped, invalid
            );
        }
        Err(err) => println!("Error: {}", err),
    }
}

fn check_for_command(input: &str) -> UserCommands {
    match input.to_lowercase().as_str() {
        "load" | "upload" => UserCommands::Load,
        "preview" => UserCommands::Preview,
        "budget" => UserCommands::Budget,
        "report" => UserCommands::Report,
        "chart" => UserCommands::Chart,
        "ask" => UserCommands::Ask,
        "help" => UserCommands::Help,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
