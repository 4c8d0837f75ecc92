use crate::models::budget::BudgetConfig;
use crate::models::report::{Report, SalesmanReport};
use crate::models::sales::SalesTable;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use std::io;

const NAME_WIDTH: usize = 15;

pub fn generate_report(sales: &SalesTable, budgets: &BudgetConfig) -> Report {
    let total_sales = sales.total();

    let salesmen = sales
        .iter()
        .map(|(name, amount)| SalesmanReport {
            name: name.to_string(),
            sales: amount,
            budget: budgets.salesman_budget,
            difference: amount.saturating_sub(budgets.salesman_budget),
            percent_of_budget: percent_of(amount, budgets.salesman_budget),
        })
        .collect();

    Report {
        total_sales,
        total_budget: budgets.total_budget,
        difference: total_sales.saturating_sub(budgets.total_budget),
        percent_of_total_budget: percent_of(total_sales, budgets.total_budget),
        salesman_budget: budgets.salesman_budget,
        num_salesmen: sales.len(),
        salesmen,
    }
}

/// `value / budget * 100`, or `None` when the budget is zero (or the result
/// does not fit in a `Decimal`).
pub fn percent_of(value: Decimal, budget: Decimal) -> Option<Decimal> {
    value.checked_div(budget)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Two decimals, half-to-even. `Decimal`'s own `{:.2}` truncates.
fn two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

pub fn format_money(value: Decimal) -> String {
    format!("${:.2}", two_places(value))
}

pub fn format_percent(percent: Option<Decimal>) -> String {
    match percent {
        Some(p) => format!("{:.2}%", two_places(p)),
        None => "n/a".to_string(),
    }
}

pub fn render_report_lines(report: &Report) -> Vec<String> {
    let mut lines = vec![
        "Sales Report".to_string(),
        format!("Total Sales: {}", format_money(report.total_sales)),
        format!("Total Budget: {}", format_money(report.total_budget)),
        format!("Difference: {}", format_money(report.difference)),
        format!(
            "Budget Achieved: {}",
            format_percent(report.percent_of_total_budget)
        ),
        format!(
            "Individual Budget per Salesperson: {}",
            format_money(report.salesman_budget)
        ),
        format!("Number of Salespeople: {}", report.num_salesmen),
        String::new(),
        "Sales per Salesperson:".to_string(),
    ];

    for salesman in &report.salesmen {
        lines.push(String::new());
        lines.push(format!("{}:", salesman.name));
        lines.push(format!("  Sales: {}", format_money(salesman.sales)));
        lines.push(format!("  Budget: {}", format_money(salesman.budget)));
        lines.push(format!("  Difference: {}", format_money(salesman.difference)));
        lines.push(format!(
            "  Budget Achieved: {}",
            format_percent(salesman.percent_of_budget)
        ));
    }

    lines
}

pub fn run_chart(report: &Report) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        loop {
            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(6), Constraint::Min(4)])
                        .split(size);

                    render_summary(frame, layout[0], report);
                    render_bars(frame, layout[1], report);
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
                    Event::Key(key) if key.kind == KeyEventKind::Release => {}
                    Event::Key(key) if key.code == KeyCode::Char('q') => break,
                    Event::Key(key) if key.code == KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn render_summary(frame: &mut ratatui::Frame, area: Rect, report: &Report) {
    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            "Sales vs. Budget  (press q to exit)",
            Style::default().fg(Color::White),
        )]))
        .borders(Borders::ALL);

    let achieved_color = achievement_color(report.total_sales, report.total_budget);
    let lines = vec![
        Line::from(format!(
            "Total Sales: {}   Total Budget: {}",
            format_money(report.total_sales),
            format_money(report.total_budget)
        )),
        Line::from(vec![
            Span::raw("Difference: "),
            Span::styled(
                format_money(report.difference),
                Style::default().fg(achieved_color),
            ),
            Span::raw("   Budget Achieved: "),
            Span::styled(
                format_percent(report.percent_of_total_budget),
                Style::default().fg(achieved_color),
            ),
        ]),
        Line::from(format!(
            "Salespeople: {}   Individual Budget: {}",
            report.num_salesmen,
            format_money(report.salesman_budget)
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left),
        area,
    );
}

fn render_bars(frame: &mut ratatui::Frame, area: Rect, report: &Report) {
    let block = Block::default().title("Per Salesperson").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if report.salesmen.is_empty() {
        frame.render_widget(
            Paragraph::new("No sales data").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    // name column, two spaces, bar, amount label
    let bar_width = (inner.width as usize).saturating_sub(NAME_WIDTH + 2 + 16);
    let scale = chart_scale(report);

    let mut lines: Vec<Line> = Vec::new();
    for salesman in &report.salesmen {
        let color = achievement_color(salesman.sales, salesman.budget);
        let name: String = salesman.name.chars().take(NAME_WIDTH).collect();
        let sales_len = bar_length(salesman.sales, scale, bar_width);
        let budget_len = bar_length(salesman.budget, scale, bar_width);

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:width$}", name, width = NAME_WIDTH),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("█".repeat(sales_len), Style::default().fg(color)),
            Span::raw(format!(" {}", format_money(salesman.sales))),
        ]));
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(NAME_WIDTH + 2)),
            Span::styled("░".repeat(budget_len), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(" {}", format_percent(salesman.percent_of_budget)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn achievement_color(value: Decimal, budget: Decimal) -> Color {
    if value >= budget { Color::Green } else { Color::Red }
}

/// Largest value any bar has to represent.
fn chart_scale(report: &Report) -> f64 {
    report
        .salesmen
        .iter()
        .map(|s| s.sales.to_f64().unwrap_or(0.0))
        .fold(report.salesman_budget.to_f64().unwrap_or(0.0), f64::max)
}

fn bar_length(value: Decimal, scale: f64, width: usize) -> usize {
    let value = value.to_f64().unwrap_or(0.0);
    if value <= 0.0 || scale <= 0.0 {
        return 0;
    }
    let len = (value / scale * width as f64).round() as usize;
    len.min(width)
}
