use crate::models::sales::Row;

pub const PREVIEW_ROWS: usize = 5;

pub fn preview_lines(data: &[Row], num_rows: usize) -> Vec<String> {
    let mut lines: Vec<String> = data
        .iter()
        .take(num_rows)
        .enumerate()
        .map(|(i, row)| format!("Row {}: {:?}", i, row))
        .collect();
    lines.push("...".to_string());
    lines
}
