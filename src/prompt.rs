use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::{self, BufRead, IsTerminal, Write};

/// Reads one trimmed line from stdin. `None` means stdin is closed.
pub fn read_user_input() -> Result<Option<String>, String> {
    read_line_from(&mut io::stdin().lock())
}

fn read_line_from(reader: &mut impl BufRead) -> Result<Option<String>, String> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Reads a line without echoing it. When stdin is not a terminal the line is
/// taken from stdin as is, never from the controlling terminal.
pub fn read_secret() -> Result<String, String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return read_piped_secret(&mut stdin.lock());
    }
    read_hidden_secret()
}

fn read_piped_secret(reader: &mut impl BufRead) -> Result<String, String> {
    Ok(read_line_from(reader)?.unwrap_or_default())
}

fn read_hidden_secret() -> Result<String, String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;

    let result = (|| {
        let mut secret = String::new();
        loop {
            let key = match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                _ => continue,
            };
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Esc => {
                    secret.clear();
                    break;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    secret.clear();
                    break;
                }
                KeyCode::Backspace => {
                    secret.pop();
                }
                KeyCode::Char(ch) => secret.push(ch),
                _ => {}
            }
        }
        Ok(secret)
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    println!();
    let _ = io::stdout().flush();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_from_trims() {
        let mut input = Cursor::new("  report \nnext\n");
        assert_eq!(read_line_from(&mut input).unwrap(), Some("report".to_string()));
        assert_eq!(read_line_from(&mut input).unwrap(), Some("next".to_string()));
        assert_eq!(read_line_from(&mut input).unwrap(), None);
    }

    #[test]
    fn test_piped_secret_comes_from_the_pipe() {
        let mut input = Cursor::new("sk-piped\nWho sold most?\n");
        assert_eq!(read_piped_secret(&mut input).unwrap(), "sk-piped");
        assert_eq!(read_line_from(&mut input).unwrap(), Some("Who sold most?".to_string()));
    }

    #[test]
    fn test_piped_secret_at_end_of_input_is_empty() {
        let mut input = Cursor::new("");
        assert_eq!(read_piped_secret(&mut input).unwrap(), "");
    }
}
