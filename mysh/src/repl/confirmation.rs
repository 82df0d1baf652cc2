use crate::nlp::Confirmation;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use std::io::{IsTerminal, Write, stdin, stdout};

/// Reads a single key: `y`/`Y` accepts, anything else declines.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let mut stdout = stdout();

    let was_raw = is_raw_mode_enabled().unwrap_or(false);
    if !was_raw {
        enable_raw_mode()?;
    }

    queue!(stdout, Print(prompt))?;
    stdout.flush()?;

    let answer = loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match (key.code, key.modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => break false,
                (KeyCode::Char(ch), _) => break is_affirmative(&ch.to_string()),
                (KeyCode::Enter | KeyCode::Esc, _) => break false,
                _ => {}
            }
        }
    };
    queue!(stdout, Print(if answer { "y\r\n" } else { "N\r\n" }))?;
    stdout.flush()?;

    if !was_raw {
        disable_raw_mode()?;
    }
    Ok(answer)
}

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Asks on the terminal, or reads the next line of standard input when there is none.
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if stdin().is_terminal() {
            return confirm_action(prompt);
        }

        let mut stdout = stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut answer = String::new();
        stdin().read_line(&mut answer)?;
        writeln!(stdout)?;
        Ok(is_affirmative(&answer))
    }
}
