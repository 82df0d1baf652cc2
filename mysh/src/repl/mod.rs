//! Raw-mode line editor and the interactive session loop.

pub mod confirmation;
mod history;

pub use history::ReplHistory;

use crate::input::{Input, InputConfig};
use crate::prompt;
use crate::shell::{LineOutcome, Shell};
use crate::suggestion::SuggestionEngine;
use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use mysh_types::Context;
use std::io::{Stdout, Write, stdout};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

const NONE: KeyModifiers = KeyModifiers::NONE;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;
const SHIFT: KeyModifiers = KeyModifiers::SHIFT;

pub const BANNER: &str = "mysh — NLP-enabled shell";

/// Result of reading one line from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

enum KeyAction {
    Redraw,
    Ignore,
    Submit,
    Interrupt,
    Eof,
}

/// Raw mode for the duration of one read. Dropping it restores cooked mode.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", err);
        }
    }
}

pub struct Repl<'a> {
    pub shell: &'a mut Shell,
    input: Input,
    history: ReplHistory,
    suggestions: SuggestionEngine,
    prompt: String,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell) -> Self {
        let history = ReplHistory::from_records(shell.history.records());
        Repl {
            shell,
            input: Input::new(InputConfig::default()),
            history,
            suggestions: SuggestionEngine::new(),
            prompt: String::new(),
        }
    }

    pub fn run_interactive(&mut self, ctx: &Context) -> Result<()> {
        let _ = ctx.write_stdout(BANNER);

        loop {
            let line = match self.read_line()? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => break,
            };
            self.history.push(&line);

            match self.shell.eval_line(ctx, &line) {
                LineOutcome::Continue => {}
                LineOutcome::HistoryCleared => {
                    debug!("history cleared, replacing editor history");
                    self.history = ReplHistory::new();
                }
                LineOutcome::Exit => break,
            }
        }
        Ok(())
    }

    /// Reads one line with ghost-text suggestions.
    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        self.prompt = prompt::current_prompt();
        self.input.clear();
        self.history.reset_position();

        let _guard = RawModeGuard::enable()?;
        let mut out = stdout();
        self.redraw(&mut out)?;

        loop {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(&key),
                Event::Resize(..) => KeyAction::Redraw,
                _ => KeyAction::Ignore,
            };

            match action {
                KeyAction::Redraw => {
                    self.update_completion();
                    self.redraw(&mut out)?;
                }
                KeyAction::Ignore => {}
                KeyAction::Submit => {
                    self.input.completion = None;
                    self.redraw(&mut out)?;
                    execute!(out, Print("\r\n"))?;
                    return Ok(ReadOutcome::Line(self.input.to_string()));
                }
                KeyAction::Interrupt => {
                    execute!(out, Print("^C\r\n"))?;
                    return Ok(ReadOutcome::Interrupted);
                }
                KeyAction::Eof => {
                    execute!(out, Print("\r\n"))?;
                    return Ok(ReadOutcome::Eof);
                }
            }
        }
    }

    fn handle_key_event(&mut self, ev: &KeyEvent) -> KeyAction {
        match (ev.code, ev.modifiers) {
            (KeyCode::Enter, _) => return KeyAction::Submit,
            (KeyCode::Char('c'), CTRL) => return KeyAction::Interrupt,
            (KeyCode::Char('d'), CTRL) if self.input.is_empty() => return KeyAction::Eof,
            (KeyCode::Char('d'), CTRL) | (KeyCode::Delete, NONE) => self.input.delete(),
            (KeyCode::Char('a'), CTRL) | (KeyCode::Home, NONE) => self.input.move_to_begin(),
            (KeyCode::Char('e'), CTRL) | (KeyCode::End, NONE) => self.input.move_to_end(),
            (KeyCode::Char('u'), CTRL) => self.input.kill_to_begin(),
            (KeyCode::Char('l'), CTRL) => {
                let _ = execute!(stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0));
            }
            (KeyCode::Char(ch), NONE) | (KeyCode::Char(ch), SHIFT) => self.input.insert(ch),
            (KeyCode::Backspace, NONE) => self.input.backspace(),
            (KeyCode::Tab, NONE) => {
                self.input.accept_completion();
            }
            (KeyCode::Right, NONE) if self.input.is_at_end() => {
                self.input.accept_completion();
            }
            (KeyCode::Right, NONE) => self.input.move_by(1),
            (KeyCode::Left, NONE) => self.input.move_by(-1),
            (KeyCode::Up, NONE) => {
                let current = self.input.to_string();
                if let Some(entry) = self.history.back(&current) {
                    let entry = entry.to_string();
                    self.input.reset(entry);
                }
            }
            (KeyCode::Down, NONE) => {
                if let Some(entry) = self.history.forward() {
                    let entry = entry.to_string();
                    self.input.reset(entry);
                }
            }
            _ => return KeyAction::Ignore,
        }
        KeyAction::Redraw
    }

    fn update_completion(&mut self) {
        self.input.completion = if self.input.is_at_end() {
            self.suggestions
                .suggest(self.input.before_cursor(), &self.shell.environment)
        } else {
            None
        };
    }

    fn redraw(&self, out: &mut Stdout) -> Result<()> {
        let column = self.prompt.width() + self.input.before_cursor().width();
        queue!(
            out,
            cursor::Hide,
            Print("\r"),
            Clear(ClearType::CurrentLine),
            Print(&self.prompt),
            Print(self.input.styled()),
            cursor::MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
            cursor::Show
        )?;
        out.flush()?;
        Ok(())
    }
}
