//! Line-driven keypad session over the frame collector.
//!
//! Each input line is one command:
//!
//! | line      | action                                   |
//! |-----------|------------------------------------------|
//! | `s F R`   | select frame `F` (1-10), roll `R` (1-3)  |
//! | `0`-`9`, `X`, `/` | enter a roll in the active cell  |
//! | `n`       | move to the next cell                    |
//! | `d`       | delete the active cell                   |
//! | `c`       | clear the grid                           |
//! | `=`       | validate and score                       |
//! | `?`       | show help                                |
//! | `q`       | quit                                     |
//!
//! The grid is printed after every command, with the active cell in
//! brackets.

use std::io::{BufRead, Write};

use bowly_frames::{
    max_rolls, score, validate, Cell, CollectorState, InputEvent, ScoreResult, FRAME_COUNT,
};
use tracing::debug;

use crate::error::Result;

const HELP: &str = "\
commands:
  s F R   select frame F (1-10), roll R (1-3)
  0-9 X / enter a roll
  n       next cell
  d       delete active cell
  c       clear all
  =       compute score
  q       quit";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward an event to the collector.
    Event(InputEvent),
    /// Validate and score the grid.
    Compute,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

impl Command {
    /// Parse one input line. Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns a message for a line that is not a command.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };

        let command = match head {
            "s" => {
                let frame = parse_index(parts.next(), "frame")?;
                let roll = parse_index(parts.next(), "roll")?;
                if parts.next().is_some() {
                    return Err("usage: s FRAME ROLL".to_string());
                }
                // Rolls are numbered from 1 on the keypad.
                let roll = roll.checked_sub(1).ok_or("roll numbers start at 1")?;
                Self::Event(InputEvent::Select(Cell { frame, roll }))
            }
            "n" => Self::Event(InputEvent::Next),
            "d" => Self::Event(InputEvent::Delete),
            "c" => Self::Event(InputEvent::ClearAll),
            "=" => Self::Compute,
            "?" | "h" | "help" => Self::Help,
            "q" | "quit" => Self::Quit,
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Event(InputEvent::Key(c)),
                    _ => return Err(format!("unknown command '{key}' (? for help)")),
                }
            }
        };

        if parts.next().is_some() {
            return Err(format!("unexpected input after '{head}'"));
        }
        Ok(Some(command))
    }
}

fn parse_index(part: Option<&str>, what: &str) -> std::result::Result<usize, String> {
    part.ok_or_else(|| format!("missing {what} number"))?
        .parse()
        .map_err(|_| format!("invalid {what} number"))
}

/// An interactive entry session.
#[derive(Debug)]
pub struct Session<R, W> {
    input: R,
    output: W,
    state: CollectorState,
    result: Option<ScoreResult>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session reading commands from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            state: CollectorState::new(),
            result: None,
        }
    }

    /// Current collector state.
    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    /// Run until `q` or end of input.
    ///
    /// Returns the last computed score, provided the grid has not changed
    /// since it was computed.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails;
    /// bad commands and rejected frames are reported and the session
    /// continues.
    pub fn run(mut self) -> Result<Option<ScoreResult>> {
        writeln!(self.output, "{HELP}")?;
        self.render()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command)?,
                Err(message) => writeln!(self.output, "error: {message}")?,
            }
        }

        Ok(self.result)
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Event(event) => {
                debug!(?event, "keypad event");
                match self.state.apply(event) {
                    Ok(next) => {
                        if next.frames() != self.state.frames() {
                            self.result = None;
                        }
                        self.state = next;
                        self.render()?;
                    }
                    Err(err) => writeln!(self.output, "error: {err}")?,
                }
            }
            Command::Compute => match validate(&self.state.frames()) {
                Ok(frames) => {
                    let result = score(&frames);
                    writeln!(
                        self.output,
                        "score: {} (strikes: {}, spares: {})",
                        result.total, result.strikes, result.spares
                    )?;
                    self.result = Some(result);
                }
                Err(err) => writeln!(self.output, "error: {err}")?,
            },
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let grid = render_grid(&self.state);
        writeln!(self.output, "{grid}")?;
        Ok(())
    }
}

/// Draw the grid on two lines: frame numbers, then cells.
///
/// Empty cells show as `.`; the active cell is bracketed.
#[must_use]
pub fn render_grid(state: &CollectorState) -> String {
    let mut header = String::new();
    let mut cells = String::new();

    for frame in 1..=FRAME_COUNT {
        let mut block = String::new();
        for roll in 0..max_rolls(frame) {
            let cell = Cell { frame, roll };
            let mark = state.get(cell).map_or('.', |r| r.as_char());
            if state.active() == Some(cell) {
                block.push_str(&format!("[{mark}]"));
            } else {
                block.push_str(&format!(" {mark} "));
            }
        }
        header.push_str(&format!("|{frame:^width$}", width = block.len()));
        cells.push('|');
        cells.push_str(&block);
    }
    header.push('|');
    cells.push('|');

    format!("{header}\n{cells}")
}
