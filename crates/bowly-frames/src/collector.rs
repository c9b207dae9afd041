//! Guided keypad entry.
//!
//! The collector is a small state machine over the ten-frame grid. It is a
//! plain `Copy` value: every event is applied with [`CollectorState::apply`],
//! which takes the current state and returns the next one. A rejected event
//! returns an [`InputError`] and the caller simply keeps its previous state.
//!
//! ```
//! use bowly_frames::{Cell, CollectorState, InputEvent};
//!
//! let state = CollectorState::new()
//!     .apply(InputEvent::Select(Cell::new(3, 0).unwrap()))
//!     .and_then(|s| s.apply(InputEvent::Key('x')))
//!     .unwrap();
//! assert_eq!(state.active(), Some(Cell { frame: 4, roll: 0 }));
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::error::InputError;
use crate::frame::{max_rolls, FrameGrid, FRAME_COUNT, LAST_FRAME};
use crate::token::Roll;

/// Roll slots reserved per frame (the tenth frame uses all three).
const SLOTS: usize = 3;

/// One entry cell: a frame number (1-10) and a roll index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Frame number, 1-10.
    pub frame: usize,
    /// Roll index within the frame, starting at 0.
    pub roll: usize,
}

impl Cell {
    /// Create a cell, checking that it exists on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidCell`] for a frame outside 1-10 or a
    /// roll index beyond the frame's limit.
    pub fn new(frame: usize, roll: usize) -> Result<Self, InputError> {
        let cell = Self { frame, roll };
        if cell.exists() {
            Ok(cell)
        } else {
            Err(InputError::InvalidCell { frame, roll })
        }
    }

    /// Check if this cell is part of the grid.
    #[must_use]
    pub fn exists(self) -> bool {
        (1..=FRAME_COUNT).contains(&self.frame) && self.roll < max_rolls(self.frame)
    }

    /// The next cell in entry order, ignoring what has been entered.
    ///
    /// Returns `None` at the last roll of the tenth frame.
    #[must_use]
    pub fn following(self) -> Option<Self> {
        if self.frame < LAST_FRAME {
            if self.roll == 0 {
                Some(Self { roll: 1, ..self })
            } else {
                Some(Self {
                    frame: self.frame + 1,
                    roll: 0,
                })
            }
        } else {
            Self::new(self.frame, self.roll + 1).ok()
        }
    }

    fn first_of_next_frame(self) -> Option<Self> {
        Self::new(self.frame + 1, 0).ok()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {} roll {}", self.frame, self.roll + 1)
    }
}

/// An action routed from the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Make a cell the active one.
    Select(Cell),
    /// A keypad key; written to the active cell, then focus auto-advances.
    Key(char),
    /// Move focus forward without writing.
    Next,
    /// Clear the active cell, keeping focus.
    Delete,
    /// Clear every cell and deselect.
    ClearAll,
}

/// Grid contents plus the active cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorState {
    cells: [[Option<Roll>; SLOTS]; FRAME_COUNT],
    active: Option<Cell>,
}

impl CollectorState {
    /// An empty grid with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active cell, or `None` when idle.
    #[must_use]
    pub fn active(&self) -> Option<Cell> {
        self.active
    }

    /// Check if no cell is selected.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// The token stored in a cell, if any.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<Roll> {
        if cell.exists() {
            self.cells[cell.frame - 1][cell.roll]
        } else {
            None
        }
    }

    /// Snapshot the entered rolls as a frame grid.
    ///
    /// Each frame keeps its non-empty cells in roll order; gaps are
    /// dropped, so a frame with only its second cell filled yields a
    /// single-roll frame.
    #[must_use]
    pub fn frames(&self) -> FrameGrid {
        let frames = std::array::from_fn(|idx| self.cells[idx].iter().flatten().copied().collect());
        FrameGrid::from_frames(frames)
    }

    /// Apply one event and return the resulting state.
    ///
    /// `Next` and `Delete` are ignored while idle.
    ///
    /// # Errors
    ///
    /// - [`InputError::InvalidCell`] when selecting a cell off the grid.
    /// - [`InputError::NoActiveCell`] for a key press while idle.
    /// - [`InputError::InvalidKey`] for a key outside `[0-9Xx/]`.
    pub fn apply(mut self, event: InputEvent) -> Result<Self, InputError> {
        match event {
            InputEvent::Select(cell) => {
                if !cell.exists() {
                    return Err(InputError::InvalidCell {
                        frame: cell.frame,
                        roll: cell.roll,
                    });
                }
                self.active = Some(cell);
            }
            InputEvent::Key(key) => {
                let cell = self.active.ok_or(InputError::NoActiveCell)?;
                let roll = Roll::from_char(key).ok_or(InputError::InvalidKey(key))?;
                self.cells[cell.frame - 1][cell.roll] = Some(roll);
                self.active = Some(self.advance_after(cell, roll));
                debug!(%cell, %roll, "roll entered");
            }
            InputEvent::Next => {
                if let Some(cell) = self.active {
                    self.active = Some(cell.following().unwrap_or(cell));
                }
            }
            InputEvent::Delete => {
                if let Some(cell) = self.active {
                    self.cells[cell.frame - 1][cell.roll] = None;
                }
            }
            InputEvent::ClearAll => {
                self = Self::new();
            }
        }
        trace!(?event, active = ?self.active, "collector transition");
        Ok(self)
    }

    /// Where focus goes after writing `roll` into `cell`.
    ///
    /// When the computed cell does not exist focus stays on `cell`.
    fn advance_after(&self, cell: Cell, roll: Roll) -> Cell {
        let next = if cell.frame == LAST_FRAME {
            (cell.roll + 1..max_rolls(LAST_FRAME))
                .find(|&r| self.cells[LAST_FRAME - 1][r].is_none())
                .map(|roll| Cell { roll, ..cell })
        } else {
            match (cell.roll, roll) {
                (0, Roll::Strike) => cell.first_of_next_frame(),
                (0, Roll::Digit(_)) => Some(Cell { roll: 1, ..cell }),
                (0, Roll::Spare) => None,
                _ => cell.first_of_next_frame(),
            }
        };
        next.unwrap_or(cell)
    }
}
