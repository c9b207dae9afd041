//! `bowly-frames` - Frame-based bowling scoring
//!
//! This crate holds the pure scoring core of bowly: the roll tokenizer, the
//! ten-frame grid, the guided keypad collector that fills it, the frame
//! validator and the cumulative score calculator.
//!
//! ```
//! use bowly_frames::{score, validate, FrameGrid};
//!
//! let grid = FrameGrid::parse_notation("X,X,X,X,X,X,X,X,X,XXX").unwrap();
//! let result = score(&validate(&grid).unwrap());
//! assert_eq!(result.total, 300);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod collector;
pub mod error;
pub mod frame;
pub mod score;
pub mod token;
pub mod validate;

pub use collector::{Cell, CollectorState, InputEvent};
pub use error::{FrameError, InputError};
pub use frame::{max_rolls, FrameGrid, FRAME_COUNT, LAST_FRAME};
pub use score::{expand_rolls, score, ScoreResult};
pub use token::Roll;
pub use validate::{validate, ValidatedFrames};
