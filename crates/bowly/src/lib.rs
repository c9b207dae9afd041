//! `bowly` - A personal bowling score tracker
//!
//! This library provides game record storage, trend statistics, coaching
//! suggestions and backup files on top of the `bowly-frames` scoring core.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod session;
pub mod stats;
pub mod storage;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{GameRecord, NewGame};
pub use stats::{Statistics, Suggestion};
pub use storage::{Removed, Storage};
