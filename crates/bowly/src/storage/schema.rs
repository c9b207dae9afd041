//! `SQLite` schema definitions for bowly.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the games table.
pub const CREATE_GAMES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS games (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    score INTEGER NOT NULL CHECK (score BETWEEN 0 AND 300),
    strikes INTEGER NOT NULL DEFAULT 0,
    spares INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
)
";

/// SQL statement to create an index on date for ordered listing.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_games_date ON games(date, created_at)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_GAMES_TABLE,
    CREATE_DATE_INDEX,
    CREATE_METADATA_TABLE,
];
