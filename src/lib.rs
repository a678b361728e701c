//! Breakout groups - parameter file handling for breakout session planning.
//!
//! This library provides the core functionality for the `bgroups` CLI tool:
//! a versioned parameter file that is created on first run, migrated when
//! its schema changes, and resolved into typed [`config::EventParams`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

use std::path::PathBuf;

use config::{ParseValueError, SyntaxError};


/// Library-level error type for breakout-groups operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed parameter file {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Invalid value for [{section}] {field}: {source}")]
    Decode {
        section: String,
        field: String,
        #[source]
        source: ParseValueError,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Binding error: {0}")]
    Binding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for breakout-groups operations.
pub type Result<T> = std::result::Result<T, Error>;
