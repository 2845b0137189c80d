//! Error types for the lease converter.
//!
//! Only setup and I/O failures are errors. Out-of-order statements in the
//! leases file are reported as [`crate::parser::Warning`]s instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The settings file could not be read.
    #[error("could not read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// The leases file could not be opened for reading.
    #[error("could not open leases file {} for reading: {source}", path.display())]
    OpenLeases {
        path: PathBuf,
        source: std::io::Error,
    },

    /// One of the destination files could not be opened for writing.
    #[error("could not open {} for writing: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
