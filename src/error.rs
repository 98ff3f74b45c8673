use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Failure to turn a raw status payload into something the formatter can read.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("status payload is empty")]
    Empty,

    #[error("status payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Errors raised while acquiring a status payload from a server.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("jar file not found: {}", .0.display())]
    JarNotFound(PathBuf),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("command succeeded but produced no output")]
    EmptyOutput,

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Status(#[from] StatusError),
}
