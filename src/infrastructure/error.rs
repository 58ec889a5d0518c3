//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Errors from driving a session through the terminal.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Reading an explore event from stdin failed.
    #[error("cannot read explore event at line {line}")]
    EventInput {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Event input failure at 1-based `line`.
    pub fn event_input(line: usize, source: std::io::Error) -> Self {
        Self::EventInput { line, source }
    }
}
