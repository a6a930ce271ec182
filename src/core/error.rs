//! Error types for the editing core

use thiserror::Error;

use crate::expression::ExpressionError;

/// Main error type for the editing core
///
/// Every variant is recoverable: a command boundary turns it into a message
/// for the user and carries on.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid region transform or selector input. The region is left untouched.
    #[error("Invalid region operation: {0}")]
    Geometry(String),

    /// The session's change budget ran out mid-operation. Changes made before
    /// the abort stay applied and recorded.
    #[error("Change limit of {limit} blocks reached ({affected} blocks changed before stopping)")]
    ChangeBudgetExceeded {
        limit: usize,
        affected: usize,
    },

    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// The block bag could not supply these materials (block id, missing count).
    #[error("Missing materials: {}", format_missing(.missing))]
    MaterialUnavailable {
        missing: Vec<(u16, usize)>,
    },

    #[error("{0}")]
    MissingState(&'static str),

    /// Pre-flight bound check failed before any work was done.
    #[error("Maximum {what} is {max} (requested {requested})")]
    LimitExceeded {
        what: &'static str,
        requested: f64,
        max: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_missing(missing: &[(u16, usize)]) -> String {
    missing
        .iter()
        .map(|(id, count)| format!("{} x{}", crate::block::id::name(*id), count))
        .collect::<Vec<_>>()
        .join(", ")
}
