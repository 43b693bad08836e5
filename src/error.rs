use thiserror::Error;

use crate::models::movement::Approach;

pub type Result<T> = std::result::Result<T, ControlError>;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("rotation order must not be empty")]
    EmptyOrder,

    #[error("rotation order lists {0} more than once")]
    DuplicateApproach(Approach),

    #[error("unknown approach '{0}'")]
    UnknownApproach(String),

    #[error("unknown turn '{0}'")]
    UnknownTurn(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown timing field '{0}'")]
    UnknownField(String),

    #[error("settings storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("phase log error: {0}")]
    Csv(#[from] csv::Error),
}
