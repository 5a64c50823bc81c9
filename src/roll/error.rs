use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RollError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("cannot divide by zero")]
    DivisionByZero,
}

impl RollError {
    pub(crate) fn validation(msg: impl ToString) -> Self {
        Self::Validation(msg.to_string())
    }
}
