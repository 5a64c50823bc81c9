pub use crate::parse::ParseError;
pub use crate::roll::RollError;

/// Any failure the interpreter surfaces: a syntax error from the parser, or
/// a validation/arithmetic error from construction and evaluation.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Roll(#[from] RollError),
}
