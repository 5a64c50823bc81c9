mod ctx;
mod error;
mod json;
mod num;
mod roller;
mod stringify;
mod tree;

use crate::parse::ast;

type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext};
pub use error::RollError;
pub use num::{Number, Value};
pub use roller::Roller;
pub use stringify::{Stringify, TextStringifier};
pub use tree::{
    BinaryOpResult, DiceResult, ListResult, NumberResult, RenderFormat, ResultInfo, ResultNode,
    SequenceResult,
};

pub fn eval<R: Roller>(expr: &ast::Expression, roller: R) -> RResult<ResultNode> {
    RollContext::new(roller).eval(expr)
}
