pub mod ast;
mod lexer;
mod parser;
pub mod visit;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind};

pub fn parse(s: &str) -> Result<ast::Expression, crate::Error> {
    parser::Parser::new(s).parse()
}
