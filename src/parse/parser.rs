use super::ast::*;
use super::lexer::{self, Token, TokenKind};
use crate::common::*;
use crate::error::Error;
use std::fmt;
use std::ops::Range;

type PResult<T> = Result<T, Error>;

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("syntax error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, PartialEq)]
pub enum ParseErrorKind {
    EmptyInput,
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    TrailingInput,
    NumberOutOfRange,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("empty roll string"),
            Self::UnexpectedToken { found, expected } => {
                match found {
                    Some(kind) => write!(f, "found {}, expected ", kind)?,
                    None => f.write_str("unexpected end of input, expected ")?,
                }
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                f.write_str("expected ")?;
                fmt_expected(expected, f)
            }
            Self::TrailingInput => f.write_str("unexpected input after a complete expression"),
            Self::NumberOutOfRange => f.write_str("number is out of range"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = expected.len();

    if expected.is_empty() {
        Ok(())
    } else if len == 1 {
        f.write_str(expected[0].as_str())
    } else if len == 2 {
        write!(f, "{} or {}", expected[0].as_str(), expected[1].as_str())
    } else {
        for exp in &expected[..len - 1] {
            write!(f, "{}, ", exp.as_str())?;
        }
        write!(f, "or {}", expected[len - 1].as_str())
    }
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            source: s,
            tokens: lexer::lex(s),
            pos: 0,
        }
    }

    pub fn parse(mut self) -> PResult<Expression> {
        if self.tokens.iter().all(|t| t.kind == TokenKind::Whitespace) {
            return Err(Error::Parse(ParseError {
                kind: ParseErrorKind::EmptyInput,
                span: 0..self.source.len(),
                slice: self.source.to_string(),
            }));
        }

        self.skip_ws();
        let first = Expression::List(self.parse_list_expr()?);
        self.skip_ws();

        if !self.matches(TokenKind::Comma) {
            self.expect_end()?;
            return Ok(first);
        }

        let mut items = vec![first];
        while self.matches(TokenKind::Comma) {
            self.pos += 1;
            self.skip_ws();
            items.push(Expression::List(self.parse_list_expr()?));
            self.skip_ws();
        }
        self.expect_end()?;
        Ok(Expression::Sequence(Sequence::new(items)?))
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn skip_ws(&mut self) {
        while self.matches(TokenKind::Whitespace) {
            self.pos += 1;
        }
    }

    /// Index of the next non-whitespace token at or after `self.pos`.
    fn peek_past_ws(&self) -> usize {
        let mut i = self.pos;
        while matches!(
            self.tokens.get(i).map(|t| t.kind),
            Some(TokenKind::Whitespace)
        ) {
            i += 1;
        }
        i
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.unexpected(vec![expected])
        }
    }

    fn expect_end(&mut self) -> PResult<()> {
        if self.pos < self.tokens.len() {
            Err(self.token_error(self.pos, ParseErrorKind::TrailingInput))
        } else {
            Ok(())
        }
    }

    fn token_error(&self, at: usize, kind: ParseErrorKind) -> Error {
        let (span, slice) = match self.tokens.get(at) {
            Some(t) => (t.span.clone(), t.text.to_string()),
            None => (self.source.len()..self.source.len(), String::new()),
        };
        Error::Parse(ParseError { kind, span, slice })
    }

    fn unexpected<T>(&self, expected: Vec<TokenKind>) -> PResult<T> {
        self.unexpected_at(self.pos, expected)
    }

    fn unexpected_at<T>(&self, at: usize, expected: Vec<TokenKind>) -> PResult<T> {
        let found = self.tokens.get(at).map(|t| t.kind);
        let kind = match found {
            Some(TokenKind::Error) => ParseErrorKind::UnexpectedString { expected },
            _ => ParseErrorKind::UnexpectedToken { found, expected },
        };
        Err(self.token_error(at, kind))
    }

    // Whitespace between two complete expressions is the list separator:
    // "6 3d6" repeats. A `-` after whitespace is always the binary operator,
    // so "5 - 2" subtracts rather than starting a list.
    fn parse_list_expr(&mut self) -> PResult<ListRepeat> {
        let first = self.parse_addition()?;
        if self.at_list_sep() {
            self.skip_ws();
            let rest = self.parse_list_expr()?;
            Ok(ListRepeat::repeated(first, Expression::List(rest)))
        } else {
            Ok(ListRepeat::single(first))
        }
    }

    fn at_list_sep(&self) -> bool {
        if !self.matches(TokenKind::Whitespace) {
            return false;
        }
        matches!(
            self.tokens.get(self.peek_past_ws()).map(|t| t.kind),
            Some(
                TokenKind::Integer | TokenKind::Float | TokenKind::Dice | TokenKind::LeftParen
            )
        )
    }

    fn parse_addition(&mut self) -> PResult<Expression> {
        let mut lhs = self.parse_multiplication()?;

        while let Some(op) = self.eat_binary_op(TokenKind::ADDITION_OPS) {
            self.skip_ws();
            let rhs = self.parse_multiplication()?;
            lhs = Expression::Binary(BinaryOp::new(op, lhs, rhs));
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult<Expression> {
        let mut lhs = self.parse_atom()?;

        while let Some(op) = self.eat_binary_op(TokenKind::MULTIPLICATION_OPS) {
            self.skip_ws();
            let rhs = self.parse_atom()?;
            lhs = Expression::Binary(BinaryOp::new(op, lhs, rhs));
        }

        Ok(lhs)
    }

    fn eat_binary_op(&mut self, options: &[TokenKind]) -> Option<BinaryOperator> {
        let i = self.peek_past_ws();
        let kind = self.tokens.get(i)?.kind;
        if options.contains(&kind) {
            self.pos = i + 1;
            kind.as_binary_op()
        } else {
            None
        }
    }

    fn parse_atom(&mut self) -> PResult<Expression> {
        match self.peek_kind() {
            Some(TokenKind::Integer) => {
                let t = self.bump();
                let kind = if t.text.bytes().any(|b| b != b'0') {
                    NumberKind::PositiveInteger
                } else {
                    NumberKind::Integer
                };
                Ok(Expression::Number(NumberLiteral::new(t.text, kind)))
            }
            Some(TokenKind::Float) => {
                let t = self.bump();
                Ok(Expression::Number(NumberLiteral::new(
                    t.text,
                    NumberKind::Float,
                )))
            }
            Some(TokenKind::Minus) => self.parse_negative(),
            Some(TokenKind::Dice) => self.parse_dice(),
            Some(TokenKind::LeftParen) => {
                self.pos += 1;
                self.skip_ws();
                let inner = self.parse_addition()?;
                self.skip_ws();
                self.consume(TokenKind::RightParen)?;
                Ok(inner)
            }
            _ => self.unexpected(TokenKind::EXPR_START.to_vec()),
        }
    }

    // The sign must touch the digits; "- 5" and "-3d6" are syntax errors.
    fn parse_negative(&mut self) -> PResult<Expression> {
        let next = self.tokens.get(self.pos + 1).map(|t| t.kind);
        let kind = match next {
            Some(TokenKind::Integer) => NumberKind::Integer,
            Some(TokenKind::Float) => NumberKind::Float,
            _ => {
                return self
                    .unexpected_at(self.pos + 1, vec![TokenKind::Integer, TokenKind::Float])
            }
        };
        self.pos += 1;
        let t = self.bump();
        Ok(Expression::Number(NumberLiteral::new(
            format!("-{}", t.text),
            kind,
        )))
    }

    fn parse_dice(&mut self) -> PResult<Expression> {
        let t = self.bump();
        let (num, sides) = lexer::dice_token(t.text)
            .ok_or_else(|| self.token_error(self.pos - 1, ParseErrorKind::NumberOutOfRange))?;

        // Directives may trail the dice across whitespace: "4d6 dl1 kh2".
        let mut directives = Vec::new();
        loop {
            let i = self.peek_past_ws();
            let text = match self.tokens.get(i) {
                Some(tok) if tok.kind == TokenKind::Directive => tok.text,
                _ => break,
            };
            let directive = lexer::directive_token(text)
                .ok_or_else(|| self.token_error(i, ParseErrorKind::NumberOutOfRange))?;
            directives.push(directive);
            self.pos = i + 1;
        }

        Ok(Expression::Dice(DiceRoll::new(num, sides, directives)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! dice {
        ($num:literal, $sides:literal $(; $($d:expr),+)?) => {
            Expression::Dice(
                DiceRoll::new(
                    Num::new($num).unwrap(),
                    Sides::Poly(NonZeroUInt::new($sides).unwrap()),
                    vec![$($($d),+)?],
                )
                .unwrap(),
            )
        };
        ($num:literal, f $(; $($d:expr),+)?) => {
            Expression::Dice(
                DiceRoll::new(Num::new($num).unwrap(), Sides::Fudge, vec![$($($d),+)?]).unwrap(),
            )
        };
    }

    fn parse(s: &str) -> PResult<Expression> {
        Parser::new(s).parse()
    }

    fn check(s: &str, expected: Expression) {
        assert_eq!(parse(s).unwrap(), expected, "input: {:?}", s);
    }

    fn check_fails(s: &str) {
        assert!(parse(s).is_err(), "{:?} should be rejected", s);
    }

    fn nat(raw: &str) -> Expression {
        Expression::Number(NumberLiteral::new(raw, NumberKind::PositiveInteger))
    }

    fn int(raw: &str) -> Expression {
        Expression::Number(NumberLiteral::new(raw, NumberKind::Integer))
    }

    fn float(raw: &str) -> Expression {
        Expression::Number(NumberLiteral::new(raw, NumberKind::Float))
    }

    fn bin(l: Expression, op: BinaryOperator, r: Expression) -> Expression {
        Expression::Binary(BinaryOp::new(op, l, r))
    }

    fn single(body: Expression) -> Expression {
        Expression::List(ListRepeat::single(body))
    }

    fn repeated(count: Expression, body: Expression) -> Expression {
        Expression::List(ListRepeat::repeated(count, body))
    }

    #[test]
    fn test_parse_numbers() {
        check("32", single(nat("32")));
        check("0", single(int("0")));
        check("3.2", single(float("3.2")));
        check(".67", single(float(".67")));
        check("-530", single(int("-530")));
        check("-3.14", single(float("-3.14")));
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", single(dice!(1, 20)));
        check("d4", single(dice!(1, 4)));
        check("4dF", single(dice!(4, f)));
        check("2df", single(dice!(2, f)));
        check(
            "2d20kh1",
            single(dice!(2, 20; Directive::keep(Extremity::High, 1))),
        );
        check(
            "4d6 dl1",
            single(dice!(4, 6; Directive::drop(Extremity::Low, 1))),
        );
        check(
            "10d10 dh2 kl2",
            single(dice!(
                10, 10;
                Directive::drop(Extremity::High, 2),
                Directive::keep(Extremity::Low, 2)
            )),
        );
    }

    #[test]
    fn test_parse_binary() {
        check("3+4", single(bin(nat("3"), BinaryOperator::Add, nat("4"))));
        check(
            "1 + 2 * 3",
            single(bin(
                nat("1"),
                BinaryOperator::Add,
                bin(nat("2"), BinaryOperator::Mul, nat("3")),
            )),
        );
        // Left associative: 1 - 2 - 3 is (1 - 2) - 3.
        check(
            "1-2-3",
            single(bin(
                bin(nat("1"), BinaryOperator::Sub, nat("2")),
                BinaryOperator::Sub,
                nat("3"),
            )),
        );
        // Binary minus wins over list separation.
        check("5 - 2", single(bin(nat("5"), BinaryOperator::Sub, nat("2"))));
        // 10-2 is subtraction, not "10" next to "-2".
        check("10-2", single(bin(nat("10"), BinaryOperator::Sub, nat("2"))));
    }

    #[test]
    fn test_parse_parens() {
        // Parens group and are pruned from the tree.
        check(
            "2*(3+4)",
            single(bin(
                nat("2"),
                BinaryOperator::Mul,
                bin(nat("3"), BinaryOperator::Add, nat("4")),
            )),
        );
        check("(3d6)", single(dice!(3, 6)));
        check("  3d6  ", single(dice!(3, 6)));
    }

    #[test]
    fn test_parse_lists() {
        check("6 2d6", repeated(nat("6"), single(dice!(2, 6))));
        check(
            "6 2d6+6",
            repeated(
                nat("6"),
                single(bin(dice!(2, 6), BinaryOperator::Add, nat("6"))),
            ),
        );
        check(
            "4 0 d8",
            repeated(nat("4"), repeated(int("0"), single(dice!(1, 8)))),
        );
        check(
            "1d4 + 2 6 2d6+6",
            repeated(
                bin(dice!(1, 4), BinaryOperator::Add, nat("2")),
                repeated(
                    nat("6"),
                    single(bin(dice!(2, 6), BinaryOperator::Add, nat("6"))),
                ),
            ),
        );
    }

    #[test]
    fn test_parse_sequences() {
        check(
            "1d20+5, 2d4",
            Expression::Sequence(
                Sequence::new(vec![
                    single(bin(dice!(1, 20), BinaryOperator::Add, nat("5"))),
                    single(dice!(2, 4)),
                ])
                .unwrap(),
            ),
        );
        check(
            "3 , 4,5",
            Expression::Sequence(
                Sequence::new(vec![single(nat("3")), single(nat("4")), single(nat("5"))]).unwrap(),
            ),
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        check_fails("");
        check_fails("   ");
        check_fails("d");
        check_fails("3d");
        check_fails("d+3");
        check_fails("3++4");
        check_fails("(3d6");
        check_fails("3d6)");
        check_fails("3 d 6");
        check_fails("-3d6");
        check_fails("+4");
        check_fails("- 5");
        check_fails("1d20,");
        check_fails("roll 3d6");
    }

    #[test]
    fn test_trailing_junk_is_reported_as_such() {
        fn kind(s: &str) -> ParseErrorKind {
            match parse(s).unwrap_err() {
                Error::Parse(e) => e.kind,
                other => panic!("expected a parse error for {:?}, got {:?}", s, other),
            }
        }
        assert_eq!(kind("3d6)"), ParseErrorKind::TrailingInput);
        assert_eq!(kind("3 d 6"), ParseErrorKind::TrailingInput);
        assert_eq!(kind("1d20 xyz"), ParseErrorKind::TrailingInput);
    }

    #[test]
    fn test_rejects_invalid_rolls_eagerly() {
        // Lexes fine but fails construction before anything is rolled.
        check_fails("3d1");
        check_fails("3d6 dl4");
        check_fails("99d100 kh10 kl20 dl30 dh40");
    }
}
