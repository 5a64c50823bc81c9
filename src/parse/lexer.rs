use crate::common::*;
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[0-9]*\.[0-9]+")]
    Float,

    #[regex(r"([1-9][0-9]*)?[dD]([1-9][0-9]*|[fF])")]
    Dice,
    #[regex(r"[kdKD][hlHL][0-9]+")]
    Directive,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    // Whitespace separates adjacent expressions into repetition lists, so it
    // is a real token rather than skipped trivia.
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[error]
    Error,
}

impl TokenKind {
    pub const ADDITION_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const MULTIPLICATION_OPS: &'static [Self] = &[Self::Star, Self::Slash];

    /// Tokens that can begin an expression.
    pub const EXPR_START: &'static [Self] = &[
        Self::Integer,
        Self::Float,
        Self::Dice,
        Self::Minus,
        Self::LeftParen,
    ];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Float => "<float>",
            Dice => "<dice>",
            Directive => "<directive>",
            LeftParen => "'('",
            RightParen => "')'",
            Comma => "','",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Whitespace => "<whitespace>",
            Error => "<error>",
        }
    }

    pub fn as_binary_op(&self) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub text: &'a str,
}

/// Tokenizes the whole input up front. List separation needs lookahead past
/// whitespace runs, which is awkward over a streaming lexer.
pub fn lex(s: &str) -> Vec<Token<'_>> {
    let mut lexer = TokenKind::lexer(s);
    let mut tokens = Vec::new();
    while let Some(kind) = lexer.next() {
        tokens.push(Token {
            kind,
            span: lexer.span(),
            text: lexer.slice(),
        });
    }
    tokens
}

// The token shape is guaranteed by the lexer; `None` only means a numeric
// part overflowed its integer type.
pub(super) fn dice_token(s: &str) -> Option<(Num, Sides)> {
    let (num, sides) = s.split_once(|c| c == 'd' || c == 'D')?;
    let num = if num.is_empty() {
        Num::new(1)?
    } else {
        num.parse().ok()?
    };
    let sides = sides.parse().ok()?;
    Some((num, sides))
}

pub(super) fn directive_token(s: &str) -> Option<Directive> {
    let mut chars = s.chars();
    let action = match chars.next()?.to_ascii_lowercase() {
        'k' => DirectiveAction::Keep,
        _ => DirectiveAction::Drop,
    };
    let extreme = match chars.next()?.to_ascii_lowercase() {
        'h' => Extremity::High,
        _ => Extremity::Low,
    };
    let count = chars.as_str().parse().ok()?;
    Some(Directive::new(action, extreme, count))
}
