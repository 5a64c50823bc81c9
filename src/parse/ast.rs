use crate::common::*;
use crate::roll::RollError;
use std::fmt;

/// A parsed roll expression. Construction is fail-fast: anything that can be
/// rejected without rolling (too many directives, one-sided dice, degenerate
/// sequences) is rejected here.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(NumberLiteral),
    Dice(DiceRoll),
    Binary(BinaryOp),
    List(ListRepeat),
    Sequence(Sequence),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => fmt::Display::fmt(x, f),
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Binary(x) => fmt::Display::fmt(x, f),
            Self::List(x) => fmt::Display::fmt(x, f),
            Self::Sequence(x) => fmt::Display::fmt(x, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NumberKind {
    /// Strictly positive whole numbers; the only kind usable where the
    /// grammar wants a natural number.
    PositiveInteger,
    Integer,
    Float,
}

/// A numeric literal, kept as raw text so the rendered token matches the
/// input exactly (`".67"`, `"007"`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub raw: String,
    pub kind: NumberKind,
}

impl NumberLiteral {
    pub fn new(raw: impl Into<String>, kind: NumberKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceRoll {
    pub num: Num,
    pub sides: Sides,
    pub directives: Vec<Directive>,
}

impl DiceRoll {
    pub fn new(num: Num, sides: Sides, directives: Vec<Directive>) -> Result<Self, RollError> {
        if let Sides::Poly(n) = sides {
            if n.get() < 2 {
                return Err(RollError::validation("a die must have at least two faces"));
            }
        }

        let mut keep_count: Option<u64> = None;
        let mut drop_total: u64 = 0;
        for d in &directives {
            match d.action {
                DirectiveAction::Keep => {
                    if keep_count.is_some() {
                        return Err(RollError::validation(
                            "at most one keep directive is allowed per roll",
                        ));
                    }
                    keep_count = Some(d.count as u64);
                }
                DirectiveAction::Drop => drop_total += d.count as u64,
            }
        }
        if drop_total + keep_count.unwrap_or(0) > num.get() as u64 {
            return Err(RollError::validation(
                "keep/drop directives select more dice than were rolled",
            ));
        }

        Ok(Self {
            num,
            sides,
            directives,
        })
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num, self.sides)?;
        for d in &self.directives {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl BinaryOp {
    pub fn new(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, &self.left, self.op, false)?;
        write!(f, " {} ", self.op)?;
        fmt_operand(f, &self.right, self.op, true)
    }
}

// Re-parenthesizes children whose operator binds looser than the parent's
// (or equally, on the right) so the canonical text parses back the same way.
fn fmt_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expression,
    parent: BinaryOperator,
    is_right: bool,
) -> fmt::Result {
    match operand {
        Expression::Binary(child)
            if child.op.precedence() < parent.precedence()
                || (is_right && child.op.precedence() == parent.precedence()) =>
        {
            write!(f, "({})", child)
        }
        other => fmt::Display::fmt(other, f),
    }
}

/// Repetition of a body expression, `"6 3d6"`. A single bare expression is
/// the degenerate case with no count, which still truncates a scalar result
/// to a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRepeat {
    pub count: Option<Box<Expression>>,
    pub body: Box<Expression>,
}

impl ListRepeat {
    pub fn single(body: Expression) -> Self {
        Self {
            count: None,
            body: Box::new(body),
        }
    }

    pub fn repeated(count: Expression, body: Expression) -> Self {
        Self {
            count: Some(Box::new(count)),
            body: Box::new(body),
        }
    }
}

impl fmt::Display for ListRepeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = &self.count {
            match &**count {
                Expression::Binary(x) => write!(f, "({})", x)?,
                other => fmt::Display::fmt(other, f)?,
            }
            f.write_str(" ")?;
        }
        fmt::Display::fmt(&self.body, f)
    }
}

/// Comma-separated expressions evaluated independently, `"1d20+5, 2d4"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub items: Vec<Expression>,
}

impl Sequence {
    pub fn new(items: Vec<Expression>) -> Result<Self, RollError> {
        if items.len() < 2 {
            return Err(RollError::validation(
                "a sequence needs at least two expressions",
            ));
        }
        Ok(Self { items })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            fmt::Display::fmt(item, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: u32) -> Num {
        Num::new(n).unwrap()
    }

    fn poly(n: u32) -> Sides {
        Sides::Poly(NonZeroUInt::new(n).unwrap())
    }

    #[test]
    fn rejects_one_sided_dice() {
        assert!(DiceRoll::new(num(3), poly(1), vec![]).is_err());
        assert!(DiceRoll::new(num(3), poly(2), vec![]).is_ok());
        assert!(DiceRoll::new(num(3), Sides::Fudge, vec![]).is_ok());
    }

    #[test]
    fn rejects_multiple_keeps() {
        let directives = vec![
            Directive::keep(Extremity::High, 1),
            Directive::keep(Extremity::Low, 1),
        ];
        assert!(DiceRoll::new(num(4), poly(6), directives).is_err());
    }

    #[test]
    fn rejects_oversubscribed_directives() {
        // dl1 + dh1 + kh2 asks for all four dice; that is the boundary.
        let at_boundary = vec![
            Directive::drop(Extremity::Low, 1),
            Directive::drop(Extremity::High, 1),
            Directive::keep(Extremity::High, 2),
        ];
        assert!(DiceRoll::new(num(4), poly(6), at_boundary.clone()).is_ok());
        assert!(DiceRoll::new(num(3), poly(6), at_boundary).is_err());
        assert!(DiceRoll::new(
            num(3),
            poly(6),
            vec![Directive::drop(Extremity::Low, 4)]
        )
        .is_err());
    }

    #[test]
    fn sequences_need_two_items() {
        let one = Expression::Number(NumberLiteral::new("1", NumberKind::PositiveInteger));
        assert!(Sequence::new(vec![one.clone()]).is_err());
        assert!(Sequence::new(vec![one.clone(), one]).is_ok());
    }

    #[test]
    fn canonical_text() {
        let dice = DiceRoll::new(
            num(4),
            poly(6),
            vec![Directive::drop(Extremity::Low, 1)],
        )
        .unwrap();
        assert_eq!(dice.to_string(), "4d6dl1");

        let sum = BinaryOp::new(
            BinaryOperator::Mul,
            Expression::Number(NumberLiteral::new("2", NumberKind::PositiveInteger)),
            Expression::Binary(BinaryOp::new(
                BinaryOperator::Add,
                Expression::Number(NumberLiteral::new("3", NumberKind::PositiveInteger)),
                Expression::Number(NumberLiteral::new("4", NumberKind::PositiveInteger)),
            )),
        );
        assert_eq!(sum.to_string(), "2 * (3 + 4)");
    }
}
