use super::num::{self, Number, Value};
use super::roller::Roller;
use super::tree::*;
use super::{RResult, RollError};
use crate::common::*;
use crate::parse::{
    ast,
    visit::{self, Accept},
};

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Walks an expression and produces its result tree. All randomness is
/// drawn from the injected roller, in a single left-to-right stream.
pub struct RollContext<R = DefaultRoller> {
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(roller: R) -> Self {
        Self { roller }
    }

    pub fn eval(&mut self, expr: &ast::Expression) -> RResult<ResultNode> {
        expr.accept(self)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

// Upper bound on a repetition count. The count comes straight from user
// input, so a typo must fail instead of stalling evaluation or overflowing
// the result allocation.
const MAX_REPEAT: Int = 100_000;

fn scalar_operand(node: &ResultNode) -> RResult<Number> {
    node.value()
        .as_number()
        .ok_or_else(|| RollError::validation("expected a number, found a list"))
}

impl<R: Roller> visit::AstVisitor for RollContext<R> {
    type Output = RResult<ResultNode>;

    fn visit_number(&mut self, lit: &ast::NumberLiteral) -> Self::Output {
        let value = match lit.kind {
            ast::NumberKind::Float => lit
                .raw
                .parse::<Float>()
                .map(Number::Float)
                .map_err(|_| RollError::validation(format!("invalid number {:?}", lit.raw)))?,
            ast::NumberKind::Integer => lit
                .raw
                .parse::<Int>()
                .map(Number::Int)
                .map_err(|_| RollError::validation(format!("invalid number {:?}", lit.raw)))?,
            ast::NumberKind::PositiveInteger => {
                let x = lit
                    .raw
                    .parse::<Int>()
                    .map_err(|_| RollError::validation(format!("invalid number {:?}", lit.raw)))?;
                if x <= 0 {
                    return Err(RollError::validation(format!(
                        "expected a positive number, found {}",
                        x
                    )));
                }
                Number::Int(x)
            }
        };
        Ok(ResultNode::Number(NumberResult::new(lit.to_string(), value)))
    }

    fn visit_dice(&mut self, dice: &ast::DiceRoll) -> Self::Output {
        let first = self.roller.roll_die(dice.sides);
        let mut rolls = NonEmpty::new(first);
        for _ in 1..dice.num.get() {
            rolls.push(self.roller.roll_die(dice.sides));
        }
        Ok(ResultNode::Dice(DiceResult::new(
            dice.to_string(),
            rolls,
            &dice.directives,
        )?))
    }

    fn visit_binary(&mut self, bin: &ast::BinaryOp) -> Self::Output {
        // Operands evaluate left to right; that order is part of the
        // randomness contract.
        let left = bin.left.accept(self)?;
        let right = bin.right.accept(self)?;
        let l = scalar_operand(&left)?;
        let r = scalar_operand(&right)?;
        let value = num::apply_binary(bin.op, l, r)?;
        Ok(ResultNode::BinaryOp(BinaryOpResult {
            token: bin.to_string(),
            op: bin.op,
            left: Box::new(left),
            right: Box::new(right),
            value,
        }))
    }

    fn visit_list(&mut self, list: &ast::ListRepeat) -> Self::Output {
        let token = list.to_string();
        let implicit = list.count.is_none();
        let (count, n) = match &list.count {
            // A bare expression is an implicit single repetition. It still
            // passes the list boundary, so a scalar result is truncated.
            None => (
                ResultNode::Number(NumberResult::new("1", Number::Int(1))),
                1,
            ),
            Some(count_expr) => {
                let count = count_expr.accept(self)?;
                let n = scalar_operand(&count)?.as_int();
                (count, n)
            }
        };

        if n > MAX_REPEAT {
            return Err(RollError::validation(format!(
                "repetition count {} is too large (limit {})",
                n, MAX_REPEAT
            )));
        }

        // A non-positive count yields an empty list; the body is never
        // evaluated, so no dice are drawn for it.
        let mut items = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            items.push(list.body.accept(self)?);
        }
        let value = Value::List(
            items
                .iter()
                .map(|item| item.value().truncate_scalar())
                .collect(),
        );

        // The degenerate single-item list collapses to its item's value.
        let value = match (&list.count, value) {
            (None, Value::List(mut v)) => match v.pop() {
                Some(only) => only,
                None => Value::List(v),
            },
            (_, v) => v,
        };

        Ok(ResultNode::List(ListResult {
            token,
            count: Box::new(count),
            items,
            value,
            implicit,
        }))
    }

    fn visit_sequence(&mut self, seq: &ast::Sequence) -> Self::Output {
        if seq.items.len() < 2 {
            return Err(RollError::validation(
                "a sequence needs at least two expressions",
            ));
        }
        let items: Vec<ResultNode> = seq
            .items
            .iter()
            .map(|item| item.accept(self))
            .collect::<RResult<_>>()?;
        let value = Value::List(items.iter().map(ResultInfo::value).collect());
        Ok(ResultNode::Sequence(SequenceResult {
            token: seq.to_string(),
            items,
            value,
        }))
    }
}
