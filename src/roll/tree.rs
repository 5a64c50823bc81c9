use super::error::RollError;
use super::num::{Number, Value};
use super::stringify::{Stringify, TextStringifier};
use crate::common::*;
use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderFormat {
    Text,
    Json,
}

/// Shared accessors of every result node.
#[enum_dispatch::enum_dispatch]
pub trait ResultInfo {
    /// Canonical text of the sub-expression this result was computed from.
    fn token(&self) -> &str;

    /// The already-computed value. Rendering and re-reading never re-roll.
    fn value(&self) -> Value;
}

/// One node of the immutable evaluation trace. The tree mirrors the
/// expression that produced it, with every random outcome baked in.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(ResultInfo)]
pub enum ResultNode {
    Number(NumberResult),
    Dice(DiceResult),
    BinaryOp(BinaryOpResult),
    List(ListResult),
    Sequence(SequenceResult),
}

impl ResultNode {
    pub fn raw_result(&self) -> Value {
        self.value()
    }

    pub fn render(&self, format: RenderFormat) -> String {
        match format {
            RenderFormat::Text => TextStringifier::new().stringify(self),
            RenderFormat::Json => super::json::to_json(self).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberResult {
    pub token: String,
    pub value: Number,
}

impl NumberResult {
    pub(crate) fn new(token: impl Into<String>, value: Number) -> Self {
        Self {
            token: token.into(),
            value,
        }
    }
}

impl ResultInfo for NumberResult {
    fn token(&self) -> &str {
        &self.token
    }

    fn value(&self) -> Value {
        Value::Number(self.value)
    }
}

/// The trace of one dice roll: every face drawn, in draw order, plus the
/// kept/dropped split the directives produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DiceResult {
    pub token: String,
    pub rolls: NonEmpty<Int>,
    /// Face value to how many copies of it were kept.
    pub kept: BTreeMap<Int, UInt>,
    pub dropped: BTreeMap<Int, UInt>,
    pub total: Int,
    pub(crate) keep_applied: bool,
}

impl DiceResult {
    pub(crate) fn new(
        token: String,
        rolls: NonEmpty<Int>,
        directives: &[Directive],
    ) -> Result<Self, RollError> {
        let mut sorted: Vec<Int> = rolls.iter().copied().collect();
        sorted.sort_unstable();

        // Drop directives narrow a window over the sorted outcomes; a keep
        // directive then selects from one end of what is left.
        let mut lo = 0usize;
        let mut hi = sorted.len();
        for d in directives {
            if d.action != DirectiveAction::Drop {
                continue;
            }
            let n = d.count as usize;
            if n > hi - lo {
                return Err(RollError::validation(
                    "keep/drop directives select more dice than were rolled",
                ));
            }
            match d.extreme {
                Extremity::Low => lo += n,
                Extremity::High => hi -= n,
            }
        }

        let keep = directives
            .iter()
            .find(|d| d.action == DirectiveAction::Keep);
        let (sel_lo, sel_hi) = match keep {
            None => (lo, hi),
            Some(k) => {
                let n = k.count as usize;
                if n > hi - lo {
                    return Err(RollError::validation(
                        "keep/drop directives select more dice than were rolled",
                    ));
                }
                match k.extreme {
                    Extremity::Low => (lo, lo + n),
                    Extremity::High => (hi - n, hi),
                }
            }
        };

        let mut kept = BTreeMap::new();
        let mut dropped = BTreeMap::new();
        for (i, &face) in sorted.iter().enumerate() {
            let bucket = if (sel_lo..sel_hi).contains(&i) {
                &mut kept
            } else {
                &mut dropped
            };
            *bucket.entry(face).or_insert(0) += 1;
        }
        let total = sorted[sel_lo..sel_hi].iter().sum();

        Ok(Self {
            token,
            rolls,
            kept,
            dropped,
            total,
            keep_applied: keep.is_some(),
        })
    }
}

impl ResultInfo for DiceResult {
    fn token(&self) -> &str {
        &self.token
    }

    fn value(&self) -> Value {
        Value::Number(Number::Int(self.total))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpResult {
    pub token: String,
    pub op: BinaryOperator,
    pub left: Box<ResultNode>,
    pub right: Box<ResultNode>,
    pub value: Number,
}

impl ResultInfo for BinaryOpResult {
    fn token(&self) -> &str {
        &self.token
    }

    fn value(&self) -> Value {
        Value::Number(self.value)
    }
}

/// The trace of a repetition: the evaluated count and one child per
/// iteration. A zero or negative count leaves `items` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub token: String,
    pub count: Box<ResultNode>,
    pub items: Vec<ResultNode>,
    pub value: Value,
    /// Whether the repetition was a bare expression rather than written
    /// with a count. An explicit `"1 3d6"` is not implicit.
    pub(crate) implicit: bool,
}

impl ResultInfo for ListResult {
    fn token(&self) -> &str {
        &self.token
    }

    fn value(&self) -> Value {
        self.value.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceResult {
    pub token: String,
    pub items: Vec<ResultNode>,
    pub value: Value,
}

impl ResultInfo for SequenceResult {
    fn token(&self) -> &str {
        &self.token
    }

    fn value(&self) -> Value {
        self.value.clone()
    }
}
