use super::error::RollError;
use crate::common::*;
use std::fmt;

/// A scalar result: integer or floating point.
#[derive(Debug, Copy, Clone)]
pub enum Number {
    Int(Int),
    Float(Float),
}

impl Number {
    pub(crate) const ZERO: Self = Self::Int(0);

    /// Truncates toward zero, like an `as` cast: `-3.5` becomes `-3`.
    pub fn as_int(self) -> Int {
        match self {
            Self::Int(x) => x,
            Self::Float(x) => x as Int,
        }
    }

    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }

    pub(crate) fn truncate(self) -> Self {
        Self::Int(self.as_int())
    }
}

macro_rules! val_impl_bin_op {
    ($Name:ident, $fn_name:ident) => {
        impl std::ops::$Name for Number {
            type Output = Self;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                match (self, rhs) {
                    (Self::Int(x), Self::Int(y)) => Self::Int(x.$fn_name(y)),
                    (x, y) => Self::Float(x.as_float().$fn_name(y.as_float())),
                }
            }
        }
    };
}

val_impl_bin_op!(Add, add);
val_impl_bin_op!(Sub, sub);
val_impl_bin_op!(Mul, mul);

/// Applies an arithmetic operator. Division always happens in floating
/// point, and dividing by exactly zero is a runtime error.
pub(crate) fn apply_binary(op: BinaryOperator, l: Number, r: Number) -> Result<Number, RollError> {
    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Sub => Ok(l - r),
        BinaryOperator::Mul => Ok(l * r),
        BinaryOperator::Div => {
            if r == Number::ZERO {
                Err(RollError::DivisionByZero)
            } else {
                Ok(Number::Float(l.as_float() / r.as_float()))
            }
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.as_float().eq(&other.as_float())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_float().partial_cmp(&other.as_float())
    }
}

impl From<Int> for Number {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            // Debug keeps the trailing ".0" on whole floats.
            Self::Float(x) => fmt::Debug::fmt(x, f),
        }
    }
}

impl serde::Serialize for Number {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(x) => serializer.serialize_i64(*x),
            Self::Float(x) => serializer.serialize_f64(*x),
        }
    }
}

/// The value a result node carries: a scalar or an arbitrarily nested list.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    List(Vec<Value>),
}

impl Value {
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(x) => Some(*x),
            Self::List(_) => None,
        }
    }

    /// Scalars are truncated at list boundaries; nested lists pass through.
    pub(crate) fn truncate_scalar(self) -> Self {
        match self {
            Self::Number(x) => Self::Number(x.truncate()),
            list @ Self::List(_) => list,
        }
    }
}

impl From<Number> for Value {
    fn from(x: Number) -> Self {
        Self::Number(x)
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::Number(Number::Int(x))
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::Number(Number::Float(x))
    }
}

impl From<Vec<Value>> for Value {
    fn from(x: Vec<Value>) -> Self {
        Self::List(x)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => fmt::Display::fmt(x, f),
            Self::List(items) => {
                f.write_str("[")?;
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(x) => x.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
        }
    }
}
