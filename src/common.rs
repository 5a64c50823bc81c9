use std::fmt::{self, Write};
use std::num::NonZeroU32;
use std::str::FromStr;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

/// The number of dice in a roll. A roll always throws at least one die.
pub type Num = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// The face set of a die: a polyhedral die numbered `1..=n`, or the
/// two-valued fudge die showing `-1` or `+1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sides {
    Poly(NonZeroUInt),
    Fudge,
}

impl Sides {
    pub fn low(&self) -> Int {
        match self {
            Self::Poly(_) => 1,
            Self::Fudge => -1,
        }
    }

    pub fn high(&self) -> Int {
        match self {
            Self::Poly(n) => n.get() as Int,
            Self::Fudge => 1,
        }
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poly(n) => fmt::Display::fmt(n, f),
            Self::Fudge => f.write_char('f'),
        }
    }
}

impl From<NonZeroUInt> for Sides {
    fn from(n: NonZeroUInt) -> Self {
        Self::Poly(n)
    }
}

impl FromStr for Sides {
    type Err = <NonZeroUInt as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("f") {
            Ok(Self::Fudge)
        } else {
            s.parse().map(Self::Poly)
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// Binding strength; `*` and `/` bind tighter than `+` and `-`.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DirectiveAction {
    Keep,
    Drop,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Extremity {
    High,
    Low,
}

/// A keep/drop modifier narrowing which drawn values count toward a roll's
/// total, e.g. `dl1` (drop the lowest die) or `kh3` (keep the three highest).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Directive {
    pub action: DirectiveAction,
    pub extreme: Extremity,
    pub count: UInt,
}

impl Directive {
    pub fn new(action: DirectiveAction, extreme: Extremity, count: UInt) -> Self {
        Self {
            action,
            extreme,
            count,
        }
    }

    pub fn keep(extreme: Extremity, count: UInt) -> Self {
        Self::new(DirectiveAction::Keep, extreme, count)
    }

    pub fn drop(extreme: Extremity, count: UInt) -> Self {
        Self::new(DirectiveAction::Drop, extreme, count)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            DirectiveAction::Keep => 'k',
            DirectiveAction::Drop => 'd',
        };
        let extreme = match self.extreme {
            Extremity::High => 'h',
            Extremity::Low => 'l',
        };
        write!(f, "{}{}{}", action, extreme, self.count)
    }
}
