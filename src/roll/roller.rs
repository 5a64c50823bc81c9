use crate::common::{Int, Sides};
use rand::Rng;

/// Source of die outcomes. Implemented for every [`rand::Rng`], so a seeded
/// generator or a scripted stand-in can be injected wherever randomness is
/// drawn.
pub trait Roller {
    fn roll_die(&mut self, sides: Sides) -> Int;
}

impl<R: Rng> Roller for R {
    fn roll_die(&mut self, sides: Sides) -> Int {
        match sides {
            Sides::Poly(n) => self.gen_range(1..=n.get() as Int),
            // Fudge dice are two-valued: -1 or +1, never 0.
            Sides::Fudge => {
                if self.gen::<bool>() {
                    1
                } else {
                    -1
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) use script::ScriptRoller;

#[cfg(test)]
mod script {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of outcomes and records which dice were
    /// asked for, in order.
    pub(crate) struct ScriptRoller {
        values: VecDeque<Int>,
        pub rolled: Vec<Sides>,
    }

    impl ScriptRoller {
        pub fn new(values: impl IntoIterator<Item = Int>) -> Self {
            Self {
                values: values.into_iter().collect(),
                rolled: Vec::new(),
            }
        }
    }

    impl Roller for ScriptRoller {
        fn roll_die(&mut self, sides: Sides) -> Int {
            self.rolled.push(sides);
            self.values.pop_front().expect("roll script exhausted")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn poly_rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let sides = Sides::Poly(crate::common::NonZeroUInt::new(6).unwrap());
        for _ in 0..1000 {
            let x = rng.roll_die(sides);
            assert!((1..=6).contains(&x));
        }
    }

    #[test]
    fn fudge_rolls_are_two_valued() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(rng.roll_die(Sides::Fudge));
        }
        assert_eq!(seen, [-1, 1].into_iter().collect());
    }

    #[test]
    fn seeded_rolls_are_reproducible() {
        let sides = Sides::Poly(crate::common::NonZeroUInt::new(20).unwrap());
        let mut a = StdRng::seed_from_u64(90210);
        let mut b = StdRng::seed_from_u64(90210);
        for _ in 0..50 {
            assert_eq!(a.roll_die(sides), b.roll_die(sides));
        }
    }
}
