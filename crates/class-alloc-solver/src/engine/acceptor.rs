// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::eval::score::Score;
use class_alloc_core::prelude::Cost;
use rand::Rng;

pub trait Acceptor {
    fn name(&self) -> &str;
    fn accept(&self, current: &Score, new: &Score) -> bool;
}

impl std::fmt::Display for dyn Acceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Strict lexicographic improvement; used for the incumbent.
#[derive(Debug, Default, Clone)]
pub struct LexStrictAcceptor;

impl Acceptor for LexStrictAcceptor {
    fn name(&self) -> &str {
        "LexStrictAcceptor"
    }

    #[inline]
    fn accept(&self, cur: &Score, cand: &Score) -> bool {
        cand < cur
    }
}

/// Lexicographically no worse; sideways moves are taken.
#[derive(Debug, Default, Clone)]
pub struct LexNonWorseningAcceptor;

impl Acceptor for LexNonWorseningAcceptor {
    fn name(&self) -> &str {
        "LexNonWorseningAcceptor"
    }

    #[inline]
    fn accept(&self, cur: &Score, cand: &Score) -> bool {
        cand <= cur
    }
}

/// Collapses a score to `hard * big_m + soft`. With `big_m` above every
/// attainable soft cost the energy order agrees with the lexicographic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnergyAcceptor {
    big_m: Cost,
}

impl Default for EnergyAcceptor {
    fn default() -> Self {
        Self {
            big_m: 1_000_000_000,
        }
    }
}

impl EnergyAcceptor {
    #[inline]
    pub fn new(big_m: Cost) -> Self {
        Self::default().with_big_m(big_m)
    }

    #[inline]
    pub fn with_big_m(mut self, big_m: Cost) -> Self {
        self.big_m = big_m.max(1);
        self
    }

    #[inline]
    pub fn big_m(&self) -> Cost {
        self.big_m
    }

    #[inline]
    pub fn energy(&self, s: &Score) -> Cost {
        s.energy(self.big_m)
    }

    /// Metropolis test on the energy difference between `cur` and `cand`.
    #[inline]
    pub fn metropolis<R: Rng>(&self, rng: &mut R, cur: &Score, cand: &Score, temp: f64) -> bool {
        let delta = self.energy(cand).saturating_sub(self.energy(cur));
        metropolis(rng, delta, temp)
    }
}

impl Acceptor for EnergyAcceptor {
    fn name(&self) -> &str {
        "EnergyAcceptor"
    }

    #[inline]
    fn accept(&self, cur: &Score, new: &Score) -> bool {
        self.energy(new) < self.energy(cur)
    }
}

/// Accepts non-positive deltas, otherwise with probability `exp(-delta / temp)`.
#[inline]
pub fn metropolis<R: Rng>(rng: &mut R, delta_energy: Cost, temp: f64) -> bool {
    if delta_energy <= 0 {
        return true;
    }
    if temp <= 0.0 {
        return false;
    }
    let p = (-(delta_energy as f64) / temp).exp();
    rng.random::<f64>() < p
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_lex_acceptors() {
        let a = Score::new(1, 10);
        let b = Score::new(0, 50);
        assert!(LexStrictAcceptor.accept(&a, &b));
        assert!(!LexStrictAcceptor.accept(&b, &b));
        assert!(LexNonWorseningAcceptor.accept(&b, &b));
        assert!(!LexNonWorseningAcceptor.accept(&b, &a));
        let dyn_acc: &dyn Acceptor = &LexStrictAcceptor;
        assert_eq!(dyn_acc.to_string(), "LexStrictAcceptor");
    }

    #[test]
    fn test_energy_respects_big_m() {
        let acc = EnergyAcceptor::new(100);
        assert_eq!(acc.energy(&Score::new(2, 30)), 230);
        assert!(acc.accept(&Score::new(1, 0), &Score::new(0, 99)));
        assert_eq!(EnergyAcceptor::new(-5).big_m(), 1);
    }

    #[test]
    fn test_metropolis_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(metropolis(&mut rng, -3, 1.0));
        assert!(metropolis(&mut rng, 0, 1e-9));
        assert!(!metropolis(&mut rng, 1, 0.0));

        let hot = (0..2_000).filter(|_| metropolis(&mut rng, 1, 1_000.0)).count();
        let cold = (0..2_000).filter(|_| metropolis(&mut rng, 50, 1.0)).count();
        assert!(hot > 1_900);
        assert_eq!(cold, 0);
    }

    #[test]
    fn test_metropolis_never_takes_hard_increase_at_low_temperature() {
        let acc = EnergyAcceptor::new(1_000);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let cur = Score::new(0, 900);
        let cand = Score::new(1, 0);
        assert!(!(0..1_000).any(|_| acc.metropolis(&mut rng, &cur, &cand, 1.0)));
    }
}
