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

use class_alloc_core::prelude::Cost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub hard: i64,
    pub soft: Cost,
}

impl std::fmt::Display for ScoreDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScoreDelta(hard: {}, soft: {})", self.hard, self.soft)
    }
}

impl ScoreDelta {
    #[inline]
    pub const fn new(hard: i64, soft: Cost) -> Self {
        Self { hard, soft }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { hard: 0, soft: 0 }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.hard == 0 && self.soft == 0
    }

    /// `true` if the delta makes the score lexicographically worse.
    #[inline]
    pub fn is_worsening(&self) -> bool {
        self.hard > 0 || (self.hard == 0 && self.soft > 0)
    }
}

impl std::ops::Add for ScoreDelta {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            hard: self
                .hard
                .checked_add(rhs.hard)
                .expect("hard delta addition overflowed"),
            soft: self
                .soft
                .checked_add(rhs.soft)
                .expect("soft delta addition overflowed"),
        }
    }
}

impl std::ops::AddAssign for ScoreDelta {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Hard violations and weighted soft cost. Ordered lexicographically:
/// fewer hard violations always wins, soft cost breaks ties.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub hard: usize,
    pub soft: Cost,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score(hard: {}, soft: {})", self.hard, self.soft)
    }
}

impl Score {
    #[inline]
    pub const fn new(hard: usize, soft: Cost) -> Self {
        Self { hard, soft }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { hard: 0, soft: 0 }
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }

    /// Returns `self` with `delta` applied.
    ///
    /// Panics
    ///
    /// - Panics if the hard count would drop below zero or overflow.
    /// - Panics if the soft cost overflows.
    #[inline]
    pub fn apply_delta(&self, delta: &ScoreDelta) -> Self {
        let hard = isize::try_from(delta.hard).expect("hard delta does not fit in isize");
        Self {
            hard: self
                .hard
                .checked_add_signed(hard)
                .expect("attempt to add/subtract with overflow"),
            soft: self
                .soft
                .checked_add(delta.soft)
                .expect("attempt to add with overflow"),
        }
    }

    /// Scalar energy `hard * big_m + soft`, saturating.
    #[inline]
    pub fn energy(&self, big_m: Cost) -> Cost {
        let hard = Cost::try_from(self.hard).unwrap_or(Cost::MAX);
        hard.saturating_mul(big_m).saturating_add(self.soft)
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.hard.cmp(&other.hard) {
            std::cmp::Ordering::Equal => self.soft.cmp(&other.soft),
            ord => ord,
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score {
            hard: self.hard + rhs.hard,
            soft: self.soft + rhs.soft,
        }
    }
}

impl std::ops::AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        self.hard += rhs.hard;
        self.soft += rhs.soft;
    }
}

impl std::ops::Add<ScoreDelta> for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: ScoreDelta) -> Score {
        self.apply_delta(&rhs)
    }
}

/// `self - rhs` as the delta leading from `rhs` to `self`.
impl std::ops::Sub for Score {
    type Output = ScoreDelta;

    #[inline]
    fn sub(self, rhs: Score) -> ScoreDelta {
        ScoreDelta {
            hard: self.hard as i64 - rhs.hard as i64,
            soft: self.soft - rhs.soft,
        }
    }
}
