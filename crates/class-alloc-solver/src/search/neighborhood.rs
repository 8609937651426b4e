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

use crate::{
    engine::err::ConfigurationError,
    model::{index::ClassIndex, solver_model::SolverModel},
    state::{
        moves::{Change, Move},
        solution_state::SolutionState,
    },
};
use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Another time alternative for one class, room kept.
    Retime,
    /// Another room alternative for one class, time kept.
    Reroom,
    /// Two classes exchange their time pattern or their room.
    Swap,
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveKind::Retime => write!(f, "Retime"),
            MoveKind::Reroom => write!(f, "Reroom"),
            MoveKind::Swap => write!(f, "Swap"),
        }
    }
}

/// Relative sampling weights of the move kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveKindWeights {
    retime: f64,
    reroom: f64,
    swap: f64,
}

impl Default for MoveKindWeights {
    fn default() -> Self {
        Self {
            retime: 0.6,
            reroom: 0.3,
            swap: 0.1,
        }
    }
}

impl MoveKindWeights {
    #[inline]
    pub fn new(retime: f64, reroom: f64, swap: f64) -> Self {
        Self {
            retime,
            reroom,
            swap,
        }
    }

    #[inline]
    pub fn with_retime(mut self, w: f64) -> Self {
        self.retime = w;
        self
    }

    #[inline]
    pub fn with_reroom(mut self, w: f64) -> Self {
        self.reroom = w;
        self
    }

    #[inline]
    pub fn with_swap(mut self, w: f64) -> Self {
        self.swap = w;
        self
    }

    #[inline]
    pub fn retime(&self) -> f64 {
        self.retime
    }

    #[inline]
    pub fn reroom(&self) -> f64 {
        self.reroom
    }

    #[inline]
    pub fn swap(&self) -> f64 {
        self.swap
    }

    /// Weights must be finite and non-negative with a positive sum.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let all = [self.retime, self.reroom, self.swap];
        let valid = all.iter().all(|w| w.is_finite() && *w >= 0.0) && all.iter().sum::<f64>() > 0.0;
        if valid {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidMoveWeights(*self))
        }
    }
}

impl std::fmt::Display for MoveKindWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MoveKindWeights(retime: {}, reroom: {}, swap: {})",
            self.retime, self.reroom, self.swap
        )
    }
}

/// Draws random moves over the declared alternatives of a model.
#[derive(Debug, Clone)]
pub struct NeighborhoodGenerator<'m> {
    model: &'m SolverModel<'m>,
    weights: MoveKindWeights,
    kinds: WeightedIndex<f64>,
    retimeable: Vec<ClassIndex>,
    reroomable: Vec<ClassIndex>,
}

impl<'m> NeighborhoodGenerator<'m> {
    pub fn new(
        model: &'m SolverModel<'m>,
        weights: MoveKindWeights,
    ) -> Result<Self, ConfigurationError> {
        weights.validate()?;
        let kinds = WeightedIndex::new([weights.retime, weights.reroom, weights.swap])
            .map_err(|_| ConfigurationError::InvalidMoveWeights(weights))?;

        let classes = (0..model.classes_len()).map(ClassIndex);
        let retimeable = classes
            .clone()
            .filter(|&c| model.times(c).len() > 1)
            .collect();
        let reroomable = classes
            .filter(|&c| model.room_alternatives(c).len() > 1)
            .collect();

        Ok(Self {
            model,
            weights,
            kinds,
            retimeable,
            reroomable,
        })
    }

    #[inline]
    pub fn weights(&self) -> MoveKindWeights {
        self.weights
    }

    /// `true` when no class has a second time or room alternative, so only
    /// swaps remain possible.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.retimeable.is_empty() && self.reroomable.is_empty()
    }

    #[inline]
    pub fn sample_kind<R: Rng>(&self, rng: &mut R) -> MoveKind {
        match self.kinds.sample(rng) {
            0 => MoveKind::Retime,
            1 => MoveKind::Reroom,
            _ => MoveKind::Swap,
        }
    }

    /// A random move, or `None` if the drawn kind has nothing to offer
    /// from the current state.
    pub fn propose<R: Rng>(&self, state: &SolutionState<'_>, rng: &mut R) -> Option<Move> {
        let mv = match self.sample_kind(rng) {
            MoveKind::Retime => self.retime(state, rng),
            MoveKind::Reroom => self.reroom(state, rng),
            MoveKind::Swap => self.swap(state, rng),
        };
        debug_assert!(mv.as_ref().is_none_or(|m| self.is_declared(m)));
        mv
    }

    pub fn retime<R: Rng>(&self, state: &SolutionState<'_>, rng: &mut R) -> Option<Move> {
        let c = pick(&self.retimeable, rng)?;
        let from = state.choice(c);
        let time = other_than(from.time(), self.model.times(c).len(), rng);
        Some(Move::single(Change::new(c, from, from.with_time(time))))
    }

    pub fn reroom<R: Rng>(&self, state: &SolutionState<'_>, rng: &mut R) -> Option<Move> {
        let c = pick(&self.reroomable, rng)?;
        let from = state.choice(c);
        let current = from.room()?;
        let room = other_than(current, self.model.room_alternatives(c).len(), rng);
        Some(Move::single(Change::new(c, from, from.with_room(Some(room)))))
    }

    /// Exchanges time patterns when each class declares the other's current
    /// pattern, otherwise rooms when each class accepts the other's room.
    pub fn swap<R: Rng>(&self, state: &SolutionState<'_>, rng: &mut R) -> Option<Move> {
        let n = self.model.classes_len();
        if n < 2 {
            return None;
        }
        let a = ClassIndex(rng.random_range(0..n));
        let b = ClassIndex(other_than(a.0, n, rng));
        let (ca, cb) = (state.choice(a), state.choice(b));
        let (pa, pb) = (state.pattern(a), state.pattern(b));

        if !pa.same_meetings(pb) {
            let ta = self.model.times(a).iter().position(|t| t.same_meetings(pb));
            let tb = self.model.times(b).iter().position(|t| t.same_meetings(pa));
            if let (Some(ta), Some(tb)) = (ta, tb) {
                return Some(Move::pair(
                    Change::new(a, ca, ca.with_time(ta)),
                    Change::new(b, cb, cb.with_time(tb)),
                ));
            }
        }

        let (ra, rb) = (state.room(a)?, state.room(b)?);
        if ra == rb {
            return None;
        }
        let oa = self
            .model
            .room_alternatives(a)
            .iter()
            .position(|x| x.room() == rb)?;
        let ob = self
            .model
            .room_alternatives(b)
            .iter()
            .position(|x| x.room() == ra)?;
        Some(Move::pair(
            Change::new(a, ca, ca.with_room(Some(oa))),
            Change::new(b, cb, cb.with_room(Some(ob))),
        ))
    }

    fn is_declared(&self, mv: &Move) -> bool {
        mv.changes().iter().all(|ch| {
            let c = ch.class();
            let to = ch.to();
            to.time() < self.model.times(c).len()
                && match to.room() {
                    Some(o) => o < self.model.room_alternatives(c).len(),
                    None => !self.model.requires_room(c),
                }
        })
    }
}

#[inline]
fn pick<R: Rng>(classes: &[ClassIndex], rng: &mut R) -> Option<ClassIndex> {
    if classes.is_empty() {
        None
    } else {
        Some(classes[rng.random_range(0..classes.len())])
    }
}

/// Uniform index in `0..len` different from `current`; `len` must be at
/// least 2.
#[inline]
fn other_than<R: Rng>(current: usize, len: usize, rng: &mut R) -> usize {
    debug_assert!(len >= 2 && current < len);
    let i = rng.random_range(0..len - 1);
    if i >= current { i + 1 } else { i }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::moves::Choice,
        test_support::{cid, random_problem, rid, single_subpart_course, tp, two_course_problem},
    };
    use class_alloc_model::prelude::{
        ClassSpec, OptimizationWeights, ProblemBuilder, Room, RoomOption, TimeGrid,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_weights_validation() {
        assert!(MoveKindWeights::default().validate().is_ok());
        assert!(MoveKindWeights::new(1.0, 0.0, 0.0).validate().is_ok());
        assert!(MoveKindWeights::new(0.0, 0.0, 0.0).validate().is_err());
        assert!(MoveKindWeights::new(-1.0, 2.0, 0.0).validate().is_err());
        assert!(MoveKindWeights::new(f64::NAN, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_moves_reference_declared_alternatives_and_differ() {
        let p = random_problem(21, 12);
        let model = SolverModel::from_problem(&p).unwrap();
        let gen_ = NeighborhoodGenerator::new(&model, MoveKindWeights::new(1.0, 1.0, 1.0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut state = SolutionState::initialize(&model, 5);

        let mut produced = 0;
        for _ in 0..2_000 {
            let Some(mv) = gen_.propose(&state, &mut rng) else {
                continue;
            };
            produced += 1;
            assert!(gen_.is_declared(&mv));
            for ch in mv.changes() {
                assert_eq!(state.choice(ch.class()), ch.from());
                assert_ne!(ch.from(), ch.to());
                assert_eq!(ch.to().room().is_some(), model.requires_room(ch.class()));
            }
            state.apply_move(&mv);
        }
        assert!(produced > 500);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_only_retime_when_weighted_so() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let gen_ = NeighborhoodGenerator::new(&model, MoveKindWeights::new(1.0, 0.0, 0.0)).unwrap();
        let state = SolutionState::initialize(&model, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let mv = gen_.propose(&state, &mut rng).unwrap();
            assert_eq!(mv.len(), 1);
            let ch = mv.changes()[0];
            assert_ne!(ch.from().time(), ch.to().time());
            assert_eq!(ch.from().room(), ch.to().room());
        }
    }

    #[test]
    fn test_reroom_never_touches_roomless_classes() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let gen_ = NeighborhoodGenerator::new(&model, MoveKindWeights::new(0.0, 1.0, 0.0)).unwrap();
        let state = SolutionState::initialize(&model, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            let mv = gen_.propose(&state, &mut rng).unwrap();
            assert_ne!(mv.changes()[0].class(), ClassIndex(2));
        }
    }

    #[test]
    fn test_swap_exchanges_rooms() {
        let class = |id| {
            ClassSpec::new(cid(id))
                .with_times([tp("10000", 0, 2, 0)])
                .with_rooms([RoomOption::new(rid(1), 0), RoomOption::new(rid(2), 0)])
        };
        let mut b = ProblemBuilder::new("swap", TimeGrid::new(5, 12, 2))
            .with_weights(OptimizationWeights::new(1, 1, 1, 1));
        b.add_room(Room::new(rid(1), 10))
            .add_room(Room::new(rid(2), 10))
            .add_course(single_subpart_course(1, vec![class(1), class(2)]));
        let p = b.build().unwrap();
        let model = SolverModel::from_problem(&p).unwrap();
        let gen_ = NeighborhoodGenerator::new(&model, MoveKindWeights::new(0.0, 0.0, 1.0)).unwrap();
        let state = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(1))],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mv = gen_.propose(&state, &mut rng).unwrap();
        assert_eq!(mv.len(), 2);
        for ch in mv.changes() {
            assert_eq!(ch.from().time(), ch.to().time());
            assert_eq!(ch.to().room(), ch.from().room().map(|r| 1 - r));
        }
    }

    #[test]
    fn test_swap_declines_without_common_alternatives() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let gen_ = NeighborhoodGenerator::new(&model, MoveKindWeights::new(0.0, 0.0, 1.0)).unwrap();
        // Class 3 has no room and shares no pattern with the others.
        let state = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(0)), Choice::new(0, None)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            assert!(gen_.propose(&state, &mut rng).is_none());
        }
    }
}
