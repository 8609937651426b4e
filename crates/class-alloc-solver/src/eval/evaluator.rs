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
    eval::{
        distribution::{Placement, is_satisfied},
        score::{Score, ScoreDelta},
    },
    model::{index::ClassIndex, solver_model::SolverModel},
    state::{moves::Move, solution_state::SolutionState},
};
use class_alloc_core::prelude::Cost;
use class_alloc_model::prelude::OptimizationWeights;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-term totals of a full evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub room_overlaps: usize,
    pub student_overlaps: usize,
    pub capacity: usize,
    pub room_unavailable: usize,
    pub required_distributions: usize,
    pub time_penalty: Cost,
    pub room_penalty: Cost,
    pub distribution_penalty: Cost,
    pub student_penalty: Cost,
}

impl ScoreBreakdown {
    #[inline]
    pub fn hard(&self) -> usize {
        self.room_overlaps
            + self.student_overlaps
            + self.capacity
            + self.room_unavailable
            + self.required_distributions
    }

    #[inline]
    pub fn soft(&self) -> Cost {
        self.time_penalty + self.room_penalty + self.distribution_penalty + self.student_penalty
    }

    #[inline]
    pub fn score(&self) -> Score {
        Score::new(self.hard(), self.soft())
    }
}

impl std::fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hard {} (room overlaps {}, student overlaps {}, capacity {}, unavailable {}, \
             distributions {}), soft {} (time {}, room {}, distribution {}, student {})",
            self.hard(),
            self.room_overlaps,
            self.student_overlaps,
            self.capacity,
            self.room_unavailable,
            self.required_distributions,
            self.soft(),
            self.time_penalty,
            self.room_penalty,
            self.distribution_penalty,
            self.student_penalty
        )
    }
}

/// Scores a [`SolutionState`], either from scratch or restricted to the
/// terms that involve a given set of classes.
///
/// Every term is attached to one class, one unordered pair of classes or
/// one distribution, and every pair term is zero unless both classes meet
/// in a common (week, day) cell. The local score of a set of classes can
/// therefore find all its pair terms through the occupancy indices, and
/// `after - before` of the local score equals the change of the full score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintEvaluator {
    weights: OptimizationWeights,
}

impl ConstraintEvaluator {
    #[inline]
    pub fn new(weights: OptimizationWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn for_model(model: &SolverModel<'_>) -> Self {
        Self::new(model.weights())
    }

    #[inline]
    pub fn weights(&self) -> OptimizationWeights {
        self.weights
    }

    #[inline]
    pub fn evaluate(&self, state: &SolutionState<'_>) -> Score {
        self.breakdown(state).score()
    }

    /// Full evaluation over every class, pair of classes and distribution.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn breakdown(&self, state: &SolutionState<'_>) -> ScoreBreakdown {
        let model = state.model();
        let n = model.classes_len();
        let mut out = ScoreBreakdown::default();
        for a in 0..n {
            self.class_terms(state, ClassIndex(a), &mut out);
            for b in a + 1..n {
                self.pair_terms(state, ClassIndex(a), ClassIndex(b), &mut out);
            }
        }
        for d in 0..model.distributions().len() {
            self.distribution_terms(state, d, &mut out);
        }
        out
    }

    /// Sum of the terms involving at least one of `classes`.
    pub fn local_score(&self, state: &SolutionState<'_>, classes: &[ClassIndex]) -> Score {
        let model = state.model();
        let mut out = ScoreBreakdown::default();

        let mut own: SmallVec<[ClassIndex; 4]> = classes.iter().copied().collect();
        own.sort_unstable();
        own.dedup();

        let mut pairs: SmallVec<[(ClassIndex, ClassIndex); 32]> = SmallVec::new();
        let mut dists: SmallVec<[usize; 16]> = SmallVec::new();
        for &c in &own {
            self.class_terms(state, c, &mut out);
            dists.extend_from_slice(model.class_distributions(c));

            let room = state.room(c);
            let course = model.course(c);
            for cell in model.cells(state.pattern(c)) {
                let mut push = |other: ClassIndex| {
                    if other != c {
                        pairs.push(if c < other { (c, other) } else { (other, c) });
                    }
                };
                if let Some(r) = room {
                    state.room_occupants(r, cell).iter().copied().for_each(&mut push);
                }
                state
                    .course_occupants(course, cell)
                    .iter()
                    .copied()
                    .for_each(&mut push);
                for &k in model.course_neighbors(course) {
                    state.course_occupants(k, cell).iter().copied().for_each(&mut push);
                }
            }
        }

        pairs.sort_unstable();
        pairs.dedup();
        for &(a, b) in &pairs {
            self.pair_terms(state, a, b, &mut out);
        }

        dists.sort_unstable();
        dists.dedup();
        for &d in &dists {
            self.distribution_terms(state, d, &mut out);
        }
        out.score()
    }

    /// Applies `mv` to `state` and returns the resulting score change.
    /// The move stays applied; callers undo it on rejection.
    pub fn apply_scored(&self, state: &mut SolutionState<'_>, mv: &Move) -> ScoreDelta {
        let classes: SmallVec<[ClassIndex; 2]> = mv.classes().collect();
        let before = self.local_score(state, &classes);
        state.apply_move(mv);
        let after = self.local_score(state, &classes);
        after - before
    }

    /// Score change `mv` would cause, leaving `state` unchanged.
    pub fn move_delta(&self, state: &mut SolutionState<'_>, mv: &Move) -> ScoreDelta {
        let delta = self.apply_scored(state, mv);
        state.undo_move(mv);
        delta
    }

    fn class_terms(&self, state: &SolutionState<'_>, c: ClassIndex, out: &mut ScoreBreakdown) {
        let model = state.model();
        let choice = state.choice(c);
        let pattern = state.pattern(c);
        out.time_penalty += self.weights.time() * pattern.penalty() as Cost;

        if let Some(option) = choice.room() {
            let alt = model.room_alternative(c, option);
            out.room_penalty += self.weights.room() * alt.penalty() as Cost;
            if (model.room_capacity(alt.room()) as usize) < model.enrollment(c) {
                out.capacity += 1;
            }
            if !model.room_is_available(alt.room(), pattern) {
                out.room_unavailable += 1;
            }
        }
    }

    fn pair_terms(
        &self,
        state: &SolutionState<'_>,
        a: ClassIndex,
        b: ClassIndex,
        out: &mut ScoreBreakdown,
    ) {
        let model = state.model();
        let (pa, pb) = (state.pattern(a), state.pattern(b));
        if !pa.shares_day(pb) {
            return;
        }
        let overlap = pa.span().intersects(pb.span());
        let (ra, rb) = (state.room(a), state.room(b));

        if overlap && ra.is_some() && ra == rb {
            out.room_overlaps += 1;
        }

        let shared = model.shared_students(model.course(a), model.course(b));
        if shared == 0 {
            return;
        }
        if overlap {
            out.student_overlaps += shared;
        } else if let (Some(ra), Some(rb)) = (ra, rb)
            && let Some(gap) = pa.span().gap(pb.span())
            && gap < model.travel(ra, rb)
        {
            out.student_penalty += self.weights.student() * shared as Cost;
        }
    }

    fn distribution_terms(&self, state: &SolutionState<'_>, d: usize, out: &mut ScoreBreakdown) {
        let model = state.model();
        let entry = model.distribution(d);
        let placements: SmallVec<[Placement<'_>; 8]> = entry
            .classes()
            .iter()
            .map(|&c| Placement::new(state.pattern(c), state.room(c)))
            .collect();
        if is_satisfied(entry.kind(), &placements, |x, y| model.travel(x, y)) {
            return;
        }
        if entry.is_required() {
            out.required_distributions += 1;
        } else {
            out.distribution_penalty += self.weights.distribution() * entry.penalty() as Cost;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::index::RoomIndex,
        state::moves::{Change, Choice},
        test_support::{
            cid, random_problem, rid, room_clash_problem, single_subpart_course, student, tp,
            two_course_problem,
        },
    };
    use class_alloc_model::prelude::{ClassSpec, ProblemBuilder, Room, RoomOption, TimeGrid};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_full_evaluation_of_known_state() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let state = SolutionState::from_choices(
            &model,
            vec![
                Choice::new(0, Some(1)),
                Choice::new(0, Some(0)),
                Choice::new(0, None),
            ],
        );
        let b = ConstraintEvaluator::for_model(&model).breakdown(&state);
        assert_eq!(b.room_overlaps, 0);
        assert_eq!(b.student_overlaps, 3);
        assert_eq!(b.capacity, 1);
        assert_eq!(b.room_unavailable, 1);
        assert_eq!(b.required_distributions, 0);
        assert_eq!(b.time_penalty, 2);
        assert_eq!(b.room_penalty, 1);
        assert_eq!(b.distribution_penalty, 4);
        assert_eq!(b.student_penalty, 0);
        assert_eq!(b.score(), Score::new(5, 7));
    }

    #[test]
    fn test_room_clash_counts_one_violation() {
        let p = room_clash_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let eval = ConstraintEvaluator::for_model(&model);
        let mut state = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(0))],
        );
        let b = eval.breakdown(&state);
        assert_eq!(b.room_overlaps, 1);
        assert_eq!(b.score(), Score::new(1, 0));

        let mv = Move::single(Change::new(
            ClassIndex(1),
            Choice::new(0, Some(0)),
            Choice::new(1, Some(0)),
        ));
        let delta = eval.apply_scored(&mut state, &mv);
        assert_eq!(delta, ScoreDelta::new(-1, 0));
        assert_eq!(eval.evaluate(&state), Score::zero());
    }

    #[test]
    fn test_near_miss_needs_travel_longer_than_gap() {
        let a = ClassSpec::new(cid(1))
            .with_times([tp("10000", 0, 2, 0)])
            .with_rooms([RoomOption::new(rid(1), 0)]);
        let b = ClassSpec::new(cid(2))
            .with_times([tp("10000", 3, 2, 0)])
            .with_rooms([RoomOption::new(rid(1), 0), RoomOption::new(rid(2), 0)]);
        let mut builder = ProblemBuilder::new("travel", TimeGrid::new(5, 12, 2))
            .with_weights(OptimizationWeights::new(1, 1, 1, 2));
        builder
            .add_room(Room::new(rid(1), 10).with_travel([(rid(2), 2)]))
            .add_room(Room::new(rid(2), 10))
            .add_course(single_subpart_course(1, vec![a, b]))
            .extend_students([student(1, &[1]), student(2, &[1])]);
        let p = builder.build().unwrap();
        let model = SolverModel::from_problem(&p).unwrap();
        let eval = ConstraintEvaluator::for_model(&model);

        let same_room = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(0))],
        );
        assert_eq!(eval.evaluate(&same_room), Score::zero());

        let far = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(1))],
        );
        assert_eq!(far.room(ClassIndex(1)), Some(RoomIndex(1)));
        let b = eval.breakdown(&far);
        assert_eq!(b.student_penalty, 2 * 2);
        assert_eq!(b.hard(), 0);
    }

    #[test]
    fn test_required_distribution_is_hard() {
        use class_alloc_model::prelude::{Distribution, DistributionKind};
        let class = |id| {
            ClassSpec::new(cid(id))
                .with_times([tp("10000", 0, 2, 0), tp("01000", 0, 2, 0)])
                .without_room()
        };
        let mut builder = ProblemBuilder::new("req", TimeGrid::new(5, 12, 2))
            .with_weights(OptimizationWeights::new(1, 1, 1, 1));
        builder
            .add_course(single_subpart_course(1, vec![class(1)]))
            .add_course(single_subpart_course(2, vec![class(2)]))
            .add_distribution(Distribution::required(
                DistributionKind::SameDays,
                [cid(1), cid(2)],
            ));
        let p = builder.build().unwrap();
        let model = SolverModel::from_problem(&p).unwrap();
        let eval = ConstraintEvaluator::for_model(&model);

        let apart =
            SolutionState::from_choices(&model, vec![Choice::new(0, None), Choice::new(1, None)]);
        assert_eq!(eval.breakdown(&apart).required_distributions, 1);
        let together =
            SolutionState::from_choices(&model, vec![Choice::new(1, None), Choice::new(1, None)]);
        assert_eq!(eval.evaluate(&together), Score::zero());
    }

    fn random_change<R: Rng>(
        model: &SolverModel<'_>,
        state: &SolutionState<'_>,
        rng: &mut R,
    ) -> Change {
        let c = ClassIndex(rng.random_range(0..model.classes_len()));
        let from = state.choice(c);
        let time = rng.random_range(0..model.times(c).len());
        let room = from
            .room()
            .map(|_| rng.random_range(0..model.room_alternatives(c).len()));
        Change::new(c, from, Choice::new(time, room))
    }

    #[test]
    fn test_incremental_matches_full_on_random_walks() {
        for seed in 0..6 {
            let p = random_problem(seed, 14);
            let model = SolverModel::from_problem(&p).unwrap();
            let eval = ConstraintEvaluator::for_model(&model);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut state = SolutionState::initialize(&model, seed);
            let mut score = eval.evaluate(&state);

            for step in 0..400 {
                let a = random_change(&model, &state, &mut rng);
                let mv = if rng.random_bool(0.3) {
                    let b = random_change(&model, &state, &mut rng);
                    if b.class() == a.class() {
                        Move::single(a)
                    } else {
                        Move::pair(a, b)
                    }
                } else {
                    Move::single(a)
                };

                let delta = eval.apply_scored(&mut state, &mv);
                let full = eval.evaluate(&state);
                assert_eq!(score + delta, full, "seed {seed}, step {step}, {mv}");

                if rng.random_bool(0.4) {
                    state.undo_move(&mv);
                    assert_eq!(eval.evaluate(&state), score);
                } else {
                    score = full;
                }
                assert!(state.is_consistent());
            }
        }
    }

    #[test]
    fn test_move_delta_leaves_state_untouched() {
        let p = random_problem(3, 8);
        let model = SolverModel::from_problem(&p).unwrap();
        let eval = ConstraintEvaluator::for_model(&model);
        let mut state = SolutionState::initialize(&model, 1);
        let before = state.choices().to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mv = Move::single(random_change(&model, &state, &mut rng));
        let _ = eval.move_delta(&mut state, &mv);
        assert_eq!(state.choices(), before.as_slice());
    }
}
