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
    engine::optimizer::OptimizerOutcome, eval::score::Score, model::solver_model::SolverModel,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

/// Best outcome across concurrent runs.
///
/// Outcomes are ordered by score, then by seed, so the reduction does not
/// depend on the order in which runs finish.
#[derive(Debug)]
pub struct SharedIncumbent {
    best: Mutex<Option<OptimizerOutcome>>,
    best_hard: AtomicUsize, // Avoid locking for simple reads
    best_soft: AtomicI64,   // Avoid locking for simple reads
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIncumbent {
    #[inline]
    pub fn new() -> Self {
        Self {
            best: Mutex::new(None),
            best_hard: AtomicUsize::new(usize::MAX),
            best_soft: AtomicI64::new(i64::MAX),
        }
    }

    /// Best score so far without locking; `(usize::MAX, i64::MAX)` while
    /// empty.
    #[inline]
    pub fn peek(&self) -> Score {
        Score::new(
            self.best_hard.load(Ordering::Acquire),
            self.best_soft.load(Ordering::Acquire),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.best.lock().is_none()
    }

    #[inline]
    pub fn snapshot(&self) -> Option<OptimizerOutcome> {
        self.best.lock().clone()
    }

    #[inline]
    pub fn into_best(self) -> Option<OptimizerOutcome> {
        self.best.into_inner()
    }

    #[tracing::instrument(level = "debug", skip(self, candidate, model))]
    pub fn try_update(&self, candidate: &OptimizerOutcome, model: &SolverModel<'_>) -> bool {
        let cand_score = candidate.best_score();
        // The two atomics are not stored together; only the hard count is a
        // safe lower bound for the installed score.
        if cand_score.hard > self.best_hard.load(Ordering::Acquire) {
            return false;
        }

        let mut guard = self.best.lock();
        if let Some(best) = guard.as_ref()
            && (cand_score, candidate.seed()) >= (best.best_score(), best.seed())
        {
            return false;
        }

        let old = guard.as_ref().map(|b| b.best_score());
        tracing::info!(
            old_hard = old.map(|s| s.hard),
            old_soft = old.map(|s| s.soft),
            new_hard = cand_score.hard,
            new_soft = cand_score.soft,
            seed = candidate.seed(),
            "New incumbent"
        );

        *guard = Some(candidate.clone());
        self.best_hard.store(cand_score.hard, Ordering::Release);
        self.best_soft.store(cand_score.soft, Ordering::Release);

        #[cfg(debug_assertions)]
        {
            use crate::{
                eval::evaluator::ConstraintEvaluator, state::solution_state::SolutionState,
            };

            if let Some(installed) = guard.as_ref() {
                let state = SolutionState::from_choices(model, installed.best_choices().to_vec());
                debug_assert_eq!(
                    ConstraintEvaluator::for_model(model).evaluate(&state),
                    installed.best_score(),
                    "installed score differs from recomputed score"
                );
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = model;

        true
    }
}
