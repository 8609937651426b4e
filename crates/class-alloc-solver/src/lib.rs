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

//! Simulated-annealing timetabling engine.
//!
//! A [`model::solver_model::SolverModel`] is a dense, index-based view over a
//! validated [`class_alloc_model::prelude::ProblemModel`]. Search runs on a
//! [`state::solution_state::SolutionState`] that keeps room and course
//! occupancy indices in step with every move, so the
//! [`eval::evaluator::ConstraintEvaluator`] can score a move by looking only
//! at the classes it touches. [`engine::optimizer::Optimizer`] drives one
//! annealing run; [`engine::multi_start::MultiStart`] runs several seeds in
//! parallel and keeps the best.

pub mod engine;
pub mod eval;
pub mod model;
pub mod search;
pub mod state;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::engine::acceptor::{
        Acceptor, EnergyAcceptor, LexNonWorseningAcceptor, LexStrictAcceptor,
    };
    pub use crate::engine::config::AnnealingConfig;
    pub use crate::engine::err::{ConfigurationError, OptimizerError};
    pub use crate::engine::multi_start::{MultiStart, MultiStartConfig, MultiStartOutcome};
    pub use crate::engine::optimizer::{
        ConvergenceReason, Optimizer, OptimizerOutcome, Phase, RunStats, TerminationReason,
    };
    pub use crate::engine::shared_incumbent::SharedIncumbent;
    pub use crate::engine::stop::StopToken;
    pub use crate::eval::evaluator::{ConstraintEvaluator, ScoreBreakdown};
    pub use crate::eval::score::{Score, ScoreDelta};
    pub use crate::model::err::SolverModelBuildError;
    pub use crate::model::index::{ClassIndex, CourseIndex, RoomIndex};
    pub use crate::model::solver_model::SolverModel;
    pub use crate::search::neighborhood::{MoveKind, MoveKindWeights, NeighborhoodGenerator};
    pub use crate::state::moves::{Change, Choice, Move};
    pub use crate::state::solution_state::SolutionState;
}
