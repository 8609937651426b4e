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
    engine::{
        acceptor::{Acceptor, EnergyAcceptor, LexNonWorseningAcceptor, LexStrictAcceptor},
        config::AnnealingConfig,
        err::OptimizerError,
        stop::StopToken,
    },
    eval::{evaluator::ConstraintEvaluator, score::Score},
    model::{index::ClassIndex, solver_model::SolverModel},
    search::neighborhood::NeighborhoodGenerator,
    state::{moves::Choice, solution_state::SolutionState},
};
use class_alloc_model::prelude::{RunMetadata, Solution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConvergenceReason {
    TemperatureFloor,
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    Cancelled,
    TimeLimit,
    IterationLimit,
}

/// Lifecycle of a single annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Initializing,
    Annealing,
    Converged(ConvergenceReason),
    Terminated(TerminationReason),
}

impl Phase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Converged(_) | Phase::Terminated(_))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Initializing => write!(f, "Initializing"),
            Phase::Annealing => write!(f, "Annealing"),
            Phase::Converged(r) => write!(f, "Converged({:?})", r),
            Phase::Terminated(r) => write!(f, "Terminated({:?})", r),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub seed: u64,
    pub iterations: u64,
    /// Iterations whose drawn move kind had nothing to offer.
    pub skipped: u64,
    pub accepted: u64,
    pub improvements: u64,
    pub temperature_steps: u64,
    pub final_temperature: f64,
    pub initial_score: Score,
    pub elapsed: Duration,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RunStats(seed: {}, iterations: {}, accepted: {}, improvements: {}, \
             T: {:.4}, elapsed: {:?})",
            self.seed,
            self.iterations,
            self.accepted,
            self.improvements,
            self.final_temperature,
            self.elapsed
        )
    }
}

/// Result of one run: the incumbent and the score of the state the search
/// ended in.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerOutcome {
    phase: Phase,
    best_score: Score,
    best_choices: Vec<Choice>,
    final_score: Score,
    stats: RunStats,
}

impl OptimizerOutcome {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn best_score(&self) -> Score {
        self.best_score
    }

    #[inline]
    pub fn best_choices(&self) -> &[Choice] {
        &self.best_choices
    }

    #[inline]
    pub fn final_score(&self) -> Score {
        self.final_score
    }

    #[inline]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.stats.seed
    }

    #[inline]
    pub fn into_choices(self) -> Vec<Choice> {
        self.best_choices
    }

    pub fn best_state<'m>(&self, model: &'m SolverModel<'m>) -> SolutionState<'m> {
        SolutionState::from_choices(model, self.best_choices.clone())
    }

    pub fn solution<'m>(&self, model: &'m SolverModel<'m>, meta: RunMetadata) -> Solution {
        self.best_state(model).snapshot(meta)
    }
}

/// Simulated annealing over a [`SolutionState`].
///
/// A candidate move is applied and scored incrementally. It is kept when the
/// lexicographic score does not get worse, otherwise when the Metropolis test
/// on the energy `hard * big_m + soft` passes; rejected moves are undone.
/// The incumbent is a copy of the choices taken on every strict improvement.
#[derive(Debug, Clone)]
pub struct Optimizer<'m> {
    model: &'m SolverModel<'m>,
    config: AnnealingConfig,
    evaluator: ConstraintEvaluator,
    generator: NeighborhoodGenerator<'m>,
    energy: EnergyAcceptor,
    stop: StopToken,
}

impl<'m> Optimizer<'m> {
    pub fn new(
        model: &'m SolverModel<'m>,
        config: AnnealingConfig,
    ) -> Result<Self, OptimizerError> {
        config.validate()?;
        let generator = NeighborhoodGenerator::new(model, config.move_weights())?;
        if generator.is_degenerate() {
            tracing::warn!(
                classes = model.classes_len(),
                "No class has a second time or room alternative; only swaps remain"
            );
        }
        Ok(Self {
            model,
            evaluator: ConstraintEvaluator::for_model(model),
            energy: EnergyAcceptor::new(model.big_m()),
            generator,
            config,
            stop: StopToken::new(),
        })
    }

    #[inline]
    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    #[inline]
    pub fn model(&self) -> &'m SolverModel<'m> {
        self.model
    }

    #[inline]
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    #[inline]
    pub fn evaluator(&self) -> &ConstraintEvaluator {
        &self.evaluator
    }

    #[inline]
    pub fn stop_token(&self) -> &StopToken {
        &self.stop
    }

    /// Refuses models in which some class cannot be placed at all.
    pub fn check_preconditions(&self) -> Result<(), OptimizerError> {
        let model = self.model;
        for ci in 0..model.classes_len() {
            let class = ClassIndex(ci);
            let Some(id) = model.class_id(class) else {
                continue;
            };
            if model.times(class).is_empty() {
                return Err(OptimizerError::EmptyTimeAlternatives(id));
            }
            if !model.has_feasible_alternative(class) {
                return Err(OptimizerError::NoFeasibleAlternative(id));
            }
        }
        Ok(())
    }

    /// Anneals from a random state drawn with `seed`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&self, seed: u64) -> Result<OptimizerOutcome, OptimizerError> {
        self.check_preconditions()?;
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = SolutionState::initialize_with(self.model, &mut rng);
        Ok(self.anneal(state, rng, seed, start))
    }

    /// Anneals from a given state.
    #[tracing::instrument(level = "debug", skip(self, state))]
    pub fn run_from(
        &self,
        state: SolutionState<'m>,
        seed: u64,
    ) -> Result<OptimizerOutcome, OptimizerError> {
        debug_assert!(std::ptr::eq(state.model(), self.model));
        self.check_preconditions()?;
        let start = Instant::now();
        Ok(self.anneal(state, ChaCha8Rng::seed_from_u64(seed), seed, start))
    }

    fn anneal(
        &self,
        mut state: SolutionState<'m>,
        mut rng: ChaCha8Rng,
        seed: u64,
        start: Instant,
    ) -> OptimizerOutcome {
        let cfg = &self.config;
        let mut phase = Phase::Initializing;

        let initial_score = self.evaluator.evaluate(&state);
        let mut current = initial_score;
        let mut best = initial_score;
        let mut best_choices = state.choices().to_vec();

        let mut stats = RunStats {
            seed,
            iterations: 0,
            skipped: 0,
            accepted: 0,
            improvements: 0,
            temperature_steps: 0,
            final_temperature: cfg.initial_temperature(),
            initial_score,
            elapsed: Duration::ZERO,
        };
        let mut temperature = cfg.initial_temperature();
        let mut since_improvement: u64 = 0;

        tracing::info!(
            seed,
            classes = self.model.classes_len(),
            hard = initial_score.hard,
            soft = initial_score.soft,
            "Annealing started"
        );
        phase = self.transition(phase, Phase::Annealing);

        while !phase.is_terminal() {
            if let Some(next) = self.should_stop(&stats, start, temperature, since_improvement) {
                phase = self.transition(phase, next);
                break;
            }
            stats.iterations += 1;
            since_improvement += 1;

            if let Some(mv) = self.generator.propose(&state, &mut rng) {
                let delta = self.evaluator.apply_scored(&mut state, &mv);
                let candidate = current + delta;
                let accepted = LexNonWorseningAcceptor.accept(&current, &candidate)
                    || self
                        .energy
                        .metropolis(&mut rng, &current, &candidate, temperature);
                if accepted {
                    stats.accepted += 1;
                    current = candidate;
                    if LexStrictAcceptor.accept(&best, &current) {
                        tracing::debug!(
                            iteration = stats.iterations,
                            hard = current.hard,
                            soft = current.soft,
                            temperature,
                            "New best"
                        );
                        best = current;
                        best_choices.copy_from_slice(state.choices());
                        stats.improvements += 1;
                        since_improvement = 0;
                    }
                } else {
                    state.undo_move(&mv);
                }
            } else {
                stats.skipped += 1;
            }

            #[cfg(debug_assertions)]
            {
                if cfg.verify_every() > 0 && stats.iterations % cfg.verify_every() == 0 {
                    debug_assert_eq!(
                        self.evaluator.evaluate(&state),
                        current,
                        "incremental score drifted from full evaluation"
                    );
                    debug_assert!(state.is_consistent(), "occupancy indices out of sync");
                }
            }

            if stats.iterations % cfg.steps_per_temperature() as u64 == 0 {
                temperature *= cfg.cooling_rate();
                stats.temperature_steps += 1;
                tracing::trace!(temperature, hard = current.hard, soft = current.soft, "Cooled");
            }
        }

        stats.final_temperature = temperature;
        stats.elapsed = start.elapsed();
        tracing::info!(
            seed,
            iterations = stats.iterations,
            accepted = stats.accepted,
            hard = best.hard,
            soft = best.soft,
            phase = %phase,
            "Annealing finished"
        );

        OptimizerOutcome {
            phase,
            best_score: best,
            best_choices,
            final_score: current,
            stats,
        }
    }

    fn should_stop(
        &self,
        stats: &RunStats,
        start: Instant,
        temperature: f64,
        since_improvement: u64,
    ) -> Option<Phase> {
        let cfg = &self.config;
        if self.stop.is_set() {
            return Some(Phase::Terminated(TerminationReason::Cancelled));
        }
        if cfg.max_iterations().is_some_and(|max| stats.iterations >= max) {
            return Some(Phase::Terminated(TerminationReason::IterationLimit));
        }
        if cfg.time_limit().is_some_and(|limit| start.elapsed() >= limit) {
            return Some(Phase::Terminated(TerminationReason::TimeLimit));
        }
        if temperature < cfg.min_temperature() {
            return Some(Phase::Converged(ConvergenceReason::TemperatureFloor));
        }
        if cfg.stall_iterations().is_some_and(|n| since_improvement >= n) {
            return Some(Phase::Converged(ConvergenceReason::Stalled));
        }
        None
    }

    #[inline]
    fn transition(&self, from: Phase, to: Phase) -> Phase {
        tracing::debug!(from = %from, to = %to, "Phase change");
        to
    }
}
