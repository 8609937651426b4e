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
        config::AnnealingConfig,
        err::{ConfigurationError, OptimizerError},
        optimizer::{Optimizer, OptimizerOutcome, RunStats},
        shared_incumbent::SharedIncumbent,
        stop::StopToken,
    },
    model::solver_model::SolverModel,
};
use class_alloc_model::prelude::{RunMetadata, Solution};
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiStartConfig {
    seeds: Vec<u64>,
    threads: Option<usize>,
}

impl MultiStartConfig {
    #[inline]
    pub fn new(seeds: impl IntoIterator<Item = u64>) -> Self {
        Self {
            seeds: seeds.into_iter().collect(),
            threads: None,
        }
    }

    /// `runs` consecutive seeds starting at `base`.
    #[inline]
    pub fn from_base_seed(base: u64, runs: usize) -> Self {
        Self::new((0..runs as u64).map(|i| base.wrapping_add(i)))
    }

    /// Runs on a dedicated pool of `threads` workers instead of the global
    /// rayon pool.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    #[inline]
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    #[inline]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.seeds.is_empty() {
            return Err(ConfigurationError::NoSeeds);
        }
        if self.threads == Some(0) {
            return Err(ConfigurationError::ZeroThreads);
        }
        Ok(())
    }
}

impl std::fmt::Display for MultiStartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MultiStartConfig(runs: {}, threads: {:?})",
            self.seeds.len(),
            self.threads
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiStartOutcome {
    best: OptimizerOutcome,
    runs: Vec<RunStats>,
    threads: usize,
    elapsed: Duration,
}

impl MultiStartOutcome {
    #[inline]
    pub fn best(&self) -> &OptimizerOutcome {
        &self.best
    }

    /// Per-run statistics in seed order.
    #[inline]
    pub fn runs(&self) -> &[RunStats] {
        &self.runs
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn into_best(self) -> OptimizerOutcome {
        self.best
    }

    /// Snapshot of the best run, with the wall-clock time and thread count
    /// filled into `meta`.
    pub fn solution<'m>(&self, model: &'m SolverModel<'m>, meta: RunMetadata) -> Solution {
        let meta = meta
            .with_runtime(self.elapsed.as_secs_f64())
            .with_cores(self.threads);
        self.best.solution(model, meta)
    }
}

/// Independent annealing runs, one per seed, over a shared model.
#[derive(Debug, Clone)]
pub struct MultiStart<'m> {
    optimizer: Optimizer<'m>,
    config: MultiStartConfig,
}

impl<'m> MultiStart<'m> {
    pub fn new(
        model: &'m SolverModel<'m>,
        annealing: AnnealingConfig,
        config: MultiStartConfig,
    ) -> Result<Self, OptimizerError> {
        config.validate()?;
        Ok(Self {
            optimizer: Optimizer::new(model, annealing)?,
            config,
        })
    }

    /// Shared by every run; one request stops all of them.
    #[inline]
    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.optimizer = self.optimizer.with_stop_token(stop);
        self
    }

    #[inline]
    pub fn optimizer(&self) -> &Optimizer<'m> {
        &self.optimizer
    }

    #[inline]
    pub fn config(&self) -> &MultiStartConfig {
        &self.config
    }

    #[tracing::instrument(level = "debug", skip(self), fields(runs = self.config.seeds.len()))]
    pub fn run(&self) -> Result<MultiStartOutcome, OptimizerError> {
        self.optimizer.check_preconditions()?;
        let start = Instant::now();
        let model = self.optimizer.model();
        let incumbent = SharedIncumbent::new();

        let work = || -> Result<Vec<RunStats>, OptimizerError> {
            self.config
                .seeds
                .par_iter()
                .map(|&seed| {
                    let outcome = self.optimizer.run(seed)?;
                    incumbent.try_update(&outcome, model);
                    Ok(outcome.stats().clone())
                })
                .collect()
        };

        let (runs, threads) = match self.config.threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                (pool.install(work)?, pool.current_num_threads())
            }
            None => (work()?, rayon::current_num_threads()),
        };

        let best = incumbent
            .into_best()
            .ok_or(OptimizerError::Configuration(ConfigurationError::NoSeeds))?;
        let elapsed = start.elapsed();
        tracing::info!(
            runs = runs.len(),
            threads,
            hard = best.best_score().hard,
            soft = best.best_score().soft,
            seed = best.seed(),
            "Multi-start finished"
        );
        Ok(MultiStartOutcome {
            best,
            runs,
            threads,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::optimizer::{Phase, TerminationReason},
        test_support::{random_problem, room_clash_problem},
    };

    fn annealing() -> AnnealingConfig {
        AnnealingConfig::new()
            .with_initial_temperature(3.0)
            .with_cooling_rate(0.9)
            .with_steps_per_temperature(100)
            .with_min_temperature(0.05)
            .with_max_iterations(Some(2_000))
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            MultiStartConfig::new(Vec::new()).validate(),
            Err(ConfigurationError::NoSeeds)
        );
        assert_eq!(
            MultiStartConfig::new([1]).with_threads(0).validate(),
            Err(ConfigurationError::ZeroThreads)
        );
        assert_eq!(MultiStartConfig::from_base_seed(10, 3).seeds(), &[10, 11, 12]);

        let p = room_clash_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let err = MultiStart::new(&model, annealing(), MultiStartConfig::new(Vec::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Configuration(ConfigurationError::NoSeeds)
        ));
    }

    #[test]
    fn test_best_is_the_minimum_over_single_runs() {
        let p = random_problem(12, 10);
        let model = SolverModel::from_problem(&p).unwrap();
        let cfg = MultiStartConfig::from_base_seed(100, 6).with_threads(3);
        let ms = MultiStart::new(&model, annealing(), cfg).unwrap();
        let out = ms.run().unwrap();

        let single = Optimizer::new(&model, annealing()).unwrap();
        let expected = (100..106)
            .map(|s| {
                let o = single.run(s).unwrap();
                (o.best_score(), o.seed())
            })
            .min()
            .unwrap();
        assert_eq!((out.best().best_score(), out.best().seed()), expected);
        assert_eq!(out.runs().len(), 6);
        assert_eq!(
            out.runs().iter().map(|r| r.seed).collect::<Vec<_>>(),
            (100..106u64).collect::<Vec<_>>()
        );
        assert_eq!(out.threads(), 3);
    }

    #[test]
    fn test_result_does_not_depend_on_thread_count() {
        let p = random_problem(13, 10);
        let model = SolverModel::from_problem(&p).unwrap();
        let one = MultiStart::new(
            &model,
            annealing(),
            MultiStartConfig::from_base_seed(7, 5).with_threads(1),
        )
        .unwrap()
        .run()
        .unwrap();
        let four = MultiStart::new(
            &model,
            annealing(),
            MultiStartConfig::from_base_seed(7, 5).with_threads(4),
        )
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(one.best().best_choices(), four.best().best_choices());
        assert_eq!(one.best().seed(), four.best().seed());
    }

    #[test]
    fn test_solution_carries_run_metadata() {
        let p = room_clash_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let out = MultiStart::new(
            &model,
            annealing(),
            MultiStartConfig::new([1, 2]).with_threads(2),
        )
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(out.best().best_score().hard, 0);

        let sol = out.solution(&model, RunMetadata::new(p.name()).with_technique("SA"));
        assert_eq!(sol.meta().cores(), 2);
        assert_eq!(sol.meta().technique(), "SA");
        assert_eq!(sol.validate(&p), Ok(()));
    }

    #[test]
    fn test_stop_token_reaches_every_run() {
        let p = random_problem(5, 6);
        let model = SolverModel::from_problem(&p).unwrap();
        let stop = StopToken::new();
        stop.request_stop();
        let out = MultiStart::new(&model, annealing(), MultiStartConfig::from_base_seed(0, 4))
            .unwrap()
            .with_stop_token(stop)
            .run()
            .unwrap();
        assert!(out.runs().iter().all(|r| r.iterations == 0));
        assert_eq!(
            out.best().phase(),
            Phase::Terminated(TerminationReason::Cancelled)
        );
    }
}
