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

use crate::{engine::err::ConfigurationError, search::neighborhood::MoveKindWeights};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings of one annealing run.
///
/// The temperature starts at `initial_temperature` and is multiplied by
/// `cooling_rate` every `steps_per_temperature` iterations. A run converges
/// once the temperature drops below `min_temperature` or the incumbent has
/// not improved for `stall_iterations` iterations; it is terminated early by
/// `max_iterations`, `time_limit` or its stop token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingConfig {
    initial_temperature: f64,
    cooling_rate: f64,
    min_temperature: f64,
    steps_per_temperature: usize,
    stall_iterations: Option<u64>,
    max_iterations: Option<u64>,
    time_limit: Option<Duration>,
    move_weights: MoveKindWeights,
    verify_every: u64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_rate: 0.995,
            min_temperature: 1e-3,
            steps_per_temperature: 1_000,
            stall_iterations: Some(500_000),
            max_iterations: None,
            time_limit: None,
            move_weights: MoveKindWeights::default(),
            verify_every: 10_000,
        }
    }
}

impl AnnealingConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    #[inline]
    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.cooling_rate = alpha;
        self
    }

    #[inline]
    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    #[inline]
    pub fn with_steps_per_temperature(mut self, steps: usize) -> Self {
        self.steps_per_temperature = steps;
        self
    }

    #[inline]
    pub fn with_stall_iterations(mut self, iterations: Option<u64>) -> Self {
        self.stall_iterations = iterations;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, iterations: Option<u64>) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    #[inline]
    pub fn with_move_weights(mut self, weights: MoveKindWeights) -> Self {
        self.move_weights = weights;
        self
    }

    /// Period of the full re-evaluation in debug builds; zero disables it.
    #[inline]
    pub fn with_verify_every(mut self, iterations: u64) -> Self {
        self.verify_every = iterations;
        self
    }

    #[inline]
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    #[inline]
    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    #[inline]
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    #[inline]
    pub fn steps_per_temperature(&self) -> usize {
        self.steps_per_temperature
    }

    #[inline]
    pub fn stall_iterations(&self) -> Option<u64> {
        self.stall_iterations
    }

    #[inline]
    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn move_weights(&self) -> MoveKindWeights {
        self.move_weights
    }

    #[inline]
    pub fn verify_every(&self) -> u64 {
        self.verify_every
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(ConfigurationError::InvalidInitialTemperature(
                self.initial_temperature,
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigurationError::InvalidCoolingRate(self.cooling_rate));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(ConfigurationError::InvalidMinTemperature(self.min_temperature));
        }
        if self.steps_per_temperature == 0 {
            return Err(ConfigurationError::ZeroStepsPerTemperature);
        }
        self.move_weights.validate()
    }
}

impl std::fmt::Display for AnnealingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnnealingConfig(T0: {}, alpha: {}, T_min: {}, steps: {}, stall: {:?}, \
             max_iterations: {:?}, time_limit: {:?}, {})",
            self.initial_temperature,
            self.cooling_rate,
            self.min_temperature,
            self.steps_per_temperature,
            self.stall_iterations,
            self.max_iterations,
            self.time_limit,
            self.move_weights
        )
    }
}
