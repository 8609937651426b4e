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

use crate::search::neighborhood::MoveKindWeights;
use class_alloc_model::prelude::ClassIdentifier;

/// Rejected optimizer settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    InvalidInitialTemperature(f64),
    InvalidCoolingRate(f64),
    InvalidMinTemperature(f64),
    ZeroStepsPerTemperature,
    InvalidMoveWeights(MoveKindWeights),
    NoSeeds,
    ZeroThreads,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidInitialTemperature(t) => {
                write!(f, "Initial temperature must be finite and positive, got {}", t)
            }
            ConfigurationError::InvalidCoolingRate(a) => {
                write!(f, "Cooling rate must lie strictly between 0 and 1, got {}", a)
            }
            ConfigurationError::InvalidMinTemperature(t) => {
                write!(f, "Minimum temperature must be finite and positive, got {}", t)
            }
            ConfigurationError::ZeroStepsPerTemperature => {
                write!(f, "Steps per temperature must be positive")
            }
            ConfigurationError::InvalidMoveWeights(w) => {
                write!(f, "Move weights must be non-negative with a positive sum: {}", w)
            }
            ConfigurationError::NoSeeds => write!(f, "Multi-start needs at least one seed"),
            ConfigurationError::ZeroThreads => write!(f, "Thread count must be positive"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug)]
pub enum OptimizerError {
    EmptyTimeAlternatives(ClassIdentifier),
    NoFeasibleAlternative(ClassIdentifier),
    Configuration(ConfigurationError),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl std::fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerError::EmptyTimeAlternatives(id) => {
                write!(f, "Class {} has no time alternative", id)
            }
            OptimizerError::NoFeasibleAlternative(id) => write!(
                f,
                "Every time and room alternative of class {} is unavailable",
                id
            ),
            OptimizerError::Configuration(e) => write!(f, "{}", e),
            OptimizerError::ThreadPool(e) => write!(f, "Could not build thread pool: {}", e),
        }
    }
}

impl std::error::Error for OptimizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptimizerError::Configuration(e) => Some(e),
            OptimizerError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for OptimizerError {
    fn from(err: ConfigurationError) -> Self {
        OptimizerError::Configuration(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for OptimizerError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        OptimizerError::ThreadPool(err)
    }
}
