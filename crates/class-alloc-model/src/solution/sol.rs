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
    problem::{class::ClassIdentifier, prob::ProblemModel, room::RoomIdentifier},
    solution::err::{SolutionValidationError, UndeclaredRoomError},
};
use class_alloc_core::prelude::Mask;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Descriptive fields written on the `<solution>` element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    name: String,
    runtime: f64,
    cores: usize,
    technique: String,
    author: String,
    institution: String,
    country: String,
}

impl RunMetadata {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cores: 1,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_runtime(mut self, seconds: f64) -> Self {
        self.runtime = seconds;
        self
    }

    #[inline]
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    #[inline]
    pub fn with_technique(mut self, technique: impl Into<String>) -> Self {
        self.technique = technique.into();
        self
    }

    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[inline]
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    #[inline]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock time of the run in seconds.
    #[inline]
    pub fn runtime(&self) -> f64 {
        self.runtime
    }

    #[inline]
    pub fn cores(&self) -> usize {
        self.cores
    }

    #[inline]
    pub fn technique(&self) -> &str {
        &self.technique
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn institution(&self) -> &str {
        &self.institution
    }

    #[inline]
    pub fn country(&self) -> &str {
        &self.country
    }
}

impl std::fmt::Display for RunMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RunMetadata(name: {}, runtime: {}s, cores: {}, technique: {})",
            self.name, self.runtime, self.cores, self.technique
        )
    }
}

/// Where and when one class meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionClass {
    id: ClassIdentifier,
    days: Mask,
    start: u32,
    weeks: Mask,
    room: Option<RoomIdentifier>,
}

impl SolutionClass {
    #[inline]
    pub fn new(
        id: ClassIdentifier,
        days: Mask,
        start: u32,
        weeks: Mask,
        room: Option<RoomIdentifier>,
    ) -> Self {
        Self {
            id,
            days,
            start,
            weeks,
            room,
        }
    }

    #[inline]
    pub fn id(&self) -> ClassIdentifier {
        self.id
    }

    #[inline]
    pub fn days(&self) -> Mask {
        self.days
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn weeks(&self) -> Mask {
        self.weeks
    }

    #[inline]
    pub fn room(&self) -> Option<RoomIdentifier> {
        self.room
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    meta: RunMetadata,
    classes: Vec<SolutionClass>,
}

impl Solution {
    #[inline]
    pub fn new(meta: RunMetadata, classes: Vec<SolutionClass>) -> Self {
        Self { meta, classes }
    }

    #[inline]
    pub fn meta(&self) -> &RunMetadata {
        &self.meta
    }

    #[inline]
    pub fn classes(&self) -> &[SolutionClass] {
        &self.classes
    }

    #[inline]
    pub fn class(&self, id: ClassIdentifier) -> Option<&SolutionClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Checks that every class of `problem` is placed exactly once, at one
    /// of its declared times and, when it needs one, in one of its declared
    /// rooms.
    pub fn validate(&self, problem: &ProblemModel) -> Result<(), SolutionValidationError> {
        let mut seen = HashSet::with_capacity(self.classes.len());
        for placed in &self.classes {
            let Some(spec) = problem.class(placed.id) else {
                return Err(SolutionValidationError::ExtraClass(placed.id));
            };
            if !seen.insert(placed.id) {
                return Err(SolutionValidationError::DuplicateClass(placed.id));
            }
            let declared = spec.times().iter().any(|t| {
                t.days() == placed.days && t.start() == placed.start && t.weeks() == placed.weeks
            });
            if !declared {
                return Err(SolutionValidationError::UndeclaredTime(placed.id));
            }
            match (spec.requires_room(), placed.room) {
                (true, None) => return Err(SolutionValidationError::MissingRoom(placed.id)),
                (false, Some(_)) => {
                    return Err(SolutionValidationError::UnexpectedRoom(placed.id));
                }
                (true, Some(room)) if !spec.rooms().iter().any(|o| o.room() == room) => {
                    return Err(UndeclaredRoomError::new(placed.id, room).into());
                }
                _ => {}
            }
        }
        if let Some(missing) = problem.iter_classes().find(|c| !seen.contains(&c.id())) {
            return Err(SolutionValidationError::MissingClass(missing.id()));
        }
        Ok(())
    }
}
