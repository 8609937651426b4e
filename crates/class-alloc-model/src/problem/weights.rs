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

/// Scales of the four soft-penalty components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptimizationWeights {
    time: u32,
    room: u32,
    distribution: u32,
    student: u32,
}

impl OptimizationWeights {
    #[inline]
    pub const fn new(time: u32, room: u32, distribution: u32, student: u32) -> Self {
        Self {
            time,
            room,
            distribution,
            student,
        }
    }

    #[inline]
    pub fn time(&self) -> Cost {
        Cost::from(self.time)
    }

    #[inline]
    pub fn room(&self) -> Cost {
        Cost::from(self.room)
    }

    #[inline]
    pub fn distribution(&self) -> Cost {
        Cost::from(self.distribution)
    }

    #[inline]
    pub fn student(&self) -> Cost {
        Cost::from(self.student)
    }
}

impl std::fmt::Display for OptimizationWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weights(time: {}, room: {}, distribution: {}, student: {})",
            self.time, self.room, self.distribution, self.student
        )
    }
}
