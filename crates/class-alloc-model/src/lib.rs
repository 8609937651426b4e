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

//! Problem and solution model for university course timetabling.
//!
//! [`problem::prob::ProblemModel`] is the validated, immutable instance;
//! [`solution::sol::Solution`] is a finished timetable. Both can be read from
//! and written to the ITC-2019 XML formats.

pub mod common;
pub mod problem;
pub mod solution;
mod xml;

pub use xml::AttributeError;

pub mod prelude {
    pub use crate::common::{Identifier, IdentifierMarkerName};
    pub use crate::problem::builder::ProblemBuilder;
    pub use crate::problem::class::{
        ClassIdentifier, ClassSpec, Config, ConfigIdentifier, Course, CourseIdentifier, Subpart,
        SubpartIdentifier,
    };
    pub use crate::problem::distribution::{Distribution, DistributionKind};
    pub use crate::problem::err::{ProblemLoaderError, StructuralError};
    pub use crate::problem::loader::ProblemLoader;
    pub use crate::problem::prob::ProblemModel;
    pub use crate::problem::room::{Room, RoomIdentifier, RoomOption};
    pub use crate::problem::student::{Student, StudentIdentifier};
    pub use crate::problem::time::{TimeGrid, TimePattern};
    pub use crate::problem::weights::OptimizationWeights;
    pub use crate::solution::err::{
        SolutionLoaderError, SolutionValidationError, SolutionWriteError,
    };
    pub use crate::solution::loader::SolutionLoader;
    pub use crate::solution::sol::{RunMetadata, Solution, SolutionClass};
    pub use crate::solution::writer::SolutionWriter;
}
