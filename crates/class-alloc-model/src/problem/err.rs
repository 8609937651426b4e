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

use crate::problem::{
    class::{ClassIdentifier, CourseIdentifier},
    room::RoomIdentifier,
    student::StudentIdentifier,
    time::{TimeGrid, TimePattern},
};
use crate::xml::AttributeError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownDistributionTypeError {
    tag: String,
}

impl UnknownDistributionTypeError {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl std::fmt::Display for UnknownDistributionTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown distribution type '{}'", self.tag)
    }
}

impl std::error::Error for UnknownDistributionTypeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidGridError {
    grid: TimeGrid,
}

impl InvalidGridError {
    pub fn new(grid: TimeGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> TimeGrid {
        self.grid
    }
}

impl std::fmt::Display for InvalidGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid time grid {}: days and weeks must be in 1..=64 and slots per day positive",
            self.grid
        )
    }
}

impl std::error::Error for InvalidGridError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomNotFoundError {
    class: ClassIdentifier,
    room: RoomIdentifier,
}

impl RoomNotFoundError {
    pub fn new(class: ClassIdentifier, room: RoomIdentifier) -> Self {
        Self { class, room }
    }

    pub fn class(&self) -> ClassIdentifier {
        self.class
    }

    pub fn room(&self) -> RoomIdentifier {
        self.room
    }
}

impl std::fmt::Display for RoomNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room {} offered to class {} was not found",
            self.room, self.class
        )
    }
}

impl std::error::Error for RoomNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TravelTargetNotFoundError {
    room: RoomIdentifier,
    target: RoomIdentifier,
}

impl TravelTargetNotFoundError {
    pub fn new(room: RoomIdentifier, target: RoomIdentifier) -> Self {
        Self { room, target }
    }

    pub fn room(&self) -> RoomIdentifier {
        self.room
    }

    pub fn target(&self) -> RoomIdentifier {
        self.target
    }
}

impl std::fmt::Display for TravelTargetNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room {} declares a travel time to unknown room {}",
            self.room, self.target
        )
    }
}

impl std::error::Error for TravelTargetNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DistributionClassNotFoundError {
    distribution: usize,
    class: ClassIdentifier,
}

impl DistributionClassNotFoundError {
    pub fn new(distribution: usize, class: ClassIdentifier) -> Self {
        Self {
            distribution,
            class,
        }
    }

    /// Position of the distribution in declaration order.
    pub fn distribution(&self) -> usize {
        self.distribution
    }

    pub fn class(&self) -> ClassIdentifier {
        self.class
    }
}

impl std::fmt::Display for DistributionClassNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distribution #{} references unknown class {}",
            self.distribution, self.class
        )
    }
}

impl std::error::Error for DistributionClassNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentNotFoundError {
    class: ClassIdentifier,
    parent: ClassIdentifier,
}

impl ParentNotFoundError {
    pub fn new(class: ClassIdentifier, parent: ClassIdentifier) -> Self {
        Self { class, parent }
    }

    pub fn class(&self) -> ClassIdentifier {
        self.class
    }

    pub fn parent(&self) -> ClassIdentifier {
        self.parent
    }
}

impl std::fmt::Display for ParentNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parent {} of class {} was not found",
            self.parent, self.class
        )
    }
}

impl std::error::Error for ParentNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CourseNotFoundError {
    student: StudentIdentifier,
    course: CourseIdentifier,
}

impl CourseNotFoundError {
    pub fn new(student: StudentIdentifier, course: CourseIdentifier) -> Self {
        Self { student, course }
    }

    pub fn student(&self) -> StudentIdentifier {
        self.student
    }

    pub fn course(&self) -> CourseIdentifier {
        self.course
    }
}

impl std::fmt::Display for CourseNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Student {} is enrolled in unknown course {}",
            self.student, self.course
        )
    }
}

impl std::error::Error for CourseNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternOwner {
    Class(ClassIdentifier),
    Room(RoomIdentifier),
}

impl std::fmt::Display for PatternOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternOwner::Class(id) => write!(f, "{}", id),
            PatternOwner::Room(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternOutsideGridError {
    owner: PatternOwner,
    pattern: TimePattern,
    grid: TimeGrid,
}

impl PatternOutsideGridError {
    pub fn new(owner: PatternOwner, pattern: TimePattern, grid: TimeGrid) -> Self {
        Self {
            owner,
            pattern,
            grid,
        }
    }

    pub fn owner(&self) -> PatternOwner {
        self.owner
    }

    pub fn pattern(&self) -> TimePattern {
        self.pattern
    }

    pub fn grid(&self) -> TimeGrid {
        self.grid
    }
}

impl std::fmt::Display for PatternOutsideGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} does not fit {}",
            self.pattern, self.owner, self.grid
        )
    }
}

impl std::error::Error for PatternOutsideGridError {}

/// Fatal problems found while validating an instance; no model is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructuralError {
    InvalidGrid(InvalidGridError),
    MissingWeights,
    DuplicateRoom(RoomIdentifier),
    DuplicateClass(ClassIdentifier),
    DuplicateCourse(CourseIdentifier),
    DuplicateStudent(StudentIdentifier),
    RoomNotFound(RoomNotFoundError),
    TravelTargetNotFound(TravelTargetNotFoundError),
    DistributionClassNotFound(DistributionClassNotFoundError),
    ParentNotFound(ParentNotFoundError),
    CourseNotFound(CourseNotFoundError),
    EmptyTimeAlternatives(ClassIdentifier),
    EmptyRoomAlternatives(ClassIdentifier),
    PatternOutsideGrid(PatternOutsideGridError),
}

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralError::InvalidGrid(e) => write!(f, "{}", e),
            StructuralError::MissingWeights => write!(f, "Optimization weights are missing"),
            StructuralError::DuplicateRoom(id) => write!(f, "Duplicate room {}", id),
            StructuralError::DuplicateClass(id) => write!(f, "Duplicate class {}", id),
            StructuralError::DuplicateCourse(id) => write!(f, "Duplicate course {}", id),
            StructuralError::DuplicateStudent(id) => write!(f, "Duplicate student {}", id),
            StructuralError::RoomNotFound(e) => write!(f, "{}", e),
            StructuralError::TravelTargetNotFound(e) => write!(f, "{}", e),
            StructuralError::DistributionClassNotFound(e) => write!(f, "{}", e),
            StructuralError::ParentNotFound(e) => write!(f, "{}", e),
            StructuralError::CourseNotFound(e) => write!(f, "{}", e),
            StructuralError::EmptyTimeAlternatives(id) => {
                write!(f, "Class {} has no time alternatives", id)
            }
            StructuralError::EmptyRoomAlternatives(id) => {
                write!(f, "Class {} requires a room but offers none", id)
            }
            StructuralError::PatternOutsideGrid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StructuralError {}

impl From<InvalidGridError> for StructuralError {
    fn from(err: InvalidGridError) -> Self {
        StructuralError::InvalidGrid(err)
    }
}

impl From<RoomNotFoundError> for StructuralError {
    fn from(err: RoomNotFoundError) -> Self {
        StructuralError::RoomNotFound(err)
    }
}

impl From<TravelTargetNotFoundError> for StructuralError {
    fn from(err: TravelTargetNotFoundError) -> Self {
        StructuralError::TravelTargetNotFound(err)
    }
}

impl From<DistributionClassNotFoundError> for StructuralError {
    fn from(err: DistributionClassNotFoundError) -> Self {
        StructuralError::DistributionClassNotFound(err)
    }
}

impl From<ParentNotFoundError> for StructuralError {
    fn from(err: ParentNotFoundError) -> Self {
        StructuralError::ParentNotFound(err)
    }
}

impl From<CourseNotFoundError> for StructuralError {
    fn from(err: CourseNotFoundError) -> Self {
        StructuralError::CourseNotFound(err)
    }
}

impl From<PatternOutsideGridError> for StructuralError {
    fn from(err: PatternOutsideGridError) -> Self {
        StructuralError::PatternOutsideGrid(err)
    }
}

#[derive(Debug)]
pub enum ProblemLoaderError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    MissingProblem,
    Attribute(AttributeError),
    UnknownDistributionType(UnknownDistributionTypeError),
    Structural(StructuralError),
}

impl std::fmt::Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemLoaderError::Io(e) => write!(f, "I/O error: {}", e),
            ProblemLoaderError::Xml(e) => write!(f, "XML error: {}", e),
            ProblemLoaderError::MissingProblem => write!(f, "No <problem> element found"),
            ProblemLoaderError::Attribute(e) => write!(f, "{}", e),
            ProblemLoaderError::UnknownDistributionType(e) => write!(f, "{}", e),
            ProblemLoaderError::Structural(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProblemLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemLoaderError::Io(e) => Some(e),
            ProblemLoaderError::Xml(e) => Some(e),
            ProblemLoaderError::Attribute(e) => Some(e),
            ProblemLoaderError::UnknownDistributionType(e) => Some(e),
            ProblemLoaderError::Structural(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<quick_xml::Error> for ProblemLoaderError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<quick_xml::events::attributes::AttrError> for ProblemLoaderError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(e))
    }
}

impl From<AttributeError> for ProblemLoaderError {
    fn from(e: AttributeError) -> Self {
        Self::Attribute(e)
    }
}

impl From<UnknownDistributionTypeError> for ProblemLoaderError {
    fn from(e: UnknownDistributionTypeError) -> Self {
        Self::UnknownDistributionType(e)
    }
}

impl From<StructuralError> for ProblemLoaderError {
    fn from(e: StructuralError) -> Self {
        Self::Structural(e)
    }
}
