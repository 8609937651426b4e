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
    common::{Identifier, IdentifierMarkerName},
    problem::{room::RoomOption, time::TimePattern},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassIdentifierMarker;

impl IdentifierMarkerName for ClassIdentifierMarker {
    const NAME: &'static str = "ClassId";
}

pub type ClassIdentifier = Identifier<usize, ClassIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubpartIdentifierMarker;

impl IdentifierMarkerName for SubpartIdentifierMarker {
    const NAME: &'static str = "SubpartId";
}

pub type SubpartIdentifier = Identifier<usize, SubpartIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigIdentifierMarker;

impl IdentifierMarkerName for ConfigIdentifierMarker {
    const NAME: &'static str = "ConfigId";
}

pub type ConfigIdentifier = Identifier<usize, ConfigIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseIdentifierMarker;

impl IdentifierMarkerName for CourseIdentifierMarker {
    const NAME: &'static str = "CourseId";
}

pub type CourseIdentifier = Identifier<usize, CourseIdentifierMarker>;

/// One schedulable class with its declared time and room alternatives.
///
/// The parent is kept as a plain identifier and resolved through
/// [`crate::problem::prob::ProblemModel::class`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    id: ClassIdentifier,
    limit: Option<u32>,
    parent: Option<ClassIdentifier>,
    requires_room: bool,
    rooms: Vec<RoomOption>,
    times: Vec<TimePattern>,
}

impl ClassSpec {
    #[inline]
    pub fn new(id: ClassIdentifier) -> Self {
        Self {
            id,
            limit: None,
            parent: None,
            requires_room: true,
            rooms: Vec::new(),
            times: Vec::new(),
        }
    }

    #[inline]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_parent(mut self, parent: ClassIdentifier) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Marks the class as not needing a room; any room options are dropped.
    #[inline]
    pub fn without_room(mut self) -> Self {
        self.requires_room = false;
        self.rooms.clear();
        self
    }

    #[inline]
    pub fn with_rooms<I>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = RoomOption>,
    {
        self.rooms.extend(rooms);
        self
    }

    #[inline]
    pub fn with_times<I>(mut self, times: I) -> Self
    where
        I: IntoIterator<Item = TimePattern>,
    {
        self.times.extend(times);
        self
    }

    #[inline]
    pub fn add_room(&mut self, option: RoomOption) -> &mut Self {
        self.rooms.push(option);
        self
    }

    #[inline]
    pub fn add_time(&mut self, pattern: TimePattern) -> &mut Self {
        self.times.push(pattern);
        self
    }

    #[inline]
    pub fn id(&self) -> ClassIdentifier {
        self.id
    }

    #[inline]
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    #[inline]
    pub fn parent(&self) -> Option<ClassIdentifier> {
        self.parent
    }

    #[inline]
    pub fn requires_room(&self) -> bool {
        self.requires_room
    }

    #[inline]
    pub fn rooms(&self) -> &[RoomOption] {
        &self.rooms
    }

    #[inline]
    pub fn times(&self) -> &[TimePattern] {
        &self.times
    }
}

impl std::fmt::Display for ClassSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Class(id: {}, times: {}, rooms: {})",
            self.id,
            self.times.len(),
            self.rooms.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subpart {
    id: SubpartIdentifier,
    classes: Vec<ClassSpec>,
}

impl Subpart {
    #[inline]
    pub fn new<I>(id: SubpartIdentifier, classes: I) -> Self
    where
        I: IntoIterator<Item = ClassSpec>,
    {
        Self {
            id,
            classes: classes.into_iter().collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> SubpartIdentifier {
        self.id
    }

    #[inline]
    pub fn classes(&self) -> &[ClassSpec] {
        &self.classes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    id: ConfigIdentifier,
    subparts: Vec<Subpart>,
}

impl Config {
    #[inline]
    pub fn new<I>(id: ConfigIdentifier, subparts: I) -> Self
    where
        I: IntoIterator<Item = Subpart>,
    {
        Self {
            id,
            subparts: subparts.into_iter().collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> ConfigIdentifier {
        self.id
    }

    #[inline]
    pub fn subparts(&self) -> &[Subpart] {
        &self.subparts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseIdentifier,
    configs: Vec<Config>,
}

impl Course {
    #[inline]
    pub fn new<I>(id: CourseIdentifier, configs: I) -> Self
    where
        I: IntoIterator<Item = Config>,
    {
        Self {
            id,
            configs: configs.into_iter().collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> CourseIdentifier {
        self.id
    }

    #[inline]
    pub fn configs(&self) -> &[Config] {
        &self.configs
    }

    #[inline]
    pub fn iter_classes(&self) -> impl Iterator<Item = &ClassSpec> + '_ {
        self.configs
            .iter()
            .flat_map(|c| c.subparts.iter())
            .flat_map(|s| s.classes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::room::RoomIdentifier;

    fn tp(start: u32) -> TimePattern {
        TimePattern::new(
            "1000000".parse().unwrap(),
            start,
            10,
            "1".parse().unwrap(),
            0,
        )
    }

    #[test]
    fn test_without_room_clears_options() {
        let class = ClassSpec::new(ClassIdentifier::new(1))
            .with_rooms([RoomOption::new(RoomIdentifier::new(1), 0)])
            .with_times([tp(0)])
            .without_room();
        assert!(!class.requires_room());
        assert!(class.rooms().is_empty());
        assert_eq!(class.times().len(), 1);
    }

    #[test]
    fn test_course_iterates_classes_in_hierarchy_order() {
        let lec = Subpart::new(
            SubpartIdentifier::new(1),
            [
                ClassSpec::new(ClassIdentifier::new(1)),
                ClassSpec::new(ClassIdentifier::new(2)),
            ],
        );
        let lab = Subpart::new(
            SubpartIdentifier::new(2),
            [ClassSpec::new(ClassIdentifier::new(3)).with_parent(ClassIdentifier::new(1))],
        );
        let course = Course::new(
            CourseIdentifier::new(9),
            [
                Config::new(ConfigIdentifier::new(1), [lec]),
                Config::new(ConfigIdentifier::new(2), [lab]),
            ],
        );
        let ids: Vec<usize> = course.iter_classes().map(|c| *c.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            course.iter_classes().last().and_then(|c| c.parent()),
            Some(ClassIdentifier::new(1))
        );
    }
}
