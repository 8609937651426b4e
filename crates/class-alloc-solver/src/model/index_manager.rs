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

use crate::model::index::{ClassIndex, CourseIndex, RoomIndex};
use class_alloc_model::prelude::{ClassIdentifier, CourseIdentifier, ProblemModel, RoomIdentifier};
use std::collections::HashMap;

/// Dense, id-sorted numbering of the classes, rooms and courses of a problem.
#[derive(Debug, Clone)]
pub struct SolverIndexManager {
    class_to_index: HashMap<ClassIdentifier, ClassIndex>,
    room_to_index: HashMap<RoomIdentifier, RoomIndex>,
    course_to_index: HashMap<CourseIdentifier, CourseIndex>,
    index_to_class: Vec<ClassIdentifier>,
    index_to_room: Vec<RoomIdentifier>,
    index_to_course: Vec<CourseIdentifier>,
}

impl SolverIndexManager {
    #[inline]
    pub fn new(
        index_to_class: Vec<ClassIdentifier>,
        index_to_room: Vec<RoomIdentifier>,
        index_to_course: Vec<CourseIdentifier>,
    ) -> Self {
        let class_to_index = index_to_class
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| (id, ClassIndex(i)))
            .collect();
        let room_to_index = index_to_room
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| (id, RoomIndex(i)))
            .collect();
        let course_to_index = index_to_course
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| (id, CourseIndex(i)))
            .collect();
        Self {
            class_to_index,
            room_to_index,
            course_to_index,
            index_to_class,
            index_to_room,
            index_to_course,
        }
    }

    #[inline]
    pub fn class_index(&self, id: ClassIdentifier) -> Option<ClassIndex> {
        self.class_to_index.get(&id).copied()
    }

    #[inline]
    pub fn room_index(&self, id: RoomIdentifier) -> Option<RoomIndex> {
        self.room_to_index.get(&id).copied()
    }

    #[inline]
    pub fn course_index(&self, id: CourseIdentifier) -> Option<CourseIndex> {
        self.course_to_index.get(&id).copied()
    }

    #[inline]
    pub fn class_id(&self, i: ClassIndex) -> Option<ClassIdentifier> {
        self.index_to_class.get(i.0).copied()
    }

    #[inline]
    pub fn room_id(&self, i: RoomIndex) -> Option<RoomIdentifier> {
        self.index_to_room.get(i.0).copied()
    }

    #[inline]
    pub fn course_id(&self, i: CourseIndex) -> Option<CourseIdentifier> {
        self.index_to_course.get(i.0).copied()
    }

    #[inline]
    pub fn classes_len(&self) -> usize {
        self.index_to_class.len()
    }

    #[inline]
    pub fn rooms_len(&self) -> usize {
        self.index_to_room.len()
    }

    #[inline]
    pub fn courses_len(&self) -> usize {
        self.index_to_course.len()
    }
}

impl From<&ProblemModel> for SolverIndexManager {
    fn from(problem: &ProblemModel) -> Self {
        let mut classes: Vec<ClassIdentifier> = problem.iter_classes().map(|c| c.id()).collect();
        classes.sort_unstable();

        let mut rooms: Vec<RoomIdentifier> = problem.rooms().iter().map(|r| r.id()).collect();
        rooms.sort_unstable();

        let mut courses: Vec<CourseIdentifier> = problem.courses().iter().map(|c| c.id()).collect();
        courses.sort_unstable();

        Self::new(classes, rooms, courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use class_alloc_model::prelude::{
        ClassSpec, Config, ConfigIdentifier, Course, OptimizationWeights, ProblemBuilder, Room,
        RoomOption, Subpart, SubpartIdentifier, TimeGrid, TimePattern,
    };

    fn class(id: usize, room: usize) -> ClassSpec {
        ClassSpec::new(ClassIdentifier::new(id))
            .with_times([TimePattern::new(
                "10000".parse().unwrap(),
                0,
                2,
                "1".parse().unwrap(),
                0,
            )])
            .with_rooms([RoomOption::new(RoomIdentifier::new(room), 0)])
    }

    fn course(id: usize, classes: Vec<ClassSpec>) -> Course {
        Course::new(
            CourseIdentifier::new(id),
            [Config::new(
                ConfigIdentifier::new(1),
                [Subpart::new(SubpartIdentifier::new(1), classes)],
            )],
        )
    }

    fn problem() -> ProblemModel {
        let mut b = ProblemBuilder::new("ids", TimeGrid::new(5, 10, 1))
            .with_weights(OptimizationWeights::default());
        b.add_room(Room::new(RoomIdentifier::new(30), 5))
            .add_room(Room::new(RoomIdentifier::new(10), 5))
            .add_course(course(9, vec![class(7, 30), class(2, 10)]))
            .add_course(course(4, vec![class(5, 10)]));
        b.build().unwrap()
    }

    #[test]
    fn test_indices_follow_sorted_ids() {
        let im = SolverIndexManager::from(&problem());
        assert_eq!(im.classes_len(), 3);
        assert_eq!(im.rooms_len(), 2);
        assert_eq!(im.courses_len(), 2);

        assert_eq!(im.class_index(ClassIdentifier::new(2)), Some(ClassIndex(0)));
        assert_eq!(im.class_index(ClassIdentifier::new(5)), Some(ClassIndex(1)));
        assert_eq!(im.class_index(ClassIdentifier::new(7)), Some(ClassIndex(2)));
        assert_eq!(im.room_index(RoomIdentifier::new(10)), Some(RoomIndex(0)));
        assert_eq!(im.course_index(CourseIdentifier::new(4)), Some(CourseIndex(0)));
    }

    #[test]
    fn test_round_trip_and_unknowns() {
        let im = SolverIndexManager::from(&problem());
        for i in 0..im.classes_len() {
            let id = im.class_id(ClassIndex(i)).unwrap();
            assert_eq!(im.class_index(id), Some(ClassIndex(i)));
        }
        assert_eq!(im.room_id(RoomIndex(1)), Some(RoomIdentifier::new(30)));
        assert_eq!(im.class_index(ClassIdentifier::new(99)), None);
        assert_eq!(im.room_id(RoomIndex(2)), None);
    }
}
