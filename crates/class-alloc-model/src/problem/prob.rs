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
    class::{ClassIdentifier, ClassSpec, Course, CourseIdentifier},
    distribution::Distribution,
    err::{
        CourseNotFoundError, DistributionClassNotFoundError, InvalidGridError, ParentNotFoundError,
        PatternOutsideGridError, PatternOwner, RoomNotFoundError, StructuralError,
        TravelTargetNotFoundError,
    },
    room::{Room, RoomIdentifier, RoomOption},
    student::{Student, StudentIdentifier},
    time::{TimeGrid, TimePattern},
    weights::OptimizationWeights,
};
use std::collections::{BTreeSet, HashMap};

/// Position of a class inside the course hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ClassPath {
    course: usize,
    config: usize,
    subpart: usize,
    class: usize,
}

/// The validated, read-only description of a timetabling instance.
///
/// Construction checks every cross reference, so lookups by an id that
/// occurs anywhere inside the model always succeed.
#[derive(Debug, Clone)]
pub struct ProblemModel {
    name: String,
    grid: TimeGrid,
    weights: OptimizationWeights,
    rooms: Vec<Room>,
    courses: Vec<Course>,
    distributions: Vec<Distribution>,
    students: Vec<Student>,
    room_index: HashMap<RoomIdentifier, usize>,
    course_index: HashMap<CourseIdentifier, usize>,
    class_index: HashMap<ClassIdentifier, ClassPath>,
    enrollment: HashMap<CourseIdentifier, BTreeSet<StudentIdentifier>>,
}

impl ProblemModel {
    pub fn new(
        name: impl Into<String>,
        grid: TimeGrid,
        weights: OptimizationWeights,
        rooms: Vec<Room>,
        courses: Vec<Course>,
        distributions: Vec<Distribution>,
        students: Vec<Student>,
    ) -> Result<Self, StructuralError> {
        if !grid.is_valid() {
            return Err(InvalidGridError::new(grid).into());
        }

        let mut room_index = HashMap::with_capacity(rooms.len());
        for (i, room) in rooms.iter().enumerate() {
            if room_index.insert(room.id(), i).is_some() {
                return Err(StructuralError::DuplicateRoom(room.id()));
            }
            for u in room.unavailable() {
                check_fits(grid, PatternOwner::Room(room.id()), u)?;
            }
        }
        for room in &rooms {
            if let Some(&target) = room.travel().keys().find(|t| !room_index.contains_key(t)) {
                return Err(TravelTargetNotFoundError::new(room.id(), target).into());
            }
        }

        let mut course_index = HashMap::with_capacity(courses.len());
        let mut class_index = HashMap::new();
        for (ci, course) in courses.iter().enumerate() {
            if course_index.insert(course.id(), ci).is_some() {
                return Err(StructuralError::DuplicateCourse(course.id()));
            }
            for (gi, config) in course.configs().iter().enumerate() {
                for (si, subpart) in config.subparts().iter().enumerate() {
                    for (ki, class) in subpart.classes().iter().enumerate() {
                        let path = ClassPath {
                            course: ci,
                            config: gi,
                            subpart: si,
                            class: ki,
                        };
                        if class_index.insert(class.id(), path).is_some() {
                            return Err(StructuralError::DuplicateClass(class.id()));
                        }
                        validate_class(grid, class, &room_index)?;
                    }
                }
            }
        }

        for course in &courses {
            for class in course.iter_classes() {
                if let Some(parent) = class.parent()
                    && !class_index.contains_key(&parent)
                {
                    return Err(ParentNotFoundError::new(class.id(), parent).into());
                }
            }
        }

        for (i, d) in distributions.iter().enumerate() {
            if let Some(&missing) = d.classes().iter().find(|c| !class_index.contains_key(c)) {
                return Err(DistributionClassNotFoundError::new(i, missing).into());
            }
        }

        let mut enrollment: HashMap<CourseIdentifier, BTreeSet<StudentIdentifier>> = courses
            .iter()
            .map(|c| (c.id(), BTreeSet::new()))
            .collect();
        let mut seen_students = BTreeSet::new();
        for student in &students {
            if !seen_students.insert(student.id()) {
                return Err(StructuralError::DuplicateStudent(student.id()));
            }
            for &course in student.courses() {
                match enrollment.get_mut(&course) {
                    Some(set) => {
                        set.insert(student.id());
                    }
                    None => return Err(CourseNotFoundError::new(student.id(), course).into()),
                }
            }
        }

        Ok(Self {
            name: name.into(),
            grid,
            weights,
            rooms,
            courses,
            distributions,
            students,
            room_index,
            course_index,
            class_index,
            enrollment,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    #[inline]
    pub fn weights(&self) -> OptimizationWeights {
        self.weights
    }

    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn room(&self, id: RoomIdentifier) -> Option<&Room> {
        self.room_index.get(&id).map(|&i| &self.rooms[i])
    }

    #[inline]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[inline]
    pub fn course(&self, id: CourseIdentifier) -> Option<&Course> {
        self.course_index.get(&id).map(|&i| &self.courses[i])
    }

    #[inline]
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    #[inline]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    #[inline]
    pub fn class_count(&self) -> usize {
        self.class_index.len()
    }

    pub fn class(&self, id: ClassIdentifier) -> Option<&ClassSpec> {
        let p = self.class_index.get(&id)?;
        Some(&self.courses[p.course].configs()[p.config].subparts()[p.subpart].classes()[p.class])
    }

    #[inline]
    pub fn course_of(&self, class: ClassIdentifier) -> Option<CourseIdentifier> {
        self.class_index
            .get(&class)
            .map(|p| self.courses[p.course].id())
    }

    #[inline]
    pub fn time_alternatives(&self, class: ClassIdentifier) -> Option<&[TimePattern]> {
        self.class(class).map(|c| c.times())
    }

    #[inline]
    pub fn room_alternatives(&self, class: ClassIdentifier) -> Option<&[RoomOption]> {
        self.class(class).map(|c| c.rooms())
    }

    /// Students enrolled in the course; empty for a known course without
    /// enrollments and `None` for an unknown course.
    #[inline]
    pub fn enrolled_students(
        &self,
        course: CourseIdentifier,
    ) -> Option<&BTreeSet<StudentIdentifier>> {
        self.enrollment.get(&course)
    }

    /// Number of students attending the class, i.e. enrolled in its course.
    #[inline]
    pub fn class_enrollment(&self, class: ClassIdentifier) -> usize {
        self.course_of(class)
            .and_then(|c| self.enrollment.get(&c))
            .map_or(0, BTreeSet::len)
    }

    /// Travel time between two rooms in slots. Instances usually list each
    /// pair once, so both directions are consulted.
    #[inline]
    pub fn travel_time(&self, a: RoomIdentifier, b: RoomIdentifier) -> u32 {
        if a == b {
            return 0;
        }
        let ab = self.room(a).map_or(0, |r| r.travel_to(b));
        let ba = self.room(b).map_or(0, |r| r.travel_to(a));
        ab.max(ba)
    }

    /// Every class in hierarchy order.
    #[inline]
    pub fn iter_classes(&self) -> impl Iterator<Item = &ClassSpec> + '_ {
        self.courses.iter().flat_map(|c| c.iter_classes())
    }

    /// Every class in hierarchy order together with its course.
    #[inline]
    pub fn iter_classes_with_course(
        &self,
    ) -> impl Iterator<Item = (CourseIdentifier, &ClassSpec)> + '_ {
        self.courses
            .iter()
            .flat_map(|c| c.iter_classes().map(move |k| (c.id(), k)))
    }
}

fn check_fits(
    grid: TimeGrid,
    owner: PatternOwner,
    pattern: &TimePattern,
) -> Result<(), StructuralError> {
    if grid.fits(pattern) {
        Ok(())
    } else {
        Err(PatternOutsideGridError::new(owner, *pattern, grid).into())
    }
}

fn validate_class(
    grid: TimeGrid,
    class: &ClassSpec,
    room_index: &HashMap<RoomIdentifier, usize>,
) -> Result<(), StructuralError> {
    if class.times().is_empty() {
        return Err(StructuralError::EmptyTimeAlternatives(class.id()));
    }
    for t in class.times() {
        check_fits(grid, PatternOwner::Class(class.id()), t)?;
    }
    if class.requires_room() && class.rooms().is_empty() {
        return Err(StructuralError::EmptyRoomAlternatives(class.id()));
    }
    for option in class.rooms() {
        if !room_index.contains_key(&option.room()) {
            return Err(RoomNotFoundError::new(class.id(), option.room()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{
        class::{Config, ConfigIdentifier, Subpart, SubpartIdentifier},
        distribution::DistributionKind,
    };
    use static_assertions::assert_impl_all;

    assert_impl_all!(ProblemModel: Send, Sync);

    fn grid() -> TimeGrid {
        TimeGrid::new(5, 12, 2)
    }

    fn tp(days: &str, start: u32, length: u32) -> TimePattern {
        TimePattern::new(days.parse().unwrap(), start, length, "11".parse().unwrap(), 0)
    }

    fn rid(n: usize) -> RoomIdentifier {
        RoomIdentifier::new(n)
    }

    fn cid(n: usize) -> ClassIdentifier {
        ClassIdentifier::new(n)
    }

    fn class(id: usize, room: usize) -> ClassSpec {
        ClassSpec::new(cid(id))
            .with_times([tp("10000", 0, 2), tp("01000", 4, 2)])
            .with_rooms([RoomOption::new(rid(room), 0)])
    }

    fn course(id: usize, classes: Vec<ClassSpec>) -> Course {
        Course::new(
            CourseIdentifier::new(id),
            [Config::new(
                ConfigIdentifier::new(id),
                [Subpart::new(SubpartIdentifier::new(id), classes)],
            )],
        )
    }

    fn build(
        rooms: Vec<Room>,
        courses: Vec<Course>,
        distributions: Vec<Distribution>,
        students: Vec<Student>,
    ) -> Result<ProblemModel, StructuralError> {
        ProblemModel::new(
            "t",
            grid(),
            OptimizationWeights::new(1, 1, 1, 1),
            rooms,
            courses,
            distributions,
            students,
        )
    }

    #[test]
    fn test_valid_model_answers_queries() {
        let rooms = vec![
            Room::new(rid(1), 20).with_travel([(rid(2), 3)]),
            Room::new(rid(2), 40),
        ];
        let courses = vec![
            course(1, vec![class(1, 1), class(2, 2).with_parent(cid(1))]),
            course(2, vec![class(3, 2).without_room()]),
        ];
        let students = vec![
            Student::new(StudentIdentifier::new(1), [CourseIdentifier::new(1)]),
            Student::new(
                StudentIdentifier::new(2),
                [CourseIdentifier::new(1), CourseIdentifier::new(2)],
            ),
        ];
        let p = build(rooms, courses, vec![], students).unwrap();

        assert_eq!(p.class_count(), 3);
        assert_eq!(p.course_of(cid(2)), Some(CourseIdentifier::new(1)));
        assert_eq!(p.course_of(cid(9)), None);
        assert_eq!(p.time_alternatives(cid(1)).map(<[_]>::len), Some(2));
        assert_eq!(p.room_alternatives(cid(3)).map(<[_]>::len), Some(0));
        assert_eq!(p.class_enrollment(cid(1)), 2);
        assert_eq!(p.class_enrollment(cid(3)), 1);
        assert_eq!(
            p.enrolled_students(CourseIdentifier::new(2)).map(BTreeSet::len),
            Some(1)
        );
        assert_eq!(p.room(rid(2)).map(Room::capacity), Some(40));
        assert_eq!(p.travel_time(rid(1), rid(2)), 3);
        assert_eq!(p.travel_time(rid(2), rid(1)), 3);
        assert_eq!(p.travel_time(rid(2), rid(2)), 0);

        let ids: Vec<usize> = p.iter_classes().map(|c| *c.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_room_in_class_is_rejected() {
        let err = build(
            vec![Room::new(rid(1), 10)],
            vec![course(1, vec![class(1, 7)])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StructuralError::RoomNotFound(RoomNotFoundError::new(cid(1), rid(7))));
    }

    #[test]
    fn test_unknown_travel_target_is_rejected() {
        let rooms = vec![Room::new(rid(1), 10).with_travel([(rid(5), 2)])];
        let err = build(rooms, vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, StructuralError::TravelTargetNotFound(e) if e.target() == rid(5)));
    }

    #[test]
    fn test_unknown_distribution_class_is_rejected() {
        let d = Distribution::required(DistributionKind::SameTime, [cid(1), cid(42)]);
        let err = build(
            vec![Room::new(rid(1), 10)],
            vec![course(1, vec![class(1, 1)])],
            vec![d],
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err,
            StructuralError::DistributionClassNotFound(DistributionClassNotFoundError::new(
                0,
                cid(42)
            ))
        );
    }

    #[test]
    fn test_empty_alternatives_are_rejected() {
        let no_times = ClassSpec::new(cid(1)).with_rooms([RoomOption::new(rid(1), 0)]);
        let err = build(
            vec![Room::new(rid(1), 10)],
            vec![course(1, vec![no_times])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StructuralError::EmptyTimeAlternatives(cid(1)));

        let no_rooms = ClassSpec::new(cid(2)).with_times([tp("10000", 0, 1)]);
        let err = build(vec![], vec![course(1, vec![no_rooms])], vec![], vec![]).unwrap_err();
        assert_eq!(err, StructuralError::EmptyRoomAlternatives(cid(2)));

        // a class without a room needs no options
        let roomless = ClassSpec::new(cid(3)).with_times([tp("10000", 0, 1)]).without_room();
        assert!(build(vec![], vec![course(1, vec![roomless])], vec![], vec![]).is_ok());
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let err = build(
            vec![Room::new(rid(1), 10), Room::new(rid(1), 20)],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StructuralError::DuplicateRoom(rid(1)));

        let err = build(
            vec![Room::new(rid(1), 10)],
            vec![course(1, vec![class(1, 1)]), course(2, vec![class(1, 1)])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StructuralError::DuplicateClass(cid(1)));
    }

    #[test]
    fn test_unknown_parent_and_course_are_rejected() {
        let err = build(
            vec![Room::new(rid(1), 10)],
            vec![course(1, vec![class(1, 1).with_parent(cid(8))])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StructuralError::ParentNotFound(ParentNotFoundError::new(cid(1), cid(8))));

        let err = build(
            vec![],
            vec![],
            vec![],
            vec![Student::new(StudentIdentifier::new(1), [CourseIdentifier::new(3)])],
        )
        .unwrap_err();
        assert!(matches!(err, StructuralError::CourseNotFound(_)));
    }

    #[test]
    fn test_patterns_must_fit_the_grid() {
        let late = ClassSpec::new(cid(1))
            .with_times([tp("10000", 11, 2)])
            .without_room();
        let err = build(vec![], vec![course(1, vec![late])], vec![], vec![]).unwrap_err();
        assert!(matches!(
            err,
            StructuralError::PatternOutsideGrid(e) if e.owner() == PatternOwner::Class(cid(1))
        ));

        let room = Room::new(rid(1), 10).with_unavailable([TimePattern::unavailable(
            "1000000".parse().unwrap(),
            0,
            1,
            "11".parse().unwrap(),
        )]);
        let err = build(vec![room], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, StructuralError::PatternOutsideGrid(_)));

        let err = ProblemModel::new(
            "bad",
            TimeGrid::new(5, 0, 2),
            OptimizationWeights::default(),
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, StructuralError::InvalidGrid(_)));
    }
}
