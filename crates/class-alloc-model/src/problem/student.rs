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
    problem::class::CourseIdentifier,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentIdentifierMarker;

impl IdentifierMarkerName for StudentIdentifierMarker {
    const NAME: &'static str = "StudentId";
}

pub type StudentIdentifier = Identifier<usize, StudentIdentifierMarker>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentIdentifier,
    courses: BTreeSet<CourseIdentifier>,
}

impl Student {
    #[inline]
    pub fn new<I>(id: StudentIdentifier, courses: I) -> Self
    where
        I: IntoIterator<Item = CourseIdentifier>,
    {
        Self {
            id,
            courses: courses.into_iter().collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> StudentIdentifier {
        self.id
    }

    #[inline]
    pub fn courses(&self) -> &BTreeSet<CourseIdentifier> {
        &self.courses
    }

    #[inline]
    pub fn is_enrolled_in(&self, course: CourseIdentifier) -> bool {
        self.courses.contains(&course)
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Student(id: {}, courses: {})", self.id, self.courses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_enrollments_collapse() {
        let s = Student::new(
            StudentIdentifier::new(1),
            [CourseIdentifier::new(3), CourseIdentifier::new(3), CourseIdentifier::new(1)],
        );
        assert_eq!(s.courses().len(), 2);
        assert!(s.is_enrolled_in(CourseIdentifier::new(1)));
        assert!(!s.is_enrolled_in(CourseIdentifier::new(2)));
    }
}
