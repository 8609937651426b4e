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
    class::Course,
    distribution::Distribution,
    err::StructuralError,
    prob::ProblemModel,
    room::Room,
    student::Student,
    time::TimeGrid,
    weights::OptimizationWeights,
};

#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    name: String,
    grid: TimeGrid,
    weights: Option<OptimizationWeights>,
    rooms: Vec<Room>,
    courses: Vec<Course>,
    distributions: Vec<Distribution>,
    students: Vec<Student>,
}

impl ProblemBuilder {
    #[inline]
    pub fn new(name: impl Into<String>, grid: TimeGrid) -> Self {
        Self {
            name: name.into(),
            grid,
            weights: None,
            rooms: Vec::new(),
            courses: Vec::new(),
            distributions: Vec::new(),
            students: Vec::new(),
        }
    }

    #[inline]
    pub fn with_weights(mut self, weights: OptimizationWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    #[inline]
    pub fn with_rooms<I>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = Room>,
    {
        self.rooms.clear();
        self.rooms.extend(rooms);
        self
    }

    #[inline]
    pub fn with_courses<I>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = Course>,
    {
        self.courses.clear();
        self.courses.extend(courses);
        self
    }

    #[inline]
    pub fn set_weights(&mut self, weights: OptimizationWeights) -> &mut Self {
        self.weights = Some(weights);
        self
    }

    #[inline]
    pub fn add_room(&mut self, room: Room) -> &mut Self {
        self.rooms.push(room);
        self
    }

    #[inline]
    pub fn extend_rooms<I>(&mut self, rooms: I) -> &mut Self
    where
        I: IntoIterator<Item = Room>,
    {
        self.rooms.extend(rooms);
        self
    }

    #[inline]
    pub fn add_course(&mut self, course: Course) -> &mut Self {
        self.courses.push(course);
        self
    }

    #[inline]
    pub fn extend_courses<I>(&mut self, courses: I) -> &mut Self
    where
        I: IntoIterator<Item = Course>,
    {
        self.courses.extend(courses);
        self
    }

    #[inline]
    pub fn add_distribution(&mut self, distribution: Distribution) -> &mut Self {
        self.distributions.push(distribution);
        self
    }

    #[inline]
    pub fn extend_distributions<I>(&mut self, distributions: I) -> &mut Self
    where
        I: IntoIterator<Item = Distribution>,
    {
        self.distributions.extend(distributions);
        self
    }

    #[inline]
    pub fn add_student(&mut self, student: Student) -> &mut Self {
        self.students.push(student);
        self
    }

    #[inline]
    pub fn extend_students<I>(&mut self, students: I) -> &mut Self
    where
        I: IntoIterator<Item = Student>,
    {
        self.students.extend(students);
        self
    }

    #[inline]
    pub fn build(self) -> Result<ProblemModel, StructuralError> {
        let weights = self.weights.ok_or(StructuralError::MissingWeights)?;
        ProblemModel::new(
            self.name,
            self.grid,
            weights,
            self.rooms,
            self.courses,
            self.distributions,
            self.students,
        )
    }
}
