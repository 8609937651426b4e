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

use crate::model::{
    err::{MissingClassError, SolverModelBuildError},
    index::{ClassIndex, CourseIndex, RoomIndex},
    index_manager::SolverIndexManager,
};
use class_alloc_core::prelude::Cost;
use class_alloc_model::{
    prelude::{
        ClassIdentifier, DistributionKind, OptimizationWeights, ProblemModel, Room,
        RoomIdentifier, TimeGrid, TimePattern,
    },
    problem::err::RoomNotFoundError,
};
use fixedbitset::FixedBitSet;
use fxhash::FxHashMap;

/// A room a class may be placed in, with its penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomAlternative {
    room: RoomIndex,
    penalty: u32,
}

impl RoomAlternative {
    #[inline]
    pub fn new(room: RoomIndex, penalty: u32) -> Self {
        Self { room, penalty }
    }

    #[inline]
    pub fn room(&self) -> RoomIndex {
        self.room
    }

    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }
}

/// A distribution with its classes translated to dense indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEntry {
    kind: DistributionKind,
    required: bool,
    penalty: u32,
    classes: Vec<ClassIndex>,
}

impl DistributionEntry {
    #[inline]
    pub fn new(
        kind: DistributionKind,
        required: bool,
        penalty: u32,
        classes: Vec<ClassIndex>,
    ) -> Self {
        Self {
            kind,
            required,
            penalty,
            classes,
        }
    }

    #[inline]
    pub fn kind(&self) -> DistributionKind {
        self.kind
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// Classes in declaration order; `Precedence` depends on it.
    #[inline]
    pub fn classes(&self) -> &[ClassIndex] {
        &self.classes
    }
}

/// Read-only, index-addressed view of a [`ProblemModel`] for the search.
///
/// Everything the evaluator touches in its inner loop is precomputed here:
/// per-class alternatives, room data, the shared-student counts between
/// courses and the list of distributions each class takes part in.
#[derive(Debug, Clone)]
pub struct SolverModel<'problem> {
    problem: &'problem ProblemModel,
    index_manager: SolverIndexManager,
    grid: TimeGrid,
    weights: OptimizationWeights,
    times: Vec<Vec<TimePattern>>,
    room_alternatives: Vec<Vec<RoomAlternative>>,
    requires_room: Vec<bool>,
    class_course: Vec<CourseIndex>,
    class_enrollment: Vec<usize>,
    rooms: Vec<&'problem Room>,
    travel: Vec<u32>,
    course_sizes: Vec<usize>,
    shared: FxHashMap<(CourseIndex, CourseIndex), usize>,
    course_neighbors: Vec<Vec<CourseIndex>>,
    course_classes: Vec<Vec<ClassIndex>>,
    distributions: Vec<DistributionEntry>,
    class_distributions: Vec<Vec<usize>>,
    available_times: Vec<FixedBitSet>,
    big_m: Cost,
}

impl<'problem> SolverModel<'problem> {
    #[inline]
    pub fn problem(&self) -> &'problem ProblemModel {
        self.problem
    }

    #[inline]
    pub fn index_manager(&self) -> &SolverIndexManager {
        &self.index_manager
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
    pub fn classes_len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn rooms_len(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn courses_len(&self) -> usize {
        self.course_sizes.len()
    }

    #[inline]
    pub fn class_id(&self, class: ClassIndex) -> Option<ClassIdentifier> {
        self.index_manager.class_id(class)
    }

    #[inline]
    pub fn room_id(&self, room: RoomIndex) -> Option<RoomIdentifier> {
        self.index_manager.room_id(room)
    }

    #[inline]
    pub fn times(&self, class: ClassIndex) -> &[TimePattern] {
        debug_assert!(class.0 < self.times.len());
        &self.times[class.0]
    }

    #[inline]
    pub fn time(&self, class: ClassIndex, time: usize) -> &TimePattern {
        let times = self.times(class);
        debug_assert!(time < times.len());
        &times[time]
    }

    #[inline]
    pub fn room_alternatives(&self, class: ClassIndex) -> &[RoomAlternative] {
        debug_assert!(class.0 < self.room_alternatives.len());
        &self.room_alternatives[class.0]
    }

    #[inline]
    pub fn room_alternative(&self, class: ClassIndex, option: usize) -> RoomAlternative {
        let rooms = self.room_alternatives(class);
        debug_assert!(option < rooms.len());
        rooms[option]
    }

    #[inline]
    pub fn requires_room(&self, class: ClassIndex) -> bool {
        debug_assert!(class.0 < self.requires_room.len());
        self.requires_room[class.0]
    }

    #[inline]
    pub fn course(&self, class: ClassIndex) -> CourseIndex {
        debug_assert!(class.0 < self.class_course.len());
        self.class_course[class.0]
    }

    /// Students attending the class.
    #[inline]
    pub fn enrollment(&self, class: ClassIndex) -> usize {
        debug_assert!(class.0 < self.class_enrollment.len());
        self.class_enrollment[class.0]
    }

    #[inline]
    pub fn room_capacity(&self, room: RoomIndex) -> u32 {
        debug_assert!(room.0 < self.rooms.len());
        self.rooms[room.0].capacity()
    }

    #[inline]
    pub fn room_is_available(&self, room: RoomIndex, pattern: &TimePattern) -> bool {
        debug_assert!(room.0 < self.rooms.len());
        self.rooms[room.0].is_available_for(pattern)
    }

    /// Travel time in slots, symmetric and zero for the same room.
    #[inline]
    pub fn travel(&self, a: RoomIndex, b: RoomIndex) -> u32 {
        let n = self.rooms.len();
        debug_assert!(a.0 < n && b.0 < n);
        self.travel[a.0 * n + b.0]
    }

    /// Number of students enrolled in both courses; the course size when
    /// `a == b`.
    #[inline]
    pub fn shared_students(&self, a: CourseIndex, b: CourseIndex) -> usize {
        if a == b {
            return self.course_sizes[a.0];
        }
        let key = if a < b { (a, b) } else { (b, a) };
        self.shared.get(&key).copied().unwrap_or(0)
    }

    /// Other courses sharing at least one student with `course`.
    #[inline]
    pub fn course_neighbors(&self, course: CourseIndex) -> &[CourseIndex] {
        debug_assert!(course.0 < self.course_neighbors.len());
        &self.course_neighbors[course.0]
    }

    #[inline]
    pub fn course_classes(&self, course: CourseIndex) -> &[ClassIndex] {
        debug_assert!(course.0 < self.course_classes.len());
        &self.course_classes[course.0]
    }

    #[inline]
    pub fn distributions(&self) -> &[DistributionEntry] {
        &self.distributions
    }

    #[inline]
    pub fn distribution(&self, index: usize) -> &DistributionEntry {
        debug_assert!(index < self.distributions.len());
        &self.distributions[index]
    }

    /// Positions in [`Self::distributions`] that mention `class`.
    #[inline]
    pub fn class_distributions(&self, class: ClassIndex) -> &[usize] {
        debug_assert!(class.0 < self.class_distributions.len());
        &self.class_distributions[class.0]
    }

    /// Time alternatives of `class` for which at least one usable room
    /// exists, or all of them if the class needs no room.
    #[inline]
    pub fn available_times(&self, class: ClassIndex) -> &FixedBitSet {
        debug_assert!(class.0 < self.available_times.len());
        &self.available_times[class.0]
    }

    #[inline]
    pub fn has_feasible_alternative(&self, class: ClassIndex) -> bool {
        !self.available_times(class).is_clear()
    }

    /// Strictly larger than any soft cost this model can produce.
    #[inline]
    pub fn big_m(&self) -> Cost {
        self.big_m
    }

    /// The (week, day) cells a pattern occupies, numbered
    /// `week * nr_days + day`.
    #[inline]
    pub fn cells(&self, pattern: &TimePattern) -> impl Iterator<Item = u32> + use<> {
        cells(self.grid.nr_days(), pattern)
    }

    pub fn from_problem(p: &'problem ProblemModel) -> Result<Self, SolverModelBuildError> {
        let index_manager = SolverIndexManager::from(p);
        let classes_len = index_manager.classes_len();
        let rooms_len = index_manager.rooms_len();
        let courses_len = index_manager.courses_len();
        let weights = p.weights();

        // Same order as the index manager.
        let mut rooms: Vec<&'problem Room> = p.rooms().iter().collect();
        rooms.sort_unstable_by_key(|r| r.id());
        debug_assert_eq!(rooms.len(), rooms_len);

        let mut travel = vec![0u32; rooms_len * rooms_len];
        for a in 0..rooms_len {
            for b in 0..rooms_len {
                travel[a * rooms_len + b] = p.travel_time(rooms[a].id(), rooms[b].id());
            }
        }

        let mut course_sizes = vec![0usize; courses_len];
        for ci in 0..courses_len {
            if let Some(id) = index_manager.course_id(CourseIndex(ci)) {
                course_sizes[ci] = p.enrolled_students(id).map_or(0, |s| s.len());
            }
        }

        let mut times = Vec::with_capacity(classes_len);
        let mut room_alternatives = Vec::with_capacity(classes_len);
        let mut requires_room = Vec::with_capacity(classes_len);
        let mut class_course = Vec::with_capacity(classes_len);
        let mut class_enrollment = Vec::with_capacity(classes_len);
        let mut available_times = Vec::with_capacity(classes_len);
        let mut course_classes = vec![Vec::new(); courses_len];

        for ci in 0..classes_len {
            let class = ClassIndex(ci);
            let id = index_manager
                .class_id(class)
                .ok_or_else(|| MissingClassError::new(ClassIdentifier::new(ci)))?;
            let spec = p.class(id).ok_or_else(|| MissingClassError::new(id))?;
            let course = p
                .course_of(id)
                .and_then(|c| index_manager.course_index(c))
                .ok_or_else(|| MissingClassError::new(id))?;

            let mut alternatives = Vec::with_capacity(spec.rooms().len());
            for option in spec.rooms() {
                let ri = index_manager
                    .room_index(option.room())
                    .ok_or_else(|| RoomNotFoundError::new(id, option.room()))?;
                alternatives.push(RoomAlternative::new(ri, option.penalty()));
            }

            let mut available = FixedBitSet::with_capacity(spec.times().len());
            for (t, pattern) in spec.times().iter().enumerate() {
                let usable = !spec.requires_room()
                    || alternatives
                        .iter()
                        .any(|a| rooms[a.room.0].is_available_for(pattern));
                available.set(t, usable);
            }

            times.push(spec.times().to_vec());
            room_alternatives.push(alternatives);
            requires_room.push(spec.requires_room());
            class_course.push(course);
            class_enrollment.push(course_sizes[course.0]);
            available_times.push(available);
            course_classes[course.0].push(class);
        }

        let mut shared: FxHashMap<(CourseIndex, CourseIndex), usize> = FxHashMap::default();
        for student in p.students() {
            let courses: Vec<CourseIndex> = student
                .courses()
                .iter()
                .filter_map(|c| index_manager.course_index(*c))
                .collect();
            for (i, &a) in courses.iter().enumerate() {
                for &b in &courses[i + 1..] {
                    let key = if a < b { (a, b) } else { (b, a) };
                    *shared.entry(key).or_insert(0) += 1;
                }
            }
        }

        let mut course_neighbors = vec![Vec::new(); courses_len];
        for &(a, b) in shared.keys() {
            course_neighbors[a.0].push(b);
            course_neighbors[b.0].push(a);
        }
        for n in &mut course_neighbors {
            n.sort_unstable();
        }

        let mut distributions = Vec::with_capacity(p.distributions().len());
        let mut class_distributions = vec![Vec::new(); classes_len];
        for (di, d) in p.distributions().iter().enumerate() {
            let mut classes = Vec::with_capacity(d.classes().len());
            for &id in d.classes() {
                let ci = index_manager
                    .class_index(id)
                    .ok_or_else(|| MissingClassError::new(id))?;
                classes.push(ci);
                let list = &mut class_distributions[ci.0];
                if list.last() != Some(&di) {
                    list.push(di);
                }
            }
            distributions.push(DistributionEntry::new(
                d.kind(),
                d.is_required(),
                d.penalty(),
                classes,
            ));
        }

        let big_m = soft_upper_bound(
            weights,
            &times,
            &room_alternatives,
            &distributions,
            &course_classes,
            &course_sizes,
            &shared,
        )
        .saturating_add(1);

        Ok(SolverModel {
            problem: p,
            index_manager,
            grid: p.grid(),
            weights,
            times,
            room_alternatives,
            requires_room,
            class_course,
            class_enrollment,
            rooms,
            travel,
            course_sizes,
            shared,
            course_neighbors,
            course_classes,
            distributions,
            class_distributions,
            available_times,
            big_m,
        })
    }
}

impl<'problem> TryFrom<&'problem ProblemModel> for SolverModel<'problem> {
    type Error = SolverModelBuildError;

    #[inline]
    fn try_from(problem: &'problem ProblemModel) -> Result<Self, Self::Error> {
        Self::from_problem(problem)
    }
}

/// The (week, day) cells of `pattern` on a grid with `nr_days` days per week.
#[inline]
pub fn cells(nr_days: usize, pattern: &TimePattern) -> impl Iterator<Item = u32> + use<> {
    let days = pattern.days();
    let nr_days = nr_days as u32;
    pattern
        .weeks()
        .iter_ones()
        .flat_map(move |w| days.iter_ones().map(move |d| w as u32 * nr_days + d as u32))
}

fn soft_upper_bound(
    weights: OptimizationWeights,
    times: &[Vec<TimePattern>],
    rooms: &[Vec<RoomAlternative>],
    distributions: &[DistributionEntry],
    course_classes: &[Vec<ClassIndex>],
    course_sizes: &[usize],
    shared: &FxHashMap<(CourseIndex, CourseIndex), usize>,
) -> Cost {
    let mut bound: Cost = 0;
    for (t, r) in times.iter().zip(rooms) {
        let worst_time = t.iter().map(|p| p.penalty()).max().unwrap_or(0) as Cost;
        let worst_room = r.iter().map(|a| a.penalty()).max().unwrap_or(0) as Cost;
        bound = bound
            .saturating_add(worst_time.saturating_mul(weights.time()))
            .saturating_add(worst_room.saturating_mul(weights.room()));
    }
    for d in distributions.iter().filter(|d| !d.is_required()) {
        bound = bound.saturating_add((d.penalty() as Cost).saturating_mul(weights.distribution()));
    }

    let pairs = |n: usize| (n as Cost).saturating_mul(n.saturating_sub(1) as Cost) / 2;
    let mut student_pairs: Cost = 0;
    for (k, classes) in course_classes.iter().enumerate() {
        let within = pairs(classes.len()).saturating_mul(course_sizes[k] as Cost);
        student_pairs = student_pairs.saturating_add(within);
    }
    for (&(a, b), &n) in shared {
        let cross = (course_classes[a.0].len() as Cost)
            .saturating_mul(course_classes[b.0].len() as Cost)
            .saturating_mul(n as Cost);
        student_pairs = student_pairs.saturating_add(cross);
    }
    bound.saturating_add(student_pairs.saturating_mul(weights.student()))
}
