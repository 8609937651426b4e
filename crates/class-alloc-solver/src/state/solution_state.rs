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
    model::{
        index::{ClassIndex, CourseIndex, RoomIndex},
        solver_model::SolverModel,
    },
    state::{
        moves::{Choice, Move},
        occupancy::Occupancy,
    },
};
use class_alloc_model::prelude::{RunMetadata, Solution, SolutionClass, TimePattern};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One choice per class together with the room and course occupancy
/// indices derived from them.
///
/// The indices always mirror the choices: every mutation goes through
/// [`SolutionState::assign`], which lifts the class out of both indices and
/// places it back under its new choice.
#[derive(Debug, Clone)]
pub struct SolutionState<'m> {
    model: &'m SolverModel<'m>,
    choices: Vec<Choice>,
    rooms: Occupancy<RoomIndex>,
    courses: Occupancy<CourseIndex>,
}

impl<'m> SolutionState<'m> {
    /// Uniformly random choice per class, seeded for reproducibility.
    pub fn initialize(model: &'m SolverModel<'m>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::initialize_with(model, &mut rng)
    }

    pub fn initialize_with<R: Rng + ?Sized>(model: &'m SolverModel<'m>, rng: &mut R) -> Self {
        let choices = (0..model.classes_len())
            .map(|ci| {
                let class = ClassIndex(ci);
                let time = rng.random_range(0..model.times(class).len());
                let room = model
                    .requires_room(class)
                    .then(|| rng.random_range(0..model.room_alternatives(class).len()));
                Choice::new(time, room)
            })
            .collect();
        Self::from_choices(model, choices)
    }

    /// # Panics
    ///
    /// If `choices` does not hold exactly one entry per class.
    pub fn from_choices(model: &'m SolverModel<'m>, choices: Vec<Choice>) -> Self {
        assert_eq!(
            choices.len(),
            model.classes_len(),
            "one choice per class is required"
        );
        let mut state = Self {
            model,
            choices,
            rooms: Occupancy::new(),
            courses: Occupancy::new(),
        };
        for ci in 0..state.choices.len() {
            debug_assert!(state.is_valid_choice(ClassIndex(ci), state.choices[ci]));
            state.place(ClassIndex(ci));
        }
        state
    }

    #[inline]
    pub fn model(&self) -> &'m SolverModel<'m> {
        self.model
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[inline]
    pub fn choice(&self, class: ClassIndex) -> Choice {
        debug_assert!(class.0 < self.choices.len());
        self.choices[class.0]
    }

    #[inline]
    pub fn pattern(&self, class: ClassIndex) -> &'m TimePattern {
        self.model.time(class, self.choice(class).time())
    }

    #[inline]
    pub fn room(&self, class: ClassIndex) -> Option<RoomIndex> {
        self.choice(class)
            .room()
            .map(|o| self.model.room_alternative(class, o).room())
    }

    #[inline]
    pub fn room_occupants(&self, room: RoomIndex, cell: u32) -> &[ClassIndex] {
        self.rooms.at(room, cell)
    }

    #[inline]
    pub fn course_occupants(&self, course: CourseIndex, cell: u32) -> &[ClassIndex] {
        self.courses.at(course, cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Reassigns one class and updates both indices.
    pub fn assign(&mut self, class: ClassIndex, time: usize, room: Option<usize>) {
        let choice = Choice::new(time, room);
        debug_assert!(self.is_valid_choice(class, choice));
        if self.choices[class.0] == choice {
            return;
        }
        self.lift(class);
        self.choices[class.0] = choice;
        self.place(class);
    }

    pub fn apply_move(&mut self, mv: &Move) {
        for change in mv.changes() {
            debug_assert_eq!(self.choice(change.class()), change.from());
            let to = change.to();
            self.assign(change.class(), to.time(), to.room());
        }
    }

    pub fn undo_move(&mut self, mv: &Move) {
        for change in mv.changes().iter().rev() {
            debug_assert_eq!(self.choice(change.class()), change.to());
            let from = change.from();
            self.assign(change.class(), from.time(), from.room());
        }
    }

    /// Copies the current choices into a [`Solution`], in class index order.
    pub fn snapshot(&self, meta: RunMetadata) -> Solution {
        let model = self.model;
        let classes = (0..self.choices.len())
            .filter_map(|ci| {
                let class = ClassIndex(ci);
                let id = model.class_id(class)?;
                let pattern = self.pattern(class);
                let room = self.room(class).and_then(|r| model.room_id(r));
                Some(SolutionClass::new(
                    id,
                    pattern.days(),
                    pattern.start(),
                    pattern.weeks(),
                    room,
                ))
            })
            .collect();
        Solution::new(meta, classes)
    }

    /// Rebuilds both indices from the choices and compares.
    pub fn is_consistent(&self) -> bool {
        let mut fresh = Self {
            model: self.model,
            choices: self.choices.clone(),
            rooms: Occupancy::new(),
            courses: Occupancy::new(),
        };
        for ci in 0..fresh.choices.len() {
            if !fresh.is_valid_choice(ClassIndex(ci), fresh.choices[ci]) {
                return false;
            }
            fresh.place(ClassIndex(ci));
        }
        fresh.rooms == self.rooms && fresh.courses == self.courses
    }

    fn is_valid_choice(&self, class: ClassIndex, choice: Choice) -> bool {
        let model = self.model;
        if choice.time() >= model.times(class).len() {
            return false;
        }
        match choice.room() {
            Some(o) => model.requires_room(class) && o < model.room_alternatives(class).len(),
            None => !model.requires_room(class),
        }
    }

    fn place(&mut self, class: ClassIndex) {
        let model = self.model;
        let course = model.course(class);
        let room = self.room(class);
        for cell in model.cells(self.pattern(class)) {
            if let Some(r) = room {
                self.rooms.insert(r, cell, class);
            }
            self.courses.insert(course, cell, class);
        }
    }

    fn lift(&mut self, class: ClassIndex) {
        let model = self.model;
        let course = model.course(class);
        let room = self.room(class);
        for cell in model.cells(self.pattern(class)) {
            if let Some(r) = room {
                let removed = self.rooms.remove(r, cell, class);
                debug_assert!(removed);
            }
            let removed = self.courses.remove(course, cell, class);
            debug_assert!(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::moves::Change,
        test_support::{random_problem, room_clash_problem, two_course_problem},
    };
    use class_alloc_model::prelude::ClassIdentifier;

    #[test]
    fn test_initialize_is_deterministic_and_consistent() {
        let p = random_problem(7, 12);
        let model = SolverModel::from_problem(&p).unwrap();
        let a = SolutionState::initialize(&model, 42);
        let b = SolutionState::initialize(&model, 42);
        assert_eq!(a.choices(), b.choices());
        assert!(a.is_consistent());
        for ci in 0..model.classes_len() {
            let class = ClassIndex(ci);
            assert_eq!(a.choice(class).room().is_some(), model.requires_room(class));
        }
    }

    #[test]
    fn test_occupancy_follows_assignments() {
        let p = room_clash_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let mut s = SolutionState::from_choices(
            &model,
            vec![Choice::new(0, Some(0)), Choice::new(0, Some(0))],
        );
        // Monday of week 0 is cell 0, Monday of week 1 is cell 5.
        assert_eq!(s.room_occupants(RoomIndex(0), 0).len(), 2);
        assert_eq!(s.room_occupants(RoomIndex(0), 5).len(), 2);

        s.assign(ClassIndex(1), 1, Some(0));
        assert_eq!(s.room_occupants(RoomIndex(0), 0), &[ClassIndex(0)]);
        assert_eq!(s.room_occupants(RoomIndex(0), 1), &[ClassIndex(1)]);
        assert_eq!(s.course_occupants(CourseIndex(1), 6), &[ClassIndex(1)]);
        assert!(s.is_consistent());
    }

    #[test]
    fn test_apply_and_undo_restore_state() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let mut s = SolutionState::initialize(&model, 3);
        let before = s.choices().to_vec();

        let c0 = s.choice(ClassIndex(0));
        let c2 = s.choice(ClassIndex(2));
        let mv = Move::pair(
            Change::new(ClassIndex(0), c0, c0.with_time(1 - c0.time()).with_room(Some(1))),
            Change::new(ClassIndex(2), c2, c2.with_time(1 - c2.time())),
        );
        s.apply_move(&mv);
        assert_ne!(s.choices(), before.as_slice());
        assert_eq!(s.room(ClassIndex(0)), Some(RoomIndex(1)));
        assert!(s.is_consistent());

        s.undo_move(&mv);
        assert_eq!(s.choices(), before.as_slice());
        assert!(s.is_consistent());
    }

    #[test]
    fn test_snapshot_is_a_valid_solution() {
        let p = random_problem(11, 10);
        let model = SolverModel::from_problem(&p).unwrap();
        let s = SolutionState::initialize(&model, 5);
        let sol = s.snapshot(RunMetadata::new(p.name()));
        assert_eq!(sol.len(), p.class_count());
        assert_eq!(sol.validate(&p), Ok(()));
    }

    #[test]
    fn test_roomless_class_has_no_room_in_snapshot() {
        let p = two_course_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let s = SolutionState::initialize(&model, 9);
        let sol = s.snapshot(RunMetadata::new("x"));
        assert_eq!(sol.class(ClassIdentifier::new(3)).and_then(|c| c.room()), None);
        assert!(sol.class(ClassIdentifier::new(1)).and_then(|c| c.room()).is_some());
    }

    #[test]
    #[should_panic(expected = "one choice per class")]
    fn test_from_choices_rejects_wrong_length() {
        let p = room_clash_problem();
        let model = SolverModel::from_problem(&p).unwrap();
        let _ = SolutionState::from_choices(&model, vec![Choice::new(0, Some(0))]);
    }
}
