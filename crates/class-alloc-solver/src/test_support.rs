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

//! Small instances shared by the unit tests.

use class_alloc_core::prelude::Mask;
use class_alloc_model::prelude::{
    ClassIdentifier, ClassSpec, Config, ConfigIdentifier, Course, CourseIdentifier, Distribution,
    DistributionKind, OptimizationWeights, ProblemBuilder, ProblemModel, Room, RoomIdentifier,
    RoomOption, Student, StudentIdentifier, Subpart, SubpartIdentifier, TimeGrid, TimePattern,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub(crate) fn m(s: &str) -> Mask {
    s.parse().unwrap()
}

/// Pattern on a 5-day, 2-week grid meeting in both weeks.
pub(crate) fn tp(days: &str, start: u32, length: u32, penalty: u32) -> TimePattern {
    TimePattern::new(m(days), start, length, m("11"), penalty)
}

pub(crate) fn cid(n: usize) -> ClassIdentifier {
    ClassIdentifier::new(n)
}

pub(crate) fn rid(n: usize) -> RoomIdentifier {
    RoomIdentifier::new(n)
}

pub(crate) fn single_subpart_course(id: usize, classes: Vec<ClassSpec>) -> Course {
    Course::new(
        CourseIdentifier::new(id),
        [Config::new(
            ConfigIdentifier::new(id),
            [Subpart::new(SubpartIdentifier::new(id), classes)],
        )],
    )
}

pub(crate) fn student(id: usize, courses: &[usize]) -> Student {
    Student::new(
        StudentIdentifier::new(id),
        courses.iter().map(|&c| CourseIdentifier::new(c)),
    )
}

/// Two rooms, two courses and three classes.
///
/// * room 1: capacity 10, 3 slots from room 2
/// * room 2: capacity 2, closed on Monday slots 0..6
/// * course 1 (3 students): classes 1 and 2, either room
/// * course 2 (2 students, one shared with course 1): class 3, no room
/// * classes 1 and 2 prefer different days, penalty 4
pub(crate) fn two_course_problem() -> ProblemModel {
    let c1 = ClassSpec::new(cid(1))
        .with_times([tp("10000", 0, 3, 2), tp("01000", 0, 3, 0)])
        .with_rooms([RoomOption::new(rid(1), 0), RoomOption::new(rid(2), 1)]);
    let c2 = ClassSpec::new(cid(2))
        .with_times([tp("10000", 0, 3, 0), tp("00100", 6, 3, 0)])
        .with_rooms([RoomOption::new(rid(1), 0), RoomOption::new(rid(2), 1)]);
    let c3 = ClassSpec::new(cid(3))
        .with_times([tp("10000", 4, 2, 0), tp("00010", 0, 2, 0)])
        .without_room();

    let mut b = ProblemBuilder::new("two-course", TimeGrid::new(5, 12, 2))
        .with_weights(OptimizationWeights::new(1, 1, 1, 1));
    b.add_room(Room::new(rid(1), 10).with_travel([(rid(2), 3)]))
        .add_room(Room::new(rid(2), 2).with_unavailable([tp("10000", 0, 6, 0)]))
        .add_course(single_subpart_course(1, vec![c1, c2]))
        .add_course(single_subpart_course(2, vec![c3]))
        .add_distribution(Distribution::preferred(
            DistributionKind::DifferentDays,
            4,
            [cid(1), cid(2)],
        ))
        .extend_students([
            student(1, &[1]),
            student(2, &[1]),
            student(3, &[1, 2]),
            student(4, &[2]),
        ]);
    b.build().unwrap()
}

/// Two unrelated classes that can only use room 1, at Monday or Tuesday
/// morning.
pub(crate) fn room_clash_problem() -> ProblemModel {
    let class = |id: usize| {
        ClassSpec::new(cid(id))
            .with_times([tp("10000", 0, 2, 0), tp("01000", 0, 2, 0)])
            .with_rooms([RoomOption::new(rid(1), 0)])
    };
    let mut b = ProblemBuilder::new("clash", TimeGrid::new(5, 12, 2))
        .with_weights(OptimizationWeights::new(1, 1, 1, 1));
    b.add_room(Room::new(rid(1), 30))
        .add_course(single_subpart_course(1, vec![class(1)]))
        .add_course(single_subpart_course(2, vec![class(2)]));
    b.build().unwrap()
}

fn random_mask<R: Rng>(rng: &mut R, width: usize, max_ones: usize) -> Mask {
    let ones = rng.random_range(1..=max_ones.min(width));
    let mut bits = 0u64;
    while (bits.count_ones() as usize) < ones {
        bits |= 1 << rng.random_range(0..width);
    }
    Mask::new(bits, width)
}

fn random_pattern<R: Rng>(rng: &mut R, grid: TimeGrid, penalty: bool) -> TimePattern {
    let length = rng.random_range(1..=4);
    let start = rng.random_range(0..=grid.slots_per_day() - length);
    TimePattern::new(
        random_mask(rng, grid.nr_days(), 2),
        start,
        length,
        random_mask(rng, grid.nr_weeks(), grid.nr_weeks()),
        if penalty { rng.random_range(0..4) } else { 0 },
    )
}

/// Random instance exercising every distribution kind, travel times, room
/// closures and room-less classes.
///
/// Every class keeps at least one time with an open room option.
pub(crate) fn random_problem(seed: u64, courses: usize) -> ProblemModel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = TimeGrid::new(5, 16, 3);
    let nr_rooms = 4;

    let mut rooms = Vec::new();
    for r in 1..=nr_rooms {
        let mut room = Room::new(rid(r), rng.random_range(2..12));
        for other in 1..=nr_rooms {
            if other != r && rng.random_bool(0.5) {
                room.add_travel(rid(other), rng.random_range(1..4));
            }
        }
        if rng.random_bool(0.5) {
            room.add_unavailable(random_pattern(&mut rng, grid, false));
        }
        rooms.push(room);
    }

    let mut next_class = 1;
    let mut all_classes = Vec::new();
    let mut course_list = Vec::new();
    for k in 1..=courses {
        let mut classes = Vec::new();
        for _ in 0..rng.random_range(1..=3) {
            let id = cid(next_class);
            next_class += 1;
            let options: Option<Vec<usize>> = (!rng.random_bool(0.15)).then(|| {
                let mut options: Vec<usize> = (1..=nr_rooms).collect();
                let keep = rng.random_range(1..=nr_rooms);
                while options.len() > keep {
                    options.remove(rng.random_range(0..options.len()));
                }
                options
            });
            // Redraw until some time has an open room option.
            let times = loop {
                let times: Vec<TimePattern> = (0..rng.random_range(1..=5))
                    .map(|_| random_pattern(&mut rng, grid, true))
                    .collect();
                let feasible = options.as_ref().is_none_or(|options| {
                    times.iter().any(|t| {
                        options.iter().any(|&r| rooms[r - 1].is_available_for(t))
                    })
                });
                if feasible {
                    break times;
                }
            };
            let spec = ClassSpec::new(id).with_times(times);
            let spec = match options {
                None => spec.without_room(),
                Some(options) => spec.with_rooms(
                    options
                        .into_iter()
                        .map(|r| RoomOption::new(rid(r), rng.random_range(0..3))),
                ),
            };
            all_classes.push(id);
            classes.push(spec);
        }
        course_list.push(single_subpart_course(k, classes));
    }

    let kinds = [
        DistributionKind::SameStart,
        DistributionKind::SameTime,
        DistributionKind::DifferentTime,
        DistributionKind::SameDays,
        DistributionKind::DifferentDays,
        DistributionKind::SameWeeks,
        DistributionKind::DifferentWeeks,
        DistributionKind::Overlap,
        DistributionKind::NotOverlap,
        DistributionKind::SameRoom,
        DistributionKind::DifferentRoom,
        DistributionKind::SameAttendees,
        DistributionKind::Precedence,
        DistributionKind::WorkDay(6),
        DistributionKind::MinGap(2),
        DistributionKind::MaxDays(2),
        DistributionKind::MaxDayLoad(5),
        DistributionKind::MaxBreaks(1, 2),
        DistributionKind::MaxBlock(4, 1),
    ];
    let mut distributions = Vec::new();
    for &kind in &kinds {
        let n = rng.random_range(2..=3.min(all_classes.len()).max(2));
        let mut members = Vec::new();
        while members.len() < n.min(all_classes.len()) {
            let c = all_classes[rng.random_range(0..all_classes.len())];
            if !members.contains(&c) {
                members.push(c);
            }
        }
        let d = if rng.random_bool(0.3) {
            Distribution::required(kind, members)
        } else {
            Distribution::preferred(kind, rng.random_range(1..5), members)
        };
        distributions.push(d);
    }

    let mut students = Vec::new();
    for s in 1..=courses * 3 {
        let mut enrolled = Vec::new();
        for _ in 0..rng.random_range(1..=3) {
            let k = rng.random_range(1..=courses);
            if !enrolled.contains(&k) {
                enrolled.push(k);
            }
        }
        students.push(student(s, &enrolled));
    }

    let mut b = ProblemBuilder::new(format!("random-{seed}"), grid)
        .with_weights(OptimizationWeights::new(1, 2, 3, 2));
    b.extend_rooms(rooms)
        .extend_courses(course_list)
        .extend_distributions(distributions)
        .extend_students(students);
    b.build().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{config::AnnealingConfig, optimizer::Optimizer},
        model::{index::ClassIndex, solver_model::SolverModel},
    };

    #[test]
    fn test_random_problems_are_structurally_feasible() {
        let mut closed_times = 0;
        for seed in 0..40 {
            let p = random_problem(seed, 10);
            let model = SolverModel::from_problem(&p).unwrap();
            for ci in 0..model.classes_len() {
                let class = ClassIndex(ci);
                assert!(model.has_feasible_alternative(class), "seed {seed}, class {ci}");
                let available = model.available_times(class).count_ones(..);
                closed_times += model.times(class).len() - available;
            }
            let opt = Optimizer::new(&model, AnnealingConfig::new()).unwrap();
            assert!(opt.check_preconditions().is_ok());
        }
        // Closures still block some alternatives.
        assert!(closed_times > 0);
    }
}
