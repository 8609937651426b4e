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

//! Predicates of the distribution constraints.
//!
//! A distribution is satisfied when its predicate holds for the current
//! placements of its classes. Pairwise kinds must hold for every pair taken
//! in declaration order; the `Max*` kinds look at all classes at once, day
//! by day. A class without a room satisfies every room-related condition.

use crate::model::index::RoomIndex;
use class_alloc_core::prelude::SlotSpan;
use class_alloc_model::prelude::{DistributionKind, TimePattern};
use smallvec::SmallVec;

/// Where and when one class currently meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pattern: &'a TimePattern,
    room: Option<RoomIndex>,
}

impl<'a> Placement<'a> {
    #[inline]
    pub fn new(pattern: &'a TimePattern, room: Option<RoomIndex>) -> Self {
        Self { pattern, room }
    }

    #[inline]
    pub fn pattern(&self) -> &'a TimePattern {
        self.pattern
    }

    #[inline]
    pub fn room(&self) -> Option<RoomIndex> {
        self.room
    }
}

/// `true` if the distribution holds for `placements`, given in the
/// distribution's class order. `travel` yields the travel time between
/// two rooms in slots.
pub fn is_satisfied<F>(kind: DistributionKind, placements: &[Placement<'_>], travel: F) -> bool
where
    F: Fn(RoomIndex, RoomIndex) -> u32,
{
    if !kind.is_pairwise() {
        return aggregate_holds(kind, placements);
    }
    placements.iter().enumerate().all(|(i, a)| {
        placements[i + 1..]
            .iter()
            .all(|b| pair_holds(kind, a, b, &travel))
    })
}

/// The pairwise condition for `a` declared before `b`.
pub fn pair_holds<F>(
    kind: DistributionKind,
    a: &Placement<'_>,
    b: &Placement<'_>,
    travel: F,
) -> bool
where
    F: Fn(RoomIndex, RoomIndex) -> u32,
{
    let (pa, pb) = (a.pattern, b.pattern);
    let (sa, sb) = (pa.span(), pb.span());
    match kind {
        DistributionKind::SameStart => pa.start() == pb.start(),
        DistributionKind::SameTime => sa.nests_with(sb),
        DistributionKind::DifferentTime => !sa.intersects(sb),
        DistributionKind::SameDays => {
            pa.days().is_subset_of(pb.days()) || pb.days().is_subset_of(pa.days())
        }
        DistributionKind::DifferentDays => !pa.days().intersects(pb.days()),
        DistributionKind::SameWeeks => {
            pa.weeks().is_subset_of(pb.weeks()) || pb.weeks().is_subset_of(pa.weeks())
        }
        DistributionKind::DifferentWeeks => !pa.weeks().intersects(pb.weeks()),
        DistributionKind::Overlap => pa.overlaps(pb),
        DistributionKind::NotOverlap => !pa.overlaps(pb),
        DistributionKind::SameRoom => match (a.room, b.room) {
            (Some(x), Some(y)) => x == y,
            _ => true,
        },
        DistributionKind::DifferentRoom => match (a.room, b.room) {
            (Some(x), Some(y)) => x != y,
            _ => true,
        },
        DistributionKind::SameAttendees => {
            let t = match (a.room, b.room) {
                (Some(x), Some(y)) => travel(x, y),
                _ => 0,
            };
            !pa.shares_day(pb) || separated_by(sa, sb, t)
        }
        DistributionKind::Precedence => precedes(pa, pb),
        DistributionKind::WorkDay(s) => !pa.shares_day(pb) || sa.hull_len(sb) <= s,
        DistributionKind::MinGap(g) => !pa.shares_day(pb) || separated_by(sa, sb, g),
        DistributionKind::MaxDays(_)
        | DistributionKind::MaxDayLoad(_)
        | DistributionKind::MaxBreaks(_, _)
        | DistributionKind::MaxBlock(_, _) => aggregate_holds(kind, &[*a, *b]),
    }
}

fn aggregate_holds(kind: DistributionKind, placements: &[Placement<'_>]) -> bool {
    match kind {
        DistributionKind::MaxDays(d) => max_days(d, placements),
        DistributionKind::MaxDayLoad(s) => max_day_load(s, placements),
        DistributionKind::MaxBreaks(r, s) => max_breaks(r, s, placements),
        DistributionKind::MaxBlock(m, s) => max_block(m, s, placements),
        _ => true,
    }
}

#[inline]
fn separated_by(a: SlotSpan, b: SlotSpan, slots: u32) -> bool {
    a.end().saturating_add(slots) <= b.start() || b.end().saturating_add(slots) <= a.start()
}

/// First meeting of `a` strictly before the first meeting of `b`: earlier
/// first week, else earlier first day, else `a` ends before `b` starts.
fn precedes(a: &TimePattern, b: &TimePattern) -> bool {
    let (wa, wb) = (a.weeks().first(), b.weeks().first());
    if wa != wb {
        return wa < wb;
    }
    let (da, db) = (a.days().first(), b.days().first());
    if da != db {
        return da < db;
    }
    a.end() <= b.start()
}

fn max_days(limit: u32, placements: &[Placement<'_>]) -> bool {
    let Some(first) = placements.first() else {
        return true;
    };
    let days = placements[1..]
        .iter()
        .fold(first.pattern.days(), |acc, p| acc.union(p.pattern.days()));
    days.count_ones() <= limit
}

/// Calls `f` with the slot spans of the classes meeting on each
/// (week, day) that has at least one meeting.
fn for_each_day<F>(placements: &[Placement<'_>], mut f: F) -> bool
where
    F: FnMut(&mut SmallVec<[SlotSpan; 8]>) -> bool,
{
    let Some(first) = placements.first() else {
        return true;
    };
    let (weeks, days) = placements[1..].iter().fold(
        (first.pattern.weeks(), first.pattern.days()),
        |(w, d), p| (w.union(p.pattern.weeks()), d.union(p.pattern.days())),
    );
    let mut spans: SmallVec<[SlotSpan; 8]> = SmallVec::new();
    for w in weeks.iter_ones() {
        for d in days.iter_ones() {
            spans.clear();
            spans.extend(
                placements
                    .iter()
                    .filter(|p| p.pattern.weeks().contains(w) && p.pattern.days().contains(d))
                    .map(|p| p.pattern.span()),
            );
            if !spans.is_empty() && !f(&mut spans) {
                return false;
            }
        }
    }
    true
}

/// Merges spans whose gap is at most `max_gap` into blocks, returning each
/// block's hull and the number of spans in it.
fn blocks(spans: &mut [SlotSpan], max_gap: u32) -> SmallVec<[(SlotSpan, usize); 4]> {
    spans.sort_unstable();
    let mut out: SmallVec<[(SlotSpan, usize); 4]> = SmallVec::new();
    for &s in spans.iter() {
        match out.last_mut() {
            Some((hull, n)) if s.start() <= hull.end().saturating_add(max_gap) => {
                let end = hull.end().max(s.end());
                *hull = SlotSpan::new(hull.start(), end - hull.start());
                *n += 1;
            }
            _ => out.push((s, 1)),
        }
    }
    out
}

fn max_day_load(limit: u32, placements: &[Placement<'_>]) -> bool {
    for_each_day(placements, |spans| {
        spans.iter().map(|s| s.len()).sum::<u32>() <= limit
    })
}

fn max_breaks(max_breaks: u32, max_gap: u32, placements: &[Placement<'_>]) -> bool {
    for_each_day(placements, |spans| {
        blocks(spans, max_gap).len() <= max_breaks as usize + 1
    })
}

fn max_block(max_len: u32, max_gap: u32, placements: &[Placement<'_>]) -> bool {
    for_each_day(placements, |spans| {
        blocks(spans, max_gap)
            .iter()
            .all(|(hull, n)| *n < 2 || hull.len() <= max_len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{m, tp};

    fn no_travel(_: RoomIndex, _: RoomIndex) -> u32 {
        0
    }

    fn holds(kind: DistributionKind, a: &TimePattern, b: &TimePattern) -> bool {
        is_satisfied(kind, &[Placement::new(a, None), Placement::new(b, None)], no_travel)
    }

    #[test]
    fn test_time_relations() {
        let mon_0_4 = tp("10000", 0, 4, 0);
        let mon_1_2 = tp("10000", 1, 2, 0);
        let tue_4_2 = tp("01000", 4, 2, 0);

        assert!(holds(DistributionKind::SameTime, &mon_0_4, &mon_1_2));
        assert!(!holds(DistributionKind::SameTime, &mon_1_2, &tue_4_2));
        assert!(holds(DistributionKind::DifferentTime, &mon_0_4, &tue_4_2));
        assert!(!holds(DistributionKind::DifferentTime, &mon_0_4, &mon_1_2));
        assert!(!holds(DistributionKind::SameStart, &mon_0_4, &mon_1_2));
        assert!(holds(DistributionKind::Overlap, &mon_0_4, &mon_1_2));
        assert!(holds(DistributionKind::NotOverlap, &mon_0_4, &tue_4_2));
    }

    #[test]
    fn test_day_and_week_relations() {
        let mwf = tp("10101", 0, 2, 0);
        let mon = tp("10000", 5, 2, 0);
        let tue = tp("01000", 5, 2, 0);
        assert!(holds(DistributionKind::SameDays, &mwf, &mon));
        assert!(!holds(DistributionKind::SameDays, &mwf, &tue));
        assert!(holds(DistributionKind::DifferentDays, &mwf, &tue));
        assert!(!holds(DistributionKind::DifferentDays, &mwf, &mon));

        let w1 = TimePattern::new(m("10000"), 0, 2, m("10"), 0);
        let w2 = TimePattern::new(m("10000"), 0, 2, m("01"), 0);
        assert!(holds(DistributionKind::DifferentWeeks, &w1, &w2));
        assert!(holds(DistributionKind::SameWeeks, &w1, &mwf));
        assert!(!holds(DistributionKind::SameWeeks, &w1, &w2));
        // Different weeks never overlap even on the same day and slot.
        assert!(holds(DistributionKind::NotOverlap, &w1, &w2));
    }

    #[test]
    fn test_room_relations_ignore_roomless_classes() {
        let t = tp("10000", 0, 2, 0);
        let a = Placement::new(&t, Some(RoomIndex(0)));
        let b = Placement::new(&t, Some(RoomIndex(1)));
        let none = Placement::new(&t, None);
        assert!(!pair_holds(DistributionKind::SameRoom, &a, &b, no_travel));
        assert!(pair_holds(DistributionKind::DifferentRoom, &a, &b, no_travel));
        assert!(pair_holds(DistributionKind::SameRoom, &a, &none, no_travel));
        assert!(!pair_holds(DistributionKind::DifferentRoom, &a, &a, no_travel));
    }

    #[test]
    fn test_same_attendees_uses_travel() {
        let first = tp("10000", 0, 2, 0);
        let second = tp("10000", 3, 2, 0);
        let a = Placement::new(&first, Some(RoomIndex(0)));
        let b = Placement::new(&second, Some(RoomIndex(1)));
        assert!(pair_holds(DistributionKind::SameAttendees, &a, &b, |_, _| 1));
        assert!(!pair_holds(DistributionKind::SameAttendees, &a, &b, |_, _| 2));
        let other_day = tp("01000", 1, 2, 0);
        let c = Placement::new(&other_day, Some(RoomIndex(1)));
        assert!(pair_holds(DistributionKind::SameAttendees, &a, &c, |_, _| 9));
    }

    #[test]
    fn test_precedence_follows_declaration_order() {
        let early = tp("10000", 0, 2, 0);
        let late = tp("10000", 4, 2, 0);
        let tue = tp("01000", 0, 2, 0);
        assert!(holds(DistributionKind::Precedence, &early, &late));
        assert!(!holds(DistributionKind::Precedence, &late, &early));
        assert!(holds(DistributionKind::Precedence, &late, &tue));
        let later_week = TimePattern::new(m("10000"), 0, 2, m("01"), 0);
        assert!(holds(DistributionKind::Precedence, &tue, &later_week));
    }

    #[test]
    fn test_work_day_and_min_gap() {
        let a = tp("10000", 0, 2, 0);
        let b = tp("10000", 5, 2, 0);
        assert!(holds(DistributionKind::WorkDay(7), &a, &b));
        assert!(!holds(DistributionKind::WorkDay(6), &a, &b));
        assert!(holds(DistributionKind::MinGap(3), &a, &b));
        assert!(!holds(DistributionKind::MinGap(4), &a, &b));
        let c = tp("01000", 0, 10, 0);
        assert!(holds(DistributionKind::WorkDay(1), &a, &c));
    }

    #[test]
    fn test_max_days_and_day_load() {
        let a = tp("11000", 0, 3, 0);
        let b = tp("01100", 0, 2, 0);
        assert!(holds(DistributionKind::MaxDays(3), &a, &b));
        assert!(!holds(DistributionKind::MaxDays(2), &a, &b));
        // Tuesday carries 3 + 2 slots.
        assert!(holds(DistributionKind::MaxDayLoad(5), &a, &b));
        assert!(!holds(DistributionKind::MaxDayLoad(4), &a, &b));
    }

    #[test]
    fn test_max_breaks_and_block() {
        let a = tp("10000", 0, 2, 0);
        let b = tp("10000", 3, 2, 0);
        let c = tp("10000", 9, 1, 0);
        let all = [
            Placement::new(&a, None),
            Placement::new(&b, None),
            Placement::new(&c, None),
        ];
        // Gap 1 joins a and b, gap 4 leaves c apart: two blocks, one break.
        assert!(is_satisfied(DistributionKind::MaxBreaks(1, 1), &all, no_travel));
        assert!(!is_satisfied(DistributionKind::MaxBreaks(0, 1), &all, no_travel));
        assert!(is_satisfied(DistributionKind::MaxBreaks(0, 4), &all, no_travel));

        // Block a+b spans 5 slots; c alone is never too long.
        assert!(is_satisfied(DistributionKind::MaxBlock(5, 1), &all, no_travel));
        assert!(!is_satisfied(DistributionKind::MaxBlock(4, 1), &all, no_travel));
        assert!(is_satisfied(DistributionKind::MaxBlock(4, 0), &all, no_travel));
    }

    #[test]
    fn test_single_class_is_always_satisfied() {
        let a = tp("11111", 0, 12, 0);
        let one = [Placement::new(&a, None)];
        assert!(is_satisfied(DistributionKind::DifferentTime, &one, no_travel));
        assert!(is_satisfied(DistributionKind::MaxBlock(1, 0), &one, no_travel));
        assert!(is_satisfied(DistributionKind::MaxDays(0), &[], no_travel));
    }
}
