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

use class_alloc_core::prelude::{Mask, SlotSpan};

/// Dimensions of the scheduling grid: days per week, slots per day and
/// weeks per term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeGrid {
    nr_days: usize,
    slots_per_day: u32,
    nr_weeks: usize,
}

impl TimeGrid {
    #[inline]
    pub const fn new(nr_days: usize, slots_per_day: u32, nr_weeks: usize) -> Self {
        Self {
            nr_days,
            slots_per_day,
            nr_weeks,
        }
    }

    #[inline]
    pub const fn nr_days(&self) -> usize {
        self.nr_days
    }

    #[inline]
    pub const fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    #[inline]
    pub const fn nr_weeks(&self) -> usize {
        self.nr_weeks
    }

    /// Number of distinct (week, day) cells of the grid.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.nr_days * self.nr_weeks
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        (1..=Mask::MAX_WIDTH).contains(&self.nr_days)
            && (1..=Mask::MAX_WIDTH).contains(&self.nr_weeks)
            && self.slots_per_day > 0
    }

    /// `true` if the pattern's masks have the grid's widths and its slot
    /// range is non-empty and ends within the day.
    #[inline]
    pub fn fits(&self, pattern: &TimePattern) -> bool {
        pattern.days().width() == self.nr_days
            && pattern.weeks().width() == self.nr_weeks
            && pattern.length() > 0
            && pattern.span().end() <= self.slots_per_day
    }
}

impl std::fmt::Display for TimeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeGrid(days: {}, slots_per_day: {}, weeks: {})",
            self.nr_days, self.slots_per_day, self.nr_weeks
        )
    }
}

/// A recurring meeting pattern: the same slot range on every selected day of
/// every selected week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimePattern {
    days: Mask,
    start: u32,
    length: u32,
    weeks: Mask,
    penalty: u32,
}

impl TimePattern {
    #[inline]
    pub fn new(days: Mask, start: u32, length: u32, weeks: Mask, penalty: u32) -> Self {
        Self {
            days,
            start,
            length,
            weeks,
            penalty,
        }
    }

    /// Pattern used for room unavailability; carries no penalty.
    #[inline]
    pub fn unavailable(days: Mask, start: u32, length: u32, weeks: Mask) -> Self {
        Self::new(days, start, length, weeks, 0)
    }

    #[inline]
    pub fn days(&self) -> Mask {
        self.days
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }

    #[inline]
    pub fn weeks(&self) -> Mask {
        self.weeks
    }

    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    #[inline]
    pub fn span(&self) -> SlotSpan {
        SlotSpan::new(self.start, self.length)
    }

    /// `true` if the patterns share at least one (week, day) pair.
    #[inline]
    pub fn shares_day(&self, other: &TimePattern) -> bool {
        self.days.intersects(other.days) && self.weeks.intersects(other.weeks)
    }

    #[inline]
    pub fn overlaps(&self, other: &TimePattern) -> bool {
        self.shares_day(other) && self.span().intersects(other.span())
    }

    /// Equality of the meeting times, ignoring the penalty.
    #[inline]
    pub fn same_meetings(&self, other: &TimePattern) -> bool {
        self.days == other.days
            && self.weeks == other.weeks
            && self.start == other.start
            && self.length == other.length
    }
}

impl std::fmt::Display for TimePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimePattern(days: {}, start: {}, length: {}, weeks: {}, penalty: {})",
            self.days, self.start, self.length, self.weeks, self.penalty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(days: &str, start: u32, length: u32, weeks: &str) -> TimePattern {
        TimePattern::new(days.parse().unwrap(), start, length, weeks.parse().unwrap(), 0)
    }

    #[test]
    fn test_overlap_requires_days_weeks_and_slots() {
        let a = tp("1010000", 100, 12, "1111");
        assert!(a.overlaps(&tp("1000000", 105, 12, "0001")));
        // disjoint days
        assert!(!a.overlaps(&tp("0101000", 100, 12, "1111")));
        // disjoint weeks
        assert!(!a.overlaps(&tp("1010000", 100, 12, "0000")));
        // touching slot ranges do not overlap
        assert!(!a.overlaps(&tp("1010000", 112, 12, "1111")));
    }

    #[test]
    fn test_same_meetings_ignores_penalty() {
        let a = tp("1000000", 10, 2, "11");
        let b = TimePattern::new(a.days(), 10, 2, a.weeks(), 9);
        assert!(a.same_meetings(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_grid_fits() {
        let grid = TimeGrid::new(7, 288, 4);
        assert!(grid.is_valid());
        assert_eq!(grid.cell_count(), 28);
        assert!(grid.fits(&tp("1000000", 276, 12, "1111")));
        assert!(!grid.fits(&tp("1000000", 280, 12, "1111")));
        assert!(!grid.fits(&tp("10000", 0, 12, "1111")));
        assert!(!grid.fits(&tp("1000000", 0, 0, "1111")));
        assert!(!TimeGrid::new(0, 288, 4).is_valid());
    }
}
