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
    problem::time::TimePattern,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomIdentifierMarker;

impl IdentifierMarkerName for RoomIdentifierMarker {
    const NAME: &'static str = "RoomId";
}

pub type RoomIdentifier = Identifier<usize, RoomIdentifierMarker>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomIdentifier,
    capacity: u32,
    unavailable: Vec<TimePattern>,
    travel: BTreeMap<RoomIdentifier, u32>,
}

impl Room {
    #[inline]
    pub fn new(id: RoomIdentifier, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            unavailable: Vec::new(),
            travel: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn with_unavailable<I>(mut self, intervals: I) -> Self
    where
        I: IntoIterator<Item = TimePattern>,
    {
        self.unavailable.extend(intervals);
        self
    }

    #[inline]
    pub fn with_travel<I>(mut self, travel: I) -> Self
    where
        I: IntoIterator<Item = (RoomIdentifier, u32)>,
    {
        self.travel.extend(travel);
        self
    }

    #[inline]
    pub fn add_unavailable(&mut self, interval: TimePattern) -> &mut Self {
        self.unavailable.push(interval);
        self
    }

    #[inline]
    pub fn add_travel(&mut self, to: RoomIdentifier, slots: u32) -> &mut Self {
        self.travel.insert(to, slots);
        self
    }

    #[inline]
    pub fn id(&self) -> RoomIdentifier {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn unavailable(&self) -> &[TimePattern] {
        &self.unavailable
    }

    #[inline]
    pub fn travel(&self) -> &BTreeMap<RoomIdentifier, u32> {
        &self.travel
    }

    /// Travel time in slots as declared on this room; zero when not listed.
    #[inline]
    pub fn travel_to(&self, other: RoomIdentifier) -> u32 {
        self.travel.get(&other).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_available_for(&self, pattern: &TimePattern) -> bool {
        !self.unavailable.iter().any(|u| u.overlaps(pattern))
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room(id: {}, capacity: {}, unavailable: {})",
            self.id,
            self.capacity,
            self.unavailable.len()
        )
    }
}

/// A room a class may be placed in, with the preference penalty of that choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomOption {
    room: RoomIdentifier,
    penalty: u32,
}

impl RoomOption {
    #[inline]
    pub fn new(room: RoomIdentifier, penalty: u32) -> Self {
        Self { room, penalty }
    }

    #[inline]
    pub fn room(&self) -> RoomIdentifier {
        self.room
    }

    #[inline]
    pub fn penalty(&self) -> u32 {
        self.penalty
    }
}

impl std::fmt::Display for RoomOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RoomOption({}, penalty: {})", self.room, self.penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(n: usize) -> RoomIdentifier {
        RoomIdentifier::new(n)
    }

    fn tp(days: &str, start: u32, length: u32, weeks: &str) -> TimePattern {
        TimePattern::unavailable(days.parse().unwrap(), start, length, weeks.parse().unwrap())
    }

    #[test]
    fn test_availability_checks_every_interval() {
        let room = Room::new(rid(1), 30).with_unavailable([
            tp("1000000", 0, 96, "11"),
            tp("0000011", 0, 288, "11"),
        ]);
        assert!(!room.is_available_for(&tp("1000000", 90, 12, "10")));
        assert!(room.is_available_for(&tp("1000000", 96, 12, "11")));
        assert!(!room.is_available_for(&tp("0000001", 200, 12, "01")));
        assert!(room.is_available_for(&tp("0111100", 0, 12, "11")));
    }

    #[test]
    fn test_travel_defaults_to_zero() {
        let mut room = Room::new(rid(1), 10);
        room.add_travel(rid(2), 3);
        assert_eq!(room.travel_to(rid(2)), 3);
        assert_eq!(room.travel_to(rid(3)), 0);
        assert_eq!(room.to_string(), "Room(id: RoomId(1), capacity: 10, unavailable: 0)");
    }
}
