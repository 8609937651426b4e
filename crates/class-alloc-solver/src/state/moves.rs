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

use crate::model::index::ClassIndex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Positions into a class's time and room alternatives. `room` is `None`
/// exactly when the class needs no room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    time: usize,
    room: Option<usize>,
}

impl Choice {
    #[inline]
    pub fn new(time: usize, room: Option<usize>) -> Self {
        Self { time, room }
    }

    #[inline]
    pub fn time(&self) -> usize {
        self.time
    }

    #[inline]
    pub fn room(&self) -> Option<usize> {
        self.room
    }

    #[inline]
    pub fn with_time(self, time: usize) -> Self {
        Self { time, ..self }
    }

    #[inline]
    pub fn with_room(self, room: Option<usize>) -> Self {
        Self { room, ..self }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.room {
            Some(r) => write!(f, "Choice(time: {}, room: {})", self.time, r),
            None => write!(f, "Choice(time: {}, no room)", self.time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Change {
    class: ClassIndex,
    from: Choice,
    to: Choice,
}

impl Change {
    #[inline]
    pub fn new(class: ClassIndex, from: Choice, to: Choice) -> Self {
        Self { class, from, to }
    }

    #[inline]
    pub fn class(&self) -> ClassIndex {
        self.class
    }

    #[inline]
    pub fn from(&self) -> Choice {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Choice {
        self.to
    }
}

/// Reassignments of one or two classes, applied in order and undone in
/// reverse order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    changes: SmallVec<[Change; 2]>,
}

impl Move {
    #[inline]
    pub fn single(change: Change) -> Self {
        let mut changes = SmallVec::new();
        changes.push(change);
        Self { changes }
    }

    #[inline]
    pub fn pair(a: Change, b: Change) -> Self {
        debug_assert_ne!(a.class, b.class);
        let mut changes = SmallVec::new();
        changes.push(a);
        changes.push(b);
        Self { changes }
    }

    #[inline]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    #[inline]
    pub fn classes(&self) -> impl Iterator<Item = ClassIndex> + '_ {
        self.changes.iter().map(|c| c.class)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Move[")?;
        for (i, c) in self.changes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {} -> {}", c.class, c.from, c.to)?;
        }
        write!(f, "]")
    }
}
