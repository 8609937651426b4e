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

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskParseError {
    Empty,
    TooWide(usize),
    InvalidChar { position: usize, found: char },
}

impl std::fmt::Display for MaskParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskParseError::Empty => write!(f, "Mask string is empty"),
            MaskParseError::TooWide(w) => write!(
                f,
                "Mask of width {} exceeds the maximum width of {}",
                w,
                Mask::MAX_WIDTH
            ),
            MaskParseError::InvalidChar { position, found } => write!(
                f,
                "Invalid mask character '{}' at position {}",
                found, position
            ),
        }
    }
}

impl std::error::Error for MaskParseError {}

/// A fixed-width bit mask over days of the week or weeks of the term.
///
/// Position `i` of the textual form (`"0110000"`) is bit `i`, so the first
/// character is the first day (or week). The width is part of the value and
/// bits at or beyond the width are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mask {
    bits: u64,
    width: u8,
}

impl Mask {
    pub const MAX_WIDTH: usize = 64;

    /// Creates a mask, dropping any bit at or beyond `width`.
    ///
    /// Panics if `width` is zero or larger than [`Mask::MAX_WIDTH`].
    #[inline]
    pub fn new(bits: u64, width: usize) -> Self {
        assert!(
            (1..=Self::MAX_WIDTH).contains(&width),
            "mask width must be in 1..=64, got {width}"
        );
        Self {
            bits: bits & Self::width_mask(width),
            width: width as u8,
        }
    }

    #[inline]
    pub fn empty(width: usize) -> Self {
        Self::new(0, width)
    }

    #[inline]
    pub fn full(width: usize) -> Self {
        Self::new(u64::MAX, width)
    }

    #[inline]
    fn width_mask(width: usize) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[inline]
    pub const fn width(self) -> usize {
        self.width as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub const fn contains(self, position: usize) -> bool {
        position < 64 && (self.bits >> position) & 1 == 1
    }

    #[inline]
    pub const fn intersects(self, other: Mask) -> bool {
        self.bits & other.bits != 0
    }

    #[inline]
    pub const fn is_subset_of(self, other: Mask) -> bool {
        self.bits & !other.bits == 0
    }

    #[inline]
    pub fn union(self, other: Mask) -> Mask {
        Mask {
            bits: self.bits | other.bits,
            width: self.width.max(other.width),
        }
    }

    #[inline]
    pub fn intersection(self, other: Mask) -> Mask {
        Mask {
            bits: self.bits & other.bits,
            width: self.width.max(other.width),
        }
    }

    #[inline]
    pub const fn count_ones(self) -> u32 {
        self.bits.count_ones()
    }

    /// Position of the lowest set bit, i.e. the earliest day or week.
    #[inline]
    pub const fn first(self) -> Option<usize> {
        if self.bits == 0 {
            None
        } else {
            Some(self.bits.trailing_zeros() as usize)
        }
    }

    #[inline]
    pub fn iter_ones(self) -> MaskOnes {
        MaskOnes { rest: self.bits }
    }
}

/// Iterator over the set positions of a [`Mask`], lowest first.
#[derive(Debug, Clone)]
pub struct MaskOnes {
    rest: u64,
}

impl Iterator for MaskOnes {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.rest == 0 {
            return None;
        }
        let pos = self.rest.trailing_zeros() as usize;
        self.rest &= self.rest - 1;
        Some(pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MaskOnes {}

impl FromStr for Mask {
    type Err = MaskParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MaskParseError::Empty);
        }
        let width = s.chars().count();
        if width > Self::MAX_WIDTH {
            return Err(MaskParseError::TooWide(width));
        }
        let mut bits = 0u64;
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bits |= 1u64 << position,
                found => return Err(MaskParseError::InvalidChar { position, found }),
            }
        }
        Ok(Mask::new(bits, width))
    }
}

impl std::fmt::Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.width() {
            f.write_str(if self.contains(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Mask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
