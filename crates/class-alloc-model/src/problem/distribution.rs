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

use crate::problem::{class::ClassIdentifier, err::UnknownDistributionTypeError};
use std::str::FromStr;

/// The relational constraint a distribution imposes on its classes.
///
/// Parameters are in slots (`WorkDay`, `MinGap`, `MaxDayLoad`, the `S`
/// of `MaxBreaks` and both arguments of `MaxBlock`) or plain counts
/// (`MaxDays`, the `R` of `MaxBreaks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    SameStart,
    SameTime,
    DifferentTime,
    SameDays,
    DifferentDays,
    SameWeeks,
    DifferentWeeks,
    Overlap,
    NotOverlap,
    SameRoom,
    DifferentRoom,
    SameAttendees,
    Precedence,
    WorkDay(u32),
    MinGap(u32),
    MaxDays(u32),
    MaxDayLoad(u32),
    MaxBreaks(u32, u32),
    MaxBlock(u32, u32),
}

impl DistributionKind {
    /// `true` for kinds that are checked on every pair of their classes;
    /// the remaining kinds look at all classes at once.
    #[inline]
    pub fn is_pairwise(&self) -> bool {
        !matches!(
            self,
            DistributionKind::MaxDays(_)
                | DistributionKind::MaxDayLoad(_)
                | DistributionKind::MaxBreaks(_, _)
                | DistributionKind::MaxBlock(_, _)
        )
    }

    /// `true` when the predicate looks at the chosen rooms.
    #[inline]
    pub fn depends_on_rooms(&self) -> bool {
        matches!(
            self,
            DistributionKind::SameRoom
                | DistributionKind::DifferentRoom
                | DistributionKind::SameAttendees
        )
    }
}

impl std::fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionKind::SameStart => write!(f, "SameStart"),
            DistributionKind::SameTime => write!(f, "SameTime"),
            DistributionKind::DifferentTime => write!(f, "DifferentTime"),
            DistributionKind::SameDays => write!(f, "SameDays"),
            DistributionKind::DifferentDays => write!(f, "DifferentDays"),
            DistributionKind::SameWeeks => write!(f, "SameWeeks"),
            DistributionKind::DifferentWeeks => write!(f, "DifferentWeeks"),
            DistributionKind::Overlap => write!(f, "Overlap"),
            DistributionKind::NotOverlap => write!(f, "NotOverlap"),
            DistributionKind::SameRoom => write!(f, "SameRoom"),
            DistributionKind::DifferentRoom => write!(f, "DifferentRoom"),
            DistributionKind::SameAttendees => write!(f, "SameAttendees"),
            DistributionKind::Precedence => write!(f, "Precedence"),
            DistributionKind::WorkDay(s) => write!(f, "WorkDay({})", s),
            DistributionKind::MinGap(g) => write!(f, "MinGap({})", g),
            DistributionKind::MaxDays(d) => write!(f, "MaxDays({})", d),
            DistributionKind::MaxDayLoad(s) => write!(f, "MaxDayLoad({})", s),
            DistributionKind::MaxBreaks(r, s) => write!(f, "MaxBreaks({},{})", r, s),
            DistributionKind::MaxBlock(m, s) => write!(f, "MaxBlock({},{})", m, s),
        }
    }
}

fn parse_args<const N: usize>(
    tag: &str,
    args: &str,
) -> Result<[u32; N], UnknownDistributionTypeError> {
    let mut out = [0u32; N];
    let mut parts = args.split(',');
    for slot in out.iter_mut() {
        *slot = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| UnknownDistributionTypeError::new(tag))?;
    }
    if parts.next().is_some() {
        return Err(UnknownDistributionTypeError::new(tag));
    }
    Ok(out)
}

impl FromStr for DistributionKind {
    type Err = UnknownDistributionTypeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        let (name, args) = match tag.split_once('(') {
            Some((name, rest)) => match rest.strip_suffix(')') {
                Some(args) => (name, Some(args)),
                None => return Err(UnknownDistributionTypeError::new(tag)),
            },
            None => (tag, None),
        };

        let kind = match (name, args) {
            ("SameStart", None) => DistributionKind::SameStart,
            ("SameTime", None) => DistributionKind::SameTime,
            ("DifferentTime", None) => DistributionKind::DifferentTime,
            ("SameDays", None) => DistributionKind::SameDays,
            ("DifferentDays", None) => DistributionKind::DifferentDays,
            ("SameWeeks", None) => DistributionKind::SameWeeks,
            ("DifferentWeeks", None) => DistributionKind::DifferentWeeks,
            ("Overlap", None) => DistributionKind::Overlap,
            ("NotOverlap", None) => DistributionKind::NotOverlap,
            ("SameRoom", None) => DistributionKind::SameRoom,
            ("DifferentRoom", None) => DistributionKind::DifferentRoom,
            ("SameAttendees", None) => DistributionKind::SameAttendees,
            ("Precedence", None) => DistributionKind::Precedence,
            ("WorkDay", Some(a)) => {
                let [s] = parse_args::<1>(tag, a)?;
                DistributionKind::WorkDay(s)
            }
            ("MinGap", Some(a)) => {
                let [g] = parse_args::<1>(tag, a)?;
                DistributionKind::MinGap(g)
            }
            ("MaxDays", Some(a)) => {
                let [d] = parse_args::<1>(tag, a)?;
                DistributionKind::MaxDays(d)
            }
            ("MaxDayLoad", Some(a)) => {
                let [s] = parse_args::<1>(tag, a)?;
                DistributionKind::MaxDayLoad(s)
            }
            ("MaxBreaks", Some(a)) => {
                let [r, s] = parse_args::<2>(tag, a)?;
                DistributionKind::MaxBreaks(r, s)
            }
            ("MaxBlock", Some(a)) => {
                let [m, s] = parse_args::<2>(tag, a)?;
                DistributionKind::MaxBlock(m, s)
            }
            _ => return Err(UnknownDistributionTypeError::new(tag)),
        };
        Ok(kind)
    }
}

/// A constraint over an ordered list of classes.
///
/// Required distributions are hard; the others cost `penalty` (scaled by the
/// distribution weight) when unsatisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    kind: DistributionKind,
    required: bool,
    penalty: u32,
    classes: Vec<ClassIdentifier>,
}

impl Distribution {
    #[inline]
    pub fn required<I>(kind: DistributionKind, classes: I) -> Self
    where
        I: IntoIterator<Item = ClassIdentifier>,
    {
        Self {
            kind,
            required: true,
            penalty: 0,
            classes: classes.into_iter().collect(),
        }
    }

    #[inline]
    pub fn preferred<I>(kind: DistributionKind, penalty: u32, classes: I) -> Self
    where
        I: IntoIterator<Item = ClassIdentifier>,
    {
        Self {
            kind,
            required: false,
            penalty,
            classes: classes.into_iter().collect(),
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

    #[inline]
    pub fn classes(&self) -> &[ClassIdentifier] {
        &self.classes
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.required {
            write!(f, "{}(required, classes: {})", self.kind, self.classes.len())
        } else {
            write!(
                f,
                "{}(penalty: {}, classes: {})",
                self.kind,
                self.penalty,
                self.classes.len()
            )
        }
    }
}
