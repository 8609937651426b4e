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
    builder::ProblemBuilder,
    class::{
        ClassIdentifier, ClassSpec, Config, ConfigIdentifier, Course, CourseIdentifier, Subpart,
        SubpartIdentifier,
    },
    distribution::{Distribution, DistributionKind},
    err::ProblemLoaderError,
    prob::ProblemModel,
    room::{Room, RoomIdentifier, RoomOption},
    student::{Student, StudentIdentifier},
    time::{TimeGrid, TimePattern},
    weights::OptimizationWeights,
};
use crate::xml::Attrs;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::{
    io::{BufRead, Read},
    path::Path,
};

/// Reads instances in the ITC-2019 XML format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader {
    default_distribution_penalty: u32,
}

impl Default for ProblemLoader {
    fn default() -> Self {
        Self {
            default_distribution_penalty: 1,
        }
    }
}

impl ProblemLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty used for a non-required distribution without a `penalty`
    /// attribute.
    #[inline]
    pub fn default_distribution_penalty(mut self, penalty: u32) -> Self {
        self.default_distribution_penalty = penalty;
        self
    }

    pub fn from_str(&self, s: &str) -> Result<ProblemModel, ProblemLoaderError> {
        let mut reader = Reader::from_str(s);
        reader.config_mut().trim_text(true);

        let mut draft = Draft::new(self.default_distribution_penalty);
        loop {
            match reader.read_event()? {
                Event::Start(e) => draft.open(&e)?,
                Event::Empty(e) => {
                    draft.open(&e)?;
                    draft.close(e.name().as_ref());
                }
                Event::End(e) => draft.close(e.name().as_ref()),
                Event::Eof => break,
                _ => {}
            }
        }
        draft.finish()
    }

    pub fn from_reader<R: Read>(&self, mut r: R) -> Result<ProblemModel, ProblemLoaderError> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        self.from_str(&s)
    }

    pub fn from_bufread<R: BufRead>(&self, br: R) -> Result<ProblemModel, ProblemLoaderError> {
        self.from_reader(br)
    }

    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<ProblemModel, ProblemLoaderError> {
        let s = std::fs::read_to_string(path)?;
        self.from_str(&s)
    }
}

struct DistributionDraft {
    kind: DistributionKind,
    required: bool,
    penalty: u32,
    classes: Vec<ClassIdentifier>,
}

/// Objects under construction while walking the document. `<room>`,
/// `<class>` and `<course>` each occur in two contexts; the open parent
/// decides which one is meant.
struct Draft {
    default_penalty: u32,
    name: Option<String>,
    grid: Option<TimeGrid>,
    weights: Option<OptimizationWeights>,
    rooms: Vec<Room>,
    courses: Vec<Course>,
    distributions: Vec<Distribution>,
    students: Vec<Student>,
    room: Option<Room>,
    course: Option<(CourseIdentifier, Vec<Config>)>,
    config: Option<(ConfigIdentifier, Vec<Subpart>)>,
    subpart: Option<(SubpartIdentifier, Vec<ClassSpec>)>,
    class: Option<ClassSpec>,
    distribution: Option<DistributionDraft>,
    student: Option<(StudentIdentifier, Vec<CourseIdentifier>)>,
}

impl Draft {
    fn new(default_penalty: u32) -> Self {
        Self {
            default_penalty,
            name: None,
            grid: None,
            weights: None,
            rooms: Vec::new(),
            courses: Vec::new(),
            distributions: Vec::new(),
            students: Vec::new(),
            room: None,
            course: None,
            config: None,
            subpart: None,
            class: None,
            distribution: None,
            student: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), ProblemLoaderError> {
        match e.name().as_ref() {
            b"problem" => {
                let a = Attrs::read(e, "problem")?;
                self.name = Some(a.get("name").unwrap_or_default().to_string());
                self.grid = Some(TimeGrid::new(
                    a.number("nrDays")?,
                    a.number("slotsPerDay")?,
                    a.number("nrWeeks")?,
                ));
            }
            b"optimization" => {
                let a = Attrs::read(e, "optimization")?;
                let time = a.optional_number("time")?;
                let room = a.optional_number("room")?;
                let distribution = a.optional_number("distribution")?;
                let student = a.optional_number("student")?;
                self.weights = match (time, room, distribution, student) {
                    (Some(t), Some(r), Some(d), Some(s)) => {
                        Some(OptimizationWeights::new(t, r, d, s))
                    }
                    _ => None,
                };
            }
            b"room" => {
                if let Some(class) = self.class.as_mut() {
                    let a = Attrs::read(e, "room")?;
                    if class.requires_room() {
                        let id = RoomIdentifier::new(a.number("id")?);
                        let penalty = a.optional_number("penalty")?.unwrap_or(0);
                        class.add_room(RoomOption::new(id, penalty));
                    }
                } else {
                    let a = Attrs::read(e, "room")?;
                    self.room = Some(Room::new(
                        RoomIdentifier::new(a.number("id")?),
                        a.number("capacity")?,
                    ));
                }
            }
            b"travel" => {
                if let Some(room) = self.room.as_mut() {
                    let a = Attrs::read(e, "travel")?;
                    room.add_travel(RoomIdentifier::new(a.number("room")?), a.number("value")?);
                }
            }
            b"unavailable" => {
                if let Some(room) = self.room.as_mut() {
                    let a = Attrs::read(e, "unavailable")?;
                    room.add_unavailable(TimePattern::unavailable(
                        a.mask("days")?,
                        a.number("start")?,
                        a.number("length")?,
                        a.mask("weeks")?,
                    ));
                }
            }
            b"course" => {
                let a = Attrs::read(e, "course")?;
                let id = CourseIdentifier::new(a.number("id")?);
                match self.student.as_mut() {
                    Some((_, courses)) => courses.push(id),
                    None => self.course = Some((id, Vec::new())),
                }
            }
            b"config" => {
                let a = Attrs::read(e, "config")?;
                self.config = Some((ConfigIdentifier::new(a.number("id")?), Vec::new()));
            }
            b"subpart" => {
                let a = Attrs::read(e, "subpart")?;
                self.subpart = Some((SubpartIdentifier::new(a.number("id")?), Vec::new()));
            }
            b"class" => {
                let a = Attrs::read(e, "class")?;
                let id = ClassIdentifier::new(a.number("id")?);
                if let Some(d) = self.distribution.as_mut() {
                    d.classes.push(id);
                } else {
                    let mut class = ClassSpec::new(id);
                    if let Some(limit) = a.optional_number("limit")? {
                        class = class.with_limit(limit);
                    }
                    if let Some(parent) = a.optional_number("parent")? {
                        class = class.with_parent(ClassIdentifier::new(parent));
                    }
                    if a.flag("room") == Some(false) {
                        class = class.without_room();
                    }
                    self.class = Some(class);
                }
            }
            b"time" => {
                if let Some(class) = self.class.as_mut() {
                    let a = Attrs::read(e, "time")?;
                    let penalty = a.optional_number("penalty")?.unwrap_or(0);
                    class.add_time(TimePattern::new(
                        a.mask("days")?,
                        a.number("start")?,
                        a.number("length")?,
                        a.mask("weeks")?,
                        penalty,
                    ));
                }
            }
            b"distribution" => {
                let a = Attrs::read(e, "distribution")?;
                let kind: DistributionKind = a.required("type")?.parse()?;
                let required = a.flag("required").unwrap_or(false);
                let penalty = a
                    .optional_number("penalty")?
                    .unwrap_or(self.default_penalty);
                self.distribution = Some(DistributionDraft {
                    kind,
                    required,
                    penalty,
                    classes: Vec::new(),
                });
            }
            b"student" => {
                let a = Attrs::read(e, "student")?;
                self.student = Some((StudentIdentifier::new(a.number("id")?), Vec::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"room" if self.class.is_none() => {
                if let Some(room) = self.room.take() {
                    self.rooms.push(room);
                }
            }
            b"class" if self.distribution.is_none() => {
                if let (Some(class), Some((_, classes))) =
                    (self.class.take(), self.subpart.as_mut())
                {
                    classes.push(class);
                }
            }
            b"subpart" => {
                if let (Some((id, classes)), Some((_, subparts))) =
                    (self.subpart.take(), self.config.as_mut())
                {
                    subparts.push(Subpart::new(id, classes));
                }
            }
            b"config" => {
                if let (Some((id, subparts)), Some((_, configs))) =
                    (self.config.take(), self.course.as_mut())
                {
                    configs.push(Config::new(id, subparts));
                }
            }
            b"course" if self.student.is_none() => {
                if let Some((id, configs)) = self.course.take() {
                    self.courses.push(Course::new(id, configs));
                }
            }
            b"distribution" => {
                if let Some(d) = self.distribution.take() {
                    self.distributions.push(if d.required {
                        Distribution::required(d.kind, d.classes)
                    } else {
                        Distribution::preferred(d.kind, d.penalty, d.classes)
                    });
                }
            }
            b"student" => {
                if let Some((id, courses)) = self.student.take() {
                    self.students.push(Student::new(id, courses));
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<ProblemModel, ProblemLoaderError> {
        let (Some(name), Some(grid)) = (self.name, self.grid) else {
            return Err(ProblemLoaderError::MissingProblem);
        };
        let mut builder = ProblemBuilder::new(name, grid);
        if let Some(weights) = self.weights {
            builder.set_weights(weights);
        }
        builder
            .extend_rooms(self.rooms)
            .extend_courses(self.courses)
            .extend_distributions(self.distributions)
            .extend_students(self.students);
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{problem::err::StructuralError, xml::AttributeError};

    const INSTANCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<problem name="tiny" nrDays="7" slotsPerDay="288" nrWeeks="2">
  <optimization time="2" room="1" distribution="10" student="5"/>
  <rooms>
    <room id="1" capacity="50">
      <travel room="2" value="3"/>
      <unavailable days="1000000" start="0" length="96" weeks="11"/>
    </room>
    <room id="2" capacity="20"/>
  </rooms>
  <courses>
    <course id="1">
      <config id="1">
        <subpart id="1">
          <class id="1" limit="40">
            <room id="1" penalty="2"/>
            <room id="2"/>
            <time days="1010100" start="90" length="10" weeks="11" penalty="1"/>
            <time days="0101000" start="90" length="15" weeks="11"/>
          </class>
        </subpart>
        <subpart id="2">
          <class id="2" limit="40" parent="1" room="false">
            <time days="0000100" start="200" length="12" weeks="10"/>
          </class>
        </subpart>
      </config>
    </course>
  </courses>
  <distributions>
    <distribution type="SameAttendees" required="true">
      <class id="1"/>
      <class id="2"/>
    </distribution>
    <distribution type="MaxBreaks(1,12)" penalty="4">
      <class id="1"/>
      <class id="2"/>
    </distribution>
    <distribution type="NotOverlap">
      <class id="2"/>
    </distribution>
  </distributions>
  <students>
    <student id="1"><course id="1"/></student>
    <student id="2"><course id="1"/></student>
  </students>
</problem>
"#;

    fn cid(n: usize) -> ClassIdentifier {
        ClassIdentifier::new(n)
    }

    #[test]
    fn test_loads_every_section() {
        let p = ProblemLoader::new().from_str(INSTANCE).unwrap();
        assert_eq!(p.name(), "tiny");
        assert_eq!(p.grid(), TimeGrid::new(7, 288, 2));
        assert_eq!(p.weights(), OptimizationWeights::new(2, 1, 10, 5));

        let r1 = p.room(RoomIdentifier::new(1)).unwrap();
        assert_eq!(r1.capacity(), 50);
        assert_eq!(r1.unavailable().len(), 1);
        assert_eq!(p.travel_time(RoomIdentifier::new(2), RoomIdentifier::new(1)), 3);

        let c1 = p.class(cid(1)).unwrap();
        assert_eq!(c1.limit(), Some(40));
        assert!(c1.requires_room());
        assert_eq!(c1.rooms().len(), 2);
        assert_eq!(c1.rooms()[0].penalty(), 2);
        assert_eq!(c1.rooms()[1].penalty(), 0);
        assert_eq!(c1.times().len(), 2);
        assert_eq!(c1.times()[0].penalty(), 1);
        assert_eq!(c1.times()[1].days().to_string(), "0101000");

        let c2 = p.class(cid(2)).unwrap();
        assert!(!c2.requires_room());
        assert_eq!(c2.parent(), Some(cid(1)));
        assert_eq!(c2.times()[0].weeks().to_string(), "10");

        let ds = p.distributions();
        assert_eq!(ds.len(), 3);
        assert!(ds[0].is_required());
        assert_eq!(ds[0].kind(), DistributionKind::SameAttendees);
        assert_eq!(ds[0].classes(), &[cid(1), cid(2)]);
        assert_eq!(ds[1].kind(), DistributionKind::MaxBreaks(1, 12));
        assert_eq!(ds[1].penalty(), 4);
        assert_eq!(ds[2].penalty(), 1);

        assert_eq!(p.students().len(), 2);
        assert_eq!(p.class_enrollment(cid(2)), 2);
    }

    #[test]
    fn test_default_penalty_is_configurable() {
        let p = ProblemLoader::new()
            .default_distribution_penalty(7)
            .from_str(INSTANCE)
            .unwrap();
        assert_eq!(p.distributions()[2].penalty(), 7);
    }

    #[test]
    fn test_from_reader_matches_from_str() {
        let a = ProblemLoader::new().from_str(INSTANCE).unwrap();
        let b = ProblemLoader::new()
            .from_reader(INSTANCE.as_bytes())
            .unwrap();
        assert_eq!(a.class_count(), b.class_count());
        assert_eq!(a.distributions(), b.distributions());
    }

    #[test]
    fn test_missing_optimization_is_structural() {
        let xml = INSTANCE.replace(
            r#"<optimization time="2" room="1" distribution="10" student="5"/>"#,
            "",
        );
        let err = ProblemLoader::new().from_str(&xml).unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::Structural(StructuralError::MissingWeights)
        ));
    }

    #[test]
    fn test_unknown_room_reference_is_structural() {
        let xml = INSTANCE.replace(r#"<room id="2"/>"#, r#"<room id="9"/>"#);
        let err = ProblemLoader::new().from_str(&xml).unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::Structural(StructuralError::RoomNotFound(_))
        ));
    }

    #[test]
    fn test_attribute_errors_name_the_element() {
        let xml = INSTANCE.replace(r#"capacity="20""#, r#"capacity="many""#);
        match ProblemLoader::new().from_str(&xml).unwrap_err() {
            ProblemLoaderError::Attribute(AttributeError::InvalidNumber {
                element,
                attribute,
                value,
            }) => {
                assert_eq!(element, "room");
                assert_eq!(attribute, "capacity");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }

        let xml = INSTANCE.replace(r#"<room id="2" capacity="20"/>"#, r#"<room id="2"/>"#);
        assert!(matches!(
            ProblemLoader::new().from_str(&xml).unwrap_err(),
            ProblemLoaderError::Attribute(AttributeError::Missing {
                element: "room",
                attribute: "capacity"
            })
        ));

        let xml = INSTANCE.replace(r#"weeks="10""#, r#"weeks="1x""#);
        assert!(matches!(
            ProblemLoader::new().from_str(&xml).unwrap_err(),
            ProblemLoaderError::Attribute(AttributeError::InvalidMask { element: "time", .. })
        ));
    }

    #[test]
    fn test_unknown_distribution_type_is_reported() {
        let xml = INSTANCE.replace("NotOverlap", "SameSubpart");
        assert!(matches!(
            ProblemLoader::new().from_str(&xml).unwrap_err(),
            ProblemLoaderError::UnknownDistributionType(_)
        ));
    }

    #[test]
    fn test_document_without_problem_is_rejected() {
        assert!(matches!(
            ProblemLoader::new().from_str("<other/>").unwrap_err(),
            ProblemLoaderError::MissingProblem
        ));
    }
}
