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
    problem::{class::ClassIdentifier, room::RoomIdentifier},
    solution::{
        err::SolutionLoaderError,
        sol::{RunMetadata, Solution, SolutionClass},
    },
    xml::Attrs,
};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::{io::Read, path::Path};

/// Reads solutions in the ITC-2019 XML format. Per-student sectioning
/// (`<student>` children of `<class>`) is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolutionLoader;

impl SolutionLoader {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub fn from_str(&self, s: &str) -> Result<Solution, SolutionLoaderError> {
        let mut reader = Reader::from_str(s);
        reader.config_mut().trim_text(true);

        let mut meta = None;
        let mut classes = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    read_element(&e, &mut meta, &mut classes)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }
        let meta = meta.ok_or(SolutionLoaderError::MissingSolution)?;
        Ok(Solution::new(meta, classes))
    }

    pub fn from_reader<R: Read>(&self, mut r: R) -> Result<Solution, SolutionLoaderError> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        self.from_str(&s)
    }

    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Solution, SolutionLoaderError> {
        let s = std::fs::read_to_string(path)?;
        self.from_str(&s)
    }
}

fn read_element(
    e: &BytesStart<'_>,
    meta: &mut Option<RunMetadata>,
    classes: &mut Vec<SolutionClass>,
) -> Result<(), SolutionLoaderError> {
    match e.name().as_ref() {
        b"solution" => {
            let a = Attrs::read(e, "solution")?;
            let text = |name: &str| a.get(name).unwrap_or_default().to_string();
            *meta = Some(
                RunMetadata::new(a.required("name")?)
                    .with_runtime(a.optional_number("runtime")?.unwrap_or(0.0))
                    .with_cores(a.optional_number("cores")?.unwrap_or(1))
                    .with_technique(text("technique"))
                    .with_author(text("author"))
                    .with_institution(text("institution"))
                    .with_country(text("country")),
            );
        }
        b"class" => {
            let a = Attrs::read(e, "class")?;
            let room = a.optional_number("room")?.map(RoomIdentifier::new);
            classes.push(SolutionClass::new(
                ClassIdentifier::new(a.number("id")?),
                a.mask("days")?,
                a.number("start")?,
                a.mask("weeks")?,
                room,
            ));
        }
        _ => {}
    }
    Ok(())
}
