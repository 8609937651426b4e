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

use crate::solution::{err::SolutionWriteError, sol::Solution};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};
use std::{io::Write, path::Path};

/// Writes solutions in the ITC-2019 XML format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionWriter {
    indent: usize,
}

impl Default for SolutionWriter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl SolutionWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spaces per nesting level; zero writes everything on one line.
    #[inline]
    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    pub fn write_to<W: Write>(
        &self,
        solution: &Solution,
        out: W,
    ) -> Result<(), SolutionWriteError> {
        let mut writer = if self.indent == 0 {
            Writer::new(out)
        } else {
            Writer::new_with_indent(out, b' ', self.indent)
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let meta = solution.meta();
        let runtime = meta.runtime().to_string();
        let cores = meta.cores().to_string();
        let mut root = BytesStart::new("solution");
        root.push_attribute(("name", meta.name()));
        root.push_attribute(("runtime", runtime.as_str()));
        root.push_attribute(("cores", cores.as_str()));
        root.push_attribute(("technique", meta.technique()));
        root.push_attribute(("author", meta.author()));
        root.push_attribute(("institution", meta.institution()));
        root.push_attribute(("country", meta.country()));
        writer.write_event(Event::Start(root))?;

        for class in solution.classes() {
            let id = class.id().value().to_string();
            let days = class.days().to_string();
            let start = class.start().to_string();
            let weeks = class.weeks().to_string();
            let mut el = BytesStart::new("class");
            el.push_attribute(("id", id.as_str()));
            el.push_attribute(("days", days.as_str()));
            el.push_attribute(("start", start.as_str()));
            el.push_attribute(("weeks", weeks.as_str()));
            if let Some(room) = class.room() {
                let room = room.value().to_string();
                el.push_attribute(("room", room.as_str()));
            }
            writer.write_event(Event::Empty(el))?;
        }

        writer.write_event(Event::End(BytesEnd::new("solution")))?;
        Ok(())
    }

    pub fn to_string(&self, solution: &Solution) -> Result<String, SolutionWriteError> {
        let mut buf = Vec::new();
        self.write_to(solution, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn to_path(
        &self,
        solution: &Solution,
        path: impl AsRef<Path>,
    ) -> Result<(), SolutionWriteError> {
        let file = std::fs::File::create(path)?;
        let mut out = std::io::BufWriter::new(file);
        self.write_to(solution, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
