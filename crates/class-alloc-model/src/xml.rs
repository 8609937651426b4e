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

use class_alloc_core::prelude::{Mask, MaskParseError};
use quick_xml::events::BytesStart;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    Missing {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidNumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    InvalidMask {
        element: &'static str,
        attribute: &'static str,
        source: MaskParseError,
    },
}

impl std::fmt::Display for AttributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeError::Missing { element, attribute } => {
                write!(f, "<{}> is missing attribute '{}'", element, attribute)
            }
            AttributeError::InvalidNumber {
                element,
                attribute,
                value,
            } => write!(
                f,
                "<{}> attribute '{}' is not a valid number: '{}'",
                element, attribute, value
            ),
            AttributeError::InvalidMask {
                element,
                attribute,
                source,
            } => write!(f, "<{}> attribute '{}': {}", element, attribute, source),
        }
    }
}

impl std::error::Error for AttributeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttributeError::InvalidMask { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Attributes of one element, decoded and unescaped.
pub(crate) struct Attrs {
    element: &'static str,
    pairs: Vec<(String, String)>,
}

impl Attrs {
    pub(crate) fn read(
        e: &BytesStart<'_>,
        element: &'static str,
    ) -> Result<Self, quick_xml::Error> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            pairs.push((key, value));
        }
        Ok(Self { element, pairs })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn required(&self, name: &'static str) -> Result<&str, AttributeError> {
        self.get(name).ok_or(AttributeError::Missing {
            element: self.element,
            attribute: name,
        })
    }

    fn parse_number<T: FromStr>(&self, name: &'static str, raw: &str) -> Result<T, AttributeError> {
        raw.trim().parse().map_err(|_| AttributeError::InvalidNumber {
            element: self.element,
            attribute: name,
            value: raw.to_string(),
        })
    }

    pub(crate) fn number<T: FromStr>(&self, name: &'static str) -> Result<T, AttributeError> {
        let raw = self.required(name)?;
        self.parse_number(name, raw)
    }

    pub(crate) fn optional_number<T: FromStr>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, AttributeError> {
        self.get(name)
            .map(|raw| self.parse_number(name, raw))
            .transpose()
    }

    pub(crate) fn mask(&self, name: &'static str) -> Result<Mask, AttributeError> {
        self.required(name)?
            .parse()
            .map_err(|source| AttributeError::InvalidMask {
                element: self.element,
                attribute: name,
                source,
            })
    }

    pub(crate) fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).map(|v| v.eq_ignore_ascii_case("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::{Reader, events::Event};

    fn first_element(xml: &str) -> Attrs {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => return Attrs::read(&e, "x").unwrap(),
                Event::Eof => panic!("no element"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_reads_and_unescapes_values() {
        let a = first_element(r#"<x name="a &amp; b" n=" 12 " flag="True"/>"#);
        assert_eq!(a.get("name"), Some("a & b"));
        assert_eq!(a.number::<u32>("n"), Ok(12));
        assert_eq!(a.flag("flag"), Some(true));
        assert_eq!(a.flag("other"), None);
        assert_eq!(a.optional_number::<u32>("missing"), Ok(None));
    }

    #[test]
    fn test_reports_missing_and_malformed_values() {
        let a = first_element(r#"<x n="-1" days="01a"/>"#);
        assert_eq!(
            a.number::<u32>("id"),
            Err(AttributeError::Missing {
                element: "x",
                attribute: "id"
            })
        );
        assert!(matches!(
            a.number::<u32>("n"),
            Err(AttributeError::InvalidNumber { value, .. }) if value == "-1"
        ));
        assert!(matches!(
            a.mask("days"),
            Err(AttributeError::InvalidMask { attribute: "days", .. })
        ));
    }
}
