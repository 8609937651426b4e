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
    xml::AttributeError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndeclaredRoomError {
    class: ClassIdentifier,
    room: RoomIdentifier,
}

impl UndeclaredRoomError {
    pub fn new(class: ClassIdentifier, room: RoomIdentifier) -> Self {
        Self { class, room }
    }

    pub fn class(&self) -> ClassIdentifier {
        self.class
    }

    pub fn room(&self) -> RoomIdentifier {
        self.room
    }
}

impl std::fmt::Display for UndeclaredRoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Class {} is placed in room {} which is not among its options",
            self.class, self.room
        )
    }
}

impl std::error::Error for UndeclaredRoomError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SolutionValidationError {
    MissingClass(ClassIdentifier),
    ExtraClass(ClassIdentifier),
    DuplicateClass(ClassIdentifier),
    UndeclaredTime(ClassIdentifier),
    UndeclaredRoom(UndeclaredRoomError),
    MissingRoom(ClassIdentifier),
    UnexpectedRoom(ClassIdentifier),
}

impl std::fmt::Display for SolutionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionValidationError::MissingClass(id) => {
                write!(f, "Missing assignment for class {}", id)
            }
            SolutionValidationError::ExtraClass(id) => {
                write!(f, "Assignment for unknown class {}", id)
            }
            SolutionValidationError::DuplicateClass(id) => {
                write!(f, "Class {} is assigned more than once", id)
            }
            SolutionValidationError::UndeclaredTime(id) => {
                write!(f, "Class {} is placed at a time it does not offer", id)
            }
            SolutionValidationError::UndeclaredRoom(e) => write!(f, "{}", e),
            SolutionValidationError::MissingRoom(id) => {
                write!(f, "Class {} requires a room but has none", id)
            }
            SolutionValidationError::UnexpectedRoom(id) => {
                write!(f, "Class {} needs no room but was given one", id)
            }
        }
    }
}

impl std::error::Error for SolutionValidationError {}

impl From<UndeclaredRoomError> for SolutionValidationError {
    fn from(err: UndeclaredRoomError) -> Self {
        SolutionValidationError::UndeclaredRoom(err)
    }
}

#[derive(Debug)]
pub enum SolutionWriteError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Utf8(std::string::FromUtf8Error),
}

impl std::fmt::Display for SolutionWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionWriteError::Io(e) => write!(f, "I/O error: {}", e),
            SolutionWriteError::Xml(e) => write!(f, "XML error: {}", e),
            SolutionWriteError::Utf8(e) => write!(f, "Output is not valid UTF-8: {}", e),
        }
    }
}

impl std::error::Error for SolutionWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolutionWriteError::Io(e) => Some(e),
            SolutionWriteError::Xml(e) => Some(e),
            SolutionWriteError::Utf8(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SolutionWriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<quick_xml::Error> for SolutionWriteError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<std::string::FromUtf8Error> for SolutionWriteError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

#[derive(Debug)]
pub enum SolutionLoaderError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Attribute(AttributeError),
    MissingSolution,
}

impl std::fmt::Display for SolutionLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionLoaderError::Io(e) => write!(f, "I/O error: {}", e),
            SolutionLoaderError::Xml(e) => write!(f, "XML error: {}", e),
            SolutionLoaderError::Attribute(e) => write!(f, "{}", e),
            SolutionLoaderError::MissingSolution => write!(f, "No <solution> element found"),
        }
    }
}

impl std::error::Error for SolutionLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolutionLoaderError::Io(e) => Some(e),
            SolutionLoaderError::Xml(e) => Some(e),
            SolutionLoaderError::Attribute(e) => Some(e),
            SolutionLoaderError::MissingSolution => None,
        }
    }
}

impl From<std::io::Error> for SolutionLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<quick_xml::Error> for SolutionLoaderError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<AttributeError> for SolutionLoaderError {
    fn from(e: AttributeError) -> Self {
        Self::Attribute(e)
    }
}
