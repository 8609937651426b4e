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

use class_alloc_model::{prelude::ClassIdentifier, problem::err::RoomNotFoundError};

#[derive(Debug, Clone)]
pub struct MissingClassError {
    id: ClassIdentifier,
}

impl MissingClassError {
    pub fn new(id: ClassIdentifier) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ClassIdentifier {
        self.id
    }
}

impl std::fmt::Display for MissingClassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Class with ID {} is missing", self.id)
    }
}

impl std::error::Error for MissingClassError {}

#[derive(Debug, Clone)]
pub enum SolverModelBuildError {
    MissingClass(MissingClassError),
    RoomNotFound(RoomNotFoundError),
}

impl std::fmt::Display for SolverModelBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverModelBuildError::MissingClass(err) => write!(f, "{}", err),
            SolverModelBuildError::RoomNotFound(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SolverModelBuildError {}

impl From<MissingClassError> for SolverModelBuildError {
    fn from(err: MissingClassError) -> Self {
        SolverModelBuildError::MissingClass(err)
    }
}

impl From<RoomNotFoundError> for SolverModelBuildError {
    fn from(err: RoomNotFoundError) -> Self {
        SolverModelBuildError::RoomNotFound(err)
    }
}
