// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The errors a run can refuse to start with.  Once a configuration
//! has been validated nothing in the pipeline fails; numeric edge
//! cases are clamped rather than reported.

use failure::Fail;

/// Everything that can go wrong before the first iteration.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The integral plane must have both a width and a height.
    #[fail(display = "grid must have non-zero dimensions, got {}x{}", _0, _1)]
    EmptyGrid(usize, usize),

    /// The corners of the real plane are the wrong way around.
    #[fail(display = "bad plane: {}", _0)]
    BadPlane(String),

    /// A gradient needs at least one colour stop.
    #[fail(display = "a gradient must have at least one colour stop")]
    EmptyGradient,

    /// There must be at least one gradient pair to choose from.
    #[fail(display = "the gradient catalog is empty")]
    EmptyCatalog,

    /// The render table must name at least one mode with a positive weight.
    #[fail(display = "invalid render table: {}", _0)]
    BadRenderTable(String),

    /// Any other out-of-range configuration value.
    #[fail(display = "invalid configuration: {}", _0)]
    BadConfig(String),

    /// The hash could not seed the generator.
    #[fail(display = "invalid hash '{}': {}", _0, _1)]
    BadHash(String, String),

    /// A batch worker died before finishing its queue.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,
}

/// Shorthand used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
