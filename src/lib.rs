#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Protogenoi renderer
//!
//! Protogenoi pictures are portraits of a single orbit of a chaotic
//! two dimensional map,
//!
//! ```text
//! x' = (sin(a·y·yw) + c·cos(a·x·xw)) / xw
//! y' = (sin(b·x·xw) + d·cos(b·y·yw)) / yw
//! ```
//!
//! followed for tens of millions of steps.  The orbit never leaves the
//! unit square, and over that many steps it traces out the shape of
//! its attractor.  Each point is dropped into a pixel-sized cell, and
//! each cell remembers how often the orbit visited it and how far the
//! orbit had jumped to get there.  Visit counts decide how far along a
//! pair of colour gradients a pixel sits; jump lengths decide the mix
//! between the two gradients.
//!
//! Everything about a picture (the four coefficients, the gradient
//! pair, the render mode, whether jump lengths are averaged) is drawn
//! from a deterministic generator seeded by a token hash, so a hash
//! always renders the same picture.
//!
//! ```no_run
//! use protogenoi::{run_hash, Config};
//!
//! let art = run_hash(&Config::release(), "ooNx1eTQZ6xC9pRfsgPUbt8aWFn9fZhtYNtgbYnGoVbHw38R3kD").unwrap();
//! art.raster.save("nyx.png").unwrap();
//! println!("{}", art.features.to_json().unwrap());
//! ```

pub mod attractor;
pub mod colour;
pub mod config;
pub mod error;
pub mod features;
pub mod field;
pub mod interp;
pub mod params;
pub mod planes;
pub mod random;
pub mod render;
pub mod run;

pub use crate::attractor::{Grid, Map, SineMap};
pub use crate::colour::{Colour, Gradient, GradientPair};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::features::Features;
pub use crate::field::{DeltaRange, Field, StatisticScale};
pub use crate::params::{AttractorParams, Selection};
pub use crate::random::{random_hash, FxRand, RandomSource, RngSource};
pub use crate::render::{render, Raster, RenderMode, Style};
pub use crate::run::{render_batch, run, run_hash, Artwork};
