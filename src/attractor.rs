// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The attractor simulator.
//!
//! A single orbit is followed from a fixed starting point for the
//! whole iteration budget.  Every point of the orbit is dropped into
//! the cell of the integral plane it lands on, and that cell records
//! two things: how often it was visited, and the sum of the squared
//! lengths of the steps that arrived there.  The first becomes the
//! density of the picture, the second its colour.
//!
//! The `Grid` built here is the accumulating half of the pipeline.
//! `Grid::finalise` (in `field`) consumes it and hands back the
//! read-only `Field` the renderer works from.

use crate::error::{Error, Result};
use crate::params::AttractorParams;
use crate::planes::PlaneMapper;

/// Where every orbit starts.  Independent of the seed.
pub const ORIGIN: (f64, f64) = (0.1, 0.2);

/// A two dimensional iterated map.
pub trait Map {
    /// One application of the map.
    fn step(&self, x: f64, y: f64) -> (f64, f64);
}

/// The sinusoidal map the pictures are made from.  See
/// `AttractorParams` for the equations.
#[derive(Copy, Clone, Debug)]
pub struct SineMap {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    x_width: f64,
    y_width: f64,
}

impl SineMap {
    /// Precompute the scale factors for a set of coefficients.
    pub fn new(params: &AttractorParams) -> SineMap {
        SineMap {
            a: params.a,
            b: params.b,
            c: params.c,
            d: params.d,
            x_width: params.x_width(),
            y_width: params.y_width(),
        }
    }
}

impl Map for SineMap {
    #[inline]
    fn step(&self, x: f64, y: f64) -> (f64, f64) {
        let xn = ((self.a * y * self.y_width).sin() + self.c * (self.a * x * self.x_width).cos())
            / self.x_width;
        let yn = ((self.b * x * self.x_width).sin() + self.d * (self.b * y * self.y_width).cos())
            / self.y_width;
        (xn, yn)
    }
}

/// Per-cell visit counts and accumulated squared step lengths, both
/// row-major over the integral plane.
#[derive(Clone, Debug)]
pub struct Grid {
    pub(crate) plane: PlaneMapper,
    pub(crate) counts: Vec<u32>,
    pub(crate) deltas: Vec<f64>,
    pub(crate) iterations: usize,
}

impl Grid {
    /// An empty grid over [-1, 1]².
    pub fn new(width: usize, height: usize) -> Result<Grid> {
        let plane = PlaneMapper::unit(width, height)?;
        let len = plane.len();
        Ok(Grid {
            plane,
            counts: vec![0; len],
            deltas: vec![0.0; len],
            iterations: 0,
        })
    }

    /// Build a grid and run one full orbit of `map` into it.  The
    /// budget must fit a cell counter, since every step could land in
    /// the same cell.
    pub fn simulate<M: Map>(map: &M, width: usize, height: usize, iterations: usize) -> Result<Grid> {
        if iterations > u32::max_value() as usize {
            return Err(Error::BadConfig(
                "the iteration budget must fit a cell counter".to_string(),
            ));
        }
        let mut grid = Grid::new(width, height)?;
        grid.accumulate(map, iterations);
        Ok(grid)
    }

    // Follow the orbit from ORIGIN into a fresh grid.
    fn accumulate<M: Map>(&mut self, map: &M, iterations: usize) {
        let (mut x, mut y) = ORIGIN;
        for _ in 0..iterations {
            let (xn, yn) = map.step(x, y);
            let (dx, dy) = (xn - x, yn - y);
            x = xn;
            y = yn;
            let offset = self.plane.point_to_offset(xn, yn);
            self.counts[offset] += 1;
            self.deltas[offset] += dx * dx + dy * dy;
        }
        self.iterations = iterations;
    }

    /// Cells across.
    pub fn width(&self) -> usize {
        self.plane.integral_plane.0
    }

    /// Cells down.
    pub fn height(&self) -> usize {
        self.plane.integral_plane.1
    }

    /// Number of orbit points accumulated so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Visits to cell (x, y).
    pub fn count(&self, x: usize, y: usize) -> u32 {
        self.counts[y * self.width() + x]
    }

    /// Accumulated squared step length of cell (x, y).
    pub fn delta(&self, x: usize, y: usize) -> f64 {
        self.deltas[y * self.width() + x]
    }

    /// Sum of all visit counts.  Always equal to `iterations()`.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// A 64-bit FNV-1a digest of the grid: for every cell in row-major
    /// order, its count as four little-endian bytes followed by the
    /// bits of its delta as eight.
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = OFFSET;
        for (count, delta) in self.counts.iter().zip(&self.deltas) {
            let count = count.to_le_bytes();
            let delta = delta.to_bits().to_le_bytes();
            for &byte in count.iter().chain(delta.iter()) {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(PRIME);
            }
        }
        hash
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Map;

    /// A map that never moves: the whole orbit sits on `ORIGIN`.
    pub struct Still;

    impl Map for Still {
        fn step(&self, x: f64, y: f64) -> (f64, f64) {
            (x, y)
        }
    }
}
