// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the real plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of the real
//! plane.

use crate::error::{Error, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// real plane, as (x, y) pairs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RealPlane(pub (f64, f64), pub (f64, f64));

/// Describes the x, y of a cell in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps points of the real plane onto cells of the integral plane.
/// Points on or beyond the edge of the real plane land in the nearest
/// edge cell, so every point maps to exactly one cell.
#[derive(Clone, Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the real cartesian plane,
    /// left-lower and right-upper
    pub real_plane: RealPlane,
    // The width and height of the real plane.
    extent: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and two
    /// points describing the real plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: (f64, f64),
        rightupper: (f64, f64),
    ) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyGrid(width, height));
        }

        if !(rightupper.0 > leftlower.0) {
            return Err(Error::BadPlane(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if !(rightupper.1 > leftlower.1) {
            return Err(Error::BadPlane(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            real_plane: RealPlane(leftlower, rightupper),
            extent: (rightupper.0 - leftlower.0, rightupper.1 - leftlower.1),
        })
    }

    /// The square [-1, 1]² every orbit of the map stays inside.
    pub fn unit(width: usize, height: usize) -> Result<PlaneMapper> {
        PlaneMapper::new(width, height, (-1.0, -1.0), (1.0, 1.0))
    }

    /// The total number of cells in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a point on the real plane, find the cell it falls in.
    /// Coordinates are floored, then held inside the grid: a point
    /// exactly on the right or upper edge belongs to the last cell.
    #[inline]
    pub fn point_to_pixel(&self, x: f64, y: f64) -> Pixel {
        let IntegralPlane(width, height) = self.integral_plane;
        let RealPlane(leftlower, _) = self.real_plane;
        let left = (x - leftlower.0) * (width as f64) / self.extent.0;
        let top = (y - leftlower.1) * (height as f64) / self.extent.1;
        Pixel(cell(left, width), cell(top, height))
    }

    /// The row-major offset of the cell a point falls in.
    #[inline]
    pub fn point_to_offset(&self, x: f64, y: f64) -> usize {
        let Pixel(left, top) = self.point_to_pixel(x, y);
        top * self.integral_plane.0 + left
    }
}

// NaN and anything below zero fall into the first cell.
#[inline]
fn cell(v: f64, size: usize) -> usize {
    if !(v > 0.0) {
        return 0;
    }
    (v.floor() as usize).min(size - 1)
}
