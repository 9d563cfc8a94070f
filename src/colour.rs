// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colours, gradients and the catalog of gradient pairs.
//!
//! A colour is kept as three floating-point channels on the familiar
//! 0..255 scale.  Interpolated colours are never rounded until they
//! reach the raster, so a chain of blends (two gradient lookups and a
//! final mix) loses nothing along the way.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interp::{clamp, lerp};

/// An opaque RGB colour.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Colour {
    /// Red, 0..255
    pub r: f64,
    /// Green, 0..255
    pub g: f64,
    /// Blue, 0..255
    pub b: f64,
}

impl Colour {
    /// A colour from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
        }
    }

    /// Blend towards `other`.  The amount is clamped to [0, 1], so an
    /// overshooting blend factor sticks at the nearer colour.
    pub fn lerp(self, other: Colour, amount: f64) -> Colour {
        let t = clamp(amount, 0.0, 1.0);
        Colour {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }

    /// The fully opaque RGBA bytes of this colour.
    pub fn to_rgba(self) -> [u8; 4] {
        [channel(self.r), channel(self.g), channel(self.b), 255]
    }
}

fn channel(v: f64) -> u8 {
    clamp(v, 0.0, 255.0).round_ties_even() as u8
}

impl From<[f64; 3]> for Colour {
    fn from(c: [f64; 3]) -> Colour {
        Colour {
            r: c[0],
            g: c[1],
            b: c[2],
        }
    }
}

impl From<Colour> for [f64; 3] {
    fn from(c: Colour) -> [f64; 3] {
        [c.r, c.g, c.b]
    }
}

/// An ordered list of colour stops, evenly spaced over [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Colour>", into = "Vec<Colour>")]
pub struct Gradient {
    stops: Vec<Colour>,
}

impl Gradient {
    /// Build a gradient.  An empty list of stops is a configuration
    /// error; a single stop is a flat colour.
    pub fn new(stops: Vec<Colour>) -> Result<Gradient> {
        if stops.is_empty() {
            return Err(Error::EmptyGradient);
        }
        Ok(Gradient { stops })
    }

    /// The stops, first to last.
    pub fn stops(&self) -> &[Colour] {
        &self.stops
    }

    /// Piecewise-linear lookup, in the manner of matplotlib's
    /// LinearSegmentedColormap.  Anything below 0 is the first stop,
    /// anything at or above 1 is the last.
    pub fn colourmap(&self, t: f64) -> Colour {
        let n = self.stops.len();
        if n == 1 || t.is_nan() {
            return self.stops[0];
        }
        let last = (n - 1) as f64;
        let scaled = t * last;
        // k / (n - 1) lands a few ulps either side of k; that is stop k.
        let nearest = scaled.round();
        if nearest >= 0.0
            && nearest <= last
            && (scaled - nearest).abs() <= 4.0 * std::f64::EPSILON * last
        {
            return self.stops[nearest as usize];
        }
        // Which pair of stops we are between.
        let bin = scaled.floor();
        if bin >= last {
            return self.stops[n - 1];
        }
        if bin < 0.0 {
            return self.stops[0];
        }
        let width = 1.0 / last;
        let local = (t - width * bin) / width;
        let i = bin as usize;
        self.stops[i].lerp(self.stops[i + 1], local)
    }
}

impl TryFrom<Vec<Colour>> for Gradient {
    type Error = Error;

    fn try_from(stops: Vec<Colour>) -> Result<Gradient> {
        Gradient::new(stops)
    }
}

impl From<Gradient> for Vec<Colour> {
    fn from(g: Gradient) -> Vec<Colour> {
        g.stops
    }
}

/// The two gradients a render blends between, and the name the pair
/// is published under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientPair {
    /// Published label.
    pub name: String,
    /// Low-statistic gradient.
    pub first: Gradient,
    /// High-statistic gradient.
    pub second: Gradient,
}

impl GradientPair {
    /// Name a pair of gradients.
    pub fn new(name: &str, first: Gradient, second: Gradient) -> GradientPair {
        GradientPair {
            name: name.to_string(),
            first,
            second,
        }
    }
}

/// The warm off-white that every catalog gradient starts from.
pub fn paper() -> Colour {
    Colour::rgb(255, 250, 245)
}

// Every named gradient starts at the background colour and darkens
// through four stops.
fn ramp(background: Colour, stops: &[(u8, u8, u8)]) -> Gradient {
    let mut colours = vec![background];
    colours.extend(stops.iter().map(|&(r, g, b)| Colour::rgb(r, g, b)));
    Gradient { stops: colours }
}

/// Reds.
pub fn reds(bg: Colour) -> Gradient {
    ramp(bg, &[(252, 181, 154), (247, 93, 66), (187, 20, 25), (103, 0, 12)])
}

/// Blues.
pub fn blues(bg: Colour) -> Gradient {
    ramp(bg, &[(192, 216, 237), (96, 166, 209), (23, 100, 171), (8, 48, 107)])
}

/// Red to purple.
pub fn red_purple(bg: Colour) -> Gradient {
    ramp(bg, &[(251, 191, 190), (240, 90, 158), (153, 1, 123), (73, 0, 106)])
}

/// Purple to red.
pub fn purple_red(bg: Colour) -> Gradient {
    ramp(bg, &[(210, 180, 215), (225, 85, 165), (184, 10, 78), (103, 0, 31)])
}

/// Blue to purple.
pub fn blue_purple(bg: Colour) -> Gradient {
    ramp(bg, &[(186, 207, 228), (140, 138, 192), (133, 44, 143), (77, 0, 75)])
}

/// Purple to blue.
pub fn purple_blue(bg: Colour) -> Gradient {
    ramp(bg, &[(202, 206, 228), (99, 162, 203), (4, 103, 162), (2, 56, 88)])
}

/// A short, very dark violet ramp.  Only three stops.
pub fn deep_violet(bg: Colour) -> Gradient {
    ramp(bg, &[(60, 0, 100), (20, 0, 40)])
}

/// The eight published pairs, in selection order.  A uniform draw
/// picks one with equal probability.
pub fn catalog(bg: Colour) -> Vec<GradientPair> {
    vec![
        GradientPair::new("aion", deep_violet(bg), reds(bg)),
        GradientPair::new("eros", reds(bg), blues(bg)),
        GradientPair::new("erebus", blues(bg), reds(bg)),
        GradientPair::new("hypnos", reds(bg), blue_purple(bg)),
        GradientPair::new("nesoi", purple_red(bg), blues(bg)),
        GradientPair::new("aether", blue_purple(bg), blues(bg)),
        GradientPair::new("nyx", purple_red(bg), purple_blue(bg)),
        GradientPair::new("chaos", red_purple(bg), blues(bg)),
    ]
}
