// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning a stream of uniform draws into one attractor instance.
//!
//! The order in which draws are taken is part of the output: the same
//! hash has to keep producing the same picture, so the sequence in
//! `sample_run` (coefficients, rescale flag, gradient pair, render
//! mode) must never be reordered.

use serde::{Deserialize, Serialize};

use crate::colour::GradientPair;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interp::{sample, uniform};
use crate::random::RandomSource;
use crate::render::RenderMode;

/// A pair of bounds a draw is stretched over.  `lo` may exceed `hi`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Value at a draw of 0.
    pub lo: f64,
    /// Value approached as the draw tends to 1.
    pub hi: f64,
}

impl Interval {
    /// Build an interval.
    pub fn new(lo: f64, hi: f64) -> Interval {
        Interval { lo, hi }
    }

    fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
}

/// Magnitude ranges of the four coefficients.  Each magnitude gets an
/// independent random sign.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRanges {
    /// Range of |a|
    pub a: Interval,
    /// Range of |b|
    pub b: Interval,
    /// Range of |c|
    pub c: Interval,
    /// Range of |d|
    pub d: Interval,
}

/// Where the coefficients come from.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coefficients {
    /// Drawn from the random source.
    Sampled(CoefficientRanges),
    /// Pinned; no draws are spent on them.
    Fixed(AttractorParams),
}

impl Coefficients {
    pub(crate) fn validate(&self) -> Result<()> {
        let finite = match self {
            Coefficients::Sampled(r) => {
                r.a.is_finite() && r.b.is_finite() && r.c.is_finite() && r.d.is_finite()
            }
            Coefficients::Fixed(p) => {
                p.a.is_finite() && p.b.is_finite() && p.c.is_finite() && p.d.is_finite()
            }
        };
        if finite {
            Ok(())
        } else {
            Err(Error::BadConfig("coefficients must be finite".to_string()))
        }
    }
}

/// The four coefficients of
///
/// ```text
/// x' = (sin(a·y·yw) + c·cos(a·x·xw)) / xw
/// y' = (sin(b·x·xw) + d·cos(b·y·yw)) / yw
/// ```
///
/// where `xw = 1 + |c|` and `yw = 1 + |d|` keep the orbit inside the
/// unit square.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttractorParams {
    /// a
    pub a: f64,
    /// b
    pub b: f64,
    /// c
    pub c: f64,
    /// d
    pub d: f64,
}

impl AttractorParams {
    /// Pin the coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> AttractorParams {
        AttractorParams { a, b, c, d }
    }

    /// Horizontal scale factor, 1 + |c|.
    pub fn x_width(&self) -> f64 {
        1.0 + self.c.abs()
    }

    /// Vertical scale factor, 1 + |d|.
    pub fn y_width(&self) -> f64 {
        1.0 + self.d.abs()
    }
}

/// Everything the random source decides about a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// The attractor instance.
    pub params: AttractorParams,
    /// Whether the step statistic is averaged per visit.
    pub rescale: bool,
    /// The gradients to blend.
    pub pair: GradientPair,
    /// How pixels are coloured.
    pub mode: RenderMode,
}

const SIGNS: [f64; 2] = [-1.0, 1.0];

fn signed<S: RandomSource>(rng: &mut S, range: Interval) -> f64 {
    let magnitude = uniform(rng.next(), range.lo, range.hi);
    magnitude * *sample(rng.next(), &SIGNS).unwrap_or(&1.0)
}

/// Draw a run's parameters from a validated configuration.
pub fn sample_run<S: RandomSource>(config: &Config, rng: &mut S) -> Result<Selection> {
    let params = match config.coefficients {
        Coefficients::Fixed(p) => p,
        Coefficients::Sampled(r) => {
            let a = signed(rng, r.a);
            let b = signed(rng, r.b);
            let c = signed(rng, r.c);
            let d = signed(rng, r.d);
            AttractorParams { a, b, c, d }
        }
    };
    let rescale = rng.next() < config.rescale_probability;
    let pair = sample(rng.next(), &config.catalog)
        .cloned()
        .ok_or(Error::EmptyCatalog)?;
    let mode = config.render_modes.pick(rng.next())?;
    Ok(Selection {
        params,
        rescale,
        pair,
        mode,
    })
}
