// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning a finalised field into pixels.
//!
//! Every strategy shares one shape: look at a cell, derive a tone from
//! its density, sample the two gradients, and blend.  They differ only
//! in what drives the gradient lookup and the blend.
//!
//! * `Bilinear` is the real picture.  Density picks the position along
//!   both gradients and the step statistic blends between them.
//! * `Corners` and its unmirrored twin `Debug` ignore the statistic and
//!   paint the gradient pair itself across the canvas, with the orbit
//!   drawn over it in the highlight colour.  They exist to preview a
//!   pair.

use std::fmt;
use std::path::Path;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::colour::{Colour, GradientPair};
use crate::error::{Error, Result};
use crate::field::{Field, StatisticScale};

/// The pixel-colouring strategies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Density along the gradients, statistic between them.
    Bilinear,
    /// Positional preview, second gradient mirrored vertically.
    Corners,
    /// Positional preview, both gradients the same way up.
    Debug,
}

impl RenderMode {
    /// The label published in the metadata.
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Bilinear => "bilinear",
            RenderMode::Corners => "corners",
            RenderMode::Debug => "debug",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the render table.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weighted {
    /// The mode.
    pub mode: RenderMode,
    /// Its relative chance of being picked.
    pub weight: f64,
}

/// A weighted choice of render mode.  Weights are relative; they need
/// not sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderTable(pub Vec<Weighted>);

impl RenderTable {
    /// A table that always picks `mode`.
    pub fn only(mode: RenderMode) -> RenderTable {
        RenderTable(vec![Weighted { mode, weight: 1.0 }])
    }

    /// Weights must be finite and non-negative, with a positive total.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::BadRenderTable("no render modes".to_string()));
        }
        if self.0.iter().any(|w| !w.weight.is_finite() || w.weight < 0.0) {
            return Err(Error::BadRenderTable(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        if !(self.total() > 0.0) {
            return Err(Error::BadRenderTable("weights sum to zero".to_string()));
        }
        Ok(())
    }

    fn total(&self) -> f64 {
        self.0.iter().map(|w| w.weight).sum()
    }

    /// Walk the cumulative weights with a [0, 1) draw.
    pub fn pick(&self, t: f64) -> Result<RenderMode> {
        self.validate()?;
        let target = t * self.total();
        let mut acc = 0.0;
        for row in &self.0 {
            acc += row.weight;
            if target < acc {
                return Ok(row.mode);
            }
        }
        // A draw at the very top of the range.
        Ok(self.0[self.0.len() - 1].mode)
    }
}

/// Rendering constants.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Density contrast.  Larger values saturate sparser cells.
    pub alpha: f64,
    /// Statistic contrast.  Below one lifts the low end.
    pub exponent: f64,
    /// How the statistic is brought into [0, 1].
    pub scale: StatisticScale,
    /// The colour the orbit is drawn in by the preview modes.
    pub highlight: Colour,
}

/// Saturating density tone of a cell: near 0 for sparse cells,
/// approaching 1 for dense ones.  The count is taken relative to an
/// even spread of the budget over the whole grid.
#[inline]
pub fn density(alpha: f64, count: u32, iterations: usize, width: usize, height: usize) -> f64 {
    1.0 - (-alpha * f64::from(count) / iterations as f64 * width as f64 * height as f64).exp()
}

/// A per-pixel colouring strategy.
pub trait Shader {
    /// The colour of cell (x, y).
    fn shade(&self, field: &Field, x: usize, y: usize) -> Colour;
}

/// The primary strategy.
pub struct Bilinear<'a> {
    pair: &'a GradientPair,
    style: Style,
}

impl<'a> Bilinear<'a> {
    /// Shade with a pair and a style.
    pub fn new(pair: &'a GradientPair, style: Style) -> Bilinear<'a> {
        Bilinear { pair, style }
    }
}

impl<'a> Shader for Bilinear<'a> {
    fn shade(&self, field: &Field, x: usize, y: usize) -> Colour {
        let v = density(
            self.style.alpha,
            field.count(x, y),
            field.iterations(),
            field.width(),
            field.height(),
        );
        let d = field
            .scaled_delta(x, y, self.style.scale)
            .powf(self.style.exponent);
        let low = self.pair.first.colourmap(v);
        let high = self.pair.second.colourmap(v);
        low.lerp(high, d)
    }
}

/// The preview strategies.  The first gradient runs bottom to top;
/// the second runs top to bottom when mirrored and bottom to top when
/// not.  Across the canvas the two are blended left to right, and the
/// orbit's density pulls each pixel towards the highlight colour.
pub struct Corners<'a> {
    pair: &'a GradientPair,
    style: Style,
    mirrored: bool,
}

impl<'a> Corners<'a> {
    /// The `Corners` mode.
    pub fn mirrored(pair: &'a GradientPair, style: Style) -> Corners<'a> {
        Corners {
            pair,
            style,
            mirrored: true,
        }
    }

    /// The `Debug` mode.
    pub fn unmirrored(pair: &'a GradientPair, style: Style) -> Corners<'a> {
        Corners {
            pair,
            style,
            mirrored: false,
        }
    }
}

impl<'a> Shader for Corners<'a> {
    fn shade(&self, field: &Field, x: usize, y: usize) -> Colour {
        let height = field.height() as f64;
        let v = density(
            self.style.alpha,
            field.count(x, y),
            field.iterations(),
            field.width(),
            field.height(),
        );
        let down = y as f64 / height;
        let first = self.pair.first.colourmap(1.0 - down);
        let second = if self.mirrored {
            self.pair.second.colourmap(down)
        } else {
            self.pair.second.colourmap(1.0 - down)
        };
        // Horizontal position is measured against the height too.
        let across = first.lerp(second, x as f64 / height);
        across.lerp(self.style.highlight, v)
    }
}

/// A finished W×H RGBA image, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Shade every cell of the field exactly once.
    pub fn paint<S: Shader>(field: &Field, shader: &S) -> Raster {
        let (width, height) = (field.width(), field.height());
        let mut pixels = vec![0u8; width * height * 4];
        for (y, x) in iproduct!(0..height, 0..width) {
            let offset = (y * width + x) * 4;
            let rgba = shader.shade(field, x, y).to_rgba();
            pixels[offset..offset + 4].copy_from_slice(&rgba);
        }
        Raster {
            width,
            height,
            pixels,
        }
    }

    /// Pixels across.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pixels down.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The RGBA bytes of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * self.width + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        rgba
    }

    /// The whole buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Write the raster to disk; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), failure::Error> {
        let image =
            image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
                .ok_or_else(|| Error::EmptyGrid(self.width, self.height))?;
        image.save(path)?;
        Ok(())
    }
}

/// Paint a field with the chosen strategy.
pub fn render(field: &Field, pair: &GradientPair, mode: RenderMode, style: Style) -> Raster {
    match mode {
        RenderMode::Bilinear => Raster::paint(field, &Bilinear::new(pair, style)),
        RenderMode::Corners => Raster::paint(field, &Corners::mirrored(pair, style)),
        RenderMode::Debug => Raster::paint(field, &Corners::unmirrored(pair, style)),
    }
}
