// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that is fixed for a family of images.  The published
//! series and the sketches that led to it are each just a `Config`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colour::{blues, catalog, paper, reds, GradientPair};
use crate::error::{Error, Result};
use crate::field::StatisticScale;
use crate::params::{AttractorParams, CoefficientRanges, Coefficients, Interval};
use crate::render::{RenderMode, RenderTable, Style, Weighted};

/// The names `Config::preset` knows.
pub const PRESETS: [&str; 3] = ["release", "sketch", "explore"];

/// A family of images.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// What this family is called.
    pub name: String,
    /// Raster and grid width.
    pub width: usize,
    /// Raster and grid height.
    pub height: usize,
    /// Length of the orbit.
    pub iterations: usize,
    /// Drawn or pinned coefficients.
    pub coefficients: Coefficients,
    /// Chance the statistic is averaged per visit.
    pub rescale_probability: f64,
    /// Chance of each render mode.
    pub render_modes: RenderTable,
    /// Rendering constants.
    pub style: Style,
    /// The pairs a run chooses between, with equal probability.
    pub catalog: Vec<GradientPair>,
}

impl Config {
    /// The published series.
    pub fn release() -> Config {
        Config {
            name: "release".to_string(),
            width: 640,
            height: 640,
            iterations: 100_000_000,
            coefficients: Coefficients::Sampled(CoefficientRanges {
                a: Interval::new(1.75, 2.5),
                b: Interval::new(1.75, 2.5),
                c: Interval::new(0.9, 1.6),
                d: Interval::new(-0.9, -1.6),
            }),
            rescale_probability: 0.75,
            render_modes: RenderTable::only(RenderMode::Bilinear),
            style: Style {
                alpha: 0.3,
                exponent: 0.5,
                scale: StatisticScale::Range,
                highlight: paper(),
            },
            catalog: catalog(paper()),
        }
    }

    /// The first sketch: one attractor, one pair, previewed.
    pub fn sketch() -> Config {
        Config {
            name: "sketch".to_string(),
            width: 640,
            height: 640,
            iterations: 10_000_000,
            coefficients: Coefficients::Fixed(AttractorParams::new(2.02, 2.04, 1.60, -1.20)),
            rescale_probability: 0.0,
            render_modes: RenderTable::only(RenderMode::Corners),
            style: Style {
                alpha: 0.2,
                exponent: 0.3,
                scale: StatisticScale::Peak,
                highlight: paper(),
            },
            catalog: vec![GradientPair::new("eros", reds(paper()), blues(paper()))],
        }
    }

    /// Wider coefficient ranges, harder statistic contrast, and the
    /// occasional preview render.
    pub fn explore() -> Config {
        Config {
            name: "explore".to_string(),
            width: 640,
            height: 640,
            iterations: 10_000_000,
            coefficients: Coefficients::Sampled(CoefficientRanges {
                a: Interval::new(1.75, 2.5),
                b: Interval::new(1.75, 2.5),
                c: Interval::new(1.0, 2.0),
                d: Interval::new(-1.0, -2.0),
            }),
            rescale_probability: 0.75,
            render_modes: RenderTable(vec![
                Weighted {
                    mode: RenderMode::Bilinear,
                    weight: 0.9,
                },
                Weighted {
                    mode: RenderMode::Corners,
                    weight: 0.05,
                },
                Weighted {
                    mode: RenderMode::Debug,
                    weight: 0.05,
                },
            ]),
            style: Style {
                alpha: 0.25,
                exponent: 0.22,
                scale: StatisticScale::Range,
                highlight: paper(),
            },
            catalog: catalog(paper()),
        }
    }

    /// Look a preset up by name.
    pub fn preset(name: &str) -> Option<Config> {
        match name {
            "release" => Some(Config::release()),
            "sketch" => Some(Config::sketch()),
            "explore" => Some(Config::explore()),
            _ => None,
        }
    }

    /// Read a configuration from JSON.  It is validated before it is
    /// returned.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Config, failure::Error> {
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Config, failure::Error> {
        Config::from_reader(File::open(path)?)
    }

    /// The configuration as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Refuse anything that would make a run meaningless or crash it.
    pub fn validate(&self) -> Result<()> {
        let bad = |why: &str| Err(Error::BadConfig(why.to_string()));
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyGrid(self.width, self.height));
        }
        if self.width > u32::max_value() as usize || self.height > u32::max_value() as usize {
            return bad("the raster is too large");
        }
        if self.iterations == 0 {
            return bad("the iteration budget must be positive");
        }
        if self.iterations > u32::max_value() as usize {
            return bad("the iteration budget must fit a cell counter");
        }
        self.coefficients.validate()?;
        if !(self.rescale_probability >= 0.0 && self.rescale_probability <= 1.0) {
            return bad("rescale_probability must lie in [0, 1]");
        }
        self.render_modes.validate()?;
        if !(self.style.alpha.is_finite() && self.style.alpha > 0.0) {
            return bad("alpha must be positive");
        }
        if !(self.style.exponent.is_finite() && self.style.exponent > 0.0) {
            return bad("exponent must be positive");
        }
        if self.catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in PRESETS.iter() {
            let config = Config::preset(name).unwrap();
            assert_eq!(config.name, *name);
            config.validate().unwrap();
        }
        assert!(Config::preset("nope").is_none());
    }

    #[test]
    fn configs_survive_json() {
        for name in PRESETS.iter() {
            let config = Config::preset(name).unwrap();
            let text = config.to_json().unwrap();
            let back = Config::from_reader(text.as_bytes()).unwrap();
            assert_eq!(back, config);
        }
    }

    #[test]
    fn coefficients_are_tagged_in_json() {
        let text = Config::sketch().to_json().unwrap();
        assert!(text.contains("\"fixed\""));
        let text = Config::release().to_json().unwrap();
        assert!(text.contains("\"sampled\""));
    }

    #[test]
    fn bad_values_are_refused() {
        let mut c = Config::release();
        c.width = 0;
        assert_eq!(c.validate(), Err(Error::EmptyGrid(0, 640)));

        let mut c = Config::release();
        c.iterations = 0;
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.iterations = u32::max_value() as usize + 1;
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.catalog.clear();
        assert_eq!(c.validate(), Err(Error::EmptyCatalog));

        let mut c = Config::release();
        c.render_modes = RenderTable(vec![]);
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.style.exponent = 0.0;
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.style.alpha = std::f64::NAN;
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.rescale_probability = 1.5;
        assert!(c.validate().is_err());

        let mut c = Config::release();
        c.coefficients = Coefficients::Fixed(AttractorParams::new(std::f64::INFINITY, 1.0, 1.0, 1.0));
        assert!(c.validate().is_err());
    }

    #[test]
    fn an_empty_gradient_in_json_is_refused() {
        let mut value = serde_json::to_value(Config::sketch()).unwrap();
        value["catalog"][0]["first"] = serde_json::json!([]);
        let text = value.to_string();
        assert!(Config::from_reader(text.as_bytes()).is_err());
    }
}
