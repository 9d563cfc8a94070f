// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Post-processing of an accumulated grid.
//!
//! Finalising optionally turns each cell's summed squared step length
//! into an average per visit, then finds the range of the statistic
//! over the cells the orbit actually visited.  Unvisited cells have no
//! statistic at all; they keep their zero and are never allowed to
//! widen the range.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attractor::Grid;
use crate::interp::{clamp, nclamp};

/// The smallest and largest statistic over visited cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeltaRange {
    /// min_delta
    pub min: f64,
    /// max_delta
    pub max: f64,
}

/// How a cell's statistic is brought into [0, 1] before it picks the
/// blend between the two gradients.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticScale {
    /// Between the smallest and largest visited statistic.
    Range,
    /// As a fraction of the largest statistic.
    Peak,
}

/// A finalised grid.  Read only.
#[derive(Clone, Debug)]
pub struct Field {
    grid: Grid,
    range: DeltaRange,
    rescaled: bool,
}

impl Grid {
    /// End the accumulating phase.
    pub fn finalise(mut self, rescale: bool) -> Field {
        let mut range: Option<DeltaRange> = None;
        for (count, delta) in self.counts.iter().zip(self.deltas.iter_mut()) {
            if *count == 0 {
                continue;
            }
            if rescale {
                *delta /= f64::from(*count);
            }
            let d = *delta;
            range = Some(match range {
                None => DeltaRange { min: d, max: d },
                Some(r) => DeltaRange {
                    min: r.min.min(d),
                    max: r.max.max(d),
                },
            });
        }
        // A grid nobody visited has a degenerate range at zero.
        let range = range.unwrap_or(DeltaRange { min: 0.0, max: 0.0 });
        debug!(min = range.min, max = range.max, rescale, "delta range");
        Field {
            grid: self,
            range,
            rescaled: rescale,
        }
    }
}

impl Field {
    /// Cells across.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Cells down.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The iteration budget the grid was filled with.
    pub fn iterations(&self) -> usize {
        self.grid.iterations()
    }

    /// Visits to cell (x, y).
    pub fn count(&self, x: usize, y: usize) -> u32 {
        self.grid.count(x, y)
    }

    /// Statistic of cell (x, y), after any rescaling.
    pub fn delta(&self, x: usize, y: usize) -> f64 {
        self.grid.delta(x, y)
    }

    /// Range of the statistic over visited cells.
    pub fn range(&self) -> DeltaRange {
        self.range
    }

    /// Whether the statistic was averaged per visit.
    pub fn rescaled(&self) -> bool {
        self.rescaled
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The statistic of cell (x, y) brought into [0, 1].  Unvisited
    /// cells sit at the bottom of the range, and a degenerate range
    /// puts every cell there.
    pub fn scaled_delta(&self, x: usize, y: usize, scale: StatisticScale) -> f64 {
        if self.count(x, y) == 0 {
            return 0.0;
        }
        let d = self.delta(x, y);
        match scale {
            StatisticScale::Range => nclamp(d, self.range.min, self.range.max),
            StatisticScale::Peak => {
                if self.range.max > 0.0 {
                    clamp(d / self.range.max, 0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractor::testing::Still;
    use crate::attractor::SineMap;
    use crate::params::AttractorParams;

    fn simulated() -> Grid {
        let map = SineMap::new(&AttractorParams::new(2.02, 2.04, 1.60, -1.20));
        Grid::simulate(&map, 64, 64, 10_000).unwrap()
    }

    fn visited(field: &Field) -> Vec<(usize, usize)> {
        let mut cells = vec![];
        for y in 0..field.height() {
            for x in 0..field.width() {
                if field.count(x, y) > 0 {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn visited_cells_lie_within_the_range() {
        for &rescale in &[false, true] {
            let field = simulated().finalise(rescale);
            let r = field.range();
            assert!(r.min <= r.max);
            for (x, y) in visited(&field) {
                let d = field.delta(x, y);
                assert!(r.min <= d && d <= r.max);
            }
        }
    }

    #[test]
    fn rescaling_averages_per_visit() {
        let grid = simulated();
        let totals = grid.clone().finalise(false);
        let averages = grid.finalise(true);
        assert!(averages.rescaled() && !totals.rescaled());
        for (x, y) in visited(&totals) {
            let expected = totals.delta(x, y) / f64::from(totals.count(x, y));
            assert_eq!(averages.delta(x, y), expected);
        }
    }

    #[test]
    fn unvisited_cells_do_not_widen_the_range() {
        let field = simulated().finalise(false);
        assert!(field.range().min > 0.0);
        let empty = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .find(|&(x, y)| field.count(x, y) == 0)
            .unwrap();
        assert_eq!(field.delta(empty.0, empty.1), 0.0);
        assert_eq!(field.scaled_delta(empty.0, empty.1, StatisticScale::Range), 0.0);
        assert_eq!(field.scaled_delta(empty.0, empty.1, StatisticScale::Peak), 0.0);
    }

    #[test]
    fn a_single_cell_gives_a_degenerate_range() {
        let field = Grid::simulate(&Still, 64, 64, 500).unwrap().finalise(true);
        assert_eq!(field.range(), DeltaRange { min: 0.0, max: 0.0 });
        let d = field.scaled_delta(35, 38, StatisticScale::Range);
        assert_eq!(d, 0.0);
        assert_eq!(field.scaled_delta(35, 38, StatisticScale::Peak), 0.0);
    }

    #[test]
    fn scaled_delta_spans_the_unit_interval() {
        let field = simulated().finalise(true);
        let scaled: Vec<f64> = visited(&field)
            .into_iter()
            .map(|(x, y)| field.scaled_delta(x, y, StatisticScale::Range))
            .collect();
        assert!(scaled.iter().all(|&d| d >= 0.0 && d <= 1.0));
        assert!(scaled.iter().any(|&d| d == 0.0));
        assert!(scaled.iter().any(|&d| d == 1.0));
    }

    #[test]
    fn an_empty_grid_has_a_zero_range() {
        let field = Grid::new(8, 8).unwrap().finalise(false);
        assert_eq!(field.range(), DeltaRange { min: 0.0, max: 0.0 });
    }
}
