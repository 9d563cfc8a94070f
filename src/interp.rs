// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scalar helpers shared by the sampler and the renderer.

/// Clamp x into [lo, hi].
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    num::clamp(x, lo, hi)
}

/// Take x in [lo, hi] and map it to [0, 1].  A degenerate interval
/// has no meaningful answer, so it maps everything to 0.
#[inline]
pub fn normalise(x: f64, lo: f64, hi: f64) -> f64 {
    if lo == hi {
        return 0.0;
    }
    (x - lo) / (hi - lo)
}

/// `normalise`, clamped to [0, 1].
#[inline]
pub fn nclamp(x: f64, lo: f64, hi: f64) -> f64 {
    clamp(normalise(x, lo, hi), 0.0, 1.0)
}

/// Map a [0, 1) draw onto [lo, hi).  The bounds need not be ordered.
#[inline]
pub fn uniform(t: f64, lo: f64, hi: f64) -> f64 {
    lo + t * (hi - lo)
}

/// Pick an item with a [0, 1) draw.  A draw of exactly 1 picks the
/// last item rather than running off the end.
pub fn sample<T>(t: f64, items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let index = (clamp(t, 0.0, 1.0) * items.len() as f64).floor() as usize;
    items.get(index.min(items.len() - 1))
}

/// Linear interpolation from a to b.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_holds_values_inside_the_interval() {
        assert_eq!(clamp(-3.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(7.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(clamp(7.0, 0.0, 1.0), 0.0, 1.0), 1.0);
    }

    #[test]
    fn nclamp_stays_in_the_unit_interval() {
        for x in &[-1.0e9, -2.0, 0.0, 0.5, 3.0, 4.0, 1.0e9] {
            let v = nclamp(*x, 0.5, 3.0);
            assert!(v >= 0.0 && v <= 1.0, "{} mapped to {}", x, v);
        }
        assert_eq!(nclamp(0.5, 0.5, 3.0), 0.0);
        assert_eq!(nclamp(3.0, 0.5, 3.0), 1.0);
    }

    #[test]
    fn degenerate_interval_normalises_to_zero() {
        assert_eq!(normalise(2.0, 2.0, 2.0), 0.0);
        assert_eq!(nclamp(5.0, 2.0, 2.0), 0.0);
        assert!(!nclamp(0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn uniform_spans_reversed_bounds() {
        assert_eq!(uniform(0.0, -0.9, -1.6), -0.9);
        assert!((uniform(0.5, -0.9, -1.6) + 1.25).abs() < 1e-12);
        assert_eq!(uniform(0.5, 1.0, 2.0), 1.5);
    }

    #[test]
    fn sample_guards_the_top_of_the_range() {
        let signs = [-1.0, 1.0];
        assert_eq!(sample(0.0, &signs), Some(&-1.0));
        assert_eq!(sample(0.49, &signs), Some(&-1.0));
        assert_eq!(sample(0.5, &signs), Some(&1.0));
        assert_eq!(sample(1.0, &signs), Some(&1.0));
        assert_eq!(sample(42.0, &signs), Some(&1.0));
        assert_eq!(sample(-1.0, &signs), Some(&-1.0));
        assert_eq!(sample::<f64>(0.3, &[]), None);
    }

    #[test]
    fn lerp_hits_both_ends() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    }
}
