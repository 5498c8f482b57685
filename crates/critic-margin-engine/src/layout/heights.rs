//! Measured card heights.

use std::collections::{HashMap, HashSet};

use log::trace;

/// Height changes up to this size are treated as measurement noise.
pub const HEIGHT_EPSILON: f64 = 0.5;

/// Last measured height of each card, keyed by thread root offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightCache {
    heights: HashMap<usize, f64>,
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a measurement. Returns `true` when it differs from the cached
    /// value by more than [`HEIGHT_EPSILON`], i.e. when a relayout is due.
    ///
    /// Negative or non-finite heights are ignored.
    pub fn record(&mut self, root: usize, height: f64) -> bool {
        if !height.is_finite() || height < 0.0 {
            trace!("ignoring height {height} for card at {root}");
            return false;
        }
        match self.heights.get(&root) {
            Some(old) if (old - height).abs() <= HEIGHT_EPSILON => false,
            _ => {
                self.heights.insert(root, height);
                true
            }
        }
    }

    pub fn get(&self, root: usize) -> Option<f64> {
        self.heights.get(&root).copied()
    }

    pub fn height_or(&self, root: usize, default: f64) -> f64 {
        self.get(root).unwrap_or(default)
    }

    /// Drops entries for roots not in `live`. Returns how many were removed.
    pub fn retain_roots(&mut self, live: &[usize]) -> usize {
        let before = self.heights.len();
        let live: HashSet<usize> = live.iter().copied().collect();
        self.heights.retain(|root, _| live.contains(root));
        before - self.heights.len()
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn clear(&mut self) {
        self.heights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn first_measurement_is_a_change() {
        let mut cache = HeightCache::new();
        assert!(cache.record(3, 40.0));
        assert_eq!(cache.get(3), Some(40.0));
    }

    #[rstest]
    #[case(40.2, false)]
    #[case(39.5, false)]
    #[case(40.6, true)]
    #[case(12.0, true)]
    fn hysteresis(#[case] next: f64, #[case] changed: bool) {
        let mut cache = HeightCache::new();
        cache.record(0, 40.0);
        assert_eq!(cache.record(0, next), changed);
    }

    #[test]
    fn small_drift_keeps_original_value() {
        let mut cache = HeightCache::new();
        cache.record(0, 40.0);
        cache.record(0, 40.3);
        cache.record(0, 40.45);
        assert_eq!(cache.get(0), Some(40.0));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-1.0)]
    fn bad_heights_are_ignored(#[case] h: f64) {
        let mut cache = HeightCache::new();
        assert!(!cache.record(0, h));
        assert!(cache.is_empty());
    }

    #[test]
    fn height_or_falls_back() {
        let cache = HeightCache::new();
        assert_eq!(cache.height_or(9, 80.0), 80.0);
    }

    #[test]
    fn retain_roots_prunes_stale_entries() {
        let mut cache = HeightCache::new();
        cache.record(1, 10.0);
        cache.record(2, 20.0);
        cache.record(3, 30.0);
        assert_eq!(cache.retain_roots(&[1, 3]), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn retain_roots_with_many_live_roots() {
        let mut cache = HeightCache::new();
        for root in 0..2_000 {
            cache.record(root, 10.0);
        }
        let live: Vec<usize> = (0..2_000).filter(|r| r % 2 == 0).collect();
        assert_eq!(cache.retain_roots(&live), 1_000);
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(1_998), Some(10.0));
        assert_eq!(cache.retain_roots(&[]), 1_000);
        assert!(cache.is_empty());
    }
}
