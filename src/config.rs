//! Sizing policy and the [`LongIntMapBuilder`].

use crate::error::MapError;
use crate::long_int_map::PrimitiveLongIntMap;

/// Entries a default-constructed map holds before its first resize.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Fraction of slots that may be occupied before the table doubles.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

/// Accepted range for [`LongIntMapBuilder::max_load_factor`].
pub const LOAD_FACTOR_RANGE: core::ops::RangeInclusive<f32> = 0.1..=0.95;

/// Smallest table ever allocated, in slots.
pub(crate) const MIN_SLOTS: usize = 8;

/// Configures a [`PrimitiveLongIntMap`] before it allocates.
///
/// ```rust
/// use primitive_collections::LongIntMapBuilder;
///
/// let mut map = LongIntMapBuilder::new()
///     .initial_capacity(1_000)
///     .max_load_factor(0.5)
///     .build()
///     .unwrap();
///
/// let slots = map.capacity();
/// for k in 0..1_000 {
///     map.put(k, 1);
/// }
/// assert_eq!(map.capacity(), slots); // no resize happened
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongIntMapBuilder {
    initial_capacity: usize,
    max_load_factor: f32,
}

impl Default for LongIntMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LongIntMapBuilder {
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Number of entries the map must hold without resizing. This is also the
    /// size the map returns to on [`clear`](PrimitiveLongIntMap::clear).
    pub fn initial_capacity(mut self, entries: usize) -> Self {
        self.initial_capacity = entries;
        self
    }

    /// Occupancy ratio that triggers a doubling. Validated by [`build`](Self::build).
    pub fn max_load_factor(mut self, load_factor: f32) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Allocates the map.
    ///
    /// # Errors
    /// * [`MapError::InvalidLoadFactor`] if the load factor is NaN or outside
    ///   [`LOAD_FACTOR_RANGE`].
    /// * [`MapError::CapacityOverflow`] / [`MapError::AllocFailed`] if the table
    ///   cannot be sized or allocated.
    pub fn build(self) -> Result<PrimitiveLongIntMap, MapError> {
        if !LOAD_FACTOR_RANGE.contains(&self.max_load_factor) {
            return Err(MapError::InvalidLoadFactor(self.max_load_factor));
        }
        PrimitiveLongIntMap::try_with_config(self.initial_capacity, self.max_load_factor)
    }
}

/// Largest number of occupied slots a table of `slots` tolerates.
///
/// Always strictly below `slots` so a probe is guaranteed to reach an empty slot.
#[inline]
pub(crate) fn grow_threshold(slots: usize, load_factor: f32) -> usize {
    ((slots as f64 * f64::from(load_factor)) as usize).min(slots - 1)
}

/// Smallest power-of-two slot count whose threshold admits `entries`.
///
/// Returns `None` when that table would not fit in `usize`.
pub(crate) fn slots_for(entries: usize, load_factor: f32) -> Option<usize> {
    let needed = (entries as f64 / f64::from(load_factor)).ceil();
    if needed >= (1usize << (usize::BITS - 2)) as f64 {
        return None;
    }
    let mut slots = (needed as usize).max(MIN_SLOTS).checked_next_power_of_two()?;
    // Float rounding can land one doubling short.
    while grow_threshold(slots, load_factor) < entries {
        slots = slots.checked_mul(2)?;
    }
    Some(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_for_defaults() {
        assert_eq!(slots_for(0, 0.75), Some(MIN_SLOTS));
        assert_eq!(slots_for(6, 0.75), Some(8));
        assert_eq!(slots_for(7, 0.75), Some(16));
        assert_eq!(slots_for(16, 0.75), Some(32));
        assert_eq!(slots_for(1_000, 0.5), Some(2048));
    }

    #[test]
    fn test_slots_for_overflow() {
        assert_eq!(slots_for(usize::MAX, 0.75), None);
        assert_eq!(slots_for(usize::MAX / 2, 0.1), None);
    }

    #[test]
    fn test_threshold_leaves_an_empty_slot() {
        for slots in [8usize, 16, 64, 1024] {
            assert!(grow_threshold(slots, 0.95) < slots);
        }
        assert_eq!(grow_threshold(8, 0.95), 7);
        assert_eq!(grow_threshold(16, 0.75), 12);
    }

    #[test]
    fn test_builder_rejects_bad_load_factor() {
        for lf in [0.0, 0.05, 0.96, 1.0, f32::NAN, f32::INFINITY] {
            let err = LongIntMapBuilder::new().max_load_factor(lf).build().unwrap_err();
            assert!(matches!(err, MapError::InvalidLoadFactor(_)));
        }
    }

    #[test]
    fn test_builder_applies_settings() {
        let map = LongIntMapBuilder::new()
            .initial_capacity(100)
            .max_load_factor(0.5)
            .build()
            .unwrap();
        assert_eq!(map.capacity(), 256);
        assert_eq!(map.max_load_factor(), 0.5);
        assert!(map.is_empty());
    }

    #[test]
    fn test_builder_reports_overflow() {
        let err = LongIntMapBuilder::new()
            .initial_capacity(usize::MAX)
            .build()
            .unwrap_err();
        assert!(matches!(err, MapError::CapacityOverflow { .. }));
    }
}
