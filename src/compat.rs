//! Zero-on-absent call surface for measurement code.
//!
//! Benchmarks drive every candidate map through the same six calls and treat a
//! missing key as `0`. That convention is ambiguous (a stored `0` looks the same
//! as no entry), so it lives here rather than on the maps themselves.

use core::ops::ControlFlow;

use crate::long_int_map::PrimitiveLongIntMap;
use crate::small_map::SmallLongIntMap;
use crate::visitor::{LongIntVisitor, LongVisitor};

/// The narrow interface a benchmark uses to drive an int-keyed, int-valued map.
pub trait ZeroDefaultIntMap {
    /// Replaces the contents with a fresh, empty map.
    fn clear_map(&mut self);

    /// Value for `key`, or `0` when absent.
    fn get_int(&self, key: i64) -> i32;

    fn put_int(&mut self, key: i64, value: i32);

    /// Removed value, or `0` when absent.
    fn remove_int(&mut self, key: i64) -> i32;

    /// Wrapping sum of all values.
    fn sum_values(&self) -> i32;

    /// Sum of all keys, accumulated in `i64` (wrapping) and truncated to `i32`.
    fn sum_keys(&self) -> i32;
}

/// Running key sum, reusable across traversals.
#[derive(Debug, Default)]
pub struct SumKeys {
    pub sum: i64,
}

impl LongVisitor for SumKeys {
    type Break = ();

    #[inline]
    fn visited(&mut self, key: i64) -> ControlFlow<()> {
        self.sum = self.sum.wrapping_add(key);
        ControlFlow::Continue(())
    }
}

/// Running value sum, reusable across traversals.
#[derive(Debug, Default)]
pub struct SumValues {
    pub sum: i32,
}

impl LongIntVisitor for SumValues {
    type Break = ();

    #[inline]
    fn visited(&mut self, _key: i64, value: i32) -> ControlFlow<()> {
        self.sum = self.sum.wrapping_add(value);
        ControlFlow::Continue(())
    }
}

impl ZeroDefaultIntMap for PrimitiveLongIntMap {
    fn clear_map(&mut self) {
        self.clear();
    }

    #[inline]
    fn get_int(&self, key: i64) -> i32 {
        self.get(key).unwrap_or(0)
    }

    #[inline]
    fn put_int(&mut self, key: i64, value: i32) {
        self.put(key, value);
    }

    #[inline]
    fn remove_int(&mut self, key: i64) -> i32 {
        self.remove(key).unwrap_or(0)
    }

    fn sum_values(&self) -> i32 {
        let mut sum = SumValues::default();
        let _ = self.visit_entries(&mut sum);
        sum.sum
    }

    fn sum_keys(&self) -> i32 {
        let mut sum = SumKeys::default();
        let _ = self.visit_keys(&mut sum);
        sum.sum as i32
    }
}

impl<const N: usize> ZeroDefaultIntMap for SmallLongIntMap<N> {
    fn clear_map(&mut self) {
        self.clear();
    }

    fn get_int(&self, key: i64) -> i32 {
        self.get(key).unwrap_or(0)
    }

    fn put_int(&mut self, key: i64, value: i32) {
        self.put(key, value);
    }

    fn remove_int(&mut self, key: i64) -> i32 {
        self.remove(key).unwrap_or(0)
    }

    fn sum_values(&self) -> i32 {
        let mut sum = SumValues::default();
        let _ = self.visit_entries(&mut sum);
        sum.sum
    }

    fn sum_keys(&self) -> i32 {
        let mut sum = SumKeys::default();
        let _ = self.visit_keys(&mut sum);
        sum.sum as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Fills `0..size` with random values, then removes each key with probability 1/2.
    fn prepare<M: ZeroDefaultIntMap>(map: &mut M, size: i64, rng: &mut StdRng) {
        map.clear_map();
        for k in 0..size {
            map.put_int(k, rng.r#gen());
        }
        for k in 0..size {
            if rng.gen_bool(0.5) {
                map.remove_int(k);
            }
        }
    }

    fn exercise<M: ZeroDefaultIntMap>(map: &mut M) {
        map.clear_map();
        for k in 0..1_000 {
            map.put_int(k, (k * 2) as i32);
        }
        for k in (0..1_000).step_by(2) {
            assert_eq!(map.remove_int(k), (k * 2) as i32);
        }
        assert_eq!(map.get_int(1), 2);
        assert_eq!(map.get_int(0), 0);
        assert_eq!(map.remove_int(0), 0);
        assert_eq!(map.sum_values(), 500_000);
        assert_eq!(map.sum_keys(), 250_000);

        map.clear_map();
        assert_eq!(map.sum_values(), 0);
        assert_eq!(map.sum_keys(), 0);
    }

    #[test]
    fn test_primitive_map_surface() {
        exercise(&mut PrimitiveLongIntMap::new());
    }

    #[test]
    fn test_small_map_surface() {
        exercise(&mut SmallLongIntMap::<8>::new());
    }

    #[test]
    fn test_sums_wrap() {
        let mut map = PrimitiveLongIntMap::new();
        map.put_int(1, i32::MAX);
        map.put_int(2, 1);
        assert_eq!(map.sum_values(), i32::MIN);

        map.clear_map();
        map.put_int(1 << 32, 0);
        map.put_int(5, 0);
        assert_eq!(map.sum_keys(), 5);
    }

    #[test]
    fn test_both_maps_agree_after_prepare() {
        let mut primitive = PrimitiveLongIntMap::new();
        let mut small = SmallLongIntMap::<16>::new();
        for size in [10, 100, 1_000] {
            prepare(&mut primitive, size, &mut StdRng::seed_from_u64(7));
            prepare(&mut small, size, &mut StdRng::seed_from_u64(7));

            assert_eq!(primitive.sum_values(), small.sum_values());
            assert_eq!(primitive.sum_keys(), small.sum_keys());
            for k in 0..size {
                assert_eq!(primitive.get_int(k), small.get_int(k));
            }
        }
    }
}
