//! Key mixing for the primitive tables.
//!
//! Sequential keys (`0..N`) are the common case, so the mix must spread them
//! across the table without clustering. We fold the high half of the key into
//! the low half and then use Fibonacci hashing: multiply by `2^64 / phi` and keep
//! the **top** bits of the product as the slot index. The top bits depend on
//! every input bit, unlike the low bits of a plain multiply.

/// `2^64 / golden ratio`, rounded to odd.
const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;

/// Mixes a 64-bit key. Bijective, so distinct keys never share a full hash.
#[inline(always)]
pub(crate) fn mix(key: i64) -> u64 {
    let k = key as u64;
    (k ^ (k >> 32)).wrapping_mul(GOLDEN)
}

/// Home slot of `key` in a table of `1 << (64 - shift)` slots.
#[inline(always)]
pub(crate) fn home_slot(key: i64, shift: u32) -> usize {
    (mix(key) >> shift) as usize
}

/// The shift that keeps `log2(capacity)` top bits.
#[inline]
pub(crate) fn shift_for(capacity: usize) -> u32 {
    debug_assert!(capacity.is_power_of_two() && capacity >= 2);
    64 - capacity.trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shift_for_power_of_two() {
        assert_eq!(shift_for(8), 61);
        assert_eq!(shift_for(1024), 54);
        assert_eq!(shift_for(1 << 20), 44);
    }

    #[test]
    fn test_home_slot_in_bounds() {
        let shift = shift_for(16);
        for key in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
            assert!(home_slot(key, shift) < 16);
        }
    }

    #[test]
    fn test_sequential_keys_spread() {
        // 1024 sequential keys into 2048 slots: nearly all should land alone.
        let shift = shift_for(2048);
        let homes: HashSet<usize> = (0..1024i64).map(|k| home_slot(k, shift)).collect();
        assert!(homes.len() > 1000, "only {} distinct homes", homes.len());
    }

    #[test]
    fn test_mix_distinct_for_distinct_keys() {
        let hashes: HashSet<u64> = (-500i64..500).map(mix).collect();
        assert_eq!(hashes.len(), 1000);
    }
}
