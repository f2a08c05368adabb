//! String digests used to derive probe origins and double-hashing strides.
//!
//! Both digests walk the key's bytes in order, so anagrams hash
//! differently. Neither depends on process state: the same key always
//! produces the same value, which is what lets a resize recompute every
//! record's position from scratch.

/// Seed fed to [`primary`] by the table.
pub const PRIMARY_SEED: u32 = 0x1234_5678;

const MIX_MULTIPLIER: u32 = 0x5bd1_e995;
const POLY_BASIS: u32 = 2_166_136_261;
const POLY_BASE: u32 = 31;

/// Rolling xor-multiply-shift digest, seeded.
#[inline]
pub fn primary(key: &str, seed: u32) -> u32 {
    key.bytes().fold(seed, |mut h, b| {
        h ^= u32::from(b);
        h = h.wrapping_mul(MIX_MULTIPLIER);
        h ^ (h >> 15)
    })
}

/// Base-31 polynomial digest.
#[inline]
pub fn polynomial(key: &str) -> u32 {
    key.bytes().fold(POLY_BASIS, |h, b| {
        h.wrapping_mul(POLY_BASE).wrapping_add(u32::from(b))
    })
}

/// Probe origin of `key` in a table of `capacity` slots.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[inline]
pub fn origin(key: &str, capacity: usize) -> usize {
    assert!(capacity > 0, "origin in an empty slot array");
    primary(key, PRIMARY_SEED) as usize % capacity
}

/// Double-hashing stride of `key` in a table of `capacity` slots.
///
/// The result lies in `[1, capacity - 1]` whenever `capacity > 1`, so a
/// probe sequence always moves. The capacity is folded into the reduction,
/// so the same key gets a different stride once the table grows. A table
/// with a single slot has only one position to visit; it gets stride 1.
#[inline]
pub fn stride(key: &str, capacity: usize) -> usize {
    if capacity <= 1 {
        return 1;
    }
    polynomial(key) as usize % (capacity - 1) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_key_returns_seed_and_basis() {
        assert_eq!(primary("", PRIMARY_SEED), PRIMARY_SEED);
        assert_eq!(primary("", 7), 7);
        assert_eq!(polynomial(""), POLY_BASIS);
    }

    #[test]
    fn known_values() {
        assert_eq!(primary("A", PRIMARY_SEED), 3_799_569_631);
        assert_eq!(primary("hello", PRIMARY_SEED), 1_369_696_600);
        assert_eq!(polynomial("A"), 2_725_714_716);
        assert_eq!(polynomial("hello"), 256_986_669);
        assert_eq!(stride("hello", 8), 3);
        assert_eq!(stride("A", 8), 5);
        assert_eq!(origin("A", 4), 3);
        assert_eq!(origin("hello", 4), 0);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(primary("ab", PRIMARY_SEED), primary("ba", PRIMARY_SEED));
        assert_ne!(polynomial("ab"), polynomial("ba"));
    }

    #[test]
    fn seed_changes_primary() {
        assert_ne!(primary("key", 1), primary("key", 2));
    }

    #[test]
    fn degenerate_capacities_get_unit_stride() {
        assert_eq!(stride("anything", 0), 1);
        assert_eq!(stride("anything", 1), 1);
        // Only one residue is available modulo 1.
        assert_eq!(stride("anything", 2), 1);
    }

    #[test]
    #[should_panic(expected = "empty slot array")]
    fn zero_capacity_origin_panics() {
        origin("A", 0);
    }

    #[test]
    fn stride_tracks_capacity() {
        // "A" has polynomial digest 2725714716.
        assert_eq!(stride("A", 7), 2_725_714_716 % 6 + 1);
        assert_eq!(stride("A", 13), 2_725_714_716 % 12 + 1);
    }

    proptest! {
        #[test]
        fn prop_stride_in_range(key in "[0-9A-Za-z]{1,12}", capacity in 2usize..100_000) {
            let s = stride(&key, capacity);
            prop_assert!(s >= 1);
            prop_assert!(s <= capacity - 1);
        }

        #[test]
        fn prop_origin_in_range(key in "\\PC{0,16}", capacity in 1usize..100_000) {
            prop_assert!(origin(&key, capacity) < capacity);
        }

        #[test]
        fn prop_deterministic(key in "\\PC{0,16}") {
            prop_assert_eq!(primary(&key, PRIMARY_SEED), primary(&key, PRIMARY_SEED));
            prop_assert_eq!(polynomial(&key), polynomial(&key));
        }
    }
}
