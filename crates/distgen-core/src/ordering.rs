//! Stable ordering and identifier assignment.
//!
//! Entries that need numeric identifiers (statistics within a handle, flag
//! bits within a context) are sorted by key in ordinary lexicographic byte
//! order, then numbered sequentially from zero. Regeneration is therefore
//! independent of declaration order.
//!
//! Hazard, preserved deliberately: inserting a key that sorts earlier shifts
//! every later identifier by one, and removal shifts them back. Consumers
//! that persist the numeric values (e.g. serialized statistics) will observe
//! the renumbering. This is a documented property of the scheme, not a bug
//! to be silently fixed.

use crate::error::SchemaError;

/// Width of the flag word generated bits must fit in.
pub const FLAG_WORD_BITS: usize = 32;

/// Sort keys lexicographically and assign sequential identifiers from zero.
pub fn numbered<'a, I>(keys: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = keys.into_iter().collect();
    sorted.sort_unstable();
    sorted.into_iter().enumerate().map(|(i, k)| (k, i)).collect()
}

/// Check that a flag context fits the underlying flag word. Exceeding it is
/// a fatal configuration error, caught at schema load.
pub fn ensure_flag_capacity(context: &str, count: usize) -> Result<(), SchemaError> {
    if count > FLAG_WORD_BITS {
        return Err(SchemaError::FlagBitOverflow {
            context: context.to_string(),
            count,
        });
    }
    Ok(())
}

/// Bit value for a flag at the given sorted ordinal. The ordinal must be
/// below [`FLAG_WORD_BITS`], guaranteed by load-time validation.
pub fn flag_bit(ordinal: usize) -> u32 {
    1u32 << ordinal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_ignores_declaration_order() {
        let a = numbered(["WRITE_IO", "READ_IO", "CACHE_HIT"]);
        let b = numbered(["CACHE_HIT", "WRITE_IO", "READ_IO"]);
        assert_eq!(a, b);
        assert_eq!(a, [("CACHE_HIT", 0), ("READ_IO", 1), ("WRITE_IO", 2)]);
    }

    #[test]
    fn inserting_earlier_key_shifts_later_ids_by_one() {
        let before = numbered(["M", "Z"]);
        let after = numbered(["M", "Z", "A"]);
        assert_eq!(before, [("M", 0), ("Z", 1)]);
        assert_eq!(after, [("A", 0), ("M", 1), ("Z", 2)]);
    }

    #[test]
    fn removal_shifts_following_ids_back() {
        let before = numbered(["A", "M", "Z"]);
        let after = numbered(["A", "Z"]);
        assert_eq!(before[2], ("Z", 2));
        assert_eq!(after[1], ("Z", 1));
    }

    #[test]
    fn flag_capacity_is_enforced_at_the_word_width() {
        assert!(ensure_flag_capacity("ctx", 32).is_ok());
        assert!(matches!(
            ensure_flag_capacity("ctx", 33),
            Err(SchemaError::FlagBitOverflow { count: 33, .. })
        ));
    }

    #[test]
    fn flag_bits_are_increasing_powers_of_two() {
        assert_eq!(flag_bit(0), 0x1);
        assert_eq!(flag_bit(1), 0x2);
        assert_eq!(flag_bit(31), 0x8000_0000);
    }
}
