//! Tunable constants for the dictionary engine.
//!
//! The original source hard-codes these as preprocessor constants
//! (`DICT_HT_SIZE_MINIMUM`, the `n * 10` empty-slot budget, the `100`-unit
//! bulk-rehash batch). This crate exposes them as a small `Copy` config value
//! instead, so a caller tuning the engine for a specific workload doesn't
//! need to fork the crate to change them.

/// Tuning parameters for a [`crate::Dict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictConfig {
    /// Smallest table capacity ever allocated. Must be a power of two; values
    /// that aren't are rounded up by [`DictConfig::floor_capacity`].
    pub floor_capacity: usize,
    /// Multiplier applied to a rehash unit's size to bound how many empty
    /// slots a single rehash step may skip before returning control to the
    /// caller.
    pub empty_slot_skip_multiplier: usize,
    /// Number of rehash units performed per wall-clock check in
    /// [`crate::Dict::rehash_for`].
    pub bulk_rehash_batch: usize,
}

impl DictConfig {
    /// Rounds `floor_capacity` up to a power of two, saturating at the
    /// largest power of two a `usize` can hold rather than panicking —
    /// matching the original's `limitedHTSize`, which clamps to `LONG_MAX`
    /// instead of overflowing.
    pub const fn floor_capacity(&self) -> usize {
        match self.floor_capacity.checked_next_power_of_two() {
            Some(p) => p,
            None => 1usize << (usize::BITS - 1),
        }
    }
}

impl Default for DictConfig {
    fn default() -> Self {
        DictConfig {
            floor_capacity: 4,
            empty_slot_skip_multiplier: 10,
            bulk_rehash_batch: 100,
        }
    }
}
