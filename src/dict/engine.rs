//! The dictionary engine: owns both bucket tables, drives incremental
//! rehash, and implements the associative-container operations.

use rehashmap_error::DictResult;

use crate::dict::{
    config::DictConfig,
    cursor::Cursor,
    entry::{Entry, OccupiedEntry, VacantEntry},
    policy::{DefaultPolicy, Policy},
    stats::{DictStats, TableStats},
    table::{unlink_by_key, BucketTable},
};

/// The next source slot in `T0` to relocate, or [`RehashCursor::Idle`] if no
/// rehash is in progress. Direct replacement for the source's signed
/// `−1`-sentinel counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RehashCursor {
    Idle,
    Running(usize),
}

impl RehashCursor {
    #[inline]
    fn is_running(self) -> bool {
        matches!(self, RehashCursor::Running(_))
    }
}

/// Result of [`Dict::add`].
pub enum AddOutcome<V> {
    Inserted,
    /// The key was already present; the table was not mutated and `V` is
    /// handed back to the caller.
    AlreadyPresent(V),
}

/// Result of [`Dict::add_or_get_existing`].
pub enum AddOrGetExisting<'a, V> {
    Inserted,
    Existing(&'a mut V),
}

/// Result of [`Dict::update_or_add`].
pub enum UpsertOutcome<'a, V> {
    Inserted(&'a mut V),
    /// `old` is handed to the caller by value and is not passed through
    /// [`Policy::free_val`] — the caller now owns its teardown.
    Updated { old: V, new: &'a mut V },
}

/// Result of [`Dict::entry_delete`].
pub enum DeleteOutcome<K, V> {
    NotFound,
    /// The entry was found and released through the policy's hooks.
    Deleted,
    /// The entry was found and handed back instead of released, because the
    /// caller asked to retain it.
    Retained(K, V),
}

impl<K, V> DeleteOutcome<K, V> {
    pub fn was_found(&self) -> bool {
        !matches!(self, DeleteOutcome::NotFound)
    }
}

/// An in-memory associative container with incremental (progressive)
/// rehashing: growing the table never performs a large, latency-spiking bulk
/// relocation.
///
/// `P` supplies hashing, equality, and (optionally) release hooks for `K`/`V`
/// — see [`Policy`]. The struct itself carries no bound on `P`; individual
/// methods require `P: Policy<K, V>` where they actually need it, matching
/// how the underlying storage is itself policy-agnostic.
pub struct Dict<K, V, P> {
    pub(crate) ht: [BucketTable<K, V>; 2],
    rehash_cursor: RehashCursor,
    pub(crate) active_iterators: usize,
    pub(crate) policy: P,
    config: DictConfig,
}

impl<K, V, P> Dict<K, V, P> {
    /// Creates an empty dictionary with the default tuning parameters.
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, DictConfig::default())
    }

    pub fn with_config(
        policy: P,
        config: DictConfig,
    ) -> Self {
        Dict {
            ht: [BucketTable::empty(), BucketTable::empty()],
            rehash_cursor: RehashCursor::Idle,
            active_iterators: 0,
            policy,
            config,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ht[0].filled + self.ht[1].filled
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of both tables' capacities.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ht[0].size() + self.ht[1].size()
    }

    #[inline]
    pub fn is_rehashing(&self) -> bool {
        self.rehash_cursor.is_running()
    }
}

impl<K, V, P> Dict<K, V, P>
where
    P: Policy<K, V>,
{
    /// Returns an entry-deletion-tolerant cursor over every live entry.
    /// Suspends rehash progress for as long as the cursor is alive.
    pub fn iter(&mut self) -> Cursor<'_, K, V, P> {
        Cursor::new(self)
    }

    /// Looks up `key` and returns a handle for inspecting or inserting it in
    /// place, hashing the key only once regardless of which branch the
    /// caller takes.
    pub fn entry(&mut self, key: K) -> DictResult<Entry<'_, K, V>> {
        self.expand_if_needed()?;
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(&key);

        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            // SAFETY: `filled_ptr` targets a sibling field of the same
            // `BucketTable` that `cur` below borrows into (`buckets`, not
            // `filled`); nothing else observes either field until the
            // `Entry` we return is dropped.
            let filled_ptr: *mut usize = &mut self.ht[table_idx].filled;
            let mut cur = &mut self.ht[table_idx].buckets[slot];
            loop {
                match cur {
                    Some(node) if self.policy.eq(&node.key, &key) => {
                        let filled = unsafe { &mut *filled_ptr };
                        return Ok(Entry::Occupied(OccupiedEntry { slot: cur, filled }));
                    }
                    Some(node) => {
                        cur = &mut node.next;
                    }
                    None => break,
                }
            }
            if !self.is_rehashing() {
                break;
            }
        }

        let table_idx = if self.is_rehashing() { 1 } else { 0 };
        let slot = (h as usize) & self.ht[table_idx].mask;
        let filled_ptr: *mut usize = &mut self.ht[table_idx].filled;
        let slot_ref = &mut self.ht[table_idx].buckets[slot];
        // SAFETY: see above.
        let filled = unsafe { &mut *filled_ptr };
        Ok(Entry::Vacant(VacantEntry {
            key,
            slot: slot_ref,
            filled,
        }))
    }

    fn expand_if_needed(&mut self) -> DictResult<()> {
        if self.is_rehashing() {
            return Ok(());
        }

        let size = self.ht[0].size();
        if size == 0 {
            self.ht[0] = BucketTable::try_with_capacity(self.config.floor_capacity())?;
        } else if self.ht[0].filled >= size {
            // Saturate rather than panic as `filled` approaches `usize::MAX`,
            // matching the original's `limitedHTSize` clamp to `LONG_MAX`.
            let new_size = self.ht[0]
                .filled
                .saturating_mul(2)
                .max(1)
                .checked_next_power_of_two()
                .unwrap_or(1usize << (usize::BITS - 1))
                .max(self.config.floor_capacity());
            self.ht[1] = BucketTable::try_with_capacity(new_size)?;
            self.rehash_cursor = RehashCursor::Running(0);
            tracing::debug!(new_size, "dict: starting incremental rehash");
        }

        Ok(())
    }

    /// Relocates up to `n` source slots from `T0` into `T1`, honoring the
    /// empty-slot skip budget. Returns `true` if rehash is still in progress
    /// afterward.
    fn rehash_units(
        &mut self,
        n: usize,
    ) -> bool {
        if !self.is_rehashing() {
            return false;
        }

        let mut empty_visit_budget = (n * self.config.empty_slot_skip_multiplier) as isize;
        let mut remaining = n;

        while remaining > 0 && self.ht[0].filled != 0 {
            let idx = match self.rehash_cursor {
                RehashCursor::Running(idx) => idx,
                RehashCursor::Idle => unreachable!("checked is_rehashing above"),
            };
            debug_assert!(idx < self.ht[0].size());

            if self.ht[0].buckets[idx].is_none() {
                self.rehash_cursor = RehashCursor::Running(idx + 1);
                empty_visit_budget -= 1;
                if empty_visit_budget == 0 {
                    return true;
                }
                continue;
            }

            let mut cur = self.ht[0].buckets[idx].take();
            let mut moved = 0u64;
            while let Some(mut node) = cur {
                cur = node.next.take();

                let h = self.policy.hash(&node.key);
                let slot = (h as usize) & self.ht[1].mask;
                node.next = self.ht[1].buckets[slot].take();
                self.ht[1].buckets[slot] = Some(node);

                self.ht[0].filled -= 1;
                self.ht[1].filled += 1;
                moved += 1;
            }
            tracing::trace!(cursor = idx, moved, "dict: rehash step");

            self.rehash_cursor = RehashCursor::Running(idx + 1);
            remaining -= 1;
        }

        if self.ht[0].filled == 0 {
            self.ht[0] = std::mem::replace(&mut self.ht[1], BucketTable::empty());
            self.rehash_cursor = RehashCursor::Idle;
            tracing::debug!("dict: rehash complete, table promoted");
            return false;
        }

        true
    }

    /// Performs one unit of rehash work, unless an iterator is currently
    /// live.
    fn rehash_step(&mut self) {
        if self.active_iterators != 0 {
            return;
        }
        self.rehash_units(1);
    }

    /// Time-budgeted bulk rehash for out-of-band catch-up work. Returns the
    /// number of units actually performed.
    pub fn rehash_for(
        &mut self,
        budget_ms: u64,
    ) -> u64 {
        if self.active_iterators != 0 || !self.is_rehashing() {
            return 0;
        }

        let start = std::time::Instant::now();
        let batch = self.config.bulk_rehash_batch;
        let mut total = 0u64;

        loop {
            let still_rehashing = self.rehash_units(batch);
            total += batch as u64;
            if !still_rehashing || start.elapsed().as_millis() as u64 >= budget_ms {
                break;
            }
        }

        total
    }

    /// Looks up `key`, performing one rehash step first (unless an iterator
    /// is active).
    pub fn find(
        &mut self,
        key: &K,
    ) -> Option<&V> {
        if self.len() == 0 {
            return None;
        }
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            let mut cur = &self.ht[table_idx].buckets[slot];
            while let Some(node) = cur {
                if self.policy.eq(&node.key, key) {
                    return Some(&node.val);
                }
                cur = &node.next;
            }
            if !self.is_rehashing() {
                break;
            }
        }
        None
    }

    /// As [`Dict::find`], but yields a mutable reference to the value.
    pub fn find_mut(
        &mut self,
        key: &K,
    ) -> Option<&mut V> {
        if self.len() == 0 {
            return None;
        }
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            let mut cur = &mut self.ht[table_idx].buckets[slot];
            while let Some(ref mut node) = cur {
                if self.policy.eq(&node.key, key) {
                    // SAFETY: we return immediately, extending the lifetime
                    // past the loop's own intermediate `&mut` reborrows.
                    // Borrow-splitting the chain walk itself can't express
                    // "return the match and stop," so we finish the lookup
                    // through a raw pointer instead. Invariant: no further
                    // structural mutation of this chain happens before the
                    // caller observes the returned reference.
                    let val_ptr: *mut V = &mut node.val;
                    return Some(unsafe { &mut *val_ptr });
                }
                cur = &mut node.next;
            }
            if !self.is_rehashing() {
                break;
            }
        }
        None
    }

    /// Inserts `key → val` if `key` is absent. Does not overwrite an
    /// existing value.
    pub fn add(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<AddOutcome<V>> {
        self.expand_if_needed()?;
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(&key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            let mut cur = &self.ht[table_idx].buckets[slot];
            while let Some(node) = cur {
                if self.policy.eq(&node.key, &key) {
                    return Ok(AddOutcome::AlreadyPresent(val));
                }
                cur = &node.next;
            }
            if !self.is_rehashing() {
                break;
            }
        }

        let table_idx = if self.is_rehashing() { 1 } else { 0 };
        let slot = (h as usize) & self.ht[table_idx].mask;
        self.ht[table_idx].push_front(slot, key, val);
        Ok(AddOutcome::Inserted)
    }

    /// Inserts `key → val` if absent; otherwise reports the existing value
    /// without touching it (`val` is dropped). This rule — new inserts go to
    /// the growing table while rehashing — keeps `T0` from growing during a
    /// rehash.
    pub fn add_or_get_existing(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<AddOrGetExisting<'_, V>> {
        self.expand_if_needed()?;
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(&key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            let mut cur = &mut self.ht[table_idx].buckets[slot];
            while let Some(ref mut node) = cur {
                if self.policy.eq(&node.key, &key) {
                    let val_ptr: *mut V = &mut node.val;
                    // SAFETY: see Dict::find_mut.
                    return Ok(AddOrGetExisting::Existing(unsafe { &mut *val_ptr }));
                }
                cur = &mut node.next;
            }
            if !self.is_rehashing() {
                break;
            }
        }

        let table_idx = if self.is_rehashing() { 1 } else { 0 };
        let slot = (h as usize) & self.ht[table_idx].mask;
        self.ht[table_idx].push_front(slot, key, val);
        Ok(AddOrGetExisting::Inserted)
    }

    /// Inserts `key → val` if absent, otherwise overwrites the existing
    /// value. The prior value is handed back to the caller as
    /// `UpsertOutcome::Updated { old, .. }` instead of being released
    /// through [`Policy::free_val`] — ownership of `old` passes to the
    /// caller, so the hook must not also run on it, or whichever side
    /// runs second frees an already-freed value.
    pub fn update_or_add(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<UpsertOutcome<'_, V>> {
        self.expand_if_needed()?;
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(&key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            let mut cur = &mut self.ht[table_idx].buckets[slot];
            while let Some(ref mut node) = cur {
                if self.policy.eq(&node.key, &key) {
                    let old = std::mem::replace(&mut node.val, val);
                    let val_ptr: *mut V = &mut node.val;
                    // SAFETY: see Dict::find_mut.
                    return Ok(UpsertOutcome::Updated {
                        old,
                        new: unsafe { &mut *val_ptr },
                    });
                }
                cur = &mut node.next;
            }
            if !self.is_rehashing() {
                break;
            }
        }

        let table_idx = if self.is_rehashing() { 1 } else { 0 };
        let slot = (h as usize) & self.ht[table_idx].mask;
        self.ht[table_idx].push_front(slot, key, val);
        let new = self.ht[table_idx].buckets[slot]
            .as_mut()
            .map(|node| &mut node.val)
            .expect("just inserted");
        Ok(UpsertOutcome::Inserted(new))
    }

    /// Removes `key`. If `retain` is `false` (the common case), the released
    /// key/value pair is handed through [`Policy::free_key`]/
    /// [`Policy::free_val`] and [`DeleteOutcome::Deleted`] is returned. If
    /// `retain` is `true`, the pair is handed back to the caller instead of
    /// being released — dropping it is the equivalent of the source's
    /// `dictEntryFree`, since the node was already unlinked.
    pub fn entry_delete(
        &mut self,
        key: &K,
        retain: bool,
    ) -> DeleteOutcome<K, V> {
        if self.len() == 0 {
            return DeleteOutcome::NotFound;
        }
        if self.active_iterators == 0 {
            self.rehash_step();
        }

        let h = self.policy.hash(key);
        for table_idx in 0..=1 {
            if self.ht[table_idx].is_empty_table() {
                continue;
            }
            let slot = (h as usize) & self.ht[table_idx].mask;
            if let Some(removed) =
                unlink_by_key(&mut self.ht[table_idx].buckets[slot], key, &self.policy)
            {
                self.ht[table_idx].filled -= 1;
                if retain {
                    return DeleteOutcome::Retained(removed.key, removed.val);
                }
                self.policy.free_key(&removed.key);
                self.policy.free_val(&removed.val);
                return DeleteOutcome::Deleted;
            }
            if !self.is_rehashing() {
                break;
            }
        }
        DeleteOutcome::NotFound
    }

    /// Removes `key`, releasing it through the policy's hooks. Returns
    /// whether a matching entry existed.
    pub fn remove(
        &mut self,
        key: &K,
    ) -> bool {
        self.entry_delete(key, false).was_found()
    }

    /// Releases a previously retained entry. The node was already unlinked
    /// by [`Dict::entry_delete`]; dropping `entry` is the entire operation.
    pub fn entry_free(_entry: (K, V)) {}

    pub fn stats(&self) -> DictStats {
        DictStats {
            t0: TableStats::collect(&self.ht[0]),
            t1: if self.is_rehashing() {
                TableStats::collect(&self.ht[1])
            } else {
                None
            },
        }
    }
}

impl<K: std::hash::Hash + Eq, V> Default for Dict<K, V, DefaultPolicy<K, V>> {
    fn default() -> Self {
        Self::new(DefaultPolicy::default())
    }
}

impl<K, V, P> Drop for Dict<K, V, P>
where
    P: Policy<K, V>,
{
    fn drop(&mut self) {
        self.ht[0].clear_and_release(&self.policy);
        self.ht[1].clear_and_release(&self.policy);
    }
}
