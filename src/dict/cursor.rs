//! Entry-deletion-tolerant traversal over a dictionary's live entries.

use crate::dict::{
    engine::Dict,
    policy::Policy,
    table::{unlink_by_identity, Entry},
};

enum CursorLifecycle {
    Fresh,
    Active,
    Exhausted,
}

/// A lending iterator over a [`Dict`]'s entries.
///
/// Holding a `Cursor` borrows the dictionary exclusively, which both
/// suspends incremental rehash for as long as the cursor is alive and
/// statically rules out any other mutation racing the traversal — a
/// strictly stronger guarantee than the source's `iters` refcount, which
/// only ever paused rehashing, not mutation.
///
/// `Cursor` is not `std::iter::Iterator`: [`Cursor::next`] borrows from
/// `self` rather than producing an owned item, which is what lets
/// [`Cursor::delete_current`] exist as a safe method at all.
pub struct Cursor<'a, K, V, P> {
    dict: &'a mut Dict<K, V, P>,
    lifecycle: CursorLifecycle,
    table_idx: usize,
    bucket_idx: isize,
    current_slot: usize,
    current: *mut Entry<K, V>,
    next_entry: *mut Entry<K, V>,
}

/// One entry yielded by [`Cursor::next`].
pub struct CursorEntry<'c, K, V> {
    key: &'c K,
    val: &'c mut V,
}

impl<'c, K, V> CursorEntry<'c, K, V> {
    pub fn key(&self) -> &K {
        self.key
    }

    pub fn value(&self) -> &V {
        self.val
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.val
    }
}

impl<'a, K, V, P> Cursor<'a, K, V, P>
where
    P: Policy<K, V>,
{
    pub(crate) fn new(dict: &'a mut Dict<K, V, P>) -> Self {
        Cursor {
            dict,
            lifecycle: CursorLifecycle::Fresh,
            table_idx: 0,
            bucket_idx: -1,
            current_slot: 0,
            current: std::ptr::null_mut(),
            next_entry: std::ptr::null_mut(),
        }
    }

    /// Restarts traversal from the beginning. A safe re-entry point; the
    /// cursor otherwise has no way to revisit entries already passed.
    pub fn rewind(&mut self) {
        if !matches!(self.lifecycle, CursorLifecycle::Fresh) {
            self.dict.active_iterators -= 1;
        }
        self.lifecycle = CursorLifecycle::Fresh;
        self.table_idx = 0;
        self.bucket_idx = -1;
        self.current = std::ptr::null_mut();
        self.next_entry = std::ptr::null_mut();
    }

    /// Advances to the next live entry, or `None` once both tables have been
    /// fully walked.
    pub fn next(&mut self) -> Option<CursorEntry<'_, K, V>> {
        if matches!(self.lifecycle, CursorLifecycle::Exhausted) {
            return None;
        }

        loop {
            if self.current.is_null() {
                if matches!(self.lifecycle, CursorLifecycle::Fresh) {
                    self.dict.active_iterators += 1;
                    self.lifecycle = CursorLifecycle::Active;
                }

                self.bucket_idx += 1;
                if self.bucket_idx as usize >= self.dict.ht[self.table_idx].size() {
                    if self.table_idx == 0 && self.dict.is_rehashing() {
                        self.table_idx = 1;
                        self.bucket_idx = 0;
                    } else {
                        self.lifecycle = CursorLifecycle::Exhausted;
                        return None;
                    }
                }

                self.current_slot = self.bucket_idx as usize;
                self.current = self.dict.ht[self.table_idx].buckets[self.current_slot]
                    .as_deref_mut()
                    .map_or(std::ptr::null_mut(), |node| node as *mut Entry<K, V>);
            } else {
                self.current = self.next_entry;
            }

            if !self.current.is_null() {
                // SAFETY: `current` was derived, at most one step ago, from a
                // live node owned by `self.dict`'s bucket storage; nothing
                // reallocates that storage while a cursor borrows the dict
                // exclusively. We read the successor before returning so a
                // caller that deletes this entry via `delete_current` cannot
                // invalidate the pointer we need for the next call.
                let node = unsafe { &mut *self.current };
                self.next_entry = node
                    .next
                    .as_deref_mut()
                    .map_or(std::ptr::null_mut(), |n| n as *mut Entry<K, V>);

                return Some(CursorEntry {
                    key: &node.key,
                    val: &mut node.val,
                });
            }
        }
    }

    /// Deletes the entry most recently returned by [`Cursor::next`],
    /// invoking the policy's release hooks. A no-op if `next` has not been
    /// called since the cursor was created or last rewound.
    pub fn delete_current(&mut self) {
        if self.current.is_null() {
            return;
        }
        let target = self.current as *const Entry<K, V>;
        let table = &mut self.dict.ht[self.table_idx];
        if let Some(removed) = unlink_by_identity(&mut table.buckets[self.current_slot], target) {
            table.filled -= 1;
            self.dict.policy.free_key(&removed.key);
            self.dict.policy.free_val(&removed.val);
        }
        self.current = std::ptr::null_mut();
    }
}

impl<'a, K, V, P> Drop for Cursor<'a, K, V, P> {
    fn drop(&mut self) {
        if !matches!(self.lifecycle, CursorLifecycle::Fresh) {
            self.dict.active_iterators -= 1;
        }
    }
}
