//! Bucket table: a fixed-size array of singly-linked chains.

use rehashmap_error::{DictError, DictResult};

use crate::dict::policy::Policy;

/// One element of a bucket chain.
///
/// Chain heads own their successor transitively: dropping an `Entry` drops
/// its `next` link recursively through `Box`'s own drop glue. Removal paths
/// in this module always detach a node before it is allowed to drop, so no
/// chain is ever walked recursively by the compiler-generated destructor.
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub val: V,
    pub next: Option<Box<Entry<K, V>>>,
}

impl<K, V> Entry<K, V> {
    fn boxed(
        key: K,
        val: V,
        next: Option<Box<Entry<K, V>>>,
    ) -> Box<Self> {
        Box::new(Entry { key, val, next })
    }
}

/// A fixed-size array of bucket chains plus its fill count.
///
/// Invariant: `mask == buckets.len() - 1` whenever `buckets` is non-empty;
/// `buckets.len()` is either `0` or a power of two.
pub(crate) struct BucketTable<K, V> {
    pub buckets: Vec<Option<Box<Entry<K, V>>>>,
    pub mask: usize,
    pub filled: usize,
}

impl<K, V> BucketTable<K, V> {
    /// An uninitialized table (size 0, not rehashing from/into it).
    pub fn empty() -> Self {
        BucketTable {
            buckets: Vec::new(),
            mask: 0,
            filled: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn is_empty_table(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Allocates a table of exactly `size` buckets (`size` must already be a
    /// power of two). Fails with `DictError::ResourceExhausted` instead of
    /// aborting if the allocator cannot satisfy the request.
    pub fn try_with_capacity(size: usize) -> DictResult<Self> {
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(size)
            .map_err(|_| DictError::ResourceExhausted { requested: size })?;
        buckets.resize_with(size, || None);

        Ok(BucketTable {
            buckets,
            mask: size - 1,
            filled: 0,
        })
    }

    /// Prepends a new entry to the chain at `slot`.
    pub fn push_front(
        &mut self,
        slot: usize,
        key: K,
        val: V,
    ) {
        let next = self.buckets[slot].take();
        self.buckets[slot] = Some(Entry::boxed(key, val, next));
        self.filled += 1;
    }

    /// Removes and releases every entry, invoking the policy's release hooks
    /// on each key/value pair, then resets to the uninitialized state.
    pub fn clear_and_release<P: Policy<K, V>>(
        &mut self,
        policy: &P,
    ) {
        for head in self.buckets.drain(..) {
            let mut cur = head;
            while let Some(mut node) = cur {
                policy.free_key(&node.key);
                policy.free_val(&node.val);
                cur = node.next.take();
            }
        }
        self.mask = 0;
        self.filled = 0;
    }
}

/// Unlinks the first node in `head`'s chain matching `target` by address
/// identity, returning the detached node. Used by the cursor's delete-current
/// path, where the entry to remove is already known by reference rather than
/// by key.
pub(crate) fn unlink_by_identity<K, V>(
    head: &mut Option<Box<Entry<K, V>>>,
    target: *const Entry<K, V>,
) -> Option<Box<Entry<K, V>>> {
    let mut cur = head;
    loop {
        match cur {
            None => return None,
            Some(node) if std::ptr::eq(node.as_ref(), target) => {
                let mut removed = cur.take().unwrap();
                *cur = removed.next.take();
                return Some(removed);
            }
            Some(node) => {
                cur = &mut node.next;
            }
        }
    }
}

/// Unlinks the first node in `head`'s chain whose key is `eq`-equal to `key`,
/// returning the detached node. Mirrors [`unlink_by_identity`] but compares
/// by the policy's equality capability rather than by address.
pub(crate) fn unlink_by_key<K, V, P: Policy<K, V>>(
    head: &mut Option<Box<Entry<K, V>>>,
    key: &K,
    policy: &P,
) -> Option<Box<Entry<K, V>>> {
    let mut cur = head;
    loop {
        match cur {
            None => return None,
            Some(node) if policy.eq(&node.key, key) => {
                let mut removed = cur.take().unwrap();
                *cur = removed.next.take();
                return Some(removed);
            }
            Some(node) => {
                cur = &mut node.next;
            }
        }
    }
}
