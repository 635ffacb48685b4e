//! A `std::collections::HashMap`-style entry API: inspect-then-insert
//! without hashing the key twice.

use crate::dict::table::Entry as Node;

/// A view into a single dictionary slot, obtained from [`crate::Dict::entry`].
pub enum Entry<'a, K, V> {
    Occupied(OccupiedEntry<'a, K, V>),
    Vacant(VacantEntry<'a, K, V>),
}

pub struct OccupiedEntry<'a, K, V> {
    pub(crate) slot: &'a mut Option<Box<Node<K, V>>>,
    pub(crate) filled: &'a mut usize,
}

pub struct VacantEntry<'a, K, V> {
    pub(crate) key: K,
    pub(crate) slot: &'a mut Option<Box<Node<K, V>>>,
    pub(crate) filled: &'a mut usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.slot.as_ref().unwrap().key
    }

    #[inline]
    pub fn get(&self) -> &V {
        &self.slot.as_ref().unwrap().val
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.slot.as_mut().unwrap().val
    }

    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        &mut self.slot.as_mut().unwrap().val
    }

    #[inline]
    pub fn insert(
        &mut self,
        val: V,
    ) -> V {
        std::mem::replace(&mut self.slot.as_mut().unwrap().val, val)
    }

    /// Unlinks the entry and returns its value. This does not run the
    /// dictionary's policy release hooks — the caller already holds the
    /// value and is free to do with it as they please, same as
    /// `std::collections::hash_map::OccupiedEntry::remove`.
    #[inline]
    pub fn remove(self) -> V {
        let mut node = self.slot.take().unwrap();
        *self.slot = node.next.take();
        *self.filled -= 1;
        node.val
    }
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    pub fn insert(self, val: V) -> &'a mut V {
        let next = self.slot.take();
        *self.slot = Some(Box::new(Node {
            key: self.key,
            val,
            next,
        }));
        *self.filled += 1;
        &mut self.slot.as_mut().unwrap().val
    }
}

impl<'a, K, V> Entry<'a, K, V> {
    pub fn or_insert(
        self,
        default: V,
    ) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    pub fn or_insert_with(
        self,
        f: impl FnOnce() -> V,
    ) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(f()),
        }
    }

    pub fn or_insert_with_key(
        self,
        f: impl FnOnce(&K) -> V,
    ) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let val = f(&e.key);
                e.insert(val)
            }
        }
    }

    pub fn and_modify(
        self,
        f: impl FnOnce(&mut V),
    ) -> Self {
        match self {
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
            Entry::Vacant(e) => Entry::Vacant(e),
        }
    }

    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(e) => e.key(),
            Entry::Vacant(e) => e.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}
