//! Policy Binding: the caller-supplied hash, equality, and ownership hooks.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{BuildHasher, Hash, Hasher},
    marker::PhantomData,
};

use rehashmap_error::{DictError, DictResult};

/// Capability set a dictionary needs from its keys and values.
///
/// `hash` and `eq` are required; `free_key`/`free_val` default to no-ops and
/// are overridden only when releasing a key or value has an externally
/// observable effect beyond ordinary `Drop` (closing a handle, decrementing a
/// refcount tracked outside the type itself, emitting a metric).
pub trait Policy<K, V> {
    /// Deterministic hash of `key`. Equal keys (per [`Policy::eq`]) must hash
    /// equal.
    fn hash(
        &self,
        key: &K,
    ) -> u64;

    /// Key equality. Must be reflexive, symmetric, and transitive.
    fn eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool;

    /// Invoked once when an entry holding `key` is removed from the
    /// dictionary.
    fn free_key(
        &self,
        _key: &K,
    ) {
    }

    /// Invoked once when an entry holding `val` is removed from the
    /// dictionary.
    fn free_val(
        &self,
        _val: &V,
    ) {
    }
}

/// The ordinary policy: `K: Hash + Eq`, hashed with a caller-chosen
/// [`BuildHasher`] (defaults to `RandomState`, matching
/// `std::collections::HashMap`'s own default).
pub struct DefaultPolicy<K, V, S = std::collections::hash_map::RandomState> {
    build_hasher: S,
    _marker: PhantomData<fn(&K, &V)>,
}

impl<K, V, S: Default> Default for DefaultPolicy<K, V, S> {
    fn default() -> Self {
        DefaultPolicy {
            build_hasher: S::default(),
            _marker: PhantomData,
        }
    }
}

impl<K, V, S> DefaultPolicy<K, V, S> {
    pub fn with_hasher(build_hasher: S) -> Self {
        DefaultPolicy {
            build_hasher,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S> Policy<K, V> for DefaultPolicy<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn hash(
        &self,
        key: &K,
    ) -> u64 {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        a == b
    }
}

/// A policy built from caller-supplied closures rather than a static trait
/// impl, for callers assembling hash/equality behavior at runtime (e.g. from
/// a scripting layer). Use [`ClosurePolicyBuilder`] to construct one.
pub struct ClosurePolicy<K, V> {
    hash_fn: Box<dyn Fn(&K) -> u64>,
    eq_fn: Box<dyn Fn(&K, &K) -> bool>,
    free_key_fn: Option<Box<dyn Fn(&K)>>,
    free_val_fn: Option<Box<dyn Fn(&V)>>,
}

impl<K, V> Policy<K, V> for ClosurePolicy<K, V> {
    fn hash(
        &self,
        key: &K,
    ) -> u64 {
        (self.hash_fn)(key)
    }

    fn eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        (self.eq_fn)(a, b)
    }

    fn free_key(
        &self,
        key: &K,
    ) {
        if let Some(f) = &self.free_key_fn {
            f(key);
        }
    }

    fn free_val(
        &self,
        val: &V,
    ) {
        if let Some(f) = &self.free_val_fn {
            f(val);
        }
    }
}

/// Builds a [`ClosurePolicy`], failing with `DictError::MissingCapability` if
/// a required capability (`hash` or `eq`) was never supplied — the runtime
/// analogue of the static path's compile-time trait bound.
#[derive(Default)]
pub struct ClosurePolicyBuilder<K, V> {
    hash_fn: Option<Box<dyn Fn(&K) -> u64>>,
    eq_fn: Option<Box<dyn Fn(&K, &K) -> bool>>,
    free_key_fn: Option<Box<dyn Fn(&K)>>,
    free_val_fn: Option<Box<dyn Fn(&V)>>,
}

impl<K, V> ClosurePolicyBuilder<K, V> {
    pub fn new() -> Self {
        ClosurePolicyBuilder {
            hash_fn: None,
            eq_fn: None,
            free_key_fn: None,
            free_val_fn: None,
        }
    }

    pub fn with_hash(
        mut self,
        f: impl Fn(&K) -> u64 + 'static,
    ) -> Self {
        self.hash_fn = Some(Box::new(f));
        self
    }

    pub fn with_eq(
        mut self,
        f: impl Fn(&K, &K) -> bool + 'static,
    ) -> Self {
        self.eq_fn = Some(Box::new(f));
        self
    }

    pub fn with_free_key(
        mut self,
        f: impl Fn(&K) + 'static,
    ) -> Self {
        self.free_key_fn = Some(Box::new(f));
        self
    }

    pub fn with_free_val(
        mut self,
        f: impl Fn(&V) + 'static,
    ) -> Self {
        self.free_val_fn = Some(Box::new(f));
        self
    }

    pub fn build(self) -> DictResult<ClosurePolicy<K, V>> {
        let hash_fn = self
            .hash_fn
            .ok_or(DictError::MissingCapability { capability: "hash" })?;
        let eq_fn = self
            .eq_fn
            .ok_or(DictError::MissingCapability { capability: "eq" })?;

        Ok(ClosurePolicy {
            hash_fn,
            eq_fn,
            free_key_fn: self.free_key_fn,
            free_val_fn: self.free_val_fn,
        })
    }
}

/// Hashes an arbitrary `Hash` value with the crate's default, non-keyed
/// hasher. Used by tests and by [`DefaultPolicy`]'s doc examples; not part of
/// the dictionary's own hot path (which always goes through a `Policy`).
#[inline]
pub(crate) fn hash_one<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    h.finish()
}
