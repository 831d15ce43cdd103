//! Deduplicating identifier stores with typed ids.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

use crate::error::IrError;

/// A typed identifier handed out by an [`IdStore`].
///
/// Ids are small positive integers scoped to the store that assigned them.
/// The raw value `0` is reserved for [`Id::INVALID`] and is never produced
/// by a successful insertion, so the first real id is `1`.
pub struct Id<T> {
    raw: u32,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.raw)
    }
}

impl<T> Id<T> {
    /// The reserved "invalid/unset" id.
    pub const INVALID: Self = Self {
        raw: 0,
        _phantom: PhantomData,
    };

    /// Creates an id from its raw value.
    ///
    /// Nothing checks that a store ever assigned this id; lookups through
    /// [`IdStore::get`] report unknown ids as errors.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _phantom: PhantomData,
        }
    }

    /// Returns the raw value of this id.
    pub fn raw(self) -> u32 {
        self.raw
    }

    /// Returns `false` for [`Id::INVALID`].
    pub fn is_valid(self) -> bool {
        self.raw != 0
    }

    /// Zero-based storage slot, `None` for the invalid id.
    ///
    /// Raw ids are 1-based, so slot `n` holds the value with raw id `n + 1`.
    pub(crate) fn slot(self) -> Option<usize> {
        (self.raw as usize).checked_sub(1)
    }
}

/// An append-only interner mapping structurally equal values to one [`Id`].
///
/// Ids are assigned densely in first-insertion order (`1..=len`) and are
/// never reassigned. There is no removal.
#[derive(Clone, Debug)]
pub struct IdStore<T> {
    data: Vec<T>,
    map: HashMap<T, u32>,
}

impl<T: Hash + Eq> Default for IdStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> IdStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Returns the number of distinct values in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inserts a value, returning the existing id if an equal value is
    /// already present.
    pub fn insert(&mut self, value: T) -> Id<T>
    where
        T: Clone,
    {
        if let Some(&raw) = self.map.get(&value) {
            return Id::from_raw(raw);
        }
        let raw = u32::try_from(self.data.len() + 1).unwrap_or_else(|_| {
            panic!("id store overflow: {} items exceeds u32::MAX", self.data.len())
        });
        self.map.insert(value.clone(), raw);
        self.data.push(value);
        Id::from_raw(raw)
    }

    /// Returns the id of a value equal to `value`, without inserting.
    pub fn lookup<Q>(&self, value: &Q) -> Option<Id<T>>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(value).map(|&raw| Id::from_raw(raw))
    }

    /// Returns the value behind `id`, or [`IrError::UnknownId`] if this store
    /// never assigned it.
    pub fn get(&self, id: Id<T>) -> Result<&T, IrError> {
        self.try_get(id).ok_or(IrError::UnknownId {
            id: id.raw(),
            len: self.data.len(),
        })
    }

    /// Returns the value behind `id` if this store assigned it.
    pub fn try_get(&self, id: Id<T>) -> Option<&T> {
        id.slot().and_then(|slot| self.data.get(slot))
    }

    /// Iterates over `(id, &value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        // `insert` keeps the length within u32.
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Id::from_raw(i as u32 + 1), v))
    }
}

impl<T> Index<Id<T>> for IdStore<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        match id.slot().and_then(|slot| self.data.get(slot)) {
            Some(value) => value,
            None => panic!("unknown id {id:?} (store holds {} values)", self.data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut store = IdStore::new();
        let first = store.insert("hello");
        let second = store.insert("world");
        assert_eq!(first.raw(), 1);
        assert_eq!(second.raw(), 2);
        assert_eq!(store[first], "hello");
        assert_eq!(store[second], "world");
    }

    #[test]
    fn insert_dedups() {
        let mut store = IdStore::new();
        let h0 = store.insert(42);
        let h1 = store.insert(99);
        let h2 = store.insert(42); // duplicate
        assert_eq!(h0, h2);
        assert_ne!(h0, h1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_follow_first_insertion_order() {
        let mut store = IdStore::new();
        for v in [7, 3, 7, 9, 3, 1] {
            store.insert(v);
        }
        let items: Vec<_> = store.iter().map(|(id, &v)| (id.raw(), v)).collect();
        assert_eq!(items, vec![(1, 7), (2, 3), (3, 9), (4, 1)]);
    }

    #[test]
    fn get_unknown_id_is_error() {
        let mut store = IdStore::new();
        let id = store.insert(5u8);
        assert_eq!(store.get(id).ok(), Some(&5));
        assert!(matches!(
            store.get(Id::INVALID),
            Err(IrError::UnknownId { id: 0, len: 1 })
        ));
        assert!(store.get(Id::from_raw(2)).is_err());
        assert_eq!(store.try_get(Id::from_raw(2)), None);
    }

    #[test]
    fn lookup_by_borrowed_form() {
        let mut store = IdStore::new();
        let id = store.insert(String::from("main("));
        assert_eq!(store.lookup("main("), Some(id));
        assert_eq!(store.lookup("foo("), None);
    }

    #[test]
    fn slots_are_shifted_by_one() {
        assert_eq!(Id::<u8>::INVALID.slot(), None);
        assert_eq!(Id::<u8>::from_raw(1).slot(), Some(0));
        assert_eq!(Id::<u8>::from_raw(4).slot(), Some(3));

        let mut store = IdStore::new();
        let id = store.insert('a');
        assert_eq!(id.slot(), Some(0));
        assert_eq!(store.try_get(Id::from_raw(0)), None);
    }

    #[test]
    fn invalid_id() {
        let id: Id<u32> = Id::INVALID;
        assert!(!id.is_valid());
        assert!(Id::<u32>::from_raw(1).is_valid());
        assert!(Id::<u32>::from_raw(1) < Id::from_raw(2));
        assert_eq!(format!("{:?}", Id::<u32>::from_raw(3)), "[3]");
    }
}
