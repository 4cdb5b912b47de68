//! Typed attribute columns for struct-of-arrays storage.
//!
//! A [`Column`] holds one attribute for every entity of a kind, indexed by that
//! entity's handle. The store keeps one column per attribute and appends to all of
//! them in lockstep when an entity is created, so every column of a kind always has
//! the same length and a handle is valid iff it is below that length.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque handle types used as column keys.
///
/// Implementors must provide a bijection between `u32` indices and the handle type.
pub trait Handle: Copy {
    /// Creates a handle from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, handle-indexed column of attribute values.
///
/// Values are only ever appended, never reordered or removed, which keeps handles
/// stable for the lifetime of the column.
#[derive(Debug, Clone)]
pub struct Column<I: Handle, T> {
    items: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I: Handle, T> Default for Column<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Handle, T> Column<I, T> {
    /// Creates a new, empty column.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends a value and returns the handle it is stored under.
    pub fn push(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns `true` if `id` addresses an entry of this column.
    pub fn contains(&self, id: I) -> bool {
        (id.as_raw() as usize) < self.items.len()
    }

    /// Returns a reference to the value stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the value stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Overwrites the value stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds.
    pub fn set(&mut self, id: I, value: T) {
        self.items[id.as_raw() as usize] = value;
    }

    /// Returns the number of entries in the column.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the column has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over every handle of the column in creation order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.items.len() as u32).map(I::from_raw)
    }

    /// Iterates over `(handle, &value)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over references to values in creation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: Handle, T> Index<I> for Column<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: Handle, T> IndexMut<I> for Column<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}
