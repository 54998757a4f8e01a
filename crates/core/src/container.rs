//! Growable ordered sequence with the per-frame loop helpers every sketch uses.
//!
//! [`Container`] is a thin owner of a `Vec<T>`: the capacity chosen at
//! construction is a sizing hint (pushing past it reallocates), `clear()`
//! keeps the allocation, and out-of-range access yields `None` rather than a
//! stale element.
//!
//! The loop helpers cover the four traversal shapes the sketches need:
//! forward, backward, every unordered pair (`round_robin`), and the cross
//! product with another container (`nested_loop_join`).

use std::ops::{Index, IndexMut};

use crate::lifecycle::{Drawable, Steppable};
use crate::surface::Surface;

/// Capacity used by [`Container::new`].
pub const DEFAULT_CAPACITY: usize = 256;

/// A growable ordered sequence of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub(crate) items: Vec<T>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Container<T> {
    /// Creates an empty container with [`DEFAULT_CAPACITY`] reserved.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty container with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of valid elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the container holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserved backing storage.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Appends an element and returns the new length.
    pub fn push(&mut self, element: T) -> usize {
        self.items.push(element);
        self.items.len()
    }

    /// Appends every element of `elements` and returns the new length.
    pub fn push_raw<I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(elements);
        self.items.len()
    }

    /// Moves every element of `other` to the end of this container and
    /// returns the new length. `other` is left empty with its capacity intact.
    pub fn push_all(&mut self, other: &mut Container<T>) -> usize {
        self.items.append(&mut other.items);
        self.items.len()
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Most recently pushed element.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Most recently pushed element, mutably.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Mutable access to two distinct elements at once.
    ///
    /// Returns `None` if `a == b` or either index is out of range.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        let len = self.items.len();
        if a == b || a >= len || b >= len {
            return None;
        }
        if a < b {
            let (head, tail) = self.items.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.items.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Drops every element, keeping the backing allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable elements in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// The valid elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The valid elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Calls `f` on every element in index order.
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.items.iter().for_each(f);
    }

    /// Calls `f` on every element in index order, with mutable access.
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.items.iter_mut().for_each(f);
    }

    /// Calls `f` on every element in descending index order.
    pub fn for_each_backwards<F: FnMut(&T)>(&self, f: F) {
        self.items.iter().rev().for_each(f);
    }

    /// Calls `f` on every element in descending index order, with mutable access.
    pub fn for_each_backwards_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.items.iter_mut().rev().for_each(f);
    }

    /// Calls `f(element_i, element_k)` exactly once for every index pair
    /// `i < k`, i.e. `n * (n - 1) / 2` times.
    ///
    /// Used for symmetric pairwise interactions (repulsion, merging).
    pub fn round_robin<F: FnMut(&mut T, &mut T)>(&mut self, mut f: F) {
        let len = self.items.len();
        for i in 0..len.saturating_sub(1) {
            let (head, tail) = self.items.split_at_mut(i + 1);
            let element = &mut head[i];
            for other in tail.iter_mut() {
                f(element, other);
            }
        }
    }

    /// Calls `f(a, b)` for every `a` in `self` and every `b` in `other`,
    /// outer loop over `self`.
    pub fn nested_loop_join<U, F>(&mut self, other: &mut Container<U>, mut f: F)
    where
        F: FnMut(&mut T, &mut U),
    {
        for element in self.items.iter_mut() {
            for other_element in other.items.iter_mut() {
                f(element, other_element);
            }
        }
    }
}

impl<T: Steppable> Steppable for Container<T> {
    fn step(&mut self) {
        self.items.iter_mut().for_each(Steppable::step);
    }
}

impl<T: Drawable> Drawable for Container<T> {
    fn draw(&self, surface: &mut dyn Surface) {
        for element in &self.items {
            element.draw(surface);
        }
    }
}

impl<T> Index<usize> for Container<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Container<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for Container<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Container<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Container<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T> IntoIterator for Container<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
