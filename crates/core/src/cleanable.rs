//! Container with a per-frame compaction pass.
//!
//! [`CleanableContainer::clean`] lets every element re-evaluate its removal
//! flag, then moves flagged elements out in a single forward pass. Survivors
//! keep their relative order; the removed elements are parked in
//! [`CleanableContainer::recently_removed`] until the next pass.

use crate::container::Container;
use crate::lifecycle::{Cleanable, Drawable, Steppable};
use crate::surface::Surface;

/// A [`Container`] of [`Cleanable`] elements with stable compaction.
#[derive(Debug, Clone)]
pub struct CleanableContainer<T> {
    elements: Container<T>,
    recently_removed: Container<T>,
    spare: Vec<T>,
}

impl<T> Default for CleanableContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CleanableContainer<T> {
    /// Creates an empty container with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(crate::container::DEFAULT_CAPACITY)
    }

    /// Creates an empty container with room for `capacity` live elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Container::with_capacity(capacity),
            recently_removed: Container::with_capacity(capacity),
            spare: Vec::with_capacity(capacity),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is live.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends a live element and returns the new length.
    pub fn push(&mut self, element: T) -> usize {
        self.elements.push(element)
    }

    /// Moves every element of `other` into this container; see [`Container::push_all`].
    pub fn push_all(&mut self, other: &mut Container<T>) -> usize {
        self.elements.push_all(other)
    }

    /// Live element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Live elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Live elements in order, mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    /// The live elements.
    pub fn elements(&self) -> &Container<T> {
        &self.elements
    }

    /// The live elements, for loop helpers such as
    /// [`Container::round_robin`].
    pub fn elements_mut(&mut self) -> &mut Container<T> {
        &mut self.elements
    }

    /// Elements removed by the most recent [`clean`](Self::clean), in their
    /// original relative order.
    pub fn recently_removed(&self) -> &Container<T> {
        &self.recently_removed
    }

    /// Drops live and recently removed elements.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.recently_removed.clear();
    }
}

impl<T: Cleanable> CleanableContainer<T> {
    /// Runs one compaction pass and returns the number of removed elements.
    ///
    /// Each element's own [`Cleanable::clean`] runs first, so nested
    /// cleanable composites settle before their flag is read.
    pub fn clean(&mut self) -> usize {
        self.recently_removed.clear();

        let mut drained = std::mem::take(&mut self.elements.items);
        let mut survivors = std::mem::take(&mut self.spare);
        for mut element in drained.drain(..) {
            element.clean();
            if element.is_to_be_removed() {
                self.recently_removed.push(element);
            } else {
                survivors.push(element);
            }
        }
        self.elements.items = survivors;
        self.spare = drained;

        let removed = self.recently_removed.len();
        if removed > 0 {
            log::trace!(
                "clean pass removed {removed}, {} remain",
                self.elements.len()
            );
        }
        removed
    }
}

impl<T: Cleanable> Cleanable for CleanableContainer<T> {
    fn clean(&mut self) {
        CleanableContainer::clean(self);
    }

    /// A container is never dropped by its parent; only its elements are.
    fn is_to_be_removed(&self) -> bool {
        false
    }
}

impl<T: Steppable> Steppable for CleanableContainer<T> {
    fn step(&mut self) {
        self.elements.step();
    }
}

impl<T: Drawable> Drawable for CleanableContainer<T> {
    fn draw(&self, surface: &mut dyn Surface) {
        self.elements.draw(surface);
    }
}
