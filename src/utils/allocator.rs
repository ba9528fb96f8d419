use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Slot index with generation tracking to prevent stale references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Typed handle stored in an [`Arena`].
pub trait Handle: Copy {
    fn from_raw(raw: GenerationalId) -> Self;
    fn raw(self) -> GenerationalId;

    fn index(self) -> usize {
        self.raw().index
    }

    fn generation(self) -> u32 {
        self.raw().generation
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub struct $name(pub GenerationalId);

        impl $name {
            pub fn new(index: usize, generation: u32) -> Self {
                Self(GenerationalId::new(index, generation))
            }
        }

        impl Handle for $name {
            fn from_raw(raw: GenerationalId) -> Self {
                Self(raw)
            }

            fn raw(self) -> GenerationalId {
                self.0
            }
        }
    };
}

define_handle!(
    /// Handle of a rigid body owned by a [`World`](crate::world::World).
    BodyId
);

define_handle!(
    /// Handle of a joint owned by a [`World`](crate::world::World).
    JointId
);

/// Generational arena that hands out stable handles and iterates in insertion order.
///
/// Removed slots are recycled with a bumped generation, so a handle to a
/// removed item never resolves to its successor.
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    order: Vec<usize>,
    _handle: PhantomData<fn() -> I>,
}

impl<I: Handle, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Handle, T> Arena<I, T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            order: Vec::new(),
            _handle: PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> I {
        if let Some(index) = self.free_list.pop_front() {
            self.items[index] = Some(item);
            self.order.push(index);
            return I::from_raw(GenerationalId::new(index, self.generations[index]));
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        self.order.push(index);
        I::from_raw(GenerationalId::new(index, 0))
    }

    pub fn contains(&self, id: I) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: I) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    /// Mutable access to two distinct items at once, in argument order.
    pub fn get2_mut(&mut self, id_a: I, id_b: I) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() {
            return None;
        }

        if !self.is_valid(id_a) || !self.is_valid(id_b) {
            return None;
        }

        let (first, second, flipped) = if id_a.index() < id_b.index() {
            (id_a, id_b, false)
        } else {
            (id_b, id_a, true)
        };

        let second_index = second.index();
        if second_index >= self.items.len() {
            return None;
        }

        let (left, right) = self.items.split_at_mut(second_index);
        let first_slot = left
            .get_mut(first.index())
            .and_then(|slot| slot.as_mut())?;
        let second_slot = right.get_mut(0).and_then(|slot| slot.as_mut())?;

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn remove(&mut self, id: I) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let index = id.index();
        let item = self.items.get_mut(index).and_then(Option::take)?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_list.push_back(index);
        self.order.retain(|&slot| slot != index);
        Some(item)
    }

    pub fn clear(&mut self) {
        for index in self.order.drain(..) {
            self.items[index] = None;
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.free_list.push_back(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order
            .iter()
            .filter_map(move |&index| self.items[index].as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        let mut slots: Vec<Option<&mut T>> =
            self.items.iter_mut().map(|slot| slot.as_mut()).collect();
        self.order
            .iter()
            .filter_map(move |&index| slots.get_mut(index).and_then(Option::take))
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.order
            .iter()
            .map(move |&index| I::from_raw(GenerationalId::new(index, self.generations[index])))
    }

    pub fn iter_with_ids(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.ids().filter_map(move |id| self.get(id).map(|item| (id, item)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn is_valid(&self, id: I) -> bool {
        self.generations
            .get(id.index())
            .copied()
            .map(|gen| gen == id.generation())
            .unwrap_or(false)
    }
}
