// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

//! Open buffers as a doubly linked list stored in an arena.
//!
//! Links are [BufferId]s into the arena rather than pointers. Ids are never reused, so an id
//! kept after its buffer was removed simply stops resolving.

use crate::buffer::Buffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(usize);

#[derive(Debug)]
struct Node {
    buffer: Buffer,
    prev: Option<BufferId>,
    next: Option<BufferId>,
}

#[derive(Debug, Default)]
pub struct BufferList {
    slots: Vec<Option<Node>>,
    first: Option<BufferId>,
    last: Option<BufferId>,
    len: usize,
}

impl BufferList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `buffer` at the tail of the list.
    pub fn push(&mut self, buffer: Buffer) -> BufferId {
        let id = BufferId(self.slots.len());
        self.slots.push(Some(Node {
            buffer,
            prev: self.last,
            next: None,
        }));

        match self.last.and_then(|last| self.node_mut(last)) {
            Some(last) => last.next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        self.len += 1;

        id
    }

    /// Unlinks the buffer and frees its slot.
    pub fn remove(&mut self, id: BufferId) -> Option<Buffer> {
        let node = self.slots.get_mut(id.0)?.take()?;

        match node.prev.and_then(|prev| self.node_mut(prev)) {
            Some(prev) => prev.next = node.next,
            None => self.first = node.next,
        }
        match node.next.and_then(|next| self.node_mut(next)) {
            Some(next) => next.prev = node.prev,
            None => self.last = node.prev,
        }
        self.len -= 1;

        Some(node.buffer)
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.node(id).map(|node| &node.buffer)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.node_mut(id).map(|node| &mut node.buffer)
    }

    /// The buffer after `id`, wrapping around to the first one.
    pub fn next_of(&self, id: BufferId) -> Option<BufferId> {
        self.node(id)?.next.or(self.first)
    }

    /// The buffer before `id`, wrapping around to the last one.
    pub fn prev_of(&self, id: BufferId) -> Option<BufferId> {
        self.node(id)?.prev.or(self.last)
    }

    pub fn first(&self) -> Option<BufferId> {
        self.first
    }

    pub fn last(&self) -> Option<BufferId> {
        self.last
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the buffers in list order.
    pub fn iter(&self) -> impl Iterator<Item = (BufferId, &Buffer)> + '_ {
        std::iter::successors(self.first, |id| self.node(*id).and_then(|node| node.next))
            .filter_map(|id| self.get(id).map(|buffer| (id, buffer)))
    }

    fn node(&self, id: BufferId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: BufferId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Buffer {
        let mut buffer = Buffer::new();
        buffer.name = name.to_string();
        buffer
    }

    fn names(list: &BufferList) -> Vec<String> {
        list.iter().map(|(_, buffer)| buffer.name.clone()).collect()
    }

    #[test]
    fn push_appends_in_order() {
        let mut list = BufferList::new();
        let a = list.push(named("a"));
        let b = list.push(named("b"));
        let c = list.push(named("c"));

        assert_eq!(names(&list), ["a", "b", "c"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.first(), Some(a));
        assert_eq!(list.last(), Some(c));
        assert_eq!(list.get(b).map(|buffer| buffer.name.as_str()), Some("b"));
    }

    #[test]
    fn neighbours_wrap_around() {
        let mut list = BufferList::new();
        let a = list.push(named("a"));
        let b = list.push(named("b"));
        let c = list.push(named("c"));

        assert_eq!(list.next_of(a), Some(b));
        assert_eq!(list.next_of(c), Some(a));
        assert_eq!(list.prev_of(a), Some(c));
        assert_eq!(list.prev_of(b), Some(a));
    }

    #[test]
    fn single_buffer_is_its_own_neighbour() {
        let mut list = BufferList::new();
        let only = list.push(named("only"));

        assert_eq!(list.next_of(only), Some(only));
        assert_eq!(list.prev_of(only), Some(only));
    }

    #[test]
    fn remove_relinks_neighbours() {
        let mut list = BufferList::new();
        let a = list.push(named("a"));
        let b = list.push(named("b"));
        let c = list.push(named("c"));

        assert_eq!(list.remove(b).map(|buffer| buffer.name), Some("b".to_string()));
        assert_eq!(names(&list), ["a", "c"]);
        assert_eq!(list.next_of(a), Some(c));
        assert_eq!(list.prev_of(c), Some(a));

        list.remove(a);
        assert_eq!(list.first(), Some(c));
        list.remove(c);
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert_eq!(list.last(), None);
    }

    #[test]
    fn removed_ids_stop_resolving() {
        let mut list = BufferList::new();
        let a = list.push(named("a"));
        list.remove(a);
        let b = list.push(named("b"));

        assert_ne!(a, b);
        assert!(list.get(a).is_none());
        assert!(list.remove(a).is_none());
        assert_eq!(list.next_of(a), None);
        assert_eq!(names(&list), ["b"]);
    }
}
