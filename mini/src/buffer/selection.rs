// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::ops::RangeInclusive;

use crate::codec::is_lead_byte;

use super::Buffer;

/// An anchored selection. `start` stays where the selection was toggled on while `end` follows
/// the cursor, so `end` may sit before `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub active: bool,
}

impl Selection {
    pub fn toggle(&mut self, cursor: usize) {
        self.active = !self.active;
        if self.active {
            self.start = cursor;
            self.end = cursor;
        }
    }

    pub fn update(&mut self, cursor: usize) {
        if self.active {
            self.end = cursor;
        }
    }

    /// Normalized inclusive region, None while inactive.
    pub fn region(&self) -> Option<RangeInclusive<usize>> {
        self.active
            .then(|| self.start.min(self.end)..=self.start.max(self.end))
    }
}

impl Buffer {
    pub fn toggle_selection(&mut self) {
        self.selection.toggle(self.cursor);
    }

    /// Deletes the selected bytes and deactivates the selection. When the selection ends on the
    /// lead byte of a multi-byte codepoint, the whole codepoint goes with it.
    pub fn delete_selection(&mut self) -> Option<Vec<u8>> {
        let region = self.selection.region()?;
        self.selection.active = false;

        let start = *region.start();
        let mut end = *region.end();
        while self.byte_at(end + 1).is_some_and(|byte| !is_lead_byte(byte)) {
            end += 1;
        }

        self.delete_region(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::test_support::{assert_consistent, buffer_at},
        *,
    };

    #[test]
    fn end_tracks_cursor_while_active() {
        let mut buffer = buffer_at("hello world", 2);
        buffer.toggle_selection();
        buffer.move_forward_word();

        assert_eq!(buffer.selection().start, 2);
        assert_eq!(buffer.selection().end, 5);
        assert_eq!(buffer.selection().region(), Some(2..=5));

        buffer.toggle_selection();
        buffer.move_end_of_line();
        assert_eq!(buffer.selection().end, 5);
        assert_eq!(buffer.selection().region(), None);
    }

    #[test]
    fn region_is_normalized_when_moving_backward() {
        let mut buffer = buffer_at("one two", 6);
        buffer.toggle_selection();
        buffer.move_backward_word();

        assert_eq!(buffer.selection().region(), Some(4..=6));
    }

    #[test]
    fn delete_selection_is_inclusive() {
        let mut buffer = buffer_at("abcdef", 1);
        buffer.toggle_selection();
        buffer.move_forward_char();
        buffer.move_forward_char();

        assert_eq!(buffer.delete_selection(), Some(b"bcd".to_vec()));
        assert_eq!(buffer.contents(), b"aef");
        assert_eq!(buffer.cursor(), 1);
        assert!(!buffer.selection().active);
        assert_consistent(&buffer);
    }

    #[test]
    fn delete_selection_takes_whole_trailing_codepoint() {
        let mut buffer = buffer_at("a€b", 0);
        buffer.toggle_selection();
        buffer.move_forward_char();

        assert_eq!(buffer.cursor(), 1);
        assert_eq!(buffer.delete_selection(), Some("a€".as_bytes().to_vec()));
        assert_eq!(buffer.contents(), b"b");
    }

    #[test]
    fn delete_selection_fixes_line_bookkeeping() {
        let mut buffer = buffer_at("a\nb\nc\n", 4);
        buffer.toggle_selection();
        buffer.move_backward_line();
        buffer.move_backward_line();

        assert_eq!(buffer.cur_line(), 0);
        assert_eq!(buffer.delete_selection(), Some(b"a\nb\nc".to_vec()));
        assert_eq!(buffer.contents(), b"\n");
        assert_eq!(buffer.cur_line(), 0);
        assert_eq!(buffer.last_line(), 1);
        assert_consistent(&buffer);
    }

    #[test]
    fn inactive_selection_deletes_nothing() {
        let mut buffer = buffer_at("abc", 1);

        assert_eq!(buffer.delete_selection(), None);
        assert_eq!(buffer.contents(), b"abc");
        assert!(!buffer.modified);
    }
}
