// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use crate::codec::{self, CodecError};

use super::{line_index::count_newlines, Buffer, Selection};

impl Buffer {
    /// Inserts `bytes` at the cursor and leaves the cursor after them.
    pub fn insert(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        self.text.insert_slice(self.cursor, bytes);

        let newlines = count_newlines(bytes);
        self.cursor += bytes.len();
        self.cur_line += newlines;
        self.last_line += newlines;
        self.modified = true;
        self.refresh();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut encoded = [0u8; 4];
        self.insert(c.encode_utf8(&mut encoded).as_bytes());
    }

    /// Inserts any codepoint up to [codec::MAX_CODEPOINT], including ones `char` cannot hold.
    pub fn insert_codepoint(&mut self, codepoint: u32) -> Result<(), CodecError> {
        let encoded = codec::encode(codepoint)?;
        self.insert(encoded.as_bytes());
        Ok(())
    }

    /// Deletes the inclusive region between `beg` and `end`, in either order, and returns the
    /// removed bytes. The end is clamped to the last byte; a start at or past the end deletes
    /// nothing. The cursor lands on the start of the region.
    pub fn delete_region(&mut self, beg: usize, end: usize) -> Option<Vec<u8>> {
        let (beg, end) = if end < beg { (end, beg) } else { (beg, end) };
        if beg >= self.used() {
            return None;
        }
        let end = end.min(self.used() - 1);

        let removed_newlines = self.region_newlines(beg..end + 1);
        if beg <= self.cursor {
            self.cur_line -= self.region_newlines(beg..self.cursor);
        } else {
            self.cur_line += self.region_newlines(self.cursor..beg);
        }
        self.cursor = beg;

        let removed = self.text.remove_range(beg..end + 1);
        self.last_line -= removed_newlines;
        self.modified = true;
        self.refresh();

        Some(removed)
    }

    /// Deletes the codepoint under the cursor.
    pub fn delete_forward_char(&mut self) -> Option<Vec<u8>> {
        if self.cursor >= self.used() {
            return None;
        }

        let start = self.cursor;
        let mut end = start + 1;
        while end < self.used() && !self.is_lead_at(end) {
            end += 1;
        }

        self.delete_region(start, end - 1)
    }

    /// Deletes the codepoint before the cursor.
    pub fn delete_backward_char(&mut self) -> Option<Vec<u8>> {
        if self.cursor == 0 {
            return None;
        }

        let end = self.cursor - 1;
        self.move_backward_char();
        self.delete_region(self.cursor, end)
    }

    pub fn delete_forward_word(&mut self) -> Option<Vec<u8>> {
        let start = self.cursor;
        self.move_forward_word();
        if self.cursor == start {
            return None;
        }

        self.delete_region(start, self.cursor - 1)
    }

    pub fn delete_backward_word(&mut self) -> Option<Vec<u8>> {
        let end = self.cursor;
        self.move_backward_word();
        if self.cursor == end {
            return None;
        }

        self.delete_region(self.cursor, end - 1)
    }

    /// Deletes the cursor's line together with its newline.
    pub fn delete_line(&mut self) -> Option<Vec<u8>> {
        self.delete_region(self.line_start(), self.line_end())
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.modified = true;
        }

        self.text.clear();
        self.cursor = 0;
        self.cur_line = 0;
        self.last_line = 0;
        self.selection = Selection::default();
        self.refresh();
    }
}
