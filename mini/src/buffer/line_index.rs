// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::ops::Range;

use crate::codec::is_lead_byte;

use super::{Buffer, Direction, TAB_STOP};

pub(super) fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|byte| **byte == b'\n').count()
}

/// Display column reached after `bytes`, starting from column 0. Continuation bytes take no
/// room and tabs advance to the next multiple of [TAB_STOP].
pub fn display_width(bytes: impl IntoIterator<Item = u8>) -> usize {
    bytes.into_iter().fold(0, |column, byte| match byte {
        b'\t' => column + TAB_STOP - column % TAB_STOP,
        byte if is_lead_byte(byte) => column + 1,
        _ => column,
    })
}

impl Buffer {
    /// Position of the nearest newline strictly after (or strictly before) `from`.
    pub fn next_newline(&self, from: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => (from.saturating_add(1)..self.used())
                .find(|pos| self.byte_at(*pos) == Some(b'\n')),
            Direction::Backward => (0..from.min(self.used()))
                .rev()
                .find(|pos| self.byte_at(*pos) == Some(b'\n')),
        }
    }

    /// First byte of the cursor's line.
    pub fn line_start(&self) -> usize {
        self.next_newline(self.cursor, Direction::Backward)
            .map_or(0, |newline| newline + 1)
    }

    /// The newline ending the cursor's line, or `used()` on the last line.
    pub fn line_end(&self) -> usize {
        if self.byte_at(self.cursor) == Some(b'\n') {
            return self.cursor;
        }

        self.next_newline(self.cursor, Direction::Forward)
            .unwrap_or(self.used())
    }

    /// Display column of the cursor within its line.
    pub fn line_offset(&self) -> usize {
        display_width((self.line_start()..self.cursor).filter_map(|pos| self.byte_at(pos)))
    }

    /// Codepoints on the cursor's line, newline excluded.
    pub fn line_length(&self) -> usize {
        (self.line_start()..self.line_end())
            .filter(|pos| self.is_lead_at(*pos))
            .count()
    }

    /// Newlines inside the logical `range`, clamped to the content.
    pub fn region_newlines(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.used());
        (range.start.min(end)..end)
            .filter(|pos| self.byte_at(*pos) == Some(b'\n'))
            .count()
    }

    /// Byte range covering up to `line_count` lines starting at line `line_start`, each newline
    /// included. Empty when the buffer has fewer lines.
    pub fn get_region(&self, line_start: usize, line_count: usize) -> Range<usize> {
        let used = self.used();
        let mut pos = 0;
        let mut line = 0;
        while pos < used && line < line_start {
            if self.byte_at(pos) == Some(b'\n') {
                line += 1;
            }
            pos += 1;
        }

        let start = pos;
        let mut counted = 0;
        while pos < used && counted < line_count {
            if self.byte_at(pos) == Some(b'\n') {
                counted += 1;
            }
            pos += 1;
        }

        start..pos
    }

    /// Cursor position as (line, display column).
    pub fn get_yx(&self) -> (usize, usize) {
        (self.cur_line, self.line_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::{super::test_support::buffer_at, *};

    #[test]
    fn next_newline_is_exclusive_of_origin() {
        let buffer = Buffer::from_bytes(b"a\nb\nc");

        assert_eq!(buffer.next_newline(1, Direction::Forward), Some(3));
        assert_eq!(buffer.next_newline(0, Direction::Forward), Some(1));
        assert_eq!(buffer.next_newline(3, Direction::Forward), None);
        assert_eq!(buffer.next_newline(3, Direction::Backward), Some(1));
        assert_eq!(buffer.next_newline(1, Direction::Backward), None);
        assert_eq!(buffer.next_newline(5, Direction::Backward), Some(3));
    }

    #[test]
    fn line_bounds() {
        let buffer = buffer_at("first\nsecond\n", 8);
        assert_eq!(buffer.line_start(), 6);
        assert_eq!(buffer.line_end(), 12);

        let on_newline = buffer_at("first\nsecond\n", 5);
        assert_eq!(on_newline.line_start(), 0);
        assert_eq!(on_newline.line_end(), 5);

        let at_end = buffer_at("first\nsecond\n", 13);
        assert_eq!(at_end.line_start(), 13);
        assert_eq!(at_end.line_end(), 13);
        assert_eq!(at_end.line_length(), 0);
    }

    #[test]
    fn tabs_expand_to_next_stop() {
        assert_eq!(display_width(*b"\t"), 8);
        assert_eq!(display_width(*b"abc\t"), 8);
        assert_eq!(display_width(*b"abcdefgh\t"), 16);
        assert_eq!(display_width(*b"ab\tc"), 9);
    }

    #[test]
    fn offset_counts_codepoints() {
        let buffer = buffer_at("x\né€\tz", 8);
        assert_eq!(buffer.line_offset(), 8);
        assert_eq!(buffer.get_yx(), (1, 8));
        assert_eq!(buffer.line_length(), 4);
    }

    #[test]
    fn region_newlines_is_clamped() {
        let buffer = Buffer::from_bytes(b"\n\nab\n");

        assert_eq!(buffer.region_newlines(0..5), 3);
        assert_eq!(buffer.region_newlines(1..100), 2);
        assert_eq!(buffer.region_newlines(4..2), 0);
    }

    #[test]
    fn get_region_spans_whole_lines() {
        let buffer = Buffer::from_bytes(b"zero\none\ntwo\nthree");

        assert_eq!(buffer.get_region(0, 1), 0..5);
        assert_eq!(buffer.get_region(1, 2), 5..13);
        assert_eq!(buffer.get_region(3, 10), 13..18);
        assert_eq!(buffer.get_region(7, 2), 18..18);
    }
}
