// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use super::{line_index::count_newlines, Buffer, Direction, Match};

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl Buffer {
    /// Scans from `from` (inclusive) for the first byte contained in `accept`.
    pub fn find_char(&self, from: usize, direction: Direction, accept: &[u8]) -> Option<Match> {
        let mut pos = from;
        let mut newlines = 0;
        loop {
            let byte = self.byte_at(pos)?;
            if accept.contains(&byte) {
                return Some(Match {
                    position: pos,
                    newlines,
                });
            }
            if byte == b'\n' {
                newlines += 1;
            }

            pos = match direction {
                Direction::Forward => pos + 1,
                Direction::Backward => pos.checked_sub(1)?,
            };
        }
    }

    /// First occurrence of `pattern` starting at or after `from`.
    pub fn find_string_forward(&self, from: usize, pattern: &[u8]) -> Option<Match> {
        if pattern.is_empty() || from > self.used() {
            return None;
        }

        let content = self.contents();
        let position = from + find_subslice(&content[from..], pattern)?;

        Some(Match {
            position,
            newlines: count_newlines(&content[from..position]),
        })
    }

    /// Last occurrence of `pattern` that ends strictly before `from`.
    pub fn find_string_backward(&self, from: usize, pattern: &[u8]) -> Option<Match> {
        if pattern.is_empty() {
            return None;
        }

        let content = self.contents();
        let from = from.min(content.len());

        let mut last = None;
        let mut start = 0;
        while let Some(offset) = find_subslice(&content[start..], pattern) {
            let position = start + offset;
            if position + pattern.len() >= from {
                break;
            }
            last = Some(position);
            start = position + 1;
        }

        let position = last?;
        Some(Match {
            position,
            newlines: count_newlines(&content[position..from]),
        })
    }

    /// Moves to the next occurrence of `pattern` at or after the cursor.
    pub fn search_forward(&mut self, pattern: &[u8]) -> bool {
        self.search_forward_from(self.cursor, pattern)
    }

    /// Like [Buffer::search_forward] but skips a match under the cursor.
    pub fn search_next(&mut self, pattern: &[u8]) -> bool {
        self.search_forward_from(self.cursor + 1, pattern)
    }

    fn search_forward_from(&mut self, from: usize, pattern: &[u8]) -> bool {
        let Some(found) = self.find_string_forward(from, pattern) else {
            return false;
        };

        let skipped = self.region_newlines(self.cursor..from);
        self.cur_line += skipped + found.newlines;
        self.cursor = found.position;
        self.refresh();
        true
    }

    /// Moves to the previous occurrence of `pattern` ending before the cursor.
    pub fn search_backward(&mut self, pattern: &[u8]) -> bool {
        let Some(found) = self.find_string_backward(self.cursor, pattern) else {
            return false;
        };

        self.cur_line -= found.newlines;
        self.cursor = found.position;
        self.refresh();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::test_support::{assert_consistent, buffer_at},
        *,
    };

    #[test]
    fn find_char_both_ways() {
        let buffer = Buffer::from_bytes(b"a\nb(c\n)");

        assert_eq!(
            buffer.find_char(0, Direction::Forward, b"("),
            Some(Match {
                position: 3,
                newlines: 1
            })
        );
        assert_eq!(
            buffer.find_char(6, Direction::Backward, b"\n"),
            Some(Match {
                position: 5,
                newlines: 0
            })
        );
        assert_eq!(buffer.find_char(4, Direction::Backward, b")"), None);
        assert_eq!(buffer.find_char(7, Direction::Forward, b")"), None);
    }

    #[test]
    fn forward_search_counts_lines() {
        let buffer = Buffer::from_bytes(b"one\ntwo\nthree two");

        assert_eq!(
            buffer.find_string_forward(0, b"two"),
            Some(Match {
                position: 4,
                newlines: 1
            })
        );
        assert_eq!(
            buffer.find_string_forward(5, b"two"),
            Some(Match {
                position: 14,
                newlines: 1
            })
        );
        assert_eq!(buffer.find_string_forward(15, b"two"), None);
        assert_eq!(buffer.find_string_forward(0, b""), None);
        assert_eq!(buffer.find_string_forward(99, b"o"), None);
    }

    #[test]
    fn backward_search_needs_match_before_origin() {
        let buffer = Buffer::from_bytes(b"foo bar foo baz foo");

        assert_eq!(
            buffer.find_string_backward(19, b"foo"),
            Some(Match {
                position: 8,
                newlines: 0
            })
        );
        assert_eq!(
            buffer.find_string_backward(8, b"foo"),
            Some(Match {
                position: 0,
                newlines: 0
            })
        );
        assert_eq!(buffer.find_string_backward(3, b"foo"), None);
        assert_eq!(buffer.find_string_backward(19, b"qux"), None);
    }

    #[test]
    fn search_moves_cursor_and_line() {
        let mut buffer = buffer_at("x\nneedle\n\nneedle", 0);

        assert!(buffer.search_forward(b"needle"));
        assert_eq!((buffer.cursor(), buffer.cur_line()), (2, 1));
        assert!(buffer.search_forward(b"needle"));
        assert_eq!(buffer.cursor(), 2);

        assert!(buffer.search_next(b"needle"));
        assert_eq!((buffer.cursor(), buffer.cur_line()), (10, 3));
        assert!(!buffer.search_next(b"needle"));
        assert_eq!(buffer.cursor(), 10);

        assert!(buffer.search_backward(b"needle"));
        assert_eq!((buffer.cursor(), buffer.cur_line()), (2, 1));
        assert_consistent(&buffer);
    }

    #[test]
    fn search_next_from_a_newline() {
        let mut buffer = buffer_at("a\nb", 1);

        assert!(buffer.search_next(b"b"));
        assert_eq!((buffer.cursor(), buffer.cur_line()), (2, 1));
    }
}
