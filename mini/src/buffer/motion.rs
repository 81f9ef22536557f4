// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use super::{Buffer, CursorPosition, Direction};

pub const OPENING_BRACKETS: &[u8] = b"([{<";
pub const CLOSING_BRACKETS: &[u8] = b")]}>";

impl Buffer {
    /// Moves over one codepoint. No-op at the end of the buffer.
    pub fn move_forward_char(&mut self) {
        if self.cursor >= self.used() {
            return;
        }

        if self.byte_at(self.cursor) == Some(b'\n') {
            self.cur_line += 1;
        }

        let mut pos = self.cursor + 1;
        while pos < self.used() && !self.is_lead_at(pos) {
            pos += 1;
        }
        self.cursor = pos;
        self.refresh();
    }

    /// Moves back one codepoint. No-op at the start of the buffer.
    pub fn move_backward_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let mut pos = self.cursor - 1;
        while pos > 0 && !self.is_lead_at(pos) {
            pos -= 1;
        }

        if self.byte_at(pos) == Some(b'\n') {
            self.cur_line -= 1;
        }
        self.cursor = pos;
        self.refresh();
    }

    fn is_word_at(&self, pos: usize) -> bool {
        self.byte_at(pos).is_some_and(|byte| byte.is_ascii_alphanumeric())
    }

    /// Skips non-word characters, then the word after them, stopping just past its end.
    pub fn move_forward_word(&mut self) {
        while self.cursor < self.used() && !self.is_word_at(self.cursor) {
            self.move_forward_char();
        }
        while self.cursor < self.used() && self.is_word_at(self.cursor) {
            self.move_forward_char();
        }
    }

    /// Skips non-word characters backwards, then stops at the start of the word before them.
    pub fn move_backward_word(&mut self) {
        while self.cursor > 0 && !self.is_word_at(self.cursor - 1) {
            self.move_backward_char();
        }
        while self.cursor > 0 && self.is_word_at(self.cursor - 1) {
            self.move_backward_char();
        }
    }

    /// Walks right along the current line until the display column reaches `column` or the
    /// line runs out.
    fn advance_to_column(&mut self, column: usize) {
        let end = self.line_end();
        loop {
            if self.cursor >= end || self.line_offset() >= column {
                break;
            }
            let before = self.cursor;
            self.move_forward_char();
            if self.cursor == before {
                break;
            }
        }
    }

    /// Moves to the next line, keeping the intended column across short lines.
    pub fn move_forward_line(&mut self) {
        let column = self.cursor_column;

        self.cursor = self.line_end();
        self.move_forward_char();
        self.advance_to_column(column);

        self.refresh();
        self.cursor_column = column;
    }

    /// Moves to the previous line, keeping the intended column across short lines.
    pub fn move_backward_line(&mut self) {
        let column = self.cursor_column;

        self.cursor = self.line_start();
        if self.cursor > 0 {
            self.move_backward_char();
            self.cursor = self.line_start();
        }
        self.advance_to_column(column);

        self.refresh();
        self.cursor_column = column;
    }

    /// Toggles between the first non-blank character of the line and column 0.
    pub fn move_beginning_of_line(&mut self) {
        let start = self.line_start();
        let mut first_non_blank = start;
        while matches!(self.byte_at(first_non_blank), Some(b' ' | b'\t')) {
            first_non_blank += 1;
        }

        self.cursor = if self.cursor == first_non_blank {
            start
        } else {
            first_non_blank
        };
        self.refresh();
    }

    /// Moves to column 0 of the current line.
    pub fn move_to_line_start(&mut self) {
        self.cursor = self.line_start();
        self.refresh();
    }

    pub fn move_end_of_line(&mut self) {
        self.cursor = self.line_end();
        self.refresh();
    }

    pub fn move_beginning_of_buffer(&mut self) {
        self.cursor = 0;
        self.cur_line = 0;
        self.refresh();
    }

    pub fn move_end_of_buffer(&mut self) {
        self.cursor = self.used();
        self.cur_line = self.last_line;
        self.refresh();
    }

    /// Jumps to the next opening bracket after the cursor.
    pub fn move_forward_bracket(&mut self) {
        let Some(found) = self.find_char(self.cursor + 1, Direction::Forward, OPENING_BRACKETS)
        else {
            return;
        };

        // The scan starts past the cursor, so a newline under it is not in `found.newlines`.
        let mut newlines = found.newlines;
        if self.byte_at(self.cursor) == Some(b'\n') {
            newlines += 1;
        }

        self.cursor = found.position;
        self.cur_line += newlines;
        self.refresh();
    }

    /// Jumps to the previous closing bracket before the cursor.
    pub fn move_backward_bracket(&mut self) {
        let Some(from) = self.cursor.checked_sub(1) else {
            return;
        };
        let Some(found) = self.find_char(from, Direction::Backward, CLOSING_BRACKETS) else {
            return;
        };

        self.cursor = found.position;
        self.cur_line -= found.newlines;
        self.refresh();
    }

    /// Moves to the start of 0-based `line`, or of the last line when the buffer is shorter.
    pub fn goto_line(&mut self, line: usize) {
        let mut pos = 0;
        let mut reached = 0;
        while reached < line {
            let Some(found) = self.find_char(pos, Direction::Forward, b"\n") else {
                break;
            };
            pos = found.position + 1;
            reached += 1;
        }

        self.cursor = pos;
        self.cur_line = reached;
        self.refresh();
    }

    /// Puts the cursor back at a position saved with [Buffer::position], clamped to the content.
    pub fn restore_position(&mut self, position: CursorPosition) {
        if position.cursor > self.used() {
            self.move_end_of_buffer();
            return;
        }

        self.cursor = position.cursor;
        self.cur_line = position.line;
        self.refresh();
    }
}
