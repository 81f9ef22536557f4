// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, *},
};
use std::io::{self, ErrorKind, Stdout, Write};

use crate::{
    buffer::{ContentView, TAB_STOP},
    codec,
    command::Mode,
    editor_state::EditorState,
};

/// Screen rows above the text: the message/minibuffer line and the status line.
pub const HEADER_ROWS: u16 = 2;

pub struct Display {
    stdout: Stdout,
}

impl Display {
    const TITLE: &'static str = "Mini";

    pub fn new(stdout: Stdout) -> io::Result<Self> {
        let mut new = Self { stdout };
        if let Err(e) = new.setup_display() {
            let _ = new.cleanup_display();

            Err(e)
        } else {
            Ok(new)
        }
    }

    fn setup_display(&mut self) -> io::Result<()> {
        queue!(
            self.stdout,
            EnterAlternateScreen,
            SetTitle(Self::TITLE),
            cursor::MoveTo(0, 0)
        )?;
        self.stdout.flush()?;

        enable_raw_mode()
    }

    pub fn cleanup_display(&mut self) -> io::Result<()> {
        queue!(self.stdout, LeaveAlternateScreen, cursor::Show)?;

        disable_raw_mode()?;

        self.stdout.flush()
    }

    /// Text rows available below the header for a terminal of `rows` rows.
    pub fn text_rows(rows: u16) -> usize {
        rows.saturating_sub(HEADER_ROWS).max(1) as usize
    }

    pub fn render(&mut self, editor_state: &EditorState) -> io::Result<()> {
        let (columns, rows) = terminal::size()?;
        let width = columns as usize;
        let buffer = editor_state
            .buffer()
            .map_err(|e| io::Error::new(ErrorKind::Other, e.to_string()))?;

        queue!(self.stdout, cursor::Hide, Clear(ClearType::All))?;

        self.render_message_line(editor_state, width)?;
        self.render_status_line(editor_state, width)?;

        let text_rows = layout_rows(
            buffer,
            editor_state.screen_start,
            rows.saturating_sub(HEADER_ROWS) as usize,
        );
        for (index, row) in text_rows.iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, HEADER_ROWS + index as u16))?;
            self.render_row(row, width)?;
        }

        let (row, col) = if editor_state.mode.contains(Mode::MINIBUFFER) {
            let prompt = editor_state.minibuffer.prompt.text().chars().count();
            (0, prompt + editor_state.minibuffer.buffer.cursor_column())
        } else {
            let (y, x) = buffer.get_yx();
            let y = y.saturating_sub(editor_state.screen_start) + HEADER_ROWS as usize;
            (y, x)
        };
        queue!(
            self.stdout,
            cursor::MoveTo(
                col.min(width.saturating_sub(1)) as u16,
                row.min(rows.saturating_sub(1) as usize) as u16
            ),
            cursor::Show
        )?;

        self.stdout.flush()
    }

    fn render_message_line(&mut self, editor_state: &EditorState, width: usize) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(0, 0))?;

        if editor_state.minibuffer.is_open() {
            let prompt = editor_state.minibuffer.prompt.text();
            let input: String = editor_state
                .minibuffer
                .input()
                .chars()
                .take(width.saturating_sub(prompt.chars().count()))
                .collect();
            queue!(
                self.stdout,
                style::PrintStyledContent(prompt.bold()),
                style::Print(input)
            )?;
        } else if let Some(message) = &editor_state.message {
            let message: String = message.chars().take(width).collect();
            queue!(
                self.stdout,
                style::PrintStyledContent(message.with(Color::Red).bold())
            )?;
        }

        Ok(())
    }

    fn render_status_line(&mut self, editor_state: &EditorState, width: usize) -> io::Result<()> {
        let line = status_line(editor_state, width)
            .map_err(|e| io::Error::new(ErrorKind::Other, e.to_string()))?;
        let indicator = editor_state.mode.indicator();
        let color = match editor_state.mode {
            mode if mode.contains(Mode::SELECTION) => Color::Magenta,
            mode if mode.contains(Mode::EDITING) => Color::Green,
            mode if mode.contains(Mode::COMMAND) => Color::Blue,
            _ => Color::Reset,
        };

        queue!(self.stdout, cursor::MoveTo(0, 1))?;
        match line.strip_prefix(indicator) {
            Some(rest) => queue!(
                self.stdout,
                style::PrintStyledContent(indicator.with(color).bold()),
                style::PrintStyledContent(rest.bold())
            )?,
            None => queue!(self.stdout, style::PrintStyledContent(line.as_str().bold()))?,
        }

        Ok(())
    }

    fn render_row(&mut self, row: &[Glyph], width: usize) -> io::Result<()> {
        let mut column = 0;
        for glyph in row {
            let glyph_width = glyph.text.chars().count();
            if column + glyph_width > width {
                break;
            }
            column += glyph_width;

            let content = if glyph.is_tab {
                glyph.text.as_str().bold()
            } else {
                glyph.text.as_str().stylize()
            };
            let content = if glyph.selected {
                content.on(Color::DarkBlue)
            } else {
                content
            };
            queue!(self.stdout, style::PrintStyledContent(content))?;
        }

        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        let _ = self.cleanup_display();
    }
}

/// One codepoint of buffer text as it appears on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub text: String,
    pub selected: bool,
    pub is_tab: bool,
}

/// Splits `row_count` lines starting at line `first_line` into screen glyphs. Tabs become
/// spaces up to the next tab stop, control bytes and undecodable sequences a single
/// placeholder, so every glyph spans as many cells as the line index counts for it.
pub fn layout_rows(
    view: &dyn ContentView,
    first_line: usize,
    row_count: usize,
) -> Vec<Vec<Glyph>> {
    let region = view.get_region(first_line, row_count);
    let selection = view.selection_region();

    let mut rows = vec![];
    let mut row = vec![];
    let mut column = 0;
    let mut pos = region.start;
    while pos < region.end {
        let Some(byte) = view.byte_at(pos) else {
            break;
        };

        if byte == b'\n' {
            rows.push(std::mem::take(&mut row));
            column = 0;
            pos += 1;
            continue;
        }

        let selected = selection.as_ref().is_some_and(|region| region.contains(&pos));

        let (text, width, consumed) = if byte == b'\t' {
            let width = TAB_STOP - column % TAB_STOP;
            (" ".repeat(width), width, 1)
        } else if !codec::is_lead_byte(byte) {
            // Stray continuation byte, the line index gives it no column either.
            pos += 1;
            continue;
        } else {
            let expected = codec::sequence_length(byte);
            let mut bytes = vec![byte];
            while bytes.len() < expected.unwrap_or(1) {
                match view.byte_at(pos + bytes.len()) {
                    Some(next) if !codec::is_lead_byte(next) => bytes.push(next),
                    _ => break,
                }
            }

            let c = expected
                .filter(|length| *length == bytes.len())
                .and_then(|_| codec::decode(&bytes).ok())
                .and_then(char::from_u32)
                .filter(|c| !c.is_control())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            (c.to_string(), 1, bytes.len())
        };

        row.push(Glyph {
            text,
            selected,
            is_tab: byte == b'\t',
        });
        column += width;
        pos += consumed;
    }

    if !row.is_empty() || rows.len() < row_count {
        rows.push(row);
    }
    rows.truncate(row_count);
    rows
}

/// The status line: mode, buffer name and modified flag on the left, `column:line (bytes)` on
/// the right.
pub fn status_line(
    editor_state: &EditorState,
    width: usize,
) -> crate::editor_state::Result<String> {
    let buffer = editor_state.buffer()?;
    let (y, x) = buffer.get_yx();

    let left = format!(
        "{} {} {}",
        editor_state.mode.indicator(),
        buffer.name,
        if buffer.modified { "[+]" } else { "" }
    );
    let right = format!("{}:{} ({})", x, y, buffer.used());

    let used = left.chars().count() + right.chars().count();
    if used >= width {
        return Ok(format!("{} {}", left.trim_end(), right)
            .chars()
            .take(width)
            .collect());
    }

    Ok(format!("{}{}{}", left, " ".repeat(width - used), right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn texts(rows: &[Vec<Glyph>]) -> Vec<String> {
        rows.iter()
            .map(|row| row.iter().map(|glyph| glyph.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn rows_expand_tabs_and_decode() {
        let buffer = Buffer::from_bytes("a\tb\né€\n".as_bytes());
        let rows = layout_rows(&buffer, 0, 5);

        assert_eq!(texts(&rows), ["a       b", "é€", ""]);
        assert!(rows[0][1].is_tab);
    }

    #[test]
    fn rows_start_at_first_line() {
        let buffer = Buffer::from_bytes(b"zero\none\ntwo\nthree");
        let rows = layout_rows(&buffer, 1, 2);

        assert_eq!(texts(&rows), ["one", "two"]);
    }

    #[test]
    fn undecodable_bytes_become_placeholders() {
        let buffer = Buffer::from_bytes(&[b'a', 0x00, 0xFF, 0x80, b'b']);
        let rows = layout_rows(&buffer, 0, 1);

        assert_eq!(texts(&rows), ["a\u{FFFD}\u{FFFD}b"]);
    }

    #[test]
    fn selection_is_marked() {
        let mut buffer = Buffer::from_bytes(b"abcd");
        buffer.move_forward_char();
        buffer.toggle_selection();
        buffer.move_forward_char();

        let rows = layout_rows(&buffer, 0, 1);
        let selected: Vec<bool> = rows[0].iter().map(|glyph| glyph.selected).collect();
        assert_eq!(selected, [false, true, true, false]);
    }

    #[test]
    fn status_line_layout() {
        let mut state = EditorState::new(10);
        state.buffer_mut().unwrap().insert(b"ab\nc");

        assert_eq!(
            status_line(&state, 40).unwrap(),
            format!("[C] {} [+]{}1:1 (4)", Buffer::DEFAULT_NAME, " ".repeat(40 - 18 - 7))
        );
        assert_eq!(status_line(&state, 10).unwrap().chars().count(), 10);
    }
}
