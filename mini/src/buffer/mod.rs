// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::{
    io::{self, ErrorKind, Read},
    ops::{Range, RangeInclusive},
    path::{Path, PathBuf},
};

use mini_gap::{GapBuffer, ALLOC_CHUNK};

use crate::{
    editor_state::{Error, Result},
    file_handle::{self, FileHandle, FileWrite},
};

pub use selection::Selection;

mod edit;
mod line_index;
mod motion;
mod search;
mod selection;

pub const TAB_STOP: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// A hit from one of the `find_*` scans. `newlines` counts the newlines between the scan origin
/// and `position`, so callers can shift `cur_line` without rescanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub position: usize,
    pub newlines: usize,
}

/// A cursor together with the line it sits on, saved so it can be restored exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub cursor: usize,
    pub line: usize,
}

/// Everything the display needs to paint a buffer.
pub trait ContentView {
    fn byte_at(&self, pos: usize) -> Option<u8>;
    fn get_region(&self, line_start: usize, line_count: usize) -> Range<usize>;
    fn get_yx(&self) -> (usize, usize);
    fn selection_region(&self) -> Option<RangeInclusive<usize>>;
}

/// An editable byte sequence stored in a gap buffer, with the cursor and the line bookkeeping
/// derived from it.
///
/// All positions are logical byte offsets in `0..=used()`. `cur_line` and `last_line` are kept
/// up to date by every edit and motion rather than recounted.
#[derive(Debug)]
pub struct Buffer {
    pub name: String,
    pub path: Option<PathBuf>,
    pub modified: bool,

    text: GapBuffer<u8>,
    cursor: usize,
    cur_line: usize,
    last_line: usize,
    cursor_column: usize,
    selection: Selection,
}

impl Buffer {
    pub const DEFAULT_NAME: &'static str = "*Untitled*";

    pub fn new() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            path: None,
            modified: false,
            text: GapBuffer::new(),
            cursor: 0,
            cur_line: 0,
            last_line: 0,
            cursor_column: 0,
            selection: Selection::default(),
        }
    }

    /// Creates an unmodified buffer holding `bytes`, cursor at the start.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.insert(bytes);
        buffer.reset_after_fill();
        buffer
    }

    /// Opens `path` into a new buffer. A missing file gives an empty buffer bound to the path.
    pub fn load(path: &Path) -> Result<Self> {
        let mut buffer = Self::new();

        if let Some(mut file) = file_handle::open_for_load(path)? {
            buffer
                .populate_from_read(&mut file)
                .map_err(|source| Error::Load {
                    path: path.to_path_buf(),
                    source,
                })?;
            tracing::debug!(
                path = %path.display(),
                bytes = buffer.used(),
                lines = buffer.last_line + 1,
                "Loaded file"
            );
        } else {
            tracing::debug!(path = %path.display(), "File does not exist yet, starting empty");
        }

        buffer.set_path(path);
        buffer.reset_after_fill();

        Ok(buffer)
    }

    /// Streams `read` into the buffer in [ALLOC_CHUNK] sized pieces through [Buffer::insert].
    pub fn populate_from_read(&mut self, read: &mut dyn Read) -> io::Result<()> {
        let mut chunk = [0u8; ALLOC_CHUNK];
        loop {
            match read.read(&mut chunk) {
                Ok(0) => return Ok(()),
                Ok(count) => self.insert(&chunk[..count]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes the content to `path`, replacing whatever was there. Only a successful write binds
    /// the buffer to `path` and clears the modified flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.save_with(path, &mut FileHandle::new(path))
    }

    pub fn save_with(&mut self, path: &Path, write: &mut dyn FileWrite) -> Result<()> {
        self.flush_to_write(write).map_err(|source| Error::Save {
            path: path.to_path_buf(),
            source,
        })?;

        self.set_path(path);
        self.modified = false;
        tracing::debug!(path = %path.display(), bytes = self.used(), "Saved buffer");

        Ok(())
    }

    /// Hands both physical spans, pre-gap then post-gap, to `write`.
    pub fn flush_to_write(&self, write: &mut dyn FileWrite) -> io::Result<()> {
        let (before_gap, after_gap) = self.text.as_slices();
        write.write_file(&[before_gap, after_gap])
    }

    pub fn set_path(&mut self, path: &Path) {
        self.name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.path = Some(path.to_path_buf());
    }

    fn reset_after_fill(&mut self) {
        self.modified = false;
        self.cursor = 0;
        self.cur_line = 0;
        self.refresh();
    }
}

impl Buffer {
    /// Logical length in bytes.
    pub fn used(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Physical storage size in bytes, gap included.
    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    pub fn gap_start(&self) -> usize {
        self.text.gap_start()
    }

    pub fn gap_end(&self) -> usize {
        self.text.gap_end()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cur_line(&self) -> usize {
        self.cur_line
    }

    pub fn last_line(&self) -> usize {
        self.last_line
    }

    /// Cached display column of the cursor. After vertical motion this holds the column the
    /// motion is aiming for, which can be past the end of a short line.
    pub fn cursor_column(&self) -> usize {
        self.cursor_column
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn position(&self) -> CursorPosition {
        CursorPosition {
            cursor: self.cursor,
            line: self.cur_line,
        }
    }

    /// Returns the byte at logical `pos`, or None outside `0..used()`.
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.get(pos).copied()
    }

    /// Copy of the whole content with the gap squeezed out.
    pub fn contents(&self) -> Vec<u8> {
        self.text.to_vec()
    }

    fn is_lead_at(&self, pos: usize) -> bool {
        self.byte_at(pos).is_some_and(crate::codec::is_lead_byte)
    }

    /// Recomputes state derived from the cursor. Every edit and motion finishes with this.
    fn refresh(&mut self) {
        self.cursor_column = self.line_offset();
        self.selection.update(self.cursor);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentView for Buffer {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        Buffer::byte_at(self, pos)
    }

    fn get_region(&self, line_start: usize, line_count: usize) -> Range<usize> {
        Buffer::get_region(self, line_start, line_count)
    }

    fn get_yx(&self) -> (usize, usize) {
        Buffer::get_yx(self)
    }

    fn selection_region(&self) -> Option<RangeInclusive<usize>> {
        self.selection.region()
    }
}


#[cfg(test)]
mod tests {
    use std::io;

    use super::{test_support::assert_consistent, *};

    struct FailingWrite;

    impl FileWrite for FailingWrite {
        fn write_file(&mut self, _spans: &[&[u8]]) -> io::Result<()> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "read-only"))
        }
    }

    struct VecWrite(Vec<u8>);

    impl FileWrite for VecWrite {
        fn write_file(&mut self, spans: &[&[u8]]) -> io::Result<()> {
            for span in spans {
                self.0.extend_from_slice(span);
            }
            Ok(())
        }
    }

    #[test]
    fn new_buffer_is_one_gap() {
        let buffer = Buffer::new();

        assert_eq!(buffer.name, Buffer::DEFAULT_NAME);
        assert_eq!(buffer.path, None);
        assert_eq!(buffer.used(), 0);
        assert_eq!(buffer.capacity(), ALLOC_CHUNK);
        assert_eq!(buffer.gap_start(), 0);
        assert_eq!(buffer.gap_end(), ALLOC_CHUNK);
        assert!(!buffer.modified);
    }

    #[test]
    fn byte_at_out_of_range_is_none() {
        let buffer = Buffer::from_bytes(b"ab");

        assert_eq!(buffer.byte_at(0), Some(b'a'));
        assert_eq!(buffer.byte_at(1), Some(b'b'));
        assert_eq!(buffer.byte_at(2), None);
        assert_eq!(buffer.byte_at(usize::MAX), None);
    }

    #[test]
    fn populate_streams_through_insert() {
        let content: Vec<u8> = (0..2000u32)
            .map(|i| if i % 7 == 0 { b'\n' } else { (i % 251) as u8 })
            .collect();
        let mut buffer = Buffer::new();
        buffer.populate_from_read(&mut content.as_slice()).unwrap();

        assert_eq!(buffer.contents(), content);
        assert_consistent(&buffer);
    }

    #[test]
    fn flush_writes_both_spans_in_order() {
        let mut buffer = Buffer::from_bytes(b"hello world");
        buffer.move_forward_word();
        buffer.insert(b",");

        let mut write = VecWrite(vec![]);
        buffer.flush_to_write(&mut write).unwrap();
        assert_eq!(write.0, b"hello, world");
    }

    #[test]
    fn failed_save_keeps_modified_flag() {
        let mut buffer = Buffer::new();
        buffer.insert(b"unsaved");

        let result = buffer.save_with(Path::new("/nowhere/file.txt"), &mut FailingWrite);

        assert!(matches!(result, Err(Error::Save { .. })));
        assert!(buffer.modified);
        assert_eq!(buffer.path, None);
        assert_eq!(buffer.name, Buffer::DEFAULT_NAME);
    }

    #[test]
    fn successful_save_binds_path() {
        let mut buffer = Buffer::new();
        buffer.insert(b"text");

        let mut write = VecWrite(vec![]);
        buffer
            .save_with(Path::new("/tmp/some/notes.txt"), &mut write)
            .unwrap();

        assert!(!buffer.modified);
        assert_eq!(buffer.name, "notes.txt");
        assert_eq!(buffer.path.as_deref(), Some(Path::new("/tmp/some/notes.txt")));
    }
}
