// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{
    buffer::{Buffer, Direction},
    buffer_list::{BufferId, BufferList},
    codec::CodecError,
    command::{Command, Mode},
    keymap::{Key, KeyMap},
    minibuffer::{Minibuffer, Prompt},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Can't open {}: is a directory", .0.display())]
    IsDirectory(PathBuf),

    #[error("Can't open {}: not a regular file", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Failed to load {}: {source}", path.display())]
    Load { path: PathBuf, source: io::Error },

    #[error("Failed to save {}: {source}", path.display())]
    Save { path: PathBuf, source: io::Error },

    #[error("Invalid unicode value: {0:?}")]
    InvalidUnicode(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Recoverable(String),

    #[error("{0}")]
    Unrecoverable(String),
}

impl Error {
    /// Recoverable errors end up in the message line; the rest end the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Unrecoverable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastSearch {
    pub pattern: Vec<u8>,
    pub direction: Direction,
}

/// One editing session: the open buffers and everything the commands share between them.
#[derive(Debug)]
pub struct EditorState {
    pub buffers: BufferList,
    pub mode: Mode,
    pub clipboard: Vec<u8>,
    pub last_search: Option<LastSearch>,
    pub minibuffer: Minibuffer,
    /// First buffer line shown on screen.
    pub screen_start: usize,
    /// Number of text rows on screen.
    pub screen_height: usize,
    pub message: Option<String>,
    pub last_key: Option<Key>,
    pub should_quit: bool,

    active: BufferId,
    mode_before_prompt: Mode,
}

impl EditorState {
    pub fn new(screen_height: usize) -> Self {
        let mut buffers = BufferList::new();
        let active = buffers.push(Buffer::new());
        Self::with_buffers(buffers, active, screen_height)
    }

    /// Opens every path into its own buffer, the first one active. With no paths the session
    /// starts with a single empty buffer.
    pub fn open(paths: &[PathBuf], screen_height: usize) -> Result<Self> {
        let mut buffers = BufferList::new();
        let mut first = None;
        for path in paths {
            let id = buffers.push(Buffer::load(path)?);
            first.get_or_insert(id);
        }

        let active = match first {
            Some(id) => id,
            None => buffers.push(Buffer::new()),
        };

        tracing::info!(buffers = buffers.len(), "Session started");
        Ok(Self::with_buffers(buffers, active, screen_height))
    }

    fn with_buffers(buffers: BufferList, active: BufferId, screen_height: usize) -> Self {
        Self {
            buffers,
            mode: Mode::COMMAND,
            clipboard: vec![],
            last_search: None,
            minibuffer: Minibuffer::default(),
            screen_start: 0,
            screen_height: screen_height.max(1),
            message: None,
            last_key: None,
            should_quit: false,
            active,
            mode_before_prompt: Mode::COMMAND,
        }
    }

    pub fn active_id(&self) -> BufferId {
        self.active
    }

    pub fn buffer(&self) -> Result<&Buffer> {
        self.buffers.get(self.active).ok_or_else(|| {
            Error::Unrecoverable(format!("Active buffer {:?} is not open", self.active))
        })
    }

    pub fn buffer_mut(&mut self) -> Result<&mut Buffer> {
        let active = self.active;
        self.buffers
            .get_mut(active)
            .ok_or_else(|| Error::Unrecoverable(format!("Active buffer {:?} is not open", active)))
    }

    pub fn set_screen_height(&mut self, screen_height: usize) {
        self.screen_height = screen_height.max(1);
    }
}

impl EditorState {
    /// Resolves `key` in the current mode and dispatches the bound command, if any.
    pub fn handle_key(&mut self, key: Key, keymap: &KeyMap) -> Result<()> {
        self.last_key = Some(key);

        match keymap.lookup(key, self.mode) {
            Some(command) => self.dispatch(command),
            None => {
                tracing::trace!(%key, mode = ?self.mode, "Unbound key");
                Ok(())
            }
        }
    }

    /// Runs `command`, reporting recoverable failures in the message line instead of returning
    /// them.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        self.message = None;

        match self.execute(command) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                tracing::warn!(%command, error = %e, "Command failed");
                self.message = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }

        self.scroll_to_cursor()
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        tracing::debug!(%command, mode = ?self.mode, "Executing command");

        match command {
            Command::MoveForwardChar => self.buffer_mut()?.move_forward_char(),
            Command::MoveBackwardChar => self.buffer_mut()?.move_backward_char(),
            Command::MoveForwardWord => self.buffer_mut()?.move_forward_word(),
            Command::MoveBackwardWord => self.buffer_mut()?.move_backward_word(),
            Command::MoveForwardLine => self.buffer_mut()?.move_forward_line(),
            Command::MoveBackwardLine => self.buffer_mut()?.move_backward_line(),
            Command::MoveBeginningOfLine => self.buffer_mut()?.move_beginning_of_line(),
            Command::MoveEndOfLine => self.buffer_mut()?.move_end_of_line(),
            Command::MovePageUp => {
                let lines = self.screen_height;
                let buffer = self.buffer_mut()?;
                for _ in 0..lines {
                    buffer.move_backward_line();
                }
            }
            Command::MovePageDown => {
                let lines = self.screen_height;
                let buffer = self.buffer_mut()?;
                for _ in 0..lines {
                    buffer.move_forward_line();
                }
            }
            Command::MoveBeginningOfBuffer => self.buffer_mut()?.move_beginning_of_buffer(),
            Command::MoveEndOfBuffer => self.buffer_mut()?.move_end_of_buffer(),
            Command::MoveForwardBracket => self.buffer_mut()?.move_forward_bracket(),
            Command::MoveBackwardBracket => self.buffer_mut()?.move_backward_bracket(),
            Command::GotoLine => {
                let origin = self.buffer()?.position();
                self.open_prompt(Prompt::GotoLine { origin });
            }

            Command::InsertNewline => self.buffer_mut()?.insert(b"\n"),
            Command::InsertSelf => {
                if let Some(Key::Char(c)) = self.last_key {
                    self.buffer_mut()?.insert_char(c);
                }
            }
            Command::InsertUnicode => self.open_prompt(Prompt::InsertUnicode),
            Command::OpenBelow => {
                let buffer = self.buffer_mut()?;
                buffer.move_end_of_line();
                buffer.insert(b"\n");
                self.mode = Mode::EDITING;
            }
            Command::OpenAbove => {
                let buffer = self.buffer_mut()?;
                buffer.move_to_line_start();
                buffer.insert(b"\n");
                buffer.move_backward_char();
                self.mode = Mode::EDITING;
            }

            Command::DeleteForwardChar => {
                self.buffer_mut()?.delete_forward_char();
            }
            Command::DeleteBackwardChar => {
                self.buffer_mut()?.delete_backward_char();
            }
            Command::DeleteForwardWord => {
                let removed = self.buffer_mut()?.delete_forward_word();
                self.fill_clipboard(removed);
            }
            Command::DeleteBackwardWord => {
                let removed = self.buffer_mut()?.delete_backward_word();
                self.fill_clipboard(removed);
            }
            Command::DeleteSelectionOrLine => {
                let buffer = self.buffer_mut()?;
                let removed = if buffer.selection().active {
                    buffer.delete_selection()
                } else {
                    buffer.delete_line()
                };
                self.fill_clipboard(removed);
                self.mode = Mode::COMMAND;
            }
            Command::Clear => self.buffer_mut()?.clear(),
            Command::Paste => {
                let clipboard = self.clipboard.clone();
                self.buffer_mut()?.insert(&clipboard);
            }

            Command::ToggleSelectionMode => {
                let buffer = self.buffer_mut()?;
                buffer.toggle_selection();
                self.mode = if buffer.selection().active {
                    Mode::SELECTION
                } else {
                    Mode::COMMAND
                };
            }
            Command::CommandMode => {
                let buffer = self.buffer_mut()?;
                if buffer.selection().active {
                    buffer.toggle_selection();
                }
                self.mode = Mode::COMMAND;
            }
            Command::EditingMode => self.mode = Mode::EDITING,

            Command::SaveBuffer => {
                let path = self.buffer()?.path.clone();
                match path {
                    Some(path) => self.buffer_mut()?.save(&path)?,
                    None => self.open_prompt(Prompt::SaveAs),
                }
            }
            Command::WriteBuffer => self.open_prompt(Prompt::SaveAs),
            Command::LoadBuffer => self.open_prompt(Prompt::LoadFile),
            Command::KillBuffer => self.kill_active_buffer(),
            Command::NextBuffer => self.switch_to(self.buffers.next_of(self.active)),
            Command::PreviousBuffer => self.switch_to(self.buffers.prev_of(self.active)),
            Command::Recenter => self.recenter()?,
            Command::Quit => self.should_quit = true,

            Command::SearchForward => {
                let origin = self.buffer()?.position();
                self.open_prompt(Prompt::Search {
                    direction: Direction::Forward,
                    origin,
                });
            }
            Command::SearchBackward => {
                let origin = self.buffer()?.position();
                self.open_prompt(Prompt::Search {
                    direction: Direction::Backward,
                    origin,
                });
            }
            Command::GotoNextSearch => self.repeat_search(false)?,
            Command::GotoPreviousSearch => self.repeat_search(true)?,

            Command::MinibufferDoAction => self.confirm_prompt()?,
            Command::MinibufferDeleteBackwardChar => {
                self.minibuffer.buffer.delete_backward_char();
                self.update_prompt()?;
            }
            Command::MinibufferClear => {
                self.minibuffer.buffer.clear();
                self.update_prompt()?;
            }
            Command::MinibufferCancel => self.cancel_prompt()?,
            Command::MinibufferInsertSelf => {
                if let Some(Key::Char(c)) = self.last_key {
                    self.minibuffer.buffer.insert_char(c);
                }
                self.update_prompt()?;
            }
        }

        Ok(())
    }

    fn fill_clipboard(&mut self, removed: Option<Vec<u8>>) {
        if let Some(removed) = removed {
            self.clipboard = removed;
        }
    }

    fn switch_to(&mut self, id: Option<BufferId>) {
        if let Some(id) = id {
            self.active = id;
            self.match_selection_mode();
        }
    }

    /// Selection mode follows the active buffer's selection after the active buffer changes.
    fn match_selection_mode(&mut self) {
        if !self.mode.intersects(Mode::COMMAND | Mode::SELECTION) {
            return;
        }

        let selecting = self
            .buffers
            .get(self.active)
            .is_some_and(|buffer| buffer.selection().active);
        self.mode = if selecting {
            Mode::SELECTION
        } else {
            Mode::COMMAND
        };
    }

    /// Closes the active buffer, discarding unsaved changes. The last buffer is replaced with a
    /// fresh empty one.
    fn kill_active_buffer(&mut self) {
        let killed = self.active;
        let next = self.buffers.next_of(killed).filter(|next| *next != killed);

        if let Some(buffer) = self.buffers.remove(killed) {
            tracing::debug!(name = %buffer.name, modified = buffer.modified, "Killed buffer");
        }

        self.active = match next {
            Some(next) => next,
            None => self.buffers.push(Buffer::new()),
        };
        self.screen_start = 0;
        self.match_selection_mode();
    }

    fn repeat_search(&mut self, reverse: bool) -> Result<()> {
        self.mode = Mode::COMMAND;
        let Some(last_search) = self.last_search.clone() else {
            return Ok(());
        };

        let direction = match (last_search.direction, reverse) {
            (Direction::Forward, false) | (Direction::Backward, true) => Direction::Forward,
            _ => Direction::Backward,
        };

        let buffer = self.buffer_mut()?;
        let found = match direction {
            Direction::Forward => buffer.search_next(&last_search.pattern),
            Direction::Backward => buffer.search_backward(&last_search.pattern),
        };
        if !found {
            return Err(Error::Recoverable(format!(
                "Not found: {}",
                String::from_utf8_lossy(&last_search.pattern)
            )));
        }

        Ok(())
    }
}

impl EditorState {
    fn open_prompt(&mut self, prompt: Prompt) {
        self.minibuffer.open(prompt);
        self.mode_before_prompt = self.mode;
        self.mode = Mode::MINIBUFFER;
    }

    fn close_prompt(&mut self) -> (Prompt, String) {
        self.mode = self.mode_before_prompt;
        self.minibuffer.close()
    }

    /// Previews the prompt's effect for the current input, always starting over from the
    /// position the prompt was opened at.
    fn update_prompt(&mut self) -> Result<()> {
        let input = self.minibuffer.input();

        match self.minibuffer.prompt {
            Prompt::GotoLine { origin } => {
                let buffer = self.buffer_mut()?;
                match input.trim().parse::<usize>() {
                    Ok(line) => buffer.goto_line(line),
                    Err(_) => buffer.restore_position(origin),
                }
            }
            Prompt::Search { direction, origin } => {
                let buffer = self.buffer_mut()?;
                buffer.restore_position(origin);
                if !input.is_empty() {
                    match direction {
                        Direction::Forward => buffer.search_forward(input.as_bytes()),
                        Direction::Backward => buffer.search_backward(input.as_bytes()),
                    };
                }
            }
            Prompt::None | Prompt::InsertUnicode | Prompt::LoadFile | Prompt::SaveAs => {
                return Ok(())
            }
        }

        self.recenter()
    }

    fn confirm_prompt(&mut self) -> Result<()> {
        let (prompt, input) = self.close_prompt();

        match prompt {
            Prompt::None | Prompt::GotoLine { .. } => {}
            Prompt::Search { direction, .. } => {
                if !input.is_empty() {
                    self.last_search = Some(LastSearch {
                        pattern: input.into_bytes(),
                        direction,
                    });
                }
            }
            Prompt::InsertUnicode => {
                let codepoint = u32::from_str_radix(input.trim(), 16)
                    .map_err(|_| Error::InvalidUnicode(input.clone()))?;
                self.buffer_mut()?.insert_codepoint(codepoint)?;
            }
            Prompt::LoadFile => {
                if let Some(path) = expand_path(&input) {
                    let buffer = Buffer::load(&path)?;
                    self.active = self.buffers.push(buffer);
                    self.screen_start = 0;
                }
            }
            Prompt::SaveAs => {
                if let Some(path) = expand_path(&input) {
                    self.buffer_mut()?.save(&path)?;
                }
            }
        }

        Ok(())
    }

    fn cancel_prompt(&mut self) -> Result<()> {
        let (prompt, _) = self.close_prompt();

        if let Some(origin) = prompt.origin() {
            self.buffer_mut()?.restore_position(origin);
            self.recenter()?;
        }

        Ok(())
    }
}

impl EditorState {
    /// Scrolls just enough to bring the cursor line on screen.
    pub fn scroll_to_cursor(&mut self) -> Result<()> {
        let line = self.buffer()?.cur_line();
        let end = self.screen_start + self.screen_height;

        if line >= end {
            self.screen_start = line + 1 - self.screen_height;
        } else if line < self.screen_start {
            self.screen_start = line;
        }

        Ok(())
    }

    /// Scrolls so the cursor line sits near the middle of the screen.
    pub fn recenter(&mut self) -> Result<()> {
        let line = self.buffer()?.cur_line();
        self.screen_start = (line + 2).saturating_sub(self.screen_height / 2);
        Ok(())
    }
}

/// Expands a leading `~` in a typed path. Blank input means no path.
fn expand_path(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    Some(Path::new(shellexpand::tilde(input).as_ref()).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> EditorState {
        let mut state = EditorState::new(10);
        state.buffer_mut().unwrap().insert(text.as_bytes());
        state.buffer_mut().unwrap().move_beginning_of_buffer();
        state
    }

    fn type_keys(state: &mut EditorState, keymap: &KeyMap, text: &str) {
        for c in text.chars() {
            state.handle_key(Key::Char(c), keymap).unwrap();
        }
    }

    #[test]
    fn editing_mode_inserts_typed_keys() {
        let keymap = KeyMap::dvorak();
        let mut state = EditorState::new(10);

        state.handle_key(Key::Enter, &keymap).unwrap();
        assert_eq!(state.mode, Mode::EDITING);
        type_keys(&mut state, &keymap, "hé");
        state.handle_key(Key::Enter, &keymap).unwrap();
        state.handle_key(Key::Esc, &keymap).unwrap();

        assert_eq!(state.mode, Mode::COMMAND);
        assert_eq!(state.buffer().unwrap().contents(), "hé\n".as_bytes());
    }

    #[test]
    fn search_preview_and_cancel_restores_origin() {
        let keymap = KeyMap::dvorak();
        let mut state = session("alpha\nbeta\ngamma");
        state.execute(Command::MoveForwardChar).unwrap();

        state.handle_key(Key::Char('s'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::MINIBUFFER);
        assert_eq!(state.minibuffer.prompt.text(), "Search → ");

        type_keys(&mut state, &keymap, "gam");
        assert_eq!(state.buffer().unwrap().cursor(), 11);
        assert_eq!(state.buffer().unwrap().cur_line(), 2);

        state.handle_key(Key::Esc, &keymap).unwrap();
        assert_eq!(state.mode, Mode::COMMAND);
        assert_eq!(state.buffer().unwrap().cursor(), 1);
        assert_eq!(state.buffer().unwrap().cur_line(), 0);
        assert_eq!(state.last_search, None);
    }

    #[test]
    fn confirmed_search_can_be_repeated() {
        let keymap = KeyMap::dvorak();
        let mut state = session("ab ab ab");

        state.handle_key(Key::Char('s'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "ab");
        state.handle_key(Key::Enter, &keymap).unwrap();

        assert_eq!(
            state.last_search,
            Some(LastSearch {
                pattern: b"ab".to_vec(),
                direction: Direction::Forward
            })
        );
        assert_eq!(state.buffer().unwrap().cursor(), 0);

        state.handle_key(Key::Char('w'), &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().cursor(), 3);
        state.handle_key(Key::Char('w'), &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().cursor(), 6);
        state.handle_key(Key::Char('w'), &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().cursor(), 6);
        assert_eq!(state.message.as_deref(), Some("Not found: ab"));

        state.handle_key(Key::Char('W'), &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().cursor(), 3);
    }

    #[test]
    fn backspace_in_search_widens_the_match() {
        let keymap = KeyMap::dvorak();
        let mut state = session("ax ab");

        state.handle_key(Key::Char('s'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "ab");
        assert_eq!(state.buffer().unwrap().cursor(), 3);

        state.handle_key(Key::Backspace, &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().cursor(), 0);

        state.handle_key(Key::Ctrl('x'), &keymap).unwrap();
        assert_eq!(state.minibuffer.input(), "");
        assert_eq!(state.buffer().unwrap().cursor(), 0);
    }

    #[test]
    fn goto_line_previews_and_confirms() {
        let keymap = KeyMap::qwerty();
        let mut state = session("0\n1\n2\n3\n");

        state.handle_key(Key::Char('n'), &keymap).unwrap();
        assert_eq!(state.minibuffer.prompt.text(), "Line → ");
        type_keys(&mut state, &keymap, "2");
        assert_eq!(state.buffer().unwrap().cur_line(), 2);

        type_keys(&mut state, &keymap, "x");
        assert_eq!(state.buffer().unwrap().cur_line(), 0);

        state.handle_key(Key::Backspace, &keymap).unwrap();
        state.handle_key(Key::Enter, &keymap).unwrap();
        assert_eq!(state.mode, Mode::COMMAND);
        assert_eq!(state.buffer().unwrap().cursor(), 4);
    }

    #[test]
    fn deleted_line_can_be_pasted_back() {
        let keymap = KeyMap::dvorak();
        let mut state = session("first\nsecond\n");

        state.handle_key(Key::Char('q'), &keymap).unwrap();
        assert_eq!(state.clipboard, b"first\n");
        assert_eq!(state.buffer().unwrap().contents(), b"second\n");

        state.handle_key(Key::Char('t'), &keymap).unwrap();
        state.handle_key(Key::Char('k'), &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().contents(), b"second\nfirst\n");
    }

    #[test]
    fn selection_mode_follows_the_selection() {
        let keymap = KeyMap::dvorak();
        let mut state = session("hello world");

        state.handle_key(Key::Char('v'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::SELECTION);
        state.handle_key(Key::Char('r'), &keymap).unwrap();
        state.handle_key(Key::Char('q'), &keymap).unwrap();

        assert_eq!(state.mode, Mode::COMMAND);
        assert_eq!(state.clipboard, b"hello ");
        assert_eq!(state.buffer().unwrap().contents(), b"world");
    }

    #[test]
    fn escape_drops_the_selection() {
        let keymap = KeyMap::dvorak();
        let mut state = session("abc");

        state.handle_key(Key::Char('v'), &keymap).unwrap();
        state.handle_key(Key::Esc, &keymap).unwrap();

        assert_eq!(state.mode, Mode::COMMAND);
        assert!(!state.buffer().unwrap().selection().active);
    }

    #[test]
    fn open_below_and_above() {
        let keymap = KeyMap::dvorak();
        let mut state = session("  one\ntwo");

        state.handle_key(Key::Char('o'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::EDITING);
        type_keys(&mut state, &keymap, "x");
        assert_eq!(state.buffer().unwrap().contents(), b"  one\nx\ntwo");

        state.handle_key(Key::Esc, &keymap).unwrap();
        state.execute(Command::MoveBeginningOfBuffer).unwrap();
        state.handle_key(Key::Char('O'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "y");
        assert_eq!(state.buffer().unwrap().contents(), b"y\n  one\nx\ntwo");
    }

    #[test]
    fn insert_unicode_prompt() {
        let keymap = KeyMap::dvorak();
        let mut state = EditorState::new(10);

        state.handle_key(Key::Ctrl('u'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "20ac");
        state.handle_key(Key::Enter, &keymap).unwrap();
        assert_eq!(state.buffer().unwrap().contents(), "€".as_bytes());
        assert_eq!(state.mode, Mode::COMMAND);

        state.handle_key(Key::Ctrl('u'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "zz");
        state.handle_key(Key::Enter, &keymap).unwrap();
        assert_eq!(
            state.message.as_deref(),
            Some("Invalid unicode value: \"zz\"")
        );

        state.handle_key(Key::Ctrl('u'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "200000");
        state.handle_key(Key::Enter, &keymap).unwrap();
        assert!(state.message.is_some());
        assert_eq!(state.buffer().unwrap().used(), 3);
    }

    #[test]
    fn unicode_prompt_returns_to_editing() {
        let keymap = KeyMap::dvorak();
        let mut state = EditorState::new(10);
        state.mode = Mode::EDITING;

        state.handle_key(Key::Ctrl('u'), &keymap).unwrap();
        type_keys(&mut state, &keymap, "41");
        state.handle_key(Key::Enter, &keymap).unwrap();

        assert_eq!(state.mode, Mode::EDITING);
        assert_eq!(state.buffer().unwrap().contents(), b"A");
    }

    #[test]
    fn save_without_path_asks_for_one() {
        let mut state = EditorState::new(10);
        state.dispatch(Command::SaveBuffer).unwrap();

        assert_eq!(state.mode, Mode::MINIBUFFER);
        assert_eq!(state.minibuffer.prompt, Prompt::SaveAs);
    }

    #[test]
    fn loading_a_directory_reports_and_keeps_session() {
        let directory = tempfile::tempdir().unwrap();
        let mut state = EditorState::new(10);

        state.dispatch(Command::LoadBuffer).unwrap();
        for c in directory.path().to_string_lossy().chars() {
            state.last_key = Some(Key::Char(c));
            state.dispatch(Command::MinibufferInsertSelf).unwrap();
        }
        state.dispatch(Command::MinibufferDoAction).unwrap();

        assert!(state.message.as_deref().is_some_and(|m| m.contains("is a directory")));
        assert_eq!(state.buffers.len(), 1);
        assert_eq!(state.mode, Mode::COMMAND);
    }

    #[test]
    fn buffers_cycle_and_kill() {
        let mut state = EditorState::new(10);
        let first = state.active_id();
        let second = state.buffers.push(Buffer::from_bytes(b"two"));

        state.dispatch(Command::NextBuffer).unwrap();
        assert_eq!(state.active_id(), second);
        state.dispatch(Command::NextBuffer).unwrap();
        assert_eq!(state.active_id(), first);
        state.dispatch(Command::PreviousBuffer).unwrap();
        assert_eq!(state.active_id(), second);

        state.dispatch(Command::KillBuffer).unwrap();
        assert_eq!(state.active_id(), first);
        assert_eq!(state.buffers.len(), 1);

        state.dispatch(Command::KillBuffer).unwrap();
        assert_eq!(state.buffers.len(), 1);
        assert_ne!(state.active_id(), first);
        assert_eq!(state.buffer().unwrap().name, Buffer::DEFAULT_NAME);
    }

    #[test]
    fn switching_buffers_leaves_selection_mode() {
        let keymap = KeyMap::dvorak();
        let mut state = session("one");
        state.buffers.push(Buffer::from_bytes(b"two"));

        state.handle_key(Key::Char('v'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::SELECTION);

        state.handle_key(Key::Char(']'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::COMMAND);
        assert!(!state.buffer().unwrap().selection().active);

        state.handle_key(Key::Char('['), &keymap).unwrap();
        assert_eq!(state.mode, Mode::SELECTION);
        assert!(state.buffer().unwrap().selection().active);

        state.handle_key(Key::Ctrl('k'), &keymap).unwrap();
        assert_eq!(state.mode, Mode::COMMAND);
        assert_eq!(state.buffer().unwrap().contents(), b"two");
    }

    #[test]
    fn scrolling_follows_the_cursor() {
        let mut state = session(&"line\n".repeat(50));
        state.set_screen_height(10);

        state.dispatch(Command::MovePageDown).unwrap();
        assert_eq!(state.buffer().unwrap().cur_line(), 10);
        assert_eq!(state.screen_start, 1);

        state.dispatch(Command::Recenter).unwrap();
        assert_eq!(state.screen_start, 7);

        state.dispatch(Command::MoveBeginningOfBuffer).unwrap();
        assert_eq!(state.screen_start, 0);
    }

    #[test]
    fn recoverable_errors_become_messages() {
        let mut state = EditorState::new(10);
        state.buffer_mut().unwrap().path = Some(PathBuf::from("/nonexistent-dir/sub/file"));

        state.dispatch(Command::SaveBuffer).unwrap();

        assert!(state
            .message
            .as_deref()
            .is_some_and(|m| m.starts_with("Failed to save")));
        state.dispatch(Command::MoveForwardChar).unwrap();
        assert_eq!(state.message, None);
    }

    #[test]
    fn quit_sets_flag_from_any_mode() {
        let keymap = KeyMap::dvorak();
        let mut state = EditorState::new(10);
        state.handle_key(Key::Char('s'), &keymap).unwrap();
        state.handle_key(Key::Ctrl('q'), &keymap).unwrap();

        assert!(state.should_quit);
    }

    #[test]
    fn error_classification() {
        assert!(Error::Recoverable("x".to_string()).is_recoverable());
        assert!(Error::IsDirectory(PathBuf::from("/tmp")).is_recoverable());
        assert!(!Error::Unrecoverable("x".to_string()).is_recoverable());
        assert_eq!(
            Error::from(CodecError::OutOfRange(0x20_0000)).to_string(),
            "Codepoint U+200000 is outside the encodable range"
        );
    }
}
