// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::command::{Command, Mode};

/// A key press reduced to what the bindings distinguish.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Backspace,
    Delete,
    Esc,
    /// Only used in bindings. Matches any printable [Key::Char].
    Any,
}

impl Key {
    pub const CONTROL_PREFIX: &'static str = "C+";

    pub const ENTER_NAME: &'static str = "Enter";
    pub const BACKSPACE_NAME: &'static str = "Backspace";
    pub const DELETE_NAME: &'static str = "Delete";
    pub const ESC_NAME: &'static str = "Esc";
    pub const ANY_NAME: &'static str = "Any";

    fn matches(&self, pressed: &Key) -> bool {
        self == pressed || (*self == Key::Any && matches!(pressed, Key::Char(_)))
    }
}

impl TryFrom<KeyEvent> for Key {
    type Error = String;

    fn try_from(event: KeyEvent) -> Result<Self, Self::Error> {
        if event.kind == KeyEventKind::Release {
            return Err("Key release events are not bound".to_string());
        }

        match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(Key::Ctrl(c.to_ascii_lowercase()))
            }
            KeyCode::Char(c) => Ok(Key::Char(c)),
            KeyCode::Tab => Ok(Key::Char('\t')),
            KeyCode::Enter => Ok(Key::Enter),
            KeyCode::Backspace => Ok(Key::Backspace),
            KeyCode::Delete => Ok(Key::Delete),
            KeyCode::Esc => Ok(Key::Esc),
            code => Err(format!("No binding possible for key code: {:?}", code)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.escape_debug()),
            Key::Ctrl(c) => write!(f, "{}{}", Self::CONTROL_PREFIX, c),
            Key::Enter => f.write_str(Self::ENTER_NAME),
            Key::Backspace => f.write_str(Self::BACKSPACE_NAME),
            Key::Delete => f.write_str(Self::DELETE_NAME),
            Key::Esc => f.write_str(Self::ESC_NAME),
            Key::Any => f.write_str(Self::ANY_NAME),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    #[default]
    Dvorak,
    Qwerty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    pub modes: Mode,
    pub command: Command,
}

const fn bind(key: Key, modes: Mode, command: Command) -> Binding {
    Binding {
        key,
        modes,
        command,
    }
}

/// Ordered binding table. The first row whose key matches and whose mode mask intersects the
/// current mode wins.
#[derive(Clone, Debug)]
pub struct KeyMap {
    bindings: Vec<Binding>,
}

impl KeyMap {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Dvorak => Self::dvorak(),
            Layout::Qwerty => Self::qwerty(),
        }
    }

    pub fn lookup(&self, key: Key, mode: Mode) -> Option<Command> {
        self.bindings
            .iter()
            .find(|binding| binding.key.matches(&key) && binding.modes.intersects(mode))
            .map(|binding| binding.command)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn dvorak() -> Self {
        Self::with_layout_keys(LayoutKeys {
            forward_char: 'n',
            backward_char: 'h',
            forward_word: 'r',
            backward_word: 'g',
            forward_line: 't',
            backward_line: 'c',
            beginning_of_line: 'H',
            end_of_line: 'N',
            page_up: 'C',
            page_down: 'T',
            beginning_of_buffer: 'f',
            end_of_buffer: 'd',
            forward_bracket: 'R',
            backward_bracket: 'G',
            goto_line: 'b',
            open_below: 'o',
            open_above: 'O',
            delete_forward_char: 'u',
            delete_backward_char: 'e',
            delete_forward_word: 'p',
            delete_backward_word: '.',
            delete_selection_or_line: 'q',
            clear: 'Q',
            paste: 'k',
            toggle_selection: 'v',
            search_forward: 's',
            search_backward: 'S',
            next_search: 'w',
            previous_search: 'W',
        })
    }

    pub fn qwerty() -> Self {
        Self::with_layout_keys(LayoutKeys {
            forward_char: 'l',
            backward_char: 'j',
            forward_word: 'o',
            backward_word: 'u',
            forward_line: 'k',
            backward_line: 'i',
            beginning_of_line: 'J',
            end_of_line: 'L',
            page_up: 'I',
            page_down: 'K',
            beginning_of_buffer: 'y',
            end_of_buffer: 'h',
            forward_bracket: 'O',
            backward_bracket: 'U',
            goto_line: 'n',
            open_below: 's',
            open_above: 'S',
            delete_forward_char: 'f',
            delete_backward_char: 'd',
            delete_forward_word: 'r',
            delete_backward_word: 'e',
            delete_selection_or_line: 'x',
            clear: 'X',
            paste: 'v',
            toggle_selection: '.',
            search_forward: ';',
            search_backward: ':',
            next_search: ',',
            previous_search: '<',
        })
    }

    fn with_layout_keys(keys: LayoutKeys) -> Self {
        let navigation = Mode::COMMAND | Mode::SELECTION;

        Self::new(vec![
            bind(Key::Char(keys.forward_char), navigation, Command::MoveForwardChar),
            bind(Key::Char(keys.backward_char), navigation, Command::MoveBackwardChar),
            bind(Key::Char(keys.forward_word), navigation, Command::MoveForwardWord),
            bind(Key::Char(keys.backward_word), navigation, Command::MoveBackwardWord),
            bind(Key::Char(keys.forward_line), navigation, Command::MoveForwardLine),
            bind(Key::Char(keys.backward_line), navigation, Command::MoveBackwardLine),
            bind(Key::Char(keys.beginning_of_line), navigation, Command::MoveBeginningOfLine),
            bind(Key::Char(keys.end_of_line), navigation, Command::MoveEndOfLine),
            bind(Key::Char(keys.page_up), navigation, Command::MovePageUp),
            bind(Key::Char(keys.page_down), navigation, Command::MovePageDown),
            bind(Key::Char(keys.beginning_of_buffer), navigation, Command::MoveBeginningOfBuffer),
            bind(Key::Char(keys.end_of_buffer), navigation, Command::MoveEndOfBuffer),
            bind(Key::Char(keys.forward_bracket), navigation, Command::MoveForwardBracket),
            bind(Key::Char(keys.backward_bracket), navigation, Command::MoveBackwardBracket),
            bind(Key::Char(keys.goto_line), navigation, Command::GotoLine),
            bind(Key::Ctrl('u'), Mode::COMMAND | Mode::EDITING, Command::InsertUnicode),
            bind(Key::Char(keys.open_below), Mode::COMMAND, Command::OpenBelow),
            bind(Key::Char(keys.open_above), Mode::COMMAND, Command::OpenAbove),
            bind(Key::Delete, Mode::ALL_BASIC, Command::DeleteForwardChar),
            bind(Key::Char(keys.delete_forward_char), Mode::COMMAND, Command::DeleteForwardChar),
            bind(Key::Backspace, Mode::ALL_BASIC, Command::DeleteBackwardChar),
            bind(Key::Char(keys.delete_backward_char), Mode::COMMAND, Command::DeleteBackwardChar),
            bind(Key::Char(keys.delete_forward_word), Mode::COMMAND, Command::DeleteForwardWord),
            bind(Key::Char(keys.delete_backward_word), Mode::COMMAND, Command::DeleteBackwardWord),
            bind(
                Key::Char(keys.delete_selection_or_line),
                navigation,
                Command::DeleteSelectionOrLine,
            ),
            bind(Key::Char(keys.clear), Mode::COMMAND, Command::Clear),
            bind(Key::Char(keys.paste), Mode::COMMAND, Command::Paste),
            bind(Key::Char(keys.toggle_selection), navigation, Command::ToggleSelectionMode),
            bind(Key::Esc, Mode::ALL_BASIC, Command::CommandMode),
            bind(Key::Enter, Mode::COMMAND, Command::EditingMode),
            bind(Key::Ctrl('s'), Mode::ALL_BASIC, Command::SaveBuffer),
            bind(Key::Ctrl('w'), Mode::ALL_BASIC, Command::WriteBuffer),
            bind(Key::Ctrl('o'), Mode::ALL_BASIC, Command::LoadBuffer),
            bind(Key::Ctrl('k'), Mode::ALL_BASIC, Command::KillBuffer),
            bind(Key::Ctrl('q'), Mode::ALL, Command::Quit),
            bind(Key::Char(']'), navigation, Command::NextBuffer),
            bind(Key::Char('['), navigation, Command::PreviousBuffer),
            bind(Key::Ctrl('l'), Mode::ALL_BASIC, Command::Recenter),
            bind(Key::Char(keys.search_forward), Mode::COMMAND, Command::SearchForward),
            bind(Key::Char(keys.search_backward), Mode::COMMAND, Command::SearchBackward),
            bind(Key::Char(keys.next_search), Mode::COMMAND, Command::GotoNextSearch),
            bind(Key::Char(keys.previous_search), Mode::COMMAND, Command::GotoPreviousSearch),
            bind(Key::Enter, Mode::EDITING, Command::InsertNewline),
            bind(Key::Any, Mode::EDITING, Command::InsertSelf),
            bind(Key::Enter, Mode::MINIBUFFER, Command::MinibufferDoAction),
            bind(Key::Backspace, Mode::MINIBUFFER, Command::MinibufferDeleteBackwardChar),
            bind(Key::Ctrl('x'), Mode::MINIBUFFER, Command::MinibufferClear),
            bind(Key::Esc, Mode::MINIBUFFER, Command::MinibufferCancel),
            bind(Key::Any, Mode::MINIBUFFER, Command::MinibufferInsertSelf),
        ])
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::for_layout(Layout::default())
    }
}

/// The layout specific keys. Control keys and the minibuffer bindings are shared.
struct LayoutKeys {
    forward_char: char,
    backward_char: char,
    forward_word: char,
    backward_word: char,
    forward_line: char,
    backward_line: char,
    beginning_of_line: char,
    end_of_line: char,
    page_up: char,
    page_down: char,
    beginning_of_buffer: char,
    end_of_buffer: char,
    forward_bracket: char,
    backward_bracket: char,
    goto_line: char,
    open_below: char,
    open_above: char,
    delete_forward_char: char,
    delete_backward_char: char,
    delete_forward_word: char,
    delete_backward_word: char,
    delete_selection_or_line: char,
    clear: char,
    paste: char,
    toggle_selection: char,
    search_forward: char,
    search_backward: char,
    next_search: char,
    previous_search: char,
}
