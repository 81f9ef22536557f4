// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use bitflags::bitflags;

bitflags! {
    /// Editor modes. A session is in exactly one of them; keymap rows use unions as masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Mode: u8 {
        const COMMAND = 1;
        const EDITING = 1 << 1;
        const SELECTION = 1 << 2;
        const MINIBUFFER = 1 << 3;

        const ALL_BASIC = Self::COMMAND.bits() | Self::EDITING.bits() | Self::SELECTION.bits();
        const ALL = Self::ALL_BASIC.bits() | Self::MINIBUFFER.bits();
    }
}

impl Mode {
    /// Short tag shown at the start of the status line.
    pub fn indicator(&self) -> &'static str {
        if self.contains(Mode::MINIBUFFER) {
            "[M]"
        } else if self.contains(Mode::SELECTION) {
            "[S]"
        } else if self.contains(Mode::EDITING) {
            "[E]"
        } else {
            "[C]"
        }
    }
}

/// Every operation a key can be bound to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    MoveForwardChar,
    MoveBackwardChar,
    MoveForwardWord,
    MoveBackwardWord,
    MoveForwardLine,
    MoveBackwardLine,
    MoveBeginningOfLine,
    MoveEndOfLine,
    MovePageUp,
    MovePageDown,
    MoveBeginningOfBuffer,
    MoveEndOfBuffer,
    MoveForwardBracket,
    MoveBackwardBracket,
    GotoLine,

    InsertNewline,
    InsertSelf,
    InsertUnicode,
    OpenBelow,
    OpenAbove,

    DeleteForwardChar,
    DeleteBackwardChar,
    DeleteForwardWord,
    DeleteBackwardWord,
    DeleteSelectionOrLine,
    Clear,
    Paste,

    ToggleSelectionMode,
    CommandMode,
    EditingMode,

    SaveBuffer,
    WriteBuffer,
    LoadBuffer,
    KillBuffer,
    NextBuffer,
    PreviousBuffer,
    Recenter,
    Quit,

    SearchForward,
    SearchBackward,
    GotoNextSearch,
    GotoPreviousSearch,

    MinibufferDoAction,
    MinibufferDeleteBackwardChar,
    MinibufferClear,
    MinibufferCancel,
    MinibufferInsertSelf,
}
