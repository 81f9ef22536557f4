// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use crate::buffer::{Buffer, CursorPosition, Direction};

/// What the minibuffer is currently asking for. Variants carrying an `origin` preview their
/// effect on the edited buffer while typing and return to `origin` on cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Prompt {
    #[default]
    None,
    GotoLine {
        origin: CursorPosition,
    },
    Search {
        direction: Direction,
        origin: CursorPosition,
    },
    InsertUnicode,
    LoadFile,
    SaveAs,
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::None => "",
            Prompt::GotoLine { .. } => "Line → ",
            Prompt::Search {
                direction: Direction::Forward,
                ..
            } => "Search → ",
            Prompt::Search {
                direction: Direction::Backward,
                ..
            } => "Search ← ",
            Prompt::InsertUnicode => "Unicode U+",
            Prompt::LoadFile => "Load file: ",
            Prompt::SaveAs => "Save as: ",
        }
    }

    pub fn origin(&self) -> Option<CursorPosition> {
        match self {
            Prompt::GotoLine { origin } | Prompt::Search { origin, .. } => Some(*origin),
            _ => None,
        }
    }
}

/// The one-line input area. Its text lives in an ordinary [Buffer].
#[derive(Debug, Default)]
pub struct Minibuffer {
    pub buffer: Buffer,
    pub prompt: Prompt,
}

impl Minibuffer {
    /// Starts a fresh prompt with empty input.
    pub fn open(&mut self, prompt: Prompt) {
        self.buffer.clear();
        self.buffer.modified = false;
        self.prompt = prompt;
    }

    /// Ends the prompt and hands back what it was together with the typed input.
    pub fn close(&mut self) -> (Prompt, String) {
        let input = self.input();
        self.buffer.clear();
        (std::mem::take(&mut self.prompt), input)
    }

    pub fn is_open(&self) -> bool {
        self.prompt != Prompt::None
    }

    pub fn input(&self) -> String {
        String::from_utf8_lossy(&self.buffer.contents()).into_owned()
    }
}
