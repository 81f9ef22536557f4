// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::io;

use clap::Parser;
use crossterm::{
    event::{read, Event},
    terminal,
};
use mini_lib::{
    config::{self, Args},
    display::Display,
    editor_state::EditorState,
    keymap::{Key, KeyMap},
};

fn main() -> io::Result<()> {
    let args = Args::parse();
    config::init_logging(&args)?;

    let keymap = KeyMap::for_layout(args.layout);
    let (_, rows) = terminal::size()?;
    let mut editor_state = EditorState::open(&args.files, Display::text_rows(rows))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let stdout = io::stdout();
    let mut display = Display::new(stdout)?;
    display.render(&editor_state)?;

    loop {
        match read()? {
            Event::Key(event) => {
                let Ok(key) = Key::try_from(event) else {
                    continue;
                };
                editor_state
                    .handle_key(key, &keymap)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            }
            Event::Resize(_, rows) => editor_state.set_screen_height(Display::text_rows(rows)),
            _ => continue,
        }

        if editor_state.should_quit {
            break;
        }

        display.render(&editor_state)?;
    }

    tracing::info!("Exiting");
    Ok(())
}
