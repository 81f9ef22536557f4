// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

pub mod buffer;
pub mod buffer_list;
pub mod codec;
pub mod command;
pub mod config;
pub mod display;
pub mod editor_state;
pub mod file_handle;
pub mod keymap;
pub mod minibuffer;
