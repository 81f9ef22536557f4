// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

//! A gap buffer implementation intended for use in the Mini text editor.
//!
//! [GapBuffer] keeps its elements in one contiguous allocation split by a movable gap of unused
//! slots. Inserting or removing at the gap costs only the elements written or dropped; moving the
//! gap somewhere else costs the distance it travels. Text editing hits the fast path almost all
//! the time because edits cluster around the cursor.

#![warn(missing_docs)]

pub use gap_buffer::*;

mod gap_buffer;
