// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind, Write},
    path::Path,
};

use crate::editor_state::{Error, Result};

/// Destination for buffer contents. The spans are written back to back, in order.
pub trait FileWrite {
    fn write_file(&mut self, spans: &[&[u8]]) -> io::Result<()>;
}

/// A file on disk that buffers are saved to.
pub struct FileHandle {
    pub path: Box<Path>,
}

impl FileHandle {
    pub fn new(path: &Path) -> Self {
        Self {
            path: Box::from(path),
        }
    }
}

impl FileWrite for FileHandle {
    fn write_file(&mut self, spans: &[&[u8]]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        for span in spans {
            file.write_all(span)?;
        }
        file.flush()
    }
}

/// Opens `path` for loading. A missing file is not an error and gives None; anything that is
/// not a regular file is refused.
pub fn open_for_load(path: &Path) -> Result<Option<File>> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Load {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if metadata.is_dir() {
        return Err(Error::IsDirectory(path.to_path_buf()));
    }
    if !metadata.is_file() {
        return Err(Error::UnsupportedFileType(path.to_path_buf()));
    }

    File::open(path).map(Some).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}
