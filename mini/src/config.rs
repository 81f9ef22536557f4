// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::{
    fs::{self, OpenOptions},
    io,
    path::PathBuf,
    sync::Mutex,
};

use clap::Parser;
use etcetera::BaseStrategy;
use tracing_subscriber::EnvFilter;

use crate::keymap::Layout;

/// A small modal text editor.
#[derive(Parser, Debug)]
#[command(name = "mini", version)]
pub struct Args {
    /// Files to open, one buffer each. Missing files start out empty.
    pub files: Vec<PathBuf>,

    /// Keyboard layout the command-mode bindings are placed for.
    #[arg(long, value_enum, default_value_t = Layout::Dvorak)]
    pub layout: Layout,

    /// Where to write the log. Defaults to mini/mini.log in the user cache directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn log_path(&self) -> io::Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

pub fn default_log_path() -> io::Result<PathBuf> {
    let strategy = etcetera::choose_base_strategy()
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))?;

    Ok(strategy.cache_dir().join("mini").join("mini.log"))
}

/// Installs the global subscriber. The terminal belongs to the editor, so everything goes to
/// the log file.
pub fn init_logging(args: &Args) -> io::Result<()> {
    let path = args.log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_new(&args.log_level)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
