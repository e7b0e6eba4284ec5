//! Whole-file text helpers behind `ctools file`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};

/// A path together with the text stored at it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextFile {
    pub path: Utf8PathBuf,
    pub text: String,
}

impl TextFile {
    pub fn new(path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Open `path` for writing only if nothing exists there yet.
pub fn create_new(path: &Utf8Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

pub fn read_file(path: &Utf8Path) -> Result<TextFile> {
    if path.is_dir() {
        bail!("{} is a directory", path);
    }
    let text = fs::read_to_string(path).with_context(|| format!("cannot open file {}", path))?;
    Ok(TextFile::new(path.to_owned(), text))
}

/// Append `text` to a file that already exists. Missing files are not created.
pub fn append_file(path: &Utf8Path, text: &str) -> Result<()> {
    if !path.is_file() {
        bail!("cannot append to {}: not an existing file", path);
    }
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open file {}", path))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("writing to {}", path))
}

/// Create `file.path` holding `file.text`. An existing file is left untouched.
pub fn create_file_with(file: &TextFile) -> Result<()> {
    let mut handle =
        create_new(&file.path).with_context(|| format!("cannot create file {}", file.path))?;
    handle
        .write_all(file.text.as_bytes())
        .with_context(|| format!("writing to {}", file.path))?;
    tracing::debug!(path = %file.path, bytes = file.text.len(), "created file");
    Ok(())
}
