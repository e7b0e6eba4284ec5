//! Interactive numbered directory browser.
//!
//! Each iteration re-reads the current directory, draws it as a numbered
//! listing and interprets one command token against that listing only.

use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ansi::{Color, Style};
use crate::console::Console;
use crate::files;
use crate::timer::Stopwatch;

#[derive(Clone, Copy, Debug)]
pub struct BrowseOptions {
    /// Enables the `d` command, which returns the current directory.
    pub allow_dir_select: bool,
    /// Directories first, then by name. Off by default: the platform's
    /// enumeration order is kept.
    pub sort_entries: bool,
    pub show_hidden: bool,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            allow_dir_select: false,
            sort_entries: false,
            show_hidden: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum NavError {
    #[error("cannot read directory {path}: {source}")]
    Enumerate {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create file {path}: {source}")]
    Create {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid file name `{0}`")]
    InvalidName(String),
    #[error("the file does not exist: {0}")]
    Missing(Utf8PathBuf),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    fn tag(&self) -> &'static str {
        match self {
            EntryKind::Directory => "(Dir)",
            EntryKind::File => "(File)",
        }
    }

    fn style(&self) -> Style {
        match self {
            EntryKind::Directory => Style::bold(Color::Blue),
            EntryKind::File => Style::bold(Color::Green),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub index: usize,
    pub kind: EntryKind,
    pub name: String,
}

/// Snapshot of one directory as it was drawn. Indices are only meaningful
/// against the listing that produced them.
#[derive(Debug, Default)]
pub struct Listing {
    entries: Vec<Entry>,
}

impl Listing {
    pub fn read(dir: &Utf8Path, options: &BrowseOptions) -> Result<Self, NavError> {
        let enumerate_err = |source| NavError::Enumerate {
            path: dir.to_owned(),
            source,
        };

        let mut found: Vec<(EntryKind, String)> = fs::read_dir(dir)
            .map_err(enumerate_err)?
            .filter_map(|item| classify(dir, item, options))
            .collect();

        if options.sort_entries {
            found.sort();
        }

        let entries = found
            .into_iter()
            .enumerate()
            .map(|(idx, (kind, name))| Entry {
                index: idx + 1,
                kind,
                name,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        index
            .checked_sub(1)
            .and_then(|position| self.entries.get(position))
    }
}

/// Kind and name of one enumerated child, or `None` when it is skipped.
fn classify(
    dir: &Utf8Path,
    item: io::Result<fs::DirEntry>,
    options: &BrowseOptions,
) -> Option<(EntryKind, String)> {
    let item = match item {
        Ok(item) => item,
        Err(err) => {
            warn!(dir = %dir, error = %err, "skipping unreadable entry");
            return None;
        }
    };
    let name = match item.file_name().into_string() {
        Ok(name) => name,
        Err(raw) => {
            warn!(dir = %dir, name = ?raw, "skipping entry with non UTF-8 name");
            return None;
        }
    };
    if !options.show_hidden && name.starts_with('.') {
        return None;
    }
    // Follow symlinks so a link to a directory can be entered.
    let kind = if item.path().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    Some((kind, name))
}

/// One parsed command token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Exit,
    Back,
    Create,
    SelectCurrent,
    Pick(usize),
    Unknown,
}

impl Command {
    pub fn parse(token: &str, options: &BrowseOptions) -> Self {
        match token {
            "0" => Command::Exit,
            "b" => Command::Back,
            "c" => Command::Create,
            "d" if options.allow_dir_select => Command::SelectCurrent,
            other => parse_index(other).map_or(Command::Unknown, Command::Pick),
        }
    }
}

/// Only the canonical decimal spelling selects an entry: `"3"`, not `"03"`.
fn parse_index(token: &str) -> Option<usize> {
    let index = token.parse::<usize>().ok()?;
    (index > 0 && index.to_string() == token).then_some(index)
}

#[derive(Debug, Eq, PartialEq)]
pub enum Step {
    Continue,
    Finished(Option<Utf8PathBuf>),
}

#[derive(Debug)]
struct Notice {
    text: String,
    style: Style,
}

impl Notice {
    fn error(err: &NavError) -> Self {
        Self {
            text: format!("ERROR: {err}"),
            style: Style::bold(Color::Red),
        }
    }

    fn info(text: String) -> Self {
        Self {
            text,
            style: Style::color(Color::Green),
        }
    }
}

pub struct Navigator {
    current: Utf8PathBuf,
    options: BrowseOptions,
    notice: Option<Notice>,
}

impl Navigator {
    pub fn new(start: Utf8PathBuf, options: BrowseOptions) -> Self {
        Self {
            current: start,
            options,
            notice: None,
        }
    }

    pub fn current(&self) -> &Utf8Path {
        &self.current
    }

    /// Run one browsing session. `None` means the operator left without
    /// selecting anything.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Option<Utf8PathBuf>> {
        let mut stopwatch = Stopwatch::started();

        let selection = loop {
            let listing = match Listing::read(&self.current, &self.options) {
                Ok(listing) => {
                    debug!(dir = %self.current, entries = listing.len(), "listed directory");
                    listing
                }
                Err(err) => match self.retreat(err) {
                    Ok(()) => continue,
                    Err(err) => {
                        let notice = Notice::error(&err);
                        console.println(&notice.text, notice.style)?;
                        break None;
                    }
                },
            };

            self.render(console, &listing)?;

            let Some(token) = console.read_token()? else {
                debug!("input closed; leaving browser");
                break None;
            };

            match self.dispatch(console, &listing, &token)? {
                Step::Continue => {}
                Step::Finished(selection) => break selection,
            }
        };

        stopwatch.stop();
        let elapsed = stopwatch.take_elapsed_secs().unwrap_or_default();
        match &selection {
            Some(path) => info!(selection = %path, elapsed_secs = elapsed, "browser session finished"),
            None => info!(elapsed_secs = elapsed, "browser session cancelled"),
        }
        Ok(selection)
    }

    /// Move to the parent after a failed read. At a root there is nowhere
    /// left to go and the error is handed back.
    fn retreat(&mut self, err: NavError) -> Result<(), NavError> {
        warn!(error = %err, "directory listing failed");
        let Some(parent) = parent_of(&self.current) else {
            return Err(err);
        };
        self.current = parent;
        self.notice = Some(Notice::error(&err));
        Ok(())
    }

    fn render<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        listing: &Listing,
    ) -> Result<()> {
        console.clear()?;
        console.println("DIRS / FILES:\n", Style::bold(Color::Blue))?;
        if let Some(notice) = self.notice.take() {
            console.println(&notice.text, notice.style)?;
            console.println("", Style::PLAIN)?;
        }

        if listing.is_empty() {
            console.println("(empty)", Style::color(Color::Yellow))?;
        }
        for entry in listing.entries() {
            console.print_text(&format!("{}.", entry.index), Style::color(Color::Red), " ")?;
            console.print_text(entry.kind.tag(), entry.kind.style(), "\t")?;
            console.println(&entry.name, Style::PLAIN)?;
        }

        let menu = Style::bold(Color::Red);
        console.print_text("\nCURRENT_DIR:", menu, " ")?;
        console.print_text(self.current.as_str(), Style::bold(Color::Blue), "\n\n")?;
        console.println("b. BACK", menu)?;
        console.println("c. CREATE FILE", menu)?;
        if self.options.allow_dir_select {
            console.println("d. SELECT CURRENT DIRECTORY", menu)?;
        }
        console.println("0. EXIT\n", menu)?;
        console.prompt("Select menu item:", Style::color(Color::Green))
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        listing: &Listing,
        token: &str,
    ) -> Result<Step> {
        let command = Command::parse(token, &self.options);
        debug!(?command, token, dir = %self.current, "dispatching");

        match command {
            Command::Exit => Ok(Step::Finished(None)),
            Command::Back => {
                if let Some(parent) = parent_of(&self.current) {
                    self.current = parent;
                }
                Ok(Step::Continue)
            }
            Command::Create => {
                console.prompt("\nEnter filename:", Style::color(Color::Blue))?;
                let Some(name) = console.read_token()? else {
                    return Ok(Step::Finished(None));
                };
                self.notice = Some(match create_file(&self.current, &name) {
                    Ok(path) => {
                        info!(path = %path, "created file");
                        Notice::info(format!("Created {path}"))
                    }
                    Err(err) => {
                        warn!(error = %err, "file creation failed");
                        Notice::error(&err)
                    }
                });
                Ok(Step::Continue)
            }
            Command::SelectCurrent => Ok(Step::Finished(Some(self.current.clone()))),
            Command::Pick(index) => {
                let Some(entry) = listing.get(index) else {
                    return Ok(Step::Continue);
                };
                let target = self.current.join(&entry.name);
                match entry.kind {
                    EntryKind::Directory => {
                        self.current = target;
                        Ok(Step::Continue)
                    }
                    EntryKind::File if target.is_file() => Ok(Step::Finished(Some(target))),
                    EntryKind::File => {
                        self.notice = Some(Notice::error(&NavError::Missing(target)));
                        Ok(Step::Continue)
                    }
                }
            }
            Command::Unknown => Ok(Step::Continue),
        }
    }
}

fn parent_of(path: &Utf8Path) -> Option<Utf8PathBuf> {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .map(Utf8Path::to_path_buf)
}

/// Create an empty file named `name` inside `dir`. Existing files are left
/// untouched and reported as an error.
pub fn create_file(dir: &Utf8Path, name: &str) -> Result<Utf8PathBuf, NavError> {
    if name.is_empty() || name == "." || name == ".." || name.chars().any(std::path::is_separator)
    {
        return Err(NavError::InvalidName(name.to_owned()));
    }

    let path = dir.join(name);
    files::create_new(&path).map_err(|source| NavError::Create {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
