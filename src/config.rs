use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::console::ConsoleOptions;
use crate::navigator::BrowseOptions;
use crate::templates;

const CONFIG_DIR: &str = ".ctools";
const CONFIG_FILE: &str = "config.toml";
const EXAMPLE_TEMPLATE: &str = "config/example.config.toml";

/// Root configuration document, `~/.ctools/config.toml` by default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    #[serde(default)]
    pub console: ConsoleSection,
    #[serde(default)]
    pub browser: BrowserSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    pub color: Option<bool>,
    pub clear_screen: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserSection {
    pub start_dir: Option<Utf8PathBuf>,
    pub allow_dir_select: Option<bool>,
    pub sort_entries: Option<bool>,
    pub show_hidden: Option<bool>,
}

impl ToolsConfig {
    pub fn console_options(&self) -> ConsoleOptions {
        let defaults = ConsoleOptions::default();
        ConsoleOptions {
            color: self.console.color.unwrap_or(defaults.color),
            clear_screen: self.console.clear_screen.unwrap_or(defaults.clear_screen),
        }
    }

    pub fn browse_options(&self) -> BrowseOptions {
        let defaults = BrowseOptions::default();
        let browser = &self.browser;
        BrowseOptions {
            allow_dir_select: browser.allow_dir_select.unwrap_or(defaults.allow_dir_select),
            sort_entries: browser.sort_entries.unwrap_or(defaults.sort_entries),
            show_hidden: browser.show_hidden.unwrap_or(defaults.show_hidden),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigPathSource,
}

/// Pick the config file: explicit path, then the nearest `.ctools/config.toml`
/// at or above `start`, then the one in the home directory.
pub fn resolve_path(explicit: Option<&Utf8Path>, start: &Utf8Path) -> Result<ResolvedConfigPath> {
    if let Some(path) = explicit {
        return Ok(ResolvedConfigPath {
            path: path.to_owned(),
            source: ConfigPathSource::Explicit,
        });
    }

    if let Some(path) = discover(start) {
        return Ok(ResolvedConfigPath {
            path,
            source: ConfigPathSource::Discovered,
        });
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("unable to determine home directory"))?;
    let home = Utf8PathBuf::from_path_buf(home)
        .map_err(|_| anyhow!("home directory is not valid UTF-8"))?;
    Ok(ResolvedConfigPath {
        path: home.join(CONFIG_DIR).join(CONFIG_FILE),
        source: ConfigPathSource::HomeDefault,
    })
}

fn discover(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<ToolsConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// Like [`load_from_path`], but a missing file yields the defaults.
pub fn load_or_default(path: &Utf8Path) -> Result<ToolsConfig> {
    if !path.exists() {
        tracing::debug!(%path, "no config file; using defaults");
        return Ok(ToolsConfig::default());
    }
    load_from_path(path)
}

pub fn write_example_config(path: &Utf8Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }

    templates::write_template(path, EXAMPLE_TEMPLATE)
}

pub fn format_summary(config: &ToolsConfig) -> String {
    let mut out = String::new();
    let console = config.console_options();
    let browse = config.browse_options();
    let start_dir = config
        .browser
        .start_dir
        .as_ref()
        .map_or("<working directory>", |dir| dir.as_str());

    let _ = writeln!(out, "Console: color={}, clear_screen={}", console.color, console.clear_screen);
    let _ = writeln!(out, "Browser start: {}", start_dir);
    let _ = writeln!(
        out,
        "Browser: allow_dir_select={}, sort_entries={}, show_hidden={}",
        browse.allow_dir_select, browse.sort_entries, browse.show_hidden
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: ToolsConfig = toml::from_str("").unwrap();
        let browse = config.browse_options();
        assert!(!browse.allow_dir_select);
        assert!(!browse.sort_entries);
        assert!(browse.show_hidden);
        let console = config.console_options();
        assert!(console.color);
        assert!(console.clear_screen);
    }

    #[test]
    fn sections_override_defaults() {
        let raw = r#"
[console]
color = false

[browser]
start_dir = "/srv"
sort_entries = true
show_hidden = false
"#;
        let config: ToolsConfig = toml::from_str(raw).unwrap();
        assert!(!config.console_options().color);
        assert!(config.console_options().clear_screen);
        let browse = config.browse_options();
        assert!(browse.sort_entries);
        assert!(!browse.show_hidden);
        assert_eq!(config.browser.start_dir.as_deref(), Some(Utf8Path::new("/srv")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<ToolsConfig>("[browser]\nsort = true\n").unwrap_err();
        assert!(err.to_string().contains("sort"));
    }

    #[test]
    fn resolve_prefers_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let root = utf8_root(&tmp);
        let explicit = root.join("mine.toml");
        let resolved = resolve_path(Some(explicit.as_path()), &root).unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Explicit);
        assert_eq!(resolved.path, explicit);
    }

    #[test]
    fn resolve_finds_nearest_ancestor_config() {
        let tmp = TempDir::new().unwrap();
        let root = utf8_root(&tmp);
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(root.join(CONFIG_DIR)).unwrap();
        fs::write(root.join(CONFIG_DIR).join(CONFIG_FILE), "").unwrap();

        let resolved = resolve_path(None, &nested).unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Discovered);
        assert_eq!(resolved.path, root.join(".ctools").join("config.toml"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let root = utf8_root(&tmp);
        let config = load_or_default(&root.join("absent.toml")).unwrap();
        assert!(config.browser.start_dir.is_none());
    }

    #[test]
    fn generated_example_parses_and_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let target = utf8_root(&tmp).join("nested").join("config.toml");
        write_example_config(&target, false).unwrap();

        let config = load_from_path(&target).unwrap();
        assert!(format_summary(&config).contains("sort_entries=false"));

        let err = write_example_config(&target, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        write_example_config(&target, true).unwrap();
    }
}
