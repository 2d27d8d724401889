use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::Screen;

const APP_DIR: &str = "memopad";
const LOCAL_RC: &str = ".memopadrc";

/// Options that can be persisted in a flags file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub data: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub screen: Option<Screen>,
    pub wrap_width: Option<u16>,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            data: other.data.clone().or_else(|| self.data.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            screen: other.screen.or(self.screen),
            wrap_width: other.wrap_width.or(self.wrap_width),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join(APP_DIR));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(APP_DIR),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(APP_DIR));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(|| PathBuf::from(LOCAL_RC), |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_RC)
}

/// Default location of the data file when `--data` is not given.
pub fn default_data_path() -> PathBuf {
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("memopad.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join(APP_DIR)
                .join("memopad.json");
        }
    }

    config_dir().map_or_else(
        || PathBuf::from("memopad.json"),
        |dir| dir.join("memopad.json"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# memopad defaults (saved with --save)".to_string()];
    if let Some(data) = &flags.data {
        lines.push(format!("--data {}", data.display()));
    }
    if let Some(log_file) = &flags.log_file {
        lines.push(format!("--log-file {}", log_file.display()));
    }
    if let Some(screen) = flags.screen {
        lines.push(format!("--screen {}", screen.as_flag()));
    }
    if let Some(width) = flags.wrap_width {
        lines.push(format!("--wrap-width {width}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from a token list, ignoring everything else.
///
/// Accepts both `--flag value` and `--flag=value`. Unparseable values are
/// dropped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        if !matches!(name, "--data" | "--log-file" | "--screen" | "--wrap-width") {
            i += 1;
            continue;
        }

        let value = match inline_value {
            Some(value) => Some(value),
            None => {
                i += 1;
                tokens.get(i).map(String::as_str)
            }
        };
        if let Some(value) = value {
            match name {
                "--data" => flags.data = Some(PathBuf::from(value)),
                "--log-file" => flags.log_file = Some(PathBuf::from(value)),
                "--screen" => flags.screen = Screen::from_flag(value),
                _ => flags.wrap_width = value.parse().ok().filter(|w| *w > 0),
            }
        }
        i += 1;
    }
    flags
}
