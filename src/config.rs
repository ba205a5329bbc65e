use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Saved command-line defaults, loaded from `.pixseekrc` files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_images: bool,
    pub force_half_cell: bool,
    pub perf: bool,
    pub per_page: Option<u32>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` (typically the CLI) wins for options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_images: self.no_images || other.no_images,
            force_half_cell: self.force_half_cell || other.force_half_cell,
            perf: self.perf || other.perf,
            per_page: other.per_page.or(self.per_page),
            endpoint: other.endpoint.clone().or_else(|| self.endpoint.clone()),
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pixseek").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pixseek")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pixseek").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("pixseek")
                .join("config");
        }
    }

    PathBuf::from(".pixseekrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".pixseekrc")
}

/// Load flags from a token file; missing files yield defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
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

/// Persist flags as a token file.
///
/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# pixseek defaults (saved with --save)".to_string());
    if flags.no_images {
        lines.push("--no-images".to_string());
    }
    if flags.force_half_cell {
        lines.push("--force-half-cell".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(per_page) = flags.per_page {
        lines.push(format!("--per-page {per_page}"));
    }
    if let Some(endpoint) = &flags.endpoint {
        lines.push(format!("--endpoint {endpoint}"));
    }
    if let Some(api_key) = &flags.api_key {
        lines.push(format!("--api-key {api_key}"));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved config file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--no-images" {
            flags.no_images = true;
        } else if token == "--force-half-cell" {
            flags.force_half_cell = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if token == "--per-page" {
            if let Some(next) = tokens.get(i + 1) {
                flags.per_page = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--per-page=") {
            flags.per_page = value.parse().ok();
        } else if token == "--endpoint" {
            if let Some(next) = tokens.get(i + 1) {
                flags.endpoint = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--endpoint=") {
            flags.endpoint = Some(value.to_string());
        } else if token == "--api-key" {
            if let Some(next) = tokens.get(i + 1) {
                flags.api_key = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--api-key=") {
            flags.api_key = Some(value.to_string());
        } else if token == "--debug-log" {
            if let Some(next) = tokens.get(i + 1) {
                flags.debug_log = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--debug-log=") {
            flags.debug_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "pixseek".to_string(),
            "--no-images".to_string(),
            "--per-page".to_string(),
            "40".to_string(),
            "--endpoint=https://example.com/api".to_string(),
            "--api-key".to_string(),
            "abc123".to_string(),
            "--debug-log=fetch.log".to_string(),
            "--force-half-cell".to_string(),
            "kittens".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_images);
        assert!(flags.force_half_cell);
        assert_eq!(flags.per_page, Some(40));
        assert_eq!(flags.endpoint.as_deref(), Some("https://example.com/api"));
        assert_eq!(flags.api_key.as_deref(), Some("abc123"));
        assert_eq!(flags.debug_log, Some(PathBuf::from("fetch.log")));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_images: true,
            per_page: Some(12),
            api_key: Some("from-file".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            force_half_cell: true,
            per_page: Some(24),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_images);
        assert!(merged.force_half_cell);
        assert_eq!(merged.per_page, Some(24));
        assert_eq!(merged.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".pixseekrc");
        let flags = ConfigFlags {
            no_images: true,
            force_half_cell: true,
            perf: true,
            per_page: Some(30),
            endpoint: Some("https://example.com/api".to_string()),
            api_key: Some("abc123".to_string()),
            debug_log: Some(PathBuf::from("fetch.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_per_page_is_ignored() {
        let args = vec!["--per-page".to_string(), "lots".to_string()];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.per_page, None);
    }
}
