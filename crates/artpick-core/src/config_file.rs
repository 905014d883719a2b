use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub source: Option<SourceConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Fixed collection size. Omit to use the size reported by the source.
    pub total_records: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub page_size: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/artpick/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artpick").join("config.toml"))
}

/// Load config by cascading CWD `.artpick.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".artpick.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_source = base.source.unwrap_or_default();
    let overlay_source = overlay.source.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let overlay_display = overlay.display.unwrap_or_default();

    ConfigFile {
        source: Some(SourceConfig {
            base_url: overlay_source.base_url.or(base_source.base_url),
            timeout_secs: overlay_source.timeout_secs.or(base_source.timeout_secs),
            total_records: overlay_source.total_records.or(base_source.total_records),
        }),
        display: Some(DisplayConfig {
            page_size: overlay_display.page_size.or(base_display.page_size),
            page_size_options: overlay_display
                .page_size_options
                .or(base_display.page_size_options),
            theme: overlay_display.theme.or(base_display.theme),
        }),
    }
}
