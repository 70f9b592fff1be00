use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub title: Option<TitleConfig>,
    pub input: Option<InputConfig>,
    pub display: Option<DisplayConfig>,
}

/// Styling of the per-document title paragraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleConfig {
    pub font_size_pt: Option<f32>,
    pub bold: Option<bool>,
    /// Six hex digits, e.g. `"8B5A2B"`.
    pub color: Option<String>,
    /// `left`, `center`, `right`, or `both`.
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extension (without the dot) of documents to merge.
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum characters of a file name shown on a progress line.
    pub name_width: Option<usize>,
}

pub const DEFAULT_EXTENSION: &str = "docx";
pub const DEFAULT_NAME_WIDTH: usize = 50;

impl ConfigFile {
    pub fn extension(&self) -> String {
        self.input
            .as_ref()
            .and_then(|i| i.extension.clone())
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }

    pub fn name_width(&self) -> usize {
        self.display
            .as_ref()
            .and_then(|d| d.name_width)
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_NAME_WIDTH)
    }

    pub fn title(&self) -> TitleConfig {
        self.title.clone().unwrap_or_default()
    }
}

/// Platform config directory path: `<config_dir>/wordmerge/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wordmerge").join("config.toml"))
}

/// Load config by cascading CWD `.wordmerge.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".wordmerge.toml"));

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
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_title = base.title.unwrap_or_default();
    let over_title = overlay.title.unwrap_or_default();
    let base_input = base.input.unwrap_or_default();
    let over_input = overlay.input.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let over_display = overlay.display.unwrap_or_default();

    ConfigFile {
        title: Some(TitleConfig {
            font_size_pt: over_title.font_size_pt.or(base_title.font_size_pt),
            bold: over_title.bold.or(base_title.bold),
            color: over_title.color.or(base_title.color),
            alignment: over_title.alignment.or(base_title.alignment),
        }),
        input: Some(InputConfig {
            extension: over_input.extension.or(base_input.extension),
        }),
        display: Some(DisplayConfig {
            name_width: over_display.name_width.or(base_display.name_width),
        }),
    }
}
