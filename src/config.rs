use crate::layout::LayoutKind;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const APP_DIR: &str = "arbol";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid colour `{value}` for palette.{field}: expected #RRGGBB")]
    Colour { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutKind,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub canvas: CanvasConfig,
    pub nodes: NodeConfig,
    pub palette: PaletteConfig,
    pub animation: AnimationConfig,
    pub ideas: IdeasConfig,
    pub notices: NoticeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub trunk: String,
    pub roots: String,
    pub deep_roots: String,
    pub branch: String,
    pub leaf: String,
    pub active: String,
    pub selected_parent: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IdeasConfig {
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub lifetime_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            data_dir: None,
            export_dir: None,
            canvas: CanvasConfig::default(),
            nodes: NodeConfig::default(),
            palette: PaletteConfig::default(),
            animation: AnimationConfig::default(),
            ideas: IdeasConfig::default(),
            notices: NoticeConfig::default(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { radius: 30.0 }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            trunk: "#8B4513".to_string(),
            roots: "#654321".to_string(),
            deep_roots: "#4A2C17".to_string(),
            branch: "#228B22".to_string(),
            leaf: "#32CD32".to_string(),
            active: "#FFD700".to_string(),
            selected_parent: "#28A745".to_string(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            delay_ms: 100,
        }
    }
}

impl Default for IdeasConfig {
    fn default() -> Self {
        Self { delay_ms: 1500 }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { lifetime_ms: 3000 }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.palette.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    /// Downloads folder when there is one, like a browser download.
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| self.resolved_data_dir())
    }

    pub fn idea_delay(&self) -> Duration {
        Duration::from_millis(self.ideas.delay_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation.duration_ms)
    }

    /// Pause between a recentre request and the first animated frame.
    pub fn animation_delay(&self) -> Duration {
        Duration::from_millis(self.animation.delay_ms)
    }

    pub fn notice_lifetime(&self) -> Duration {
        Duration::from_millis(self.notices.lifetime_ms)
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.entries() {
            parse_hex_colour(value).ok_or_else(|| ConfigError::Colour {
                field,
                value: value.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("trunk", self.trunk.as_str()),
            ("roots", self.roots.as_str()),
            ("deep_roots", self.deep_roots.as_str()),
            ("branch", self.branch.as_str()),
            ("leaf", self.leaf.as_str()),
            ("active", self.active.as_str()),
            ("selected_parent", self.selected_parent.as_str()),
        ]
    }
}

pub fn parse_hex_colour(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").expect("empty toml parses");
        assert_eq!(config, Config::default());
        assert_eq!(config.canvas.width, 1200.0);
        assert_eq!(config.ideas.delay_ms, 1500);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r##"
layout = "radial"

[nodes]
radius = 24.0

[palette]
leaf = "#00ff00"
"##,
        )
        .expect("partial toml parses");
        assert_eq!(config.layout, LayoutKind::Radial);
        assert_eq!(config.nodes.radius, 24.0);
        assert_eq!(config.palette.leaf, "#00ff00");
        assert_eq!(config.palette.trunk, "#8B4513");
        assert_eq!(config.animation_duration(), Duration::from_millis(500));
        assert_eq!(config.animation_delay(), Duration::from_millis(100));
    }

    #[test]
    fn missing_file_is_default_and_bad_colour_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = Config::load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(missing, Config::default());

        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[palette]\nbranch = \"green\"\n").expect("fixture writes");
        let err = Config::load(&path).expect_err("named colours are not supported");
        assert!(matches!(err, ConfigError::Colour { field: "branch", .. }));
    }

    #[test]
    fn explicit_directories_win() {
        let config = Config::from_toml(
            "data_dir = \"/tmp/arbol-data\"\nexport_dir = \"/tmp/arbol-out\"\n",
        )
        .expect("paths parse");
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/tmp/arbol-data"));
        assert_eq!(config.resolved_export_dir(), PathBuf::from("/tmp/arbol-out"));
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex_colour("#8B4513"), Some([0x8B, 0x45, 0x13]));
        assert_eq!(parse_hex_colour("8B4513"), None);
        assert_eq!(parse_hex_colour("#8B45"), None);
        assert_eq!(parse_hex_colour("#zz4513"), None);
    }
}
