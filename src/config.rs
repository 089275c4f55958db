//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/feedtree/feedtree.toml`
//! 3. Local config: `<dir>/.feedtree.toml`
//! 4. Environment variables: `FEEDTREE__<SECTION>__<KEY>`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{AnimationTiming, LayoutConfig, LinkShape, Orientation, Sizing};

/// How the tree is mapped onto the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingMode {
    /// Scale into width x height
    #[default]
    Fit,
    /// Fixed spacing per sibling unit and per level
    NodeSize,
}

impl std::str::FromStr for SizingMode {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "node-size" | "nodesize" => Ok(Self::NodeSize),
            other => Err(ApplicationError::Config {
                message: format!("unknown sizing mode: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub width: f64,
    pub height: f64,
    pub sizing: SizingMode,
    /// Distance per sibling unit in node-size mode
    pub spacing: f64,
    /// Distance per level in node-size mode
    pub level: f64,
    pub orientation: Orientation,
    pub link_shape: LinkShape,
    pub compact: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            sizing: SizingMode::Fit,
            spacing: 40.0,
            level: 70.0,
            orientation: Orientation::TopDown,
            link_shape: LinkShape::Curved,
            compact: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnimationSettings {
    pub delay_step_ms: u64,
    pub duration_ms: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            delay_step_ms: 200,
            duration_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub node_radius: f64,
    /// 0 disables truncation
    pub label_max_chars: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            node_radius: 8.0,
            label_max_chars: 12,
        }
    }
}

/// Unified configuration for feedtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub animation: AnimationSettings,
    pub render: RenderSettings,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
    pub animation: RawAnimationSettings,
    pub render: RawRenderSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub sizing: Option<SizingMode>,
    pub spacing: Option<f64>,
    pub level: Option<f64>,
    pub orientation: Option<Orientation>,
    pub link_shape: Option<LinkShape>,
    pub compact: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawAnimationSettings {
    pub delay_step_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub node_radius: Option<f64>,
    pub label_max_chars: Option<usize>,
}

/// Get the XDG config directory for feedtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "feedtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("feedtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".feedtree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path argument.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins field by field where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let (l, o) = (&self.layout, &overlay.layout);
        let layout = LayoutSettings {
            width: o.width.unwrap_or(l.width),
            height: o.height.unwrap_or(l.height),
            sizing: o.sizing.unwrap_or(l.sizing),
            spacing: o.spacing.unwrap_or(l.spacing),
            level: o.level.unwrap_or(l.level),
            orientation: o.orientation.unwrap_or(l.orientation),
            link_shape: o.link_shape.unwrap_or(l.link_shape),
            compact: o.compact.unwrap_or(l.compact),
        };
        let animation = AnimationSettings {
            delay_step_ms: overlay
                .animation
                .delay_step_ms
                .unwrap_or(self.animation.delay_step_ms),
            duration_ms: overlay
                .animation
                .duration_ms
                .unwrap_or(self.animation.duration_ms),
        };
        let render = RenderSettings {
            node_radius: overlay
                .render
                .node_radius
                .unwrap_or(self.render.node_radius),
            label_max_chars: overlay
                .render
                .label_max_chars
                .unwrap_or(self.render.label_max_chars),
        };
        Self {
            layout,
            animation,
            render,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.feedtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Load from defaults plus a single TOML file.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply FEEDTREE__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("FEEDTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_float("layout.width") {
            settings.layout.width = val;
        }
        if let Ok(val) = config.get_float("layout.height") {
            settings.layout.height = val;
        }
        if let Ok(val) = config.get_string("layout.sizing") {
            settings.layout.sizing = val.parse()?;
        }
        if let Ok(val) = config.get_float("layout.spacing") {
            settings.layout.spacing = val;
        }
        if let Ok(val) = config.get_float("layout.level") {
            settings.layout.level = val;
        }
        if let Ok(val) = config.get_string("layout.orientation") {
            settings.layout.orientation = val.parse()?;
        }
        if let Ok(val) = config.get_string("layout.link_shape") {
            settings.layout.link_shape = val.parse()?;
        }
        if let Ok(val) = config.get_bool("layout.compact") {
            settings.layout.compact = val;
        }
        if let Ok(val) = config.get_int("animation.delay_step_ms") {
            settings.animation.delay_step_ms = non_negative("animation.delay_step_ms", val)?;
        }
        if let Ok(val) = config.get_int("animation.duration_ms") {
            settings.animation.duration_ms = non_negative("animation.duration_ms", val)?;
        }
        if let Ok(val) = config.get_float("render.node_radius") {
            settings.render.node_radius = val;
        }
        if let Ok(val) = config.get_int("render.label_max_chars") {
            settings.render.label_max_chars = non_negative("render.label_max_chars", val)? as usize;
        }

        Ok(settings)
    }

    /// Domain layout configuration described by these settings.
    pub fn layout_config(&self) -> LayoutConfig {
        let l = &self.layout;
        let sizing = match l.sizing {
            SizingMode::Fit => Sizing::Fit {
                width: l.width,
                height: l.height,
            },
            SizingMode::NodeSize => Sizing::NodeSize {
                spacing: l.spacing,
                level: l.level,
            },
        };
        LayoutConfig {
            sizing,
            orientation: l.orientation,
            link_shape: l.link_shape,
            compact: l.compact,
            timing: AnimationTiming::from_millis(
                self.animation.delay_step_ms,
                self.animation.duration_ms,
            ),
            ..LayoutConfig::default()
        }
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn non_negative(key: &str, val: i64) -> Result<u64, ApplicationError> {
    u64::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{} must not be negative, got {}", key, val),
    })
}
