use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{TweenError, TweenResult};

/// Engine-wide settings. Every field falls back to its default when absent from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical surface width.
    pub width: u32,
    /// Logical surface height.
    pub height: u32,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
    pub default_duration_ms: f64,
    pub default_fps: f64,
    pub default_loop: bool,
    /// Start playback right after a successful load.
    pub auto_play: bool,
    /// Clear only the regions drawn last frame instead of the whole surface.
    pub dirty_regions: bool,
    /// Clear color, any form accepted by [`Rgba8::parse`].
    pub background: String,
    /// Map every loaded scene's coordinates onto the surface.
    pub normalize_coordinates: bool,
    pub normalize_padding: f64,
    /// Font used for text shaping by the CPU surface.
    pub font_path: Option<PathBuf>,
    pub fps_sample_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            pixel_ratio: 1.0,
            default_duration_ms: 5000.0,
            default_fps: 60.0,
            default_loop: false,
            auto_play: false,
            dirty_regions: false,
            background: "#00000000".to_owned(),
            normalize_coordinates: false,
            normalize_padding: 20.0,
            font_path: None,
            fps_sample_window: 60,
        }
    }
}

const ENV_DIRTY_REGIONS: &str = "TWEENLINE_DIRTY_REGIONS";
const ENV_PIXEL_RATIO: &str = "TWEENLINE_PIXEL_RATIO";
const ENV_FONT: &str = "TWEENLINE_FONT";

impl EngineConfig {
    pub fn from_json_str(s: &str) -> TweenResult<Self> {
        serde_json::from_str(s).map_err(|e| TweenError::serde(format!("engine config: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> TweenResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `TWEENLINE_*` environment overrides. Unparseable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_DIRTY_REGIONS).and_then(|v| parse_flag(&v)) {
            self.dirty_regions = v;
        }
        if let Some(v) = lookup(ENV_PIXEL_RATIO).and_then(|v| v.trim().parse::<f64>().ok()) {
            self.pixel_ratio = v;
        }
        if let Some(v) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font_path = Some(PathBuf::from(v));
        }
        self
    }

    pub fn validate(&self) -> TweenResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TweenError::validation(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(TweenError::validation(format!(
                "pixel_ratio must be finite and > 0, got {}",
                self.pixel_ratio
            )));
        }
        if !(self.default_fps.is_finite() && self.default_fps > 0.0) {
            return Err(TweenError::validation(format!(
                "default_fps must be finite and > 0, got {}",
                self.default_fps
            )));
        }
        if !(self.default_duration_ms.is_finite() && self.default_duration_ms > 0.0) {
            return Err(TweenError::validation(format!(
                "default_duration_ms must be finite and > 0, got {}",
                self.default_duration_ms
            )));
        }
        if !(self.normalize_padding.is_finite() && self.normalize_padding >= 0.0) {
            return Err(TweenError::validation("normalize_padding must be finite and >= 0"));
        }
        if self.fps_sample_window == 0 {
            return Err(TweenError::validation("fps_sample_window must be > 0"));
        }
        self.background_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> TweenResult<Rgba8> {
        Rgba8::parse(&self.background)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
