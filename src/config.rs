//! Delivery parameters and reader configuration.
//!
//! All structs implement [`Default`] with the values the reader ships with,
//! can be assembled with their generated builders, and deserialize from JSON
//! with missing fields falling back to the defaults.
//!
//! ```rust
//! use readaloud::config::{ControllerConfigBuilder, SpeechParamsBuilder};
//! use readaloud::EngineErrorKind;
//!
//! let params = SpeechParamsBuilder::default().rate(1.2).build()?;
//! let config = ControllerConfigBuilder::default()
//!     .params(params)
//!     .suppressed_errors(vec![EngineErrorKind::Canceled])
//!     .build()?;
//! assert!(config.is_suppressed(&EngineErrorKind::Canceled));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::EngineErrorKind;

const RATE_RANGE: std::ops::RangeInclusive<f32> = 0.1..=10.0;
const PITCH_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;
const VOLUME_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

/// Delivery parameters passed to the engine for every new job.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SpeechParams {
    /// Speaking rate relative to the engine baseline. Range: 0.1–10.0, default 0.9.
    pub rate: f32,
    /// Pitch. Range: 0.0–2.0, default 1.0 (neutral).
    pub pitch: f32,
    /// Volume. Range: 0.0–1.0, default 1.0 (maximum).
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechParams {
    /// Check every parameter against the range engines accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ranges(self.rate, self.pitch, self.volume).map_err(ConfigError::Builder)
    }
}

impl SpeechParamsBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = SpeechParams::default();
        check_ranges(
            self.rate.unwrap_or(defaults.rate),
            self.pitch.unwrap_or(defaults.pitch),
            self.volume.unwrap_or(defaults.volume),
        )
    }
}

fn check_ranges(rate: f32, pitch: f32, volume: f32) -> Result<(), String> {
    if !RATE_RANGE.contains(&rate) {
        return Err(format!("rate {rate} outside {RATE_RANGE:?}"));
    }
    if !PITCH_RANGE.contains(&pitch) {
        return Err(format!("pitch {pitch} outside {PITCH_RANGE:?}"));
    }
    if !VOLUME_RANGE.contains(&volume) {
        return Err(format!("volume {volume} outside {VOLUME_RANGE:?}"));
    }
    Ok(())
}

/// Configuration for a [`PlaybackController`](crate::controller::PlaybackController).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct ControllerConfig {
    /// Parameters used for every new job.
    pub params: SpeechParams,
    /// Engine error kinds treated as expected cancellation: the controller
    /// returns to idle without a user-visible notice.
    ///
    /// Engines differ in how they report an intentional cancel, so this is
    /// configurable. Defaults to `canceled` and `interrupted`.
    pub suppressed_errors: Vec<EngineErrorKind>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            params: SpeechParams::default(),
            suppressed_errors: vec![EngineErrorKind::Canceled, EngineErrorKind::Interrupted],
        }
    }
}

impl ControllerConfig {
    pub fn is_suppressed(&self, kind: &EngineErrorKind) -> bool {
        self.suppressed_errors.contains(kind)
    }
}

/// Top-level configuration for a reader view.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct ReaderConfig {
    pub controller: ControllerConfig,
    /// Location of the raw content dataset.
    pub data_path: PathBuf,
    /// How long a copied URL shows as "copied", in milliseconds.
    pub copy_feedback_ms: u64,
    /// Gap left above a section when jumping to it from the table of contents.
    pub scroll_offset: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            data_path: PathBuf::from("data/mock.json"),
            copy_feedback_ms: 1000,
            scroll_offset: 80.0,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.controller.params.validate()?;
        log::info!("Loaded reader config from {}", path.display());
        Ok(config)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
