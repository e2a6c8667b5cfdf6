//! Configuration loader - YAML settings + .env overrides

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::wheel::rotation::RotationParams;

pub const DEFAULT_API_URL: &str = "https://graphql.anilist.co";

/// Main configuration loaded from spinner.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Width and height of the square window
    pub window_size: f32,
    pub wheel: WheelConfig,
    pub shake: ShakeConfig,
    pub labels: LabelConfig,
    pub banner: BannerConfig,
    pub audio: AudioConfig,
    pub anilist: AnilistConfig,
}

/// Rotation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Degrees per second while idle
    pub idle_speed: f64,
    pub sharpness: f64,
    pub settle_epsilon: f64,
    /// Min and max full turns per spin
    pub spin_turns: (f64, f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub amplitude: f64,
    pub frequency: f64,
    pub duration: f64,
    /// Noise seed, current Unix time when unset
    pub seed: Option<u32>,
}

/// Titles drawn on the pie sectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font_size: f32,
    pub spacing: f32,
    /// Subtracted from the radius to get the label width budget
    pub margin: f32,
}

/// Current title strip at the bottom of the window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub font_size: f32,
    pub spacing: f32,
    pub padding: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Between 0 and 1
    pub volume: f32,
    /// Click pitch varies within 1 +/- this
    pub pitch_range: f32,
    /// WAV file to use instead of the built-in click
    pub click_sound: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnilistConfig {
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: 800.0,
            wheel: WheelConfig::default(),
            shake: ShakeConfig::default(),
            labels: LabelConfig::default(),
            banner: BannerConfig::default(),
            audio: AudioConfig::default(),
            anilist: AnilistConfig::default(),
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        let params = RotationParams::default();
        Self {
            idle_speed: params.idle_speed,
            sharpness: params.sharpness,
            settle_epsilon: params.settle_epsilon,
            spin_turns: (20.0, 30.0),
        }
    }
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            amplitude: 16.0,
            frequency: 16.0,
            duration: 0.2,
            seed: None,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 64.0,
            spacing: 8.0,
            margin: 50.0,
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            font_size: 64.0,
            spacing: 4.0,
            padding: 8.0,
            margin: 50.0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            pitch_range: 0.3,
            click_sound: None,
        }
    }
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()
    }

    /// Reject unusable values and normalize the rest
    pub fn validate(mut self) -> Result<Self> {
        if self.window_size.is_nan() || self.window_size <= 0.0 {
            bail!("window_size must be positive, got {}", self.window_size);
        }
        if !self.wheel.sharpness.is_finite() || self.wheel.sharpness <= 0.0 {
            bail!("wheel.sharpness must be positive, got {}", self.wheel.sharpness);
        }
        // A spin only settles once the gap drops below this
        if !self.wheel.settle_epsilon.is_finite() || self.wheel.settle_epsilon <= 0.0 {
            bail!("wheel.settle_epsilon must be positive, got {}", self.wheel.settle_epsilon);
        }
        if !self.wheel.idle_speed.is_finite() {
            bail!("wheel.idle_speed must be finite, got {}", self.wheel.idle_speed);
        }

        let (a, b) = self.wheel.spin_turns;
        if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
            bail!("wheel.spin_turns must be non-negative, got ({}, {})", a, b);
        }
        if a > b {
            tracing::warn!("wheel.spin_turns reversed ({}, {}), swapping", a, b);
            self.wheel.spin_turns = (b, a);
        }

        self.audio.volume = self.audio.volume.clamp(0.0, 1.0);
        self.audio.pitch_range = self.audio.pitch_range.clamp(0.0, 0.99);

        Ok(self)
    }

    pub fn rotation_params(&self) -> RotationParams {
        RotationParams {
            idle_speed: self.wheel.idle_speed,
            sharpness: self.wheel.sharpness,
            settle_epsilon: self.wheel.settle_epsilon,
        }
    }
}

/// Settings read from the environment / .env
#[derive(Debug, Clone, Default)]
pub struct Env {
    /// `TEST_DATA` is set: use built-in entries instead of AniList
    pub test_data: bool,
    pub log_dir: String,
    pub api_url: Option<String>,
}

impl Env {
    /// Load settings from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Env {
            test_data: std::env::var_os("TEST_DATA").is_some(),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            api_url: std::env::var("ANILIST_API_URL").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = Config::default();
        assert_eq!(config.window_size, 800.0);
        assert_eq!(config.wheel.spin_turns, (20.0, 30.0));
        assert_eq!(config.shake.amplitude, 16.0);
        assert_eq!(config.shake.duration, 0.2);
        assert_eq!(config.audio.volume, 0.8);
        assert_eq!(config.anilist.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "wheel:\n  idle_speed: 25.0\nshake:\n  seed: 9\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.wheel.idle_speed, 25.0);
        assert_eq!(config.wheel.sharpness, 0.5);
        assert_eq!(config.shake.seed, Some(9));
        assert_eq!(config.labels.font_size, 64.0);
    }

    #[test]
    fn test_validate_normalizes() {
        let mut config = Config::default();
        config.wheel.spin_turns = (30.0, 20.0);
        config.audio.volume = 3.0;
        let config = config.validate().unwrap();
        assert_eq!(config.wheel.spin_turns, (20.0, 30.0));
        assert_eq!(config.audio.volume, 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_epsilon() {
        for epsilon in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.wheel.settle_epsilon = epsilon;
            assert!(config.validate().is_err(), "accepted settle_epsilon {}", epsilon);
        }
    }

    #[test]
    fn test_validate_rejects_bad_sharpness() {
        for sharpness in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.wheel.sharpness = sharpness;
            assert!(config.validate().is_err(), "accepted sharpness {}", sharpness);
        }
    }

    #[test]
    fn test_validate_rejects_bad_idle_speed_and_turns() {
        let mut config = Config::default();
        config.wheel.idle_speed = f64::NAN;
        assert!(config.validate().is_err());

        for turns in [(-1.0, 30.0), (20.0, f64::INFINITY), (f64::NAN, 30.0)] {
            let mut config = Config::default();
            config.wheel.spin_turns = turns;
            assert!(config.validate().is_err(), "accepted spin_turns {:?}", turns);
        }
    }

    #[test]
    fn test_yaml_zero_epsilon_rejected() {
        let yaml = "wheel:\n  settle_epsilon: 0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut config = Config::default();
        config.window_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rotation_params() {
        let params = Config::default().rotation_params();
        assert_eq!(params, RotationParams::default());
    }
}
