//! One-shot camera shake
//!
//! The offset is read from a coherent noise field instead of per-frame random
//! jitter, so consecutive frames move smoothly. Intensity decays linearly
//! from 1 to 0 over the shake duration.

use noise::{NoiseFn, OpenSimplex};

use super::{inv_lerp, WheelError};

/// Distance along the noise field between the x and y samples
const AXIS_OFFSET: f64 = 1234.567;

/// A continuous 2D noise source returning values in about [-1, 1]
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl NoiseField for OpenSimplex {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.get([x, y])
    }
}

/// OpenSimplex field for the given seed
pub fn open_simplex(seed: u32) -> OpenSimplex {
    OpenSimplex::new(seed)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeState {
    /// Peak offset in pixels
    pub amplitude: f64,
    /// Noise sampling speed
    pub frequency: f64,
    pub duration: f64,
    /// Session time the shake started, `None` while inactive
    pub triggered_at: Option<f64>,
}

impl ShakeState {
    pub fn new(amplitude: f64, frequency: f64, duration: f64) -> Result<Self, WheelError> {
        if !amplitude.is_finite() || !frequency.is_finite() {
            return Err(WheelError::ShakeInit(format!(
                "amplitude {} and frequency {} must be finite",
                amplitude, frequency
            )));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(WheelError::ShakeInit(format!(
                "duration must be a positive number of seconds, got {}",
                duration
            )));
        }

        Ok(Self {
            amplitude,
            frequency,
            duration,
            triggered_at: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.triggered_at.is_some()
    }

    /// Start (or restart) the shake at `now`
    pub fn trigger(self, now: f64) -> Self {
        Self {
            triggered_at: Some(now),
            ..self
        }
    }

    /// Offset for the frame at `now`, plus the state to keep for the next frame
    pub fn sample<N: NoiseField + ?Sized>(self, now: f64, noise: &N) -> ((f64, f64), Self) {
        let Some(start) = self.triggered_at else {
            return ((0.0, 0.0), self);
        };

        let end = start + self.duration;
        if now >= end {
            return ((0.0, 0.0), Self { triggered_at: None, ..self });
        }
        if now <= start {
            return ((0.0, 0.0), self);
        }

        let intensity = inv_lerp(end, start, now).clamp(0.0, 1.0);
        let amount = self.amplitude * intensity;

        let t = now * self.frequency;
        let x = noise.sample(t, 0.0);
        let y = noise.sample(t + AXIS_OFFSET, 0.0);

        ((x * amount, y * amount), self)
    }
}
