//! Wheel Engine - selection and feedback core
//!
//! Everything in here is free of drawing, audio and I/O so it can be driven
//! one frame at a time from the GUI or from tests:
//! - items: weight normalization + angle-to-item selection
//! - rotation: idle / spinning state machine with exponential easing
//! - shake: noise-driven one-shot camera shake
//! - text_fit: shrink font size and spacing until a label fits
//! - session: per-frame orchestration and selection change detection

pub mod items;
pub mod rotation;
pub mod session;
pub mod shake;
pub mod text_fit;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    #[error("Invalid input data: {0}")]
    InvalidInput(String),
    #[error("Selection exhausted: the wheel has no items")]
    SelectionExhausted,
    #[error("Shake initialization failed: {0}")]
    ShakeInit(String),
}

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `v` sits between `a` and `b`
pub fn inv_lerp(a: f64, b: f64, v: f64) -> f64 {
    (v - a) / (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn test_inv_lerp_reversed_range() {
        // End-to-start ordering gives a value that falls from 1 to 0
        assert_eq!(inv_lerp(2.0, 1.0, 1.0), 1.0);
        assert_eq!(inv_lerp(2.0, 1.0, 2.0), 0.0);
        assert!((inv_lerp(2.0, 1.0, 1.25) - 0.75).abs() < 1e-12);
    }
}
