//! Rotation state machine
//!
//! Idle: the wheel turns at a constant speed computed straight from session
//! time, so variable frame rates never accumulate drift.
//! Spinning: the angle eases toward a target many turns ahead with an
//! exponential approach, then snaps and goes back to idle.

use rand::Rng;

use super::lerp;

/// Tunables for [`RotationState::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationParams {
    /// Idle angular speed in degrees per second
    pub idle_speed: f64,
    /// Fraction of the remaining gap closed per second while spinning
    pub sharpness: f64,
    /// Remaining gap (degrees) below which a spin counts as settled
    pub settle_epsilon: f64,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            idle_speed: 10.0,
            sharpness: 0.5,
            settle_epsilon: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPhase {
    Idle,
    Spinning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub current_angle: f64,
    pub target_angle: f64,
    pub phase: RotationPhase,
    // Idle rotation is anchor_angle + (elapsed - anchor_time) * idle_speed
    anchor_angle: f64,
    anchor_time: f64,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationState {
    /// Session start: idle at angle 0
    pub fn new() -> Self {
        Self {
            current_angle: 0.0,
            target_angle: 0.0,
            phase: RotationPhase::Idle,
            anchor_angle: 0.0,
            anchor_time: 0.0,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == RotationPhase::Spinning
    }

    /// Step one frame
    ///
    /// # Arguments
    /// * `frame_dt` - Seconds since the previous frame
    /// * `elapsed` - Seconds since the session started
    pub fn advance(self, params: &RotationParams, frame_dt: f64, elapsed: f64) -> Self {
        match self.phase {
            RotationPhase::Idle => {
                let angle = self.anchor_angle + (elapsed - self.anchor_time) * params.idle_speed;
                Self {
                    current_angle: angle,
                    target_angle: angle,
                    ..self
                }
            }
            RotationPhase::Spinning => {
                let t = (params.sharpness * frame_dt).clamp(0.0, 1.0);
                let angle = lerp(self.current_angle, self.target_angle, t);

                if (self.target_angle - angle).abs() < params.settle_epsilon {
                    tracing::info!("Spin settled at {:.2} degrees", self.target_angle);
                    Self {
                        current_angle: self.target_angle,
                        target_angle: self.target_angle,
                        phase: RotationPhase::Idle,
                        anchor_angle: self.target_angle,
                        anchor_time: elapsed,
                    }
                } else {
                    Self {
                        current_angle: angle,
                        ..self
                    }
                }
            }
        }
    }

    /// Start a spin of a random number of turns in `turns_range`
    ///
    /// Ignored while a spin is already running.
    pub fn trigger_spin<R: Rng + ?Sized>(self, turns_range: (f64, f64), rng: &mut R) -> Self {
        if self.is_spinning() {
            tracing::debug!("Spin requested mid-spin, ignoring");
            return self;
        }

        let (min_turns, max_turns) = turns_range;
        let turns = min_turns + rng.gen::<f64>() * (max_turns - min_turns);

        // Idle accumulated an arbitrary angle; spin from a known baseline
        let current_angle = 0.0;
        let target_angle = current_angle + 360.0 * turns;
        tracing::info!("Spin triggered: {:.2} turns", turns);

        Self {
            current_angle,
            target_angle,
            phase: RotationPhase::Spinning,
            ..self
        }
    }
}
