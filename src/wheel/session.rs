//! Per-frame orchestration
//!
//! A session owns the rotation and shake state for one window. Each frame the
//! caller advances it, gets back the selected index and whether it changed,
//! and decides itself what feedback (click, shake) to fire.

use rand::Rng;

use super::items::{select_index, WeightedItem};
use super::rotation::{RotationParams, RotationState};
use super::shake::{NoiseField, ShakeState};
use super::WheelError;

/// Selection for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub index: usize,
    /// True when `index` differs from the previous frame's selection
    pub changed: bool,
}

/// Select at `angle_degrees` and compare against `previous`
pub fn track_selection(
    items: &[WeightedItem],
    angle_degrees: f64,
    previous: Option<usize>,
) -> Result<SelectionUpdate, WheelError> {
    let index = select_index(items, angle_degrees)?;
    Ok(SelectionUpdate {
        index,
        changed: previous != Some(index),
    })
}

pub struct WheelSession<N> {
    items: Vec<WeightedItem>,
    params: RotationParams,
    turns_range: (f64, f64),
    rotation: RotationState,
    shake: ShakeState,
    noise: N,
    selected: usize,
}

impl<N: NoiseField> WheelSession<N> {
    pub fn new(
        items: Vec<WeightedItem>,
        params: RotationParams,
        turns_range: (f64, f64),
        shake: ShakeState,
        noise: N,
    ) -> Result<Self, WheelError> {
        let rotation = RotationState::new();
        let selected = select_index(&items, rotation.current_angle)?;

        Ok(Self {
            items,
            params,
            turns_range,
            rotation,
            shake,
            noise,
            selected,
        })
    }

    pub fn items(&self) -> &[WeightedItem] {
        &self.items
    }

    pub fn angle(&self) -> f64 {
        self.rotation.current_angle
    }

    pub fn is_spinning(&self) -> bool {
        self.rotation.is_spinning()
    }

    /// Advance rotation for this frame and report the selection
    pub fn advance(&mut self, frame_dt: f64, elapsed: f64) -> Result<SelectionUpdate, WheelError> {
        self.rotation = self.rotation.advance(&self.params, frame_dt, elapsed);

        let update = track_selection(&self.items, self.rotation.current_angle, Some(self.selected))?;
        if update.changed {
            tracing::trace!(
                "Pointer moved to '{}' at {:.2} degrees",
                self.items[update.index].label,
                self.rotation.current_angle
            );
        }
        self.selected = update.index;

        Ok(update)
    }

    /// Request a spin; ignored while one is running
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.rotation = self.rotation.trigger_spin(self.turns_range, rng);
    }

    pub fn trigger_shake(&mut self, now: f64) {
        self.shake = self.shake.trigger(now);
    }

    /// Current shake offset in pixels
    pub fn shake_offset(&mut self, now: f64) -> (f64, f64) {
        if !self.shake.is_active() {
            return (0.0, 0.0);
        }
        let (offset, shake) = self.shake.sample(now, &self.noise);
        self.shake = shake;
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::items::build_weighted_items;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FlatNoise;

    impl NoiseField for FlatNoise {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            1.0
        }
    }

    fn items() -> Vec<WeightedItem> {
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        build_weighted_items(&[400.0, 360.0, 320.0, 280.0], &labels).unwrap()
    }

    fn session() -> WheelSession<FlatNoise> {
        WheelSession::new(
            items(),
            RotationParams::default(),
            (20.0, 30.0),
            ShakeState::new(16.0, 16.0, 0.2).unwrap(),
            FlatNoise,
        )
        .unwrap()
    }

    #[test]
    fn test_track_selection_flags_changes() {
        let items = items();
        let first = track_selection(&items, 10.0, None).unwrap();
        assert_eq!(first, SelectionUpdate { index: 0, changed: true });

        let same = track_selection(&items, 20.0, Some(0)).unwrap();
        assert!(!same.changed);

        let next = track_selection(&items, 0.30 * 360.0, Some(0)).unwrap();
        assert_eq!(next, SelectionUpdate { index: 1, changed: true });
    }

    #[test]
    fn test_track_selection_empty() {
        assert_eq!(track_selection(&[], 0.0, None), Err(WheelError::SelectionExhausted));
    }

    #[test]
    fn test_empty_session_rejected() {
        let result = WheelSession::new(
            vec![],
            RotationParams::default(),
            (20.0, 30.0),
            ShakeState::new(16.0, 16.0, 0.2).unwrap(),
            FlatNoise,
        );
        assert!(matches!(result, Err(WheelError::SelectionExhausted)));
    }

    #[test]
    fn test_starts_on_first_item_without_change() {
        let mut session = session();
        assert_eq!(session.selected, 0);
        let update = session.advance(0.016, 0.016).unwrap();
        assert_eq!(update, SelectionUpdate { index: 0, changed: false });
    }

    #[test]
    fn test_idle_crossing_reports_once() {
        let mut session = session();
        // Item b starts at 0.294 of a turn = ~105.9 degrees, reached after ~10.6s idle
        let mut changes = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < 12.0 {
            elapsed += 0.1;
            let update = session.advance(0.1, elapsed).unwrap();
            if update.changed {
                changes.push((update.index, elapsed));
            }
        }
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, 1);
    }

    #[test]
    fn test_full_spin_visits_items_and_settles() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(3);
        session.spin(&mut rng);
        assert!(session.is_spinning());

        // Small enough that no frame jumps over a whole item
        let dt = 1.0 / 240.0;
        let mut changes = 0;
        let mut elapsed = 0.0;
        while session.is_spinning() {
            elapsed += dt;
            if session.advance(dt, elapsed).unwrap().changed {
                changes += 1;
            }
            assert!(elapsed < 120.0, "spin never settled");
        }

        // 20+ turns over 4 items
        assert!(changes >= 80, "only {} crossings", changes);
        let expected = select_index(session.items(), session.angle()).unwrap();
        assert_eq!(session.selected, expected);
    }

    #[test]
    fn test_shake_lifecycle() {
        let mut session = session();
        assert_eq!(session.shake_offset(1.0), (0.0, 0.0));

        session.trigger_shake(1.0);
        let (dx, dy) = session.shake_offset(1.1);
        assert!((dx - 8.0).abs() < 1e-9);
        assert!((dy - 8.0).abs() < 1e-9);

        assert_eq!(session.shake_offset(1.3), (0.0, 0.0));
        assert!(!session.shake.is_active());
        assert_eq!(session.shake_offset(1.15), (0.0, 0.0));
    }
}
