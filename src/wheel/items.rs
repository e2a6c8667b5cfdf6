//! Weighted items and sector selection
//!
//! Items occupy consecutive slices of the wheel in their original order.
//! Item `i` owns the half-open fraction `[cum_{i-1}, cum_i)` of a full turn.

use super::WheelError;

/// Largest shortfall of the summed weights that float rounding can explain
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// One slice of the wheel
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedItem {
    pub label: String,
    pub weight: f64,
}

/// Normalize raw magnitudes so they sum to 1, keeping their order
pub fn normalize_weights(magnitudes: &[f64]) -> Result<Vec<f64>, WheelError> {
    if magnitudes.is_empty() {
        return Err(WheelError::InvalidInput("no magnitudes to normalize".to_string()));
    }

    if let Some((i, m)) = magnitudes
        .iter()
        .enumerate()
        .find(|(_, m)| !m.is_finite() || **m < 0.0)
    {
        return Err(WheelError::InvalidInput(format!(
            "magnitude #{} is {}, expected a finite non-negative value",
            i, m
        )));
    }

    let total: f64 = magnitudes.iter().sum();
    if total <= 0.0 {
        return Err(WheelError::InvalidInput("all magnitudes are zero".to_string()));
    }

    Ok(magnitudes.iter().map(|m| m / total).collect())
}

/// Pair labels with their normalized weights
pub fn build_weighted_items(
    magnitudes: &[f64],
    labels: &[String],
) -> Result<Vec<WeightedItem>, WheelError> {
    if magnitudes.len() != labels.len() {
        return Err(WheelError::InvalidInput(format!(
            "{} magnitudes for {} labels",
            magnitudes.len(),
            labels.len()
        )));
    }

    let weights = normalize_weights(magnitudes)?;
    tracing::debug!("Normalized {} weights", weights.len());

    Ok(labels
        .iter()
        .zip(weights)
        .map(|(label, weight)| WeightedItem {
            label: label.clone(),
            weight,
        })
        .collect())
}

/// Wrap any angle into `[0, 360)` with floored modulo
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    let wrapped = angle_degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Index of the item under the pointer at `angle_degrees`
pub fn select_index(items: &[WeightedItem], angle_degrees: f64) -> Result<usize, WheelError> {
    if items.is_empty() {
        return Err(WheelError::SelectionExhausted);
    }

    let position = normalize_angle(angle_degrees) / 360.0;

    let mut seen_weight = 0.0;
    for (i, item) in items.iter().enumerate() {
        seen_weight += item.weight;
        if position < seen_weight {
            return Ok(i);
        }
    }

    // Weights came up a hair short of 1; the gap belongs to the last slice
    // NaN angles land here too; only a real shortfall is a weight bug
    debug_assert!(
        position.is_nan() || position - seen_weight < WEIGHT_TOLERANCE,
        "weights didn't add up properly: sum={} position={}",
        seen_weight,
        position
    );
    tracing::trace!(
        "Selection fell past summed weight {} at position {}, using last item",
        seen_weight,
        position
    );

    Ok(items.len() - 1)
}

/// The item under the pointer at `angle_degrees`
pub fn select_item(items: &[WeightedItem], angle_degrees: f64) -> Result<&WeightedItem, WheelError> {
    select_index(items, angle_degrees).map(|i| &items[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("item {}", i)).collect()
    }

    fn minutes_items() -> Vec<WeightedItem> {
        build_weighted_items(&[400.0, 360.0, 320.0, 280.0], &labels(4)).unwrap()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let cases: Vec<Vec<f64>> = vec![
            vec![1.0],
            vec![0.0, 5.0],
            vec![3.0, 3.0, 3.0],
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
            vec![1e-9, 1e9, 42.0],
            (1..200).map(|i| (i * 37 % 101) as f64).collect(),
        ];

        for magnitudes in cases {
            let weights = normalize_weights(&magnitudes).unwrap();
            assert_eq!(weights.len(), magnitudes.len());
            let sum: f64 = weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "sum {} for {:?}", sum, magnitudes);
        }
    }

    #[test]
    fn test_rejects_empty_and_zero() {
        assert!(matches!(normalize_weights(&[]), Err(WheelError::InvalidInput(_))));
        assert!(matches!(normalize_weights(&[0.0, 0.0]), Err(WheelError::InvalidInput(_))));
        assert!(matches!(normalize_weights(&[1.0, -2.0]), Err(WheelError::InvalidInput(_))));
        assert!(matches!(normalize_weights(&[f64::NAN]), Err(WheelError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_label_mismatch() {
        let result = build_weighted_items(&[1.0, 2.0], &labels(3));
        assert!(matches!(result, Err(WheelError::InvalidInput(_))));
    }

    #[test]
    fn test_order_preserved() {
        let items = build_weighted_items(&[1.0, 3.0], &labels(2)).unwrap();
        assert_eq!(items[0].label, "item 1");
        assert_eq!(items[0].weight, 0.25);
        assert_eq!(items[1].label, "item 2");
        assert_eq!(items[1].weight, 0.75);
    }

    #[test]
    fn test_minutes_scenario() {
        let items = minutes_items();
        let expected = [0.294, 0.265, 0.235, 0.206];
        for (item, want) in items.iter().zip(expected) {
            assert!((item.weight - want).abs() < 1e-3, "{} vs {}", item.weight, want);
        }

        assert_eq!(select_item(&items, 0.0).unwrap().label, "item 1");
        assert_eq!(select_item(&items, 0.30 * 360.0).unwrap().label, "item 2");
        assert_eq!(select_item(&items, 0.99 * 360.0).unwrap().label, "item 4");
    }

    #[test]
    fn test_boundary_belongs_to_next_item() {
        let items = build_weighted_items(&[2.0, 3.0], &labels(2)).unwrap();
        assert_eq!(items[0].weight, 0.4);

        assert_eq!(select_index(&items, 0.4 * 360.0).unwrap(), 1);
        assert_eq!(select_index(&items, 0.4 * 360.0 - 1e-9).unwrap(), 0);
    }

    #[test]
    fn test_wraps_any_angle() {
        let items = minutes_items();
        for base in [0.0, 37.5, 100.0, 200.0, 359.0] {
            let expected = select_index(&items, base).unwrap();
            for k in -5..=5 {
                let angle = base + 360.0 * k as f64;
                assert_eq!(select_index(&items, angle).unwrap(), expected, "angle {}", angle);
            }
        }

        // Long idle sessions and negative angles
        assert_eq!(select_index(&items, 1000.0).unwrap(), select_index(&items, 280.0).unwrap());
        assert_eq!(select_index(&items, -90.0).unwrap(), select_index(&items, 270.0).unwrap());
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(725.0), 5.0);
        let tiny = normalize_angle(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_short_weights_fall_back_to_last() {
        let items = vec![
            WeightedItem { label: "a".to_string(), weight: 0.5 },
            WeightedItem { label: "b".to_string(), weight: 0.5 - 1e-12 },
        ];
        assert_eq!(select_item(&items, 359.999_999_999_9).unwrap().label, "b");
    }

    #[test]
    fn test_nan_angle_selects_last() {
        let items = minutes_items();
        assert_eq!(select_index(&items, f64::NAN).unwrap(), 3);
    }

    #[test]
    fn test_empty_selection_fails() {
        assert_eq!(select_index(&[], 10.0), Err(WheelError::SelectionExhausted));
        assert!(select_item(&[], 10.0).is_err());
    }
}
