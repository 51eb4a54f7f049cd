//! Covered-area derivation tests
//!
//! Tests for the CoverageComputer including:
//! - Non-empty coverage for any positive swath width
//! - Buffer area grows monotonically with swath width
//! - Buffer area of a straight segment matches the capsule estimate

use backend::error::AppError;
use backend::geoprocessing::coverage::covered_area;
use backend::geoprocessing::units;
use geo::Area;
use geo_types::{coord, LineString};
use shared::geometry::FlightPath;

fn straight_path(length_degrees: f64) -> FlightPath {
    FlightPath(LineString::from(vec![
        coord! { x: 0.0, y: 0.0 },
        coord! { x: length_degrees, y: 0.0 },
    ]))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_two_fixes_produce_non_empty_polygon() {
        let covered = covered_area(&straight_path(0.01), 20.0).unwrap();
        assert!(covered.0.unsigned_area() > 0.0);
    }

    #[test]
    fn test_coincident_fixes_still_produce_coverage() {
        let path = FlightPath(LineString::from(vec![
            coord! { x: -46.6, y: -23.5 },
            coord! { x: -46.6, y: -23.5 },
        ]));

        let covered = covered_area(&path, 20.0).unwrap();
        assert!(covered.0.unsigned_area() > 0.0);
    }

    #[test]
    fn test_straight_segment_area_matches_capsule_estimate() {
        let length = 0.01;
        let width_m = 30.0;
        let covered = covered_area(&straight_path(length), width_m).unwrap();

        let radius = units::swath_radius_degrees(width_m);
        let capsule = 2.0 * radius * length + std::f64::consts::PI * radius * radius;

        let area = covered.0.unsigned_area();
        // The 32-gon caps undershoot the true circle slightly
        assert!(area <= capsule * 1.001, "area {} above estimate {}", area, capsule);
        assert!(area >= capsule * 0.98, "area {} below estimate {}", area, capsule);
    }

    #[test]
    fn test_zero_swath_width_is_rejected() {
        let result = covered_area(&straight_path(0.01), 0.0);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_negative_swath_width_is_rejected() {
        let result = covered_area(&straight_path(0.01), -5.0);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_long_log_merges_to_single_polygon() {
        // A few hundred fixes, as a real flight log would carry
        let fixes: Vec<_> = (0..300)
            .map(|i| {
                let x = i as f64 * 0.0002;
                let y = if i % 2 == 0 { 0.0 } else { 0.0001 };
                coord! { x: x, y: y }
            })
            .collect();
        let path = FlightPath(LineString::from(fixes));

        let covered = covered_area(&path, 25.0).unwrap();
        assert_eq!(covered.0 .0.len(), 1);
        assert!(covered.0.unsigned_area() > 0.0);
    }

    #[test]
    fn test_bent_path_is_covered_contiguously() {
        // An L-shaped path; the joint disk keeps the corner covered
        let path = FlightPath(LineString::from(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.01, y: 0.0 },
            coord! { x: 0.01, y: 0.01 },
        ]));

        let covered = covered_area(&path, 25.0).unwrap();
        assert_eq!(covered.0 .0.len(), 1, "expected a single merged polygon");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn path_strategy() -> impl Strategy<Value = FlightPath> {
        prop::collection::vec(((-0.05f64..=0.05), (-0.05f64..=0.05)), 2..8).prop_map(|points| {
            FlightPath(LineString::from(
                points
                    .into_iter()
                    .map(|(x, y)| coord! { x: x, y: y })
                    .collect::<Vec<_>>(),
            ))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Covered area is non-decreasing in the swath width
        #[test]
        fn prop_buffer_growth_is_monotonic(
            path in path_strategy(),
            width in 1.0f64..50.0,
            extra in 0.1f64..50.0
        ) {
            let narrow = covered_area(&path, width).unwrap().0.unsigned_area();
            let wide = covered_area(&path, width + extra).unwrap().0.unsigned_area();

            // Tolerance for floating-point noise in the union
            prop_assert!(wide >= narrow - 1e-15);
        }

        /// Any positive width over a valid path yields a non-empty polygon
        #[test]
        fn prop_positive_width_covers_something(
            path in path_strategy(),
            width in 0.5f64..100.0
        ) {
            let covered = covered_area(&path, width).unwrap();
            prop_assert!(covered.0.unsigned_area() > 0.0);
        }

        /// The same inputs always produce the same polygon
        #[test]
        fn prop_coverage_is_deterministic(path in path_strategy(), width in 1.0f64..50.0) {
            let first = covered_area(&path, width).unwrap();
            let second = covered_area(&path, width).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
