// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the pure hit-testing and measurement-decoration
//! math used by the store, the gesture machine and both renderers.

use crate::models::annotation::Point;

/// Hit tolerance around a text chip's anchor, per axis.
pub const TEXT_HIT_RADIUS: f32 = 50.0;

/// Hit tolerance around an icon's anchor, per axis.
pub const ICON_HIT_RADIUS: f32 = 30.0;

/// Margin added to a two-point shape's bounding box for hit-testing.
pub const BOX_HIT_MARGIN: f32 = 30.0;

/// Length of a measurement line's perpendicular end caps.
pub const CAP_LENGTH: f32 = 20.0;

/// True if `point` falls inside the axis-aligned tolerance box around
/// `anchor`. A box rather than a circle: small targets stay easier to
/// hit near their corners than their visual size suggests.
pub fn hit_anchor(anchor: Point, point: Point, radius: f32) -> bool {
    (point.x - anchor.x).abs() < radius && (point.y - anchor.y).abs() < radius
}

/// True if `point` falls inside the min/max bounding box of `a`..`b`
/// expanded by `margin` on every side.
///
/// The corners are unordered; a zero-size span still registers through
/// the margin.
pub fn hit_span(a: Point, b: Point, point: Point, margin: f32) -> bool {
    let min_x = a.x.min(b.x) - margin;
    let max_x = a.x.max(b.x) + margin;
    let min_y = a.y.min(b.y) - margin;
    let max_y = a.y.max(b.y) + margin;
    point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
}

/// The two endpoints of a cap line of `length`, centered on `at` and
/// perpendicular to the `start`→`end` direction.
///
/// A zero-length segment has no direction; fall back to a horizontal
/// main axis so the cap comes out vertical.
pub fn perpendicular_cap(at: Point, start: Point, end: Point, length: f32) -> (Point, Point) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len > f32::EPSILON {
        (dx / len, dy / len)
    } else {
        (1.0, 0.0)
    };
    // Unit normal to the main axis.
    let (nx, ny) = (-uy, ux);
    let half = length / 2.0;
    (
        Point::new(at.x + nx * half, at.y + ny * half),
        Point::new(at.x - nx * half, at.y - ny * half),
    )
}

/// Placement of a measurement label chip: midpoint of the segment and
/// the text rotation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Rotation in degrees, normalized into (-90, 90] so the label
    /// never renders upside down.
    pub angle_deg: f32,
    pub mid: Point,
}

/// Compute where and at what angle a measurement label sits.
///
/// A zero-length segment has an undefined direction and maps to 0°.
pub fn label_placement(start: Point, end: Point) -> LabelPlacement {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);

    if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
        return LabelPlacement { angle_deg: 0.0, mid };
    }

    let mut angle = dy.atan2(dx).to_degrees();
    // Fold into (-90, 90] so text reads left to right.
    if angle <= -90.0 {
        angle += 180.0;
    } else if angle > 90.0 {
        angle -= 180.0;
    }
    LabelPlacement { angle_deg: angle, mid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_anchor_inside_and_outside() {
        let anchor = Point::new(100.0, 100.0);
        assert!(hit_anchor(anchor, Point::new(100.0, 100.0), TEXT_HIT_RADIUS));
        assert!(hit_anchor(anchor, Point::new(140.0, 60.0), TEXT_HIT_RADIUS));
        assert!(!hit_anchor(anchor, Point::new(151.0, 100.0), TEXT_HIT_RADIUS));
        assert!(!hit_anchor(anchor, Point::new(100.0, 160.0), TEXT_HIT_RADIUS));
    }

    #[test]
    fn test_hit_span_normalizes_corners() {
        // Drawn bottom-right to top-left.
        let a = Point::new(200.0, 150.0);
        let b = Point::new(50.0, 40.0);
        assert!(hit_span(a, b, Point::new(100.0, 100.0), BOX_HIT_MARGIN));
        assert!(hit_span(a, b, Point::new(25.0, 40.0), BOX_HIT_MARGIN));
        assert!(!hit_span(a, b, Point::new(300.0, 100.0), BOX_HIT_MARGIN));
    }

    #[test]
    fn test_hit_span_zero_size_registers_via_margin() {
        let p = Point::new(60.0, 60.0);
        assert!(hit_span(p, p, Point::new(80.0, 60.0), BOX_HIT_MARGIN));
        assert!(!hit_span(p, p, Point::new(95.0, 60.0), BOX_HIT_MARGIN));
    }

    #[test]
    fn test_perpendicular_cap_length_and_orientation() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let (a, b) = perpendicular_cap(start, start, end, CAP_LENGTH);

        // Vertical cap centered on start, full length.
        assert!((a.x - 0.0).abs() < 1e-4);
        assert!((b.x - 0.0).abs() < 1e-4);
        let len = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        assert!((len - CAP_LENGTH).abs() < 1e-4);
    }

    #[test]
    fn test_perpendicular_cap_is_perpendicular_on_diagonal() {
        let start = Point::new(10.0, 10.0);
        let end = Point::new(50.0, 90.0);
        let (a, b) = perpendicular_cap(end, start, end, CAP_LENGTH);

        let cap = (a.x - b.x, a.y - b.y);
        let main = (end.x - start.x, end.y - start.y);
        let dot = cap.0 * main.0 + cap.1 * main.1;
        assert!(dot.abs() < 1e-3);
    }

    #[test]
    fn test_perpendicular_cap_degenerate_segment() {
        let p = Point::new(5.0, 5.0);
        let (a, b) = perpendicular_cap(p, p, p, CAP_LENGTH);
        let len = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        assert!((len - CAP_LENGTH).abs() < 1e-4);
    }

    #[test]
    fn test_label_angle_stays_upright() {
        // Raw angle -135°; folds to 45°.
        let p = label_placement(Point::new(0.0, 0.0), Point::new(-10.0, -10.0));
        assert!((p.angle_deg - 45.0).abs() < 1e-3);

        // Raw 180° folds to 0°.
        let p = label_placement(Point::new(10.0, 0.0), Point::new(0.0, 0.0));
        assert!(p.angle_deg.abs() < 1e-3);

        // Straight down (raw 90°) stays 90°.
        let p = label_placement(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!((p.angle_deg - 90.0).abs() < 1e-3);

        // Straight up (raw -90°) folds to 90°.
        let p = label_placement(Point::new(0.0, 10.0), Point::new(0.0, 0.0));
        assert!((p.angle_deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_label_angle_always_in_range() {
        let origin = Point::new(0.0, 0.0);
        for i in 0..36 {
            let theta = ((i as f32) * 10.0_f32).to_radians();
            let end = Point::new(theta.cos() * 50.0, theta.sin() * 50.0);
            let p = label_placement(origin, end);
            assert!(
                p.angle_deg > -90.0 && p.angle_deg <= 90.0,
                "angle {} out of range for step {}",
                p.angle_deg,
                i
            );
        }
    }

    #[test]
    fn test_label_midpoint() {
        let p = label_placement(Point::new(0.0, 0.0), Point::new(100.0, 40.0));
        assert_eq!(p.mid, Point::new(50.0, 20.0));
    }

    #[test]
    fn test_label_zero_length_falls_back_to_zero_degrees() {
        let p = label_placement(Point::new(30.0, 30.0), Point::new(30.0, 30.0));
        assert_eq!(p.angle_deg, 0.0);
        assert_eq!(p.mid, Point::new(30.0, 30.0));
    }
}
