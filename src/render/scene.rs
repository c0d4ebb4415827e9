// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deterministic mapping from the annotation store to a vector scene.
//!
//! Both the live egui canvas and the raster flattener consume the same
//! primitive list, so what the user sees is what the thumbnail gets.
//! The scene never mutates the store.

use crate::gesture::InProgressShape;
use crate::models::annotation::{Color, IconKind, Point};
use crate::models::store::AnnotationStore;
use crate::util::geometry;

/// Stroke width for annotation lines, in image pixels.
pub const LINE_WIDTH: f32 = 3.0;

/// Half-extent of a rendered icon glyph.
pub const ICON_HALF: f32 = 14.0;

/// Chip fill for measurement and comparison labels.
pub const MEASURE_CHIP_FILL: Color = Color { r: 20, g: 20, b: 20 };

/// One drawable primitive in back-to-front order.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePrim {
    /// Connected polyline through all points.
    Stroke {
        points: Vec<Point>,
        color: Color,
        width: f32,
    },
    /// Single line segment.
    Segment {
        a: Point,
        b: Point,
        color: Color,
        width: f32,
    },
    /// Hollow rectangle; corners unordered.
    Box {
        start: Point,
        end: Point,
        color: Color,
        width: f32,
    },
    /// Rounded label chip centered on `center`, rotated by `angle_deg`.
    Chip {
        center: Point,
        angle_deg: f32,
        text: String,
        fill: Color,
        text_color: Color,
    },
    /// Tick or cross glyph centered on `center`.
    Glyph { kind: IconKind, center: Point },
}

pub type Scene = Vec<ScenePrim>;

/// Build the scene for the committed annotations only.
///
/// Layer order, back to front: paths, text chips, icons, rectangles,
/// measurements, comparisons.
pub fn committed(store: &AnnotationStore) -> Scene {
    let mut scene = Scene::new();

    for path in store.paths() {
        scene.push(ScenePrim::Stroke {
            points: path.points.clone(),
            color: path.color,
            width: LINE_WIDTH,
        });
    }

    for text in store.texts() {
        scene.push(ScenePrim::Chip {
            center: text.anchor,
            angle_deg: 0.0,
            text: text.text.clone(),
            fill: text.color,
            text_color: Color::WHITE,
        });
    }

    for icon in store.icons() {
        scene.push(ScenePrim::Glyph {
            kind: icon.kind,
            center: icon.anchor,
        });
    }

    for rect in store.rects() {
        scene.push(ScenePrim::Box {
            start: rect.start,
            end: rect.end,
            color: rect.color,
            width: LINE_WIDTH,
        });
    }

    for m in store.measurements() {
        push_measure_line(&mut scene, m.start, m.end, m.label.clone());
    }

    for c in store.comparisons() {
        push_measure_line(&mut scene, c.start, c.end, c.label());
    }

    scene
}

/// Build the scene including the shape currently being drawn, which
/// always goes on top.
pub fn with_in_progress(store: &AnnotationStore, in_progress: Option<&InProgressShape>) -> Scene {
    let mut scene = committed(store);

    match in_progress {
        Some(InProgressShape::Path { points, color }) => scene.push(ScenePrim::Stroke {
            points: points.clone(),
            color: *color,
            width: LINE_WIDTH,
        }),
        Some(InProgressShape::Rect { start, end, color }) => scene.push(ScenePrim::Box {
            start: *start,
            end: *end,
            color: *color,
            width: LINE_WIDTH,
        }),
        Some(InProgressShape::Measure { start, end })
        | Some(InProgressShape::Compare { start, end }) => {
            // No label until the value prompt is confirmed.
            push_measure_geometry(&mut scene, *start, *end);
        }
        None => {}
    }

    scene
}

/// Main line plus the two perpendicular end caps.
fn push_measure_geometry(scene: &mut Scene, start: Point, end: Point) {
    scene.push(ScenePrim::Segment {
        a: start,
        b: end,
        color: Color::WHITE,
        width: LINE_WIDTH,
    });
    for at in [start, end] {
        let (a, b) = geometry::perpendicular_cap(at, start, end, geometry::CAP_LENGTH);
        scene.push(ScenePrim::Segment {
            a,
            b,
            color: Color::WHITE,
            width: LINE_WIDTH,
        });
    }
}

fn push_measure_line(scene: &mut Scene, start: Point, end: Point, label: String) {
    push_measure_geometry(scene, start, end);

    let placement = geometry::label_placement(start, end);
    scene.push(ScenePrim::Chip {
        center: placement.mid,
        angle_deg: placement.angle_deg,
        text: label,
        fill: MEASURE_CHIP_FILL,
        text_color: Color::WHITE,
    });
}
