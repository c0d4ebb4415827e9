// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data structures for representing
//! freehand marks, text labels, icons, rectangles and measurements.

use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation, assigned by the store.
///
/// Id 0 means "not yet assigned"; the store replaces it on insert.
pub type AnnotationId = u64;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An RGB stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 225, g: 55, b: 55 };
    pub const GREEN: Color = Color { r: 40, g: 170, b: 90 };
    pub const BLUE: Color = Color { r: 65, g: 105, b: 225 };
    pub const YELLOW: Color = Color { r: 235, g: 200, b: 40 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const BLACK: Color = Color { r: 20, g: 20, b: 20 };
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

/// Kind of icon annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Tick,
    Cross,
}

/// A freehand stroke: an ordered run of points captured during one gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAnnotation {
    #[serde(default)]
    pub id: AnnotationId,
    pub points: Vec<Point>,
    pub color: Color,
}

impl PathAnnotation {
    pub fn new(points: Vec<Point>, color: Color) -> Self {
        Self {
            id: 0,
            points,
            color,
        }
    }
}

/// A text label rendered as a rounded chip centered on its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub id: AnnotationId,
    pub text: String,
    pub anchor: Point,
    pub color: Color,
}

impl TextAnnotation {
    pub fn new(text: String, anchor: Point, color: Color) -> Self {
        Self {
            id: 0,
            text,
            anchor,
            color,
        }
    }
}

/// A tick or cross glyph centered on its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconAnnotation {
    #[serde(default)]
    pub id: AnnotationId,
    pub kind: IconKind,
    pub anchor: Point,
}

impl IconAnnotation {
    pub fn new(kind: IconKind, anchor: Point) -> Self {
        Self { id: 0, kind, anchor }
    }
}

/// An axis-aligned rectangle given by two opposite corners.
///
/// The corners are stored exactly as drawn (unordered); consumers must
/// normalize with min/max rather than assuming `start` is top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectAnnotation {
    #[serde(default)]
    pub id: AnnotationId,
    pub start: Point,
    pub end: Point,
    pub color: Color,
}

impl RectAnnotation {
    pub fn new(start: Point, end: Point, color: Color) -> Self {
        Self {
            id: 0,
            start,
            end,
            color,
        }
    }
}

/// A measurement line with perpendicular end caps and a value label.
///
/// The label is free text; numeric by convention, not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementAnnotation {
    #[serde(default)]
    pub id: AnnotationId,
    pub start: Point,
    pub end: Point,
    pub label: String,
}

impl MeasurementAnnotation {
    pub fn new(start: Point, end: Point, label: String) -> Self {
        Self {
            id: 0,
            start,
            end,
            label,
        }
    }
}

/// A measurement carrying both a current and a target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMeasurement {
    #[serde(default)]
    pub id: AnnotationId,
    pub start: Point,
    pub end: Point,
    pub current: String,
    pub target: String,
}

impl ComparisonMeasurement {
    pub fn new(start: Point, end: Point, current: String, target: String) -> Self {
        Self {
            id: 0,
            start,
            end,
            current,
            target,
        }
    }

    /// The label shown on the rendered chip.
    pub fn label(&self) -> String {
        format!("{} → {}", self.current, self.target)
    }
}

/// Discriminant for addressing an annotation without holding its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Path,
    Text,
    Icon,
    Rect,
    Measurement,
    Comparison,
}

/// A (kind, id) address for selection, dragging and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRef {
    pub kind: AnnotationKind,
    pub id: AnnotationId,
}

impl AnnotationRef {
    pub fn new(kind: AnnotationKind, id: AnnotationId) -> Self {
        Self { kind, id }
    }
}
