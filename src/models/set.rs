// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The persisted annotation aggregate for one photo.
//!
//! This module defines the serialized form exchanged with the host:
//! one named array per annotation kind plus an optional reference to
//! the flattened thumbnail produced at save time.

use super::annotation::{
    ComparisonMeasurement, IconAnnotation, MeasurementAnnotation, PathAnnotation, RectAnnotation,
    TextAnnotation,
};
use serde::{Deserialize, Serialize};

/// Complete annotation data for one photo.
///
/// Every field defaults when absent on load, so partially written or
/// older files deserialize as empty collections rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    #[serde(default)]
    pub paths: Vec<PathAnnotation>,
    #[serde(default)]
    pub texts: Vec<TextAnnotation>,
    #[serde(default)]
    pub icons: Vec<IconAnnotation>,
    #[serde(default)]
    pub rects: Vec<RectAnnotation>,
    #[serde(default)]
    pub measurements: Vec<MeasurementAnnotation>,
    #[serde(default)]
    pub comparisons: Vec<ComparisonMeasurement>,
    /// File name of the flattened thumbnail, set on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl AnnotationSet {
    /// True when no annotation of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
            && self.texts.is_empty()
            && self.icons.is_empty()
            && self.rects.is_empty()
            && self.measurements.is_empty()
            && self.comparisons.is_empty()
    }

    /// Total number of annotations across all kinds.
    pub fn len(&self) -> usize {
        self.paths.len()
            + self.texts.len()
            + self.icons.len()
            + self.rects.len()
            + self.measurements.len()
            + self.comparisons.len()
    }
}
