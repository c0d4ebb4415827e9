// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation set serialization and deserialization.
//!
//! This module handles exporting and importing annotation sets in YAML
//! and JSON formats. Missing fields load as empty collections, so files
//! from older versions keep importing.

use crate::models::set::AnnotationSet;
use anyhow::Result;
use std::path::Path;

/// Export an annotation set to YAML format.
pub fn export_yaml(set: &AnnotationSet, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(set)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an annotation set to JSON format.
pub fn export_json(set: &AnnotationSet, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(set)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import an annotation set from YAML format.
pub fn import_yaml(path: &Path) -> Result<AnnotationSet> {
    let yaml = std::fs::read_to_string(path)?;
    let set = serde_yaml::from_str(&yaml)?;
    Ok(set)
}

/// Import an annotation set from JSON format.
pub fn import_json(path: &Path) -> Result<AnnotationSet> {
    let json = std::fs::read_to_string(path)?;
    let set = serde_json::from_str(&json)?;
    Ok(set)
}
