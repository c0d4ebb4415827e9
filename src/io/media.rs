// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo loading.
//!
//! This module handles loading photos from disk and converting them to
//! the RGBA form both the egui texture upload and the thumbnail
//! flattener consume.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// A decoded photo in RGBA8.
pub struct LoadedImage {
    pub rgba: RgbaImage,
}

impl LoadedImage {
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

/// Load a photo file and decode it to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(LoadedImage {
        rgba: img.to_rgba8(),
    })
}
