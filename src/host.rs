// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File-backed session host.
//!
//! Persists the committed annotation set and its flattened thumbnail
//! next to the source photo, keyed by the photo's file stem, and logs
//! the configured upload target. The network transfer itself belongs
//! to the remote style-file service client, not to this tool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::models::set::AnnotationSet;
use crate::session::{SessionHost, UploadContext};

/// Stores saved sets beside the photo they annotate.
pub struct FileHost {
    context: UploadContext,
    photo_path: PathBuf,
}

impl FileHost {
    pub fn new(context: UploadContext, photo_path: impl Into<PathBuf>) -> Self {
        Self {
            context,
            photo_path: photo_path.into(),
        }
    }

    fn sidecar_path(&self, extension: &str) -> PathBuf {
        let stem = self
            .photo_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("photo");
        let dir = self.photo_path.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("{stem}.{extension}"))
    }

    fn write(&self, set: &AnnotationSet, thumbnail: &RgbaImage) -> Result<()> {
        let json_path = self.sidecar_path("annotations.json");
        crate::io::serialization::export_json(set, &json_path)
            .with_context(|| format!("writing {}", json_path.display()))?;

        let thumb_path = match &set.thumbnail {
            Some(name) => self
                .photo_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(name),
            None => self.sidecar_path("annotated.png"),
        };
        thumbnail
            .save(&thumb_path)
            .with_context(|| format!("writing {}", thumb_path.display()))?;

        log::info!(
            "Stored {} annotations and thumbnail {}",
            set.len(),
            thumb_path.display()
        );
        Ok(())
    }
}

impl SessionHost for FileHost {
    fn on_save(&mut self, set: &AnnotationSet, thumbnail: &RgbaImage) -> Result<()> {
        self.write(set, thumbnail)?;
        if self.context.base_url.is_empty() {
            log::info!("No upload target configured; kept locally");
        } else {
            log::info!(
                "Queued upload to {} for style {}",
                self.context.base_url,
                self.context.style_id
            );
        }
        Ok(())
    }

    fn on_close(&mut self) {
        log::info!("Annotation session closed for {}", self.photo_path.display());
    }
}
