// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! FITMARK - Fitting Photo Markup
//!
//! A cross-platform desktop application for annotating fitting photos
//! with freehand marks, labels, icons, rectangles and calibrated
//! measurement lines, and handing the flattened result to the remote
//! style-file service collaborator.

mod app;
mod error;
mod gesture;
mod host;
mod io;
mod models;
mod render;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::FitmarkApp;
use session::UploadContext;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Upload coordinates come in explicitly, never as ambient state
    let upload = UploadContext::from_env();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("FITMARK - Fitting Photo Markup"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "FITMARK",
        options,
        Box::new(move |_cc| Ok(Box::new(FitmarkApp::new(upload)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
