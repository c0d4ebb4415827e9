// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait, wiring the annotator session to menus, the
//! toolbar, the canvas and the background load/save threads.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

use image::RgbaImage;

use crate::error::RenderError;
use crate::host::FileHost;
use crate::io;
use crate::session::{AnnotatorSession, UploadContext};
use crate::ui::prompts::PromptDrafts;
use crate::ui::{canvas, prompts, toolbar};

/// Result of background photo loading.
struct LoadedPhoto {
    path: PathBuf,
    rgba: RgbaImage,
}

/// Main application state.
pub struct FitmarkApp {
    /// Remote style-file service coordinates, injected at startup
    upload: UploadContext,

    /// Current editing session (if a photo is loaded)
    session: Option<AnnotatorSession>,

    /// Host collaborator for the current session
    host: Option<FileHost>,

    /// Decoded photo backing the session, used for texture upload and
    /// thumbnail flattening
    base_image: Option<RgbaImage>,

    /// Loaded photo texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Photo dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background photo loading
    photo_loader: Option<Receiver<Result<LoadedPhoto, String>>>,

    /// Receiver for background thumbnail flattening
    save_job: Option<Receiver<Result<RgbaImage, RenderError>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last save failure, shown until dismissed
    save_error: Option<String>,

    /// Clear-all confirmation dialog visibility
    confirm_clear: bool,

    /// Draft input for the open value prompt
    drafts: PromptDrafts,
}

impl FitmarkApp {
    /// Create a new fitmark application instance.
    pub fn new(upload: UploadContext) -> Self {
        Self {
            upload,
            session: None,
            host: None,
            base_image: None,
            image_texture: None,
            image_size: None,
            photo_loader: None,
            save_job: None,
            loading_message: None,
            save_error: None,
            confirm_clear: false,
            drafts: PromptDrafts::default(),
        }
    }

    /// Load a photo file and open a fresh session over it (asynchronously).
    fn open_photo(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.photo_loader = Some(receiver);
        self.loading_message = Some("Loading photo...".to_string());

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = io::media::load_image(&path)
                .map(|img| {
                    log::info!(
                        "Loaded photo: {} ({}x{})",
                        path.display(),
                        img.width(),
                        img.height()
                    );
                    LoadedPhoto {
                        path,
                        rgba: img.rgba,
                    }
                })
                .map_err(|e| format!("Failed to load photo: {e}"));
            let _ = sender.send(result);
        });
    }

    /// Restore a previously saved annotation set over the open photo.
    fn load_annotations(&mut self, path: PathBuf) {
        let Some(session) = &self.session else {
            return;
        };

        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => io::serialization::import_yaml(&path),
            Some("json") => io::serialization::import_json(&path),
            _ => {
                log::error!("Unsupported file extension: {:?}", extension);
                return;
            }
        };

        match result {
            Ok(set) => {
                log::info!("Imported {} annotations from {}", set.len(), path.display());
                let image_uri = session.image_uri().to_string();
                self.session = Some(AnnotatorSession::open(image_uri, Some(set)));
            }
            Err(e) => log::error!("Failed to import annotations: {e}"),
        }
    }

    /// Kick off a save: flatten on a background thread, commit when done.
    fn start_save(&mut self) {
        let (Some(session), Some(base)) = (&mut self.session, &self.base_image) else {
            return;
        };
        let Some(scene) = session.begin_save() else {
            return;
        };

        let base = base.clone();
        let (sender, receiver) = channel();
        self.save_job = Some(receiver);
        std::thread::spawn(move || {
            let _ = sender.send(crate::render::raster::flatten(&base, &scene));
        });
    }

    /// Drop the finished session and its photo state.
    fn close_session(&mut self) {
        self.session = None;
        self.host = None;
        self.base_image = None;
        self.image_texture = None;
        self.image_size = None;
        self.drafts.clear();
        self.confirm_clear = false;
    }

    fn poll_photo_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.photo_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.photo_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.rgba.width() as usize, loaded.rgba.height() as usize];
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(size, loaded.rgba.as_raw());
                let texture =
                    ctx.load_texture("loaded_photo", color_image, egui::TextureOptions::LINEAR);

                self.image_texture = Some(texture);
                self.image_size = Some((loaded.rgba.width(), loaded.rgba.height()));
                self.base_image = Some(loaded.rgba);
                self.host = Some(FileHost::new(self.upload.clone(), loaded.path.clone()));
                self.session = Some(AnnotatorSession::open(
                    loaded.path.to_string_lossy().to_string(),
                    None,
                ));
                log::info!("Opened annotation session");
            }
            Err(e) => {
                log::error!("{e}");
            }
        }
    }

    fn poll_save_job(&mut self) {
        let Some(receiver) = &self.save_job else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.save_job = None;

        let (Some(session), Some(host)) = (&mut self.session, &mut self.host) else {
            return;
        };
        match session.finish_save(host, result) {
            Ok(()) => self.close_session(),
            Err(e) => self.save_error = Some(e.to_string()),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let Some(session) = &mut self.session else {
            return;
        };

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if session.pending_prompt().is_some() {
                session.cancel_prompt();
                self.drafts.clear();
            } else {
                session.abort_gesture();
            }
        }

        // Only process shortcuts when no text field is focused
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift)
            {
                if session.undo() {
                    log::info!("Undo");
                }
            }

            if ctx.input(|i| {
                (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (i.modifiers.command && i.key_pressed(egui::Key::Y))
            }) {
                if session.redo() {
                    log::info!("Redo");
                }
            }
        }
    }
}

impl eframe::App for FitmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_photo_loader(ctx);
        self.poll_save_job();

        // Request repaint while background work is pending
        if self.loading_message.is_some() || self.save_job.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Photo...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Photos", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.open_photo(path);
                        }
                        ui.close_menu();
                    }

                    let has_session = self.session.is_some();
                    if ui
                        .add_enabled(has_session, egui::Button::new("Load Annotations..."))
                        .clicked()
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.load_annotations(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    let can_save = self
                        .session
                        .as_ref()
                        .is_some_and(|s| s.is_dirty() && !s.is_saving());
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save & Upload"))
                        .clicked()
                    {
                        self.start_save();
                        ui.close_menu();
                    }

                    if ui
                        .add_enabled(has_session, egui::Button::new("Cancel Session"))
                        .clicked()
                    {
                        if let (Some(session), Some(host)) = (&mut self.session, &mut self.host) {
                            session.cancel(host);
                        }
                        if self.session.as_ref().is_some_and(|s| s.is_closed()) {
                            self.close_session();
                        }
                        ui.close_menu();
                    }

                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.session.as_ref().is_some_and(|s| s.can_undo());
                    if ui
                        .add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        if let Some(session) = &mut self.session {
                            session.undo();
                            log::info!("Undo from menu");
                        }
                        ui.close_menu();
                    }

                    let can_redo = self.session.as_ref().is_some_and(|s| s.can_redo());
                    if ui
                        .add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        if let Some(session) = &mut self.session {
                            session.redo();
                            log::info!("Redo from menu");
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    let has_session = self.session.is_some();
                    if ui
                        .add_enabled(has_session, egui::Button::new("Clear All..."))
                        .clicked()
                    {
                        self.confirm_clear = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        if self.session.is_some() {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                if let Some(session) = &mut self.session {
                    toolbar::show(ui, session);
                }
            });
        }

        self.handle_keyboard(ctx);

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else if let Some(session) = &mut self.session {
                canvas::show(ui, session, &self.image_texture, self.image_size);
            } else {
                // Welcome message when no photo is loaded
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("FITMARK")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new("Fitting Photo Markup")
                                .size(14.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Open a fitting photo to begin annotating")
                                .color(egui::Color32::from_gray(180)),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new("File → Open Photo...")
                                .weak()
                                .color(egui::Color32::from_gray(130)),
                        );
                    });
                });
            }
        });

        // Value-capture modal for the pending prompt
        if let Some(session) = &mut self.session {
            prompts::show(ctx, session, &mut self.drafts);
        }

        // Clear-all confirmation
        if self.confirm_clear {
            egui::Window::new("Clear all annotations?")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("Every annotation on this photo will be removed.");
                    ui.horizontal(|ui| {
                        if ui.button("Clear").clicked() {
                            if let Some(session) = &mut self.session {
                                session.clear_all_confirmed();
                                log::info!("Cleared all annotations");
                            }
                            self.confirm_clear = false;
                        }
                        if ui.button("Keep").clicked() {
                            self.confirm_clear = false;
                        }
                    });
                });
        }

        // Save failure notice; the set stays dirty so the user can retry
        if let Some(error) = self.save_error.clone() {
            egui::Window::new("Save failed")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(error);
                    if ui.button("Dismiss").clicked() {
                        self.save_error = None;
                    }
                });
        }
    }
}
