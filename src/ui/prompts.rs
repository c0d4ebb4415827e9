// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Value-capture modals.
//!
//! This module renders the text, measurement and comparison prompts a
//! gesture can raise, and feeds the confirmed values back into the
//! session. Confirming with empty values discards the shape; that is
//! handled by the session, not here.

use crate::gesture::PromptRequest;
use crate::session::AnnotatorSession;

/// Draft input for whichever prompt is open.
#[derive(Default)]
pub struct PromptDrafts {
    pub text: String,
    pub value: String,
    pub current: String,
    pub target: String,
}

impl PromptDrafts {
    pub fn clear(&mut self) {
        self.text.clear();
        self.value.clear();
        self.current.clear();
        self.target.clear();
    }
}

/// Show the modal for the session's pending prompt, if any.
pub fn show(ctx: &egui::Context, session: &mut AnnotatorSession, drafts: &mut PromptDrafts) {
    let Some(prompt) = session.pending_prompt().cloned() else {
        return;
    };

    match prompt {
        PromptRequest::Text { .. } => {
            let mut confirm = false;
            let mut cancel = false;
            egui::Window::new("Text label")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    let edit = ui.text_edit_singleline(&mut drafts.text);
                    edit.request_focus();
                    ui.horizontal(|ui| {
                        confirm = ui.button("Add").clicked()
                            || edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            if confirm {
                session.confirm_text(&drafts.text);
                drafts.clear();
            } else if cancel {
                session.cancel_prompt();
                drafts.clear();
            }
        }
        PromptRequest::Measurement { .. } => {
            let mut confirm = false;
            let mut cancel = false;
            egui::Window::new("Measurement")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("Value:");
                    let edit = ui.text_edit_singleline(&mut drafts.value);
                    edit.request_focus();
                    ui.horizontal(|ui| {
                        confirm = ui.button("Add").clicked()
                            || edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            if confirm {
                session.confirm_measurement(&drafts.value);
                drafts.clear();
            } else if cancel {
                session.cancel_prompt();
                drafts.clear();
            }
        }
        PromptRequest::Comparison { .. } => {
            let mut confirm = false;
            let mut cancel = false;
            egui::Window::new("Comparison")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("Current:");
                    ui.text_edit_singleline(&mut drafts.current);
                    ui.label("Target:");
                    ui.text_edit_singleline(&mut drafts.target);
                    ui.horizontal(|ui| {
                        confirm = ui.button("Add").clicked();
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            if confirm {
                session.confirm_comparison(&drafts.current, &drafts.target);
                drafts.clear();
            } else if cancel {
                session.cancel_prompt();
                drafts.clear();
            }
        }
    }
}
