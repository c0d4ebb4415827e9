// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar interface for selecting the active
//! annotation tool and the stroke color.

use crate::gesture::ToolMode;
use crate::models::annotation::Color;
use crate::session::AnnotatorSession;

const PALETTE: &[Color] = &[Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW, Color::WHITE];

/// Display the toolbar with tool selection buttons.
pub fn show(ui: &mut egui::Ui, session: &mut AnnotatorSession) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        for &mode in ToolMode::all() {
            if ui
                .selectable_label(session.mode() == mode, mode.name())
                .clicked()
            {
                session.set_mode(mode);
            }
        }

        ui.separator();

        for &color in PALETTE {
            let selected = session.stroke_color() == color;
            let swatch = egui::Color32::from_rgb(color.r, color.g, color.b);
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::click());
            ui.painter().rect_filled(rect, 3.0, swatch);
            if selected {
                ui.painter()
                    .rect_stroke(rect, 3.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
            }
            if response.clicked() {
                session.set_stroke_color(color);
            }
        }

        ui.separator();

        // Tool description
        let tool_text = match session.mode() {
            ToolMode::Draw => "Drag to draw a freehand mark",
            ToolMode::Text => "Tap to place a text label",
            ToolMode::Tick => "Tap to place a tick",
            ToolMode::Cross => "Tap to place a cross",
            ToolMode::Rectangle => "Drag to draw a rectangle",
            ToolMode::Measure => "Drag a measurement line, then enter its value",
            ToolMode::Compare => "Drag a line, then enter current and target values",
            ToolMode::Select => "Drag an annotation to move it",
            ToolMode::Delete => "Tap an annotation to delete it",
        };
        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
}
