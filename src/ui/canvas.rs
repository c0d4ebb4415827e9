// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for photo display and annotation.
//!
//! This module shows the photo fitted to the available panel, feeds
//! pointer gestures into the session in image pixel coordinates, and
//! paints the session's scene primitives on top of the photo.

use crate::models::annotation::{Color, IconKind, Point};
use crate::render::scene::{ScenePrim, ICON_HALF};
use crate::session::AnnotatorSession;

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

/// Display the canvas area and route pointer interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut AnnotatorSession,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Loading photo...").color(egui::Color32::WHITE),
                );
            });
            return;
        };

        // Calculate scaling to fit the photo in the available space
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            // Photo is wider - fit to width
            let width = available.x;
            let height = width / img_aspect;
            (width, height)
        } else {
            // Photo is taller - fit to height
            let height = available.y;
            let width = height * img_aspect;
            (width, height)
        };

        // Center the photo
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );
        let scale = display_width / img_width as f32;

        // Draw the photo
        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Pointer gestures, delivered in image pixel coordinates
        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let to_image = |pos: egui::Pos2| {
            Point::new(
                (pos.x - image_rect.min.x) / scale,
                (pos.y - image_rect.min.y) / scale,
            )
        };

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.on_press_start(to_image(pos));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.on_press_move(to_image(pos));
            }
        }
        if response.drag_stopped() {
            session.on_press_end();
        }
        if response.clicked() {
            // A tap without movement: full press/release cycle.
            if let Some(pos) = response.interact_pointer_pos() {
                let p = to_image(pos);
                session.on_press_start(p);
                session.on_press_end();
            }
        }

        // Paint the scene, in-progress shape on top
        let painter = ui.painter_at(image_rect.expand(2.0));
        for prim in session.display_scene() {
            draw_prim(&painter, &prim, image_rect, scale);
        }
    });

    // Display current tool info at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Current tool: {}", session.mode().name()));
        ui.separator();
        if session.is_saving() {
            ui.label("Saving...");
        } else if session.is_dirty() {
            ui.label("Unsaved changes");
        } else {
            ui.label("Ready");
        }
    });
}

fn draw_prim(painter: &egui::Painter, prim: &ScenePrim, image_rect: egui::Rect, scale: f32) {
    let to_screen = |p: Point| {
        egui::pos2(
            image_rect.min.x + p.x * scale,
            image_rect.min.y + p.y * scale,
        )
    };

    match prim {
        ScenePrim::Stroke { points, color, width } => {
            let stroke = egui::Stroke::new(width * scale, color32(*color));
            if points.len() == 1 {
                painter.circle_filled(to_screen(points[0]), (width * scale).max(1.5), stroke.color);
            } else {
                let screen: Vec<egui::Pos2> = points.iter().map(|p| to_screen(*p)).collect();
                painter.add(egui::Shape::line(screen, stroke));
            }
        }
        ScenePrim::Segment { a, b, color, width } => {
            painter.line_segment(
                [to_screen(*a), to_screen(*b)],
                egui::Stroke::new(width * scale, color32(*color)),
            );
        }
        ScenePrim::Box { start, end, color, width } => {
            let rect = egui::Rect::from_two_pos(to_screen(*start), to_screen(*end));
            painter.rect_stroke(rect, 2.0, egui::Stroke::new(width * scale, color32(*color)));
        }
        ScenePrim::Chip {
            center,
            angle_deg,
            text,
            fill,
            text_color,
        } => {
            draw_chip(painter, to_screen(*center), *angle_deg, text, *fill, *text_color, scale);
        }
        ScenePrim::Glyph { kind, center } => {
            let c = to_screen(*center);
            let h = ICON_HALF * scale;
            match kind {
                IconKind::Tick => {
                    let stroke = egui::Stroke::new(3.0 * scale, color32(Color::GREEN));
                    painter.line_segment(
                        [egui::pos2(c.x - h, c.y), egui::pos2(c.x - h * 0.25, c.y + h * 0.7)],
                        stroke,
                    );
                    painter.line_segment(
                        [
                            egui::pos2(c.x - h * 0.25, c.y + h * 0.7),
                            egui::pos2(c.x + h, c.y - h * 0.8),
                        ],
                        stroke,
                    );
                }
                IconKind::Cross => {
                    let stroke = egui::Stroke::new(3.0 * scale, color32(Color::RED));
                    painter.line_segment(
                        [egui::pos2(c.x - h, c.y - h), egui::pos2(c.x + h, c.y + h)],
                        stroke,
                    );
                    painter.line_segment(
                        [egui::pos2(c.x - h, c.y + h), egui::pos2(c.x + h, c.y - h)],
                        stroke,
                    );
                }
            }
        }
    }
}

/// A rounded label chip, rotated to follow its measurement line.
fn draw_chip(
    painter: &egui::Painter,
    center: egui::Pos2,
    angle_deg: f32,
    text: &str,
    fill: Color,
    text_color: Color,
    scale: f32,
) {
    let font = egui::FontId::proportional((16.0 * scale).max(9.0));
    let galley = painter.layout_no_wrap(text.to_string(), font, color32(text_color));
    let size = galley.size();
    let pad = egui::vec2(8.0, 4.0) * scale.max(0.5);

    let angle = angle_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let rotate = |v: egui::Vec2| egui::vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos);

    // Chip background as a rotated quad.
    let half = egui::vec2(size.x / 2.0 + pad.x, size.y / 2.0 + pad.y);
    let corners = [
        egui::vec2(-half.x, -half.y),
        egui::vec2(half.x, -half.y),
        egui::vec2(half.x, half.y),
        egui::vec2(-half.x, half.y),
    ]
    .map(|v| center + rotate(v));
    painter.add(egui::Shape::convex_polygon(
        corners.to_vec(),
        color32(fill).gamma_multiply(0.9),
        egui::Stroke::NONE,
    ));

    // Rotated text, centered on the chip.
    let text_pos = center + rotate(egui::vec2(-size.x / 2.0, -size.y / 2.0));
    painter.add(
        egui::epaint::TextShape::new(text_pos, galley, color32(text_color)).with_angle(angle),
    );
}
