// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flattens a scene over the source photo into the upload thumbnail.
//!
//! Draws with `imageproc` onto an `RgbaImage` copy of the photo. Label
//! chips are rasterized into their own tile, rotated about their center
//! and alpha-composited, so the thumbnail matches the live canvas.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::rect::Rect;

use crate::error::RenderError;
use crate::models::annotation::{Color, IconKind, Point};
use crate::render::scene::{Scene, ScenePrim, ICON_HALF};

/// Label text height in image pixels.
const LABEL_SCALE: f32 = 24.0;

/// Chip padding around the label text.
const CHIP_PAD_X: i32 = 10;
const CHIP_PAD_Y: i32 = 6;

fn rgba(color: Color, alpha: u8) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, alpha])
}

/// The proportional font egui ships; reused here so rasterized labels
/// match the on-screen ones.
fn label_font() -> Result<FontArc, RenderError> {
    let defs = egui::FontDefinitions::default();
    let data = defs
        .font_data
        .get("Ubuntu-Light")
        .or_else(|| defs.font_data.values().next())
        .ok_or_else(|| RenderError::Font("no embedded font available".to_string()))?;
    FontArc::try_from_vec(data.font.to_vec()).map_err(|e| RenderError::Font(e.to_string()))
}

/// Composite the scene over the photo and return the flattened result.
pub fn flatten(base: &RgbaImage, scene: &Scene) -> Result<RgbaImage, RenderError> {
    if base.width() == 0 || base.height() == 0 {
        return Err(RenderError::Composite("source photo has zero size".to_string()));
    }

    let font = label_font()?;
    let mut out = base.clone();

    for prim in scene {
        match prim {
            ScenePrim::Stroke { points, color, width } => {
                if points.len() == 1 {
                    // A tap leaves a dot.
                    let p = points[0];
                    drawing::draw_filled_circle_mut(
                        &mut out,
                        (p.x as i32, p.y as i32),
                        (*width / 2.0).ceil() as i32,
                        rgba(*color, 255),
                    );
                } else {
                    for pair in points.windows(2) {
                        draw_thick_segment(&mut out, pair[0], pair[1], *color, *width);
                    }
                }
            }
            ScenePrim::Segment { a, b, color, width } => {
                draw_thick_segment(&mut out, *a, *b, *color, *width);
            }
            ScenePrim::Box { start, end, color, width } => {
                draw_box(&mut out, *start, *end, *color, *width);
            }
            ScenePrim::Chip {
                center,
                angle_deg,
                text,
                fill,
                text_color,
            } => {
                draw_chip(&mut out, &font, *center, *angle_deg, text, *fill, *text_color);
            }
            ScenePrim::Glyph { kind, center } => {
                draw_glyph(&mut out, *kind, *center);
            }
        }
    }

    Ok(out)
}

/// Approximate a wide line with parallel one-pixel segments.
fn draw_thick_segment(out: &mut RgbaImage, a: Point, b: Point, color: Color, width: f32) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > f32::EPSILON {
        (-dy / len, dx / len)
    } else {
        (0.0, 1.0)
    };

    let color = rgba(color, 255);
    let half = (width / 2.0).floor() as i32;
    for i in -half..=half {
        let ox = nx * i as f32;
        let oy = ny * i as f32;
        drawing::draw_line_segment_mut(
            out,
            (a.x + ox, a.y + oy),
            (b.x + ox, b.y + oy),
            color,
        );
    }
}

fn draw_box(out: &mut RgbaImage, start: Point, end: Point, color: Color, width: f32) {
    let min_x = start.x.min(end.x);
    let min_y = start.y.min(end.y);
    let w = (start.x - end.x).abs().max(1.0) as u32;
    let h = (start.y - end.y).abs().max(1.0) as u32;

    let color = rgba(color, 255);
    let rings = (width / 2.0).floor() as i32;
    for i in 0..=rings {
        let rw = w.saturating_sub(2 * i as u32);
        let rh = h.saturating_sub(2 * i as u32);
        if rw == 0 || rh == 0 {
            break;
        }
        let rect = Rect::at(min_x as i32 + i, min_y as i32 + i).of_size(rw, rh);
        drawing::draw_hollow_rect_mut(out, rect, color);
    }
}

fn draw_glyph(out: &mut RgbaImage, kind: IconKind, center: Point) {
    match kind {
        IconKind::Tick => {
            let color = Color::GREEN;
            draw_thick_segment(
                out,
                Point::new(center.x - ICON_HALF, center.y),
                Point::new(center.x - ICON_HALF * 0.25, center.y + ICON_HALF * 0.7),
                color,
                3.0,
            );
            draw_thick_segment(
                out,
                Point::new(center.x - ICON_HALF * 0.25, center.y + ICON_HALF * 0.7),
                Point::new(center.x + ICON_HALF, center.y - ICON_HALF * 0.8),
                color,
                3.0,
            );
        }
        IconKind::Cross => {
            let color = Color::RED;
            draw_thick_segment(
                out,
                Point::new(center.x - ICON_HALF, center.y - ICON_HALF),
                Point::new(center.x + ICON_HALF, center.y + ICON_HALF),
                color,
                3.0,
            );
            draw_thick_segment(
                out,
                Point::new(center.x - ICON_HALF, center.y + ICON_HALF),
                Point::new(center.x + ICON_HALF, center.y - ICON_HALF),
                color,
                3.0,
            );
        }
    }
}

/// Rasterize a label chip into its own tile, rotate it about its
/// center, and composite it at `center`.
fn draw_chip(
    out: &mut RgbaImage,
    font: &FontArc,
    center: Point,
    angle_deg: f32,
    text: &str,
    fill: Color,
    text_color: Color,
) {
    let scale = PxScale::from(LABEL_SCALE);
    let (text_w, text_h) = drawing::text_size(scale, font, text);
    let chip_w = text_w as i32 + 2 * CHIP_PAD_X;
    let chip_h = text_h as i32 + 2 * CHIP_PAD_Y;

    // Square tile wide enough that rotation never clips the corners.
    let diag = (((chip_w * chip_w + chip_h * chip_h) as f32).sqrt()).ceil() as i32 + 2;
    let mut tile = RgbaImage::from_pixel(diag as u32, diag as u32, Rgba([0, 0, 0, 0]));

    let chip_x = (diag - chip_w) / 2;
    let chip_y = (diag - chip_h) / 2;
    drawing::draw_filled_rect_mut(
        &mut tile,
        Rect::at(chip_x, chip_y).of_size(chip_w as u32, chip_h as u32),
        rgba(fill, 230),
    );
    // Soften the corners.
    let r = CHIP_PAD_Y;
    for (cx, cy) in [
        (chip_x, chip_y),
        (chip_x + chip_w - 1, chip_y),
        (chip_x, chip_y + chip_h - 1),
        (chip_x + chip_w - 1, chip_y + chip_h - 1),
    ] {
        drawing::draw_filled_circle_mut(&mut tile, (cx, cy), r, rgba(fill, 230));
    }
    drawing::draw_text_mut(
        &mut tile,
        rgba(text_color, 255),
        chip_x + CHIP_PAD_X,
        chip_y + CHIP_PAD_Y,
        scale,
        font,
        text,
    );

    let tile = if angle_deg.abs() > f32::EPSILON {
        rotate_about_center(
            &tile,
            angle_deg.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        )
    } else {
        tile
    };

    let x = center.x as i64 - (diag / 2) as i64;
    let y = center.y as i64 - (diag / 2) as i64;
    image::imageops::overlay(out, &tile, x, y);
}
