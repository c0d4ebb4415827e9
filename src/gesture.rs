// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gesture interpretation.
//!
//! This module turns the host's raw press/move/release stream into
//! annotation mutations according to the active tool mode. It owns the
//! in-progress (uncommitted) shape and the drag session; the store stays
//! the single source of truth for committed annotations.

use crate::models::annotation::{
    AnnotationRef, Color, IconAnnotation, IconKind, PathAnnotation, Point, RectAnnotation,
};
use crate::models::store::AnnotationStore;

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Draw,
    Text,
    Tick,
    Cross,
    Rectangle,
    Measure,
    Compare,
    Select,
    Delete,
}

impl ToolMode {
    /// Display name for toolbar labels.
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Draw => "Draw",
            ToolMode::Text => "Text",
            ToolMode::Tick => "Tick",
            ToolMode::Cross => "Cross",
            ToolMode::Rectangle => "Rectangle",
            ToolMode::Measure => "Measure",
            ToolMode::Compare => "Compare",
            ToolMode::Select => "Select",
            ToolMode::Delete => "Delete",
        }
    }

    pub fn all() -> &'static [ToolMode] {
        &[
            ToolMode::Draw,
            ToolMode::Text,
            ToolMode::Tick,
            ToolMode::Cross,
            ToolMode::Rectangle,
            ToolMode::Measure,
            ToolMode::Compare,
            ToolMode::Select,
            ToolMode::Delete,
        ]
    }
}

/// A shape being drawn by the current gesture, not yet in the store.
#[derive(Debug, Clone)]
pub enum InProgressShape {
    Path { points: Vec<Point>, color: Color },
    Rect { start: Point, end: Point, color: Color },
    Measure { start: Point, end: Point },
    Compare { start: Point, end: Point },
}

/// A value-capture request raised by a gesture; the controller opens
/// the matching modal and commits on confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptRequest {
    /// Text entry for a label anchored at the press point.
    Text { anchor: Point },
    /// One value for a finished measurement line.
    Measurement { start: Point, end: Point },
    /// Current and target values for a finished comparison line.
    Comparison { start: Point, end: Point },
}

/// An active drag of one committed annotation.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    target: AnnotationRef,
    /// Last observed pointer position; deltas are re-based every move
    /// so they never compound.
    last: Point,
}

/// Interprets the pointer stream for the active tool mode.
pub struct GestureMachine {
    mode: ToolMode,
    stroke_color: Color,
    in_progress: Option<InProgressShape>,
    drag: Option<DragSession>,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureMachine {
    pub fn new() -> Self {
        Self {
            mode: ToolMode::Draw,
            stroke_color: Color::RED,
            in_progress: None,
            drag: None,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tool mode, discarding any uncommitted shape or drag.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.mode != mode {
            self.abort();
            self.mode = mode;
        }
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    /// The uncommitted shape for the renderer to draw on top.
    pub fn in_progress(&self) -> Option<&InProgressShape> {
        self.in_progress.as_ref()
    }

    /// Discard any uncommitted shape and end any drag.
    pub fn abort(&mut self) {
        self.in_progress = None;
        self.drag = None;
    }

    /// Pointer pressed at `point`.
    ///
    /// Icon modes commit immediately; the text mode raises its prompt
    /// straight away. All other modes start an in-progress shape or a
    /// drag session.
    pub fn press_start(&mut self, store: &mut AnnotationStore, point: Point) -> Option<PromptRequest> {
        match self.mode {
            ToolMode::Draw => {
                self.in_progress = Some(InProgressShape::Path {
                    points: vec![point],
                    color: self.stroke_color,
                });
                None
            }
            ToolMode::Rectangle => {
                self.in_progress = Some(InProgressShape::Rect {
                    start: point,
                    end: point,
                    color: self.stroke_color,
                });
                None
            }
            ToolMode::Measure => {
                self.in_progress = Some(InProgressShape::Measure {
                    start: point,
                    end: point,
                });
                None
            }
            ToolMode::Compare => {
                self.in_progress = Some(InProgressShape::Compare {
                    start: point,
                    end: point,
                });
                None
            }
            ToolMode::Text => Some(PromptRequest::Text { anchor: point }),
            ToolMode::Tick => {
                store.add_icon(IconAnnotation::new(IconKind::Tick, point));
                None
            }
            ToolMode::Cross => {
                store.add_icon(IconAnnotation::new(IconKind::Cross, point));
                None
            }
            ToolMode::Select => {
                if let Some(target) = store.hit_test(point) {
                    // One snapshot for the whole drag.
                    store.checkpoint();
                    self.drag = Some(DragSession { target, last: point });
                    log::info!("Started dragging {:?} {}", target.kind, target.id);
                }
                None
            }
            ToolMode::Delete => {
                if let Some(removed) = store.remove_first_at(point) {
                    log::info!("Deleted {:?} {}", removed.kind, removed.id);
                }
                None
            }
        }
    }

    /// Pointer moved to `point` while pressed.
    pub fn press_move(&mut self, store: &mut AnnotationStore, point: Point) {
        if let Some(drag) = &mut self.drag {
            let dx = point.x - drag.last.x;
            let dy = point.y - drag.last.y;
            store.translate(drag.target, dx, dy);
            drag.last = point;
            return;
        }

        match &mut self.in_progress {
            Some(InProgressShape::Path { points, .. }) => points.push(point),
            Some(InProgressShape::Rect { end, .. })
            | Some(InProgressShape::Measure { end, .. })
            | Some(InProgressShape::Compare { end, .. }) => *end = point,
            None => {}
        }
    }

    /// Pointer released.
    ///
    /// Freehand paths and rectangles commit here; measurement shapes
    /// hand off to a value prompt instead and only commit when the
    /// controller confirms it.
    pub fn press_end(&mut self, store: &mut AnnotationStore) -> Option<PromptRequest> {
        if self.drag.take().is_some() {
            return None;
        }

        match self.in_progress.take() {
            Some(InProgressShape::Path { points, color }) => {
                store.add_path(PathAnnotation::new(points, color));
                None
            }
            Some(InProgressShape::Rect { start, end, color }) => {
                store.add_rect(RectAnnotation::new(start, end, color));
                None
            }
            Some(InProgressShape::Measure { start, end }) => {
                Some(PromptRequest::Measurement { start, end })
            }
            Some(InProgressShape::Compare { start, end }) => {
                Some(PromptRequest::Comparison { start, end })
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_draw_gesture_commits_path_on_release() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Draw);

        gesture.press_start(&mut store, pt(1.0, 1.0));
        gesture.press_move(&mut store, pt(2.0, 2.0));
        gesture.press_move(&mut store, pt(3.0, 4.0));
        assert!(store.paths().is_empty());

        gesture.press_end(&mut store);
        assert_eq!(store.paths().len(), 1);
        assert_eq!(
            store.paths()[0].points,
            vec![pt(1.0, 1.0), pt(2.0, 2.0), pt(3.0, 4.0)]
        );
    }

    #[test]
    fn test_single_point_path_commits() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Draw);

        gesture.press_start(&mut store, pt(7.0, 7.0));
        gesture.press_end(&mut store);
        assert_eq!(store.paths().len(), 1);
        assert_eq!(store.paths()[0].points, vec![pt(7.0, 7.0)]);
    }

    #[test]
    fn test_rectangle_gesture_tracks_end_corner() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Rectangle);

        gesture.press_start(&mut store, pt(10.0, 10.0));
        gesture.press_move(&mut store, pt(60.0, 40.0));
        gesture.press_end(&mut store);

        assert_eq!(store.rects().len(), 1);
        assert_eq!(store.rects()[0].start, pt(10.0, 10.0));
        assert_eq!(store.rects()[0].end, pt(60.0, 40.0));
    }

    #[test]
    fn test_icon_modes_commit_on_press() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();

        gesture.set_mode(ToolMode::Tick);
        gesture.press_start(&mut store, pt(100.0, 100.0));
        assert_eq!(store.icons().len(), 1);
        assert_eq!(store.icons()[0].kind, IconKind::Tick);

        gesture.set_mode(ToolMode::Cross);
        gesture.press_start(&mut store, pt(150.0, 150.0));
        assert_eq!(store.icons().len(), 2);
        assert_eq!(store.icons()[1].kind, IconKind::Cross);
    }

    #[test]
    fn test_text_mode_raises_prompt_without_mutation() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Text);

        let prompt = gesture.press_start(&mut store, pt(40.0, 50.0));
        assert_eq!(prompt, Some(PromptRequest::Text { anchor: pt(40.0, 50.0) }));
        assert!(store.texts().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_measure_release_raises_prompt_without_commit() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Measure);

        gesture.press_start(&mut store, pt(0.0, 0.0));
        gesture.press_move(&mut store, pt(100.0, 0.0));
        let prompt = gesture.press_end(&mut store);

        assert_eq!(
            prompt,
            Some(PromptRequest::Measurement {
                start: pt(0.0, 0.0),
                end: pt(100.0, 0.0),
            })
        );
        assert!(store.measurements().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_drag_deltas_rebase_per_move() {
        let mut store = AnnotationStore::new();
        let id = store.add_icon(IconAnnotation::new(IconKind::Tick, pt(100.0, 100.0)));

        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Select);

        gesture.press_start(&mut store, pt(100.0, 100.0));
        // Per-event deltas sum to (30, -12) over an uneven path.
        gesture.press_move(&mut store, pt(110.0, 96.0));
        gesture.press_move(&mut store, pt(105.0, 92.0));
        gesture.press_move(&mut store, pt(130.0, 88.0));
        gesture.press_end(&mut store);

        let icon = &store.icons()[0];
        assert_eq!(icon.id, id);
        assert!((icon.anchor.x - 130.0).abs() < 1e-4);
        assert!((icon.anchor.y - 88.0).abs() < 1e-4);
    }

    #[test]
    fn test_whole_drag_is_one_undo_step() {
        let mut store = AnnotationStore::new();
        store.add_icon(IconAnnotation::new(IconKind::Tick, pt(100.0, 100.0)));

        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Select);
        gesture.press_start(&mut store, pt(100.0, 100.0));
        gesture.press_move(&mut store, pt(120.0, 100.0));
        gesture.press_move(&mut store, pt(140.0, 100.0));
        gesture.press_end(&mut store);

        store.undo();
        assert_eq!(store.icons()[0].anchor, pt(100.0, 100.0));
    }

    #[test]
    fn test_select_miss_starts_no_drag() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Select);

        gesture.press_start(&mut store, pt(5.0, 5.0));
        gesture.press_move(&mut store, pt(50.0, 50.0));
        gesture.press_end(&mut store);
        assert!(!store.can_undo());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_delete_mode_removes_one_per_press() {
        let mut store = AnnotationStore::new();
        store.add_icon(IconAnnotation::new(IconKind::Tick, pt(100.0, 100.0)));
        store.add_icon(IconAnnotation::new(IconKind::Cross, pt(110.0, 100.0)));

        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Delete);
        gesture.press_start(&mut store, pt(105.0, 100.0));
        assert_eq!(store.icons().len(), 1);
    }

    #[test]
    fn test_delete_prefers_text_over_icon() {
        let mut store = AnnotationStore::new();
        store.add_icon(IconAnnotation::new(IconKind::Tick, pt(100.0, 100.0)));
        store.add_text(crate::models::annotation::TextAnnotation::new(
            "sleeve".into(),
            pt(108.0, 104.0),
            Color::RED,
        ));

        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Delete);
        gesture.press_start(&mut store, pt(102.0, 101.0));

        assert!(store.texts().is_empty());
        assert_eq!(store.icons().len(), 1);
    }

    #[test]
    fn test_mode_switch_discards_in_progress_shape() {
        let mut store = AnnotationStore::new();
        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Rectangle);
        gesture.press_start(&mut store, pt(10.0, 10.0));
        gesture.press_move(&mut store, pt(50.0, 50.0));

        gesture.set_mode(ToolMode::Draw);
        assert!(gesture.in_progress().is_none());

        // Release in the new mode does nothing.
        gesture.press_end(&mut store);
        assert!(store.rects().is_empty());
        assert!(store.paths().is_empty());
    }

    #[test]
    fn test_select_drag_targets_priority_hit() {
        let mut store = AnnotationStore::new();
        store.add_rect(RectAnnotation::new(pt(80.0, 80.0), pt(140.0, 140.0), Color::RED));
        let text_id = store.add_text(crate::models::annotation::TextAnnotation::new(
            "dart".into(),
            pt(100.0, 100.0),
            Color::BLUE,
        ));

        let mut gesture = GestureMachine::new();
        gesture.set_mode(ToolMode::Select);
        gesture.press_start(&mut store, pt(100.0, 100.0));
        gesture.press_move(&mut store, pt(120.0, 120.0));
        gesture.press_end(&mut store);

        // The text moved; the rect stayed where it was drawn.
        let text = store.texts().iter().find(|t| t.id == text_id).unwrap();
        assert_eq!(text.anchor, pt(120.0, 120.0));
        assert_eq!(store.rects()[0].start, pt(80.0, 80.0));
    }
}
