// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canonical annotation storage and undo history.
//!
//! The store owns the committed annotation collections for one editing
//! session. Every mutating operation records a full snapshot of the
//! collections *before* applying the change, so undo restores them
//! wholesale. The continuous-move phase of a drag is the one exception:
//! it shares the single snapshot taken at drag start.

use super::annotation::{
    AnnotationId, AnnotationKind, AnnotationRef, ComparisonMeasurement, IconAnnotation,
    MeasurementAnnotation, PathAnnotation, Point, RectAnnotation, TextAnnotation,
};
use super::set::AnnotationSet;
use crate::util::geometry;

/// All committed annotation collections, snapshotted as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub paths: Vec<PathAnnotation>,
    pub texts: Vec<TextAnnotation>,
    pub icons: Vec<IconAnnotation>,
    pub rects: Vec<RectAnnotation>,
    pub measurements: Vec<MeasurementAnnotation>,
    pub comparisons: Vec<ComparisonMeasurement>,
}

impl Collections {
    fn is_empty(&self) -> bool {
        self.paths.is_empty()
            && self.texts.is_empty()
            && self.icons.is_empty()
            && self.rects.is_empty()
            && self.measurements.is_empty()
            && self.comparisons.is_empty()
    }
}

/// History system for undo/redo functionality.
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Collections>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Collections>,
    /// Maximum history size
    max_size: usize,
}

impl History {
    fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: 50, // Keep last 50 states
        }
    }

    /// Save current state before making a change
    fn push(&mut self, state: Collections) {
        self.undo_stack.push(state);
        // Limit history size
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    fn undo(&mut self, current: Collections) -> Option<Collections> {
        if let Some(previous) = self.undo_stack.pop() {
            self.redo_stack.push(current);
            Some(previous)
        } else {
            None
        }
    }

    /// Redo: restore next state
    fn redo(&mut self, current: Collections) -> Option<Collections> {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(current);
            Some(next)
        } else {
            None
        }
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// The single source of truth for one photo's annotations.
pub struct AnnotationStore {
    items: Collections,
    history: History,
    /// Next id to hand out. Ids are never reused within a session.
    next_id: AnnotationId,
    /// True once any mutating operation has run since the last save.
    dirty: bool,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    /// Create an empty store with fresh history.
    pub fn new() -> Self {
        Self {
            items: Collections::default(),
            history: History::new(),
            next_id: 1,
            dirty: false,
        }
    }

    /// Restore a store from a previously saved set.
    ///
    /// Annotations with id 0 (unassigned) get fresh ids; the id counter
    /// resumes past the highest id seen so loaded ids stay unique.
    pub fn from_set(set: AnnotationSet) -> Self {
        let mut store = Self::new();
        store.items = Collections {
            paths: set.paths,
            texts: set.texts,
            icons: set.icons,
            rects: set.rects,
            measurements: set.measurements,
            comparisons: set.comparisons,
        };

        let mut max_id = 0;
        for p in &store.items.paths {
            max_id = max_id.max(p.id);
        }
        for t in &store.items.texts {
            max_id = max_id.max(t.id);
        }
        for i in &store.items.icons {
            max_id = max_id.max(i.id);
        }
        for r in &store.items.rects {
            max_id = max_id.max(r.id);
        }
        for m in &store.items.measurements {
            max_id = max_id.max(m.id);
        }
        for c in &store.items.comparisons {
            max_id = max_id.max(c.id);
        }
        store.next_id = max_id + 1;

        macro_rules! assign_missing {
            ($coll:expr) => {
                for item in &mut $coll {
                    if item.id == 0 {
                        item.id = store.next_id;
                        store.next_id += 1;
                    }
                }
            };
        }
        assign_missing!(store.items.paths);
        assign_missing!(store.items.texts);
        assign_missing!(store.items.icons);
        assign_missing!(store.items.rects);
        assign_missing!(store.items.measurements);
        assign_missing!(store.items.comparisons);

        store
    }

    /// Externalize the current collections for persistence.
    pub fn to_set(&self) -> AnnotationSet {
        AnnotationSet {
            paths: self.items.paths.clone(),
            texts: self.items.texts.clone(),
            icons: self.items.icons.clone(),
            rects: self.items.rects.clone(),
            measurements: self.items.measurements.clone(),
            comparisons: self.items.comparisons.clone(),
            thumbnail: None,
        }
    }

    fn alloc_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self) {
        self.history.push(self.items.clone());
    }

    /// Snapshot the current state without mutating it.
    ///
    /// Used at drag start so the whole drag is one undo step.
    pub fn checkpoint(&mut self) {
        self.record();
    }

    pub fn add_path(&mut self, mut path: PathAnnotation) -> AnnotationId {
        self.record();
        if path.id == 0 {
            path.id = self.alloc_id();
        }
        let id = path.id;
        self.items.paths.push(path);
        self.dirty = true;
        id
    }

    pub fn add_text(&mut self, mut text: TextAnnotation) -> AnnotationId {
        self.record();
        if text.id == 0 {
            text.id = self.alloc_id();
        }
        let id = text.id;
        self.items.texts.push(text);
        self.dirty = true;
        id
    }

    pub fn add_icon(&mut self, mut icon: IconAnnotation) -> AnnotationId {
        self.record();
        if icon.id == 0 {
            icon.id = self.alloc_id();
        }
        let id = icon.id;
        self.items.icons.push(icon);
        self.dirty = true;
        id
    }

    pub fn add_rect(&mut self, mut rect: RectAnnotation) -> AnnotationId {
        self.record();
        if rect.id == 0 {
            rect.id = self.alloc_id();
        }
        let id = rect.id;
        self.items.rects.push(rect);
        self.dirty = true;
        id
    }

    pub fn add_measurement(&mut self, mut m: MeasurementAnnotation) -> AnnotationId {
        self.record();
        if m.id == 0 {
            m.id = self.alloc_id();
        }
        let id = m.id;
        self.items.measurements.push(m);
        self.dirty = true;
        id
    }

    pub fn add_comparison(&mut self, mut c: ComparisonMeasurement) -> AnnotationId {
        self.record();
        if c.id == 0 {
            c.id = self.alloc_id();
        }
        let id = c.id;
        self.items.comparisons.push(c);
        self.dirty = true;
        id
    }

    /// Translate an annotation by a delta.
    ///
    /// Does not record history: callers snapshot once at drag start via
    /// [`checkpoint`](Self::checkpoint). Silently a no-op if the address
    /// no longer resolves.
    pub fn translate(&mut self, target: AnnotationRef, dx: f32, dy: f32) {
        match target.kind {
            AnnotationKind::Path => {
                if let Some(p) = self.items.paths.iter_mut().find(|p| p.id == target.id) {
                    for point in &mut p.points {
                        *point = point.offset(dx, dy);
                    }
                    self.dirty = true;
                }
            }
            AnnotationKind::Text => {
                if let Some(t) = self.items.texts.iter_mut().find(|t| t.id == target.id) {
                    t.anchor = t.anchor.offset(dx, dy);
                    self.dirty = true;
                }
            }
            AnnotationKind::Icon => {
                if let Some(i) = self.items.icons.iter_mut().find(|i| i.id == target.id) {
                    i.anchor = i.anchor.offset(dx, dy);
                    self.dirty = true;
                }
            }
            AnnotationKind::Rect => {
                if let Some(r) = self.items.rects.iter_mut().find(|r| r.id == target.id) {
                    r.start = r.start.offset(dx, dy);
                    r.end = r.end.offset(dx, dy);
                    self.dirty = true;
                }
            }
            AnnotationKind::Measurement => {
                if let Some(m) = self
                    .items
                    .measurements
                    .iter_mut()
                    .find(|m| m.id == target.id)
                {
                    m.start = m.start.offset(dx, dy);
                    m.end = m.end.offset(dx, dy);
                    self.dirty = true;
                }
            }
            AnnotationKind::Comparison => {
                if let Some(c) = self
                    .items
                    .comparisons
                    .iter_mut()
                    .find(|c| c.id == target.id)
                {
                    c.start = c.start.offset(dx, dy);
                    c.end = c.end.offset(dx, dy);
                    self.dirty = true;
                }
            }
        }
    }

    /// Remove one annotation by address. Silently a no-op if absent.
    pub fn remove(&mut self, target: AnnotationRef) {
        if !self.exists(target) {
            return;
        }
        self.record();
        match target.kind {
            AnnotationKind::Path => self.items.paths.retain(|p| p.id != target.id),
            AnnotationKind::Text => self.items.texts.retain(|t| t.id != target.id),
            AnnotationKind::Icon => self.items.icons.retain(|i| i.id != target.id),
            AnnotationKind::Rect => self.items.rects.retain(|r| r.id != target.id),
            AnnotationKind::Measurement => self.items.measurements.retain(|m| m.id != target.id),
            AnnotationKind::Comparison => self.items.comparisons.retain(|c| c.id != target.id),
        }
        self.dirty = true;
    }

    fn exists(&self, target: AnnotationRef) -> bool {
        match target.kind {
            AnnotationKind::Path => self.items.paths.iter().any(|p| p.id == target.id),
            AnnotationKind::Text => self.items.texts.iter().any(|t| t.id == target.id),
            AnnotationKind::Icon => self.items.icons.iter().any(|i| i.id == target.id),
            AnnotationKind::Rect => self.items.rects.iter().any(|r| r.id == target.id),
            AnnotationKind::Measurement => {
                self.items.measurements.iter().any(|m| m.id == target.id)
            }
            AnnotationKind::Comparison => self.items.comparisons.iter().any(|c| c.id == target.id),
        }
    }

    /// Remove the first annotation touched at `point`, if any.
    ///
    /// One removal per call, so a delete gesture takes out exactly one
    /// object even when several overlap.
    pub fn remove_first_at(&mut self, point: Point) -> Option<AnnotationRef> {
        let target = self.hit_test(point)?;
        self.remove(target);
        Some(target)
    }

    /// Find the annotation under `point`.
    ///
    /// Probes the selectable kinds in fixed priority order: text, icon,
    /// rectangle, measurement, comparison. Freehand paths are not
    /// individually addressable.
    pub fn hit_test(&self, point: Point) -> Option<AnnotationRef> {
        if let Some(t) = self
            .items
            .texts
            .iter()
            .find(|t| geometry::hit_anchor(t.anchor, point, geometry::TEXT_HIT_RADIUS))
        {
            return Some(AnnotationRef::new(AnnotationKind::Text, t.id));
        }
        if let Some(i) = self
            .items
            .icons
            .iter()
            .find(|i| geometry::hit_anchor(i.anchor, point, geometry::ICON_HIT_RADIUS))
        {
            return Some(AnnotationRef::new(AnnotationKind::Icon, i.id));
        }
        if let Some(r) = self
            .items
            .rects
            .iter()
            .find(|r| geometry::hit_span(r.start, r.end, point, geometry::BOX_HIT_MARGIN))
        {
            return Some(AnnotationRef::new(AnnotationKind::Rect, r.id));
        }
        if let Some(m) = self
            .items
            .measurements
            .iter()
            .find(|m| geometry::hit_span(m.start, m.end, point, geometry::BOX_HIT_MARGIN))
        {
            return Some(AnnotationRef::new(AnnotationKind::Measurement, m.id));
        }
        if let Some(c) = self
            .items
            .comparisons
            .iter()
            .find(|c| geometry::hit_span(c.start, c.end, point, geometry::BOX_HIT_MARGIN))
        {
            return Some(AnnotationRef::new(AnnotationKind::Comparison, c.id));
        }
        None
    }

    /// Empty every collection in one undoable step.
    pub fn clear_all(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.record();
        self.items = Collections::default();
        self.dirty = true;
    }

    /// Restore the state before the last mutating operation.
    ///
    /// A no-op when the history stack is empty.
    pub fn undo(&mut self) -> bool {
        if let Some(previous) = self.history.undo(self.items.clone()) {
            self.items = previous;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Reapply the most recently undone operation.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.history.redo(self.items.clone()) {
            self.items = next;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True if any mutating operation has run since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Drop all history, e.g. when a session opens over a restored set.
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    pub fn paths(&self) -> &[PathAnnotation] {
        &self.items.paths
    }

    pub fn texts(&self) -> &[TextAnnotation] {
        &self.items.texts
    }

    pub fn icons(&self) -> &[IconAnnotation] {
        &self.items.icons
    }

    pub fn rects(&self) -> &[RectAnnotation] {
        &self.items.rects
    }

    pub fn measurements(&self) -> &[MeasurementAnnotation] {
        &self.items.measurements
    }

    pub fn comparisons(&self) -> &[ComparisonMeasurement] {
        &self.items.comparisons
    }
}
