// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The annotator session controller.
//!
//! One session owns the store, the gesture machine and the prompt/save
//! lifecycle for a single photo, from open to save or cancel. The host
//! side of the contract — persisting the committed set and uploading it
//! — sits behind [`SessionHost`] so the controller stays testable
//! without a UI or a network.

use image::RgbaImage;

use crate::error::{RenderError, SaveError};
use crate::gesture::{GestureMachine, PromptRequest, ToolMode};
use crate::models::annotation::{
    Color, ComparisonMeasurement, MeasurementAnnotation, Point, TextAnnotation,
};
use crate::models::set::AnnotationSet;
use crate::models::store::AnnotationStore;
use crate::render::scene::{self, Scene};

/// Remote style-file service coordinates for the surrounding upload
/// flow. Always passed explicitly; never process-wide state.
#[derive(Debug, Clone, Default)]
pub struct UploadContext {
    pub base_url: String,
    pub style_id: String,
    pub token: String,
}

impl UploadContext {
    /// Read the upload target from the environment, if configured.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("FITMARK_BASE_URL").unwrap_or_default(),
            style_id: std::env::var("FITMARK_STYLE_ID").unwrap_or_default(),
            token: std::env::var("FITMARK_TOKEN").unwrap_or_default(),
        }
    }
}

/// Host-side collaborator: persists the saved set and owns the upload.
pub trait SessionHost {
    /// Persist the committed annotation set and its flattened thumbnail.
    fn on_save(&mut self, set: &AnnotationSet, thumbnail: &RgbaImage) -> anyhow::Result<()>;

    /// The session ended, by save or cancel.
    fn on_close(&mut self);
}

/// Controller for one photo's editing session.
pub struct AnnotatorSession {
    image_uri: String,
    store: AnnotationStore,
    gesture: GestureMachine,
    pending_prompt: Option<PromptRequest>,
    /// Set assembled by `begin_save`, consumed by `finish_save`.
    pending_save: Option<AnnotationSet>,
    saving: bool,
    closed: bool,
}

impl AnnotatorSession {
    /// Open a session over a photo, empty or restored from a
    /// previously saved set. History and the dirty flag start clean.
    pub fn open(image_uri: impl Into<String>, initial: Option<AnnotationSet>) -> Self {
        let mut store = match initial {
            Some(set) => AnnotationStore::from_set(set),
            None => AnnotationStore::new(),
        };
        store.reset_history();
        Self {
            image_uri: image_uri.into(),
            store,
            gesture: GestureMachine::new(),
            pending_prompt: None,
            pending_save: None,
            saving: false,
            closed: false,
        }
    }

    pub fn image_uri(&self) -> &str {
        &self.image_uri
    }

    pub fn mode(&self) -> ToolMode {
        self.gesture.mode()
    }

    /// Switch tool mode; any in-progress shape is discarded.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.gesture.set_mode(mode);
    }

    pub fn stroke_color(&self) -> Color {
        self.gesture.stroke_color()
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.gesture.set_stroke_color(color);
    }

    /// Pointer events are ignored while a modal prompt or a save is in
    /// flight; the session processes one interaction at a time.
    fn accepts_pointer(&self) -> bool {
        !self.saving && !self.closed && self.pending_prompt.is_none()
    }

    pub fn on_press_start(&mut self, point: Point) {
        if !self.accepts_pointer() {
            return;
        }
        if let Some(prompt) = self.gesture.press_start(&mut self.store, point) {
            self.pending_prompt = Some(prompt);
        }
    }

    pub fn on_press_move(&mut self, point: Point) {
        if !self.accepts_pointer() {
            return;
        }
        self.gesture.press_move(&mut self.store, point);
    }

    pub fn on_press_end(&mut self) {
        if !self.accepts_pointer() {
            return;
        }
        if let Some(prompt) = self.gesture.press_end(&mut self.store) {
            self.pending_prompt = Some(prompt);
        }
    }

    /// The open value-capture prompt, if any.
    pub fn pending_prompt(&self) -> Option<&PromptRequest> {
        self.pending_prompt.as_ref()
    }

    /// Confirm the open text prompt. Empty text discards the label
    /// silently; that is validation, not an error.
    pub fn confirm_text(&mut self, text: &str) {
        if let Some(PromptRequest::Text { anchor }) = self.pending_prompt.take() {
            let text = text.trim();
            if !text.is_empty() {
                self.store.add_text(TextAnnotation::new(
                    text.to_string(),
                    anchor,
                    self.gesture.stroke_color(),
                ));
            }
        }
    }

    /// Confirm the open measurement prompt. An empty value discards
    /// the shape.
    pub fn confirm_measurement(&mut self, value: &str) {
        if let Some(PromptRequest::Measurement { start, end }) = self.pending_prompt.take() {
            let value = value.trim();
            if !value.is_empty() {
                self.store
                    .add_measurement(MeasurementAnnotation::new(start, end, value.to_string()));
            }
        }
    }

    /// Confirm the open comparison prompt. Both values must be
    /// non-empty or the shape is discarded.
    pub fn confirm_comparison(&mut self, current: &str, target: &str) {
        if let Some(PromptRequest::Comparison { start, end }) = self.pending_prompt.take() {
            let current = current.trim();
            let target = target.trim();
            if !current.is_empty() && !target.is_empty() {
                self.store.add_comparison(ComparisonMeasurement::new(
                    start,
                    end,
                    current.to_string(),
                    target.to_string(),
                ));
            }
        }
    }

    /// Dismiss the open prompt, discarding its shape.
    pub fn cancel_prompt(&mut self) {
        self.pending_prompt = None;
    }

    /// Discard the in-progress shape, e.g. on Escape.
    pub fn abort_gesture(&mut self) {
        self.gesture.abort();
    }

    pub fn undo(&mut self) -> bool {
        if self.saving || self.closed {
            return false;
        }
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        if self.saving || self.closed {
            return false;
        }
        self.store.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Clear every annotation. The presentation layer asks the user
    /// first; this entry point is the post-confirmation one.
    pub fn clear_all_confirmed(&mut self) {
        if self.saving || self.closed {
            return;
        }
        self.store.clear_all();
    }

    /// The scene for live display, in-progress shape on top.
    pub fn display_scene(&self) -> Scene {
        scene::with_in_progress(&self.store, self.gesture.in_progress())
    }

    /// Start a save: assemble the outgoing set and return the scene of
    /// committed annotations for flattening.
    ///
    /// Returns `None` when there is nothing to save or a save is
    /// already in flight; the save affordance is disabled then.
    pub fn begin_save(&mut self) -> Option<Scene> {
        if self.saving || self.closed || !self.store.is_dirty() {
            return None;
        }
        let mut set = self.store.to_set();
        set.thumbnail = Some(thumbnail_name(&self.image_uri));
        self.pending_save = Some(set);
        self.saving = true;
        Some(scene::committed(&self.store))
    }

    /// Complete a save with the flattening result.
    ///
    /// On success the host commit runs, the dirty flag clears and the
    /// session closes. On failure the set stays dirty for a retry.
    pub fn finish_save(
        &mut self,
        host: &mut dyn SessionHost,
        rendered: Result<RgbaImage, RenderError>,
    ) -> Result<(), SaveError> {
        self.saving = false;
        let Some(set) = self.pending_save.take() else {
            return Ok(());
        };

        match rendered {
            Ok(thumbnail) => {
                host.on_save(&set, &thumbnail).map_err(SaveError::Commit)?;
                self.store.mark_saved();
                self.closed = true;
                host.on_close();
                log::info!("Saved {} annotations for {}", set.len(), self.image_uri);
                Ok(())
            }
            Err(e) => {
                log::error!("Thumbnail flattening failed: {e}");
                Err(SaveError::Render(e))
            }
        }
    }

    /// Close without committing; unsaved mutations are discarded.
    ///
    /// Ignored while a save is in flight: an in-flight save runs to
    /// completion or failure.
    pub fn cancel(&mut self, host: &mut dyn SessionHost) {
        if self.closed || self.saving {
            return;
        }
        self.gesture.abort();
        self.pending_prompt = None;
        self.closed = true;
        host.on_close();
        log::info!("Cancelled annotation session for {}", self.image_uri);
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &AnnotationStore {
        &self.store
    }
}

/// Thumbnail file name derived from the photo's identity.
fn thumbnail_name(image_uri: &str) -> String {
    let stem = std::path::Path::new(image_uri)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");
    format!("{stem}_annotated.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::IconKind;
    use crate::render::raster;
    use image::{Rgba, RgbaImage};

    #[derive(Default)]
    struct RecordingHost {
        saved: Option<AnnotationSet>,
        thumbnail_size: Option<(u32, u32)>,
        closed: bool,
        reject_commit: bool,
    }

    impl SessionHost for RecordingHost {
        fn on_save(&mut self, set: &AnnotationSet, thumbnail: &RgbaImage) -> anyhow::Result<()> {
            if self.reject_commit {
                anyhow::bail!("disk full");
            }
            self.saved = Some(set.clone());
            self.thumbnail_size = Some(thumbnail.dimensions());
            Ok(())
        }

        fn on_close(&mut self) {
            self.closed = true;
        }
    }

    fn pt(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn photo() -> RgbaImage {
        RgbaImage::from_pixel(320, 240, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn test_tick_then_save_commits_set_with_thumbnail() {
        let mut session = AnnotatorSession::open("fitting_front.jpg", None);
        let mut host = RecordingHost::default();

        session.set_mode(ToolMode::Tick);
        session.on_press_start(pt(100.0, 100.0));
        session.on_press_end();
        assert!(session.is_dirty());

        let scene = session.begin_save().expect("dirty session must save");
        let rendered = raster::flatten(&photo(), &scene);
        session.finish_save(&mut host, rendered).unwrap();

        let saved = host.saved.expect("host received the set");
        assert_eq!(saved.icons.len(), 1);
        assert_eq!(saved.icons[0].kind, IconKind::Tick);
        assert_eq!(saved.icons[0].anchor, pt(100.0, 100.0));
        assert!(saved.thumbnail.is_some());
        assert_eq!(host.thumbnail_size, Some((320, 240)));
        assert!(host.closed);
        assert!(session.is_closed());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_save_disabled_when_clean() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        assert!(session.begin_save().is_none());
    }

    #[test]
    fn test_save_disabled_while_in_flight() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Tick);
        session.on_press_start(pt(1.0, 1.0));

        assert!(session.begin_save().is_some());
        assert!(session.begin_save().is_none());
    }

    #[test]
    fn test_failed_render_keeps_set_dirty_for_retry() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        let mut host = RecordingHost::default();
        session.set_mode(ToolMode::Cross);
        session.on_press_start(pt(5.0, 5.0));

        let _scene = session.begin_save().unwrap();
        let err = session
            .finish_save(&mut host, Err(RenderError::Composite("boom".into())))
            .unwrap_err();
        assert!(matches!(err, SaveError::Render(_)));
        assert!(session.is_dirty());
        assert!(!session.is_closed());
        assert!(host.saved.is_none());

        // Retry succeeds.
        let scene = session.begin_save().unwrap();
        let rendered = raster::flatten(&photo(), &scene);
        session.finish_save(&mut host, rendered).unwrap();
        assert!(session.is_closed());
    }

    #[test]
    fn test_rejected_commit_keeps_session_open() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        let mut host = RecordingHost {
            reject_commit: true,
            ..Default::default()
        };
        session.set_mode(ToolMode::Tick);
        session.on_press_start(pt(5.0, 5.0));

        let scene = session.begin_save().unwrap();
        let rendered = raster::flatten(&photo(), &scene);
        let err = session.finish_save(&mut host, rendered).unwrap_err();
        assert!(matches!(err, SaveError::Commit(_)));
        assert!(session.is_dirty());
        assert!(!session.is_closed());
    }

    #[test]
    fn test_empty_measurement_value_discards_shape() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Measure);

        session.on_press_start(pt(0.0, 0.0));
        session.on_press_move(pt(100.0, 0.0));
        session.on_press_end();
        assert!(session.pending_prompt().is_some());

        session.confirm_measurement("");
        assert!(session.pending_prompt().is_none());
        assert!(session.store().measurements().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_confirmed_measurement_commits() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Measure);

        session.on_press_start(pt(0.0, 0.0));
        session.on_press_move(pt(100.0, 0.0));
        session.on_press_end();
        session.confirm_measurement("38.5");

        let m = &session.store().measurements()[0];
        assert_eq!(m.label, "38.5");
        assert_eq!(m.start, pt(0.0, 0.0));
        assert_eq!(m.end, pt(100.0, 0.0));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_comparison_requires_both_values() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Compare);

        session.on_press_start(pt(0.0, 0.0));
        session.on_press_end();
        session.confirm_comparison("96", "");
        assert!(session.store().comparisons().is_empty());

        session.on_press_start(pt(0.0, 0.0));
        session.on_press_move(pt(50.0, 0.0));
        session.on_press_end();
        session.confirm_comparison("96", "92");
        assert_eq!(session.store().comparisons().len(), 1);
    }

    #[test]
    fn test_text_prompt_round_trip() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Text);

        session.on_press_start(pt(42.0, 24.0));
        assert!(matches!(
            session.pending_prompt(),
            Some(PromptRequest::Text { .. })
        ));

        session.confirm_text("take in 2cm");
        let t = &session.store().texts()[0];
        assert_eq!(t.text, "take in 2cm");
        assert_eq!(t.anchor, pt(42.0, 24.0));
    }

    #[test]
    fn test_pointer_ignored_while_prompt_open() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        session.set_mode(ToolMode::Text);
        session.on_press_start(pt(1.0, 1.0));
        assert!(session.pending_prompt().is_some());

        // A second press must not replace the open prompt's anchor.
        session.on_press_start(pt(99.0, 99.0));
        match session.pending_prompt() {
            Some(PromptRequest::Text { anchor }) => assert_eq!(*anchor, pt(1.0, 1.0)),
            other => panic!("unexpected prompt {other:?}"),
        }
    }

    #[test]
    fn test_cancel_ignored_while_save_in_flight() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        let mut host = RecordingHost::default();
        session.set_mode(ToolMode::Tick);
        session.on_press_start(pt(1.0, 1.0));

        let scene = session.begin_save().unwrap();
        session.cancel(&mut host);
        assert!(!session.is_closed());

        let rendered = raster::flatten(&photo(), &scene);
        session.finish_save(&mut host, rendered).unwrap();
        assert!(session.is_closed());
        assert!(host.saved.is_some());
    }

    #[test]
    fn test_cancel_discards_and_closes() {
        let mut session = AnnotatorSession::open("a.jpg", None);
        let mut host = RecordingHost::default();
        session.set_mode(ToolMode::Tick);
        session.on_press_start(pt(1.0, 1.0));

        session.cancel(&mut host);
        assert!(session.is_closed());
        assert!(host.closed);
        assert!(host.saved.is_none());
    }

    #[test]
    fn test_open_with_restored_set_starts_clean() {
        let mut initial = AnnotationSet::default();
        initial.texts.push(TextAnnotation::new(
            "shorten".into(),
            pt(10.0, 10.0),
            Color::RED,
        ));

        let session = AnnotatorSession::open("a.jpg", Some(initial));
        assert_eq!(session.store().texts().len(), 1);
        assert!(!session.is_dirty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_thumbnail_name_derived_from_photo() {
        assert_eq!(thumbnail_name("shots/fitting_front.jpg"), "fitting_front_annotated.png");
        assert_eq!(thumbnail_name(""), "photo_annotated.png");
    }
}
