use egui::Color32;

use crate::history::HistoryStack;
use crate::id_generator::StrokeId;
use crate::stroke::{self, DrawSession, Point, Tool};

const DEFAULT_MIN_WIDTH: f32 = 0.5;

/// Summary of a stroke handed to the history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeCommit {
    pub id: StrokeId,
    pub tool: Tool,
    pub points: usize,
    /// History entries evicted by this commit
    pub evicted: usize,
}

/// Turns one gesture (start, moves, end) into exactly one committed stroke.
///
/// Two states: idle (`session` is `None`) and drawing. Events that make no
/// sense in the current state are ignored, since pointer streams from
/// hardware are not guaranteed to be well formed.
#[derive(Debug)]
pub struct StrokeCapture {
    // Transient state: the stroke being drawn (if any)
    session: Option<DrawSession>,
    enabled: bool,
    min_width: f32,
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WIDTH)
    }
}

impl StrokeCapture {
    /// `min_width` is the floor for requested widths. A floor that is not a
    /// positive finite number falls back to the default of 0.5.
    pub fn new(min_width: f32) -> Self {
        let min_width = if stroke::is_valid_width(min_width) {
            min_width
        } else {
            log::warn!(
                "Minimum stroke width {} is invalid, using {}",
                min_width,
                DEFAULT_MIN_WIDTH
            );
            DEFAULT_MIN_WIDTH
        };
        Self {
            session: None,
            enabled: true,
            min_width,
        }
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable drawing (e.g. for a read-only view).
    ///
    /// Disabling while a gesture is open ends it as if the pointer was released.
    pub fn set_enabled(
        &mut self,
        enabled: bool,
        history: &mut HistoryStack,
    ) -> Option<StrokeCommit> {
        self.enabled = enabled;
        if enabled || self.session.is_none() {
            None
        } else {
            self.on_gesture_end(history)
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    /// The in-progress stroke, for live preview
    pub fn session(&self) -> Option<&DrawSession> {
        self.session.as_ref()
    }

    /// Begin a stroke at `point` with the given tool settings.
    ///
    /// No-op while drawing is disabled. A session left open by a missing end
    /// event is committed first so that it never leaks.
    pub fn on_gesture_start(
        &mut self,
        point: Point,
        tool: Tool,
        color: Color32,
        width: f32,
        history: &mut HistoryStack,
    ) -> Option<StrokeCommit> {
        if !self.enabled {
            log::trace!("Gesture start ignored: drawing is disabled");
            return None;
        }
        if !point.is_finite() {
            log::trace!("Ignoring invalid gesture event: start at {:?}", point);
            return None;
        }

        let previous = if self.session.is_some() {
            log::debug!("Gesture start while drawing, committing the open stroke");
            self.on_gesture_end(history)
        } else {
            None
        };

        let width = if width.is_finite() && width >= self.min_width {
            width
        } else {
            log::warn!("Stroke width {} clamped to {}", width, self.min_width);
            self.min_width
        };
        self.session = Some(DrawSession::new(point, tool, color, width));
        previous
    }

    /// Extend the in-progress path.
    ///
    /// Returns false if no stroke is being drawn or the point is not finite.
    pub fn on_gesture_move(&mut self, point: Point) -> bool {
        let Some(session) = &mut self.session else {
            log::trace!(
                "Ignoring invalid gesture event: move at {:?} with no active stroke",
                point
            );
            return false;
        };
        if !point.is_finite() {
            log::trace!("Ignoring invalid gesture event: move at {:?}", point);
            return false;
        }
        session.add_point(point);
        true
    }

    /// Freeze the in-progress path and commit it to `history`.
    ///
    /// Idempotent: without an active session nothing happens.
    pub fn on_gesture_end(&mut self, history: &mut HistoryStack) -> Option<StrokeCommit> {
        let Some(session) = self.session.take() else {
            log::trace!("Ignoring invalid gesture event: end with no active stroke");
            return None;
        };
        let stroke = session.into_stroke()?;

        let commit = StrokeCommit {
            id: stroke.id(),
            tool: stroke.tool(),
            points: stroke.points().len(),
            evicted: 0,
        };
        let next = history.current().with_appended_stroke(stroke);
        let evicted = history.commit(next);
        log::info!(
            "Committed {} stroke {} with {} point(s)",
            commit.tool.name(),
            commit.id,
            commit.points
        );
        Some(StrokeCommit { evicted, ..commit })
    }

    /// Pointer left the surface: treated exactly like a release.
    pub fn on_gesture_cancel(&mut self, history: &mut HistoryStack) -> Option<StrokeCommit> {
        self.on_gesture_end(history)
    }
}
