use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::background::BackgroundRef;
use crate::canvas_state::CanvasState;
use crate::config::EngineConfig;
use crate::error::{CanvasError, CanvasResult, ConfigError};
use crate::event::{CanvasEvent, EventBus, EventHandler, HistoryStatus, SubscriptionId};
use crate::export::{Snapshot, SnapshotExporter};
use crate::history::HistoryStack;
use crate::input::{InputRouter, PointerEvent};
use crate::renderer::CanvasCompositor;
use crate::shared::SharedCanvasState;
use crate::stroke::DrawSession;
use crate::tools::{StrokeCapture, StrokeCommit, ToolSelection};

/// The drawing engine: pointer events in, canvas states and snapshots out.
///
/// Everything runs on the caller's thread in arrival order, so a stroke
/// committed by an end event is visible to any later export. Other threads
/// can follow the displayed state through [`SketchCanvas::shared_state`].
#[derive(Debug)]
pub struct SketchCanvas {
    config: EngineConfig,
    history: HistoryStack,
    router: InputRouter,
    compositor: CanvasCompositor,
    exporter: SnapshotExporter,
    surface_size: [u32; 2],
    shared: SharedCanvasState,
    event_bus: EventBus,
}

impl Default for SketchCanvas {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl SketchCanvas {
    /// Build an engine after checking `config`.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        let history = HistoryStack::with_limit(CanvasState::new(), config.history_limit);
        let router = InputRouter::new(
            StrokeCapture::new(config.min_stroke_width),
            config.default_color32(),
            config.default_width,
        );
        let compositor = CanvasCompositor::new(config.anti_alias);
        let shared = SharedCanvasState::new(history.current());
        Self {
            surface_size: config.surface_size,
            config,
            history,
            router,
            compositor,
            exporter: SnapshotExporter::new(compositor),
            shared,
            event_bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- input ----

    /// Feed one pointer event from the gesture stream
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<StrokeCommit> {
        let commit = self.router.route_event(event, &mut self.history);
        if let Some(commit) = commit {
            self.after_commit(commit);
        }
        commit
    }

    pub fn select_tool(&mut self, selection: ToolSelection) {
        self.router.select_tool(selection);
    }

    pub fn tool_selection(&self) -> ToolSelection {
        self.router.selection()
    }

    /// Switch between editable and view-only. Disabling ends an open gesture.
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        let commit = self
            .router
            .capture_mut()
            .set_enabled(enabled, &mut self.history);
        if let Some(commit) = commit {
            self.after_commit(commit);
        }
    }

    pub fn is_drawing_enabled(&self) -> bool {
        self.router.capture().is_enabled()
    }

    /// The in-progress stroke, if a gesture is open
    pub fn live_session(&self) -> Option<&DrawSession> {
        self.router.capture().session()
    }

    // ---- history ----

    /// Show a newly loaded background. Drops current strokes as one undoable step.
    pub fn load_background(&mut self, background: BackgroundRef) {
        log::info!(
            "Background {} loaded ({}x{})",
            background.id(),
            background.size()[0],
            background.size()[1]
        );
        let next = self.history.current().with_background_image(background);
        let evicted = self.history.commit(next);
        self.publish(evicted);
        self.event_bus.emit(CanvasEvent::BackgroundReplaced {
            status: self.status(),
        });
    }

    pub fn undo(&mut self) -> Arc<CanvasState> {
        let moved = self.history.can_undo();
        let state = self.history.undo();
        if moved {
            self.shared.publish(Arc::clone(&state));
            self.event_bus.emit(CanvasEvent::Undone {
                status: self.status(),
            });
        }
        state
    }

    pub fn redo(&mut self) -> Arc<CanvasState> {
        let moved = self.history.can_redo();
        let state = self.history.redo();
        if moved {
            self.shared.publish(Arc::clone(&state));
            self.event_bus.emit(CanvasEvent::Redone {
                status: self.status(),
            });
        }
        state
    }

    /// Remove all strokes, keeping the background. Undoable.
    pub fn clear(&mut self) {
        let evicted = self.history.clear();
        log::info!("Canvas cleared");
        self.publish(evicted);
        self.event_bus.emit(CanvasEvent::Cleared {
            status: self.status(),
        });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn current_state(&self) -> Arc<CanvasState> {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    // ---- output ----

    pub fn surface_size(&self) -> [u32; 2] {
        self.surface_size
    }

    pub fn resize_surface(&mut self, size: [u32; 2]) -> CanvasResult<()> {
        let [width, height] = size;
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidSurface { width, height });
        }
        self.surface_size = size;
        Ok(())
    }

    /// Composite the current state and the live stroke for display
    pub fn render(&self) -> CanvasResult<Pixmap> {
        self.compositor
            .render_live(&self.history.current(), self.live_session(), self.surface_size)
    }

    /// Flatten the committed state to PNG at the current surface size
    pub fn export_snapshot(&self) -> CanvasResult<Snapshot> {
        let snapshot = self
            .exporter
            .export(&self.history.current(), self.surface_size)?;
        self.event_bus.emit(CanvasEvent::SnapshotExported {
            bytes: snapshot.png().len(),
        });
        Ok(snapshot)
    }

    // ---- observers ----

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        self.event_bus.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_bus.unsubscribe(id)
    }

    /// Handle for readers on other threads
    pub fn shared_state(&self) -> SharedCanvasState {
        self.shared.clone()
    }

    fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    fn publish(&self, evicted: usize) {
        self.shared.publish(self.history.current());
        if evicted > 0 {
            self.event_bus.emit(CanvasEvent::HistoryEvicted { count: evicted });
        }
    }

    fn after_commit(&self, commit: StrokeCommit) {
        self.publish(commit.evicted);
        self.event_bus.emit(CanvasEvent::StrokeCommitted {
            id: commit.id,
            tool: commit.tool,
            points: commit.points,
            status: self.status(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        for config in [
            EngineConfig {
                min_stroke_width: 0.0,
                ..Default::default()
            },
            EngineConfig {
                default_width: f32::NAN,
                ..Default::default()
            },
            EngineConfig {
                surface_size: [0, 10],
                ..Default::default()
            },
        ] {
            assert!(matches!(SketchCanvas::new(config), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn default_canvas_uses_default_config() {
        let canvas = SketchCanvas::default();
        assert_eq!(canvas.config(), &EngineConfig::default());
        assert_eq!(canvas.surface_size(), EngineConfig::default().surface_size);
        assert!(!canvas.can_undo());
    }
}
