use egui::Color32;

use crate::history::HistoryStack;
use crate::stroke::{Point, Tool};
use crate::tools::{StrokeCapture, StrokeCommit, ToolSelection};

/// Phase of a pointer or touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Pointer pressed / finger down
    Start,
    /// Pointer dragged
    Move,
    /// Pointer released
    End,
    /// Pointer left the surface or the gesture was interrupted
    Cancel,
}

/// A single event from the pointer stream, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
        }
    }

    pub fn start(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Start, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    pub fn end(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::End, x, y)
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Cancel, x, y)
    }
}

/// Routes pointer events to the stroke capture using the current tool selection
#[derive(Debug)]
pub struct InputRouter {
    capture: StrokeCapture,
    tool: Tool,
    marker_color: Color32,
    width: f32,
}

impl InputRouter {
    pub fn new(capture: StrokeCapture, marker_color: Color32, width: f32) -> Self {
        Self {
            capture,
            tool: Tool::Marker,
            marker_color,
            width,
        }
    }

    /// Apply a tool-selection signal. Only affects gestures started afterwards.
    pub fn select_tool(&mut self, selection: ToolSelection) {
        self.tool = selection.tool;
        self.width = selection.width;
        if let Some(color) = selection.color {
            self.marker_color = color;
        }
        log::debug!(
            "Tool selected: {} (width {}, color {:?})",
            self.tool.name(),
            self.width,
            self.marker_color
        );
    }

    /// Current selection, with the color resolved
    pub fn selection(&self) -> ToolSelection {
        ToolSelection {
            tool: self.tool,
            color: Some(self.marker_color),
            width: self.width,
        }
    }

    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut StrokeCapture {
        &mut self.capture
    }

    /// Feed one event. Returns the stroke committed by this event, if any.
    pub fn route_event(
        &mut self,
        event: PointerEvent,
        history: &mut HistoryStack,
    ) -> Option<StrokeCommit> {
        match event.phase {
            PointerPhase::Start => self.capture.on_gesture_start(
                event.position,
                self.tool,
                self.marker_color,
                self.width,
                history,
            ),
            PointerPhase::Move => {
                self.capture.on_gesture_move(event.position);
                None
            }
            PointerPhase::End => self.capture.on_gesture_end(history),
            PointerPhase::Cancel => self.capture.on_gesture_cancel(history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InputRouter {
        InputRouter::new(StrokeCapture::default(), Color32::BLACK, 4.0)
    }

    #[test]
    fn tool_is_captured_at_gesture_start() {
        let mut history = HistoryStack::default();
        let mut router = router();

        router.route_event(PointerEvent::start(0.0, 0.0), &mut history);
        router.select_tool(ToolSelection::eraser(10.0));
        router.route_event(PointerEvent::moved(5.0, 5.0), &mut history);
        router.route_event(PointerEvent::end(5.0, 5.0), &mut history);

        let state = history.current();
        let stroke = &state.strokes()[0];
        assert_eq!(stroke.tool(), Tool::Marker);
        assert_eq!(stroke.width(), 4.0);
    }

    #[test]
    fn selection_without_color_keeps_marker_color() {
        let mut router = router();
        router.select_tool(ToolSelection::marker(Color32::RED, 2.0));
        router.select_tool(ToolSelection::eraser(8.0));
        router.select_tool(ToolSelection {
            tool: Tool::Marker,
            color: None,
            width: 3.0,
        });
        assert_eq!(router.selection().color, Some(Color32::RED));
        assert_eq!(router.selection().width, 3.0);
    }

    #[test]
    fn cancel_commits_like_end() {
        let mut history = HistoryStack::default();
        let mut router = router();

        router.route_event(PointerEvent::start(1.0, 1.0), &mut history);
        router.route_event(PointerEvent::moved(2.0, 2.0), &mut history);
        let commit = router.route_event(PointerEvent::cancel(2.0, 2.0), &mut history);
        assert_eq!(commit.map(|c| c.points), Some(2));
        assert!(!router.capture().is_drawing());
    }
}
