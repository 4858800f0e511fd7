use egui::Color32;

pub mod stroke_capture;

pub use crate::stroke::Tool;
pub use stroke_capture::{StrokeCapture, StrokeCommit};

/// Tool-selection signal coming from the toolbar.
///
/// `color` is only meaningful for the marker; when it is `None` the
/// previously selected marker color is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSelection {
    pub tool: Tool,
    pub color: Option<Color32>,
    pub width: f32,
}

impl ToolSelection {
    pub fn marker(color: Color32, width: f32) -> Self {
        Self {
            tool: Tool::Marker,
            color: Some(color),
            width,
        }
    }

    pub fn eraser(width: f32) -> Self {
        Self {
            tool: Tool::Eraser,
            color: None,
            width,
        }
    }
}
