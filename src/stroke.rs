use egui::{Color32, Pos2, Rect};
use std::sync::Arc;

use crate::id_generator::{self, StrokeId};

/// A coordinate in canvas-local space.
pub type Point = Pos2;

/// Drawing tool a stroke was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Marker,
    Eraser,
}

/// How a stroke's pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Paint the stroke color over existing content.
    Normal,
    /// Remove existing content down to full transparency.
    Clear,
}

impl Tool {
    pub fn blend_mode(self) -> BlendMode {
        match self {
            Tool::Marker => BlendMode::Normal,
            Tool::Eraser => BlendMode::Clear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Marker => "marker",
            Tool::Eraser => "eraser",
        }
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: StrokeId,
    tool: Tool,
    color: Color32,
    width: f32,
    blend_mode: BlendMode,
    points: Vec<Point>,
}

// Reference-counted stroke, shared between canvas states
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    /// Freeze a path into a committed stroke.
    ///
    /// Returns `None` for an empty path, for a width that is not a positive
    /// finite number, or for a point with a non-finite coordinate. The blend
    /// mode is derived from the tool, and eraser strokes carry a transparent
    /// color since they never paint one.
    pub fn new(tool: Tool, color: Color32, width: f32, points: Vec<Point>) -> Option<Self> {
        if points.is_empty() || !is_valid_width(width) {
            return None;
        }
        if !points.iter().all(|p| p.is_finite()) {
            return None;
        }
        let color = match tool {
            Tool::Marker => color,
            Tool::Eraser => Color32::TRANSPARENT,
        };
        Some(Self {
            id: id_generator::generate_id(),
            tool,
            color,
            width,
            blend_mode: tool.blend_mode(),
            points,
        })
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounding box of the points, padded by half the stroke width.
    pub fn bounds(&self) -> Rect {
        path_bounds(&self.points, self.width)
    }
}

/// The stroke currently being drawn.
///
/// Tool, color and width are captured when the gesture starts; later tool
/// changes do not reach an open session.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSession {
    tool: Tool,
    color: Color32,
    width: f32,
    points: Vec<Point>,
}

impl DrawSession {
    pub fn new(start: Point, tool: Tool, color: Color32, width: f32) -> Self {
        Self {
            tool,
            color,
            width,
            points: vec![start],
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the session and freeze its path.
    pub fn into_stroke(self) -> Option<Stroke> {
        Stroke::new(self.tool, self.color, self.width, self.points)
    }
}

/// A stroke width must be a positive finite number
pub fn is_valid_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

fn path_bounds(points: &[Point], width: f32) -> Rect {
    let mut rect = Rect::NOTHING;
    for point in points {
        rect.extend_with(*point);
    }
    if rect.is_negative() {
        return rect;
    }
    rect.expand(width / 2.0)
}
