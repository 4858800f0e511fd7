use std::sync::Arc;

use crate::background::BackgroundRef;
use crate::stroke::{Stroke, StrokeRef};

/// Immutable snapshot of the canvas: an optional background plus the
/// committed strokes in paint order (later strokes paint over earlier ones).
///
/// Every mutation helper returns a new state; the receiver is never changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasState {
    background: Option<BackgroundRef>,
    strokes: Vec<StrokeRef>,
}

impl CanvasState {
    /// The initial empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<&BackgroundRef> {
        self.background.as_ref()
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    /// True when there is no background and no stroke.
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.strokes.is_empty()
    }

    /// A state showing `background` with no strokes.
    ///
    /// Strokes drawn over the previous background are dropped.
    pub fn with_background_image(&self, background: BackgroundRef) -> Self {
        Self {
            background: Some(background),
            strokes: Vec::new(),
        }
    }

    /// A state with `stroke` painted on top of the existing ones.
    pub fn with_appended_stroke(&self, stroke: Stroke) -> Self {
        let mut strokes = Vec::with_capacity(self.strokes.len() + 1);
        strokes.extend(self.strokes.iter().cloned());
        strokes.push(Arc::new(stroke));
        Self {
            background: self.background.clone(),
            strokes,
        }
    }

    /// Same background, no strokes.
    pub fn cleared(&self) -> Self {
        Self {
            background: self.background.clone(),
            strokes: Vec::new(),
        }
    }
}
