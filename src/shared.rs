use std::sync::Arc;

use parking_lot::RwLock;

use crate::canvas_state::CanvasState;

/// Single-writer / many-readers handoff of the displayed canvas state.
///
/// The engine publishes whole states; a reader on another thread (e.g. a
/// render thread) loads an `Arc` and never sees a half-applied mutation.
#[derive(Debug, Clone, Default)]
pub struct SharedCanvasState {
    inner: Arc<RwLock<Arc<CanvasState>>>,
}

impl SharedCanvasState {
    pub fn new(initial: Arc<CanvasState>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// The most recently published state
    pub fn load(&self) -> Arc<CanvasState> {
        Arc::clone(&self.inner.read())
    }

    pub(crate) fn publish(&self, state: Arc<CanvasState>) {
        *self.inner.write() = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Stroke, Tool};
    use egui::{Color32, Pos2};

    #[test]
    fn readers_see_published_state_across_threads() {
        let shared = SharedCanvasState::default();
        let reader = shared.clone();

        let stroke = Stroke::new(Tool::Marker, Color32::BLACK, 1.0, vec![Pos2::ZERO]).unwrap();
        let next = Arc::new(CanvasState::new().with_appended_stroke(stroke));
        shared.publish(Arc::clone(&next));

        let seen = std::thread::spawn(move || reader.load().strokes().len())
            .join()
            .unwrap();
        assert_eq!(seen, 1);
    }
}
