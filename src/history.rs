use std::collections::VecDeque;
use std::sync::Arc;

use crate::canvas_state::CanvasState;

/// Default number of canvas states kept for undo/redo
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo log of whole canvas snapshots.
///
/// `entries` is never empty and `cursor` always points at the displayed
/// state. Committing after an undo truncates the redo branch before
/// appending. When more than `limit` states are retained the oldest one is
/// evicted, so undo stops at the oldest retained state.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Arc<CanvasState>>,
    cursor: usize,
    limit: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(CanvasState::new())
    }
}

impl HistoryStack {
    /// Creates a history holding only `initial`
    pub fn new(initial: CanvasState) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a history retaining at most `limit` states (at least 2).
    pub fn with_limit(initial: CanvasState, limit: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(Arc::new(initial));
        Self {
            entries,
            cursor: 0,
            limit: limit.max(2),
        }
    }

    /// Make `state` current, discarding anything that could have been redone.
    ///
    /// Returns how many of the oldest entries were evicted to respect the limit.
    pub fn commit(&mut self, state: CanvasState) -> usize {
        // Drop the redo branch first
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(Arc::new(state));
        self.cursor += 1;

        let mut evicted = 0;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            self.cursor -= 1;
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!("History limit {} reached, evicted {} state(s)", self.limit, evicted);
        }
        evicted
    }

    /// Step back one state. At the oldest entry this returns the current state unchanged.
    pub fn undo(&mut self) -> Arc<CanvasState> {
        if self.can_undo() {
            self.cursor -= 1;
            log::debug!("Undo -> {}/{}", self.cursor, self.entries.len());
        }
        self.current()
    }

    /// Step forward one state. At the newest entry this returns the current state unchanged.
    pub fn redo(&mut self) -> Arc<CanvasState> {
        if self.can_redo() {
            self.cursor += 1;
            log::debug!("Redo -> {}/{}", self.cursor, self.entries.len());
        }
        self.current()
    }

    /// Commit an empty canvas that keeps the current background.
    ///
    /// This is an ordinary undoable entry, not a history reset.
    pub fn clear(&mut self) -> usize {
        let cleared = self.current_ref().cleared();
        self.commit(cleared)
    }

    /// Returns true if there is a state to go back to
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there is an undone state to go forward to
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The displayed state
    pub fn current(&self) -> Arc<CanvasState> {
        Arc::clone(self.current_ref())
    }

    fn current_ref(&self) -> &Arc<CanvasState> {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the history holds at least one state.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Retained states, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &Arc<CanvasState>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Stroke, Tool};
    use egui::{Color32, Pos2};

    fn state_with(n: usize) -> CanvasState {
        (0..n).fold(CanvasState::new(), |state, i| {
            let p = Pos2::new(i as f32, 0.0);
            let stroke = Stroke::new(Tool::Marker, Color32::RED, 1.0, vec![p]).unwrap();
            state.with_appended_stroke(stroke)
        })
    }

    #[test]
    fn starts_with_single_entry() {
        let history = HistoryStack::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_at_boundary_is_noop() {
        let mut history = HistoryStack::default();
        let before = history.current();
        let after = history.undo();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn undo_then_redo_restores_state() {
        let mut history = HistoryStack::default();
        let s1 = state_with(1);
        history.commit(s1.clone());
        history.commit(state_with(2));
        let top = history.current();

        assert_eq!(*history.undo(), s1);
        assert!(history.can_redo());
        let redone = history.redo();
        assert!(Arc::ptr_eq(&top, &redone));
        assert!(!history.can_redo());
    }

    #[test]
    fn commit_after_undo_truncates_redo_branch() {
        let mut history = HistoryStack::default();
        let s1 = state_with(1);
        history.commit(s1.clone());
        history.commit(state_with(2));

        history.undo();
        let s3 = s1.cleared();
        history.commit(s3.clone());

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(!history.can_redo());
        let before = history.current();
        let after = history.redo();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(*after, s3);
    }

    #[test]
    fn clear_is_undoable() {
        let mut history = HistoryStack::default();
        let drawn = state_with(2);
        history.commit(drawn.clone());
        history.clear();
        assert!(history.current().strokes().is_empty());
        assert_eq!(*history.undo(), drawn);
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut history = HistoryStack::with_limit(CanvasState::new(), 3);
        for i in 1..=4 {
            history.commit(state_with(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);

        history.undo();
        history.undo();
        assert!(!history.can_undo());
        // The oldest retained state has two strokes; the empty canvas is gone.
        assert_eq!(history.current().strokes().len(), 2);
    }

    #[test]
    fn limit_never_goes_below_two() {
        let history = HistoryStack::with_limit(CanvasState::new(), 0);
        assert_eq!(history.limit(), 2);
    }
}
