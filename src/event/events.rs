use crate::id_generator::StrokeId;
use crate::stroke::Tool;

/// Undo/redo affordance state after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    StrokeCommitted {
        id: StrokeId,
        tool: Tool,
        points: usize,
        status: HistoryStatus,
    },
    BackgroundReplaced {
        status: HistoryStatus,
    },
    Cleared {
        status: HistoryStatus,
    },
    Undone {
        status: HistoryStatus,
    },
    Redone {
        status: HistoryStatus,
    },
    /// Oldest history entries were dropped to respect the retention limit
    HistoryEvicted {
        count: usize,
    },
    SnapshotExported {
        bytes: usize,
    },
}
