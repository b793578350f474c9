//! Active-line tracking.
//!
//! The cursor tracker is the only component that mutates the active line.
//! It turns raw cursor-activity notifications into the minimal dirty set:
//! the line the cursor left and the line it entered.

use crate::host::LineId;

/// Result of a cursor move that actually changed the active line.
///
/// Both lines need their visual state recomputed: `previous` becomes
/// eligible for rendering again, `current` must show raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub previous: Option<LineId>,
    pub current: Option<LineId>,
}

/// Tracks which line, if any, currently contains the cursor.
///
/// Invariant: at most one active line at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    active: Option<LineId>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line currently shown raw because the cursor is on it.
    pub fn active(&self) -> Option<LineId> {
        self.active
    }

    /// Record a cursor-activity notification.
    ///
    /// Returns `None` when the cursor stayed on the same line (no
    /// reconciliation needed), otherwise the pair of lines to recompute.
    pub fn on_cursor_moved(&mut self, new_line: Option<LineId>) -> Option<CursorMove> {
        if new_line == self.active {
            return None;
        }
        let previous = self.active;
        self.active = new_line;
        Some(CursorMove {
            previous,
            current: new_line,
        })
    }

    /// Forcibly set the active line without producing a dirty set.
    /// Used when (re)enabling the preview, where a full pass follows.
    pub fn reset(&mut self, line: Option<LineId>) {
        self.active = line;
    }

    /// Forget the active line (disable/teardown).
    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Which line of a multi-line selection counts as active.
///
/// Policy decision: the *anchor* line (where the selection started), not
/// the head. Hosts should apply this before reporting `cursor_line`; the
/// helper exists so glue code and tests share one definition.
pub fn selection_active_line(anchor: LineId, _head: LineId) -> LineId {
    anchor
}
