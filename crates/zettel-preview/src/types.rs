//! Core preview types: change descriptors, events, and edit tracking.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::host::LineId;

/// Description of a text change, as reported by the host widget.
///
/// `first`..=`last` is the affected range in stable ids. For a structural
/// edit the ids of freshly inserted lines do not exist yet from the
/// engine's point of view, which is exactly why structural edits take the
/// full-recompute path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDescriptor {
    /// First affected line.
    pub first: LineId,
    /// Last affected line (may equal `first`).
    pub last: LineId,
    /// Lines the edit inserted.
    pub lines_added: usize,
    /// Lines the edit removed.
    pub lines_removed: usize,
}

impl ChangeDescriptor {
    /// A content-only edit within existing lines.
    pub fn content(first: LineId, last: LineId) -> Self {
        Self {
            first,
            last,
            lines_added: 0,
            lines_removed: 0,
        }
    }

    /// A single-line content edit.
    pub fn single(line: LineId) -> Self {
        Self::content(line, line)
    }

    /// An edit that added and/or removed lines.
    pub fn structural(first: LineId, last: LineId, added: usize, removed: usize) -> Self {
        Self {
            first,
            last,
            lines_added: added,
            lines_removed: removed,
        }
    }

    /// Whether line count changed, forcing a full-document recompute.
    pub fn is_structural(&self) -> bool {
        self.lines_added != self.lines_removed
    }
}

/// Event delivered to the engine by the host glue.
///
/// Events are processed strictly in delivery order; the engine never
/// coalesces across two events, only within one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    /// The text buffer changed.
    TextChanged(ChangeDescriptor),
    /// The cursor moved to a new line (`None` for an empty document).
    CursorMoved(Option<LineId>),
    /// The user clicked inside a rendered line, at a horizontal position
    /// expressed as a fraction of the decoration's width.
    Clicked { line: LineId, width_fraction: f32 },
}

/// Counters for reconciliation work, used by tests and debug logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Full-document passes (structural edits, enable).
    pub full_passes: usize,
    /// Range-limited passes (content edits, cursor moves).
    pub partial_passes: usize,
    /// Decorations installed.
    pub installs: usize,
    /// Decorations released.
    pub releases: usize,
    /// Lines whose render was served from cache.
    pub cache_hits: usize,
    /// Lines the renderer faulted on (fell back to raw).
    pub renderer_faults: usize,
}

/// Hash of a line's source text for quick change detection.
pub fn hash_source(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
