//! Note-link resolution during rendering.
//!
//! The zettelkasten graph treats `[text](target)` links between notes as
//! edges, so the renderer wants to know whether a link target resolves to
//! an existing note and tags the anchor accordingly (`internal-link` vs
//! `internal-link broken`). The consuming application supplies the index;
//! the renderer never does IO to answer the question.

use std::collections::HashSet;

/// Resolves link targets against the set of known notes.
pub trait NoteIndex {
    /// Whether `target` names an existing note.
    fn contains_note(&self, target: &str) -> bool;
}

/// Unit type implementation - no index available, so nothing is flagged
/// broken. This is the engine's default: a missing index should not paint
/// every link in the document red.
impl NoteIndex for () {
    fn contains_note(&self, _target: &str) -> bool {
        true
    }
}

impl<T: NoteIndex> NoteIndex for &T {
    fn contains_note(&self, target: &str) -> bool {
        (*self).contains_note(target)
    }
}

/// Set-backed index over note titles.
///
/// Titles are matched exactly as they appear in link targets; normalizing
/// (case folding, `.md` stripping) is the caller's business when building
/// the set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteIndex {
    titles: HashSet<String>,
}

impl InMemoryNoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a note title.
    pub fn insert(&mut self, title: impl Into<String>) {
        self.titles.insert(title.into());
    }

    /// Forget a note title (note deleted or renamed).
    pub fn remove(&mut self, title: &str) {
        self.titles.remove(title);
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl NoteIndex for InMemoryNoteIndex {
    fn contains_note(&self, target: &str) -> bool {
        self.titles.contains(target)
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryNoteIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            titles: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_index() {
        let index: InMemoryNoteIndex = ["Home", "About"].into_iter().collect();
        assert_eq!(index.len(), 2);
        assert!(index.contains_note("Home"));
        assert!(index.contains_note("About"));
        assert!(!index.contains_note("Missing"));
    }

    #[test]
    fn test_index_tracks_note_lifecycle() {
        let mut index = InMemoryNoteIndex::new();
        assert!(index.is_empty());

        index.insert("Inbox");
        assert!(index.contains_note("Inbox"));

        index.remove("Inbox");
        assert!(!index.contains_note("Inbox"));
    }

    #[test]
    fn test_unit_impl_flags_nothing_broken() {
        assert!(().contains_note("anything"));
    }

    #[test]
    fn test_reference_impl_delegates() {
        let index: InMemoryNoteIndex = ["Home"].into_iter().collect();
        let by_ref = &index;
        assert!(by_ref.contains_note("Home"));
        assert!(!by_ref.contains_note("Missing"));
    }
}
