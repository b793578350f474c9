//! Render caching.
//!
//! Stores the last render decision per line so a reconciliation pass can
//! skip re-running the renderer on lines whose text did not change. This
//! is what keeps structural edits from turning into a full re-render of
//! every line's HTML: the full pass still *visits* every line, but only
//! pays for the ones whose source hash moved.

use std::collections::HashMap;

use crate::host::LineId;

/// A cached render decision for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLine {
    /// Hash of the source text this decision was computed from.
    pub source_hash: u64,
    /// Rendered HTML, or `None` when the line was judged raw
    /// (plain prose, blank, or a renderer fault).
    pub html: Option<String>,
}

/// Mapping from line id to its last render decision.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    entries: HashMap<LineId, CachedLine>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached decision for `line`, valid only if the source
    /// hash still matches.
    pub fn lookup(&self, line: LineId, source_hash: u64) -> Option<&CachedLine> {
        self.entries
            .get(&line)
            .filter(|c| c.source_hash == source_hash)
    }

    /// Record the decision for `line`.
    pub fn store(&mut self, line: LineId, source_hash: u64, html: Option<String>) {
        self.entries.insert(line, CachedLine { source_hash, html });
    }

    /// Drop the entry for a deleted line.
    pub fn remove(&mut self, line: LineId) {
        self.entries.remove(&line);
    }

    /// Keep only entries for lines that still exist.
    pub fn retain_lines<F: Fn(LineId) -> bool>(&mut self, is_live: F) {
        self.entries.retain(|id, _| is_live(*id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hash_source;

    #[test]
    fn test_hit_requires_matching_hash() {
        let mut cache = RenderCache::new();
        let line = LineId::new(1);
        let hash = hash_source("# Title");

        cache.store(line, hash, Some("<h1>Title</h1>".to_string()));

        let hit = cache.lookup(line, hash).unwrap();
        assert_eq!(hit.html.as_deref(), Some("<h1>Title</h1>"));

        // Same line, different source: stale entry must not be served.
        assert!(cache.lookup(line, hash_source("# Titled")).is_none());
    }

    #[test]
    fn test_raw_decision_is_cached_too() {
        let mut cache = RenderCache::new();
        let line = LineId::new(1);
        let hash = hash_source("plain prose");

        cache.store(line, hash, None);
        let hit = cache.lookup(line, hash).unwrap();
        assert_eq!(hit.html, None);
    }

    #[test]
    fn test_retain_drops_dead_lines() {
        let mut cache = RenderCache::new();
        cache.store(LineId::new(1), 1, None);
        cache.store(LineId::new(2), 2, None);
        cache.store(LineId::new(3), 3, None);

        cache.retain_lines(|id| id.get() != 2);

        assert_eq!(cache.len(), 2);
        assert!(cache.lookup(LineId::new(2), 2).is_none());
    }
}
