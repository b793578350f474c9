//! Decoration ownership.
//!
//! The registry is the single owner of every installed decoration handle.
//! Core invariant: at most one decoration per line id, and after any
//! reconciliation pass the registry's keyset is exactly the set of lines
//! in rendered state. A handle is always released through the host before
//! the registry forgets it; forgetting without releasing leaks a DOM node
//! and a widget-internal marker.

use std::collections::HashMap;

use crate::error::HostError;
use crate::host::{DecorationHandle, HostEditor, LineId};

/// A currently-installed line decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    /// Line this decoration covers.
    pub line: LineId,
    /// Hash of the source text the installed HTML was rendered from.
    pub content_hash: u64,
    /// Host handle, released exactly once.
    pub handle: DecorationHandle,
}

/// Mapping from line id to its installed decoration.
#[derive(Debug, Clone, Default)]
pub struct DecorationRegistry {
    decorations: HashMap<LineId, Decoration>,
}

impl DecorationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `line` currently has a decoration installed.
    pub fn contains(&self, line: LineId) -> bool {
        self.decorations.contains_key(&line)
    }

    /// Content hash of the decoration installed on `line`, if any.
    pub fn content_hash(&self, line: LineId) -> Option<u64> {
        self.decorations.get(&line).map(|d| d.content_hash)
    }

    /// Ids of all decorated lines.
    pub fn decorated_lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.decorations.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Install a decoration for `line`, replacing any existing one.
    ///
    /// On failure the old decoration is already gone and the line is left
    /// showing raw text; the caller retries on the next change event.
    pub fn install<H: HostEditor>(
        &mut self,
        host: &mut H,
        line: LineId,
        html: &str,
        content_hash: u64,
    ) -> Result<(), HostError> {
        self.release(host, line);

        let handle = host.install_decoration(line, html)?;
        host.set_raw_visible(line, false);
        self.decorations.insert(
            line,
            Decoration {
                line,
                content_hash,
                handle,
            },
        );
        Ok(())
    }

    /// Release the decoration on `line`, if any. Idempotent: releasing a
    /// never-installed or already-released line is a no-op.
    ///
    /// Returns `true` if a decoration was actually released.
    pub fn release<H: HostEditor>(&mut self, host: &mut H, line: LineId) -> bool {
        let Some(decoration) = self.decorations.remove(&line) else {
            return false;
        };

        if let Err(err) = host.release_decoration(decoration.handle) {
            // Stale handles happen when a structural edit already tore the
            // widget-side marker down; the registry entry still had to go.
            tracing::trace!(
                target: "zettel::preview",
                line = line.get(),
                %err,
                "release ignored host error"
            );
        }
        host.set_raw_visible(line, true);
        true
    }

    /// Release every tracked decoration (full teardown/disable).
    ///
    /// Every handle goes through the host; the map is never just cleared.
    pub fn release_all<H: HostEditor>(&mut self, host: &mut H) -> usize {
        let lines: Vec<LineId> = self.decorations.keys().copied().collect();
        let mut released = 0;
        for line in lines {
            if self.release(host, line) {
                released += 1;
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_install_and_release() {
        let mut host = FakeHost::new(&["# Title", "text"]);
        let mut registry = DecorationRegistry::new();
        let line = host.id_at(0);

        registry
            .install(&mut host, line, "<h1>Title</h1>", 7)
            .unwrap();
        assert!(registry.contains(line));
        assert_eq!(registry.content_hash(line), Some(7));
        assert_eq!(host.installed_count(), 1);
        assert_eq!(host.install_count, 1);
        assert!(host.raw_hidden(line));

        assert!(registry.release(&mut host, line));
        assert!(!registry.contains(line));
        assert_eq!(host.installed_count(), 0);
        assert!(!host.raw_hidden(line));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut host = FakeHost::new(&["# Title"]);
        let mut registry = DecorationRegistry::new();
        let line = host.id_at(0);

        registry.install(&mut host, line, "<h1>Title</h1>", 1).unwrap();
        assert!(registry.release(&mut host, line));
        assert!(!registry.release(&mut host, line));
        assert!(!registry.release(&mut host, line));
        assert_eq!(host.release_count, 1);
    }

    #[test]
    fn test_reinstall_replaces() {
        let mut host = FakeHost::new(&["# Title"]);
        let mut registry = DecorationRegistry::new();
        let line = host.id_at(0);

        registry.install(&mut host, line, "<h1>a</h1>", 1).unwrap();
        registry.install(&mut host, line, "<h1>b</h1>", 2).unwrap();

        // One live decoration, old handle released through the host.
        assert_eq!(registry.len(), 1);
        assert_eq!(host.installed_count(), 1);
        assert_eq!(host.release_count, 1);
        assert_eq!(host.html_for(line).unwrap(), "<h1>b</h1>");
        assert_eq!(registry.content_hash(line), Some(2));
    }

    #[test]
    fn test_release_all_releases_every_handle() {
        let mut host = FakeHost::new(&["a", "b", "c"]);
        let mut registry = DecorationRegistry::new();

        for idx in 0..3 {
            let line = host.id_at(idx);
            registry.install(&mut host, line, "<p>x</p>", idx as u64).unwrap();
        }

        assert_eq!(registry.release_all(&mut host), 3);
        assert!(registry.is_empty());
        assert_eq!(host.installed_count(), 0);
        assert_eq!(host.release_count, 3);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut host = FakeHost::new(&["a"]);
        let mut registry = DecorationRegistry::new();
        let line = host.id_at(0);

        registry.install(&mut host, line, "<p>a</p>", 1).unwrap();
        // Widget invalidates the handle behind the registry's back.
        host.invalidate_all_handles();

        // Still treated as released; no panic, entry gone.
        assert!(registry.release(&mut host, line));
        assert!(!registry.contains(line));
        assert_eq!(host.stale_releases, 1);
    }

    #[test]
    fn test_failed_install_leaves_line_raw() {
        let mut host = FakeHost::new(&["a"]);
        let mut registry = DecorationRegistry::new();
        let line = host.id_at(0);

        host.reject_installs = true;
        let err = registry.install(&mut host, line, "<p>a</p>", 1).unwrap_err();
        assert_eq!(err, HostError::InstallRejected(line));
        assert!(!registry.contains(line));
        assert!(!host.raw_hidden(line));
    }
}
