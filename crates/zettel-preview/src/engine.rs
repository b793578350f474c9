//! The reconciliation engine.
//!
//! Given a text-change or cursor-move event, computes the minimal set of
//! lines whose rendered/raw state must change and applies it by diffing
//! against the decoration registry. Two update policies:
//!
//! - **Structural edits** (line count changed) recompute every line's
//!   decoration state. Ids for new lines don't exist before the pass and
//!   dead lines' decorations must be released before they become
//!   unreachable, so the full pass trades O(line_count) bookkeeping for
//!   correctness. The render cache keeps the HTML cost of that pass
//!   proportional to what actually changed.
//! - **Content edits** recompute only the descriptor's id range.
//!
//! One engine instance per editor instance, constructed with the host
//! widget and note index injected. No process-wide state.

use std::collections::{HashSet, VecDeque};

use zettel_renderer::{NoteIndex, render_line};

use crate::cache::RenderCache;
use crate::cursor::CursorTracker;
use crate::host::{HostEditor, LineId};
use crate::registry::DecorationRegistry;
use crate::types::{ChangeDescriptor, PreviewEvent, ReconcileStats, hash_source};

/// Live preview engine: reconciler plus lifecycle controller.
///
/// Starts disabled; call [`enable`](Self::enable) to run the first full
/// pass and begin reacting to events.
pub struct PreviewEngine<H: HostEditor, N: NoteIndex = ()> {
    host: H,
    note_index: N,
    registry: DecorationRegistry,
    cursor: CursorTracker,
    cache: RenderCache,
    enabled: bool,
    destroyed: bool,
    /// Guard against re-entrant host callbacks. While a pass runs, nested
    /// events are queued and drained after it, never recursed into.
    in_pass: bool,
    deferred: VecDeque<PreviewEvent>,
    stats: ReconcileStats,
}

impl<H: HostEditor> PreviewEngine<H> {
    /// Engine with no note index (no link target is flagged broken).
    pub fn new(host: H) -> Self {
        Self::with_note_index(host, ())
    }
}

impl<H: HostEditor, N: NoteIndex> PreviewEngine<H, N> {
    pub fn with_note_index(host: H, note_index: N) -> Self {
        Self {
            host,
            note_index,
            registry: DecorationRegistry::new(),
            cursor: CursorTracker::new(),
            cache: RenderCache::new(),
            enabled: false,
            destroyed: false,
            in_pass: false,
            deferred: VecDeque::new(),
            stats: ReconcileStats::default(),
        }
    }

    // === Accessors ===

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &DecorationRegistry {
        &self.registry
    }

    /// Line currently shown raw because the cursor is on it.
    pub fn active_line(&self) -> Option<LineId> {
        self.cursor.active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    // === Event entry point ===

    /// Handle one host notification.
    ///
    /// Events are processed in delivery order. If the host's decoration
    /// API synchronously re-enters the engine mid-pass, the nested event
    /// is deferred and drained once the current pass completes.
    pub fn handle_event(&mut self, event: PreviewEvent) {
        if self.destroyed {
            return;
        }
        if self.in_pass {
            tracing::trace!(target: "zettel::preview", ?event, "re-entrant event deferred");
            self.deferred.push_back(event);
            return;
        }

        self.in_pass = true;
        self.dispatch(event);
        while let Some(next) = self.deferred.pop_front() {
            self.dispatch(next);
        }
        self.in_pass = false;
    }

    /// Convenience wrapper for change notifications.
    pub fn on_text_changed(&mut self, change: ChangeDescriptor) {
        self.handle_event(PreviewEvent::TextChanged(change));
    }

    /// Convenience wrapper for cursor-activity notifications.
    pub fn on_cursor_moved(&mut self, line: Option<LineId>) {
        self.handle_event(PreviewEvent::CursorMoved(line));
    }

    /// Convenience wrapper for clicks inside rendered lines.
    pub fn on_click(&mut self, line: LineId, width_fraction: f32) {
        self.handle_event(PreviewEvent::Clicked {
            line,
            width_fraction,
        });
    }

    fn dispatch(&mut self, event: PreviewEvent) {
        if !self.enabled {
            return;
        }
        match event {
            PreviewEvent::TextChanged(change) => {
                tracing::debug!(
                    target: "zettel::preview",
                    structural = change.is_structural(),
                    first = change.first.get(),
                    last = change.last.get(),
                    "reconcile path decision"
                );
                if change.is_structural() {
                    self.reconcile_all();
                } else {
                    self.reconcile_span(change.first, change.last);
                }
            }
            PreviewEvent::CursorMoved(line) => {
                if let Some(mv) = self.cursor.on_cursor_moved(line) {
                    self.stats.partial_passes += 1;
                    if let Some(prev) = mv.previous {
                        self.reconcile_line(prev);
                    }
                    if let Some(current) = mv.current {
                        self.reconcile_line(current);
                    }
                }
            }
            PreviewEvent::Clicked {
                line,
                width_fraction,
            } => {
                self.click_to_edit(line, width_fraction);
            }
        }
    }

    // === Lifecycle ===

    /// Enable the preview: seed the active line from the host and run a
    /// full reconciliation over every line. No-op when already enabled.
    pub fn enable(&mut self) {
        if self.destroyed || self.enabled {
            return;
        }
        self.enabled = true;
        self.cursor.reset(self.host.cursor_line());
        self.reconcile_all();
    }

    /// Disable the preview: release every decoration and stop reacting to
    /// events. No-op when already disabled.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.stats.releases += self.registry.release_all(&mut self.host);
        self.cache.clear();
        self.cursor.clear();
        self.enabled = false;
    }

    /// Flip between enabled and disabled. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
        self.enabled
    }

    /// Full teardown. Safe to call multiple times; a destroyed engine
    /// ignores every subsequent event and cannot be re-enabled.
    pub fn destroy(&mut self) {
        self.disable();
        self.deferred.clear();
        self.destroyed = true;
    }

    // === Reconciliation ===

    /// Full-document pass: drop state for dead lines, then recompute
    /// every live line.
    fn reconcile_all(&mut self) {
        self.stats.full_passes += 1;

        // The host is the source of truth for the active line; structural
        // edits usually move the cursor before we get here.
        self.cursor.reset(self.host.cursor_line());

        let live: Vec<LineId> = (0..self.host.line_count())
            .filter_map(|idx| self.host.line_id(idx))
            .collect();
        let live_set: HashSet<LineId> = live.iter().copied().collect();

        // Release decorations for lines that no longer exist, before their
        // handles become unreachable garbage.
        let dead: Vec<LineId> = self
            .registry
            .decorated_lines()
            .filter(|id| !live_set.contains(id))
            .collect();
        for id in dead {
            if self.registry.release(&mut self.host, id) {
                self.stats.releases += 1;
            }
        }
        self.cache.retain_lines(|id| live_set.contains(&id));

        for id in live {
            self.reconcile_line(id);
        }
    }

    /// Partial pass over the descriptor's id range. Falls back to a full
    /// pass when either endpoint is already dead (racing edit).
    fn reconcile_span(&mut self, first: LineId, last: LineId) {
        let (Some(a), Some(b)) = (self.host.index_of(first), self.host.index_of(last)) else {
            tracing::debug!(
                target: "zettel::preview",
                first = first.get(),
                last = last.get(),
                "content-edit range has dead endpoint, full pass instead"
            );
            self.reconcile_all();
            return;
        };
        self.stats.partial_passes += 1;

        let (lo, hi) = (a.min(b), a.max(b));
        for idx in lo..=hi {
            if let Some(id) = self.host.line_id(idx) {
                self.reconcile_line(id);
            }
        }
    }

    /// Recompute one line's visual state and apply the difference.
    fn reconcile_line(&mut self, id: LineId) {
        // Active line always shows raw source, regardless of content.
        if self.cursor.active() == Some(id) {
            if self.registry.release(&mut self.host, id) {
                self.stats.releases += 1;
            }
            return;
        }

        let Some(text) = self.host.line_text(id) else {
            // Line is gone; drop whatever we still held for it.
            if self.registry.release(&mut self.host, id) {
                self.stats.releases += 1;
            }
            self.cache.remove(id);
            return;
        };

        // Blank lines render to nothing visually distinct; raw-empty wins.
        if text.trim().is_empty() {
            if self.registry.release(&mut self.host, id) {
                self.stats.releases += 1;
            }
            return;
        }

        let source_hash = hash_source(&text);
        let html = match self.cache.lookup(id, source_hash) {
            Some(cached) => {
                self.stats.cache_hits += 1;
                cached.html.clone()
            }
            None => {
                let decision = self.decide_html(id, &text);
                self.cache.store(id, source_hash, decision.clone());
                decision
            }
        };

        match html {
            Some(html) => {
                // Unchanged decoration stays untouched; this is what keeps
                // scroll position and avoids flicker on every keystroke.
                if self.registry.content_hash(id) == Some(source_hash) {
                    return;
                }
                match self.registry.install(&mut self.host, id, &html, source_hash) {
                    Ok(()) => self.stats.installs += 1,
                    Err(err) => {
                        // Line stays raw; the next change event retries it.
                        tracing::debug!(
                            target: "zettel::preview",
                            line = id.get(),
                            %err,
                            "decoration install failed, line left raw"
                        );
                    }
                }
            }
            None => {
                if self.registry.release(&mut self.host, id) {
                    self.stats.releases += 1;
                }
            }
        }
    }

    /// Per-line decision: `Some(html)` to render, `None` to stay raw.
    ///
    /// Raw wins when the renderer finds no construct (plain prose never
    /// renders - no flicker), when the fragment is empty/whitespace
    /// (rendering must never hide content), and on renderer faults.
    fn decide_html(&mut self, id: LineId, text: &str) -> Option<String> {
        match render_line(text, &self.note_index) {
            Ok(render) => match render.construct {
                Some(_) if !render.html.trim().is_empty() => Some(render.html),
                _ => None,
            },
            Err(err) => {
                self.stats.renderer_faults += 1;
                tracing::warn!(
                    target: "zettel::preview",
                    line = id.get(),
                    %err,
                    "renderer fault, line falls back to raw"
                );
                None
            }
        }
    }

    // === Click-to-edit ===

    /// A click landed inside a rendered line: reveal the raw text and
    /// place the cursor at a character offset estimated from the click's
    /// horizontal position.
    ///
    /// The mapping is proportional (fraction of decoration width onto raw
    /// character length, clamped to `0..=len`). Rendered glyph widths do
    /// not correspond linearly to raw characters, so this is best-effort
    /// UX, not a correctness contract.
    fn click_to_edit(&mut self, line: LineId, width_fraction: f32) {
        if self.registry.release(&mut self.host, line) {
            self.stats.releases += 1;
        }

        let len = self
            .host
            .line_text(line)
            .map(|t| t.chars().count())
            .unwrap_or(0);
        let fraction = f64::from(width_fraction.clamp(0.0, 1.0));
        let offset = ((len as f64) * fraction).round() as usize;
        self.host.set_cursor(line, offset.min(len));

        // The clicked line is the active line now; repaint the one the
        // cursor left without waiting for the host's cursor notification.
        if let Some(mv) = self.cursor.on_cursor_moved(Some(line))
            && let Some(prev) = mv.previous
        {
            self.reconcile_line(prev);
        }
    }
}
