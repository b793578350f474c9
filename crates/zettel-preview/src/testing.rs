//! A fake host widget for tests.
//!
//! Backed by a plain `Vec` of `(LineId, String)` with monotonically
//! assigned ids, so structural edits renumber indices but never recycle
//! an id. Decoration installs hand out counted handles and the fake
//! records enough bookkeeping to assert the engine's invariants.

use std::collections::{HashMap, HashSet};

use smol_str::{SmolStr, ToSmolStr};

use crate::error::HostError;
use crate::host::{DecorationHandle, HostEditor, LineId};
use crate::types::ChangeDescriptor;

pub(crate) struct FakeHost {
    lines: Vec<(LineId, String)>,
    next_line_id: u64,
    next_handle: u64,
    /// Live decorations by handle.
    installed: HashMap<DecorationHandle, (LineId, String)>,
    /// Lines whose raw text is currently suppressed.
    hidden: HashSet<LineId>,
    cursor: Option<(LineId, usize)>,
    /// When set, every install is rejected (racing-edit simulation).
    pub reject_installs: bool,
    pub install_count: usize,
    pub release_count: usize,
    pub stale_releases: usize,
}

impl FakeHost {
    pub fn new(lines: &[&str]) -> Self {
        let mut host = Self {
            lines: Vec::new(),
            next_line_id: 1,
            next_handle: 1,
            installed: HashMap::new(),
            hidden: HashSet::new(),
            cursor: None,
            reject_installs: false,
            install_count: 0,
            release_count: 0,
            stale_releases: 0,
        };
        for text in lines {
            let id = host.alloc_id();
            host.lines.push((id, (*text).to_string()));
        }
        host
    }

    fn alloc_id(&mut self) -> LineId {
        let id = LineId::new(self.next_line_id);
        self.next_line_id += 1;
        id
    }

    pub fn id_at(&self, index: usize) -> LineId {
        self.lines[index].0
    }

    pub fn set_cursor_line(&mut self, index: Option<usize>) {
        self.cursor = index.map(|i| (self.lines[i].0, 0));
    }

    pub fn cursor_position(&self) -> Option<(LineId, usize)> {
        self.cursor
    }

    /// Content-only edit of the line at `index`.
    pub fn edit_line(&mut self, index: usize, new_text: &str) -> ChangeDescriptor {
        let id = self.lines[index].0;
        self.lines[index].1 = new_text.to_string();
        ChangeDescriptor::single(id)
    }

    /// Split the line at `index` at char offset `at` (Enter key).
    pub fn split_line(&mut self, index: usize, at: usize) -> ChangeDescriptor {
        let id = self.lines[index].0;
        let rest: String = self.lines[index].1.chars().skip(at).collect();
        let head: String = self.lines[index].1.chars().take(at).collect();
        self.lines[index].1 = head;
        let new_id = self.alloc_id();
        self.lines.insert(index + 1, (new_id, rest));
        ChangeDescriptor::structural(id, id, 1, 0)
    }

    /// Delete the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> ChangeDescriptor {
        let (id, _) = self.lines.remove(index);
        ChangeDescriptor::structural(id, id, 0, 1)
    }

    /// Insert a new line before `index`.
    pub fn insert_line(&mut self, index: usize, text: &str) -> ChangeDescriptor {
        let new_id = self.alloc_id();
        self.lines.insert(index, (new_id, text.to_string()));
        ChangeDescriptor::structural(new_id, new_id, 1, 0)
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    pub fn decorated_lines(&self) -> HashSet<LineId> {
        self.installed.values().map(|(id, _)| *id).collect()
    }

    pub fn html_for(&self, line: LineId) -> Option<&str> {
        self.installed
            .values()
            .find(|(id, _)| *id == line)
            .map(|(_, html)| html.as_str())
    }

    pub fn raw_hidden(&self, line: LineId) -> bool {
        self.hidden.contains(&line)
    }

    /// Simulate the widget invalidating every outstanding handle, as a
    /// structural edit can do.
    pub fn invalidate_all_handles(&mut self) {
        self.installed.clear();
    }

    /// Ids of all current lines.
    pub fn live_ids(&self) -> HashSet<LineId> {
        self.lines.iter().map(|(id, _)| *id).collect()
    }
}

impl HostEditor for FakeHost {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_id(&self, index: usize) -> Option<LineId> {
        self.lines.get(index).map(|(id, _)| *id)
    }

    fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|(lid, _)| *lid == id)
    }

    fn line_text(&self, id: LineId) -> Option<SmolStr> {
        self.lines
            .iter()
            .find(|(lid, _)| *lid == id)
            .map(|(_, text)| text.to_smolstr())
    }

    fn cursor_line(&self) -> Option<LineId> {
        self.cursor.map(|(id, _)| id)
    }

    fn set_cursor(&mut self, id: LineId, char_offset: usize) {
        self.cursor = Some((id, char_offset));
    }

    fn install_decoration(&mut self, id: LineId, html: &str) -> Result<DecorationHandle, HostError> {
        if self.reject_installs {
            return Err(HostError::InstallRejected(id));
        }
        let handle = DecorationHandle::new(self.next_handle);
        self.next_handle += 1;
        self.installed.insert(handle, (id, html.to_string()));
        self.install_count += 1;
        Ok(handle)
    }

    fn release_decoration(&mut self, handle: DecorationHandle) -> Result<(), HostError> {
        if self.installed.remove(&handle).is_none() {
            self.stale_releases += 1;
            return Err(HostError::StaleHandle);
        }
        self.release_count += 1;
        Ok(())
    }

    fn set_raw_visible(&mut self, id: LineId, visible: bool) {
        if visible {
            self.hidden.remove(&id);
        } else {
            self.hidden.insert(id);
        }
    }
}
