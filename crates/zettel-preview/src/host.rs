//! Host widget abstraction.
//!
//! The preview engine treats the text-editing widget as a black box that
//! stores lines, reports where the cursor is, and exposes a
//! decoration/overlay API. Whatever widget the application embeds
//! (browser contenteditable, CodeMirror-style component, test fake)
//! implements this trait; the engine itself contains no DOM code.
//!
//! Event flow is push-based: the host glue subscribes to the widget's
//! change and cursor-activity notifications and forwards them to
//! [`PreviewEngine::handle_event`](crate::engine::PreviewEngine::handle_event)
//! in emission order. The engine never polls.

use smol_str::SmolStr;

use crate::error::HostError;

/// Stable identity of a line.
///
/// Two lines are the same logical line over time iff they have the same
/// `LineId`. The host assigns ids monotonically at line creation and must
/// keep `line_id`/`index_of` a bijection between current indices and live
/// ids; a raw array index is never a valid persistent key across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque handle to an installed line decoration.
///
/// Obtained from [`HostEditor::install_decoration`] and owned by the
/// [`DecorationRegistry`](crate::registry::DecorationRegistry) until it is
/// explicitly released. A handle that is forgotten without being released
/// leaks a DOM node and a widget-internal marker object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationHandle(u64);

impl DecorationHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The host text-editing widget, as seen by the preview engine.
///
/// All index/id lookups are fallible: a descriptor may carry ids that a
/// racing edit already killed, and the engine must degrade per line, not
/// panic.
pub trait HostEditor {
    /// Number of lines currently in the document.
    fn line_count(&self) -> usize;

    /// Stable id of the line at `index`, or `None` if out of range.
    fn line_id(&self, index: usize) -> Option<LineId>;

    /// Current index of the line with `id`, or `None` if the line no
    /// longer exists.
    fn index_of(&self, id: LineId) -> Option<usize>;

    /// Text of the line with `id`, without the trailing newline.
    /// `None` if the line no longer exists.
    fn line_text(&self, id: LineId) -> Option<SmolStr>;

    /// Line containing the cursor, or `None` for an empty document.
    ///
    /// For a multi-line selection the host reports the *anchor* line;
    /// see [`selection_active_line`](crate::cursor::selection_active_line).
    fn cursor_line(&self) -> Option<LineId>;

    /// Place the cursor on `id` at `char_offset` (clamped by the host).
    fn set_cursor(&mut self, id: LineId, char_offset: usize);

    /// Install a decoration that visually replaces the full width of the
    /// line's text range with `html`. Must not alter the underlying text.
    fn install_decoration(&mut self, id: LineId, html: &str) -> Result<DecorationHandle, HostError>;

    /// Release a previously installed decoration.
    ///
    /// Returns `Err(HostError::StaleHandle)` when the widget no longer
    /// recognizes the handle (invalidated by an intervening structural
    /// edit); callers treat that as already-released.
    fn release_decoration(&mut self, handle: DecorationHandle) -> Result<(), HostError>;

    /// Control whether the line's underlying raw text is visible.
    ///
    /// Some widgets auto-hide text covered by a decoration, others need
    /// explicit suppression; the registry calls this on every install and
    /// release so both kinds behave the same.
    fn set_raw_visible(&mut self, id: LineId, visible: bool);
}
