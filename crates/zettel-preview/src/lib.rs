//! zettel-preview: live preview reconciliation for a line-based editor.
//!
//! This crate provides:
//! - `HostEditor` trait abstracting the host text-editing widget
//! - `CursorTracker` - active-line bookkeeping
//! - `DecorationRegistry` - ownership of installed line decorations
//! - `RenderCache` - per-line render memoization
//! - `PreviewEngine` - the reconciler tying it all together
//!
//! The engine never owns text storage. It reads lines through `HostEditor`
//! and reacts to the change/cursor notifications the host glue forwards to
//! it, keeping exactly one rule intact at all times: the line under the
//! cursor shows raw markdown, every other line that renders to something
//! visually distinct shows HTML.

pub mod cache;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod host;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::RenderCache;
pub use cursor::{CursorMove, CursorTracker, selection_active_line};
pub use engine::PreviewEngine;
pub use error::HostError;
pub use host::{DecorationHandle, HostEditor, LineId};
pub use registry::{Decoration, DecorationRegistry};
pub use types::{ChangeDescriptor, PreviewEvent, ReconcileStats, hash_source};
