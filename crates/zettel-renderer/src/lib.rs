//! zettel-renderer: single-line markdown rendering for the live preview.
//!
//! This crate is deliberately not a block-aware markdown parser. The live
//! preview renders one line at a time, with no knowledge of surrounding
//! lines, so the converter here is a restricted regex matcher over exactly
//! one line of source text.
//!
//! Single-construct policy: each line is rendered with at most one
//! construct *type*. The first matching type in a fixed precedence order
//! wins; other construct types on the same line are left as escaped raw
//! text. Combinations like a bold link inside a heading therefore do not
//! compose. This is an accepted limitation of the line-local design, not
//! a bug to fix here; a block-aware renderer can replace this crate behind
//! the same pure-function interface without touching the preview engine.

pub mod escape;
pub mod line;
pub mod link;

pub use escape::escape_html;
pub use line::{Construct, LineRender, RenderError, MAX_LINE_LEN, render_line};
pub use link::{InMemoryNoteIndex, NoteIndex};
