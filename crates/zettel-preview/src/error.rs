//! Fault taxonomy for the preview engine.
//!
//! Nothing here is fatal. The worst degraded behavior the engine accepts
//! is "preview falls back to raw text everywhere"; a fault never corrupts
//! editor state and never crashes a reconciliation pass.

use crate::host::LineId;

/// Faults raised by the host widget's decoration API.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// The widget rejected a decoration install, e.g. the line range was
    /// invalidated by a racing edit. The engine leaves the line raw and
    /// retries it on the next change event.
    #[error("decoration install rejected for line {}", .0.get())]
    InstallRejected(LineId),

    /// The widget no longer recognizes a decoration handle (already
    /// invalidated by an intervening structural edit). Release is
    /// idempotent, so this is ignored.
    #[error("stale decoration handle")]
    StaleHandle,
}
