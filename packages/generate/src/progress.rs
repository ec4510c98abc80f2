//! Progress reporting for population generation.
//!
//! Generation reports one unit of work per person through a
//! [`ProgressCallback`]. Rendering lives upstream: the CLI passes an
//! `indicatif` bar, tests and library callers pass [`NullProgress`].

/// Receives progress updates from a long-running generation or analysis.
///
/// Implementations must be `Send + Sync` so a single reporter can be
/// shared behind an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advances progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Updates the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
