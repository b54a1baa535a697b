//! Reporter trait for dependency injection
//!
//! This trait allows the install flow to report progress and status without
//! being coupled to a specific CI runner or terminal.

use crate::install::InstallState;

pub trait Reporter: Send + Sync {
    /// Opens a collapsible log section (e.g. "Download Boost").
    fn section(&self, title: &str);

    /// Closes the most recently opened section.
    fn end_section(&self);

    /// The install flow moved to a new state.
    fn transition(&self, state: InstallState);

    /// Updates the progress of a download.
    fn downloading(&self, current: u64, total: Option<u64>);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a message only shown when the runner has debug logging enabled.
    fn debug(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn end_section(&self) {
        (**self).end_section();
    }
    fn transition(&self, state: InstallState) {
        (**self).transition(state);
    }
    fn downloading(&self, current: u64, total: Option<u64>) {
        (**self).downloading(current, total);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn debug(&self, msg: &str) {
        (**self).debug(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn end_section(&self) {}
    fn transition(&self, _: InstallState) {}
    fn downloading(&self, _: u64, _: Option<u64>) {}
    fn info(&self, _: &str) {}
    fn debug(&self, _: &str) {}
}
