//! Logger port.
//!
//! Log records themselves go through the `tracing` macros.  What the
//! bootstrap needs from "the logger" is narrower: the ability to raise or
//! lower the minimum severity once flags and configuration are known.  Not
//! every logger can do that, so the capability is a question the logger
//! answers rather than something the caller assumes.

use std::sync::Arc;

use simplecli_core::Severity;

/// A logger whose minimum severity may be adjustable.
pub trait Logger: Send + Sync {
    /// Attempts to set the minimum emitted severity.
    ///
    /// Returns `false` when this logger does not support severity changes;
    /// the call is then a no-op.
    fn try_set_severity(&self, severity: Severity) -> bool;
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn try_set_severity(&self, severity: Severity) -> bool {
        (**self).try_set_severity(severity)
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn try_set_severity(&self, severity: Severity) -> bool {
        (**self).try_set_severity(severity)
    }
}
