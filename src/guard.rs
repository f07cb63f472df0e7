//! Submission lock for single-shot form buttons
//!
//! Checkout and signup share the same double-submit protection: the first
//! submit engages the lock and swaps the button to its busy label; a second
//! submit while engaged is suppressed entirely. The lock is released only
//! on a recognized failure path so the user can retry. Success never
//! releases it, since navigation away replaces the page.

/// Disabled-button state for one form's trigger control
#[derive(Debug, Clone)]
pub struct SubmitGuard {
    engaged: bool,
    idle_label: String,
    busy_label: String,
}

impl SubmitGuard {
    pub fn new(idle_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            engaged: false,
            idle_label: idle_label.into(),
            busy_label: busy_label.into(),
        }
    }

    /// Attempt to start a submission. Returns false when one is already in
    /// flight, in which case the caller must drop the event.
    pub fn try_begin(&mut self) -> bool {
        if self.engaged {
            return false;
        }
        self.engaged = true;
        true
    }

    /// Revert to the interactive state after a failure
    pub fn release(&mut self) {
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Label currently shown on the button
    pub fn label(&self) -> &str {
        if self.engaged {
            &self.busy_label
        } else {
            &self.idle_label
        }
    }
}
