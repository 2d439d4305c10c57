//! Suspendable listener on top of a [`FocusNotifier`].
//!
//! Suspension is reference counted. While the counter is non-zero the
//! listener is detached, so focus moves performed by the engine itself do not
//! retrigger a refresh. An activation requested while suspended is parked and
//! handed back exactly once when the final `resume` brings the counter to
//! zero.

use super::FocusNotifier;
use crate::dock::ContentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Installed,
    Disposed,
}

/// Outcome of [`FocusTrackingHook::resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// The counter was already zero; nothing happened.
    Ignored,
    /// The counter dropped but tracking is still suspended.
    Nested,
    /// Tracking is live again. `pending` is the parked activation, if any.
    Released { pending: Option<ContentId> },
}

#[derive(Debug)]
pub struct FocusTrackingHook {
    // only changed through &mut self, so install and dispose never race
    lifecycle: Lifecycle,
    suspend_count: u32,
    listening: bool,
    pending: Option<ContentId>,
}

impl Default for FocusTrackingHook {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTrackingHook {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            suspend_count: 0,
            listening: false,
            pending: None,
        }
    }

    /// Install the low-level hook on `notifier`. Returns false when the layer
    /// has no hook support or the hook was already disposed.
    pub fn install<N: FocusNotifier + ?Sized>(&mut self, notifier: &mut N) -> bool {
        if self.lifecycle == Lifecycle::Disposed || !notifier.is_supported() {
            return false;
        }
        if self.lifecycle == Lifecycle::Installed {
            notifier.uninstall();
        }
        notifier.install();
        self.lifecycle = Lifecycle::Installed;
        self.listening = self.suspend_count == 0;
        tracing::debug!("focus hook installed");
        true
    }

    /// Release the hook. Safe to call more than once.
    pub fn dispose<N: FocusNotifier + ?Sized>(&mut self, notifier: &mut N) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        if self.lifecycle == Lifecycle::Installed {
            notifier.uninstall();
            tracing::debug!("focus hook uninstalled");
        }
        self.lifecycle = Lifecycle::Disposed;
        self.listening = false;
        self.pending = None;
    }

    pub fn is_installed(&self) -> bool {
        self.lifecycle == Lifecycle::Installed
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    /// Whether notifications should currently be dispatched.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend_count != 0
    }

    pub fn suspend_count(&self) -> u32 {
        self.suspend_count
    }

    pub fn suspend(&mut self) {
        self.suspend_count = self.suspend_count.saturating_add(1);
        self.listening = false;
    }

    /// Park an activation until tracking resumes. A later request replaces
    /// an earlier one.
    pub fn set_pending(&mut self, content: ContentId) {
        self.pending = Some(content);
    }

    pub fn pending(&self) -> Option<ContentId> {
        self.pending
    }

    pub fn forget_pending(&mut self, content: ContentId) {
        if self.pending == Some(content) {
            self.pending = None;
        }
    }

    pub fn resume(&mut self) -> Resume {
        if self.suspend_count == 0 {
            return Resume::Ignored;
        }
        self.suspend_count -= 1;
        if self.suspend_count > 0 {
            return Resume::Nested;
        }
        Resume::Released {
            pending: self.pending.take(),
        }
    }

    /// Attach the listener again after the final resume. Notifications queued
    /// while detached are dropped, as a detached listener never saw them.
    pub fn reattach<N: FocusNotifier + ?Sized>(&mut self, notifier: &mut N) {
        let discarded = notifier.drain_focus_events();
        if !discarded.is_empty() {
            tracing::trace!(
                count = discarded.len(),
                "dropped focus events raised while suspended"
            );
        }
        self.listening = self.suspend_count == 0 && self.is_installed();
    }
}
