//! Windowing-layer capabilities consumed by the activation engine.
//!
//! The engine never talks to a concrete toolkit. It needs two things from the
//! layer beneath it:
//!
//! - [`FocusNotifier`]: an optional, thread-scoped source of focus-lost and
//!   focus-gained notifications. Layers without such a hook plug in
//!   [`NullNotifier`], which reports itself unsupported.
//! - [`Windowing`]: handle resolution, the containment hierarchy and the
//!   "move real focus" primitives.

pub mod hook;

use std::collections::VecDeque;

/// Opaque raw window handle allocated by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Low-level focus change observed by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    /// `window` lost focus; `next` is the window receiving it, if any.
    Lost {
        window: WindowHandle,
        next: Option<WindowHandle>,
    },
    Gained {
        window: WindowHandle,
    },
}

pub trait FocusNotifier {
    /// Whether this layer can deliver focus notifications at all.
    fn is_supported(&self) -> bool;
    fn install(&mut self);
    fn uninstall(&mut self);
    fn is_installed(&self) -> bool;
    /// Take every notification recorded since the previous call.
    fn drain_focus_events(&mut self) -> Vec<FocusEvent>;
}

/// Stub notifier for layers that cannot hook focus changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl FocusNotifier for NullNotifier {
    fn is_supported(&self) -> bool {
        false
    }

    fn install(&mut self) {}

    fn uninstall(&mut self) {}

    fn is_installed(&self) -> bool {
        false
    }

    fn drain_focus_events(&mut self) -> Vec<FocusEvent> {
        Vec::new()
    }
}

/// Queue-backed notifier. Events are recorded only while installed.
#[derive(Debug, Default, Clone)]
pub struct FocusQueue {
    installed: bool,
    events: VecDeque<FocusEvent>,
}

impl FocusQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FocusEvent) {
        if self.installed {
            self.events.push_back(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FocusNotifier for FocusQueue {
    fn is_supported(&self) -> bool {
        true
    }

    fn install(&mut self) {
        self.installed = true;
    }

    fn uninstall(&mut self) {
        self.installed = false;
        self.events.clear();
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn drain_focus_events(&mut self) -> Vec<FocusEvent> {
        self.events.drain(..).collect()
    }
}

/// The windowing primitives the engine relies on.
///
/// Every query must tolerate stale or disposed handles and answer with
/// `None` / `false` rather than panicking.
pub trait Windowing: FocusNotifier {
    /// The window currently holding real keyboard focus.
    fn focused(&self) -> Option<WindowHandle>;

    /// The control owning `handle`, or `None` for foreign or destroyed windows.
    fn control_from_child(&self, handle: WindowHandle) -> Option<WindowHandle>;

    fn parent(&self, handle: WindowHandle) -> Option<WindowHandle>;

    fn is_disposed(&self, handle: WindowHandle) -> bool;

    /// Move real focus onto `handle`. Returns false when the window cannot
    /// take focus.
    fn set_focus(&mut self, handle: WindowHandle) -> bool;

    /// Focus the next focusable control inside `container`, wrapping around.
    fn select_next_control(&mut self, container: WindowHandle) -> bool;

    /// Whether `handle` is `container` or lies somewhere beneath it.
    fn contains(&self, container: WindowHandle, handle: WindowHandle) -> bool {
        let mut control = self.control_from_child(handle);
        while let Some(current) = control {
            if current == container {
                return true;
            }
            control = self.parent(current);
        }
        false
    }

    fn contains_focus(&self, container: WindowHandle) -> bool {
        self.focused()
            .is_some_and(|focused| self.contains(container, focused))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_records_only_while_installed() {
        let mut q = FocusQueue::new();
        let w = WindowHandle::new(7);
        q.push(FocusEvent::Gained { window: w });
        assert!(q.is_empty());

        q.install();
        q.push(FocusEvent::Gained { window: w });
        q.push(FocusEvent::Lost {
            window: w,
            next: None,
        });
        assert_eq!(q.len(), 2);
        let drained = q.drain_focus_events();
        assert_eq!(drained[0], FocusEvent::Gained { window: w });
        assert!(q.is_empty());

        q.push(FocusEvent::Gained { window: w });
        q.uninstall();
        // uninstall drops anything still queued
        assert!(q.drain_focus_events().is_empty());
    }

    #[test]
    fn null_notifier_is_unsupported() {
        let mut n = NullNotifier;
        n.install();
        assert!(!n.is_supported());
        assert!(!n.is_installed());
        assert!(n.drain_focus_events().is_empty());
    }
}
