//! Runtime switches for focus tracking.

/// How a dock panel tracks real focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrackingConfig {
    /// Install the low-level focus hook when the windowing layer supports
    /// one. With the hook off no pane ever resolves as active.
    pub use_focus_hook: bool,
}

impl Default for FocusTrackingConfig {
    fn default() -> Self {
        Self {
            use_focus_hook: true,
        }
    }
}

impl FocusTrackingConfig {
    pub fn without_focus_hook() -> Self {
        Self {
            use_focus_hook: false,
        }
    }
}
