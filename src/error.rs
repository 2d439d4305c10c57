//! Errors raised while building or editing a dock layout.
//!
//! The activation engine itself never fails: stale ids, disposed windows and
//! foreign panes are absorbed as "nothing active". Only the layout editing
//! surface reports misuse.

use thiserror::Error;

use crate::dock::{ContentId, PaneId};
use crate::focus::WindowHandle;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DockError {
    #[error("unknown content {0:?}")]
    UnknownContent(ContentId),
    #[error("unknown pane {0:?}")]
    UnknownPane(PaneId),
    #[error("window {0:?} is already registered with this panel")]
    WindowInUse(WindowHandle),
    #[error("content {content:?} is not a member of pane {pane:?}")]
    NotInPane { content: ContentId, pane: PaneId },
    #[error("pane {0:?} is detached from this panel")]
    DetachedPane(PaneId),
}
