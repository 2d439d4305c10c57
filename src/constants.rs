//! Shared crate-wide constants.

use std::time::Duration;

/// Width (in terminal columns) of the left tool pane in the demo layout.
pub const TOOL_PANE_WIDTH: u16 = 24;

/// Height (in terminal rows) of an auto-hide pane while it is slid out.
pub const AUTO_HIDE_PANE_HEIGHT: u16 = 8;

/// Rows taken by a pane's tab strip.
pub const TAB_STRIP_HEIGHT: u16 = 1;

/// Rows reserved for the status bar and the auto-hide strip.
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const AUTO_HIDE_STRIP_HEIGHT: u16 = 1;

/// Documents opened at startup when the CLI does not say otherwise.
pub const DEFAULT_DOCUMENT_COUNT: usize = 3;

/// Upper bound on open documents so tab strips stay readable.
pub const MAX_DOCUMENTS: usize = 12;

/// Number of MRU entries shown in the status bar.
pub const STATUS_MRU_LEN: usize = 4;

/// How long the demo waits for input before redrawing.
pub const POLL_INTERVAL: Duration = Duration::from_millis(16);
