//! Focus tracking and active-pane resolution for docking layouts.
//!
//! A [`panel::DockPanel`] owns a [`dock::DockLayout`], a windowing host and
//! one [`engine::ActivationEngine`]. The engine listens to focus moves
//! reported by the host and keeps the active content, pane and document up
//! to date along with a most-recently-used activation order.

pub mod app;
pub mod config;
pub mod constants;
pub mod dock;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod focus;
pub mod keybindings;
pub mod panel;
pub mod runner;
pub mod tracing_sub;
pub mod ui;
pub mod window;
