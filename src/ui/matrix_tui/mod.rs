//! Terminal display surface for the dashboard.
//!
//! Paints composed scenes with ratatui and feeds crossterm input back to
//! the render loop.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_dashboard_app, DashboardApp, TerminalSurface};
pub use event_handler::map_event;
pub use render::{render_scene, visible_ticker, SceneView, CHART_HEIGHT};
pub use widgets::{accent_color, tint_color};
