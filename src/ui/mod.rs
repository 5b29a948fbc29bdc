// UI module

pub mod matrix_tui;

pub use matrix_tui::{run_dashboard_app, DashboardApp};
