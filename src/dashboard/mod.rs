//! Dashboard UI Module
//!
//! The main BreakBuddy window: schedule inputs, start/stop controls and
//! settings. It also drives the scheduler and break overlay every frame.

pub mod app;
pub mod components;
pub mod controller;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run_dashboard, StartupOptions};
