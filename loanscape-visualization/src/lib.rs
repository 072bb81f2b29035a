//! Interactive viewer for loan application datasets
//!
//! This crate turns a loaded [`loanscape_core::Scene`] into a window you can
//! navigate:
//! - Orbit, pan and wheel zoom camera controls
//! - Hover picking with a record tooltip
//! - A start/stop render loop driving the wgpu renderer

pub mod camera;
pub mod config;
pub mod controls;
pub mod overlay;
pub mod picking;
pub mod render_loop;
pub mod tooltip;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use controls::*;
pub use picking::*;
pub use render_loop::*;
pub use tooltip::*;
pub use viewer::*;
