//! # Loanscape GPU
//!
//! wgpu rendering for the loan application scatter plot: the point cloud as
//! instanced camera-facing quads, axes and grid as a line list, and an egui
//! overlay composited on top.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use loanscape_gpu::{RenderConfig, SceneRenderer};
//! use loanscape_core::{Dataset, Scene};
//! use std::sync::Arc;
//! use winit::window::Window;
//!
//! async fn example(window: Arc<Window>, dataset: Dataset) -> loanscape_core::Result<()> {
//!     let mut renderer = SceneRenderer::new(window, RenderConfig::default()).await?;
//!     renderer.upload_scene(&Scene::from_dataset(Arc::new(dataset)));
//!     renderer.render(None)?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod renderer;

pub use device::{GpuContext, DEPTH_FORMAT};
pub use renderer::*;
