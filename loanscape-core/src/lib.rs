//! Core data structures for loanscape
//!
//! This crate provides the data model behind the loan scatter plot:
//! records and datasets, the linear scales mapping record fields onto
//! axes, and the static scene (point cloud, axes, grid) built from them.

pub mod color;
pub mod error;
pub mod point_cloud;
pub mod record;
pub mod scale;
pub mod scene;

pub use color::*;
pub use error::*;
pub use point_cloud::*;
pub use record::*;
pub use scale::*;
pub use scene::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point2, Point3, UnitQuaternion, Vector2, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;
