//! Viewer configuration

use crate::camera::Camera;
use crate::controls::ControlSettings;
use loanscape_gpu::RenderConfig;
use loanscape_io::DEFAULT_DATA_PATH;
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Initial camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [300.0, 200.0, 300.0],
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Everything the viewer needs to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub data_path: PathBuf,
    pub window_title: String,
    /// Logical window size
    pub window_size: [f64; 2],
    pub camera: CameraConfig,
    pub controls: ControlSettings,
    /// World-space tolerance for hovering a point
    pub picking_threshold: f32,
    /// Tooltip offset from the cursor in logical pixels
    pub tooltip_offset: [f32; 2],
    /// Point quad edge length in world units
    pub point_size: f32,
    pub point_opacity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            window_title: "Loan Applications 3D".to_string(),
            window_size: [1200.0, 800.0],
            camera: CameraConfig::default(),
            controls: ControlSettings::default(),
            picking_threshold: 2.0,
            tooltip_offset: [15.0, 15.0],
            point_size: 1.75,
            point_opacity: 0.8,
        }
    }
}

impl ViewerConfig {
    /// Camera for a viewport of the given logical size
    pub fn camera(&self, viewport: Vector2<f32>) -> Camera {
        let [x, y, z] = self.camera.position;
        let mut camera = Camera::new(
            Point3::new(x, y, z),
            Point3::origin(),
            Vector3::y(),
            self.camera.fov_degrees.to_radians(),
            1.0,
            self.camera.near,
            self.camera.far,
        );
        camera.set_aspect_ratio(viewport.x, viewport.y);
        camera
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            point_size: self.point_size,
            point_opacity: self.point_opacity,
            ..RenderConfig::default()
        }
    }

    pub fn tooltip_offset(&self) -> Vector2<f32> {
        Vector2::new(self.tooltip_offset[0], self.tooltip_offset[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_viewer_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/Loan_approval_data_2025.csv"));
        assert_eq!(config.picking_threshold, 2.0);
        assert_eq!(config.controls.rotation_speed, 0.005);
        assert_eq!(config.controls.pan_speed, 0.5);
        assert_eq!(config.controls.zoom_speed, 0.1);
    }

    #[test]
    fn test_camera_from_config() {
        let config = ViewerConfig::default();
        let camera = config.camera(Vector2::new(1200.0, 800.0));
        assert_eq!(camera.position, Point3::new(300.0, 200.0, 300.0));
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
        assert_relative_eq!(camera.aspect_ratio, 1.5);
        assert_eq!(camera.far, 1000.0);
    }
}
