//! Camera utilities for 3D visualization

use nalgebra::{
    Isometry3, Matrix4, Perspective3, Point3, Translation3, Unit, UnitQuaternion, Vector3,
};

/// A perspective camera looking down its local -Z axis.
///
/// The view is driven by `orientation`, not by `target`: panning moves the
/// camera without re-aiming it, so the two only agree after [`Camera::look_at`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera aimed at `target`
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            orientation: UnitQuaternion::identity(),
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        };
        camera.look_at(target);
        camera
    }

    /// Turn the camera so its -Z axis points at `target`
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;

        let mut back = self.position - target;
        if back.norm_squared() == 0.0 {
            back = Vector3::z();
        }
        let back = back.normalize();
        // Looking straight along `up` leaves the right axis undefined.
        let back = if self.up.cross(&back).norm_squared() < 1e-12 {
            let mut nudged = back;
            if self.up.z.abs() == 1.0 {
                nudged.x += 1e-4;
            } else {
                nudged.z += 1e-4;
            }
            nudged.normalize()
        } else {
            back
        };

        self.orientation = UnitQuaternion::face_towards(&back, &self.up);
    }

    /// Camera-space +X in world coordinates
    pub fn right(&self) -> Vector3<f32> {
        self.orientation * Vector3::x()
    }

    /// Camera-space +Y in world coordinates
    pub fn up_axis(&self) -> Vector3<f32> {
        self.orientation * Vector3::y()
    }

    /// Viewing direction in world coordinates
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * -Vector3::z()
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
            .inverse()
            .to_homogeneous()
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Update the aspect ratio from a viewport size. Empty viewports are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Orbit the position around the origin and re-aim at the target.
    ///
    /// The pitch axis is the camera's right axis before the yaw is applied.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let yaw_rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw);
        self.position = Point3::from(yaw_rotation * self.position.coords);

        let right = Unit::new_normalize(self.right());
        let pitch_rotation = UnitQuaternion::from_axis_angle(&right, pitch);
        self.position = Point3::from(pitch_rotation * self.position.coords);

        self.look_at(self.target);
    }

    /// Translate along the camera's right and up axes
    pub fn pan(&mut self, right_amount: f32, up_amount: f32) {
        self.position += self.right() * right_amount + self.up_axis() * up_amount;
    }

    /// Move the camera along its viewing direction
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(300.0, 200.0, 300.0),
            Point3::origin(),
            Vector3::y(),
            60f32.to_radians(),
            1200.0 / 800.0,
            0.1,
            1000.0,
        )
    }
}
