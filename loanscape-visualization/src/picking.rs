//! Ray casting against the point cloud

use crate::camera::Camera;
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera position through a point in normalized device
    /// coordinates
    pub fn from_camera(camera: &Camera, ndc: Point2<f32>) -> Self {
        let half_height = (camera.fov * 0.5).tan();
        let local = Vector3::new(
            ndc.x * half_height * camera.aspect_ratio,
            ndc.y * half_height,
            -1.0,
        );
        Self::new(camera.position, camera.orientation * local)
    }

    /// Closest point on the ray to `point`
    pub fn closest_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let t = (point - self.origin).dot(&self.direction).max(0.0);
        self.origin + self.direction * t
    }

    pub fn distance_squared_to_point(&self, point: &Point3<f32>) -> f32 {
        (self.closest_point(point) - point).norm_squared()
    }
}

/// A point within the picking threshold of a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index into the point cloud, which is also the dataset row
    pub index: usize,
    /// Distance from the ray origin to the closest point on the ray
    pub distance: f32,
    pub distance_to_ray: f32,
}

/// Map a cursor position to normalized device coordinates
pub fn cursor_to_ndc(cursor: Point2<f32>, viewport: Vector2<f32>) -> Point2<f32> {
    Point2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    )
}

/// All points within `threshold` of the ray, nearest first. Equal distances
/// keep dataset order.
pub fn intersect_points(ray: &Ray, positions: &[Point3<f32>], threshold: f32) -> Vec<Hit> {
    let threshold_sq = threshold * threshold;
    let mut hits: Vec<Hit> = positions
        .iter()
        .enumerate()
        .filter_map(|(index, position)| {
            let distance_sq = ray.distance_squared_to_point(position);
            // NaN positions fail this comparison.
            if distance_sq < threshold_sq {
                Some(Hit {
                    index,
                    distance: (ray.closest_point(position) - ray.origin).norm(),
                    distance_to_ray: distance_sq.sqrt(),
                })
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Nearest point under the cursor, if any
pub fn pick_point(
    camera: &Camera,
    positions: &[Point3<f32>],
    cursor: Point2<f32>,
    viewport: Vector2<f32>,
    threshold: f32,
) -> Option<Hit> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    let ray = Ray::from_camera(camera, cursor_to_ndc(cursor, viewport));
    let hit = intersect_points(&ray, positions, threshold).into_iter().next();
    if let Some(hit) = &hit {
        log::trace!("Hover hit point {} at distance {:.2}", hit.index, hit.distance);
    }
    hit
}
