//! Static scene geometry: the point cloud, axis segments and ground grid

use crate::color::*;
use crate::point_cloud::PointCloud;
use crate::record::{Dataset, LoanStatus};
use crate::scale::AxisScales;
use crate::Point3f;
use std::sync::Arc;

/// A colored straight line between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3f,
    pub end: Point3f,
    pub color: Color,
}

impl LineSegment {
    pub fn new(start: Point3f, end: Point3f, color: Color) -> Self {
        Self { start, end, color }
    }
}

/// Square grid lying in the XZ plane, centered at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            size: 300.0,
            divisions: 20,
            center_color: GRID_CENTER_COLOR,
            line_color: GRID_LINE_COLOR,
        }
    }
}

impl Grid {
    /// One line parallel to X and one parallel to Z per division boundary.
    /// The pair through the origin uses the center color.
    pub fn segments(&self) -> Vec<LineSegment> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;

        let mut segments = Vec::with_capacity(2 * (self.divisions as usize + 1));
        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if i == center { self.center_color } else { self.line_color };
            segments.push(LineSegment::new(
                Point3f::new(-half, 0.0, k),
                Point3f::new(half, 0.0, k),
                color,
            ));
            segments.push(LineSegment::new(
                Point3f::new(k, 0.0, -half),
                Point3f::new(k, 0.0, half),
                color,
            ));
        }
        segments
    }
}

/// Fixed reference axes through the origin, matching the scale ranges
pub fn axis_segments() -> [LineSegment; 3] {
    [
        LineSegment::new(
            Point3f::new(-150.0, 0.0, 0.0),
            Point3f::new(150.0, 0.0, 0.0),
            X_AXIS_COLOR,
        ),
        LineSegment::new(
            Point3f::new(0.0, -100.0, 0.0),
            Point3f::new(0.0, 100.0, 0.0),
            Y_AXIS_COLOR,
        ),
        LineSegment::new(
            Point3f::new(0.0, 0.0, -100.0),
            Point3f::new(0.0, 0.0, 100.0),
            Z_AXIS_COLOR,
        ),
    ]
}

/// Color of a point for a given loan outcome
pub fn status_color(status: LoanStatus) -> Color {
    match status {
        LoanStatus::Approved => APPROVED_COLOR,
        LoanStatus::Rejected => REJECTED_COLOR,
    }
}

/// Everything drawn in the viewport. Immutable once built.
#[derive(Debug, Clone)]
pub struct Scene {
    pub points: PointCloud,
    pub scales: AxisScales,
    pub axes: [LineSegment; 3],
    pub grid: Grid,
}

impl Scene {
    /// Compute the axis scales from `dataset` and build the scene
    pub fn from_dataset(dataset: Arc<Dataset>) -> Self {
        let scales = AxisScales::from_dataset(&dataset);
        build_scene(dataset, &scales)
    }

    /// Axes followed by grid lines
    pub fn line_segments(&self) -> Vec<LineSegment> {
        let mut segments = self.axes.to_vec();
        segments.extend(self.grid.segments());
        segments
    }
}

/// Place one point per record and attach the reference geometry
pub fn build_scene(dataset: Arc<Dataset>, scales: &AxisScales) -> Scene {
    log::debug!(
        "Building scene with {} points ({} approved)",
        dataset.len(),
        dataset.approved_count()
    );

    let points = PointCloud::from_dataset(dataset, |r| {
        let position = Point3f::new(
            scales.x.map(r.annual_income) as f32,
            scales.y.map(r.credit_score) as f32,
            scales.z.map(r.debt_to_income_ratio) as f32,
        );
        (position, status_color(r.loan_status))
    });

    Scene {
        points,
        scales: *scales,
        axes: axis_segments(),
        grid: Grid::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use approx::assert_relative_eq;

    fn record(id: &str, income: f64, score: f64, dti: f64, status: LoanStatus) -> Record {
        Record::new(id, income, score, dti, status)
    }

    #[test]
    fn test_one_point_per_record() {
        let dataset: Dataset = (0..25)
            .map(|i| {
                let i = i as f64;
                record(&format!("C{i}"), i * 1000.0, 600.0 + i, 0.01 * i, LoanStatus::Rejected)
            })
            .collect();
        let scene = Scene::from_dataset(Arc::new(dataset));
        assert_eq!(scene.points.len(), 25);
        assert_eq!(scene.points.colors().len(), 25);
    }

    #[test]
    fn test_colors_follow_status() {
        let dataset = Dataset::from_records(vec![
            record("A", 1.0, 1.0, 1.0, LoanStatus::Approved),
            record("B", 2.0, 2.0, 2.0, LoanStatus::Rejected),
            record("C", 3.0, 3.0, 3.0, LoanStatus::from_code(7.0)),
        ]);
        let scene = Scene::from_dataset(Arc::new(dataset));
        assert_eq!(
            scene.points.colors(),
            &[APPROVED_COLOR, REJECTED_COLOR, REJECTED_COLOR]
        );
    }

    #[test]
    fn test_positions_use_scales() {
        let dataset = Dataset::from_records(vec![
            record("lo", 10_000.0, 500.0, 0.0, LoanStatus::Approved),
            record("hi", 110_000.0, 800.0, 1.0, LoanStatus::Approved),
        ]);
        let scene = Scene::from_dataset(Arc::new(dataset));
        let lo = scene.points.positions()[0];
        let hi = scene.points.positions()[1];
        assert_relative_eq!(lo.x, -150.0);
        assert_relative_eq!(lo.y, -100.0);
        assert_relative_eq!(lo.z, -100.0);
        assert_relative_eq!(hi.x, 150.0);
        assert_relative_eq!(hi.y, 100.0);
        assert_relative_eq!(hi.z, 100.0);
    }

    #[test]
    fn test_nan_fields_do_not_panic() {
        let dataset = Dataset::from_records(vec![
            record("ok", 1.0, 1.0, 1.0, LoanStatus::Approved),
            record("bad", f64::NAN, 2.0, 2.0, LoanStatus::Rejected),
        ]);
        let scene = Scene::from_dataset(Arc::new(dataset));
        assert!(scene.points.positions()[1].x.is_nan());
        assert_eq!(scene.points.len(), 2);
    }

    #[test]
    fn test_grid_segments() {
        let grid = Grid::default();
        let segments = grid.segments();
        assert_eq!(segments.len(), 42);

        let center: Vec<_> = segments
            .iter()
            .filter(|s| s.color == GRID_CENTER_COLOR)
            .collect();
        assert_eq!(center.len(), 2);
        for s in center {
            assert_relative_eq!(s.start.x * s.start.z, 0.0);
            assert_relative_eq!(s.end.x * s.end.z, 0.0);
        }
        assert!(segments.iter().all(|s| s.start.y == 0.0 && s.end.y == 0.0));
    }

    #[test]
    fn test_line_segments_start_with_axes() {
        let scene = Scene::from_dataset(Arc::new(Dataset::new()));
        let lines = scene.line_segments();
        assert_eq!(lines.len(), 3 + 42);
        assert_eq!(lines[0].color, X_AXIS_COLOR);
        assert_eq!(lines[1].color, Y_AXIS_COLOR);
        assert_eq!(lines[2].color, Z_AXIS_COLOR);
        assert!(scene.points.is_empty());
    }
}
