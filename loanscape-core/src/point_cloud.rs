//! Point cloud built from a dataset

use crate::color::Color;
use crate::record::{Dataset, Record};
use crate::Point3f;
use std::sync::Arc;

/// Rendered points, one per record.
///
/// `positions` and `colors` are parallel arrays indexed in dataset order;
/// the shared dataset resolves an index back to its record.
#[derive(Debug, Clone)]
pub struct PointCloud {
    positions: Vec<Point3f>,
    colors: Vec<Color>,
    dataset: Arc<Dataset>,
}

/// A single point of the cloud together with its source record
#[derive(Debug, Clone, Copy)]
pub struct PointRef<'a> {
    pub index: usize,
    pub position: Point3f,
    pub color: Color,
    pub record: &'a Record,
}

impl PointCloud {
    /// Place one point per record, in dataset order
    pub fn from_dataset<F>(dataset: Arc<Dataset>, mut place: F) -> Self
    where
        F: FnMut(&Record) -> (Point3f, Color),
    {
        let (positions, colors) = dataset.iter().map(&mut place).unzip();
        Self {
            positions,
            colors,
            dataset,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3f] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Record that produced the point at `index`
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.dataset.get(index)
    }

    pub fn get(&self, index: usize) -> Option<PointRef<'_>> {
        Some(PointRef {
            index,
            position: *self.positions.get(index)?,
            color: *self.colors.get(index)?,
            record: self.dataset.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = PointRef<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}
