use crate::core::geo::Point;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A point item that can be indexed via an R-tree
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub point: Point,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, point: Point, data: T) -> Self {
        Self { id, point, data }
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x - point[0];
        let dy = self.point.y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over projected marker positions, used for click hit testing
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self { rtree: RTree::new() }
    }

    /// Builds the tree in one pass; faster than repeated inserts
    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    /// Items within `radius` of `center`
    pub fn query_radius(&self, center: &Point, radius: f64) -> Vec<&SpatialItem<T>> {
        // rstar takes the squared distance
        self.rtree
            .locate_within_distance([center.x, center.y], radius * radius)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
