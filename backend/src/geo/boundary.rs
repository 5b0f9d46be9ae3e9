//! Tracker bounding boxes and point containment lookup.

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// Axis-aligned lat/lon rectangle covering one tracker.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct TrackerBoundary {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl TrackerBoundary {
    /// Build a boundary from two opposite `(lat, lon)` corners.
    ///
    /// The corners are normalized with min/max, so swapped labels still yield
    /// a valid rectangle.
    pub fn from_corners(top_right: (f64, f64), bottom_left: (f64, f64)) -> Self {
        let (tr_lat, tr_lon) = top_right;
        let (bl_lat, bl_lon) = bottom_left;
        Self {
            min_lon: bl_lon.min(tr_lon),
            max_lon: bl_lon.max(tr_lon),
            min_lat: bl_lat.min(tr_lat),
            max_lat: bl_lat.max(tr_lat),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.min_lon <= lon && lon <= self.max_lon && self.min_lat <= lat && lat <= self.max_lat
    }
}

/// Ordered set of tracker boundaries queried by linear scan.
///
/// Iteration order is insertion order. When rectangles overlap, the lookup
/// returns the first match in that order; tracker layouts are expected to be
/// disjoint so this is not a designed priority rule.
///
/// Serializes as a JSON object keyed by tracker id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryIndex {
    entries: Vec<(String, TrackerBoundary)>,
    /// Position of each id in `entries`.
    positions: HashMap<String, usize>,
}

impl BoundaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a boundary.
    ///
    /// Replacing keeps the original position of the id.
    pub fn insert(&mut self, id: impl Into<String>, boundary: TrackerBoundary) {
        let id = id.into();
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos].1 = boundary,
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push((id, boundary));
            }
        }
    }

    /// Id of the first boundary containing `(lon, lat)`.
    pub fn find_containing(&self, lon: f64, lat: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, boundary)| boundary.contains(lon, lat))
            .map(|(id, _)| id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&TrackerBoundary> {
        self.positions.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrackerBoundary)> {
        self.entries.iter().map(|(id, b)| (id.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, TrackerBoundary)> for BoundaryIndex {
    fn from_iter<I: IntoIterator<Item = (S, TrackerBoundary)>>(iter: I) -> Self {
        let mut index = BoundaryIndex::new();
        for (id, boundary) in iter {
            index.insert(id, boundary);
        }
        index
    }
}

impl Serialize for BoundaryIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, b)| (id, b)))
    }
}
