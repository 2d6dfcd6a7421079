// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, generate_node_id};
use crate::core::shape::Shape;
use crate::core::traversal::TraversalState;
use crate::math::constants::Vector3f;

/// Polygons over the active `Coordinate3` list. `coord_index` holds one run
/// of coordinate indices per polygon, each run terminated by -1 (the last
/// terminator may be omitted).
pub struct IndexedFaceSet {
    id: String,
    coord_index: Vec<i32>,
}

impl IndexedFaceSet {
    pub fn new(coord_index: Vec<i32>) -> Self {
        Self::with_id(coord_index, None)
    }

    pub fn with_id(coord_index: Vec<i32>, id: Option<String>) -> Self {
        Self { id: id.unwrap_or_else(|| generate_node_id("IndexedFaceSet")), coord_index }
    }

    fn polygons(&self) -> impl Iterator<Item = &[i32]> {
        self.coord_index.split(|&idx| idx < 0).filter(|face| !face.is_empty())
    }
}

impl ComputationNode for IndexedFaceSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("IndexedFaceSet: {} polygons", self.polygons().count())
    }
}

impl Shape for IndexedFaceSet {
    fn generate_triangles(&self, state: &TraversalState, emit: &mut dyn FnMut([Vector3f; 3])) {
        let coords = &state.coordinates;
        for (face_idx, face) in self.polygons().enumerate() {
            if face.len() < 3 {
                log::warn!("{}: skipping face {} with {} vertices.", self.id, face_idx, face.len());
                continue;
            }

            let points: Option<Vec<Vector3f>> =
                face.iter().map(|&idx| coords.get(idx as usize).cloned()).collect();
            let points = match points {
                Some(points) => points,
                None => {
                    log::warn!("{}: face {} references a coordinate outside the {} available.",
                               self.id, face_idx, coords.len());
                    continue;
                }
            };

            // Fan around the first vertex, keeping the polygon's winding.
            for i in 1..(points.len() - 1) {
                emit([points[0], points[i], points[i + 1]]);
            }
        }
    }
}
