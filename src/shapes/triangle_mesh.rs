// Copyright @yucwang 2023

use crate::core::computation_node::{ComputationNode, generate_node_id};
use crate::core::shape::Shape;
use crate::core::traversal::TraversalState;
use crate::io::obj_utils;
use crate::io::obj_utils::ObjLoadError;
use crate::math::constants::Vector3f;

use std::path::Path;
use std::vec::Vec;

/// Fixed object-space triangle soup, typically read from an OBJ file.
pub struct TriangleMesh {
    id: String,
    triangles: Vec<[Vector3f; 3]>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<[Vector3f; 3]>, id: Option<String>) -> Self {
        Self { id: id.unwrap_or_else(|| generate_node_id("TriangleMesh")), triangles }
    }

    pub fn from_obj<P: AsRef<Path>>(path: P, id: Option<String>) -> Result<Self, ObjLoadError> {
        let path = path.as_ref();
        let triangles = obj_utils::read_obj_triangles(path)?;
        log::debug!("Loaded {} triangles from {}.", triangles.len(), path.display());
        Ok(Self::new(triangles, id))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl ComputationNode for TriangleMesh {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("TriangleMesh: {} triangles", self.triangles.len())
    }
}

impl Shape for TriangleMesh {
    fn generate_triangles(&self, _state: &TraversalState, emit: &mut dyn FnMut([Vector3f; 3])) {
        for tri in &self.triangles {
            emit(*tri);
        }
    }
}
