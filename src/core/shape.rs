// Copyright @yucwang 2023

use crate::core::traversal::TraversalState;
use crate::math::constants::Vector3f;

/// A renderable scene graph node that decomposes into triangles.
pub trait Shape: crate::core::computation_node::ComputationNode + Send + Sync {
    /// Emits every triangle of the shape in object space, in a fixed order.
    /// The traversal state supplies shared inputs such as the active
    /// coordinate list; the model matrix is applied by the caller.
    fn generate_triangles(&self, state: &TraversalState, emit: &mut dyn FnMut([Vector3f; 3]));
}
