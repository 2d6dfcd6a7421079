// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, generate_node_id};
use crate::core::shape::Shape;
use crate::core::traversal::TraversalState;
use crate::math::constants::{Float, Vector3f};

// Corner signs per face, two counter-clockwise triangles seen from outside.
const FACES: [[[Float; 3]; 6]; 6] = [
    // +Z
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0],
     [-1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    // -Z
    [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0],
     [1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    // +X
    [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0],
     [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    // -X
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0],
     [-1.0, -1.0, -1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    // +Y
    [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0],
     [-1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    // -Y
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0],
     [-1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
];

/// Axis-aligned box centred at the origin. Defaults to a 2x2x2 cube.
pub struct Cube {
    id: String,
    half_extent: Vector3f,
}

impl Default for Cube {
    fn default() -> Self {
        Cube::new(2.0, 2.0, 2.0, None)
    }
}

impl Cube {
    pub fn new(width: Float, height: Float, depth: Float, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_node_id("Cube")),
            half_extent: Vector3f::new(0.5 * width, 0.5 * height, 0.5 * depth),
        }
    }

    fn corner(&self, signs: &[Float; 3]) -> Vector3f {
        Vector3f::new(signs[0], signs[1], signs[2]).component_mul(&self.half_extent)
    }
}

impl ComputationNode for Cube {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("Cube: {} x {} x {}",
                2.0 * self.half_extent.x, 2.0 * self.half_extent.y, 2.0 * self.half_extent.z)
    }
}

impl Shape for Cube {
    fn generate_triangles(&self, _state: &TraversalState, emit: &mut dyn FnMut([Vector3f; 3])) {
        for face in FACES.iter() {
            for tri in face.chunks(3) {
                emit([self.corner(&tri[0]), self.corner(&tri[1]), self.corner(&tri[2])]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(cube: &Cube) -> Vec<[Vector3f; 3]> {
        let mut out = Vec::new();
        cube.generate_triangles(&TraversalState::default(), &mut |t| out.push(t));
        out
    }

    #[test]
    fn test_cube_emits_twelve_outward_triangles() {
        let cube = Cube::default();
        let tris = triangles(&cube);
        assert_eq!(tris.len(), 12);

        for [p0, p1, p2] in &tris {
            let normal = (p1 - p0).cross(&(p2 - p0));
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "inward face at {:?}", centroid);
        }
    }

    #[test]
    fn test_cube_dimensions() {
        let cube = Cube::new(4.0, 2.0, 1.0, Some(String::from("box")));
        assert_eq!(cube.id(), "box");
        for tri in triangles(&cube) {
            for p in tri.iter() {
                assert_eq!(p.x.abs(), 2.0);
                assert_eq!(p.y.abs(), 1.0);
                assert_eq!(p.z.abs(), 0.5);
            }
        }
    }
}
