// Copyright @yucwang 2026

use crate::core::scene::SceneNode;
use crate::core::traversal::{CallbackAction, TriangleCallback};
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::transform::Transform;
use crate::math::units::Units;

/// World-space triangle soup produced by flattening a scene graph.
///
/// Every triangle owns three fresh positions; coincident vertices are never
/// merged. `indices` holds one triple per triangle in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedMesh {
    positions: Vec<Vector3f>,
    indices: Vec<u32>,
    bounds: Option<AABB>,
    overflowed: bool,
}

impl FlattenedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vector3f] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// `None` until the first vertex has been pushed.
    pub fn bounds(&self) -> Option<&AABB> {
        self.bounds.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// True once a triangle was dropped because its indices would not fit in u32.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Transforms `vertices` by `model`, converts them to meters and appends
    /// them as one triangle, keeping the received winding.
    pub fn push_triangle(&mut self, vertices: &[Vector3f; 3], model: &Transform, units: Units) {
        let base = match first_index(self.positions.len()) {
            Some(base) => base,
            None => {
                if !self.overflowed {
                    log::error!("Vertex count exceeds the u32 index range, dropping further triangles.");
                }
                self.overflowed = true;
                return;
            }
        };

        let scale = units.meters_per_unit();
        for (k, v) in vertices.iter().enumerate() {
            let p = to_meters(model.apply_point(*v), scale);
            self.positions.push(p);
            AABB::include(&mut self.bounds, &p);
            self.indices.push(base + k as u32);
        }
    }
}

impl TriangleCallback for FlattenedMesh {
    fn on_triangle(&mut self, vertices: &[Vector3f; 3], model: &Transform, units: Units) {
        self.push_triangle(vertices, model, units);
    }
}

// Index of the first of three new vertices, if all three stay addressable.
fn first_index(vertex_count: usize) -> Option<u32> {
    u32::try_from(vertex_count + 2).ok().map(|last| last - 2)
}

fn to_meters(p: Vector3f, scale: f64) -> Vector3f {
    Vector3f::new((p.x as f64 * scale) as Float,
                  (p.y as f64 * scale) as Float,
                  (p.z as f64 * scale) as Float)
}

/// Walks `root` and collects every triangle into a fresh mesh.
pub fn flatten_scene(root: &SceneNode) -> FlattenedMesh {
    let mut mesh = FlattenedMesh::new();
    let visited = CallbackAction::new(&mut mesh).apply(root);

    match mesh.bounds() {
        Some(bbox) => log::info!(
            "Flattened {} triangles ({} vertices), bounds [{:?}] - [{:?}].",
            visited, mesh.vertex_count(), bbox.min_array(), bbox.max_array()),
        None => log::info!("Flattened scene produced no triangles."),
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::cube::Cube;
    use crate::shapes::triangle_mesh::TriangleMesh;

    fn tri(a: [Float; 3], b: [Float; 3], c: [Float; 3]) -> [Vector3f; 3] {
        [Vector3f::new(a[0], a[1], a[2]), Vector3f::new(b[0], b[1], b[2]), Vector3f::new(c[0], c[1], c[2])]
    }

    fn mesh_node(triangles: Vec<[Vector3f; 3]>) -> SceneNode {
        SceneNode::shape(TriangleMesh::new(triangles, None))
    }

    #[test]
    fn test_unit_scale_millimeters() {
        let mut mesh = FlattenedMesh::new();
        mesh.push_triangle(&tri([1000.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1000.0, 0.0]),
                           &Transform::identity(), Units::Millimeters);
        assert_eq!(mesh.positions()[0], Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.positions()[2], Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_translation_composition() {
        let root = SceneNode::separator(vec![
            SceneNode::units(Units::Meters),
            SceneNode::transform(Transform::from_translation(Vector3f::new(2.0, 3.0, 4.0))),
            mesh_node(vec![tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])]),
        ]);
        let mesh = flatten_scene(&root);
        assert_eq!(mesh.positions()[0], Vector3f::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_scale_applies_after_transform() {
        let mut mesh = FlattenedMesh::new();
        let model = Transform::from_translation(Vector3f::new(10.0, 0.0, 0.0));
        mesh.push_triangle(&tri([0.0; 3], [0.0; 3], [0.0; 3]), &model, Units::Centimeters);
        assert_eq!(mesh.positions()[0], Vector3f::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_bounding_box() {
        let mut mesh = FlattenedMesh::new();
        assert!(mesh.bounds().is_none());
        mesh.push_triangle(&tri([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
                           &Transform::identity(), Units::Meters);
        let bbox = mesh.bounds().unwrap();
        assert_eq!(bbox.min_array(), [-1.0, 0.0, 0.0]);
        assert_eq!(bbox.max_array(), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_winding_preserved() {
        let input = tri([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let mesh = flatten_scene(&SceneNode::separator(vec![mesh_node(vec![input])]));
        let idx = mesh.indices();
        assert_eq!(idx, &[0, 1, 2]);
        for k in 0..3 {
            assert_eq!(mesh.positions()[idx[k] as usize], input[k]);
        }
    }

    #[test]
    fn test_no_vertex_dedup() {
        let shared = [0.0, 0.0, 0.0];
        let mesh = flatten_scene(&mesh_node(vec![
            tri(shared, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri(shared, [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]),
        ]));
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.positions()[0], mesh.positions()[3]);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_triangle_count_matches_callbacks() {
        let root = SceneNode::separator(vec![
            SceneNode::shape(Cube::default()),
            SceneNode::separator(vec![
                SceneNode::transform(Transform::from_scale(Vector3f::new(3.0, 3.0, 3.0))),
                SceneNode::shape(Cube::default()),
            ]),
        ]);

        let mut callbacks = 0;
        let mut counter = |_: &[Vector3f; 3], _: &Transform, _: Units| callbacks += 1;
        CallbackAction::new(&mut counter).apply(&root);

        let mesh = flatten_scene(&root);
        assert_eq!(callbacks, 24);
        assert_eq!(mesh.triangle_count(), callbacks);
        assert_eq!(mesh.indices().len() % 3, 0);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.bounds().unwrap().max_array(), [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_index_range_limit() {
        assert_eq!(first_index(0), Some(0));
        assert_eq!(first_index(u32::MAX as usize - 2), Some(u32::MAX - 2));
        assert_eq!(first_index(u32::MAX as usize - 1), None);
    }

    #[test]
    fn test_overflowed_mesh_is_not_encoded() {
        let mut mesh = FlattenedMesh::new();
        mesh.push_triangle(&tri([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
                           &Transform::identity(), Units::Meters);
        mesh.overflowed = true;
        let result = crate::io::glb_utils::encode_glb(&mesh, &Default::default());
        assert!(matches!(result, Err(crate::io::glb_utils::ExportError::Encode(_))));
    }

    #[test]
    fn test_empty_scene_leaves_bounds_unset() {
        let mesh = flatten_scene(&SceneNode::separator(vec![SceneNode::units(Units::Feet)]));
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }
}
