// Copyright @yucwang 2026

use crate::core::scene::{SceneNode, WhichChild};
use crate::math::constants::Vector3f;
use crate::math::transform::Transform;
use crate::math::units::Units;
use std::sync::Arc;

/// Inherited state at one point of a depth-first traversal.
#[derive(Debug, Clone)]
pub struct TraversalState {
    pub model: Transform,
    pub units: Units,
    pub coordinates: Arc<[Vector3f]>,
}

impl Default for TraversalState {
    fn default() -> Self {
        Self {
            model: Transform::identity(),
            units: Units::default(),
            coordinates: Arc::from(Vec::new()),
        }
    }
}

/// Receives every triangle the traversal discovers, in discovery order.
/// `vertices` are in object space; `model` is the full composition of all
/// ancestor transforms and `units` the unit active at the primitive.
pub trait TriangleCallback {
    fn on_triangle(&mut self, vertices: &[Vector3f; 3], model: &Transform, units: Units);
}

impl<F> TriangleCallback for F
where
    F: FnMut(&[Vector3f; 3], &Transform, Units),
{
    fn on_triangle(&mut self, vertices: &[Vector3f; 3], model: &Transform, units: Units) {
        self(vertices, model, units)
    }
}

/// Depth-first scene graph walker that reports triangle primitives.
pub struct CallbackAction<'a> {
    callback: &'a mut dyn TriangleCallback,
    triangles: usize,
}

impl<'a> CallbackAction<'a> {
    pub fn new(callback: &'a mut dyn TriangleCallback) -> Self {
        Self { callback, triangles: 0 }
    }

    /// Traverses `root` from the default state and returns the number of
    /// triangles handed to the callback.
    pub fn apply(mut self, root: &SceneNode) -> usize {
        let mut state = TraversalState::default();
        self.traverse(root, &mut state);
        self.triangles
    }

    fn traverse(&mut self, node: &SceneNode, state: &mut TraversalState) {
        match node {
            SceneNode::Separator(children) => {
                let saved = state.clone();
                self.traverse_children(children, state);
                *state = saved;
            }
            SceneNode::Group(children) => {
                self.traverse_children(children, state);
            }
            SceneNode::TransformSeparator(children) => {
                let saved = state.model;
                self.traverse_children(children, state);
                state.model = saved;
            }
            SceneNode::Switch { which_child, children } => match which_child {
                WhichChild::None => {}
                WhichChild::All => self.traverse_children(children, state),
                WhichChild::Index(idx) => {
                    if let Some(child) = children.get(*idx) {
                        self.traverse(child, state);
                    }
                }
            },
            SceneNode::Transform(local) => {
                if !local.is_identity() {
                    state.model = state.model.then_local(local);
                }
            }
            SceneNode::Units(units) => {
                state.units = *units;
            }
            SceneNode::Coordinate3(points) => {
                state.coordinates = points.clone();
            }
            SceneNode::Shape(shape) => {
                let model = state.model;
                let units = state.units;
                let callback = &mut *self.callback;
                let triangles = &mut self.triangles;
                shape.generate_triangles(state, &mut |vertices| {
                    *triangles += 1;
                    callback.on_triangle(&vertices, &model, units);
                });
            }
        }
    }

    fn traverse_children(&mut self, children: &[SceneNode], state: &mut TraversalState) {
        for child in children {
            self.traverse(child, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::indexed_face_set::IndexedFaceSet;

    fn unit_triangle() -> Vec<SceneNode> {
        vec![
            SceneNode::coordinates(vec![
                Vector3f::new(0.0, 0.0, 0.0),
                Vector3f::new(1.0, 0.0, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
            ]),
            SceneNode::shape(IndexedFaceSet::new(vec![0, 1, 2, -1])),
        ]
    }

    fn collect(root: &SceneNode) -> Vec<(Transform, Units)> {
        let mut seen = Vec::new();
        let mut callback = |_: &[Vector3f; 3], model: &Transform, units: Units| {
            seen.push((*model, units));
        };
        let count = CallbackAction::new(&mut callback).apply(root);
        assert_eq!(count, seen.len());
        seen
    }

    #[test]
    fn test_nested_transforms_compose() {
        let mut inner = vec![SceneNode::transform(Transform::from_scale(Vector3f::new(2.0, 2.0, 2.0)))];
        inner.extend(unit_triangle());
        let root = SceneNode::separator(vec![
            SceneNode::transform(Transform::from_translation(Vector3f::new(1.0, 0.0, 0.0))),
            SceneNode::separator(inner),
        ]);

        let seen = collect(&root);
        assert_eq!(seen.len(), 1);
        let p = seen[0].0.apply_point(Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vector3f::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_separator_restores_state() {
        let mut first = vec![
            SceneNode::units(Units::Millimeters),
            SceneNode::transform(Transform::from_translation(Vector3f::new(5.0, 0.0, 0.0))),
        ];
        first.extend(unit_triangle());
        let mut root_children = vec![SceneNode::separator(first)];
        root_children.extend(unit_triangle());
        let root = SceneNode::separator(root_children);

        let seen = collect(&root);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, Units::Millimeters);
        assert!(!seen[0].0.is_identity());
        assert_eq!(seen[1].1, Units::Meters);
        assert!(seen[1].0.is_identity());
    }

    #[test]
    fn test_group_leaks_state_to_siblings() {
        let root = SceneNode::separator(vec![
            SceneNode::group(vec![SceneNode::units(Units::Feet)]),
            SceneNode::group(unit_triangle()),
        ]);
        let seen = collect(&root);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, Units::Feet);
    }

    #[test]
    fn test_transform_separator_keeps_units() {
        let root = SceneNode::separator(vec![
            SceneNode::TransformSeparator(vec![
                SceneNode::units(Units::Inches),
                SceneNode::transform(Transform::from_translation(Vector3f::new(0.0, 9.0, 0.0))),
            ]),
            SceneNode::group(unit_triangle()),
        ]);
        let seen = collect(&root);
        assert_eq!(seen[0].1, Units::Inches);
        assert!(seen[0].0.is_identity());
    }

    #[test]
    fn test_switch_selects_children() {
        let make = |which_child| SceneNode::Switch {
            which_child,
            children: vec![SceneNode::separator(unit_triangle()), SceneNode::separator(unit_triangle())],
        };

        assert_eq!(collect(&make(WhichChild::None)).len(), 0);
        assert_eq!(collect(&make(WhichChild::All)).len(), 2);
        assert_eq!(collect(&make(WhichChild::Index(1))).len(), 1);
        assert_eq!(collect(&make(WhichChild::Index(7))).len(), 0);
    }

    #[test]
    fn test_empty_graph_visits_nothing() {
        let root = SceneNode::separator(vec![SceneNode::units(Units::Miles)]);
        assert!(collect(&root).is_empty());
    }
}
