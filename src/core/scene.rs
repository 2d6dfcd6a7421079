// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::shape::Shape;
use crate::math::constants::Vector3f;
use crate::math::transform::Transform;
use crate::math::units::Units;
use std::fmt;
use std::sync::Arc;

/// Which children of a `Switch` node are traversed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WhichChild {
    None,
    All,
    Index(usize),
}

impl WhichChild {
    /// Inventor's `whichChild` encoding: -1 none, -3 all, n >= 0 one child.
    pub fn from_inventor(value: i64) -> WhichChild {
        match value {
            -3 => WhichChild::All,
            v if v >= 0 => WhichChild::Index(v as usize),
            _ => WhichChild::None,
        }
    }
}

pub enum SceneNode {
    /// Traverses its children and restores the full traversal state afterwards.
    Separator(Vec<SceneNode>),
    /// Traverses its children; state changes remain visible to later siblings.
    Group(Vec<SceneNode>),
    /// Like `Group`, but restores the model matrix afterwards.
    TransformSeparator(Vec<SceneNode>),
    Switch {
        which_child: WhichChild,
        children: Vec<SceneNode>,
    },
    Transform(Transform),
    Units(Units),
    Coordinate3(Arc<[Vector3f]>),
    Shape(Arc<dyn Shape>),
}

impl SceneNode {
    pub fn separator(children: Vec<SceneNode>) -> SceneNode {
        SceneNode::Separator(children)
    }

    pub fn group(children: Vec<SceneNode>) -> SceneNode {
        SceneNode::Group(children)
    }

    pub fn transform(transform: Transform) -> SceneNode {
        SceneNode::Transform(transform)
    }

    pub fn units(units: Units) -> SceneNode {
        SceneNode::Units(units)
    }

    pub fn coordinates(points: Vec<Vector3f>) -> SceneNode {
        SceneNode::Coordinate3(points.into())
    }

    pub fn shape<S: Shape + 'static>(shape: S) -> SceneNode {
        SceneNode::Shape(Arc::new(shape))
    }

    pub fn children(&self) -> &[SceneNode] {
        match self {
            SceneNode::Separator(children)
            | SceneNode::Group(children)
            | SceneNode::TransformSeparator(children)
            | SceneNode::Switch { children, .. } => children,
            _ => &[],
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Number of shape nodes in this subtree, whether reachable or not.
    pub fn shape_count(&self) -> usize {
        let own = matches!(self, SceneNode::Shape(_)) as usize;
        own + self.children().iter().map(|c| c.shape_count()).sum::<usize>()
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneNode::Separator(children) => f.debug_tuple("Separator").field(children).finish(),
            SceneNode::Group(children) => f.debug_tuple("Group").field(children).finish(),
            SceneNode::TransformSeparator(children) => {
                f.debug_tuple("TransformSeparator").field(children).finish()
            }
            SceneNode::Switch { which_child, children } => f
                .debug_struct("Switch")
                .field("which_child", which_child)
                .field("children", children)
                .finish(),
            SceneNode::Transform(t) => f.debug_tuple("Transform").field(t).finish(),
            SceneNode::Units(u) => f.debug_tuple("Units").field(u).finish(),
            SceneNode::Coordinate3(points) => write!(f, "Coordinate3({} points)", points.len()),
            SceneNode::Shape(shape) => {
                write!(f, "Shape({}, {})", shape.id(), ComputationNode::to_string(shape.as_ref()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::cube::Cube;

    #[test]
    fn test_which_child_encoding() {
        assert_eq!(WhichChild::from_inventor(-1), WhichChild::None);
        assert_eq!(WhichChild::from_inventor(-3), WhichChild::All);
        assert_eq!(WhichChild::from_inventor(2), WhichChild::Index(2));
        assert_eq!(WhichChild::from_inventor(-2), WhichChild::None);
    }

    #[test]
    fn test_counts() {
        let root = SceneNode::separator(vec![
            SceneNode::units(Units::Millimeters),
            SceneNode::group(vec![
                SceneNode::shape(Cube::default()),
                SceneNode::transform(Transform::identity()),
            ]),
            SceneNode::shape(Cube::default()),
        ]);
        assert_eq!(root.node_count(), 6);
        assert_eq!(root.shape_count(), 2);
        let dump = format!("{:?}", root);
        assert!(dump.contains("Shape(Cube_"));
        assert!(dump.contains("Cube: 2 x 2 x 2"));
    }
}
