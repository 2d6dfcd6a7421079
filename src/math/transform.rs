// Copyright 2020 @TwoCookingMice

use nalgebra::{ Rotation3, Unit };

use super::constants::{ EPSILON, Float, Matrix4f, Vector3f };

/// Affine transform in column-vector convention: `p' = M * p`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity() }
    }
}

impl Transform {
    pub fn new(matrix: Matrix4f) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_translation(t: Vector3f) -> Self {
        Self::new(Matrix4f::new_translation(&t))
    }

    pub fn from_scale(s: Vector3f) -> Self {
        Self::new(Matrix4f::new_nonuniform_scaling(&s))
    }

    /// Rotation of `angle` radians around `axis`. A zero axis yields identity.
    pub fn from_axis_angle(axis: Vector3f, angle: Float) -> Self {
        if axis.norm() < EPSILON {
            return Self::identity();
        }
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle);
        Self::new(rotation.to_homogeneous())
    }

    /// Open Inventor style transform:
    /// `T * C * R * SO * S * SO^-1 * C^-1`.
    pub fn from_components(translation: Vector3f,
                           rotation: (Vector3f, Float),
                           scale_factor: Vector3f,
                           scale_orientation: (Vector3f, Float),
                           center: Vector3f) -> Self {
        let t = Self::from_translation(translation);
        let c = Self::from_translation(center);
        let c_inv = Self::from_translation(-center);
        let r = Self::from_axis_angle(rotation.0, rotation.1);
        let so = Self::from_axis_angle(scale_orientation.0, scale_orientation.1);
        let so_inv = Self::from_axis_angle(scale_orientation.0, -scale_orientation.1);
        let s = Self::from_scale(scale_factor);

        t.then_local(&c)
            .then_local(&r)
            .then_local(&so)
            .then_local(&s)
            .then_local(&so_inv)
            .then_local(&c_inv)
    }

    /// Inventor's column-major 16-value layout, translation in `m[12..15]`.
    pub fn from_column_slice(values: &[Float]) -> Option<Self> {
        if values.len() != 16 {
            return None;
        }
        Some(Self::new(Matrix4f::from_column_slice(values)))
    }

    /// Composes `local` underneath this transform: points go through `local`
    /// first, then through `self`.
    pub fn then_local(&self, local: &Transform) -> Transform {
        Transform::new(self.matrix * local.matrix)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4f::identity()
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        let x = p[0] * self.matrix[(0, 0)] + p[1] * self.matrix[(0, 1)] +
            p[2] * self.matrix[(0, 2)] + self.matrix[(0, 3)];
        let y = p[0] * self.matrix[(1, 0)] + p[1] * self.matrix[(1, 1)] +
            p[2] * self.matrix[(1, 2)] + self.matrix[(1, 3)];
        let z = p[0] * self.matrix[(2, 0)] + p[1] * self.matrix[(2, 1)] +
            p[2] * self.matrix[(2, 2)] + self.matrix[(2, 3)];
        let w = p[0] * self.matrix[(3, 0)] + p[1] * self.matrix[(3, 1)] +
            p[2] * self.matrix[(3, 2)] + self.matrix[(3, 3)];

        if w == 1.0 || w == 0.0 {
            Vector3f::new(x, y, z)
        } else {
            Vector3f::new(x / w, y / w, z / w)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3f, b: Vector3f) {
        assert!((a - b).norm() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_translation_is_exact() {
        let t = Transform::from_translation(Vector3f::new(2.0, 3.0, 4.0));
        assert_eq!(t.apply_point(Vector3f::zeros()), Vector3f::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_then_local_applies_local_first() {
        let parent = Transform::from_translation(Vector3f::new(10.0, 0.0, 0.0));
        let child = Transform::from_scale(Vector3f::new(2.0, 2.0, 2.0));
        let composed = parent.then_local(&child);

        assert_eq!(composed.apply_point(Vector3f::new(1.0, 1.0, 1.0)), Vector3f::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_axis_angle_rotation() {
        let r = Transform::from_axis_angle(Vector3f::new(0.0, 0.0, 1.0), PI_HALF);
        assert_close(r.apply_point(Vector3f::new(1.0, 0.0, 0.0)), Vector3f::new(0.0, 1.0, 0.0));

        let degenerate = Transform::from_axis_angle(Vector3f::zeros(), 1.0);
        assert!(degenerate.is_identity());
    }

    #[test]
    fn test_components_rotate_about_center() {
        let t = Transform::from_components(
            Vector3f::zeros(),
            (Vector3f::new(0.0, 0.0, 1.0), PI_HALF),
            Vector3f::new(1.0, 1.0, 1.0),
            (Vector3f::new(0.0, 0.0, 1.0), 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
        );
        // The center itself is a fixed point of the rotation.
        assert_close(t.apply_point(Vector3f::new(1.0, 0.0, 0.0)), Vector3f::new(1.0, 0.0, 0.0));
        assert_close(t.apply_point(Vector3f::new(2.0, 0.0, 0.0)), Vector3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_from_column_slice() {
        let values = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            5.0, 6.0, 7.0, 1.0,
        ];
        let t = Transform::from_column_slice(&values).unwrap();
        assert_eq!(t.apply_point(Vector3f::zeros()), Vector3f::new(5.0, 6.0, 7.0));
        assert!(Transform::from_column_slice(&values[..12]).is_none());
    }

    const PI_HALF: Float = std::f32::consts::FRAC_PI_2;
}
