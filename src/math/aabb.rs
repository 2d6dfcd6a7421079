// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };

/// Axis-aligned box. Always holds real bounds; "nothing seen yet" is modelled
/// by the owner as `Option<AABB>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl AABB {
    pub fn from_point(p: &Vector3f) -> Self {
        Self { p_min: *p, p_max: *p }
    }

    /// Grows `bounds` to contain `p`, starting a box if there is none yet.
    pub fn include(bounds: &mut Option<AABB>, p: &Vector3f) {
        match bounds {
            Some(bbox) => bbox.expand_by_point(p),
            None => *bounds = Some(AABB::from_point(p)),
        }
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn min_array(&self) -> [Float; 3] {
        [self.p_min[0], self.p_min[1], self.p_min[2]]
    }

    pub fn max_array(&self) -> [Float; 3] {
        [self.p_max[0], self.p_max[1], self.p_max[2]]
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Vector3f;

    #[test]
    fn test_aabb_geometry() {
        let mut bbox: AABB = AABB::from_point(&Vector3f::new(1.0, 7.0, 3.0));
        bbox.expand_by_point(&Vector3f::new(4.0, 4.0, 4.0));

        assert_eq!(bbox.p_min, Vector3f::new(1.0, 4.0, 3.0));
        assert_eq!(bbox.p_max, Vector3f::new(4.0, 7.0, 4.0));

        bbox.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert_eq!(bbox.p_min[0], -1.0);
        assert_eq!(bbox.p_max[2], 6.0);
    }

    #[test]
    fn test_include_starts_from_first_point() {
        let mut bounds: Option<AABB> = None;
        AABB::include(&mut bounds, &Vector3f::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds, Some(AABB::from_point(&Vector3f::new(-1.0, 0.0, 0.0))));

        AABB::include(&mut bounds, &Vector3f::new(1.0, 0.0, 0.0));
        AABB::include(&mut bounds, &Vector3f::new(0.0, 2.0, 0.0));
        let bbox = bounds.unwrap();
        assert_eq!(bbox.min_array(), [-1.0, 0.0, 0.0]);
        assert_eq!(bbox.max_array(), [1.0, 2.0, 0.0]);
    }
}
