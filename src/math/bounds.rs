use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Bounds of the eight corners after `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Aabb::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.extend(matrix.transform_point3(corner));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_from_empty() {
        let mut aabb = Aabb::EMPTY;
        assert!(aabb.is_empty());
        aabb.extend(Vec3::new(1.0, -2.0, 0.0));
        aabb.extend(Vec3::new(-1.0, 2.0, 4.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 4.0));
    }

    #[test]
    fn translation_moves_box() {
        let aabb = Aabb { min: Vec3::ZERO, max: Vec3::ONE };
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::X * 3.0));
        assert_eq!(moved.min, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(moved.max, Vec3::new(4.0, 1.0, 1.0));
    }
}
