//! Ray casting against click boxes and hotspot discs

use skate_core::{Affine3, Vec3};

/// Ray for picking
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `from` through `to`
    pub fn from_points(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Re-express the ray in another space
    pub fn transformed(&self, m: &Affine3) -> Ray {
        Ray {
            origin: m.transform_point(self.origin),
            direction: m.transform_vector(self.direction),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with full edge lengths `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Distance along `ray` to the first hit, slab method
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        let axes = [
            (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
            (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
            (ray.origin.z, ray.direction.z, self.min.z, self.max.z),
        ];
        for (origin, dir, lo, hi) in axes {
            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let (t0, t1) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                if a < b {
                    (a, b)
                } else {
                    (b, a)
                }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// Sphere, used as the pick volume of a billboarded disc
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        let near = -b - sqrt;
        let far = -b + sqrt;
        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}
