use crate::camera_rig::{CollisionLayers, CollisionWorld, LineHit};
use bevy::math::Vec3;

const SEGMENT_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    Sphere { center: Vec3, radius: f32 },
    /// Axis aligned box
    Cuboid { min: Vec3, max: Vec3 },
    /// Solid half space below the plane of `normal` with the signed `offset` from the origin.
    HalfSpace { normal: Vec3, offset: f32 },
}

impl ColliderShape {
    /// Distance along the (normalized) `dir` where the segment enters the shape.
    /// A segment starting inside the shape does not hit it.
    fn entry_distance(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
        let t = match *self {
            ColliderShape::Sphere { center, radius } => {
                let oc = origin - center;
                let c = oc.length_squared() - radius * radius;
                if c < 0.0 {
                    return None;
                }
                let b = oc.dot(dir);
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                -b - discriminant.sqrt()
            }

            ColliderShape::Cuboid { min, max } => {
                let inv_dir = dir.recip();
                let t1 = (min - origin) * inv_dir;
                let t2 = (max - origin) * inv_dir;
                // min/max ignore the NaN of a ray lying on a slab plane
                let t_enter = t1.min(t2).max_element();
                let t_exit = t1.max(t2).min_element();
                if !(t_enter <= t_exit) || t_enter < 0.0 {
                    return None;
                }
                t_enter
            }

            ColliderShape::HalfSpace { normal, offset } => {
                let normal = normal.try_normalize()?;
                let height = origin.dot(normal) - offset;
                let speed = dir.dot(normal);
                if height < 0.0 || speed >= 0.0 {
                    return None;
                }
                -height / speed
            }
        };

        (t >= 0.0 && t <= max_distance).then_some(t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layers: CollisionLayers,
}

/// A simple collection of immutable colliders, queried by brute force.
#[derive(Clone, Debug, Default)]
pub struct StaticGeometry {
    colliders: Vec<Collider>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, shape: ColliderShape, layers: CollisionLayers) -> Self {
        self.add(shape, layers);
        self
    }

    pub fn with_sphere(self, center: Vec3, radius: f32) -> Self {
        self.with(ColliderShape::Sphere { center, radius }, CollisionLayers::ALL)
    }

    pub fn with_cuboid(self, min: Vec3, max: Vec3) -> Self {
        self.with(ColliderShape::Cuboid { min, max }, CollisionLayers::ALL)
    }

    pub fn with_half_space(self, normal: Vec3, offset: f32) -> Self {
        self.with(ColliderShape::HalfSpace { normal, offset }, CollisionLayers::ALL)
    }

    pub fn add(&mut self, shape: ColliderShape, layers: CollisionLayers) {
        self.colliders.push(Collider { shape, layers });
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl CollisionWorld for StaticGeometry {
    fn line_test(&self, from: Vec3, to: Vec3, layers: CollisionLayers) -> Option<LineHit> {
        let delta = to - from;
        let length = delta.length();
        if length < SEGMENT_EPSILON {
            return None;
        }
        let dir = delta / length;

        self.colliders
            .iter()
            .filter(|collider| collider.layers.intersects(layers))
            .filter_map(|collider| collider.shape.entry_distance(from, dir, length))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| LineHit {
                point: from + dir * distance,
                distance,
            })
    }
}
