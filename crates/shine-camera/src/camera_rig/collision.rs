use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask of collision layers. A query only reports geometry sharing at least one layer with the filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(!0);

    pub const LAYER_COUNT: u32 = u32::BITS;

    /// Bit of the layer, layers outside of the [0..LAYER_COUNT) range have no bit.
    const fn bit(layer: u32) -> u32 {
        match 1_u32.checked_shl(layer) {
            Some(bit) => bit,
            None => 0,
        }
    }

    /// Create a mask with only the given layer. An out of range layer gives an empty mask.
    pub const fn layer(layer: u32) -> Self {
        Self(Self::bit(layer))
    }

    pub const fn with(self, layer: u32) -> Self {
        Self(self.0 | Self::bit(layer))
    }

    pub const fn without(self, layer: u32) -> Self {
        Self(self.0 & !Self::bit(layer))
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<CollisionLayers> for u32 {
    fn from(value: CollisionLayers) -> Self {
        value.0
    }
}

impl From<u32> for CollisionLayers {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// The nearest obstruction found by a line test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHit {
    pub point: Vec3,
    /// Distance of the hit from the start of the line.
    pub distance: f32,
}

/// Read only spatial queries against the collidable geometry of the world.
pub trait CollisionWorld {
    /// Find the nearest obstruction on the segment `from`..`to` among the geometry matching `layers`.
    fn line_test(&self, from: Vec3, to: Vec3, layers: CollisionLayers) -> Option<LineHit>;
}

impl<F> CollisionWorld for F
where
    F: Fn(Vec3, Vec3, CollisionLayers) -> Option<LineHit>,
{
    fn line_test(&self, from: Vec3, to: Vec3, layers: CollisionLayers) -> Option<LineHit> {
        self(from, to, layers)
    }
}
