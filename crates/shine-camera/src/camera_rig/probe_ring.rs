use crate::camera_rig::{CollisionLayers, CollisionWorld, LineHit};
use bevy::math::{Quat, Vec3};

/// One sample of the collision probe ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeSample {
    /// World space end of the line test.
    pub point: Vec3,
    /// The nearest obstruction between the ring origin and `point`.
    pub hit: Option<LineHit>,
}

impl Default for ProbeSample {
    fn default() -> Self {
        Self { point: Vec3::ZERO, hit: None }
    }
}

/// Offset of the `index`-th sample of a ring with `count` samples in the local XY plane.
/// Samples are evenly spaced, in increasing angle order starting at the local +X axis.
pub fn ring_offset(index: usize, count: usize, radius: f32) -> Vec3 {
    let angle = (index as f32 * 360.0 / count as f32).to_radians();
    let (sin, cos) = angle.sin_cos();
    Vec3::new(cos, sin, 0.0) * radius
}

/// A ring of line tests around the end of the arm, detecting geometry between the rig and the camera.
#[derive(Clone, Debug)]
pub struct ProbeRing {
    samples: Vec<ProbeSample>,
}

impl ProbeRing {
    pub fn new(sample_count: usize) -> Self {
        Self {
            samples: vec![ProbeSample::default(); sample_count],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[ProbeSample] {
        &self.samples
    }

    /// Reallocate the samples, all the previous results are dropped.
    pub fn resize(&mut self, sample_count: usize) {
        self.samples.clear();
        self.samples.resize(sample_count, ProbeSample::default());
    }

    /// Cast a line from `origin` to each sample of the ring placed around `center` with the given orientation.
    pub fn cast<W>(
        &mut self,
        world: &W,
        origin: Vec3,
        center: Vec3,
        rotation: Quat,
        radius: f32,
        layers: CollisionLayers,
    ) -> &[ProbeSample]
    where
        W: CollisionWorld + ?Sized,
    {
        let count = self.samples.len();
        for (index, sample) in self.samples.iter_mut().enumerate() {
            let point = center + rotation * ring_offset(index, count, radius);
            *sample = ProbeSample {
                point,
                hit: world.line_test(origin, point, layers),
            };
        }

        &self.samples
    }
}
