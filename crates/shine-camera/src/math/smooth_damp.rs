use bevy::math::{Vec2, Vec3};
use std::ops::{Add, Mul, Sub};

/// Types that can be driven by the critically damped spring of [`smooth_damp`].
pub trait SmoothDamp: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {
    const ZERO: Self;

    fn dot(self, other: Self) -> f32;

    /// Limit the magnitude of the value to `max`.
    fn clamp_length_max(self, max: f32) -> Self;
}

impl SmoothDamp for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn dot(self, other: Self) -> f32 {
        self * other
    }

    #[inline(always)]
    fn clamp_length_max(self, max: f32) -> Self {
        self.clamp(-max, max)
    }
}

macro_rules! impl_smooth_damp_for_vec {
    ($type:ty) => {
        impl SmoothDamp for $type {
            const ZERO: Self = <$type>::ZERO;

            #[inline(always)]
            fn dot(self, other: Self) -> f32 {
                <$type>::dot(self, other)
            }

            #[inline(always)]
            fn clamp_length_max(self, max: f32) -> Self {
                <$type>::clamp_length_max(self, max)
            }
        }
    };
}

impl_smooth_damp_for_vec!(Vec2);
impl_smooth_damp_for_vec!(Vec3);

/// Critically damped spring moving `current` towards `target`.
///
/// The exponential decay is approximated by a Taylor polynomial that stays stable for large time steps, see
/// Game Programming Gems 4, chapter 1.10. The velocity is updated in place and has to be preserved between
/// calls for a smooth result.
/// - A non-positive `smooth_time_s` snaps to the target.
/// - A non-positive `delta_time_s` leaves both the value and the velocity untouched.
pub fn smooth_damp<T>(current: T, target: T, velocity: &mut T, smooth_time_s: f32, max_speed: f32, delta_time_s: f32) -> T
where
    T: SmoothDamp,
{
    if !(smooth_time_s > 0.0 && smooth_time_s.is_finite()) {
        *velocity = T::ZERO;
        return target;
    }
    if !(delta_time_s > 0.0 && delta_time_s.is_finite()) {
        return current;
    }

    let omega = 2.0 / smooth_time_s;
    let x = omega * delta_time_s;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = (current - target).clamp_length_max(max_speed * smooth_time_s);
    let clamped_target = current - change;

    let temp = (*velocity + change * omega) * delta_time_s;
    *velocity = (*velocity - temp * omega) * decay;
    let output = clamped_target + (change + temp) * decay;

    // the target has been passed
    if (target - current).dot(output - target) > 0.0 {
        *velocity = T::ZERO;
        return target;
    }

    output
}

/// A value following its target using [`smooth_damp`].
#[derive(Clone, Debug)]
pub struct SmoothDamped<T>
where
    T: SmoothDamp,
{
    smooth_time_s: f32,
    max_speed: f32,
    value: T,
    velocity: T,
}

impl<T> SmoothDamped<T>
where
    T: SmoothDamp,
{
    pub fn new(value: T, smooth_time_s: f32) -> Self {
        Self {
            smooth_time_s,
            max_speed: f32::INFINITY,
            value,
            velocity: T::ZERO,
        }
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn smooth_time(&self) -> f32 {
        self.smooth_time_s
    }

    /// Change the duration of the smoothing. The velocity is kept, only the decay of the upcoming steps changes.
    pub fn set_smooth_time(&mut self, smooth_time_s: f32) {
        self.smooth_time_s = smooth_time_s;
    }

    /// Jump to the given value and stop any motion.
    pub fn reset(&mut self, value: T) {
        self.value = value;
        self.velocity = T::ZERO;
    }

    pub fn smooth_towards(&mut self, target: T, delta_time_s: f32) -> T {
        self.value = smooth_damp(
            self.value,
            target,
            &mut self.velocity,
            self.smooth_time_s,
            self.max_speed,
            delta_time_s,
        );
        self.value
    }
}
