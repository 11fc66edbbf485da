use crate::math::value::ValueError;
use bevy::math::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    UInt,
    Bool,
    Vec3,
}

pub trait ValueLike: TryFrom<ValueType, Error = ValueError> + Into<ValueType> + Clone + Send + Sync + 'static {
    const KIND: ValueKind;
}

/// A dynamically typed value of a named parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueType {
    Float(f32),
    UInt(u32),
    Bool(bool),
    Vec3(Vec3),
}

impl ValueType {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueType::Float(_) => ValueKind::Float,
            ValueType::UInt(_) => ValueKind::UInt,
            ValueType::Bool(_) => ValueKind::Bool,
            ValueType::Vec3(_) => ValueKind::Vec3,
        }
    }
}

macro_rules! impl_value_like {
    ($target_type:ty, $variant:ident) => {
        impl ValueLike for $target_type {
            const KIND: ValueKind = ValueKind::$variant;
        }

        impl From<$target_type> for ValueType {
            #[inline(always)]
            fn from(value: $target_type) -> Self {
                ValueType::$variant(value)
            }
        }

        impl TryFrom<ValueType> for $target_type {
            type Error = ValueError;

            #[inline(always)]
            fn try_from(value: ValueType) -> Result<Self, Self::Error> {
                match value {
                    ValueType::$variant(v) => Ok(v),
                    value => Err(ValueError::TypeMismatch {
                        expected: ValueKind::$variant,
                        found: value.kind(),
                    }),
                }
            }
        }
    };
}

impl_value_like!(f32, Float);
impl_value_like!(u32, UInt);
impl_value_like!(bool, Bool);
impl_value_like!(Vec3, Vec3);
