//! # Polymorphic Object Model
//!
//! Every decode produces an [`AnyValue`]. Registered types arrive as
//! [`AnyValue::Known`] behind the [`Decoded`] trait object; composites the
//! registry cannot decode arrive as [`AnyValue::Opaque`] with their raw
//! encoding preserved; nested serialised streams of unknown element type
//! arrive as [`AnyValue::Serialized`].
//!
//! ## Equality
//!
//! Known values compare by content through [`Decoded::dyn_eq`], which is
//! false across different concrete types. Opaque values compare by
//! descriptor and bytes.

use std::any::Any;
use std::fmt::Debug;

use bytes::Bytes;
use types::{SerializedBytes, TypeDescriptor};

/// Object-safe view of a decoded value
///
/// Implemented for every `'static` type that is `Debug + PartialEq + Clone +
/// Send + Sync`; there is nothing to implement by hand.
pub trait Decoded: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn dyn_eq(&self, other: &dyn Decoded) -> bool;
    fn clone_boxed(&self) -> Box<dyn Decoded>;
    fn type_name(&self) -> &'static str;
}

impl<T> Decoded for T
where
    T: Any + Debug + PartialEq + Clone + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn dyn_eq(&self, other: &dyn Decoded) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn clone_boxed(&self) -> Box<dyn Decoded> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Raw encoding of a composite that was captured instead of decoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaquePayload {
    descriptor: TypeDescriptor,
    bytes: Bytes,
    body_offset: usize,
}

impl OpaquePayload {
    /// `bytes` spans the described-type marker through the end of the body;
    /// `body_offset` is where the body starts within it
    pub fn new(descriptor: TypeDescriptor, bytes: impl Into<Bytes>, body_offset: usize) -> Self {
        let bytes = bytes.into();
        let body_offset = body_offset.min(bytes.len());
        Self {
            descriptor,
            bytes,
            body_offset,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Complete composite encoding; decodes back through normal dispatch
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Encoding of the composite body, after the descriptor
    pub fn body(&self) -> &[u8] {
        &self.bytes[self.body_offset..]
    }
}

/// Result of decoding one polymorphic slot
#[derive(Debug)]
pub enum AnyValue {
    /// AMQP null
    Null,
    /// Value built by a registered constructor
    Known(Box<dyn Decoded>),
    /// Composite captured without decoding
    Opaque(OpaquePayload),
    /// Nested serialised stream whose element type is decided later
    Serialized(SerializedBytes),
}

impl AnyValue {
    pub fn known<T: Decoded>(value: T) -> Self {
        AnyValue::Known(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnyValue::Null)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, AnyValue::Opaque(_))
    }

    pub fn as_opaque(&self) -> Option<&OpaquePayload> {
        match self {
            AnyValue::Opaque(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_serialized(&self) -> Option<&SerializedBytes> {
        match self {
            AnyValue::Serialized(serialized) => Some(serialized),
            _ => None,
        }
    }

    /// Borrow the concrete value, if this slot holds a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            AnyValue::Null => None,
            AnyValue::Known(value) => value.as_any().downcast_ref::<T>(),
            AnyValue::Opaque(payload) => (payload as &dyn Any).downcast_ref::<T>(),
            AnyValue::Serialized(serialized) => (serialized as &dyn Any).downcast_ref::<T>(),
        }
    }

    /// Take the concrete value, if this slot holds a `T`
    pub fn downcast<T: Any>(self) -> Option<T> {
        let boxed: Box<dyn Any> = match self {
            AnyValue::Null => return None,
            AnyValue::Known(value) => value.into_any(),
            AnyValue::Opaque(payload) => Box::new(payload),
            AnyValue::Serialized(serialized) => Box::new(serialized),
        };
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Name of the held type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Null => "null",
            AnyValue::Known(value) => value.type_name(),
            AnyValue::Opaque(_) => "opaque",
            AnyValue::Serialized(_) => "serialized",
        }
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        match self {
            AnyValue::Null => AnyValue::Null,
            AnyValue::Known(value) => AnyValue::Known(value.clone_boxed()),
            AnyValue::Opaque(payload) => AnyValue::Opaque(payload.clone()),
            AnyValue::Serialized(serialized) => AnyValue::Serialized(serialized.clone()),
        }
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnyValue::Null, AnyValue::Null) => true,
            (AnyValue::Known(a), AnyValue::Known(b)) => a.dyn_eq(b.as_ref()),
            (AnyValue::Opaque(a), AnyValue::Opaque(b)) => a == b,
            (AnyValue::Serialized(a), AnyValue::Serialized(b)) => a == b,
            _ => false,
        }
    }
}
