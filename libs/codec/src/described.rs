//! # Typed Decoding
//!
//! [`Described`] is implemented by every Rust type with a wire descriptor.
//! Its `construct` reads fields in declared wire order; field order is part
//! of the wire contract.
//!
//! ## Entry Modes
//!
//! - [`EntryMode::Dispatched`]: whoever decodes the value enters the
//!   composite and checks its boundary on exit. `construct` only sees the
//!   cursor positioned on the first field.
//! - [`EntryMode::SelfDescribing`]: `construct` receives the cursor on the
//!   described-type marker and does its own enter, descriptor check and exit.

use types::TypeDescriptor;

use crate::decoder::Decoder;
use crate::error::{DecodeError, DecodeResult};
use crate::registry::TypeRegistry;
use crate::value::{AnyValue, Decoded};

/// Who enters a composite before its fields are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Dispatched,
    SelfDescribing,
}

/// Anything that can be read from the current cursor position
pub trait Decode: Sized {
    fn decode(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self>;
}

/// Rust type bound to a wire descriptor
pub trait Described: Decoded + Sized {
    /// Descriptor text, with or without the `net.corda:` namespace
    const DESCRIPTOR: &'static str;
    const ENTRY: EntryMode = EntryMode::Dispatched;

    fn construct(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self>;

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::from(Self::DESCRIPTOR)
    }
}

impl<T: Described> Decode for T {
    fn decode(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        match T::ENTRY {
            EntryMode::SelfDescribing => T::construct(decoder, registry),
            EntryMode::Dispatched => {
                let offset = decoder.position();
                let descriptor = decoder.enter_composite()?;
                if !registry.accepts::<T>(&descriptor) {
                    return Err(DecodeError::unexpected_descriptor(
                        T::DESCRIPTOR,
                        descriptor.to_string(),
                        offset,
                    ));
                }
                let value = T::construct(decoder, registry)?;
                decoder.exit_composite()?;
                Ok(value)
            }
        }
    }
}

impl Decode for AnyValue {
    fn decode(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        registry.decode_slot(decoder)
    }
}

/// Read a list whose every element decodes as `T`
pub fn decode_list<T: Decode>(
    decoder: &mut Decoder<'_>,
    registry: &TypeRegistry,
) -> DecodeResult<Vec<T>> {
    let count = decoder.enter_list()?;
    let mut items = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        items.push(T::decode(decoder, registry)?);
    }
    decoder.exit_list()?;
    Ok(items)
}

/// Read a `T` that may be encoded as AMQP null
pub fn decode_nullable<T: Decode>(
    decoder: &mut Decoder<'_>,
    registry: &TypeRegistry,
) -> DecodeResult<Option<T>> {
    if decoder.is_null() {
        decoder.read_null()?;
        Ok(None)
    } else {
        T::decode(decoder, registry).map(Some)
    }
}
