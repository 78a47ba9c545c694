//! `java.lang` and `java.util` values

use types::{ClassName, Currency};

use crate::decoder::Decoder;
use crate::described::{Described, EntryMode};
use crate::error::{DecodeError, DecodeResult};
use crate::registry::TypeRegistry;

impl Described for Currency {
    const DESCRIPTOR: &'static str = "java.util.Currency";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(Currency {
            code: decoder.read_string()?.to_owned(),
        })
    }
}

impl Described for ClassName {
    const DESCRIPTOR: &'static str = "java.lang.Class";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(ClassName {
            name: decoder.read_string()?.to_owned(),
        })
    }
}

/// Exception payload; never decodable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Throwable;

impl Described for Throwable {
    const DESCRIPTOR: &'static str = "java.lang.Throwable";
    const ENTRY: EntryMode = EntryMode::SelfDescribing;

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Err(DecodeError::unsupported(
            Self::DESCRIPTOR,
            "exception payloads carry platform stack state and are never decoded",
            decoder.position(),
        ))
    }
}
