//! `java.time` values

use types::{Duration, Instant, LocalDate};

use crate::decoder::Decoder;
use crate::described::Described;
use crate::error::DecodeResult;
use crate::registry::TypeRegistry;

impl Described for Instant {
    const DESCRIPTOR: &'static str = "java.time.Instant";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        let epoch_seconds = decoder.read_i64()?;
        let nanos = decoder.read_i32()?;
        Ok(Instant::new(epoch_seconds, nanos))
    }
}

impl Described for LocalDate {
    const DESCRIPTOR: &'static str = "java.time.LocalDate";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(LocalDate {
            year: decoder.read_u32()?,
            month: decoder.read_u8()?,
            day: decoder.read_u8()?,
        })
    }
}

impl Described for Duration {
    const DESCRIPTOR: &'static str = "java.time.Duration";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(Duration {
            seconds: decoder.read_u64()?,
            nanos: decoder.read_u32()?,
        })
    }
}
