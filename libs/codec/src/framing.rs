//! Stream framing: serialisation preamble and envelope
//!
//! A complete stream may start with the 7-byte magic `"corda" 0x01 0x00`
//! followed by a section id. The root object may be wrapped in an envelope
//! composite (ulong descriptor [`ENVELOPE_DESCRIPTOR`]) whose list carries the
//! object, the schema and the transforms. Only the object is decoded.

use config::FramingConfig;
use tracing::trace;
use types::{TypeDescriptor, ENVELOPE_DESCRIPTOR, SECTION_DATA_AND_STOP, SERIALIZATION_MAGIC};

use crate::decoder::Decoder;
use crate::error::{DecodeError, DecodeResult};

/// Leading bytes shared by every version of the magic
const MAGIC_PREFIX: &[u8] = b"corda";

/// Consume the preamble if present; returns whether one was found
pub fn read_preamble(decoder: &mut Decoder<'_>, framing: &FramingConfig) -> DecodeResult<bool> {
    let offset = decoder.position();
    if decoder.strip_prefix(&SERIALIZATION_MAGIC) {
        let section_offset = decoder.position();
        let section = decoder.read_raw_byte("section id").map_err(|_| {
            DecodeError::invalid_preamble(decoder.position(), "stream ends before section id")
        })?;
        if section != SECTION_DATA_AND_STOP {
            return Err(DecodeError::unsupported(
                format!("section {section}"),
                "only the data section can be decoded",
                section_offset,
            ));
        }
        trace!(offset, "Consumed serialisation preamble");
        return Ok(true);
    }

    let rest = decoder.remaining_bytes();
    if rest.starts_with(MAGIC_PREFIX) {
        let header = &rest[..rest.len().min(SERIALIZATION_MAGIC.len())];
        return Err(DecodeError::invalid_preamble(
            offset,
            format!("unsupported serialisation header {}", hex::encode(header)),
        ));
    }
    if framing.require_preamble {
        return Err(DecodeError::invalid_preamble(
            offset,
            "missing serialisation magic",
        ));
    }
    Ok(false)
}

/// Enter an envelope if the next value is one; the cursor is left on the object
pub fn enter_envelope(decoder: &mut Decoder<'_>) -> DecodeResult<bool> {
    if decoder.peek_descriptor()? != Some(TypeDescriptor::Code(ENVELOPE_DESCRIPTOR)) {
        return Ok(false);
    }
    decoder.enter_composite()?;
    if decoder.remaining() == 0 {
        return Err(DecodeError::structural(
            "envelope object",
            "empty envelope",
            decoder.position(),
            "envelope",
        ));
    }
    Ok(true)
}

/// Skip the schema and transform sections and close the envelope
pub fn exit_envelope(decoder: &mut Decoder<'_>) -> DecodeResult<()> {
    let mut skipped = 0usize;
    while decoder.remaining() > 0 {
        decoder.skip_value()?;
        skipped += 1;
    }
    trace!(skipped, "Skipped envelope sections");
    decoder.exit_composite()
}
