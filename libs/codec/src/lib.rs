//! # Envelope Codec
//!
//! ## Purpose
//!
//! The rules layer of the envelope decoder: turns AMQP 1.0 described-type
//! streams into typed Rust values without knowing every record type at
//! compile time. Each composite names its type with a descriptor; the
//! [`TypeRegistry`] maps descriptors to constructors and falls back to
//! opaque capture for anything it does not know.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → tools/inspect
//!     ↑           ↓            ↓
//! Pure Data   Decoding     CLI glue
//! Structures  Registry     Reports
//! ```
//!
//! ## What This Crate Contains
//! - **Decoder**: bounded cursor over AMQP encodings with frame checking
//! - **TypeRegistry**: descriptor dispatch, unknown-type policy, stream entry points
//! - **AnyValue**: polymorphic result with known, opaque and serialised variants
//! - **GenericHolder**: cached deferred decoding of nested streams
//! - **Known types**: time, currency, keys, signatures, transactions
//! - **Dump**: registry-free structural rendering for diagnostics
//!
//! ## What This Crate Does NOT Contain
//! - Encoding (serialisation) of values
//! - Schema evolution or field-level validation of unknown types
//!
//! ## Quick Start
//!
//! ```rust
//! use codec::{AnyValue, TypeRegistry};
//! use config::DecoderConfig;
//! use types::Instant;
//!
//! let registry = TypeRegistry::with_builtins(DecoderConfig::default());
//!
//! // described(sym "java.time.Instant", list8[smalllong 9, smallint 1])
//! let mut bytes = vec![0x00, 0xa3, 17];
//! bytes.extend_from_slice(b"java.time.Instant");
//! bytes.extend_from_slice(&[0xc0, 0x05, 0x02, 0x55, 0x09, 0x54, 0x01]);
//!
//! let value: AnyValue = registry.decode_any(&bytes).unwrap();
//! assert_eq!(value.downcast_ref::<Instant>(), Some(&Instant::new(9, 1)));
//! ```

pub mod decoder;
pub mod described;
pub mod dump;
pub mod error;
pub mod framing;
pub mod generic;
pub mod known;
pub mod registry;
pub mod value;

pub use decoder::{Decoder, RawDescriptor, WireDescriptor};
pub use described::{decode_list, decode_nullable, Decode, Described, EntryMode};
pub use dump::{dump, hex_dump};
pub use error::{DecodeError, DecodeResult, ErrorKind};
pub use generic::GenericHolder;
pub use known::{
    register_builtins, SignedTransaction, Throwable, TransactionSignature, BYTE_SEQUENCE_DESCRIPTOR,
    PUBLIC_KEY_SYMBOL,
};
pub use registry::{Constructor, ConstructorFn, TypeRegistry};
pub use value::{AnyValue, Decoded, OpaquePayload};
