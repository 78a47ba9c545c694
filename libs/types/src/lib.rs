//! # Envelope Types Library
//!
//! Pure data for the envelope decoder: the vocabulary of the wire (format
//! codes, framing constants, type descriptors), the component-group ordinal
//! contract, and the plain structs standard decoders produce.
//!
//! ## Design Philosophy
//!
//! - **Data only**: nothing here reads bytes; decoding rules live in `codec`
//! - **Stable ordinals**: [`ComponentGroupEnum`] numbering is an external contract
//! - **Normalised descriptors**: one [`TypeDescriptor`] key per wire spelling
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{ComponentGroupEnum, TypeDescriptor};
//!
//! let key = TypeDescriptor::from("net.corda:java.time.Instant");
//! assert_eq!(key, TypeDescriptor::symbol("java.time.Instant"));
//!
//! assert_eq!(ComponentGroupEnum::Notary.ordinal(), 4);
//! ```

pub mod common;
pub mod protocol;

pub use common::errors::{ComponentOrderError, DescriptorError};
pub use common::transactions::{ComponentGroup, WireTransaction};
pub use common::values::{
    ClassName, Currency, Duration, Instant, LocalDate, OpaqueBytes, PrivacySalt, PublicKey,
    SerializedBytes, SignatureMetadata,
};

pub use protocol::{
    validate_component_order, ComponentGroupEnum, FormatCode, TypeDescriptor, WidthCategory,
    CORDA_NAMESPACE, ENVELOPE_DESCRIPTOR, FINGERPRINT_LEN, SECTION_DATA_AND_STOP,
    SERIALIZATION_MAGIC,
};
