//! # Standard Known Types
//!
//! Decoders for the types every stream may contain. Value structs come from
//! the `types` crate; this module binds them to descriptors.
//!
//! | Type | Descriptor | Entry |
//! |------|------------|-------|
//! | `Instant`, `LocalDate`, `Duration` | `java.time.*` | dispatched |
//! | `Currency`, `ClassName` | `java.util.Currency`, `java.lang.Class` | dispatched |
//! | `PublicKey` | `java.security.PublicKey` | self-describing |
//! | `Throwable` | `java.lang.Throwable` | self-describing, always unsupported |
//! | `OpaqueBytes` | schema fingerprint, plus the byte-sequence fingerprint as an alias | dispatched |
//! | `SerializedBytes` | `net.corda.core.serialization.SerializedBytes` | dispatched, yields [`AnyValue::Serialized`] |
//! | transaction structures | `net.corda.core.*` | dispatched |

pub mod binary;
pub mod lang;
pub mod security;
pub mod time;
pub mod transactions;

use tracing::debug;
use types::{
    ClassName, ComponentGroup, Currency, Duration, Instant, LocalDate, OpaqueBytes, PrivacySalt,
    PublicKey, SerializedBytes, SignatureMetadata, WireTransaction,
};

use crate::described::Described;
use crate::registry::{Constructor, TypeRegistry};
use crate::value::AnyValue;

pub use binary::BYTE_SEQUENCE_DESCRIPTOR;
pub use lang::Throwable;
pub use security::{TransactionSignature, PUBLIC_KEY_SYMBOL};
pub use transactions::SignedTransaction;

/// Register every standard type
pub fn register_builtins(registry: &TypeRegistry) {
    registry.register_type::<Instant>();
    registry.register_type::<LocalDate>();
    registry.register_type::<Duration>();
    registry.register_type::<Currency>();
    registry.register_type::<ClassName>();
    registry.register_type::<PublicKey>();
    registry.register_type::<Throwable>();
    registry.register_type::<OpaqueBytes>();
    registry.register_alias::<OpaqueBytes>(binary::BYTE_SEQUENCE_DESCRIPTOR);
    registry.register_type::<PrivacySalt>();
    registry.register_type::<ComponentGroup>();
    registry.register_type::<WireTransaction>();
    registry.register_type::<SignatureMetadata>();
    registry.register_type::<TransactionSignature>();
    registry.register_type::<SignedTransaction>();

    // Element type of a nested stream is only known to whoever holds the slot
    registry.register(
        SerializedBytes::descriptor(),
        Constructor::dispatched("SerializedBytes", |decoder, registry| {
            SerializedBytes::construct(decoder, registry).map(AnyValue::Serialized)
        })
        .producing::<SerializedBytes>(),
    );

    debug!(count = registry.len(), "Registered built-in types");
}
