//! Protocol layer modules
//!
//! Wire-level vocabulary shared by the codec and tools: format codes,
//! framing constants, type descriptors and component-group ordinals.

pub mod component;
pub mod constants;
pub mod descriptor;

pub use component::{validate_component_order, ComponentGroupEnum};
pub use constants::{
    FormatCode, WidthCategory, CORDA_NAMESPACE, ENVELOPE_DESCRIPTOR, FINGERPRINT_LEN,
    SECTION_DATA_AND_STOP, SERIALIZATION_MAGIC,
};
pub use descriptor::TypeDescriptor;
