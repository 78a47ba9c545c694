//! # Wire Contract Tests
//!
//! Values other systems depend on: descriptor spellings, framing constants
//! and the component-group ordinal numbering.

use bytes::Bytes;
use types::{
    ComponentGroup, ComponentGroupEnum, ComponentOrderError, OpaqueBytes, PrivacySalt,
    TypeDescriptor, WireTransaction, ENVELOPE_DESCRIPTOR, SERIALIZATION_MAGIC,
};

fn group(index: i32) -> ComponentGroup {
    ComponentGroup::new(index, vec![OpaqueBytes::new(vec![index as u8])])
}

fn salt() -> PrivacySalt {
    PrivacySalt(Bytes::from_static(&[7; PrivacySalt::LEN]))
}

#[test]
fn test_framing_constants() {
    assert_eq!(&SERIALIZATION_MAGIC, b"corda\x01\x00");
    assert_eq!(ENVELOPE_DESCRIPTOR >> 32, 0xc562_0000);
}

#[test]
fn test_descriptor_spellings_normalise() {
    let bare = TypeDescriptor::from("java.time.Instant");
    let namespaced = TypeDescriptor::from("net.corda:java.time.Instant");
    assert_eq!(bare, namespaced);
    assert_eq!(
        namespaced.to_wire_symbol().as_deref(),
        Some("net.corda:java.time.Instant")
    );

    let fingerprint = TypeDescriptor::from("net.corda:pgT0Kc3t/bvnzmgu/nb4Cg==");
    assert!(fingerprint.is_fingerprint());
    assert_eq!(fingerprint.to_string(), "net.corda:pgT0Kc3t/bvnzmgu/nb4Cg==");
}

#[test]
fn test_malformed_fingerprint_rejected() {
    assert!(TypeDescriptor::fingerprint("not base64!").is_err());
    assert!(TypeDescriptor::fingerprint("AAAA").is_err());
}

#[test]
fn test_prefix_of_groups_accepted() {
    let wtx = WireTransaction::new(vec![group(0), group(1), group(2)], salt()).unwrap();
    assert_eq!(wtx.ordinals(), vec![0, 1, 2]);
    assert_eq!(wtx.outputs()[0].as_slice(), &[1]);
    assert!(wtx.components(ComponentGroupEnum::Notary).is_empty());
}

#[test]
fn test_skipped_group_rejected() {
    let err = WireTransaction::new(vec![group(0), group(2)], salt()).unwrap_err();
    assert_eq!(
        err,
        ComponentOrderError::OutOfOrder {
            position: 1,
            group_index: 2,
            found: ComponentGroupEnum::Commands,
        }
    );
}

#[test]
fn test_negative_index_rejected() {
    let err = WireTransaction::new(vec![group(-1)], salt()).unwrap_err();
    assert!(matches!(err, ComponentOrderError::UnknownGroup { position: 0, group_index: -1 }));
}
