//! # Opaque Capture and Deferred Decoding Tests
//!
//! Captured payloads must decode back to the same structure once their type
//! is known, and deferred payloads must be interpreted at most once.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use codec::{AnyValue, DecodeResult, Decoder, Described, GenericHolder, TypeRegistry};
use common::*;
use config::{DecoderConfig, UnknownTypePolicy};

const POINT: &str = "com.example.Point";

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: String,
}

impl Described for Point {
    const DESCRIPTOR: &'static str = POINT;

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(Point {
            x: decoder.read_i32()?,
            y: decoder.read_i32()?,
            label: decoder.read_string()?.to_owned(),
        })
    }
}

static COUNTED_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, PartialEq)]
struct Counted(i32);

impl Described for Counted {
    const DESCRIPTOR: &'static str = "com.example.Counted";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        COUNTED_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Ok(Counted(decoder.read_i32()?))
    }
}

fn point(x: i32, y: i32, label: &str) -> Vec<u8> {
    composite(POINT, &[int(x), int(y), string(label)])
}

fn capture_everything() -> DecoderConfig {
    DecoderConfig {
        unknown_types: UnknownTypePolicy::capture_all(),
        ..DecoderConfig::default()
    }
}

#[test]
fn test_opaque_round_trip() {
    let bytes = point(3, -4, "origin-ish");

    let unaware = TypeRegistry::new(capture_everything());
    let captured = unaware.decode_any(&bytes).unwrap();
    let payload = captured.as_opaque().expect("opaque").clone();
    assert_eq!(payload.bytes().as_ref(), bytes.as_slice());

    // Once the type is known, the captured bytes decode like the original stream
    let aware = TypeRegistry::new(DecoderConfig::default());
    aware.register_type::<Point>();
    let from_capture = aware.decode_any(payload.bytes()).unwrap();
    let from_original = aware.decode_any(&bytes).unwrap();
    assert_eq!(from_capture, from_original);
    assert_eq!(
        from_capture.downcast_ref::<Point>(),
        Some(&Point {
            x: 3,
            y: -4,
            label: "origin-ish".to_string()
        })
    );

    // Re-capturing the captured bytes yields an equal payload
    assert_eq!(unaware.decode_any(payload.bytes()).unwrap(), captured);
}

#[test]
fn test_opaque_body_excludes_descriptor() {
    let bytes = point(1, 2, "p");
    let registry = TypeRegistry::new(capture_everything());
    let value = registry.decode_any(&bytes).unwrap();
    let payload = value.as_opaque().expect("opaque");

    assert_eq!(payload.body(), list(&[int(1), int(2), string("p")]).as_slice());
}

#[test]
fn test_opaque_payload_materializes_later() {
    let registry = TypeRegistry::new(capture_everything());
    let value = registry.decode_any(&point(5, 6, "later")).unwrap();
    let holder: GenericHolder<Point> = value.into_holder().expect("deferred");
    assert!(!holder.is_materialized());

    // A typed request names its own descriptor, so no registration is needed
    assert_eq!(holder.materialize(&registry).unwrap().label, "later");
    assert!(holder.is_materialized());
}

#[test]
fn test_materialization_is_idempotent() {
    let registry = TypeRegistry::new(DecoderConfig::default());
    registry.register_type::<Counted>();

    let holder: GenericHolder<Counted> =
        GenericHolder::new(composite(Counted::DESCRIPTOR, &[int(42)]));

    let first = holder.materialize(&registry).unwrap().clone();
    let after_first = COUNTED_CONSTRUCTIONS.load(Ordering::SeqCst);
    let second = holder.materialize(&registry).unwrap().clone();

    assert_eq!(first, Counted(42));
    assert_eq!(first, second);
    assert_eq!(after_first, 1);
    assert_eq!(COUNTED_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    assert_eq!(holder.into_inner(), Some(Counted(42)));
}

#[test]
fn test_non_deferred_values_have_no_holder() {
    assert!(AnyValue::Null.into_holder::<Point>().is_none());
    assert!(AnyValue::known(7i32).into_holder::<Point>().is_none());
}
