//! # Type Registry
//!
//! ## Purpose
//!
//! Maps [`TypeDescriptor`]s to constructors and drives decoding of
//! polymorphic slots: peek the descriptor, resolve it, invoke the
//! constructor, or fall back to opaque capture when nothing is registered.
//!
//! ## Integration Points
//!
//! - **Startup**: [`TypeRegistry::with_builtins`] or the lazily built
//!   [`TypeRegistry::global`] instance
//! - **Extension**: applications add their own types with
//!   [`TypeRegistry::register_type`] at any time; registration takes a write
//!   lock, lookups take a read lock and invoke constructors outside it
//! - **Entry points**: [`TypeRegistry::decode_root`] and
//!   [`TypeRegistry::decode_any`] for complete streams
//!
//! ## Overwrites
//!
//! Registering a descriptor that is already present replaces the previous
//! constructor (last registration wins) and logs a warning.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use config::{DecoderConfig, UnknownTypeAction};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};
use types::TypeDescriptor;

use crate::decoder::Decoder;
use crate::described::{Decode, Described, EntryMode};
use crate::error::{DecodeError, DecodeResult};
use crate::framing;
use crate::known;
use crate::value::{AnyValue, OpaquePayload};

/// Signature shared by every constructor
pub type ConstructorFn =
    dyn Fn(&mut Decoder<'_>, &TypeRegistry) -> DecodeResult<AnyValue> + Send + Sync;

/// Registered decoding function plus how it expects to be entered
#[derive(Clone)]
pub struct Constructor {
    entry: EntryMode,
    func: Arc<ConstructorFn>,
    type_name: &'static str,
    produces: Option<TypeId>,
}

impl Constructor {
    fn with_entry<F>(entry: EntryMode, type_name: &'static str, func: F) -> Self
    where
        F: Fn(&mut Decoder<'_>, &TypeRegistry) -> DecodeResult<AnyValue> + Send + Sync + 'static,
    {
        Self {
            entry,
            func: Arc::new(func),
            type_name,
            produces: None,
        }
    }

    /// Constructor reading fields of an already entered composite
    pub fn dispatched<F>(type_name: &'static str, func: F) -> Self
    where
        F: Fn(&mut Decoder<'_>, &TypeRegistry) -> DecodeResult<AnyValue> + Send + Sync + 'static,
    {
        Self::with_entry(EntryMode::Dispatched, type_name, func)
    }

    /// Constructor that enters and exits the composite itself
    pub fn self_describing<F>(type_name: &'static str, func: F) -> Self
    where
        F: Fn(&mut Decoder<'_>, &TypeRegistry) -> DecodeResult<AnyValue> + Send + Sync + 'static,
    {
        Self::with_entry(EntryMode::SelfDescribing, type_name, func)
    }

    /// Constructor for a [`Described`] type, producing [`AnyValue::Known`]
    pub fn of<T: Described>() -> Self {
        Self::with_entry(T::ENTRY, std::any::type_name::<T>(), |decoder, registry| {
            T::construct(decoder, registry).map(AnyValue::known)
        })
        .producing::<T>()
    }

    /// Declare the concrete type this constructor yields, so typed fields accept it
    pub fn producing<T: Any>(mut self) -> Self {
        self.produces = Some(TypeId::of::<T>());
        self
    }

    pub fn entry(&self) -> EntryMode {
        self.entry
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn produces<T: Any>(&self) -> bool {
        self.produces == Some(TypeId::of::<T>())
    }

    /// Run the constructor with the cursor on the composite's marker
    pub fn invoke(&self, decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<AnyValue> {
        match self.entry {
            EntryMode::Dispatched => {
                decoder.enter_composite()?;
                let value = (self.func)(decoder, registry)?;
                decoder.exit_composite()?;
                Ok(value)
            }
            EntryMode::SelfDescribing => (self.func)(decoder, registry),
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("entry", &self.entry)
            .field("type_name", &self.type_name)
            .finish()
    }
}

static GLOBAL: Lazy<TypeRegistry> = Lazy::new(|| TypeRegistry::with_builtins(*config::CONFIG));

/// Descriptor to constructor mapping
pub struct TypeRegistry {
    constructors: RwLock<HashMap<TypeDescriptor, Constructor>>,
    config: DecoderConfig,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            constructors: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Registry holding every standard type
    pub fn with_builtins(config: DecoderConfig) -> Self {
        let registry = Self::new(config);
        known::register_builtins(&registry);
        registry
    }

    /// Process-wide registry with the standard types, built on first use
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Insert or replace the constructor for `descriptor`; returns the replaced one
    pub fn register(
        &self,
        descriptor: impl Into<TypeDescriptor>,
        constructor: Constructor,
    ) -> Option<Constructor> {
        let descriptor = descriptor.into();
        let type_name = constructor.type_name;
        let previous = self
            .constructors
            .write()
            .insert(descriptor.clone(), constructor);

        match &previous {
            Some(old) => warn!(
                %descriptor,
                previous = old.type_name,
                replacement = type_name,
                "Descriptor registered twice, last registration wins"
            ),
            None => debug!(%descriptor, type_name, "Registered constructor"),
        }
        previous
    }

    /// Register `T` under its own descriptor
    pub fn register_type<T: Described>(&self) -> Option<Constructor> {
        self.register(T::descriptor(), Constructor::of::<T>())
    }

    /// Register `T` under an additional descriptor
    pub fn register_alias<T: Described>(
        &self,
        descriptor: impl Into<TypeDescriptor>,
    ) -> Option<Constructor> {
        self.register(descriptor, Constructor::of::<T>())
    }

    /// Constructor registered for `descriptor`; `None` is a normal outcome
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Option<Constructor> {
        self.constructors.read().get(descriptor).cloned()
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.constructors.read().contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.constructors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.read().is_empty()
    }

    /// Registered descriptors in sorted order
    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        let mut descriptors: Vec<TypeDescriptor> =
            self.constructors.read().keys().cloned().collect();
        descriptors.sort();
        descriptors
    }

    /// Whether a typed field of type `T` accepts a composite carrying `descriptor`
    pub fn accepts<T: Described>(&self, descriptor: &TypeDescriptor) -> bool {
        *descriptor == T::descriptor()
            || self
                .resolve(descriptor)
                .map_or(false, |constructor| constructor.produces::<T>())
    }

    /// Decode the composite at the cursor with the constructor for `descriptor`
    ///
    /// Unregistered descriptors are captured or rejected according to the
    /// unknown-type policy; the root slot and nested slots have separate actions.
    ///
    /// The composite at the cursor must carry `descriptor`; anything else is
    /// an `UnexpectedDescriptor` error.
    pub fn decode(
        &self,
        descriptor: &TypeDescriptor,
        decoder: &mut Decoder<'_>,
    ) -> DecodeResult<AnyValue> {
        match decoder.peek_descriptor()? {
            Some(found) if found == *descriptor => self.dispatch(descriptor, decoder),
            found => Err(DecodeError::unexpected_descriptor(
                descriptor.to_string(),
                found.map_or_else(|| "no described type".to_string(), |d| d.to_string()),
                decoder.position(),
            )),
        }
    }

    fn dispatch(
        &self,
        descriptor: &TypeDescriptor,
        decoder: &mut Decoder<'_>,
    ) -> DecodeResult<AnyValue> {
        let offset = decoder.position();
        if let Some(constructor) = self.resolve(descriptor) {
            trace!(%descriptor, offset, type_name = constructor.type_name, "Dispatching");
            return constructor.invoke(decoder, self);
        }

        let top_level = decoder.is_root_slot();
        match self.config.unknown_types.action_for(top_level) {
            UnknownTypeAction::Reject => {
                debug!(%descriptor, offset, top_level, "Rejecting unknown descriptor");
                Err(DecodeError::unknown_descriptor(descriptor.clone(), offset))
            }
            UnknownTypeAction::Capture => {
                let mut probe = decoder.clone();
                probe.begin_described()?;
                let body_offset = probe.position() - offset;

                let bytes = decoder.capture_value()?;
                debug!(
                    %descriptor,
                    offset,
                    len = bytes.len(),
                    "Captured unknown descriptor as opaque payload"
                );
                Ok(AnyValue::Opaque(OpaquePayload::new(
                    descriptor.clone(),
                    bytes.to_vec(),
                    body_offset,
                )))
            }
        }
    }

    /// Decode one polymorphic slot: null, or a described type dispatched by descriptor
    pub fn decode_slot(&self, decoder: &mut Decoder<'_>) -> DecodeResult<AnyValue> {
        if decoder.is_null() {
            decoder.read_null()?;
            return Ok(AnyValue::Null);
        }
        match decoder.peek_descriptor()? {
            Some(descriptor) => self.dispatch(&descriptor, decoder),
            None => {
                let actual = match decoder.peek_code() {
                    Some(code) => format!("format code {code:#04x}"),
                    None => "end of input".to_string(),
                };
                Err(DecodeError::structural(
                    "described type or null",
                    actual,
                    decoder.position(),
                    "polymorphic slot",
                ))
            }
        }
    }

    /// Decode a complete stream as `T`
    ///
    /// Accepts an optional serialisation preamble and an optional envelope
    /// around the object. Bytes left after the root value are an error.
    pub fn decode_root<T: Decode>(&self, bytes: &[u8]) -> DecodeResult<T> {
        let mut decoder = Decoder::with_limits(bytes, self.config.limits);
        framing::read_preamble(&mut decoder, &self.config.framing)?;

        let enveloped =
            self.config.framing.unwrap_envelope && framing::enter_envelope(&mut decoder)?;

        decoder.mark_root();
        let value = T::decode(&mut decoder, self)?;

        if enveloped {
            framing::exit_envelope(&mut decoder)?;
        }
        if !decoder.is_at_end() {
            return Err(DecodeError::structural(
                "end of input",
                format!("{} trailing bytes", decoder.remaining_bytes().len()),
                decoder.position(),
                "after root value",
            ));
        }
        Ok(value)
    }

    /// Decode a complete stream whose root type is not known in advance
    pub fn decode_any(&self, bytes: &[u8]) -> DecodeResult<AnyValue> {
        self.decode_root::<AnyValue>(bytes)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("descriptors", &self.descriptors())
            .field("config", &self.config)
            .finish()
    }
}
