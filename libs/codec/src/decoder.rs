//! # Decoder Cursor
//!
//! ## Purpose
//!
//! Stateful, synchronous reader over an in-memory AMQP 1.0 encoded buffer.
//! Known-type constructors read their fields through this cursor in declared
//! wire order; the registry uses it to peek descriptors and to capture the
//! raw bytes of composites nobody can decode.
//!
//! ## Frames
//!
//! Every container the cursor enters pushes a frame:
//!
//! | Frame | Opened by | Declared end | Element count |
//! |-------|-----------|--------------|---------------|
//! | Described | [`Decoder::begin_described`] | inherited | 1 (the body) |
//! | List | [`Decoder::enter_list`] | from size prefix | from count prefix |
//! | Map | [`Decoder::enter_map`] | from size prefix | from count prefix |
//!
//! Each value read claims one element of the innermost frame; reads past the
//! declared count or past the declared end are structural errors. Exiting a
//! frame checks that every declared element was read and that the position
//! sits exactly on the declared end.
//!
//! ## Width Widening
//!
//! A reader of width W accepts the compact encodings AMQP defines for it
//! (`uint0`, `smalluint`, `smalllong`, ...) and nothing else: a `read_i32`
//! never accepts a `long`, and a `read_u32` never accepts an `int`.

use config::DecodeLimits;
use types::{FormatCode, TypeDescriptor, WidthCategory};

use crate::error::{DecodeError, DecodeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Described,
    List,
    Map,
}

impl FrameKind {
    fn name(self) -> &'static str {
        match self {
            FrameKind::Described => "described type",
            FrameKind::List => "list",
            FrameKind::Map => "map",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    start: usize,
    end: Option<usize>,
    count: usize,
    consumed: usize,
}

/// Descriptor value exactly as it was encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDescriptor<'a> {
    Symbol(&'a str),
    Code(u64),
}

impl RawDescriptor<'_> {
    pub fn to_descriptor(&self) -> TypeDescriptor {
        match self {
            RawDescriptor::Symbol(symbol) => TypeDescriptor::from_wire_symbol(symbol),
            RawDescriptor::Code(code) => TypeDescriptor::Code(*code),
        }
    }
}

impl std::fmt::Display for RawDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawDescriptor::Symbol(symbol) => write!(f, "symbol '{symbol}'"),
            RawDescriptor::Code(code) => write!(f, "code {code:#018x}"),
        }
    }
}

/// Descriptor consumed by [`Decoder::begin_described`], with the offset of its marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireDescriptor<'a> {
    pub raw: RawDescriptor<'a>,
    pub offset: usize,
}

impl WireDescriptor<'_> {
    pub fn descriptor(&self) -> TypeDescriptor {
        self.raw.to_descriptor()
    }

    /// Require the descriptor to be exactly the symbol `expected`
    ///
    /// No namespace normalisation: `net.corda:a.B` and `a.B` are different
    /// symbols here, unlike in registry lookup.
    pub fn expect_symbol(&self, expected: &str) -> DecodeResult<()> {
        if self.raw == RawDescriptor::Symbol(expected) {
            Ok(())
        } else {
            Err(DecodeError::unexpected_descriptor(
                format!("symbol '{expected}'"),
                self.raw.to_string(),
                self.offset,
            ))
        }
    }
}

/// Cursor over an AMQP encoded buffer
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    frames: Vec<Frame>,
    limits: DecodeLimits,
    root: Option<(usize, usize)>,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, DecodeLimits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            buf,
            pos: 0,
            frames: Vec::new(),
            limits,
            root: None,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Elements left to read in the innermost frame
    pub fn remaining(&self) -> usize {
        match self.frames.last() {
            Some(frame) => frame.count - frame.consumed,
            None => usize::from(!self.is_at_end()),
        }
    }

    /// Record the current position as the root value slot
    pub fn mark_root(&mut self) {
        self.root = Some((self.frames.len(), self.pos));
    }

    /// True when the cursor sits on the slot recorded by [`Decoder::mark_root`]
    pub fn is_root_slot(&self) -> bool {
        self.root == Some((self.frames.len(), self.pos))
    }

    // ------------------------------------------------------------------
    // Raw access
    // ------------------------------------------------------------------

    /// Consume `prefix` if the input continues with it; only valid outside any frame
    pub fn strip_prefix(&mut self, prefix: &[u8]) -> bool {
        if self.frames.is_empty() && self.remaining_bytes().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Read one byte that is not an AMQP value (framing bytes)
    pub fn read_raw_byte(&mut self, what: &str) -> DecodeResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub fn peek_code(&self) -> Option<u8> {
        if self.pos < self.bound() {
            self.buf.get(self.pos).copied()
        } else {
            None
        }
    }

    pub fn peek_format(&self) -> Option<FormatCode> {
        self.peek_code()
            .and_then(|code| FormatCode::try_from(code).ok())
    }

    pub fn is_null(&self) -> bool {
        self.peek_code() == Some(u8::from(FormatCode::Null))
    }

    /// Descriptor of the next value without consuming anything
    ///
    /// `Ok(None)` when the next value is not a described type.
    pub fn peek_descriptor(&self) -> DecodeResult<Option<TypeDescriptor>> {
        if self.peek_code() != Some(u8::from(FormatCode::Described)) {
            return Ok(None);
        }
        let mut probe = self.clone();
        probe.pos += 1;
        probe.read_raw_descriptor().map(|raw| Some(raw.to_descriptor()))
    }

    fn bound(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.end)
            .unwrap_or(self.buf.len())
    }

    fn take(&mut self, n: usize, what: &str) -> DecodeResult<&'a [u8]> {
        let bound = self.bound();
        let available = bound.saturating_sub(self.pos);
        if n > available {
            return Err(DecodeError::truncated(what, n, available, self.pos));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn fixed<const N: usize>(&mut self, what: &str) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn read_width(&mut self, width: usize, what: &str) -> DecodeResult<usize> {
        if width == 1 {
            Ok(usize::from(self.take(1, what)?[0]))
        } else {
            Ok(u32::from_be_bytes(self.fixed::<4>(what)?) as usize)
        }
    }

    /// Account for one value in the innermost frame
    fn claim(&mut self, what: &str) -> DecodeResult<()> {
        let pos = self.pos;
        if let Some(frame) = self.frames.last_mut() {
            if frame.consumed >= frame.count {
                return Err(DecodeError::structural(
                    format!("end of {}", frame.kind.name()),
                    format!("another {what} (all {} elements consumed)", frame.count),
                    pos,
                    "element count exhausted",
                ));
            }
            frame.consumed += 1;
        }
        Ok(())
    }

    fn format_at_cursor(&mut self, what: &str) -> DecodeResult<(FormatCode, usize)> {
        let offset = self.pos;
        let code = self.take(1, what)?[0];
        FormatCode::try_from(code)
            .map(|format| (format, offset))
            .map_err(|_| DecodeError::wrong_format(what, code, offset))
    }

    fn read_format(&mut self, what: &str) -> DecodeResult<(FormatCode, usize)> {
        self.claim(what)?;
        self.format_at_cursor(what)
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn read_null(&mut self) -> DecodeResult<()> {
        match self.read_format("null")? {
            (FormatCode::Null, _) => Ok(()),
            (other, offset) => Err(DecodeError::wrong_format("null", other.into(), offset)),
        }
    }

    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        match self.read_format("boolean")? {
            (FormatCode::True, _) => Ok(true),
            (FormatCode::False, _) => Ok(false),
            (FormatCode::Boolean, offset) => match self.take(1, "boolean")?[0] {
                0x00 => Ok(false),
                0x01 => Ok(true),
                other => Err(DecodeError::structural(
                    "boolean byte 0x00 or 0x01",
                    format!("{other:#04x}"),
                    offset + 1,
                    "boolean payload",
                )),
            },
            (other, offset) => Err(DecodeError::wrong_format("boolean", other.into(), offset)),
        }
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        match self.read_format("ubyte")? {
            (FormatCode::Ubyte, _) => Ok(self.fixed::<1>("ubyte")?[0]),
            (other, offset) => Err(DecodeError::wrong_format("ubyte", other.into(), offset)),
        }
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        match self.read_format("ushort")? {
            (FormatCode::Ushort, _) => Ok(u16::from_be_bytes(self.fixed("ushort")?)),
            (other, offset) => Err(DecodeError::wrong_format("ushort", other.into(), offset)),
        }
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        match self.read_format("uint")? {
            (FormatCode::Uint, _) => Ok(u32::from_be_bytes(self.fixed("uint")?)),
            (FormatCode::SmallUint, _) => Ok(u32::from(self.fixed::<1>("uint")?[0])),
            (FormatCode::Uint0, _) => Ok(0),
            (other, offset) => Err(DecodeError::wrong_format("uint", other.into(), offset)),
        }
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        let (format, offset) = self.read_format("ulong")?;
        self.ulong_body(format, offset)
    }

    fn ulong_body(&mut self, format: FormatCode, offset: usize) -> DecodeResult<u64> {
        match format {
            FormatCode::Ulong => Ok(u64::from_be_bytes(self.fixed("ulong")?)),
            FormatCode::SmallUlong => Ok(u64::from(self.fixed::<1>("ulong")?[0])),
            FormatCode::Ulong0 => Ok(0),
            other => Err(DecodeError::wrong_format("ulong", other.into(), offset)),
        }
    }

    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        match self.read_format("byte")? {
            (FormatCode::Byte, _) => Ok(i8::from_be_bytes(self.fixed("byte")?)),
            (other, offset) => Err(DecodeError::wrong_format("byte", other.into(), offset)),
        }
    }

    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        match self.read_format("short")? {
            (FormatCode::Short, _) => Ok(i16::from_be_bytes(self.fixed("short")?)),
            (other, offset) => Err(DecodeError::wrong_format("short", other.into(), offset)),
        }
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        match self.read_format("int")? {
            (FormatCode::Int, _) => Ok(i32::from_be_bytes(self.fixed("int")?)),
            (FormatCode::SmallInt, _) => Ok(i32::from(i8::from_be_bytes(self.fixed("int")?))),
            (other, offset) => Err(DecodeError::wrong_format("int", other.into(), offset)),
        }
    }

    pub fn read_i64(&mut self) -> DecodeResult<i64> {
        match self.read_format("long")? {
            (FormatCode::Long, _) => Ok(i64::from_be_bytes(self.fixed("long")?)),
            (FormatCode::SmallLong, _) => Ok(i64::from(i8::from_be_bytes(self.fixed("long")?))),
            (other, offset) => Err(DecodeError::wrong_format("long", other.into(), offset)),
        }
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        match self.read_format("float")? {
            (FormatCode::Float, _) => Ok(f32::from_be_bytes(self.fixed("float")?)),
            (other, offset) => Err(DecodeError::wrong_format("float", other.into(), offset)),
        }
    }

    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        match self.read_format("double")? {
            (FormatCode::Double, _) => Ok(f64::from_be_bytes(self.fixed("double")?)),
            (other, offset) => Err(DecodeError::wrong_format("double", other.into(), offset)),
        }
    }

    /// Milliseconds since the Unix epoch
    pub fn read_timestamp(&mut self) -> DecodeResult<i64> {
        match self.read_format("timestamp")? {
            (FormatCode::Timestamp, _) => Ok(i64::from_be_bytes(self.fixed("timestamp")?)),
            (other, offset) => Err(DecodeError::wrong_format("timestamp", other.into(), offset)),
        }
    }

    pub fn read_char(&mut self) -> DecodeResult<char> {
        match self.read_format("char")? {
            (FormatCode::Char, offset) => {
                let scalar = u32::from_be_bytes(self.fixed("char")?);
                char::from_u32(scalar).ok_or_else(|| {
                    DecodeError::structural(
                        "Unicode scalar value",
                        format!("{scalar:#x}"),
                        offset + 1,
                        "char payload",
                    )
                })
            }
            (other, offset) => Err(DecodeError::wrong_format("char", other.into(), offset)),
        }
    }

    pub fn read_uuid(&mut self) -> DecodeResult<[u8; 16]> {
        match self.read_format("uuid")? {
            (FormatCode::Uuid, _) => self.fixed("uuid"),
            (other, offset) => Err(DecodeError::wrong_format("uuid", other.into(), offset)),
        }
    }

    fn variable(
        &mut self,
        what: &str,
        short: FormatCode,
        long: FormatCode,
    ) -> DecodeResult<(&'a [u8], usize)> {
        let (format, offset) = self.read_format(what)?;
        let len = if format == short {
            self.read_width(1, what)?
        } else if format == long {
            self.read_width(4, what)?
        } else {
            return Err(DecodeError::wrong_format(what, format.into(), offset));
        };
        Ok((self.take(len, what)?, offset))
    }

    pub fn read_binary(&mut self) -> DecodeResult<&'a [u8]> {
        self.variable("binary", FormatCode::Vbin8, FormatCode::Vbin32)
            .map(|(bytes, _)| bytes)
    }

    pub fn read_string(&mut self) -> DecodeResult<&'a str> {
        let (bytes, offset) = self.variable("string", FormatCode::Str8, FormatCode::Str32)?;
        utf8(bytes, "string", offset)
    }

    pub fn read_symbol(&mut self) -> DecodeResult<&'a str> {
        let (bytes, offset) = self.variable("symbol", FormatCode::Sym8, FormatCode::Sym32)?;
        utf8(bytes, "symbol", offset)
    }

    // ------------------------------------------------------------------
    // Described types
    // ------------------------------------------------------------------

    fn read_raw_descriptor(&mut self) -> DecodeResult<RawDescriptor<'a>> {
        let (format, offset) = self.format_at_cursor("descriptor")?;
        match format {
            FormatCode::Sym8 | FormatCode::Sym32 => {
                let len = self.read_width(if format == FormatCode::Sym8 { 1 } else { 4 }, "symbol")?;
                let bytes = self.take(len, "symbol")?;
                utf8(bytes, "symbol", offset).map(RawDescriptor::Symbol)
            }
            FormatCode::Ulong | FormatCode::SmallUlong | FormatCode::Ulong0 => {
                self.ulong_body(format, offset).map(RawDescriptor::Code)
            }
            other => Err(DecodeError::wrong_format(
                "descriptor (symbol or ulong)",
                other.into(),
                offset,
            )),
        }
    }

    /// Consume a described-type marker and its descriptor; the body is next
    pub fn begin_described(&mut self) -> DecodeResult<WireDescriptor<'a>> {
        let (format, offset) = self.read_format("described type")?;
        if format != FormatCode::Described {
            return Err(DecodeError::wrong_format("described type", format.into(), offset));
        }
        let raw = self.read_raw_descriptor()?;
        self.push_frame(FrameKind::Described, offset, None, 1)?;
        Ok(WireDescriptor { raw, offset })
    }

    /// Close a described type opened with [`Decoder::begin_described`]
    pub fn finish_described(&mut self) -> DecodeResult<()> {
        self.pop_frame(FrameKind::Described).map(|_| ())
    }

    /// Begin a described type whose descriptor must name `expected`
    pub fn expect_symbol(&mut self, expected: &str) -> DecodeResult<WireDescriptor<'a>> {
        let wire = self.begin_described()?;
        wire.expect_symbol(expected)?;
        Ok(wire)
    }

    /// Enter a composite: described-type marker, descriptor, then the body list
    pub fn enter_composite(&mut self) -> DecodeResult<TypeDescriptor> {
        let wire = self.begin_described()?;
        self.enter_list()?;
        Ok(wire.descriptor())
    }

    /// Leave a composite, validating its list boundary and element count
    pub fn exit_composite(&mut self) -> DecodeResult<()> {
        self.exit_list()?;
        self.finish_described()
    }

    // ------------------------------------------------------------------
    // Lists and maps
    // ------------------------------------------------------------------

    /// Enter a list and return its element count
    pub fn enter_list(&mut self) -> DecodeResult<usize> {
        let (format, offset) = self.read_format("list")?;
        let (end, count) = match format {
            FormatCode::List0 => (self.pos, 0),
            FormatCode::List8 => self.compound_header(1, "list")?,
            FormatCode::List32 => self.compound_header(4, "list")?,
            other => return Err(DecodeError::wrong_format("list", other.into(), offset)),
        };
        self.push_frame(FrameKind::List, offset, Some(end), count)?;
        Ok(count)
    }

    pub fn exit_list(&mut self) -> DecodeResult<()> {
        self.pop_frame(FrameKind::List).map(|_| ())
    }

    /// Enter a map and return its number of key/value pairs
    pub fn enter_map(&mut self) -> DecodeResult<usize> {
        let (format, offset) = self.read_format("map")?;
        let (end, count) = match format {
            FormatCode::Map8 => self.compound_header(1, "map")?,
            FormatCode::Map32 => self.compound_header(4, "map")?,
            other => return Err(DecodeError::wrong_format("map", other.into(), offset)),
        };
        if count % 2 != 0 {
            return Err(DecodeError::structural(
                "even map element count",
                count.to_string(),
                offset,
                "map header",
            ));
        }
        self.push_frame(FrameKind::Map, offset, Some(end), count)?;
        Ok(count / 2)
    }

    pub fn exit_map(&mut self) -> DecodeResult<()> {
        self.pop_frame(FrameKind::Map).map(|_| ())
    }

    /// Read size and count prefixes; returns (declared end, element count)
    fn compound_header(&mut self, width: usize, what: &str) -> DecodeResult<(usize, usize)> {
        let size_offset = self.pos;
        let size = self.read_width(width, what)?;
        let body_start = self.pos;

        if size < width {
            return Err(DecodeError::structural(
                format!("{what} size of at least {width}"),
                size.to_string(),
                size_offset,
                "size must cover the count field",
            ));
        }
        let available = self.bound().saturating_sub(body_start);
        if size > available {
            return Err(DecodeError::truncated(what, size, available, body_start));
        }

        let end = body_start + size;
        let count = self.read_width(width, what)?;
        if count > self.limits.max_collection_len {
            return Err(DecodeError::limit_exceeded(
                "collection length",
                count,
                self.limits.max_collection_len,
                size_offset,
            ));
        }
        // Every element occupies at least one byte
        if count > end - self.pos {
            return Err(DecodeError::structural(
                format!("{what} body holding {count} elements"),
                format!("{} bytes", end - self.pos),
                size_offset,
                "element count exceeds declared size",
            ));
        }
        Ok((end, count))
    }

    fn push_frame(
        &mut self,
        kind: FrameKind,
        start: usize,
        end: Option<usize>,
        count: usize,
    ) -> DecodeResult<()> {
        if self.frames.len() >= self.limits.max_depth {
            return Err(DecodeError::limit_exceeded(
                "nesting depth",
                self.frames.len() + 1,
                self.limits.max_depth,
                start,
            ));
        }
        self.frames.push(Frame {
            kind,
            start,
            end,
            count,
            consumed: 0,
        });
        Ok(())
    }

    fn pop_frame(&mut self, kind: FrameKind) -> DecodeResult<Frame> {
        let frame = match self.frames.last() {
            Some(frame) if frame.kind == kind => *frame,
            Some(frame) => {
                return Err(DecodeError::structural(
                    format!("open {}", kind.name()),
                    format!("open {} started at offset {}", frame.kind.name(), frame.start),
                    self.pos,
                    "unbalanced exit",
                ))
            }
            None => {
                return Err(DecodeError::structural(
                    format!("open {}", kind.name()),
                    "no open container",
                    self.pos,
                    "unbalanced exit",
                ))
            }
        };

        if frame.consumed != frame.count {
            return Err(DecodeError::structural(
                format!("{} elements read", frame.count),
                format!("{} elements read", frame.consumed),
                self.pos,
                format!("exit of {} started at offset {}", kind.name(), frame.start),
            ));
        }
        if let Some(end) = frame.end {
            if self.pos != end {
                return Err(DecodeError::structural(
                    format!("position {end}"),
                    format!("position {}", self.pos),
                    self.pos,
                    format!("exit of {} started at offset {}", kind.name(), frame.start),
                ));
            }
        }

        self.frames.pop();
        Ok(frame)
    }

    // ------------------------------------------------------------------
    // Capture and skip
    // ------------------------------------------------------------------

    /// Raw bytes of the next complete value, without decoding it
    pub fn capture_value(&mut self) -> DecodeResult<&'a [u8]> {
        let start = self.pos;
        self.skip_value()?;
        Ok(&self.buf[start..self.pos])
    }

    /// Advance past the next complete value
    pub fn skip_value(&mut self) -> DecodeResult<()> {
        self.claim("value")?;
        self.skip_raw(self.frames.len())
    }

    fn skip_raw(&mut self, depth: usize) -> DecodeResult<()> {
        let (format, offset) = self.format_at_cursor("value")?;
        match format.category() {
            WidthCategory::Described => {
                if depth >= self.limits.max_depth {
                    return Err(DecodeError::limit_exceeded(
                        "nesting depth",
                        depth + 1,
                        self.limits.max_depth,
                        offset,
                    ));
                }
                self.skip_raw(depth + 1)?;
                self.skip_raw(depth + 1)
            }
            WidthCategory::Fixed(n) => self.take(n, format.name()).map(|_| ()),
            WidthCategory::Variable(width)
            | WidthCategory::Compound(width)
            | WidthCategory::Array(width) => {
                let len = self.read_width(width, format.name())?;
                self.take(len, format.name()).map(|_| ())
            }
        }
    }
}

fn utf8<'a>(bytes: &'a [u8], what: &str, offset: usize) -> DecodeResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| {
        DecodeError::structural(
            format!("UTF-8 {what}"),
            format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            offset,
            format!("{what} payload"),
        )
    })
}
