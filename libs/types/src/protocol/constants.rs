//! Wire constants and AMQP format codes
//!
//! These are fundamental data types that remain in the types crate so both
//! the codec and downstream tools can name them. Decoding logic lives in codec.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Namespace prefix carried by descriptor symbols on the wire
pub const CORDA_NAMESPACE: &str = "net.corda:";

/// Magic bytes at the front of a serialised stream (`"corda"`, major 1, minor 0)
pub const SERIALIZATION_MAGIC: [u8; 7] = *b"corda\x01\x00";

/// Section id following the magic: plain data section, terminated by the stream end
pub const SECTION_DATA_AND_STOP: u8 = 0;

/// Numeric descriptor of the envelope composite wrapping the root object
pub const ENVELOPE_DESCRIPTOR: u64 = 0xc562_0000_0000_0001;

/// Length in bytes of a type fingerprint
pub const FINGERPRINT_LEN: usize = 16;

/// Size class of an encoded value, derived from the high nibble of its format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthCategory {
    /// Described type: a descriptor value followed by a body value
    Described,
    /// Fixed number of payload bytes
    Fixed(usize),
    /// Length-prefixed bytes; the prefix is 1 or 4 bytes wide
    Variable(usize),
    /// Size-prefixed list or map; the prefix is 1 or 4 bytes wide
    Compound(usize),
    /// Size-prefixed array; the prefix is 1 or 4 bytes wide
    Array(usize),
}

/// AMQP 1.0 primitive format codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum FormatCode {
    Described = 0x00,

    Null = 0x40,
    True = 0x41,
    False = 0x42,
    Uint0 = 0x43,
    Ulong0 = 0x44,
    List0 = 0x45,

    Ubyte = 0x50,
    Byte = 0x51,
    SmallUint = 0x52,
    SmallUlong = 0x53,
    SmallInt = 0x54,
    SmallLong = 0x55,
    Boolean = 0x56,

    Ushort = 0x60,
    Short = 0x61,

    Uint = 0x70,
    Int = 0x71,
    Float = 0x72,
    Char = 0x73,
    Decimal32 = 0x74,

    Ulong = 0x80,
    Long = 0x81,
    Double = 0x82,
    Timestamp = 0x83,
    Decimal64 = 0x84,

    Decimal128 = 0x94,
    Uuid = 0x98,

    Vbin8 = 0xa0,
    Str8 = 0xa1,
    Sym8 = 0xa3,

    Vbin32 = 0xb0,
    Str32 = 0xb1,
    Sym32 = 0xb3,

    List8 = 0xc0,
    Map8 = 0xc1,

    List32 = 0xd0,
    Map32 = 0xd1,

    Array8 = 0xe0,
    Array32 = 0xf0,
}

impl FormatCode {
    /// Human-readable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            FormatCode::Described => "described",
            FormatCode::Null => "null",
            FormatCode::True | FormatCode::False | FormatCode::Boolean => "boolean",
            FormatCode::Uint0 | FormatCode::SmallUint | FormatCode::Uint => "uint",
            FormatCode::Ulong0 | FormatCode::SmallUlong | FormatCode::Ulong => "ulong",
            FormatCode::List0 | FormatCode::List8 | FormatCode::List32 => "list",
            FormatCode::Ubyte => "ubyte",
            FormatCode::Byte => "byte",
            FormatCode::SmallInt | FormatCode::Int => "int",
            FormatCode::SmallLong | FormatCode::Long => "long",
            FormatCode::Ushort => "ushort",
            FormatCode::Short => "short",
            FormatCode::Float => "float",
            FormatCode::Char => "char",
            FormatCode::Decimal32 => "decimal32",
            FormatCode::Double => "double",
            FormatCode::Timestamp => "timestamp",
            FormatCode::Decimal64 => "decimal64",
            FormatCode::Decimal128 => "decimal128",
            FormatCode::Uuid => "uuid",
            FormatCode::Vbin8 | FormatCode::Vbin32 => "binary",
            FormatCode::Str8 | FormatCode::Str32 => "string",
            FormatCode::Sym8 | FormatCode::Sym32 => "symbol",
            FormatCode::Map8 | FormatCode::Map32 => "map",
            FormatCode::Array8 | FormatCode::Array32 => "array",
        }
    }

    pub fn category(self) -> WidthCategory {
        let code = u8::from(self);
        match code >> 4 {
            0x0 => WidthCategory::Described,
            0x4 => WidthCategory::Fixed(0),
            0x5 => WidthCategory::Fixed(1),
            0x6 => WidthCategory::Fixed(2),
            0x7 => WidthCategory::Fixed(4),
            0x8 => WidthCategory::Fixed(8),
            0x9 => WidthCategory::Fixed(16),
            0xa => WidthCategory::Variable(1),
            0xb => WidthCategory::Variable(4),
            0xc => WidthCategory::Compound(1),
            0xd => WidthCategory::Compound(4),
            0xe => WidthCategory::Array(1),
            _ => WidthCategory::Array(4),
        }
    }
}

impl std::fmt::Display for FormatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), u8::from(*self))
    }
}
