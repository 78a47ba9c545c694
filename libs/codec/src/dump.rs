//! Structural dump of AMQP streams
//!
//! Renders any stream as an indented tree without consulting a registry, for
//! diagnosing input that fails to decode. Each line starts with the byte
//! offset of the value it describes.

use types::{FormatCode, SECTION_DATA_AND_STOP, SERIALIZATION_MAGIC};

use crate::decoder::Decoder;
use crate::error::DecodeResult;

/// Bytes of binary payload shown before eliding
const PREVIEW_LEN: usize = 32;

/// Render every value in `bytes` as an indented tree
pub fn dump(bytes: &[u8]) -> DecodeResult<String> {
    let mut decoder = Decoder::new(bytes);
    let mut lines = Vec::new();

    if decoder.strip_prefix(&SERIALIZATION_MAGIC) {
        let section = decoder.read_raw_byte("section id")?;
        let kind = if section == SECTION_DATA_AND_STOP {
            "data"
        } else {
            "unsupported"
        };
        lines.push(format!("{:>6}  preamble, section {section} ({kind})", 0));
    }

    while !decoder.is_at_end() {
        dump_value(&mut decoder, 0, &mut lines)?;
    }
    Ok(lines.join("\n"))
}

/// Classic offset + hex rows, 16 bytes per row
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| format!("{:08x}  {}", row * 16, hex::encode(chunk)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(bytes: &[u8]) -> String {
    if bytes.len() > PREVIEW_LEN {
        format!("{}..", hex::encode(&bytes[..PREVIEW_LEN]))
    } else {
        hex::encode(bytes)
    }
}

fn dump_value(decoder: &mut Decoder<'_>, indent: usize, lines: &mut Vec<String>) -> DecodeResult<()> {
    let offset = decoder.position();
    let pad = "  ".repeat(indent);

    let format = match decoder.peek_format() {
        Some(format) => format,
        None => {
            // Surfaces the unassigned code or truncation as an error
            decoder.skip_value()?;
            return Ok(());
        }
    };

    let text = match format {
        FormatCode::Described => {
            let wire = decoder.begin_described()?;
            lines.push(format!("{offset:>6}  {pad}described {}", wire.raw));
            dump_value(decoder, indent + 1, lines)?;
            return decoder.finish_described();
        }
        FormatCode::List0 | FormatCode::List8 | FormatCode::List32 => {
            let count = decoder.enter_list()?;
            lines.push(format!("{offset:>6}  {pad}list ({count} elements)"));
            for _ in 0..count {
                dump_value(decoder, indent + 1, lines)?;
            }
            return decoder.exit_list();
        }
        FormatCode::Map8 | FormatCode::Map32 => {
            let pairs = decoder.enter_map()?;
            lines.push(format!("{offset:>6}  {pad}map ({pairs} entries)"));
            for _ in 0..pairs * 2 {
                dump_value(decoder, indent + 1, lines)?;
            }
            return decoder.exit_map();
        }
        FormatCode::Null => {
            decoder.read_null()?;
            "null".to_string()
        }
        FormatCode::True | FormatCode::False | FormatCode::Boolean => {
            format!("boolean {}", decoder.read_bool()?)
        }
        FormatCode::Ubyte => format!("ubyte {}", decoder.read_u8()?),
        FormatCode::Ushort => format!("ushort {}", decoder.read_u16()?),
        FormatCode::Uint0 | FormatCode::SmallUint | FormatCode::Uint => {
            format!("uint {}", decoder.read_u32()?)
        }
        FormatCode::Ulong0 | FormatCode::SmallUlong | FormatCode::Ulong => {
            format!("ulong {}", decoder.read_u64()?)
        }
        FormatCode::Byte => format!("byte {}", decoder.read_i8()?),
        FormatCode::Short => format!("short {}", decoder.read_i16()?),
        FormatCode::SmallInt | FormatCode::Int => format!("int {}", decoder.read_i32()?),
        FormatCode::SmallLong | FormatCode::Long => format!("long {}", decoder.read_i64()?),
        FormatCode::Float => format!("float {}", decoder.read_f32()?),
        FormatCode::Double => format!("double {}", decoder.read_f64()?),
        FormatCode::Timestamp => format!("timestamp {}ms", decoder.read_timestamp()?),
        FormatCode::Char => format!("char {:?}", decoder.read_char()?),
        FormatCode::Uuid => format!("uuid {}", hex::encode(decoder.read_uuid()?)),
        FormatCode::Vbin8 | FormatCode::Vbin32 => {
            let bytes = decoder.read_binary()?;
            format!("binary ({} bytes) {}", bytes.len(), preview(bytes))
        }
        FormatCode::Str8 | FormatCode::Str32 => format!("string {:?}", decoder.read_string()?),
        FormatCode::Sym8 | FormatCode::Sym32 => format!("symbol {}", decoder.read_symbol()?),
        FormatCode::Decimal32
        | FormatCode::Decimal64
        | FormatCode::Decimal128
        | FormatCode::Array8
        | FormatCode::Array32 => {
            let raw = decoder.capture_value()?;
            format!("{} ({} bytes) {}", format.name(), raw.len(), preview(raw))
        }
    };

    lines.push(format!("{offset:>6}  {pad}{text}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use hex_literal::hex;

    #[test]
    fn test_dump_tree() {
        // preamble, described(ulong 1, list8[str8 "a", null])
        let buf = hex!("63 6f 72 64 61 01 00 00  00 53 01 c0 05 02 a1 01 61 40");
        let rendered = dump(&buf).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("preamble, section 0 (data)"));
        assert!(lines[1].contains("described code 0x0000000000000001"));
        assert!(lines[2].contains("  list (2 elements)"));
        assert!(lines[3].contains("string \"a\""));
        assert!(lines[4].trim_start().starts_with("17"));
    }

    #[test]
    fn test_dump_reports_truncation() {
        let buf = hex!("c0 05 02 a1 01");
        assert_eq!(dump(&buf).unwrap_err().kind(), ErrorKind::StructuralMismatch);
    }

    #[test]
    fn test_hex_dump_rows() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let rendered = hex_dump(&bytes);
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "00000010  10111213");
    }
}
