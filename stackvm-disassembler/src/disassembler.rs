//! Offset-annotated diagnostics listing.

use crate::decoder::decode;
use crate::formatter::format;

/// List an image one instruction per line, raw bytes alongside.
///
/// Bytes that do not decode (data sections, reserved classes, truncated
/// tails) are listed individually with their printable-ASCII rendering;
/// the walk resumes at the next byte, so the listing always covers the
/// whole image.
pub fn dump(image: &[u8]) -> String {
    let mut out = String::new();
    let mut offset = 0;

    while offset < image.len() {
        match decode(image, offset) {
            Ok(decoded) => {
                let raw: Vec<String> = image[offset..offset + decoded.len]
                    .iter()
                    .map(|byte| format!("{byte:02x}"))
                    .collect();
                out.push_str(&format!(
                    "{offset:04x}: {:<14} {}\n",
                    raw.join(" "),
                    format(&decoded)
                ));
                offset += decoded.len;
            }
            Err(_) => {
                let byte = image[offset];
                let rendered = if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                };
                out.push_str(&format!("{offset:04x}: {byte:02x} '{rendered}'\n"));
                offset += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_spec::{Opcode, Word};

    #[test]
    fn test_dump_instructions() {
        let mut image = vec![Opcode::Loadi.to_u8()];
        image.extend_from_slice(&Word::to_ne_bytes(5));
        image.push(Opcode::Halt.to_u8());

        let listing = dump(&image);
        assert!(listing.contains("0000:"));
        assert!(listing.contains("loadi 0x5"));
        assert!(listing.contains("halt"));
    }

    #[test]
    fn test_dump_renders_data_bytes() {
        let listing = dump(b"\x3fHi\x01\xff");
        // 'H' = 0x48 and 'i' = 0x69 are unassigned selectors and list as data.
        assert!(listing.contains("'H'"));
        assert!(listing.contains("'i'"));
        assert!(listing.contains("ff '.'"));
    }

    #[test]
    fn test_dump_covers_truncated_tail() {
        // LOADI with only two operand bytes left.
        let image = [Opcode::Loadi.to_u8(), 0x41, 0x42];
        let listing = dump(&image);
        assert_eq!(listing.lines().count(), 3);
        assert!(listing.contains("'A'"));
        assert!(listing.contains("'B'"));
    }

    #[test]
    fn test_dump_empty_image() {
        assert_eq!(dump(&[]), "");
    }
}
