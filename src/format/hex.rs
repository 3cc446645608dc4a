//! # Hex-dump formatting.

use crate::sformat;

/// Formats `data` as an uppercase hex dump with string indent/separator.
///
/// - Every line starts with `indent` and carries up to `bytes_per_line`
///   bytes, separated by `separator` (no separator before the first byte of
///   a line).
/// - Lines are joined with a single `\n`; there is no trailing newline.
/// - `bytes_per_line == 0` keeps everything on one line.
///
/// ```rust
/// use crosscall::format::format_hex_with;
///
/// let dump = format_hex_with(&[0x00, 0x01, 0xFF], " > ", "-", 2);
/// assert_eq!(dump, " > 00-01\n > FF");
/// ```
pub fn format_hex_with(data: &[u8], indent: &str, separator: &str, bytes_per_line: usize) -> String {
    let per_line = if bytes_per_line == 0 {
        usize::MAX
    } else {
        bytes_per_line
    };
    let mut out = String::new();
    for (i, byte) in data.iter().enumerate() {
        if i % per_line == 0 {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(indent);
        } else {
            out.push_str(separator);
        }
        out.push_str(&sformat!("%02X", *byte));
    }
    out
}

/// Formats `data` as an uppercase hex dump, indenting and separating with
/// the given numbers of spaces.
///
/// Shorthand for [`format_hex_with`] with space strings.
///
/// ```rust
/// use crosscall::format::format_hex;
///
/// let dump = format_hex(&[0x0A, 0x0B], 2, 1, 8);
/// assert_eq!(dump, "  0A 0B");
/// ```
pub fn format_hex(data: &[u8], indent: usize, separator: usize, bytes_per_line: usize) -> String {
    format_hex_with(data, &" ".repeat(indent), &" ".repeat(separator), bytes_per_line)
}
