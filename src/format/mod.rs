//! # Printf-style string formatting.
//!
//! Rust's `format!` takes `{}` templates; the rest of this crate (logging
//! macros, transport errors) speaks classic `%`-conversions instead, so this
//! module provides a small printf engine plus a hex-dump helper:
//!
//! - [`vformat`] renders a `%`-format string against a slice of
//!   [`FormatArg`] values (the variadic-argument stand-in).
//! - [`sformat!`](crate::sformat) is the variadic front end.
//! - [`format_hex`] / [`format_hex_with`] render byte slices as aligned
//!   uppercase hex dumps.
//!
//! ## Example
//! ```rust
//! use crosscall::sformat;
//!
//! let s = sformat!("TEST %d %u %.3f %s %c", -1, 5000u32, 4.2, "STR", 'X');
//! assert_eq!(s, "TEST -1 5000 4.200 STR X");
//! ```

mod hex;
mod printf;

pub use hex::{format_hex, format_hex_with};
pub use printf::{vformat, FormatArg};

/// Formats a printf-style template with the given arguments.
///
/// Expands to a [`vformat`](crate::format::vformat) call; each argument is
/// converted through [`FormatArg::from`](crate::format::FormatArg).
///
/// ```rust
/// use crosscall::sformat;
///
/// assert_eq!(sformat!("%04X", 0xABu32), "00AB");
/// assert_eq!(sformat!("no args"), "no args");
/// ```
#[macro_export]
macro_rules! sformat {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format::vformat($fmt, &[$($crate::format::FormatArg::from($arg)),*])
    };
}
