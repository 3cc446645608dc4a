//! # Printf conversion engine.
//!
//! Supports `%[flags][width][.precision][length]conversion` with:
//! - flags `-`, `+`, ` `, `0`, `#`
//! - width and precision, literal or `*` (taken from the argument list)
//! - length modifiers `h`, `l`, `L`, `z`, `j`, `t` (accepted and ignored;
//!   all integers travel as 64-bit values)
//! - conversions `d i u f F e E g G x X o c s p %`
//!
//! ## Rules
//! - An unknown conversion, or a conversion with no argument left, renders
//!   the specifier text literally instead of panicking.
//! - `%%` is a literal percent and consumes no argument.

/// A single formatting argument.
///
/// The variadic-call stand-in: callers build a `&[FormatArg]` (usually via
/// [`sformat!`](crate::sformat)) and every conversion pulls the next value,
/// coercing it to whatever the conversion needs.
#[derive(Clone, Debug)]
pub enum FormatArg {
    /// Signed integers (`%d`, `%i`).
    Int(i64),
    /// Unsigned integers (`%u`, `%x`, `%X`, `%o`, `%p`).
    Uint(u64),
    /// Floating point (`%f`, `%e`, `%g` families).
    Float(f64),
    /// Single character (`%c`).
    Char(char),
    /// String (`%s`).
    Str(String),
}

macro_rules! arg_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg {
            fn from(value: $t) -> Self {
                FormatArg::Int(value as i64)
            }
        })*
    };
}

macro_rules! arg_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg {
            fn from(value: $t) -> Self {
                FormatArg::Uint(value as u64)
            }
        })*
    };
}

arg_from_int!(i8, i16, i32, i64, isize);
arg_from_uint!(u8, u16, u32, u64, usize);

impl From<f32> for FormatArg {
    fn from(value: f32) -> Self {
        FormatArg::Float(f64::from(value))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl From<char> for FormatArg {
    fn from(value: char) -> Self {
        FormatArg::Char(value)
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Str(value.to_owned())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Str(value)
    }
}

impl From<&String> for FormatArg {
    fn from(value: &String) -> Self {
        FormatArg::Str(value.clone())
    }
}

impl FormatArg {
    fn as_i64(&self) -> i64 {
        match self {
            FormatArg::Int(v) => *v,
            FormatArg::Uint(v) => *v as i64,
            FormatArg::Float(v) => *v as i64,
            FormatArg::Char(c) => *c as i64,
            FormatArg::Str(_) => 0,
        }
    }

    fn as_u64(&self) -> u64 {
        match self {
            FormatArg::Int(v) => *v as u64,
            FormatArg::Uint(v) => *v,
            FormatArg::Float(v) => *v as u64,
            FormatArg::Char(c) => *c as u64,
            FormatArg::Str(_) => 0,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            FormatArg::Int(v) => *v as f64,
            FormatArg::Uint(v) => *v as f64,
            FormatArg::Float(v) => *v,
            FormatArg::Char(c) => *c as u32 as f64,
            FormatArg::Str(_) => 0.0,
        }
    }

    fn as_string(&self) -> String {
        match self {
            FormatArg::Int(v) => v.to_string(),
            FormatArg::Uint(v) => v.to_string(),
            FormatArg::Float(v) => v.to_string(),
            FormatArg::Char(c) => c.to_string(),
            FormatArg::Str(s) => s.clone(),
        }
    }
}

#[derive(Clone, Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: usize,
    precision: Option<usize>,
}

/// Renders `fmt` against `args` with printf semantics.
///
/// Prefer the [`sformat!`](crate::sformat) macro, which builds the argument
/// slice from plain Rust values.
pub fn vformat(fmt: &str, args: &[FormatArg]) -> String {
    let bytes = fmt.as_bytes();
    let mut out = String::with_capacity(fmt.len() + 16);
    let mut i = 0;
    let mut next_arg = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            let run = i;
            while i < bytes.len() && bytes[i] != b'%' {
                i += 1;
            }
            out.push_str(&fmt[run..i]);
            continue;
        }

        let spec_start = i;
        i += 1;
        if i >= bytes.len() {
            out.push('%');
            break;
        }
        if bytes[i] == b'%' {
            out.push('%');
            i += 1;
            continue;
        }

        let mut spec = Spec::default();
        let mut starved = false;

        while i < bytes.len() {
            match bytes[i] {
                b'-' => spec.left = true,
                b'+' => spec.plus = true,
                b' ' => spec.space = true,
                b'0' => spec.zero = true,
                b'#' => spec.alt = true,
                _ => break,
            }
            i += 1;
        }

        if i < bytes.len() && bytes[i] == b'*' {
            i += 1;
            match take(args, &mut next_arg) {
                Some(arg) => {
                    let w = arg.as_i64();
                    if w < 0 {
                        spec.left = true;
                        spec.width = w.unsigned_abs() as usize;
                    } else {
                        spec.width = w as usize;
                    }
                }
                None => starved = true,
            }
        } else {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                spec.width = spec.width * 10 + usize::from(bytes[i] - b'0');
                i += 1;
            }
        }

        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            if i < bytes.len() && bytes[i] == b'*' {
                i += 1;
                match take(args, &mut next_arg) {
                    Some(arg) => {
                        let p = arg.as_i64();
                        // A negative * precision means "no precision" in C.
                        spec.precision = (p >= 0).then_some(p as usize);
                    }
                    None => starved = true,
                }
            } else {
                let mut p = 0;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    p = p * 10 + usize::from(bytes[i] - b'0');
                    i += 1;
                }
                spec.precision = Some(p);
            }
        }

        while i < bytes.len() && matches!(bytes[i], b'h' | b'l' | b'L' | b'z' | b'j' | b't') {
            i += 1;
        }

        if i >= bytes.len() {
            out.push_str(&fmt[spec_start..]);
            break;
        }

        let conversion = match fmt[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        i += conversion.len_utf8();

        let rendered = if starved {
            None
        } else {
            render(conversion, &spec, args, &mut next_arg)
        };
        match rendered {
            Some(text) => out.push_str(&text),
            None => out.push_str(&fmt[spec_start..i]),
        }
    }

    out
}

fn take<'a>(args: &'a [FormatArg], next: &mut usize) -> Option<&'a FormatArg> {
    let arg = args.get(*next)?;
    *next += 1;
    Some(arg)
}

fn render(
    conversion: char,
    spec: &Spec,
    args: &[FormatArg],
    next: &mut usize,
) -> Option<String> {
    let arg = take(args, next)?;
    let text = match conversion {
        'd' | 'i' => {
            let v = arg.as_i64();
            pad_number(spec, sign_prefix(spec, v < 0), &digits(v.unsigned_abs(), 10, false), true)
        }
        'u' => pad_number(spec, "", &digits(arg.as_u64(), 10, false), true),
        'x' => prefixed(spec, arg.as_u64(), 16, false, "0x"),
        'X' => prefixed(spec, arg.as_u64(), 16, true, "0X"),
        'o' => prefixed(spec, arg.as_u64(), 8, false, "0"),
        'p' => pad_number(spec, "0x", &digits(arg.as_u64(), 16, false), false),
        'f' | 'F' => float_fixed(spec, arg.as_f64()),
        'e' | 'E' => float_exponent(spec, arg.as_f64(), conversion == 'E'),
        'g' | 'G' => float_general(spec, arg.as_f64(), conversion == 'G'),
        'c' => {
            let body = match arg {
                FormatArg::Str(s) => s.chars().next().map(String::from).unwrap_or_default(),
                FormatArg::Char(c) => c.to_string(),
                other => char::from_u32(other.as_u64() as u32)
                    .map(String::from)
                    .unwrap_or_default(),
            };
            pad_text(spec, body)
        }
        's' => {
            let mut body = arg.as_string();
            if let Some(p) = spec.precision {
                body = body.chars().take(p).collect();
            }
            pad_text(spec, body)
        }
        _ => {
            // Unknown conversion: give the argument back and print literally.
            *next -= 1;
            return None;
        }
    };
    Some(text)
}

fn digits(value: u64, base: u64, upper: bool) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut buf = Vec::new();
    let mut v = value;
    while v > 0 {
        buf.push(table[(v % base) as usize]);
        v /= base;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

fn sign_prefix(spec: &Spec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn prefixed(spec: &Spec, value: u64, base: u64, upper: bool, alt_prefix: &str) -> String {
    // The alternate-form prefix only applies to nonzero values, as in C.
    let prefix = if spec.alt && value != 0 { alt_prefix } else { "" };
    pad_number(spec, prefix, &digits(value, base, upper), true)
}

/// Assembles `prefix` + zero-extended digits, then applies width padding.
///
/// `min_digits` (the precision) disables zero-flag padding, as in C.
fn pad_number(spec: &Spec, prefix: &str, body: &str, precision_is_digits: bool) -> String {
    let mut body = body.to_owned();
    if precision_is_digits {
        if let Some(p) = spec.precision {
            if body.len() < p {
                body = "0".repeat(p - body.len()) + &body;
            }
        }
    }
    let content = prefix.len() + body.len();
    if spec.width <= content {
        return format!("{prefix}{body}");
    }
    let fill = spec.width - content;
    if spec.left {
        format!("{prefix}{body}{}", " ".repeat(fill))
    } else if spec.zero && (spec.precision.is_none() || !precision_is_digits) {
        format!("{prefix}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{prefix}{body}", " ".repeat(fill))
    }
}

fn pad_text(spec: &Spec, body: String) -> String {
    if spec.width <= body.chars().count() {
        return body;
    }
    let fill = " ".repeat(spec.width - body.chars().count());
    if spec.left {
        body + &fill
    } else {
        fill + &body
    }
}

fn float_fixed(spec: &Spec, value: f64) -> String {
    if !value.is_finite() {
        return pad_text(spec, nonfinite(value));
    }
    let precision = spec.precision.unwrap_or(6);
    let body = format!("{:.*}", precision, value.abs());
    let no_min_digits = Spec {
        precision: None,
        ..spec.clone()
    };
    pad_number(&no_min_digits, sign_prefix(spec, value.is_sign_negative()), &body, true)
}

fn float_exponent(spec: &Spec, value: f64, upper: bool) -> String {
    if !value.is_finite() {
        return pad_text(spec, nonfinite(value));
    }
    let precision = spec.precision.unwrap_or(6);
    let body = exponent_body(value.abs(), precision, upper);
    let no_min_digits = Spec {
        precision: None,
        ..spec.clone()
    };
    pad_number(&no_min_digits, sign_prefix(spec, value.is_sign_negative()), &body, true)
}

fn float_general(spec: &Spec, value: f64, upper: bool) -> String {
    if !value.is_finite() {
        return pad_text(spec, nonfinite(value));
    }
    let significant = spec.precision.unwrap_or(6).max(1);
    let abs = value.abs();
    let exp = decimal_exponent(abs);
    let body = if exp >= -4 && (exp as i64) < significant as i64 {
        let decimals = (significant as i64 - 1 - exp as i64).max(0) as usize;
        strip_zeros(format!("{:.*}", decimals, abs))
    } else {
        let raw = exponent_body(abs, significant - 1, upper);
        let marker = if upper { 'E' } else { 'e' };
        match raw.split_once(marker) {
            Some((mantissa, exponent)) => {
                format!("{}{marker}{exponent}", strip_zeros(mantissa.to_owned()))
            }
            None => raw,
        }
    };
    let no_min_digits = Spec {
        precision: None,
        ..spec.clone()
    };
    pad_number(&no_min_digits, sign_prefix(spec, value.is_sign_negative()), &body, true)
}

fn exponent_body(abs: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, abs);
    let (mantissa, exponent) = match raw.split_once('e') {
        Some(parts) => parts,
        None => (raw.as_str(), "0"),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{exponent:+03}")
}

fn decimal_exponent(abs: f64) -> i32 {
    if abs == 0.0 {
        return 0;
    }
    let raw = format!("{abs:e}");
    raw.split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0)
}

fn strip_zeros(mut body: String) -> String {
    if body.contains('.') {
        while body.ends_with('0') {
            body.pop();
        }
        if body.ends_with('.') {
            body.pop();
        }
    }
    body
}

fn nonfinite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_owned()
    } else if value.is_sign_negative() {
        "-inf".to_owned()
    } else {
        "inf".to_owned()
    }
}
