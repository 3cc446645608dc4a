//! # Logging façade with a runtime priority ceiling and a pluggable sink.
//!
//! A process-wide text-line logger shared by the whole crate (and by
//! applications embedding it):
//!
//! ```text
//! log_error!/log_warn!/...           RuntimeError::log()
//!         │                                  │
//!         └──────► log_message(prio, category, function, msg)
//!                        │
//!                        ├─ prio > priority limit? ──► discarded
//!                        ├─ handler installed? ──► handler.process(...)
//!                        │        │ returns whether the console line
//!                        │        ▼ should also be written
//!                        └─ console line:
//!                           "[HDR] {program[:category]} <function> msg\n"
//! ```
//!
//! ## Rules
//! - Priorities are plain integers; **lower value = higher priority**
//!   ([`PRIORITY_ERROR`] is 1). Messages with a priority above the runtime
//!   limit are dropped before any formatting happens.
//! - The default limit is [`PRIORITY_ALLOC`] (everything enabled).
//! - At most one [`LogHandler`] is installed at a time; its return value
//!   decides whether the console line is also written.
//!
//! ## Example
//! ```rust
//! use crosscall::{log_warn, logging};
//!
//! logging::set_priority_limit(logging::PRIORITY_WARN);
//! log_warn!("cache miss for key %s", "user:42");
//! log_warn!(cat: "net", "retry %d of %d", 1, 3);
//! logging::set_priority_limit(logging::PRIORITY_ALLOC);
//! ```

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::sformat;

/// `ERROR` priority value.
pub const PRIORITY_ERROR: i32 = 1;
/// `WARN` priority value.
pub const PRIORITY_WARN: i32 = 2;
/// `INFO` priority value.
pub const PRIORITY_INFO: i32 = 3;
/// `DEBUG` priority value.
pub const PRIORITY_DEBUG: i32 = 4;
/// `TRACE` priority value.
pub const PRIORITY_TRACE: i32 = 5;
/// `DEBUG_EXTRA` priority value.
pub const PRIORITY_DEBUG_EXTRA: i32 = 6;
/// `ALLOC` priority value (lowest priority, highest numeric value).
pub const PRIORITY_ALLOC: i32 = 7;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_MAGENTA: &str = "\x1b[35m";
const COLOR_RED: &str = "\x1b[31;1m";
const COLOR_YELLOW: &str = "\x1b[33;1m";
const COLOR_BLUE: &str = "\x1b[34m";
const COLOR_GRAY: &str = "\x1b[30;1m";

/// Sink for log messages produced by the application.
///
/// Installed with [`set_log_handler`]; called once per message that passes
/// the priority limit, before any console output.
pub trait LogHandler: Send + Sync {
    /// Processes one log message.
    ///
    /// Returns whether the message must also be written to the console.
    fn process(&self, prio: i32, category: Option<&str>, function: &str, msg: &str) -> bool;
}

static PRIORITY_LIMIT: AtomicI32 = AtomicI32::new(PRIORITY_ALLOC);
static LOG_HANDLER: RwLock<Option<Arc<dyn LogHandler>>> = RwLock::new(None);
static PROGRAM_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "?".to_owned())
});

/// Returns the current runtime priority limit.
#[inline]
pub fn get_priority_limit() -> i32 {
    PRIORITY_LIMIT.load(Ordering::Relaxed)
}

/// Sets the runtime priority limit.
///
/// Messages with a priority value **greater** than the limit are ignored.
pub fn set_priority_limit(limit: i32) {
    PRIORITY_LIMIT.store(limit, Ordering::Relaxed);
}

/// Returns the currently installed log handler, if any.
pub fn get_log_handler() -> Option<Arc<dyn LogHandler>> {
    LOG_HANDLER.read().clone()
}

/// Installs (or, with `None`, removes) the log handler.
///
/// A new handler replaces the previous one.
pub fn set_log_handler(handler: Option<Arc<dyn LogHandler>>) {
    *LOG_HANDLER.write() = handler;
}

/// Logs one message.
///
/// Applies the priority limit, offers the message to the installed handler,
/// and writes the console line unless the handler suppressed it. The
/// [`log_error!`](crate::log_error) family is the usual entry point; call
/// this directly when the function name or a preformatted message is already
/// at hand.
pub fn log_message(prio: i32, category: Option<&str>, function: &str, msg: &str) {
    if prio > get_priority_limit() {
        return;
    }

    let mut to_console = true;
    if let Some(handler) = get_log_handler() {
        to_console = handler.process(prio, category, function, msg);
    }

    if to_console {
        print!("{}", console_line(prio, &PROGRAM_NAME, category, function, msg));
    }
}

/// Renders the console line for one message.
///
/// Format: `"{header} {program[:category]} <function> msg{reset}\n"` where
/// the program/category pair is wrapped in braces and the header is the
/// ANSI-colored priority tag.
pub fn console_line(
    prio: i32,
    program: &str,
    category: Option<&str>,
    function: &str,
    msg: &str,
) -> String {
    let header = priority_header(prio);
    let footer = priority_footer(prio);
    match category {
        None => sformat!("%s {%s} <%s> %s%s\n", header, program, function, msg, footer),
        Some(category) => sformat!(
            "%s {%s:%s} <%s> %s%s\n",
            header,
            program,
            category,
            function,
            msg,
            footer
        ),
    }
}

fn priority_header(prio: i32) -> String {
    match prio {
        PRIORITY_ERROR => format!("{COLOR_RED}[ERROR]{COLOR_RESET}"),
        PRIORITY_WARN => format!("{COLOR_YELLOW}[WARN]{COLOR_RESET}"),
        PRIORITY_INFO => format!("{COLOR_BLUE}[INFO]{COLOR_RESET}"),
        PRIORITY_DEBUG => format!("{COLOR_MAGENTA}[DEBUG]{COLOR_GRAY}"),
        PRIORITY_TRACE => format!("{COLOR_GRAY}[TRACE]"),
        PRIORITY_DEBUG_EXTRA => format!("{COLOR_MAGENTA}[XTDBG]{COLOR_GRAY}"),
        PRIORITY_ALLOC => "[ALLOC]".to_owned(),
        _ => "[UNKNOWN]".to_owned(),
    }
}

fn priority_footer(prio: i32) -> &'static str {
    match prio {
        PRIORITY_DEBUG | PRIORITY_TRACE | PRIORITY_DEBUG_EXTRA => COLOR_RESET,
        _ => "",
    }
}

/// Captures the path of the enclosing function as a `&'static`-like string.
///
/// Used by the logging and error macros to fill the `<function>` slot of the
/// console line.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn anchor() {}
        let name = ::core::any::type_name_of_val(&anchor);
        name.strip_suffix("::anchor").unwrap_or(name)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($prio:expr, $cat:expr, $fmt:expr $(, $arg:expr)*) => {{
        // Cheap ceiling check before any formatting work.
        if $prio <= $crate::logging::get_priority_limit() {
            $crate::logging::log_message(
                $prio,
                $cat,
                $crate::function_path!(),
                &$crate::sformat!($fmt $(, $arg)*),
            );
        }
    }};
}

/// Logs a printf-formatted message with `ERROR` priority.
///
/// An optional `cat:` prefix sets the message category:
/// `log_error!(cat: "net", "timeout after %u ms", ms)`.
#[macro_export]
macro_rules! log_error {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_ERROR, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_ERROR, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

/// Logs a printf-formatted message with `WARN` priority.
#[macro_export]
macro_rules! log_warn {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_WARN, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_WARN, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

/// Logs a printf-formatted message with `INFO` priority.
#[macro_export]
macro_rules! log_info {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_INFO, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_INFO, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

/// Logs a printf-formatted message with `DEBUG` priority.
#[macro_export]
macro_rules! log_debug {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_DEBUG, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_DEBUG, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

/// Logs a printf-formatted message with `TRACE` priority.
#[macro_export]
macro_rules! log_trace {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_TRACE, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_TRACE, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

/// Logs a printf-formatted message with `DEBUG_EXTRA` priority.
#[macro_export]
macro_rules! log_debug_extra {
    (cat: $cat:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_DEBUG_EXTRA, ::core::option::Option::Some($cat), $fmt $(, $arg)*)
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__log_at!($crate::logging::PRIORITY_DEBUG_EXTRA, ::core::option::Option::None, $fmt $(, $arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_line_without_category() {
        let line = console_line(PRIORITY_ALLOC, "app", None, "main", "hello");
        assert_eq!(line, "[ALLOC] {app} <main> hello\n");
    }

    #[test]
    fn console_line_with_category() {
        let line = console_line(PRIORITY_ALLOC, "app", Some("net"), "main", "hello");
        assert_eq!(line, "[ALLOC] {app:net} <main> hello\n");
    }

    #[test]
    fn console_line_colored_headers() {
        let line = console_line(PRIORITY_ERROR, "app", None, "f", "m");
        assert_eq!(line, "\x1b[31;1m[ERROR]\x1b[0m {app} <f> m\n");

        let line = console_line(PRIORITY_TRACE, "app", None, "f", "m");
        assert_eq!(line, "\x1b[30;1m[TRACE] {app} <f> m\x1b[0m\n");
    }

    #[test]
    fn console_line_unknown_priority() {
        let line = console_line(PRIORITY_ALLOC + 1, "app", None, "f", "m");
        assert_eq!(line, "[UNKNOWN] {app} <f> m\n");
    }

    #[test]
    fn function_path_names_the_enclosing_function() {
        let path = function_path!();
        assert!(path.ends_with("function_path_names_the_enclosing_function"), "{path}");
    }
}
