//! # Error type shared across the crate.
//!
//! [`RuntimeError`] carries the category/function/message triple the logging
//! façade understands, and knows how to emit itself through it — at most
//! once, no matter how often [`RuntimeError::log`] is called or whether the
//! error was already logged at construction time.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::logging::{self, PRIORITY_ERROR};

/// # Structured runtime error with deferred, idempotent logging.
///
/// Construction mirrors the logging façade: an optional category, the
/// originating function, and a message. With `log_now` the error is emitted
/// at `ERROR` priority immediately; otherwise [`log`](RuntimeError::log) can
/// emit it later. Either way it is emitted at most once in total.
///
/// The [`runtime_error!`](crate::runtime_error) and
/// [`runtime_error_log!`](crate::runtime_error_log) macros build one with a
/// printf-formatted message and the enclosing function's path.
///
/// ## Example
/// ```rust
/// use crosscall::RuntimeError;
///
/// let err = RuntimeError::new(Some("net"), "poll", false, "socket closed");
/// assert_eq!(err.category(), Some("net"));
/// assert_eq!(err.function(), "poll");
/// assert_eq!(err.message(), "socket closed");
/// assert_eq!(err.to_string(), "socket closed");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuntimeError {
    category: Option<String>,
    function: String,
    message: String,
    logged: AtomicBool,
}

impl RuntimeError {
    /// Creates a new error; with `log_now` it is also logged immediately.
    pub fn new(
        category: Option<&str>,
        function: &str,
        log_now: bool,
        message: impl Into<String>,
    ) -> Self {
        let error = Self {
            category: category.map(str::to_owned),
            function: function.to_owned(),
            message: message.into(),
            logged: AtomicBool::new(log_now),
        };
        if log_now {
            error.emit();
        }
        error
    }

    /// Category the error belongs to, if any.
    #[inline]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Function the error originated from.
    #[inline]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Logs the error at `ERROR` priority, unless it was already logged.
    pub fn log(&self) {
        if !self.logged.swap(true, Ordering::SeqCst) {
            self.emit();
        }
    }

    fn emit(&self) {
        logging::log_message(
            PRIORITY_ERROR,
            self.category(),
            &self.function,
            &self.message,
        );
    }
}

/// Builds a [`RuntimeError`] with a printf-formatted message and the
/// enclosing function's path, without logging it.
///
/// ```rust
/// use crosscall::runtime_error;
///
/// fn read_block(offset: u64) -> Result<(), crosscall::RuntimeError> {
///     Err(runtime_error!("short read at offset %u", offset))
/// }
///
/// let err = read_block(512).unwrap_err();
/// assert_eq!(err.message(), "short read at offset 512");
/// assert!(err.function().ends_with("read_block"));
/// ```
#[macro_export]
macro_rules! runtime_error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::RuntimeError::new(
            ::core::option::Option::None,
            $crate::function_path!(),
            false,
            $crate::sformat!($fmt $(, $arg)*),
        )
    };
}

/// Like [`runtime_error!`](crate::runtime_error), but the error is logged
/// immediately at construction.
#[macro_export]
macro_rules! runtime_error_log {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::RuntimeError::new(
            ::core::option::Option::None,
            $crate::function_path!(),
            true,
            $crate::sformat!($fmt $(, $arg)*),
        )
    };
}
