//! # crosscall
//!
//! **Crosscall** is a small cross-cutting utility library for callback-driven
//! programs: typed callback wrappers, a broadcaster/observer mechanism, a
//! cross-thread callback dispatcher for event-loop threads, a logging façade,
//! a printf-style string formatter, and an error type that integrates with
//! the logger.
//!
//! ## Architecture
//! ### Broadcasting
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  listener A  │   │  listener B  │   │  listener C  │
//!     │ (CallbackRef)│   │ (CallbackRef)│   │ (CallbackRef)│
//!     └──────▲───────┘   └──────▲───────┘   └──────▲───────┘
//!            │ invoke(msg)      │ invoke(msg)      │ invoke(msg)
//! ┌──────────┴──────────────────┴──────────────────┴─────────────────┐
//! │  Broadcaster<M> (keyed listener map, snapshot fan-out)           │
//! └──────────────────────────────▲───────────────────────────────────┘
//!                                │ broadcast(msg), any thread
//! ```
//!
//! ### Cross-thread dispatch
//! ```text
//!  worker thread                              destination thread
//!  ─────────────                              ──────────────────
//!  DispatchedCallback::invoke(Arc<T>)         loop {
//!    └─► CallbackDispatcher::dispatch           msg = pump.wait()
//!          │  record: Weak(callback) + arg      dispatcher
//!          └─► PumpHandle::post(msg) ──FIFO──►   .process_platform_message(msg)
//!                                                  ├─ foreign tag ► hand back
//!                                                  ├─ weak alive  ► invoke(arg)
//!                                                  └─ weak gone   ► skip
//!                                              }
//! ```
//!
//! The weak reference keeps a dispatch from extending the callback owner's
//! lifetime across a hop of unbounded duration; the owned argument keeps the
//! payload alive until the destination thread decides. Dropping the owner is
//! the one way to "cancel" a posted invocation.
//!
//! ## Features
//! | Area              | Description                                              | Key types / entry points                       |
//! |-------------------|----------------------------------------------------------|------------------------------------------------|
//! | **Callbacks**     | Shareable invokable handles over closures and methods.   | [`Callback`], [`callback_fn`], [`method_callback`] |
//! | **Broadcasting**  | Keyed listener registry with synchronous fan-out.        | [`Broadcaster`], [`ListenerKey`]               |
//! | **Dispatch**      | Lifetime-safe callback marshalling across threads.       | [`CallbackDispatcher`], [`MessagePump`], [`dispatched_fn`] |
//! | **Logging**       | Priority-ceiling text logging with a pluggable sink.     | [`logging`], [`log_error!`](log_error)         |
//! | **Formatting**    | Printf-style templates and hex dumps.                    | [`format`], [`sformat!`](sformat)              |
//! | **Errors**        | Structured error with idempotent logging.                | [`RuntimeError`], [`runtime_error!`](runtime_error) |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use crosscall::{dispatched_fn, CallbackDispatcher, MessagePump};
//!
//! let (pump, handle) = MessagePump::new();
//! let dispatcher = Arc::new(CallbackDispatcher::new());
//! dispatcher.set_destination(handle);
//!
//! // A callback that must run on the pump-draining thread, no matter who
//! // invokes it.
//! let on_sample = dispatched_fn(|sample: Arc<u64>| println!("sample: {sample}"), &dispatcher);
//!
//! let worker = {
//!     let on_sample = Arc::clone(&on_sample);
//!     thread::spawn(move || on_sample.invoke(Arc::new(42)))
//! };
//! worker.join().unwrap();
//!
//! // The "event loop": drain the pump on this thread.
//! let message = pump.wait().unwrap();
//! assert!(dispatcher.process_platform_message(message).is_none());
//! ```

mod error;

pub mod callbacks;
pub mod dispatch;
pub mod events;
pub mod format;
pub mod logging;

// ---- Public re-exports ----

pub use callbacks::{
    callback_fn, dispatched_callback, dispatched_fn, method_callback, Callback, CallbackRef,
    DispatchedCallback, FnCallback,
};
pub use dispatch::{
    CallbackDispatcher, DispatchTarget, ErasedArg, MessagePump, PlatformMessage, PumpHandle,
    DEFAULT_MESSAGE_ID,
};
pub use error::RuntimeError;
pub use events::{Broadcaster, ListenerKey};
pub use format::{format_hex, format_hex_with, vformat, FormatArg};
pub use logging::LogHandler;
