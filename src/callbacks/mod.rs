//! # Typed callback handles.
//!
//! A [`Callback`] is a shareable, invokable object: the unit everything else
//! in this crate moves around. Registries file them, dispatchers post weak
//! references to them across threads, adapters wrap them.
//!
//! ## Handle types
//! - [`CallbackRef<P>`] — the shared, reference-counted handle
//!   (`Arc<dyn Callback<P>>`). Shared ownership lets a registry or a pending
//!   dispatch outlive (or be outlived by) other holders.
//! - `Weak<dyn Callback<P>>` — the non-owning variant; resolvable only while
//!   some strong handle is alive. The dispatcher uses it to detect "owner
//!   already gone" without extending the callback's lifetime.
//!
//! ## Constructors
//! - [`callback_fn`] wraps a closure.
//! - [`method_callback`] wraps an object + method pair, observing the object
//!   weakly.
//! - [`dispatched_callback`] / [`dispatched_fn`] defer the wrapped target to
//!   a dispatcher's destination thread.

mod callback;
mod dispatched;

pub use callback::{callback_fn, method_callback, Callback, CallbackRef, FnCallback};
pub use dispatched::{dispatched_callback, dispatched_fn, DispatchedCallback};
