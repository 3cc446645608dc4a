//! # Event broadcasting.
//!
//! [`Broadcaster`] fans a single message out to any number of registered
//! listeners, synchronously, on the broadcasting thread:
//!
//! ```text
//! Publishers (any thread):          Listeners (keyed callbacks):
//!   broadcast(msg) ──► Broadcaster ──► listener A.invoke(msg)
//!                      (keyed map)  ──► listener B.invoke(msg)
//!                                   ──► listener C.invoke(msg)
//! ```
//!
//! Listeners are [`CallbackRef`](crate::callbacks::CallbackRef) handles filed
//! under a [`ListenerKey`]; combine with
//! [`dispatched_callback`](crate::callbacks::dispatched_callback) when a
//! listener must run on another thread instead of the broadcasting one.

mod broadcaster;

pub use broadcaster::{Broadcaster, ListenerKey};
