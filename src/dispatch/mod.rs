//! # Cross-thread callback dispatch.
//!
//! Marshals callback invocations from arbitrary threads onto a designated
//! destination thread's message loop, without keeping the callback's owner
//! alive across the hop:
//!
//! ```text
//!   worker thread A ──┐
//!   worker thread B ──┼─ dispatch(cb, arg) ──► MessagePump ──► destination
//!   worker thread C ──┘   (Weak cb + owned arg)  (FIFO queue)    thread loop
//!                                                                  │
//!                                               cb owner alive? ───┤
//!                                                 yes ► cb.invoke(arg)
//!                                                 no  ► drop silently
//! ```
//!
//! The pieces:
//! - [`MessagePump`] / [`PumpHandle`] — the destination thread's queue and
//!   its cloneable posting side.
//! - [`PlatformMessage`] — the tagged message moving through a pump;
//!   dispatcher traffic carries a weak-callback + owned-argument payload.
//! - [`CallbackDispatcher`] — turns `dispatch(cb, arg)` into a posted
//!   message and processes matching messages on the destination side.
//!
//! The typed front end lives in
//! [`callbacks::dispatched`](crate::callbacks::DispatchedCallback).

mod dispatcher;
mod message;
mod pump;

pub use dispatcher::CallbackDispatcher;
pub use message::{DispatchTarget, ErasedArg, PlatformMessage, DEFAULT_MESSAGE_ID};
pub use pump::{MessagePump, PumpHandle};
