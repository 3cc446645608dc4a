//! # The boxed message moving through a pump.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::callbacks::Callback;

/// Default message identifier used by dispatchers that were not given a
/// custom one.
///
/// Reassign via [`CallbackDispatcher::set_message_id`](crate::dispatch::CallbackDispatcher::set_message_id)
/// only when this tag is already claimed by another subsystem sharing the
/// same pump.
pub const DEFAULT_MESSAGE_ID: u32 = 14524;

/// Type-erased owning handle to a dispatched argument.
///
/// Erased for transport; the destination-side target recovers the concrete
/// type by downcasting.
pub type ErasedArg = Arc<dyn Any + Send + Sync>;

/// The erased callback type a dispatcher transports.
///
/// Dispatch targets accept the erased argument; typed front ends such as
/// [`DispatchedCallback`](crate::callbacks::DispatchedCallback) perform the
/// erasure and recovery around them.
pub type DispatchTarget = dyn Callback<ErasedArg>;

/// One pending callback invocation in flight between threads.
///
/// Holds a weak reference to the callback (so the dispatch never extends the
/// owner's lifetime across the asynchronous hop) and the sole owning handle
/// to the argument (so the argument survives to decision time even if the
/// caller releases it right after dispatching).
pub(crate) struct PendingDispatch {
    pub(crate) callback: Weak<DispatchTarget>,
    pub(crate) argument: ErasedArg,
}

/// A message posted to a [`MessagePump`](crate::dispatch::MessagePump).
///
/// Carries a numeric tag and, for dispatcher traffic, one pending-dispatch
/// payload (weak callback + owned argument). Subsystems sharing a pump
/// distinguish their
/// traffic purely by tag; messages with a foreign tag pass through
/// [`process_platform_message`](crate::dispatch::CallbackDispatcher::process_platform_message)
/// untouched.
pub struct PlatformMessage {
    pub(crate) message_id: u32,
    pub(crate) payload: Option<PendingDispatch>,
}

impl PlatformMessage {
    /// Builds a payload-less message for non-dispatcher traffic on a shared
    /// pump.
    pub fn control(message_id: u32) -> Self {
        Self {
            message_id,
            payload: None,
        }
    }

    pub(crate) fn pending(
        message_id: u32,
        callback: &Arc<DispatchTarget>,
        argument: ErasedArg,
    ) -> Self {
        Self {
            message_id,
            payload: Some(PendingDispatch {
                callback: Arc::downgrade(callback),
                argument,
            }),
        }
    }

    /// Tag distinguishing this message's owner on a shared pump.
    #[inline]
    pub fn message_id(&self) -> u32 {
        self.message_id
    }

    /// Whether the message carries a pending callback invocation.
    #[inline]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }
}

impl fmt::Debug for PlatformMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformMessage")
            .field("message_id", &self.message_id)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}
