//! # The destination thread's message queue.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::message::PlatformMessage;

/// Global sequence for pump identities (used in transport-error text).
static PUMP_SEQ: AtomicU64 = AtomicU64::new(1);

/// Receiving end of a message queue, owned by its destination thread.
///
/// The stand-in for a host windowing system's message loop: exactly one
/// thread owns the pump and drains it, handing each message to the
/// dispatcher(s) interested in it. Messages arrive in posting order (FIFO).
///
/// ## Example
/// ```rust
/// use crosscall::{CallbackDispatcher, MessagePump};
///
/// let (pump, handle) = MessagePump::new();
/// let dispatcher = CallbackDispatcher::new();
/// dispatcher.set_destination(handle);
///
/// // ... destination thread's loop:
/// while let Some(message) = pump.try_next() {
///     dispatcher.process_platform_message(message);
/// }
/// ```
pub struct MessagePump {
    id: u64,
    rx: Receiver<PlatformMessage>,
}

/// Posting end of a message queue.
///
/// Cloneable and usable from any thread. Posting fails only once the pump
/// itself has been dropped.
#[derive(Clone)]
pub struct PumpHandle {
    id: u64,
    tx: Sender<PlatformMessage>,
}

impl MessagePump {
    /// Creates a pump and its posting handle.
    pub fn new() -> (MessagePump, PumpHandle) {
        let (tx, rx) = unbounded();
        let id = PUMP_SEQ.fetch_add(1, Ordering::Relaxed);
        (MessagePump { id, rx }, PumpHandle { id, tx })
    }

    /// Process-unique identity of this pump.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Blocks until the next message arrives.
    ///
    /// Returns `None` once every [`PumpHandle`] has been dropped.
    pub fn wait(&self) -> Option<PlatformMessage> {
        self.rx.recv().ok()
    }

    /// Returns the next message without blocking, if one is queued.
    pub fn try_next(&self) -> Option<PlatformMessage> {
        self.rx.try_recv().ok()
    }
}

impl PumpHandle {
    /// Identity of the pump this handle posts to.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Posts `message` to the pump.
    ///
    /// FIFO with respect to other posts to the same pump. On failure (the
    /// pump is gone) the message is handed back so the caller can reclaim
    /// whatever it carries.
    pub fn post(&self, message: PlatformMessage) -> Result<(), PlatformMessage> {
        self.tx.send(message).map_err(|rejected| rejected.into_inner())
    }
}

impl fmt::Debug for MessagePump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagePump").field("id", &self.id).finish()
    }
}

impl fmt::Debug for PumpHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PumpHandle").field("id", &self.id).finish()
    }
}
