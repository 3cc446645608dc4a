//! # The cross-thread callback dispatcher.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::runtime_error;
use crate::RuntimeError;

use super::message::{DispatchTarget, ErasedArg, PendingDispatch, PlatformMessage, DEFAULT_MESSAGE_ID};
use super::pump::PumpHandle;

static GLOBAL: LazyLock<Arc<CallbackDispatcher>> =
    LazyLock::new(|| Arc::new(CallbackDispatcher::new()));

/// # Marshals callback invocations onto a destination thread.
///
/// [`dispatch`](CallbackDispatcher::dispatch) turns "invoke this callback
/// later, on the destination thread" into a posted [`PlatformMessage`]; the
/// destination thread's loop feeds every received message to
/// [`process_platform_message`](CallbackDispatcher::process_platform_message),
/// which invokes the callback if its owner is still alive and silently drops
/// the invocation otherwise.
///
/// ```text
/// any thread                      destination thread
/// ──────────                      ──────────────────
/// dispatch(cb, arg)
///   ├─ record: Weak(cb) + arg
///   └─ handle.post(msg) ─────────► pump.wait()
///                                    └─ process_platform_message(msg)
///                                         ├─ foreign tag ► give message back
///                                         ├─ Weak alive  ► cb.invoke(arg)
///                                         └─ Weak gone   ► skip (by design)
/// ```
///
/// ## Rules
/// - Set a destination before dispatching; with none set, `dispatch` fails.
/// - The weak reference means a dispatch never keeps the callback's owner
///   alive across the hop; dropping the owner is the one way to "cancel" a
///   posted invocation.
/// - The argument is owned by the in-flight record, so the caller may release
///   its own handle immediately after dispatching.
/// - Posting failure is the only reported error; it is raised synchronously
///   and the in-flight record is reclaimed first. Nothing is reported across
///   the asynchronous boundary.
/// - Configuration (destination, message id) is meant to be set during
///   single-threaded startup; reconfiguring while dispatches are in flight
///   is the caller's race to avoid.
///
/// Construct one per pump and pass it where needed; [`global`]
/// (CallbackDispatcher::global) provides the single process-wide default for
/// callers that don't need an isolated instance.
pub struct CallbackDispatcher {
    destination: RwLock<Option<PumpHandle>>,
    message_id: AtomicU32,
}

impl CallbackDispatcher {
    /// Creates a dispatcher with no destination and the default message id.
    pub fn new() -> Self {
        Self {
            destination: RwLock::new(None),
            message_id: AtomicU32::new(DEFAULT_MESSAGE_ID),
        }
    }

    /// Returns the process-wide default dispatcher.
    ///
    /// Lazily created on first use and never dropped. Prefer constructing
    /// and passing dispatchers explicitly; use this when wiring one through
    /// is impractical.
    pub fn global() -> Arc<CallbackDispatcher> {
        Arc::clone(&GLOBAL)
    }

    /// Associates the destination pump.
    ///
    /// All subsequently dispatched callbacks execute on the thread draining
    /// that pump. Normally called once during event-loop initialization.
    pub fn set_destination(&self, handle: PumpHandle) {
        *self.destination.write() = Some(handle);
    }

    /// Returns the destination pump handle, if one is set.
    pub fn destination(&self) -> Option<PumpHandle> {
        self.destination.read().clone()
    }

    /// Returns the message identifier this dispatcher tags its traffic with.
    #[inline]
    pub fn message_id(&self) -> u32 {
        self.message_id.load(Ordering::Relaxed)
    }

    /// Sets the message identifier.
    ///
    /// Only needed when [`DEFAULT_MESSAGE_ID`] is already used for other
    /// purposes on the shared pump.
    pub fn set_message_id(&self, message_id: u32) {
        self.message_id.store(message_id, Ordering::Relaxed);
    }

    /// Posts an invocation of `callback` with `argument` to the destination
    /// thread.
    ///
    /// Returns immediately on success — the invocation happens later,
    /// asynchronously, on the destination thread, and only if `callback`
    /// still has strong holders at processing time.
    ///
    /// # Errors
    ///
    /// Fails when no destination is set or the destination pump is gone; in
    /// both cases the pending record (weak callback + owning argument) is
    /// released before the error is returned.
    pub fn dispatch(
        &self,
        callback: &Arc<DispatchTarget>,
        argument: ErasedArg,
    ) -> Result<(), RuntimeError> {
        let message_id = self.message_id();
        let Some(destination) = self.destination() else {
            return Err(runtime_error!(
                "couldn't post message %u: no destination pump is set",
                message_id
            ));
        };
        let message = PlatformMessage::pending(message_id, callback, argument);
        match destination.post(message) {
            Ok(()) => Ok(()),
            Err(rejected) => {
                // Reclaim the pending record before reporting.
                drop(rejected);
                Err(runtime_error!(
                    "couldn't post message %u to pump #%u (error = %s)",
                    message_id,
                    destination.id(),
                    "pump disconnected"
                ))
            }
        }
    }

    /// Handles one message received by the destination thread's loop.
    ///
    /// Messages tagged with a foreign id are given back unchanged (`Some`)
    /// so the loop can offer them to other dispatchers or subsystems. A
    /// matching message is consumed (`None`): the weak callback reference is
    /// resolved and invoked with the argument if its owner is still alive;
    /// an expired reference is skipped silently. Either way the pending
    /// record is released here, on the destination thread.
    ///
    /// Call this from the single thread draining the pump only — it is not
    /// meant to run concurrently for the same dispatcher.
    pub fn process_platform_message(&self, message: PlatformMessage) -> Option<PlatformMessage> {
        if message.message_id != self.message_id() {
            return Some(message);
        }
        if let Some(PendingDispatch { callback, argument }) = message.payload {
            if let Some(callback) = callback.upgrade() {
                callback.invoke(argument);
            }
        }
        None
    }
}

impl Default for CallbackDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
