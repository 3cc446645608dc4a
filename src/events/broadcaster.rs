//! # Thread-safe listener registry with synchronous fan-out.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::callbacks::CallbackRef;

/// Identity token under which a listener is filed in a [`Broadcaster`].
///
/// Defaults to the listener handle's own allocation address
/// ([`ListenerKey::address_of`]); any pointer-sized token works when several
/// listeners hang off one object, or when registrations form deliberate
/// de-duplication groups.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ListenerKey(usize);

impl ListenerKey {
    /// A caller-chosen token.
    #[inline]
    pub fn token(value: usize) -> Self {
        Self(value)
    }

    /// The handle's own allocation address — the implicit key used by
    /// [`Broadcaster::add_listener`] and [`Broadcaster::remove_listener`].
    #[inline]
    pub fn address_of<M>(listener: &CallbackRef<M>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }
}

impl From<usize> for ListenerKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// # Broadcasts messages of type `M` to registered listeners.
///
/// A thread-safe set of callbacks keyed by [`ListenerKey`]. `broadcast`
/// delivers a message synchronously to every listener registered at call
/// start, exactly once each, in key order.
///
/// ## Rules
/// - At most one listener per key; registering into an occupied key fails
///   (`false`) without touching the existing entry.
/// - A listener added under a custom key can only be removed via that key —
///   [`remove_listener`](Broadcaster::remove_listener) looks up the handle's
///   own address and will not find it.
/// - Registration and removal report success as `bool`; nothing here panics
///   or returns errors.
/// - The internal lock is never held while a listener runs, so listeners may
///   freely add/remove listeners (or broadcast again) on the same
///   broadcaster from within their own invocation. Consequently a listener
///   removed mid-broadcast by another listener still receives the
///   in-flight message: delivery targets the set captured at call start.
///
/// ## Example
/// ```rust
/// use crosscall::{callback_fn, Broadcaster};
///
/// let broadcaster = Broadcaster::new();
/// let listener = callback_fn(|n: i32| println!("got {n}"));
///
/// assert!(broadcaster.add_listener(&listener));
/// assert!(!broadcaster.add_listener(&listener)); // already registered
/// broadcaster.broadcast(42);
/// assert!(broadcaster.remove_listener(&listener));
/// ```
pub struct Broadcaster<M> {
    listeners: Mutex<BTreeMap<ListenerKey, CallbackRef<M>>>,
}

impl<M: Clone> Broadcaster<M> {
    /// Creates an empty broadcaster.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers `listener` under its own address.
    ///
    /// Returns whether it was registered (i.e. it wasn't already).
    pub fn add_listener(&self, listener: &CallbackRef<M>) -> bool {
        self.add_listener_with_key(listener, ListenerKey::address_of(listener))
    }

    /// Registers `listener` under a caller-supplied key.
    ///
    /// Returns whether it was registered (i.e. the key wasn't taken).
    pub fn add_listener_with_key(&self, listener: &CallbackRef<M>, key: ListenerKey) -> bool {
        match self.listeners.lock().entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(listener));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Unregisters the listener filed under `listener`'s own address.
    ///
    /// The handle must be the same one passed to
    /// [`add_listener`](Broadcaster::add_listener); entries registered under
    /// custom keys are not matched. Returns whether an entry was removed.
    pub fn remove_listener(&self, listener: &CallbackRef<M>) -> bool {
        self.remove_key(ListenerKey::address_of(listener))
    }

    /// Unregisters the listener filed under `key`.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_key(&self, key: ListenerKey) -> bool {
        self.listeners.lock().remove(&key).is_some()
    }

    /// Delivers `message` to every currently registered listener.
    ///
    /// The listener set is snapshotted under the lock and the lock released
    /// before any listener runs; see the type-level rules for the
    /// re-entrancy consequences.
    pub fn broadcast(&self, message: M) {
        let snapshot: Vec<CallbackRef<M>> = self.listeners.lock().values().cloned().collect();
        for listener in snapshot {
            listener.invoke(message.clone());
        }
    }

    /// Whether any listener is registered right now.
    pub fn has_listeners(&self) -> bool {
        !self.listeners.lock().is_empty()
    }

    /// Number of currently registered listeners.
    pub fn listeners_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl<M: Clone> Default for Broadcaster<M> {
    fn default() -> Self {
        Self::new()
    }
}
