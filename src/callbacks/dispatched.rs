//! # Callbacks that defer execution to a dispatcher's destination thread.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::dispatch::{CallbackDispatcher, DispatchTarget, ErasedArg};

use super::callback::{callback_fn, Callback, CallbackRef};

/// Recovers the concrete argument type on the destination side.
///
/// Owned strongly by its [`DispatchedCallback`]; the dispatcher only ever
/// holds a weak reference to it, so dropping the adapter expires every
/// in-flight dispatch made through it.
struct ErasedTarget<T> {
    inner: CallbackRef<Arc<T>>,
}

impl<T: Any + Send + Sync> Callback<ErasedArg> for ErasedTarget<T> {
    fn invoke(&self, argument: ErasedArg) {
        if let Ok(argument) = argument.downcast::<T>() {
            self.inner.invoke(argument);
        }
    }
}

/// # A callback that executes its target on the dispatcher's destination thread.
///
/// Invoking a `DispatchedCallback` from any thread returns immediately; the
/// wrapped target runs later, asynchronously, on the thread draining the
/// dispatcher's pump. The parameter must be an `Arc<T>` so the argument
/// stays alive across the hop regardless of what the invoking side does.
///
/// ## Lifetime semantics
/// The adapter owns the strong handle the dispatcher's weak references
/// resolve against: drop the adapter (e.g. by dropping the object that holds
/// it) and every not-yet-processed dispatch is silently skipped.
///
/// ## Failure semantics
/// `Callback::invoke` has no error channel, so a transport failure (no
/// destination set, pump gone) is logged via
/// [`RuntimeError::log`](crate::RuntimeError::log) and swallowed. Dispatch
/// directly through
/// [`CallbackDispatcher::dispatch`] to handle transport errors yourself.
pub struct DispatchedCallback<T> {
    target: Arc<DispatchTarget>,
    dispatcher: Arc<CallbackDispatcher>,
    _param: PhantomData<fn(Arc<T>)>,
}

impl<T: Any + Send + Sync> DispatchedCallback<T> {
    /// Wraps `target` so its invocations are deferred through `dispatcher`.
    pub fn new(target: CallbackRef<Arc<T>>, dispatcher: &Arc<CallbackDispatcher>) -> Self {
        Self {
            target: Arc::new(ErasedTarget { inner: target }),
            dispatcher: Arc::clone(dispatcher),
            _param: PhantomData,
        }
    }
}

impl<T: Any + Send + Sync> Callback<Arc<T>> for DispatchedCallback<T> {
    fn invoke(&self, param: Arc<T>) {
        if let Err(error) = self.dispatcher.dispatch(&self.target, param) {
            error.log();
        }
    }
}

/// Wraps an existing callback so it executes on `dispatcher`'s destination
/// thread.
pub fn dispatched_callback<T: Any + Send + Sync>(
    target: CallbackRef<Arc<T>>,
    dispatcher: &Arc<CallbackDispatcher>,
) -> CallbackRef<Arc<T>> {
    Arc::new(DispatchedCallback::new(target, dispatcher))
}

/// Wraps a closure so it executes on `dispatcher`'s destination thread.
///
/// ```rust
/// use std::sync::Arc;
/// use crosscall::{dispatched_fn, CallbackDispatcher, MessagePump};
///
/// let (pump, handle) = MessagePump::new();
/// let dispatcher = Arc::new(CallbackDispatcher::new());
/// dispatcher.set_destination(handle);
///
/// let on_reading = dispatched_fn(|value: Arc<u32>| println!("reading: {value}"), &dispatcher);
///
/// on_reading.invoke(Arc::new(17)); // returns immediately
///
/// // ... later, on the destination thread:
/// let message = pump.try_next().unwrap();
/// dispatcher.process_platform_message(message); // prints "reading: 17"
/// ```
pub fn dispatched_fn<T: Any + Send + Sync>(
    f: impl Fn(Arc<T>) + Send + Sync + 'static,
    dispatcher: &Arc<CallbackDispatcher>,
) -> CallbackRef<Arc<T>> {
    dispatched_callback(callback_fn(f), dispatcher)
}
