//! # The `Callback` trait and its basic constructors.

use std::marker::PhantomData;
use std::sync::Arc;

/// An invokable object accepting one parameter of type `P`.
///
/// Implementations must be `Send + Sync`: handles are shared across threads
/// by registries and dispatchers. Invocation itself carries no result and no
/// error channel — a callback either handles its parameter or arranges its
/// own reporting.
pub trait Callback<P>: Send + Sync {
    /// Invokes the callback with the given parameter.
    fn invoke(&self, param: P);
}

/// Shared handle to a callback.
///
/// The callback's allocation address doubles as its identity (see
/// [`ListenerKey::address_of`](crate::events::ListenerKey::address_of)).
pub type CallbackRef<P> = Arc<dyn Callback<P>>;

/// A [`Callback`] wrapping a plain closure or function.
pub struct FnCallback<P, F> {
    f: F,
    _param: PhantomData<fn(P)>,
}

impl<P, F> FnCallback<P, F>
where
    F: Fn(P) + Send + Sync,
{
    /// Wraps `f` as a callback.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _param: PhantomData,
        }
    }
}

impl<P, F> Callback<P> for FnCallback<P, F>
where
    F: Fn(P) + Send + Sync,
{
    fn invoke(&self, param: P) {
        (self.f)(param)
    }
}

/// Wraps a closure as a shared callback handle.
///
/// ```rust
/// use crosscall::callback_fn;
///
/// let cb = callback_fn(|n: i32| assert_eq!(n, 7));
/// cb.invoke(7);
/// ```
pub fn callback_fn<P: 'static>(f: impl Fn(P) + Send + Sync + 'static) -> CallbackRef<P> {
    Arc::new(FnCallback::new(f))
}

/// Wraps an object and one of its methods as a shared callback handle.
///
/// The object is observed weakly: once the last `Arc<O>` outside this
/// callback is dropped, invocations become silent no-ops. This keeps the
/// receiver's lifetime in its owner's hands and avoids a reference cycle
/// when an object stores a callback to itself.
///
/// ```rust
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
/// use crosscall::method_callback;
///
/// struct Counter {
///     total: AtomicI32,
/// }
///
/// impl Counter {
///     fn add(&self, n: i32) {
///         self.total.fetch_add(n, Ordering::SeqCst);
///     }
/// }
///
/// let counter = Arc::new(Counter { total: AtomicI32::new(0) });
/// let cb = method_callback(&counter, Counter::add);
/// cb.invoke(5);
/// assert_eq!(counter.total.load(Ordering::SeqCst), 5);
///
/// drop(counter);
/// cb.invoke(5); // receiver gone: silently skipped
/// ```
pub fn method_callback<O, P>(object: &Arc<O>, method: fn(&O, P)) -> CallbackRef<P>
where
    O: Send + Sync + 'static,
    P: 'static,
{
    let object = Arc::downgrade(object);
    callback_fn(move |param| {
        if let Some(object) = object.upgrade() {
            method(&object, param);
        }
    })
}
