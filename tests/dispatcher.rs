//! Cross-thread dispatcher behavior: delivery, expiry, pass-through, and
//! transport-failure reclamation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crosscall::{
    callback_fn, CallbackDispatcher, DispatchTarget, ErasedArg, MessagePump, PlatformMessage,
    DEFAULT_MESSAGE_ID,
};

/// Dispatch payload whose drops are counted, for leak accounting.
struct Payload {
    value: i32,
    drops: Arc<AtomicUsize>,
}

impl Drop for Payload {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn payload(value: i32, drops: &Arc<AtomicUsize>) -> ErasedArg {
    Arc::new(Payload {
        value,
        drops: Arc::clone(drops),
    })
}

/// Erased target recording every received payload value.
fn recording_target(received: &Arc<Mutex<Vec<i32>>>) -> Arc<DispatchTarget> {
    let received = Arc::clone(received);
    callback_fn(move |argument: ErasedArg| {
        if let Ok(payload) = argument.downcast::<Payload>() {
            received.lock().unwrap().push(payload.value);
        }
    })
}

#[test]
fn dispatch_invokes_once_on_processing() {
    let (pump, handle) = MessagePump::new();
    let dispatcher = CallbackDispatcher::new();
    dispatcher.set_destination(handle);

    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    dispatcher.dispatch(&target, payload(123, &drops)).unwrap();
    assert!(received.lock().unwrap().is_empty(), "invocation must be deferred");

    let message = pump.try_next().expect("a message was posted");
    assert!(dispatcher.process_platform_message(message).is_none());

    assert_eq!(*received.lock().unwrap(), vec![123]);
    assert_eq!(drops.load(Ordering::SeqCst), 1, "argument reclaimed after delivery");
    assert!(pump.try_next().is_none());
}

#[test]
fn expired_callback_is_skipped_and_argument_reclaimed() {
    let (pump, handle) = MessagePump::new();
    let dispatcher = CallbackDispatcher::new();
    dispatcher.set_destination(handle);

    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    dispatcher.dispatch(&target, payload(7, &drops)).unwrap();

    // The owner releases the callback between dispatch and processing.
    drop(target);

    let message = pump.try_next().unwrap();
    assert!(dispatcher.process_platform_message(message).is_none());

    assert!(received.lock().unwrap().is_empty(), "stale callback must not run");
    assert_eq!(drops.load(Ordering::SeqCst), 1, "argument reclaimed despite the skip");
}

#[test]
fn foreign_message_id_passes_through_untouched() {
    let (pump, handle) = MessagePump::new();
    let sender = CallbackDispatcher::new();
    sender.set_destination(handle);

    let bystander = CallbackDispatcher::new();
    bystander.set_message_id(DEFAULT_MESSAGE_ID + 1);

    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    sender.dispatch(&target, payload(55, &drops)).unwrap();
    let message = pump.try_next().unwrap();

    // Not the bystander's tag: handed back verbatim, payload intact.
    let message = bystander
        .process_platform_message(message)
        .expect("foreign message must be given back");
    assert_eq!(message.message_id(), DEFAULT_MESSAGE_ID);
    assert!(message.has_payload());
    assert!(received.lock().unwrap().is_empty());
    assert_eq!(drops.load(Ordering::SeqCst), 0, "nothing reclaimed on pass-through");

    // The owning dispatcher still delivers it afterwards.
    assert!(sender.process_platform_message(message).is_none());
    assert_eq!(*received.lock().unwrap(), vec![55]);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn control_messages_share_the_pump() {
    let dispatcher = CallbackDispatcher::new();

    let foreign = PlatformMessage::control(DEFAULT_MESSAGE_ID + 9);
    let foreign = dispatcher
        .process_platform_message(foreign)
        .expect("foreign control message is given back");
    assert!(!foreign.has_payload());

    let matching = PlatformMessage::control(DEFAULT_MESSAGE_ID);
    assert!(dispatcher.process_platform_message(matching).is_none());
}

#[test]
fn dispatch_without_destination_fails_and_reclaims() {
    let dispatcher = CallbackDispatcher::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    let error = dispatcher
        .dispatch(&target, payload(1, &drops))
        .expect_err("no destination is set");

    assert!(error.message().contains("no destination"), "{}", error.message());
    assert_eq!(drops.load(Ordering::SeqCst), 1, "argument reclaimed on the failure path");
}

#[test]
fn dispatch_to_dropped_pump_fails_and_reclaims() {
    let (pump, handle) = MessagePump::new();
    let pump_id = pump.id();
    let dispatcher = CallbackDispatcher::new();
    dispatcher.set_destination(handle);
    drop(pump);

    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    let error = dispatcher
        .dispatch(&target, payload(1, &drops))
        .expect_err("the pump is gone");

    let message = error.message();
    assert!(message.contains("couldn't post message"), "{message}");
    assert!(message.contains(&DEFAULT_MESSAGE_ID.to_string()), "{message}");
    assert!(message.contains(&format!("#{pump_id}")), "{message}");
    assert_eq!(drops.load(Ordering::SeqCst), 1, "both allocations released, no leak");
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn deliveries_follow_posting_order() {
    let (pump, handle) = MessagePump::new();
    let dispatcher = CallbackDispatcher::new();
    dispatcher.set_destination(handle);

    let received = Arc::new(Mutex::new(Vec::new()));
    let drops = Arc::new(AtomicUsize::new(0));
    let target = recording_target(&received);

    for value in 1..=5 {
        dispatcher.dispatch(&target, payload(value, &drops)).unwrap();
    }
    while let Some(message) = pump.try_next() {
        dispatcher.process_platform_message(message);
    }

    assert_eq!(*received.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(drops.load(Ordering::SeqCst), 5);
}

#[test]
fn dispatch_crosses_threads_onto_the_pump_thread() {
    let (pump, handle) = MessagePump::new();
    let dispatcher = Arc::new(CallbackDispatcher::new());
    dispatcher.set_destination(handle);

    let executed_on = Arc::new(Mutex::new(None));
    let target: Arc<DispatchTarget> = {
        let executed_on = Arc::clone(&executed_on);
        callback_fn(move |_: ErasedArg| {
            *executed_on.lock().unwrap() = Some(thread::current().id());
        })
    };

    let worker = {
        let dispatcher = Arc::clone(&dispatcher);
        let target = Arc::clone(&target);
        thread::spawn(move || {
            dispatcher.dispatch(&target, Arc::new(0u8) as ErasedArg).unwrap();
        })
    };
    worker.join().unwrap();

    let message = pump.wait().unwrap();
    dispatcher.process_platform_message(message);

    assert_eq!(
        *executed_on.lock().unwrap(),
        Some(thread::current().id()),
        "the callback runs on the thread draining the pump"
    );
}

#[test]
fn configuration_accessors_round_trip() {
    let (pump, handle) = MessagePump::new();
    let dispatcher = CallbackDispatcher::new();

    assert!(dispatcher.destination().is_none());
    assert_eq!(dispatcher.message_id(), DEFAULT_MESSAGE_ID);

    dispatcher.set_destination(handle);
    assert_eq!(dispatcher.destination().unwrap().id(), pump.id());

    dispatcher.set_message_id(40001);
    assert_eq!(dispatcher.message_id(), 40001);
}

#[test]
fn global_dispatcher_is_one_instance() {
    let first = CallbackDispatcher::global();
    let second = CallbackDispatcher::global();
    assert!(Arc::ptr_eq(&first, &second));
}
