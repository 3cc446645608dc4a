//! Listener registry behavior: registration identity, removal asymmetry,
//! and fan-out semantics.

use std::sync::{Arc, Mutex};

use crosscall::{callback_fn, Broadcaster, CallbackRef, ListenerKey};

/// Listener that appends `(tag, message)` to a shared journal.
fn recording(journal: &Arc<Mutex<Vec<(u32, i32)>>>, tag: u32) -> CallbackRef<i32> {
    let journal = Arc::clone(journal);
    callback_fn(move |message: i32| journal.lock().unwrap().push((tag, message)))
}

fn sorted(journal: &Arc<Mutex<Vec<(u32, i32)>>>) -> Vec<(u32, i32)> {
    let mut entries = journal.lock().unwrap().clone();
    entries.sort_unstable();
    entries
}

#[test]
fn creation_has_no_listeners() {
    let broadcaster = Broadcaster::<i32>::new();

    assert!(!broadcaster.has_listeners());
    assert_eq!(broadcaster.listeners_count(), 0);
}

#[test]
fn add_listener_under_own_address() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);

    assert!(broadcaster.add_listener(&listener));
    assert!(broadcaster.has_listeners());
    assert_eq!(broadcaster.listeners_count(), 1);
}

#[test]
fn duplicate_add_is_rejected() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);

    assert!(broadcaster.add_listener(&listener));
    assert!(!broadcaster.add_listener(&listener));
    assert_eq!(broadcaster.listeners_count(), 1);
}

#[test]
fn remove_listener_by_own_address() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);
    broadcaster.add_listener(&listener);

    assert!(broadcaster.remove_listener(&listener));
    assert!(!broadcaster.has_listeners());
    assert_eq!(broadcaster.listeners_count(), 0);
}

#[test]
fn removing_an_unregistered_listener_fails() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let registered = recording(&journal, 1);
    let other = recording(&journal, 2);
    broadcaster.add_listener(&registered);

    assert!(!broadcaster.remove_listener(&other));
    assert_eq!(broadcaster.listeners_count(), 1);
}

#[test]
fn add_and_remove_under_custom_key() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);
    let key = ListenerKey::token(238445);

    assert!(broadcaster.add_listener_with_key(&listener, key));
    assert_eq!(broadcaster.listeners_count(), 1);

    assert!(!broadcaster.remove_key(ListenerKey::token(34644)));
    assert_eq!(broadcaster.listeners_count(), 1);

    assert!(broadcaster.remove_key(key));
    assert_eq!(broadcaster.listeners_count(), 0);
}

#[test]
fn custom_key_entry_is_not_removable_by_handle() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);
    broadcaster.add_listener_with_key(&listener, ListenerKey::token(3444));

    // Removal by the handle's own address misses entries filed under a
    // custom key; the listener stays registered.
    assert!(!broadcaster.remove_listener(&listener));
    assert!(broadcaster.has_listeners());
    assert_eq!(broadcaster.listeners_count(), 1);

    assert!(broadcaster.remove_key(ListenerKey::token(3444)));
    assert_eq!(broadcaster.listeners_count(), 0);
}

#[test]
fn address_keyed_entry_is_not_removable_by_custom_key() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let listener = recording(&journal, 1);
    broadcaster.add_listener(&listener);

    assert!(!broadcaster.remove_key(ListenerKey::token(999)));
    assert_eq!(broadcaster.listeners_count(), 1);

    assert!(broadcaster.remove_listener(&listener));
    assert_eq!(broadcaster.listeners_count(), 0);
}

#[test]
fn second_listener_under_occupied_key_is_rejected() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let first = recording(&journal, 1);
    let second = recording(&journal, 2);
    let key = ListenerKey::token(7);

    assert!(broadcaster.add_listener_with_key(&first, key));
    assert!(!broadcaster.add_listener_with_key(&second, key));
    assert_eq!(broadcaster.listeners_count(), 1);

    broadcaster.broadcast(9);
    assert_eq!(sorted(&journal), vec![(1, 9)]);
}

#[test]
fn counts_track_distinct_keys() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let a = recording(&journal, 1);
    let b = recording(&journal, 2);

    broadcaster.add_listener(&a);
    broadcaster.add_listener_with_key(&a, ListenerKey::token(100));
    broadcaster.add_listener(&b);
    assert_eq!(broadcaster.listeners_count(), 3);

    broadcaster.remove_key(ListenerKey::token(100));
    assert_eq!(broadcaster.listeners_count(), 2);
    assert!(broadcaster.has_listeners());

    broadcaster.remove_listener(&a);
    broadcaster.remove_listener(&b);
    assert_eq!(broadcaster.listeners_count(), 0);
    assert!(!broadcaster.has_listeners());
}

#[test]
fn broadcast_reaches_every_listener_exactly_once() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let a = recording(&journal, 1);
    let b = recording(&journal, 2);
    let c = recording(&journal, 3);
    broadcaster.add_listener(&a);
    broadcaster.add_listener(&b);
    broadcaster.add_listener(&c);

    broadcaster.broadcast(365444);

    assert_eq!(sorted(&journal), vec![(1, 365444), (2, 365444), (3, 365444)]);
}

#[test]
fn broadcast_skips_removed_listeners() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Broadcaster::new();
    let a = recording(&journal, 1);
    let b = recording(&journal, 2);
    let c = recording(&journal, 3);
    broadcaster.add_listener(&a);
    broadcaster.add_listener(&b);
    broadcaster.add_listener(&c);
    broadcaster.remove_listener(&b);

    broadcaster.broadcast(365444);

    assert_eq!(sorted(&journal), vec![(1, 365444), (3, 365444)]);
}

#[test]
fn listener_may_remove_another_listener_mid_broadcast() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Arc::new(Broadcaster::new());
    let a = recording(&journal, 1);
    let c = recording(&journal, 3);
    let victim_key = ListenerKey::token(42);

    let remover: CallbackRef<i32> = {
        let journal = Arc::clone(&journal);
        let broadcaster = Arc::clone(&broadcaster);
        callback_fn(move |message: i32| {
            journal.lock().unwrap().push((2, message));
            broadcaster.remove_key(victim_key);
        })
    };

    broadcaster.add_listener(&a);
    broadcaster.add_listener(&remover);
    broadcaster.add_listener_with_key(&c, victim_key);

    // Delivery targets the set present at call start: every listener —
    // including the one removed mid-flight — runs exactly once.
    broadcaster.broadcast(5);
    assert_eq!(sorted(&journal), vec![(1, 5), (2, 5), (3, 5)]);
    assert_eq!(broadcaster.listeners_count(), 2);

    journal.lock().unwrap().clear();
    broadcaster.broadcast(6);
    assert_eq!(sorted(&journal), vec![(1, 6), (2, 6)]);
}

#[test]
fn listener_may_remove_itself_mid_broadcast() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Arc::new(Broadcaster::new());
    let key = ListenerKey::token(1);

    let one_shot: CallbackRef<i32> = {
        let journal = Arc::clone(&journal);
        let broadcaster = Arc::clone(&broadcaster);
        callback_fn(move |message: i32| {
            journal.lock().unwrap().push((1, message));
            broadcaster.remove_key(key);
        })
    };
    broadcaster.add_listener_with_key(&one_shot, key);

    broadcaster.broadcast(10);
    broadcaster.broadcast(11);

    assert_eq!(sorted(&journal), vec![(1, 10)]);
    assert!(!broadcaster.has_listeners());
}

#[test]
fn listener_added_mid_broadcast_joins_the_next_round() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let broadcaster = Arc::new(Broadcaster::new());
    let late = recording(&journal, 9);

    let recruiter: CallbackRef<i32> = {
        let journal = Arc::clone(&journal);
        let broadcaster = Arc::clone(&broadcaster);
        let late = Arc::clone(&late);
        callback_fn(move |message: i32| {
            journal.lock().unwrap().push((1, message));
            broadcaster.add_listener(&late);
        })
    };
    broadcaster.add_listener(&recruiter);

    broadcaster.broadcast(20);
    assert_eq!(sorted(&journal), vec![(1, 20)]);

    journal.lock().unwrap().clear();
    broadcaster.broadcast(21);
    assert_eq!(sorted(&journal), vec![(1, 21), (9, 21)]);
    assert_eq!(broadcaster.listeners_count(), 2);
}

#[test]
fn concurrent_registration_from_multiple_threads() {
    let broadcaster = Arc::new(Broadcaster::<i32>::new());
    let threads: Vec<_> = (0..4u32)
        .map(|t| {
            let broadcaster = Arc::clone(&broadcaster);
            std::thread::spawn(move || {
                for i in 0..50u32 {
                    let listener = callback_fn(|_: i32| {});
                    assert!(broadcaster
                        .add_listener_with_key(&listener, ListenerKey::token((t * 50 + i) as usize)));
                    broadcaster.broadcast(1);
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(broadcaster.listeners_count(), 200);
}
