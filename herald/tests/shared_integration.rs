//! Shared listeners seen through an event manager over repeated triggers.

use herald::{
    Event, EventError, EventManager, Listener, Params, SharedEventManager, WILDCARD,
    testing::CountingListener,
};
use std::sync::Arc;

mod common;
use common::{fire, returning};

fn setup() -> (Arc<SharedEventManager<()>>, EventManager<()>) {
    let shared = Arc::new(SharedEventManager::new());
    let events = EventManager::with_shared(Arc::clone(&shared), ["Foo", "Bar", "Baz"]).unwrap();
    (shared, events)
}

#[test]
fn test_same_shared_listener_runs_once_per_trigger() {
    let (shared, events) = setup();
    let counter = CountingListener::new();
    shared.attach("Foo", "foo", counter.listener()).unwrap();

    for _ in 0..37 {
        fire(&events, "foo");
    }
    assert_eq!(counter.count(), 37);
}

#[test]
fn test_new_shared_listeners_are_picked_up() {
    let (shared, events) = setup();
    let counters: Vec<CountingListener> = (0..5).map(|_| CountingListener::new()).collect();

    for counter in &counters {
        shared.attach("Foo", "foo", counter.listener()).unwrap();
        fire(&events, "foo");
    }

    for (i, counter) in counters.iter().enumerate() {
        assert_eq!(counter.count(), 5 - i, "listener {i}");
    }
}

#[test]
fn test_detached_shared_listeners_stop_running() {
    let (shared, events) = setup();
    let counters: Vec<CountingListener> = (0..5).map(|_| CountingListener::new()).collect();
    let listeners: Vec<Listener<()>> = counters
        .iter()
        .map(|counter| shared.attach("Foo", "foo", counter.listener()).unwrap())
        .collect();

    for listener in &listeners {
        shared.detach(listener, Some("Foo"), Some("foo")).unwrap();
        fire(&events, "foo");
    }

    for (i, counter) in counters.iter().enumerate() {
        assert_eq!(counter.count(), i, "listener {i}");
    }
}

#[test]
fn test_shared_listener_for_other_identifier_is_ignored() {
    let (shared, events) = setup();
    let counter = CountingListener::new();
    shared.attach("Qux", "foo", counter.listener()).unwrap();
    fire(&events, "foo");
    assert_eq!(counter.count(), 0);

    events.add_identifiers(["Qux"]).unwrap();
    fire(&events, "foo");
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_shared_wildcard_listeners_run_for_every_event() {
    let shared = Arc::new(SharedEventManager::new());
    let events = EventManager::with_shared(Arc::clone(&shared), ["Foo"]).unwrap();
    shared.attach("Foo", WILDCARD, returning("foo-any")).unwrap();
    shared.attach(WILDCARD, "bar", returning("any-bar")).unwrap();

    assert_eq!(fire(&events, "foo"), vec!["foo-any"]);
    assert_eq!(fire(&events, "bar"), vec!["foo-any", "any-bar"]);
}

#[test]
fn test_shared_clear_is_observed() {
    let shared = Arc::new(SharedEventManager::new());
    let events = EventManager::with_shared(Arc::clone(&shared), ["Foo"]).unwrap();
    shared.attach("Foo", "foo", returning(1)).unwrap();
    shared.attach("Foo", WILDCARD, returning(2)).unwrap();
    assert_eq!(fire(&events, "foo"), vec![1, 2]);

    assert!(shared.clear_listeners("Foo", Some("foo")));
    assert_eq!(fire(&events, "foo"), vec![2]);

    assert!(shared.clear_listeners("Foo", None));
    assert!(fire(&events, "foo").is_empty());
    assert!(!shared.clear_listeners("Foo", None));
}

#[test]
fn test_managers_share_one_registry() {
    let shared = Arc::new(SharedEventManager::new());
    let first = EventManager::with_shared(Arc::clone(&shared), ["Foo"]).unwrap();
    let second = EventManager::with_shared(Arc::clone(&shared), ["Bar"]).unwrap();
    shared.attach("Foo", "save", returning("foo")).unwrap();
    shared.attach(WILDCARD, "save", returning("all")).unwrap();

    assert_eq!(fire(&first, "save"), vec!["foo", "all"]);
    assert_eq!(fire(&second, "save"), vec!["all"]);
    assert!(Arc::ptr_eq(first.shared_manager().unwrap(), &shared));
}

#[test]
fn test_local_detach_leaves_shared_listener() {
    let (shared, events) = setup();
    let counter = CountingListener::new();
    let listener = shared.attach("Foo", "foo", counter.listener()).unwrap();
    fire(&events, "foo");

    events.detach(&listener, None).unwrap();
    fire(&events, "foo");
    assert_eq!(counter.count(), 2);
}

#[test]
fn test_concurrent_attach_while_triggering() {
    let (shared, events) = setup();
    let events = Arc::new(events);
    let counter = CountingListener::new();

    let writer = {
        let shared = Arc::clone(&shared);
        let counter = counter.clone();
        std::thread::spawn(move || {
            for _ in 0..50 {
                shared.attach("Foo", "foo", counter.listener()).unwrap();
            }
        })
    };
    let reader = {
        let events = Arc::clone(&events);
        std::thread::spawn(move || {
            for _ in 0..50 {
                fire(&events, "foo");
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    // Once both sides are done, every listener runs exactly once per trigger.
    counter.reset();
    fire(&events, "foo");
    assert_eq!(counter.count(), 50);
}

#[test]
fn test_listener_error_keeps_shared_listeners_attached() {
    let (shared, events) = setup();
    let counter = CountingListener::new();
    shared.attach("Foo", "foo", counter.listener()).unwrap();
    let failing = events
        .attach_with_priority(
            "foo",
            Listener::new(|_: &mut Event| Err("rejected".into())),
            10,
        )
        .unwrap();

    let err = events.trigger("foo", None, Params::new()).unwrap_err();
    assert!(matches!(err, EventError::Listener(_)));
    assert_eq!(counter.count(), 0);

    events.detach(&failing, None).unwrap();
    fire(&events, "foo");
    assert_eq!(counter.count(), 1);
    assert_eq!(events.listeners("foo").unwrap().len(), 1);
}

#[test]
fn test_clearing_wildcard_keeps_shared_listeners() {
    let (shared, events) = setup();
    let counter = CountingListener::new();
    shared.attach("Foo", WILDCARD, counter.listener()).unwrap();
    events.attach(WILDCARD, returning(())).unwrap();
    assert_eq!(fire(&events, "foo").len(), 2);

    assert!(events.clear_listeners(WILDCARD));
    assert_eq!(fire(&events, "foo").len(), 1);
    assert_eq!(counter.count(), 2);
}
