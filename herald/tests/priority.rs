//! Ordering of listeners across priorities and registration sources.

use herald::{EventManager, SharedEventManager, WILDCARD};
use std::sync::Arc;

mod common;
use common::{accumulate, accumulating_event, values};

const IDENTIFIER: &str = "PriorityTest";

fn setup() -> (Arc<SharedEventManager<()>>, EventManager<()>) {
    let shared = Arc::new(SharedEventManager::new());
    let events = EventManager::with_shared(Arc::clone(&shared), [IDENTIFIER]).unwrap();
    (shared, events)
}

fn run(events: &EventManager<()>) -> Vec<i32> {
    let (mut event, accumulator) = accumulating_event();
    events.trigger_event(&mut event).unwrap();
    values(&accumulator)
}

#[test]
fn test_different_priorities_run_highest_first() {
    let (_shared, events) = setup();
    for i in -1..5 {
        events.attach_with_priority("test", accumulate(i), i).unwrap();
    }
    assert_eq!(run(&events), vec![4, 3, 2, 1, 0, -1]);
}

#[test]
fn test_same_priority_runs_in_attach_order() {
    let (_shared, events) = setup();
    for i in -1..5 {
        events.attach("test", accumulate(i)).unwrap();
    }
    assert_eq!(run(&events), vec![-1, 0, 1, 2, 3, 4]);
}

#[test]
fn test_wildcard_after_explicit() {
    let (_shared, events) = setup();
    events.attach_with_priority(WILDCARD, accumulate(2), 5).unwrap();
    events.attach_with_priority("test", accumulate(1), 5).unwrap();
    events.attach_with_priority(WILDCARD, accumulate(3), 5).unwrap();
    assert_eq!(run(&events), vec![1, 2, 3]);
}

#[test]
fn test_shared_after_wildcard() {
    let (shared, events) = setup();
    shared
        .attach_with_priority(IDENTIFIER, "test", accumulate(2), 5)
        .unwrap();
    events.attach_with_priority(WILDCARD, accumulate(1), 5).unwrap();
    shared
        .attach_with_priority(IDENTIFIER, "test", accumulate(3), 5)
        .unwrap();
    assert_eq!(run(&events), vec![1, 2, 3]);
}

#[test]
fn test_shared_wildcard_event_after_shared() {
    let (shared, events) = setup();
    shared
        .attach_with_priority(IDENTIFIER, WILDCARD, accumulate(2), 5)
        .unwrap();
    shared
        .attach_with_priority(IDENTIFIER, "test", accumulate(1), 5)
        .unwrap();
    shared
        .attach_with_priority(IDENTIFIER, WILDCARD, accumulate(3), 5)
        .unwrap();
    assert_eq!(run(&events), vec![1, 2, 3]);
}

#[test]
fn test_wildcard_identifier_after_named_identifier() {
    let (shared, events) = setup();
    shared
        .attach_with_priority(WILDCARD, "test", accumulate(2), 5)
        .unwrap();
    shared
        .attach_with_priority(IDENTIFIER, WILDCARD, accumulate(1), 5)
        .unwrap();
    shared
        .attach_with_priority(WILDCARD, "test", accumulate(3), 5)
        .unwrap();
    assert_eq!(run(&events), vec![1, 2, 3]);
}

#[test]
fn test_fully_wildcard_shared_runs_last() {
    let (shared, events) = setup();
    shared
        .attach_with_priority(WILDCARD, WILDCARD, accumulate(2), 5)
        .unwrap();
    shared
        .attach_with_priority(WILDCARD, "test", accumulate(1), 5)
        .unwrap();
    shared
        .attach_with_priority(WILDCARD, WILDCARD, accumulate(3), 5)
        .unwrap();
    assert_eq!(run(&events), vec![1, 2, 3]);
}

#[test]
fn test_identifier_order_decides_between_shared_groups() {
    let shared = Arc::new(SharedEventManager::new());
    let events = EventManager::with_shared(Arc::clone(&shared), ["Second", "First"]).unwrap();
    shared.attach("First", "test", accumulate(2)).unwrap();
    shared.attach("Second", WILDCARD, accumulate(1)).unwrap();
    assert_eq!(run(&events), vec![1, 2]);

    events.set_identifiers(["First", "Second"]).unwrap();
    assert_eq!(run(&events), vec![2, 1]);
}

#[test]
fn test_mix_of_all_sources() {
    let (shared, events) = setup();
    let local = |event: &str, value: i32, priority: i32| {
        events
            .attach_with_priority(event, accumulate(value), priority)
            .unwrap();
    };
    let remote = |identifier: &str, event: &str, value: i32, priority: i32| {
        shared
            .attach_with_priority(identifier, event, accumulate(value), priority)
            .unwrap();
    };

    remote(WILDCARD, WILDCARD, 1024, 1024);
    remote(WILDCARD, WILDCARD, 1023, 1024);
    local(WILDCARD, 1025, 1024);
    local("test", 1026, 1024);

    remote(WILDCARD, "test", 512, 512);
    remote(WILDCARD, WILDCARD, 510, 512);
    remote(WILDCARD, "test", 511, 512);
    local(WILDCARD, 513, 512);
    local("test", 514, 512);

    remote(IDENTIFIER, WILDCARD, 256, 256);
    remote(WILDCARD, WILDCARD, 253, 256);
    remote(WILDCARD, "test", 254, 256);
    remote(IDENTIFIER, WILDCARD, 255, 256);
    local(WILDCARD, 257, 256);
    local("test", 258, 256);

    remote(IDENTIFIER, "test", 128, 128);
    remote(IDENTIFIER, WILDCARD, 126, 128);
    remote(WILDCARD, WILDCARD, 123, 128);
    remote(WILDCARD, "test", 124, 128);
    remote(IDENTIFIER, WILDCARD, 125, 128);
    remote(IDENTIFIER, "test", 127, 128);
    local(WILDCARD, 129, 128);
    local("test", 130, 128);

    local(WILDCARD, 64, 64);
    local(WILDCARD, 63, 64);
    local("test", 32, 32);
    local(WILDCARD, 30, 32);
    local("test", 31, 32);

    let values = run(&events);
    assert_eq!(values.len(), 28);
    assert!(
        values.windows(2).all(|pair| pair[0] > pair[1]),
        "values out of order: {values:?}"
    );
}

#[test]
fn test_order_is_stable_across_triggers() {
    let (shared, events) = setup();
    shared.attach(IDENTIFIER, "test", accumulate(2)).unwrap();
    events.attach(WILDCARD, accumulate(1)).unwrap();
    events.attach_with_priority("test", accumulate(3), 10).unwrap();

    let first = run(&events);
    assert_eq!(first, vec![3, 1, 2]);
    assert_eq!(run(&events), first);
    assert_eq!(run(&events), first);
}
