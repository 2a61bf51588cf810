//! Watch set lifecycle: bulk disposal, idempotence and cancellation.

mod support;

use std::sync::Arc;

use parking_lot::Mutex;

use lattice_watch::node::SequenceAccess;
use lattice_watch::reactive::{batch, Signal};
use lattice_watch::watch::register;
use lattice_watch::{IgnoreSet, Value, Watch, WatchState, Watcher};
use support::{root, List, Log, Record};

#[test]
fn stop_all_is_idempotent_and_silences_everything() {
    let person = Record::new("Person", [("name", Value::from("Bob"))]);
    let items = List::new([1, 2]);
    let log: Log<&'static str> = Log::new();

    let mut watcher = Watcher::new();
    let (a, b, c) = (log.clone(), log.clone(), log.clone());
    watcher
        .watch_shallow(root(&person), move |_, _| a.push("shallow"), IgnoreSet::new())
        .unwrap();
    watcher
        .watch_deep_detailed(root(&items), move |_| b.push("detailed"), IgnoreSet::new())
        .unwrap();
    watcher
        .watch_deep_silent(root(&person), move |_| c.push("silent"), IgnoreSet::new())
        .unwrap();
    assert_eq!(watcher.watches().len(), 1 + 3 + 1);
    log.take();

    watcher.stop_all_watches();
    watcher.stop_all_watches();
    assert!(watcher.watches().is_empty());

    person.set("name", "Ann");
    items.push(3);
    items.set(0, 9);
    assert!(log.take().is_empty());
}

#[test]
fn stop_all_on_a_fresh_watcher_is_a_noop() {
    let mut watcher = Watcher::new();
    watcher.stop_all_watches();
    assert!(watcher.watches().is_empty());
}

#[test]
fn watcher_can_register_again_after_stop_all() {
    let person = Record::new("Person", [("name", Value::from("Bob"))]);
    let log: Log<Value> = Log::new();

    let mut watcher = Watcher::new();
    let sink = log.clone();
    watcher
        .watch_shallow(root(&person), move |_, v| sink.push(v.clone()), IgnoreSet::new())
        .unwrap();
    watcher.stop_all_watches();

    let sink = log.clone();
    watcher
        .watch_shallow(root(&person), move |_, v| sink.push(v.clone()), IgnoreSet::new())
        .unwrap();
    log.take();

    person.set("name", "Ann");
    assert_eq!(log.take(), vec![Value::from("Ann")]);
}

#[test]
fn dropping_the_watcher_stops_its_watches() {
    let person = Record::new("Person", [("name", Value::from("Bob"))]);
    let log: Log<Value> = Log::new();

    {
        let mut watcher = Watcher::new();
        let sink = log.clone();
        watcher
            .watch_deep_silent(root(&person), move |v| sink.push(v.clone()), IgnoreSet::new())
            .unwrap();
    }
    log.take();

    person.set("name", "Ann");
    assert!(log.take().is_empty());
}

#[test]
fn watch_stopped_earlier_in_the_same_flush_does_not_run() {
    let trigger = Signal::new(0_u32);
    let victim_runs = Arc::new(Mutex::new(0_u32));
    let victim: Arc<Mutex<Option<Watch>>> = Arc::new(Mutex::new(None));

    // registered first, so it runs first in the flush
    let killer = register({
        let trigger = trigger.clone();
        let victim = victim.clone();
        move || {
            if trigger.get() > 0 {
                if let Some(watch) = victim.lock().as_ref() {
                    watch.stop();
                }
            }
        }
    });

    let watch = register({
        let trigger = trigger.clone();
        let victim_runs = victim_runs.clone();
        move || {
            trigger.get();
            *victim_runs.lock() += 1;
        }
    });
    *victim.lock() = Some(watch);
    assert_eq!(*victim_runs.lock(), 1);

    trigger.set(1);
    assert_eq!(*victim_runs.lock(), 1);
    assert_eq!(
        victim.lock().as_ref().map(Watch::state),
        Some(WatchState::Stopped)
    );
    assert_eq!(killer.state(), WatchState::Active);
}

#[test]
fn watches_registered_inside_a_batch_see_the_final_state() {
    let items = List::new([1]);
    let log: Log<Value> = Log::new();

    let mut watcher = Watcher::new();
    batch(|| {
        items.push(2);
        let sink = log.clone();
        watcher
            .watch_leaf(
                {
                    let items = items.clone();
                    move || Value::from(items.len())
                },
                move |v| sink.push(v.clone()),
            )
            .unwrap();
    });

    assert_eq!(log.take(), vec![Value::Int(2)]);
}
