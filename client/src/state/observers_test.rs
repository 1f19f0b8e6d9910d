use super::*;

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn Fn(&u32)>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_for_factory = Rc::clone(&log);
    let factory = move |name: &'static str| -> Box<dyn Fn(&u32)> {
        let log = Rc::clone(&log_for_factory);
        Box::new(move |v: &u32| log.borrow_mut().push(format!("{name}:{v}")))
    };
    (log, factory)
}

#[test]
fn notify_runs_callbacks_in_subscription_order() {
    let observers = Observers::<u32>::new();
    let (log, make) = recorder();
    let _a = observers.subscribe(make("a"));
    let _b = observers.subscribe(make("b"));
    let _c = observers.subscribe(make("c"));

    observers.notify(&7);

    assert_eq!(*log.borrow(), vec!["a:7", "b:7", "c:7"]);
}

#[test]
fn unsubscribe_removes_only_that_callback() {
    let observers = Observers::<u32>::new();
    let (log, make) = recorder();
    let a = observers.subscribe(make("a"));
    let _b = observers.subscribe(make("b"));

    a.unsubscribe();
    observers.notify(&1);

    assert_eq!(*log.borrow(), vec!["b:1"]);
    assert_eq!(observers.len(), 1);
}

#[test]
fn callback_may_subscribe_reentrantly() {
    let observers = Observers::<u32>::new();
    let seen = Rc::new(Cell::new(0));
    let inner_observers = observers.clone();
    let seen_outer = Rc::clone(&seen);
    let _outer = observers.subscribe(move |_| {
        seen_outer.set(seen_outer.get() + 1);
        let seen_inner = Rc::clone(&seen_outer);
        let _ = inner_observers.subscribe(move |_| seen_inner.set(seen_inner.get() + 100));
    });

    observers.notify(&0);
    assert_eq!(seen.get(), 1, "new subscriber waits for the next notification");

    observers.notify(&0);
    assert_eq!(seen.get(), 1 + 1 + 100);
}

#[test]
fn unsubscribe_after_list_dropped_is_harmless() {
    let observers = Observers::<u32>::new();
    let sub = observers.subscribe(|_| {});
    drop(observers);
    sub.unsubscribe();
}

#[test]
fn clear_empties_the_list() {
    let observers = Observers::<u32>::new();
    let _a = observers.subscribe(|_| {});
    let _b = observers.subscribe(|_| {});
    assert_eq!(observers.len(), 2);
    observers.clear();
    assert!(observers.is_empty());
}
