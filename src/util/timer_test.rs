use super::*;

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let make = move |label: &'static str| -> Box<dyn FnOnce()> {
        let sink = sink.clone();
        Box::new(move || sink.borrow_mut().push(label))
    };
    (log, make)
}

#[test]
fn timer_fires_once_when_due() {
    let timers = ManualTimers::new();
    let (log, make) = recorder();
    let _guard = timers.schedule(Duration::from_millis(5000), make("alert"));

    timers.advance(Duration::from_millis(4999));
    assert!(log.borrow().is_empty());

    timers.advance(Duration::from_millis(1));
    assert_eq!(*log.borrow(), vec!["alert"]);

    timers.advance(Duration::from_secs(60));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(timers.pending(), 0);
}

#[test]
fn dropping_guard_cancels() {
    let timers = ManualTimers::new();
    let (log, make) = recorder();
    let guard = timers.schedule(Duration::from_millis(10), make("never"));
    assert_eq!(timers.pending(), 1);

    guard.cancel();
    assert_eq!(timers.pending(), 0);
    timers.advance(Duration::from_millis(100));
    assert!(log.borrow().is_empty());
}

#[test]
fn timers_fire_in_due_order() {
    let timers = ManualTimers::new();
    let (log, make) = recorder();
    let _late = timers.schedule(Duration::from_millis(30), make("late"));
    let _early = timers.schedule(Duration::from_millis(10), make("early"));
    let _tie = timers.schedule(Duration::from_millis(30), make("tie"));

    timers.advance(Duration::from_millis(30));
    assert_eq!(*log.borrow(), vec!["early", "late", "tie"]);
    assert_eq!(timers.now(), Duration::from_millis(30));
}

#[test]
fn callback_may_schedule_follow_up() {
    let timers = ManualTimers::new();
    let fired = Rc::new(Cell::new(0));
    let follow_up: Rc<RefCell<Option<TimerGuard>>> = Rc::new(RefCell::new(None));

    let inner_timers = timers.clone();
    let inner_fired = fired.clone();
    let slot = follow_up.clone();
    let _first = timers.schedule(
        Duration::from_millis(10),
        Box::new(move || {
            inner_fired.set(inner_fired.get() + 1);
            let again = inner_fired.clone();
            let guard = inner_timers.schedule(Duration::from_millis(10), Box::new(move || again.set(again.get() + 1)));
            *slot.borrow_mut() = Some(guard);
        }),
    );

    timers.advance(Duration::from_millis(25));
    assert_eq!(fired.get(), 2);
}

#[test]
fn guard_outliving_timers_is_harmless() {
    let timers = ManualTimers::new();
    let (_log, make) = recorder();
    let guard = timers.schedule(Duration::from_millis(10), make("x"));
    drop(timers);
    drop(guard);
}
