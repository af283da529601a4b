use std::{cell::RefCell, rc::Rc};

/// Returns a subscriber callback that records every `(old, new)` pair it receives, and a
/// checker that drains what was recorded since the last check.
#[allow(unused)]
pub fn change_watcher<T: Clone + 'static>() -> (impl Fn(&T, &T) + Clone + 'static, impl Fn() -> Vec<(T, T)>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let watcher = {
        let changes = changes.clone();
        move |old: &T, new: &T| changes.borrow_mut().push((old.clone(), new.clone()))
    };
    let check = move || changes.borrow_mut().drain(..).collect::<Vec<_>>();
    (watcher, check)
}

/// Records a label for each invocation into a shared log, to check relative ordering
#[allow(unused)]
pub fn order_log() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn(&i32, &i32)>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let make = {
        let log = log.clone();
        move |label: &'static str| -> Box<dyn Fn(&i32, &i32)> {
            let log = log.clone();
            Box::new(move |_: &i32, _: &i32| log.borrow_mut().push(label))
        }
    };
    (log, make)
}

#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init(); }
