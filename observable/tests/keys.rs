mod common;
use common::change_watcher;
use observable::*;
use std::rc::Rc;

struct Owner {
    #[allow(unused)]
    name: &'static str,
}

#[test]
fn test_unsubscribe_removes_all_and_only_matching() {
    let value = Observable::new(0);
    let (k1, check_k1) = change_watcher::<i32>();
    let (k2, check_k2) = change_watcher::<i32>();
    let (other, check_other) = change_watcher::<i32>();
    let (anonymous, check_anonymous) = change_watcher::<i32>();

    value.subscribe_keyed("K", k1);
    value.subscribe_keyed("other", other);
    value.subscribe_keyed("K", k2);
    value.subscribe(anonymous);

    assert_eq!(value.unsubscribe("K"), 2);
    assert!(!value.is_subscribed("K"));
    value.set(1);

    assert!(check_k1().is_empty());
    assert!(check_k2().is_empty());
    assert_eq!(check_other(), [(0, 1)]);
    assert_eq!(check_anonymous(), [(0, 1)]);
}

#[test]
fn test_unknown_key_is_noop() {
    let value = Observable::new(0);
    let (watcher, check) = change_watcher::<i32>();
    value.subscribe_keyed("known", watcher);

    assert_eq!(value.unsubscribe("never-used"), 0);
    assert_eq!(value.unsubscribe_owner(&Owner { name: "stranger" }), 0);
    assert_eq!(value.subscriber_count(), 1);

    value.set(1);
    assert_eq!(check(), [(0, 1)]);
}

#[test]
fn test_resubscribe_after_removal() {
    let value = Observable::new(0);
    let (watcher, check) = change_watcher::<i32>();
    value.subscribe_keyed("K", watcher.clone());
    value.unsubscribe("K");
    value.set(1);
    assert!(check().is_empty());

    value.subscribe_keyed("K", watcher);
    value.set(2);
    assert_eq!(check(), [(1, 2)]);
}

#[test]
fn test_owner_identity_removal() {
    let value = Observable::new(0);
    let left = Owner { name: "left" };
    let right = Owner { name: "right" };
    let (left_watcher, check_left) = change_watcher::<i32>();
    let (right_watcher, check_right) = change_watcher::<i32>();

    value.subscribe_owned(&left, left_watcher);
    value.subscribe_owned(&right, right_watcher);

    assert_eq!(value.unsubscribe_owner(&left), 1);
    value.set(1);
    assert!(check_left().is_empty());
    assert_eq!(check_right(), [(0, 1)]);
}

#[test]
fn test_shared_owner_matches_across_clones() {
    let value = Observable::new(0);
    let owner = Rc::new(Owner { name: "shared" });
    let alias = owner.clone();
    value.subscribe_owned(&*owner, |_, _| {});
    value.subscribe_owned(&*alias, |_, _| {});

    assert!(value.is_subscribed(OwnerId::of(&*owner)));
    assert_eq!(value.unsubscribe_owner(&*alias), 2);
}

#[test]
fn test_names_and_owners_never_collide() {
    let value = Observable::new(0);
    let token = OwnerId::unique();
    value.subscribe_keyed(token, |_, _| {});
    value.subscribe_keyed(token, |_, _| {});
    value.subscribe_keyed("owner", |_, _| {});

    assert_eq!(value.unsubscribe("owner"), 1);
    assert_eq!(value.unsubscribe(OwnerId::unique()), 0);
    assert_eq!(value.unsubscribe(token), 2);
    assert_eq!(value.subscriber_count(), 0);
}
