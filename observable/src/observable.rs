use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::{
    error::ObservableError,
    policy::NotifyPolicy,
    subscription::{Callback, OwnerId, Subscriber, SubscriptionId, SubscriptionKey},
};

/// A value container that synchronously notifies its subscribers on every mutation.
///
/// Cloning an `Observable` yields another handle to the same value and subscription list.
/// The state (and every remaining subscription) is dropped with the last handle.
pub struct Observable<T>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    version: u64,
    next_id: u64,
    policy: NotifyPolicy,
    // Kept in registration order, which is also ascending id order
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) { trace!(subscribers = self.subscribers.len(), version = self.version, "observable dropped"); }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Observable<T> {
    /// Creates a new observable holding `value`, with no subscriptions
    pub fn new(value: T) -> Self { Self::with_policy(value, NotifyPolicy::default()) }

    pub fn with_policy(value: T, policy: NotifyPolicy) -> Self {
        Self(Rc::new(RefCell::new(Inner { value, version: 0, next_id: 0, policy, subscribers: Vec::new() })))
    }

    pub fn policy(&self) -> NotifyPolicy { self.0.borrow().policy }

    /// Calls a closure with a borrow of the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&self.0.borrow().value) }

    /// Number of committed mutations. Setting an equal value still counts.
    pub fn version(&self) -> u64 { self.0.borrow().version }

    pub fn subscriber_count(&self) -> usize { self.0.borrow().subscribers.len() }

    /// Whether any subscription currently carries `key`
    pub fn is_subscribed(&self, key: impl Into<SubscriptionKey>) -> bool {
        let key = key.into();
        self.0.borrow().subscribers.iter().any(|s| s.matches(&key))
    }

    /// Subscribe an anonymous callback receiving `(old, new)`. It can be removed with
    /// [`remove`](Self::remove) or [`clear`](Self::clear), or keyed later with
    /// [`name_latest`](Self::name_latest) / [`set_key`](Self::set_key).
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where F: Fn(&T, &T) + 'static {
        self.insert(None, Rc::new(callback))
    }

    /// Subscribe a callback tagged with `key` for later removal via [`unsubscribe`](Self::unsubscribe)
    pub fn subscribe_keyed<K, F>(&self, key: K, callback: F) -> SubscriptionId
    where
        K: Into<SubscriptionKey>,
        F: Fn(&T, &T) + 'static,
    {
        self.insert(Some(key.into()), Rc::new(callback))
    }

    /// Subscribe a callback tagged with the identity of `owner`.
    ///
    /// The key is the address `owner` points at. For an `Rc`/`Arc` owner pass the pointee
    /// (`&*rc`); passing `&rc` keys on the local pointer binding instead.
    pub fn subscribe_owned<O, F>(&self, owner: &O, callback: F) -> SubscriptionId
    where
        O: ?Sized,
        F: Fn(&T, &T) + 'static,
    {
        self.insert(Some(SubscriptionKey::Owner(OwnerId::of(owner))), Rc::new(callback))
    }

    fn insert(&self, key: Option<SubscriptionKey>, callback: Callback<T>) -> SubscriptionId {
        let mut inner = self.0.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        debug!(%id, ?key, "subscribe");
        inner.subscribers.push(Subscriber { id, key, callback });
        id
    }

    /// Names the most recently added subscription that is still registered
    pub fn name_latest(&self, name: impl Into<String>) -> Result<SubscriptionId, ObservableError> {
        let mut inner = self.0.borrow_mut();
        let latest = inner.subscribers.last_mut().ok_or(ObservableError::NoSubscription)?;
        latest.key = Some(SubscriptionKey::Name(name.into()));
        Ok(latest.id)
    }

    /// Replaces the key of an existing subscription
    pub fn set_key(&self, id: SubscriptionId, key: impl Into<SubscriptionKey>) -> Result<(), ObservableError> {
        let mut inner = self.0.borrow_mut();
        let index = inner.subscribers.binary_search_by_key(&id, |s| s.id).map_err(|_| ObservableError::UnknownSubscription(id))?;
        inner.subscribers[index].key = Some(key.into());
        Ok(())
    }

    /// Removes a single subscription by id. Returns false if it was already gone.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut inner = self.0.borrow_mut();
            match inner.subscribers.binary_search_by_key(&id, |s| s.id) {
                Ok(index) => inner.subscribers.remove(index),
                Err(_) => return false,
            }
        };
        debug!(%id, "remove subscription");
        // must drop outside the borrow: callback captures may read this observable in Drop
        drop(removed);
        true
    }

    /// Removes every subscription carrying `key` and returns how many were removed.
    /// Unkeyed subscriptions are never removed, and an unknown key is a no-op.
    pub fn unsubscribe(&self, key: impl Into<SubscriptionKey>) -> usize {
        let key = key.into();
        let removed: Vec<Subscriber<T>> = {
            let mut inner = self.0.borrow_mut();
            let (removed, kept) = std::mem::take(&mut inner.subscribers).into_iter().partition(|s| s.matches(&key));
            inner.subscribers = kept;
            removed
        };
        debug!(%key, removed = removed.len(), "unsubscribe");
        removed.len()
    }

    pub fn unsubscribe_owner<O: ?Sized>(&self, owner: &O) -> usize { self.unsubscribe(OwnerId::of(owner)) }

    /// Removes all subscriptions, keyed or not. The value is untouched.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut self.0.borrow_mut().subscribers);
        debug!(removed = removed.len(), "clear subscriptions");
        removed.len()
    }

    fn is_active(&self, id: SubscriptionId) -> bool { self.0.borrow().subscribers.binary_search_by_key(&id, |s| s.id).is_ok() }

    /// Invokes each snapshotted callback in order. No borrow is held while a callback runs,
    /// so callbacks may read, set, subscribe or unsubscribe re-entrantly.
    fn notify(&self, subscribers: &[(SubscriptionId, Callback<T>)], old: &T, new: &T, policy: NotifyPolicy) -> Result<(), ObservableError> {
        let mut failed = Vec::new();
        for (id, callback) in subscribers {
            // removed by an earlier callback of this same notification
            if !self.is_active(*id) {
                continue;
            }
            match policy {
                NotifyPolicy::Propagate => callback(old, new),
                NotifyPolicy::Isolate => {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(old, new))) {
                        warn!(%id, reason = panic_message(payload.as_ref()), "subscriber callback panicked");
                        failed.push(*id);
                    }
                }
            }
        }
        if failed.is_empty() { Ok(()) } else { Err(ObservableError::CallbackPanicked { failed }) }
    }
}

impl<T: Clone> Observable<T> {
    /// Returns a clone of the current value
    pub fn get(&self) -> T { self.0.borrow().value.clone() }

    /// Stores `value` and notifies every subscriber with `(old, new)` before returning.
    /// Notification is unconditional, even when `value` equals the current value.
    ///
    /// Requires `T: Clone` because subscribers borrow the new value while the observable stays
    /// free for re-entrant reads and sets.
    ///
    /// Under [`NotifyPolicy::Propagate`] a panicking callback panics here.
    pub fn set(&self, value: T) { let _ = self.try_set(value); }

    /// Like [`set`](Self::set) but reports callbacks that panicked under [`NotifyPolicy::Isolate`]
    pub fn try_set(&self, value: T) -> Result<(), ObservableError> { self.commit(|current| std::mem::replace(current, value)).1 }

    /// Stores `value`, notifies, and returns the previous value
    pub fn replace(&self, value: T) -> T { self.commit(|current| std::mem::replace(current, value)).0 }

    /// Mutates the value in place and notifies with the value from before `f` ran.
    /// `f` must not access this observable.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let _ = self.commit(|current| {
            let old = current.clone();
            f(current);
            old
        });
    }

    fn commit(&self, mutate: impl FnOnce(&mut T) -> T) -> (T, Result<(), ObservableError>) {
        let (old, new, subscribers, policy) = {
            let mut inner = self.0.borrow_mut();
            let old = mutate(&mut inner.value);
            inner.version += 1;
            trace!(version = inner.version, subscribers = inner.subscribers.len(), "notify");
            let subscribers: Vec<_> = inner.subscribers.iter().map(|s| (s.id, s.callback.clone())).collect();
            (old, inner.value.clone(), subscribers, inner.policy)
        };
        let result = self.notify(&subscribers, &old, &new, policy);
        (old, result)
    }
}

/// Sugar for [`Observable::set`]
pub fn assign<T: Clone>(observable: &Observable<T>, value: T) { observable.set(value) }

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.with(|v| write!(f, "{v}")) }
}
