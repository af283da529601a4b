/*!
A single reactive value: an [`Observable<T>`] holds a value and synchronously notifies its
subscribers with `(old, new)` every time the value is set.

# Design requirements:
- Notification is synchronous and complete before `set` returns. There is no queue.
- Every set notifies, even if the new value equals the old one.
- Subscribers are notified in registration order.
- A subscription lives until it is removed or the observable is dropped. There are no guards.
- Subscriptions may carry a key (a name, or the identity of an owner) for selective removal.
  Unkeyed subscriptions only go away via `remove(id)` or `clear()`.

# Basic usage

```rust
use observable::*;
use std::{cell::RefCell, rc::Rc};

let seen = Rc::new(RefCell::new(Vec::new()));
let name = Observable::new(String::new());
{
    let seen = seen.clone();
    name.subscribe_keyed("K", move |old: &String, new: &String| seen.borrow_mut().push(format!("{old} -> {new}")));
}
name.set("a".to_string());
name.set("b".to_string());
assign(&name, "a".to_string());
name.unsubscribe("K");
name.set("c".to_string());

assert_eq!(*seen.borrow(), [" -> a", "a -> b", "b -> a"]);
assert_eq!(name.get(), "c");
```

# Owner-keyed subscriptions

```rust
use observable::*;

struct Panel {
    title: String,
}

let panel = Panel { title: "status".into() };
let count = Observable::new(0u32);
count.subscribe_owned(&panel, |old, new| println!("{old} -> {new}"));
println!("{} subscribed", panel.title);
count.set(1);
assert_eq!(count.unsubscribe_owner(&panel), 1);
```

# Re-entrancy

Callbacks run with no internal borrow held, so they may read, set, subscribe or unsubscribe.
A `set` from inside a callback runs its whole notification before the outer one resumes:
subscribers later in the list receive the nested `(old, new)` first and the outer pair last,
so the last pair such a subscriber sees may not end on the current value. Read the value
with [`Observable::get`] when that matters.

# Threading

`Observable` is single-threaded (`!Send`, `!Sync`). Callers that need to share one across
threads must provide their own synchronization around it.
*/

mod error;
mod observable;
mod policy;
mod subscription;

pub use error::*;
pub use observable::*;
pub use policy::*;
pub use subscription::{OwnerId, SubscriptionId, SubscriptionKey};
