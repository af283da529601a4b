use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Callback invoked with `(old, new)` on every mutation
pub(crate) type Callback<T> = Rc<dyn Fn(&T, &T) + 'static>;

/// A unique identifier for a subscription. Minted by an [`Observable`](crate::Observable) and
/// increasing in registration order, so it can also be used to sort subscriptions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

static NEXT_OWNER_TOKEN: AtomicUsize = AtomicUsize::new(0);

/// Identity of an owner for owner-keyed subscriptions.
///
/// Two ids taken with [`OwnerId::of`] are equal iff they were taken from the same address.
/// Zero-sized values may share an address, so for those (or whenever the owner may move)
/// mint a token with [`OwnerId::unique`] and keep it alongside the owner instead.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct OwnerId(Repr);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum Repr {
    Address(usize),
    Token(usize),
}

impl OwnerId {
    /// Identity of the value behind `owner`. For `Rc`/`Arc` owners pass the pointee (`&*rc`)
    /// so every clone of the pointer maps to the same id.
    pub fn of<O: ?Sized>(owner: &O) -> Self { OwnerId(Repr::Address((owner as *const O).cast::<()>() as usize)) }

    /// A fresh token that never compares equal to any other id
    pub fn unique() -> Self { OwnerId(Repr::Token(NEXT_OWNER_TOKEN.fetch_add(1, Ordering::Relaxed))) }
}

/// Optional removal key attached to a subscription.
///
/// Names compare by value, owners by identity. A name never matches an owner.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum SubscriptionKey {
    Name(String),
    Owner(OwnerId),
}

impl SubscriptionKey {
    pub fn owner<O: ?Sized>(owner: &O) -> Self { SubscriptionKey::Owner(OwnerId::of(owner)) }
}

impl std::fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionKey::Name(name) => write!(f, "name:{name}"),
            SubscriptionKey::Owner(OwnerId(Repr::Address(addr))) => write!(f, "owner:{addr:#x}"),
            SubscriptionKey::Owner(OwnerId(Repr::Token(token))) => write!(f, "owner:#{token}"),
        }
    }
}

impl From<&str> for SubscriptionKey {
    fn from(name: &str) -> Self { SubscriptionKey::Name(name.to_owned()) }
}

impl From<String> for SubscriptionKey {
    fn from(name: String) -> Self { SubscriptionKey::Name(name) }
}

impl From<OwnerId> for SubscriptionKey {
    fn from(owner: OwnerId) -> Self { SubscriptionKey::Owner(owner) }
}

/// A registered callback plus its optional key
pub(crate) struct Subscriber<T> {
    pub(crate) id: SubscriptionId,
    pub(crate) key: Option<SubscriptionKey>,
    pub(crate) callback: Callback<T>,
}

impl<T> Subscriber<T> {
    /// Keyed removal never matches an unkeyed subscriber
    pub(crate) fn matches(&self, key: &SubscriptionKey) -> bool { self.key.as_ref() == Some(key) }
}
