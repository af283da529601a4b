use crate::SubscriptionId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservableError {
    /// One or more callbacks panicked while being notified. The value was still committed
    /// and every other callback ran.
    #[error("{} subscriber callback(s) panicked: {failed:?}", .failed.len())]
    CallbackPanicked { failed: Vec<SubscriptionId> },
    #[error("no subscription to name")]
    NoSubscription,
    #[error("subscription {0} not found")]
    UnknownSubscription(SubscriptionId),
}
