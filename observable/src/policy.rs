/// What happens when a subscriber callback panics during notification.
///
/// In both cases the new value is committed before any callback runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Catch the panic, log it, and keep notifying the remaining subscribers
    #[default]
    Isolate,
    /// Stop notifying and resume the panic in the caller of `set`
    Propagate,
}
