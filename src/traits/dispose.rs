//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this for components that need structured teardown when their
/// scope ends, e.g. releasing editor decorations when a page closes.
/// Register the instance from its constructor with
/// [`Resolver::register_disposer`](crate::Resolver::register_disposer).
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
