//! Diagnostic observers for component resolution.
//!
//! Observers see every component an injector constructs, which makes them the
//! place to hang tracing and timing without touching the components.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer for component construction events.
///
/// Only constructions are reported; memoized hits and pre-registered
/// instances are returned without notifying observers.
///
/// # Examples
///
/// ```rust
/// use workbench_di::{DiObserver, Injector, Key, Scope};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     built: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.built.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let injector = Injector::builder(Scope::Plugin)
///     .observer(observer.clone())
///     .build();
/// assert_eq!(observer.built.load(Ordering::Relaxed), 0);
/// # drop(injector);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a component constructor runs.
    fn resolving(&self, key: &Key);

    /// Called after a constructor succeeded, with the time it took.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a constructor returned an error.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Observer emitting `tracing` events at trace level.
///
/// Attached to every injector when the manager runs with `debug` enabled.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(component = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(component = key.display_name(), ?duration, "resolved");
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::trace!(component = key.display_name(), %error, "construction failed");
    }
}

/// Collection of observers attached to one injector.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn extend(&mut self, other: Observers) {
        self.observers.extend(other.observers);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}
