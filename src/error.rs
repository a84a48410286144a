//! Error types for the injector and the workbench manager.

use thiserror::Error;

use crate::scope::Scope;

/// Dependency injection errors
///
/// Covers failures while resolving components from an [`Injector`](crate::Injector)
/// and the illegal-state / illegal-argument conditions raised by the
/// [`DiManager`](crate::DiManager) and the [`global`](crate::global) facade.
///
/// # Examples
///
/// ```rust
/// use workbench_di::{DiError, Injector, Resolver, Scope};
///
/// let injector = Injector::new(Scope::Plugin, Vec::new());
/// match injector.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
///
/// let err = "window".parse::<Scope>().unwrap_err();
/// assert!(err.is_illegal_argument());
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Nothing registered under the key in the injector or any ancestor
    #[error("Component not found: {0}")]
    NotFound(&'static str),
    /// Stored value did not downcast to the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A component constructor reported a failure
    #[error("Failed to construct {component}: {message}")]
    Construction {
        component: &'static str,
        message: String,
    },
    /// Two bundle entries register the same component type
    #[error("Component registered twice: {0}")]
    DuplicateComponent(&'static str),
    /// A page injector was requested but the workbench has no active page
    #[error("No active workbench page")]
    NoActivePage,
    /// The active page was never observed, so it has no injector
    #[error("Unable to locate page injector for page: {0}")]
    PageNotTracked(String),
    /// Scope name did not match any known scope
    #[error("Unexpected scope: {0}")]
    UnknownScope(String),
    /// The process-wide manager has not been started (or was stopped)
    #[error("Injection manager is not started")]
    NotStarted,
    /// The process-wide manager is already running
    #[error("Injection manager is already started")]
    AlreadyStarted,
    /// The injector was disposed (its page closed or the manager stopped)
    #[error("Injector for scope {0} is disposed")]
    Disposed(Scope),
    /// Manager configuration could not be read or parsed
    #[error("Invalid manager configuration: {0}")]
    InvalidConfig(String),
}

impl DiError {
    /// Builds a [`DiError::Construction`] for component `T`.
    pub fn construction<T: ?Sized>(message: impl Into<String>) -> Self {
        DiError::Construction {
            component: std::any::type_name::<T>(),
            message: message.into(),
        }
    }

    /// True for conditions caused by calling into the manager at the wrong
    /// point of its lifecycle.
    pub fn is_illegal_state(&self) -> bool {
        matches!(
            self,
            DiError::NoActivePage
                | DiError::PageNotTracked(_)
                | DiError::NotStarted
                | DiError::AlreadyStarted
                | DiError::Disposed(_)
        )
    }

    /// True when the caller passed a value outside the accepted domain.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, DiError::UnknownScope(_))
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
