//! Resolver traits for component resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_trait, key_of_type, Key};
use crate::traits::Dispose;

/// Core resolver trait for object-safe component resolution.
///
/// Implemented by [`Injector`](crate::Injector) and by the
/// [`ResolverContext`](crate::ResolverContext) handed to component
/// constructors. Most callers use the generic [`Resolver`] methods built on
/// top of it.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single value by key.
    ///
    /// Resolution checks the injector's own instances and components first,
    /// then its parent chain.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn Any>)` - The resolved value, type-erased
    /// * `Err(DiError)` - Not found, circular dependency, constructor failure, ...
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Registers a synchronous disposal hook with the injector that owns the
    /// component being constructed.
    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>);
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// # Examples
///
/// ```
/// use workbench_di::{Injector, Resolver, Scope};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// let injector = Injector::new(Scope::Plugin, Vec::new());
/// injector.add_instance(Arc::new(8080u16));
/// injector.add_trait_instance::<dyn Clock>(Arc::new(FixedClock));
///
/// assert_eq!(*injector.get_required::<u16>(), 8080);
/// assert_eq!(injector.get_required_trait::<dyn Clock>().now(), 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete component type.
    ///
    /// # Examples
    ///
    /// ```
    /// use workbench_di::{Injector, Resolver, Scope};
    /// use std::sync::Arc;
    ///
    /// let injector = Injector::new(Scope::Plugin, Vec::new());
    /// injector.add_instance(Arc::new("configuration".to_string()));
    ///
    /// let config = injector.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&key_of_type::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait object registered through a trait binding.
    ///
    /// Trait values are stored as `Arc<Arc<dyn Trait>>`; this unwraps one level.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let any = self.resolve_any(&key_of_trait::<T>())?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete component type, panicking on failure.
    ///
    /// Use this when a missing registration is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if the component cannot be resolved.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves a trait object, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the trait cannot be resolved.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve trait {}: {}", std::any::type_name::<T>(), e))
    }

    /// Registers a value for synchronous disposal.
    ///
    /// Called from component constructors; the hook runs when the owning
    /// injector is disposed (page close for page components, manager stop for
    /// plugin components). Hooks run in LIFO order.
    ///
    /// # Examples
    ///
    /// ```
    /// use workbench_di::{Component, DiResult, Dispose, Resolver, ResolverContext, Scope};
    /// use std::sync::Arc;
    ///
    /// struct PreviewCache;
    ///
    /// impl Dispose for PreviewCache {
    ///     fn dispose(&self) {
    ///         println!("flushing preview cache");
    ///     }
    /// }
    ///
    /// struct PreviewPane {
    ///     cache: Arc<PreviewCache>,
    /// }
    ///
    /// impl Component for PreviewPane {
    ///     const SCOPE: Scope = Scope::Page;
    ///
    ///     fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
    ///         let cache = Arc::new(PreviewCache);
    ///         resolver.register_disposer(cache.clone());
    ///         Ok(PreviewPane { cache })
    ///     }
    /// }
    /// ```
    fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.push_sync_disposer(Box::new(move || service.dispose()));
    }
}
