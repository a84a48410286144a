//! Resolver context handed to component constructors.

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to [`Component::construct`](crate::Component::construct).
///
/// Wraps the injector that will own the new instance. Lookups go through
/// that injector (and its parent), and disposers registered here run when
/// that injector is disposed.
///
/// # Examples
///
/// ```
/// use workbench_di::{Component, DiResult, Resolver, ResolverContext, Scope};
/// use std::sync::Arc;
///
/// struct Settings {
///     tab_width: usize,
/// }
///
/// impl Component for Settings {
///     const SCOPE: Scope = Scope::Plugin;
///
///     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Settings { tab_width: 4 })
///     }
/// }
///
/// struct Formatter {
///     settings: Arc<Settings>,
/// }
///
/// impl Component for Formatter {
///     const SCOPE: Scope = Scope::Page;
///
///     fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         // resolved through the page injector's parent
///         Ok(Formatter { settings: resolver.get::<Settings>()? })
///     }
/// }
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.resolver.push_sync_disposer(f);
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
