//! Injectors: per-scope containers that construct and memoize components.
//!
//! The manager builds one plugin injector at start-up and one page injector
//! per observed page. Page injectors are parented to the plugin injector, so
//! resolution is two-level:
//!
//! 1. an instance already held by this injector (memoized or pre-registered)
//! 2. a component registered in this injector, constructed on first use
//! 3. the parent injector
//!
//! Anything else is [`DiError::NotFound`]. A disposed injector resolves
//! nothing and reports [`DiError::Disposed`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::component::{AnyArc, ComponentDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::{with_circular_guard, DisposeBag};
use crate::key::{key_of_trait, key_of_type, Key};
use crate::observer::{DiObserver, Observers};
use crate::scope::Scope;
use crate::traits::{Resolver, ResolverCore};

mod context;

pub use context::ResolverContext;

/// Container for the components of one scope instance.
///
/// `Injector` is a cheap handle (`Arc` inside); clones share the same
/// instances and disposal hooks. Each component is constructed at most once
/// per injector, even when several threads ask for it at the same time.
///
/// # Examples
///
/// ```
/// use workbench_di::{Component, ComponentDescriptor, DiResult, Injector, Resolver, ResolverContext, Scope};
/// use std::sync::Arc;
///
/// struct Dictionary;
///
/// impl Component for Dictionary {
///     const SCOPE: Scope = Scope::Plugin;
///     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Dictionary)
///     }
/// }
///
/// struct Outline {
///     dictionary: Arc<Dictionary>,
/// }
///
/// impl Component for Outline {
///     const SCOPE: Scope = Scope::Page;
///     fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Outline { dictionary: resolver.get::<Dictionary>()? })
///     }
/// }
///
/// let plugin = Injector::new(Scope::Plugin, vec![ComponentDescriptor::of::<Dictionary>()]);
/// let page = Injector::with_parent(Scope::Page, &plugin, vec![ComponentDescriptor::of::<Outline>()]);
///
/// let outline = page.get_required::<Outline>();
/// assert!(Arc::ptr_eq(&outline.dictionary, &plugin.get_required::<Dictionary>()));
/// assert!(plugin.get::<Outline>().is_err());
/// ```
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

struct InjectorInner {
    scope: Scope,
    parent: Option<Injector>,
    components: HashMap<Key, Slot>,
    instances: Mutex<HashMap<Key, AnyArc>>,
    disposers: Mutex<DisposeBag>,
    disposed: AtomicBool,
    observers: Observers,
}

// One registered component and its memoized instance
struct Slot {
    descriptor: ComponentDescriptor,
    cell: OnceCell<AnyArc>,
}

impl Injector {
    /// Root injector holding `components`.
    ///
    /// If two descriptors share a key, the last one wins.
    pub fn new(scope: Scope, components: Vec<ComponentDescriptor>) -> Self {
        Self::builder(scope).components(components).build()
    }

    /// Child injector falling back to `parent`. Inherits the parent's observers.
    pub fn with_parent(scope: Scope, parent: &Injector, components: Vec<ComponentDescriptor>) -> Self {
        Self::builder(scope).parent(parent).components(components).build()
    }

    pub fn builder(scope: Scope) -> InjectorBuilder {
        InjectorBuilder {
            scope,
            parent: None,
            components: Vec::new(),
            observers: Observers::default(),
        }
    }

    /// Scope this injector serves.
    pub fn scope(&self) -> Scope {
        self.inner.scope
    }

    pub fn parent(&self) -> Option<&Injector> {
        self.inner.parent.as_ref()
    }

    /// Whether `other` is a handle to the same injector.
    pub fn ptr_eq(&self, other: &Injector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Pre-registers a value the injector cannot construct itself.
    ///
    /// Takes precedence over a component registered under the same type and
    /// replaces any earlier value.
    pub fn add_instance<T: Send + Sync + 'static>(&self, value: Arc<T>) {
        self.inner.instances.lock().insert(key_of_type::<T>(), value as AnyArc);
    }

    /// Pre-registers a trait object, resolvable with `get_trait::<T>()`.
    pub fn add_trait_instance<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) {
        self.inner
            .instances
            .lock()
            .insert(key_of_trait::<T>(), Arc::new(value) as AnyArc);
    }

    /// Whether `key` resolves from this injector or one of its ancestors
    /// without constructing anything.
    pub fn contains(&self, key: &Key) -> bool {
        self.inner.components.contains_key(key)
            || self.inner.instances.lock().contains_key(key)
            || self.inner.parent.as_ref().is_some_and(|p| p.contains(key))
    }

    /// Type names of the components registered locally, sorted.
    pub fn component_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.inner.components.values().map(|s| s.descriptor.type_name()).collect();
        names.sort_unstable();
        names
    }

    /// Constructs every local component that is not built yet.
    ///
    /// Returns the number of local components. Stops at the first failure.
    pub fn prewarm(&self) -> DiResult<usize> {
        let mut keys: Vec<&Key> = self.inner.components.keys().collect();
        keys.sort_by_key(|k| k.display_name());
        for key in &keys {
            self.resolve_any_impl(key)?;
        }
        Ok(keys.len())
    }

    /// Runs the registered disposal hooks in LIFO order.
    ///
    /// Only the first call does anything. Parents are not disposed. Afterwards
    /// every resolution fails with [`DiError::Disposed`], and a disposer
    /// registered by a construction that was already running is invoked
    /// immediately.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let hooks = self.inner.disposers.lock().drain_reverse();
        tracing::trace!(scope = %self.inner.scope, hooks = hooks.len(), "disposing injector");
        for hook in hooks {
            hook();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        if self.is_disposed() {
            return Err(DiError::Disposed(self.inner.scope));
        }

        if let Some(value) = self.inner.instances.lock().get(key) {
            return Ok(value.clone());
        }

        if let Some(slot) = self.inner.components.get(key) {
            if let Some(value) = slot.cell.get() {
                return Ok(value.clone());
            }
            return self.construct(key, slot);
        }

        match &self.inner.parent {
            Some(parent) => parent.resolve_any_impl(key),
            None => Err(DiError::NotFound(key.display_name())),
        }
    }

    // The guard is entered before the cell so a same-thread cycle is reported
    // instead of blocking on its own initialization. Other threads wait on
    // the cell and never run the constructor a second time.
    fn construct(&self, key: &Key, slot: &Slot) -> DiResult<AnyArc> {
        with_circular_guard(slot.descriptor.type_name(), || {
            slot.cell
                .get_or_try_init(|| {
                    let observers = &self.inner.observers;
                    let started = observers.has_observers().then(Instant::now);
                    observers.resolving(key);

                    let ctx = ResolverContext::new(self);
                    match (slot.descriptor.ctor)(&ctx) {
                        Ok(value) => {
                            if let Some(started) = started {
                                observers.resolved(key, started.elapsed());
                            }
                            Ok(value)
                        }
                        Err(err) => {
                            observers.failed(key, &err);
                            Err(err)
                        }
                    }
                })
                .cloned()
        })
    }
}

impl ResolverCore for Injector {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolve_any_impl(key)
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        let mut bag = self.inner.disposers.lock();
        if !self.is_disposed() {
            bag.push_sync(f);
            return;
        }
        drop(bag);
        tracing::debug!(scope = %self.inner.scope, "disposer registered after dispose, running it now");
        f();
    }
}

impl Resolver for Injector {}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("scope", &self.inner.scope)
            .field("components", &self.component_names())
            .field("has_parent", &self.inner.parent.is_some())
            .field("observers", &self.inner.observers.len())
            .finish()
    }
}

impl Drop for InjectorInner {
    fn drop(&mut self) {
        let pending = self.disposers.get_mut().len();
        if pending > 0 {
            tracing::warn!(scope = %self.scope, pending, "injector dropped with undisposed hooks");
        }
    }
}

/// Builder for [`Injector`], used when observers need to be attached.
pub struct InjectorBuilder {
    scope: Scope,
    parent: Option<Injector>,
    components: Vec<ComponentDescriptor>,
    observers: Observers,
}

impl InjectorBuilder {
    pub fn parent(mut self, parent: &Injector) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn components(mut self, components: Vec<ComponentDescriptor>) -> Self {
        self.components.extend(components);
        self
    }

    pub fn component(mut self, component: ComponentDescriptor) -> Self {
        self.components.push(component);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn DiObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> Injector {
        let observers = match &self.parent {
            Some(parent) if !parent.inner.observers.has_observers() => self.observers,
            Some(parent) => {
                let mut inherited = parent.inner.observers.clone();
                inherited.extend(self.observers);
                inherited
            }
            None => self.observers,
        };

        let components = self
            .components
            .into_iter()
            .map(|descriptor| {
                let slot = Slot {
                    descriptor,
                    cell: OnceCell::new(),
                };
                (*slot.descriptor.key(), slot)
            })
            .collect();

        Injector {
            inner: Arc::new(InjectorInner {
                scope: self.scope,
                parent: self.parent,
                components,
                instances: Mutex::new(HashMap::new()),
                disposers: Mutex::new(DisposeBag::default()),
                disposed: AtomicBool::new(false),
                observers,
            }),
        }
    }
}
