//! Component declarations and their type-erased descriptors.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::DiResult;
use crate::injector::ResolverContext;
use crate::key::{key_of_trait, key_of_type, Key};
use crate::scope::Scope;

pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn Fn(&ResolverContext<'_>) -> DiResult<AnyArc> + Send + Sync>;

/// A type the manager can discover, place in a scope, and construct.
///
/// The constructor receives a [`ResolverContext`] bound to the injector that
/// owns the new instance, so dependencies resolve against the same scope
/// first and the plugin scope second.
///
/// # Examples
///
/// ```rust
/// use workbench_di::{Component, DiResult, Resolver, ResolverContext, Scope};
/// use std::sync::Arc;
///
/// struct SpellChecker;
///
/// impl Component for SpellChecker {
///     const SCOPE: Scope = Scope::Plugin;
///
///     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(SpellChecker)
///     }
/// }
///
/// struct EditorHighlighter {
///     checker: Arc<SpellChecker>,
/// }
///
/// impl Component for EditorHighlighter {
///     const SCOPE: Scope = Scope::Page;
///
///     fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(EditorHighlighter {
///             checker: resolver.get::<SpellChecker>()?,
///         })
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    /// Scope whose injector owns instances of this component.
    const SCOPE: Scope;

    /// Builds a new instance, resolving dependencies through `resolver`.
    fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

/// Type-erased registration of one component.
#[derive(Clone)]
pub struct ComponentDescriptor {
    key: Key,
    scope: Scope,
    type_name: &'static str,
    pub(crate) ctor: Ctor,
}

impl ComponentDescriptor {
    /// Descriptor resolving `T` by its concrete type.
    pub fn of<T: Component>() -> Self {
        Self {
            key: key_of_type::<T>(),
            scope: T::SCOPE,
            type_name: std::any::type_name::<T>(),
            ctor: Arc::new(|resolver: &ResolverContext<'_>| {
                let value = T::construct(resolver)?;
                Ok(Arc::new(value) as AnyArc)
            }),
        }
    }

    /// Descriptor exposing `T` through the trait object `Tr`.
    ///
    /// The instance is resolved with `get_trait::<Tr>()`; `upcast` is usually
    /// `|c| c as Arc<dyn Trait>`.
    pub fn as_trait<T, Tr>(upcast: fn(Arc<T>) -> Arc<Tr>) -> Self
    where
        T: Component,
        Tr: ?Sized + Send + Sync + 'static,
    {
        Self {
            key: key_of_trait::<Tr>(),
            scope: T::SCOPE,
            type_name: std::any::type_name::<T>(),
            ctor: Arc::new(move |resolver: &ResolverContext<'_>| {
                let value = Arc::new(T::construct(resolver)?);
                Ok(Arc::new(upcast(value)) as AnyArc)
            }),
        }
    }

    /// Key the component is stored under.
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Fully qualified name of the concrete type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Module path the concrete type is declared in.
    pub fn module_path(&self) -> &'static str {
        module_path_of(self.type_name)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("key", &self.key.display_name())
            .field("scope", &self.scope)
            .field("type_name", &self.type_name)
            .finish()
    }
}

// Generic arguments may themselves contain `::`, so cut them off first
pub(crate) fn module_path_of(type_name: &str) -> &str {
    let base = match type_name.find('<') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    };
    match base.rfind("::") {
        Some(idx) => &base[..idx],
        None => "",
    }
}
