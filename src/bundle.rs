//! Plugin bundles: the table of types a plugin ships with.

use std::fmt;
use std::sync::Arc;

use crate::component::{Component, ComponentDescriptor};
use crate::lifecycle::Workbench;

/// A plugin bundle that can enumerate the types packaged in it.
///
/// Rust has no runtime class loading, so bundles list their types up front,
/// usually through a [`StaticBundle`].
pub trait Bundle: Send + Sync {
    /// Symbolic name of the bundle, used in log output.
    fn symbolic_name(&self) -> &str;

    /// Every type packaged in the bundle, components or not.
    fn entries(&self) -> Vec<BundleEntry>;
}

/// One type packaged in a bundle.
///
/// Entries built with [`BundleEntry::plain`] are not components and are
/// skipped by the scanner.
#[derive(Clone, Debug)]
pub struct BundleEntry {
    type_name: &'static str,
    component: Option<ComponentDescriptor>,
}

impl BundleEntry {
    /// Entry for a component resolved by its concrete type.
    pub fn component<T: Component>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            component: Some(ComponentDescriptor::of::<T>()),
        }
    }

    /// Entry for a component resolved through the trait object `Tr`.
    ///
    /// ```rust
    /// use workbench_di::{BundleEntry, Component, DiResult, ResolverContext, Scope};
    /// use std::sync::Arc;
    ///
    /// trait Renderer: Send + Sync {
    ///     fn render(&self, source: &str) -> String;
    /// }
    ///
    /// struct PlainRenderer;
    ///
    /// impl Renderer for PlainRenderer {
    ///     fn render(&self, source: &str) -> String {
    ///         source.to_string()
    ///     }
    /// }
    ///
    /// impl Component for PlainRenderer {
    ///     const SCOPE: Scope = Scope::Plugin;
    ///
    ///     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
    ///         Ok(PlainRenderer)
    ///     }
    /// }
    ///
    /// let entry = BundleEntry::component_as::<PlainRenderer, dyn Renderer>(|r| r as Arc<dyn Renderer>);
    /// assert!(entry.is_component());
    /// ```
    pub fn component_as<T, Tr>(upcast: fn(Arc<T>) -> Arc<Tr>) -> Self
    where
        T: Component,
        Tr: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            component: Some(ComponentDescriptor::as_trait::<T, Tr>(upcast)),
        }
    }

    /// Entry for a packaged type that is not a component.
    pub fn plain<T: ?Sized + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            component: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_component(&self) -> bool {
        self.component.is_some()
    }

    pub fn descriptor(&self) -> Option<&ComponentDescriptor> {
        self.component.as_ref()
    }

    pub(crate) fn into_descriptor(self) -> Option<ComponentDescriptor> {
        self.component
    }
}

/// A bundle backed by a fixed list of entries.
///
/// ```rust
/// use workbench_di::{Bundle, BundleEntry, StaticBundle};
///
/// struct Readme;
///
/// let bundle = StaticBundle::new("org.example.viewer", vec![BundleEntry::plain::<Readme>()]);
/// assert_eq!(bundle.symbolic_name(), "org.example.viewer");
/// assert_eq!(bundle.entries().len(), 1);
/// ```
#[derive(Clone)]
pub struct StaticBundle {
    name: String,
    entries: Vec<BundleEntry>,
}

impl StaticBundle {
    pub fn new(name: impl Into<String>, entries: Vec<BundleEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Appends an entry.
    pub fn with(mut self, entry: BundleEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl Bundle for StaticBundle {
    fn symbolic_name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Vec<BundleEntry> {
        self.entries.clone()
    }
}

impl fmt::Debug for StaticBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticBundle")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// What the host hands a plugin when it is activated.
#[derive(Clone)]
pub struct BundleContext {
    bundle: Arc<dyn Bundle>,
    workbench: Arc<dyn Workbench>,
}

impl BundleContext {
    pub fn new(bundle: Arc<dyn Bundle>, workbench: Arc<dyn Workbench>) -> Self {
        Self { bundle, workbench }
    }

    pub fn bundle(&self) -> &Arc<dyn Bundle> {
        &self.bundle
    }

    pub fn workbench(&self) -> &Arc<dyn Workbench> {
        &self.workbench
    }
}

impl fmt::Debug for BundleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleContext")
            .field("bundle", &self.bundle.symbolic_name())
            .finish_non_exhaustive()
    }
}
