//! # workbench-di
//!
//! Lightweight dependency injection bound to the lifecycle of an IDE
//! workbench: one injector for the plugin, one child injector per open page.
//!
//! ## Features
//!
//! - **Two scopes**: `Plugin` components live from plugin start to stop,
//!   `Page` components live as long as their workbench page
//! - **Component discovery**: components are listed in a bundle table and
//!   selected by module-path prefix
//! - **Parent fallback**: page components resolve plugin components through
//!   their parent injector
//! - **Lifecycle tracking**: page injectors are created and discarded as the
//!   host opens and closes windows and pages
//! - **Circular dependency detection** with the full resolution path
//! - **Disposal hooks** run in LIFO order when a page closes or the plugin stops
//!
//! ## Quick Start
//!
//! ```rust
//! use workbench_di::{Component, ComponentDescriptor, DiResult, Injector, Resolver, ResolverContext, Scope, WorkbenchPage};
//! use std::sync::Arc;
//!
//! struct SpellChecker;
//!
//! impl Component for SpellChecker {
//!     const SCOPE: Scope = Scope::Plugin;
//!     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
//!         Ok(SpellChecker)
//!     }
//! }
//!
//! struct Squiggles {
//!     checker: Arc<SpellChecker>,
//!     page: Arc<dyn WorkbenchPage>,
//! }
//!
//! impl Component for Squiggles {
//!     const SCOPE: Scope = Scope::Page;
//!     fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
//!         Ok(Squiggles {
//!             checker: resolver.get::<SpellChecker>()?,
//!             page: resolver.get_trait::<dyn WorkbenchPage>()?,
//!         })
//!     }
//! }
//!
//! struct Page;
//! impl WorkbenchPage for Page {
//!     fn label(&self) -> String {
//!         "README.md".to_string()
//!     }
//! }
//!
//! // The manager does this for every page it observes.
//! let plugin = Injector::new(Scope::Plugin, vec![ComponentDescriptor::of::<SpellChecker>()]);
//! let page = Injector::with_parent(Scope::Page, &plugin, vec![ComponentDescriptor::of::<Squiggles>()]);
//! page.add_trait_instance::<dyn WorkbenchPage>(Arc::new(Page));
//!
//! let squiggles = page.get_required::<Squiggles>();
//! assert_eq!(squiggles.page.label(), "README.md");
//! ```
//!
//! In a plugin, [`DiManager::start`] builds these injectors from a
//! [`BundleContext`] and keeps them in step with the workbench; see
//! [`DiManager`] and the [`global`] facade.

// Module declarations
pub mod bundle;
pub mod component;
pub mod config;
pub mod error;
pub mod global;
pub mod grouping;
pub mod injector;
pub mod key;
pub mod lifecycle;
pub mod manager;
pub mod observer;
pub mod scanner;
pub mod scope;
pub mod traits;

// Internal modules
mod internal;

// Re-export core types
pub use bundle::{Bundle, BundleContext, BundleEntry, StaticBundle};
pub use component::{Component, ComponentDescriptor};
pub use config::ManagerConfig;
pub use error::{DiError, DiResult};
pub use grouping::{ScopeGrouper, ScopeGroups};
pub use injector::{Injector, InjectorBuilder, ResolverContext};
pub use key::{key_of_trait, key_of_type, Key};
pub use lifecycle::{
    IdentityMap, LifecycleTracker, PageListener, PageRef, WindowListener, WindowRef, Workbench,
    WorkbenchPage, WorkbenchWindow,
};
pub use manager::DiManager;
pub use observer::{DiObserver, TracingObserver};
pub use scanner::ComponentScanner;
pub use scope::Scope;
pub use traits::{Dispose, Resolver, ResolverCore};
