//! The injection manager tying scanning, injectors and lifecycle tracking
//! together.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bundle::BundleContext;
use crate::config::ManagerConfig;
use crate::error::{DiError, DiResult};
use crate::grouping::{ScopeGrouper, ScopeGroups};
use crate::injector::Injector;
use crate::lifecycle::{LifecycleTracker, PageRef, Workbench};
use crate::observer::TracingObserver;
use crate::scanner::ComponentScanner;
use crate::scope::Scope;

/// Dependency injection for one plugin activation.
///
/// Built once when the plugin starts: scans the bundle, builds the plugin
/// injector and starts following the workbench so every open page gets its
/// own page injector. [`stop`](DiManager::stop) undoes all of it.
///
/// # Examples
///
/// ```rust
/// use workbench_di::{
///     BundleContext, BundleEntry, Component, DiManager, DiResult, ManagerConfig, Resolver,
///     ResolverContext, Scope, StaticBundle, WindowListener, WindowRef, Workbench,
/// };
/// use std::sync::Arc;
///
/// struct Renderer;
///
/// impl Component for Renderer {
///     const SCOPE: Scope = Scope::Plugin;
///     fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Renderer)
///     }
/// }
///
/// // A workbench with no windows open yet.
/// struct EmptyWorkbench;
///
/// impl Workbench for EmptyWorkbench {
///     fn windows(&self) -> Vec<WindowRef> { Vec::new() }
///     fn active_window(&self) -> Option<WindowRef> { None }
///     fn add_window_listener(&self, _: Arc<dyn WindowListener>) {}
///     fn remove_window_listener(&self, _: &Arc<dyn WindowListener>) {}
/// }
///
/// let bundle = StaticBundle::new("viewer", vec![BundleEntry::component::<Renderer>()]);
/// let context = BundleContext::new(Arc::new(bundle), Arc::new(EmptyWorkbench));
///
/// let manager = DiManager::start(&context, ManagerConfig::default()).unwrap();
/// let plugin = manager.injector(Scope::Plugin).unwrap();
/// assert!(plugin.get::<Renderer>().is_ok());
///
/// // no active page
/// assert!(manager.injector(Scope::Page).unwrap_err().is_illegal_state());
/// manager.stop();
/// ```
pub struct DiManager {
    config: ManagerConfig,
    groups: ScopeGroups,
    plugin: Injector,
    workbench: Arc<dyn Workbench>,
    tracker: LifecycleTracker,
    stopped: AtomicBool,
}

impl DiManager {
    /// Scans the bundle, builds the plugin injector and starts tracking the
    /// workbench's windows and pages.
    ///
    /// # Errors
    ///
    /// [`DiError::DuplicateComponent`] when the bundle registers a component
    /// twice; with `eager`, any error raised while constructing plugin
    /// components.
    pub fn start(context: &BundleContext, config: ManagerConfig) -> DiResult<Self> {
        let scanner = ComponentScanner::new(config.package_prefix.as_str());
        let components = scanner.scan(context.bundle().as_ref())?;
        let groups = ScopeGrouper::new().group(components);

        let mut builder = Injector::builder(Scope::Plugin).components(groups.to_vec(Scope::Plugin));
        if config.debug {
            builder = builder.observer(Arc::new(TracingObserver::new()));
        }
        let plugin = builder.build();

        if config.eager {
            if let Err(err) = plugin.prewarm() {
                plugin.dispose();
                return Err(err);
            }
        }

        let tracker = LifecycleTracker::new(
            plugin.clone(),
            groups.to_vec(Scope::Page),
            config.debug,
            config.eager,
        );
        let workbench = context.workbench().clone();
        tracker.attach(workbench.as_ref());

        if config.debug {
            tracing::debug!(
                bundle = context.bundle().symbolic_name(),
                plugin_components = groups.find(Scope::Plugin).len(),
                page_components = groups.find(Scope::Page).len(),
                windows = tracker.tracked_windows(),
                pages = tracker.tracked_pages(),
                "injection manager started"
            );
        }

        Ok(Self {
            config,
            groups,
            plugin,
            workbench,
            tracker,
            stopped: AtomicBool::new(false),
        })
    }

    /// Injector for `scope`.
    ///
    /// For [`Scope::Page`] this is the injector of the active page of the
    /// active window, looked up on every call.
    ///
    /// # Errors
    ///
    /// - [`DiError::NoActivePage`] when there is no active window or page
    /// - [`DiError::PageNotTracked`] when the active page has no injector
    /// - [`DiError::NotStarted`] after [`stop`](DiManager::stop)
    pub fn injector(&self, scope: Scope) -> DiResult<Injector> {
        self.ensure_running()?;
        match scope {
            Scope::Plugin => Ok(self.plugin.clone()),
            Scope::Page => {
                let page = self
                    .workbench
                    .active_window()
                    .and_then(|window| window.active_page())
                    .ok_or(DiError::NoActivePage)?;
                self.tracker
                    .page_injector(&page)
                    .ok_or_else(|| DiError::PageNotTracked(page.label()))
            }
        }
    }

    /// Like [`injector`](DiManager::injector) with the scope given by name.
    ///
    /// Unknown names fail with [`DiError::UnknownScope`].
    pub fn injector_for(&self, scope: &str) -> DiResult<Injector> {
        self.injector(scope.parse()?)
    }

    /// Injector of a specific page, if it is tracked.
    pub fn page_injector(&self, page: &PageRef) -> Option<Injector> {
        self.tracker.page_injector(page)
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Type names of the components managed in `scope`.
    pub fn components(&self, scope: Scope) -> Vec<&'static str> {
        self.groups.names(scope)
    }

    pub fn tracked_windows(&self) -> usize {
        self.tracker.tracked_windows()
    }

    pub fn tracked_pages(&self) -> usize {
        self.tracker.tracked_pages()
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Stops tracking the workbench and disposes every injector, page
    /// injectors before the plugin injector.
    ///
    /// Later calls to [`injector`](DiManager::injector) fail with
    /// [`DiError::NotStarted`]. Stopping twice is a no-op. Dropping a running
    /// manager stops it.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.tracker.detach(self.workbench.as_ref());
        self.plugin.dispose();
        if self.config.debug {
            tracing::debug!("injection manager stopped");
        }
    }

    fn ensure_running(&self) -> DiResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(DiError::NotStarted)
        }
    }
}

impl Drop for DiManager {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for DiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiManager")
            .field("config", &self.config)
            .field("groups", &self.groups)
            .field("tracker", &self.tracker)
            .field("running", &self.is_running())
            .finish()
    }
}
