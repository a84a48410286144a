//! Window and page trackers maintaining one injector per open page.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{
    IdentityMap, PageListener, PageRef, WindowListener, WindowRef, Workbench, WorkbenchPage,
    WorkbenchWindow,
};
use crate::component::ComponentDescriptor;
use crate::injector::Injector;
use crate::scope::Scope;

/// Follows the host's windows and pages, creating a page injector for every
/// page it observes and discarding it when the page closes.
///
/// Observation is idempotent: a window or page seen twice (at start-up and
/// again through a late `opened` event) keeps its first tracker or injector.
/// Closing something that was never observed is ignored.
pub struct LifecycleTracker {
    state: Arc<TrackerState>,
    listener: Arc<dyn WindowListener>,
}

struct TrackerState {
    plugin: Injector,
    page_components: Vec<ComponentDescriptor>,
    pages: Mutex<IdentityMap<dyn WorkbenchPage, Injector>>,
    windows: Mutex<IdentityMap<dyn WorkbenchWindow, Arc<dyn PageListener>>>,
    debug: bool,
    eager: bool,
}

impl LifecycleTracker {
    /// Tracker building page injectors from `page_components`, parented to
    /// `plugin`.
    ///
    /// With `debug`, every callback is logged. With `eager`, page components
    /// are constructed as soon as their page is observed.
    pub fn new(
        plugin: Injector,
        page_components: Vec<ComponentDescriptor>,
        debug: bool,
        eager: bool,
    ) -> Self {
        let state = Arc::new(TrackerState {
            plugin,
            page_components,
            pages: Mutex::new(IdentityMap::new()),
            windows: Mutex::new(IdentityMap::new()),
            debug,
            eager,
        });
        let listener: Arc<dyn WindowListener> = Arc::new(WindowTracker {
            state: state.clone(),
        });
        Self { state, listener }
    }

    /// Registers for window events and observes every window (and page)
    /// already open.
    pub fn attach(&self, workbench: &dyn Workbench) {
        workbench.add_window_listener(self.listener.clone());
        for window in workbench.windows() {
            self.state.observe_window(&window);
        }
    }

    /// Unregisters from the workbench and from every tracked window, then
    /// disposes all page injectors.
    pub fn detach(&self, workbench: &dyn Workbench) {
        workbench.remove_window_listener(&self.listener);

        let windows = self.state.windows.lock().drain();
        for (window, listener) in windows {
            window.remove_page_listener(&listener);
        }

        let pages = self.state.pages.lock().drain();
        if self.state.debug {
            tracing::debug!(pages = pages.len(), "disposing page injectors");
        }
        for (_, injector) in pages {
            injector.dispose();
        }
    }

    /// Injector of `page`, if the page is being tracked.
    pub fn page_injector(&self, page: &PageRef) -> Option<Injector> {
        self.state.pages.lock().get(page).cloned()
    }

    pub fn plugin_injector(&self) -> &Injector {
        &self.state.plugin
    }

    /// Number of windows with an attached page tracker.
    pub fn tracked_windows(&self) -> usize {
        self.state.windows.lock().len()
    }

    /// Number of pages holding an injector.
    pub fn tracked_pages(&self) -> usize {
        self.state.pages.lock().len()
    }
}

impl fmt::Debug for LifecycleTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleTracker")
            .field("windows", &self.tracked_windows())
            .field("pages", &self.tracked_pages())
            .field("debug", &self.state.debug)
            .field("eager", &self.state.eager)
            .finish()
    }
}

impl TrackerState {
    fn observe_window(self: &Arc<Self>, window: &WindowRef) {
        let listener = {
            let mut windows = self.windows.lock();
            if windows.contains_key(window) {
                return;
            }
            let listener: Arc<dyn PageListener> = Arc::new(PageTracker {
                state: Arc::downgrade(self),
            });
            windows.insert(window.clone(), listener.clone());
            listener
        };

        if self.debug {
            tracing::debug!(window = %window.label(), "observing window");
        }
        window.add_page_listener(listener.clone());

        // A close that arrived before the listener was attached had nothing
        // to remove; undo the attach instead of tracking a closed window.
        let still_tracked = self
            .windows
            .lock()
            .get(window)
            .is_some_and(|current| same_listener(current, &listener));
        if !still_tracked {
            window.remove_page_listener(&listener);
            return;
        }

        for page in window.pages() {
            self.observe_page(&page);
        }
    }

    fn forget_window(&self, window: &WindowRef) {
        let Some(listener) = self.windows.lock().remove(window) else {
            return;
        };

        if self.debug {
            tracing::debug!(window = %window.label(), "forgetting window");
        }
        window.remove_page_listener(&listener);
        for page in window.pages() {
            self.forget_page(&page);
        }
    }

    fn observe_page(&self, page: &PageRef) {
        let injector = {
            let mut pages = self.pages.lock();
            if pages.contains_key(page) {
                return;
            }
            let injector =
                Injector::with_parent(Scope::Page, &self.plugin, self.page_components.clone());
            injector.add_trait_instance::<dyn WorkbenchPage>(page.clone());
            pages.insert(page.clone(), injector.clone());
            injector
        };

        if self.debug {
            tracing::debug!(page = %page.label(), "created page injector");
        }
        if self.eager {
            if let Err(error) = injector.prewarm() {
                tracing::error!(page = %page.label(), %error, "failed to construct page components");
            }
        }
    }

    fn forget_page(&self, page: &PageRef) {
        let Some(injector) = self.pages.lock().remove(page) else {
            return;
        };

        if self.debug {
            tracing::debug!(page = %page.label(), "discarding page injector");
        }
        injector.dispose();
    }
}

fn same_listener(a: &Arc<dyn PageListener>, b: &Arc<dyn PageListener>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

struct WindowTracker {
    state: Arc<TrackerState>,
}

impl WindowListener for WindowTracker {
    fn window_opened(&self, window: &WindowRef) {
        if self.state.debug {
            tracing::debug!(window = %window.label(), "window opened");
        }
        self.state.observe_window(window);
    }

    fn window_activated(&self, window: &WindowRef) {
        if self.state.debug {
            tracing::debug!(window = %window.label(), "window activated");
        }
    }

    fn window_deactivated(&self, window: &WindowRef) {
        if self.state.debug {
            tracing::debug!(window = %window.label(), "window deactivated");
        }
    }

    fn window_closed(&self, window: &WindowRef) {
        if self.state.debug {
            tracing::debug!(window = %window.label(), "window closed");
        }
        self.state.forget_window(window);
    }
}

// Holds the state weakly: the state's window map owns this listener
struct PageTracker {
    state: Weak<TrackerState>,
}

impl PageListener for PageTracker {
    fn page_opened(&self, page: &PageRef) {
        if let Some(state) = self.state.upgrade() {
            if state.debug {
                tracing::debug!(page = %page.label(), "page opened");
            }
            state.observe_page(page);
        }
    }

    fn page_activated(&self, page: &PageRef) {
        if let Some(state) = self.state.upgrade() {
            if state.debug {
                tracing::debug!(page = %page.label(), "page activated");
            }
        }
    }

    fn page_closed(&self, page: &PageRef) {
        if let Some(state) = self.state.upgrade() {
            if state.debug {
                tracing::debug!(page = %page.label(), "page closed");
            }
            state.forget_page(page);
        }
    }
}
