//! Host workbench model and lifecycle tracking.
//!
//! The host (an IDE, or a test double) implements [`Workbench`],
//! [`WorkbenchWindow`] and [`WorkbenchPage`], and calls back into the
//! listeners the tracker registers as windows and pages come and go.

use std::sync::Arc;

mod identity;
mod tracker;

pub use identity::IdentityMap;
pub use tracker::LifecycleTracker;

/// Shared handle to a host page.
pub type PageRef = Arc<dyn WorkbenchPage>;

/// Shared handle to a host window.
pub type WindowRef = Arc<dyn WorkbenchWindow>;

/// A page of a workbench window.
///
/// Page injectors pre-register their page, so page components can resolve
/// it with `get_trait::<dyn WorkbenchPage>()`.
pub trait WorkbenchPage: Send + Sync {
    /// Human readable label, used in logs and errors.
    fn label(&self) -> String;
}

/// A top-level workbench window holding pages.
pub trait WorkbenchWindow: Send + Sync {
    fn label(&self) -> String;

    /// Pages currently open in the window.
    fn pages(&self) -> Vec<PageRef>;

    fn active_page(&self) -> Option<PageRef>;

    fn add_page_listener(&self, listener: Arc<dyn PageListener>);

    /// Removes a listener previously added, compared by identity.
    fn remove_page_listener(&self, listener: &Arc<dyn PageListener>);
}

/// The host workbench.
pub trait Workbench: Send + Sync {
    /// Windows currently open.
    fn windows(&self) -> Vec<WindowRef>;

    fn active_window(&self) -> Option<WindowRef>;

    fn add_window_listener(&self, listener: Arc<dyn WindowListener>);

    /// Removes a listener previously added, compared by identity.
    fn remove_window_listener(&self, listener: &Arc<dyn WindowListener>);
}

/// Page lifecycle callbacks, invoked by the host.
pub trait PageListener: Send + Sync {
    fn page_opened(&self, page: &PageRef);

    fn page_activated(&self, page: &PageRef) {
        let _ = page;
    }

    fn page_closed(&self, page: &PageRef);
}

/// Window lifecycle callbacks, invoked by the host.
pub trait WindowListener: Send + Sync {
    fn window_opened(&self, window: &WindowRef);

    fn window_activated(&self, window: &WindowRef) {
        let _ = window;
    }

    fn window_deactivated(&self, window: &WindowRef) {
        let _ = window;
    }

    fn window_closed(&self, window: &WindowRef);
}
