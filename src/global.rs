//! Process-wide manager for hosts that activate plugins through static hooks.
//!
//! Plugin activators often have nowhere to keep a [`DiManager`] except a
//! global. This module holds at most one running manager; code that can pass
//! a `DiManager` around should do that instead.
//!
//! ```rust
//! use workbench_di::{global, BundleContext, DiError, Scope, StaticBundle, WindowListener, WindowRef, Workbench};
//! use std::sync::Arc;
//!
//! struct EmptyWorkbench;
//!
//! impl Workbench for EmptyWorkbench {
//!     fn windows(&self) -> Vec<WindowRef> { Vec::new() }
//!     fn active_window(&self) -> Option<WindowRef> { None }
//!     fn add_window_listener(&self, _: Arc<dyn WindowListener>) {}
//!     fn remove_window_listener(&self, _: &Arc<dyn WindowListener>) {}
//! }
//!
//! let context = BundleContext::new(
//!     Arc::new(StaticBundle::new("viewer", Vec::new())),
//!     Arc::new(EmptyWorkbench),
//! );
//!
//! global::start(&context, "viewer", false).unwrap();
//! assert!(global::injector(Scope::Plugin).is_ok());
//!
//! global::stop().unwrap();
//! assert!(matches!(global::injector(Scope::Plugin), Err(DiError::NotStarted)));
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::bundle::BundleContext;
use crate::config::ManagerConfig;
use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::manager::DiManager;
use crate::scope::Scope;

static MANAGER: RwLock<Option<Arc<DiManager>>> = parking_lot::const_rwlock(None);

/// Starts the process-wide manager.
///
/// Fails with [`DiError::AlreadyStarted`] while another manager is running.
pub fn start(context: &BundleContext, package_prefix: &str, debug: bool) -> DiResult<Arc<DiManager>> {
    start_with(context, ManagerConfig::new(package_prefix).debug(debug))
}

/// Starts the process-wide manager with a full configuration.
pub fn start_with(context: &BundleContext, config: ManagerConfig) -> DiResult<Arc<DiManager>> {
    if MANAGER.read().is_some() {
        return Err(DiError::AlreadyStarted);
    }

    // Started outside the lock: the host may call back into this module
    // while the manager attaches to it.
    let manager = Arc::new(DiManager::start(context, config)?);

    let mut slot = MANAGER.write();
    if slot.is_some() {
        drop(slot);
        manager.stop();
        return Err(DiError::AlreadyStarted);
    }
    *slot = Some(manager.clone());
    Ok(manager)
}

/// The running manager, if any.
pub fn get_default() -> Option<Arc<DiManager>> {
    MANAGER.read().clone()
}

/// Stops and clears the process-wide manager.
///
/// Handles obtained from [`get_default`] earlier keep working only as far as
/// [`DiManager::injector`] reporting [`DiError::NotStarted`].
pub fn stop() -> DiResult<()> {
    let manager = MANAGER.write().take().ok_or(DiError::NotStarted)?;
    manager.stop();
    Ok(())
}

/// Injector for `scope` from the running manager.
pub fn injector(scope: Scope) -> DiResult<Injector> {
    get_default().ok_or(DiError::NotStarted)?.injector(scope)
}

/// Injector for a scope given by name.
pub fn injector_for(scope: &str) -> DiResult<Injector> {
    get_default().ok_or(DiError::NotStarted)?.injector_for(scope)
}
