mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::components::{Decorations, DisposalLog, Indexer, Outline, Renderer, Settings};
use common::{same_page, FakeWorkbench};
use workbench_di::{
    BundleContext, BundleEntry, Component, DiError, DiManager, DiResult, ManagerConfig, Resolver,
    ResolverContext, Scope, StaticBundle, WorkbenchPage,
};

fn start(workbench: &Arc<FakeWorkbench>) -> DiManager {
    DiManager::start(&common::context(workbench), ManagerConfig::new(common::prefix()))
        .expect("manager starts")
}

// ===== Injector lookup =====

#[test]
fn test_plugin_injector_is_shared() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);

    let a = manager.injector(Scope::Plugin).unwrap();
    let b = manager.injector(Scope::Plugin).unwrap();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.scope(), Scope::Plugin);
    assert_eq!(a.get_required::<Settings>().tab_width, 4);
    assert_eq!(a.get_required_trait::<dyn Renderer>().render("x"), "<p>x</p>");
}

#[test]
fn test_every_scope_yields_matching_injector() {
    let workbench = FakeWorkbench::new();
    let window = workbench.add_window_silently("main");
    window.add_page_silently("README.md");
    let manager = start(&workbench);

    for scope in Scope::ALL {
        assert_eq!(manager.injector(scope).unwrap().scope(), scope);
    }
}

#[test]
fn test_page_injector_follows_active_page() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);
    let window = workbench.open_window("main");
    let first = window.open_page("one.md");
    let second = window.open_page("two.md");

    let active = manager.injector(Scope::Page).unwrap();
    assert!(active.ptr_eq(&manager.page_injector(&second).unwrap()));
    assert!(same_page(&active.get_required_trait::<dyn WorkbenchPage>(), &second));

    window.activate(&first);
    let active = manager.injector(Scope::Page).unwrap();
    assert!(active.ptr_eq(&manager.page_injector(&first).unwrap()));

    let outline = active.get_required::<Outline>();
    assert!(same_page(&outline.page, &first));
    assert!(Arc::ptr_eq(
        &outline.settings,
        &manager.injector(Scope::Plugin).unwrap().get_required::<Settings>()
    ));
}

#[test]
fn test_pages_open_before_start_are_tracked() {
    let workbench = FakeWorkbench::new();
    let window = workbench.add_window_silently("main");
    let page = window.add_page_silently("preexisting.md");

    let manager = start(&workbench);

    assert_eq!(manager.tracked_windows(), 1);
    assert_eq!(manager.tracked_pages(), 1);
    let injector = manager.injector(Scope::Page).unwrap();
    assert!(same_page(&injector.get_required_trait::<dyn WorkbenchPage>(), &page));
}

#[test]
fn test_page_components_are_per_page() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);
    let window = workbench.open_window("main");
    let first = window.open_page("one.md");
    let second = window.open_page("two.md");

    let a = manager.page_injector(&first).unwrap().get_required::<Outline>();
    let b = manager.page_injector(&second).unwrap().get_required::<Outline>();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.settings, &b.settings));
}

// ===== Illegal state / argument =====

#[test]
fn test_no_window_is_illegal_state() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);

    let err = manager.injector(Scope::Page).unwrap_err();
    assert!(matches!(err, DiError::NoActivePage));
    assert!(err.is_illegal_state());
}

#[test]
fn test_window_without_active_page_is_illegal_state() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);
    workbench.open_window("empty");

    assert!(matches!(manager.injector(Scope::Page), Err(DiError::NoActivePage)));
}

#[test]
fn test_closed_page_still_active_is_not_tracked() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);
    let window = workbench.open_window("main");
    let page = window.open_page("gone.md");

    window.close_page(&page);
    assert!(manager.page_injector(&page).is_none());

    // a host that still reports the closed page as active
    window.force_active(Some(page));
    match manager.injector(Scope::Page) {
        Err(err @ DiError::PageNotTracked(_)) => {
            assert!(err.is_illegal_state());
            assert_eq!(err.to_string(), "Unable to locate page injector for page: gone.md");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_scope_by_name() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);

    assert!(manager.injector_for("plugin").is_ok());
    assert!(manager.injector_for(" PLUGIN ").is_ok());
    assert!(matches!(manager.injector_for("page"), Err(DiError::NoActivePage)));

    let err = manager.injector_for("window").unwrap_err();
    assert!(matches!(err, DiError::UnknownScope(ref name) if name == "window"));
    assert!(err.is_illegal_argument());
    assert!(!err.is_illegal_state());
}

// ===== Introspection =====

#[test]
fn test_components_and_config_are_reported() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);

    let plugin = manager.components(Scope::Plugin);
    assert_eq!(plugin.len(), 4);
    assert!(plugin.iter().any(|n| n.ends_with("HtmlRenderer")));
    assert!(!plugin.iter().any(|n| n.ends_with("Stray")));

    let page = manager.components(Scope::Page);
    assert_eq!(page.len(), 2);
    assert_eq!(manager.config().package_prefix, common::prefix());
    assert!(manager.is_running());
}

#[test]
fn test_duplicate_component_fails_start() {
    let bundle = StaticBundle::new(
        "dup",
        vec![BundleEntry::component::<Settings>(), BundleEntry::component::<Settings>()],
    );
    let workbench = FakeWorkbench::new();
    let context = BundleContext::new(Arc::new(bundle), workbench.clone());

    let result = DiManager::start(&context, ManagerConfig::default());
    assert!(matches!(result, Err(DiError::DuplicateComponent(_))));
    // nothing was registered with the host
    assert_eq!(workbench.listener_count(), 0);
}

// ===== Stop =====

#[test]
fn test_stop_disposes_pages_before_plugin() {
    let workbench = FakeWorkbench::new();
    let manager = start(&workbench);
    let window = workbench.open_window("main");
    let page = window.open_page("a.md");

    let plugin = manager.injector(Scope::Plugin).unwrap();
    plugin.get_required::<Indexer>();
    manager.page_injector(&page).unwrap().get_required::<Decorations>();
    let log = plugin.get_required::<DisposalLog>();

    manager.stop();

    assert_eq!(
        log.entries(),
        vec!["decorations:a.md".to_string(), "indexer".to_string()]
    );
    assert_eq!(workbench.listener_count(), 0);
    assert_eq!(window.listener_count(), 0);
    assert_eq!(manager.tracked_pages(), 0);
    assert!(plugin.is_disposed());
}

#[test]
fn test_dropping_running_manager_stops_it() {
    let workbench = FakeWorkbench::new();
    let window = workbench.add_window_silently("main");
    window.add_page_silently("a.md");
    let manager = start(&workbench);
    let plugin = manager.injector(Scope::Plugin).unwrap();
    let page = manager.injector(Scope::Page).unwrap();
    let log = plugin.get_required::<DisposalLog>();
    page.get_required::<Decorations>();

    drop(manager);

    assert_eq!(workbench.listener_count(), 0);
    assert_eq!(window.listener_count(), 0);
    assert!(page.is_disposed());
    assert!(plugin.is_disposed());
    assert_eq!(log.entries(), vec!["decorations:a.md".to_string()]);

    // later host events reach nobody
    window.open_page("b.md");
    assert!(matches!(page.get::<Outline>(), Err(DiError::Disposed(Scope::Page))));
}

#[test]
fn test_injector_after_stop_is_not_started() {
    let workbench = FakeWorkbench::new();
    let window = workbench.add_window_silently("main");
    window.add_page_silently("a.md");
    let manager = start(&workbench);

    manager.stop();
    manager.stop();

    assert!(!manager.is_running());
    for scope in Scope::ALL {
        assert!(matches!(manager.injector(scope), Err(DiError::NotStarted)));
    }
    assert!(matches!(manager.injector_for("plugin"), Err(DiError::NotStarted)));

    // host events after stop are not observed
    window.open_page("b.md");
    assert_eq!(manager.tracked_pages(), 0);
}

// ===== Eager construction =====

static EAGER_BUILDS: AtomicUsize = AtomicUsize::new(0);

mod eager {
    use super::*;

    pub struct Warm;

    impl Component for Warm {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            EAGER_BUILDS.fetch_add(1, Ordering::SeqCst);
            Ok(Warm)
        }
    }

    pub struct Cold;

    impl Component for Cold {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Err(DiError::construction::<Cold>("no disk space"))
        }
    }
}

#[test]
fn test_eager_start_constructs_plugin_components() {
    let workbench = FakeWorkbench::new();
    let bundle = StaticBundle::new("eager", vec![BundleEntry::component::<eager::Warm>()]);
    let context = BundleContext::new(Arc::new(bundle), workbench.clone());

    let manager = DiManager::start(&context, ManagerConfig::default().eager(true)).unwrap();
    assert_eq!(EAGER_BUILDS.load(Ordering::SeqCst), 1);

    manager.injector(Scope::Plugin).unwrap().get_required::<eager::Warm>();
    assert_eq!(EAGER_BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_eager_start_reports_construction_failure() {
    let workbench = FakeWorkbench::new();
    let bundle = StaticBundle::new("eager", vec![BundleEntry::component::<eager::Cold>()]);
    let context = BundleContext::new(Arc::new(bundle), workbench.clone());

    let result = DiManager::start(&context, ManagerConfig::default().eager(true));
    assert!(matches!(result, Err(DiError::Construction { .. })));
    assert_eq!(workbench.listener_count(), 0);
}

#[test]
fn test_debug_eager_manager_runs_full_lifecycle() {
    let workbench = FakeWorkbench::new();
    let context = common::context(&workbench);
    let config = ManagerConfig::new(common::prefix()).debug(true).eager(true);
    let manager = DiManager::start(&context, config).unwrap();
    let plugin = manager.injector(Scope::Plugin).unwrap();
    let log = plugin.get_required::<DisposalLog>();

    let window = workbench.open_window("main");
    let page = window.open_page("debug.md");
    let injector = manager.injector(Scope::Page).unwrap();
    assert!(same_page(&injector.get_required_trait::<dyn WorkbenchPage>(), &page));

    // eager page components were built when the page opened
    window.close_page(&page);
    assert_eq!(log.entries(), vec!["decorations:debug.md".to_string()]);

    workbench.close_window(&window);
    assert_eq!(manager.tracked_windows(), 0);

    manager.stop();
    assert_eq!(
        log.entries(),
        vec!["decorations:debug.md".to_string(), "indexer".to_string()]
    );
}
