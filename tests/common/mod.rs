//! In-memory workbench and sample components shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use workbench_di::{
    BundleContext, BundleEntry, PageListener, PageRef, StaticBundle, WindowListener, WindowRef,
    Workbench, WorkbenchPage, WorkbenchWindow,
};

// ===== Fake host =====

pub struct FakePage {
    label: String,
}

impl WorkbenchPage for FakePage {
    fn label(&self) -> String {
        self.label.clone()
    }
}

pub fn page(label: &str) -> PageRef {
    Arc::new(FakePage {
        label: label.to_string(),
    })
}

pub struct FakeWindow {
    label: String,
    pages: Mutex<Vec<PageRef>>,
    active: Mutex<Option<PageRef>>,
    listeners: Mutex<Vec<Arc<dyn PageListener>>>,
}

impl FakeWindow {
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            pages: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        })
    }

    fn listeners(&self) -> Vec<Arc<dyn PageListener>> {
        self.listeners.lock().unwrap().clone()
    }

    /// Opens and activates a new page, notifying listeners.
    pub fn open_page(&self, label: &str) -> PageRef {
        let page = page(label);
        self.pages.lock().unwrap().push(page.clone());
        *self.active.lock().unwrap() = Some(page.clone());
        for listener in self.listeners() {
            listener.page_opened(&page);
            listener.page_activated(&page);
        }
        page
    }

    /// Adds a page without telling anyone, as if it was open before the
    /// plugin started.
    pub fn add_page_silently(&self, label: &str) -> PageRef {
        let page = page(label);
        self.pages.lock().unwrap().push(page.clone());
        *self.active.lock().unwrap() = Some(page.clone());
        page
    }

    /// Sends a second `page_opened` for a page that is already open.
    pub fn reannounce(&self, page: &PageRef) {
        for listener in self.listeners() {
            listener.page_opened(page);
        }
    }

    pub fn activate(&self, page: &PageRef) {
        *self.active.lock().unwrap() = Some(page.clone());
        for listener in self.listeners() {
            listener.page_activated(page);
        }
    }

    /// Marks a page active without any notification.
    pub fn force_active(&self, page: Option<PageRef>) {
        *self.active.lock().unwrap() = page;
    }

    pub fn close_page(&self, page: &PageRef) {
        {
            let mut pages = self.pages.lock().unwrap();
            pages.retain(|p| !Arc::ptr_eq(p, page));
            let mut active = self.active.lock().unwrap();
            if active.as_ref().is_some_and(|a| Arc::ptr_eq(a, page)) {
                *active = pages.last().cloned();
            }
        }
        for listener in self.listeners() {
            listener.page_closed(page);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl WorkbenchWindow for FakeWindow {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn pages(&self) -> Vec<PageRef> {
        self.pages.lock().unwrap().clone()
    }

    fn active_page(&self) -> Option<PageRef> {
        self.active.lock().unwrap().clone()
    }

    fn add_page_listener(&self, listener: Arc<dyn PageListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_page_listener(&self, listener: &Arc<dyn PageListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !same_object(l, listener));
    }
}

#[derive(Default)]
pub struct FakeWorkbench {
    windows: Mutex<Vec<Arc<FakeWindow>>>,
    active: Mutex<Option<Arc<FakeWindow>>>,
    listeners: Mutex<Vec<Arc<dyn WindowListener>>>,
}

impl FakeWorkbench {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn listeners(&self) -> Vec<Arc<dyn WindowListener>> {
        self.listeners.lock().unwrap().clone()
    }

    /// Opens and activates a window, notifying listeners.
    pub fn open_window(&self, label: &str) -> Arc<FakeWindow> {
        let window = self.add_window_silently(label);
        let handle: WindowRef = window.clone();
        for listener in self.listeners() {
            listener.window_opened(&handle);
            listener.window_activated(&handle);
        }
        window
    }

    pub fn add_window_silently(&self, label: &str) -> Arc<FakeWindow> {
        let window = FakeWindow::new(label);
        self.windows.lock().unwrap().push(window.clone());
        *self.active.lock().unwrap() = Some(window.clone());
        window
    }

    /// Sends a second `window_opened` for a window that is already open.
    pub fn reannounce(&self, window: &Arc<FakeWindow>) {
        let handle: WindowRef = window.clone();
        for listener in self.listeners() {
            listener.window_opened(&handle);
        }
    }

    pub fn activate(&self, window: &Arc<FakeWindow>) {
        let previous = self.active.lock().unwrap().replace(window.clone());
        for listener in self.listeners() {
            if let Some(previous) = &previous {
                let previous: WindowRef = previous.clone();
                listener.window_deactivated(&previous);
            }
            let handle: WindowRef = window.clone();
            listener.window_activated(&handle);
        }
    }

    pub fn close_window(&self, window: &Arc<FakeWindow>) {
        {
            let mut windows = self.windows.lock().unwrap();
            windows.retain(|w| !Arc::ptr_eq(w, window));
            let mut active = self.active.lock().unwrap();
            if active.as_ref().is_some_and(|a| Arc::ptr_eq(a, window)) {
                *active = windows.last().cloned();
            }
        }
        let handle: WindowRef = window.clone();
        for listener in self.listeners() {
            listener.window_closed(&handle);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl Workbench for FakeWorkbench {
    fn windows(&self) -> Vec<WindowRef> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .map(|w| w.clone() as WindowRef)
            .collect()
    }

    fn active_window(&self) -> Option<WindowRef> {
        self.active.lock().unwrap().clone().map(|w| w as WindowRef)
    }

    fn add_window_listener(&self, listener: Arc<dyn WindowListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_window_listener(&self, listener: &Arc<dyn WindowListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !same_object(l, listener));
    }
}

fn same_object<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

pub fn same_page(a: &PageRef, b: &PageRef) -> bool {
    same_object(a, b)
}

// ===== Sample plugin =====

pub mod components {
    use std::sync::{Arc, Mutex};

    use workbench_di::{
        Component, DiResult, Dispose, Resolver, ResolverContext, Scope, WorkbenchPage,
    };

    /// Records disposals across the whole plugin.
    #[derive(Default)]
    pub struct DisposalLog {
        entries: Mutex<Vec<String>>,
    }

    impl DisposalLog {
        pub fn record(&self, entry: String) {
            self.entries.lock().unwrap().push(entry);
        }

        pub fn entries(&self) -> Vec<String> {
            self.entries.lock().unwrap().clone()
        }
    }

    impl Component for DisposalLog {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(DisposalLog::default())
        }
    }

    pub struct Settings {
        pub tab_width: usize,
    }

    impl Component for Settings {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Settings { tab_width: 4 })
        }
    }

    struct IndexHandle {
        log: Arc<DisposalLog>,
    }

    impl Dispose for IndexHandle {
        fn dispose(&self) {
            self.log.record("indexer".to_string());
        }
    }

    /// Plugin component with a disposal hook.
    pub struct Indexer;

    impl Component for Indexer {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
            let log = resolver.get::<DisposalLog>()?;
            resolver.register_disposer(Arc::new(IndexHandle { log }));
            Ok(Indexer)
        }
    }

    pub trait Renderer: Send + Sync {
        fn render(&self, source: &str) -> String;
    }

    pub struct HtmlRenderer;

    impl Renderer for HtmlRenderer {
        fn render(&self, source: &str) -> String {
            format!("<p>{}</p>", source)
        }
    }

    impl Component for HtmlRenderer {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(HtmlRenderer)
        }
    }

    /// Page component depending on plugin components and its own page.
    pub struct Outline {
        pub settings: Arc<Settings>,
        pub page: Arc<dyn WorkbenchPage>,
    }

    impl Component for Outline {
        const SCOPE: Scope = Scope::Page;
        fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Outline {
                settings: resolver.get::<Settings>()?,
                page: resolver.get_trait::<dyn WorkbenchPage>()?,
            })
        }
    }

    struct DecorationHandle {
        label: String,
        log: Arc<DisposalLog>,
    }

    impl Dispose for DecorationHandle {
        fn dispose(&self) {
            self.log.record(format!("decorations:{}", self.label));
        }
    }

    /// Page component with a disposal hook.
    pub struct Decorations {
        pub renderer: Arc<dyn Renderer>,
    }

    impl Component for Decorations {
        const SCOPE: Scope = Scope::Page;
        fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
            let page = resolver.get_trait::<dyn WorkbenchPage>()?;
            let log = resolver.get::<DisposalLog>()?;
            resolver.register_disposer(Arc::new(DecorationHandle {
                label: page.label(),
                log,
            }));
            Ok(Decorations {
                renderer: resolver.get_trait::<dyn Renderer>()?,
            })
        }
    }

    /// Packaged in the bundle but not a component.
    pub struct Readme;
}

pub mod other {
    use workbench_di::{Component, DiResult, ResolverContext, Scope};

    /// Component outside the managed prefix.
    pub struct Stray;

    impl Component for Stray {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Stray)
        }
    }
}

/// Module prefix covering [`components`].
pub fn prefix() -> String {
    format!("{}::components", module_path!())
}

pub fn bundle() -> StaticBundle {
    use components::*;

    StaticBundle::new(
        "org.example.viewer",
        vec![
            BundleEntry::component::<DisposalLog>(),
            BundleEntry::component::<Settings>(),
            BundleEntry::component::<Indexer>(),
            BundleEntry::component_as::<HtmlRenderer, dyn Renderer>(|r| r as Arc<dyn Renderer>),
            BundleEntry::component::<Outline>(),
            BundleEntry::component::<Decorations>(),
            BundleEntry::plain::<Readme>(),
            BundleEntry::component::<other::Stray>(),
        ],
    )
}

pub fn context(workbench: &Arc<FakeWorkbench>) -> BundleContext {
    BundleContext::new(Arc::new(bundle()), workbench.clone())
}
