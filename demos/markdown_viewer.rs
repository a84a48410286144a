/// Example: a markdown viewer plugin driven by an in-memory workbench
///
/// The plugin ships a renderer shared by every page and a preview pane per
/// page. The demo opens and closes windows and pages and shows which injector
/// each request lands in.
///
/// Run with `RUST_LOG=workbench_di=trace` to see lifecycle and resolution events.

use std::sync::Arc;

use parking_lot::Mutex;

use tracing_subscriber::EnvFilter;
use workbench_di::{
    BundleContext, BundleEntry, DiManager, DiResult, ManagerConfig, PageListener, PageRef,
    Resolver, Scope, StaticBundle, WindowListener, WindowRef, Workbench, WorkbenchPage,
    WorkbenchWindow,
};

// ===== Plugin components =====

mod viewer {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use workbench_di::{Component, DiResult, Dispose, Resolver, ResolverContext, Scope, WorkbenchPage};

    pub trait Renderer: Send + Sync {
        fn render(&self, source: &str) -> String;
    }

    pub struct HtmlRenderer {
        rendered: AtomicUsize,
    }

    impl Renderer for HtmlRenderer {
        fn render(&self, source: &str) -> String {
            self.rendered.fetch_add(1, Ordering::Relaxed);
            source
                .lines()
                .map(|line| match line.strip_prefix("# ") {
                    Some(heading) => format!("<h1>{}</h1>", heading),
                    None => format!("<p>{}</p>", line),
                })
                .collect()
        }
    }

    impl Component for HtmlRenderer {
        const SCOPE: Scope = Scope::Plugin;
        fn construct(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(HtmlRenderer {
                rendered: AtomicUsize::new(0),
            })
        }
    }

    struct PreviewCache {
        page: String,
    }

    impl Dispose for PreviewCache {
        fn dispose(&self) {
            println!("  preview cache for {} flushed", self.page);
        }
    }

    pub struct PreviewPane {
        page: Arc<dyn WorkbenchPage>,
        renderer: Arc<dyn Renderer>,
    }

    impl PreviewPane {
        pub fn show(&self, source: &str) -> String {
            format!("[{}] {}", self.page.label(), self.renderer.render(source))
        }
    }

    impl Component for PreviewPane {
        const SCOPE: Scope = Scope::Page;
        fn construct(resolver: &ResolverContext<'_>) -> DiResult<Self> {
            let page = resolver.get_trait::<dyn WorkbenchPage>()?;
            resolver.register_disposer(Arc::new(PreviewCache { page: page.label() }));
            Ok(PreviewPane {
                page,
                renderer: resolver.get_trait::<dyn Renderer>()?,
            })
        }
    }
}

// ===== In-memory workbench =====

struct Page(String);

impl WorkbenchPage for Page {
    fn label(&self) -> String {
        self.0.clone()
    }
}

#[derive(Default)]
struct Window {
    pages: Mutex<Vec<PageRef>>,
    listeners: Mutex<Vec<Arc<dyn PageListener>>>,
}

impl Window {
    fn open(&self, label: &str) -> PageRef {
        let page: PageRef = Arc::new(Page(label.to_string()));
        self.pages.lock().push(page.clone());
        for listener in self.listeners.lock().clone() {
            listener.page_opened(&page);
        }
        page
    }

    fn close(&self, page: &PageRef) {
        self.pages.lock().retain(|p| !Arc::ptr_eq(p, page));
        for listener in self.listeners.lock().clone() {
            listener.page_closed(page);
        }
    }
}

impl WorkbenchWindow for Window {
    fn label(&self) -> String {
        "main".to_string()
    }

    fn pages(&self) -> Vec<PageRef> {
        self.pages.lock().clone()
    }

    fn active_page(&self) -> Option<PageRef> {
        self.pages.lock().last().cloned()
    }

    fn add_page_listener(&self, listener: Arc<dyn PageListener>) {
        self.listeners.lock().push(listener);
    }

    fn remove_page_listener(&self, listener: &Arc<dyn PageListener>) {
        self.listeners
            .lock()
            .retain(|l| Arc::as_ptr(l) as *const () != Arc::as_ptr(listener) as *const ());
    }
}

struct Desktop {
    window: Arc<Window>,
}

impl Workbench for Desktop {
    fn windows(&self) -> Vec<WindowRef> {
        vec![self.window.clone()]
    }

    fn active_window(&self) -> Option<WindowRef> {
        Some(self.window.clone())
    }

    fn add_window_listener(&self, _listener: Arc<dyn WindowListener>) {}

    fn remove_window_listener(&self, _listener: &Arc<dyn WindowListener>) {}
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Markdown viewer ===\n");

    let window = Arc::new(Window::default());
    window.open("README.md");

    let bundle = StaticBundle::new(
        "org.example.markdown",
        vec![
            BundleEntry::component_as::<viewer::HtmlRenderer, dyn viewer::Renderer>(|r| {
                r as Arc<dyn viewer::Renderer>
            }),
            BundleEntry::component::<viewer::PreviewPane>(),
        ],
    );
    let context = BundleContext::new(
        Arc::new(bundle),
        Arc::new(Desktop {
            window: window.clone(),
        }),
    );

    let config = ManagerConfig::new(concat!(module_path!(), "::viewer")).debug(true);
    let manager = DiManager::start(&context, config)?;
    println!("plugin components: {:?}", manager.components(Scope::Plugin));
    println!("page components:   {:?}", manager.components(Scope::Page));
    println!("tracked pages:     {}\n", manager.tracked_pages());

    let readme = manager.injector(Scope::Page)?.get::<viewer::PreviewPane>()?;
    println!("{}", readme.show("# Hello\nworkbench"));

    let changelog = window.open("CHANGELOG.md");
    let pane = manager.injector(Scope::Page)?.get::<viewer::PreviewPane>()?;
    println!("{}", pane.show("# 0.1.0\nfirst release"));

    println!("\nclosing CHANGELOG.md");
    window.close(&changelog);
    println!("tracked pages: {}", manager.tracked_pages());

    match manager.injector_for("editor") {
        Err(err) => println!("\ninjector_for(\"editor\"): {}", err),
        Ok(_) => unreachable!("editor is not a scope"),
    }

    println!("\nstopping");
    manager.stop();
    if let Err(err) = manager.injector(Scope::Plugin) {
        println!("after stop: {}", err);
    }

    Ok(())
}
