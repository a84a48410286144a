//! Internal disposal bag for managing cleanup hooks.

/// Container for disposal hooks with LIFO execution order.
#[derive(Default)]
pub(crate) struct DisposeBag {
    sync: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    /// Add a synchronous disposal hook.
    pub(crate) fn push_sync(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.sync.push(f);
    }

    /// Removes every hook, last registered first.
    ///
    /// The hooks are returned rather than run so the caller can release its
    /// lock before invoking them.
    pub(crate) fn drain_reverse(&mut self) -> Vec<Box<dyn FnOnce() + Send>> {
        let mut hooks = std::mem::take(&mut self.sync);
        hooks.reverse();
        hooks
    }

    pub(crate) fn len(&self) -> usize {
        self.sync.len()
    }
}
