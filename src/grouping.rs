//! Partitioning of discovered components by scope.

use std::collections::BTreeMap;

use crate::component::ComponentDescriptor;
use crate::scope::Scope;

/// Splits scanned components into one bucket per [`Scope`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeGrouper;

impl ScopeGrouper {
    pub fn new() -> Self {
        Self
    }

    /// Groups `components` by their declared scope, preserving order.
    pub fn group(&self, components: Vec<ComponentDescriptor>) -> ScopeGroups {
        let mut buckets: BTreeMap<Scope, Vec<ComponentDescriptor>> = BTreeMap::new();
        for component in components {
            buckets.entry(component.scope()).or_default().push(component);
        }
        ScopeGroups { buckets }
    }
}

/// Components keyed by scope. Scopes without components have no bucket.
#[derive(Debug, Clone, Default)]
pub struct ScopeGroups {
    buckets: BTreeMap<Scope, Vec<ComponentDescriptor>>,
}

impl ScopeGroups {
    /// Components of `scope`; empty when the bundle declares none.
    pub fn find(&self, scope: Scope) -> &[ComponentDescriptor] {
        self.buckets.get(&scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Owned copy of a bucket, for building an injector.
    pub fn to_vec(&self, scope: Scope) -> Vec<ComponentDescriptor> {
        self.find(scope).to_vec()
    }

    /// Type names in the bucket of `scope`.
    pub fn names(&self, scope: Scope) -> Vec<&'static str> {
        self.find(scope).iter().map(|c| c.type_name()).collect()
    }

    pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.buckets.keys().copied()
    }

    /// Total number of components across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
