//! Component discovery inside a plugin bundle.

use std::collections::HashSet;

use crate::bundle::Bundle;
use crate::component::{module_path_of, ComponentDescriptor};
use crate::error::{DiError, DiResult};

/// Finds the components a bundle ships under a module-path prefix.
///
/// A type matches when the module it is declared in equals the prefix or is
/// nested below it, compared on `::` segment boundaries: the prefix
/// `viewer::render` covers `viewer::render::Html` and
/// `viewer::render::math::Tex`, but not `viewer::renderer::Pdf`. An empty
/// prefix covers every entry.
///
/// # Examples
///
/// ```rust
/// use workbench_di::ComponentScanner;
///
/// let scanner = ComponentScanner::new("viewer::render");
/// assert!(scanner.matches("viewer::render::Html"));
/// assert!(scanner.matches("viewer::render::math::Tex"));
/// assert!(!scanner.matches("viewer::renderer::Pdf"));
/// ```
#[derive(Debug, Clone)]
pub struct ComponentScanner {
    prefix: String,
}

impl ComponentScanner {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim().trim_end_matches("::").to_string();
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a fully qualified type name falls under the prefix.
    pub fn matches(&self, type_name: &str) -> bool {
        if self.prefix.is_empty() {
            return true;
        }
        let module = module_path_of(type_name);
        match module.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }

    /// Scans `bundle` and returns the matching components in bundle order.
    ///
    /// Entries that are not components are skipped. Two components
    /// registered under the same key fail with
    /// [`DiError::DuplicateComponent`].
    pub fn scan(&self, bundle: &dyn Bundle) -> DiResult<Vec<ComponentDescriptor>> {
        let entries = bundle.entries();
        let total = entries.len();
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for entry in entries {
            if !self.matches(entry.type_name()) {
                continue;
            }
            let Some(descriptor) = entry.into_descriptor() else {
                continue;
            };
            if !seen.insert(*descriptor.key()) {
                return Err(DiError::DuplicateComponent(descriptor.key().display_name()));
            }
            found.push(descriptor);
        }

        tracing::debug!(
            bundle = bundle.symbolic_name(),
            prefix = %self.prefix,
            entries = total,
            components = found.len(),
            "scanned bundle"
        );
        Ok(found)
    }
}
