//! Component scope definitions.

use std::fmt;
use std::str::FromStr;

use crate::error::DiError;

/// Lifetime class of a component.
///
/// Every component declares exactly one scope, and the manager keeps one
/// injector per scope instance:
///
/// - **Plugin**: one instance for the whole lifetime of the plugin (from
///   `start` to `stop`). Plugin components live in the root injector.
/// - **Page**: one instance per open workbench page. Page components live in
///   a child injector created when the page opens and dropped when it closes.
///
/// Page injectors fall back to the plugin injector, so a page component may
/// depend on plugin components but never the other way around.
///
/// # Examples
///
/// ```rust
/// use workbench_di::Scope;
///
/// let scope: Scope = "page".parse().unwrap();
/// assert_eq!(scope, Scope::Page);
/// assert_eq!(Scope::Plugin.to_string(), "plugin");
/// assert!("window".parse::<Scope>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Scope {
    /// Single instance per plugin activation
    Plugin,
    /// Single instance per open workbench page
    Page,
}

impl Scope {
    /// All scopes, outermost first.
    pub const ALL: [Scope; 2] = [Scope::Plugin, Scope::Page];

    /// Lowercase name used in logs and when parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Plugin => "plugin",
            Scope::Page => "page",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plugin" => Ok(Scope::Plugin),
            "page" => Ok(Scope::Page),
            _ => Err(DiError::UnknownScope(s.to_string())),
        }
    }
}
