//! Keys identifying resolvable values inside an injector.

use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Key for component storage and lookup.
///
/// Components registered by concrete type are keyed by their `TypeId`;
/// components exposed through a trait object (and pre-registered trait
/// instances such as the live workbench page) are keyed by the trait's
/// type name, since `dyn Trait` values are stored behind an extra `Arc`.
///
/// # Examples
///
/// ```rust
/// use workbench_di::{key_of_trait, key_of_type, Key, WorkbenchPage};
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.display_name(), "alloc::string::String");
///
/// let page_key = key_of_trait::<dyn WorkbenchPage>();
/// assert!(matches!(page_key, Key::Trait(_)));
/// assert!(page_key.display_name().contains("WorkbenchPage"));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Trait object key (trait name)
    Trait(&'static str),
}

impl Key {
    /// Type or trait name, for diagnostics and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }
}

// TypeId-only comparison for concrete types; the name is diagnostics only
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Key for a concrete type.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key for a trait object type such as `dyn WorkbenchPage`.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
