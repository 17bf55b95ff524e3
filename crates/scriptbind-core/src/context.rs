//! The type-name context the generator consults.
//!
//! The front end that produced the descriptors also knows how host type names
//! map to canonical identifiers and to the unique names the runtime registers
//! metatables under, and how instances of each class are released. The
//! generator only sees that knowledge through [`BindingContext`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a script-owned instance of a class is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum LifetimePolicy {
    /// Intrusively reference counted; the script side drops its reference.
    RefCounted,
    /// Plain allocation; the script side deletes the instance.
    #[default]
    Owned,
}

impl LifetimePolicy {
    /// Check if this is the reference-counted policy.
    pub const fn is_ref_counted(self) -> bool {
        matches!(self, LifetimePolicy::RefCounted)
    }
}

/// Read-only name and lifetime lookups used during generation.
pub trait BindingContext {
    /// Canonical host identifier for a type name (e.g. with its namespace).
    fn resolve_identifier(&self, name: &str) -> String;

    /// Unique name a type is registered under in the scripting runtime.
    fn resolve_unique_name(&self, name: &str) -> String;

    /// Whether instances of the named class are reference counted.
    fn is_reference_counted(&self, name: &str) -> bool;

    /// Release policy for instances of the named class.
    fn lifetime_policy(&self, name: &str) -> LifetimePolicy {
        if self.is_reference_counted(name) {
            LifetimePolicy::RefCounted
        } else {
            LifetimePolicy::Owned
        }
    }
}

impl<T: BindingContext + ?Sized> BindingContext for &T {
    fn resolve_identifier(&self, name: &str) -> String {
        (**self).resolve_identifier(name)
    }

    fn resolve_unique_name(&self, name: &str) -> String {
        (**self).resolve_unique_name(name)
    }

    fn is_reference_counted(&self, name: &str) -> bool {
        (**self).is_reference_counted(name)
    }

    fn lifetime_policy(&self, name: &str) -> LifetimePolicy {
        (**self).lifetime_policy(name)
    }
}

/// Unique name derived from a scoped host name by dropping the scope
/// separators (`Physics::Listener` becomes `PhysicsListener`).
pub fn flatten_scoped_name(name: &str) -> String {
    name.split("::").filter(|part| !part.is_empty()).collect()
}
