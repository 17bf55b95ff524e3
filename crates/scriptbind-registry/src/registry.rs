//! Immutable type registry.
//!
//! `TypeRegistry` holds what the front end learned about every class and enum
//! it exported: the canonical host identifier, the unique name the scripting
//! runtime registers its metatable under, and how script-owned instances are
//! released. It is assembled once through [`TypeRegistryBuilder`] and then only
//! read while dispatchers are generated.
//!
//! # Usage
//!
//! ```ignore
//! let mut builder = TypeRegistryBuilder::new();
//! builder.register(TypeEntry::new("Node").ref_counted());
//! builder.register(TypeEntry::new("Physics::Listener"));
//! let registry = builder.build()?;
//!
//! assert_eq!(registry.resolve_unique_name("Physics::Listener"), "PhysicsListener");
//! ```

use rustc_hash::FxHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use scriptbind_core::{BindingContext, LifetimePolicy, RegistrationError, flatten_scoped_name};

/// Everything known about one registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeEntry {
    /// Host name as it appears in descriptors.
    pub name: String,
    /// Canonical host identifier; defaults to `name`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub identifier: Option<String>,
    /// Runtime unique name; defaults to `name` without scope separators.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unique_name: Option<String>,
    /// Release policy for script-owned instances.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifetime: LifetimePolicy,
}

impl TypeEntry {
    /// Create an entry with derived identifier and unique name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            unique_name: None,
            lifetime: LifetimePolicy::Owned,
        }
    }

    /// Set the canonical host identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the runtime unique name.
    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }

    /// Mark instances as reference counted.
    pub fn ref_counted(mut self) -> Self {
        self.lifetime = LifetimePolicy::RefCounted;
        self
    }

    fn identifier(&self) -> String {
        self.identifier.clone().unwrap_or_else(|| self.name.clone())
    }

    fn unique_name(&self) -> String {
        self.unique_name
            .clone()
            .unwrap_or_else(|| flatten_scoped_name(&self.name))
    }
}

/// A resolved registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedType {
    identifier: String,
    unique_name: String,
    lifetime: LifetimePolicy,
}

/// Immutable registry of exported types.
///
/// Names that were never registered resolve to themselves (identifier) or to
/// their flattened form (unique name), and are treated as plainly owned.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, ResolvedType>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check if a type name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Option<&ResolvedType> {
        let found = self.types.get(name);
        if found.is_none() {
            log::debug!("type '{name}' is not registered, using derived names");
        }
        found
    }
}

impl BindingContext for TypeRegistry {
    fn resolve_identifier(&self, name: &str) -> String {
        self.lookup(name)
            .map(|ty| ty.identifier.clone())
            .unwrap_or_else(|| name.to_string())
    }

    fn resolve_unique_name(&self, name: &str) -> String {
        self.lookup(name)
            .map(|ty| ty.unique_name.clone())
            .unwrap_or_else(|| flatten_scoped_name(name))
    }

    fn is_reference_counted(&self, name: &str) -> bool {
        self.lifetime_policy(name).is_ref_counted()
    }

    fn lifetime_policy(&self, name: &str) -> LifetimePolicy {
        self.lookup(name)
            .map(|ty| ty.lifetime)
            .unwrap_or_default()
    }
}

/// Builder collecting type entries before the registry is sealed.
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    entries: Vec<TypeEntry>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a type for registration.
    pub fn register(&mut self, entry: TypeEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Queue several types for registration.
    pub fn register_all(&mut self, entries: impl IntoIterator<Item = TypeEntry>) -> &mut Self {
        self.entries.extend(entries);
        self
    }

    /// Seal the registry.
    ///
    /// Every entry is validated; all problems are reported together.
    pub fn build(self) -> Result<TypeRegistry, Vec<RegistrationError>> {
        let mut errors = Vec::new();
        let mut types: FxHashMap<String, ResolvedType> = FxHashMap::default();
        let mut unique_owners: FxHashMap<String, String> = FxHashMap::default();

        for entry in self.entries {
            if entry.name.trim().is_empty() {
                errors.push(RegistrationError::InvalidName(entry.name));
                continue;
            }
            if types.contains_key(&entry.name) {
                errors.push(RegistrationError::DuplicateType(entry.name));
                continue;
            }

            let resolved = ResolvedType {
                identifier: entry.identifier(),
                unique_name: entry.unique_name(),
                lifetime: entry.lifetime,
            };

            if let Some(first) = unique_owners.get(&resolved.unique_name) {
                errors.push(RegistrationError::DuplicateUniqueName {
                    unique_name: resolved.unique_name.clone(),
                    first: first.clone(),
                    second: entry.name,
                });
                continue;
            }

            unique_owners.insert(resolved.unique_name.clone(), entry.name.clone());
            types.insert(entry.name, resolved);
        }

        if errors.is_empty() {
            Ok(TypeRegistry { types })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TypeRegistry {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register(TypeEntry::new("Node").ref_counted())
            .register(TypeEntry::new("Vector3").with_identifier("gameplay::Vector3"))
            .register(TypeEntry::new("Physics::Listener"))
            .register(TypeEntry::new("Mouse::MouseEvent").with_unique_name("MouseEvent"));
        builder.build().unwrap()
    }

    #[test]
    fn resolves_registered_types() {
        let registry = sample();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve_identifier("Vector3"), "gameplay::Vector3");
        assert_eq!(registry.resolve_identifier("Node"), "Node");
        assert_eq!(registry.resolve_unique_name("Physics::Listener"), "PhysicsListener");
        assert_eq!(registry.resolve_unique_name("Mouse::MouseEvent"), "MouseEvent");
    }

    #[test]
    fn lifetime_policies() {
        let registry = sample();
        assert!(registry.is_reference_counted("Node"));
        assert!(!registry.is_reference_counted("Vector3"));
        assert_eq!(registry.lifetime_policy("Node"), LifetimePolicy::RefCounted);
        assert_eq!(registry.lifetime_policy("Unknown"), LifetimePolicy::Owned);
    }

    #[test]
    fn unregistered_names_fall_back() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve_identifier("Foo::Bar"), "Foo::Bar");
        assert_eq!(registry.resolve_unique_name("Foo::Bar"), "FooBar");
    }

    #[test]
    fn duplicate_types_are_reported() {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register(TypeEntry::new("Node"))
            .register(TypeEntry::new("Node").ref_counted())
            .register(TypeEntry::new(""));
        let errors = builder.build().unwrap_err();
        assert_eq!(
            errors,
            vec![
                RegistrationError::DuplicateType("Node".into()),
                RegistrationError::InvalidName(String::new()),
            ]
        );
    }

    #[test]
    fn duplicate_unique_names_are_reported() {
        let mut builder = TypeRegistryBuilder::new();
        builder.register_all([
            TypeEntry::new("A::B"),
            TypeEntry::new("AB"),
        ]);
        let errors = builder.build().unwrap_err();
        assert_eq!(
            errors,
            vec![RegistrationError::DuplicateUniqueName {
                unique_name: "AB".into(),
                first: "A::B".into(),
                second: "AB".into(),
            }]
        );
    }
}
