//! scriptbind registry crate.
//!
//! Provides [`TypeRegistry`], the concrete [`scriptbind_core::BindingContext`]
//! built from the front end's list of exported types.

mod registry;

pub use registry::{TypeEntry, TypeRegistry, TypeRegistryBuilder};
