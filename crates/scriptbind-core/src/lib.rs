//! scriptbind core
//!
//! Descriptor model shared by every scriptbind crate.
//!
//! ## Modules
//!
//! - [`param`]: parameter and return-slot descriptors
//! - [`binding`]: function binding descriptors and arity rules
//! - [`context`]: the read-only type-name context consulted during generation
//! - [`error`]: generation and registration errors

pub mod binding;
pub mod context;
pub mod error;
pub mod param;

pub use binding::{FunctionBinding, OverloadKind};
pub use context::{BindingContext, LifetimePolicy, flatten_scoped_name};
pub use error::{GenerateError, RegistrationError};
pub use param::{Param, ParamType, Scalar, StringRepr, ValueKind};
