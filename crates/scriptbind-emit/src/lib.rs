//! scriptbind emitter
//!
//! Generates C++ dispatch trampolines that let Lua scripts call overloaded
//! native functions, variables, constants, constructors and destructors.
//!
//! ## Modules
//!
//! - [`writer`]: indented output buffer
//! - [`options`]: runtime surface names and layout switches
//! - [`host_type`]: host type spelling of descriptors
//! - [`checks`]: runtime type-check predicates
//! - [`overload`]: grouping overloads by arity and resolving calls
//! - [`dispatch`]: the dispatcher generator
//! - [`unit`]: binding groups and per-class translation units
//!
//! ## Example
//!
//! ```
//! use scriptbind_core::{FunctionBinding, OverloadKind, Param, Scalar};
//! use scriptbind_emit::Generator;
//! use scriptbind_registry::TypeRegistry;
//!
//! let ctx = TypeRegistry::new();
//! let lerp = FunctionBinding::new("", "Global", "lerp", OverloadKind::GlobalFunction)
//!     .with_params([Param::value(Scalar::Float), Param::value(Scalar::Float)])
//!     .returning(Param::value(Scalar::Float));
//!
//! let code = Generator::new(&ctx).write(&[lerp]).unwrap();
//! assert!(code.starts_with("int lua_Global_lerp(lua_State* state)"));
//! ```

pub mod checks;
pub mod dispatch;
pub mod host_type;
pub mod options;
pub mod overload;
pub mod unit;
pub mod writer;

pub use checks::{DynamicKind, TypeCheck, signature_checks};
pub use dispatch::{Generator, validate_group};
pub use host_type::{base_type, host_type};
pub use options::{EmitOptions, RuntimeSurface};
pub use overload::{ArityTable, Resolution, accepted_arities, format_arities, group_arities};
pub use unit::{BindingGroup, ClassUnit, group_by_symbol};
pub use writer::CodeWriter;
