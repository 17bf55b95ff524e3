//! scriptbind
//!
//! Generates the C++ functions that let Lua scripts call an overloaded native
//! API. Each exported symbol becomes one dispatcher that checks the argument
//! count, picks the first overload whose argument types match, converts the
//! arguments, calls the host and pushes the result back, tagging returned
//! objects with who owns them.
//!
//! ## Crates
//!
//! - [`core`]: binding descriptors and the type-name context interface
//! - [`registry`]: the immutable type registry implementing that interface
//! - [`emit`]: the dispatcher generator
//!
//! ## Example
//!
//! ```
//! use scriptbind::prelude::*;
//!
//! let mut types = TypeRegistryBuilder::new();
//! types.register(TypeEntry::new("Node").ref_counted());
//! let ctx = types.build().unwrap();
//!
//! let bindings = [
//!     FunctionBinding::new("Node", "Node", "setId", OverloadKind::MemberFunction)
//!         .with_params([Param::literal_string()]),
//!     FunctionBinding::new("Node", "Node", "~Node", OverloadKind::MemberFunction)
//!         .returning(Param::destructor()),
//! ];
//!
//! let unit = Generator::new(&ctx).write_class_unit("Node", &bindings).unwrap();
//! assert!(unit.contains("int lua_Node_setId(lua_State* state)"));
//! assert!(unit.contains("SAFE_RELEASE(instance);"));
//! ```

pub use scriptbind_core as core;
pub use scriptbind_emit as emit;
pub use scriptbind_registry as registry;

pub use scriptbind_core::{
    BindingContext, FunctionBinding, GenerateError, LifetimePolicy, OverloadKind, Param, ParamType,
    RegistrationError, Scalar, StringRepr, ValueKind,
};
pub use scriptbind_emit::{ArityTable, CodeWriter, EmitOptions, Generator, RuntimeSurface};
pub use scriptbind_registry::{TypeEntry, TypeRegistry, TypeRegistryBuilder};

pub mod prelude {
    pub use scriptbind_core::{
        BindingContext, FunctionBinding, GenerateError, LifetimePolicy, OverloadKind, Param,
        ParamType, Scalar, StringRepr, ValueKind,
    };
    pub use scriptbind_emit::{EmitOptions, Generator, RuntimeSurface, group_by_symbol};
    pub use scriptbind_registry::{TypeEntry, TypeRegistry, TypeRegistryBuilder};
}
