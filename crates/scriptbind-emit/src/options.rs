//! Emission options.
//!
//! The emitted dispatchers call into a fixed support surface provided by the
//! embedding engine: typed pointer accessors, an object accessor, the handle
//! struct, enum converters and release macros. [`RuntimeSurface`] names those
//! collaborators so the generator can target engines that spell them
//! differently. [`EmitOptions`] adds layout switches on top.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names of the runtime support surface the emitted code depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RuntimeSurface {
    /// Prefix of every dispatcher name.
    pub function_prefix: String,
    /// Type of the opaque call-state parameter.
    pub state_type: String,
    /// Expression yielding the script controller that owns the accessors.
    pub controller: String,
    /// Handle struct carrying `instance` and `owns`.
    pub handle_type: String,
    /// Per-class helper returning the implicit instance argument.
    pub instance_accessor: String,
    /// Macro used to emit a runtime warning.
    pub warn_macro: String,
    /// Macro releasing a reference-counted instance.
    pub release_ref_counted: String,
    /// Macro deleting a plainly owned instance.
    pub release_owned: String,
    /// Prefix of the string-to-enum converters.
    pub enum_from_string: String,
    /// Prefix of the enum-to-string converters.
    pub enum_to_string: String,
}

impl Default for RuntimeSurface {
    fn default() -> Self {
        Self {
            function_prefix: "lua_".to_string(),
            state_type: "lua_State".to_string(),
            controller: "ScriptController::getInstance()".to_string(),
            handle_type: "ScriptController::LuaObject".to_string(),
            instance_accessor: "getInstance".to_string(),
            warn_macro: "GP_WARN".to_string(),
            release_ref_counted: "SAFE_RELEASE".to_string(),
            release_owned: "SAFE_DELETE".to_string(),
            enum_from_string: "lua_enumFromString_".to_string(),
            enum_to_string: "lua_stringFromEnum_".to_string(),
        }
    }
}

/// Options for dispatcher generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EmitOptions {
    /// Runtime support surface.
    pub surface: RuntimeSurface,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Emit a switch-free body for a lone overload with a single arity.
    pub direct_single_overload: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            surface: RuntimeSurface::default(),
            indent_width: 4,
            direct_single_overload: true,
        }
    }
}

impl EmitOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the runtime surface.
    pub fn with_surface(mut self, surface: RuntimeSurface) -> Self {
        self.surface = surface;
        self
    }

    /// Set the dispatcher name prefix.
    pub fn with_function_prefix(mut self, prefix: &str) -> Self {
        self.surface.function_prefix = prefix.to_string();
        self
    }

    /// Set the indentation width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Always emit the arity switch, even for a lone single-arity overload.
    pub fn always_switch(mut self) -> Self {
        self.direct_single_overload = false;
        self
    }
}
