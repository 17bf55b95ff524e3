//! Function binding descriptors.
//!
//! A [`FunctionBinding`] describes one overload of an exported symbol: who owns
//! it, how it is invoked, what it takes and what it returns. All bindings that
//! share a dispatcher form a binding group.

use std::fmt;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Param, ParamType};

/// How an exported symbol is reached on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum OverloadKind {
    MemberFunction,
    StaticFunction,
    GlobalFunction,
    MemberVariable,
    StaticVariable,
    GlobalVariable,
    MemberConstant,
    StaticConstant,
    GlobalConstant,
}

impl OverloadKind {
    /// Check if this kind belongs to a class without needing an instance.
    pub const fn is_static(self) -> bool {
        matches!(
            self,
            OverloadKind::StaticFunction
                | OverloadKind::StaticVariable
                | OverloadKind::StaticConstant
        )
    }

    /// Check if this kind is a callable function rather than a data accessor.
    pub const fn is_function(self) -> bool {
        matches!(
            self,
            OverloadKind::MemberFunction
                | OverloadKind::StaticFunction
                | OverloadKind::GlobalFunction
        )
    }

    /// Human-readable name, used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            OverloadKind::MemberFunction => "member function",
            OverloadKind::StaticFunction => "static function",
            OverloadKind::GlobalFunction => "global function",
            OverloadKind::MemberVariable => "member variable",
            OverloadKind::StaticVariable => "static variable",
            OverloadKind::GlobalVariable => "global variable",
            OverloadKind::MemberConstant => "member constant",
            OverloadKind::StaticConstant => "static constant",
            OverloadKind::GlobalConstant => "global constant",
        }
    }
}

impl fmt::Display for OverloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor for one overload of an exported symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionBinding {
    /// Host name of the owning class; empty for globals.
    #[cfg_attr(feature = "serde", serde(default))]
    pub class_owner: String,
    /// Name the symbol is exported and invoked under.
    pub exported_name: String,
    /// Unique name of the owning scope, used to build the dispatcher name.
    pub unique_symbol: String,
    /// How the symbol is reached.
    pub kind: OverloadKind,
    /// Ordered parameter list (excluding the implicit instance).
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<Param>,
    /// Return slot; for variables and constants, the type of the datum.
    pub return_slot: Param,
    /// Whether a returned object becomes owned by the script side.
    #[cfg_attr(feature = "serde", serde(default))]
    pub owns_returned_object: bool,
}

impl FunctionBinding {
    /// Create a binding with no parameters returning `void`.
    pub fn new(
        class_owner: impl Into<String>,
        unique_symbol: impl Into<String>,
        exported_name: impl Into<String>,
        kind: OverloadKind,
    ) -> Self {
        Self {
            class_owner: class_owner.into(),
            exported_name: exported_name.into(),
            unique_symbol: unique_symbol.into(),
            kind,
            params: Vec::new(),
            return_slot: Param::void(),
            owns_returned_object: false,
        }
    }

    /// Set the parameter list.
    pub fn with_params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Set the return slot.
    pub fn returning(mut self, return_slot: Param) -> Self {
        self.return_slot = return_slot;
        self
    }

    /// Mark returned objects as owned by the script side.
    pub fn owning(mut self) -> Self {
        self.owns_returned_object = true;
        self
    }

    /// Check if this is a constructor.
    pub fn is_constructor(&self) -> bool {
        matches!(self.return_slot.ty, ParamType::Constructor { .. })
    }

    /// Check if this is a destructor.
    pub fn is_destructor(&self) -> bool {
        matches!(self.return_slot.ty, ParamType::Destructor)
    }

    /// Check if calls pass an implicit leading instance argument.
    ///
    /// True for member functions other than constructors. Destructors take
    /// the instance being collected.
    pub fn takes_instance(&self) -> bool {
        self.kind == OverloadKind::MemberFunction && !self.is_constructor()
    }

    /// Number of parameters that must always be supplied.
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .position(|p| p.has_default)
            .unwrap_or(self.params.len())
    }

    /// Every argument count this binding accepts, including the implicit
    /// instance argument.
    pub fn arity_range(&self) -> RangeInclusive<usize> {
        let offset = usize::from(self.takes_instance());
        (self.min_arity() + offset)..=(self.params.len() + offset)
    }

    /// Check if two bindings declare the same signature.
    pub fn signature_matches(&self, other: &FunctionBinding) -> bool {
        self.exported_name == other.exported_name
            && self.kind == other.kind
            && self.params == other.params
    }

    /// Name of the generated dispatcher for this binding.
    ///
    /// Built as `<prefix><unique symbol>[_static]_<name>`, where constructors
    /// and destructors use `_init` and `_gc` as their name.
    pub fn function_name(&self, prefix: &str) -> String {
        let mut name = format!("{prefix}{}", self.unique_symbol);
        if self.kind.is_static() {
            name.push_str("_static");
        }
        name.push('_');
        match self.return_slot.ty {
            ParamType::Constructor { .. } => name.push_str("_init"),
            ParamType::Destructor => name.push_str("_gc"),
            _ => name.push_str(&self.exported_name),
        }
        name
    }

    /// Qualified host access path for static and global data or calls.
    pub fn qualified_name(&self) -> String {
        if self.class_owner.is_empty() {
            self.exported_name.clone()
        } else {
            format!("{}::{}", self.class_owner, self.exported_name)
        }
    }
}
