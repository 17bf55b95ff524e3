//! Error types for scriptbind.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GenerateError      - descriptor groups the generator cannot emit
//! RegistrationError  - type registry construction errors
//! ```
//!
//! Both indicate a defect in the front end that produced the descriptors.
//! Generation stops at the first error; nothing is recovered.

use thiserror::Error;

use crate::OverloadKind;

// ============================================================================
// Generation Errors
// ============================================================================

/// Errors raised while emitting a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A dispatcher was requested for no bindings at all.
    #[error("cannot generate a dispatcher for an empty binding group")]
    EmptyGroup,

    /// Bindings in one group disagree on exported name or kind.
    #[error("binding group '{symbol}' mixes '{found}' into a group of '{expected}'")]
    MixedGroup {
        /// Dispatcher name of the group.
        symbol: String,
        /// Name and kind of the first binding.
        expected: String,
        /// Name and kind of the offending binding.
        found: String,
    },

    /// A variable or constant was declared more than once.
    #[error("{kind} '{symbol}' cannot be overloaded ({count} bindings)")]
    OverloadedAccessor {
        /// Dispatcher name of the group.
        symbol: String,
        /// Kind of the accessor.
        kind: OverloadKind,
        /// Number of bindings in the group.
        count: usize,
    },

    /// The return slot cannot be marshaled for this binding.
    #[error("'{symbol}': {detail}")]
    InvalidReturn {
        /// Dispatcher name of the group.
        symbol: String,
        /// What is wrong with the return slot.
        detail: String,
    },

    /// A constructor or destructor appears on something other than a member function.
    #[error("'{symbol}': constructors and destructors must be member functions, found {kind}")]
    MisplacedSpecialReturn {
        /// Dispatcher name of the group.
        symbol: String,
        /// Kind the binding was declared with.
        kind: OverloadKind,
    },

    /// Two classes in one output would each define the instance accessor.
    #[error("classes '{first}' and '{second}' both need an instance accessor; emit them as separate units")]
    SharedInstanceAccessor {
        /// First class needing the accessor.
        first: String,
        /// Second class needing the accessor.
        second: String,
    },
}

impl GenerateError {
    /// Create an invalid-return error.
    pub fn invalid_return(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        GenerateError::InvalidReturn {
            symbol: symbol.into(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while building a type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// Two types claim the same unique runtime name.
    #[error("unique name '{unique_name}' claimed by both '{first}' and '{second}'")]
    DuplicateUniqueName {
        /// The contested unique name.
        unique_name: String,
        /// Type registered first.
        first: String,
        /// Type registered second.
        second: String,
    },

    /// The type name is empty or malformed.
    #[error("invalid type name: '{0}'")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_error_messages() {
        assert_eq!(
            GenerateError::EmptyGroup.to_string(),
            "cannot generate a dispatcher for an empty binding group"
        );
        let err = GenerateError::OverloadedAccessor {
            symbol: "lua_Node_x".into(),
            kind: OverloadKind::MemberVariable,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "member variable 'lua_Node_x' cannot be overloaded (2 bindings)"
        );
        assert_eq!(
            GenerateError::invalid_return("lua_f", "varargs cannot be returned").to_string(),
            "'lua_f': varargs cannot be returned"
        );
    }

    #[test]
    fn registration_error_messages() {
        assert_eq!(
            RegistrationError::DuplicateType("Node".into()).to_string(),
            "duplicate type: Node"
        );
    }
}
