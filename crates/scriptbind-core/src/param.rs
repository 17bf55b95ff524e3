//! Parameter and return-slot descriptors.
//!
//! A [`Param`] describes one value crossing the script/host boundary: either a
//! parameter of a native function or the slot its result is returned through.
//! The host type is modeled as the [`ParamType`] sum type, with the auxiliary
//! information each type needs (enum name, class name, array extent) carried
//! directly by its variant.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Built-in scalar types of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Scalar {
    Bool,
    Char,
    Short,
    Int,
    Long,
    UChar,
    UShort,
    UInt,
    ULong,
    Float,
    Double,
}

impl Scalar {
    /// Host spelling of this scalar type.
    pub const fn spelling(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Char => "char",
            Scalar::Short => "short",
            Scalar::Int => "int",
            Scalar::Long => "long",
            Scalar::UChar => "unsigned char",
            Scalar::UShort => "unsigned short",
            Scalar::UInt => "unsigned int",
            Scalar::ULong => "unsigned long",
            Scalar::Float => "float",
            Scalar::Double => "double",
        }
    }

    /// Check if this is an unsigned integer type.
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Scalar::UChar | Scalar::UShort | Scalar::UInt | Scalar::ULong
        )
    }

    /// Check if this is a floating-point type.
    pub const fn is_floating(self) -> bool {
        matches!(self, Scalar::Float | Scalar::Double)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// How a string value is represented on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum StringRepr {
    /// An owned string object (`std::string`).
    Owned,
    /// A borrowed character buffer (`const char*`).
    #[default]
    Literal,
}

/// How a value is passed: by value, through a pointer, or by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ValueKind {
    #[default]
    Value,
    Pointer,
    Reference,
}

/// Host type of a parameter or return slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum ParamType {
    /// No value.
    Void,
    /// A scalar. `extent` is the element count expression when the slot is a
    /// fixed-size array of scalars (only meaningful for pointer kind).
    Scalar {
        scalar: Scalar,
        #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
        extent: Option<String>,
    },
    /// A registered enum, named by its host name.
    Enum { name: String },
    /// A string.
    String {
        #[cfg_attr(feature = "serde", serde(default))]
        repr: StringRepr,
    },
    /// An instance of a registered class, named by its host name.
    Object { name: String },
    /// Return slot of a constructor of the named class.
    Constructor { name: String },
    /// Return slot of a destructor.
    Destructor,
    /// A type the front end could not classify, kept by its raw spelling.
    Unrecognized { spelling: String },
    /// A C-style variadic tail.
    Varargs,
}

impl ParamType {
    /// Shorthand for a non-array scalar.
    pub fn scalar(scalar: Scalar) -> Self {
        ParamType::Scalar {
            scalar,
            extent: None,
        }
    }

    /// Check if this is the constructor or destructor marker.
    pub fn is_special_return(&self) -> bool {
        matches!(self, ParamType::Constructor { .. } | ParamType::Destructor)
    }

    /// Name of the registered type this slot refers to, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ParamType::Enum { name }
            | ParamType::Object { name }
            | ParamType::Constructor { name } => Some(name),
            _ => None,
        }
    }
}

/// Descriptor for one parameter or return slot.
///
/// Equality is structural over type and kind; whether the parameter has a
/// default value does not take part in it.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub ty: ParamType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ValueKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_default: bool,
}

impl Param {
    /// Create a parameter without a default value.
    pub fn new(ty: ParamType, kind: ValueKind) -> Self {
        Self {
            ty,
            kind,
            has_default: false,
        }
    }

    /// A scalar passed by value.
    pub fn value(scalar: Scalar) -> Self {
        Self::new(ParamType::scalar(scalar), ValueKind::Value)
    }

    /// The `void` return slot.
    pub fn void() -> Self {
        Self::new(ParamType::Void, ValueKind::Value)
    }

    /// An object of the named class.
    pub fn object(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(ParamType::Object { name: name.into() }, kind)
    }

    /// A registered enum passed by value.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(ParamType::Enum { name: name.into() }, ValueKind::Value)
    }

    /// A borrowed `const char*` string.
    pub fn literal_string() -> Self {
        Self::new(
            ParamType::String {
                repr: StringRepr::Literal,
            },
            ValueKind::Pointer,
        )
    }

    /// An owned `std::string`.
    pub fn owned_string() -> Self {
        Self::new(
            ParamType::String {
                repr: StringRepr::Owned,
            },
            ValueKind::Value,
        )
    }

    /// A fixed-size array of scalars, exposed through a pointer.
    pub fn array(scalar: Scalar, extent: impl Into<String>) -> Self {
        Self::new(
            ParamType::Scalar {
                scalar,
                extent: Some(extent.into()),
            },
            ValueKind::Pointer,
        )
    }

    /// Constructor return slot for the named class.
    pub fn constructor(name: impl Into<String>) -> Self {
        Self::new(ParamType::Constructor { name: name.into() }, ValueKind::Pointer)
    }

    /// Destructor return slot.
    pub fn destructor() -> Self {
        Self::new(ParamType::Destructor, ValueKind::Value)
    }

    /// Mark this parameter as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Check if this slot is passed through a pointer.
    pub fn is_pointer(&self) -> bool {
        self.kind == ValueKind::Pointer
    }

    /// Array extent when this slot is a pointer to a fixed-size scalar array.
    pub fn array_extent(&self) -> Option<&str> {
        match &self.ty {
            ParamType::Scalar {
                extent: Some(extent),
                ..
            } if self.is_pointer() && !extent.is_empty() => Some(extent),
            _ => None,
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.kind == other.kind
    }
}

impl std::hash::Hash for Param {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        self.kind.hash(state);
    }
}
