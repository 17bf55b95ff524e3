//! Runtime type-check predicates.
//!
//! The scripting runtime knows far fewer value kinds than the host: a single
//! number kind covers every integer and floating-point width, and arrays
//! arrive either as tables or as light userdata. A [`TypeCheck`] records which
//! dynamic kinds a stack slot may hold for a parameter to be accepted. The
//! same value renders to the emitted predicate and evaluates in Rust, so the
//! dispatch decision can be checked without compiling generated code.

use std::fmt;

use scriptbind_core::{FunctionBinding, Param, ParamType, Scalar, ValueKind};

/// Dynamic value kinds of the scripting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicKind {
    /// The slot was not supplied.
    None,
    Nil,
    Boolean,
    LightUserdata,
    Number,
    String,
    Table,
    Function,
    Userdata,
    Thread,
}

impl DynamicKind {
    /// Name of the runtime constant for this kind.
    pub const fn constant(self) -> &'static str {
        match self {
            DynamicKind::None => "LUA_TNONE",
            DynamicKind::Nil => "LUA_TNIL",
            DynamicKind::Boolean => "LUA_TBOOLEAN",
            DynamicKind::LightUserdata => "LUA_TLIGHTUSERDATA",
            DynamicKind::Number => "LUA_TNUMBER",
            DynamicKind::String => "LUA_TSTRING",
            DynamicKind::Table => "LUA_TTABLE",
            DynamicKind::Function => "LUA_TFUNCTION",
            DynamicKind::Userdata => "LUA_TUSERDATA",
            DynamicKind::Thread => "LUA_TTHREAD",
        }
    }
}

const ABSENT: &[DynamicKind] = &[DynamicKind::None];
const BOOLEAN: &[DynamicKind] = &[DynamicKind::Boolean];
const NUMBER: &[DynamicKind] = &[DynamicKind::Number];
const ARRAY: &[DynamicKind] = &[DynamicKind::Table, DynamicKind::LightUserdata];
const STRING_OR_NIL: &[DynamicKind] = &[DynamicKind::String, DynamicKind::Nil];
const HANDLE_OR_NIL: &[DynamicKind] = &[DynamicKind::Userdata, DynamicKind::Nil];

/// Predicate over the dynamic kind of one stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCheck {
    /// One-based stack index.
    pub index: usize,
    /// Kinds the slot may hold.
    pub accepts: &'static [DynamicKind],
}

impl TypeCheck {
    /// Predicate for a declared parameter at `index`.
    pub fn for_param(index: usize, param: &Param) -> Self {
        let accepts = match &param.ty {
            ParamType::Scalar { scalar, .. } => match (scalar, param.kind) {
                (_, ValueKind::Pointer) => ARRAY,
                (Scalar::Bool, ValueKind::Value | ValueKind::Reference) => BOOLEAN,
                (_, ValueKind::Value | ValueKind::Reference) => NUMBER,
            },
            // Coerced as an unsigned integer.
            ParamType::Unrecognized { .. } => NUMBER,
            ParamType::String { .. } | ParamType::Enum { .. } => STRING_OR_NIL,
            ParamType::Object { .. } => HANDLE_OR_NIL,
            ParamType::Void
            | ParamType::Varargs
            | ParamType::Constructor { .. }
            | ParamType::Destructor => ABSENT,
        };
        Self { index, accepts }
    }

    /// Predicate for the implicit instance argument of a member call.
    pub fn for_instance(index: usize) -> Self {
        Self {
            index,
            accepts: HANDLE_OR_NIL,
        }
    }

    /// Check if a slot of the given kind satisfies this predicate.
    pub fn holds(&self, kind: DynamicKind) -> bool {
        self.accepts.contains(&kind)
    }
}

impl fmt::Display for TypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index;
        match self.accepts {
            [single] => write!(f, "lua_type(state, {index}) == {}", single.constant()),
            kinds => {
                f.write_str("(")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" || ")?;
                    }
                    write!(f, "lua_type(state, {index}) == {}", kind.constant())?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Predicates for every supplied slot when `binding` is called with `arity`
/// arguments.
///
/// `arity` must lie within the binding's arity range.
pub fn signature_checks(binding: &FunctionBinding, arity: usize) -> Vec<TypeCheck> {
    let offset = usize::from(binding.takes_instance());
    (0..arity)
        .map(|slot| {
            let index = slot + 1;
            if slot < offset {
                TypeCheck::for_instance(index)
            } else {
                TypeCheck::for_param(index, &binding.params[slot - offset])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptbind_core::OverloadKind;

    #[test]
    fn scalar_predicates() {
        let int = TypeCheck::for_param(2, &Param::value(Scalar::Int));
        assert_eq!(int.to_string(), "lua_type(state, 2) == LUA_TNUMBER");
        assert!(int.holds(DynamicKind::Number));
        assert!(!int.holds(DynamicKind::Boolean));

        let flag = TypeCheck::for_param(1, &Param::value(Scalar::Bool));
        assert_eq!(flag.to_string(), "lua_type(state, 1) == LUA_TBOOLEAN");

        let array = TypeCheck::for_param(3, &Param::array(Scalar::Float, "16"));
        assert_eq!(
            array.to_string(),
            "(lua_type(state, 3) == LUA_TTABLE || lua_type(state, 3) == LUA_TLIGHTUSERDATA)"
        );
        assert!(array.holds(DynamicKind::LightUserdata));
        assert!(!array.holds(DynamicKind::Number));
    }

    #[test]
    fn reference_predicates() {
        let text = TypeCheck::for_param(1, &Param::literal_string());
        assert_eq!(
            text.to_string(),
            "(lua_type(state, 1) == LUA_TSTRING || lua_type(state, 1) == LUA_TNIL)"
        );
        let mode = TypeCheck::for_param(1, &Param::enumeration("Mode"));
        assert!(mode.holds(DynamicKind::String) && mode.holds(DynamicKind::Nil));

        let node = TypeCheck::for_param(1, &Param::object("Node", ValueKind::Reference));
        assert_eq!(
            node.to_string(),
            "(lua_type(state, 1) == LUA_TUSERDATA || lua_type(state, 1) == LUA_TNIL)"
        );
        assert_eq!(TypeCheck::for_instance(1), TypeCheck { index: 1, ..node });
    }

    #[test]
    fn absent_predicates() {
        let varargs = TypeCheck::for_param(4, &Param::new(ParamType::Varargs, ValueKind::Value));
        assert_eq!(varargs.to_string(), "lua_type(state, 4) == LUA_TNONE");
        assert!(varargs.holds(DynamicKind::None));
    }

    #[test]
    fn member_checks_lead_with_instance() {
        let binding = FunctionBinding::new("Node", "Node", "rotate", OverloadKind::MemberFunction)
            .with_params([
                Param::value(Scalar::Float),
                Param::value(Scalar::Bool).with_default(),
            ]);
        let checks = signature_checks(&binding, 2);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0], TypeCheck::for_instance(1));
        assert_eq!(checks[1], TypeCheck::for_param(2, &Param::value(Scalar::Float)));

        let full = signature_checks(&binding, 3);
        assert_eq!(full[2].accepts, &[DynamicKind::Boolean]);
    }
}
