//! Host type spelling of descriptors.

use scriptbind_core::{BindingContext, Param, ParamType, StringRepr, ValueKind};

/// Spell the host type of a parameter or return slot.
///
/// Registered enums, objects and constructed classes are spelled with their
/// canonical identifier; pointer kinds gain a trailing `*`. Destructor and
/// varargs slots have no spelling of their own.
pub fn host_type(param: &Param, ctx: &dyn BindingContext) -> String {
    let mut spelling = base_type(&param.ty, ctx);
    if param.kind == ValueKind::Pointer {
        spelling.push('*');
    }
    spelling
}

/// Spell the host type of a parameter type, ignoring its value kind.
pub fn base_type(ty: &ParamType, ctx: &dyn BindingContext) -> String {
    match ty {
        ParamType::Void => "void".to_string(),
        ParamType::Scalar { scalar, .. } => scalar.spelling().to_string(),
        ParamType::Enum { name } | ParamType::Object { name } | ParamType::Constructor { name } => {
            ctx.resolve_identifier(name)
        }
        ParamType::String {
            repr: StringRepr::Owned,
        } => "std::string".to_string(),
        ParamType::String {
            repr: StringRepr::Literal,
        } => "const char".to_string(),
        ParamType::Unrecognized { spelling } => spelling.clone(),
        ParamType::Destructor | ParamType::Varargs => String::new(),
    }
}
