//! Return marshaling.

use scriptbind_core::{FunctionBinding, GenerateError, ParamType, Scalar, StringRepr, ValueKind};

use super::{Emitter, Result};

/// Push the captured result of `binding` and return the pushed count.
pub(super) fn emit_return(e: &mut Emitter<'_>, binding: &FunctionBinding) -> Result<()> {
    let slot = &binding.return_slot;
    match &slot.ty {
        ParamType::Void | ParamType::Destructor => {
            e.out.blank();
            e.out.line("return 0;");
            return Ok(());
        }
        ParamType::Varargs => {
            return Err(GenerateError::invalid_return(
                e.symbol,
                "varargs cannot be returned",
            ));
        }
        ParamType::Object { name } | ParamType::Constructor { name } => {
            let by_value = matches!(slot.ty, ParamType::Object { .. }) && slot.kind == ValueKind::Value;
            emit_handle(e, name, binding.owns_returned_object || by_value);
        }
        ParamType::Scalar { .. } | ParamType::Unrecognized { .. } if slot.kind == ValueKind::Pointer => {
            e.out.blank();
            e.out.line("// Push the return value onto the stack.");
            e.out.line("lua_pushlightuserdata(state, result);");
        }
        ParamType::Scalar { scalar, .. } => {
            e.out.blank();
            e.out.line("// Push the return value onto the stack.");
            e.out
                .line(format!("{}(state, result);", push_function(*scalar)));
        }
        ParamType::Unrecognized { .. } => {
            e.out.blank();
            e.out.line("// Push the return value onto the stack.");
            e.out.line("lua_pushunsigned(state, result);");
        }
        ParamType::Enum { name } => {
            let converter = format!("{}{}", e.surface.enum_to_string, e.unique_name(name));
            e.out.blank();
            e.out.line("// Push the return value onto the stack.");
            e.out
                .line(format!("lua_pushstring(state, {converter}(result).c_str());"));
        }
        ParamType::String { repr } => {
            e.out.blank();
            e.out.line("// Push the return value onto the stack.");
            match repr {
                StringRepr::Owned => e.out.line("lua_pushstring(state, result.c_str());"),
                StringRepr::Literal => e.out.line("lua_pushstring(state, result);"),
            }
        }
    }

    e.out.blank();
    e.out.line("return 1;");
    Ok(())
}

/// Wrap `returnPtr` in a handle tagged with the metatable of `type_name`.
fn emit_handle(e: &mut Emitter<'_>, type_name: &str, owns: bool) {
    let handle = e.surface.handle_type.clone();
    let unique = e.unique_name(type_name);

    e.out.line("if (returnPtr)");
    e.out.open();
    e.out.line(format!(
        "{handle}* object = ({handle}*)lua_newuserdata(state, sizeof({handle}));"
    ));
    e.out.line("object->instance = returnPtr;");
    e.out.line(format!("object->owns = {owns};"));
    e.out
        .line(format!("luaL_getmetatable(state, \"{unique}\");"));
    e.out.line("lua_setmetatable(state, -2);");
    e.out.close();
    e.out.line("else");
    e.out.open();
    e.out.line("lua_pushnil(state);");
    e.out.close();
}

fn push_function(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Bool => "lua_pushboolean",
        Scalar::Char | Scalar::Short | Scalar::Int | Scalar::Long => "lua_pushinteger",
        Scalar::UChar | Scalar::UShort | Scalar::UInt | Scalar::ULong => "lua_pushunsigned",
        Scalar::Float | Scalar::Double => "lua_pushnumber",
    }
}
