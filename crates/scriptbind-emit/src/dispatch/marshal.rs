//! Argument marshaling.
//!
//! Each supplied argument is pulled off the call stack into a local named
//! `paramN`, coerced to the host type of its parameter.

use scriptbind_core::{Param, ParamType, Scalar, StringRepr, ValueKind};

use super::Emitter;

/// Emit the extraction of parameter `number` (one-based) from `stack_index`.
pub(super) fn emit_get_param(e: &mut Emitter<'_>, param: &Param, number: usize, stack_index: usize) {
    e.out
        .line(format!("// Get parameter {number} off the stack."));

    let name = format!("param{number}");
    let controller = &e.surface.controller;
    match &param.ty {
        ParamType::Scalar { scalar, .. } => {
            let value = if param.kind == ValueKind::Pointer {
                format!("{controller}->get{}Pointer({stack_index})", pointer_accessor(*scalar))
            } else {
                scalar_coercion(*scalar, stack_index)
            };
            let ty = e.host_type(param);
            e.out.line(format!("{ty} {name} = {value};"));
        }
        ParamType::String { repr } => {
            let owned = matches!(repr, StringRepr::Owned);
            let ty = e.host_type(param);
            e.out.line(format!(
                "{ty} {name} = {controller}->getString({stack_index}, {owned});"
            ));
        }
        ParamType::Enum { name: enum_name } => {
            let ty = e.host_type(param);
            let converter = format!("{}{}", e.surface.enum_from_string, e.unique_name(enum_name));
            e.out.line(format!(
                "{ty} {name} = ({ty}){converter}(luaL_checkstring(state, {stack_index}));"
            ));
        }
        ParamType::Object { name: type_name } => {
            let ident = e.identifier(type_name);
            let unique = e.unique_name(type_name);
            let deref = param.kind != ValueKind::Pointer;
            e.out.line(format!(
                "{ident}* {name} = {controller}->getObjectPointer<{ident}>({stack_index}, \"{unique}\", {deref});"
            ));
        }
        ParamType::Unrecognized { spelling } => {
            log::warn!(
                "{}: parameter {number} has unrecognized type '{spelling}', reading it as an unsigned integer",
                e.symbol
            );
            let ty = e.host_type(param);
            e.out.line(format!(
                "{}(\"Attempting to get parameter {number} with unrecognized type {spelling} as an unsigned integer.\");",
                e.surface.warn_macro
            ));
            e.out.line(format!(
                "{ty} {name} = ({ty})luaL_checkunsigned(state, {stack_index});"
            ));
        }
        ParamType::Void | ParamType::Constructor { .. } | ParamType::Destructor | ParamType::Varargs => {}
    }

    e.out.blank();
}

/// Check if a parameter produces a `paramN` local to pass on.
pub(super) fn is_extracted(param: &Param) -> bool {
    !matches!(
        param.ty,
        ParamType::Void | ParamType::Constructor { .. } | ParamType::Destructor | ParamType::Varargs
    )
}

fn scalar_coercion(scalar: Scalar, stack_index: usize) -> String {
    let check = match scalar {
        Scalar::Bool => return format!("(luaL_checkint(state, {stack_index}) != 0)"),
        Scalar::Char | Scalar::Short | Scalar::Int => "luaL_checkint",
        Scalar::Long => "luaL_checklong",
        Scalar::UChar | Scalar::UShort | Scalar::UInt | Scalar::ULong => "luaL_checkunsigned",
        Scalar::Float | Scalar::Double => "luaL_checknumber",
    };
    format!("({}){check}(state, {stack_index})", scalar.spelling())
}

fn pointer_accessor(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Bool => "Bool",
        Scalar::Char => "Char",
        Scalar::Short => "Short",
        Scalar::Int => "Int",
        Scalar::Long => "Long",
        Scalar::UChar => "UnsignedChar",
        Scalar::UShort => "UnsignedShort",
        Scalar::UInt => "UnsignedInt",
        Scalar::ULong => "UnsignedLong",
        Scalar::Float => "Float",
        Scalar::Double => "Double",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RuntimeSurface;
    use crate::writer::CodeWriter;
    use scriptbind_registry::{TypeEntry, TypeRegistryBuilder};

    fn extract(param: &Param, number: usize, stack_index: usize) -> String {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register(TypeEntry::new("Vector3").with_identifier("gameplay::Vector3"))
            .register(TypeEntry::new("Mesh::PrimitiveType").with_unique_name("MeshPrimitiveType"));
        let ctx = builder.build().unwrap();
        let surface = RuntimeSurface::default();
        let mut out = CodeWriter::new();
        let mut e = Emitter {
            out: &mut out,
            ctx: &ctx,
            surface: &surface,
            symbol: "lua_test",
        };
        emit_get_param(&mut e, param, number, stack_index);
        out.finish()
    }

    #[test]
    fn numeric_values() {
        assert_eq!(
            extract(&Param::value(Scalar::Float), 1, 2),
            "// Get parameter 1 off the stack.\nfloat param1 = (float)luaL_checknumber(state, 2);\n\n"
        );
        assert!(extract(&Param::value(Scalar::UShort), 2, 2)
            .contains("unsigned short param2 = (unsigned short)luaL_checkunsigned(state, 2);"));
        assert!(extract(&Param::value(Scalar::Long), 1, 1)
            .contains("long param1 = (long)luaL_checklong(state, 1);"));
        assert!(extract(&Param::value(Scalar::Bool), 1, 1)
            .contains("bool param1 = (luaL_checkint(state, 1) != 0);"));
    }

    #[test]
    fn numeric_arrays() {
        assert!(extract(&Param::array(Scalar::Float, "16"), 1, 2).contains(
            "float* param1 = ScriptController::getInstance()->getFloatPointer(2);"
        ));
        assert!(extract(&Param::array(Scalar::UInt, ""), 3, 3).contains(
            "unsigned int* param3 = ScriptController::getInstance()->getUnsignedIntPointer(3);"
        ));
    }

    #[test]
    fn strings_and_enums() {
        assert!(extract(&Param::literal_string(), 1, 1)
            .contains("const char* param1 = ScriptController::getInstance()->getString(1, false);"));
        assert!(extract(&Param::owned_string(), 1, 1)
            .contains("std::string param1 = ScriptController::getInstance()->getString(1, true);"));
        assert!(extract(&Param::enumeration("Mesh::PrimitiveType"), 2, 3).contains(
            "Mesh::PrimitiveType param2 = (Mesh::PrimitiveType)lua_enumFromString_MeshPrimitiveType(luaL_checkstring(state, 3));"
        ));
    }

    #[test]
    fn objects_dereference_unless_pointer() {
        assert!(extract(&Param::object("Vector3", ValueKind::Reference), 1, 2).contains(
            "gameplay::Vector3* param1 = ScriptController::getInstance()->getObjectPointer<gameplay::Vector3>(2, \"Vector3\", true);"
        ));
        assert!(extract(&Param::object("Vector3", ValueKind::Pointer), 1, 2).contains(
            "getObjectPointer<gameplay::Vector3>(2, \"Vector3\", false);"
        ));
    }

    #[test]
    fn unrecognized_types_warn() {
        let param = Param::new(
            ParamType::Unrecognized {
                spelling: "GLuint".into(),
            },
            ValueKind::Value,
        );
        let code = extract(&param, 1, 1);
        assert!(code.contains(
            "GP_WARN(\"Attempting to get parameter 1 with unrecognized type GLuint as an unsigned integer.\");"
        ));
        assert!(code.contains("GLuint param1 = (GLuint)luaL_checkunsigned(state, 1);"));
    }

    #[test]
    fn special_types_extract_nothing() {
        assert_eq!(
            extract(&Param::new(ParamType::Varargs, ValueKind::Value), 1, 1),
            "// Get parameter 1 off the stack.\n\n"
        );
        assert!(!is_extracted(&Param::new(ParamType::Varargs, ValueKind::Value)));
        assert!(is_extracted(&Param::owned_string()));
    }
}
