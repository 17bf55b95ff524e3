//! Invocation emission.
//!
//! Once a candidate has matched, its arguments are extracted, the host
//! operation is called in the form its overload kind requires, and the
//! result is captured for [`returns`](super::returns).

use scriptbind_core::{FunctionBinding, GenerateError, OverloadKind, Param, ParamType, ValueKind};

use super::{Emitter, Result, marshal, returns};

/// Emit the body of a matched candidate called with `arity` arguments.
pub(super) fn emit_invocation(
    e: &mut Emitter<'_>,
    binding: &FunctionBinding,
    arity: usize,
) -> Result<()> {
    let offset = usize::from(binding.takes_instance());
    let supplied = &binding.params[..arity - offset];

    for (i, param) in supplied.iter().enumerate() {
        marshal::emit_get_param(e, param, i + 1, i + 1 + offset);
    }

    if binding.is_destructor() {
        emit_release(e, binding);
        return returns::emit_return(e, binding);
    }

    let callee = match binding.kind {
        OverloadKind::MemberFunction => match &binding.return_slot.ty {
            ParamType::Constructor { name } => format!("new {}", e.identifier(name)),
            _ => {
                emit_instance(e, &binding.class_owner);
                format!("instance->{}", binding.exported_name)
            }
        },
        OverloadKind::StaticFunction | OverloadKind::GlobalFunction => binding.qualified_name(),
        kind => {
            return Err(GenerateError::invalid_return(
                e.symbol,
                format!("{kind} '{}' cannot be invoked", binding.exported_name),
            ));
        }
    };

    let args: Vec<String> = supplied
        .iter()
        .enumerate()
        .filter(|(_, param)| marshal::is_extracted(param))
        .map(|(i, param)| {
            let deref = matches!(param.ty, ParamType::Object { .. }) && param.kind != ValueKind::Pointer;
            format!("{}param{}", if deref { "*" } else { "" }, i + 1)
        })
        .collect();

    emit_capture(e, &binding.return_slot, &format!("{callee}({})", args.join(", ")))?;
    returns::emit_return(e, binding)
}

/// Emit `T* instance = getInstance(state);` for the owning class.
pub(super) fn emit_instance(e: &mut Emitter<'_>, class_owner: &str) {
    e.out.line(format!(
        "{class_owner}* instance = {}(state);",
        e.surface.instance_accessor
    ));
}

/// Capture the value of `expr` for the return slot `slot`.
///
/// Objects are captured as an untyped `returnPtr`: pointers as is, values
/// copied onto the heap, references by address. Everything else lands in a
/// typed `result`.
pub(super) fn emit_capture(e: &mut Emitter<'_>, slot: &Param, expr: &str) -> Result<()> {
    let line = match (&slot.ty, slot.kind) {
        (ParamType::Void, _) => format!("{expr};"),
        (ParamType::Constructor { .. }, _) | (ParamType::Object { .. }, ValueKind::Pointer) => {
            format!("void* returnPtr = (void*){expr};")
        }
        (ParamType::Object { name }, ValueKind::Value) => {
            format!("void* returnPtr = (void*)new {}({expr});", e.identifier(name))
        }
        (ParamType::Object { .. }, ValueKind::Reference) => {
            format!("void* returnPtr = (void*)&({expr});")
        }
        (ParamType::Destructor | ParamType::Varargs, _) => {
            return Err(GenerateError::invalid_return(
                e.symbol,
                "return slot cannot hold a value",
            ));
        }
        (
            ParamType::Scalar { .. }
            | ParamType::Enum { .. }
            | ParamType::String { .. }
            | ParamType::Unrecognized { .. },
            _,
        ) => format!("{} result = {expr};", e.host_type(slot)),
    };
    e.out.line(line);
    Ok(())
}

/// Release the collected instance if the script side owns it.
fn emit_release(e: &mut Emitter<'_>, binding: &FunctionBinding) {
    let class = &binding.class_owner;
    let unique = e.unique_name(class);
    let handle = e.surface.handle_type.clone();
    let release = if e.ctx.lifetime_policy(class).is_ref_counted() {
        e.surface.release_ref_counted.clone()
    } else {
        e.surface.release_owned.clone()
    };

    e.out.line(format!(
        "void* userdata = luaL_checkudata(state, 1, \"{unique}\");"
    ));
    e.out.line(format!(
        "luaL_argcheck(state, userdata != NULL, 1, \"'{unique}' expected.\");"
    ));
    e.out.line(format!("{handle}* object = ({handle}*)userdata;"));
    e.out.line("if (object->owns)");
    e.out.open();
    e.out
        .line(format!("{class}* instance = ({class}*)object->instance;"));
    e.out.line(format!("{release}(instance);"));
    e.out.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RuntimeSurface;
    use crate::writer::CodeWriter;
    use scriptbind_core::Scalar;
    use scriptbind_registry::{TypeEntry, TypeRegistryBuilder};

    fn invoke(binding: &FunctionBinding, arity: usize) -> String {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register(TypeEntry::new("Node").ref_counted())
            .register(TypeEntry::new("Vector3"))
            .register(TypeEntry::new("Physics::Listener").with_identifier("gameplay::Physics::Listener"));
        let ctx = builder.build().unwrap();
        let surface = RuntimeSurface::default();
        let mut out = CodeWriter::new();
        let mut e = Emitter {
            out: &mut out,
            ctx: &ctx,
            surface: &surface,
            symbol: "lua_test",
        };
        emit_invocation(&mut e, binding, arity).unwrap();
        out.finish()
    }

    #[test]
    fn member_call_fetches_instance_after_arguments() {
        let binding = FunctionBinding::new("Node", "Node", "setTranslation", OverloadKind::MemberFunction)
            .with_params([Param::object("Vector3", ValueKind::Reference)]);
        let code = invoke(&binding, 2);
        let param = code.find("Vector3* param1").unwrap();
        let instance = code.find("Node* instance = getInstance(state);").unwrap();
        assert!(param < instance);
        assert!(code.contains("instance->setTranslation(*param1);\n"));
        assert!(code.ends_with("\nreturn 0;\n"));
    }

    #[test]
    fn defaulted_parameters_are_omitted() {
        let binding = FunctionBinding::new("", "Global", "clamp", OverloadKind::GlobalFunction)
            .with_params([
                Param::value(Scalar::Float),
                Param::value(Scalar::Float).with_default(),
            ])
            .returning(Param::value(Scalar::Float));
        let code = invoke(&binding, 1);
        assert!(code.contains("float result = clamp(param1);"));
        assert!(!code.contains("param2"));
    }

    #[test]
    fn static_calls_are_qualified() {
        let binding = FunctionBinding::new("Vector3", "Vector3", "zero", OverloadKind::StaticFunction)
            .returning(Param::object("Vector3", ValueKind::Reference));
        let code = invoke(&binding, 0);
        assert!(code.starts_with("void* returnPtr = (void*)&(Vector3::zero());\n"));
    }

    #[test]
    fn by_value_objects_are_copied() {
        let binding = FunctionBinding::new("Node", "Node", "getScale", OverloadKind::MemberFunction)
            .returning(Param::object("Vector3", ValueKind::Value));
        let code = invoke(&binding, 1);
        assert!(code.contains("void* returnPtr = (void*)new Vector3(instance->getScale());"));
        assert!(code.contains("object->owns = true;"));
    }

    #[test]
    fn constructors_allocate() {
        let binding = FunctionBinding::new("Physics::Listener", "PhysicsListener", "Listener", OverloadKind::MemberFunction)
            .with_params([Param::value(Scalar::Int)])
            .returning(Param::constructor("Physics::Listener"));
        let code = invoke(&binding, 1);
        assert!(code.contains("// Get parameter 1 off the stack.\nint param1 = (int)luaL_checkint(state, 1);"));
        assert!(!code.contains("getInstance"));
        assert!(code.contains("void* returnPtr = (void*)new gameplay::Physics::Listener(param1);"));
        assert!(code.contains("luaL_getmetatable(state, \"PhysicsListener\");"));
    }

    #[test]
    fn destructor_releases_owned_instances() {
        let binding = FunctionBinding::new("Node", "Node", "~Node", OverloadKind::MemberFunction)
            .returning(Param::destructor());
        let code = invoke(&binding, 1);
        assert_eq!(
            code,
            "void* userdata = luaL_checkudata(state, 1, \"Node\");\n\
             luaL_argcheck(state, userdata != NULL, 1, \"'Node' expected.\");\n\
             ScriptController::LuaObject* object = (ScriptController::LuaObject*)userdata;\n\
             if (object->owns)\n\
             {\n    Node* instance = (Node*)object->instance;\n    SAFE_RELEASE(instance);\n}\n\
             \n\
             return 0;\n"
        );
    }

    #[test]
    fn destructor_deletes_plain_instances() {
        let binding = FunctionBinding::new("Vector3", "Vector3", "~Vector3", OverloadKind::MemberFunction)
            .returning(Param::destructor());
        let code = invoke(&binding, 1);
        assert!(code.contains("SAFE_DELETE(instance);"));
        assert_eq!(code.matches("SAFE_").count(), 1);
    }
}
