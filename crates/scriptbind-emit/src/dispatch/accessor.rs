//! Variable and constant accessors.
//!
//! A variable or constant is exported as a single binding whose return slot
//! is the type of the datum. Its dispatcher reads the datum, and for
//! variables also writes it when one more argument is supplied:
//!
//! | Kind | Read | Write |
//! |---|---|---|
//! | member variable | 1 (instance) | 2 (instance, value) |
//! | static/global variable | 0 | 1 (value) |
//! | member constant | 1 (instance) | none |
//! | static/global constant | 0 | none |

use scriptbind_core::{FunctionBinding, OverloadKind, ParamType, ValueKind};

use super::invoke::{emit_capture, emit_instance};
use super::{Emitter, Result, marshal, returns};
use crate::overload::accepted_arities;

/// Emit the body of a variable or constant accessor.
pub(super) fn emit_accessor(e: &mut Emitter<'_>, binding: &FunctionBinding) -> Result<()> {
    let member = matches!(
        binding.kind,
        OverloadKind::MemberVariable | OverloadKind::MemberConstant
    );
    let arities = accepted_arities(binding);
    let (read_arity, write_arity) = (*arities.start(), *arities.end());
    let writable = write_arity > read_arity;
    e.arity_guard(read_arity, write_arity);

    let target = if member {
        emit_instance(e, &binding.class_owner);
        format!("instance->{}", binding.exported_name)
    } else {
        binding.qualified_name()
    };

    if !writable {
        emit_capture(e, &binding.return_slot, &target)?;
        return returns::emit_return(e, binding);
    }

    e.out
        .line(format!("if (lua_gettop(state) == {write_arity})"));
    e.out.open();
    emit_store(e, binding, &target, write_arity);
    e.out.line("return 0;");
    e.out.close();
    e.out.line("else");
    e.out.open();
    emit_capture(e, &binding.return_slot, &target)?;
    returns::emit_return(e, binding)?;
    e.out.close();
    Ok(())
}

/// Extract the new value from the top slot and store it into `target`.
fn emit_store(e: &mut Emitter<'_>, binding: &FunctionBinding, target: &str, index: usize) {
    let slot = &binding.return_slot;
    marshal::emit_get_param(e, slot, index, index);

    let line = match (&slot.ty, slot.array_extent()) {
        (ParamType::Scalar { scalar, .. }, Some(extent)) => format!(
            "memcpy({target}, param{index}, sizeof({}) * {extent});",
            scalar.spelling()
        ),
        (ParamType::Object { .. }, _) if slot.kind != ValueKind::Pointer => {
            format!("{target} = *param{index};")
        }
        _ => format!("{target} = param{index};"),
    };
    e.out.line(line);
}
