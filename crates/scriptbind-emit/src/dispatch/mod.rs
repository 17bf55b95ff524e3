//! Dispatcher generation.
//!
//! The [`Generator`] turns one binding group into one dispatcher:
//!
//! ```text
//! int lua_Node_setScale(lua_State* state)
//! {
//!     // Get the number of parameters.
//!     int paramCount = lua_gettop(state);
//!     ...
//! }
//! ```
//!
//! Single-binding variable and constant groups get a plain accessor body
//! ([`accessor`]). A lone function overload with a single arity gets a direct
//! body. Everything else goes through the arity switch, one case per bucket of
//! the [`ArityTable`], each case trying its candidates in declaration order.
//!
//! Submodules emit the pieces of an invocation:
//! - [`marshal`]: extracting arguments off the call stack
//! - [`invoke`]: calling the host and capturing the result
//! - [`returns`]: pushing the result back

mod accessor;
mod invoke;
mod marshal;
mod returns;

use scriptbind_core::{BindingContext, FunctionBinding, GenerateError, OverloadKind, Param, ParamType};

use crate::checks::signature_checks;
use crate::host_type::host_type;
use crate::options::{EmitOptions, RuntimeSurface};
use crate::overload::{ArityTable, format_arities};
use crate::writer::CodeWriter;

type Result<T> = std::result::Result<T, GenerateError>;

const SIGNATURE_MISMATCH: &str =
    "Failed to match the given parameters to a valid function signature.";

/// Emits dispatchers for binding groups.
///
/// The generator borrows the type-name context for its whole lifetime and
/// never mutates it.
pub struct Generator<'ctx> {
    ctx: &'ctx dyn BindingContext,
    options: EmitOptions,
}

impl<'ctx> Generator<'ctx> {
    /// Create a generator with default options.
    pub fn new(ctx: &'ctx dyn BindingContext) -> Self {
        Self {
            ctx,
            options: EmitOptions::default(),
        }
    }

    /// Replace the emission options.
    pub fn with_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    /// Current emission options.
    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// The type-name context.
    pub fn context(&self) -> &'ctx dyn BindingContext {
        self.ctx
    }

    /// Emit the dispatcher for one binding group.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn write(&self, bindings: &[FunctionBinding]) -> Result<String> {
        let mut out = CodeWriter::with_indent_width(self.options.indent_width);
        self.write_to(&mut out, bindings)?;
        Ok(out.finish())
    }

    /// Emit the dispatcher for one binding group into an existing writer.
    pub fn write_to(&self, out: &mut CodeWriter, bindings: &[FunctionBinding]) -> Result<()> {
        let surface = &self.options.surface;
        let symbol = validate_group(bindings, &surface.function_prefix)?;
        log::debug!("emitting {symbol} from {} binding(s)", bindings.len());

        let mut e = Emitter {
            out,
            ctx: self.ctx,
            surface,
            symbol: &symbol,
        };

        e.out
            .line(format!("int {symbol}({}* state)", surface.state_type));
        e.out.open();

        match bindings {
            [single] if !single.kind.is_function() => accessor::emit_accessor(&mut e, single)?,
            [single]
                if self.options.direct_single_overload
                    && single.arity_range().start() == single.arity_range().end() =>
            {
                emit_direct(&mut e, single)?;
            }
            _ => emit_switch(&mut e, &ArityTable::build(bindings))?,
        }

        e.out.close();
        e.out.blank();
        Ok(())
    }
}

/// Check that a group can be emitted and return its dispatcher name.
pub fn validate_group(
    bindings: &[FunctionBinding],
    prefix: &str,
) -> std::result::Result<String, GenerateError> {
    let Some(first) = bindings.first() else {
        return Err(GenerateError::EmptyGroup);
    };
    let symbol = first.function_name(prefix);

    if let Some(other) = bindings
        .iter()
        .find(|b| b.exported_name != first.exported_name || b.kind != first.kind)
    {
        return Err(GenerateError::MixedGroup {
            symbol,
            expected: format!("{} ({})", first.exported_name, first.kind),
            found: format!("{} ({})", other.exported_name, other.kind),
        });
    }

    if !first.kind.is_function() && bindings.len() > 1 {
        return Err(GenerateError::OverloadedAccessor {
            symbol,
            kind: first.kind,
            count: bindings.len(),
        });
    }

    for binding in bindings {
        let slot = &binding.return_slot.ty;
        if slot.is_special_return() && binding.kind != OverloadKind::MemberFunction {
            return Err(GenerateError::MisplacedSpecialReturn {
                symbol,
                kind: binding.kind,
            });
        }
        match slot {
            ParamType::Varargs => {
                return Err(GenerateError::invalid_return(
                    symbol,
                    "varargs cannot be returned",
                ));
            }
            ParamType::Void if !binding.kind.is_function() => {
                return Err(GenerateError::invalid_return(
                    symbol,
                    format!("{} '{}' has no type", binding.kind, binding.exported_name),
                ));
            }
            _ => {}
        }
    }

    Ok(symbol)
}

/// Shared state of one dispatcher emission.
pub(crate) struct Emitter<'a> {
    out: &'a mut CodeWriter,
    ctx: &'a dyn BindingContext,
    surface: &'a RuntimeSurface,
    symbol: &'a str,
}

impl Emitter<'_> {
    fn host_type(&self, param: &Param) -> String {
        host_type(param, self.ctx)
    }

    fn identifier(&self, name: &str) -> String {
        self.ctx.resolve_identifier(name)
    }

    fn unique_name(&self, name: &str) -> String {
        self.ctx.resolve_unique_name(name)
    }

    /// Raise a runtime error with a fixed message.
    fn raise(&mut self, message: &str) {
        self.out
            .line(format!("lua_pushstring(state, \"{message}\");"));
        self.out.line("lua_error(state);");
    }

    /// Reject calls whose argument count lies outside `lo..=hi`.
    fn arity_guard(&mut self, lo: usize, hi: usize) {
        let condition = if lo == 0 {
            format!("lua_gettop(state) > {hi}")
        } else if lo == hi {
            format!("lua_gettop(state) != {lo}")
        } else {
            format!("lua_gettop(state) < {lo} || lua_gettop(state) > {hi}")
        };
        let expected: Vec<usize> = (lo..=hi).collect();

        self.out.line("// Validate the number of parameters.");
        self.out.line(format!("if ({condition})"));
        self.out.open();
        self.raise(&format!(
            "Invalid number of parameters (expected {}).",
            format_arities(&expected)
        ));
        self.out.close();
        self.out.blank();
    }

    /// Open a branch guarded by the type checks of `binding` at `arity`.
    fn open_guard(&mut self, binding: &FunctionBinding, arity: usize, keyword: &str) {
        let checks = signature_checks(binding, arity);
        let last = checks.len().saturating_sub(1);
        for (i, check) in checks.iter().enumerate() {
            let tail = if i == last { ")" } else { " &&" };
            if i == 0 {
                self.out.line(format!("{keyword} ({check}{tail}"));
                self.out.indent();
            } else {
                self.out.line(format!("{check}{tail}"));
            }
        }
        self.out.dedent();
        self.out.open();
    }
}

fn emit_switch(e: &mut Emitter<'_>, table: &ArityTable<'_>) -> Result<()> {
    e.out.line("// Get the number of parameters.");
    e.out.line("int paramCount = lua_gettop(state);");
    e.out.blank();
    e.out
        .line("// Attempt to match the parameters to a valid binding.");
    e.out.line("switch (paramCount)");
    e.out.open();

    for (arity, candidates) in table.buckets() {
        e.out.line(format!("case {arity}:"));
        e.out.open();

        if arity == 0 {
            if let [first, rest @ ..] = candidates {
                for unreachable in rest {
                    log::warn!(
                        "{}: {} overload with {} parameter(s) is unreachable without arguments",
                        e.symbol,
                        unreachable.exported_name,
                        unreachable.params.len()
                    );
                }
                invoke::emit_invocation(e, first, 0)?;
            }
        } else {
            for (i, candidate) in candidates.iter().enumerate() {
                let keyword = if i == 0 { "if" } else { "else if" };
                e.open_guard(candidate, arity, keyword);
                invoke::emit_invocation(e, candidate, arity)?;
                e.out.close();
            }
            e.out.line("else");
            e.out.open();
            e.raise(SIGNATURE_MISMATCH);
            e.out.close();
        }

        e.out.line("break;");
        e.out.close();
    }

    e.out.line("default:");
    e.out.open();
    e.raise(&format!(
        "Invalid number of parameters (expected {}).",
        table.expected()
    ));
    e.out.line("break;");
    e.out.close();

    e.out.close();
    e.out.line("return 0;");
    Ok(())
}

fn emit_direct(e: &mut Emitter<'_>, binding: &FunctionBinding) -> Result<()> {
    let arity = *binding.arity_range().start();
    e.arity_guard(arity, arity);

    if arity == 0 {
        return invoke::emit_invocation(e, binding, 0);
    }

    e.open_guard(binding, arity, "if");
    invoke::emit_invocation(e, binding, arity)?;
    e.out.close();
    e.out.blank();
    e.raise(SIGNATURE_MISMATCH);
    e.out.line("return 0;");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptbind_core::{Scalar, ValueKind};
    use scriptbind_registry::{TypeEntry, TypeRegistry, TypeRegistryBuilder};

    fn registry() -> TypeRegistry {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register(TypeEntry::new("Node").ref_counted())
            .register(TypeEntry::new("Vector3"))
            .register(TypeEntry::new("Physics::Listener"));
        builder.build().unwrap()
    }

    fn global(name: &str, params: impl IntoIterator<Item = Param>) -> FunctionBinding {
        FunctionBinding::new("", "Global", name, OverloadKind::GlobalFunction).with_params(params)
    }

    #[test]
    fn empty_group_is_rejected() {
        let ctx = registry();
        assert_eq!(Generator::new(&ctx).write(&[]), Err(GenerateError::EmptyGroup));
    }

    #[test]
    fn mixed_group_is_rejected() {
        let ctx = registry();
        let err = Generator::new(&ctx)
            .write(&[global("foo", []), global("bar", [])])
            .unwrap_err();
        assert!(matches!(err, GenerateError::MixedGroup { ref symbol, .. } if symbol == "lua_Global_foo"));
    }

    #[test]
    fn overloaded_accessor_is_rejected() {
        let ctx = registry();
        let x = FunctionBinding::new("Node", "Node", "x", OverloadKind::MemberVariable)
            .returning(Param::value(Scalar::Float));
        let err = Generator::new(&ctx).write(&[x.clone(), x]).unwrap_err();
        assert_eq!(
            err,
            GenerateError::OverloadedAccessor {
                symbol: "lua_Node_x".into(),
                kind: OverloadKind::MemberVariable,
                count: 2,
            }
        );
    }

    #[test]
    fn misplaced_constructor_is_rejected() {
        let ctx = registry();
        let ctor = FunctionBinding::new("Node", "Node", "create", OverloadKind::StaticFunction)
            .returning(Param::constructor("Node"));
        assert!(matches!(
            Generator::new(&ctx).write(&[ctor]),
            Err(GenerateError::MisplacedSpecialReturn { .. })
        ));
    }

    #[test]
    fn varargs_return_is_rejected() {
        let ctx = registry();
        let f = global("log", []).returning(Param::new(ParamType::Varargs, ValueKind::Value));
        assert!(matches!(
            Generator::new(&ctx).write(&[f]),
            Err(GenerateError::InvalidReturn { .. })
        ));
    }

    #[test]
    fn switch_lists_every_arity() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .write(&[
                global("foo", [Param::value(Scalar::Int)]),
                global("foo", [Param::value(Scalar::Int), Param::value(Scalar::Int)]),
            ])
            .unwrap();

        assert!(code.starts_with("int lua_Global_foo(lua_State* state)\n{\n"));
        assert!(code.contains("        case 1:\n"));
        assert!(code.contains("        case 2:\n"));
        assert!(!code.contains("case 3:"));
        assert!(code.contains("\"Invalid number of parameters (expected 1 or 2).\""));
        assert!(code.ends_with("    return 0;\n}\n\n"));
    }

    #[test]
    fn guard_conditions_wrap_one_check_per_line() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .write(&[
                global("lerp", [Param::value(Scalar::Float), Param::value(Scalar::Float)]),
                global("lerp", [Param::object("Vector3", ValueKind::Reference)]),
            ])
            .unwrap();
        let expected = "            if (lua_type(state, 1) == LUA_TNUMBER &&\n                lua_type(state, 2) == LUA_TNUMBER)\n            {\n";
        assert!(code.contains(expected), "{code}");
    }

    #[test]
    fn later_candidates_use_else_if() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .write(&[
                global("scale", [Param::value(Scalar::Int)]),
                global("scale", [Param::literal_string()]),
            ])
            .unwrap();
        let first = code.find("if (lua_type(state, 1) == LUA_TNUMBER)").unwrap();
        let second = code
            .find("else if ((lua_type(state, 1) == LUA_TSTRING || lua_type(state, 1) == LUA_TNIL))")
            .unwrap();
        let fallback = code.find(SIGNATURE_MISMATCH).unwrap();
        assert!(first < second && second < fallback);
    }

    #[test]
    fn single_overload_gets_direct_body() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .write(&[global("lerp", [Param::value(Scalar::Float), Param::value(Scalar::Float)])])
            .unwrap();
        assert!(!code.contains("switch"));
        assert!(code.contains("    if (lua_gettop(state) != 2)\n"));
        assert!(code.contains("        float result = lerp(param1, param2);\n"));
        assert!(code.ends_with(&format!(
            "    lua_pushstring(state, \"{SIGNATURE_MISMATCH}\");\n    lua_error(state);\n    return 0;\n}}\n\n"
        )));
    }

    #[test]
    fn always_switch_disables_direct_body() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .with_options(EmitOptions::new().always_switch())
            .write(&[global("lerp", [Param::value(Scalar::Float)])])
            .unwrap();
        assert!(code.contains("switch (paramCount)"));
        assert!(code.contains("(expected 1)"));
    }

    #[test]
    fn zero_arity_invokes_first_candidate() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .write(&[
                global("reset", []),
                global("reset", [Param::value(Scalar::Int).with_default()]),
            ])
            .unwrap();
        assert_eq!(code.matches("reset();").count(), 1);
        assert!(code.contains("            reset();\n"));
        assert!(code.contains("int param1 = (int)luaL_checkint(state, 1);"));
    }

    #[test]
    fn custom_prefix_and_indent() {
        let ctx = registry();
        let code = Generator::new(&ctx)
            .with_options(EmitOptions::new().with_function_prefix("bind_").with_indent_width(2))
            .write(&[global("quit", [])])
            .unwrap();
        assert!(code.starts_with("int bind_Global_quit(lua_State* state)\n{\n  // Validate"));
    }
}
