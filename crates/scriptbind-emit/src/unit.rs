//! Binding groups and class translation units.
//!
//! The front end hands over a flat list of bindings. [`group_by_symbol`]
//! partitions it into binding groups, one per dispatcher, and
//! [`Generator::write_class_unit`] emits every dispatcher of one class behind
//! the shared instance accessor. [`Generator::write_units`] does the same for
//! every class of a mixed list.

use rustc_hash::FxHashMap;
use scriptbind_core::{FunctionBinding, GenerateError, OverloadKind};

use crate::dispatch::Generator;
use crate::writer::CodeWriter;

/// All bindings sharing one dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingGroup {
    /// Name of the dispatcher.
    pub symbol: String,
    /// Bindings in declaration order.
    pub bindings: Vec<FunctionBinding>,
}

impl BindingGroup {
    /// Check if any binding of the group reads the implicit instance.
    pub fn needs_instance(&self) -> bool {
        self.bindings.iter().any(|b| {
            (b.takes_instance() && !b.is_destructor())
                || matches!(
                    b.kind,
                    OverloadKind::MemberVariable | OverloadKind::MemberConstant
                )
        })
    }
}

/// Partition bindings into groups keyed by dispatcher name.
///
/// Groups keep the order in which their symbols first appear, and bindings
/// keep declaration order within a group. A binding whose signature matches
/// one already in its group is dropped.
pub fn group_by_symbol(bindings: &[FunctionBinding], prefix: &str) -> Vec<BindingGroup> {
    let mut groups: Vec<BindingGroup> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for binding in bindings {
        let symbol = binding.function_name(prefix);
        let slot = *index.entry(symbol.clone()).or_insert_with(|| {
            groups.push(BindingGroup {
                symbol: symbol.clone(),
                bindings: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        if group.bindings.iter().any(|b| b.signature_matches(binding)) {
            log::debug!("{symbol}: dropping duplicate declaration");
            continue;
        }
        group.bindings.push(binding.clone());
    }

    groups
}

/// Generated text of one class, or of the free functions when
/// `class_owner` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    /// Owning class of every dispatcher in the unit.
    pub class_owner: String,
    /// Emitted translation unit body.
    pub code: String,
}

/// Split bindings by owning class, in order of first appearance.
fn partition_by_class(bindings: &[FunctionBinding]) -> Vec<(&str, Vec<FunctionBinding>)> {
    let mut classes: Vec<(&str, Vec<FunctionBinding>)> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for binding in bindings {
        let slot = *index.entry(binding.class_owner.as_str()).or_insert_with(|| {
            classes.push((binding.class_owner.as_str(), Vec::new()));
            classes.len() - 1
        });
        classes[slot].1.push(binding.clone());
    }
    classes
}

fn needs_instance_accessor(class_owner: &str, groups: &[BindingGroup]) -> bool {
    !class_owner.is_empty() && groups.iter().any(BindingGroup::needs_instance)
}

impl Generator<'_> {
    /// Emit every dispatcher of a binding list as one translation unit.
    ///
    /// Dispatchers are emitted class by class, each class behind its instance
    /// accessor. Since the accessor has one name per unit, at most one class
    /// in `bindings` may need it; split larger inputs with
    /// [`write_units`](Self::write_units).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn write_all(&self, bindings: &[FunctionBinding]) -> Result<String, GenerateError> {
        let prefix = &self.options().surface.function_prefix;
        let classes = partition_by_class(bindings);

        let mut accessor_owner: Option<&str> = None;
        for (class_owner, owned) in &classes {
            if !needs_instance_accessor(class_owner, &group_by_symbol(owned, prefix)) {
                continue;
            }
            if let Some(first) = accessor_owner {
                return Err(GenerateError::SharedInstanceAccessor {
                    first: first.to_string(),
                    second: class_owner.to_string(),
                });
            }
            accessor_owner = Some(*class_owner);
        }

        let mut out = CodeWriter::with_indent_width(self.options().indent_width);
        for (class_owner, owned) in &classes {
            self.write_unit(&mut out, class_owner, owned)?;
        }
        Ok(out.finish())
    }

    /// Emit one translation unit per owning class, in order of first appearance.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn write_units(&self, bindings: &[FunctionBinding]) -> Result<Vec<ClassUnit>, GenerateError> {
        partition_by_class(bindings)
            .into_iter()
            .map(|(class_owner, owned)| {
                let mut out = CodeWriter::with_indent_width(self.options().indent_width);
                self.write_unit(&mut out, class_owner, &owned)?;
                Ok(ClassUnit {
                    class_owner: class_owner.to_string(),
                    code: out.finish(),
                })
            })
            .collect()
    }

    /// Emit the translation unit body of one class.
    ///
    /// Only bindings owned by `class_owner` are emitted. The static instance
    /// accessor comes first, when any of them needs it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn write_class_unit(
        &self,
        class_owner: &str,
        bindings: &[FunctionBinding],
    ) -> Result<String, GenerateError> {
        let owned: Vec<FunctionBinding> = bindings
            .iter()
            .filter(|b| b.class_owner == class_owner)
            .cloned()
            .collect();
        let mut out = CodeWriter::with_indent_width(self.options().indent_width);
        self.write_unit(&mut out, class_owner, &owned)?;
        Ok(out.finish())
    }

    fn write_unit(
        &self,
        out: &mut CodeWriter,
        class_owner: &str,
        owned: &[FunctionBinding],
    ) -> Result<(), GenerateError> {
        let groups = group_by_symbol(owned, &self.options().surface.function_prefix);
        log::debug!("{class_owner}: {} dispatcher(s)", groups.len());

        if needs_instance_accessor(class_owner, &groups) {
            self.write_instance_accessor(out, class_owner);
        }
        for group in &groups {
            self.write_to(out, &group.bindings)?;
        }
        Ok(())
    }

    fn write_instance_accessor(&self, out: &mut CodeWriter, class_owner: &str) {
        let surface = &self.options().surface;
        let unique = self.context().resolve_unique_name(class_owner);
        let handle = &surface.handle_type;

        out.line(format!(
            "static {class_owner}* {}({}* state)",
            surface.instance_accessor, surface.state_type
        ));
        out.open();
        out.line(format!(
            "void* userdata = luaL_checkudata(state, 1, \"{unique}\");"
        ));
        out.line(format!(
            "luaL_argcheck(state, userdata != NULL, 1, \"'{unique}' expected.\");"
        ));
        out.line(format!(
            "return ({class_owner}*)(({handle}*)userdata)->instance;"
        ));
        out.close();
        out.blank();
    }
}
