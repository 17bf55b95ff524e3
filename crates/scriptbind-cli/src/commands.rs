//! Command implementations.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use scriptbind_core::{BindingContext, FunctionBinding};
use scriptbind_emit::{
    ClassUnit, EmitOptions, Generator, format_arities, group_arities, group_by_symbol,
    validate_group,
};
use scriptbind_registry::{TypeEntry, TypeRegistry, TypeRegistryBuilder};

/// Contents of a descriptor file.
#[derive(Debug, Deserialize)]
pub struct Descriptors {
    /// Exported classes and enums.
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    /// Every exported binding, in declaration order.
    pub bindings: Vec<FunctionBinding>,
}

impl Descriptors {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("malformed descriptor file")
    }

    /// Seal the declared types into a registry.
    pub fn registry(&self) -> Result<TypeRegistry> {
        let mut builder = TypeRegistryBuilder::new();
        builder.register_all(self.types.iter().cloned());
        builder.build().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow!("invalid type declarations: {}", messages.join("; "))
        })
    }
}

fn load_descriptors(path: &Path) -> Result<Descriptors> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Descriptors::parse(&json).with_context(|| format!("in {}", path.display()))
}

fn load_options(path: Option<&Path>) -> Result<EmitOptions> {
    let Some(path) = path else {
        return Ok(EmitOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_options(&text).with_context(|| format!("in {}", path.display()))
}

pub fn parse_options(text: &str) -> Result<EmitOptions> {
    toml::from_str(text).context("malformed options")
}

/// Emit dispatchers for every binding, or for one class.
pub fn generate(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    class: Option<&str>,
) -> Result<()> {
    let descriptors = load_descriptors(input)?;
    let options = load_options(config)?;
    let registry = descriptors.registry()?;
    log::info!(
        "loaded {} type(s) and {} binding(s)",
        registry.len(),
        descriptors.bindings.len()
    );

    let generator = Generator::new(&registry).with_options(options);
    let code = match class {
        Some(class) => generator.write_class_unit(class, &descriptors.bindings),
        None => generator.write_all(&descriptors.bindings),
    }
    .context("generation failed")?;

    match output {
        Some(path) => fs::write(path, code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(code.as_bytes())
            .context("failed to write output")?,
    }
    Ok(())
}

/// Emit one file per class into `dir`.
pub fn generate_units(input: &Path, dir: &Path, config: Option<&Path>) -> Result<()> {
    let descriptors = load_descriptors(input)?;
    let options = load_options(config)?;
    let registry = descriptors.registry()?;

    let generator = Generator::new(&registry).with_options(options);
    let units = generator
        .write_units(&descriptors.bindings)
        .context("generation failed")?;

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for unit in &units {
        let path = dir.join(unit_file_name(&registry, generator.options(), unit));
        fs::write(&path, &unit.code)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// File name of a class unit, e.g. `lua_PhysicsController.cpp`.
fn unit_file_name(ctx: &dyn BindingContext, options: &EmitOptions, unit: &ClassUnit) -> String {
    let stem = if unit.class_owner.is_empty() {
        "Global".to_string()
    } else {
        ctx.resolve_unique_name(&unit.class_owner)
    };
    format!("{}{stem}.cpp", options.surface.function_prefix)
}

/// Print every dispatcher with its accepted arities.
pub fn groups(input: &Path, config: Option<&Path>) -> Result<()> {
    let descriptors = load_descriptors(input)?;
    let options = load_options(config)?;

    let mut stdout = io::stdout().lock();
    for line in describe_groups(&descriptors.bindings, &options)? {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn describe_groups(bindings: &[FunctionBinding], options: &EmitOptions) -> Result<Vec<String>> {
    let prefix = &options.surface.function_prefix;
    group_by_symbol(bindings, prefix)
        .iter()
        .map(|group| -> Result<String> {
            validate_group(&group.bindings, prefix)?;
            Ok(format!(
                "{} ({} binding(s), arity {})",
                group.symbol,
                group.bindings.len(),
                format_arities(&group_arities(&group.bindings))
            ))
        })
        .collect()
}
