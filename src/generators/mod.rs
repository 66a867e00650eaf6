pub mod model;
pub mod repository_class;
pub mod repository_interface;
pub mod service_provider;

use crate::builder::CodeUnit;
use crate::code::CodeSequence;
use crate::naming::class_path;
use crate::registry::{ConstructorArgs, Container};
use crate::schema::{Schema, Table};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub use model::{ModelGenerator, MODEL_GENERATOR};
pub use repository_class::{RepositoryClassGenerator, REPOSITORY_CLASS_GENERATOR};
pub use repository_interface::{
    signature_customizers, RepositoryInterfaceGenerator, REPOSITORY_INTERFACE_GENERATOR,
    REPOSITORY_METHODS,
};
pub use service_provider::{ServiceProviderGenerator, SERVICE_PROVIDER_GENERATOR};

/// One generated source file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub code: CodeSequence,
}

impl GeneratedUnit {
    pub fn from_unit(unit: &CodeUnit) -> Self {
        Self {
            path: class_path(&unit.qualified_name()),
            code: unit.render(),
        }
    }
}

/// Generator trait - turns (part of) the schema into code units
pub trait Generator {
    /// Registered type id of the generator
    fn name(&self) -> &str;

    fn generate(&self) -> Result<Vec<GeneratedUnit>>;

    /// Aggregators that collect interface -> implementation bindings from
    /// other generators expose themselves here.
    fn binding_sink(&mut self) -> Option<&mut dyn BindingSink> {
        None
    }
}

pub trait BindingSink {
    fn add_binding(&mut self, interface: &str, class: &str);

    fn bindings(&self) -> &IndexMap<String, String>;
}

/// Shared handle to a generator instance.
pub type GeneratorHandle = Rc<RefCell<dyn Generator>>;

pub fn handle<G: Generator + 'static>(generator: G) -> GeneratorHandle {
    Rc::new(RefCell::new(generator))
}

/// Looks up the table a per-table generator was constructed for.
pub(crate) fn schema_table(schema: &Schema, name: &str) -> Result<Table> {
    schema
        .table(name)
        .cloned()
        .with_context(|| format!("table '{}' is not defined in the schema", name))
}

/// Registers the built-in generator types under their base type ids.
pub fn register_builtin(container: &mut Container) {
    container
        .register(MODEL_GENERATOR, None, |schema, args| {
            let table = ConstructorArgs::require_str(args, "table")?;
            Ok(handle(ModelGenerator::new(Rc::clone(schema), table)?))
        })
        .register(REPOSITORY_INTERFACE_GENERATOR, None, |schema, args| {
            let table = ConstructorArgs::require_str(args, "table")?;
            Ok(handle(RepositoryInterfaceGenerator::new(Rc::clone(schema), table)?))
        })
        .register(REPOSITORY_CLASS_GENERATOR, None, |schema, args| {
            let table = ConstructorArgs::require_str(args, "table")?;
            Ok(handle(RepositoryClassGenerator::new(Rc::clone(schema), table)?))
        })
        .register(SERVICE_PROVIDER_GENERATOR, None, |schema, _| {
            Ok(handle(ServiceProviderGenerator::new(Rc::clone(schema))))
        });
}

/// Author docblock shared by every generated unit.
pub(crate) fn stamp_author(unit: &mut CodeUnit, schema: &Schema, summary: &str) {
    unit.set_docblock(|doc| {
        doc.add_text(summary).add_text("Generated by schemagen.");
        if !schema.author_name().is_empty() {
            doc.add_annotation("author", schema.author_line());
        }
    });
}
