//! One generation run: expand the schema, resolve generators per table,
//! patch and persist their output.

use crate::app_config::AppConfig;
use crate::code::CodeSequence;
use crate::config::Config;
use crate::document::DocumentLoader;
use crate::expand::{MergePolicy, SchemaExpander, DEFAULT_MAX_DEPTH};
use crate::generators::{register_builtin, GeneratedUnit, GeneratorHandle};
use crate::registry::{
    builtin_roles, ConstructorArgs, Container, Factory, GeneratorRegistry, ROLE_MODEL,
    ROLE_REPOSITORY_CLASS, ROLE_REPOSITORY_INTERFACE, ROLE_SERVICE_PROVIDER,
};
use crate::schema::Schema;
use crate::writer::FileWriter;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Roles run once per table, in this order.
const TABLE_ROLES: &[&str] = &[ROLE_MODEL, ROLE_REPOSITORY_INTERFACE, ROLE_REPOSITORY_CLASS];

/// Patch applied to every unit a role produces, before it is written.
pub type PatchHook = Box<dyn Fn(&mut CodeSequence)>;

struct CustomType {
    type_id: String,
    parent: Option<String>,
    factory: Factory,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tables: usize,
    /// Written paths, relative to the output root, in write order.
    pub files: Vec<PathBuf>,
}

pub struct Pipeline {
    policy: MergePolicy,
    max_depth: usize,
    bindings: IndexMap<String, String>,
    hooks: IndexMap<String, Vec<PatchHook>>,
    types: Vec<CustomType>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            policy: MergePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            bindings: IndexMap::new(),
            hooks: IndexMap::new(),
            types: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self::new()
            .with_policy(config.merge.clone())
            .with_max_depth(config.max_depth);
        for (role, implementation) in &config.bindings {
            pipeline.bind(role, implementation);
        }
        pipeline
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Queues a role binding. Bindings are checked when the run starts.
    pub fn bind(&mut self, role: &str, implementation: &str) -> &mut Self {
        self.bindings.insert(role.to_string(), implementation.to_string());
        self
    }

    pub fn add_hook<F>(&mut self, role: &str, hook: F) -> &mut Self
    where
        F: Fn(&mut CodeSequence) + 'static,
    {
        self.hooks
            .entry(role.to_string())
            .or_default()
            .push(Box::new(hook));
        self
    }

    /// Makes an additional generator type available for binding.
    pub fn register_type<F>(&mut self, type_id: &str, parent: Option<&str>, factory: F) -> &mut Self
    where
        F: Fn(&Rc<Schema>, Option<&ConstructorArgs>) -> Result<GeneratorHandle> + 'static,
    {
        self.types.push(CustomType {
            type_id: type_id.to_string(),
            parent: parent.map(str::to_string),
            factory: Rc::new(factory),
        });
        self
    }

    pub fn run(
        &self,
        loader: &dyn DocumentLoader,
        schema_file: &Path,
        writer: &mut dyn FileWriter,
    ) -> Result<RunReport> {
        let expander = SchemaExpander::new(loader)
            .with_policy(self.policy.clone())
            .with_max_depth(self.max_depth);
        let document = expander
            .expand_file(schema_file)
            .with_context(|| format!("Failed to expand schema {:?}", schema_file))?;
        let schema = Rc::new(Schema::from_document(&document)?);
        info!(tables = schema.tables().count(), "schema expanded");

        let mut registry = self.registry(Rc::clone(&schema))?;
        let provider = registry.get_or_create_cached(ROLE_SERVICE_PROVIDER)?;
        let mut app_config = AppConfig::new(schema.config_file.as_str());
        let mut report = RunReport::default();

        for table in schema.tables() {
            info!(table = table.name(), "generating");
            let args = ConstructorArgs::new().with("table", table.name());
            for role in TABLE_ROLES {
                let generator = registry.resolve(role, Some(&args))?;
                let units = generator
                    .borrow()
                    .generate()
                    .with_context(|| format!("Failed to generate {} for table '{}'", role, table.name()))?;
                self.emit(role, units, writer, &mut report)?;
            }

            let interface = table.repository_interface(true);
            let class = table.repository_class(true);
            match provider.borrow_mut().binding_sink() {
                Some(sink) => sink.add_binding(&interface, &class),
                None => warn!(table = table.name(), "service provider does not collect bindings"),
            }
            app_config.add_repository(&interface, &class, true);
            if table.menu {
                app_config.add_menu(&table.route_list_name(), &table.label(), false);
            }
            report.tables += 1;
        }

        let units = provider.borrow().generate()?;
        self.emit(ROLE_SERVICE_PROVIDER, units, writer, &mut report)?;

        let path = app_config.path();
        writer.write(&path, &app_config.render()?)?;
        info!(path = %path.display(), "generated");
        report.files.push(path);

        Ok(report)
    }

    fn registry(&self, schema: Rc<Schema>) -> Result<GeneratorRegistry> {
        let mut container = Container::new(schema);
        register_builtin(&mut container);
        for custom in &self.types {
            container.register_factory(&custom.type_id, custom.parent.as_deref(), Rc::clone(&custom.factory));
        }

        let mut registry = GeneratorRegistry::new(Rc::new(container));
        for (role, implementation) in &self.bindings {
            registry
                .bind(role, implementation)
                .with_context(|| format!("Invalid binding for role '{}'", role))?;
        }

        let roles = builtin_roles();
        for role in self.hooks.keys() {
            if !roles.contains_key(role.as_str()) {
                warn!(role = %role, "patch hook registered for unknown role, it will never run");
            }
        }
        Ok(registry)
    }

    fn emit(
        &self,
        role: &str,
        units: Vec<GeneratedUnit>,
        writer: &mut dyn FileWriter,
        report: &mut RunReport,
    ) -> Result<()> {
        let hooks = self.hooks.get(role).map(Vec::as_slice).unwrap_or_default();
        for mut unit in units {
            for hook in hooks {
                hook(&mut unit.code);
            }
            debug!(role, path = %unit.path.display(), hooks = hooks.len(), "patched");
            writer.write(&unit.path, &unit.code.render_string())?;
            info!(path = %unit.path.display(), "generated");
            report.files.push(unit.path);
        }
        Ok(())
    }
}
