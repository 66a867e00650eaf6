use super::{stamp_author, BindingSink, GeneratedUnit, Generator};
use crate::builder::CodeUnit;
use crate::naming::qualify;
use crate::schema::Schema;
use anyhow::Result;
use indexmap::IndexMap;
use std::rc::Rc;

pub const SERVICE_PROVIDER_GENERATOR: &str = "service-provider-generator";

pub const SERVICE_PROVIDER: &str = "Illuminate\\Support\\ServiceProvider";
pub const PROVIDER_CLASS: &str = "RepositoryServiceProvider";

/// Aggregates repository bindings contributed during the run into one
/// service provider.
pub struct ServiceProviderGenerator {
    schema: Rc<Schema>,
    bindings: IndexMap<String, String>,
}

impl ServiceProviderGenerator {
    pub fn new(schema: Rc<Schema>) -> Self {
        Self {
            schema,
            bindings: IndexMap::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualify(&self.schema.namespaces.provider, PROVIDER_CLASS)
    }

    pub fn build(&self) -> CodeUnit {
        let mut unit = CodeUnit::class(PROVIDER_CLASS);
        unit.set_namespace(self.schema.namespaces.provider.as_str())
            .set_parent_type(SERVICE_PROVIDER);
        stamp_author(&mut unit, &self.schema, "Binds repository interfaces to their implementations.");

        let register = unit.add_method("register");
        register.set_docblock(|doc| {
            doc.add_text("Register the repository bindings.")
                .set_return("void");
        });
        for (interface, class) in &self.bindings {
            register.add_body_line(format!(
                "$this->app->bind(\\{}::class, \\{}::class);",
                interface.trim_start_matches('\\'),
                class.trim_start_matches('\\')
            ));
        }
        unit
    }
}

impl BindingSink for ServiceProviderGenerator {
    /// Binding an interface twice keeps the latest implementation.
    fn add_binding(&mut self, interface: &str, class: &str) {
        self.bindings.insert(interface.to_string(), class.to_string());
    }

    fn bindings(&self) -> &IndexMap<String, String> {
        &self.bindings
    }
}

impl Generator for ServiceProviderGenerator {
    fn name(&self) -> &str {
        SERVICE_PROVIDER_GENERATOR
    }

    fn generate(&self) -> Result<Vec<GeneratedUnit>> {
        Ok(vec![GeneratedUnit::from_unit(&self.build())])
    }

    fn binding_sink(&mut self) -> Option<&mut dyn BindingSink> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures;
    use std::path::PathBuf;

    #[test]
    fn test_provider_collects_bindings() {
        let mut generator = ServiceProviderGenerator::new(fixtures::blog());
        let sink = generator.binding_sink().unwrap();
        sink.add_binding("App\\Repositories\\UserRepository", "App\\Repositories\\EloquentUserRepository");
        sink.add_binding("App\\Repositories\\PostRepository", "App\\Repositories\\EloquentPostRepository");
        sink.add_binding("App\\Repositories\\UserRepository", "App\\Repositories\\CachedUserRepository");

        let units = generator.generate().unwrap();
        assert_eq!(
            units[0].path,
            PathBuf::from("app/Providers/RepositoryServiceProvider.php")
        );
        let lines = units[0].code.render();
        let binds: Vec<_> = lines
            .iter()
            .filter(|line| line.contains("$this->app->bind"))
            .map(|line| line.trim())
            .collect();
        assert_eq!(
            binds,
            vec![
                "$this->app->bind(\\App\\Repositories\\UserRepository::class, \\App\\Repositories\\CachedUserRepository::class);",
                "$this->app->bind(\\App\\Repositories\\PostRepository::class, \\App\\Repositories\\EloquentPostRepository::class);",
            ]
        );
        assert!(lines.contains(&"class RepositoryServiceProvider extends ServiceProvider".to_string()));
        assert!(lines.contains(&"use Illuminate\\Support\\ServiceProvider;".to_string()));
    }

    #[test]
    fn test_empty_provider_still_renders_register() {
        let generator = ServiceProviderGenerator::new(fixtures::blog());
        let unit = generator.build();
        assert_eq!(unit.methods()[0].name(), "register");
        assert!(unit.methods()[0].body().is_empty());
        assert_eq!(generator.qualified_name(), "App\\Providers\\RepositoryServiceProvider");
    }
}
