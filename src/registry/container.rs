use super::Instantiator;
use crate::document::Node;
use crate::error::RegistryError;
use crate::generators::GeneratorHandle;
use crate::schema::Schema;
use anyhow::Result;
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::debug;

/// Named constructor arguments passed through to a generator factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorArgs {
    values: IndexMap<String, Node>,
}

impl ConstructorArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.values.get(key)
    }

    /// A string argument the factory cannot do without.
    pub fn require_str<'a>(args: Option<&'a ConstructorArgs>, key: &str) -> Result<&'a str> {
        args.and_then(|args| args.get(key))
            .and_then(Node::as_str)
            .ok_or_else(|| anyhow::anyhow!("missing string constructor argument '{}'", key))
    }
}

/// Builds a generator from the run's schema and optional arguments.
pub type Factory = Rc<dyn Fn(&Rc<Schema>, Option<&ConstructorArgs>) -> Result<GeneratorHandle>>;

struct TypeEntry {
    parent: Option<String>,
    factory: Factory,
}

/// Catalog of generator types for one generation run.
///
/// Each type may declare a parent type; a type is a subtype of every type on
/// its parent chain.
pub struct Container {
    schema: Rc<Schema>,
    types: IndexMap<String, TypeEntry>,
}

impl Container {
    pub fn new(schema: Rc<Schema>) -> Self {
        Self {
            schema,
            types: IndexMap::new(),
        }
    }

    pub fn register<F>(&mut self, type_id: &str, parent: Option<&str>, factory: F) -> &mut Self
    where
        F: Fn(&Rc<Schema>, Option<&ConstructorArgs>) -> Result<GeneratorHandle> + 'static,
    {
        self.register_factory(type_id, parent, Rc::new(factory))
    }

    pub fn register_factory(&mut self, type_id: &str, parent: Option<&str>, factory: Factory) -> &mut Self {
        debug!(type_id, parent, "registering generator type");
        self.types.insert(
            type_id.to_string(),
            TypeEntry {
                parent: parent.map(str::to_string),
                factory,
            },
        );
        self
    }
}

impl Instantiator for Container {
    fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    fn is_subtype(&self, type_id: &str, base: &str) -> bool {
        let mut current = Some(type_id);
        // a parent chain can be no longer than the catalog
        for _ in 0..=self.types.len() {
            match current {
                Some(id) if id == base => return true,
                Some(id) => current = self.types.get(id).and_then(|entry| entry.parent.as_deref()),
                None => return false,
            }
        }
        false
    }

    fn instantiate(
        &self,
        type_id: &str,
        args: Option<&ConstructorArgs>,
    ) -> Result<GeneratorHandle, RegistryError> {
        let entry = self.types.get(type_id).ok_or_else(|| RegistryError::UnknownType {
            type_id: type_id.to_string(),
        })?;
        (entry.factory)(&self.schema, args).map_err(|err| RegistryError::Instantiation {
            type_id: type_id.to_string(),
            message: format!("{err:#}"),
        })
    }
}
