//! Generator roles and their bound implementations.
//!
//! A role ("the model generator") has a required base type. Any registered
//! type that is the base type or a subtype of it may be bound to the role;
//! resolving the role instantiates whatever is bound, or the base type when
//! nothing is.

pub mod container;

pub use container::{ConstructorArgs, Container, Factory};

use crate::error::RegistryError;
use crate::generators::{
    GeneratorHandle, MODEL_GENERATOR, REPOSITORY_CLASS_GENERATOR, REPOSITORY_INTERFACE_GENERATOR,
    SERVICE_PROVIDER_GENERATOR,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info};

pub const ROLE_MODEL: &str = "model";
pub const ROLE_REPOSITORY_INTERFACE: &str = "repository-interface";
pub const ROLE_REPOSITORY_CLASS: &str = "repository-class";
pub const ROLE_SERVICE_PROVIDER: &str = "service-provider";

/// Built-in role table: role -> required base type.
pub fn builtin_roles() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        (ROLE_MODEL, MODEL_GENERATOR),
        (ROLE_REPOSITORY_INTERFACE, REPOSITORY_INTERFACE_GENERATOR),
        (ROLE_REPOSITORY_CLASS, REPOSITORY_CLASS_GENERATOR),
        (ROLE_SERVICE_PROVIDER, SERVICE_PROVIDER_GENERATOR),
    ])
}

/// Instantiation service used by the registry.
pub trait Instantiator {
    fn contains(&self, type_id: &str) -> bool;

    /// Whether `type_id` is `base` or a subtype of it.
    fn is_subtype(&self, type_id: &str, base: &str) -> bool;

    fn instantiate(
        &self,
        type_id: &str,
        args: Option<&ConstructorArgs>,
    ) -> Result<GeneratorHandle, RegistryError>;
}

/// Binds roles to implementations and caches one instance per role.
///
/// The cache lives as long as the registry, which is one generation run.
/// Handles are `Rc<RefCell<_>>`, so the registry stays on one thread.
pub struct GeneratorRegistry {
    roles: IndexMap<&'static str, &'static str>,
    bindings: HashMap<String, String>,
    instances: HashMap<String, GeneratorHandle>,
    instantiator: Rc<dyn Instantiator>,
}

impl GeneratorRegistry {
    pub fn new(instantiator: Rc<dyn Instantiator>) -> Self {
        Self {
            roles: builtin_roles(),
            bindings: HashMap::new(),
            instances: HashMap::new(),
            instantiator,
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().copied()
    }

    fn required_base(&self, role: &str) -> Result<&'static str, RegistryError> {
        self.roles
            .get(role)
            .copied()
            .ok_or_else(|| RegistryError::InvalidRole {
                role: role.to_string(),
            })
    }

    fn check_contract(&self, role: &str, implementation: &str) -> Result<(), RegistryError> {
        let required = self.required_base(role)?;
        if !self.instantiator.contains(implementation) {
            return Err(RegistryError::UnknownType {
                type_id: implementation.to_string(),
            });
        }
        if !self.instantiator.is_subtype(implementation, required) {
            return Err(RegistryError::ContractViolation {
                role: role.to_string(),
                implementation: implementation.to_string(),
                required: required.to_string(),
            });
        }
        Ok(())
    }

    /// Binds `implementation` to `role`. On failure the previous binding
    /// stays in place.
    pub fn bind(&mut self, role: &str, implementation: &str) -> Result<(), RegistryError> {
        self.check_contract(role, implementation)?;
        info!(role, implementation, "bound generator");
        self.bindings.insert(role.to_string(), implementation.to_string());
        Ok(())
    }

    /// The type `resolve` would instantiate for `role`.
    pub fn binding(&self, role: &str) -> Result<&str, RegistryError> {
        let required = self.required_base(role)?;
        Ok(self.bindings.get(role).map(String::as_str).unwrap_or(required))
    }

    /// Creates a fresh instance of whatever is bound to `role`.
    pub fn resolve(
        &self,
        role: &str,
        args: Option<&ConstructorArgs>,
    ) -> Result<GeneratorHandle, RegistryError> {
        let implementation = self.binding(role)?;
        debug!(role, implementation, "resolving generator");
        self.instantiator.instantiate(implementation, args)
    }

    pub fn has_instance(&self, role: &str) -> bool {
        self.instances.contains_key(role)
    }

    /// Caches an existing instance for `role`, subject to the same contract
    /// as [`GeneratorRegistry::bind`].
    pub fn set_instance(&mut self, role: &str, instance: GeneratorHandle) -> Result<(), RegistryError> {
        let implementation = instance.borrow().name().to_string();
        self.check_contract(role, &implementation)?;
        self.instances.insert(role.to_string(), instance);
        Ok(())
    }

    /// The run-wide instance for `role`, created without arguments on first
    /// use. Every call returns a handle to the same instance.
    pub fn get_or_create_cached(&mut self, role: &str) -> Result<GeneratorHandle, RegistryError> {
        if let Some(instance) = self.instances.get(role) {
            return Ok(Rc::clone(instance));
        }
        let instance = self.resolve(role, None)?;
        self.instances.insert(role.to_string(), Rc::clone(&instance));
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::generators::{BindingSink, GeneratedUnit, Generator};
    use crate::schema::Schema;
    use indexmap::IndexMap;
    use std::cell::RefCell;

    /// Minimal generator standing in for any registered type.
    struct Stub {
        type_id: &'static str,
        bindings: IndexMap<String, String>,
    }

    impl Generator for Stub {
        fn name(&self) -> &str {
            self.type_id
        }

        fn generate(&self) -> anyhow::Result<Vec<GeneratedUnit>> {
            Ok(Vec::new())
        }

        fn binding_sink(&mut self) -> Option<&mut dyn BindingSink> {
            Some(self)
        }
    }

    impl BindingSink for Stub {
        fn add_binding(&mut self, interface: &str, class: &str) {
            self.bindings.insert(interface.to_string(), class.to_string());
        }

        fn bindings(&self) -> &IndexMap<String, String> {
            &self.bindings
        }
    }

    fn stub(type_id: &'static str) -> GeneratorHandle {
        Rc::new(RefCell::new(Stub {
            type_id,
            bindings: IndexMap::new(),
        }))
    }

    fn registry() -> GeneratorRegistry {
        let schema = Rc::new(Schema::from_document(&Document::new()).unwrap());
        let mut container = Container::new(schema);
        for (type_id, parent) in [
            (MODEL_GENERATOR, None),
            ("custom-model", Some(MODEL_GENERATOR)),
            ("custom-model-v2", Some("custom-model")),
            (REPOSITORY_INTERFACE_GENERATOR, None),
            (SERVICE_PROVIDER_GENERATOR, None),
            ("failing", Some(MODEL_GENERATOR)),
        ] {
            container.register(type_id, parent, move |_, args| {
                if type_id == "failing" {
                    anyhow::bail!("boom");
                }
                if let Some(args) = args {
                    assert!(args.get("table").is_some());
                }
                Ok(stub(type_id))
            });
        }
        GeneratorRegistry::new(Rc::new(container))
    }

    #[test]
    fn test_resolve_falls_back_to_base_type() {
        let registry = registry();
        let generator = registry.resolve(ROLE_MODEL, None).unwrap();
        assert_eq!(generator.borrow().name(), MODEL_GENERATOR);
        assert_eq!(registry.binding(ROLE_MODEL).unwrap(), MODEL_GENERATOR);
    }

    #[test]
    fn test_bind_subtype_and_resolve_with_args() {
        let mut registry = registry();
        registry.bind(ROLE_MODEL, "custom-model-v2").unwrap();
        let args = ConstructorArgs::new().with("table", "users");
        let generator = registry.resolve(ROLE_MODEL, Some(&args)).unwrap();
        assert_eq!(generator.borrow().name(), "custom-model-v2");
    }

    #[test]
    fn test_resolve_creates_fresh_instances() {
        let registry = registry();
        let first = registry.resolve(ROLE_MODEL, None).unwrap();
        let second = registry.resolve(ROLE_MODEL, None).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_bind_unknown_role() {
        let mut registry = registry();
        assert_eq!(
            registry.bind("controller", MODEL_GENERATOR),
            Err(RegistryError::InvalidRole {
                role: "controller".to_string()
            })
        );
        assert!(matches!(
            registry.resolve("controller", None),
            Err(RegistryError::InvalidRole { .. })
        ));
    }

    #[test]
    fn test_contract_violation_keeps_previous_binding() {
        let mut registry = registry();
        registry.bind(ROLE_MODEL, "custom-model").unwrap();

        let err = registry
            .bind(ROLE_MODEL, REPOSITORY_INTERFACE_GENERATOR)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::ContractViolation {
                role: ROLE_MODEL.to_string(),
                implementation: REPOSITORY_INTERFACE_GENERATOR.to_string(),
                required: MODEL_GENERATOR.to_string(),
            }
        );
        assert_eq!(registry.binding(ROLE_MODEL).unwrap(), "custom-model");
    }

    #[test]
    fn test_bind_unregistered_type() {
        let mut registry = registry();
        assert!(matches!(
            registry.bind(ROLE_MODEL, "nowhere"),
            Err(RegistryError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_instantiation_failure() {
        let mut registry = registry();
        registry.bind(ROLE_MODEL, "failing").unwrap();
        let err = registry.resolve(ROLE_MODEL, None).err().unwrap();
        assert_eq!(
            err,
            RegistryError::Instantiation {
                type_id: "failing".to_string(),
                message: "boom".to_string(),
            }
        );
    }

    #[test]
    fn test_cached_instance_is_shared() {
        let mut registry = registry();
        assert!(!registry.has_instance(ROLE_SERVICE_PROVIDER));

        let first = registry.get_or_create_cached(ROLE_SERVICE_PROVIDER).unwrap();
        let second = registry.get_or_create_cached(ROLE_SERVICE_PROVIDER).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(registry.has_instance(ROLE_SERVICE_PROVIDER));

        first
            .borrow_mut()
            .binding_sink()
            .unwrap()
            .add_binding("App\\UserRepository", "App\\EloquentUserRepository");

        let mut seen = second.borrow_mut();
        let bindings = seen.binding_sink().unwrap().bindings();
        assert_eq!(
            bindings.get("App\\UserRepository").map(String::as_str),
            Some("App\\EloquentUserRepository")
        );
    }

    #[test]
    fn test_set_instance_checks_contract() {
        let mut registry = registry();
        let err = registry
            .set_instance(ROLE_SERVICE_PROVIDER, stub(MODEL_GENERATOR))
            .unwrap_err();
        assert!(matches!(err, RegistryError::ContractViolation { .. }));
        assert!(!registry.has_instance(ROLE_SERVICE_PROVIDER));

        let provider = stub(SERVICE_PROVIDER_GENERATOR);
        registry
            .set_instance(ROLE_SERVICE_PROVIDER, Rc::clone(&provider))
            .unwrap();
        let cached = registry.get_or_create_cached(ROLE_SERVICE_PROVIDER).unwrap();
        assert!(Rc::ptr_eq(&provider, &cached));
    }

    #[test]
    fn test_subtype_chain() {
        let schema = Rc::new(Schema::from_document(&Document::new()).unwrap());
        let mut container = Container::new(schema);
        container
            .register("a", None, |_, _| Ok(stub("a")))
            .register("b", Some("a"), |_, _| Ok(stub("b")))
            .register("loop-x", Some("loop-y"), |_, _| Ok(stub("loop-x")))
            .register("loop-y", Some("loop-x"), |_, _| Ok(stub("loop-y")));

        assert!(container.is_subtype("b", "a"));
        assert!(container.is_subtype("a", "a"));
        assert!(!container.is_subtype("a", "b"));
        assert!(!container.is_subtype("loop-x", "a"));
    }
}
