//! Entity registry: the container's name → standalone entity mapping.
//!
//! The binder checks [`EntityRegistry::contains_name`] before it registers,
//! so implementations only need to serialize registration per name.

pub mod naming;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::component::Endpoint;

pub use naming::generate_entity_name;

/// Errors raised by an [`EntityRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("name '{0}' is already registered")]
    NameTaken(String),
}

/// Registry view the container exposes to the binder.
pub trait EntityRegistry: Send + Sync {
    fn contains_name(&self, name: &str) -> bool;

    /// Register `entity` under `name`; fails if the name is taken.
    fn register(&self, name: &str, entity: Arc<dyn Endpoint>) -> Result<(), RegistryError>;
}

/// Standalone entity registry held in memory.
#[derive(Default)]
pub struct InMemoryEntityRegistry {
    entities: RwLock<BTreeMap<String, Arc<dyn Endpoint>>>,
}

impl InMemoryEntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Endpoint>> {
        self.entities.read().get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entities.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl EntityRegistry for InMemoryEntityRegistry {
    fn contains_name(&self, name: &str) -> bool {
        self.entities.read().contains_key(name)
    }

    fn register(&self, name: &str, entity: Arc<dyn Endpoint>) -> Result<(), RegistryError> {
        let mut entities = self.entities.write();
        if entities.contains_key(name) {
            return Err(RegistryError::NameTaken(name.to_string()));
        }
        entities.insert(name.to_string(), entity);
        Ok(())
    }
}

impl fmt::Debug for InMemoryEntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEntityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::any::Any;

    /// Bare endpoint for registry fixtures.
    #[derive(Debug)]
    pub(crate) struct NullEndpoint;

    impl Endpoint for NullEndpoint {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = InMemoryEntityRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains_name("svc.handle.Transformer"));

        registry
            .register("svc.handle.Transformer", Arc::new(NullEndpoint))
            .unwrap();
        assert!(registry.contains_name("svc.handle.Transformer"));
        assert!(registry.get("svc.handle.Transformer").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_taken_name() {
        let registry = InMemoryEntityRegistry::new();
        registry.register("a", Arc::new(NullEndpoint)).unwrap();
        let err = registry.register("a", Arc::new(NullEndpoint)).unwrap_err();
        assert!(matches!(err, RegistryError::NameTaken(ref n) if n == "a"));
        assert_eq!(err.to_string(), "name 'a' is already registered");
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = InMemoryEntityRegistry::new();
        registry.register("b", Arc::new(NullEndpoint)).unwrap();
        registry.register("a", Arc::new(NullEndpoint)).unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(format!("{:?}", registry).contains("\"a\", \"b\""));
    }
}
