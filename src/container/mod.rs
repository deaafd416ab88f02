//! Minimal component container.
//!
//! Owns component instances, runs the registered post-processors over each
//! one as it is initialized, and keeps components and standalone entities in
//! a single name space. The binder sees that name space through the
//! [`EntityRegistry`] view returned by [`ComponentContainer::registry`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::binder::BindingError;
use crate::component::{Component, Endpoint};
use crate::registry::{EntityRegistry, RegistryError};

// ---------------------------------------------------------------------------
// ComponentPostProcessor
// ---------------------------------------------------------------------------

/// Hook invoked by the container around component initialization.
///
/// Each hook receives the current instance and returns the one the
/// container should keep; returning a different instance replaces it.
pub trait ComponentPostProcessor: Send + Sync {
    fn before_initialization(
        &self,
        instance: Arc<dyn Component>,
        _name: &str,
    ) -> Result<Arc<dyn Component>, BindingError> {
        Ok(instance)
    }

    fn after_initialization(
        &self,
        instance: Arc<dyn Component>,
        name: &str,
    ) -> Result<Arc<dyn Component>, BindingError>;
}

// ---------------------------------------------------------------------------
// ContainerRegistry
// ---------------------------------------------------------------------------

/// Something registered in the container under a name.
#[derive(Clone)]
pub enum Registration {
    Component(Arc<dyn Component>),
    Entity(Arc<dyn Endpoint>),
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(c) => write!(f, "Component({})", c.descriptor().name),
            Self::Entity(_) => f.write_str("Entity"),
        }
    }
}

/// Name space shared by components and standalone entities.
#[derive(Default)]
pub struct ContainerRegistry {
    entries: RwLock<BTreeMap<String, Registration>>,
}

impl ContainerRegistry {
    pub fn get(&self, name: &str) -> Option<Registration> {
        self.entries.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn insert_component(
        &self,
        name: &str,
        instance: Arc<dyn Component>,
    ) -> Result<(), BindingError> {
        let mut entries = self.entries.write();
        if entries.contains_key(name) {
            return Err(BindingError::DuplicateComponent(name.to_string()));
        }
        entries.insert(name.to_string(), Registration::Component(instance));
        Ok(())
    }
}

impl EntityRegistry for ContainerRegistry {
    fn contains_name(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    fn register(&self, name: &str, entity: Arc<dyn Endpoint>) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        if entries.contains_key(name) {
            return Err(RegistryError::NameTaken(name.to_string()));
        }
        entries.insert(name.to_string(), Registration::Entity(entity));
        Ok(())
    }
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.read().iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// ComponentContainer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ComponentContainer {
    registry: Arc<ContainerRegistry>,
    post_processors: Vec<Arc<dyn ComponentPostProcessor>>,
}

impl ComponentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry view handed to post-processors that register entities.
    pub fn registry(&self) -> Arc<ContainerRegistry> {
        self.registry.clone()
    }

    /// Post-processors run in registration order.
    pub fn add_post_processor(&mut self, processor: Arc<dyn ComponentPostProcessor>) {
        self.post_processors.push(processor);
    }

    /// Initialize `instance` under `name` and store the canonical result.
    pub fn initialize(
        &self,
        name: &str,
        instance: Arc<dyn Component>,
    ) -> Result<Arc<dyn Component>, BindingError> {
        if self.registry.contains_name(name) {
            return Err(BindingError::DuplicateComponent(name.to_string()));
        }

        let mut current = instance;
        for processor in &self.post_processors {
            current = processor.before_initialization(current, name)?;
        }
        for processor in &self.post_processors {
            current = processor.after_initialization(current, name)?;
        }

        self.registry.insert_component(name, current.clone())?;
        log::info!("Initialized component '{}'", name);
        Ok(current)
    }

    pub fn component(&self, name: &str) -> Option<Arc<dyn Component>> {
        match self.registry.get(name)? {
            Registration::Component(c) => Some(c),
            Registration::Entity(_) => None,
        }
    }

    pub fn entity(&self, name: &str) -> Option<Arc<dyn Endpoint>> {
        match self.registry.get(name)? {
            Registration::Entity(e) => Some(e),
            Registration::Component(_) => None,
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }
}

impl fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("registry", &self.registry)
            .field("post_processors", &self.post_processors.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
