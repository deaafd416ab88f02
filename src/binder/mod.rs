//! Messaging annotation binder.
//!
//! Post-processes every component the container initializes:
//!
//! 1. [`eligibility`]: skip components without the stereotype marker.
//! 2. [`scanner`]: dispatch each registered method marker to its processor.
//! 3. [`plan`]: register standalone endpoints under generated names and
//!    compose capability delegates onto the original instance.
//!
//! The transport reference is handed to every transport-aware participant
//! along the way. The binder is configured once through
//! [`AnnotationBinderBuilder`] and holds no mutable state of its own.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use integration_binder::binder::AnnotationBinder;
//! use integration_binder::registry::InMemoryEntityRegistry;
//! use integration_binder::transport::SimpleChannelRegistry;
//!
//! let binder = AnnotationBinder::builder()
//!     .entity_registry(Arc::new(InMemoryEntityRegistry::new()))
//!     .channel_registry(Arc::new(SimpleChannelRegistry::new()))
//!     .build()
//!     .unwrap();
//! assert_eq!(binder.processors().len(), 6);
//! ```

pub mod config;
pub mod eligibility;
pub mod error;
pub mod plan;
pub mod scanner;

use std::fmt;
use std::sync::Arc;

use crate::annotations::{AnnotationCatalog, DeclaredMetadataResolver, MetadataResolver};
use crate::component::Component;
use crate::container::ComponentPostProcessor;
use crate::processors::ProcessorRegistry;
use crate::registry::EntityRegistry;
use crate::transport::ChannelRegistry;

pub use config::BinderConfig;
pub use eligibility::StereotypeFilter;
pub use error::BindingError;
pub use plan::{CompositionPlan, ResultIntegrator};
pub use scanner::{MethodScanner, ScanRecord};

// ---------------------------------------------------------------------------
// AnnotationBinder
// ---------------------------------------------------------------------------

/// Post-processor binding annotated component methods into the system.
pub struct AnnotationBinder {
    config: BinderConfig,
    processors: Arc<ProcessorRegistry>,
    catalog: AnnotationCatalog,
    resolver: Arc<dyn MetadataResolver>,
    entities: Arc<dyn EntityRegistry>,
    channels: Arc<dyn ChannelRegistry>,
}

impl AnnotationBinder {
    pub fn builder() -> AnnotationBinderBuilder {
        AnnotationBinderBuilder::default()
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    /// Whether the component's real type carries the stereotype.
    pub fn is_eligible(&self, instance: &dyn Component) -> bool {
        StereotypeFilter::new(
            &self.config.stereotype,
            &self.catalog,
            self.resolver.as_ref(),
        )
        .is_eligible(instance.descriptor())
    }

    /// Run the full pass for `instance` registered as `name`.
    ///
    /// Returns the instance the container must treat as canonical: the
    /// original, or a composed replacement. Registrations and injections
    /// already performed are not undone when an error aborts the pass.
    pub fn bind(
        &self,
        instance: Arc<dyn Component>,
        name: &str,
    ) -> Result<Arc<dyn Component>, BindingError> {
        if !self.is_eligible(instance.as_ref()) {
            log::debug!("Skipping '{}': not a stereotype component", name);
            return Ok(instance);
        }

        let scanner = MethodScanner::new(&self.processors, self.resolver.as_ref());
        let records = scanner.scan(&instance, name)?;

        let mut integrator = ResultIntegrator::new(
            name,
            instance.as_ref(),
            self.entities.as_ref(),
            &self.channels,
            &self.config,
        );
        for record in records {
            integrator.accept(record)?;
        }

        if let Some(aware) = instance.as_channel_registry_aware() {
            aware.set_channel_registry(self.channels.clone());
        }

        Ok(integrator.finish(instance))
    }
}

impl ComponentPostProcessor for AnnotationBinder {
    fn after_initialization(
        &self,
        instance: Arc<dyn Component>,
        name: &str,
    ) -> Result<Arc<dyn Component>, BindingError> {
        self.bind(instance, name)
    }
}

impl fmt::Debug for AnnotationBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationBinder")
            .field("config", &self.config)
            .field("processors", &self.processors)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AnnotationBinderBuilder
// ---------------------------------------------------------------------------

/// Start-up assembly of an [`AnnotationBinder`].
///
/// The entity registry and the channel registry are required; everything
/// else has a default (standard processors, empty catalog, declared
/// metadata resolver, default config).
#[derive(Default)]
pub struct AnnotationBinderBuilder {
    config: Option<BinderConfig>,
    processors: Option<Arc<ProcessorRegistry>>,
    catalog: Option<AnnotationCatalog>,
    resolver: Option<Arc<dyn MetadataResolver>>,
    entities: Option<Arc<dyn EntityRegistry>>,
    channels: Option<Arc<dyn ChannelRegistry>>,
}

impl AnnotationBinderBuilder {
    pub fn config(mut self, config: BinderConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn processors(mut self, processors: impl Into<Arc<ProcessorRegistry>>) -> Self {
        self.processors = Some(processors.into());
        self
    }

    pub fn catalog(mut self, catalog: AnnotationCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn MetadataResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn entity_registry(mut self, entities: Arc<dyn EntityRegistry>) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn channel_registry(mut self, channels: Arc<dyn ChannelRegistry>) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn build(self) -> Result<AnnotationBinder, BindingError> {
        let entities = self
            .entities
            .ok_or(BindingError::MissingCollaborator("entity registry"))?;
        let channels = self
            .channels
            .ok_or(BindingError::MissingCollaborator("channel registry"))?;

        Ok(AnnotationBinder {
            config: self.config.unwrap_or_default(),
            processors: self
                .processors
                .unwrap_or_else(|| Arc::new(ProcessorRegistry::with_defaults())),
            catalog: self.catalog.unwrap_or_default(),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(DeclaredMetadataResolver)),
            entities,
            channels,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
