//! # Integration Binder
//!
//! Declarative binding of annotated component methods into a messaging
//! system. Version 1.9.3
//!
//! Components carry descriptor metadata: a type name, class level markers,
//! implemented interfaces, a superclass chain, and per-method markers. When a
//! container initializes a component carrying the stereotype marker, the
//! [`AnnotationBinder`] dispatches every recognized method marker to its
//! processor. Each processor result is either a standalone endpoint, which
//! is registered under a generated name, or a capability delegate, which is
//! composed onto the original instance so the component exposes the extra
//! interfaces.
//!
//! ```text
//! ComponentContainer ──> AnnotationBinder (ComponentPostProcessor)
//!                          ├── StereotypeFilter   (eligibility)
//!                          ├── MethodScanner      (ProcessorRegistry)
//!                          └── ResultIntegrator   (EntityRegistry, CompositionPlan)
//! ```

pub mod annotations;
pub mod binder;
pub mod component;
pub mod container;
pub mod processors;
pub mod registry;
pub mod transport;

pub use annotations::{Annotation, AnnotationCatalog, AnnotationKind, TypeDescriptor};
pub use binder::{AnnotationBinder, AnnotationBinderBuilder, BinderConfig, BindingError};
pub use component::{Component, ComposedComponent, Endpoint, Invocable, Invocation};
pub use container::{ComponentContainer, ComponentPostProcessor};
pub use processors::{MethodAnnotationProcessor, ProcessingResult, ProcessorRegistry};
pub use registry::{EntityRegistry, InMemoryEntityRegistry};
pub use transport::{ChannelRegistry, ChannelRegistryAware, SimpleChannelRegistry};

/// Library version.
pub const VERSION: &str = "1.9.3";
