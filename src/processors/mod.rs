//! Role processors and the registry that maps marker kinds to them.
//!
//! A [`MethodAnnotationProcessor`] turns one annotated method into either a
//! standalone endpoint or a capability delegate. Its internals are opaque to
//! the binder. The [`ProcessorRegistry`] is assembled once through
//! [`ProcessorRegistryBuilder`] and is read-only afterwards, so it can be
//! shared across threads without locking.

pub mod endpoint;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::annotations::{Annotation, AnnotationKind, STANDARD_ROLE_KINDS};
use crate::component::{Component, Endpoint, Invocable};

pub use endpoint::{EndpointAnnotationProcessor, MethodInvokingEndpoint};

// ---------------------------------------------------------------------------
// ProcessingResult
// ---------------------------------------------------------------------------

/// What a processor produced for one `(method, marker)` pair.
#[derive(Clone)]
pub enum ProcessingResult {
    /// A freestanding entity, registered under a generated name.
    Standalone(Arc<dyn Endpoint>),
    /// A delegate merged into the original instance's exposed behaviour.
    Capability(Arc<dyn Invocable>),
}

impl ProcessingResult {
    pub fn is_standalone(&self) -> bool {
        matches!(self, Self::Standalone(_))
    }
}

impl fmt::Debug for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone(_) => f.write_str("Standalone"),
            Self::Capability(delegate) => f
                .debug_tuple("Capability")
                .field(&delegate.interfaces())
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// MethodAnnotationProcessor
// ---------------------------------------------------------------------------

/// Processor for one marker kind.
///
/// Returning `Ok(None)` means the method contributes nothing. Errors are
/// never swallowed by the binder; they abort the instance's pass.
pub trait MethodAnnotationProcessor: Send + Sync {
    fn process(
        &self,
        instance: &Arc<dyn Component>,
        component_name: &str,
        method: &str,
        marker: &Annotation,
    ) -> anyhow::Result<Option<ProcessingResult>>;
}

impl<F> MethodAnnotationProcessor for F
where
    F: Fn(&Arc<dyn Component>, &str, &str, &Annotation) -> anyhow::Result<Option<ProcessingResult>>
        + Send
        + Sync,
{
    fn process(
        &self,
        instance: &Arc<dyn Component>,
        component_name: &str,
        method: &str,
        marker: &Annotation,
    ) -> anyhow::Result<Option<ProcessingResult>> {
        self(instance, component_name, method, marker)
    }
}

// ---------------------------------------------------------------------------
// ProcessorRegistry
// ---------------------------------------------------------------------------

/// Immutable mapping from marker kind to processor.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<AnnotationKind, Arc<dyn MethodAnnotationProcessor>>,
}

impl ProcessorRegistry {
    pub fn builder() -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::default()
    }

    /// Registry with the built-in endpoint processor for every standard
    /// role kind.
    pub fn with_defaults() -> Self {
        Self::builder().with_standard_kinds().build()
    }

    pub fn get(&self, kind: &AnnotationKind) -> Option<&Arc<dyn MethodAnnotationProcessor>> {
        self.processors.get(kind)
    }

    pub fn handles(&self, kind: &AnnotationKind) -> bool {
        self.processors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&AnnotationKind> {
        let mut kinds: Vec<_> = self.processors.keys().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Start-up builder for [`ProcessorRegistry`].
#[derive(Default)]
pub struct ProcessorRegistryBuilder {
    processors: HashMap<AnnotationKind, Arc<dyn MethodAnnotationProcessor>>,
}

impl ProcessorRegistryBuilder {
    /// Register `processor` for `kind`, replacing any earlier registration.
    pub fn register(
        mut self,
        kind: impl Into<AnnotationKind>,
        processor: impl MethodAnnotationProcessor + 'static,
    ) -> Self {
        self.processors.insert(kind.into(), Arc::new(processor));
        self
    }

    /// Register an already shared processor.
    pub fn register_shared(
        mut self,
        kind: impl Into<AnnotationKind>,
        processor: Arc<dyn MethodAnnotationProcessor>,
    ) -> Self {
        self.processors.insert(kind.into(), processor);
        self
    }

    /// Register the built-in endpoint processor for every standard kind not
    /// registered yet.
    pub fn with_standard_kinds(mut self) -> Self {
        let shared: Arc<dyn MethodAnnotationProcessor> = Arc::new(EndpointAnnotationProcessor);
        for kind in STANDARD_ROLE_KINDS.iter() {
            self.processors
                .entry(kind.clone())
                .or_insert_with(|| shared.clone());
        }
        self
    }

    pub fn build(self) -> ProcessorRegistry {
        ProcessorRegistry {
            processors: self.processors,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
