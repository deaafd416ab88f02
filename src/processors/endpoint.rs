//! Built-in processor producing method-invoking endpoints.
//!
//! The endpoint only records what it is bound to: source component, method,
//! marker kind and the marker's channel attributes. Running it against a
//! message bus is left to the transport layer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{MethodAnnotationProcessor, ProcessingResult};
use crate::annotations::{Annotation, AnnotationKind};
use crate::component::{Component, Endpoint, NameAware};
use crate::transport::{ChannelRegistry, ChannelRegistryAware, ChannelRegistrySlot};

/// Marker attribute naming the channel the endpoint consumes from.
pub const INPUT_CHANNEL: &str = "input_channel";
/// Marker attribute naming the channel the endpoint replies to.
pub const OUTPUT_CHANNEL: &str = "output_channel";

/// Standalone endpoint bound to one method of a managed component.
pub struct MethodInvokingEndpoint {
    component_name: String,
    target: Arc<dyn Component>,
    method: String,
    kind: AnnotationKind,
    input_channel: Option<String>,
    output_channel: Option<String>,
    name: RwLock<Option<String>>,
    channels: ChannelRegistrySlot,
}

impl MethodInvokingEndpoint {
    pub fn new(
        target: Arc<dyn Component>,
        component_name: impl Into<String>,
        method: impl Into<String>,
        marker: &Annotation,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            target,
            method: method.into(),
            kind: marker.kind.clone(),
            input_channel: marker.str_attribute(INPUT_CHANNEL).map(str::to_string),
            output_channel: marker.str_attribute(OUTPUT_CHANNEL).map(str::to_string),
            name: RwLock::new(None),
            channels: ChannelRegistrySlot::new(),
        }
    }

    /// Name of the component the method belongs to.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn target(&self) -> &Arc<dyn Component> {
        &self.target
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    pub fn input_channel(&self) -> Option<&str> {
        self.input_channel.as_deref()
    }

    pub fn output_channel(&self) -> Option<&str> {
        self.output_channel.as_deref()
    }

    /// Registration name, once assigned.
    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    pub fn channel_registry(&self) -> Option<Arc<dyn ChannelRegistry>> {
        self.channels.get()
    }
}

impl NameAware for MethodInvokingEndpoint {
    fn set_name(&self, name: &str) {
        *self.name.write() = Some(name.to_string());
    }
}

impl ChannelRegistryAware for MethodInvokingEndpoint {
    fn set_channel_registry(&self, registry: Arc<dyn ChannelRegistry>) {
        self.channels.set(registry);
    }
}

impl Endpoint for MethodInvokingEndpoint {
    fn as_name_aware(&self) -> Option<&dyn NameAware> {
        Some(self)
    }

    fn as_channel_registry_aware(&self) -> Option<&dyn ChannelRegistryAware> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for MethodInvokingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvokingEndpoint")
            .field("name", &self.name())
            .field("component", &self.component_name)
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("input_channel", &self.input_channel)
            .field("output_channel", &self.output_channel)
            .finish()
    }
}

/// Processor turning any role marker into a [`MethodInvokingEndpoint`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointAnnotationProcessor;

impl MethodAnnotationProcessor for EndpointAnnotationProcessor {
    fn process(
        &self,
        instance: &Arc<dyn Component>,
        component_name: &str,
        method: &str,
        marker: &Annotation,
    ) -> anyhow::Result<Option<ProcessingResult>> {
        log::debug!(
            "Creating {} endpoint for {}.{}",
            marker.kind.short_name(),
            component_name,
            method
        );
        let endpoint =
            MethodInvokingEndpoint::new(instance.clone(), component_name, method, marker);
        Ok(Some(ProcessingResult::Standalone(Arc::new(endpoint))))
    }
}
