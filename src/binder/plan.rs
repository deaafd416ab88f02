//! Result classification and composition.
//!
//! Standalone results are named and registered immediately. Capability
//! results accumulate in a [`CompositionPlan`], which rejects any interface
//! claimed twice and finally builds the [`ComposedComponent`] replacing the
//! original instance.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::scanner::ScanRecord;
use super::{BinderConfig, BindingError};
use crate::annotations::{AnnotationKind, InterfaceId};
use crate::component::{Component, ComposedComponent, Endpoint, Invocable};
use crate::processors::ProcessingResult;
use crate::registry::{generate_entity_name, EntityRegistry};
use crate::transport::ChannelRegistry;

// ---------------------------------------------------------------------------
// CompositionPlan
// ---------------------------------------------------------------------------

/// Capability delegates accepted for one component.
///
/// Invariant: every interface maps to exactly one delegate, and none of
/// them is already implemented by the original instance.
pub struct CompositionPlan {
    component: String,
    original: HashSet<InterfaceId>,
    delegates: Vec<(Arc<dyn Invocable>, Vec<InterfaceId>)>,
    claimed: HashMap<InterfaceId, usize>,
}

impl CompositionPlan {
    pub fn new(component: impl Into<String>, original: &dyn Component) -> Self {
        Self {
            component: component.into(),
            original: original.interfaces().into_iter().collect(),
            delegates: Vec::new(),
            claimed: HashMap::new(),
        }
    }

    /// Offer `delegate` to the plan.
    ///
    /// Only interfaces inside `namespace` are considered. Returns `Ok(false)`
    /// when none qualifies and the delegate is left out of the composition.
    /// All qualifying interfaces are checked before any is claimed, so a
    /// conflicting delegate leaves the plan untouched.
    pub fn claim(
        &mut self,
        delegate: Arc<dyn Invocable>,
        namespace: &str,
    ) -> Result<bool, BindingError> {
        let mut interfaces: Vec<InterfaceId> = Vec::new();
        for iface in delegate.interfaces() {
            if !iface.in_namespace(namespace) {
                log::debug!(
                    "Ignoring interface [{}] outside namespace '{}' on '{}'",
                    iface,
                    namespace,
                    self.component
                );
                continue;
            }
            if self.claimed.contains_key(&iface) || self.original.contains(&iface) {
                return Err(BindingError::InterfaceAlreadyClaimed {
                    interface: iface,
                    component: self.component.clone(),
                });
            }
            if !interfaces.contains(&iface) {
                interfaces.push(iface);
            }
        }

        if interfaces.is_empty() {
            return Ok(false);
        }

        let index = self.delegates.len();
        for iface in &interfaces {
            self.claimed.insert(iface.clone(), index);
        }
        self.delegates.push((delegate, interfaces));
        Ok(true)
    }

    pub fn requires_composition(&self) -> bool {
        !self.delegates.is_empty()
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    pub fn claimed_interfaces(&self) -> Vec<&InterfaceId> {
        self.delegates
            .iter()
            .flat_map(|(_, interfaces)| interfaces.iter())
            .collect()
    }

    /// Build the replacement for `original`, or return it unchanged when no
    /// delegate was accepted.
    pub fn compose(self, original: Arc<dyn Component>) -> Arc<dyn Component> {
        if !self.requires_composition() {
            return original;
        }
        let mut composed = ComposedComponent::new(original);
        for (delegate, interfaces) in self.delegates {
            composed = composed.with_delegate(delegate, interfaces);
        }
        log::info!(
            "Composed '{}' with {} capability delegate(s): {:?}",
            self.component,
            composed.delegate_count(),
            composed.introduced_interfaces()
        );
        Arc::new(composed)
    }
}

// ---------------------------------------------------------------------------
// ResultIntegrator
// ---------------------------------------------------------------------------

/// Applies scan results for one component: registrations, transport
/// injection and the composition plan.
pub struct ResultIntegrator<'a> {
    component: &'a str,
    entities: &'a dyn EntityRegistry,
    channels: &'a Arc<dyn ChannelRegistry>,
    config: &'a BinderConfig,
    plan: CompositionPlan,
}

impl<'a> ResultIntegrator<'a> {
    pub fn new(
        component: &'a str,
        original: &dyn Component,
        entities: &'a dyn EntityRegistry,
        channels: &'a Arc<dyn ChannelRegistry>,
        config: &'a BinderConfig,
    ) -> Self {
        Self {
            component,
            entities,
            channels,
            config,
            plan: CompositionPlan::new(component, original),
        }
    }

    pub fn accept(&mut self, record: ScanRecord) -> Result<(), BindingError> {
        let ScanRecord {
            method,
            marker,
            result,
        } = record;
        match result {
            ProcessingResult::Standalone(entity) => {
                self.register_entity(&method, &marker.kind, entity)
            }
            ProcessingResult::Capability(delegate) => self.add_delegate(delegate),
        }
    }

    fn register_entity(
        &self,
        method: &str,
        kind: &AnnotationKind,
        entity: Arc<dyn Endpoint>,
    ) -> Result<(), BindingError> {
        let name = generate_entity_name(self.entities, self.component, method, kind);
        if let Some(aware) = entity.as_name_aware() {
            aware.set_name(&name);
        }
        if self.config.inject_entity_transport {
            if let Some(aware) = entity.as_channel_registry_aware() {
                aware.set_channel_registry(self.channels.clone());
            }
        }
        self.entities.register(&name, entity)?;
        log::info!("Registered endpoint '{}'", name);
        Ok(())
    }

    fn add_delegate(&mut self, delegate: Arc<dyn Invocable>) -> Result<(), BindingError> {
        let accepted = self
            .plan
            .claim(delegate.clone(), &self.config.capability_namespace)?;
        if !accepted {
            log::warn!(
                "Capability delegate on '{}' exposes no interface in namespace '{}'; not composed",
                self.component,
                self.config.capability_namespace
            );
        }
        if let Some(aware) = delegate.as_channel_registry_aware() {
            aware.set_channel_registry(self.channels.clone());
        }
        Ok(())
    }

    /// Finish the pass and return the canonical instance.
    pub fn finish(self, original: Arc<dyn Component>) -> Arc<dyn Component> {
        self.plan.compose(original)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
