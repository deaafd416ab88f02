//! Composite component unifying an original instance with capability
//! delegates.
//!
//! Dispatch is an explicit table from interface to delegate; any call on an
//! interface no delegate claimed falls back to the original instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Component, Invocable, Invocation, InvocationError};
use crate::annotations::{InterfaceId, TypeDescriptor};
use crate::transport::ChannelRegistryAware;

/// The replacement instance produced by composition.
pub struct ComposedComponent {
    target: Arc<dyn Component>,
    delegates: Vec<Arc<dyn Invocable>>,
    /// Interface → index into `delegates`.
    routes: HashMap<InterfaceId, usize>,
    /// Claimed interfaces in claim order.
    introduced: Vec<InterfaceId>,
}

impl ComposedComponent {
    /// Wrap `target` with no delegates yet.
    pub fn new(target: Arc<dyn Component>) -> Self {
        Self {
            target,
            delegates: Vec::new(),
            routes: HashMap::new(),
            introduced: Vec::new(),
        }
    }

    /// Route `interfaces` to `delegate`.
    ///
    /// Callers are responsible for conflict checking; a later route for the
    /// same interface replaces the earlier one.
    pub fn with_delegate(
        mut self,
        delegate: Arc<dyn Invocable>,
        interfaces: impl IntoIterator<Item = InterfaceId>,
    ) -> Self {
        let index = self.delegates.len();
        self.delegates.push(delegate);
        for iface in interfaces {
            if self.routes.insert(iface.clone(), index).is_none() {
                self.introduced.push(iface);
            }
        }
        self
    }

    /// The wrapped original instance.
    pub fn target(&self) -> &Arc<dyn Component> {
        &self.target
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    /// Interfaces contributed by delegates.
    pub fn introduced_interfaces(&self) -> &[InterfaceId] {
        &self.introduced
    }

    /// The delegate serving `interface`, if any.
    pub fn delegate_for(&self, interface: &InterfaceId) -> Option<&Arc<dyn Invocable>> {
        self.routes.get(interface).map(|&i| &self.delegates[i])
    }
}

impl Invocable for ComposedComponent {
    fn interfaces(&self) -> Vec<InterfaceId> {
        let mut interfaces = self.target.interfaces();
        for iface in &self.introduced {
            if !interfaces.contains(iface) {
                interfaces.push(iface.clone());
            }
        }
        interfaces
    }

    fn implements(&self, interface: &InterfaceId) -> bool {
        self.routes.contains_key(interface) || self.target.implements(interface)
    }

    fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError> {
        match self.delegate_for(&call.interface) {
            Some(delegate) => delegate.invoke(call),
            None => self.target.invoke(call),
        }
    }

    fn as_channel_registry_aware(&self) -> Option<&dyn ChannelRegistryAware> {
        self.target.as_channel_registry_aware()
    }
}

impl Component for ComposedComponent {
    fn descriptor(&self) -> &TypeDescriptor {
        self.target.descriptor()
    }
}

impl fmt::Debug for ComposedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedComponent")
            .field("target", &self.target.descriptor().name)
            .field("delegates", &self.delegates.len())
            .field("introduced", &self.introduced)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Service {
        descriptor: TypeDescriptor,
    }

    impl Service {
        fn new() -> Self {
            Self {
                descriptor: TypeDescriptor::new("app.RouterService")
                    .implements(TypeDescriptor::new("app.api.Lifecycle")),
            }
        }
    }

    impl Invocable for Service {
        fn interfaces(&self) -> Vec<InterfaceId> {
            self.descriptor.interface_ids()
        }

        fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError> {
            if !self.implements(&call.interface) {
                return Err(InvocationError::UnsupportedInterface(
                    call.interface.clone(),
                ));
            }
            Ok(json!(format!("service:{}", call.method)))
        }
    }

    impl Component for Service {
        fn descriptor(&self) -> &TypeDescriptor {
            &self.descriptor
        }
    }

    struct Tagged(&'static str, &'static str);

    impl Invocable for Tagged {
        fn interfaces(&self) -> Vec<InterfaceId> {
            vec![InterfaceId::new(self.0)]
        }

        fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError> {
            Ok(json!(format!("{}:{}", self.1, call.method)))
        }
    }

    fn tagged(interface: &'static str, tag: &'static str) -> (Arc<dyn Invocable>, InterfaceId) {
        (Arc::new(Tagged(interface, tag)), InterfaceId::new(interface))
    }

    fn composed_over(target: Arc<dyn Component>) -> ComposedComponent {
        let (a, a_id) = tagged("integration.A", "a");
        let (b, b_id) = tagged("integration.B", "b");
        ComposedComponent::new(target)
            .with_delegate(a, [a_id])
            .with_delegate(b, [b_id])
    }

    fn composed() -> ComposedComponent {
        composed_over(Arc::new(Service::new()))
    }

    #[test]
    fn test_composite_interfaces() {
        let c = composed();
        let ids: Vec<String> = c.interfaces().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            ids,
            vec!["app.api.Lifecycle", "integration.A", "integration.B"]
        );
        assert!(c.implements(&"app.api.Lifecycle".into()));
        assert!(c.implements(&"integration.A".into()));
        assert!(c.implements(&"integration.B".into()));
        assert!(!c.implements(&"integration.C".into()));
        assert_eq!(c.delegate_count(), 2);
    }

    #[test]
    fn test_composite_dispatch() {
        let c = composed();
        let route = |interface: &str| c.invoke(&Invocation::new(interface, "route"));
        assert_eq!(route("integration.A").unwrap(), json!("a:route"));
        assert_eq!(route("integration.B").unwrap(), json!("b:route"));

        let start = Invocation::new("app.api.Lifecycle", "start");
        assert_eq!(c.invoke(&start).unwrap(), json!("service:start"));
        assert!(matches!(
            c.invoke(&Invocation::new("integration.C", "route")),
            Err(InvocationError::UnsupportedInterface(_))
        ));
    }

    #[test]
    fn test_composite_is_transparent() {
        let original: Arc<dyn Component> = Arc::new(Service::new());
        let c = composed_over(original.clone());
        assert!(Arc::ptr_eq(c.target(), &original));
        assert_eq!(c.descriptor().name, "app.RouterService");
        assert!(c.as_channel_registry_aware().is_none());
        assert!(c.delegate_for(&"app.api.Lifecycle".into()).is_none());
        let debug = format!("{:?}", c);
        assert!(debug.contains("app.RouterService"));
    }
}
