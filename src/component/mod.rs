//! Managed components, standalone endpoints and their optional capabilities.
//!
//! Every call into a component goes through an explicit [`Invocation`]
//! naming the interface and method, so a [`ComposedComponent`] can route
//! calls between the original instance and the capability delegates merged
//! onto it.

pub mod composite;

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::annotations::{InterfaceId, TypeDescriptor};
use crate::transport::ChannelRegistryAware;

pub use composite::ComposedComponent;

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A call addressed to one method of one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub interface: InterfaceId,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn new(interface: impl Into<InterfaceId>, method: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            method: method.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

/// Failure to dispatch or execute an [`Invocation`].
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("interface [{0}] is not implemented")]
    UnsupportedInterface(InterfaceId),

    #[error("no method '{method}' on interface [{interface}]")]
    UnknownMethod {
        interface: InterfaceId,
        method: String,
    },

    #[error("invocation failed: {0}")]
    Failed(String),
}

impl InvocationError {
    pub fn unknown_method(call: &Invocation) -> Self {
        Self::UnknownMethod {
            interface: call.interface.clone(),
            method: call.method.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Anything that exposes interfaces and answers invocations on them.
///
/// Capability delegates implement only this; managed components add a
/// type descriptor on top (see [`Component`]).
pub trait Invocable: Send + Sync {
    /// Interfaces this object implements.
    fn interfaces(&self) -> Vec<InterfaceId>;

    fn implements(&self, interface: &InterfaceId) -> bool {
        self.interfaces().contains(interface)
    }

    fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError>;

    /// Transport-aware capability, if supported.
    fn as_channel_registry_aware(&self) -> Option<&dyn ChannelRegistryAware> {
        None
    }
}

/// A managed component instance owned by the container.
pub trait Component: Invocable {
    /// Metadata of the real implementing type.
    ///
    /// Wrappers must return the wrapped instance's descriptor so that
    /// inspection sees through them.
    fn descriptor(&self) -> &TypeDescriptor;
}

/// Optional capability: receive the generated registration name.
pub trait NameAware: Send + Sync {
    fn set_name(&self, name: &str);
}

/// A freestanding addressable object, registered under its own name.
pub trait Endpoint: Send + Sync {
    fn as_name_aware(&self) -> Option<&dyn NameAware> {
        None
    }

    fn as_channel_registry_aware(&self) -> Option<&dyn ChannelRegistryAware> {
        None
    }

    /// Concrete access for callers that know the endpoint type.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl Invocable for Echo {
        fn interfaces(&self) -> Vec<InterfaceId> {
            vec![InterfaceId::new("app.Echo")]
        }

        fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError> {
            match call.method.as_str() {
                "echo" => Ok(call.arg(0).cloned().unwrap_or(Value::Null)),
                _ => Err(InvocationError::unknown_method(call)),
            }
        }
    }

    #[test]
    fn test_invocable_defaults() {
        let echo = Echo;
        assert!(echo.implements(&"app.Echo".into()));
        assert!(!echo.implements(&"app.Other".into()));
        assert!(echo.as_channel_registry_aware().is_none());

        let out = echo
            .invoke(&Invocation::new("app.Echo", "echo").with_arg(json!({"id": 7})))
            .unwrap();
        assert_eq!(out, json!({"id": 7}));
    }

    #[test]
    fn test_unknown_method_error() {
        let err = Echo.invoke(&Invocation::new("app.Echo", "shout")).unwrap_err();
        assert_eq!(err.to_string(), "no method 'shout' on interface [app.Echo]");
    }
}
