//! Binder errors.
//!
//! Every variant is fatal for the component being processed; post-processing
//! runs during start-up, so these surface as configuration faults.

use thiserror::Error;

use crate::annotations::{AnnotationKind, InterfaceId};
use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum BindingError {
    /// A collaborator the binder cannot work without was not supplied.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// Two capability delegates (or a delegate and the original instance)
    /// claim the same interface.
    #[error("interface [{interface}] is already claimed on component '{component}'")]
    InterfaceAlreadyClaimed {
        interface: InterfaceId,
        component: String,
    },

    /// A role processor failed.
    #[error("{kind} processor failed for {component}.{method}")]
    Processor {
        kind: AnnotationKind,
        component: String,
        method: String,
        #[source]
        source: anyhow::Error,
    },

    /// The entity registry refused a registration.
    #[error(transparent)]
    Registration(#[from] RegistryError),

    /// The container already holds a component under this name.
    #[error("component '{0}' is already registered")]
    DuplicateComponent(String),

    /// Binder configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for BindingError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for BindingError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(e.to_string())
    }
}
