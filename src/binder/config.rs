//! Binder configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BindingError;
use crate::annotations::{AnnotationKind, COMPONENT};

/// Settings fixed for the lifetime of an [`AnnotationBinder`](super::AnnotationBinder).
///
/// # Attributes
///
/// * `stereotype` - Marker kind that makes a component eligible.
/// * `capability_namespace` - Only delegate interfaces in this namespace are
///   composed onto the original instance.
/// * `inject_entity_transport` - Hand the transport to transport-aware
///   standalone entities as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    pub stereotype: AnnotationKind,
    pub capability_namespace: String,
    pub inject_entity_transport: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            stereotype: AnnotationKind::new(COMPONENT),
            capability_namespace: "integration".to_string(),
            inject_entity_transport: true,
        }
    }
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML; missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, BindingError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BindingError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<AnnotationKind>) -> Self {
        self.stereotype = stereotype.into();
        self
    }

    pub fn with_capability_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.capability_namespace = namespace.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BinderConfig::new();
        assert_eq!(config.stereotype.as_str(), "Component");
        assert_eq!(config.capability_namespace, "integration");
        assert!(config.inject_entity_transport);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = BinderConfig::from_yaml("capability_namespace: messaging\n").unwrap();
        assert_eq!(config.capability_namespace, "messaging");
        assert_eq!(config.stereotype.as_str(), "Component");
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = BinderConfig::from_yaml("inject_entity_transport: [1, 2]").unwrap_err();
        assert!(matches!(err, BindingError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stereotype: MessageEndpoint").unwrap();
        writeln!(file, "inject_entity_transport: false").unwrap();

        let config = BinderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stereotype.as_str(), "MessageEndpoint");
        assert!(!config.inject_entity_transport);

        assert!(BinderConfig::from_file(file.path().with_extension("missing")).is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = BinderConfig::new()
            .with_stereotype("Service")
            .with_capability_namespace("app.integration");
        assert_eq!(config.stereotype.as_str(), "Service");
        assert_eq!(config.capability_namespace, "app.integration");
    }
}
