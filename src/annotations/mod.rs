//! Annotation markers and the catalog of annotation kinds.
//!
//! A marker is a tagged declaration attached to a type or a method. Its
//! [`AnnotationKind`] is the dispatch key into the processor registry; its
//! attributes carry kind-specific metadata the binder never interprets.
//!
//! The [`AnnotationCatalog`] records which kinds are themselves annotated
//! with other kinds (meta-annotations), e.g. a custom `Gateway` stereotype
//! that carries `Component`.

pub mod metadata;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use metadata::{
    DeclaredMetadataResolver, InterfaceId, MetadataResolver, MethodDescriptor, TypeDescriptor,
};

// ---------------------------------------------------------------------------
// AnnotationKind
// ---------------------------------------------------------------------------

/// Type identity of an annotation marker.
///
/// Either a bare name (`"Transformer"`) or a qualified path
/// (`"integration::annotation::Transformer"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationKind(String);

impl AnnotationKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Full identifier as declared.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used when generating entity names.
    ///
    /// `"integration::annotation::Splitter"` and `"integration.Splitter"`
    /// both yield `"Splitter"`.
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit([':', '.'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AnnotationKind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Well-known kinds
// ---------------------------------------------------------------------------

/// Stereotype marking a type as a managed component.
pub const COMPONENT: &str = "Component";
pub const AGGREGATOR: &str = "Aggregator";
pub const CHANNEL_ADAPTER: &str = "ChannelAdapter";
pub const ROUTER: &str = "Router";
pub const SERVICE_ACTIVATOR: &str = "ServiceActivator";
pub const SPLITTER: &str = "Splitter";
pub const TRANSFORMER: &str = "Transformer";

/// Role-marker kinds handled by the built-in processors.
pub static STANDARD_ROLE_KINDS: Lazy<Vec<AnnotationKind>> = Lazy::new(|| {
    [
        AGGREGATOR,
        CHANNEL_ADAPTER,
        ROUTER,
        SERVICE_ACTIVATOR,
        SPLITTER,
        TRANSFORMER,
    ]
    .into_iter()
    .map(AnnotationKind::new)
    .collect()
});

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// A marker attached to a type or method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Kind-specific metadata (e.g. `input_channel`).
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl Annotation {
    pub fn new(kind: impl Into<AnnotationKind>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute, `None` if absent, non-string or empty.
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_str() == kind
    }
}

// ---------------------------------------------------------------------------
// AnnotationCatalog
// ---------------------------------------------------------------------------

/// Declarations of annotation kinds and the meta-annotations they carry.
///
/// Built once at start-up and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCatalog {
    meta: HashMap<AnnotationKind, HashSet<AnnotationKind>>,
}

impl AnnotationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that annotation kind `kind` is itself annotated with `meta`.
    pub fn declare_meta(
        mut self,
        kind: impl Into<AnnotationKind>,
        meta: impl Into<AnnotationKind>,
    ) -> Self {
        self.meta
            .entry(kind.into())
            .or_default()
            .insert(meta.into());
        self
    }

    /// Whether `kind` is directly meta-annotated with `meta`.
    ///
    /// Only one level is consulted: a kind carrying a kind that carries
    /// `meta` does not count.
    pub fn is_meta_annotated(&self, kind: &AnnotationKind, meta: &AnnotationKind) -> bool {
        self.meta
            .get(kind)
            .is_some_and(|metas| metas.contains(meta))
    }

    /// `kind` equals `target` or is meta-annotated with it.
    pub fn qualifies_as(&self, kind: &AnnotationKind, target: &AnnotationKind) -> bool {
        kind == target || self.is_meta_annotated(kind, target)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_name() {
        assert_eq!(
            AnnotationKind::new("Transformer").short_name(),
            "Transformer"
        );
        assert_eq!(
            AnnotationKind::new("integration::annotation::Splitter").short_name(),
            "Splitter"
        );
        assert_eq!(
            AnnotationKind::new("integration.Router").short_name(),
            "Router"
        );
    }

    #[test]
    fn test_annotation_attributes() {
        let ann = Annotation::new(TRANSFORMER)
            .with_attribute("input_channel", "in")
            .with_attribute("output_channel", "")
            .with_attribute("order", json!(3));
        assert!(ann.is(TRANSFORMER));
        assert_eq!(ann.str_attribute("input_channel"), Some("in"));
        assert_eq!(ann.str_attribute("output_channel"), None);
        assert_eq!(ann.str_attribute("order"), None);
        assert_eq!(ann.attribute("order"), Some(&json!(3)));
    }

    #[test]
    fn test_catalog_meta_is_single_level() {
        let catalog = AnnotationCatalog::new()
            .declare_meta("Service", COMPONENT)
            .declare_meta("OrderService", "Service");
        let component = AnnotationKind::new(COMPONENT);

        assert!(catalog.qualifies_as(&component, &component));
        assert!(catalog.qualifies_as(&"Service".into(), &component));
        assert!(!catalog.qualifies_as(&"OrderService".into(), &component));
        assert!(!catalog.qualifies_as(&"Other".into(), &component));
    }

    #[test]
    fn test_annotation_deserialize() {
        let ann: Annotation = serde_json::from_value(json!({
            "kind": "Router",
            "attributes": {"input_channel": "orders"}
        }))
        .unwrap();
        assert_eq!(ann.kind, AnnotationKind::new(ROUTER));
        assert_eq!(ann.str_attribute("input_channel"), Some("orders"));

        let bare: Annotation = serde_json::from_value(json!({"kind": "Splitter"})).unwrap();
        assert!(bare.attributes.is_empty());
    }

    #[test]
    fn test_standard_role_kinds() {
        assert_eq!(STANDARD_ROLE_KINDS.len(), 6);
        assert!(STANDARD_ROLE_KINDS.contains(&AnnotationKind::new(SPLITTER)));
        assert!(!STANDARD_ROLE_KINDS.contains(&AnnotationKind::new(COMPONENT)));
    }
}
