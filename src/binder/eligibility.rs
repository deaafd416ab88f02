//! Stereotype check deciding whether a component is scanned at all.

use crate::annotations::{AnnotationCatalog, AnnotationKind, MetadataResolver, TypeDescriptor};

/// Gate in front of the method scanner.
///
/// A type qualifies when one of its own annotations, or one declared on an
/// interface it implements, is the stereotype or is meta-annotated with it.
pub struct StereotypeFilter<'a> {
    stereotype: &'a AnnotationKind,
    catalog: &'a AnnotationCatalog,
    resolver: &'a dyn MetadataResolver,
}

impl<'a> StereotypeFilter<'a> {
    pub fn new(
        stereotype: &'a AnnotationKind,
        catalog: &'a AnnotationCatalog,
        resolver: &'a dyn MetadataResolver,
    ) -> Self {
        Self {
            stereotype,
            catalog,
            resolver,
        }
    }

    pub fn is_eligible(&self, ty: &TypeDescriptor) -> bool {
        self.resolver
            .type_annotations(ty)
            .iter()
            .any(|annotation| self.catalog.qualifies_as(&annotation.kind, self.stereotype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, DeclaredMetadataResolver, COMPONENT};

    fn check(ty: &TypeDescriptor, catalog: &AnnotationCatalog) -> bool {
        let stereotype = AnnotationKind::new(COMPONENT);
        StereotypeFilter::new(&stereotype, catalog, &DeclaredMetadataResolver).is_eligible(ty)
    }

    #[test]
    fn test_direct_stereotype() {
        let ty = TypeDescriptor::new("app.OrderService").annotated(Annotation::new(COMPONENT));
        assert!(check(&ty, &AnnotationCatalog::new()));
    }

    #[test]
    fn test_meta_stereotype() {
        let catalog = AnnotationCatalog::new().declare_meta("MessageEndpoint", COMPONENT);
        let ty =
            TypeDescriptor::new("app.OrderService").annotated(Annotation::new("MessageEndpoint"));
        assert!(check(&ty, &catalog));
        assert!(!check(&ty, &AnnotationCatalog::new()));
    }

    #[test]
    fn test_stereotype_on_interface() {
        let api = TypeDescriptor::new("app.api.Orders").annotated(Annotation::new(COMPONENT));
        let ty = TypeDescriptor::new("app.OrderService").implements(api);
        assert!(check(&ty, &AnnotationCatalog::new()));
    }

    #[test]
    fn test_stereotype_on_superclass_does_not_count() {
        let base = TypeDescriptor::new("app.Base").annotated(Annotation::new(COMPONENT));
        let ty = TypeDescriptor::new("app.OrderService").extends(base);
        assert!(!check(&ty, &AnnotationCatalog::new()));
    }

    #[test]
    fn test_not_eligible_is_stable() {
        let ty = TypeDescriptor::new("app.Plain").annotated(Annotation::new("Deprecated"));
        let catalog = AnnotationCatalog::new();
        assert!(!check(&ty, &catalog));
        assert_eq!(check(&ty, &catalog), check(&ty, &catalog));
    }
}
