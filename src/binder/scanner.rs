//! Method scanner: walks a component's methods and dispatches every
//! registered marker to its processor.

use std::sync::Arc;

use super::BindingError;
use crate::annotations::{Annotation, MetadataResolver};
use crate::component::Component;
use crate::processors::{ProcessingResult, ProcessorRegistry};

/// One non-empty processor result.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    pub method: String,
    pub marker: Annotation,
    pub result: ProcessingResult,
}

pub struct MethodScanner<'a> {
    processors: &'a ProcessorRegistry,
    resolver: &'a dyn MetadataResolver,
}

impl<'a> MethodScanner<'a> {
    pub fn new(processors: &'a ProcessorRegistry, resolver: &'a dyn MetadataResolver) -> Self {
        Self {
            processors,
            resolver,
        }
    }

    /// Scan `instance`, registered as `name`.
    ///
    /// Every declaration is visited, overloads included. Markers without a
    /// processor are skipped, as are `None` results. The first processor
    /// error aborts the scan.
    pub fn scan(
        &self,
        instance: &Arc<dyn Component>,
        name: &str,
    ) -> Result<Vec<ScanRecord>, BindingError> {
        let ty = instance.descriptor();
        let mut records = Vec::new();

        for method in self.resolver.methods(ty) {
            for marker in self.resolver.method_annotations(ty, method) {
                let Some(processor) = self.processors.get(&marker.kind) else {
                    continue;
                };
                log::debug!("Processing @{} on {}.{}", marker.kind, name, method.name);

                let result = processor
                    .process(instance, name, &method.name, &marker)
                    .map_err(|source| BindingError::Processor {
                        kind: marker.kind.clone(),
                        component: name.to_string(),
                        method: method.name.clone(),
                        source,
                    })?;

                if let Some(result) = result {
                    records.push(ScanRecord {
                        method: method.name.clone(),
                        marker,
                        result,
                    });
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{
        DeclaredMetadataResolver, InterfaceId, MethodDescriptor, TypeDescriptor, SPLITTER,
        TRANSFORMER,
    };
    use crate::component::{Invocable, Invocation, InvocationError};
    use serde_json::Value;

    struct Fixture(TypeDescriptor);

    impl Invocable for Fixture {
        fn interfaces(&self) -> Vec<InterfaceId> {
            self.0.interface_ids()
        }

        fn invoke(&self, call: &Invocation) -> Result<Value, InvocationError> {
            Err(InvocationError::unknown_method(call))
        }
    }

    impl Component for Fixture {
        fn descriptor(&self) -> &TypeDescriptor {
            &self.0
        }
    }

    fn fixture() -> Arc<dyn Component> {
        let base = TypeDescriptor::new("app.Base")
            .method(MethodDescriptor::new("audit").annotated(Annotation::new(TRANSFORMER)));
        Arc::new(Fixture(
            TypeDescriptor::new("app.OrderService")
                .method(
                    MethodDescriptor::new("split")
                        .annotated(Annotation::new(SPLITTER))
                        .annotated(Annotation::new(TRANSFORMER))
                        .annotated(Annotation::new("Deprecated")),
                )
                .method(MethodDescriptor::new("total"))
                .extends(base),
        ))
    }

    #[test]
    fn test_scan_collects_every_registered_marker() {
        let registry = ProcessorRegistry::with_defaults();
        let records = MethodScanner::new(&registry, &DeclaredMetadataResolver)
            .scan(&fixture(), "order-service")
            .unwrap();

        let seen: Vec<(String, String)> = records
            .iter()
            .map(|r| (r.method.clone(), r.marker.kind.to_string()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("split".to_string(), SPLITTER.to_string()),
                ("split".to_string(), TRANSFORMER.to_string()),
                ("audit".to_string(), TRANSFORMER.to_string()),
            ]
        );
        assert!(records.iter().all(|r| r.result.is_standalone()));
    }

    #[test]
    fn test_scan_visits_every_overload() {
        let ty = TypeDescriptor::new("app.OrderService")
            .method(MethodDescriptor::new("split").annotated(Annotation::new(SPLITTER)))
            .method(
                MethodDescriptor::new("split")
                    .with_params(["Batch"])
                    .annotated(Annotation::new(SPLITTER)),
            );
        let instance: Arc<dyn Component> = Arc::new(Fixture(ty));

        let registry = ProcessorRegistry::with_defaults();
        let records = MethodScanner::new(&registry, &DeclaredMetadataResolver)
            .scan(&instance, "order-service")
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.method == "split"));
    }

    #[test]
    fn test_scan_skips_none_results_and_unregistered_kinds() {
        fn nothing(
            _: &Arc<dyn Component>,
            _: &str,
            _: &str,
            _: &Annotation,
        ) -> anyhow::Result<Option<ProcessingResult>> {
            Ok(None)
        }

        let registry = ProcessorRegistry::builder()
            .register(SPLITTER, nothing)
            .build();
        let records = MethodScanner::new(&registry, &DeclaredMetadataResolver)
            .scan(&fixture(), "order-service")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_scan_propagates_processor_error() {
        fn failing(
            _: &Arc<dyn Component>,
            _: &str,
            method: &str,
            _: &Annotation,
        ) -> anyhow::Result<Option<ProcessingResult>> {
            anyhow::bail!("no transformer for {}", method)
        }

        let registry = ProcessorRegistry::builder()
            .register(TRANSFORMER, failing)
            .build();
        let err = MethodScanner::new(&registry, &DeclaredMetadataResolver)
            .scan(&fixture(), "order-service")
            .unwrap_err();

        match err {
            BindingError::Processor {
                kind,
                component,
                method,
                source,
            } => {
                assert_eq!(kind.as_str(), TRANSFORMER);
                assert_eq!(component, "order-service");
                assert_eq!(method, "split");
                assert_eq!(source.to_string(), "no transformer for split");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
