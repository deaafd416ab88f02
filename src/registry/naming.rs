//! Collision-free names for entities created from annotated methods.

use super::EntityRegistry;
use crate::annotations::AnnotationKind;

/// Base name for an entity produced by `method` of `component` under `kind`:
/// `"<component>.<method>.<KindShortName>"`.
pub fn base_entity_name(component: &str, method: &str, kind: &AnnotationKind) -> String {
    format!("{}.{}.{}", component, method, kind.short_name())
}

/// Generate the first unregistered name for a new entity.
///
/// Returns the base name if free, otherwise `base#2`, `base#3`, ... The
/// registry is finite and each attempt advances the counter, so this
/// terminates.
pub fn generate_entity_name(
    registry: &dyn EntityRegistry,
    component: &str,
    method: &str,
    kind: &AnnotationKind,
) -> String {
    let base = base_entity_name(component, method, kind);
    let mut name = base.clone();
    let mut count = 1u64;
    while registry.contains_name(&name) {
        count += 1;
        name = format!("{}#{}", base, count);
    }
    name
}
