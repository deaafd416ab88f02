//! Type and method metadata, and effective-annotation resolution.
//!
//! A [`TypeDescriptor`] is the explicit metadata a component publishes about
//! its concrete type: declared annotations, implemented interfaces, the
//! superclass chain and declared methods. Interfaces are descriptors too, so
//! they can carry their own annotations and method declarations.
//!
//! The [`MetadataResolver`] trait merges these declarations into the
//! effective annotation set the binder works with.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Annotation, AnnotationKind};

// ---------------------------------------------------------------------------
// InterfaceId
// ---------------------------------------------------------------------------

/// Identity of an interface (capability contract), as a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceId(String);

impl InterfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this interface lives in `namespace` or one of its children.
    ///
    /// Matches on whole path segments: `integration.router.Router` is in
    /// `integration`, `integrationx.Router` is not.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        let namespace = namespace.trim_end_matches('.');
        if namespace.is_empty() {
            return true;
        }
        match self.0.strip_prefix(namespace) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterfaceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A method declaration and the markers attached to it.
///
/// `params` lists the parameter types. Declarations with the same name and
/// parameter list override each other along the hierarchy; same-named
/// declarations with different parameters are distinct overloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Same name and parameter list.
    pub fn same_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name && self.params == other.params
    }
}

/// Metadata of a concrete type or an interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully qualified name; for interfaces this is the [`InterfaceId`].
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Directly implemented interfaces (for an interface: its super-interfaces).
    #[serde(default)]
    pub interfaces: Vec<TypeDescriptor>,
    #[serde(default)]
    pub superclass: Option<Box<TypeDescriptor>>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn extends(mut self, superclass: TypeDescriptor) -> Self {
        self.superclass = Some(Box::new(superclass));
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// This type followed by its superclass chain, most specific first.
    pub fn hierarchy(&self) -> Vec<&TypeDescriptor> {
        let mut chain = vec![self];
        let mut current = self.superclass.as_deref();
        while let Some(ty) = current {
            chain.push(ty);
            current = ty.superclass.as_deref();
        }
        chain
    }

    /// Every interface implemented anywhere in the hierarchy, including
    /// super-interfaces, without duplicates.
    pub fn all_interfaces(&self) -> Vec<&TypeDescriptor> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for ty in self.hierarchy() {
            collect_interfaces(&ty.interfaces, &mut seen, &mut out);
        }
        out
    }

    /// Identities of [`all_interfaces`](Self::all_interfaces).
    pub fn interface_ids(&self) -> Vec<InterfaceId> {
        self.all_interfaces()
            .into_iter()
            .map(|iface| InterfaceId::new(iface.name.clone()))
            .collect()
    }

    /// Whether `method` is one of this level's own declarations.
    pub fn declares(&self, method: &MethodDescriptor) -> bool {
        self.methods.iter().any(|m| std::ptr::eq(m, method))
    }
}

fn is_overridden(more_specific: &[&MethodDescriptor], method: &MethodDescriptor) -> bool {
    more_specific.iter().any(|m| m.same_signature(method))
}

fn collect_interfaces<'a>(
    interfaces: &'a [TypeDescriptor],
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<&'a TypeDescriptor>,
) {
    for iface in interfaces {
        if seen.insert(iface.name.as_str()) {
            out.push(iface);
            collect_interfaces(&iface.interfaces, seen, out);
        }
    }
}

// ---------------------------------------------------------------------------
// MetadataResolver
// ---------------------------------------------------------------------------

/// Resolves the annotations the binder acts on.
pub trait MetadataResolver: Send + Sync {
    /// Own annotations of `ty` plus those declared on the interfaces it
    /// directly implements.
    fn type_annotations(&self, ty: &TypeDescriptor) -> Vec<Annotation>;

    /// Method declarations of `ty` and its superclass chain, most specific
    /// first. A declaration overridden further down the chain is left out;
    /// overloads are all kept.
    fn methods<'t>(&self, ty: &'t TypeDescriptor) -> Vec<&'t MethodDescriptor>;

    /// Effective annotation set of `method`, one of the declarations
    /// returned by [`methods`](Self::methods).
    fn method_annotations(
        &self,
        ty: &TypeDescriptor,
        method: &MethodDescriptor,
    ) -> Vec<Annotation>;
}

/// Resolver working purely from declared descriptor metadata.
///
/// A method's effective set is its own markers, all kept, followed by the
/// markers of overridden declarations further up the superclass chain and
/// of matching declarations in implemented interfaces. Inherited markers are
/// added only for kinds no more specific level already carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMetadataResolver;

impl MetadataResolver for DeclaredMetadataResolver {
    fn type_annotations(&self, ty: &TypeDescriptor) -> Vec<Annotation> {
        let mut annotations = ty.annotations.clone();
        for iface in &ty.interfaces {
            annotations.extend(iface.annotations.iter().cloned());
        }
        annotations
    }

    fn methods<'t>(&self, ty: &'t TypeDescriptor) -> Vec<&'t MethodDescriptor> {
        let mut methods: Vec<&MethodDescriptor> = Vec::new();
        for level in ty.hierarchy() {
            let more_specific = methods.len();
            for method in &level.methods {
                if !is_overridden(&methods[..more_specific], method) {
                    methods.push(method);
                }
            }
        }
        methods
    }

    fn method_annotations(
        &self,
        ty: &TypeDescriptor,
        method: &MethodDescriptor,
    ) -> Vec<Annotation> {
        let hierarchy = ty.hierarchy();
        let own_level = hierarchy.iter().position(|level| level.declares(method));
        let inherited = hierarchy
            .into_iter()
            .skip(own_level.map_or(0, |i| i + 1))
            .chain(ty.all_interfaces());

        let mut effective = method.annotations.clone();
        for level in inherited {
            let present: HashSet<AnnotationKind> =
                effective.iter().map(|a| a.kind.clone()).collect();
            for declaration in level.methods.iter().filter(|m| m.same_signature(method)) {
                effective.extend(
                    declaration
                        .annotations
                        .iter()
                        .filter(|a| !present.contains(&a.kind))
                        .cloned(),
                );
            }
        }
        effective
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
