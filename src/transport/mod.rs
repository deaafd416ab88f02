//! Message transport reference handed to transport-aware components.
//!
//! The binder never delivers messages. It only passes a shared
//! [`ChannelRegistry`] to every instance, delegate or entity that exposes
//! [`ChannelRegistryAware`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Registry of named message channels (the transport).
pub trait ChannelRegistry: Send + Sync {
    fn contains_channel(&self, name: &str) -> bool;

    /// Registered channel names, sorted.
    fn channel_names(&self) -> Vec<String>;
}

/// Optional capability: receive the transport reference.
///
/// Setters take `&self`; implementers keep the reference behind interior
/// mutability since components are shared.
pub trait ChannelRegistryAware: Send + Sync {
    fn set_channel_registry(&self, registry: Arc<dyn ChannelRegistry>);
}

/// In-memory channel registry.
#[derive(Default)]
pub struct SimpleChannelRegistry {
    channels: RwLock<BTreeSet<String>>,
}

impl SimpleChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with `names`.
    pub fn with_channels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: RwLock::new(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Add a channel. Returns `false` if it already existed.
    pub fn add_channel(&self, name: impl Into<String>) -> bool {
        self.channels.write().insert(name.into())
    }
}

impl ChannelRegistry for SimpleChannelRegistry {
    fn contains_channel(&self, name: &str) -> bool {
        self.channels.read().contains(name)
    }

    fn channel_names(&self) -> Vec<String> {
        self.channels.read().iter().cloned().collect()
    }
}

impl fmt::Debug for SimpleChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleChannelRegistry")
            .field("channels", &self.channels.read().len())
            .finish()
    }
}

/// Slot holding an injected transport reference.
///
/// Convenience for [`ChannelRegistryAware`] implementers.
#[derive(Default)]
pub struct ChannelRegistrySlot {
    inner: RwLock<Option<Arc<dyn ChannelRegistry>>>,
}

impl ChannelRegistrySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, registry: Arc<dyn ChannelRegistry>) {
        *self.inner.write() = Some(registry);
    }

    pub fn get(&self) -> Option<Arc<dyn ChannelRegistry>> {
        self.inner.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }
}

impl fmt::Debug for ChannelRegistrySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistrySlot")
            .field("set", &self.is_set())
            .finish()
    }
}
