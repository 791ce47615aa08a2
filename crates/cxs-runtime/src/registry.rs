//! Condition type and handler registries
//!
//! Both registries are populated and depopulated as plugins load and unload
//! while dispatch calls are in flight. Every entry remembers the plugin that
//! registered it so a plugin can be removed in one step.

use cxs_core::ConditionType;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Plugin id used for entries registered without an explicit plugin
pub const DEFAULT_PLUGIN: &str = "default";

/// Source of condition type descriptors
pub trait ConditionTypeRegistry: Send + Sync {
    fn lookup(&self, condition_type_id: &str) -> Option<Arc<ConditionType>>;
}

struct Entry<T: ?Sized> {
    plugin: String,
    value: Arc<T>,
}

/// Thread-safe map of key -> value, owned per plugin.
///
/// The map sits behind one lock so that removing a plugin is atomic for
/// concurrent readers: a lookup sees either all or none of its entries.
struct PluginMap<T: ?Sized> {
    entries: RwLock<HashMap<String, Entry<T>>>,
}

impl<T: ?Sized> PluginMap<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, plugin: &str, key: String, value: Arc<T>) -> Option<Arc<T>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                Entry {
                    plugin: plugin.to_string(),
                    value,
                },
            )
            .map(|previous| previous.value)
    }

    fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|entry| entry.value.clone())
    }

    fn remove(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|entry| entry.value)
    }

    fn remove_plugin(&self, plugin: &str) -> Vec<String> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.plugin == plugin)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &removed {
            entries.remove(key);
        }
        removed.sort();
        removed
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// In-memory condition type registry
pub struct InMemoryConditionTypeRegistry {
    types: PluginMap<ConditionType>,
}

impl InMemoryConditionTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: PluginMap::new(),
        }
    }

    pub fn register(&self, condition_type: ConditionType) -> Arc<ConditionType> {
        self.register_for_plugin(DEFAULT_PLUGIN, condition_type)
    }

    /// Register a condition type owned by a plugin, replacing any type with
    /// the same id
    pub fn register_for_plugin(&self, plugin: &str, condition_type: ConditionType) -> Arc<ConditionType> {
        let condition_type = Arc::new(condition_type);
        if self
            .types
            .insert(plugin, condition_type.id.clone(), condition_type.clone())
            .is_some()
        {
            tracing::debug!(
                condition_type = %condition_type.id,
                plugin,
                "Replaced condition type"
            );
        }
        condition_type
    }

    pub fn unregister(&self, condition_type_id: &str) -> Option<Arc<ConditionType>> {
        self.types.remove(condition_type_id)
    }

    /// Remove every condition type registered by a plugin, returning their ids
    pub fn remove_plugin(&self, plugin: &str) -> Vec<String> {
        self.types.remove_plugin(plugin)
    }

    pub fn ids(&self) -> Vec<String> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryConditionTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionTypeRegistry for InMemoryConditionTypeRegistry {
    fn lookup(&self, condition_type_id: &str) -> Option<Arc<ConditionType>> {
        self.types.get(condition_type_id)
    }
}

impl fmt::Debug for InMemoryConditionTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryConditionTypeRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Registry of evaluators or query builders keyed by handler key
pub struct HandlerRegistry<H: ?Sized> {
    handlers: PluginMap<H>,
}

impl<H: ?Sized> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self {
            handlers: PluginMap::new(),
        }
    }

    pub fn add(&self, key: impl Into<String>, handler: Arc<H>) {
        self.add_for_plugin(DEFAULT_PLUGIN, key, handler);
    }

    /// Register a handler owned by a plugin, replacing any handler with the
    /// same key
    pub fn add_for_plugin(&self, plugin: &str, key: impl Into<String>, handler: Arc<H>) {
        let key = key.into();
        if self.handlers.insert(plugin, key.clone(), handler).is_some() {
            tracing::debug!(key = %key, plugin, "Replaced handler");
        }
    }

    pub fn remove(&self, key: &str) -> Option<Arc<H>> {
        self.handlers.remove(key)
    }

    /// Remove every handler registered by a plugin, returning their keys
    pub fn remove_plugin(&self, plugin: &str) -> Vec<String> {
        self.handlers.remove_plugin(plugin)
    }

    pub fn get(&self, key: &str) -> Option<Arc<H>> {
        self.handlers.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.handlers.keys()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
