// Dweve EDI - Streaming EDI Structural Parser
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry of loop rule tables keyed by standard, document type and version.
//!
//! Constructors are registered up front; the compiled [`PluginTable`] for a
//! key is built on first use and cached. A key without a constructor is not
//! an error: the document is parsed without loop wrapping.

use crate::descriptor::LoopDescriptor;
use crate::plugins;
use crate::table::PluginTable;
use edi_core::Standard;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Longest version string used for lookups.
pub const MAX_VERSION_LEN: usize = 6;

/// Builds the rules of one document type.
pub type PluginConstructor = Box<dyn Fn() -> Vec<LoopDescriptor> + Send + Sync>;

/// Lookup key of a plugin table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey {
    pub standard: Standard,
    pub document: String,
    pub version: Option<String>,
}

impl PluginKey {
    /// Build a key; the version is cut to [`MAX_VERSION_LEN`] characters.
    pub fn new(standard: Standard, document: &str, version: Option<&str>) -> Self {
        Self {
            standard,
            document: document.trim().to_string(),
            version: version
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(normalize_version),
        }
    }

    fn without_version(&self) -> Self {
        Self {
            standard: self.standard,
            document: self.document.clone(),
            version: None,
        }
    }

    fn table_name(&self) -> String {
        match &self.version {
            Some(v) => format!("{}/{}/{}", self.standard.key(), self.document, v),
            None => format!("{}/{}", self.standard.key(), self.document),
        }
    }
}

/// Truncate a version string to [`MAX_VERSION_LEN`] characters.
///
/// Suffixed X12 versions such as `004010X098A1` select the same rules as
/// `004010`.
pub fn normalize_version(version: &str) -> String {
    version.chars().take(MAX_VERSION_LEN).collect()
}

/// Plugin constructors plus a cache of compiled tables.
///
/// # Examples
///
/// ```rust
/// use edi_core::Standard;
/// use edi_loops::{LoopDescriptor, PluginRegistry};
/// use std::sync::Arc;
///
/// let mut registry = PluginRegistry::new();
/// registry.register(Standard::X12, "940", None, || {
///     vec![LoopDescriptor::new("N1", "N1", 1)]
/// });
///
/// let first = registry.lookup(Standard::X12, "940", Some("004010")).unwrap();
/// let second = registry.lookup(Standard::X12, "940", None).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(registry.lookup(Standard::X12, "999", None).is_none());
/// ```
pub struct PluginRegistry {
    constructors: HashMap<PluginKey, PluginConstructor>,
    cache: RwLock<HashMap<PluginKey, Arc<PluginTable>>>,
}

impl PluginRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding the built-in document types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        plugins::register_builtins(&mut registry);
        registry
    }

    /// Shared registry with the built-in document types.
    pub fn global() -> &'static PluginRegistry {
        static GLOBAL: OnceLock<PluginRegistry> = OnceLock::new();
        GLOBAL.get_or_init(PluginRegistry::with_builtins)
    }

    /// Register a constructor. A `None` version applies to every version.
    pub fn register<F>(
        &mut self,
        standard: Standard,
        document: &str,
        version: Option<&str>,
        constructor: F,
    ) where
        F: Fn() -> Vec<LoopDescriptor> + Send + Sync + 'static,
    {
        let key = PluginKey::new(standard, document, version);
        self.cache.get_mut().remove(&key);
        self.constructors.insert(key, Box::new(constructor));
    }

    /// Returns `true` if some constructor serves the document type.
    pub fn contains(&self, standard: Standard, document: &str, version: Option<&str>) -> bool {
        let key = PluginKey::new(standard, document, version);
        self.constructors.contains_key(&key) || self.constructors.contains_key(&key.without_version())
    }

    /// Compiled table for a document type, if one is registered.
    ///
    /// A version-specific constructor is preferred over a version-less one.
    pub fn lookup(
        &self,
        standard: Standard,
        document: &str,
        version: Option<&str>,
    ) -> Option<Arc<PluginTable>> {
        let exact = PluginKey::new(standard, document, version);
        let key = if self.constructors.contains_key(&exact) {
            exact
        } else {
            let fallback = exact.without_version();
            if !self.constructors.contains_key(&fallback) {
                debug!(standard = %standard, document, "no loop plugin, segments stay flat");
                return None;
            }
            fallback
        };

        {
            let cache = self.cache.read();
            if let Some(table) = cache.get(&key) {
                return Some(Arc::clone(table));
            }
        }

        let mut cache = self.cache.write();
        if let Some(table) = cache.get(&key) {
            return Some(Arc::clone(table));
        }

        let constructor = self.constructors.get(&key)?;
        let table = Arc::new(PluginTable::compile(key.table_name(), constructor()));
        debug!(table = table.name(), rules = table.len(), "compiled loop plugin");
        cache.insert(key, Arc::clone(&table));
        Some(table)
    }

    /// Number of compiled tables held.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    /// Drop all compiled tables.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> Vec<&PluginKey> {
        self.constructors.keys().collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("004010X098A1"), "004010");
        assert_eq!(normalize_version("D96A"), "D96A");
    }

    #[test]
    fn test_version_specific_preferred() {
        let mut registry = PluginRegistry::new();
        registry.register(Standard::X12, "850", None, || {
            vec![LoopDescriptor::new("ANY", "N1", 1)]
        });
        registry.register(Standard::X12, "850", Some("005010"), || {
            vec![LoopDescriptor::new("V5", "N1", 1)]
        });

        let v5 = registry
            .lookup(Standard::X12, "850", Some("005010X220A1"))
            .unwrap();
        assert_eq!(v5.candidates("N1")[0].name(), Some("V5"));

        let v4 = registry.lookup(Standard::X12, "850", Some("004010")).unwrap();
        assert_eq!(v4.candidates("N1")[0].name(), Some("ANY"));
        assert_eq!(registry.cached(), 2);
    }

    #[test]
    fn test_missing_is_none() {
        let registry = PluginRegistry::new();
        assert!(registry.lookup(Standard::Edifact, "ORDERS", None).is_none());
        assert_eq!(registry.cached(), 0);
    }

    #[test]
    fn test_register_invalidates_cache() {
        let mut registry = PluginRegistry::new();
        registry.register(Standard::X12, "810", None, Vec::new);
        registry.lookup(Standard::X12, "810", None).unwrap();
        assert_eq!(registry.cached(), 1);
        registry.register(Standard::X12, "810", None, || {
            vec![LoopDescriptor::new("IT1", "IT1", 1)]
        });
        assert_eq!(registry.cached(), 0);
        let table = registry.lookup(Standard::X12, "810", None).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_global_has_builtins() {
        let registry = PluginRegistry::global();
        assert!(registry.contains(Standard::X12, "850", None));
        assert!(registry.contains(Standard::Edifact, "ORDERS", Some("D96A")));
    }

    #[test]
    fn test_concurrent_lookup_compiles_once() {
        let registry = Arc::new(PluginRegistry::with_builtins());
        let mut handles = vec![];
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    registry.lookup(Standard::X12, "856", None).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.cached(), 1);
    }
}
