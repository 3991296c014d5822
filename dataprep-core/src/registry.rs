//! Per-family operation registries
//!
//! Each operation family (cleaning, transformation, analysis, visualization,
//! export) owns one registry: a name-to-implementation map built lazily on
//! first access. Initialization registers the family's built-in operations,
//! then merges any plugin registrations named by the configured manifest.
//! Later registrations override earlier ones with a warning, never an error,
//! and a failure to load one entry never blocks the others.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::operation::{OpSpec, Operation};
use crate::plugin;

/// The operation families, each with an independent registry namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    /// Data cleaning operations
    Cleaning,
    /// Column transformations
    Transformation,
    /// Statistical analyses
    Analysis,
    /// Chart/report builders
    Visualization,
    /// Table export codecs
    Export,
}

impl Family {
    /// Stable lowercase name, used in manifests and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Transformation => "transformation",
            Self::Analysis => "analysis",
            Self::Visualization => "visualization",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a registry entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Registered from the built-in list or a manual `register` call
    Builtin,
    /// Merged from a plugin provider named by the manifest
    Plugin,
}

/// Constructor for an operation implementation
pub type OperationFactory = fn() -> Box<dyn Operation>;

/// A (descriptor, factory) pair submitted for registration
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    /// Static metadata for the implementation
    pub spec: OpSpec,
    /// Factory producing a fresh instance
    pub factory: OperationFactory,
}

impl Registration {
    /// Create a registration
    pub const fn new(spec: OpSpec, factory: OperationFactory) -> Self {
        Self { spec, factory }
    }
}

/// Introspection record for one registered operation
#[derive(Debug, Clone, Serialize)]
pub struct OpInfo {
    /// Registry key
    pub key: String,
    /// Human description
    pub description: String,
    /// Parameter names and descriptions
    pub parameters: Vec<ParamInfo>,
}

/// One parameter in an operation's listing
#[derive(Debug, Clone, Serialize)]
pub struct ParamInfo {
    /// Parameter name
    pub name: String,
    /// What the parameter controls
    pub description: String,
}

struct Entry {
    spec: OpSpec,
    factory: OperationFactory,
    provenance: Provenance,
}

struct Inner {
    initialized: bool,
    entries: BTreeMap<String, Entry>,
}

/// Name-to-implementation map for one operation family
///
/// Built once per process on first use; immutable afterwards except for
/// explicit [`register`](Registry::register) calls. Safe to share across
/// threads: initialization runs under the same lock as every lookup, so two
/// near-simultaneous first accesses cannot double-register.
pub struct Registry {
    family: Family,
    builtins: Vec<Registration>,
    manifest: Option<PathBuf>,
    inner: Mutex<Inner>,
}

impl Registry {
    /// Create a registry for a family with its built-in registrations
    ///
    /// Nothing is registered until the first `resolve`/`list`/`register`
    /// call.
    pub fn new(family: Family, builtins: Vec<Registration>) -> Self {
        Self {
            family,
            builtins,
            manifest: None,
            inner: Mutex::new(Inner {
                initialized: false,
                entries: BTreeMap::new(),
            }),
        }
    }

    /// Enable plugin loading from the given manifest file at initialization
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// The family this registry serves
    pub fn family(&self) -> Family {
        self.family
    }

    /// Manually register an implementation
    ///
    /// Overwrites any existing entry under the same key with a warning.
    pub fn register(&self, registration: Registration) {
        let mut inner = self.ensure_init();
        Self::insert(self.family, &mut inner, registration, Provenance::Builtin);
    }

    /// Resolve an operation instance by key
    pub fn resolve(&self, key: &str) -> Result<Box<dyn Operation>> {
        let inner = self.ensure_init();
        inner
            .entries
            .get(key)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| Error::UnknownOperation(key.to_string()))
    }

    /// Whether an operation is registered under this key
    pub fn contains(&self, key: &str) -> bool {
        self.ensure_init().entries.contains_key(key)
    }

    /// All registered keys, sorted
    pub fn list(&self) -> Vec<String> {
        self.ensure_init().entries.keys().cloned().collect()
    }

    /// Listing of every registered operation with description and parameters
    ///
    /// Answered from the static specs; no implementation is instantiated.
    pub fn list_operations(&self) -> Vec<OpInfo> {
        self.ensure_init()
            .entries
            .values()
            .map(|entry| OpInfo {
                key: entry.spec.key.to_string(),
                description: entry.spec.description.to_string(),
                parameters: entry
                    .spec
                    .parameters
                    .iter()
                    .map(|(name, description)| ParamInfo {
                        name: (*name).to_string(),
                        description: (*description).to_string(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Where the entry under `key` came from, if registered
    pub fn provenance(&self, key: &str) -> Option<Provenance> {
        self.ensure_init().entries.get(key).map(|e| e.provenance)
    }

    /// One-time initialization: built-ins first, then the plugin manifest.
    /// Runs under the registry lock, so repeated and concurrent calls are
    /// no-ops after the first.
    fn ensure_init(&self) -> MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.initialized {
            return inner;
        }
        inner.initialized = true;

        for registration in &self.builtins {
            Self::insert(self.family, &mut inner, *registration, Provenance::Builtin);
        }

        if let Some(path) = &self.manifest {
            for registration in plugin::manifest_registrations(self.family, path) {
                Self::insert(self.family, &mut inner, registration, Provenance::Plugin);
            }
        }

        debug!(
            family = %self.family,
            count = inner.entries.len(),
            "operation registry initialized"
        );
        inner
    }

    fn insert(
        family: Family,
        inner: &mut Inner,
        registration: Registration,
        provenance: Provenance,
    ) {
        let key = registration.spec.key;
        if key.is_empty() {
            warn!(%family, "skipping registration with empty operation key");
            return;
        }

        let entry = Entry {
            spec: registration.spec,
            factory: registration.factory,
            provenance,
        };
        if inner.entries.insert(key.to_string(), entry).is_some() {
            warn!(%family, key, "operation registration overrides existing entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OpOutput, Params};
    use crate::table::Table;

    struct Marker(i64);

    impl Operation for Marker {
        fn apply(&self, _table: &Table, _params: &Params<'_>) -> Result<OpOutput> {
            Ok(OpOutput::Report(serde_json::json!({ "marker": self.0 })))
        }
    }

    const FIRST: OpSpec = OpSpec {
        key: "marker",
        description: "first implementation",
        parameters: &[],
    };

    const SECOND: OpSpec = OpSpec {
        key: "marker",
        description: "second implementation",
        parameters: &[],
    };

    fn marker_value(registry: &Registry, key: &str) -> i64 {
        let op = registry.resolve(key).unwrap();
        let output = op.apply(&Table::new(), &Params::empty()).unwrap();
        output.into_report().unwrap()["marker"].as_i64().unwrap()
    }

    #[test]
    fn test_resolve_unknown_operation() {
        let registry = Registry::new(Family::Cleaning, vec![]);
        let err = registry.resolve("does_not_exist").unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(_)));
        assert_eq!(err.kind(), "UnknownOperation");
    }

    #[test]
    fn test_register_overrides_without_error() {
        let registry = Registry::new(
            Family::Cleaning,
            vec![Registration::new(FIRST, || Box::new(Marker(1)))],
        );
        assert_eq!(marker_value(&registry, "marker"), 1);

        registry.register(Registration::new(SECOND, || Box::new(Marker(2))));

        // The later registration replaced the earlier one in place.
        assert_eq!(marker_value(&registry, "marker"), 2);
        assert_eq!(registry.list(), vec!["marker".to_string()]);
        assert_eq!(
            registry.list_operations()[0].description,
            "second implementation"
        );
    }

    #[test]
    fn test_initialization_is_idempotent() {
        let registry = Registry::new(
            Family::Analysis,
            vec![Registration::new(FIRST, || Box::new(Marker(1)))],
        );

        let first = registry.list();
        let second = registry.list();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_empty_key_is_skipped() {
        const BLANK: OpSpec = OpSpec {
            key: "",
            description: "unnamed",
            parameters: &[],
        };
        let registry = Registry::new(
            Family::Export,
            vec![
                Registration::new(BLANK, || Box::new(Marker(0))),
                Registration::new(FIRST, || Box::new(Marker(1))),
            ],
        );

        // The blank entry is dropped; the valid one still loads.
        assert_eq!(registry.list(), vec!["marker".to_string()]);
    }

    #[test]
    fn test_list_operations_exposes_parameters() {
        const DOCUMENTED: OpSpec = OpSpec {
            key: "documented",
            description: "an operation with parameters",
            parameters: &[("column", "target column"), ("method", "how to do it")],
        };
        let registry = Registry::new(
            Family::Transformation,
            vec![Registration::new(DOCUMENTED, || Box::new(Marker(1)))],
        );

        let infos = registry.list_operations();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].key, "documented");
        assert_eq!(infos[0].parameters.len(), 2);
        assert_eq!(infos[0].parameters[0].name, "column");
    }
}
