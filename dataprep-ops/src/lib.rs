//! Built-in dataset operations, grouped into family registries
//!
//! Each family exposes a process-wide [`Registry`] seeded with the builtin
//! operations of that family. A plugin manifest configured through
//! [`set_plugin_manifest`] (or the `DATAPREP_PLUGIN_MANIFEST` environment
//! variable) makes every registry also load the plugin providers listed for
//! its family.

#![warn(missing_docs)]

pub mod analysis;
pub mod cleaning;
pub mod export;
pub mod stats;
pub mod transform;
pub mod visualization;

use std::path::PathBuf;
use std::sync::OnceLock;

use dataprep_core::{Family, Registration, Registry};
use tracing::warn;

/// Environment variable naming the plugin manifest file
pub const PLUGIN_MANIFEST_ENV: &str = "DATAPREP_PLUGIN_MANIFEST";

static MANIFEST_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Configure the plugin manifest file for every family registry
///
/// Takes precedence over `DATAPREP_PLUGIN_MANIFEST`. Must be called before
/// the first registry access; a registry that has already initialized keeps
/// the manifest it was built with. The first call wins, later calls are
/// ignored with a warning.
pub fn set_plugin_manifest(path: impl Into<PathBuf>) {
    let path = path.into();
    if MANIFEST_PATH.set(path.clone()).is_err() {
        warn!(path = %path.display(), "plugin manifest already configured, ignoring");
    }
}

/// The manifest path registries load plugins from, if one is configured
pub fn plugin_manifest_path() -> Option<PathBuf> {
    MANIFEST_PATH
        .get()
        .cloned()
        .or_else(|| std::env::var_os(PLUGIN_MANIFEST_ENV).map(PathBuf::from))
}

fn build_registry(family: Family, builtins: Vec<Registration>) -> Registry {
    let registry = Registry::new(family, builtins);
    match plugin_manifest_path() {
        Some(path) => registry.with_manifest(path),
        None => registry,
    }
}

/// The cleaning family registry
pub fn cleaning() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| build_registry(Family::Cleaning, cleaning::registrations()))
}

/// The transformation family registry
pub fn transformation() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY
        .get_or_init(|| build_registry(Family::Transformation, transform::registrations()))
}

/// The analysis family registry
pub fn analysis() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| build_registry(Family::Analysis, analysis::registrations()))
}

/// The visualization family registry
pub fn visualization() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        build_registry(Family::Visualization, visualization::registrations())
    })
}

/// The export family registry
pub fn export() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| build_registry(Family::Export, export::registrations()))
}

/// All family registries, in presentation order
pub fn all_registries() -> [&'static Registry; 5] {
    [
        cleaning(),
        transformation(),
        analysis(),
        visualization(),
        export(),
    ]
}
