//! Explicit plugin loading
//!
//! Plugins are ordinary compiled crates that register a named *provider* in
//! the process-wide catalog before any registry is touched. A JSON manifest
//! then names, per operation family, which providers to enable:
//!
//! ```json
//! { "families": { "cleaning": ["acme_cleaners"], "analysis": ["acme_stats"] } }
//! ```
//!
//! At registry initialization every listed provider is asked for its
//! registrations, which merge into the registry under the usual
//! override-with-warning rule. Faults are isolated: an unreadable manifest, an
//! unknown provider name, or a failing provider is skipped with a warning and
//! never blocks the remaining providers or the built-ins.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;
use crate::registry::{Family, Registration};

/// A plugin provider: returns the registrations it contributes, or an error
/// if the plugin cannot produce them
pub type ProviderFn = fn() -> Result<Vec<Registration>>;

fn catalog() -> &'static Mutex<BTreeMap<String, ProviderFn>> {
    static CATALOG: OnceLock<Mutex<BTreeMap<String, ProviderFn>>> = OnceLock::new();
    CATALOG.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// Register a provider in the process-wide catalog
///
/// Call this before first registry use (typically from the plugin crate's
/// setup function). Re-registering a name replaces the previous provider with
/// a warning.
pub fn register_provider(name: &str, provider: ProviderFn) {
    let mut catalog = catalog().lock().unwrap_or_else(|e| e.into_inner());
    if catalog.insert(name.to_string(), provider).is_some() {
        warn!(provider = name, "plugin provider re-registered, replacing previous");
    }
}

/// Look up a provider by name
pub fn provider(name: &str) -> Option<ProviderFn> {
    let catalog = catalog().lock().unwrap_or_else(|e| e.into_inner());
    catalog.get(name).copied()
}

/// The manifest file format: provider names per family
#[derive(Debug, Default, Deserialize)]
pub struct PluginManifest {
    /// Family name (see [`Family::as_str`]) to provider names
    #[serde(default)]
    pub families: BTreeMap<String, Vec<String>>,
}

impl PluginManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Provider names enabled for a family
    pub fn providers_for(&self, family: Family) -> &[String] {
        self.families
            .get(family.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Collect the plugin registrations a manifest enables for one family
///
/// Never fails: every fault is logged and skipped so discovery of the
/// remaining providers continues.
pub(crate) fn manifest_registrations(family: Family, path: &Path) -> Vec<Registration> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(%family, path = %path.display(), %error, "cannot read plugin manifest, skipping plugins");
            return Vec::new();
        }
    };

    let manifest = match PluginManifest::from_json(&text) {
        Ok(manifest) => manifest,
        Err(error) => {
            warn!(%family, path = %path.display(), %error, "cannot parse plugin manifest, skipping plugins");
            return Vec::new();
        }
    };

    let mut registrations = Vec::new();
    for name in manifest.providers_for(family) {
        match provider(name) {
            Some(provider) => match provider() {
                Ok(contributed) => registrations.extend(contributed),
                Err(error) => {
                    warn!(%family, provider = %name, %error, "plugin provider failed, skipping");
                }
            },
            None => {
                warn!(%family, provider = %name, "plugin provider not in catalog, skipping");
            }
        }
    }
    registrations
}
