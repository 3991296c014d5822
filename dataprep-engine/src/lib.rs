//! Pipeline orchestration: configuration, dataset persistence wiring, and
//! running operation pipelines against stored datasets

#![warn(missing_docs)]

mod config;
mod engine;

pub use config::EngineConfig;
pub use engine::{
    available_operations, Engine, EngineError, PipelineErrorReport, PipelineReport,
};

use dataprep_core::Result;
use dataprep_store::FsStore;

/// Build an engine over a filesystem store per the configuration
///
/// A configured plugin manifest is handed to the family registries; call
/// this before first registry use so plugin loading sees it.
pub fn open(config: &EngineConfig) -> Result<Engine<FsStore>> {
    if let Some(path) = &config.plugin_manifest {
        dataprep_ops::set_plugin_manifest(path);
    }
    Ok(Engine::new(FsStore::open(&config.data_dir)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataprep_core::{Column, DatasetStore, OpDescriptor, Table};

    #[test]
    fn test_open_runs_against_filesystem_store() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open(&EngineConfig::new(dir.path())).unwrap();

        let table = Table::from_columns(vec![Column::new(
            "x",
            vec![1i64.into(), 1i64.into(), 2i64.into()],
        )])
        .unwrap();
        engine.store().save("d", &table).unwrap();

        let report = engine
            .run_pipeline(
                dataprep_ops::cleaning(),
                "d",
                &[OpDescriptor::new("remove_duplicates")],
            )
            .unwrap();

        assert_eq!(report.final_row_count, 2);
        assert_eq!(engine.store().load("d").unwrap().row_count(), 2);
    }

    #[test]
    fn test_open_forwards_plugin_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("plugins.json");
        std::fs::write(&manifest, r#"{"families": {}}"#).unwrap();

        let mut config = EngineConfig::new(dir.path());
        config.plugin_manifest = Some(manifest.clone());
        let _ = open(&config).unwrap();

        assert_eq!(dataprep_ops::plugin_manifest_path(), Some(manifest));
    }
}
