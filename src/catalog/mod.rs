//! Reference icon catalog
//!
//! The catalog is an ordered list of `{ id, nodepath }` records read once at
//! startup from a JSON file. Image files are not loaded here; each matching
//! run reads and rasterizes them fresh.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult};
use crate::models::IconRecord;

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<IconRecord>,
    asset_root: PathBuf,
}

impl Catalog {
    pub fn new(records: Vec<IconRecord>, asset_root: PathBuf) -> CatalogResult<Self> {
        if let Some(index) = records.iter().position(|r| r.nodepath.trim().is_empty()) {
            return Err(CatalogError::EmptyNodepath { index });
        }
        Ok(Self {
            records,
            asset_root,
        })
    }

    /// Load the catalog file named by the configuration
    pub async fn load(config: &CatalogConfig) -> CatalogResult<Self> {
        let contents = fs::read(&config.path)
            .await
            .map_err(|error| CatalogError::Io {
                path: config.path.clone(),
                error,
            })?;
        let records: Vec<IconRecord> = serde_json::from_slice(&contents)?;
        let asset_root = config.resolved_asset_root();

        debug!(
            "Parsed {} catalog records, asset root {:?}",
            records.len(),
            asset_root
        );
        let catalog = Self::new(records, asset_root)?;
        info!(
            "Loaded icon catalog from {:?} ({} icons)",
            config.path,
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[IconRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Absolute or root-relative path of a record's source image
    pub fn resolve(&self, record: &IconRecord) -> PathBuf {
        let nodepath = Path::new(&record.nodepath);
        if nodepath.is_absolute() {
            nodepath.to_path_buf()
        } else {
            self.asset_root.join(nodepath)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IconId;

    fn record(id: u64, nodepath: &str) -> IconRecord {
        IconRecord {
            id: IconId::from(id),
            nodepath: nodepath.to_string(),
        }
    }

    #[test]
    fn test_resolve_relative_and_absolute_paths() {
        let catalog = Catalog::new(
            vec![record(1, "svg/home.svg"), record(2, "/opt/icons/star.svg")],
            PathBuf::from("/srv/catalog"),
        )
        .unwrap();

        assert_eq!(
            catalog.resolve(&catalog.records()[0]),
            PathBuf::from("/srv/catalog/svg/home.svg")
        );
        assert_eq!(
            catalog.resolve(&catalog.records()[1]),
            PathBuf::from("/opt/icons/star.svg")
        );
    }

    #[test]
    fn test_empty_nodepath_is_rejected() {
        let result = Catalog::new(
            vec![record(1, "a.svg"), record(2, "  ")],
            PathBuf::from("."),
        );
        assert!(matches!(result, Err(CatalogError::EmptyNodepath { index: 1 })));
    }

    #[tokio::test]
    async fn test_load_preserves_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 3, "nodepath": "c.svg"},
                {"id": 1, "nodepath": "a.svg"},
                {"id": "two", "nodepath": "b.svg"}
            ]"#,
        )
        .unwrap();

        let catalog = Catalog::load(&CatalogConfig {
            path: path.clone(),
            asset_root: None,
        })
        .await
        .unwrap();

        let ids: Vec<String> = catalog.records().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "two"]);
        assert_eq!(catalog.asset_root(), dir.path());
        assert_eq!(catalog.resolve(&catalog.records()[1]), dir.path().join("a.svg"));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = Catalog::load(&CatalogConfig {
            path: PathBuf::from("/definitely/not/here/catalog.json"),
            asset_root: None,
        })
        .await;
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": 1}]"#).unwrap();

        let result = Catalog::load(&CatalogConfig {
            path,
            asset_root: None,
        })
        .await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
