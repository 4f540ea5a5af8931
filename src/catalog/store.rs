//! Fact Store
//!
//! Holds the two base relations as an indexed, immutable snapshot, and the
//! `Catalog` handle that publishes a new snapshot atomically on every load.
//! Think of a load as replacing the whole catalog: queries that started on
//! the old snapshot finish on it, new queries see the new one.

use crate::catalog::error::LoadError;
use crate::catalog::model::{ColumnKey, DataPoint, Dataset, RawRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Bookkeeping about the published snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    /// 0 for the initial empty store, +1 per successful load
    pub generation: u64,
    pub load_id: Option<Uuid>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub fingerprint: String,
    pub dataset_count: usize,
    pub datapoint_count: usize,
    pub duplicate_view_ids: usize,
    pub duplicate_natural_keys: usize,
}

/// Indexed, read-only catalog snapshot
#[derive(Debug)]
pub struct FactStore {
    datasets: Vec<Dataset>,
    datapoints: Vec<DataPoint>,
    /// View name -> dataset positions, load order
    datasets_by_view: HashMap<String, Vec<usize>>,
    /// Natural key -> datapoint positions, load order
    points_by_key: HashMap<ColumnKey, Vec<usize>>,
    /// View name -> datapoint positions, load order
    points_by_view: HashMap<String, Vec<usize>>,
    /// Source key -> positions of datapoints whose resolved source it is.
    /// Only the first declared edge per natural key is indexed.
    dependents: HashMap<ColumnKey, Vec<usize>>,
    status: CatalogStatus,
}

impl FactStore {
    /// The store published before any load
    pub fn empty() -> Self {
        Self::build(Vec::new(), Vec::new())
    }

    /// Validate ingestion rows and build a store. Any bad row rejects the lot.
    pub fn from_rows(datasets: &[RawRow], datapoints: &[RawRow]) -> Result<Self, LoadError> {
        let datasets = datasets
            .iter()
            .enumerate()
            .map(|(i, row)| Dataset::from_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;
        let datapoints = datapoints
            .iter()
            .enumerate()
            .map(|(i, row)| DataPoint::from_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::build(datasets, datapoints))
    }

    /// Index already-typed facts
    pub fn build(datasets: Vec<Dataset>, datapoints: Vec<DataPoint>) -> Self {
        let mut datasets_by_view: HashMap<String, Vec<usize>> = HashMap::new();
        let mut seen_view_ids = HashSet::new();
        let mut duplicate_view_ids = 0;

        for (i, ds) in datasets.iter().enumerate() {
            datasets_by_view.entry(ds.view_name.clone()).or_default().push(i);
            if let Some(id) = &ds.view_id {
                if !seen_view_ids.insert(id.as_str()) {
                    duplicate_view_ids += 1;
                }
            }
        }

        let mut points_by_key: HashMap<ColumnKey, Vec<usize>> = HashMap::new();
        let mut points_by_view: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dependents: HashMap<ColumnKey, Vec<usize>> = HashMap::new();
        let mut sourced: HashSet<&ColumnKey> = HashSet::new();

        for (i, dp) in datapoints.iter().enumerate() {
            points_by_key.entry(dp.key.clone()).or_default().push(i);
            points_by_view.entry(dp.key.view.clone()).or_default().push(i);
            if let Some(source) = &dp.source {
                if sourced.insert(&dp.key) {
                    dependents.entry(source.clone()).or_default().push(i);
                }
            }
        }

        let duplicate_natural_keys = points_by_key
            .values()
            .map(|positions| positions.len() - 1)
            .sum();

        let status = CatalogStatus {
            generation: 0,
            load_id: None,
            loaded_at: None,
            fingerprint: Self::compute_fingerprint(&datasets, &datapoints),
            dataset_count: datasets.len(),
            datapoint_count: datapoints.len(),
            duplicate_view_ids,
            duplicate_natural_keys,
        };

        Self {
            datasets,
            datapoints,
            datasets_by_view,
            points_by_key,
            points_by_view,
            dependents,
            status,
        }
    }

    /// SHA-256 over natural keys, layers and lineage edges, independent of row order
    pub fn compute_fingerprint(datasets: &[Dataset], datapoints: &[DataPoint]) -> String {
        let mut lines: Vec<String> = datasets
            .iter()
            .map(|ds| {
                format!(
                    "D:{}:{}",
                    ds.view_name,
                    ds.layer.map(|l| l.as_str()).unwrap_or("")
                )
            })
            .chain(datapoints.iter().map(|dp| match &dp.source {
                Some(source) => format!("P:{}<-{}", dp.key, source),
                None => format!("P:{}", dp.key),
            }))
            .collect();
        lines.sort();

        let mut hasher = Sha256::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn data_points(&self) -> &[DataPoint] {
        &self.datapoints
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// All datasets sharing a view name, in load order
    pub fn datasets_named<'a>(&'a self, view: &str) -> impl Iterator<Item = &'a Dataset> + 'a {
        self.positions(&self.datasets_by_view, view)
            .map(move |&i| &self.datasets[i])
    }

    /// All datapoints of one view, in load order
    pub fn points_in_view<'a>(&'a self, view: &str) -> impl Iterator<Item = &'a DataPoint> + 'a {
        self.positions(&self.points_by_view, view)
            .map(move |&i| &self.datapoints[i])
    }

    /// All datapoints with this natural key, in load order
    pub fn points_with_key<'a>(&'a self, key: &ColumnKey) -> impl Iterator<Item = &'a DataPoint> + 'a {
        self.points_by_key
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.datapoints[i])
    }

    pub fn contains_point(&self, key: &ColumnKey) -> bool {
        self.points_by_key.contains_key(key)
    }

    /// Datapoints whose resolved source is `key`, in load order
    pub fn dependents_of<'a>(&'a self, key: &ColumnKey) -> impl Iterator<Item = &'a DataPoint> + 'a {
        self.dependents
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.datapoints[i])
    }

    fn positions<'a>(&'a self, index: &'a HashMap<String, Vec<usize>>, view: &str) -> std::slice::Iter<'a, usize> {
        index
            .get(view)
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Handle to the currently published store
pub struct Catalog {
    current: RwLock<Arc<FactStore>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(FactStore::empty())),
        }
    }

    /// The store queries should run against. Holding the returned `Arc`
    /// pins that snapshot even if a reload publishes a new one.
    pub async fn snapshot(&self) -> Arc<FactStore> {
        self.current.read().await.clone()
    }

    /// Build a new store from ingestion rows and publish it.
    ///
    /// On error the previously published store is left untouched.
    pub async fn load(&self, datasets: &[RawRow], datapoints: &[RawRow]) -> Result<CatalogStatus, LoadError> {
        let mut store = match FactStore::from_rows(datasets, datapoints) {
            Ok(store) => store,
            Err(e) => {
                warn!("Rejected catalog load: {}", e);
                return Err(e);
            }
        };

        let mut current = self.current.write().await;
        store.status.generation = current.status.generation + 1;
        store.status.load_id = Some(Uuid::new_v4());
        store.status.loaded_at = Some(Utc::now());

        if store.status.duplicate_view_ids > 0 || store.status.duplicate_natural_keys > 0 {
            warn!(
                "Catalog load contains {} duplicate view ids and {} duplicate natural keys",
                store.status.duplicate_view_ids,
                store.status.duplicate_natural_keys
            );
        }
        info!(
            "Published catalog generation {}: {} datasets, {} datapoints (fingerprint {})",
            store.status.generation,
            store.status.dataset_count,
            store.status.datapoint_count,
            &store.status.fingerprint[..12]
        );

        let status = store.status.clone();
        *current = Arc::new(store);
        Ok(status)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
