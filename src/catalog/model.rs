//! Catalog fact types
//!
//! The two base relations of the catalog: `Dataset` (one table or view) and
//! `DataPoint` (one column). Both are built from already-parsed rows handed
//! over by ingestion and never change afterwards.

use crate::catalog::error::{LoadError, RowKind};
use crate::catalog::predicates::is_present;
use serde::{Deserialize, Serialize};

/// One ingestion row: a cell is text or null
pub type RawRow = Vec<Option<String>>;

/// Number of cells in a dataset row
pub const DATASET_ARITY: usize = 12;

/// Number of cells in a datapoint row
pub const DATAPOINT_ARITY: usize = 18;

/// Pipeline tier of a dataset, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

    /// Parse a layer name. Accepts the medallion names in any case and the
    /// raw/refined/curated aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bronze" | "raw" => Some(Layer::Bronze),
            "silver" | "refined" => Some(Layer::Silver),
            "gold" | "curated" => Some(Layer::Gold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Bronze => "Bronze",
            Layer::Silver => "Silver",
            Layer::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural key of a data point: (view name, column name).
///
/// This is the join key for every lineage and impact traversal. The
/// datapoint identifier is bookkeeping only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub view: String,
    pub column: String,
}

impl ColumnKey {
    pub fn new(view: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.view, self.column)
    }
}

/// A cataloged table or view and its governance metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub view_id: Option<String>,
    pub view_name: String,
    pub layer: Option<Layer>,
    pub name: Option<String>,
    pub subject_area: Option<String>,
    pub subject_area_sub_category: Option<String>,
    pub data_source: Option<String>,
    pub data_source_id: Option<String>,
    pub reviewer: Option<String>,
    pub technical_design_reviewer: Option<String>,
    pub processor: Option<String>,
    pub validator: Option<String>,
}

impl Dataset {
    /// Build a dataset from a 12-cell row (`index` is used in error reports)
    pub fn from_row(index: usize, row: &[Option<String>]) -> Result<Self, LoadError> {
        check_arity(RowKind::Dataset, index, row, DATASET_ARITY)?;

        let view_name = cell(row, 1).ok_or(LoadError::MissingKey {
            kind: RowKind::Dataset,
            row: index,
            field: "view_name",
        })?;

        let layer = match cell(row, 2) {
            Some(raw) => Some(Layer::parse(&raw).ok_or(LoadError::UnknownLayer {
                row: index,
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            view_id: cell(row, 0),
            view_name,
            layer,
            name: cell(row, 3),
            subject_area: cell(row, 4),
            subject_area_sub_category: cell(row, 5),
            data_source: cell(row, 6),
            data_source_id: cell(row, 7),
            reviewer: cell(row, 8),
            technical_design_reviewer: cell(row, 9),
            processor: cell(row, 10),
            validator: cell(row, 11),
        })
    }
}

/// A cataloged column and its lineage and sensitivity metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub datapoint_id: Option<String>,
    pub subject_area: Option<String>,
    pub view_id: Option<String>,
    pub key: ColumnKey,
    pub column_label: Option<String>,
    pub environment_status: Option<String>,
    pub db_state: Option<String>,
    pub data_point_class: Option<String>,
    pub description: Option<String>,
    pub source_datapoint_id: Option<String>,
    /// Upstream edge; only set when both source view and source column are present
    pub source: Option<ColumnKey>,
    pub data_steward: Option<String>,
    pub data_owner: Option<String>,
    pub sensitivity_label: Option<String>,
    pub sensitivity_rationale: Option<String>,
    pub critical_indicator: Option<String>,
}

impl DataPoint {
    /// Build a datapoint from an 18-cell row (`index` is used in error reports)
    pub fn from_row(index: usize, row: &[Option<String>]) -> Result<Self, LoadError> {
        check_arity(RowKind::DataPoint, index, row, DATAPOINT_ARITY)?;

        let missing = |field| LoadError::MissingKey {
            kind: RowKind::DataPoint,
            row: index,
            field,
        };
        let view = cell(row, 3).ok_or_else(|| missing("view_name"))?;
        let column = cell(row, 4).ok_or_else(|| missing("column_name"))?;

        let source = match (cell(row, 11), cell(row, 12)) {
            (Some(view), Some(column)) => Some(ColumnKey { view, column }),
            _ => None,
        };

        Ok(Self {
            datapoint_id: cell(row, 0),
            subject_area: cell(row, 1),
            view_id: cell(row, 2),
            key: ColumnKey { view, column },
            column_label: cell(row, 5),
            environment_status: cell(row, 6),
            db_state: cell(row, 7),
            data_point_class: cell(row, 8),
            description: cell(row, 9),
            source_datapoint_id: cell(row, 10),
            source,
            data_steward: cell(row, 13),
            data_owner: cell(row, 14),
            sensitivity_label: cell(row, 15),
            sensitivity_rationale: cell(row, 16),
            critical_indicator: cell(row, 17),
        })
    }

    pub fn view_name(&self) -> &str {
        &self.key.view
    }

    pub fn column_name(&self) -> &str {
        &self.key.column
    }
}

fn check_arity(
    kind: RowKind,
    index: usize,
    row: &[Option<String>],
    expected: usize,
) -> Result<(), LoadError> {
    if row.len() != expected {
        return Err(LoadError::Arity {
            kind,
            row: index,
            expected,
            found: row.len(),
        });
    }
    Ok(())
}

/// Trimmed cell value, or None when the cell is absent
fn cell(row: &[Option<String>], index: usize) -> Option<String> {
    row.get(index)?
        .as_deref()
        .map(str::trim)
        .filter(|v| is_present(v))
        .map(str::to_string)
}
