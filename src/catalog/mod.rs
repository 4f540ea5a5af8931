//! Catalog Engine Core
//!
//! The deductive layer over a layered data-asset metadata catalog:
//!
//! 1. **Fact Store**: Immutable, indexed snapshot of datasets and datapoints
//! 2. **Predicates**: Layer, subject area, source and sensitivity filters
//! 3. **Governance**: Ownership gaps, risk rules and pipeline completeness
//! 4. **Lineage / Impact**: Upstream chains and downstream closures
//! 5. **Query**: Relation-by-name access with bindings and projection, and
//!    compound queries joining several relations

pub mod compound;
pub mod error;
pub mod governance;
pub mod impact;
pub mod lineage;
pub mod model;
pub mod predicates;
pub mod query;
pub mod store;
pub mod summary;

pub use compound::{execute_compound, CompoundQuery};
pub use error::{LoadError, QueryError};
pub use governance::GovernanceRules;
pub use impact::ImpactAnalyzer;
pub use model::{ColumnKey, DataPoint, Dataset, Layer, RawRow};
pub use predicates::EvaluationPolicy;
pub use query::{execute, Query, QueryResult, Relation, Term};
pub use store::{Catalog, CatalogStatus, FactStore};
