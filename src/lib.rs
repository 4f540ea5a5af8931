//! Catalog Engine - metadata catalog query, governance and lineage service
//!
//! The `catalog` module is the pure engine; everything else is the HTTP
//! shell that loads ingestion rows into it and exposes its relations.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
