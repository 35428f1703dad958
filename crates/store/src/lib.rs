//! # Store
//!
//! The document store backing the Pulseboard service.
//!
//! This crate provides:
//! - Entity types (users, teams, reports, dashboards) with validation
//! - Catalog persistence as a single JSON file with atomic saves
//! - Centralized data directory management

pub mod catalog;
pub mod data_directory;
pub mod document_store;
pub mod entities;
pub mod errors;

pub use catalog::Catalog;
pub use data_directory::DataDirectory;
pub use document_store::{DashboardFilter, DocumentStore, ReportFilter, TeamFilter};
pub use entities::{
    Dashboard, DashboardPatch, NewDashboard, NewReport, NewTeam, NewUser, Report,
    ReportErrorEntry, ReportPatch, ReportStatus, ReportType, Role, Team, TeamPatch, TeamStatus,
    User, Widget, WidgetDraft, WidgetPosition, WidgetPositionDraft, WidgetType,
};
pub use errors::{Result, StoreError};

/// Catalog schema version stamped into newly created catalogs
pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");
