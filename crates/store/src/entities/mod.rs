//! Entity types persisted in the catalog
//!
//! All entities serialize with camelCase field names, UUID v4 string ids and
//! RFC 3339 timestamps. Drafts (`New*`) carry caller input into `from_draft`
//! constructors; patches name exactly the fields an update may touch.

pub mod dashboard;
pub mod report;
pub mod team;
pub mod user;

pub use dashboard::{
    Dashboard, DashboardPatch, NewDashboard, Widget, WidgetDraft, WidgetPosition,
    WidgetPositionDraft, WidgetType,
};
pub use report::{NewReport, Report, ReportErrorEntry, ReportPatch, ReportStatus, ReportType};
pub use team::{NewTeam, Team, TeamPatch, TeamStatus};
pub use user::{NewUser, Role, User};

use crate::errors::{Result, StoreError};

/// Trim and bound a required text field.
pub(crate) fn required_text(field: &str, value: &str, min: usize, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::validation(format!("{field} is required")));
    }
    if value.chars().count() < min {
        return Err(StoreError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if value.chars().count() > max {
        return Err(StoreError::validation(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trim and bound an optional text field. Empty input is allowed.
pub(crate) fn optional_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(StoreError::validation(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trim a required text field with no length bounds.
pub(crate) fn required_trimmed(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub(crate) fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims_and_bounds() {
        assert_eq!(required_text("Name", "  Core  ", 3, 100).unwrap(), "Core");
        assert!(required_text("Name", "   ", 3, 100).is_err());
        assert!(required_text("Name", "ab", 3, 100).is_err());
        assert!(required_text("Name", &"x".repeat(101), 3, 100).is_err());
    }

    #[test]
    fn test_optional_text_allows_empty() {
        assert_eq!(optional_text("Description", "", 500).unwrap(), "");
        assert!(optional_text("Description", &"x".repeat(501), 500).is_err());
    }
}
