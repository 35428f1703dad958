use crate::catalog::Catalog;
use crate::entities::{new_entity_id, optional_text, required_text};
use crate::errors::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Financial,
    Performance,
    Operational,
    Custom,
}

impl ReportType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "financial" => Ok(ReportType::Financial),
            "performance" => Ok(ReportType::Performance),
            "operational" => Ok(ReportType::Operational),
            "custom" => Ok(ReportType::Custom),
            other => Err(StoreError::validation(format!(
                "Invalid report type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Financial => write!(f, "financial"),
            ReportType::Performance => write!(f, "performance"),
            ReportType::Operational => write!(f, "operational"),
            ReportType::Custom => write!(f, "custom"),
        }
    }
}

/// Lifecycle states: `pending → in_progress → completed | failed`.
/// `completed` and `failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(ReportStatus::Pending),
            "in_progress" => Ok(ReportStatus::InProgress),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(StoreError::validation(format!(
                "Invalid report status: {other}"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Failed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Completed => write!(f, "completed"),
            ReportStatus::Failed => write!(f, "failed"),
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// One generation failure, appended to the report when a job exhausts its retries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportErrorEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub status: ReportStatus,
    /// 0–100; forced to 100 whenever status becomes `completed`
    pub progress: u8,
    pub data: Map<String, Value>,
    pub team: String,
    pub created_by: String,
    pub assigned_to: Vec<String>,
    pub metadata: Map<String, Value>,
    pub errors: Vec<ReportErrorEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller input for report creation
#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub data: Option<Map<String, Value>>,
    pub team: String,
    pub created_by: String,
    pub assigned_to: Vec<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Fields an explicit report update may touch. Team, creator and assignees
/// are fixed at creation; status and progress are the administrative override.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub data: Option<Map<String, Value>>,
    pub status: Option<String>,
    pub progress: Option<i64>,
    pub metadata: Option<Map<String, Value>>,
}

impl Report {
    pub fn from_draft(draft: NewReport, catalog: &Catalog) -> Result<Report> {
        let kind = ReportType::parse(&draft.kind)?;
        validate_references(&draft.team, &draft.created_by, &draft.assigned_to, catalog)?;

        let now = Utc::now();
        Ok(Report {
            id: new_entity_id(),
            title: required_text("Report title", &draft.title, 3, 100)?,
            description: optional_text("Description", draft.description.as_deref().unwrap_or(""), 500)?,
            kind,
            status: ReportStatus::Pending,
            progress: 0,
            data: draft.data.unwrap_or_default(),
            team: draft.team,
            created_by: draft.created_by,
            assigned_to: draft.assigned_to,
            metadata: draft.metadata.unwrap_or_default(),
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch to a snapshot of this report.
    pub fn with_patch(&self, patch: ReportPatch) -> Result<Report> {
        let mut updated = self.clone();

        if let Some(title) = patch.title {
            updated.title = required_text("Report title", &title, 3, 100)?;
        }
        if let Some(description) = patch.description {
            updated.description = optional_text("Description", &description, 500)?;
        }
        if let Some(kind) = patch.kind {
            updated.kind = ReportType::parse(&kind)?;
        }
        if let Some(data) = patch.data {
            updated.data = data;
        }
        if let Some(progress) = patch.progress {
            updated.progress = validate_progress(progress)?;
        }
        if let Some(status) = patch.status {
            updated.status = ReportStatus::parse(&status)?;
        }
        if let Some(metadata) = patch.metadata {
            updated.metadata = metadata;
        }

        if updated.status == ReportStatus::Completed {
            updated.progress = 100;
        }
        updated.updated_at = Utc::now();
        Ok(updated)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

pub(crate) fn validate_progress(progress: i64) -> Result<u8> {
    if !(0..=100).contains(&progress) {
        return Err(StoreError::validation(
            "Progress must be between 0 and 100",
        ));
    }
    Ok(progress as u8)
}

fn validate_references(
    team: &str,
    created_by: &str,
    assigned_to: &[String],
    catalog: &Catalog,
) -> Result<()> {
    let Some(team) = catalog.teams.get(team) else {
        return Err(StoreError::validation("Team does not exist"));
    };
    if !catalog.users.contains_key(created_by) {
        return Err(StoreError::validation("Creator does not exist"));
    }
    if assigned_to.iter().any(|id| !catalog.users.contains_key(id)) {
        return Err(StoreError::validation("Some assigned users do not exist"));
    }
    if assigned_to.iter().any(|id| !team.has_member(id)) {
        return Err(StoreError::validation(
            "Some assigned users are not in the team",
        ));
    }
    Ok(())
}
