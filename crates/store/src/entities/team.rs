use crate::catalog::Catalog;
use crate::entities::{new_entity_id, optional_text, required_text};
use crate::errors::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    Active,
    Inactive,
    Archived,
}

impl TeamStatus {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "active" => Ok(TeamStatus::Active),
            "inactive" => Ok(TeamStatus::Inactive),
            "archived" => Ok(TeamStatus::Archived),
            other => Err(StoreError::validation(format!(
                "Invalid team status: {other}"
            ))),
        }
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamStatus::Active => write!(f, "active"),
            TeamStatus::Inactive => write!(f, "inactive"),
            TeamStatus::Archived => write!(f, "archived"),
        }
    }
}

impl Default for TeamStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    /// User ids. Back-references on the users are kept in sync by the catalog.
    pub members: Vec<String>,
    pub leader: String,
    pub status: TeamStatus,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller input for team creation
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub leader: String,
    pub status: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Fields a team update may touch. The leader is fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<String>>,
    pub status: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl Team {
    pub fn from_draft(draft: NewTeam, catalog: &Catalog) -> Result<Team> {
        validate_leader(&draft.leader, catalog)?;
        validate_members(&draft.members, catalog)?;

        let status = match draft.status.as_deref() {
            Some(raw) => TeamStatus::parse(raw)?,
            None => TeamStatus::default(),
        };

        let now = Utc::now();
        Ok(Team {
            id: new_entity_id(),
            name: required_text("Team name", &draft.name, 3, 100)?,
            description: optional_text("Description", draft.description.as_deref().unwrap_or(""), 500)?,
            members: dedup_ids(draft.members),
            leader: draft.leader,
            status,
            metadata: draft.metadata.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch to a snapshot of this team. Returns the updated team and
    /// the names of the fields that were present in the patch.
    pub fn with_patch(&self, patch: TeamPatch, catalog: &Catalog) -> Result<(Team, Vec<&'static str>)> {
        let mut updated = self.clone();
        let mut changed = Vec::new();

        if let Some(name) = patch.name {
            updated.name = required_text("Team name", &name, 3, 100)?;
            changed.push("name");
        }
        if let Some(description) = patch.description {
            updated.description = optional_text("Description", &description, 500)?;
            changed.push("description");
        }
        if let Some(members) = patch.members {
            validate_members(&members, catalog)?;
            updated.members = dedup_ids(members);
            changed.push("members");
        }
        if let Some(status) = patch.status {
            updated.status = TeamStatus::parse(&status)?;
            changed.push("status");
        }
        if let Some(metadata) = patch.metadata {
            updated.metadata = metadata;
            changed.push("metadata");
        }

        updated.updated_at = Utc::now();
        Ok((updated, changed))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Leader counts as a member for membership checks.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.leader == user_id || self.members.iter().any(|m| m == user_id)
    }
}

fn validate_leader(leader: &str, catalog: &Catalog) -> Result<()> {
    if catalog.users.contains_key(leader) {
        Ok(())
    } else {
        Err(StoreError::validation("Team leader must be a valid user"))
    }
}

fn validate_members(members: &[String], catalog: &Catalog) -> Result<()> {
    if members.iter().any(|m| !catalog.users.contains_key(m)) {
        return Err(StoreError::validation("Some team members do not exist"));
    }
    Ok(())
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewUser, User};

    fn catalog_with_users(emails: &[&str]) -> (Catalog, Vec<String>) {
        let mut catalog = Catalog::new("0.1.0".to_string());
        let mut ids = Vec::new();
        for email in emails {
            let user = User::from_draft(
                NewUser {
                    email: email.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    role: None,
                },
                &catalog,
            )
            .unwrap();
            ids.push(user.id.clone());
            catalog.users.insert(user.id.clone(), user);
        }
        (catalog, ids)
    }

    #[test]
    fn test_from_draft_validates_leader() {
        let (catalog, ids) = catalog_with_users(&["a@x.io"]);
        let draft = NewTeam {
            name: "Core Team".to_string(),
            leader: "missing-user".to_string(),
            members: vec![ids[0].clone()],
            ..Default::default()
        };
        let err = Team::from_draft(draft, &catalog).unwrap_err();
        assert_eq!(err.to_string(), "Team leader must be a valid user");
    }

    #[test]
    fn test_from_draft_validates_members() {
        let (catalog, ids) = catalog_with_users(&["a@x.io"]);
        let draft = NewTeam {
            name: "Core Team".to_string(),
            leader: ids[0].clone(),
            members: vec!["ghost".to_string()],
            ..Default::default()
        };
        assert!(Team::from_draft(draft, &catalog).is_err());
    }

    #[test]
    fn test_from_draft_defaults_and_dedup() {
        let (catalog, ids) = catalog_with_users(&["a@x.io", "b@x.io"]);
        let draft = NewTeam {
            name: "  Core Team  ".to_string(),
            leader: ids[0].clone(),
            members: vec![ids[1].clone(), ids[1].clone()],
            ..Default::default()
        };
        let team = Team::from_draft(draft, &catalog).unwrap();
        assert_eq!(team.name, "Core Team");
        assert_eq!(team.status, TeamStatus::Active);
        assert_eq!(team.members, vec![ids[1].clone()]);
        assert!(team.has_member(&ids[0]));
        assert!(team.has_member(&ids[1]));
    }

    #[test]
    fn test_with_patch_reports_changed_fields() {
        let (catalog, ids) = catalog_with_users(&["a@x.io", "b@x.io"]);
        let team = Team::from_draft(
            NewTeam {
                name: "Core Team".to_string(),
                leader: ids[0].clone(),
                members: vec![ids[1].clone()],
                ..Default::default()
            },
            &catalog,
        )
        .unwrap();

        let patch = TeamPatch {
            name: Some("Platform Team".to_string()),
            status: Some("archived".to_string()),
            ..Default::default()
        };
        let (updated, changed) = team.with_patch(patch, &catalog).unwrap();
        assert_eq!(updated.name, "Platform Team");
        assert_eq!(updated.status, TeamStatus::Archived);
        assert_eq!(changed, vec!["name", "status"]);
        assert_eq!(updated.members, team.members);
    }

    #[test]
    fn test_with_patch_rejects_unknown_status() {
        let (catalog, ids) = catalog_with_users(&["a@x.io"]);
        let team = Team::from_draft(
            NewTeam {
                name: "Core Team".to_string(),
                leader: ids[0].clone(),
                ..Default::default()
            },
            &catalog,
        )
        .unwrap();

        let patch = TeamPatch {
            status: Some("paused".to_string()),
            ..Default::default()
        };
        assert!(team.with_patch(patch, &catalog).is_err());
    }
}
