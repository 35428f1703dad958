//! The persisted catalog: every entity collection in one JSON document

use crate::entities::{Dashboard, Report, Team, User};
use crate::errors::{Result, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root document persisted as `catalog.json`. Collections are id-keyed maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub schema_version: String,
    pub users: HashMap<String, User>,
    pub teams: HashMap<String, Team>,
    pub reports: HashMap<String, Report>,
    pub dashboards: HashMap<String, Dashboard>,
}

impl Catalog {
    pub fn new(schema_version: String) -> Self {
        Self {
            schema_version,
            users: HashMap::new(),
            teams: HashMap::new(),
            reports: HashMap::new(),
            dashboards: HashMap::new(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.users.len() + self.teams.len() + self.reports.len() + self.dashboards.len()
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }

    pub fn require_user(&self, id: &str) -> Result<&User> {
        self.users
            .get(id)
            .ok_or_else(|| StoreError::not_found("User", id))
    }

    pub fn require_team(&self, id: &str) -> Result<&Team> {
        self.teams
            .get(id)
            .ok_or_else(|| StoreError::not_found("Team", id))
    }

    pub fn require_report(&self, id: &str) -> Result<&Report> {
        self.reports
            .get(id)
            .ok_or_else(|| StoreError::not_found("Report", id))
    }

    pub fn require_dashboard(&self, id: &str) -> Result<&Dashboard> {
        self.dashboards
            .get(id)
            .ok_or_else(|| StoreError::not_found("Dashboard", id))
    }

    /// Reconcile user back-references with a team's current leader and member
    /// list: the leader and every member gain the team id (set semantics),
    /// everyone else loses it.
    pub fn sync_team_references(&mut self, team: &Team) {
        for user in self.users.values_mut() {
            let belongs = team.has_member(&user.id);
            let referenced = user.teams.iter().any(|t| t == &team.id);
            if belongs && !referenced {
                user.teams.push(team.id.clone());
                user.updated_at = Utc::now();
            } else if !belongs && referenced {
                user.teams.retain(|t| t != &team.id);
                user.updated_at = Utc::now();
            }
        }
    }

    /// Pull a deleted team's id from every user's back-reference list.
    pub fn unlink_team(&mut self, team_id: &str) {
        for user in self.users.values_mut() {
            if user.teams.iter().any(|t| t == team_id) {
                user.teams.retain(|t| t != team_id);
                user.updated_at = Utc::now();
            }
        }
    }
}
