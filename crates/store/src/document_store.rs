use crate::catalog::Catalog;
use crate::entities::{
    Dashboard, DashboardPatch, NewDashboard, NewReport, NewTeam, NewUser, Report, ReportErrorEntry,
    ReportPatch, ReportStatus, Team, TeamPatch, User,
};
use crate::errors::{Result, StoreError};
use chrono::Utc;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// List filter for reports. Raw filter values that match no stored value
/// simply produce an empty result, never an error.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Case-insensitive substring over title and description
    pub search: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamFilter {
    /// Case-insensitive substring over name and description
    pub search: Option<String>,
    pub status: Option<String>,
}

/// List filter for dashboards. `viewer` scopes the result to dashboards the
/// user created or is shared on; search and team narrow within that scope.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub viewer: Option<String>,
    pub search: Option<String>,
    pub team: Option<String>,
}

/// Thread-safe access to the entity catalog with JSON-file persistence.
/// Every mutation is validated against the in-memory catalog and saved
/// atomically (write to a temp file, then rename).
#[derive(Debug)]
pub struct DocumentStore {
    catalog_path: PathBuf,
    catalog: Arc<RwLock<Catalog>>,
}

impl DocumentStore {
    /// Open the catalog at the given path, creating an empty one if absent.
    pub fn new(catalog_path: impl Into<PathBuf>, schema_version: String) -> Result<Self> {
        let catalog_path = catalog_path.into();
        let store = Self {
            catalog_path,
            catalog: Arc::new(RwLock::new(Catalog::new(schema_version))),
        };

        if store.catalog_path.exists() {
            store.load_catalog()?;
        } else {
            if let Some(parent) = store.catalog_path.parent() {
                fs::create_dir_all(parent).map_err(StoreError::Io)?;
            }
            store.save_catalog()?;
        }

        Ok(store)
    }

    fn load_catalog(&self) -> Result<()> {
        debug!("Loading catalog from: {}", self.catalog_path.display());

        let content = fs::read_to_string(&self.catalog_path)?;
        let loaded: Catalog = serde_json::from_str(&content)?;

        {
            let mut catalog = self.catalog.write().unwrap();
            *catalog = loaded;
        }

        info!(
            "Loaded catalog with {} entities",
            self.with_catalog(|catalog| catalog.entity_count())
        );
        Ok(())
    }

    fn save_catalog(&self) -> Result<()> {
        debug!("Saving catalog to: {}", self.catalog_path.display());

        let content = {
            let catalog = self.catalog.read().unwrap();
            serde_json::to_string_pretty(&*catalog)?
        };

        let temp_path = self.catalog_path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.catalog_path)?;

        debug!("Catalog saved successfully");
        Ok(())
    }

    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.read().unwrap();
        f(&catalog)
    }

    pub fn with_catalog_mut<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        let result = {
            let mut catalog = self.catalog.write().unwrap();
            f(&mut catalog)
        };

        self.save_catalog()?;
        Ok(result)
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    // ---- users ----

    pub fn create_user(&self, draft: NewUser) -> Result<User> {
        self.with_catalog_mut(|catalog| {
            let user = User::from_draft(draft, catalog)?;
            catalog.users.insert(user.id.clone(), user.clone());
            Ok(user)
        })?
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.with_catalog(|catalog| catalog.users.get(id).cloned())
    }

    /// All users, oldest first.
    pub fn list_users(&self) -> Vec<User> {
        self.with_catalog(|catalog| {
            let mut users: Vec<User> = catalog.users.values().cloned().collect();
            users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            users
        })
    }

    pub fn user_count(&self) -> usize {
        self.with_catalog(|catalog| catalog.users.len())
    }

    // ---- teams ----

    pub fn create_team(&self, draft: NewTeam) -> Result<Team> {
        self.with_catalog_mut(|catalog| {
            let team = Team::from_draft(draft, catalog)?;
            catalog.teams.insert(team.id.clone(), team.clone());
            catalog.sync_team_references(&team);
            Ok(team)
        })?
    }

    pub fn get_team(&self, id: &str) -> Option<Team> {
        self.with_catalog(|catalog| catalog.teams.get(id).cloned())
    }

    pub fn update_team(&self, id: &str, patch: TeamPatch) -> Result<(Team, Vec<&'static str>)> {
        self.with_catalog_mut(|catalog| {
            let team = catalog.require_team(id)?.clone();
            let (updated, changed) = team.with_patch(patch, catalog)?;
            catalog.teams.insert(updated.id.clone(), updated.clone());
            catalog.sync_team_references(&updated);
            Ok((updated, changed))
        })?
    }

    pub fn delete_team(&self, id: &str) -> Result<Team> {
        self.with_catalog_mut(|catalog| {
            let team = catalog
                .teams
                .remove(id)
                .ok_or_else(|| StoreError::not_found("Team", id))?;
            catalog.unlink_team(&team.id);
            Ok(team)
        })?
    }

    /// Teams matching the filter, newest first.
    pub fn list_teams(&self, filter: &TeamFilter) -> Vec<Team> {
        self.with_catalog(|catalog| {
            let mut teams: Vec<Team> = catalog
                .teams
                .values()
                .filter(|team| {
                    matches_search(&filter.search, &[&team.name, &team.description])
                        && matches_value(&filter.status, &team.status.to_string())
                })
                .cloned()
                .collect();
            teams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            teams
        })
    }

    // ---- reports ----

    pub fn create_report(&self, draft: NewReport) -> Result<Report> {
        self.with_catalog_mut(|catalog| {
            let report = Report::from_draft(draft, catalog)?;
            catalog.reports.insert(report.id.clone(), report.clone());
            Ok(report)
        })?
    }

    pub fn get_report(&self, id: &str) -> Option<Report> {
        self.with_catalog(|catalog| catalog.reports.get(id).cloned())
    }

    pub fn update_report(&self, id: &str, patch: ReportPatch) -> Result<Report> {
        self.with_catalog_mut(|catalog| {
            let report = catalog.require_report(id)?.clone();
            let updated = report.with_patch(patch)?;
            catalog.reports.insert(updated.id.clone(), updated.clone());
            Ok(updated)
        })?
    }

    pub fn delete_report(&self, id: &str) -> Result<Report> {
        self.with_catalog_mut(|catalog| {
            catalog
                .reports
                .remove(id)
                .ok_or_else(|| StoreError::not_found("Report", id))
        })?
    }

    /// Reports matching the filter, newest first.
    pub fn list_reports(&self, filter: &ReportFilter) -> Vec<Report> {
        self.with_catalog(|catalog| {
            let mut reports: Vec<Report> = catalog
                .reports
                .values()
                .filter(|report| {
                    matches_search(&filter.search, &[&report.title, &report.description])
                        && matches_value(&filter.kind, &report.kind.to_string())
                        && matches_value(&filter.status, &report.status.to_string())
                        && matches_value(&filter.team, &report.team)
                })
                .cloned()
                .collect();
            reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            reports
        })
    }

    /// The most recent completed reports for a team, newest first.
    /// Used by chart widget resolution.
    pub fn recent_completed_reports(&self, team: &str, limit: usize) -> Vec<Report> {
        let filter = ReportFilter {
            status: Some(ReportStatus::Completed.to_string()),
            team: Some(team.to_string()),
            ..Default::default()
        };
        let mut reports = self.list_reports(&filter);
        reports.truncate(limit);
        reports
    }

    // ---- worker transitions ----
    //
    // These enforce the report lifecycle under a single write lock: the
    // existence and terminal-status re-checks are atomic with the write, so a
    // report deleted or finished mid-flight never gets a second terminal
    // write. All three return Ok(None) when the transition does not apply.

    /// Move a report to `in_progress` when a worker picks up its job.
    /// Progress is left unchanged.
    pub fn mark_report_in_progress(&self, id: &str) -> Result<Option<Report>> {
        self.transition_report(id, |report| {
            report.status = ReportStatus::InProgress;
        })
    }

    /// Terminal success: merge generator output into `data` (generator output
    /// wins on key collisions), set `completed` and progress 100.
    pub fn complete_report(
        &self,
        id: &str,
        output: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Option<Report>> {
        self.transition_report(id, |report| {
            report.data.extend(output);
            report.status = ReportStatus::Completed;
            report.progress = 100;
        })
    }

    /// Terminal failure: append the error entry, set `failed`. Progress keeps
    /// its last known value.
    pub fn fail_report(&self, id: &str, message: &str) -> Result<Option<Report>> {
        let entry = ReportErrorEntry {
            message: message.to_string(),
            timestamp: Utc::now(),
        };
        self.transition_report(id, move |report| {
            report.errors.push(entry);
            report.status = ReportStatus::Failed;
        })
    }

    fn transition_report<F>(&self, id: &str, apply: F) -> Result<Option<Report>>
    where
        F: FnOnce(&mut Report),
    {
        self.with_catalog_mut(|catalog| {
            let Some(report) = catalog.reports.get_mut(id) else {
                return None;
            };
            if report.is_terminal() {
                return None;
            }
            apply(report);
            report.updated_at = Utc::now();
            Some(report.clone())
        })
    }

    // ---- dashboards ----

    pub fn create_dashboard(&self, draft: NewDashboard) -> Result<Dashboard> {
        self.with_catalog_mut(|catalog| {
            let dashboard = Dashboard::from_draft(draft, catalog)?;
            catalog
                .dashboards
                .insert(dashboard.id.clone(), dashboard.clone());
            Ok(dashboard)
        })?
    }

    pub fn get_dashboard(&self, id: &str) -> Option<Dashboard> {
        self.with_catalog(|catalog| catalog.dashboards.get(id).cloned())
    }

    pub fn update_dashboard(
        &self,
        id: &str,
        patch: DashboardPatch,
    ) -> Result<(Dashboard, Vec<&'static str>)> {
        self.with_catalog_mut(|catalog| {
            let dashboard = catalog.require_dashboard(id)?.clone();
            let (updated, changed) = dashboard.with_patch(patch, catalog)?;
            catalog
                .dashboards
                .insert(updated.id.clone(), updated.clone());
            Ok((updated, changed))
        })?
    }

    pub fn delete_dashboard(&self, id: &str) -> Result<Dashboard> {
        self.with_catalog_mut(|catalog| {
            catalog
                .dashboards
                .remove(id)
                .ok_or_else(|| StoreError::not_found("Dashboard", id))
        })?
    }

    /// Dashboards matching the filter, newest first. Scoping, search and team
    /// filters compose (all must hold).
    pub fn list_dashboards(&self, filter: &DashboardFilter) -> Vec<Dashboard> {
        self.with_catalog(|catalog| {
            let mut dashboards: Vec<Dashboard> = catalog
                .dashboards
                .values()
                .filter(|dashboard| {
                    filter
                        .viewer
                        .as_deref()
                        .is_none_or(|viewer| dashboard.is_visible_to(viewer))
                        && matches_search(&filter.search, &[&dashboard.name, &dashboard.description])
                        && matches_value(&filter.team, &dashboard.team)
                })
                .cloned()
                .collect();
            dashboards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            dashboards
        })
    }
}

impl Clone for DocumentStore {
    fn clone(&self) -> Self {
        Self {
            catalog_path: self.catalog_path.clone(),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

fn matches_search(search: &Option<String>, fields: &[&str]) -> bool {
    match search {
        Some(needle) if !needle.trim().is_empty() => {
            let needle = needle.trim().to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&needle))
        }
        _ => true,
    }
}

fn matches_value(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().is_none_or(|f| f == value)
}
