//! Wire views of store entities.
//!
//! Store entities keep raw reference ids; the API returns them with their
//! references populated (team name, creator/assignee display names) the way
//! the frontend renders them. Conversion is lookup-based: a dangling
//! reference serializes as `null` (or drops out of a list) instead of
//! failing the read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::{Dashboard, DocumentStore, Report, Team, User, Widget};
use ts_rs::TS;

const API_TS: &str = "../../../packages/frontend/src/api.ts";

/// Display reference to a user (`firstName`/`lastName` populate shape).
#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct UserRef {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Display reference to a team.
#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub teams: Vec<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Member shape for `/api/teams/{id}/members` (adds email and role).
#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct MemberView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<UserRef>,
    pub leader: Option<UserRef>,
    pub status: String,
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Map<String, Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct ReportErrorView {
    pub message: String,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct ReportView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    pub status: String,
    pub progress: u8,
    #[ts(type = "Record<string, unknown>")]
    pub data: Map<String, Value>,
    pub team: Option<TeamRef>,
    pub created_by: Option<UserRef>,
    pub assigned_to: Vec<UserRef>,
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Map<String, Value>,
    pub errors: Vec<ReportErrorView>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct WidgetPositionView {
    pub row: u32,
    pub col: u32,
    pub size_x: u32,
    pub size_y: u32,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct WidgetView {
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    pub title: String,
    #[ts(type = "Record<string, unknown>")]
    pub data: Map<String, Value>,
    #[ts(type = "Record<string, unknown>")]
    pub config: Map<String, Value>,
    pub position: WidgetPositionView,
}

#[derive(Serialize, Deserialize, TS, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = API_TS)]
pub struct DashboardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub widgets: Vec<WidgetView>,
    pub team: Option<TeamRef>,
    pub created_by: Option<UserRef>,
    pub shared_with: Vec<UserRef>,
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Map<String, Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

pub fn to_user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

pub fn to_user_view(user: &User) -> UserView {
    UserView {
        id: user.id.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: user.role.to_string(),
        teams: user.teams.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn to_member_view(user: &User) -> MemberView {
    MemberView {
        id: user.id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
    }
}

pub fn to_team_ref(team: &Team) -> TeamRef {
    TeamRef {
        id: team.id.clone(),
        name: team.name.clone(),
    }
}

pub fn to_widget_view(widget: &Widget) -> WidgetView {
    WidgetView {
        kind: widget.kind.to_string(),
        title: widget.title.clone(),
        data: widget.data.clone(),
        config: widget.config.clone(),
        position: WidgetPositionView {
            row: widget.position.row,
            col: widget.position.col,
            size_x: widget.position.size_x,
            size_y: widget.position.size_y,
        },
    }
}

fn lookup_user_ref(store: &DocumentStore, id: &str) -> Option<UserRef> {
    store.get_user(id).map(|user| to_user_ref(&user))
}

fn lookup_user_refs(store: &DocumentStore, ids: &[String]) -> Vec<UserRef> {
    ids.iter()
        .filter_map(|id| lookup_user_ref(store, id))
        .collect()
}

pub fn team_view(store: &DocumentStore, team: &Team) -> TeamView {
    TeamView {
        id: team.id.clone(),
        name: team.name.clone(),
        description: team.description.clone(),
        members: lookup_user_refs(store, &team.members),
        leader: lookup_user_ref(store, &team.leader),
        status: team.status.to_string(),
        metadata: team.metadata.clone(),
        created_at: team.created_at,
        updated_at: team.updated_at,
    }
}

pub fn report_view(store: &DocumentStore, report: &Report) -> ReportView {
    ReportView {
        id: report.id.clone(),
        title: report.title.clone(),
        description: report.description.clone(),
        kind: report.kind.to_string(),
        status: report.status.to_string(),
        progress: report.progress,
        data: report.data.clone(),
        team: store.get_team(&report.team).map(|t| to_team_ref(&t)),
        created_by: lookup_user_ref(store, &report.created_by),
        assigned_to: lookup_user_refs(store, &report.assigned_to),
        metadata: report.metadata.clone(),
        errors: report
            .errors
            .iter()
            .map(|entry| ReportErrorView {
                message: entry.message.clone(),
                timestamp: entry.timestamp,
            })
            .collect(),
        created_at: report.created_at,
        updated_at: report.updated_at,
    }
}

/// Dashboard view over already-resolved widgets (see [`crate::resolver`]).
pub fn dashboard_view(
    store: &DocumentStore,
    dashboard: &Dashboard,
    widgets: &[Widget],
) -> DashboardView {
    DashboardView {
        id: dashboard.id.clone(),
        name: dashboard.name.clone(),
        description: dashboard.description.clone(),
        widgets: widgets.iter().map(to_widget_view).collect(),
        team: store.get_team(&dashboard.team).map(|t| to_team_ref(&t)),
        created_by: lookup_user_ref(store, &dashboard.created_by),
        shared_with: lookup_user_refs(store, &dashboard.shared_with),
        metadata: dashboard.metadata.clone(),
        created_at: dashboard.created_at,
        updated_at: dashboard.updated_at,
    }
}
