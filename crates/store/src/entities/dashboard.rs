use crate::catalog::Catalog;
use crate::entities::{new_entity_id, optional_text, required_text, required_trimmed};
use crate::errors::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The closed set of widget kinds a dashboard may contain
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Chart,
    Table,
    Metric,
    Timeline,
    Map,
}

impl WidgetType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "chart" => Ok(WidgetType::Chart),
            "table" => Ok(WidgetType::Table),
            "metric" => Ok(WidgetType::Metric),
            "timeline" => Ok(WidgetType::Timeline),
            "map" => Ok(WidgetType::Map),
            other => Err(StoreError::validation(format!(
                "Invalid widget type: {other}"
            ))),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetType::Chart => write!(f, "chart"),
            WidgetType::Table => write!(f, "table"),
            WidgetType::Metric => write!(f, "metric"),
            WidgetType::Timeline => write!(f, "timeline"),
            WidgetType::Map => write!(f, "map"),
        }
    }
}

/// Grid placement of a widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPosition {
    pub row: u32,
    pub col: u32,
    pub size_x: u32,
    pub size_y: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: WidgetType,
    pub title: String,
    /// Stored configuration data. Never persisted in resolved form; chart
    /// widgets get live report data merged in at read time.
    pub data: Map<String, Value>,
    pub config: Map<String, Value>,
    pub position: WidgetPosition,
}

/// Caller input for one widget
#[derive(Debug, Clone, Default)]
pub struct WidgetDraft {
    pub kind: String,
    pub title: String,
    pub data: Option<Map<String, Value>>,
    pub config: Option<Map<String, Value>>,
    pub position: Option<WidgetPositionDraft>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetPositionDraft {
    pub row: i64,
    pub col: i64,
    pub size_x: i64,
    pub size_y: i64,
}

impl Widget {
    pub fn from_draft(draft: WidgetDraft) -> Result<Widget> {
        let Some(position) = draft.position else {
            return Err(StoreError::validation("Widget position is required"));
        };
        Ok(Widget {
            kind: WidgetType::parse(&draft.kind)?,
            title: required_trimmed("Widget title", &draft.title)?,
            data: draft.data.unwrap_or_default(),
            config: draft.config.unwrap_or_default(),
            position: WidgetPosition {
                row: validate_coordinate("row", position.row)?,
                col: validate_coordinate("col", position.col)?,
                size_x: validate_coordinate("sizeX", position.size_x)?,
                size_y: validate_coordinate("sizeY", position.size_y)?,
            },
        })
    }
}

fn validate_coordinate(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        StoreError::validation(format!("Widget position {field} must be a non-negative integer"))
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub widgets: Vec<Widget>,
    pub team: String,
    pub created_by: String,
    pub shared_with: Vec<String>,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller input for dashboard creation
#[derive(Debug, Clone, Default)]
pub struct NewDashboard {
    pub name: String,
    pub description: Option<String>,
    pub widgets: Vec<WidgetDraft>,
    pub team: String,
    pub created_by: String,
    pub shared_with: Vec<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Fields a dashboard update may touch
#[derive(Debug, Clone, Default)]
pub struct DashboardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub widgets: Option<Vec<WidgetDraft>>,
    pub shared_with: Option<Vec<String>>,
    pub metadata: Option<Map<String, Value>>,
}

impl Dashboard {
    pub fn from_draft(draft: NewDashboard, catalog: &Catalog) -> Result<Dashboard> {
        validate_references(&draft.team, &draft.created_by, &draft.shared_with, catalog)?;
        let widgets = draft
            .widgets
            .into_iter()
            .map(Widget::from_draft)
            .collect::<Result<Vec<_>>>()?;

        let now = Utc::now();
        Ok(Dashboard {
            id: new_entity_id(),
            name: required_text("Dashboard name", &draft.name, 3, 100)?,
            description: optional_text("Description", draft.description.as_deref().unwrap_or(""), 500)?,
            widgets,
            team: draft.team,
            created_by: draft.created_by,
            shared_with: draft.shared_with,
            metadata: draft.metadata.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch to a snapshot of this dashboard. Returns the updated
    /// dashboard and the names of the fields present in the patch.
    pub fn with_patch(
        &self,
        patch: DashboardPatch,
        catalog: &Catalog,
    ) -> Result<(Dashboard, Vec<&'static str>)> {
        let mut updated = self.clone();
        let mut changed = Vec::new();

        if let Some(name) = patch.name {
            updated.name = required_text("Dashboard name", &name, 3, 100)?;
            changed.push("name");
        }
        if let Some(description) = patch.description {
            updated.description = optional_text("Description", &description, 500)?;
            changed.push("description");
        }
        if let Some(widgets) = patch.widgets {
            updated.widgets = widgets
                .into_iter()
                .map(Widget::from_draft)
                .collect::<Result<Vec<_>>>()?;
            changed.push("widgets");
        }
        if let Some(shared_with) = patch.shared_with {
            validate_shared_users(&updated.team, &shared_with, catalog)?;
            updated.shared_with = shared_with;
            changed.push("sharedWith");
        }
        if let Some(metadata) = patch.metadata {
            updated.metadata = metadata;
            changed.push("metadata");
        }

        updated.updated_at = Utc::now();
        Ok((updated, changed))
    }

    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.created_by == user_id || self.shared_with.iter().any(|u| u == user_id)
    }
}

fn validate_references(
    team: &str,
    created_by: &str,
    shared_with: &[String],
    catalog: &Catalog,
) -> Result<()> {
    if !catalog.teams.contains_key(team) {
        return Err(StoreError::validation("Team does not exist"));
    }
    if !catalog.users.contains_key(created_by) {
        return Err(StoreError::validation("Creator does not exist"));
    }
    validate_shared_users(team, shared_with, catalog)
}

fn validate_shared_users(team: &str, shared_with: &[String], catalog: &Catalog) -> Result<()> {
    if shared_with.is_empty() {
        return Ok(());
    }
    if shared_with.iter().any(|id| !catalog.users.contains_key(id)) {
        return Err(StoreError::validation("Some shared users do not exist"));
    }
    let Some(team) = catalog.teams.get(team) else {
        return Err(StoreError::validation("Team does not exist"));
    };
    if shared_with.iter().any(|id| !team.has_member(id)) {
        return Err(StoreError::validation("Some shared users are not in the team"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewTeam, NewUser, Team, User};

    fn seeded_catalog() -> (Catalog, String, String, String) {
        let mut catalog = Catalog::new("0.1.0".to_string());
        let mut add_user = |email: &str, catalog: &mut Catalog| {
            let user = User::from_draft(
                NewUser {
                    email: email.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    role: None,
                },
                catalog,
            )
            .unwrap();
            let id = user.id.clone();
            catalog.users.insert(id.clone(), user);
            id
        };
        let leader = add_user("leader@x.io", &mut catalog);
        let member = add_user("member@x.io", &mut catalog);
        let outsider = add_user("outsider@x.io", &mut catalog);

        let team = Team::from_draft(
            NewTeam {
                name: "Core Team".to_string(),
                leader: leader.clone(),
                members: vec![member.clone()],
                ..Default::default()
            },
            &catalog,
        )
        .unwrap();
        let team_id = team.id.clone();
        catalog.teams.insert(team_id.clone(), team);

        (catalog, team_id, member, outsider)
    }

    fn chart_widget() -> WidgetDraft {
        WidgetDraft {
            kind: "chart".to_string(),
            title: "Revenue".to_string(),
            position: Some(WidgetPositionDraft {
                row: 0,
                col: 0,
                size_x: 2,
                size_y: 1,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_draft_builds_widgets() {
        let (catalog, team, member, _) = seeded_catalog();
        let dashboard = Dashboard::from_draft(
            NewDashboard {
                name: "Team Overview".to_string(),
                widgets: vec![chart_widget()],
                team,
                created_by: member,
                ..Default::default()
            },
            &catalog,
        )
        .unwrap();
        assert_eq!(dashboard.widgets.len(), 1);
        assert_eq!(dashboard.widgets[0].kind, WidgetType::Chart);
        assert_eq!(dashboard.widgets[0].position.size_x, 2);
    }

    #[test]
    fn test_widget_without_position_rejected() {
        let (catalog, team, member, _) = seeded_catalog();
        let mut widget = chart_widget();
        widget.position = None;
        let err = Dashboard::from_draft(
            NewDashboard {
                name: "Team Overview".to_string(),
                widgets: vec![widget],
                team,
                created_by: member,
                ..Default::default()
            },
            &catalog,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Widget position is required");
    }

    #[test]
    fn test_negative_position_rejected() {
        let mut widget = chart_widget();
        widget.position = Some(WidgetPositionDraft {
            row: -1,
            col: 0,
            size_x: 1,
            size_y: 1,
        });
        assert!(Widget::from_draft(widget).is_err());
    }

    #[test]
    fn test_unknown_widget_type_rejected() {
        let mut widget = chart_widget();
        widget.kind = "gauge".to_string();
        assert!(Widget::from_draft(widget).is_err());
    }

    #[test]
    fn test_shared_user_outside_team_rejected() {
        let (catalog, team, member, outsider) = seeded_catalog();
        let err = Dashboard::from_draft(
            NewDashboard {
                name: "Team Overview".to_string(),
                team,
                created_by: member,
                shared_with: vec![outsider],
                ..Default::default()
            },
            &catalog,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Some shared users are not in the team");
    }

    #[test]
    fn test_patch_tracks_changed_fields() {
        let (catalog, team, member, _) = seeded_catalog();
        let dashboard = Dashboard::from_draft(
            NewDashboard {
                name: "Team Overview".to_string(),
                team,
                created_by: member.clone(),
                ..Default::default()
            },
            &catalog,
        )
        .unwrap();

        let patch = DashboardPatch {
            shared_with: Some(vec![member.clone()]),
            widgets: Some(vec![chart_widget()]),
            ..Default::default()
        };
        let (updated, changed) = dashboard.with_patch(patch, &catalog).unwrap();
        assert_eq!(changed, vec!["widgets", "sharedWith"]);
        assert!(updated.is_visible_to(&member));
        assert_eq!(updated.widgets.len(), 1);
    }
}
