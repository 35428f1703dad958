use crate::cli::SeedArgs;
use crate::utils::is_server_running;
use anyhow::Result;
use logging::LogMode;
use std::process;
use store::{
    DataDirectory, DocumentStore, NewDashboard, NewReport, NewTeam, NewUser, WidgetDraft,
    WidgetPositionDraft,
};
use tracing::{error, info};

/// Loads a small, self-consistent demo data set: three users, one team, a
/// pair of reports (one already completed so chart widgets have data) and a
/// shared dashboard.
pub fn run(args: SeedArgs) -> Result<()> {
    let _guards = logging::init(LogMode::Cli, args.verbose)?;

    let data_dir = match args.data_dir {
        Some(root) => DataDirectory::new(root)?,
        None => DataDirectory::new_system_default()?,
    };
    if let Some(port) = is_server_running(&data_dir)? {
        error!("pulseboard server is running on port {port}. Stop it before seeding.");
        process::exit(1);
    }

    let store = DocumentStore::new(
        data_dir.catalog_path.clone(),
        env!("CARGO_PKG_VERSION").to_string(),
    )?;

    if !store.list_users().is_empty() {
        info!("Data directory already contains users, skipping seed");
        return Ok(());
    }

    let admin = store.create_user(NewUser {
        email: "ava.moreno@pulseboard.dev".to_string(),
        first_name: "Ava".to_string(),
        last_name: "Moreno".to_string(),
        role: Some("admin".to_string()),
    })?;
    let jonas = store.create_user(NewUser {
        email: "jonas.brandt@pulseboard.dev".to_string(),
        first_name: "Jonas".to_string(),
        last_name: "Brandt".to_string(),
        role: None,
    })?;
    let priya = store.create_user(NewUser {
        email: "priya.nair@pulseboard.dev".to_string(),
        first_name: "Priya".to_string(),
        last_name: "Nair".to_string(),
        role: None,
    })?;

    let team = store.create_team(NewTeam {
        name: "Platform Team".to_string(),
        description: Some("Owns the service platform and its delivery metrics".to_string()),
        members: vec![jonas.id.clone(), priya.id.clone()],
        leader: admin.id.clone(),
        ..Default::default()
    })?;

    let velocity = store.create_report(NewReport {
        title: "Sprint Velocity".to_string(),
        description: Some("Velocity over the last six sprints".to_string()),
        kind: "performance".to_string(),
        team: team.id.clone(),
        created_by: admin.id.clone(),
        assigned_to: vec![jonas.id.clone()],
        ..Default::default()
    })?;
    let mut output = serde_json::Map::new();
    output.insert(
        "summary".to_string(),
        serde_json::Value::String("Velocity held steady at 42 points".to_string()),
    );
    store.complete_report(&velocity.id, output)?;

    store.create_report(NewReport {
        title: "Incident Review".to_string(),
        description: Some("Open incident follow-ups".to_string()),
        kind: "operational".to_string(),
        team: team.id.clone(),
        created_by: admin.id.clone(),
        assigned_to: vec![priya.id.clone()],
        ..Default::default()
    })?;

    store.create_dashboard(NewDashboard {
        name: "Platform Overview".to_string(),
        description: Some("Delivery health at a glance".to_string()),
        widgets: vec![
            WidgetDraft {
                kind: "chart".to_string(),
                title: "Velocity Trend".to_string(),
                position: Some(WidgetPositionDraft {
                    row: 0,
                    col: 0,
                    size_x: 2,
                    size_y: 1,
                }),
                ..Default::default()
            },
            WidgetDraft {
                kind: "metric".to_string(),
                title: "Open Reports".to_string(),
                position: Some(WidgetPositionDraft {
                    row: 0,
                    col: 2,
                    size_x: 1,
                    size_y: 1,
                }),
                ..Default::default()
            },
        ],
        team: team.id.clone(),
        created_by: admin.id.clone(),
        shared_with: vec![jonas.id.clone()],
        ..Default::default()
    })?;

    info!(
        "Seeded 3 users, 1 team, 2 reports and 1 dashboard into {}",
        data_dir.root_path.display()
    );
    info!("Admin user id: {}", admin.id);
    Ok(())
}
