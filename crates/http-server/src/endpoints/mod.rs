//! One module per HTTP endpoint, each owning its request/response contract.

pub mod channel;
pub mod channel_subscribers;
pub mod dashboard_create;
pub mod dashboard_delete;
pub mod dashboard_get;
pub mod dashboard_list;
pub mod dashboard_update;
pub mod events;
pub mod health;
pub mod info;
pub mod report_create;
pub mod report_delete;
pub mod report_export;
pub mod report_get;
pub mod report_list;
pub mod report_update;
pub mod shared;
pub mod team_create;
pub mod team_delete;
pub mod team_get;
pub mod team_list;
pub mod team_members;
pub mod team_update;
pub mod user_create;
pub mod user_list;
