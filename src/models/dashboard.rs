// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Os cards do dashboard mudam conforme o papel de quem pergunta.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardStats {
    #[serde(rename_all = "camelCase")]
    Admin {
        total_trips: i64,
        total_users: i64,
        confirmed_trips: i64,
    },
    #[serde(rename_all = "camelCase")]
    Agent {
        my_trips: i64,
        confirmed_trips: i64,
        completed_trips: i64,
    },
    #[serde(rename_all = "camelCase")]
    Client {
        my_trips: i64,
        upcoming_trips: i64,
        pending_quotes: i64,
    },
}
