use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for the admin statistics endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub connected_clients: u32,
    pub user_groups: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
