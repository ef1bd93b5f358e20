use axum::{extract::State, Json};
use std::sync::{Arc, Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

use crate::models::StatsResponse;
use crate::AppState;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Admin statistics: broadcast-layer counters plus process-level system
/// figures. Totals for users and tabs live with the persistence service.
pub async fn stats(State(app_state): State<Arc<AppState>>) -> Json<StatsResponse> {

    // Aggregate counters from the connection registry
    let connected_clients = app_state.registry.live_count().await as u32;
    let user_groups = app_state.registry.group_count().await as u32;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Stats: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Groups: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        connected_clients,
        user_groups
    );

    Json(StatsResponse {
        connected_clients,
        user_groups,
        cpu_usage,
        memory_alloc,
        memory_total,
        memory_free,
    })
}
