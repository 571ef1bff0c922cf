use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::auth::AdminSession;
use crate::http::server::AppState;
use crate::store::ContactMessage;

#[derive(Serialize)]
pub struct GateStats {
    pub version: &'static str,
    pub users: usize,
    pub open_rate_windows: usize,
    pub pending_login_codes: usize,
    pub contact_messages: usize,
}

#[derive(Deserialize)]
pub struct MessageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

pub async fn get_stats(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> Json<GateStats> {
    Json(GateStats {
        version: env!("CARGO_PKG_VERSION"),
        users: state.users.count(),
        open_rate_windows: state.rate_gate.tracked_keys(),
        pending_login_codes: state.otp.len(),
        contact_messages: state.inbox.len(),
    })
}

pub async fn get_messages(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    Query(query): Query<MessageQuery>,
) -> Json<Vec<ContactMessage>> {
    Json(state.inbox.recent(query.limit.min(100)))
}
