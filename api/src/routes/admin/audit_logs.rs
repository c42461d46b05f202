use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use common::Paging;
use db::models::audit_log;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct AuditLogsResponse {
    pub data: Vec<audit_log::Model>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// GET /api/admin/audit-logs?page&limit
///
/// Reverse-chronological, paginated audit trail.
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    Query(paging): Query<Paging>,
) -> (StatusCode, Json<ApiResponse<AuditLogsResponse>>) {
    let db = app_state.db();
    let page = paging.page();
    let limit = paging.limit();

    let paginator = audit_log::Entity::find()
        .order_by_desc(audit_log::Column::Id)
        .paginate(db, limit);

    let (total, data) = match (paginator.num_items().await, paginator.fetch_page(page - 1).await) {
        (Ok(total), Ok(data)) => (total, data),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "failed to list audit logs");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AuditLogsResponse {
                data,
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
            "Audit logs retrieved successfully",
        )),
    )
}
