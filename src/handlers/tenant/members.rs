// handlers/tenant/members.rs - GET /api/members handler

use axum::{extract::Query, Extension};
use serde::Deserialize;

use crate::database::models::Member;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct MembersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl MembersQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Members of the resolved cooperative, read from its own database only
pub async fn members_list(
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<MembersQuery>,
) -> ApiResult<Vec<Member>> {
    let members = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, member_number, first_name, last_name, email, status, created_at
        FROM members
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(ctx.connection.pool())
    .await?;

    tracing::debug!(tenant = %ctx.tenant.id, count = members.len(), "Listed members");
    Ok(ApiResponse::success(members))
}
