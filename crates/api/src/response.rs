//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kplanner_db::repositories::keyword::BulkOutcome;
use serde::Serialize;

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Build a pagination block from a page request and total row count.
    #[must_use]
    pub const fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// Single-object response, optionally carrying an advisory message such as
/// the active-limit notice.
#[derive(Debug, Serialize)]
pub struct ObjectResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ObjectResponse<T> {
    /// Plain success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
            status: StatusCode::OK,
        }
    }

    /// Success response with an advisory message.
    pub const fn with_message(data: T, message: Option<String>) -> Self {
        Self {
            data,
            message,
            status: StatusCode::OK,
        }
    }

    /// `201 Created` response for the create endpoints.
    pub const fn created(data: T, message: Option<String>) -> Self {
        Self {
            data,
            message,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ObjectResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Paginated list response.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Counters returned by the bulk create/attach endpoints.
#[derive(Debug, Serialize)]
pub struct BulkWriteResponse {
    pub created: u64,
    pub existing: u64,
    pub relations_created: u64,
    pub relations_updated: u64,
    pub batches_processed: u64,
    #[serde(skip)]
    status: StatusCode,
}

impl BulkWriteResponse {
    /// Merge batch counters into the response shape.
    #[must_use]
    pub const fn new(outcome: BulkOutcome, batches: u64) -> Self {
        Self {
            created: outcome.created,
            existing: outcome.existing,
            relations_created: outcome.relations_created,
            relations_updated: outcome.relations_updated,
            batches_processed: batches,
            status: StatusCode::OK,
        }
    }

    /// `201 Created` variant for the bulk create endpoints.
    #[must_use]
    pub const fn created(outcome: BulkOutcome, batches: u64) -> Self {
        Self {
            created: outcome.created,
            existing: outcome.existing,
            relations_created: outcome.relations_created,
            relations_updated: outcome.relations_updated,
            batches_processed: batches,
            status: StatusCode::CREATED,
        }
    }
}

impl IntoResponse for BulkWriteResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Row count returned by the bulk relation-update endpoints.
#[derive(Debug, Serialize)]
pub struct RelationsUpdatedResponse {
    pub relations_updated: u64,
}

impl IntoResponse for RelationsUpdatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_response_statuses() {
        assert_eq!(ObjectResponse::ok(1).into_response().status(), StatusCode::OK);
        assert_eq!(
            ObjectResponse::created(1, None).into_response().status(),
            StatusCode::CREATED
        );
    }

    #[test]
    fn test_bulk_write_response_statuses() {
        let outcome = BulkOutcome::default();
        assert_eq!(
            BulkWriteResponse::new(outcome, 1).into_response().status(),
            StatusCode::OK
        );
        assert_eq!(
            BulkWriteResponse::created(outcome, 1).into_response().status(),
            StatusCode::CREATED
        );
    }

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 50, 101);
        assert_eq!(p.total_pages, 3);
    }
}
