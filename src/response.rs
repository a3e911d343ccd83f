use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};

/// Success envelope shared by every endpoint: `statusCode` mirrors the HTTP
/// status, `success` is true for anything below 400.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(StatusCode::OK, data, message))
    }

    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::new(StatusCode::CREATED, data, message))
    }
}

/// Paginated listing wrapper. Field names follow the client contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub limit: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T: Serialize> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, page: i64, limit: i64) -> Self {
        // An empty result still reports one (empty) page.
        let total_pages = if total_docs == 0 {
            1
        } else {
            (total_docs + limit - 1) / limit
        };

        Page {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

pub const MAX_PAGE_LIMIT: i64 = 100;

/// `?page=&limit=` query parameters common to paginated listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp to sane bounds and return `(page, limit, offset)`.
    pub fn resolve(&self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_a_single_empty_page() {
        let page: Page<i32> = Page::new(vec![], 0, 1, 10);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }

    #[test]
    fn page_flags_track_position() {
        let first: Page<i32> = Page::new(vec![1; 10], 25, 1, 10);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let middle: Page<i32> = Page::new(vec![1; 10], 25, 2, 10);
        assert!(middle.has_next_page);
        assert!(middle.has_prev_page);

        let last: Page<i32> = Page::new(vec![1; 5], 25, 3, 10);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn query_resolution_clamps_inputs() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(100_000),
        };
        assert_eq!(q.resolve(10), (1, MAX_PAGE_LIMIT, 0));

        let defaults = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(defaults.resolve(15), (1, 15, 0));

        let third = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(third.resolve(10), (3, 20, 40));
    }

    #[test]
    fn success_envelope_tracks_status() {
        let body = ApiResponse::new(StatusCode::OK, serde_json::json!({"x": 1}), "done");
        assert!(body.success);
        assert_eq!(body.status_code, 200);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
    }
}
