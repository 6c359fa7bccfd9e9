use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

// Problem-details body in the shape the API has always returned. The type
// URIs are stable identifiers for each error category; clients match on
// them, so they must not change.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_uri: &'static str,
    pub title: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(skip)]
    retry_after_secs: Option<u64>,
    #[serde(skip)]
    rate_limit_remaining: Option<usize>,
}

impl Problem {
    fn new(type_uri: &'static str, title: &'static str, status: StatusCode) -> Self {
        Self {
            type_uri,
            title,
            status: status.as_u16(),
            detail: None,
            errors: None,
            retry_after_secs: None,
            rate_limit_remaining: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            "https://tools.ietf.org/html/rfc7231#section-6.3.2",
            "Unauthorized",
            StatusCode::UNAUTHORIZED,
        )
        .with_detail("Missing or invalid API key. Provide 'X-API-Key' header.".to_string())
    }

    pub fn forbidden() -> Self {
        Self::new(
            "https://tools.ietf.org/html/rfc7231#section-6.5.3",
            "Forbidden",
            StatusCode::FORBIDDEN,
        )
        .with_detail("API key is read-only and cannot perform modifying requests.".to_string())
    }

    // Carries the advisory retry hint and the (zero) remaining quota as
    // response headers
    pub fn rate_limited(retry_after_secs: u64, remaining: usize) -> Self {
        let mut problem = Self::new(
            "https://tools.ietf.org/html/rfc6585#section-4",
            "Too Many Requests",
            StatusCode::TOO_MANY_REQUESTS,
        )
        .with_detail(format!(
            "Rate limit exceeded. Try again in {retry_after_secs} seconds."
        ));
        problem.retry_after_secs = Some(retry_after_secs);
        problem.rate_limit_remaining = Some(remaining);
        problem
    }

    pub fn not_found(detail: String) -> Self {
        Self::new(
            "https://tools.ietf.org/html/rfc7231#section-6.5.4",
            "Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
    }

    pub fn validation(errors: Value) -> Self {
        let mut problem = Self::new(
            "https://tools.ietf.org/html/rfc7231#section-6.5.1",
            "One or more validation errors occurred.",
            StatusCode::BAD_REQUEST,
        );
        problem.errors = Some(errors);
        problem
    }

    pub fn conflict(detail: String) -> Self {
        Self::new(
            "https://tools.ietf.org/html/rfc7231#section-6.5.8",
            "Conflict",
            StatusCode::CONFLICT,
        )
        .with_detail(detail)
    }

    fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after_secs = self.retry_after_secs;
        let rate_limit_remaining = self.rate_limit_remaining;

        let mut response = (status, Json(self)).into_response();
        if let Some(secs) = retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        if let Some(remaining) = rate_limit_remaining {
            response
                .headers_mut()
                .insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_body_has_problem_fields() {
        let body = serde_json::to_value(Problem::unauthorized()).unwrap();
        assert_eq!(
            body["type"],
            "https://tools.ietf.org/html/rfc7231#section-6.3.2"
        );
        assert_eq!(body["title"], "Unauthorized");
        assert_eq!(body["status"], 401);
        assert!(body["detail"].as_str().unwrap().contains("X-API-Key"));
        // no errors field unless validation failed
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn validation_body_nests_field_errors() {
        let problem = Problem::validation(serde_json::json!({
            "title": ["Title is required."]
        }));
        let body = serde_json::to_value(problem).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["errors"]["title"][0], "Title is required.");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn rate_limited_response_carries_headers() {
        let response = Problem::rate_limited(60, 0).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
        assert_eq!(response.headers()["X-RateLimit-Remaining"], "0");
    }
}
