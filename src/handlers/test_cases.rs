use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Problem;
use crate::models::{
    CreateTestCaseRequest, PagedResponse, PatchTestCaseRequest, TestCase, TestCasePriority,
    UpdateTestCaseRequest,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTestCasesParams {
    pub priority: Option<TestCasePriority>,
    pub is_active: Option<bool>,
    pub tag: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn title_errors(title: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("Title is required.".to_string());
    } else {
        let length = title.chars().count();
        if !(3..=120).contains(&length) {
            errors.push("Title must be between 3 and 120 characters.".to_string());
        }
    }
    errors
}

fn not_found(id: Uuid) -> Problem {
    Problem::not_found(format!("TestCase with id {id} not found."))
}

pub async fn list_test_cases(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTestCasesParams>,
) -> Json<PagedResponse<TestCase>> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(10).clamp(1, 100);

    let (items, total_count) = state.test_cases.list(
        params.priority,
        params.is_active,
        params.tag.as_deref(),
        page,
        page_size,
    );

    Json(PagedResponse {
        data: items,
        total_count,
        page,
        page_size,
    })
}

pub async fn get_test_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestCase>, Problem> {
    state.test_cases.get(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn create_test_case(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTestCaseRequest>,
) -> Result<Response, Problem> {
    let errors = title_errors(&request.title);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    let test_case = TestCase {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        priority: request.priority,
        is_active: request.is_active,
        tags: request.tags,
    };
    state.test_cases.insert(test_case.clone());

    let location = format!("/api/testcases/{}", test_case.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(test_case),
    )
        .into_response())
}

pub async fn update_test_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTestCaseRequest>,
) -> Result<Json<TestCase>, Problem> {
    let existing = state.test_cases.get(id).ok_or_else(|| not_found(id))?;

    let errors = title_errors(&request.title);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    let updated = TestCase {
        id: existing.id,
        title: request.title,
        description: request.description,
        priority: request.priority,
        is_active: request.is_active,
        tags: request.tags,
    };
    state.test_cases.insert(updated.clone());
    Ok(Json(updated))
}

pub async fn patch_test_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PatchTestCaseRequest>,
) -> Result<Json<TestCase>, Problem> {
    let mut existing = state.test_cases.get(id).ok_or_else(|| not_found(id))?;

    if let Some(title) = request.title.filter(|t| !t.is_empty()) {
        let errors = title_errors(&title);
        if !errors.is_empty() {
            return Err(Problem::validation(json!({ "title": errors })));
        }
        existing.title = title;
    }
    if let Some(description) = request.description {
        existing.description = Some(description);
    }
    if let Some(priority) = request.priority {
        existing.priority = priority;
    }
    if let Some(is_active) = request.is_active {
        existing.is_active = is_active;
    }
    if let Some(tags) = request.tags {
        existing.tags = tags;
    }

    state.test_cases.insert(existing.clone());
    Ok(Json(existing))
}

pub async fn delete_test_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    if state.test_cases.get(id).is_none() {
        return Err(not_found(id));
    }

    // test cases referenced by a run cannot be removed
    if state.test_runs.any_references(id) {
        return Err(Problem::conflict(
            "Cannot delete TestCase because it is referenced by one or more TestRuns.".to_string(),
        ));
    }

    state.test_cases.remove(id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_must_be_present_and_sized() {
        assert_eq!(title_errors(""), vec!["Title is required.".to_string()]);
        assert_eq!(title_errors("   "), vec!["Title is required.".to_string()]);
        assert_eq!(
            title_errors("ab"),
            vec!["Title must be between 3 and 120 characters.".to_string()]
        );
        assert_eq!(title_errors(&"x".repeat(121)).len(), 1);
        assert!(title_errors("abc").is_empty());
        assert!(title_errors(&"x".repeat(120)).is_empty());
    }
}
