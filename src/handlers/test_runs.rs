use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Problem;
use crate::models::{CreateTestRunRequest, PatchTestRunRequest, TestRun, UpdateTestRunRequest};
use crate::state::AppState;

fn name_errors(name: &str) -> Vec<String> {
    if name.trim().is_empty() {
        vec!["Name is required.".to_string()]
    } else {
        Vec::new()
    }
}

fn not_found(id: Uuid) -> Problem {
    Problem::not_found(format!("TestRun with id {id} not found."))
}

pub async fn list_test_runs(State(state): State<Arc<AppState>>) -> Json<Vec<TestRun>> {
    Json(state.test_runs.list())
}

pub async fn get_test_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestRun>, Problem> {
    state.test_runs.get(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn create_test_run(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTestRunRequest>,
) -> Result<Response, Problem> {
    let errors = name_errors(&request.name);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    let test_run = TestRun {
        id: Uuid::new_v4(),
        name: request.name,
        status: request.status,
        executed_at: request.executed_at,
        test_case_ids: request.test_case_ids,
    };
    state.test_runs.insert(test_run.clone());

    let location = format!("/api/testruns/{}", test_run.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(test_run),
    )
        .into_response())
}

pub async fn update_test_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTestRunRequest>,
) -> Result<Json<TestRun>, Problem> {
    let existing = state.test_runs.get(id).ok_or_else(|| not_found(id))?;

    let errors = name_errors(&request.name);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    let updated = TestRun {
        id: existing.id,
        name: request.name,
        status: request.status,
        executed_at: request.executed_at,
        test_case_ids: request.test_case_ids,
    };
    state.test_runs.insert(updated.clone());
    Ok(Json(updated))
}

pub async fn patch_test_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PatchTestRunRequest>,
) -> Result<Json<TestRun>, Problem> {
    let mut existing = state.test_runs.get(id).ok_or_else(|| not_found(id))?;

    if let Some(name) = request.name.filter(|n| !n.is_empty()) {
        existing.name = name;
    }
    if let Some(status) = request.status {
        existing.status = status;
    }
    if let Some(executed_at) = request.executed_at {
        existing.executed_at = Some(executed_at);
    }
    if let Some(test_case_ids) = request.test_case_ids {
        existing.test_case_ids = test_case_ids;
    }

    state.test_runs.insert(existing.clone());
    Ok(Json(existing))
}

pub async fn delete_test_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    if !state.test_runs.remove(id) {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
