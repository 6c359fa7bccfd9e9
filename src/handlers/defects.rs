use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Problem;
use crate::models::{CreateDefectRequest, Defect, PatchDefectRequest, UpdateDefectRequest};
use crate::state::AppState;

fn title_errors(title: &str) -> Vec<String> {
    if title.trim().is_empty() {
        vec!["Title is required.".to_string()]
    } else {
        Vec::new()
    }
}

fn not_found(id: Uuid) -> Problem {
    Problem::not_found(format!("Defect with id {id} not found."))
}

pub async fn list_defects(State(state): State<Arc<AppState>>) -> Json<Vec<Defect>> {
    Json(state.defects.list())
}

pub async fn get_defect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Defect>, Problem> {
    state.defects.get(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn create_defect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDefectRequest>,
) -> Result<Response, Problem> {
    let errors = title_errors(&request.title);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    let defect = Defect {
        id: Uuid::new_v4(),
        title: request.title,
        severity: request.severity,
        status: request.status,
        linked_test_case_id: request.linked_test_case_id,
        created_at: Utc::now(),
    };
    state.defects.insert(defect.clone());

    let location = format!("/api/defects/{}", defect.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(defect),
    )
        .into_response())
}

pub async fn update_defect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDefectRequest>,
) -> Result<Json<Defect>, Problem> {
    let existing = state.defects.get(id).ok_or_else(|| not_found(id))?;

    let errors = title_errors(&request.title);
    if !errors.is_empty() {
        return Err(Problem::validation(json!({ "title": errors })));
    }

    // creation time survives replacement
    let updated = Defect {
        id: existing.id,
        title: request.title,
        severity: request.severity,
        status: request.status,
        linked_test_case_id: request.linked_test_case_id,
        created_at: existing.created_at,
    };
    state.defects.insert(updated.clone());
    Ok(Json(updated))
}

pub async fn patch_defect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PatchDefectRequest>,
) -> Result<Json<Defect>, Problem> {
    let mut existing = state.defects.get(id).ok_or_else(|| not_found(id))?;

    if let Some(title) = request.title.filter(|t| !t.is_empty()) {
        existing.title = title;
    }
    if let Some(severity) = request.severity {
        existing.severity = severity;
    }
    if let Some(status) = request.status {
        existing.status = status;
    }
    if let Some(linked_test_case_id) = request.linked_test_case_id {
        existing.linked_test_case_id = Some(linked_test_case_id);
    }

    state.defects.insert(existing.clone());
    Ok(Json(existing))
}

pub async fn delete_defect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    if !state.defects.remove(id) {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
