use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use models::{employee::EmployeeFilter, Record};
use serde::Deserialize;
use serde_json::Value;
use service::auth::domain::Claims;
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub department: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// `GET /api/employees`: all employees in insertion order, optionally
/// filtered by `department`/`status` and paged with `page`/`per_page`.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Record>>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let filter = EmployeeFilter { department: q.department, status: q.status };
    let page = Pagination::from_query(q.page, q.per_page);
    Ok(Json(state.employees.list(&filter, page).await))
}

/// `POST /api/employees` → 201 with the stored record.
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), JsonApiError> {
    let Json(body) = payload?;
    let mut fields = Record::from_value(body)?;
    if !fields.contains("createdBy") {
        fields.insert("createdBy", claims.sub);
    }
    let created = state.employees.create(fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, JsonApiError> {
    state
        .employees
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Employee not found"))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, JsonApiError> {
    let Json(body) = payload?;
    let patch = Record::from_value(body)?;
    state
        .employees
        .update(&id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Employee not found"))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    if state.employees.delete(&id).await? {
        Ok(Json(serde_json::json!({"message": "Employee deleted successfully", "id": id})))
    } else {
        Err(JsonApiError::not_found("Employee not found"))
    }
}
