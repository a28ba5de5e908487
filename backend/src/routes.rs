use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use todo_shared::{CreateTodoRequest, HealthStatus, MessageBody, Priority, Todo, UpdateTodoRequest};
use uuid::Uuid;

use crate::error::{route_not_found, ApiError};
use crate::state::AppState;

/// Methods a path does not handle answer like unknown paths, not with 405.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/todos",
            get(get_todos).post(create_todo).fallback(route_not_found),
        )
        .route(
            "/api/todos/:id",
            get(get_todo)
                .put(update_todo)
                .delete(delete_todo)
                .fallback(route_not_found),
        )
        .route("/health", get(health).fallback(route_not_found))
}

/// Liveness only; does not touch the store.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        uptime: state.uptime().as_secs_f64(),
    })
}

/// A malformed id cannot name a stored record, so it is reported as missing.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::todo_not_found())
}

async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch todos"))?;
    Ok(Json(todos))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state
        .store
        .get(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch todo"))?;
    Ok(Json(todo))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(mut request) = payload?;

    if request.title.as_deref().map_or(true, str::is_empty) {
        return Err(ApiError::bad_request("Title is required"));
    }
    if request.priority.as_deref().map_or(true, str::is_empty) {
        request.priority = Some(Priority::default().to_string());
    }

    let todo = state
        .store
        .create(request)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create todo"))?;
    tracing::info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    let todo = state
        .store
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update todo"))?;
    tracing::info!(id = %todo.id, "todo updated");
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete todo"))?;
    tracing::info!(%id, "todo deleted");
    Ok(Json(MessageBody {
        message: "Todo deleted successfully".to_string(),
    }))
}
