//! JSON API under `/api`.
//!
//! Request bodies are parsed leniently: anything that is not a JSON object is
//! treated as an empty object, and scalar fields are coerced to text.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{AppState, HttpError, ListQuery};
use crate::normalize::{value_text, value_truthy};
use crate::todo::{NewTodo, Todo, TodoPatch};

type ApiResult<T> = std::result::Result<T, HttpError>;

#[derive(Debug, Serialize)]
pub(crate) struct ListSummary {
    id: String,
    title: String,
    default: bool,
}

pub(crate) async fn lists(State(state): State<AppState>) -> Json<Vec<ListSummary>> {
    let default_list = state.registry.default_list();
    let lists = state
        .registry
        .lists()
        .iter()
        .map(|entry| ListSummary {
            id: entry.id.clone(),
            title: entry.title.clone(),
            default: entry.id == default_list,
        })
        .collect();
    Json(lists)
}

pub(crate) async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = state
        .with_list(query.list, |store| Ok(store.list().to_vec()))
        .await?;
    Ok(Json(todos))
}

pub(crate) async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Todo>> {
    let todo = state
        .with_list(query.list, move |store| store.get(id).cloned())
        .await?;
    Ok(Json(todo))
}

pub(crate) async fn create_todo(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let fields = json_object(&body);
    let input = NewTodo {
        title: text_field(&fields, "title").unwrap_or_default(),
        state: text_field(&fields, "state"),
        comment: text_field(&fields, "comment"),
    };

    let todo = state
        .with_list(query.list, move |store| store.create(input))
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub(crate) async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ListQuery>,
    body: Bytes,
) -> ApiResult<Json<Todo>> {
    let fields = json_object(&body);
    let patch = TodoPatch {
        title: text_field(&fields, "title"),
        done: fields
            .get("done")
            .filter(|value| !value.is_null())
            .map(value_truthy),
        state: text_field(&fields, "state"),
        comment: text_field(&fields, "comment"),
    };

    let todo = state
        .with_list(query.list, move |store| store.update(id, patch))
        .await?;
    Ok(Json(todo))
}

pub(crate) async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<StatusCode> {
    state
        .with_list(query.list, move |store| store.delete(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn json_object(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(value_text)
}
