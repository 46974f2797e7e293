//! HTML form routes. Every POST answers with a redirect back to the page;
//! a blank title, an unknown id or an id that is not a number is silently
//! ignored.

use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use super::render::{self, IndexPage};
use super::{AppState, HttpError, ListQuery};
use crate::error::{Error, Result};
use crate::store::ListStore;
use crate::todo::{NewTodo, TodoPatch};

type PageResult<T> = std::result::Result<T, HttpError>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddForm {
    #[serde(default)]
    title: String,
    state: Option<String>,
    comment: Option<String>,
    list: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateForm {
    title: Option<String>,
    state: Option<String>,
    comment: Option<String>,
    list: Option<String>,
}

pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> PageResult<Html<String>> {
    let registry = Arc::clone(&state.registry);
    let renderer = Arc::clone(&state.renderer);
    let html = state
        .with_list(query.list, move |store| {
            renderer.index(&IndexPage {
                lists: registry.lists(),
                current: store.list_id(),
                default_list: registry.default_list(),
                states: store.states(),
                todos: store.list(),
            })
        })
        .await?;
    Ok(Html(html))
}

pub(crate) async fn add(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    form: Option<Form<AddForm>>,
) -> PageResult<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let requested = form.list.or(query.list);
    let input = NewTodo {
        title: form.title,
        state: form.state,
        comment: form.comment,
    };

    let list_id = run(&state, requested, move |store| store.create(input).map(drop)).await?;
    Ok(back_to(&state, &list_id))
}

pub(crate) async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    form: Option<Form<ListQuery>>,
) -> PageResult<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let requested = form.list.or(query.list);
    let Some(id) = parse_id(&id) else {
        return Ok(ignore_bad_id(&state, requested));
    };

    let list_id = run(&state, requested, move |store| store.toggle_done(id).map(drop)).await?;
    Ok(back_to(&state, &list_id))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    form: Option<Form<UpdateForm>>,
) -> PageResult<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let requested = form.list.or(query.list);
    let Some(id) = parse_id(&id) else {
        return Ok(ignore_bad_id(&state, requested));
    };
    let patch = TodoPatch {
        title: form.title,
        done: None,
        state: form.state,
        comment: form.comment,
    };

    let list_id = run(&state, requested, move |store| store.update(id, patch).map(drop)).await?;
    Ok(back_to(&state, &list_id))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    form: Option<Form<ListQuery>>,
) -> PageResult<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let requested = form.list.or(query.list);
    let Some(id) = parse_id(&id) else {
        return Ok(ignore_bad_id(&state, requested));
    };

    let list_id = run(&state, requested, move |store| store.delete(id).map(drop)).await?;
    Ok(back_to(&state, &list_id))
}

/// Run a mutation, swallowing the rejections the form path never reports.
async fn run<F>(state: &AppState, requested: Option<String>, op: F) -> Result<String>
where
    F: FnOnce(&mut ListStore) -> Result<()> + Send + 'static,
{
    state
        .with_list(requested, |store| {
            match op(store) {
                Ok(()) => {}
                Err(Error::TitleRequired) => {
                    tracing::debug!(list = store.list_id(), "ignored form without title");
                }
                Err(Error::TodoNotFound { id, .. }) => {
                    tracing::debug!(list = store.list_id(), id, "ignored form for unknown todo");
                }
                Err(err) => return Err(err),
            }
            Ok(store.list_id().to_string())
        })
        .await
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

fn ignore_bad_id(state: &AppState, requested: Option<String>) -> Redirect {
    let list_id = state.registry.resolve(requested.as_deref());
    tracing::debug!(list = list_id, "ignored form with non-numeric id");
    back_to(state, list_id)
}

fn back_to(state: &AppState, list_id: &str) -> Redirect {
    Redirect::to(&render::page_href(list_id, state.registry.default_list()))
}
