//! Server-side HTML for the todo page, rendered from a liquid template.

use serde::Serialize;

use crate::config::{ListEntry, StatesConfig};
use crate::error::Result;
use crate::todo::Todo;

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Everything the index page shows
pub struct IndexPage<'a> {
    pub lists: &'a [ListEntry],
    pub current: &'a str,
    pub default_list: &'a str,
    pub states: &'a StatesConfig,
    pub todos: &'a [Todo],
}

/// The parsed index template, built once per router
pub struct PageRenderer {
    index: liquid::Template,
}

#[derive(Serialize)]
struct NavLink<'a> {
    href: String,
    title: &'a str,
    current: bool,
}

#[derive(Serialize)]
struct StateOption<'a> {
    value: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct TodoView<'a> {
    id: u64,
    title: &'a str,
    done: bool,
    state: &'a str,
    comment: &'a str,
    states: Vec<StateOption<'a>>,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    title: &'a str,
    current: &'a str,
    show_nav: bool,
    lists: Vec<NavLink<'a>>,
    new_states: Vec<StateOption<'a>>,
    has_todos: bool,
    todos: Vec<TodoView<'a>>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        let index = parser.parse(INDEX_TEMPLATE)?;
        Ok(Self { index })
    }

    pub fn index(&self, page: &IndexPage<'_>) -> Result<String> {
        let title = page
            .lists
            .iter()
            .find(|entry| entry.id == page.current)
            .map(|entry| entry.title.as_str())
            .unwrap_or(page.current);

        let context = IndexContext {
            title,
            current: page.current,
            show_nav: page.lists.len() > 1,
            lists: page
                .lists
                .iter()
                .map(|entry| NavLink {
                    href: page_href(&entry.id, page.default_list),
                    title: &entry.title,
                    current: entry.id == page.current,
                })
                .collect(),
            new_states: state_options(page.states, page.states.default_state()),
            has_todos: !page.todos.is_empty(),
            todos: page
                .todos
                .iter()
                .map(|todo| TodoView {
                    id: todo.id,
                    title: &todo.title,
                    done: todo.done,
                    state: &todo.state,
                    comment: &todo.comment,
                    states: state_options(page.states, &todo.state),
                })
                .collect(),
        };

        let globals = liquid::model::to_object(&context)?;
        Ok(self.index.render(&globals)?)
    }
}

fn state_options<'a>(states: &'a StatesConfig, selected: &str) -> Vec<StateOption<'a>> {
    states
        .allowed
        .iter()
        .map(|state| state.trim())
        .map(|value| StateOption {
            value,
            selected: value == selected,
        })
        .collect()
}

/// Location of the index page for a list
pub fn page_href(list_id: &str, default_list: &str) -> String {
    if list_id == default_list {
        "/".to_string()
    } else {
        format!("/?list={list_id}")
    }
}
