//! In-memory todos of one list, kept in sync with its file.
//!
//! Every mutation builds the new list, rewrites the whole file and only then
//! replaces the in-memory list. A failed write returns the error and leaves
//! both memory and the id counter as they were.

use std::path::{Path, PathBuf};

use crate::config::StatesConfig;
use crate::error::{Error, Result};
use crate::normalize::{normalize_comment, normalize_record, normalize_state, normalize_title};
use crate::storage;
use crate::todo::{NewTodo, Todo, TodoPatch};

#[derive(Debug)]
pub struct ListStore {
    list_id: String,
    path: PathBuf,
    states: StatesConfig,
    todos: Vec<Todo>,
    next_id: u64,
}

impl ListStore {
    /// Load a list from `path`; unusable files give an empty list.
    pub fn load(list_id: impl Into<String>, path: PathBuf, states: StatesConfig) -> Self {
        let list_id = list_id.into();
        let raw = storage::load(&path);
        let total = raw.len();
        let todos: Vec<Todo> = raw
            .iter()
            .filter_map(|record| normalize_record(record, &states))
            .collect();
        if todos.len() < total {
            tracing::warn!(
                list = %list_id,
                skipped = total - todos.len(),
                "skipped non-object records"
            );
        }

        let next_id = todos.iter().map(|todo| todo.id).max().map_or(1, |max| max + 1);
        tracing::debug!(list = %list_id, todos = todos.len(), next_id, "list loaded");

        Self {
            list_id,
            path,
            states,
            todos,
            next_id,
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn states(&self) -> &StatesConfig {
        &self.states
    }

    /// Todos in insertion order
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: u64) -> Result<&Todo> {
        self.todos
            .iter()
            .find(|todo| todo.id == id)
            .ok_or_else(|| self.not_found(id))
    }

    /// Append a new todo; a blank title is rejected without touching anything.
    pub fn create(&mut self, input: NewTodo) -> Result<Todo> {
        let title = normalize_title(&input.title).ok_or(Error::TitleRequired)?;
        let state = match input.state.as_deref() {
            Some(raw) => normalize_state(raw, &self.states),
            None => self.states.default_state().to_string(),
        };
        let comment = input
            .comment
            .as_deref()
            .map(normalize_comment)
            .unwrap_or_default();

        let todo = Todo {
            id: self.next_id,
            title,
            done: false,
            state,
            comment,
        };
        let mut todos = self.todos.clone();
        todos.push(todo.clone());
        self.commit(todos)?;
        self.next_id += 1;

        tracing::info!(list = %self.list_id, id = todo.id, "todo created");
        Ok(todo)
    }

    pub fn toggle_done(&mut self, id: u64) -> Result<Todo> {
        let index = self.position(id)?;
        let mut todos = self.todos.clone();
        todos[index].done = !todos[index].done;
        let todo = todos[index].clone();
        self.commit(todos)?;

        tracing::info!(list = %self.list_id, id, done = todo.done, "todo toggled");
        Ok(todo)
    }

    /// Apply each present field; only writes when something changed.
    pub fn update(&mut self, id: u64, patch: TodoPatch) -> Result<Todo> {
        let index = self.position(id)?;
        let mut todo = self.todos[index].clone();
        let mut changed = false;

        if let Some(title) = patch.title.as_deref().and_then(normalize_title) {
            changed |= replace(&mut todo.title, title);
        }
        if let Some(done) = patch.done {
            changed |= replace(&mut todo.done, done);
        }
        if let Some(state) = patch.state.as_deref() {
            changed |= replace(&mut todo.state, normalize_state(state, &self.states));
        }
        if let Some(comment) = patch.comment.as_deref() {
            changed |= replace(&mut todo.comment, normalize_comment(comment));
        }

        if !changed {
            tracing::debug!(list = %self.list_id, id, "update changed nothing, skipping write");
            return Ok(todo);
        }

        let mut todos = self.todos.clone();
        todos[index] = todo.clone();
        self.commit(todos)?;

        tracing::info!(list = %self.list_id, id, "todo updated");
        Ok(todo)
    }

    pub fn delete(&mut self, id: u64) -> Result<Todo> {
        let index = self.position(id)?;
        let mut todos = self.todos.clone();
        let removed = todos.remove(index);
        self.commit(todos)?;

        tracing::info!(list = %self.list_id, id, "todo deleted");
        Ok(removed)
    }

    /// Drop all todos, restart ids at 1 and replace the file with an empty list.
    ///
    /// Once the old file is gone the list is empty on disk, so memory is
    /// cleared even if writing the empty file then fails.
    pub fn reset(&mut self) -> Result<()> {
        storage::remove(&self.path)?;
        self.todos.clear();
        self.next_id = 1;
        storage::save(&self.path, &self.todos)?;

        tracing::info!(list = %self.list_id, "list reset");
        Ok(())
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| self.not_found(id))
    }

    fn not_found(&self, id: u64) -> Error {
        Error::TodoNotFound {
            list: self.list_id.clone(),
            id,
        }
    }

    /// Write `todos` to disk and only then make them the in-memory list.
    fn commit(&mut self, todos: Vec<Todo>) -> Result<()> {
        storage::save(&self.path, &todos)?;
        self.todos = todos;
        Ok(())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
