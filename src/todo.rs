//! Todo records and the raw inputs that create or change them.

use serde::{Deserialize, Serialize};

/// One task in a list, exactly as it is persisted and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub done: bool,
    pub state: String,
    pub comment: String,
}

/// Unnormalized input for a new todo.
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub state: Option<String>,
    pub comment: Option<String>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Unnormalized field changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
    pub state: Option<String>,
    pub comment: Option<String>,
}
