//! todo-board lists/show/reset command implementations

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::registry::Registry;
use crate::todo::Todo;

#[derive(Serialize)]
struct ListReport {
    id: String,
    title: String,
    default: bool,
    todos: usize,
    open: usize,
    file: String,
}

#[derive(Serialize)]
struct ShowReport {
    list: String,
    todos: Vec<Todo>,
}

#[derive(Serialize)]
struct ResetReport {
    list: String,
    file: String,
}

pub fn run_lists(registry: &Registry, options: OutputOptions) -> Result<()> {
    let mut reports = Vec::with_capacity(registry.lists().len());
    for entry in registry.lists() {
        let (todos, open, file) = registry.with_list(Some(&entry.id), |store| {
            let open = store.list().iter().filter(|todo| !todo.done).count();
            Ok((
                store.list().len(),
                open,
                store.path().display().to_string(),
            ))
        })?;
        reports.push(ListReport {
            id: entry.id.clone(),
            title: entry.title.clone(),
            default: entry.id == registry.default_list(),
            todos,
            open,
            file,
        });
    }

    let mut human = HumanOutput::new(format!("todo-board lists: {} configured", reports.len()));
    for report in &reports {
        let marker = if report.default { " (default)" } else { "" };
        human.push_summary(
            format!("{}{marker}", report.id),
            format!("{} - {} todos, {} open", report.title, report.todos, report.open),
        );
    }

    emit_success(options, "lists", &reports, Some(&human))
}

pub fn run_show(registry: &Registry, list: Option<&str>, options: OutputOptions) -> Result<()> {
    let report = registry.with_list(list, |store| {
        Ok(ShowReport {
            list: store.list_id().to_string(),
            todos: store.list().to_vec(),
        })
    })?;

    let mut human = HumanOutput::new(format!(
        "todo-board show: {} ({} todos)",
        report.list,
        report.todos.len()
    ));
    for todo in &report.todos {
        let check = if todo.done { "x" } else { " " };
        let mut line = format!("[{check}] #{} {} ({})", todo.id, todo.title, todo.state);
        if !todo.comment.is_empty() {
            line.push_str(&format!(" - {}", todo.comment));
        }
        human.push_detail(line);
    }
    if report.todos.is_empty() {
        human.push_next_step("todo-board serve");
    }

    emit_success(options, "show", &report, Some(&human))
}

pub fn run_reset(registry: &Registry, list: Option<&str>, options: OutputOptions) -> Result<()> {
    let report = registry.with_list(list, |store| {
        store.reset()?;
        Ok(ResetReport {
            list: store.list_id().to_string(),
            file: store.path().display().to_string(),
        })
    })?;

    let mut human = HumanOutput::new(format!("todo-board reset: {} emptied", report.list));
    human.push_summary("file", report.file.clone());

    emit_success(options, "reset", &report, Some(&human))
}
