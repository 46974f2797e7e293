//! todo-board - todo lists served as HTML pages and a JSON API
//!
//! # Core Concepts
//!
//! - **Todo**: one task with id, title, done flag, state and comment
//! - **List**: a named collection of todos persisted as one JSON file
//! - **Catalog**: the static list id -> title configuration
//! - **Registry**: lazily loaded lists, one mutex per list
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Settings (`todo.toml`) and list catalog (`lists.yml`)
//! - `error`: Error types and result aliases
//! - `normalize`: Coercion of raw field values into canonical form
//! - `todo`: Todo records and their raw inputs
//! - `storage`: List files on disk
//! - `lock`: File locking and atomic writes
//! - `store`: In-memory list with id allocation and write-through
//! - `registry`: List id resolution and lazy loading
//! - `web`: axum routes for pages and the JSON API
//! - `output`: Human and JSON output for CLI commands

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod normalize;
pub mod output;
pub mod registry;
pub mod storage;
pub mod store;
pub mod todo;
pub mod web;

pub use error::{Error, Result};
