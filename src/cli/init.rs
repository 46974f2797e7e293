//! todo-board init command implementation
//!
//! Writes a default settings file and list catalog and creates the data
//! directory. Paths inside the settings file are relative to the working
//! directory, as they are at serve time. Existing files are left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

const DEFAULT_CATALOG: &str = "\
# List id -> display title. The first entry is the default list
# unless `default:` names another one.
lists:
  todos: \"Todos\"
";

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    lists_file: bool,
    data_dir: bool,
}

pub fn run(config_path: &Path, options: OutputOptions) -> Result<()> {
    let created_config = if config_path.exists() {
        false
    } else {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Config::default().save(config_path)?;
        true
    };

    let config = Config::load(config_path)?;
    let created_lists = ensure_file(&config.lists_file, DEFAULT_CATALOG)?;
    let created_data = ensure_dir(&config.data_dir)?;

    let report = InitReport {
        config: config_path.to_path_buf(),
        created: InitCreated {
            config: created_config,
            lists_file: created_lists,
            data_dir: created_data,
        },
    };

    let mut created = Vec::new();
    if created_config {
        created.push(config_path.display().to_string());
    }
    if created_lists {
        created.push(config.lists_file.display().to_string());
    }
    if created_data {
        created.push(format!("{}/", config.data_dir.display()));
    }

    let header = if created.is_empty() {
        "todo-board init: already initialized"
    } else {
        "todo-board init: initialized"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("config", config_path.display().to_string());
    for item in created {
        human.push_detail(format!("created {item}"));
    }
    human.push_next_step("todo-board serve");

    emit_success(options, "init", &report, Some(&human))
}

fn ensure_file(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}

fn ensure_dir(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}
