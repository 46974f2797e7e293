//! Shared output formatting for todo-board CLI commands.
//!
//! Every command reports either as human text (a header plus optional
//! sections) or, with `--json`, as one envelope object on stdout.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "todo-board.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable report: header line, then Summary/Details/Next steps
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;

        if !self.summary.is_empty() {
            f.write_str("\n\nSummary:")?;
            for (key, value) in &self.summary {
                if value.is_empty() {
                    write!(f, "\n- {key}")?;
                } else {
                    write!(f, "\n- {key}: {value}")?;
                }
            }
        }
        write_section(f, "Details", &self.details)?;
        write_section(f, "Next steps", &self.next_steps)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, "\n\n{title}:")?;
    for item in items {
        write!(f, "\n- {item}")?;
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    output.to_string()
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn print_envelope<T: Serialize>(envelope: &Envelope<'_, T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return print_envelope(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        });
    }

    match human {
        Some(human) if !options.quiet => println!("{human}"),
        _ => {}
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        return print_envelope::<()>(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            }),
            next_steps,
        });
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// First non-flag argument, used to label error output before clap has run
pub fn infer_command_name_from_args() -> String {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .unwrap_or_else(|| "todo-board".to_string())
}

fn error_kind(err: &Error) -> &'static str {
    use crate::error::exit_codes;

    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        exit_codes::NOT_FOUND => "not_found",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            vec!["fix todo.toml then retry".to_string()]
        }
        Error::Yaml(_) => vec!["fix the list catalog (lists.yml) then retry".to_string()],
        Error::TodoNotFound { list, .. } => vec![format!("todo-board show --list {list}")],
        Error::LockFailed(_) => vec!["another process holds the list file; retry".to_string()],
        _ => Vec::new(),
    }
}
