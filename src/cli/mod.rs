//! Command-line interface for todo-board
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ListCatalog, CONFIG_FILE};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::registry::Registry;

mod init;
mod lists;
mod serve;

/// todo-board - todo lists in the browser
///
/// Serves named todo lists as HTML pages and a JSON API, one JSON file per
/// list.
#[derive(Parser, Debug)]
#[command(name = "todo-board")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file
    #[arg(long, global = true, env = "TODO_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding the list files (overrides `data_dir`)
    #[arg(long, global = true, env = "TODO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// List catalog file (overrides `lists_file`)
    #[arg(long = "lists", global = true, env = "TODO_LISTS_FILE")]
    pub lists_file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTML pages and JSON API
    Serve {
        /// Address to bind
        #[arg(long, env = "TODO_HOST")]
        host: Option<String>,

        /// First port to try
        #[arg(short, long, env = "TODO_PORT")]
        port: Option<u16>,
    },

    /// Show configured lists and their todo counts
    Lists,

    /// Print the todos of a list
    Show {
        /// List id (unknown ids fall back to the default list)
        #[arg(short, long)]
        list: Option<String>,
    },

    /// Remove all todos of a list and restart its ids at 1
    Reset {
        /// List id (unknown ids fall back to the default list)
        #[arg(short, long)]
        list: Option<String>,
    },

    /// Write default settings and list catalog if missing
    Init,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match &self.command {
            Commands::Init => init::run(&self.config, options),
            Commands::Serve { host, port } => {
                let (config, registry) = self.open()?;
                serve::run(serve::ServeOptions {
                    host: host.clone().unwrap_or_else(|| config.server.host.clone()),
                    port: port.unwrap_or(config.server.port),
                    port_attempts: config.server.port_attempts,
                    registry,
                    output: options,
                })
            }
            Commands::Lists => {
                let (_, registry) = self.open()?;
                lists::run_lists(&registry, options)
            }
            Commands::Show { list } => {
                let (_, registry) = self.open()?;
                lists::run_show(&registry, list.as_deref(), options)
            }
            Commands::Reset { list } => {
                let (_, registry) = self.open()?;
                lists::run_reset(&registry, list.as_deref(), options)
            }
        }
    }

    /// Load settings and catalog and build the registry over them
    fn open(&self) -> Result<(Config, Registry)> {
        let config = self.load_config()?;
        let catalog = ListCatalog::load_or_default(&config.lists_file)?;
        let registry = Registry::from_config(&config, catalog);
        Ok((config, registry))
    }

    /// Settings file plus command-line/environment overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(lists_file) = &self.lists_file {
            config.lists_file = lists_file.clone();
        }
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            lists_file = %config.lists_file.display(),
            "configuration loaded"
        );
        Ok(config)
    }
}
