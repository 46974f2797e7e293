//! todo-board serve command implementation

use std::sync::Arc;

use crate::error::Result;
use crate::output::OutputOptions;
use crate::registry::Registry;
use crate::web;

pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub port_attempts: u16,
    pub registry: Registry,
    pub output: OutputOptions,
}

pub fn run(opts: ServeOptions) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = web::bind_with_fallback(&opts.host, opts.port, opts.port_attempts).await?;
        let addr = listener.local_addr()?;

        if opts.output.json {
            println!(
                "{}",
                serde_json::json!({ "status": "listening", "url": format!("http://{addr}") })
            );
        } else if !opts.output.quiet {
            println!("todo-board listening on http://{addr}");
            println!("lists: {}", list_ids(&opts.registry).join(", "));
        }

        web::serve(Arc::new(opts.registry), listener).await
    })
}

fn list_ids(registry: &Registry) -> Vec<String> {
    registry
        .lists()
        .iter()
        .map(|entry| {
            if entry.id == registry.default_list() {
                format!("{} (default)", entry.id)
            } else {
                entry.id.clone()
            }
        })
        .collect()
}
