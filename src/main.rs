use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memvault::{tool, Command, MemoryBackend, MemoryTool, SandboxBuilder};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memvault", version, about = "Sandboxed memory filesystem for agent tool calls")]
struct Cli {
    /// Host directory backing the memory mount
    #[arg(long, env = "MEMVAULT_ROOT", default_value = memvault::sandbox::DEFAULT_ROOT)]
    root: PathBuf,

    /// Virtual prefix every logical path must start with
    #[arg(long, default_value = memvault::sandbox::DEFAULT_MOUNT)]
    mount: String,

    /// Largest file a command may write, in bytes
    #[arg(long, default_value_t = memvault::sandbox::DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Execute a single JSON command and print its result
    Exec {
        /// e.g. '{"command": "view", "path": "/memories"}'
        json: String,
    },
    /// Read newline-delimited JSON commands from stdin, answer one JSON line each
    Serve,
    /// Print the tool definition (name, description, input schema)
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let Cli {
        root,
        mount,
        max_file_size,
        command,
    } = Cli::parse();

    let open_backend = || -> Result<MemoryBackend> {
        let sandbox = SandboxBuilder::new()
            .root(&root)
            .mount(mount.as_str())
            .max_file_size(max_file_size)
            .build()
            .with_context(|| format!("Failed to open memory root {}", root.display()))?;
        Ok(MemoryBackend::from_sandbox(sandbox))
    };

    match command {
        Mode::Exec { json } => {
            let command: Command =
                serde_json::from_str(&json).context("Failed to parse memory command")?;
            let output = open_backend()?.execute(&command)?;
            println!("{}", output);
        }
        Mode::Serve => serve(&open_backend()?, io::stdin().lock(), io::stdout().lock())?,
        Mode::Schema => {
            println!("{}", serde_json::to_string_pretty(&tool::definition())?);
        }
    }

    Ok(())
}

/// One JSON command per line in, one JSON response per line out
fn serve(backend: &MemoryBackend, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let tool = MemoryTool::new(backend);

    for line in input.lines() {
        let line = line.context("Failed to read command line")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(value) => tool.call(value).unwrap_or_else(|err| json!({ "error": err.to_string() })),
            Err(err) => json!({ "error": format!("Malformed JSON: {}", err) }),
        };

        writeln!(output, "{}", response).context("Failed to write response")?;
        output.flush().context("Failed to flush response")?;
    }

    Ok(())
}
