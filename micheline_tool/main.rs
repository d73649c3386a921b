// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Command-line front end: render types, check values against types and list
//! entrypoints, reading Micheline JSON from files or stdin.

use std::fs::read_to_string;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use micheline::ast::Micheline;
use micheline::context::{Ctx, DEFAULT_MAX_DEPTH};
use micheline::entrypoints::entrypoints_with;
use micheline::implements::implements_with;
use micheline::typedef::render_with;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Maximum nesting depth of input trees
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    /// Print the descriptor of a type
    Render {
        /// Micheline JSON of the type, `-` for stdin
        type_file: PathBuf,
    },
    /// Check whether a value has the shape of a type; exits with 1 if not
    Implements {
        /// Micheline JSON of the value, `-` for stdin
        value_file: PathBuf,
        /// Micheline JSON of the type, `-` for stdin
        type_file: PathBuf,
    },
    /// List the entrypoints of a parameter type
    Entrypoints {
        /// Micheline JSON of the parameter type, `-` for stdin
        param_file: PathBuf,
    },
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn read_node(ctx: &Ctx, path: &Path) -> anyhow::Result<Micheline> {
    let text = read_input(path)?;
    Micheline::from_json_str_with(ctx, &text)
        .with_context(|| format!("failed to decode {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let ctx = Ctx {
        max_depth: cli.max_depth,
    };
    debug!(?ctx, command = ?cli.command, "running");
    match cli.command {
        Commands::Render { type_file } => {
            let ty = read_node(&ctx, &type_file)?;
            let typedef = render_with(&ctx, &ty)?;
            println!("{}", serde_json::to_string_pretty(&typedef.to_json())?);
            Ok(true)
        }
        Commands::Implements {
            value_file,
            type_file,
        } => {
            anyhow::ensure!(
                !(is_stdin(&value_file) && is_stdin(&type_file)),
                "stdin can supply only one of the value and the type"
            );
            let value = read_node(&ctx, &value_file)?;
            let ty = read_node(&ctx, &type_file)?;
            let ok = implements_with(&ctx, &value, &ty);
            println!("{ok}");
            Ok(ok)
        }
        Commands::Entrypoints { param_file } => {
            let param = read_node(&ctx, &param_file)?;
            let eps = entrypoints_with(&ctx, &param)?;
            println!("{}", serde_json::to_string_pretty(&eps)?);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
