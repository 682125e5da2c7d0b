//! 程序入口：初始化日志，按命令行参数构建/导入 Schema 并输出

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use schema_shu::model::samples::sample_schemas;
use schema_shu::model::shadow_tree::render_outline;
use schema_shu::vm::bridge::{self, STATUS_COPIED, STATUS_ERROR_PREFIX, STATUS_IMPORTED, STATUS_SAMPLE_LOADED, STATUS_SAVED};
use schema_shu::AppState;

/// JSON Schema 属性树编辑器（命令行版）
#[derive(Debug, Parser)]
#[command(name = "schema_shu", version, about = "Build, import and export JSON Schema property trees")]
struct Options {
    /// Start from a built-in sample schema
    #[arg(short, long, value_name = "NAME", conflicts_with = "import")]
    sample: Option<String>,
    /// Start from an existing JSON Schema document
    #[arg(short, long, value_name = "FILE")]
    import: Option<PathBuf>,
    /// Apply an edit script (JSON array of commands)
    #[arg(short, long, value_name = "FILE")]
    edits: Option<PathBuf>,
    /// Set the schema title
    #[arg(short, long)]
    title: Option<String>,
    /// Set the schema description
    #[arg(short, long)]
    description: Option<String>,
    /// Set the $schema URI
    #[arg(long, value_name = "URI")]
    schema_version: Option<String>,
    /// Write the schema to a file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the schema to <DIR>/<title>.json
    #[arg(long, value_name = "DIR")]
    download: Option<PathBuf>,
    /// Copy the schema to the clipboard
    #[arg(short, long)]
    copy: bool,
    /// Print the property outline instead of the schema
    #[arg(long)]
    tree: bool,
    /// List the built-in samples
    #[arg(long)]
    list_samples: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(opts: Options) -> Result<()> {
    if opts.list_samples {
        for sample in sample_schemas().context("Failed to parse built-in samples")? {
            println!("{:<20} {}", sample.name, sample.description);
        }
        return Ok(());
    }

    let mut state = AppState::default();

    if let Some(name) = &opts.sample {
        state.load_sample_by_name(name)?;
        tracing::info!("{}: {}", STATUS_SAMPLE_LOADED, name);
    }
    if let Some(path) = &opts.import {
        state
            .import_file(path)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        tracing::info!("{}: {}", STATUS_IMPORTED, path.display());
    }
    if let Some(path) = &opts.edits {
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let commands = bridge::parse_commands(&text).with_context(|| format!("Invalid edit script {}", path.display()))?;
        bridge::apply_all(&mut state, commands)?;
    }
    if let Some(title) = opts.title {
        state.title = title;
    }
    if let Some(description) = opts.description {
        state.description = description;
    }
    if let Some(version) = opts.schema_version {
        state.schema_version = version;
    }

    if opts.tree {
        print!("{}", render_outline(&state.shadow_rows()));
    } else if let Some(path) = &opts.output {
        state
            .save_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("{}: {}", STATUS_SAVED, path.display());
    } else if let Some(dir) = &opts.download {
        let path = state.download_to(dir)?;
        tracing::info!("{}: {}", STATUS_SAVED, path.display());
    } else {
        println!("{}", state.schema_pretty()?);
    }

    if opts.copy {
        state.copy_schema()?;
        tracing::info!("{}", STATUS_COPIED);
    }
    Ok(())
}

fn main() {
    let opts = Options::parse();

    // 日志输出到 stderr，stdout 只留给 Schema 文档
    let level = if opts.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run(opts) {
        tracing::error!("{}{:#}", STATUS_ERROR_PREFIX, e);
        process::exit(1);
    }
}
