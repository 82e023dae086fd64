use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use rfpmml_forest::{CacheMode, ConverterConfig, convert};
use rfpmml_io::{DocumentWriter, RexpReader, write_document};
use rfpmml_pmml::{DataField, Pmml};

/// Stack reserved for every worker thread. Document serialization nests one
/// level per tree level, so deep trees need more than the 2 MiB default.
const WORKER_STACK_SIZE: usize = 64 << 20;

#[derive(Parser)]
#[command(name = "rfpmml")]
#[command(about = "Convert serialized random forest models into PMML ensemble documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of worker threads (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared converter options.
#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    /// Name of the target field for models trained without a formula
    #[arg(long, default_value = ConverterConfig::DEFAULT_TARGET_NAME)]
    target_name: String,

    /// Encode every split afresh instead of reusing predicate pairs
    #[arg(long, default_value_t = false)]
    no_predicate_cache: bool,
}

impl ConvertArgs {
    fn config(&self) -> ConverterConfig {
        let cache = if self.no_predicate_cache {
            CacheMode::Disabled
        } else {
            CacheMode::Enabled
        };
        ConverterConfig::new()
            .with_target_name(self.target_name.clone())
            .with_predicate_cache(cache)
            .with_application(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert one source model
    Convert {
        /// Path to the source model JSON file
        #[arg(long)]
        input: PathBuf,

        /// Path of the document to write
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        options: ConvertArgs,
    },

    /// Convert every source model in a directory
    Batch {
        /// Directory holding `*.json` source models
        #[arg(long)]
        input_dir: PathBuf,

        /// Output directory for documents
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        options: ConvertArgs,
    },

    /// Convert a source model and print a summary without writing it
    Inspect {
        /// Path to the source model JSON file
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        options: ConvertArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ConvertOutput {
    input: PathBuf,
    output: PathBuf,
    function: String,
    n_trees: usize,
    n_fields: usize,
}

#[derive(Serialize)]
struct BatchOutput {
    n_models: usize,
    n_converted: usize,
    n_failed: usize,
    models: Vec<BatchEntry>,
}

#[derive(Serialize)]
struct BatchEntry {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct InspectOutput {
    function: String,
    method: String,
    fields: Vec<FieldOutput>,
    n_trees: usize,
    n_nodes: usize,
    n_leaves: usize,
    max_depth: usize,
}

#[derive(Serialize)]
struct FieldOutput {
    name: String,
    op_type: String,
    data_type: String,
    n_values: usize,
}

fn convert_file(input: &Path, config: &ConverterConfig) -> Result<Pmml> {
    let source = RexpReader::new(input)
        .read()
        .with_context(|| format!("failed to read {}", input.display()))?;
    let pmml = convert(&source, config)
        .with_context(|| format!("failed to convert {}", input.display()))?;
    Ok(pmml)
}

fn n_trees(pmml: &Pmml) -> usize {
    pmml.model().segmentation().segments().len()
}

fn list_sources(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to list {}", input_dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn field_output(field: &DataField) -> FieldOutput {
    FieldOutput {
        name: field.name().to_string(),
        op_type: field.op_type().to_string(),
        data_type: field.data_type().to_string(),
        n_values: field.values().len(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Every command runs on the pool, so single conversions get the large
    // worker stack too.
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(WORKER_STACK_SIZE);
    if let Some(threads) = cli.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().context("failed to configure thread pool")?;
    info!(
        threads = pool.current_num_threads(),
        stack_mib = WORKER_STACK_SIZE >> 20,
        "thread pool configured"
    );

    pool.install(|| run(cli.command))
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert {
            input,
            output,
            options,
        } => {
            let pmml = convert_file(&input, &options.config())?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            write_document(&output, &pmml).context("failed to write document")?;

            let result = ConvertOutput {
                input,
                output,
                function: pmml.model().function().to_string(),
                n_trees: n_trees(&pmml),
                n_fields: pmml.data_dictionary().len(),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Batch {
            input_dir,
            output_dir,
            options,
        } => {
            let start = Instant::now();
            let sources = list_sources(&input_dir)?;
            let writer = DocumentWriter::new(&output_dir)?;
            let config = options.config();
            info!(n_models = sources.len(), "batch started");

            // Each conversion owns its own state; nothing is shared but the config.
            let models: Vec<BatchEntry> = sources
                .par_iter()
                .map(|input| {
                    let stem = input
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let written = convert_file(input, &config)
                        .and_then(|pmml| writer.write(&stem, &pmml).map_err(anyhow::Error::from));
                    match written {
                        Ok(path) => BatchEntry {
                            input: input.clone(),
                            output: Some(path),
                            error: None,
                        },
                        Err(e) => {
                            let message = format!("{e:#}");
                            error!(input = %input.display(), error = %message, "conversion failed");
                            BatchEntry {
                                input: input.clone(),
                                output: None,
                                error: Some(message),
                            }
                        }
                    }
                })
                .collect();

            let n_failed = models.iter().filter(|m| m.error.is_some()).count();
            info!(
                n_models = models.len(),
                n_failed,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "batch finished"
            );

            let result = BatchOutput {
                n_models: models.len(),
                n_converted: models.len() - n_failed,
                n_failed,
                models,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);

            if n_failed > 0 {
                anyhow::bail!("{n_failed} model(s) failed to convert");
            }
        }

        Command::Inspect { input, options } => {
            let pmml = convert_file(&input, &options.config())?;
            let segments = pmml.model().segmentation().segments();

            let result = InspectOutput {
                function: pmml.model().function().to_string(),
                method: format!("{:?}", pmml.model().segmentation().method()),
                fields: pmml.data_dictionary().iter().map(field_output).collect(),
                n_trees: segments.len(),
                n_nodes: segments.iter().map(|s| s.model().n_nodes()).sum(),
                n_leaves: segments.iter().map(|s| s.model().n_leaves()).sum(),
                max_depth: segments.iter().map(|s| s.model().depth()).max().unwrap_or(0),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
