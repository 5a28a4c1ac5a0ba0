//! `distgen-ctl` — keep hand-maintained sources in sync with the API schema.
//!
//! `generate` rewrites every schema-owned target (skipping files whose
//! content is already current, preserving their mtime); `check` reports
//! drift without writing, for use as a CI gate.

mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use distgen_core::{pipeline, GenError, Outcome, Registry};

#[derive(Parser)]
#[command(
    name = "distgen-ctl",
    version,
    about = "Deterministic source synthesis from a declarative API schema",
    styles = output::clap_styles()
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate all schema-owned regions and files.
    Generate(SchemaArgs),
    /// Report targets that would change, without writing anything.
    Check(SchemaArgs),
}

#[derive(Args)]
struct SchemaArgs {
    /// Path to the schema manifest (TOML).
    #[arg(long)]
    schema: PathBuf,

    /// Root directory target paths resolve against (defaults to the
    /// schema's directory).
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => generate(&args),
        Commands::Check(args) => check(&args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            output::error(e);
            ExitCode::FAILURE
        }
    }
}

fn load(args: &SchemaArgs) -> Result<(Registry, PathBuf), GenError> {
    let text = std::fs::read_to_string(&args.schema).map_err(|e| GenError::Io {
        path: args.schema.clone(),
        source: e,
    })?;
    let registry = Registry::load(&text)?;
    let root = match &args.root {
        Some(root) => root.clone(),
        None => args
            .schema
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };
    Ok((registry, root))
}

fn generate(args: &SchemaArgs) -> Result<ExitCode, GenError> {
    let (registry, root) = load(args)?;
    tracing::debug!(root = %root.display(), "generating");
    let report = pipeline::run(&registry, &root)?;
    for t in &report.targets {
        match t.outcome {
            Outcome::Replaced => output::success(format!("{} replaced", t.path.display())),
            Outcome::Unchanged => output::dim(format!("  {} unchanged", t.path.display())),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn check(args: &SchemaArgs) -> Result<ExitCode, GenError> {
    let (registry, root) = load(args)?;
    let report = pipeline::check(&registry, &root)?;
    let mut drifted = 0usize;
    for t in &report.targets {
        match t.outcome {
            Outcome::Replaced => {
                drifted += 1;
                output::warning(format!("{} is out of date", t.path.display()));
            }
            Outcome::Unchanged => output::dim(format!("  {} up to date", t.path.display())),
        }
    }
    if drifted > 0 {
        output::error(format!("{drifted} target(s) out of date; run `distgen-ctl generate`"));
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
