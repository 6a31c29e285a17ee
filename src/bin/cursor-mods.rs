//! CLI for the cursor-mods engine.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cursor_mods::diff::{DiffSummary, edit_diff};
use cursor_mods::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cursor-mods")]
#[command(author, version, about = "Cursor-anchored JavaScript/TypeScript transformations", long_about = None)]
struct Cli {
    /// Engine configuration file (YAML, or JSON with a .json extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter such as "debug" (falls back to RUST_LOG, then "info")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available mods
    Mods {
        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Apply a mod at a cursor position or captured node
    Apply {
        /// Mod name (see `mods`)
        #[arg(value_name = "MOD")]
        mod_name: String,

        /// Source file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Language variant: script, module, script+markup, module+markup
        #[arg(short, long)]
        language: Option<String>,

        /// Zero-based cursor line
        #[arg(long, requires = "column")]
        line: Option<usize>,

        /// Zero-based cursor column
        #[arg(long, requires = "line")]
        column: Option<usize>,

        /// Node descriptor JSON captured by the host
        #[arg(long, conflicts_with_all = ["line", "column"])]
        descriptor: Option<String>,

        /// Print a unified diff instead of the JSON result
        #[arg(long)]
        diff: bool,
    },

    /// Serve JSON-lines requests on stdin/stdout
    Serve,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config);

    match cli.command {
        Commands::Mods { json } => cmd_mods(&engine, json),
        Commands::Apply {
            mod_name,
            file,
            language,
            line,
            column,
            descriptor,
            diff,
        } => cmd_apply(
            &engine, mod_name, file, language, line, column, descriptor, diff,
        ),
        Commands::Serve => cmd_serve(engine),
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_mods(engine: &Engine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&ModsPayload::registry())?);
    } else {
        for name in engine.list_mods() {
            println!("{}", name);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_apply(
    engine: &Engine,
    mod_name: String,
    file: Option<PathBuf>,
    language: Option<String>,
    line: Option<usize>,
    column: Option<usize>,
    descriptor: Option<String>,
    diff: bool,
) -> Result<()> {
    let m: Mod = mod_name.parse()?;

    let source = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let variant = match language {
        Some(name) => name.parse()?,
        None => file
            .as_deref()
            .and_then(LanguageVariant::detect)
            .unwrap_or_default(),
    };

    let anchor = match (descriptor, line, column) {
        (Some(json), _, _) => {
            Anchor::Node(serde_json::from_str(&json).context("Invalid node descriptor")?)
        }
        (None, Some(line), Some(column)) => Anchor::Point(Position::new(line, column)),
        _ => bail!("either --line/--column or --descriptor is required"),
    };

    let ctx = ModContext::new(source, variant).with_anchor(anchor);
    let result = engine.run(m, &ctx);

    let edit = match result {
        Ok(edit) => edit,
        Err(failure) => {
            if diff {
                eprintln!("{}", failure);
            } else {
                println!("{}", serde_json::to_string_pretty(&failure)?);
            }
            std::process::exit(1);
        }
    };

    if diff {
        let label = file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string());
        let patch = edit_diff(&ctx.source, &edit, &label)
            .context("Edit range does not fit the source")?;
        print!("{}", patch);
        if let Some(modified) = edit.apply_to(&ctx.source) {
            println!("\n{}", DiffSummary::from_diff(&ctx.source, &modified));
        }
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&EditPayload::new(m, &edit))?
        );
    }

    Ok(())
}

fn cmd_serve(engine: Engine) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    runtime
        .block_on(cursor_mods::serve::serve(
            engine,
            tokio::io::stdin(),
            tokio::io::stdout(),
        ))
        .context("Worker loop failed")?;
    Ok(())
}
