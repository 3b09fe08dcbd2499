mod config;

use abi_bind_analyses::{Diagnostic, Generator};
use abi_bind_data::BindingEmitter;
use abi_bind_debug_backend::DebugEmitter;
use abi_bind_ts_backend::TsEmitter;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, discover_artifacts};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// `export const <contract>Abi = [...] as const` modules
    Ts,
    /// Human readable dump of each resolved bundle, printed to stdout
    Debug,
}

#[derive(Parser)]
#[command(name = "abi-bind")]
#[command(about = "Deduplicated ABI bindings for groups of contract versions", long_about = None)]
#[command(version)]
struct Cli {
    /// Bundle configuration
    #[arg(long, default_value = "abi-bind.toml")]
    config: PathBuf,

    /// Artifact root, overrides the config's `artifacts`
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Directory bundle outputs are written relative to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Backend::Ts)]
    backend: Backend,

    /// Bundles resolved in parallel, 1 resolves them in order on the main thread
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = Config::read(&cli.config)?;
    let root = cli.artifacts.or(config.artifacts.clone()).unwrap_or_else(|| PathBuf::from("out"));
    let records = discover_artifacts(&root, &config.referenced_contracts())?;
    info!(artifacts = records.len(), root = %root.display(), "loaded artifacts");

    let emitter: Box<dyn BindingEmitter> = match cli.backend {
        Backend::Ts => Box::new(TsEmitter),
        Backend::Debug => Box::new(DebugEmitter::new()),
    };
    let generator = Generator::from_json(
        records.iter().map(|(name, json)| (name.as_str(), json.as_str())),
        config.bundles,
    )?
    .with_policy(config.policy)
    .with_capabilities(emitter.capabilities());

    let output = if cli.jobs <= 1 { generator.run()? } else { generator.run_parallel(cli.jobs)? };
    for diagnostic in &output.diagnostics {
        if let Diagnostic::DedupStats(_) = diagnostic {
            info!("{diagnostic}");
        }
    }

    for bundle in &output.bundles {
        let source = emitter
            .emit(bundle)
            .with_context(|| format!("failed to emit bundle '{}'", bundle.name))?;
        if let Backend::Debug = cli.backend {
            println!("{source}");
            continue;
        }

        let path = cli.out_dir.join(&bundle.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&path, source).with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(path = %path.display(), entries = bundle.entries.len(), "wrote bindings");
    }

    Ok(())
}
