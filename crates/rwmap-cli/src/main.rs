use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rwmap_config::{init_tracing, RwmapConfig};
use rwmap_gen::{write_shards, RunReport, ShardOptions};

/// Converts a manpage index into rewrite-map shards.
///
/// Combine the shards with `LC_ALL=C sort output.* > rwmap.txt` and convert the
/// result with `httxt2dbm -i rwmap.txt -o rwmap.dbm`.
#[derive(Parser)]
#[command(name = "idx2rwmap", version, about, long_about = None)]
struct Cli {
    /// Path to the manpage index (binary or JSON) [default: /srv/man/auxserver.idx]
    #[arg(long)]
    index: Option<PathBuf>,
    /// Number of output files to create in parallel (0 = number of logical CPUs)
    #[arg(long, allow_negative_numbers = true)]
    concurrency: Option<i64>,
    /// Directory receiving the output.<n> files [default: current directory]
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Extension appended to every serving path [default: .html]
    #[arg(long)]
    serving_extension: Option<String>,
    /// TOML config file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log level or tracing filter directive (overrides `logging.level`)
    #[arg(long)]
    log_level: Option<String>,
    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<RwmapConfig> {
        let mut config = match &self.config {
            Some(path) => RwmapConfig::load(path)?,
            None => RwmapConfig::default(),
        };
        if let Some(index) = &self.index {
            config.index = index.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(extension) = &self.serving_extension {
            config.serving_extension = extension.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = cli.resolve_config()?;
    init_tracing(&config.logging);

    let index = rwmap_index::load_index(&config.index)
        .with_context(|| format!("loading index {}", config.index.display()))?;

    let options = ShardOptions {
        workers: config.effective_workers(),
        output_dir: config.output_dir.clone(),
        serving_extension: config.serving_extension.clone(),
        queue_capacity: config.queue_capacity,
    };
    tracing::info!(
        target = "rwmap.cli",
        workers = options.workers,
        output_dir = %options.output_dir.display(),
        "writing rewrite map"
    );
    let report = write_shards(&index, &options).context("writing rewrite map shards")?;

    print_report(&report, cli.json)?;
    Ok(0)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report)?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "wrote {} lines for {} names into {} shards ({} ms)",
        report.lines,
        report.names,
        report.shards.len(),
        report.elapsed_ms
    );
    for shard in &report.shards {
        println!(
            "  {}: {} names, {} lines",
            shard.path.display(),
            shard.names,
            shard.lines
        );
    }
    Ok(())
}
