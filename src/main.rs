use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use subgroup_beam::data::loader::{load_file, load_json, LoadedInput};
use subgroup_beam::report;
use subgroup_beam::{SearchConfig, SubgroupDiscovery, TargetSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Find the subgroups whose condition/outcome association differs most from the rest.
#[derive(Parser, Debug)]
#[command(name = "subgroup-beam")]
#[command(version)]
struct Args {
    /// Input table (.json, .csv, .parquet), or `-` for a JSON bundle on stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Beam width
    #[arg(short, long)]
    width: Option<usize>,

    /// Search depth
    #[arg(short, long)]
    depth: Option<usize>,

    /// Number of results to report
    #[arg(short, long)]
    results: Option<usize>,

    /// Maximum numeric split candidates per attribute
    #[arg(short, long)]
    bins: Option<usize>,

    /// Boolean condition attribute
    #[arg(long)]
    condition: Option<String>,

    /// Boolean outcome attribute
    #[arg(long)]
    outcome: Option<String>,

    /// Extra attribute to exclude from refinement (repeatable)
    #[arg(short, long = "target")]
    targets: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Args {
    /// File parameters first, flags on top.
    fn merge(&self, base: Option<SearchConfig>) -> SearchConfig {
        let mut cfg = base.unwrap_or_default();
        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.depth {
            cfg.depth = v;
        }
        if let Some(v) = self.results {
            cfg.results = v;
        }
        if let Some(v) = self.bins {
            cfg.bins = v;
        }
        if let Some(v) = &self.condition {
            cfg.condition = v.clone();
        }
        if let Some(v) = &self.outcome {
            cfg.outcome = v.clone();
        }
        if !self.targets.is_empty() {
            let mut names: Vec<String> = cfg.targets.names().map(str::to_string).collect();
            names.extend(self.targets.iter().cloned());
            cfg.targets = TargetSpec::List(names);
        }
        cfg
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let LoadedInput { dataset, config } = if args.input.as_os_str() == "-" {
        info!("decoding data from stdin");
        load_json(std::io::stdin().lock()).context("reading stdin")?
    } else {
        load_file(&args.input)?
    };

    let config = args.merge(config);
    let dataset = config.reserve_targets(dataset)?;
    let run = SubgroupDiscovery::new(&dataset, &config)?;
    let items = run.run()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => report::write_text(&mut out, &items)?,
        OutputFormat::Json => report::write_json(&mut out, &report::findings(&run, &items))?,
    }
    out.flush()?;
    Ok(())
}
