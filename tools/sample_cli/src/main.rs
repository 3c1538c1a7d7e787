use anyhow::{Context, Result};
use clap::Parser;
use conllu_sampler::{prepare_paths, save_reports, SampleConfig, Sampler};
use log::info;
use std::path::PathBuf;

/// Sample sentences from directories of CoNLL-U files, one output file per group.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input directories containing CoNLL-U files, then a single output directory.
    /// The output directory is created if it does not exist.
    #[arg(required = true, num_args = 2.., value_name = "[INPUT_DIR ...] OUTPUT_DIR")]
    paths: Vec<PathBuf>,

    /// Number of sentences to sample from each group [default: 450]
    #[arg(short = 'k', long = "num-sentences", visible_alias = "num_sentences")]
    num_sentences: Option<usize>,

    /// Seed for random sampling; every group is shuffled with this seed [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Pattern whose named captures (sorted by name) form the group key
    #[arg(long)]
    group: Option<String>,

    /// Require all files to match the group pattern
    #[arg(long)]
    group_exhaustive: bool,

    /// Allowed sentence lengths in tokens [default: 5 10 15 20 30 40 50 60 70]
    #[arg(long, num_args = 1..)]
    lengths: Option<Vec<usize>>,

    /// Keep every n-th sentence of allowed length [default: 3]
    #[arg(long)]
    period: Option<usize>,

    /// Extension of the input files [default: conllu]
    #[arg(long)]
    extension: Option<String>,

    /// YAML file with sampling settings; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn sample_config(&self) -> Result<SampleConfig> {
        let mut config = match &self.config {
            Some(path) => SampleConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SampleConfig::default(),
        };

        if let Some(k) = self.num_sentences {
            config.k = k;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(group) = &self.group {
            config.group_by_regex = group.clone();
        }
        if self.group_exhaustive {
            config.group_all_match = true;
        }
        if let Some(lengths) = &self.lengths {
            config.lengths = lengths.iter().copied().collect();
        }
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.sample_config()?;
    let sampler = Sampler::new(config).context("Invalid sampling configuration")?;

    let (inputs, out) = prepare_paths(&cli.paths)?;

    let total = inputs.len();
    let mut reports = Vec::with_capacity(total);
    for (i, folder) in inputs.iter().enumerate() {
        info!("[{}/{}] Sampling {}", i + 1, total, folder.display());
        let report = sampler
            .sample_dir(folder, &out)
            .with_context(|| format!("Failed to sample {}", folder.display()))?;
        info!(
            "{}: {} sentences in {} groups ({} files skipped)",
            folder.display(),
            report.selected(),
            report.written().count(),
            report.skipped_files
        );
        reports.push(report);
    }

    if let Some(path) = &cli.report {
        save_reports(&reports, path).context("Failed to save report")?;
        info!("Saved report to {}", path.display());
    }

    Ok(())
}
