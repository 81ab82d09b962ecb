//! sway-report - inspect sway recordings and compare conditions.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sway_analysis::output::{format_corpus_summary, format_report, to_json_pretty};
use sway_analysis::playback::{sway_offset, FrameClock, DEFAULT_SWAY_SCALE};
use sway_analysis::{
    load_corpus, Channel, Condition, Config, Corpus, DataSources, ParticipantId,
    PermutationTester,
};

/// sway-report - postural sway data explorer
#[derive(Parser, Debug)]
#[command(name = "sway-report")]
#[command(author, version, about = "Postural sway data explorer", long_about = None)]
struct Cli {
    /// Directory holding the default per-condition CSV files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping condition codes to CSV paths
    #[arg(short, long, global = true)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List loaded conditions with participant and sample counts
    Summary,

    /// Show the sample nearest to a time (or animation frame)
    Nearest {
        /// Condition code (ECN, ECR, VRN, VRM)
        condition: Condition,

        /// Participant id
        participant: ParticipantId,

        /// Recording time in seconds
        #[arg(conflicts_with = "frame")]
        time: Option<f64>,

        /// Animation frame at 30 fps, instead of a time
        #[arg(long)]
        frame: Option<u64>,
    },

    /// Permutation test between two conditions on one channel
    Permute {
        /// First condition code
        a: Condition,

        /// Second condition code
        b: Condition,

        /// Channel to compare (copx, copy, mx, my)
        #[arg(short, long, default_value = "copx")]
        channel: Channel,

        /// Number of permutations
        #[arg(short = 'n', long)]
        permutations: Option<usize>,

        /// Histogram bins
        #[arg(long)]
        bins: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Run permutations on the thread pool
        #[arg(long)]
        parallel: bool,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let sources = resolve_sources(cli.sources.as_ref(), cli.data_dir.as_ref())?;
    let corpus = load_corpus(&sources);

    match cli.command {
        Commands::Summary => {
            print!("{}", format_corpus_summary(&corpus));
        }
        Commands::Nearest {
            condition,
            participant,
            time,
            frame,
        } => {
            show_nearest(&corpus, condition, participant, time, frame)?;
        }
        Commands::Permute {
            a,
            b,
            channel,
            permutations,
            bins,
            seed,
            parallel,
            json,
        } => {
            let mut config = Config::default().with_env();
            if let Some(n) = permutations {
                config.permutations = n;
            }
            if let Some(n) = bins {
                config.bin_count = n;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.parallel |= parallel;
            run_permute(&corpus, a, b, channel, config, json)?;
        }
    }

    Ok(())
}

fn resolve_sources(
    sources: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> Result<DataSources> {
    let mut resolved = match sources {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read sources file {}", path.display()))?;
            DataSources::from_json(&text)
                .with_context(|| format!("Failed to parse sources file {}", path.display()))?
        }
        None => DataSources::default().with_env(),
    };
    if let Some(dir) = data_dir {
        resolved = resolved.rebase(dir);
    }
    Ok(resolved)
}

fn show_nearest(
    corpus: &Corpus,
    condition: Condition,
    participant: ParticipantId,
    time: Option<f64>,
    frame: Option<u64>,
) -> Result<()> {
    let series = corpus
        .get_series(condition, participant)
        .with_context(|| format!("No series for participant {participant} in {condition}"))?;

    let clock = FrameClock::default();
    let t = match (time, frame) {
        (Some(t), _) => t,
        (None, Some(f)) => clock.time_at(f),
        (None, None) => bail!("Give either a time or --frame"),
    };

    let sample = series
        .nearest(t)
        .with_context(|| format!("No sample near t = {t}"))?;
    let offset = sway_offset(series, &sample, DEFAULT_SWAY_SCALE);

    println!("{condition} participant {participant} at t = {t:.3}s");
    println!("  sample time: {:.3}s", sample.time);
    println!("  CoP:         ({:.6}, {:.6})", sample.cop_x, sample.cop_y);
    match (sample.mx, sample.my) {
        (Some(mx), Some(my)) => println!("  moments:     ({mx:.6}, {my:.6})"),
        _ => println!("  moments:     n/a"),
    }
    println!("  offset:      ({:.1}, {:.1}) px", offset.dx, offset.dy);
    Ok(())
}

fn run_permute(
    corpus: &Corpus,
    a: Condition,
    b: Condition,
    channel: Channel,
    config: Config,
    json: bool,
) -> Result<()> {
    let tester = PermutationTester::with_config(config);
    let report = corpus
        .compare(a, b, channel, &tester)
        .with_context(|| format!("Permutation test {a} vs {b} on {channel} failed"))?;

    if json {
        println!("{}", to_json_pretty(&report).context("Failed to serialize report")?);
    } else {
        println!("{a} vs {b} ({channel})");
        print!("{}", format_report(&report));
    }
    Ok(())
}
