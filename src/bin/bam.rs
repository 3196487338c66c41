//! BAM command-line front end

use anyhow::{Context, Result};
use bam::{BamConfig, Dims, Model, Pattern};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bam")]
#[command(about = "Create, train and query a bidirectional associative memory")]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Recall iteration ceiling (overrides the config file)
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new BAM in <store>
    #[command(visible_alias = "c")]
    Create {
        /// Height of pattern A
        n: usize,
        /// Width of pattern A and height of pattern B
        m: usize,
        /// Width of pattern B
        p: usize,
        store: PathBuf,
    },

    /// Add the pair from <file_a> and <file_b> to the BAM in <store>
    #[command(visible_alias = "a")]
    Add {
        file_a: PathBuf,
        file_b: PathBuf,
        store: PathBuf,
    },

    /// Delete the pair from <file_a> and <file_b> from the BAM in <store>
    #[command(visible_alias = "d")]
    Delete {
        file_a: PathBuf,
        file_b: PathBuf,
        store: PathBuf,
    },

    /// Recall the B pattern associated with <file_a> and write it to <file_b>
    #[command(visible_alias = "l")]
    Left {
        file_a: PathBuf,
        file_b: PathBuf,
        store: PathBuf,
    },

    /// Recall the A pattern associated with <file_b> and write it to <file_a>
    #[command(visible_alias = "r")]
    Right {
        file_b: PathBuf,
        file_a: PathBuf,
        store: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => BamConfig::from_json_file(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => BamConfig::default(),
    };
    if args.max_iterations.is_some() {
        config.max_iterations = args.max_iterations;
    }

    match args.command {
        Command::Create { n, m, p, store } => {
            let capacity = bam::store::create(&store, Dims::new(n, m, p))
                .with_context(|| format!("could not create {}", store.display()))?;
            println!("useful capacity: {}", capacity);
        }

        Command::Add {
            file_a,
            file_b,
            store,
        } => {
            let (a, b) = load_pair(&file_a, &file_b)?;
            let mut model = open(&store, config)?;
            model.add(&a, &b).context("could not add pair")?;
            println!("useful capacity left: {}", model.capacity());
            model.close()?;
        }

        Command::Delete {
            file_a,
            file_b,
            store,
        } => {
            let (a, b) = load_pair(&file_a, &file_b)?;
            let mut model = open(&store, config)?;
            model.remove(&a, &b).context("could not delete pair")?;
            println!("useful capacity left: {}", model.capacity());
            model.close()?;
        }

        Command::Left {
            file_a,
            file_b,
            store,
        } => {
            let a = load_pattern(&file_a)?;
            let mut model = open(&store, config)?;
            let recall = model
                .associate_from_left(&a)
                .context("recall from A failed")?;
            info!("Associated after {} iterations", recall.iterations);
            recall
                .pattern
                .to_binary()
                .save(&file_b)
                .with_context(|| format!("could not write {}", file_b.display()))?;
            model.close()?;
        }

        Command::Right {
            file_b,
            file_a,
            store,
        } => {
            let b = load_pattern(&file_b)?;
            let mut model = open(&store, config)?;
            let recall = model
                .associate_from_right(&b)
                .context("recall from B failed")?;
            info!("Associated after {} iterations", recall.iterations);
            recall
                .pattern
                .to_binary()
                .save(&file_a)
                .with_context(|| format!("could not write {}", file_a.display()))?;
            model.close()?;
        }
    }

    Ok(())
}

fn open(store: &Path, config: BamConfig) -> Result<Model> {
    Model::open_with(store, config).with_context(|| format!("could not open {}", store.display()))
}

fn load_pattern(path: &Path) -> Result<Pattern> {
    Pattern::load(path).with_context(|| format!("could not read {}", path.display()))
}

fn load_pair(file_a: &Path, file_b: &Path) -> Result<(Pattern, Pattern)> {
    Ok((load_pattern(file_a)?, load_pattern(file_b)?))
}
