use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rusty_tree::data::dataset::SplitRatios;
use rusty_tree::data::reader::{read_path, resolve_decision};
use rusty_tree::information::InformationReport;
use rusty_tree::trees::classifier::DecisionTreeClassifier;
use rusty_tree::trees::params::TreeParams;

#[derive(Parser)]
#[command(name = "induce")]
#[command(about = "Grow, prune and score a categorical decision tree")]
#[command(version)]
struct Cli {
    /// Delimited data file (tab, ';', ',' or space separated)
    path: PathBuf,

    /// Treat the first line as attribute names
    #[arg(long)]
    header: bool,

    /// Decision attribute, by name or 1-based column index (defaults to the last column)
    #[arg(long)]
    decision: Option<String>,

    /// Fraction of records used for training
    #[arg(long, default_value_t = 0.6)]
    train: f64,

    /// Fraction of records used for pruning
    #[arg(long, default_value_t = 0.2)]
    validation: f64,

    /// RNG seed for the train/validation/test split
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<u16>,

    /// Standard errors a leaf may exceed the subtree error by and still replace it
    #[arg(long, default_value_t = 1.0)]
    pruning_confidence: f64,

    /// Skip pruning
    #[arg(long)]
    no_prune: bool,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
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

    let dataset = read_path(&cli.path, cli.header)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    info!(
        n_records = dataset.nrows(),
        n_attributes = dataset.ncols(),
        "dataset loaded"
    );

    let decision = match &cli.decision {
        Some(selector) => resolve_decision(&dataset, selector)?,
        None => dataset
            .attributes()
            .last()
            .cloned()
            .context("dataset has no attributes")?,
    };

    let report = InformationReport::compute(&dataset, &decision)?;
    println!("=== Entropy ===");
    for (attribute, entropy) in &report.entropy {
        println!("{}: {:.4}", attribute, entropy);
    }
    println!("=== Information gain ===");
    for (attribute, gain) in &report.information_gain {
        println!("{}: {:.4}", attribute, gain);
    }
    println!("=== Gain ratio ===");
    for (attribute, ratio) in &report.gain_ratio {
        println!("{}: {:.4}", attribute, ratio);
    }

    let ratios = SplitRatios::new(cli.train, cli.validation)?.with_seed(cli.seed);
    let (train, validation, test) = dataset.train_validation_test_split(&ratios)?;
    info!(
        train = train.nrows(),
        validation = validation.nrows(),
        test = test.nrows(),
        "dataset split"
    );

    let mut params = TreeParams::new();
    params.set_max_depth(cli.max_depth)?;
    params.set_pruning_confidence(cli.pruning_confidence)?;

    let mut model = DecisionTreeClassifier::from_tree_params(params);
    model
        .fit(&train, &decision)
        .context("failed to build the decision tree")?;

    if !cli.no_prune {
        let summary = model.prune(&validation)?;
        info!(
            collapsed = summary.collapsed,
            nodes = summary.nodes_after,
            "tree pruned"
        );
    }

    if let Some(root) = model.root() {
        println!("=== Decision tree ===");
        print!("{}", root);
    }

    let result = model.score(&test)?;
    println!("=== Test metrics ===");
    if let Some(positive) = &result.positive {
        println!("Positive class: {}", positive);
    }
    println!("Accuracy: {:.4}", result.accuracy);
    println!("Precision: {:.4}", result.precision);
    println!("Recall: {:.4}", result.recall);

    Ok(())
}
