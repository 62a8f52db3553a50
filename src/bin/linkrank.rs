//! linkrank CLI
//!
//! Rank the pages of an HTML corpus by sampling and by iteration.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::{json, Map, Value};

use linkrank::{
    crawl, iterate_rank_with_config, sample_rank, sample_rank_with_config, Distribution,
    IterateConfig, IterationRun, SampleConfig, DEFAULT_DAMPING, DEFAULT_SAMPLES,
    DEFAULT_TOLERANCE,
};

#[derive(Parser, Debug)]
#[command(name = "linkrank", version, about = "PageRank for a directory of HTML pages")]
struct Cli {
    /// Directory containing the corpus' .html files
    corpus: PathBuf,

    /// Probability of following a link rather than jumping to a random page
    #[arg(short, long, default_value_t = DEFAULT_DAMPING)]
    damping: f64,

    /// Number of random-surfer steps for the sampling estimate
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Seed for a reproducible sampling estimate (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop iterating once no page moves by this much or more
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Give up iterating after this many steps
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Only show the K highest-ranked pages; pages ranked 0 still fill the list
    #[arg(long, value_name = "K")]
    top: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let graph = crawl(&cli.corpus)
        .with_context(|| format!("loading corpus {}", cli.corpus.display()))?;

    let sampled = match cli.seed {
        Some(seed) => sample_rank_with_config(
            &graph,
            SampleConfig {
                damping: cli.damping,
                samples: cli.samples,
                seed,
            },
        ),
        None => sample_rank(&graph, cli.damping, cli.samples),
    }
    .context("sampling estimate")?;

    let iterated = iterate_rank_with_config(
        &graph,
        IterateConfig {
            damping: cli.damping,
            tolerance: cli.tolerance,
            max_iterations: cli.max_iterations,
        },
    )
    .context("iterative estimate")?;

    match cli.format {
        Format::Text => print_text(&cli, &sampled, &iterated),
        Format::Json => print_json(&cli, &sampled, &iterated)?,
    }
    Ok(())
}

/// Pages to report: all of them by name, or the top K by rank (unvisited pages included).
fn rows<'a>(ranks: &'a Distribution<String>, top: Option<usize>) -> Vec<(&'a String, f64)> {
    match top {
        Some(k) => ranks.ranked().into_iter().take(k).collect(),
        None => ranks.iter().collect(),
    }
}

fn print_text(cli: &Cli, sampled: &Distribution<String>, iterated: &IterationRun<String>) {
    println!("PageRank Results from Sampling (n = {})", cli.samples);
    for (page, rank) in rows(sampled, cli.top) {
        println!("  {page}: {rank:.4}");
    }
    println!("PageRank Results from Iteration");
    for (page, rank) in rows(&iterated.ranks, cli.top) {
        println!("  {page}: {rank:.4}");
    }
    if !iterated.converged {
        println!(
            "  (stopped after {} iterations; last change {:.6})",
            iterated.iterations, iterated.max_diff
        );
    }
}

fn print_json(
    cli: &Cli,
    sampled: &Distribution<String>,
    iterated: &IterationRun<String>,
) -> Result<()> {
    let to_object = |ranks: &Distribution<String>| -> Value {
        let map: Map<String, Value> = rows(ranks, cli.top)
            .into_iter()
            .map(|(page, rank)| (page.clone(), json!(rank)))
            .collect();
        Value::Object(map)
    };
    let out = json!({
        "damping": cli.damping,
        "sampling": {
            "samples": cli.samples,
            "seed": cli.seed,
            "ranks": to_object(sampled),
        },
        "iteration": {
            "iterations": iterated.iterations,
            "converged": iterated.converged,
            "max_diff": iterated.max_diff,
            "ranks": to_object(&iterated.ranks),
        },
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
