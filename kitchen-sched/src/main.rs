/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use kitchen_sched::builder::TaskModelBuilder;
use kitchen_sched::config::{KitchenConfigManager, RecipeBook};
use kitchen_sched::timeline::Timeline;

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per resource lane.
    Text,
    /// The full timeline as YAML.
    Yaml,
}

/// Kitchen scheduler: plan several recipes on one kitchen.
///
/// Example:
///   kitchen-sched --kitchen kitchen.yaml --recipes dinner.yaml --verify
#[derive(Debug, Parser)]
#[command(
    name = "kitchen-sched",
    about = "Kitchen scheduler – plan recipe steps on shared kitchen resources",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML recipe book.
    #[arg(short = 'r', long = "recipes")]
    recipes: PathBuf,

    /// Path to the YAML kitchen configuration (capacities + equipment map).
    #[arg(short = 'k', long = "kitchen")]
    kitchen: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Re-check precedence and exclusivity on the result; exit 2 on violation.
    #[arg(long = "verify", default_value_t = false)]
    verify: bool,

    /// Log filter (overrides RUST_LOG), e.g. "debug" or "kitchen_sched=trace".
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the timeline only.
    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        recipes = %cli.recipes.display(),
        kitchen = ?cli.kitchen,
        output  = ?cli.output,
        verify  = cli.verify,
        "Configuration"
    );

    match run(&cli) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    // ── Load kitchen configuration ────────────────────────────────────────────
    let mut kitchen = KitchenConfigManager::new();
    match &cli.kitchen {
        Some(path) => kitchen
            .load_from_file(path)
            .context("Failed to load kitchen configuration")?,
        None => warn!("No kitchen configuration file provided, using the default kitchen"),
    }

    // ── Load recipes and schedule ─────────────────────────────────────────────
    let book = RecipeBook::load_from_file(&cli.recipes)?;
    let scheduler = kitchen.config().scheduler();
    let timeline = scheduler
        .schedule(book.recipes())
        .context("Scheduling failed")?;

    match cli.output {
        OutputFormat::Text => print!("{}", render_lanes(&timeline)),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&timeline)?),
    }

    if cli.verify {
        let graph = TaskModelBuilder::new(scheduler.equipment().clone()).build(book.recipes())?;
        let violations = timeline.verify(&graph);
        if !violations.is_empty() {
            for v in &violations {
                error!("violation: {}", v);
            }
            return Ok(2);
        }
        info!("timeline verified: no violations");
    }

    Ok(0)
}

/// Plain-text lane listing: tracked lanes first, then unconstrained blocks.
fn render_lanes(timeline: &Timeline) -> String {
    let mut out = String::new();
    for (lane, blocks) in timeline.lanes() {
        out.push_str(&format!("{lane}\n"));
        for b in blocks {
            out.push_str(&format!(
                "  [{:>6}s, {:>6}s)  {:<16} {}\n",
                b.start, b.end, b.task.recipe_id, b.task.label
            ));
        }
    }

    let unbounded: Vec<_> = timeline
        .blocks()
        .iter()
        .filter(|b| b.equipment.as_ref().map_or(true, |e| e.slot.index().is_none()))
        .filter(|b| b.attention_instance.is_none())
        .collect();
    if !unbounded.is_empty() {
        out.push_str("unattended\n");
        for b in unbounded {
            let class = b.equipment.as_ref().map_or("-", |e| e.class.as_str());
            out.push_str(&format!(
                "  [{:>6}s, {:>6}s)  {:<16} {} ({})\n",
                b.start, b.end, b.task.recipe_id, b.task.label, class
            ));
        }
    }

    out.push_str(&format!("makespan: {}s\n", timeline.makespan()));
    out
}
