//! Play a rotation one or more times and report damage.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use sim_content::{ContentFactory, RunReport, Scenario};
use sim_core::Frame;
use tokio::task::JoinSet;

/// Play a rotation and report damage
#[derive(Parser)]
pub struct Run {
    /// Party members and targets (RON)
    #[arg(long, value_name = "FILE")]
    roster: PathBuf,

    /// Ordered action steps (RON)
    #[arg(long, value_name = "FILE")]
    rotation: PathBuf,

    /// Engine and kit settings (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Independent runs; their damage traces must agree
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Frame to keep simulating until after the last step
    #[arg(long, value_name = "FRAME", default_value_t = 1200)]
    until: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Per-ability totals and DPS
    Summary,
    /// The first run's report as JSON
    Json,
}

impl Run {
    pub async fn execute(self) -> Result<()> {
        let mut factory = ContentFactory::new(&self.roster, &self.rotation);
        if let Some(config) = &self.config {
            factory = factory.with_config(config);
        }
        let scenario = Arc::new(factory.load_scenario()?);
        let fps = scenario.sim.frames_per_second;

        let reports = run_all(scenario, self.runs, Frame(self.until)).await?;
        check_digests(&reports)?;
        let report = &reports[0];

        match self.format {
            OutputFormat::Summary => print_summary(report, fps, reports.len()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;
                println!("{}", json);
            }
        }
        Ok(())
    }
}

/// Runs the scenario `runs` times on blocking workers, returning reports in
/// run order.
async fn run_all(scenario: Arc<Scenario>, runs: u32, until: Frame) -> Result<Vec<RunReport>> {
    let mut workers = JoinSet::new();
    for run in 0..runs {
        let scenario = Arc::clone(&scenario);
        workers.spawn_blocking(move || (run, scenario.run(until)));
    }

    let mut reports = Vec::with_capacity(runs as usize);
    while let Some(joined) = workers.join_next().await {
        let (run, result) = joined.context("simulation worker panicked")?;
        let report = result.with_context(|| format!("run {} failed", run))?;
        tracing::debug!(run, hits = report.hits, digest = %report.digest, "run finished");
        reports.push((run, report));
    }
    reports.sort_by_key(|(run, _)| *run);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

fn check_digests(reports: &[RunReport]) -> Result<()> {
    let Some(first) = reports.first() else {
        anyhow::bail!("no runs completed");
    };
    if let Some((run, diverged)) = reports.iter().enumerate().find(|(_, r)| r.digest != first.digest) {
        anyhow::bail!(
            "run {} diverged from run 0: digest {} != {}",
            run,
            diverged.digest,
            first.digest
        );
    }
    Ok(())
}

fn print_summary(report: &RunReport, fps: u32, runs: usize) {
    println!("{}", style("=== Rotation Summary ===").bold().green());
    println!();

    println!("{}", style("Damage by ability:").bold().yellow());
    let mut rows: Vec<_> = report.damage_by_label.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(a.1));
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, amount) in rows {
        let share = if report.total_damage > 0.0 {
            amount / report.total_damage * 100.0
        } else {
            0.0
        };
        println!("  {:<width$}  {:>14.1}  {:>5.1}%", label, amount, share, width = width);
    }
    println!();

    println!("{} {:.1}", style("Total:").bold().cyan(), report.total_damage);
    println!("{} {}", style("Hits:").bold().cyan(), report.hits);
    println!(
        "{} {} ({:.2} s)",
        style("End frame:").bold().cyan(),
        report.end_frame.0,
        report.end_frame.0 as f64 / f64::from(fps)
    );
    println!("{} {:.1}", style("DPS:").bold().cyan(), report.dps(fps));
    println!("{} {}", style("Digest:").bold().cyan(), report.digest);
    if !report.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped steps:").bold().yellow());
        for skipped in &report.skipped {
            println!(
                "  #{} {} {} at frame {}: {}",
                skipped.step,
                skipped.actor,
                skipped.action,
                skipped.frame.0,
                style(skipped.code).dim()
            );
        }
    }
    if runs > 1 {
        println!("{} {} runs agree", style("Determinism:").bold().cyan(), runs);
    }
}
