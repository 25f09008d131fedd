//! CLI tool for scoring business health snapshots

use anyhow::{bail, Context};
use business_health_score::{
    definition, evaluate_files, Category, Component, EngineConfig, HealthScoreEngine,
    HealthScoreInputs, HealthScoreResult, HealthStatus, Priority,
};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "health-score")]
#[command(about = "Score business health snapshots across profit, cash flow, efficiency and risk", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to custom configuration file (TOML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a snapshot and display a summary
    Scan {
        /// Snapshot file (JSON)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Display every subcomponent and recommendation
        #[arg(long)]
        detailed: bool,

        /// Fail if the total score is below this threshold (0-100)
        #[arg(long)]
        fail_threshold: Option<f64>,
    },

    /// Generate a detailed health report
    Report {
        /// Snapshot file (JSON)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output format
        #[arg(short = 'f', long, default_value = "markdown")]
        format: ReportFormat,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Check a snapshot against score thresholds (exit code based)
    Check {
        /// Snapshot file (JSON)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Minimum acceptable total score (0-100)
        #[arg(long, default_value = "50")]
        min_total: f64,

        /// Minimum acceptable score for every category (0-25)
        #[arg(long)]
        min_category: Option<f64>,
    },

    /// Describe how a subcomponent is measured and scored
    Explain {
        /// Subcomponent key, e.g. collection_speed or billing-backlog
        component: String,
    },

    /// Score every JSON snapshot in a directory concurrently
    Batch {
        /// Directory containing snapshot files
        #[arg(short = 'd', long)]
        dir: PathBuf,

        /// Output format
        #[arg(short = 'f', long, default_value = "table")]
        format: BatchFormat,
    },
}

#[derive(Clone, Debug)]
enum ReportFormat {
    Json,
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
enum BatchFormat {
    Json,
    Table,
}

impl std::str::FromStr for BatchFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(BatchFormat::Json),
            "table" => Ok(BatchFormat::Table),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = HealthScoreEngine::new(config)?;

    match cli.command {
        Commands::Scan {
            input,
            detailed,
            fail_threshold,
        } => {
            let result = score_file(&engine, &input)?;
            display_summary(&result);

            if detailed {
                println!();
                display_detailed(&result);
            }

            if let Some(threshold) = fail_threshold {
                if result.scores.total < threshold {
                    eprintln!(
                        "\n{} total score {:.1} is below threshold {}",
                        "Failed:".red().bold(),
                        result.scores.total,
                        threshold
                    );
                    return Ok(1);
                }
            }
        }

        Commands::Report {
            input,
            format,
            output,
        } => {
            let result = score_file(&engine, &input)?;
            let content = match format {
                ReportFormat::Json => serde_json::to_string_pretty(&result)?,
                ReportFormat::Markdown => generate_markdown_report(&input, &result),
            };

            if let Some(output_path) = output {
                std::fs::write(&output_path, content).with_context(|| {
                    format!("Failed to write report to {}", output_path.display())
                })?;
                println!("Report written to: {}", output_path.display());
            } else {
                println!("{}", content);
            }
        }

        Commands::Check {
            input,
            min_total,
            min_category,
        } => {
            let result = score_file(&engine, &input)?;
            let mut failures = Vec::new();

            if result.scores.total < min_total {
                failures.push(format!(
                    "  - total score {:.1} < {}",
                    result.scores.total, min_total
                ));
            }
            if let Some(min) = min_category {
                for category in Category::ALL {
                    let score = result.scores.category(category);
                    if score < min {
                        failures.push(format!(
                            "  - {} score {:.1} < {}",
                            category.label(),
                            score,
                            min
                        ));
                    }
                }
            }

            if !failures.is_empty() {
                eprintln!("{} {} check failures:", "Failed:".red().bold(), failures.len());
                for failure in failures {
                    eprintln!("{}", failure);
                }
                return Ok(1);
            }
            println!("{} All checks passed!", "Success:".green().bold());
        }

        Commands::Explain { component } => {
            let Some(component) = Component::from_key(&component) else {
                let known: Vec<&str> = Component::ALL.iter().map(|c| c.key()).collect();
                bail!(
                    "Unknown component '{}'. Known components: {}",
                    component,
                    known.join(", ")
                );
            };
            display_definition(engine.config(), component);
        }

        Commands::Batch { dir, format } => {
            let paths = snapshot_files(&dir)?;
            if paths.is_empty() {
                bail!("No JSON snapshots found in {}", dir.display());
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            spinner.set_message(format!("Scoring {} snapshots...", paths.len()));
            spinner.enable_steady_tick(std::time::Duration::from_millis(100));

            let outcomes = evaluate_files(Arc::new(engine), paths).await;

            spinner.finish_and_clear();

            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            match format {
                BatchFormat::Json => {
                    let rows: Vec<serde_json::Value> = outcomes
                        .iter()
                        .map(|o| match &o.result {
                            Ok(result) => serde_json::json!({
                                "label": o.label,
                                "scores": result.scores,
                            }),
                            Err(e) => serde_json::json!({
                                "label": o.label,
                                "error": e.to_string(),
                            }),
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                BatchFormat::Table => {
                    println!(
                        "{:<24} {:>7} {:>7} {:>7} {:>7} {:>7}  {}",
                        "Snapshot", "Profit", "Cash", "Effic.", "Risk", "Total", "Status"
                    );
                    for outcome in &outcomes {
                        match &outcome.result {
                            Ok(result) => {
                                let s = &result.scores;
                                println!(
                                    "{:<24} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1}  {}",
                                    outcome.label,
                                    s.profit,
                                    s.cashflow,
                                    s.efficiency,
                                    s.risk,
                                    s.total,
                                    colored_status(s.status)
                                );
                            }
                            Err(e) => {
                                println!("{:<24} {}", outcome.label, e.to_string().red());
                            }
                        }
                    }
                }
            }

            if failed > 0 {
                eprintln!(
                    "{} {} of {} snapshots could not be scored",
                    "Warning:".yellow().bold(),
                    failed,
                    outcomes.len()
                );
                return Ok(1);
            }
        }
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn score_file(engine: &HealthScoreEngine, path: &Path) -> anyhow::Result<HealthScoreResult> {
    let inputs = HealthScoreInputs::from_path(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    info!("Scoring snapshot {}", path.display());
    Ok(engine.evaluate(&inputs))
}

fn snapshot_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn colored_status(status: HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Excellent => status.to_string().green(),
        HealthStatus::Good => status.to_string().cyan(),
        HealthStatus::Warning => status.to_string().yellow(),
        HealthStatus::Critical => status.to_string().red(),
    }
}

fn colored_priority(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.to_string().red(),
        Priority::Medium => priority.to_string().yellow(),
        Priority::Low => priority.to_string().normal(),
    }
}

fn display_summary(result: &HealthScoreResult) {
    let scores = &result.scores;
    println!("\n{}", "=== Business Health Summary ===".bold());
    println!(
        "Total: {}/100 [{}]",
        scores.total_rounded.to_string().bold(),
        colored_status(scores.status)
    );
    println!();

    for (category, breakdown) in result.breakdown.iter() {
        let line = format!(
            "{:<12} {:>5.1}/{:.0}",
            category.label(),
            breakdown.score,
            breakdown.ceiling
        );
        let share = breakdown.score / breakdown.ceiling.max(f64::EPSILON);
        let line = if !breakdown.available {
            format!("{}  (not configured)", line).dimmed()
        } else if share >= 0.85 {
            line.green()
        } else if share >= 0.5 {
            line.yellow()
        } else {
            line.red()
        };
        println!("  {} {}", "●".bold(), line);
    }
    println!();

    let insights = &result.insights;
    println!(
        "Strongest: {}  Weakest: {}",
        insights.strongest_category.label().green(),
        insights.weakest_category.label().red()
    );
    if let Some(milestone) = &insights.next_milestone {
        println!(
            "Next milestone: {} ({:.1} points to go)",
            milestone.target, milestone.points_needed
        );
    }
    if !insights.top_priorities.is_empty() {
        println!("Top priorities:");
        for title in &insights.top_priorities {
            println!("  - {}", title);
        }
    }
}

fn display_detailed(result: &HealthScoreResult) {
    println!("{}", "=== Detailed Results ===".bold());

    for (category, breakdown) in result.breakdown.iter() {
        println!(
            "\n{} {:.1}/{:.0}",
            category.label().bold(),
            breakdown.score,
            breakdown.ceiling
        );
        for c in breakdown.components.iter().filter(|c| c.enabled) {
            println!(
                "  {:<28} {:>5.1}/{:<5.1} {}",
                c.name, c.points, c.ceiling, c.display_value
            );
        }
        if breakdown.penalties > 0.0 {
            println!(
                "  {}",
                format!("Penalties: -{:.1}", breakdown.penalties).red()
            );
        }
        for note in &breakdown.notes {
            println!("  {}", note.dimmed());
        }

        let recs = result.recommendations.get(category);
        if !recs.is_empty() {
            println!("  Recommendations:");
            for rec in recs {
                println!(
                    "    - [{}] {} (+{:.1} pts)",
                    colored_priority(rec.priority),
                    rec.title,
                    rec.impact
                );
            }
        }
    }
}

fn display_definition(config: &EngineConfig, component: Component) {
    let def = definition(component);
    let ceiling = config.weights.get(component.category()).base_ceiling(component);
    let scale = config.scales.scale_for(component);

    println!("{} ({})", def.name.bold(), component.key());
    println!("Category: {}", component.category().label());
    println!("Base ceiling: {:.1} points", ceiling);
    println!();
    println!("{}", def.description);
    println!("Calculation: {}", def.calculation);
    println!("Scale: {}", scale.describe(ceiling, def.unit));
    println!();
    println!("When it lags: {}", def.recommendation.title.cyan());
    for action in def.recommendation.actions {
        println!("  - {}", action);
    }
}

fn generate_markdown_report(input: &Path, result: &HealthScoreResult) -> String {
    let mut md = String::new();
    let scores = &result.scores;

    md.push_str(&format!("# Business Health Report: {}\n\n", input.display()));

    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "- Total score: {:.1}/100 ({})\n",
        scores.total, scores.status
    ));
    for category in Category::ALL {
        md.push_str(&format!(
            "- {}: {:.1}/25\n",
            category.label(),
            scores.category(category)
        ));
    }
    md.push_str(&format!(
        "- Strongest category: {}\n",
        result.insights.strongest_category.label()
    ));
    md.push_str(&format!(
        "- Weakest category: {}\n\n",
        result.insights.weakest_category.label()
    ));

    for (category, breakdown) in result.breakdown.iter() {
        let explanation = result.explanations.get(category);
        md.push_str(&format!(
            "## {} ({:.1}/{:.0})\n\n",
            explanation.title, breakdown.score, breakdown.ceiling
        ));
        md.push_str(&format!("{}\n\n", explanation.narrative));

        md.push_str("| Metric | Value | Points | Scale |\n");
        md.push_str("|--------|-------|--------|-------|\n");
        for c in breakdown.components.iter().filter(|c| c.enabled) {
            md.push_str(&format!(
                "| {} | {} | {:.1}/{:.1} | {} |\n",
                c.name, c.display_value, c.points, c.ceiling, c.benchmark
            ));
        }
        if breakdown.penalties > 0.0 {
            md.push_str(&format!("\nPenalties: -{:.1} points\n", breakdown.penalties));
        }

        let recs = result.recommendations.get(category);
        if !recs.is_empty() {
            md.push_str("\n**Recommendations**\n\n");
            for rec in recs {
                md.push_str(&format!(
                    "- **{}** ({} priority, +{:.1} pts): {}\n",
                    rec.title, rec.priority, rec.impact, rec.description
                ));
            }
        }
        md.push('\n');
    }

    md
}
