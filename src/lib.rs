//! # business_health_score
//!
//! Composite health scoring for freelancers and small service businesses.
//! A snapshot of dashboard figures is scored across four independent
//! categories, each worth up to 25 points:
//! - **Profit**: revenue targets, hourly rate and subscription drivers
//! - **Cash flow**: collection speed, overdue invoices, recurring expenses due
//! - **Efficiency**: tracked hours, billing conversion and daily rhythm
//! - **Risk**: client concentration, revenue stability and billing backlog
//!
//! ## Quick Start
//!
//! ```no_run
//! use business_health_score::{HealthScoreEngine, HealthScoreInputs};
//!
//! # fn main() -> anyhow::Result<()> {
//! let inputs = HealthScoreInputs::from_path("snapshot.json")?;
//! let result = HealthScoreEngine::default().evaluate(&inputs);
//!
//! println!("{}/100 ({})", result.scores.total_rounded, result.scores.status);
//! for (category, explanation) in result.explanations.iter() {
//!     println!("{}: {}", category, explanation.narrative);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - Business model detection with point redistribution between time-based
//!   and subscription drivers
//! - Configurable weight tables and stepped scoring scales (TOML or JSON)
//! - Structured explanations and prioritized recommendations
//! - Concurrent batch evaluation on the tokio blocking pool
//! - CLI tool with multiple output formats (JSON, Markdown)

mod batch;
pub mod calendar;
mod classifier;
mod config;
mod engine;
mod error;
mod explain;
mod metrics;
mod recommend;
mod redistribution;
mod scale;
mod scoring;
mod types;

// Re-export public API
pub use batch::{evaluate_batch, evaluate_files, BatchOutcome};
pub use classifier::{classify, ActiveDrivers};
pub use config::{
    default_scale, EngineConfig, EngineConfigBuilder, RecommendationPolicy,
    RecurringPenaltyPolicy, ScoringScales, WeakDriverPolicy, WeakDriverRule, WeightEntry,
    WeightTable, WeightTables,
};
pub use engine::{evaluate, HealthScoreEngine};
pub use error::{HealthError, Result};
pub use explain::explain;
pub use metrics::{definition, MetricDefinition, RecommendationTemplate};
pub use recommend::{insights, next_milestone, priority_for, recommendations, MILESTONES};
pub use redistribution::{CategoryPlan, PlannedComponent, RedistributionPlan};
pub use scale::{Breakpoint, Direction, ScoringScale};
pub use scoring::determine_status;
pub use types::*;
