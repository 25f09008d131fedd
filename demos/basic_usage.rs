//! Basic example of scoring a snapshot

use business_health_score::{
    evaluate, HealthScoreInputs, HealthStatus, ProfitTargets, RollingPeriod, RollingWindow,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load a snapshot from disk when a path is given, otherwise build one
    let inputs = match std::env::args().nth(1) {
        Some(path) => HealthScoreInputs::from_path(&path)?,
        None => sample_snapshot(),
    };

    let result = evaluate(&inputs);
    let scores = &result.scores;

    println!("=== Business Health ===");
    println!("Total: {}/100 ({})", scores.total_rounded, scores.status);
    println!();

    for (category, breakdown) in result.breakdown.iter() {
        println!(
            "  {:<12} {:>5.1}/{:.0}",
            category.label(),
            breakdown.score,
            breakdown.ceiling
        );
    }
    println!();

    if matches!(scores.status, HealthStatus::Warning | HealthStatus::Critical) {
        println!("Focus on:");
        for title in &result.insights.top_priorities {
            println!("  - {}", title);
        }
    } else {
        println!("✓ Business is in good shape");
    }

    if let Some(milestone) = &result.insights.next_milestone {
        println!(
            "\n{:.1} points to reach {} ({})",
            milestone.points_needed, milestone.target, milestone.status
        );
    }

    println!("\n{}", result.explanations.profit.narrative);

    Ok(())
}

fn sample_snapshot() -> HealthScoreInputs {
    let mut inputs = HealthScoreInputs {
        profit_targets: ProfitTargets {
            monthly_revenue_target: 8000.0,
            monthly_hours_target: 120.0,
            target_hourly_rate: 75.0,
            setup_completed: true,
            ..Default::default()
        },
        ..Default::default()
    };
    inputs.dashboard_metrics.total_registered = 6800.0;
    inputs.dashboard_metrics.overdue_amount = 1800.0;
    inputs.dashboard_metrics.overdue_count = 2;
    inputs.dashboard_metrics.ready_to_bill = 2400.0;
    inputs.time_stats.this_month.hours = 85.0;
    inputs.time_stats.unbilled.hours = 12.0;
    inputs.mtd_calculations.mtd_hours_target = 90.0;
    inputs.mtd_calculations.days_in_month = 30;
    inputs.mtd_calculations.current_day = 22;
    inputs.time_stats.rolling_30_days = Some(RollingWindow {
        current: RollingPeriod {
            billable_revenue: 7100.0,
            billable_hours: 100.0,
            total_hours: 115.0,
            distinct_working_days: 19,
            ..Default::default()
        },
        previous: RollingPeriod::default(),
    });
    inputs
}
