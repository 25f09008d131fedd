//! Example showing custom configuration

use business_health_score::{
    Category, Component, EngineConfig, Family, HealthScoreEngine, HealthScoreInputs,
    RecommendationPolicy, RecurringPenaltyPolicy, ScoringScale, WeightTable,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Weigh collection speed less and overdue amounts more
    let cashflow = WeightTable::from_entries(&[
        (Component::CollectionSpeed, Family::Fixed, 10.0),
        (Component::OverdueVolume, Family::Fixed, 5.0),
        (Component::OverdueAmount, Family::Fixed, 10.0),
    ]);

    let config = EngineConfig::builder()
        .weight_table(Category::Cashflow, cashflow)
        // Stricter backlog scale for a business that invoices weekly
        .scale(
            Component::BillingBacklog,
            ScoringScale::at_most(&[(500.0, 1.0), (1500.0, 0.6), (3000.0, 0.3)], 0.0),
        )
        .recurring_penalty(RecurringPenaltyPolicy {
            high_count: 3,
            moderate_count: 2,
            ..Default::default()
        })
        .recommendations(RecommendationPolicy {
            max_per_category: 3,
            ..Default::default()
        })
        .build();

    // Tables are validated when the engine is created
    let engine = HealthScoreEngine::new(config)?;

    let inputs = match std::env::args().nth(1) {
        Some(path) => HealthScoreInputs::from_path(&path)?,
        None => HealthScoreInputs::default(),
    };
    let result = engine.evaluate(&inputs);

    println!("=== Custom Scoring Results ===");
    println!("Total: {:.1}/100 ({})", result.scores.total, result.scores.status);

    for (category, recs) in result.recommendations.iter() {
        if recs.is_empty() {
            continue;
        }
        println!("\n{}:", category.label());
        for rec in recs {
            println!("  [{}] {} (+{:.1} pts)", rec.priority, rec.title, rec.impact);
            for action in &rec.action_items {
                println!("      {}", action);
            }
        }
    }

    // Print the effective configuration as TOML
    println!("\n{}", toml::to_string_pretty(engine.config())?);

    Ok(())
}
