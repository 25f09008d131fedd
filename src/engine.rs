//! Health score orchestration

use tracing::{debug, info};

use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::explain::explain;
use crate::recommend::{insights, recommendations};
use crate::redistribution::{self, RedistributionPlan};
use crate::scale::round1;
use crate::scoring::cashflow::{self, CashflowView};
use crate::scoring::determine_status;
use crate::scoring::efficiency::{self, EfficiencyView};
use crate::scoring::profit::{self, ProfitView};
use crate::scoring::risk::{self, RiskView};
use crate::types::{
    Category, HealthScoreInputs, HealthScoreResult, PerCategory, ProfitTargets, Scores,
};

/// Stateless scoring engine; tables are injected through [`EngineConfig`]
#[derive(Debug, Clone, Default)]
pub struct HealthScoreEngine {
    config: EngineConfig,
}

impl HealthScoreEngine {
    /// Create an engine after validating `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify the account and choose per-subcomponent ceilings
    pub fn plan(&self, targets: &ProfitTargets) -> RedistributionPlan {
        redistribution::plan(
            classify(targets),
            &self.config.weights,
            self.config.category_ceiling,
        )
    }

    /// Score a snapshot. Total over every input; the same snapshot always
    /// produces the same result.
    pub fn evaluate(&self, inputs: &HealthScoreInputs) -> HealthScoreResult {
        let config = &self.config;
        let plan = self.plan(&inputs.profit_targets);
        debug!("Classified business model as {}", plan.business_model);

        let breakdown = PerCategory {
            profit: profit::score(&ProfitView::from_inputs(inputs), &plan, config),
            cashflow: cashflow::score(&CashflowView::from_inputs(inputs), &plan, config),
            efficiency: efficiency::score(&EfficiencyView::from_inputs(inputs), &plan, config),
            risk: risk::score(&RiskView::from_inputs(inputs), &plan, config),
        };

        let total = breakdown.profit.score
            + breakdown.cashflow.score
            + breakdown.efficiency.score
            + breakdown.risk.score;
        let scores = Scores {
            profit: breakdown.profit.score,
            cashflow: breakdown.cashflow.score,
            efficiency: breakdown.efficiency.score,
            risk: breakdown.risk.score,
            total,
            total_rounded: total.round().clamp(0.0, 100.0) as u8,
            status: determine_status(total),
        };

        let explanations = PerCategory::from_fn(|c| explain(breakdown.get(c)));
        let recommendations =
            PerCategory::from_fn(|c| recommendations(breakdown.get(c), &config.recommendations));
        let insights = insights(&scores, &breakdown, &recommendations);

        info!(
            "Health score {:.1}/100 ({}): profit {:.1}, cash flow {:.1}, efficiency {:.1}, risk {:.1}",
            round1(total),
            scores.status,
            scores.profit,
            scores.cashflow,
            scores.efficiency,
            scores.risk
        );

        HealthScoreResult {
            scores,
            breakdown,
            explanations,
            recommendations,
            insights,
        }
    }

    /// Score of a single category, for callers that only need one
    pub fn category_score(&self, inputs: &HealthScoreInputs, category: Category) -> f64 {
        self.evaluate(inputs).scores.category(category)
    }
}

/// Score a snapshot with the default tables
pub fn evaluate(inputs: &HealthScoreInputs) -> HealthScoreResult {
    HealthScoreEngine::default().evaluate(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightTable;
    use crate::types::{Component, Family, HealthStatus};

    #[test]
    fn test_all_zero_snapshot_is_total() {
        let result = evaluate(&HealthScoreInputs::default());
        for (_, b) in result.breakdown.iter() {
            assert!(b.score >= 0.0 && b.score <= 25.0);
        }
        assert_eq!(result.scores.profit, 0.0);
        // clean books: no overdue invoices and no backlog
        assert_eq!(result.scores.cashflow, 25.0);
        assert!(
            (result.scores.total
                - (result.scores.profit
                    + result.scores.cashflow
                    + result.scores.efficiency
                    + result.scores.risk))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig::builder().category_ceiling(0.0).build();
        assert!(HealthScoreEngine::new(config).is_err());
    }

    #[test]
    fn test_injected_tables_change_scoring() {
        let table = WeightTable::from_entries(&[(Component::HoursProgress, Family::Fixed, 25.0)]);
        let config = EngineConfig::builder()
            .weight_table(Category::Efficiency, table)
            .build();
        let engine = HealthScoreEngine::new(config).unwrap();

        let mut inputs = HealthScoreInputs::default();
        inputs.time_stats.this_month.hours = 100.0;
        inputs.mtd_calculations.mtd_hours_target = 100.0;
        let result = engine.evaluate(&inputs);
        assert_eq!(result.scores.efficiency, 25.0);
        assert_eq!(result.breakdown.efficiency.components.len(), 1);
    }

    #[test]
    fn test_status_follows_total() {
        let result = evaluate(&HealthScoreInputs::default());
        let expected = determine_status(result.scores.total);
        assert_eq!(result.scores.status, expected);
        assert_ne!(result.scores.status, HealthStatus::Excellent);
    }
}
