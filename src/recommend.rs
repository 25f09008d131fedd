//! Recommendations and cross-category insights

use crate::config::RecommendationPolicy;
use crate::metrics::{self, RecommendationTemplate};
use crate::scale::round1;
use crate::scoring::{determine_status, format_amount, ratio};
use crate::types::{
    Category, CategoryBreakdown, ComponentScore, Effort, HealthRecommendation, Insights,
    Milestone, PenaltySeverity, PerCategory, Priority, RecommendationMetrics, Scores, Timeframe,
};

/// Total-score levels the insights steer toward
pub const MILESTONES: [f64; 3] = [50.0, 70.0, 85.0];

/// Priority for a subcomponent at `fraction` of its ceiling
pub fn priority_for(fraction: f64, policy: &RecommendationPolicy) -> Priority {
    if fraction < policy.high_below {
        Priority::High
    } else if fraction < policy.medium_below {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn from_template(
    template: &RecommendationTemplate,
    category: Category,
    priority: Priority,
    impact: f64,
    description: String,
    metrics: RecommendationMetrics,
) -> HealthRecommendation {
    HealthRecommendation {
        id: template.id.to_string(),
        category,
        component: None,
        priority,
        impact,
        effort: template.effort,
        timeframe: template.timeframe,
        title: template.title.to_string(),
        description,
        action_items: template.actions.iter().map(|a| a.to_string()).collect(),
        metrics,
    }
}

fn for_component(
    category: Category,
    c: &ComponentScore,
    policy: &RecommendationPolicy,
) -> HealthRecommendation {
    let definition = metrics::definition(c.component);
    let fraction = ratio(c.points, c.ceiling);
    let impact = round1(c.ceiling - c.points);
    let mut rec = from_template(
        &definition.recommendation,
        category,
        priority_for(fraction, policy),
        impact,
        format!(
            "{} is at {:.0}% of its {:.1} points ({}).",
            definition.name,
            fraction * 100.0,
            c.ceiling,
            c.display_value
        ),
        RecommendationMetrics {
            current: c.display_value.clone(),
            target: format!("{:.1}/{:.1} pts", c.ceiling, c.ceiling),
            points_to_gain: impact,
        },
    );
    rec.component = Some(c.component);
    rec
}

/// Ordered recommendations for one category
pub fn recommendations(
    breakdown: &CategoryBreakdown,
    policy: &RecommendationPolicy,
) -> Vec<HealthRecommendation> {
    let category = breakdown.category;
    let mut recs: Vec<HealthRecommendation> = Vec::new();

    if !breakdown.available {
        recs.push(from_template(
            &metrics::PROFIT_SETUP,
            category,
            Priority::High,
            breakdown.ceiling,
            "Profit health cannot be scored until targets are configured.".to_string(),
            RecommendationMetrics {
                current: "not configured".to_string(),
                target: "targets configured".to_string(),
                points_to_gain: breakdown.ceiling,
            },
        ));
        return recs;
    }

    recs.extend(
        breakdown
            .components
            .iter()
            .filter(|c| c.enabled && c.ceiling > 0.0 && c.points < c.ceiling)
            .map(|c| for_component(category, c, policy)),
    );

    if let Some(penalty) = breakdown
        .recurring_expense_penalty
        .as_ref()
        .filter(|p| p.penalty_points > 0.0)
    {
        let priority = match penalty.severity {
            PenaltySeverity::High => Priority::High,
            _ => Priority::Medium,
        };
        recs.push(from_template(
            &metrics::RECURRING_EXPENSES,
            category,
            priority,
            round1(penalty.penalty_points),
            format!(
                "{} recurring expense occurrences ({}) have not been recorded.",
                penalty.total_count,
                format_amount(penalty.total_amount)
            ),
            RecommendationMetrics {
                current: format!("{} occurrences due", penalty.total_count),
                target: "0 occurrences due".to_string(),
                points_to_gain: round1(penalty.penalty_points),
            },
        ));
    }

    recs.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));
    recs.truncate(policy.max_per_category);
    recs
}

fn sort_key(rec: &HealthRecommendation) -> f64 {
    rec.priority.weight() * 10.0 + rec.impact
}

/// Cross-category observations
pub fn insights(
    scores: &Scores,
    breakdown: &PerCategory<CategoryBreakdown>,
    recommendations: &PerCategory<Vec<HealthRecommendation>>,
) -> Insights {
    let all: Vec<&HealthRecommendation> = recommendations
        .iter()
        .flat_map(|(_, recs)| recs.iter())
        .collect();

    let mut high: Vec<&HealthRecommendation> = all
        .iter()
        .copied()
        .filter(|r| r.priority == Priority::High)
        .collect();
    high.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    let top_priorities = high.iter().take(3).map(|r| r.title.clone()).collect();

    let quick_wins = all
        .iter()
        .filter(|r| r.effort == Effort::Low && r.impact >= 3.0)
        .map(|r| r.title.clone())
        .collect();

    let long_term_goals = all
        .iter()
        .filter(|r| r.timeframe == Timeframe::Monthly)
        .map(|r| r.title.clone())
        .collect();

    let share = |c: Category| {
        let b = breakdown.get(c);
        ratio(b.score, b.ceiling)
    };
    let mut strongest = Category::Profit;
    let mut weakest = Category::Profit;
    for category in Category::ALL {
        if share(category) > share(strongest) {
            strongest = category;
        }
        if share(category) < share(weakest) {
            weakest = category;
        }
    }

    Insights {
        top_priorities,
        quick_wins,
        long_term_goals,
        strongest_category: strongest,
        weakest_category: weakest,
        status: scores.status,
        next_milestone: next_milestone(scores.total),
    }
}

/// The next total-score level above `total`, if any
pub fn next_milestone(total: f64) -> Option<Milestone> {
    let mut previous = 0.0;
    for target in MILESTONES {
        if total < target {
            return Some(Milestone {
                target,
                points_needed: round1(target - total),
                progress: round1(
                    (ratio(total - previous, target - previous) * 100.0).clamp(0.0, 100.0),
                ),
                status: determine_status(target),
            });
        }
        previous = target;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redistribution::PlannedComponent;
    use crate::scale::ScoringScale;
    use crate::scoring::{breakdown, score_component, Measurement};
    use crate::types::{Component, Family, HealthStatus};

    fn component(component: Component, ceiling: f64, value: f64) -> ComponentScore {
        score_component(
            &PlannedComponent {
                component,
                family: Family::Fixed,
                base_ceiling: ceiling,
                ceiling,
                active: true,
            },
            &ScoringScale::attainment(),
            Measurement::new(value, format!("{:.0}%", value * 100.0), ""),
        )
    }

    #[test]
    fn test_priority_thresholds() {
        let policy = RecommendationPolicy::default();
        assert_eq!(priority_for(0.5, &policy), Priority::High);
        assert_eq!(priority_for(0.8, &policy), Priority::Medium);
        assert_eq!(priority_for(0.9, &policy), Priority::Low);
    }

    #[test]
    fn test_weak_component_yields_high_priority_first() {
        let b = breakdown(
            Category::Efficiency,
            25.0,
            vec![
                component(Component::HoursProgress, 10.0, 0.3),
                component(Component::BillingConversion, 8.0, 0.9),
                component(Component::DailyRhythm, 7.0, 1.0),
            ],
            0.0,
        );
        let recs = recommendations(&b, &RecommendationPolicy::default());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[0].component, Some(Component::HoursProgress));
        assert_eq!(recs[0].impact, 10.0);
        assert_eq!(recs[1].priority, Priority::Low);
    }

    #[test]
    fn test_list_is_capped() {
        let b = breakdown(
            Category::Risk,
            25.0,
            vec![
                component(Component::ClientConcentration, 8.0, 0.0),
                component(Component::RevenueStability, 3.0, 0.0),
                component(Component::ClientConcentrationTrend, 2.0, 0.0),
                component(Component::ConsistencyTrend, 2.0, 0.0),
                component(Component::BillingBacklog, 5.0, 0.0),
                component(Component::PaymentExposure, 2.0, 0.0),
                component(Component::WorkConsistency, 3.0, 0.0),
            ],
            0.0,
        );
        let policy = RecommendationPolicy {
            max_per_category: 3,
            ..Default::default()
        };
        let recs = recommendations(&b, &policy);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].component, Some(Component::ClientConcentration));
    }

    #[test]
    fn test_next_milestone() {
        let m = next_milestone(60.0).unwrap();
        assert_eq!(m.target, 70.0);
        assert_eq!(m.points_needed, 10.0);
        assert_eq!(m.progress, 50.0);
        assert_eq!(m.status, HealthStatus::Good);
        assert!(next_milestone(90.0).is_none());
        assert_eq!(next_milestone(0.0).unwrap().target, 50.0);
    }
}
