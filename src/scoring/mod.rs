//! Category scorers
//!
//! Each scorer receives a narrowed view of the snapshot built by its own
//! `View::from_inputs`, so a scorer cannot read another category's fields.

pub mod cashflow;
pub mod efficiency;
pub mod penalty;
pub mod profit;
pub mod risk;

use crate::metrics;
use crate::redistribution::PlannedComponent;
use crate::scale::{round1, ScoringScale};
use crate::types::{Category, CategoryBreakdown, ComponentScore, HealthStatus};

/// Determine health status from the total score
pub fn determine_status(total: f64) -> HealthStatus {
    if total >= 85.0 {
        HealthStatus::Excellent
    } else if total >= 70.0 {
        HealthStatus::Good
    } else if total >= 50.0 {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// What a scorer measured for one subcomponent
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Value fed into the scale
    pub value: f64,
    pub display: String,
    pub target: Option<f64>,
    pub formula: String,
    /// Fraction awarded instead of the scale when there is no data to measure
    pub neutral: Option<f64>,
}

impl Measurement {
    pub fn new(value: f64, display: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            value,
            display: display.into(),
            target: None,
            formula: formula.into(),
            neutral: None,
        }
    }

    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn neutral(mut self, fraction: f64) -> Self {
        self.neutral = Some(fraction);
        self
    }
}

/// Score one subcomponent against its planned ceiling
pub fn score_component(
    planned: &PlannedComponent,
    scale: &ScoringScale,
    measurement: Measurement,
) -> ComponentScore {
    let definition = metrics::definition(planned.component);
    let ceiling = planned.ceiling.max(0.0);
    let points = if !planned.active || ceiling <= 0.0 {
        0.0
    } else {
        match measurement.neutral {
            Some(fraction) => round1(fraction.clamp(0.0, 1.0) * ceiling),
            None => scale.points(measurement.value, ceiling),
        }
    };
    let raw_value = if measurement.value.is_finite() {
        measurement.value
    } else {
        0.0
    };

    ComponentScore {
        component: planned.component,
        name: definition.name.to_string(),
        family: planned.family,
        enabled: planned.active,
        raw_value,
        display_value: measurement.display,
        target: measurement.target,
        points,
        ceiling,
        percentage_of_ceiling: round1(ratio(points, ceiling) * 100.0),
        formula: measurement.formula,
        benchmark: scale.describe(ceiling, definition.unit),
    }
}

/// Assemble a breakdown; the score is clamped to `[0, ceiling]`
pub fn breakdown(
    category: Category,
    ceiling: f64,
    components: Vec<ComponentScore>,
    penalties: f64,
) -> CategoryBreakdown {
    let base_points = round1(components.iter().map(|c| c.points).sum());
    let score = clamp_score(base_points - penalties, ceiling);
    CategoryBreakdown {
        category,
        score,
        ceiling,
        available: true,
        base_points,
        penalties,
        components,
        redistribution: None,
        recurring_expense_penalty: None,
        weak_drivers: Vec::new(),
        notes: Vec::new(),
    }
}

/// Final clamp applied to every category score
pub fn clamp_score(score: f64, ceiling: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    round1(score).clamp(0.0, ceiling.max(0.0))
}

pub(crate) fn format_amount(value: f64) -> String {
    format!("€{:.0}", value)
}

pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, Family};

    fn planned(ceiling: f64, active: bool) -> PlannedComponent {
        PlannedComponent {
            component: Component::HoursProgress,
            family: Family::Fixed,
            base_ceiling: ceiling,
            ceiling: if active { ceiling } else { 0.0 },
            active,
        }
    }

    #[test]
    fn test_determine_status() {
        assert_eq!(determine_status(90.0), HealthStatus::Excellent);
        assert_eq!(determine_status(85.0), HealthStatus::Excellent);
        assert_eq!(determine_status(75.0), HealthStatus::Good);
        assert_eq!(determine_status(50.0), HealthStatus::Warning);
        assert_eq!(determine_status(49.9), HealthStatus::Critical);
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(10.0, 0.0), 0.0);
        assert_eq!(ratio(10.0, -5.0), 0.0);
        assert_eq!(ratio(f64::NAN, 2.0), 0.0);
        assert_eq!(ratio(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_inactive_component_scores_zero() {
        let scale = ScoringScale::attainment();
        let score = score_component(
            &planned(6.0, false),
            &scale,
            Measurement::new(1.5, "150%", "x / y"),
        );
        assert_eq!(score.points, 0.0);
        assert!(!score.enabled);
    }

    #[test]
    fn test_named_breakpoints_on_six_point_ceiling() {
        let scale = ScoringScale::attainment();
        let at = |value: f64| {
            score_component(&planned(6.0, true), &scale, Measurement::new(value, "", "")).points
        };
        assert_eq!(at(0.9), 5.4);
        assert_eq!(at(0.8), 4.8);
        assert_eq!(at(1.0), 6.0);
    }

    #[test]
    fn test_neutral_fraction() {
        let scale = ScoringScale::attainment();
        let score = score_component(
            &planned(5.0, true),
            &scale,
            Measurement::new(0.0, "no data", "").neutral(0.5),
        );
        assert_eq!(score.points, 2.5);
        assert_eq!(score.percentage_of_ceiling, 50.0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-3.0, 25.0), 0.0);
        assert_eq!(clamp_score(30.0, 25.0), 25.0);
        assert_eq!(clamp_score(f64::NAN, 25.0), 0.0);
    }
}
