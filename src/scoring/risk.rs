//! Risk scoring (higher is safer)
//!
//! Reads ready-to-bill and overdue amounts, the rolling revenue trend,
//! client concentration and its trend, and worked days and daily hours in
//! the rolling windows against the schedule. Never reads this month's
//! tracked hours or revenue targets.

use chrono::NaiveDate;
use tracing::debug;

use super::{breakdown, format_amount, ratio, score_component, Measurement};
use crate::calendar::{self, WEEKS_PER_MONTH};
use crate::config::EngineConfig;
use crate::redistribution::RedistributionPlan;
use crate::types::{
    Category, CategoryBreakdown, ClientRevenue, Component, HealthScoreInputs, RevenueWindow,
};

/// Fraction awarded when there is no history to judge a trend
pub const NEUTRAL_FRACTION: f64 = 0.5;

/// Fraction awarded to a short-term trend without a previous window
pub const NO_BASELINE_TREND_FRACTION: f64 = 0.8;

/// Daily hours target assumed when no monthly hours target is set
pub const DEFAULT_DAILY_HOURS: f64 = 8.0;

const FALLBACK_DAYS_IN_MONTH: u32 = 30;

/// The slice of the snapshot risk may read
#[derive(Debug, Clone, Copy)]
pub struct RiskView<'a> {
    pub ready_to_bill: f64,
    pub overdue_amount: f64,
    pub revenue_window: Option<RevenueWindow>,
    pub client_revenue: Option<&'a ClientRevenue>,
    /// Distinct days worked in the current rolling 30-day window
    pub worked_days: Option<u32>,
    /// Average hours per worked day in the current and previous windows
    pub daily_hours: Option<(f64, f64)>,
    pub monthly_hours_target: f64,
    pub working_weekdays: &'a [u32],
    pub as_of: Option<NaiveDate>,
}

impl<'a> RiskView<'a> {
    pub fn from_inputs(inputs: &'a HealthScoreInputs) -> Self {
        let m = &inputs.dashboard_metrics;
        let rolling = inputs.time_stats.rolling_30_days.as_ref();
        Self {
            ready_to_bill: m.ready_to_bill,
            overdue_amount: m.overdue_amount,
            revenue_window: m.rolling_30_days_revenue,
            client_revenue: inputs.client_revenue.as_ref(),
            worked_days: rolling.map(|w| w.current.distinct_working_days),
            daily_hours: rolling.map(|w| (w.current.daily_hours, w.previous.daily_hours)),
            monthly_hours_target: inputs.profit_targets.monthly_hours_target,
            working_weekdays: &inputs.profit_targets.target_working_days_per_week,
            as_of: inputs.as_of,
        }
    }

    fn scheduled_days_per_week(&self) -> f64 {
        calendar::normalize_weekdays(self.working_weekdays).len() as f64
    }

    /// Target hours per scheduled working day
    pub fn daily_target(&self) -> f64 {
        if self.monthly_hours_target <= 0.0 {
            return DEFAULT_DAILY_HOURS;
        }
        let days_in_month = self
            .as_of
            .map(calendar::days_in_month)
            .unwrap_or(FALLBACK_DAYS_IN_MONTH);
        calendar::daily_hours_target(
            self.monthly_hours_target,
            self.working_weekdays,
            self.as_of,
            days_in_month,
        )
    }
}

/// Relative distance of `hours` from `target`
fn deviation(hours: f64, target: f64) -> f64 {
    ratio((hours - target).abs(), target)
}

fn measure(component: Component, view: &RiskView<'_>) -> Measurement {
    match component {
        Component::ClientConcentration => match view.client_revenue {
            Some(clients) => {
                let share = clients.current_top_share();
                let name = clients
                    .top_client
                    .as_ref()
                    .map(|c| c.name.as_str())
                    .unwrap_or("top client");
                Measurement::new(
                    share,
                    format!("{:.0}% from {}", share, name),
                    "top client revenue / total revenue × 100",
                )
                .target(40.0)
            }
            None => Measurement::new(0.0, "no client data", "top client share unavailable")
                .neutral(NEUTRAL_FRACTION),
        },
        Component::RevenueStability => match view.revenue_window {
            Some(window) if window.previous > 0.0 => {
                let trend = ratio(window.current, window.previous);
                Measurement::new(
                    trend,
                    format!("{:+.0}% vs previous 30 days", (trend - 1.0) * 100.0),
                    format!(
                        "{} / {}",
                        format_amount(window.current),
                        format_amount(window.previous)
                    ),
                )
                .target(1.0)
            }
            _ => Measurement::new(0.0, "no baseline", "previous 30-day revenue unavailable")
                .neutral(NEUTRAL_FRACTION),
        },
        Component::ClientConcentrationTrend => {
            match view.client_revenue.and_then(|c| c.top_share_change()) {
                Some(change) => Measurement::new(
                    change,
                    format!("{:+.0} pts top client share vs previous 30 days", change),
                    "current top client share - previous top client share",
                )
                .target(0.0),
                None => {
                    Measurement::new(0.0, "no baseline", "previous top client share unavailable")
                        .neutral(NO_BASELINE_TREND_FRACTION)
                }
            }
        }
        Component::ConsistencyTrend => {
            let target = view.daily_target();
            match view.daily_hours {
                Some((current, previous)) if previous > 0.0 && target > 0.0 => {
                    let change = deviation(current, target) - deviation(previous, target);
                    Measurement::new(
                        change,
                        format!(
                            "{:.1}h/day vs {:.1}h/day before, target {:.1}h",
                            current, previous, target
                        ),
                        format!(
                            "|{:.1} - {:.1}| / {:.1} - |{:.1} - {:.1}| / {:.1}",
                            current, target, target, previous, target, target
                        ),
                    )
                    .target(0.0)
                }
                _ => Measurement::new(0.0, "no baseline", "previous daily hours unavailable")
                    .neutral(NO_BASELINE_TREND_FRACTION),
            }
        }
        Component::BillingBacklog => Measurement::new(
            view.ready_to_bill,
            format!("{} ready to bill", format_amount(view.ready_to_bill)),
            "ready-to-bill amount",
        )
        .target(1000.0),
        Component::PaymentExposure => Measurement::new(
            view.overdue_amount,
            format!("{} at risk", format_amount(view.overdue_amount)),
            "overdue amount",
        )
        .target(0.0),
        Component::WorkConsistency => {
            let scheduled = view.scheduled_days_per_week();
            match view.worked_days {
                Some(days) if days > 0 && scheduled > 0.0 => {
                    let per_week = days as f64 / WEEKS_PER_MONTH;
                    Measurement::new(
                        deviation(per_week, scheduled),
                        format!("{:.1} days/week vs {:.0} scheduled", per_week, scheduled),
                        format!(
                            "|{} / {} - {:.0}| / {:.0}",
                            days, WEEKS_PER_MONTH, scheduled, scheduled
                        ),
                    )
                    .target(0.0)
                }
                _ => Measurement::new(0.0, "no schedule data", "worked days unavailable")
                    .neutral(NEUTRAL_FRACTION),
            }
        }
        other => Measurement::new(0.0, "n/a", format!("{} is not a risk driver", other)),
    }
}

/// Score the risk category
pub fn score(
    view: &RiskView<'_>,
    plan: &RedistributionPlan,
    config: &EngineConfig,
) -> CategoryBreakdown {
    let components: Vec<_> = plan
        .category(Category::Risk)
        .components
        .iter()
        .map(|planned| {
            score_component(
                planned,
                &config.scales.scale_for(planned.component),
                measure(planned.component, view),
            )
        })
        .collect();

    let mut result = breakdown(Category::Risk, config.category_ceiling, components, 0.0);
    for c in &result.components {
        if c.enabled && c.percentage_of_ceiling < 50.0 {
            result.notes.push(format!("{}: {}", c.name, c.display_value));
        }
    }
    debug!("Risk score {:.1} (base {:.1})", result.score, result.base_points);
    result
}
