//! Efficiency scoring
//!
//! Reads time-tracking fields only: this month's hours, unbilled hours, the
//! month-to-date hours target and the working schedule. Schedule-aware
//! targets come from the calendar module.

use chrono::NaiveDate;
use tracing::debug;

use super::{breakdown, format_percent, ratio, score_component, Measurement};
use crate::calendar;
use crate::config::EngineConfig;
use crate::redistribution::RedistributionPlan;
use crate::types::{Category, CategoryBreakdown, Component, HealthScoreInputs, TimeEntry};

/// Month length assumed when the snapshot carries neither a date nor a month length
const FALLBACK_DAYS_IN_MONTH: u32 = 30;

/// The slice of the snapshot efficiency may read
#[derive(Debug, Clone, Copy)]
pub struct EfficiencyView<'a> {
    pub hours: f64,
    pub distinct_working_days: Option<u32>,
    pub unbilled_hours: f64,
    pub mtd_hours_target: f64,
    pub month_progress: f64,
    pub current_day: u32,
    pub days_in_month: u32,
    pub monthly_hours_target: f64,
    pub working_weekdays: &'a [u32],
    pub as_of: Option<NaiveDate>,
    pub time_entries: &'a [TimeEntry],
}

impl<'a> EfficiencyView<'a> {
    pub fn from_inputs(inputs: &'a HealthScoreInputs) -> Self {
        let this_month = &inputs.time_stats.this_month;
        let mtd = &inputs.mtd_calculations;
        Self {
            hours: this_month.hours,
            distinct_working_days: this_month.distinct_working_days,
            unbilled_hours: inputs.time_stats.unbilled.hours,
            mtd_hours_target: mtd.mtd_hours_target,
            month_progress: mtd.month_progress,
            current_day: mtd.current_day,
            days_in_month: mtd.days_in_month,
            monthly_hours_target: inputs.profit_targets.monthly_hours_target,
            working_weekdays: &inputs.profit_targets.target_working_days_per_week,
            as_of: inputs.as_of,
            time_entries: &inputs.time_entries,
        }
    }

    fn weekdays(&self) -> Vec<u32> {
        calendar::normalize_weekdays(self.working_weekdays)
    }

    fn days_in_month(&self) -> u32 {
        match self.as_of {
            Some(date) => calendar::days_in_month(date),
            None if self.days_in_month > 0 => self.days_in_month,
            None => FALLBACK_DAYS_IN_MONTH,
        }
    }

    /// Month-to-date hours target, derived from the schedule when not supplied
    pub fn mtd_target(&self) -> f64 {
        if self.mtd_hours_target > 0.0 {
            return self.mtd_hours_target;
        }
        let weekdays = self.weekdays();
        match self.as_of {
            Some(date) => {
                let daily = calendar::daily_hours_target(
                    self.monthly_hours_target,
                    &weekdays,
                    Some(date),
                    self.days_in_month(),
                );
                daily * calendar::elapsed_working_days(date, &weekdays) as f64
            }
            None => self.monthly_hours_target * self.month_progress.clamp(0.0, 1.0),
        }
    }

    /// Target hours per scheduled working day
    pub fn daily_target(&self) -> f64 {
        calendar::daily_hours_target(
            self.monthly_hours_target,
            &self.weekdays(),
            self.as_of,
            self.days_in_month(),
        )
    }

    /// Actual hours per worked day and how it was derived
    pub fn daily_average(&self) -> (f64, &'static str) {
        if let (Some(as_of), false) = (self.as_of, self.time_entries.is_empty()) {
            let start = calendar::start_of_month(as_of);
            let until = calendar::yesterday(as_of);
            let hours = calendar::hours_in_range(self.time_entries, start, until);
            let days = calendar::actual_working_days(self.time_entries, start, until);
            return (ratio(hours, days as f64), "hours through yesterday / days worked");
        }
        if let Some(days) = self.distinct_working_days.filter(|d| *d > 0) {
            return (ratio(self.hours, days as f64), "hours this month / days worked");
        }
        let weekdays = self.weekdays();
        let expected_days = match self.as_of {
            Some(date) => calendar::elapsed_working_days(date, &weekdays) as f64,
            None => {
                self.current_day.saturating_sub(1) as f64 * weekdays.len() as f64 / 7.0
            }
        };
        (
            ratio(self.hours, expected_days),
            "hours this month / scheduled days elapsed",
        )
    }
}

/// Score the efficiency category
pub fn score(
    view: &EfficiencyView<'_>,
    plan: &RedistributionPlan,
    config: &EngineConfig,
) -> CategoryBreakdown {
    let mtd_target = view.mtd_target();
    let daily_target = view.daily_target();
    let (daily_average, daily_source) = view.daily_average();
    let billed_hours = (view.hours - view.unbilled_hours).max(0.0);
    let billed_share = ratio(billed_hours, view.hours).min(1.0);

    let components: Vec<_> = plan
        .category(Category::Efficiency)
        .components
        .iter()
        .map(|planned| {
            let measurement = match planned.component {
                Component::HoursProgress => Measurement::new(
                    ratio(view.hours, mtd_target),
                    format!("{:.1}h of {:.1}h MTD target", view.hours, mtd_target),
                    format!("{:.1}h / {:.1}h", view.hours, mtd_target),
                )
                .target(mtd_target),
                Component::BillingConversion => Measurement::new(
                    billed_share,
                    format!("{} of hours billed", format_percent(billed_share)),
                    format!(
                        "({:.1}h - {:.1}h unbilled) / {:.1}h",
                        view.hours, view.unbilled_hours, view.hours
                    ),
                )
                .target(1.0),
                Component::DailyRhythm => Measurement::new(
                    ratio(daily_average, daily_target),
                    format!("{:.1}h/day vs {:.1}h/day target", daily_average, daily_target),
                    daily_source,
                )
                .target(daily_target),
                other => {
                    Measurement::new(0.0, "n/a", format!("{} is not an efficiency driver", other))
                }
            };
            score_component(planned, &config.scales.scale_for(planned.component), measurement)
        })
        .collect();

    let mut result = breakdown(Category::Efficiency, config.category_ceiling, components, 0.0);
    if view.as_of.is_none() {
        result
            .notes
            .push("No reference date; working days approximated from the month length".to_string());
    }
    debug!(
        "Efficiency score {:.1} (MTD target {:.1}h, daily target {:.2}h)",
        result.score, mtd_target, daily_target
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redistribution;
    use crate::types::BusinessModel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs() -> HealthScoreInputs {
        let mut inputs = HealthScoreInputs::default();
        inputs.time_stats.this_month.hours = 120.0;
        inputs.time_stats.this_month.distinct_working_days = Some(20);
        inputs.time_stats.unbilled.hours = 0.0;
        inputs.mtd_calculations.mtd_hours_target = 120.0;
        inputs.mtd_calculations.days_in_month = 28;
        inputs.profit_targets.monthly_hours_target = 120.0;
        inputs
    }

    fn run(inputs: &HealthScoreInputs) -> CategoryBreakdown {
        let config = EngineConfig::default();
        let plan = redistribution::plan(BusinessModel::TimeOnly, &config.weights, 25.0);
        score(&EfficiencyView::from_inputs(inputs), &plan, &config)
    }

    #[test]
    fn test_on_target_month_scores_full() {
        // 28 days × 5/7 = 20 working days -> 6h/day target, 120h / 20 days = 6h/day
        let result = run(&inputs());
        assert_eq!(result.score, 25.0);
    }

    #[test]
    fn test_unbilled_hours_reduce_conversion() {
        let mut inputs = inputs();
        inputs.time_stats.unbilled.hours = 60.0;
        let result = run(&inputs);
        let conversion = result.component(Component::BillingConversion).unwrap();
        assert_eq!(conversion.points, 4.0);
    }

    #[test]
    fn test_zero_hours_never_divides_by_zero() {
        let result = run(&HealthScoreInputs::default());
        assert_eq!(result.score, 0.0);
        assert!(result.components.iter().all(|c| c.raw_value.is_finite()));
    }

    #[test]
    fn test_entries_drive_daily_average() {
        let mut inputs = inputs();
        inputs.as_of = Some(date(2025, 9, 9));
        inputs.profit_targets.target_working_days_per_week = vec![1, 2, 3, 4];
        inputs.profit_targets.monthly_hours_target = 108.0; // 18 days -> 6h/day
        inputs.time_entries = vec![
            TimeEntry::on(date(2025, 8, 29), 9.0),
            TimeEntry::on(date(2025, 9, 1), 6.0),
            TimeEntry::on(date(2025, 9, 2), 6.0),
            TimeEntry::on(date(2025, 9, 8), 6.0),
            TimeEntry::on(date(2025, 9, 9), 8.0),
        ];
        let view = EfficiencyView::from_inputs(&inputs);
        let (average, _) = view.daily_average();
        assert!((average - 6.0).abs() < 1e-9);
        assert!((view.daily_target() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_weekdays_do_not_inflate_schedule() {
        let mut inputs = inputs();
        inputs.profit_targets.target_working_days_per_week = vec![1, 1, 2, 3, 4, 5, 5];
        let view = EfficiencyView::from_inputs(&inputs);
        assert!((view.daily_target() - 6.0).abs() < 1e-9);
        assert_eq!(run(&inputs).score, 25.0);
    }

    #[test]
    fn test_mtd_target_derived_from_schedule() {
        let mut inputs = inputs();
        inputs.mtd_calculations.mtd_hours_target = 0.0;
        inputs.as_of = Some(date(2025, 9, 9));
        inputs.profit_targets.target_working_days_per_week = vec![1, 2, 3, 4];
        inputs.profit_targets.monthly_hours_target = 108.0;
        let view = EfficiencyView::from_inputs(&inputs);
        // 5 scheduled days elapsed × 6h
        assert!((view.mtd_target() - 30.0).abs() < 1e-9);
    }
}
