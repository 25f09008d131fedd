//! Profit scoring
//!
//! Reads revenue targets, subscription metrics and the rolling 30-day
//! billable window. Never reads overdue amounts, ready-to-bill amounts or
//! this month's tracked hours.

use tracing::debug;

use super::{breakdown, format_amount, format_percent, ratio, score_component, Measurement};
use crate::classifier::ActiveDrivers;
use crate::config::EngineConfig;
use crate::redistribution::RedistributionPlan;
use crate::types::{
    BusinessModel, Category, CategoryBreakdown, Component, HealthScoreInputs, ProfitTargets,
    RedistributionInfo, RollingPeriod, SubscriptionStats,
};

/// Ideal share of subscription revenue in a hybrid business
pub const OPTIMAL_SUBSCRIPTION_SHARE: f64 = 0.3;

/// The slice of the snapshot profit may read
#[derive(Debug, Clone, Copy)]
pub struct ProfitView<'a> {
    pub targets: &'a ProfitTargets,
    pub total_registered: f64,
    pub subscription: Option<&'a SubscriptionStats>,
    pub rolling: Option<&'a RollingPeriod>,
}

impl<'a> ProfitView<'a> {
    pub fn from_inputs(inputs: &'a HealthScoreInputs) -> Self {
        Self {
            targets: &inputs.profit_targets,
            total_registered: inputs.dashboard_metrics.total_registered,
            subscription: inputs.time_stats.subscription.as_ref(),
            rolling: inputs.time_stats.rolling_30_days.as_ref().map(|w| &w.current),
        }
    }
}

/// Derived profit drivers shared by the subcomponents and the penalties
#[derive(Debug, Clone, Copy)]
struct Drivers {
    registered: f64,
    users: f64,
    fee: f64,
    mrr: f64,
    time_revenue: f64,
    billable_hours: f64,
    total_hours: f64,
    unbilled_value: f64,
    effective_rate: f64,
    users_attainment: f64,
    fee_attainment: f64,
    rate_attainment: f64,
    mix_closeness: f64,
}

impl Drivers {
    fn measure(view: &ProfitView<'_>) -> Self {
        let t = view.targets;
        let users = view.subscription.map(|s| s.active_users()).unwrap_or(0.0);
        let fee = view.subscription.map(|s| s.average_fee()).unwrap_or(0.0);
        let mrr = users * fee;
        let (time_revenue, billable_hours, total_hours, unbilled_value) = view
            .rolling
            .map(|r| (r.billable_revenue, r.billable_hours, r.total_hours, r.unbilled_value))
            .unwrap_or_default();
        let effective_rate = ratio(time_revenue, billable_hours);
        let combined = mrr + time_revenue;
        let mix_closeness = if combined > 0.0 {
            (1.0 - (mrr / combined - OPTIMAL_SUBSCRIPTION_SHARE).abs()).max(0.0)
        } else {
            0.0
        };
        Self {
            registered: view.total_registered,
            users,
            fee,
            mrr,
            time_revenue,
            billable_hours,
            total_hours,
            unbilled_value,
            effective_rate,
            users_attainment: ratio(users, t.target_monthly_active_users),
            fee_attainment: ratio(fee, t.target_avg_subscription_fee),
            rate_attainment: ratio(effective_rate, t.target_hourly_rate),
            mix_closeness,
        }
    }

    fn combined_revenue(&self) -> f64 {
        self.mrr + self.time_revenue
    }
}

fn measure(component: Component, d: &Drivers, t: &ProfitTargets) -> Measurement {
    match component {
        Component::SubscriberGrowth => Measurement::new(
            d.users_attainment,
            format!("{:.0} / {:.0} users", d.users, t.target_monthly_active_users),
            format!(
                "{:.0} active users / {:.0} target",
                d.users, t.target_monthly_active_users
            ),
        )
        .target(t.target_monthly_active_users),
        Component::SubscriptionPricing => Measurement::new(
            d.fee_attainment,
            format!(
                "{} / {} per user",
                format_amount(d.fee),
                format_amount(t.target_avg_subscription_fee)
            ),
            format!(
                "{} average fee / {} target",
                format_amount(d.fee),
                format_amount(t.target_avg_subscription_fee)
            ),
        )
        .target(t.target_avg_subscription_fee),
        Component::SubscriptionEffectiveness => Measurement::new(
            ratio(d.mrr, t.monthly_revenue_target),
            format!(
                "MRR {} of {} target",
                format_amount(d.mrr),
                format_amount(t.monthly_revenue_target)
            ),
            format!(
                "({:.0} users × {}) / {}",
                d.users,
                format_amount(d.fee),
                format_amount(t.monthly_revenue_target)
            ),
        )
        .target(t.monthly_revenue_target),
        Component::RevenueMix => Measurement::new(
            d.mix_closeness,
            format!(
                "{} subscription share",
                format_percent(ratio(d.mrr, d.combined_revenue()))
            ),
            format!(
                "1 - |{} / ({} + {}) - 0.30|",
                format_amount(d.mrr),
                format_amount(d.mrr),
                format_amount(d.time_revenue)
            ),
        )
        .target(1.0),
        Component::PricingEfficiency => Measurement::new(
            d.rate_attainment,
            format!(
                "€{:.2}/h vs €{:.0}/h target",
                d.effective_rate, t.target_hourly_rate
            ),
            format!(
                "({} / {:.1}h billable) / €{:.0}/h",
                format_amount(d.time_revenue),
                d.billable_hours,
                t.target_hourly_rate
            ),
        )
        .target(t.target_hourly_rate),
        Component::RateOptimization => Measurement::new(
            ratio(d.registered, t.monthly_revenue_target),
            format!(
                "{} of {} target",
                format_amount(d.registered),
                format_amount(t.monthly_revenue_target)
            ),
            format!(
                "{} registered / {} target",
                format_amount(d.registered),
                format_amount(t.monthly_revenue_target)
            ),
        )
        .target(t.monthly_revenue_target),
        Component::TimeUtilization => {
            let billable_pct = ratio(d.billable_hours, d.total_hours) * 100.0;
            Measurement::new(
                ratio(billable_pct, t.target_billable_ratio),
                format!(
                    "{:.0}% billable vs {:.0}% target",
                    billable_pct, t.target_billable_ratio
                ),
                format!(
                    "({:.1}h / {:.1}h × 100) / {:.0}%",
                    d.billable_hours, d.total_hours, t.target_billable_ratio
                ),
            )
            .target(t.target_billable_ratio)
        }
        Component::RevenueQuality => {
            let invoiced = (d.time_revenue - d.unbilled_value).max(0.0);
            Measurement::new(
                ratio(invoiced, d.time_revenue),
                format!("{} invoiced", format_percent(ratio(invoiced, d.time_revenue))),
                format!(
                    "({} - {} unbilled) / {}",
                    format_amount(d.time_revenue),
                    format_amount(d.unbilled_value),
                    format_amount(d.time_revenue)
                ),
            )
            .target(1.0)
        }
        other => Measurement::new(0.0, "n/a", format!("{} is not a profit driver", other)),
    }
}

/// Score the profit category
pub fn score(
    view: &ProfitView<'_>,
    plan: &RedistributionPlan,
    config: &EngineConfig,
) -> CategoryBreakdown {
    let category_plan = plan.category(Category::Profit);
    let drivers = Drivers::measure(view);
    let t = view.targets;

    let unavailable = if !t.setup_completed {
        Some("Profit targets have not been set up; profit health is not scored")
    } else if !ActiveDrivers::from_targets(t).any() {
        Some(
            "Neither hours and hourly rate nor subscriber and fee targets are configured; \
             profit health is not scored",
        )
    } else {
        None
    };

    if let Some(reason) = unavailable {
        let components = category_plan
            .components
            .iter()
            .map(|planned| {
                let mut disabled = *planned;
                disabled.active = false;
                disabled.ceiling = 0.0;
                score_component(
                    &disabled,
                    &config.scales.scale_for(planned.component),
                    measure(planned.component, &drivers, t),
                )
            })
            .collect();
        let mut result = breakdown(Category::Profit, config.category_ceiling, components, 0.0);
        result.available = false;
        result.score = 0.0;
        result.notes.push(reason.to_string());
        debug!("Profit unavailable: {}", reason);
        return result;
    }

    let components: Vec<_> = category_plan
        .components
        .iter()
        .map(|planned| {
            score_component(
                planned,
                &config.scales.scale_for(planned.component),
                measure(planned.component, &drivers, t),
            )
        })
        .collect();

    let active = |component: Component| {
        category_plan
            .get(component)
            .map(|p| p.active)
            .unwrap_or(false)
    };
    let policy = &config.weak_driver;
    let mut weak_drivers = Vec::new();
    let mut penalties = 0.0;

    if active(Component::SubscriberGrowth)
        && policy
            .active_users
            .is_weak(drivers.users_attainment, drivers.users)
    {
        weak_drivers.push(Component::SubscriberGrowth);
        penalties += policy.penalty_points;
    }
    if active(Component::SubscriptionPricing)
        && policy
            .subscription_fee
            .is_weak(drivers.fee_attainment, drivers.fee)
    {
        weak_drivers.push(Component::SubscriptionPricing);
        penalties += policy.penalty_points;
    }
    if active(Component::PricingEfficiency)
        && policy
            .hourly_rate
            .is_weak(drivers.rate_attainment, drivers.effective_rate)
    {
        weak_drivers.push(Component::PricingEfficiency);
        penalties += policy.penalty_points;
    }
    if active(Component::RevenueMix)
        && drivers.combined_revenue() > 0.0
        && drivers.mix_closeness < policy.mix_closeness_below
    {
        weak_drivers.push(Component::RevenueMix);
        penalties += policy.mix_penalty_points;
    }

    let mut result = breakdown(
        Category::Profit,
        config.category_ceiling,
        components,
        penalties,
    );
    result.redistribution = Some(RedistributionInfo {
        business_model: plan.business_model,
        points_redistributed: category_plan.points_redistributed,
        redistributed_total: result.base_points,
        inactive_budget: category_plan.inactive_budget,
    });
    if category_plan.points_redistributed {
        let (from, to) = match plan.business_model {
            BusinessModel::TimeOnly => ("subscription", "time-based"),
            _ => ("time-based", "subscription"),
        };
        result.notes.push(format!(
            "{:.1} points of inactive {} drivers were redistributed to {} drivers",
            category_plan.inactive_budget, from, to
        ));
    }
    result.weak_drivers = weak_drivers;

    debug!(
        "Profit score {:.1} (base {:.1}, penalties {:.1}, model {})",
        result.score, result.base_points, result.penalties, plan.business_model
    );
    result
}
