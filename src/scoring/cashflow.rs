//! Cash flow scoring
//!
//! Reads overdue invoices, payment terms and recurring expenses that are
//! due. Never reads revenue, hours or ready-to-bill amounts.

use tracing::{debug, warn};

use super::penalty::recurring_expense_penalty;
use super::{breakdown, format_amount, score_component, Measurement};
use crate::config::EngineConfig;
use crate::redistribution::RedistributionPlan;
use crate::scale::round1;
use crate::types::{Category, CategoryBreakdown, Component, HealthScoreInputs, RecurringExpensesDue};

/// Payment terms assumed when none are given
pub const DEFAULT_PAYMENT_TERMS: f64 = 30.0;

/// The slice of the snapshot cash flow may read
#[derive(Debug, Clone, Copy)]
pub struct CashflowView<'a> {
    pub overdue_amount: f64,
    pub overdue_count: u32,
    pub actual_dio: Option<f64>,
    pub average_payment_terms: Option<f64>,
    pub recurring_expenses_due: Option<&'a RecurringExpensesDue>,
}

impl<'a> CashflowView<'a> {
    pub fn from_inputs(inputs: &'a HealthScoreInputs) -> Self {
        let m = &inputs.dashboard_metrics;
        Self {
            overdue_amount: m.overdue_amount,
            overdue_count: m.overdue_count,
            actual_dio: m.actual_dio,
            average_payment_terms: m.average_payment_terms,
            recurring_expenses_due: m.recurring_expenses_due.as_ref(),
        }
    }

    /// Measured days invoice overdue, or an estimate from the overdue totals
    pub fn days_overdue(&self) -> (f64, bool) {
        match self.actual_dio {
            Some(dio) if dio.is_finite() && dio >= 0.0 => (dio, true),
            _ => (estimate_dio(self.overdue_amount, self.overdue_count), false),
        }
    }
}

/// Estimate days invoice overdue from the average overdue amount per invoice.
///
/// Larger average balances tend to be older: up to €500 maps to 15-30 days,
/// up to €1500 to 30-45 days, beyond that 45 days rising to at most 60.
pub fn estimate_dio(overdue_amount: f64, overdue_count: u32) -> f64 {
    if overdue_amount <= 0.0 || overdue_count == 0 || !overdue_amount.is_finite() {
        return 0.0;
    }
    let average = overdue_amount / overdue_count as f64;
    if average <= 500.0 {
        15.0 + (average / 500.0) * 15.0
    } else if average <= 1500.0 {
        30.0 + ((average - 500.0) / 1000.0) * 15.0
    } else {
        (45.0 + ((average - 1500.0) / 1000.0) * 10.0).min(60.0)
    }
}

/// Score the cash flow category
pub fn score(
    view: &CashflowView<'_>,
    plan: &RedistributionPlan,
    config: &EngineConfig,
) -> CategoryBreakdown {
    if view.overdue_count > 0 && view.overdue_amount <= 0.0 {
        warn!("Overdue invoice count is {} but overdue amount is zero", view.overdue_count);
    }
    if view.overdue_amount > 0.0 && view.overdue_count == 0 {
        warn!(
            "Overdue amount is {:.2} but overdue invoice count is zero",
            view.overdue_amount
        );
    }

    let (dio, measured) = view.days_overdue();
    let terms = view
        .average_payment_terms
        .filter(|t| *t > 0.0)
        .unwrap_or(DEFAULT_PAYMENT_TERMS);

    let components: Vec<_> = plan
        .category(Category::Cashflow)
        .components
        .iter()
        .map(|planned| {
            let measurement = match planned.component {
                Component::CollectionSpeed => Measurement::new(
                    dio,
                    format!("{:.0} days overdue", dio),
                    if measured {
                        format!("measured DIO on {:.0}-day payment terms", terms)
                    } else {
                        format!(
                            "estimated from {} over {} overdue invoices",
                            format_amount(view.overdue_amount),
                            view.overdue_count
                        )
                    },
                )
                .target(0.0),
                Component::OverdueVolume => Measurement::new(
                    view.overdue_count as f64,
                    format!("{} overdue invoices", view.overdue_count),
                    "count of invoices past due date",
                )
                .target(0.0),
                Component::OverdueAmount => Measurement::new(
                    view.overdue_amount,
                    format!("{} overdue", format_amount(view.overdue_amount)),
                    "sum of overdue invoice amounts",
                )
                .target(0.0),
                other => {
                    Measurement::new(0.0, "n/a", format!("{} is not a cash flow driver", other))
                }
            };
            score_component(planned, &config.scales.scale_for(planned.component), measurement)
        })
        .collect();

    let penalty = recurring_expense_penalty(view.recurring_expenses_due, &config.recurring_penalty);
    let mut result = breakdown(
        Category::Cashflow,
        config.category_ceiling,
        components,
        round1(penalty.penalty_points),
    );
    if penalty.penalty_points > 0.0 {
        result.notes.push(format!(
            "{} recurring expense occurrences ({}) are past due",
            penalty.total_count,
            format_amount(penalty.total_amount)
        ));
    }
    result.recurring_expense_penalty = Some(penalty);

    debug!(
        "Cash flow score {:.1} (base {:.1}, recurring penalty {:.1}, DIO {:.1})",
        result.score, result.base_points, result.penalties, dio
    );
    result
}
