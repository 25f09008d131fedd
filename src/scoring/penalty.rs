//! Recurring-expense penalty
//!
//! A pure deduction from cash flow, computed from the pre-aggregated summary
//! of recurring-expense occurrences whose scheduled date passed without
//! being recorded.

use crate::config::RecurringPenaltyPolicy;
use crate::types::{
    PenaltyBreakdown, PenaltyKind, PenaltySeverity, RecurringExpensePenalty, RecurringExpensesDue,
};

/// Compute the penalty for a due-occurrences summary
pub fn recurring_expense_penalty(
    due: Option<&RecurringExpensesDue>,
    policy: &RecurringPenaltyPolicy,
) -> RecurringExpensePenalty {
    let due = match due {
        Some(due) if due.total_count > 0 => due,
        _ => return RecurringExpensePenalty::none(),
    };

    let amount = if due.total_amount.is_finite() {
        due.total_amount.max(0.0)
    } else {
        0.0
    };

    let (penalty_points, severity) =
        if due.total_count >= policy.high_count || amount >= policy.high_amount {
            (policy.high_points, PenaltySeverity::High)
        } else if due.total_count >= policy.moderate_count || amount >= policy.moderate_amount {
            (policy.moderate_points, PenaltySeverity::Moderate)
        } else {
            (policy.base_points, PenaltySeverity::Moderate)
        };

    let contributing_templates = due
        .templates
        .iter()
        .filter(|t| t.occurrences_due > 0)
        .map(|t| t.template_id.clone())
        .collect();

    let dates: Vec<_> = due
        .templates
        .iter()
        .filter(|t| t.occurrences_due > 0)
        .flat_map(|t| [t.next_occurrence_date, t.last_occurrence_date])
        .flatten()
        .collect();
    let oldest_occurrence = dates.iter().min().copied();
    let newest_occurrence = dates.iter().max().copied();

    RecurringExpensePenalty {
        penalty_points,
        severity,
        total_count: due.total_count,
        total_amount: amount,
        contributing_templates,
        breakdown: Some(PenaltyBreakdown {
            kind: PenaltyKind::DueOccurrences,
            total_count: due.total_count,
            total_amount: amount,
            templates: due.templates.clone(),
            oldest_occurrence,
            newest_occurrence,
        }),
    }
}
