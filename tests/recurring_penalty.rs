//! Recurring-expense penalty scenarios through the full engine

use business_health_score::{
    evaluate, DueTemplate, HealthScoreInputs, PenaltyKind, PenaltySeverity, RecurringExpensesDue,
};
use chrono::NaiveDate;

fn template(id: &str, occurrences: u32, amount: f64) -> DueTemplate {
    DueTemplate {
        template_id: id.to_string(),
        template_name: id.replace('-', " "),
        frequency: "monthly".to_string(),
        occurrences_due: occurrences,
        total_amount: amount,
        ..Default::default()
    }
}

fn with_due(total_count: u32, total_amount: f64, templates: Vec<DueTemplate>) -> HealthScoreInputs {
    let mut inputs = HealthScoreInputs::default();
    inputs.dashboard_metrics.recurring_expenses_due = Some(RecurringExpensesDue {
        total_count,
        total_amount,
        templates,
    });
    inputs
}

#[test]
fn test_nothing_due_means_no_penalty() {
    let result = evaluate(&with_due(0, 0.0, Vec::new()));
    let penalty = result
        .breakdown
        .cashflow
        .recurring_expense_penalty
        .as_ref()
        .unwrap();
    assert_eq!(penalty.penalty_points, 0.0);
    assert_eq!(penalty.severity, PenaltySeverity::None);
    assert!(penalty.breakdown.is_none());
    assert_eq!(result.scores.cashflow, 25.0);
}

#[test]
fn test_two_occurrences_cost_two_points() {
    let result = evaluate(&with_due(2, 800.0, vec![template("office-rent", 2, 800.0)]));
    let cashflow = &result.breakdown.cashflow;
    let penalty = cashflow.recurring_expense_penalty.as_ref().unwrap();

    assert_eq!(penalty.penalty_points, 2.0);
    assert_eq!(penalty.severity, PenaltySeverity::Moderate);
    assert_eq!(penalty.contributing_templates, vec!["office-rent".to_string()]);
    let breakdown = penalty.breakdown.as_ref().unwrap();
    assert_eq!(breakdown.kind, PenaltyKind::DueOccurrences);
    assert_eq!(breakdown.total_count, 2);
    assert_eq!(result.scores.cashflow, 23.0);

    let json = serde_json::to_value(penalty).unwrap();
    assert_eq!(json["breakdown"]["type"], "due_occurrences");
    assert_eq!(json["severity"], "moderate");
}

#[test]
fn test_six_occurrences_are_high_severity() {
    let result = evaluate(&with_due(
        6,
        4200.0,
        vec![
            template("office-rent", 3, 3600.0),
            template("software", 3, 600.0),
        ],
    ));
    let penalty = result
        .breakdown
        .cashflow
        .recurring_expense_penalty
        .as_ref()
        .unwrap();

    assert_eq!(penalty.penalty_points, 5.0);
    assert_eq!(penalty.severity, PenaltySeverity::High);
    assert_eq!(penalty.contributing_templates.len(), 2);
    assert_eq!(result.scores.cashflow, 20.0);
}

#[test]
fn test_amount_alone_can_raise_severity() {
    let result = evaluate(&with_due(1, 2600.0, vec![template("insurance", 1, 2600.0)]));
    let penalty = result
        .breakdown
        .cashflow
        .recurring_expense_penalty
        .as_ref()
        .unwrap();
    assert_eq!(penalty.penalty_points, 5.0);
    assert_eq!(penalty.severity, PenaltySeverity::High);
}

#[test]
fn test_occurrence_dates_are_summarised() {
    let date = |d| NaiveDate::from_ymd_opt(2025, 8, d).unwrap();
    let mut rent = template("office-rent", 2, 800.0);
    rent.last_occurrence_date = Some(date(1));
    rent.next_occurrence_date = Some(date(15));
    let mut idle = template("gym", 0, 0.0);
    idle.next_occurrence_date = Some(date(20));

    let result = evaluate(&with_due(2, 800.0, vec![rent, idle]));
    let penalty = result
        .breakdown
        .cashflow
        .recurring_expense_penalty
        .as_ref()
        .unwrap();
    assert_eq!(penalty.contributing_templates, vec!["office-rent".to_string()]);
    let breakdown = penalty.breakdown.as_ref().unwrap();
    assert_eq!(breakdown.oldest_occurrence, Some(date(1)));
    assert_eq!(breakdown.newest_occurrence, Some(date(15)));
}

#[test]
fn test_penalty_is_explained_and_recommended() {
    let result = evaluate(&with_due(2, 800.0, vec![template("office-rent", 2, 800.0)]));
    assert!(result
        .explanations
        .cashflow
        .section("Additional Penalties")
        .is_some());
    assert!(result
        .recommendations
        .cashflow
        .iter()
        .any(|r| r.id == "catch-up-recurring-expenses"));
}
