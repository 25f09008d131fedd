//! Each category reads only its own inputs

use business_health_score::{evaluate, ClientShare, ClientShareWindow, HealthScoreInputs, Scores};

fn baseline() -> HealthScoreInputs {
    HealthScoreInputs::from_json_str(include_str!("fixtures/baseline.json"))
        .expect("baseline fixture parses")
}

fn scores(inputs: &HealthScoreInputs) -> Scores {
    evaluate(inputs).scores
}

#[test]
fn test_registered_revenue_moves_only_profit() {
    let before = baseline();
    let mut after = before.clone();
    after.dashboard_metrics.total_registered *= 1.5;

    let (a, b) = (scores(&before), scores(&after));
    assert_ne!(a.profit, b.profit);
    assert!(b.profit > a.profit);
    assert_eq!(a.efficiency, b.efficiency);
    assert_eq!(a.risk, b.risk);
    assert!((a.cashflow - b.cashflow).abs() < 3.0);
}

#[test]
fn test_overdue_invoices_move_cashflow_and_risk() {
    let before = baseline();
    let mut after = before.clone();
    after.dashboard_metrics.overdue_amount *= 3.0;
    after.dashboard_metrics.overdue_count *= 3;

    let (a, b) = (scores(&before), scores(&after));
    assert!(b.cashflow < a.cashflow);
    assert!(b.risk < a.risk);
    assert_eq!(a.profit, b.profit);
    assert_eq!(a.efficiency, b.efficiency);
}

#[test]
fn test_tracked_hours_move_only_efficiency() {
    let before = baseline();
    let mut after = before.clone();
    after.time_stats.this_month.hours *= 2.0;

    let (a, b) = (scores(&before), scores(&after));
    assert_ne!(a.efficiency, b.efficiency);
    assert_eq!(a.profit, b.profit);
    assert_eq!(a.cashflow, b.cashflow);
    assert_eq!(a.risk, b.risk);
}

#[test]
fn test_ready_to_bill_moves_only_risk() {
    let mut before = baseline();
    before.dashboard_metrics.ready_to_bill = 1000.0;
    let mut after = before.clone();
    after.dashboard_metrics.ready_to_bill = 10000.0;

    let (a, b) = (scores(&before), scores(&after));
    assert!(b.risk < a.risk);
    assert_eq!(a.profit, b.profit);
    assert_eq!(a.cashflow, b.cashflow);
    assert_eq!(a.efficiency, b.efficiency);
}

#[test]
fn test_recurring_expenses_move_only_cashflow() {
    let before = baseline();
    let mut after = before.clone();
    after.dashboard_metrics.recurring_expenses_due =
        Some(business_health_score::RecurringExpensesDue {
            total_count: 4,
            total_amount: 1200.0,
            templates: Vec::new(),
        });

    let (a, b) = (scores(&before), scores(&after));
    assert!((a.cashflow - b.cashflow - 3.5).abs() < 1e-9);
    assert_eq!(a.profit, b.profit);
    assert_eq!(a.efficiency, b.efficiency);
    assert_eq!(a.risk, b.risk);
}

#[test]
fn test_rising_client_concentration_moves_only_risk() {
    let share = |current: f64, previous: f64| ClientShareWindow {
        current: ClientShare {
            top_client_share: current,
            total_revenue: 7600.0,
        },
        previous: ClientShare {
            top_client_share: previous,
            total_revenue: 8000.0,
        },
    };
    let mut before = baseline();
    if let Some(clients) = before.client_revenue.as_mut() {
        clients.rolling_30_days_comparison = Some(share(35.0, 35.0));
    }
    let mut after = before.clone();
    if let Some(clients) = after.client_revenue.as_mut() {
        clients.rolling_30_days_comparison = Some(share(35.0, 5.0));
    }

    let (a, b) = (scores(&before), scores(&after));
    assert!(b.risk < a.risk);
    assert_eq!(a.profit, b.profit);
    assert_eq!(a.cashflow, b.cashflow);
    assert_eq!(a.efficiency, b.efficiency);
}

#[test]
fn test_every_explanation_asserts_independence() {
    let result = evaluate(&baseline());
    for (category, explanation) in result.explanations.iter() {
        assert_eq!(explanation.category, category);
        assert!(explanation.independence_verified);
        assert!(
            explanation.independence_note.contains("independent"),
            "{} note: {}",
            category,
            explanation.independence_note
        );
    }
}
