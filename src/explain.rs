//! Structured per-category explanations

use crate::metrics;
use crate::scale::round1;
use crate::scoring::format_amount;
use crate::types::{
    BusinessModel, Category, CategoryBreakdown, ComponentScore, Emphasis, ExplanationItem,
    ExplanationSection, Family, HealthExplanation, ItemKind, SectionKind,
};

fn title(category: Category) -> &'static str {
    match category {
        Category::Profit => "Profit Health",
        Category::Cashflow => "Cash Flow Health",
        Category::Efficiency => "Efficiency Health",
        Category::Risk => "Risk Management",
    }
}

fn own_inputs(category: Category) -> &'static str {
    match category {
        Category::Profit => "revenue targets, hourly rate and subscription metrics",
        Category::Cashflow => "overdue invoices, payment timing and recurring expenses due",
        Category::Efficiency => "tracked hours, unbilled hours and the working schedule",
        Category::Risk => {
            "billing backlog, payment exposure, revenue and client trends and work patterns"
        }
    }
}

fn independence_note(category: Category) -> String {
    format!(
        "{} is calculated independently from its own inputs only: {}.",
        category.label(),
        own_inputs(category)
    )
}

/// Build the explanation for one category breakdown
pub fn explain(breakdown: &CategoryBreakdown) -> HealthExplanation {
    let category = breakdown.category;
    let mut details = vec![metrics_section(breakdown)];

    if category == Category::Profit {
        details.extend(profit_calculations(breakdown));
    } else {
        details.push(calculation_section(
            "Score Calculation",
            breakdown.components.iter(),
        ));
    }

    if let Some(section) = penalty_section(breakdown) {
        details.push(section);
    }
    details.push(summary_section(breakdown));

    HealthExplanation {
        category,
        title: title(category).to_string(),
        score: breakdown.score,
        max_score: breakdown.ceiling,
        independence_verified: true,
        independence_note: independence_note(category),
        narrative: narrative(breakdown),
        details,
    }
}

fn narrative(b: &CategoryBreakdown) -> String {
    if !b.available {
        return format!(
            "{} is not scored until profit targets are set up. {}",
            b.category.label(),
            independence_note(b.category)
        );
    }

    let pct = round1(b.score / b.ceiling.max(f64::EPSILON) * 100.0);
    let mut text = format!(
        "{} scores {:.1}/{:.0} ({:.0}%).",
        b.category.label(),
        b.score,
        b.ceiling,
        pct
    );

    let enabled: Vec<&ComponentScore> = b.components.iter().filter(|c| c.enabled).collect();
    let best = enabled
        .iter()
        .max_by(|a, c| a.percentage_of_ceiling.total_cmp(&c.percentage_of_ceiling));
    let worst = enabled
        .iter()
        .min_by(|a, c| a.percentage_of_ceiling.total_cmp(&c.percentage_of_ceiling));
    if let (Some(best), Some(worst)) = (best, worst) {
        if best.component != worst.component {
            text.push_str(&format!(
                " Strongest driver: {} ({:.0}%). Weakest driver: {} ({:.0}%).",
                best.name, best.percentage_of_ceiling, worst.name, worst.percentage_of_ceiling
            ));
        }
    }
    if b.penalties > 0.0 {
        text.push_str(&format!(" Penalties deduct {:.1} points.", b.penalties));
    }
    text.push(' ');
    text.push_str(&independence_note(b.category));
    text
}

fn metrics_section(b: &CategoryBreakdown) -> ExplanationSection {
    let items = b
        .components
        .iter()
        .filter(|c| c.enabled)
        .map(|c| ExplanationItem {
            kind: ItemKind::Metric,
            label: Some(c.name.clone()),
            value: Some(c.display_value.clone()),
            description: Some(metrics::definition(c.component).description.to_string()),
            formula: None,
            emphasis: Some(emphasis_for(c)),
        })
        .collect();
    ExplanationSection {
        kind: SectionKind::Metrics,
        title: Some("Key Metrics".to_string()),
        items,
    }
}

fn emphasis_for(c: &ComponentScore) -> Emphasis {
    if c.percentage_of_ceiling < 60.0 {
        Emphasis::Primary
    } else if c.percentage_of_ceiling < 85.0 {
        Emphasis::Secondary
    } else {
        Emphasis::Muted
    }
}

fn calculation_item(c: &ComponentScore) -> ExplanationItem {
    ExplanationItem {
        kind: ItemKind::Calculation,
        label: Some(c.name.clone()),
        value: Some(format!("{:.1}/{:.1} pts", c.points, c.ceiling)),
        description: Some(format!("Scale: {}", c.benchmark)),
        formula: Some(c.formula.clone()),
        emphasis: None,
    }
}

fn calculation_section<'a>(
    title: &str,
    components: impl Iterator<Item = &'a ComponentScore>,
) -> ExplanationSection {
    ExplanationSection {
        kind: SectionKind::Calculations,
        title: Some(title.to_string()),
        items: components.map(calculation_item).collect(),
    }
}

fn profit_calculations(b: &CategoryBreakdown) -> Vec<ExplanationSection> {
    let groups = [
        (Family::Saas, "Subscription Business Drivers"),
        (Family::Time, "Time-Based Revenue Drivers"),
        (Family::Hybrid, "Revenue Mix"),
    ];
    let mut sections: Vec<ExplanationSection> = groups
        .iter()
        .filter_map(|(family, title)| {
            let members: Vec<&ComponentScore> = b
                .components
                .iter()
                .filter(|c| c.family == *family && c.enabled)
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(calculation_section(title, members.into_iter()))
            }
        })
        .collect();

    if let Some(info) = b.redistribution.as_ref().filter(|i| i.points_redistributed) {
        let (inactive, active) = match info.business_model {
            BusinessModel::TimeOnly => ("subscription", "time-based"),
            _ => ("time-based", "subscription"),
        };
        sections.push(ExplanationSection {
            kind: SectionKind::Calculations,
            title: Some("Point Redistribution".to_string()),
            items: vec![ExplanationItem {
                kind: ItemKind::Text,
                label: Some(format!("Business model: {}", info.business_model)),
                value: Some(format!("{:.1} pts redistributed", info.inactive_budget)),
                description: Some(format!(
                    "No {} targets are configured, so those drivers score 0 and their points are spread over the {} drivers.",
                    inactive, active
                )),
                formula: None,
                emphasis: Some(Emphasis::Secondary),
            }],
        });
    }
    sections
}

fn penalty_section(b: &CategoryBreakdown) -> Option<ExplanationSection> {
    let mut items = Vec::new();

    if let Some(penalty) = b
        .recurring_expense_penalty
        .as_ref()
        .filter(|p| p.penalty_points > 0.0)
    {
        let templates = penalty.contributing_templates.len();
        items.push(ExplanationItem {
            kind: ItemKind::Standard,
            label: Some("Recurring expenses due".to_string()),
            value: Some(format!("-{:.1} pts", penalty.penalty_points)),
            description: Some(format!(
                "{} missed occurrences across {} template{} ({}), severity {}",
                penalty.total_count,
                templates,
                if templates == 1 { "" } else { "s" },
                format_amount(penalty.total_amount),
                penalty.severity
            )),
            formula: None,
            emphasis: Some(Emphasis::Primary),
        });
    }

    for component in &b.weak_drivers {
        items.push(ExplanationItem {
            kind: ItemKind::Standard,
            label: Some(format!("Weak driver: {}", metrics::definition(*component).name)),
            value: None,
            description: Some("Below target and low in absolute terms".to_string()),
            formula: None,
            emphasis: Some(Emphasis::Primary),
        });
    }

    if items.is_empty() {
        None
    } else {
        Some(ExplanationSection {
            kind: SectionKind::Calculations,
            title: Some("Additional Penalties".to_string()),
            items,
        })
    }
}

fn summary_section(b: &CategoryBreakdown) -> ExplanationSection {
    let formula = if b.penalties > 0.0 {
        format!(
            "{:.1} - {:.1} penalties = {:.1}/{:.0}",
            b.base_points, b.penalties, b.score, b.ceiling
        )
    } else {
        format!("{:.1}/{:.0}", b.score, b.ceiling)
    };
    let mut items = vec![ExplanationItem {
        kind: ItemKind::Formula,
        label: Some("Total".to_string()),
        value: Some(format!("{:.1}", b.score)),
        description: None,
        formula: Some(formula),
        emphasis: Some(Emphasis::Primary),
    }];
    items.extend(b.notes.iter().map(|note| ExplanationItem {
        kind: ItemKind::Text,
        description: Some(note.clone()),
        emphasis: Some(Emphasis::Muted),
        ..Default::default()
    }));
    ExplanationSection {
        kind: SectionKind::Summary,
        title: Some("Summary".to_string()),
        items,
    }
}
