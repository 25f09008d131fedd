//! Point redistribution between business-model families
//!
//! When a family of subcomponents is inactive for the classified business
//! model, its points are zeroed and the category budget is spread over the
//! remaining model-dependent subcomponents in proportion to their base
//! ceilings. Fixed subcomponents keep their base ceiling.

use tracing::debug;

use crate::classifier::family_active;
use crate::config::{WeightTable, WeightTables};
use crate::scale::round1;
use crate::types::{BusinessModel, Category, Component, Family, PerCategory};

/// Per-category ceilings chosen for one scoring call
#[derive(Debug, Clone, PartialEq)]
pub struct RedistributionPlan {
    pub business_model: BusinessModel,
    pub categories: PerCategory<CategoryPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPlan {
    pub components: Vec<PlannedComponent>,
    pub points_redistributed: bool,
    /// Base points that belonged to inactive subcomponents
    pub inactive_budget: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedComponent {
    pub component: Component,
    pub family: Family,
    pub base_ceiling: f64,
    pub ceiling: f64,
    pub active: bool,
}

impl RedistributionPlan {
    pub fn category(&self, category: Category) -> &CategoryPlan {
        self.categories.get(category)
    }

    /// Planned ceiling for `component`, 0 when absent or inactive
    pub fn ceiling(&self, component: Component) -> f64 {
        self.category(component.category())
            .get(component)
            .map(|p| p.ceiling)
            .unwrap_or(0.0)
    }
}

impl CategoryPlan {
    pub fn get(&self, component: Component) -> Option<&PlannedComponent> {
        self.components.iter().find(|p| p.component == component)
    }

    pub fn total(&self) -> f64 {
        self.components.iter().map(|p| p.ceiling).sum()
    }
}

/// Build the plan for every category
pub fn plan(
    model: BusinessModel,
    tables: &WeightTables,
    category_ceiling: f64,
) -> RedistributionPlan {
    let categories = PerCategory::from_fn(|category| {
        let plan = plan_category(model, tables.get(category), category_ceiling);
        if plan.points_redistributed {
            debug!(
                "Redistributed {:.1} inactive points in {} for {} model",
                plan.inactive_budget, category, model
            );
        }
        plan
    });
    RedistributionPlan {
        business_model: model,
        categories,
    }
}

fn plan_category(model: BusinessModel, table: &WeightTable, category_ceiling: f64) -> CategoryPlan {
    let mut components: Vec<PlannedComponent> = table
        .entries
        .iter()
        .map(|entry| {
            let active = family_active(entry.family, model);
            PlannedComponent {
                component: entry.component,
                family: entry.family,
                base_ceiling: entry.base_ceiling,
                ceiling: if active { entry.base_ceiling } else { 0.0 },
                active,
            }
        })
        .collect();

    let inactive_budget: f64 = components
        .iter()
        .filter(|p| !p.active)
        .map(|p| p.base_ceiling)
        .sum();

    if inactive_budget <= 0.0 {
        return CategoryPlan {
            components,
            points_redistributed: false,
            inactive_budget: 0.0,
        };
    }

    let budget = table.total().min(category_ceiling);
    let fixed_total: f64 = components
        .iter()
        .filter(|p| p.active && p.family == Family::Fixed)
        .map(|p| p.base_ceiling)
        .sum();
    let scalable_base: f64 = components
        .iter()
        .filter(|p| p.active && p.family != Family::Fixed)
        .map(|p| p.base_ceiling)
        .sum();

    // nothing left to scale up; inactive points are simply dropped
    if scalable_base <= 0.0 {
        return CategoryPlan {
            components,
            points_redistributed: false,
            inactive_budget,
        };
    }

    let scalable_budget = (budget - fixed_total).max(0.0);
    let factor = scalable_budget / scalable_base;
    let mut largest: Option<(usize, f64)> = None;
    for (idx, p) in components.iter_mut().enumerate() {
        if p.active && p.family != Family::Fixed {
            p.ceiling = round1(p.base_ceiling * factor);
            if largest.map_or(true, |(_, base)| p.base_ceiling > base) {
                largest = Some((idx, p.base_ceiling));
            }
        }
    }

    // rounding residue goes to the largest active subcomponent
    if let Some((idx, _)) = largest {
        let assigned: f64 = components
            .iter()
            .filter(|p| p.active && p.family != Family::Fixed)
            .map(|p| p.ceiling)
            .sum();
        let residue = scalable_budget - assigned;
        let target = &mut components[idx];
        target.ceiling = round1(target.ceiling + residue).max(0.0);
    }

    CategoryPlan {
        components,
        points_redistributed: true,
        inactive_budget,
    }
}
