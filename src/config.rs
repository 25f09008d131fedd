//! Configuration for weight tables, scoring scales and policies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{HealthError, Result};
use crate::scale::ScoringScale;
use crate::types::{Category, Component, Family};

/// Main configuration for the health score engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum points per category
    pub category_ceiling: f64,
    /// Base point ceilings per subcomponent
    pub weights: WeightTables,
    /// Breakpoint scales per subcomponent
    pub scales: ScoringScales,
    /// Thresholds for the recurring-expense penalty
    pub recurring_penalty: RecurringPenaltyPolicy,
    /// Profit penalties for very weak revenue drivers
    pub weak_driver: WeakDriverPolicy,
    /// Priority thresholds and list length for recommendations
    pub recommendations: RecommendationPolicy,
}

/// One weight table per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTables {
    pub profit: WeightTable,
    pub cashflow: WeightTable,
    pub efficiency: WeightTable,
    pub risk: WeightTable,
}

/// Ordered subcomponents of one category with their base ceilings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    pub entries: Vec<WeightEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub component: Component,
    pub family: Family,
    pub base_ceiling: f64,
}

/// Per-component scale overrides on top of the built-in scales.
///
/// Keys are component keys such as `collection_speed`. Components without
/// an entry use their built-in scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringScales {
    pub overrides: BTreeMap<String, ScoringScale>,
}

/// Thresholds for the recurring-expense penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringPenaltyPolicy {
    /// Occurrences at or above which the penalty is high
    pub high_count: u32,
    /// Amount at or above which the penalty is high
    pub high_amount: f64,
    pub high_points: f64,
    pub moderate_count: u32,
    pub moderate_amount: f64,
    pub moderate_points: f64,
    /// Penalty for any smaller backlog
    pub base_points: f64,
}

/// Penalties for revenue drivers that are both below target and low in absolute terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeakDriverPolicy {
    pub penalty_points: f64,
    pub active_users: WeakDriverRule,
    pub subscription_fee: WeakDriverRule,
    pub hourly_rate: WeakDriverRule,
    /// Revenue mix closeness below which a hybrid business is penalized
    pub mix_closeness_below: f64,
    pub mix_penalty_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakDriverRule {
    /// Attainment ratio (actual / target) below which the driver is weak
    pub attainment_below: f64,
    /// Absolute value below which the driver is weak
    pub absolute_below: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    pub max_per_category: usize,
    /// Share of the ceiling below which a recommendation is high priority
    pub high_below: f64,
    /// Share of the ceiling below which a recommendation is medium priority
    pub medium_below: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            category_ceiling: 25.0,
            weights: WeightTables::default(),
            scales: ScoringScales::default(),
            recurring_penalty: RecurringPenaltyPolicy::default(),
            weak_driver: WeakDriverPolicy::default(),
            recommendations: RecommendationPolicy::default(),
        }
    }
}

impl Default for WeightTables {
    fn default() -> Self {
        use Component::*;
        Self {
            profit: WeightTable::from_entries(&[
                (SubscriberGrowth, Family::Saas, 6.0),
                (SubscriptionPricing, Family::Saas, 6.0),
                (SubscriptionEffectiveness, Family::Saas, 3.0),
                (RevenueMix, Family::Hybrid, 3.0),
                (PricingEfficiency, Family::Time, 2.0),
                (RateOptimization, Family::Time, 2.0),
                (TimeUtilization, Family::Time, 2.0),
                (RevenueQuality, Family::Time, 1.0),
            ]),
            cashflow: WeightTable::from_entries(&[
                (CollectionSpeed, Family::Fixed, 15.0),
                (OverdueVolume, Family::Fixed, 5.0),
                (OverdueAmount, Family::Fixed, 5.0),
            ]),
            efficiency: WeightTable::from_entries(&[
                (HoursProgress, Family::Fixed, 10.0),
                (BillingConversion, Family::Fixed, 8.0),
                (DailyRhythm, Family::Fixed, 7.0),
            ]),
            risk: WeightTable::from_entries(&[
                (ClientConcentration, Family::Fixed, 8.0),
                (RevenueStability, Family::Fixed, 3.0),
                (ClientConcentrationTrend, Family::Fixed, 2.0),
                (ConsistencyTrend, Family::Fixed, 2.0),
                (BillingBacklog, Family::Fixed, 5.0),
                (PaymentExposure, Family::Fixed, 2.0),
                (WorkConsistency, Family::Fixed, 3.0),
            ]),
        }
    }
}

impl WeightTables {
    pub fn get(&self, category: Category) -> &WeightTable {
        match category {
            Category::Profit => &self.profit,
            Category::Cashflow => &self.cashflow,
            Category::Efficiency => &self.efficiency,
            Category::Risk => &self.risk,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut WeightTable {
        match category {
            Category::Profit => &mut self.profit,
            Category::Cashflow => &mut self.cashflow,
            Category::Efficiency => &mut self.efficiency,
            Category::Risk => &mut self.risk,
        }
    }
}

impl WeightTable {
    pub fn from_entries(entries: &[(Component, Family, f64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(component, family, base_ceiling)| WeightEntry {
                    component,
                    family,
                    base_ceiling,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.base_ceiling).sum()
    }

    pub fn base_ceiling(&self, component: Component) -> f64 {
        self.entries
            .iter()
            .find(|e| e.component == component)
            .map(|e| e.base_ceiling)
            .unwrap_or(0.0)
    }

    /// Validate membership, uniqueness and the total against `ceiling`
    pub fn validate(&self, category: Category, ceiling: f64) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.component.category() != category {
                return Err(HealthError::config(format!(
                    "{} belongs to {}, not {}",
                    entry.component,
                    entry.component.category(),
                    category
                )));
            }
            if !seen.insert(entry.component) {
                return Err(HealthError::config(format!(
                    "{} appears twice in the {} table",
                    entry.component, category
                )));
            }
            if !entry.base_ceiling.is_finite() || entry.base_ceiling < 0.0 {
                return Err(HealthError::config(format!(
                    "{} has invalid ceiling {}",
                    entry.component, entry.base_ceiling
                )));
            }
        }
        let total = self.total();
        if total > ceiling + 1e-6 {
            return Err(HealthError::InvalidWeights {
                category: category.to_string(),
                total,
                ceiling,
            });
        }
        Ok(())
    }
}

impl ScoringScales {
    /// Scale used for `component`: an override if configured, else the built-in one
    pub fn scale_for(&self, component: Component) -> ScoringScale {
        self.overrides
            .get(component.key())
            .cloned()
            .map(|mut scale| {
                scale.normalize();
                scale
            })
            .unwrap_or_else(|| default_scale(component))
    }

    pub fn validate(&self) -> Result<()> {
        for (key, scale) in &self.overrides {
            if Component::from_key(key).is_none() {
                return Err(HealthError::invalid_scale(key, "unknown component"));
            }
            scale.validate(key)?;
        }
        Ok(())
    }
}

/// Built-in scale for each subcomponent
pub fn default_scale(component: Component) -> ScoringScale {
    use Component::*;
    match component {
        // days invoice overdue
        CollectionSpeed => ScoringScale::at_most(
            &[(0.0, 1.0), (7.0, 0.8), (15.0, 0.5333), (30.0, 0.2)],
            0.0,
        ),
        // overdue invoice count
        OverdueVolume => ScoringScale::at_most(&[(0.0, 1.0), (2.0, 0.6), (4.0, 0.2)], 0.0),
        OverdueAmount => {
            ScoringScale::at_most(&[(0.0, 1.0), (3000.0, 0.6), (6000.0, 0.2)], 0.0)
        }
        // top client share, percent
        ClientConcentration => {
            ScoringScale::at_most(&[(40.0, 1.0), (60.0, 0.67), (80.0, 0.33)], 0.0)
        }
        // current / previous rolling revenue
        RevenueStability => ScoringScale::at_least(&[(1.0, 1.0), (0.9, 0.83), (0.8, 0.5)], 0.0),
        // top client share change, percentage points
        ClientConcentrationTrend => {
            ScoringScale::at_most(&[(0.0, 1.0), (5.0, 0.8), (10.0, 0.5)], 0.0)
        }
        // change in relative deviation from the daily hours target
        ConsistencyTrend => ScoringScale::at_most(&[(0.0, 1.0), (0.1, 0.8), (0.2, 0.5)], 0.0),
        BillingBacklog => ScoringScale::at_most(
            &[(1000.0, 1.0), (3000.0, 0.75), (5000.0, 0.5), (10000.0, 0.25)],
            0.0,
        ),
        PaymentExposure => {
            ScoringScale::at_most(&[(0.0, 1.0), (2500.0, 0.67), (5000.0, 0.33)], 0.0)
        }
        // relative deviation from the target schedule
        WorkConsistency => ScoringScale::at_most(&[(0.1, 1.0), (0.25, 0.67), (0.5, 0.33)], 0.0),
        _ => ScoringScale::attainment(),
    }
}

impl Default for RecurringPenaltyPolicy {
    fn default() -> Self {
        Self {
            high_count: 5,
            high_amount: 2500.0,
            high_points: 5.0,
            moderate_count: 3,
            moderate_amount: 1500.0,
            moderate_points: 3.5,
            base_points: 2.0,
        }
    }
}

impl Default for WeakDriverPolicy {
    fn default() -> Self {
        Self {
            penalty_points: 2.0,
            active_users: WeakDriverRule {
                attainment_below: 0.5,
                absolute_below: 5.0,
            },
            subscription_fee: WeakDriverRule {
                attainment_below: 0.7,
                absolute_below: 20.0,
            },
            hourly_rate: WeakDriverRule {
                attainment_below: 0.7,
                absolute_below: 50.0,
            },
            mix_closeness_below: 0.5,
            mix_penalty_points: 1.0,
        }
    }
}

impl WeakDriverRule {
    pub fn is_weak(&self, attainment: f64, absolute: f64) -> bool {
        attainment < self.attainment_below && absolute < self.absolute_below
    }
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            max_per_category: 5,
            high_below: 0.6,
            medium_below: 0.85,
        }
    }
}

impl EngineConfig {
    /// Create a new builder for EngineConfig
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML or JSON file, chosen by extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            let config: Self = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Check that every table and policy is internally consistent
    pub fn validate(&self) -> Result<()> {
        if !self.category_ceiling.is_finite() || self.category_ceiling <= 0.0 {
            return Err(HealthError::config(format!(
                "category ceiling must be positive, got {}",
                self.category_ceiling
            )));
        }
        for category in Category::ALL {
            self.weights
                .get(category)
                .validate(category, self.category_ceiling)?;
        }
        self.scales.validate()?;

        let rec = &self.recommendations;
        if rec.max_per_category == 0 {
            return Err(HealthError::config(
                "recommendations.max_per_category must be at least 1",
            ));
        }
        if !(0.0 < rec.high_below && rec.high_below <= rec.medium_below && rec.medium_below <= 1.0)
        {
            return Err(HealthError::config(format!(
                "recommendation thresholds must satisfy 0 < high ({}) <= medium ({}) <= 1",
                rec.high_below, rec.medium_below
            )));
        }

        let pen = &self.recurring_penalty;
        let points = [pen.base_points, pen.moderate_points, pen.high_points];
        if points.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(HealthError::config("recurring penalty points must be non-negative"));
        }
        if pen.high_points > self.category_ceiling {
            return Err(HealthError::config(
                "recurring penalty cannot exceed the category ceiling",
            ));
        }
        if self.weak_driver.penalty_points < 0.0 || self.weak_driver.mix_penalty_points < 0.0 {
            return Err(HealthError::config("weak driver penalty must be non-negative"));
        }
        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Default)]
pub struct EngineConfigBuilder {
    category_ceiling: Option<f64>,
    weights: Option<WeightTables>,
    scale_overrides: BTreeMap<String, ScoringScale>,
    recurring_penalty: Option<RecurringPenaltyPolicy>,
    weak_driver: Option<WeakDriverPolicy>,
    recommendations: Option<RecommendationPolicy>,
}

impl EngineConfigBuilder {
    pub fn category_ceiling(mut self, ceiling: f64) -> Self {
        self.category_ceiling = Some(ceiling);
        self
    }

    /// Replace the weight table of one category
    pub fn weight_table(mut self, category: Category, table: WeightTable) -> Self {
        let weights = self.weights.get_or_insert_with(WeightTables::default);
        *weights.get_mut(category) = table;
        self
    }

    pub fn scale(mut self, component: Component, scale: ScoringScale) -> Self {
        self.scale_overrides.insert(component.key().to_string(), scale);
        self
    }

    pub fn recurring_penalty(mut self, policy: RecurringPenaltyPolicy) -> Self {
        self.recurring_penalty = Some(policy);
        self
    }

    pub fn weak_driver(mut self, policy: WeakDriverPolicy) -> Self {
        self.weak_driver = Some(policy);
        self
    }

    pub fn recommendations(mut self, policy: RecommendationPolicy) -> Self {
        self.recommendations = Some(policy);
        self
    }

    pub fn build(self) -> EngineConfig {
        EngineConfig {
            category_ceiling: self.category_ceiling.unwrap_or(25.0),
            weights: self.weights.unwrap_or_default(),
            scales: ScoringScales {
                overrides: self.scale_overrides,
            },
            recurring_penalty: self.recurring_penalty.unwrap_or_default(),
            weak_driver: self.weak_driver.unwrap_or_default(),
            recommendations: self.recommendations.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weights.profit.total(), 25.0);
        assert_eq!(config.weights.cashflow.total(), 25.0);
        assert_eq!(config.weights.efficiency.total(), 25.0);
        assert_eq!(config.weights.risk.total(), 25.0);
    }

    #[test]
    fn test_overweight_table_is_rejected() {
        let table = WeightTable::from_entries(&[
            (Component::CollectionSpeed, Family::Fixed, 20.0),
            (Component::OverdueVolume, Family::Fixed, 10.0),
        ]);
        let config = EngineConfig::builder()
            .weight_table(Category::Cashflow, table)
            .build();
        assert!(matches!(
            config.validate(),
            Err(HealthError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_component_in_wrong_table_is_rejected() {
        let table = WeightTable::from_entries(&[(Component::HoursProgress, Family::Fixed, 5.0)]);
        let config = EngineConfig::builder()
            .weight_table(Category::Risk, table)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [recommendations]
            max_per_category = 3

            [scales.overrides.overdue_volume]
            direction = "at_most"
            steps = [{ threshold = 0.0, fraction = 1.0 }, { threshold = 1.0, fraction = 0.5 }]
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.recommendations.max_per_category, 3);
        assert_eq!(config.recommendations.high_below, 0.6);
        assert_eq!(config.category_ceiling, 25.0);
        assert_eq!(
            config.scales.scale_for(Component::OverdueVolume).points(1.0, 5.0),
            2.5
        );
        // untouched components keep their built-in scale
        assert_eq!(
            config.scales.scale_for(Component::CollectionSpeed).points(7.0, 15.0),
            12.0
        );
    }

    #[test]
    fn test_unknown_scale_override_is_rejected() {
        let config = EngineConfig::builder().build();
        let mut scales = config.scales.clone();
        scales
            .overrides
            .insert("not_a_component".to_string(), ScoringScale::attainment());
        assert!(scales.validate().is_err());
    }

    #[test]
    fn test_builder_scale_override() {
        let config = EngineConfig::builder()
            .scale(
                Component::BillingBacklog,
                ScoringScale::at_most(&[(500.0, 1.0)], 0.0),
            )
            .build();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.scales.scale_for(Component::BillingBacklog).points(800.0, 6.0),
            0.0
        );
    }
}
