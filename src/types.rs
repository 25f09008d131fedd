//! Core data types: the input snapshot and the health score result

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// The four independent score categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Profit,
    Cashflow,
    Efficiency,
    Risk,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Profit,
        Category::Cashflow,
        Category::Efficiency,
        Category::Risk,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::Cashflow => "Cash Flow",
            Self::Efficiency => "Efficiency",
            Self::Risk => "Risk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Every scored subcomponent, across all categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    // Profit
    SubscriberGrowth,
    SubscriptionPricing,
    SubscriptionEffectiveness,
    RevenueMix,
    PricingEfficiency,
    RateOptimization,
    TimeUtilization,
    RevenueQuality,
    // Cash flow
    CollectionSpeed,
    OverdueVolume,
    OverdueAmount,
    // Efficiency
    HoursProgress,
    BillingConversion,
    DailyRhythm,
    // Risk
    ClientConcentration,
    RevenueStability,
    ClientConcentrationTrend,
    ConsistencyTrend,
    BillingBacklog,
    PaymentExposure,
    WorkConsistency,
}

impl Component {
    pub const ALL: [Component; 21] = [
        Component::SubscriberGrowth,
        Component::SubscriptionPricing,
        Component::SubscriptionEffectiveness,
        Component::RevenueMix,
        Component::PricingEfficiency,
        Component::RateOptimization,
        Component::TimeUtilization,
        Component::RevenueQuality,
        Component::CollectionSpeed,
        Component::OverdueVolume,
        Component::OverdueAmount,
        Component::HoursProgress,
        Component::BillingConversion,
        Component::DailyRhythm,
        Component::ClientConcentration,
        Component::RevenueStability,
        Component::ClientConcentrationTrend,
        Component::ConsistencyTrend,
        Component::BillingBacklog,
        Component::PaymentExposure,
        Component::WorkConsistency,
    ];

    /// The category this subcomponent belongs to
    pub fn category(self) -> Category {
        match self {
            Self::SubscriberGrowth
            | Self::SubscriptionPricing
            | Self::SubscriptionEffectiveness
            | Self::RevenueMix
            | Self::PricingEfficiency
            | Self::RateOptimization
            | Self::TimeUtilization
            | Self::RevenueQuality => Category::Profit,
            Self::CollectionSpeed | Self::OverdueVolume | Self::OverdueAmount => {
                Category::Cashflow
            }
            Self::HoursProgress | Self::BillingConversion | Self::DailyRhythm => {
                Category::Efficiency
            }
            Self::ClientConcentration
            | Self::RevenueStability
            | Self::ClientConcentrationTrend
            | Self::ConsistencyTrend
            | Self::BillingBacklog
            | Self::PaymentExposure
            | Self::WorkConsistency => Category::Risk,
        }
    }

    /// Snake-case key, as used in configuration files
    pub fn key(self) -> &'static str {
        match self {
            Self::SubscriberGrowth => "subscriber_growth",
            Self::SubscriptionPricing => "subscription_pricing",
            Self::SubscriptionEffectiveness => "subscription_effectiveness",
            Self::RevenueMix => "revenue_mix",
            Self::PricingEfficiency => "pricing_efficiency",
            Self::RateOptimization => "rate_optimization",
            Self::TimeUtilization => "time_utilization",
            Self::RevenueQuality => "revenue_quality",
            Self::CollectionSpeed => "collection_speed",
            Self::OverdueVolume => "overdue_volume",
            Self::OverdueAmount => "overdue_amount",
            Self::HoursProgress => "hours_progress",
            Self::BillingConversion => "billing_conversion",
            Self::DailyRhythm => "daily_rhythm",
            Self::ClientConcentration => "client_concentration",
            Self::RevenueStability => "revenue_stability",
            Self::ClientConcentrationTrend => "client_concentration_trend",
            Self::ConsistencyTrend => "consistency_trend",
            Self::BillingBacklog => "billing_backlog",
            Self::PaymentExposure => "payment_exposure",
            Self::WorkConsistency => "work_consistency",
        }
    }

    /// Parse a snake-case or kebab-case key
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|c| c.key() == normalized)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Which revenue driver a subcomponent measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Independent of the business model
    Fixed,
    /// Time-based (hours, hourly rate)
    Time,
    /// Subscription-based (active users, subscription fee)
    Saas,
    /// Only meaningful when both models are active
    Hybrid,
}

/// Business model derived from the configured targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessModel {
    #[serde(rename = "time-only")]
    TimeOnly,
    #[serde(rename = "saas-only")]
    SaasOnly,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl fmt::Display for BusinessModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeOnly => write!(f, "time-only"),
            Self::SaasOnly => write!(f, "saas-only"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// One value per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    pub profit: T,
    pub cashflow: T,
    pub efficiency: T,
    pub risk: T,
}

impl<T> PerCategory<T> {
    /// Build by evaluating `f` once per category, in declaration order
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            profit: f(Category::Profit),
            cashflow: f(Category::Cashflow),
            efficiency: f(Category::Efficiency),
            risk: f(Category::Risk),
        }
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Profit => &self.profit,
            Category::Cashflow => &self.cashflow,
            Category::Efficiency => &self.efficiency,
            Category::Risk => &self.risk,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

/// Snapshot of business data for one scoring call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreInputs {
    #[serde(default)]
    pub dashboard_metrics: DashboardMetrics,
    #[serde(default)]
    pub time_stats: TimeStats,
    #[serde(default)]
    pub mtd_calculations: MtdCalculations,
    #[serde(default)]
    pub profit_targets: ProfitTargets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_revenue: Option<ClientRevenue>,
    /// Reference date of the snapshot; the engine never reads the clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_entries: Vec<TimeEntry>,
}

impl HealthScoreInputs {
    /// Parse a snapshot from JSON
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Invoice and revenue figures from the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Total registered revenue
    #[serde(rename = "totale_registratie", default)]
    pub total_registered: f64,
    /// Overdue amount
    #[serde(rename = "achterstallig", default)]
    pub overdue_amount: f64,
    /// Number of overdue invoices
    #[serde(rename = "achterstallig_count", default)]
    pub overdue_count: u32,
    /// Work ready to be invoiced
    #[serde(rename = "factureerbaar", default)]
    pub ready_to_bill: f64,
    #[serde(rename = "factureerbaar_count", default)]
    pub ready_to_bill_count: u32,
    /// Days invoice overdue, when the producer measured it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_dio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_payment_terms: Option<f64>,
    #[serde(
        rename = "rolling30DaysRevenue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rolling_30_days_revenue: Option<RevenueWindow>,
    #[serde(
        rename = "recurringExpensesDue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recurring_expenses_due: Option<RecurringExpensesDue>,
}

/// Current vs previous rolling window amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueWindow {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub previous: f64,
}

/// Pre-aggregated recurring-expense occurrences that are past due
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpensesDue {
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub templates: Vec<DueTemplate>,
}

/// One recurring-expense template with missed occurrences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueTemplate {
    pub template_id: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub occurrences_due: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_occurrence_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_occurrence_date: Option<NaiveDate>,
}

/// Time tracking aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    #[serde(default)]
    pub this_month: MonthTime,
    #[serde(default)]
    pub unbilled: UnbilledTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionStats>,
    #[serde(
        rename = "rolling30Days",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rolling_30_days: Option<RollingWindow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTime {
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_billable_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_working_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnbilledTime {
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_active_users: Option<CurrentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_subscription_fee: Option<CurrentValue>,
}

impl SubscriptionStats {
    pub fn active_users(&self) -> f64 {
        self.monthly_active_users.map(|v| v.current).unwrap_or(0.0)
    }

    pub fn average_fee(&self) -> f64 {
        self.average_subscription_fee
            .map(|v| v.current)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentValue {
    #[serde(default)]
    pub current: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow {
    #[serde(default)]
    pub current: RollingPeriod,
    #[serde(default)]
    pub previous: RollingPeriod,
}

/// Aggregates over one 30-day window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingPeriod {
    #[serde(default)]
    pub billable_revenue: f64,
    #[serde(default)]
    pub distinct_working_days: u32,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub daily_hours: f64,
    #[serde(default)]
    pub billable_hours: f64,
    #[serde(default)]
    pub non_billable_hours: f64,
    #[serde(default)]
    pub unbilled_hours: f64,
    #[serde(default)]
    pub unbilled_value: f64,
}

/// Month-to-date progress figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MtdCalculations {
    #[serde(default)]
    pub current_day: u32,
    #[serde(default)]
    pub days_in_month: u32,
    #[serde(default)]
    pub month_progress: f64,
    #[serde(default)]
    pub mtd_revenue_target: f64,
    #[serde(default)]
    pub mtd_hours_target: f64,
}

/// Targets configured by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitTargets {
    pub monthly_revenue_target: f64,
    pub monthly_cost_target: f64,
    pub monthly_profit_target: f64,
    pub monthly_hours_target: f64,
    pub target_hourly_rate: f64,
    /// Target billable share of tracked hours, in percent
    pub target_billable_ratio: f64,
    /// ISO weekdays (Monday = 1 .. Sunday = 7)
    pub target_working_days_per_week: Vec<u32>,
    pub target_monthly_active_users: f64,
    pub target_avg_subscription_fee: f64,
    pub setup_completed: bool,
}

impl Default for ProfitTargets {
    fn default() -> Self {
        Self {
            monthly_revenue_target: 0.0,
            monthly_cost_target: 0.0,
            monthly_profit_target: 0.0,
            monthly_hours_target: 0.0,
            target_hourly_rate: 0.0,
            target_billable_ratio: 90.0,
            target_working_days_per_week: vec![1, 2, 3, 4, 5],
            target_monthly_active_users: 0.0,
            target_avg_subscription_fee: 0.0,
            setup_completed: false,
        }
    }
}

/// Client concentration inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRevenue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_client: Option<TopClient>,
    #[serde(
        rename = "rolling30DaysComparison",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rolling_30_days_comparison: Option<ClientShareWindow>,
}

impl ClientRevenue {
    /// Top client share in percent, preferring the rolling window
    pub fn current_top_share(&self) -> f64 {
        self.rolling_30_days_comparison
            .as_ref()
            .map(|w| w.current.top_client_share)
            .or_else(|| self.top_client.as_ref().map(|t| t.revenue_share))
            .unwrap_or(0.0)
    }

    /// Change in top client share (percentage points) against the previous
    /// window; `None` without a previous share to compare with
    pub fn top_share_change(&self) -> Option<f64> {
        self.rolling_30_days_comparison
            .as_ref()
            .filter(|w| w.previous.top_client_share > 0.0)
            .map(|w| w.current.top_client_share - w.previous.top_client_share)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub name: String,
    #[serde(default)]
    pub revenue_share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientShareWindow {
    #[serde(default)]
    pub current: ClientShare,
    #[serde(default)]
    pub previous: ClientShare,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientShare {
    #[serde(default)]
    pub top_client_share: f64,
    #[serde(default)]
    pub total_revenue: f64,
}

/// A single tracked time entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(deserialize_with = "deserialize_entry_date")]
    pub entry_date: NaiveDateTime,
    pub hours: f64,
}

impl TimeEntry {
    /// Entry logged at midnight of `date`
    pub fn on(date: NaiveDate, hours: f64) -> Self {
        Self {
            entry_date: date.and_time(chrono::NaiveTime::MIN),
            hours,
        }
    }
}

/// Accepts either `YYYY-MM-DD` or a full ISO date-time
fn deserialize_entry_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim_end_matches('Z');
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Complete result of one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub scores: Scores,
    pub breakdown: PerCategory<CategoryBreakdown>,
    pub explanations: PerCategory<HealthExplanation>,
    pub recommendations: PerCategory<Vec<HealthRecommendation>>,
    pub insights: Insights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub profit: f64,
    pub cashflow: f64,
    pub efficiency: f64,
    pub risk: f64,
    /// Exact sum of the four category scores
    pub total: f64,
    pub total_rounded: u8,
    pub status: HealthStatus,
}

impl Scores {
    pub fn category(&self, category: Category) -> f64 {
        match category {
            Category::Profit => self.profit,
            Category::Cashflow => self.cashflow,
            Category::Efficiency => self.efficiency,
            Category::Risk => self.risk,
        }
    }
}

/// Overall health status from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 85 and above
    Excellent,
    /// 70 and above
    Good,
    /// 50 and above
    Warning,
    Critical,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Warning => write!(f, "Warning"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Per-category scoring detail, rich enough to render a scoring table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub score: f64,
    pub ceiling: f64,
    /// False when the controlling targets are not configured
    pub available: bool,
    /// Sum of subcomponent points before penalties
    pub base_points: f64,
    pub penalties: f64,
    pub components: Vec<ComponentScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redistribution: Option<RedistributionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_expense_penalty: Option<RecurringExpensePenalty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weak_drivers: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl CategoryBreakdown {
    pub fn component(&self, component: Component) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.component == component)
    }
}

/// Score of one subcomponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub component: Component,
    pub name: String,
    pub family: Family,
    /// False when the business model zeroed this subcomponent
    pub enabled: bool,
    pub raw_value: f64,
    pub display_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    pub points: f64,
    pub ceiling: f64,
    pub percentage_of_ceiling: f64,
    pub formula: String,
    pub benchmark: String,
}

/// Redistribution metadata for the explanation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedistributionInfo {
    pub business_model: BusinessModel,
    pub points_redistributed: bool,
    /// Points awarded across the category's subcomponents before penalties
    pub redistributed_total: f64,
    /// Base points that belonged to inactive subcomponents
    pub inactive_budget: f64,
}

/// Deduction from cash flow for missed recurring-expense occurrences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpensePenalty {
    pub penalty_points: f64,
    pub severity: PenaltySeverity,
    pub total_count: u32,
    pub total_amount: f64,
    pub contributing_templates: Vec<String>,
    pub breakdown: Option<PenaltyBreakdown>,
}

impl RecurringExpensePenalty {
    pub fn none() -> Self {
        Self {
            penalty_points: 0.0,
            severity: PenaltySeverity::None,
            total_count: 0,
            total_amount: 0.0,
            contributing_templates: Vec::new(),
            breakdown: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltySeverity {
    None,
    Moderate,
    High,
}

impl fmt::Display for PenaltySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    DueOccurrences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyBreakdown {
    #[serde(rename = "type")]
    pub kind: PenaltyKind,
    pub total_count: u32,
    pub total_amount: f64,
    pub templates: Vec<DueTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_occurrence: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newest_occurrence: Option<NaiveDate>,
}

/// Structured narrative for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthExplanation {
    pub category: Category,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    /// Set when the category was computed from its own inputs only
    pub independence_verified: bool,
    pub independence_note: String,
    pub narrative: String,
    pub details: Vec<ExplanationSection>,
}

impl HealthExplanation {
    pub fn section(&self, title_fragment: &str) -> Option<&ExplanationSection> {
        self.details.iter().find(|s| {
            s.title
                .as_deref()
                .map(|t| t.contains(title_fragment))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationSection {
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<ExplanationItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Metrics,
    Calculations,
    Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationItem {
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Text,
    Metric,
    Calculation,
    Standard,
    Formula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Primary,
    Secondary,
    Muted,
}

/// Actionable recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecommendation {
    /// Stable kebab-case identifier
    pub id: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    pub priority: Priority,
    /// Points to gain
    pub impact: f64,
    pub effort: Effort,
    pub timeframe: Timeframe,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
    pub metrics: RecommendationMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn weight(self) -> f64 {
        match self {
            Self::High => 3.0,
            Self::Medium => 2.0,
            Self::Low => 1.0,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Immediate,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMetrics {
    pub current: String,
    pub target: String,
    pub points_to_gain: f64,
}

/// Cross-category observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub top_priorities: Vec<String>,
    pub quick_wins: Vec<String>,
    pub long_term_goals: Vec<String>,
    pub strongest_category: Category,
    pub weakest_category: Category,
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub target: f64,
    pub points_needed: f64,
    /// Progress from the previous level toward `target`, 0-100
    pub progress: f64,
    pub status: HealthStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_keys_round_trip() {
        for component in Component::ALL {
            assert_eq!(Component::from_key(component.key()), Some(component));
        }
        assert_eq!(
            Component::from_key("subscriber-growth"),
            Some(Component::SubscriberGrowth)
        );
        assert_eq!(Component::from_key("nonsense"), None);
    }

    #[test]
    fn test_snapshot_accepts_producer_field_names() {
        let json = r#"{
            "dashboardMetrics": {
                "totale_registratie": 8000,
                "achterstallig": 2000,
                "achterstallig_count": 3,
                "factureerbaar": 7000
            },
            "timeStats": {
                "thisMonth": { "hours": 60, "revenue": 6000 },
                "unbilled": { "hours": 15, "revenue": 1500, "value": 1500 },
                "rolling30Days": {
                    "current": { "billableRevenue": 9000, "distinctWorkingDays": 18 },
                    "previous": { "billableRevenue": 8500 }
                }
            },
            "profitTargets": {
                "monthly_hours_target": 120,
                "target_hourly_rate": 70,
                "setup_completed": true
            },
            "asOf": "2025-09-17",
            "timeEntries": [
                { "entry_date": "2025-09-01", "hours": 8 },
                { "entry_date": "2025-09-02T14:30:00", "hours": 6 }
            ]
        }"#;

        let inputs = HealthScoreInputs::from_json_str(json).unwrap();
        assert_eq!(inputs.dashboard_metrics.total_registered, 8000.0);
        assert_eq!(inputs.dashboard_metrics.overdue_count, 3);
        assert_eq!(inputs.dashboard_metrics.ready_to_bill, 7000.0);
        let rolling = inputs.time_stats.rolling_30_days.as_ref().unwrap();
        assert_eq!(rolling.current.distinct_working_days, 18);
        assert_eq!(inputs.profit_targets.target_billable_ratio, 90.0);
        assert_eq!(
            inputs.profit_targets.target_working_days_per_week,
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(inputs.as_of, NaiveDate::from_ymd_opt(2025, 9, 17));
        assert_eq!(inputs.time_entries.len(), 2);
    }

    #[test]
    fn test_top_share_change_needs_previous_share() {
        let json = r#"{
            "topClient": { "name": "Acme", "revenueShare": 40 },
            "rolling30DaysComparison": {
                "current": { "topClientShare": 35, "totalRevenue": 9000 },
                "previous": { "topClientShare": 5, "totalRevenue": 8000 }
            }
        }"#;
        let mut clients: ClientRevenue = serde_json::from_str(json).unwrap();
        assert_eq!(clients.current_top_share(), 35.0);
        assert_eq!(clients.top_share_change(), Some(30.0));

        if let Some(window) = clients.rolling_30_days_comparison.as_mut() {
            window.previous.top_client_share = 0.0;
        }
        assert_eq!(clients.top_share_change(), None);
        clients.rolling_30_days_comparison = None;
        assert_eq!(clients.top_share_change(), None);
        assert_eq!(clients.current_top_share(), 40.0);
    }

    #[test]
    fn test_business_model_serializes_kebab() {
        let json = serde_json::to_string(&BusinessModel::TimeOnly).unwrap();
        assert_eq!(json, "\"time-only\"");
    }
}
