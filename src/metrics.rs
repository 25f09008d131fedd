//! Metric definition catalog
//!
//! Reference data for every subcomponent: display name, unit, what it
//! measures, how it is calculated and the recommendation offered when it
//! underperforms. The scorers, explanations and the CLI `explain` command
//! all read from here.

use crate::types::{Component, Effort, Timeframe};

#[derive(Debug, Clone, Copy)]
pub struct MetricDefinition {
    pub component: Component,
    pub name: &'static str,
    /// Unit appended to scale thresholds, e.g. `" days"`
    pub unit: &'static str,
    pub description: &'static str,
    pub calculation: &'static str,
    pub recommendation: RecommendationTemplate,
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationTemplate {
    /// Stable kebab-case identifier
    pub id: &'static str,
    pub title: &'static str,
    pub effort: Effort,
    pub timeframe: Timeframe,
    pub actions: &'static [&'static str],
}

/// Look up the definition for a subcomponent
pub fn definition(component: Component) -> &'static MetricDefinition {
    use Component::*;
    match component {
        SubscriberGrowth => &SUBSCRIBER_GROWTH,
        SubscriptionPricing => &SUBSCRIPTION_PRICING,
        SubscriptionEffectiveness => &SUBSCRIPTION_EFFECTIVENESS,
        RevenueMix => &REVENUE_MIX,
        PricingEfficiency => &PRICING_EFFICIENCY,
        RateOptimization => &RATE_OPTIMIZATION,
        TimeUtilization => &TIME_UTILIZATION,
        RevenueQuality => &REVENUE_QUALITY,
        CollectionSpeed => &COLLECTION_SPEED,
        OverdueVolume => &OVERDUE_VOLUME,
        OverdueAmount => &OVERDUE_AMOUNT,
        HoursProgress => &HOURS_PROGRESS,
        BillingConversion => &BILLING_CONVERSION,
        DailyRhythm => &DAILY_RHYTHM,
        ClientConcentration => &CLIENT_CONCENTRATION,
        RevenueStability => &REVENUE_STABILITY,
        ClientConcentrationTrend => &CLIENT_CONCENTRATION_TREND,
        ConsistencyTrend => &CONSISTENCY_TREND,
        BillingBacklog => &BILLING_BACKLOG,
        PaymentExposure => &PAYMENT_EXPOSURE,
        WorkConsistency => &WORK_CONSISTENCY,
    }
}

/// Template for the cash flow recommendation raised by missed recurring expenses
pub const RECURRING_EXPENSES: RecommendationTemplate = RecommendationTemplate {
    id: "catch-up-recurring-expenses",
    title: "Record overdue recurring expenses",
    effort: Effort::Low,
    timeframe: Timeframe::Immediate,
    actions: &[
        "Review each recurring expense template with missed occurrences",
        "Record the missing expense entries",
        "Check whether templates that keep slipping are still needed",
    ],
};

/// Template raised while profit targets have not been configured
pub const PROFIT_SETUP: RecommendationTemplate = RecommendationTemplate {
    id: "complete-profit-targets-setup",
    title: "Set up your profit targets",
    effort: Effort::Low,
    timeframe: Timeframe::Immediate,
    actions: &[
        "Enter a monthly revenue target",
        "Enter your hours target and hourly rate, or your subscriber and fee targets",
    ],
};

// Profit

static SUBSCRIBER_GROWTH: MetricDefinition = MetricDefinition {
    component: Component::SubscriberGrowth,
    name: "Subscriber Growth",
    unit: "",
    description: "Monthly active subscribers compared with the subscriber target",
    calculation: "active users / target monthly active users",
    recommendation: RecommendationTemplate {
        id: "grow-subscriber-base",
        title: "Grow the subscriber base",
        effort: Effort::High,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Identify the acquisition channel with the best conversion and invest there",
            "Offer a trial or onboarding incentive to lower the signup barrier",
            "Follow up with churned subscribers to learn why they left",
        ],
    },
};

static SUBSCRIPTION_PRICING: MetricDefinition = MetricDefinition {
    component: Component::SubscriptionPricing,
    name: "Subscription Pricing",
    unit: "",
    description: "Average subscription fee compared with the target fee",
    calculation: "average subscription fee / target average fee",
    recommendation: RecommendationTemplate {
        id: "optimize-subscriber-pricing",
        title: "Optimize subscription pricing",
        effort: Effort::Medium,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Compare plan prices with similar services",
            "Introduce a higher tier with added value",
            "Move long-standing discounts back to list price",
        ],
    },
};

static SUBSCRIPTION_EFFECTIVENESS: MetricDefinition = MetricDefinition {
    component: Component::SubscriptionEffectiveness,
    name: "Subscription Effectiveness",
    unit: "",
    description: "Monthly recurring revenue as a share of the monthly revenue target",
    calculation: "(active users × average fee) / monthly revenue target",
    recommendation: RecommendationTemplate {
        id: "lift-subscriber-revenue",
        title: "Lift recurring revenue toward target",
        effort: Effort::Medium,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Combine subscriber growth and pricing work into one monthly plan",
            "Offer annual billing to secure revenue up front",
        ],
    },
};

static REVENUE_MIX: MetricDefinition = MetricDefinition {
    component: Component::RevenueMix,
    name: "Revenue Mix",
    unit: "",
    description: "Balance between subscription and time-based revenue (ideal subscription share 30%)",
    calculation: "1 - |MRR / (MRR + 30-day billable revenue) - 0.30|",
    recommendation: RecommendationTemplate {
        id: "balance-revenue-mix",
        title: "Balance subscription and project revenue",
        effort: Effort::High,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Package recurring support or maintenance for project clients",
            "Avoid depending on a single revenue stream",
        ],
    },
};

static PRICING_EFFICIENCY: MetricDefinition = MetricDefinition {
    component: Component::PricingEfficiency,
    name: "Pricing Efficiency",
    unit: "",
    description: "Effective hourly rate over the last 30 days compared with the target rate",
    calculation: "(billable revenue / billable hours) / target hourly rate",
    recommendation: RecommendationTemplate {
        id: "raise-effective-hourly-rate",
        title: "Raise your effective hourly rate",
        effort: Effort::Medium,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Review rates for clients billed below your target rate",
            "Announce a rate increase for new engagements",
            "Quote fixed prices for well-understood work",
        ],
    },
};

static RATE_OPTIMIZATION: MetricDefinition = MetricDefinition {
    component: Component::RateOptimization,
    name: "Rate Optimization",
    unit: "",
    description: "Registered revenue compared with the monthly revenue target",
    calculation: "registered revenue / monthly revenue target",
    recommendation: RecommendationTemplate {
        id: "close-rate-revenue-gap",
        title: "Close the gap to your revenue target",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Register all delivered work before month end",
            "Plan billable work for the remaining weeks of the month",
        ],
    },
};

static TIME_UTILIZATION: MetricDefinition = MetricDefinition {
    component: Component::TimeUtilization,
    name: "Time Utilization",
    unit: "",
    description: "Billable share of tracked hours compared with the target billable ratio",
    calculation: "(billable hours / total hours × 100) / target billable ratio",
    recommendation: RecommendationTemplate {
        id: "increase-billable-rate-of-hours",
        title: "Increase the billable share of your hours",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Batch administrative work into a fixed weekly slot",
            "Check which non-billable activities could be billed",
        ],
    },
};

static REVENUE_QUALITY: MetricDefinition = MetricDefinition {
    component: Component::RevenueQuality,
    name: "Revenue Quality",
    unit: "",
    description: "Share of billable revenue that has already been invoiced",
    calculation: "(billable revenue - unbilled value) / billable revenue",
    recommendation: RecommendationTemplate {
        id: "invoice-unbilled-work",
        title: "Invoice unbilled work",
        effort: Effort::Low,
        timeframe: Timeframe::Immediate,
        actions: &[
            "Send invoices for all completed unbilled hours",
            "Invoice weekly instead of monthly",
        ],
    },
};

// Cash flow

static COLLECTION_SPEED: MetricDefinition = MetricDefinition {
    component: Component::CollectionSpeed,
    name: "Collection Speed",
    unit: " days",
    description: "Days invoice overdue (DIO), measured or estimated from the average overdue amount per invoice",
    calculation: "actual DIO, or an estimate from overdue amount / overdue invoices",
    recommendation: RecommendationTemplate {
        id: "speed-up-collections",
        title: "Speed up payment collection",
        effort: Effort::Low,
        timeframe: Timeframe::Immediate,
        actions: &[
            "Send reminders for every invoice past its due date",
            "Shorten payment terms for new invoices",
            "Offer a direct debit or online payment option",
        ],
    },
};

static OVERDUE_VOLUME: MetricDefinition = MetricDefinition {
    component: Component::OverdueVolume,
    name: "Overdue Volume",
    unit: " invoices",
    description: "Number of invoices past their due date",
    calculation: "count of overdue invoices",
    recommendation: RecommendationTemplate {
        id: "reduce-overdue-invoices",
        title: "Reduce the number of overdue invoices",
        effort: Effort::Low,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Call clients with more than one overdue invoice",
            "Agree on payment plans for large outstanding balances",
        ],
    },
};

static OVERDUE_AMOUNT: MetricDefinition = MetricDefinition {
    component: Component::OverdueAmount,
    name: "Overdue Amount",
    unit: "",
    description: "Total amount outstanding on overdue invoices",
    calculation: "sum of overdue invoice amounts",
    recommendation: RecommendationTemplate {
        id: "collect-overdue-amount",
        title: "Collect the outstanding overdue amount",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Start with the largest overdue invoices",
            "Request a deposit on new large projects",
        ],
    },
};

// Efficiency

static HOURS_PROGRESS: MetricDefinition = MetricDefinition {
    component: Component::HoursProgress,
    name: "Hours Progress",
    unit: "",
    description: "Hours tracked this month compared with the month-to-date hours target",
    calculation: "hours this month / MTD hours target",
    recommendation: RecommendationTemplate {
        id: "catch-up-tracked-hours",
        title: "Catch up on planned hours",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Block focused work time in your calendar",
            "Make sure all worked time is actually tracked",
        ],
    },
};

static BILLING_CONVERSION: MetricDefinition = MetricDefinition {
    component: Component::BillingConversion,
    name: "Billing Conversion",
    unit: "",
    description: "Share of this month's tracked hours that has already been billed",
    calculation: "(hours this month - unbilled hours) / hours this month",
    recommendation: RecommendationTemplate {
        id: "convert-hours-to-invoices",
        title: "Convert tracked hours into invoices",
        effort: Effort::Low,
        timeframe: Timeframe::Immediate,
        actions: &[
            "Invoice unbilled hours at the end of every week",
            "Set up invoice templates per client",
        ],
    },
};

static DAILY_RHYTHM: MetricDefinition = MetricDefinition {
    component: Component::DailyRhythm,
    name: "Daily Rhythm",
    unit: "",
    description: "Average hours per worked day compared with the schedule-aware daily target",
    calculation: "(hours through yesterday / days worked) / (monthly hours target / working days in month)",
    recommendation: RecommendationTemplate {
        id: "steady-daily-rhythm",
        title: "Build a steadier daily rhythm",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Set a fixed start time on your working days",
            "Track time as you go instead of at the end of the week",
        ],
    },
};

// Risk

static CLIENT_CONCENTRATION: MetricDefinition = MetricDefinition {
    component: Component::ClientConcentration,
    name: "Client Concentration",
    unit: "%",
    description: "Share of revenue from the single largest client",
    calculation: "top client revenue / total revenue × 100",
    recommendation: RecommendationTemplate {
        id: "diversify-client-base",
        title: "Diversify your client base",
        effort: Effort::High,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Reserve time each week for acquiring new clients",
            "Ask satisfied clients for referrals",
        ],
    },
};

static REVENUE_STABILITY: MetricDefinition = MetricDefinition {
    component: Component::RevenueStability,
    name: "Revenue Stability",
    unit: "",
    description: "Rolling 30-day revenue compared with the previous 30 days",
    calculation: "current 30-day revenue / previous 30-day revenue",
    recommendation: RecommendationTemplate {
        id: "stabilize-revenue",
        title: "Stabilize month-to-month revenue",
        effort: Effort::High,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Convert one-off clients into retainers",
            "Keep a pipeline of work for the next month",
        ],
    },
};

static CLIENT_CONCENTRATION_TREND: MetricDefinition = MetricDefinition {
    component: Component::ClientConcentrationTrend,
    name: "Client Concentration Trend",
    unit: " pts",
    description: "Change in the top client's revenue share against the previous 30 days",
    calculation: "current top client share - previous top client share",
    recommendation: RecommendationTemplate {
        id: "reverse-client-dependence",
        title: "Stop the drift toward a single client",
        effort: Effort::Medium,
        timeframe: Timeframe::Monthly,
        actions: &[
            "Schedule work for other clients before accepting more from the largest",
            "Follow up with clients who have not ordered in the last 30 days",
        ],
    },
};

static CONSISTENCY_TREND: MetricDefinition = MetricDefinition {
    component: Component::ConsistencyTrend,
    name: "Daily Consistency Trend",
    unit: "",
    description: "Whether hours per worked day are moving toward or away from the daily target",
    calculation: "change in |daily hours - target| / target from the previous window",
    recommendation: RecommendationTemplate {
        id: "steady-daily-hours",
        title: "Steady your hours per working day",
        effort: Effort::Low,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Block your target hours in the calendar for each working day",
            "Compare last week's daily hours with your target every Monday",
        ],
    },
};

static BILLING_BACKLOG: MetricDefinition = MetricDefinition {
    component: Component::BillingBacklog,
    name: "Billing Backlog",
    unit: "",
    description: "Amount of finished work not yet invoiced",
    calculation: "ready-to-bill amount",
    recommendation: RecommendationTemplate {
        id: "clear-billing-backlog",
        title: "Clear the billing backlog",
        effort: Effort::Low,
        timeframe: Timeframe::Immediate,
        actions: &[
            "Invoice all ready-to-bill work today",
            "Agree on interim invoicing for long projects",
        ],
    },
};

static PAYMENT_EXPOSURE: MetricDefinition = MetricDefinition {
    component: Component::PaymentExposure,
    name: "Payment Exposure",
    unit: "",
    description: "Revenue at risk from invoices that are already overdue",
    calculation: "overdue amount",
    recommendation: RecommendationTemplate {
        id: "limit-payment-exposure",
        title: "Limit exposure to late payers",
        effort: Effort::Medium,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Pause new work for clients with long overdue balances",
            "Check creditworthiness before large engagements",
        ],
    },
};

static WORK_CONSISTENCY: MetricDefinition = MetricDefinition {
    component: Component::WorkConsistency,
    name: "Work Consistency",
    unit: "",
    description: "Deviation of worked days per week from the target working schedule",
    calculation: "|worked days / 4.29 - target days per week| / target days per week",
    recommendation: RecommendationTemplate {
        id: "align-working-schedule",
        title: "Align your working days with your schedule",
        effort: Effort::Low,
        timeframe: Timeframe::Weekly,
        actions: &[
            "Review whether your target working days still match reality",
            "Plan work on your scheduled days",
        ],
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_component_has_matching_definition() {
        for component in Component::ALL {
            assert_eq!(definition(component).component, component);
        }
    }

    #[test]
    fn test_recommendation_ids_are_unique_kebab_case() {
        let mut ids = HashSet::new();
        for component in Component::ALL {
            let id = definition(component).recommendation.id;
            assert!(id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '-'));
            assert!(ids.insert(id), "duplicate id {}", id);
        }
        assert!(ids.insert(RECURRING_EXPENSES.id));
        assert!(ids.insert(PROFIT_SETUP.id));
    }

    #[test]
    fn test_model_driver_ids_are_discoverable() {
        for component in [
            Component::SubscriberGrowth,
            Component::SubscriptionPricing,
            Component::SubscriptionEffectiveness,
        ] {
            assert!(definition(component).recommendation.id.contains("subscriber"));
        }
        for component in [
            Component::PricingEfficiency,
            Component::RateOptimization,
            Component::TimeUtilization,
        ] {
            assert!(definition(component).recommendation.id.contains("rate"));
        }
    }
}
