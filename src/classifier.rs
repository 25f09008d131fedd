//! Business model classification from configured targets

use crate::types::{BusinessModel, Family, ProfitTargets};

/// Which revenue drivers have non-zero targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDrivers {
    pub time: bool,
    pub saas: bool,
}

impl ActiveDrivers {
    pub fn from_targets(targets: &ProfitTargets) -> Self {
        Self {
            time: targets.monthly_hours_target > 0.0 && targets.target_hourly_rate > 0.0,
            saas: targets.target_monthly_active_users > 0.0
                && targets.target_avg_subscription_fee > 0.0,
        }
    }

    /// Whether at least one revenue driver is configured
    pub fn any(&self) -> bool {
        self.time || self.saas
    }
}

/// Classify the account. Accounts with neither driver configured are
/// treated as time-only; profit is then reported unavailable and scores 0.
pub fn classify(targets: &ProfitTargets) -> BusinessModel {
    let drivers = ActiveDrivers::from_targets(targets);
    match (drivers.time, drivers.saas) {
        (true, true) => BusinessModel::Hybrid,
        (false, true) => BusinessModel::SaasOnly,
        _ => BusinessModel::TimeOnly,
    }
}

/// Whether a subcomponent of `family` contributes under `model`
pub fn family_active(family: Family, model: BusinessModel) -> bool {
    match family {
        Family::Fixed => true,
        Family::Time => model != BusinessModel::SaasOnly,
        Family::Saas => model != BusinessModel::TimeOnly,
        Family::Hybrid => model == BusinessModel::Hybrid,
    }
}
