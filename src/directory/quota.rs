use super::identity::{Caller, Entitlement};
use serde::Deserialize;

/// How many companions each entitlement tier may create
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaPolicy {
    /// Plan with no creation limit
    #[serde(default = "default_unlimited_plan")]
    pub unlimited_plan: String,

    /// Checked in order; the first feature the caller holds sets the limit
    #[serde(default = "default_tiers")]
    pub tiers: Vec<QuotaTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuotaTier {
    pub feature: String,
    pub limit: usize,
}

impl QuotaPolicy {
    /// Creation limit for the caller, `None` when unlimited.
    /// Callers with no recognised tier get 0.
    pub fn limit_for(&self, caller: &Caller) -> Option<usize> {
        if caller.has(Entitlement::Plan(&self.unlimited_plan)) {
            return None;
        }

        Some(
            self.tiers
                .iter()
                .find(|tier| caller.has(Entitlement::Feature(&tier.feature)))
                .map_or(0, |tier| tier.limit),
        )
    }

    /// Whether a caller who already owns `existing` companions may create another
    pub fn allows(&self, caller: &Caller, existing: usize) -> bool {
        match self.limit_for(caller) {
            None => true,
            Some(limit) => existing < limit,
        }
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            unlimited_plan: default_unlimited_plan(),
            tiers: default_tiers(),
        }
    }
}

fn default_unlimited_plan() -> String {
    "pro".to_string()
}

fn default_tiers() -> Vec<QuotaTier> {
    vec![
        QuotaTier {
            feature: "3_active_companions".to_string(),
            limit: 3,
        },
        QuotaTier {
            feature: "10_active_companions".to_string(),
            limit: 10,
        },
    ]
}
