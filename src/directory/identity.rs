use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Authenticated caller, as vouched for by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: String,

    /// Subscription plan (e.g. "pro")
    pub plan: Option<String>,

    /// Feature entitlements granted by the plan (e.g. "3_active_companions")
    pub features: BTreeSet<String>,
}

/// A capability the provider can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement<'a> {
    Plan(&'a str),
    Feature(&'a str),
}

impl Caller {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            plan: None,
            features: BTreeSet::new(),
        }
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn has(&self, entitlement: Entitlement<'_>) -> bool {
        match entitlement {
            Entitlement::Plan(plan) => self.plan.as_deref() == Some(plan),
            Entitlement::Feature(feature) => self.features.contains(feature),
        }
    }
}
