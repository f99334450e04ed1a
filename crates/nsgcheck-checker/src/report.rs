use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one (vnet, subnet) association check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutcome {
    Associated { nsg_id: String },
    NotAssociated,
}

/// A named sub-check. `name` is `<vnet>/<subnet>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetCheck {
    pub name: String,
    pub vnet: String,
    pub subnet: String,
    pub outcome: CheckOutcome,
}

impl SubnetCheck {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Associated { .. })
    }
}

/// One checker run. Success is "no fatal error and no failed sub-check";
/// fatal errors never produce a report at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub run_id: Uuid,
    pub resource_group: String,
    pub security_group: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub checks: Vec<SubnetCheck>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed())
    }

    pub fn failures(&self) -> Vec<&SubnetCheck> {
        self.checks.iter().filter(|c| !c.passed()).collect()
    }
}
