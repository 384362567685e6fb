//! # Message pools for synthetic updates.
//!
//! [`MessageCatalog`] maps every [`UpdateKind`] to a pool of title/message
//! templates. Scheduled emissions pick uniformly from the pool of the chosen kind.
//! A kind with an empty pool falls back to [`Template::FALLBACK`]; selection never fails.

use std::collections::HashMap;

use crate::events::UpdateKind;
use crate::policies::Dice;

/// Title/message pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub title: &'static str,
    pub message: &'static str,
}

impl Template {
    /// Used when a pool is empty.
    pub const FALLBACK: Template = Template::new("Dashboard Update", "New activity is available");

    pub const fn new(title: &'static str, message: &'static str) -> Self {
        Self { title, message }
    }
}

const COMPLIANCE: &[Template] = &[
    Template::new("Compliance Check Passed", "Model risk assessment meets policy requirements"),
    Template::new("Policy Violation Detected", "Training data lineage is missing for one dataset"),
    Template::new("Evaluation Completed", "Bias evaluation finished for the credit scoring model"),
    Template::new(
        "Regulation Updated",
        "New transparency requirements were added to the framework",
    ),
];

const AUDIT: &[Template] = &[
    Template::new("Audit Scheduled", "Quarterly model audit has been scheduled"),
    Template::new("Audit Completed", "Audit closed with no critical findings"),
    Template::new("Finding Raised", "Auditor flagged incomplete documentation"),
    Template::new("Evidence Requested", "Additional evidence requested for the fairness review"),
];

const PROJECT: &[Template] = &[
    Template::new("Model Deployed", "New model version promoted to production"),
    Template::new("Project Milestone", "Validation phase completed ahead of schedule"),
    Template::new("Risk Level Changed", "Project risk classification was re-evaluated"),
    Template::new("Dataset Registered", "A new training dataset was registered"),
];

const TEAM: &[Template] = &[
    Template::new("Team Member Joined", "A new data scientist joined the project"),
    Template::new("Review Completed", "Peer review finished for the latest experiment"),
    Template::new("Performance Report", "Weekly team performance report is ready"),
];

const SYSTEM: &[Template] = &[
    Template::new("Maintenance Window", "Scheduled maintenance starts in one hour"),
    Template::new("Sync Completed", "Governance registry synchronized successfully"),
    Template::new("Service Degraded", "Evaluation service is responding slowly"),
];

/// Per-kind template pools.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    pools: HashMap<UpdateKind, Vec<Template>>,
}

impl Default for MessageCatalog {
    /// Built-in governance pools for all five kinds.
    fn default() -> Self {
        let mut pools = HashMap::new();
        pools.insert(UpdateKind::Compliance, COMPLIANCE.to_vec());
        pools.insert(UpdateKind::Audit, AUDIT.to_vec());
        pools.insert(UpdateKind::Project, PROJECT.to_vec());
        pools.insert(UpdateKind::Team, TEAM.to_vec());
        pools.insert(UpdateKind::System, SYSTEM.to_vec());
        Self { pools }
    }
}

impl MessageCatalog {
    /// Catalog with every pool empty (everything falls back).
    pub fn empty() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// Replaces the pool for `kind`.
    pub fn with_pool(mut self, kind: UpdateKind, templates: Vec<Template>) -> Self {
        self.pools.insert(kind, templates);
        self
    }

    pub fn pool(&self, kind: UpdateKind) -> &[Template] {
        self.pools.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Picks a template uniformly from the pool of `kind`.
    pub fn pick(&self, kind: UpdateKind, dice: &Dice) -> Template {
        let pool = self.pool(kind);
        pool.get(dice.index(pool.len()))
            .copied()
            .unwrap_or(Template::FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::ScriptedRandom;

    #[test]
    fn test_every_kind_has_a_pool() {
        let catalog = MessageCatalog::default();
        for kind in UpdateKind::ALL {
            assert!(!catalog.pool(kind).is_empty(), "{kind} pool is empty");
        }
    }

    #[test]
    fn test_pick_is_uniform_over_pool_index() {
        let catalog = MessageCatalog::default();
        let dice = Dice::new(ScriptedRandom::new([0.0, 0.99]));
        assert_eq!(catalog.pick(UpdateKind::Audit, &dice), AUDIT[0]);
        assert_eq!(catalog.pick(UpdateKind::Audit, &dice), AUDIT[AUDIT.len() - 1]);
    }

    #[test]
    fn test_empty_pool_falls_back() {
        let catalog = MessageCatalog::default().with_pool(UpdateKind::Team, Vec::new());
        let dice = Dice::default();
        assert_eq!(catalog.pick(UpdateKind::Team, &dice), Template::FALLBACK);
        assert_eq!(
            MessageCatalog::empty().pick(UpdateKind::System, &dice),
            Template::FALLBACK
        );
    }
}
