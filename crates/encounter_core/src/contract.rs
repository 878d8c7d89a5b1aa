//! Contract lifecycle and campaign context.

use chrono::NaiveDate;

use crate::overrides::{ContractOverride, TagSet};

/// One mission instance.
///
/// Holds the override data the pipeline mutates plus the authored original,
/// so a restarted contract starts again from exactly what was authored.
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    authored: ContractOverride,
    current: ContractOverride,
}

impl Contract {
    /// Create a contract from authored override data.
    #[must_use]
    pub fn new(name: impl Into<String>, authored: ContractOverride) -> Self {
        Self {
            name: name.into(),
            current: authored.clone(),
            authored,
        }
    }

    /// Contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override data as mutated by the last encounter build.
    #[must_use]
    pub fn override_data(&self) -> &ContractOverride {
        &self.current
    }

    /// Mutable override data for the pipeline.
    pub fn override_data_mut(&mut self) -> &mut ContractOverride {
        &mut self.current
    }

    /// Whether any build has changed the override data.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.current != self.authored
    }

    /// Throw away every build mutation and return to the authored data.
    pub fn restart(&mut self) {
        tracing::info!(contract = %self.name, "Restarting contract, resetting override data");
        self.current = self.authored.clone();
    }
}

/// Campaign state handed to the unit-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignContext {
    /// Current simulated date.
    pub sim_date: NaiveDate,
    /// Tags earned by the player's company.
    pub company_tags: TagSet,
}

impl CampaignContext {
    /// Create a campaign context.
    #[must_use]
    pub fn new(sim_date: NaiveDate, company_tags: TagSet) -> Self {
        Self {
            sim_date,
            company_tags,
        }
    }
}

impl Default for CampaignContext {
    fn default() -> Self {
        Self {
            sim_date: NaiveDate::from_ymd_opt(3025, 1, 1).unwrap_or_default(),
            company_tags: TagSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::{LanceOverride, TeamOverride};

    #[test]
    fn test_restart_discards_mutations() {
        let mut team = TeamOverride::new("Locust");
        team.lance_override_list
            .push(LanceOverride::new("Alpha", "Manual", "s1"));
        let authored = ContractOverride {
            target_team: team,
            ..ContractOverride::default()
        };

        let mut contract = Contract::new("Ambush", authored.clone());
        assert!(!contract.is_modified());

        contract.override_data_mut().target_team.lance_override_list[0]
            .lance_difficulty_adjustment = 5;
        contract
            .override_data_mut()
            .target_team
            .lance_override_list
            .push(LanceOverride::default());
        assert!(contract.is_modified());

        contract.restart();
        assert!(!contract.is_modified());
        assert_eq!(contract.override_data(), &authored);
        assert_eq!(contract.name(), "Ambush");
    }

    #[test]
    fn test_default_campaign_date() {
        let ctx = CampaignContext::default();
        assert_eq!(ctx.sim_date, NaiveDate::from_ymd_opt(3025, 1, 1).unwrap());
        assert!(ctx.company_tags.is_empty());
    }
}
