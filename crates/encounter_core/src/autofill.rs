//! Autofill of under-populated lances.
//!
//! Missing units are cloned from a template entry of the same lance and then
//! handed to the host's unit-generation service, which picks a concrete unit
//! for the clone. The template itself is never touched.

use chrono::NaiveDate;
use rand::Rng;

use crate::contract::CampaignContext;
use crate::error::Result;
use crate::overrides::{LanceOverride, ObjectGuid, TagSet, UnitSpawnPointOverride};

/// Everything the unit-generation service gets for one slot.
#[derive(Debug, Clone, Copy)]
pub struct UnitGenerationRequest<'a> {
    /// The cloned entry being generated.
    pub unit: &'a UnitSpawnPointOverride,
    /// Lance difficulty tier.
    pub difficulty: i32,
    /// Lance name.
    pub lance_name: &'a str,
    /// Zero-based slot in the lance.
    pub index: usize,
    /// Current simulated date.
    pub sim_date: NaiveDate,
    /// Player company tags.
    pub company_tags: &'a TagSet,
}

/// Result of one unit generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Concrete unit definition id.
    pub unit_definition_id: String,
    /// Pilot definition id, if the service picked one.
    pub pilot_definition_id: Option<String>,
}

/// Host service that turns a unit entry into a concrete unit definition.
pub trait UnitGenerator {
    /// Generate a unit for one lance slot.
    ///
    /// Failures should be reported as [`EncounterError::UnitGeneration`](crate::error::EncounterError::UnitGeneration).
    fn generate(&mut self, request: &UnitGenerationRequest<'_>) -> Result<GeneratedUnit>;
}

/// Appends generated units to a lance until it reaches a target size.
#[derive(Debug, Clone, Copy)]
pub struct AutofillGenerator<'a> {
    campaign: &'a CampaignContext,
}

impl<'a> AutofillGenerator<'a> {
    /// Create a generator for the given campaign state.
    #[must_use]
    pub const fn new(campaign: &'a CampaignContext) -> Self {
        Self { campaign }
    }

    /// Entry cloned for new units: the first tagged member, else the first member.
    #[must_use]
    pub fn template(lance: &LanceOverride) -> Option<&UnitSpawnPointOverride> {
        lance
            .tagged_member()
            .or_else(|| lance.unit_spawn_point_override_list.first())
    }

    /// Append units until `lance` has `target` entries. Returns how many were added.
    ///
    /// Each new entry gets a fresh spawn point guid so it binds to its own
    /// spawn point. If generation fails, entries added before the failure stay.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        lance: &mut LanceOverride,
        target: usize,
        generator: &mut dyn UnitGenerator,
        rng: &mut R,
    ) -> Result<usize> {
        let mut added = 0;

        for index in lance.unit_count()..target {
            let Some(template) = Self::template(lance) else {
                break;
            };

            let mut unit = template.clone();
            unit.template_origin = Some(template.unit_spawn_point.guid.clone());
            unit.unit_spawn_point.guid = ObjectGuid::random(rng);
            unit.generated_difficulty = Some(lance.selected_lance_difficulty);

            let generated = generator.generate(&UnitGenerationRequest {
                unit: &unit,
                difficulty: lance.selected_lance_difficulty,
                lance_name: &lance.name,
                index,
                sim_date: self.campaign.sim_date,
                company_tags: &self.campaign.company_tags,
            })?;

            unit.unit_definition_id = generated.unit_definition_id;
            if let Some(pilot) = generated.pilot_definition_id {
                unit.pilot_definition_id = pilot;
            }

            lance.unit_spawn_point_override_list.push(unit);
            added += 1;
        }

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncounterError;
    use crate::overrides::TAGGED_UNIT_DEF_ID;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingGenerator {
        calls: Vec<(usize, i32, String)>,
        fail_at: Option<usize>,
    }

    impl UnitGenerator for RecordingGenerator {
        fn generate(&mut self, request: &UnitGenerationRequest<'_>) -> Result<GeneratedUnit> {
            if self.fail_at == Some(request.index) {
                return Err(EncounterError::UnitGeneration {
                    lance: request.lance_name.to_string(),
                    index: request.index,
                    message: "no unit matches tags".to_string(),
                });
            }
            self.calls.push((
                request.index,
                request.difficulty,
                request.unit.unit_definition_id.clone(),
            ));
            Ok(GeneratedUnit {
                unit_definition_id: format!("mechdef_generated_{}", request.index),
                pilot_definition_id: Some("pilot_generated".to_string()),
            })
        }
    }

    fn lance() -> LanceOverride {
        let mut lance = LanceOverride::new("Alpha", "Manual", "s1");
        lance.selected_lance_difficulty = 5;
        lance
            .unit_spawn_point_override_list
            .push(UnitSpawnPointOverride::new("mechdef_atlas_AS7-D", "u1"));
        lance
            .unit_spawn_point_override_list
            .push(UnitSpawnPointOverride::new(TAGGED_UNIT_DEF_ID, "u2"));
        lance
    }

    #[test]
    fn test_fill_to_target() {
        let campaign = CampaignContext::default();
        let mut lance = lance();
        let original = lance.unit_spawn_point_override_list.clone();
        let mut generator = RecordingGenerator::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let added = AutofillGenerator::new(&campaign)
            .fill(&mut lance, 4, &mut generator, &mut rng)
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(lance.unit_count(), 4);
        assert_eq!(&lance.unit_spawn_point_override_list[..2], &original[..]);

        // Tagged member is the preferred template.
        assert_eq!(
            generator.calls,
            vec![
                (2, 5, TAGGED_UNIT_DEF_ID.to_string()),
                (3, 5, TAGGED_UNIT_DEF_ID.to_string())
            ]
        );

        let third = &lance.unit_spawn_point_override_list[2];
        assert_eq!(third.unit_definition_id, "mechdef_generated_2");
        assert_eq!(third.pilot_definition_id, "pilot_generated");
        assert_eq!(third.template_origin, Some(ObjectGuid::new("u2")));
        assert_eq!(third.generated_difficulty, Some(5));
        assert_ne!(third.unit_spawn_point.guid, ObjectGuid::new("u2"));
        assert_ne!(
            third.unit_spawn_point.guid,
            lance.unit_spawn_point_override_list[3].unit_spawn_point.guid
        );
    }

    #[test]
    fn test_first_member_template_without_tags() {
        let mut lance = lance();
        lance.unit_spawn_point_override_list.pop();
        let template = AutofillGenerator::template(&lance).unwrap();
        assert_eq!(template.unit_definition_id, "mechdef_atlas_AS7-D");
    }

    #[test]
    fn test_already_full_is_noop() {
        let campaign = CampaignContext::default();
        let mut lance = lance();
        let mut generator = RecordingGenerator::default();
        let mut rng = SmallRng::seed_from_u64(2);

        let added = AutofillGenerator::new(&campaign)
            .fill(&mut lance, 2, &mut generator, &mut rng)
            .unwrap();
        assert_eq!(added, 0);
        assert!(generator.calls.is_empty());
    }

    #[test]
    fn test_empty_lance_has_no_template() {
        let campaign = CampaignContext::default();
        let mut lance = LanceOverride::new("Empty", "Manual", "s1");
        let mut generator = RecordingGenerator::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let added = AutofillGenerator::new(&campaign)
            .fill(&mut lance, 4, &mut generator, &mut rng)
            .unwrap();
        assert_eq!(added, 0);
        assert_eq!(lance.unit_count(), 0);
    }

    #[test]
    fn test_generation_failure_keeps_earlier_units() {
        let campaign = CampaignContext::default();
        let mut lance = lance();
        let mut generator = RecordingGenerator {
            fail_at: Some(3),
            ..RecordingGenerator::default()
        };
        let mut rng = SmallRng::seed_from_u64(4);

        let err = AutofillGenerator::new(&campaign)
            .fill(&mut lance, 5, &mut generator, &mut rng)
            .unwrap_err();
        assert!(matches!(err, EncounterError::UnitGeneration { index: 3, .. }));
        assert_eq!(lance.unit_count(), 3);
    }
}
