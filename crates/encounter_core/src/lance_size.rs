//! Faction lance size and difficulty resolution.
//!
//! Lance-size buckets map a target size to the factions that field lances of
//! that size, each with a difficulty modifier. Buckets are scanned in
//! ascending size order and the first bucket listing the faction wins.

use crate::config::{ExtendedLance, ExtendedLancesSettings};

/// Read-only view over the lance-size buckets.
#[derive(Debug, Clone, Copy)]
pub struct LanceSizeResolver<'a> {
    settings: &'a ExtendedLancesSettings,
}

impl<'a> LanceSizeResolver<'a> {
    /// Create a resolver over the given settings.
    #[must_use]
    pub const fn new(settings: &'a ExtendedLancesSettings) -> Self {
        Self { settings }
    }

    /// First bucket listing `faction`, with its entry.
    #[must_use]
    pub fn find(&self, faction: &str) -> Option<(u32, &'a ExtendedLance)> {
        self.settings
            .lance_sizes
            .iter()
            .find_map(|(size, factions)| {
                factions
                    .iter()
                    .find(|entry| entry.faction == faction)
                    .map(|entry| (*size, entry))
            })
    }

    /// Number of units a lance of `faction` should have.
    #[must_use]
    pub fn resolve_target_size(&self, faction: &str) -> usize {
        self.find(faction)
            .map_or(self.settings.default_lance_size, |(size, _)| size) as usize
    }

    /// Difficulty adjustment for a lance of `faction` currently at `current`.
    #[must_use]
    pub fn resolve_difficulty_adjustment(&self, faction: &str, current: i32) -> i32 {
        self.find(faction)
            .map_or(current, |(_, entry)| current + entry.difficulty_mod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn settings() -> ExtendedLancesSettings {
        let mut lance_sizes = BTreeMap::new();
        lance_sizes.insert(
            6,
            vec![ExtendedLance::new("Locust", 2), ExtendedLance::new("Kurita", 0)],
        );
        lance_sizes.insert(5, vec![ExtendedLance::new("ClanJadeFalcon", -1)]);
        ExtendedLancesSettings {
            lance_sizes,
            ..ExtendedLancesSettings::default()
        }
    }

    #[test]
    fn test_unknown_faction_falls_back() {
        let settings = settings();
        let resolver = LanceSizeResolver::new(&settings);
        assert_eq!(resolver.resolve_target_size("Davion"), 4);
        assert_eq!(resolver.resolve_difficulty_adjustment("Davion", 3), 3);
        assert!(resolver.find("Davion").is_none());
    }

    #[test]
    fn test_known_faction() {
        let settings = settings();
        let resolver = LanceSizeResolver::new(&settings);
        assert_eq!(resolver.resolve_target_size("Locust"), 6);
        assert_eq!(resolver.resolve_difficulty_adjustment("Locust", 0), 2);
        assert_eq!(resolver.resolve_target_size("ClanJadeFalcon"), 5);
        assert_eq!(resolver.resolve_difficulty_adjustment("ClanJadeFalcon", 1), 0);
    }

    #[test]
    fn test_faction_match_is_exact() {
        let settings = settings();
        let resolver = LanceSizeResolver::new(&settings);
        assert_eq!(resolver.resolve_target_size("locust"), 4);
        assert_eq!(resolver.resolve_target_size("Locust "), 4);
    }

    #[test]
    fn test_smallest_bucket_wins_on_duplicates() {
        let mut settings = settings();
        settings
            .lance_sizes
            .insert(8, vec![ExtendedLance::new("Locust", 9)]);
        let resolver = LanceSizeResolver::new(&settings);
        assert_eq!(resolver.resolve_target_size("Locust"), 6);
        assert_eq!(resolver.resolve_difficulty_adjustment("Locust", 0), 2);
    }

    #[test]
    fn test_configured_default_size() {
        let settings = ExtendedLancesSettings {
            default_lance_size: 5,
            ..ExtendedLancesSettings::default()
        };
        assert_eq!(LanceSizeResolver::new(&settings).resolve_target_size("Any"), 5);
    }
}
