//! Proptest strategies for encounter data.

use encounter_core::config::{ExtendedLance, ExtendedLancesSettings};
use encounter_core::math::Vec3;
use proptest::prelude::*;

/// Factions used by the generated bucket tables.
pub const FACTIONS: &[&str] = &["Locust", "Davion", "Kurita", "Liao", "Marik", "Steiner"];

/// Faction name from [`FACTIONS`].
pub fn arb_faction() -> impl Strategy<Value = String> {
    proptest::sample::select(FACTIONS).prop_map(str::to_string)
}

/// Faction name guaranteed not to appear in [`FACTIONS`].
pub fn arb_unknown_faction() -> impl Strategy<Value = String> {
    "[a-z]{3,10}".prop_map(|name| format!("Unknown_{name}"))
}

/// Lance-size bucket key.
pub fn arb_lance_size() -> impl Strategy<Value = u32> {
    1u32..=12
}

/// Difficulty modifier.
pub fn arb_difficulty_mod() -> impl Strategy<Value = i32> {
    -5i32..=5
}

/// Authored lance difficulty adjustment.
pub fn arb_difficulty_adjustment() -> impl Strategy<Value = i32> {
    -10i32..=10
}

/// Bucket table where each faction appears at most once.
pub fn arb_extended_lances() -> impl Strategy<Value = ExtendedLancesSettings> {
    (
        proptest::collection::vec((arb_lance_size(), arb_difficulty_mod()), FACTIONS.len()),
        proptest::collection::vec(any::<bool>(), FACTIONS.len()),
    )
    .prop_map(|(entries, listed)| {
        let mut settings = ExtendedLancesSettings::default();
        for ((faction, (size, difficulty_mod)), keep) in FACTIONS.iter().zip(entries).zip(listed) {
            if keep {
                settings
                    .lance_sizes
                    .entry(size)
                    .or_default()
                    .push(ExtendedLance::new(*faction, difficulty_mod));
            }
        }
        settings
    })
}

/// Ground position within a typical encounter area.
pub fn arb_ground_position() -> impl Strategy<Value = Vec3> {
    (-2000.0f32..2000.0, -50.0f32..50.0, -2000.0f32..2000.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

/// Existing and required unit counts for one lance, existing in `1..=6`.
pub fn arb_unit_counts() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=6).prop_flat_map(|existing| (Just(existing), existing..=existing + 6))
}
