//! Conditional stats: a base stat that only counts under certain categories.

use crate::category::CategorySet;

/// Builds the extended id for `base_id` under `conditions`.
///
/// `extended_stat_id("damage", FIRE | PROJECTILE) == "damage_Fire_Projectile"`.
/// The result is stable across runs because [`CategorySet::to_canonical_string`]
/// only depends on which bits are set.
pub fn extended_stat_id(base_id: &str, conditions: CategorySet) -> String {
    format!("{}_{}", base_id, conditions.to_canonical_string())
}

/// Metadata record for one conditional registration.
///
/// The alias `extended_id → base_id` is the source of truth for routing; this
/// record keeps the conditions and display suffix for gating and enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalStatDefinition {
    pub base_id: String,
    pub conditions: CategorySet,
    pub suffix: String,
    pub extended_id: String,
}

impl ConditionalStatDefinition {
    /// True if `current` carries every required category.
    pub fn applies_to(&self, current: CategorySet) -> bool {
        current.contains_all(self.conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_id_is_base_plus_canonical_categories() {
        assert_eq!(
            extended_stat_id("damage", CategorySet::PROJECTILE | CategorySet::FIRE),
            "damage_Fire_Projectile"
        );
        assert_eq!(extended_stat_id("speed", CategorySet::SPELL), "speed_Spell");
    }

    #[test]
    fn applies_to_requires_all_conditions() {
        let record = ConditionalStatDefinition {
            base_id: "damage".into(),
            conditions: CategorySet::FIRE | CategorySet::PROJECTILE,
            suffix: "Fire Projectile".into(),
            extended_id: "damage_Fire_Projectile".into(),
        };

        assert!(!record.applies_to(CategorySet::FIRE));
        assert!(!record.applies_to(CategorySet::PROJECTILE));
        assert!(record.applies_to(CategorySet::FIRE | CategorySet::PROJECTILE));
        assert!(record.applies_to(CategorySet::ATTACK | CategorySet::FIRE | CategorySet::PROJECTILE));
    }
}
