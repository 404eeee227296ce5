//! The set of live stats owned by one entity.
//!
//! A collection is bound to one [`StatRegistry`] for its whole life. Every id it
//! receives (stat ids, alias ids, extended ids) is normalized through that
//! registry, so all spellings of a stat reach the same [`Stat`] instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::category::CategorySet;
use crate::modifier::{ModifierMode, StatModifier};
use crate::registry::StatRegistry;
use crate::stat::Stat;
use crate::timed::TimedModifierManager;

/// Live stats for one owner.
#[derive(Clone, Debug)]
pub struct StatCollection {
    owner_name: String,
    registry: Arc<StatRegistry>,
    stats: BTreeMap<String, Stat>,
    timers: TimedModifierManager,
    next_temporary_id: u64,
}

impl StatCollection {
    /// Creates an empty collection bound to `registry`.
    ///
    /// `owner_name` is only used in diagnostics.
    pub fn new(owner_name: impl Into<String>, registry: Arc<StatRegistry>) -> Self {
        Self {
            owner_name: owner_name.into(),
            registry,
            stats: BTreeMap::new(),
            timers: TimedModifierManager::new(),
            next_temporary_id: 0,
        }
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn registry(&self) -> &StatRegistry {
        &self.registry
    }

    // ========================================================================
    // Stats
    // ========================================================================

    /// Returns the stat for `id`, creating it from the registry on first use.
    ///
    /// Unknown ids get a temporary definition (default 0, unbounded).
    pub fn get_or_create_stat(&mut self, id: &str) -> &mut Stat {
        let key = self.registry.normalize_id(id).into_owned();
        self.stat_entry(key)
    }

    /// Returns the stat stored under an already-normalized key.
    fn stat_entry(&mut self, key: String) -> &mut Stat {
        let registry = &self.registry;
        let owner = &self.owner_name;

        self.stats.entry(key).or_insert_with_key(|key| {
            let stat = match registry.definition(key) {
                Some(definition) => Stat::new(definition),
                None => {
                    tracing::debug!(
                        "{}: stat `{}` is not registered, using a temporary definition",
                        owner,
                        key
                    );
                    Stat::new(&registry.create_temporary_definition(key))
                }
            };
            tracing::trace!("{}: created stat `{}`", owner, key);
            stat
        })
    }

    /// Looks up an existing stat without creating it.
    pub fn stat(&self, id: &str) -> Option<&Stat> {
        self.stats.get(self.registry.normalize_id(id).as_ref())
    }

    /// Mutable lookup of an existing stat without creating it.
    pub fn stat_mut(&mut self, id: &str) -> Option<&mut Stat> {
        let key = self.registry.normalize_id(id).into_owned();
        self.stats.get_mut(&key)
    }

    pub fn contains_stat(&self, id: &str) -> bool {
        self.stat(id).is_some()
    }

    /// Owned stats in id order.
    pub fn stats(&self) -> impl Iterator<Item = &Stat> + '_ {
        self.stats.values()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Sets the base value, creating the stat if needed.
    pub fn set_base_value(&mut self, id: &str, value: f64) {
        self.get_or_create_stat(id).set_base_value(value);
    }

    /// The computed value, creating the stat if needed.
    pub fn get_value(&mut self, id: &str) -> f64 {
        self.get_or_create_stat(id).value()
    }

    /// The computed value of an existing stat.
    pub fn value(&self, id: &str) -> Option<f64> {
        self.stat(id).map(Stat::value)
    }

    /// Replaces the active categories of a stat, creating it if needed.
    pub fn set_categories(&mut self, id: &str, categories: CategorySet) {
        self.get_or_create_stat(id).set_categories(categories);
    }

    /// Owned stats whose definition categories overlap `category`.
    ///
    /// Runtime changes made with [`Stat::set_categories`] are not considered.
    pub fn get_stats_by_category(&self, category: CategorySet) -> Vec<&Stat> {
        self.stats
            .values()
            .filter(|stat| stat.definition().belongs_to_category(category))
            .collect()
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Attaches `modifier` to the stat its target resolves to.
    ///
    /// Targets that are extended ids attach gated by their conditions. A
    /// modifier with a `duration` is scheduled for removal.
    pub fn add_modifier(&mut self, modifier: StatModifier) {
        if modifier.id.is_empty() || modifier.stat_id.is_empty() {
            tracing::warn!(
                "{}: ignoring modifier with an empty id or target ({:?} -> {:?})",
                self.owner_name,
                modifier.id,
                modifier.stat_id
            );
            return;
        }

        let key = self.registry.normalize_id(&modifier.stat_id).into_owned();
        let conditions = self.registry.conditions_for(&modifier.stat_id);
        let modifier_id = modifier.id.clone();
        let duration = modifier.duration;

        let stat = self.stat_entry(key.clone());
        debug_assert_eq!(stat.id(), key, "modifier routed to the wrong stat");

        let replaced = stat.attach(modifier, conditions);
        if replaced.is_some() {
            tracing::debug!(
                "{}: modifier `{}` on `{}` replaced",
                self.owner_name,
                modifier_id,
                key
            );
        }

        match duration {
            Some(seconds) if seconds.is_finite() => {
                self.timers.schedule(&key, &modifier_id, seconds);
            }
            Some(seconds) => {
                tracing::warn!(
                    "{}: modifier `{}` has non-finite duration {}; keeping it permanently",
                    self.owner_name,
                    modifier_id,
                    seconds
                );
                self.timers.cancel(&key, &modifier_id);
            }
            None => {
                self.timers.cancel(&key, &modifier_id);
            }
        }
    }

    /// Removes a modifier from the stat `stat_id` resolves to.
    pub fn remove_modifier(&mut self, stat_id: &str, modifier_id: &str) -> bool {
        let key = self.registry.normalize_id(stat_id).into_owned();
        self.timers.cancel(&key, modifier_id);
        self.stats
            .get_mut(&key)
            .and_then(|stat| stat.remove_modifier(modifier_id))
            .is_some()
    }

    /// Removes a modifier by id from whichever stat holds it.
    pub fn remove_modifier_by_id(&mut self, modifier_id: &str) -> bool {
        let holder = self
            .stats
            .iter_mut()
            .find(|(_, stat)| stat.has_modifier(modifier_id));

        match holder {
            Some((key, stat)) => {
                stat.remove_modifier(modifier_id);
                self.timers.cancel(key, modifier_id);
                true
            }
            None => false,
        }
    }

    /// Removes every modifier tagged with `source` across all stats.
    ///
    /// Returns how many modifiers were removed.
    pub fn remove_modifiers_from_source(&mut self, source: &str) -> usize {
        let mut removed = 0;
        for (key, stat) in &mut self.stats {
            for modifier in stat.remove_modifiers_from_source(source) {
                self.timers.cancel(key, &modifier.id);
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(
                "{}: removed {} modifier(s) from source `{}`",
                self.owner_name,
                removed,
                source
            );
        }
        removed
    }

    // ========================================================================
    // Temporary modifiers
    // ========================================================================

    /// Adds a flat bonus that expires after `duration` seconds.
    ///
    /// Returns the generated modifier id.
    pub fn add_temporary_modifier(
        &mut self,
        stat_id: &str,
        value: f64,
        duration: f64,
        source: &str,
    ) -> String {
        self.add_temporary(stat_id, value, ModifierMode::Additive, duration, source)
    }

    /// Adds a percentage bonus (`50.0` = +50%) that expires after `duration` seconds.
    pub fn add_temporary_percentage(
        &mut self,
        stat_id: &str,
        percent: f64,
        duration: f64,
        source: &str,
    ) -> String {
        self.add_temporary(
            stat_id,
            percent,
            ModifierMode::PercentageAdditive,
            duration,
            source,
        )
    }

    /// Adds a multiplier (`1.2` = ×1.2) that expires after `duration` seconds.
    pub fn add_temporary_multiplier(
        &mut self,
        stat_id: &str,
        factor: f64,
        duration: f64,
        source: &str,
    ) -> String {
        self.add_temporary(
            stat_id,
            factor,
            ModifierMode::Multiplicative,
            duration,
            source,
        )
    }

    fn add_temporary(
        &mut self,
        stat_id: &str,
        value: f64,
        mode: ModifierMode,
        duration: f64,
        source: &str,
    ) -> String {
        self.next_temporary_id += 1;
        let modifier_id = format!("{}_temp_{}", stat_id, self.next_temporary_id);

        self.add_modifier(
            StatModifier::new(modifier_id.clone(), stat_id, value, mode)
                .with_source(source)
                .with_duration(duration),
        );
        modifier_id
    }

    /// Seconds left on a temporary modifier of the stat `stat_id` resolves to.
    pub fn remaining_duration(&self, stat_id: &str, modifier_id: &str) -> Option<f64> {
        let key = self.registry.normalize_id(stat_id);
        let timed = self
            .stats
            .get(key.as_ref())
            .and_then(|stat| stat.modifier(modifier_id))
            .is_some_and(|modifier| modifier.duration.is_some());
        if !timed {
            return None;
        }
        self.timers.remaining(&key, modifier_id)
    }

    /// The expiry schedule of this collection.
    pub fn timers(&self) -> &TimedModifierManager {
        &self.timers
    }

    /// Advances simulation time and removes every modifier that expired.
    ///
    /// Returns how many modifiers were removed.
    pub fn advance_time(&mut self, delta: f64) -> usize {
        let mut removed = 0;
        for expiry in self.timers.advance(delta) {
            let Some(stat) = self.stats.get_mut(&expiry.stat_id) else {
                continue;
            };
            // The slot may have been emptied and refilled with a permanent
            // modifier through `stat_mut`.
            let still_timed = stat
                .modifier(&expiry.modifier_id)
                .is_some_and(|modifier| modifier.duration.is_some());
            if still_timed && stat.remove_modifier(&expiry.modifier_id).is_some() {
                tracing::debug!(
                    "{}: modifier `{}` on `{}` expired at t={:.3}",
                    self.owner_name,
                    expiry.modifier_id,
                    expiry.stat_id,
                    expiry.expires_at
                );
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::StatDefinition;

    fn registry() -> Arc<StatRegistry> {
        let mut registry = StatRegistry::new();
        registry
            .register(
                StatDefinition::new("health", "Health")
                    .with_default(100.0)
                    .with_bounds(0.0, 10_000.0)
                    .with_categories(CategorySet::RESOURCE | CategorySet::DEFENSE)
                    .with_alias("hp"),
            )
            .unwrap();
        registry
            .register(
                StatDefinition::new("damage", "Damage")
                    .with_default(100.0)
                    .with_categories(CategorySet::DAMAGE | CategorySet::OFFENSE)
                    .with_extension(CategorySet::FIRE, "Fire"),
            )
            .unwrap();
        Arc::new(registry)
    }

    #[test]
    fn aliases_reach_the_same_stat() {
        let mut stats = StatCollection::new("hero", registry());
        stats.set_base_value("hp", 250.0);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get_value("health"), 250.0);
        assert_eq!(stats.stat("hp").unwrap().id(), "health");
    }

    #[test]
    fn unknown_stat_uses_a_temporary_definition() {
        let mut stats = StatCollection::new("hero", registry());
        assert_eq!(stats.get_value("luck"), 0.0);
        assert!(stats.contains_stat("luck"));
        assert!(!stats.registry().is_stat_registered("luck"));
    }

    #[test]
    fn modifiers_route_through_aliases() {
        let mut stats = StatCollection::new("hero", registry());
        stats.add_modifier(StatModifier::additive("belt", "hp", 50.0).with_source("belt"));

        assert_eq!(stats.get_value("health"), 150.0);
        assert!(stats.remove_modifier("hp", "belt"));
        assert!(!stats.remove_modifier("hp", "belt"));
        assert_eq!(stats.get_value("health"), 100.0);
    }

    #[test]
    fn extended_target_is_gated_by_categories() {
        let mut stats = StatCollection::new("hero", registry());
        stats.add_modifier(StatModifier::percentage("ember", "damage_Fire", 50.0));

        assert_eq!(stats.get_value("damage"), 100.0);
        stats.set_categories("damage", CategorySet::DAMAGE | CategorySet::FIRE);
        assert_eq!(stats.get_value("damage"), 150.0);
    }

    #[test]
    fn remove_by_id_and_by_source_span_all_stats() {
        let mut stats = StatCollection::new("hero", registry());
        stats.add_modifier(StatModifier::additive("a", "health", 1.0).with_source("set"));
        stats.add_modifier(StatModifier::additive("b", "damage", 1.0).with_source("set"));
        stats.add_modifier(StatModifier::additive("c", "damage", 1.0).with_source("gem"));

        assert_eq!(stats.remove_modifiers_from_source("set"), 2);
        assert!(stats.remove_modifier_by_id("c"));
        assert!(!stats.remove_modifier_by_id("c"));
        assert_eq!(stats.get_value("damage"), 100.0);
        assert_eq!(stats.get_value("health"), 100.0);
    }

    #[test]
    fn stats_by_category_uses_definition_categories() {
        let mut stats = StatCollection::new("hero", registry());
        stats.get_or_create_stat("health");
        stats.set_categories("damage", CategorySet::DEFENSE);

        let defensive: Vec<_> = stats
            .get_stats_by_category(CategorySet::DEFENSE)
            .iter()
            .map(|stat| stat.id())
            .collect();
        assert_eq!(defensive, vec!["health"]);
    }

    #[test]
    fn temporary_modifiers_expire_with_simulation_time() {
        let mut stats = StatCollection::new("hero", registry());
        let first = stats.add_temporary_modifier("damage", 20.0, 2.0, "potion");
        let second = stats.add_temporary_percentage("damage", 50.0, 4.0, "shout");
        let third = stats.add_temporary_multiplier("damage", 2.0, 6.0, "frenzy");

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(stats.get_value("damage"), 360.0);

        assert_eq!(stats.advance_time(2.0), 1);
        assert_eq!(stats.get_value("damage"), 300.0);
        assert_eq!(stats.remaining_duration("damage", &second), Some(2.0));

        assert_eq!(stats.advance_time(2.0), 1);
        assert_eq!(stats.get_value("damage"), 200.0);

        assert_eq!(stats.advance_time(10.0), 1);
        assert_eq!(stats.get_value("damage"), 100.0);
        assert!(stats.timers().is_empty());
    }

    #[test]
    fn direct_stat_access_cannot_bypass_gating_or_routing() {
        let mut stats = StatCollection::new("hero", registry());
        let damage = stats.get_or_create_stat("damage");
        damage.add_modifier(StatModifier::percentage("ember", "damage_Fire", 50.0));
        damage.add_modifier(StatModifier::additive("hp_belt", "health", 10.0));

        assert_eq!(damage.modifier_count(), 0);
        assert_eq!(stats.get_value("damage"), 100.0);
        assert_eq!(stats.get_value("health"), 100.0);
    }

    #[test]
    fn timed_modifiers_require_the_collection() {
        let mut stats = StatCollection::new("hero", registry());
        stats
            .get_or_create_stat("damage")
            .add_modifier(StatModifier::additive("pot", "damage", 10.0).with_duration(1.0));
        assert_eq!(stats.get_value("damage"), 100.0);

        stats.add_modifier(StatModifier::additive("pot", "damage", 10.0).with_duration(1.0));
        assert_eq!(stats.get_value("damage"), 110.0);
        assert_eq!(stats.advance_time(5.0), 1);
        assert_eq!(stats.get_value("damage"), 100.0);
    }

    #[test]
    fn stale_expiry_spares_a_modifier_readded_on_the_stat() {
        let mut stats = StatCollection::new("hero", registry());
        let id = stats.add_temporary_modifier("damage", 5.0, 1.0, "potion");

        let damage = stats.stat_mut("damage").unwrap();
        damage.remove_modifier(&id);
        damage.add_modifier(StatModifier::additive(id.clone(), "damage", 7.0));

        assert_eq!(stats.remaining_duration("damage", &id), None);
        assert_eq!(stats.advance_time(2.0), 0);
        assert_eq!(stats.get_value("damage"), 107.0);
    }

    #[test]
    fn remaining_duration_is_per_stat() {
        let mut stats = StatCollection::new("hero", registry());
        stats.add_modifier(StatModifier::additive("buff", "damage", 1.0).with_duration(2.0));
        stats.add_modifier(StatModifier::additive("buff", "hp", 1.0).with_duration(6.0));

        assert_eq!(stats.remaining_duration("damage", "buff"), Some(2.0));
        assert_eq!(stats.remaining_duration("health", "buff"), Some(6.0));
        assert_eq!(stats.remaining_duration("damage", "missing"), None);
    }

    #[test]
    fn removing_a_timed_modifier_cancels_its_expiry() {
        let mut stats = StatCollection::new("hero", registry());
        let id = stats.add_temporary_modifier("damage", 5.0, 1.0, "potion");
        assert!(stats.remove_modifier("damage", &id));
        assert!(stats.timers().is_empty());

        // A permanent modifier re-using the id must survive the old schedule.
        stats.add_modifier(StatModifier::additive(id.clone(), "damage", 5.0));
        assert_eq!(stats.advance_time(5.0), 0);
        assert_eq!(stats.get_value("damage"), 105.0);
    }
}
