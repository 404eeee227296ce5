//! Runtime stat instance: base value, active categories, modifiers and a cached value.
//!
//! # Formula
//!
//! ```text
//! raw   = (base + Σ additive) × (1 + Σ percentage / 100) × Π multiplicative
//! value = clamp(raw, min, max), rounded when the stat is integral
//! ```
//!
//! The order `Additive → PercentageAdditive → Multiplicative` is fixed. Within one
//! mode modifiers commute, and they are always visited in modifier-id order so
//! the result never depends on insertion order.
//!
//! Modifiers attached through an extended id carry the categories that gate them;
//! they only count while [`Stat::active_categories`] contains all of those.

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::category::CategorySet;
use crate::definition::StatDefinition;
use crate::modifier::{ModifierMode, StatModifier};

/// A modifier as stored on a stat, with its gating categories.
#[derive(Clone, Debug, PartialEq)]
struct AttachedModifier {
    modifier: StatModifier,
    conditions: Option<CategorySet>,
}

impl AttachedModifier {
    fn is_eligible(&self, active: CategorySet) -> bool {
        self.conditions
            .is_none_or(|conditions| active.contains_all(conditions))
    }
}

/// Intermediate sums of one evaluation, for tooltips and debugging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatBreakdown {
    pub base: f64,
    pub additive: f64,
    pub percentage: f64,
    pub multiplier: f64,
    /// Value before clamping and rounding.
    pub raw: f64,
    pub value: f64,
}

/// The live value of one stat for one owner.
#[derive(Clone, Debug)]
pub struct Stat {
    definition: StatDefinition,
    base_value: f64,
    active_categories: CategorySet,
    modifiers: BTreeMap<String, AttachedModifier>,
    cached: Cell<Option<f64>>,
}

impl Stat {
    /// Create a stat at its definition's default, with the definition's categories active.
    ///
    /// Definitions that fail [`StatDefinition::validate`] are logged; their
    /// values are left unclamped.
    pub fn new(definition: &StatDefinition) -> Self {
        if let Err(err) = definition.validate() {
            tracing::warn!("Stat created from an invalid definition: {}", err);
        }
        Self {
            definition: definition.clone(),
            base_value: definition.default_value,
            active_categories: definition.categories,
            modifiers: BTreeMap::new(),
            cached: Cell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn definition(&self) -> &StatDefinition {
        &self.definition
    }

    /// Categories declared by the definition; unaffected by [`Self::set_categories`].
    pub fn categories(&self) -> CategorySet {
        self.definition.categories
    }

    pub fn active_categories(&self) -> CategorySet {
        self.active_categories
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn set_base_value(&mut self, value: f64) {
        self.base_value = value;
        self.invalidate();
    }

    /// Restores the definition's default base value.
    pub fn reset_base_value(&mut self) {
        self.set_base_value(self.definition.default_value);
    }

    // ===== categories =====

    /// Replaces the active categories, switching conditional modifiers on or off.
    pub fn set_categories(&mut self, categories: CategorySet) {
        self.active_categories = categories;
        self.invalidate();
    }

    pub fn add_categories(&mut self, categories: CategorySet) {
        self.set_categories(self.active_categories | categories);
    }

    pub fn remove_categories(&mut self, categories: CategorySet) {
        self.set_categories(self.active_categories - categories);
    }

    // ===== modifiers =====

    /// Attaches an unconditional modifier, replacing one with the same id.
    ///
    /// The modifier must target this stat's own id and carry no duration.
    /// Aliases, extended ids and timed modifiers go through
    /// [`crate::StatCollection::add_modifier`], which resolves gates and
    /// schedules expiry; anything else is logged and ignored.
    pub fn add_modifier(&mut self, modifier: StatModifier) -> Option<StatModifier> {
        if modifier.stat_id != self.definition.id {
            tracing::warn!(
                stat_id = %self.definition.id,
                "Modifier `{}` targets `{}`; attach it through its collection",
                modifier.id,
                modifier.stat_id
            );
            return None;
        }
        if modifier.duration.is_some() {
            tracing::warn!(
                stat_id = %self.definition.id,
                "Timed modifier `{}` ignored; attach it through its collection",
                modifier.id
            );
            return None;
        }
        self.attach(modifier, None)
    }

    /// Stores `modifier` with its gate. Routing and scheduling are the caller's job.
    pub(crate) fn attach(
        &mut self,
        modifier: StatModifier,
        conditions: Option<CategorySet>,
    ) -> Option<StatModifier> {
        let id = modifier.id.clone();
        let previous = self
            .modifiers
            .insert(id, AttachedModifier { modifier, conditions });
        self.invalidate();
        previous.map(|attached| attached.modifier)
    }

    /// Removes a modifier by id.
    pub fn remove_modifier(&mut self, modifier_id: &str) -> Option<StatModifier> {
        let removed = self.modifiers.remove(modifier_id)?;
        self.invalidate();
        Some(removed.modifier)
    }

    /// Removes every modifier tagged with `source`, returning them.
    pub fn remove_modifiers_from_source(&mut self, source: &str) -> Vec<StatModifier> {
        let ids: Vec<String> = self
            .modifiers
            .values()
            .filter(|attached| attached.modifier.source == source)
            .map(|attached| attached.modifier.id.clone())
            .collect();

        if ids.is_empty() {
            return Vec::new();
        }

        let removed: Vec<StatModifier> = ids
            .iter()
            .filter_map(|id| self.modifiers.remove(id))
            .map(|attached| attached.modifier)
            .collect();
        self.invalidate();
        removed
    }

    pub fn clear_modifiers(&mut self) {
        if !self.modifiers.is_empty() {
            self.modifiers.clear();
            self.invalidate();
        }
    }

    pub fn modifier(&self, modifier_id: &str) -> Option<&StatModifier> {
        self.modifiers
            .get(modifier_id)
            .map(|attached| &attached.modifier)
    }

    /// Attached modifiers in id order, eligible or not.
    pub fn modifiers(&self) -> impl Iterator<Item = &StatModifier> + '_ {
        self.modifiers.values().map(|attached| &attached.modifier)
    }

    pub fn has_modifier(&self, modifier_id: &str) -> bool {
        self.modifiers.contains_key(modifier_id)
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// True if the modifier is attached and its conditions are currently met.
    pub fn is_modifier_active(&self, modifier_id: &str) -> bool {
        self.modifiers
            .get(modifier_id)
            .is_some_and(|attached| attached.is_eligible(self.active_categories))
    }

    // ===== value =====

    /// The computed value, memoized until the next mutation.
    pub fn value(&self) -> f64 {
        if let Some(value) = self.cached.get() {
            return value;
        }
        let value = self.breakdown().value;
        self.cached.set(Some(value));
        value
    }

    /// Evaluates the formula without touching the cache.
    pub fn breakdown(&self) -> StatBreakdown {
        let mut additive = 0.0;
        let mut percentage = 0.0;
        let mut multiplier = 1.0;

        for attached in self
            .modifiers
            .values()
            .filter(|attached| attached.is_eligible(self.active_categories))
        {
            let value = attached.modifier.value;
            match attached.modifier.mode {
                ModifierMode::Additive => additive += value,
                ModifierMode::PercentageAdditive => percentage += value,
                ModifierMode::Multiplicative => multiplier *= value,
            }
        }

        let raw = (self.base_value + additive) * (1.0 + percentage / 100.0) * multiplier;

        StatBreakdown {
            base: self.base_value,
            additive,
            percentage,
            multiplier,
            raw,
            value: self.definition.clamp_value(raw),
        }
    }

    /// True if the next [`Self::value`] call will recompute.
    pub fn is_dirty(&self) -> bool {
        self.cached.get().is_none()
    }

    /// Formats the current value with the definition's display template.
    pub fn format_value(&self, precision: usize) -> String {
        self.definition.format_value(self.value(), precision)
    }

    fn invalidate(&mut self) {
        *self.cached.get_mut() = None;
    }
}
