//! The canonical catalog of stat definitions.
//!
//! The registry owns three tables:
//!
//! - **definitions**: real stat ids → [`StatDefinition`]
//! - **aliases**: alternate id → real id (one hop, never chained)
//! - **conditional stats**: base id → `(conditions, suffix)` records, each of which
//!   also files an extended id (`base_Fire`) as an alias of the base
//!
//! Caller mistakes (empty ids, unknown base stats, empty conditions) are logged
//! with `tracing::warn!` and ignored. Only definitions that break an invariant
//! are rejected with a [`DefinitionError`].
//!
//! Build the registry during setup, then share it read-only with every
//! [`crate::StatCollection`] through an `Arc`.

mod conditional;

pub use conditional::{ConditionalStatDefinition, extended_stat_id};

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::category::CategorySet;
use crate::config::StatConfig;
use crate::definition::StatDefinition;
use crate::error::DefinitionError;

/// Catalog of stat definitions, aliases and conditional stats.
#[derive(Clone, Debug, Default)]
pub struct StatRegistry {
    config: StatConfig,
    definitions: BTreeMap<String, StatDefinition>,
    aliases: BTreeMap<String, String>,
    conditional: BTreeMap<String, Vec<ConditionalStatDefinition>>,
}

impl StatRegistry {
    /// Creates an empty registry with the default [`StatConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with an explicit configuration.
    pub fn with_config(config: StatConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &StatConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers (or updates) a stat from its parts.
    ///
    /// Shorthand for [`Self::register`] with a definition that carries no
    /// aliases or extensions of its own.
    pub fn register_stat(
        &mut self,
        id: &str,
        display_name: &str,
        default_value: f64,
        min_value: f64,
        max_value: f64,
        categories: CategorySet,
    ) -> Result<(), DefinitionError> {
        self.register(
            StatDefinition::new(id, display_name)
                .with_default(default_value)
                .with_bounds(min_value, max_value)
                .with_categories(categories),
        )
    }

    /// Idempotent upsert of a definition.
    ///
    /// An existing id keeps its stored definition, whose fields are overwritten;
    /// aliases and extensions are merged. Every alias and extension carried by
    /// the stored definition is then (re-)registered.
    pub fn register(&mut self, mut definition: StatDefinition) -> Result<(), DefinitionError> {
        if definition.id.trim().is_empty() {
            tracing::warn!(
                "Ignoring stat definition with an empty id (display name {:?})",
                definition.display_name
            );
            return Ok(());
        }

        definition.id = self.fold(&definition.id).into_owned();
        definition.validate()?;

        if definition.categories.is_none() && self.config.warn_uncategorized {
            tracing::warn!(
                stat_id = %definition.id,
                "Stat registered without categories; category queries will never match it"
            );
        }

        if !(definition.min_value..=definition.max_value).contains(&definition.default_value) {
            tracing::warn!(
                stat_id = %definition.id,
                "Default value {} lies outside [{}, {}] and will be clamped",
                definition.default_value,
                definition.min_value,
                definition.max_value
            );
        }

        if let Some(target) = self.aliases.remove(&definition.id) {
            tracing::warn!(
                "Stat `{}` was an alias of `{}`; the real definition replaces it",
                definition.id,
                target
            );
        }

        let id = definition.id.clone();
        match self.definitions.get_mut(&id) {
            Some(existing) => {
                merge_definition(existing, definition);
                tracing::debug!("Updated stat definition `{}`", id);
            }
            None => {
                self.definitions.insert(id.clone(), definition);
                tracing::debug!("Registered stat definition `{}`", id);
            }
        }

        self.materialize_declarations(&id);
        Ok(())
    }

    /// Files the aliases and extensions declared on a stored definition.
    fn materialize_declarations(&mut self, id: &str) {
        let Some(definition) = self.definitions.get(id) else {
            return;
        };
        let aliases = definition.aliases.clone();
        let extensions = definition.extensions.clone();

        for alias in &aliases {
            self.register_alias(alias, id);
        }
        for extension in &extensions {
            self.register_conditional_stat(id, extension.required, &extension.suffix);
        }
    }

    /// Registers `alias_id` as another name for `target_id`.
    ///
    /// No-op (with a warning) when either id is empty or when `alias_id` already
    /// names a real stat: aliases never shadow definitions.
    pub fn register_alias(&mut self, alias_id: &str, target_id: &str) {
        if alias_id.trim().is_empty() || target_id.trim().is_empty() {
            tracing::warn!(
                "Ignoring alias with an empty id: {:?} -> {:?}",
                alias_id,
                target_id
            );
            return;
        }

        let alias = self.fold(alias_id).into_owned();
        let target = self.fold(target_id).into_owned();

        if self.definitions.contains_key(&alias) {
            tracing::warn!(
                "Alias `{}` -> `{}` ignored: `{}` is a registered stat",
                alias,
                target,
                alias
            );
            return;
        }
        if alias == target {
            tracing::warn!("Alias `{}` ignored: it points at itself", alias);
            return;
        }
        if !self.definitions.contains_key(&target) {
            tracing::debug!(
                "Alias `{}` targets `{}`, which is not a registered stat",
                alias,
                target
            );
        }

        match self.aliases.insert(alias.clone(), target.clone()) {
            Some(previous) if previous != target => {
                tracing::warn!(
                    "Alias `{}` retargeted from `{}` to `{}`",
                    alias,
                    previous,
                    target
                );
            }
            _ => tracing::trace!("Alias `{}` -> `{}`", alias, target),
        }
    }

    /// Registers a conditional variant of `base_id` that applies only while
    /// the stat carries every category in `conditions`.
    ///
    /// Duplicate `(conditions, suffix)` pairs are ignored. The extended id is
    /// filed as an alias of the base unless it already names an alias or stat.
    pub fn register_conditional_stat(&mut self, base_id: &str, conditions: CategorySet, suffix: &str) {
        let base = self.normalize_id(base_id).into_owned();

        if !self.definitions.contains_key(&base) {
            tracing::warn!(
                "Conditional stat for `{}` ignored: base stat is not registered",
                base_id
            );
            return;
        }
        if conditions.is_none() {
            tracing::warn!(
                "Conditional stat for `{}` ignored: conditions must name at least one category",
                base
            );
            return;
        }
        if conditions.has_unknown_bits() {
            tracing::warn!(
                "Conditional stat for `{}` ignored: conditions {:#x} contain undeclared categories",
                base,
                conditions.bits()
            );
            return;
        }

        let extended_id = self.extended_id(&base, conditions);
        let records = self.conditional.entry(base.clone()).or_default();
        if records
            .iter()
            .any(|record| record.conditions == conditions && record.suffix == suffix)
        {
            tracing::trace!("Conditional stat `{}` already registered", extended_id);
            return;
        }

        records.push(ConditionalStatDefinition {
            base_id: base.clone(),
            conditions,
            suffix: suffix.to_string(),
            extended_id: extended_id.clone(),
        });

        if self.definitions.contains_key(&extended_id) {
            tracing::debug!(
                "Extended id `{}` is already a registered stat; leaving it as is",
                extended_id
            );
        } else if let Some(target) = self.aliases.get(&extended_id) {
            if *target != base {
                tracing::warn!(
                    "Extended id `{}` already aliases `{}`, not `{}`",
                    extended_id,
                    target,
                    base
                );
            }
        } else {
            tracing::debug!("Conditional stat `{}` -> `{}`", extended_id, base);
            self.aliases.insert(extended_id, base);
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Resolves one level of alias indirection.
    ///
    /// Returns the alias target if `id` is a known alias, otherwise `id`
    /// itself (case-folded under [`crate::IdCasePolicy::Insensitive`]).
    /// Aliases are not followed transitively.
    pub fn normalize_id<'a>(&'a self, id: &'a str) -> Cow<'a, str> {
        let key = self.fold(id);
        match self.aliases.get(key.as_ref()) {
            Some(target) => Cow::Borrowed(target.as_str()),
            None => key,
        }
    }

    /// Builds the extended id for `base_id` under `conditions`, honouring the
    /// registry's case policy.
    pub fn extended_id(&self, base_id: &str, conditions: CategorySet) -> String {
        let id = extended_stat_id(&self.fold(base_id), conditions);
        self.fold(&id).into_owned()
    }

    /// Looks up the definition for `id` after alias resolution.
    pub fn get_definition(&self, id: &str) -> Option<&StatDefinition> {
        self.definitions.get(self.normalize_id(id).as_ref())
    }

    /// Looks up a real definition by its own id, without alias resolution.
    pub fn definition(&self, id: &str) -> Option<&StatDefinition> {
        self.definitions.get(self.fold(id).as_ref())
    }

    /// A throwaway definition for ids the registry has never seen.
    ///
    /// The definition is uncategorized, unbounded, defaults to zero and is
    /// never stored in the registry.
    pub fn create_temporary_definition(&self, id: &str) -> StatDefinition {
        tracing::debug!("Creating temporary definition for unknown stat `{}`", id);
        StatDefinition::new(self.fold(id), id)
    }

    /// True if `id` (or the stat it aliases) has a real definition.
    pub fn is_stat_registered(&self, id: &str) -> bool {
        self.get_definition(id).is_some()
    }

    /// True if `id` is a registered alias (including extended ids).
    pub fn is_alias(&self, id: &str) -> bool {
        self.aliases.contains_key(self.fold(id).as_ref())
    }

    /// Every conditional record filed under `base_id`.
    pub fn get_conditional_stats(&self, base_id: &str) -> &[ConditionalStatDefinition] {
        self.conditional
            .get(self.normalize_id(base_id).as_ref())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Conditional records of `base_id` whose conditions are all present in
    /// `current_categories`.
    pub fn get_applicable_conditional_stats(
        &self,
        base_id: &str,
        current_categories: CategorySet,
    ) -> Vec<&ConditionalStatDefinition> {
        self.get_conditional_stats(base_id)
            .iter()
            .filter(|record| record.applies_to(current_categories))
            .collect()
    }

    /// The categories gating a modifier that targets `target_id`.
    ///
    /// `None` means the target is unconditional: the base id itself, a plain
    /// alias, or an id the registry does not know.
    pub fn conditions_for(&self, target_id: &str) -> Option<CategorySet> {
        let key = self.fold(target_id);
        let base = self.aliases.get(key.as_ref())?;

        self.conditional
            .get(base)?
            .iter()
            .find(|record| record.extended_id == key.as_ref())
            .map(|record| record.conditions)
    }

    /// True if the two stats share at least one category.
    pub fn can_affect(&self, source_id: &str, target_id: &str) -> bool {
        match (self.get_definition(source_id), self.get_definition(target_id)) {
            (Some(source), Some(target)) => source.categories.contains_any(target.categories),
            _ => false,
        }
    }

    /// Ids of every real stat whose categories overlap `target_categories`.
    pub fn get_affecting_stats(&self, target_categories: CategorySet) -> Vec<&str> {
        self.definitions
            .values()
            .filter(|definition| definition.categories.contains_any(target_categories))
            .map(|definition| definition.id.as_str())
            .collect()
    }

    /// Definitions belonging to any category in `category`.
    pub fn get_stats_by_category(&self, category: CategorySet) -> Vec<&StatDefinition> {
        self.definitions
            .values()
            .filter(|definition| definition.belongs_to_category(category))
            .collect()
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Real definitions, ordered by id.
    pub fn definitions(&self) -> impl Iterator<Item = &StatDefinition> + '_ {
        self.definitions.values()
    }

    /// Real stat ids, ordered.
    pub fn stat_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions.keys().map(String::as_str)
    }

    /// `(alias, target)` pairs, extended ids included.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    /// Every conditional record, grouped by base id.
    pub fn conditional_stats(&self) -> impl Iterator<Item = &ConditionalStatDefinition> + '_ {
        self.conditional.values().flatten()
    }

    /// Number of real definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Dumps the registry at `info` level.
    pub fn log_registered_stats(&self) {
        tracing::info!(
            "Stat registry: {} stats, {} aliases, {} conditional stats",
            self.definitions.len(),
            self.aliases.len(),
            self.conditional_stats().count()
        );
        for definition in self.definitions.values() {
            tracing::info!(
                "  stat `{}` ({}) [{}]",
                definition.id,
                definition.display_name,
                definition.categories
            );
        }
        for (alias, target) in &self.aliases {
            tracing::info!("  alias `{}` -> `{}`", alias, target);
        }
        for record in self.conditional_stats() {
            tracing::info!(
                "  conditional `{}` -> `{}` + {:?}",
                record.extended_id,
                record.base_id,
                record.suffix
            );
        }
    }

    fn fold<'a>(&self, id: &'a str) -> Cow<'a, str> {
        self.config.id_case.fold(id)
    }
}

/// Overwrites the mutable fields of `existing` and merges declarations.
fn merge_definition(existing: &mut StatDefinition, update: StatDefinition) {
    existing.display_name = update.display_name;
    existing.description = update.description;
    existing.default_value = update.default_value;
    existing.min_value = update.min_value;
    existing.max_value = update.max_value;
    existing.categories = update.categories;
    existing.is_integer = update.is_integer;
    existing.format = update.format;

    for alias in update.aliases {
        if !existing.aliases.contains(&alias) {
            existing.aliases.push(alias);
        }
    }
    for extension in update.extensions {
        if !existing.extensions.contains(&extension) {
            existing.extensions.push(extension);
        }
    }
}
