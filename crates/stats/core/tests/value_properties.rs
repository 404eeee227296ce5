use std::sync::Arc;

use stat_core::{
    CategorySet, ModifierMode, StatCollection, StatDefinition, StatModifier, StatRegistry,
};

fn registry_with(definition: StatDefinition) -> Arc<StatRegistry> {
    let mut registry = StatRegistry::new();
    registry.register(definition).unwrap();
    Arc::new(registry)
}

fn damage_registry() -> Arc<StatRegistry> {
    registry_with(
        StatDefinition::new("damage", "Damage")
            .with_default(100.0)
            .with_categories(CategorySet::DAMAGE | CategorySet::OFFENSE),
    )
}

#[test]
fn formula_is_exact_for_one_modifier_of_each_mode() {
    let mut stats = StatCollection::new("hero", damage_registry());
    stats.add_modifier(StatModifier::additive("sword", "damage", 50.0));
    stats.add_modifier(StatModifier::percentage("ring", "damage", 30.0));
    stats.add_modifier(StatModifier::multiplicative("rage", "damage", 1.2));

    // (100 + 50) × 1.3 × 1.2
    assert_eq!(stats.get_value("damage"), 234.0);
}

#[test]
fn insertion_order_does_not_change_the_value() {
    let modifiers = [
        StatModifier::additive("a", "damage", 7.0),
        StatModifier::additive("b", "damage", 11.0),
        StatModifier::additive("c", "damage", 13.0),
        StatModifier::percentage("d", "damage", 15.0),
        StatModifier::percentage("e", "damage", 25.0),
        StatModifier::multiplicative("f", "damage", 1.1),
        StatModifier::multiplicative("g", "damage", 0.9),
        StatModifier::multiplicative("h", "damage", 1.5),
    ];

    let mut forward = StatCollection::new("forward", damage_registry());
    for modifier in modifiers.iter().cloned() {
        forward.add_modifier(modifier);
    }

    let mut backward = StatCollection::new("backward", damage_registry());
    for modifier in modifiers.iter().rev().cloned() {
        backward.add_modifier(modifier);
    }

    let mut interleaved = StatCollection::new("interleaved", damage_registry());
    for index in [4, 0, 7, 2, 5, 1, 6, 3] {
        interleaved.add_modifier(modifiers[index].clone());
    }

    let expected = forward.get_value("damage");
    assert_eq!(backward.get_value("damage"), expected);
    assert_eq!(interleaved.get_value("damage"), expected);
}

#[test]
fn removal_by_source_leaves_other_sources_and_base() {
    let mut stats = StatCollection::new("hero", damage_registry());
    stats.add_modifier(StatModifier::additive("x1", "damage", 5.0).with_source("X"));
    stats.add_modifier(StatModifier::percentage("x2", "damage", 20.0).with_source("X"));
    stats.add_modifier(StatModifier::multiplicative("x3", "damage", 2.0).with_source("X"));
    stats.add_modifier(StatModifier::additive("y1", "damage", 10.0).with_source("Y"));

    assert_eq!(stats.remove_modifiers_from_source("X"), 3);

    let stat = stats.stat("damage").unwrap();
    let remaining: Vec<_> = stat.modifiers().map(|m| m.id.as_str()).collect();
    assert_eq!(remaining, vec!["y1"]);
    assert_eq!(stat.base_value(), 100.0);
    assert_eq!(stat.value(), 110.0);
}

#[test]
fn value_is_clamped_to_definition_bounds() {
    let registry = registry_with(
        StatDefinition::new("armor", "Armor")
            .with_default(100.0)
            .with_bounds(0.0, 1000.0)
            .with_categories(CategorySet::DEFENSE),
    );
    let mut stats = StatCollection::new("hero", registry);

    stats.add_modifier(StatModifier::additive("plate", "armor", 5000.0));
    assert_eq!(stats.get_value("armor"), 1000.0);

    stats.remove_modifier("armor", "plate");
    stats.add_modifier(StatModifier::multiplicative("curse", "armor", -1.0));
    assert_eq!(stats.get_value("armor"), 0.0);

    // Clamping happens at read time; the stored modifiers are untouched.
    let curse = stats.stat("armor").unwrap().modifier("curse").unwrap();
    assert_eq!(curse.mode, ModifierMode::Multiplicative);
    assert_eq!(curse.value, -1.0);
}

#[test]
fn value_is_memoized_until_a_mutation() {
    let mut stats = StatCollection::new("hero", damage_registry());
    let first = stats.get_value("damage");
    assert!(!stats.stat("damage").unwrap().is_dirty());

    stats.set_base_value("damage", 40.0);
    assert!(stats.stat("damage").unwrap().is_dirty());
    assert_ne!(stats.get_value("damage"), first);
    assert_eq!(stats.value("damage"), Some(40.0));
}
