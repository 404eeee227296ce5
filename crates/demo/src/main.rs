//! Timed modifier demo.
//!
//! Loads a stat catalog, equips a character, toggles skill categories and lets
//! temporary buffs run out while simulated time advances.
mod config;

use std::sync::Arc;

use anyhow::Result;
use config::DemoConfig;
use stat_content::ContentFactory;
use stat_core::{CategorySet, StatCollection, StatModifier};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const WATCHED_STATS: [&str; 3] = ["health", "spell_damage", "cast_speed"];

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();
    let config = DemoConfig::from_env();

    let registry = ContentFactory::new(config.data_dir.clone()).build_registry()?;
    registry.log_registered_stats();
    let registry = Arc::new(registry);

    let mut hero = StatCollection::new(config.owner_name.clone(), Arc::clone(&registry));
    equip(&mut hero);
    report(&hero, "equipped");

    // Casting a fire bolt turns on the fire-gated bonuses.
    hero.set_categories(
        "spell_damage",
        CategorySet::SPELL | CategorySet::FIRE | CategorySet::PROJECTILE,
    );
    report(&hero, "casting fire bolt");

    hero.add_temporary_percentage("spell_damage", 40.0, 3.0, "arcane_surge");
    hero.add_temporary_multiplier("cast_speed", 1.5, 5.0, "haste");
    hero.add_temporary_modifier("hp", 50.0, 2.0, "potion");
    report(&hero, "buffed");

    let mut elapsed = 0.0;
    while elapsed < config.total_seconds {
        let expired = hero.advance_time(config.tick_seconds);
        elapsed += config.tick_seconds;
        if expired > 0 {
            report(&hero, &format!("t={elapsed:.1}s, {expired} buff(s) expired"));
        }
    }

    let removed = hero.remove_modifiers_from_source("ember_staff");
    report(&hero, &format!("unequipped staff ({removed} modifiers)"));

    Ok(())
}

/// Setup logging to stderr
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn equip(hero: &mut StatCollection) {
    let gear = [
        StatModifier::additive("staff_damage", "spell_damage", 25.0).with_source("ember_staff"),
        StatModifier::percentage("staff_fire", "spell_damage_Fire", 50.0)
            .with_source("ember_staff"),
        StatModifier::percentage("staff_bolt", "spell_damage_Fire_Projectile", 30.0)
            .with_source("ember_staff"),
        StatModifier::additive("amulet_life", "hp", 40.0).with_source("amulet"),
        StatModifier::percentage("amulet_speed", "cast_speed", 10.0).with_source("amulet"),
    ];
    for modifier in gear {
        hero.add_modifier(modifier);
    }
}

fn report(hero: &StatCollection, label: &str) {
    let precision = hero.registry().config().display_precision;
    for id in WATCHED_STATS {
        let Some(stat) = hero.stat(id) else {
            continue;
        };
        tracing::info!(
            "[{}] {}: {} = {}",
            label,
            hero.owner_name(),
            stat.definition().display_name,
            stat.format_value(precision)
        );
    }
}
