//! Modifiers - tagged numeric adjustments attached to a stat.

/// How a modifier's value enters the stat formula.
///
/// Application order is fixed: `Additive → PercentageAdditive → Multiplicative`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierMode {
    /// Summed into the base before any scaling (e.g. `+50`).
    Additive,
    /// Summed as percentage points, then applied once (`50` = +50%).
    PercentageAdditive,
    /// Direct factor applied last (`1.2` = ×1.2).
    Multiplicative,
}

/// A single adjustment to one stat.
///
/// `stat_id` may name the base stat, one of its aliases, or an extended id
/// (`base_Fire_Projectile`) that only applies while the stat carries the
/// matching categories. `duration` is in seconds of simulation time; `None`
/// means permanent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub id: String,
    pub stat_id: String,
    pub value: f64,
    pub mode: ModifierMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<f64>,
}

impl StatModifier {
    /// Create a permanent modifier with no source tag.
    pub fn new(
        id: impl Into<String>,
        stat_id: impl Into<String>,
        value: f64,
        mode: ModifierMode,
    ) -> Self {
        Self {
            id: id.into(),
            stat_id: stat_id.into(),
            value,
            mode,
            source: String::new(),
            duration: None,
        }
    }

    /// Flat bonus (`+value`).
    pub fn additive(id: impl Into<String>, stat_id: impl Into<String>, value: f64) -> Self {
        Self::new(id, stat_id, value, ModifierMode::Additive)
    }

    /// Percentage bonus in points (`50.0` = +50%).
    pub fn percentage(id: impl Into<String>, stat_id: impl Into<String>, percent: f64) -> Self {
        Self::new(id, stat_id, percent, ModifierMode::PercentageAdditive)
    }

    /// Direct multiplier (`1.2` = ×1.2).
    pub fn multiplicative(id: impl Into<String>, stat_id: impl Into<String>, factor: f64) -> Self {
        Self::new(id, stat_id, factor, ModifierMode::Multiplicative)
    }

    /// Tags the modifier with a source for bulk removal.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Makes the modifier expire after `seconds` of simulation time.
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// True if the modifier has no expiry.
    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }
}
