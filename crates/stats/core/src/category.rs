//! Category flags describing what a stat is and what context a skill runs in.
//!
//! A [`CategorySet`] is a 64-bit mask over the [`Category`] universe. Named
//! unions such as [`CategorySet::ATTACK`] are plain constants OR-ed from their
//! members; they are never stored as separate bits.

use core::fmt;

use bitflags::bitflags;
use strum::IntoEnumIterator;

/// A single category flag.
///
/// The discriminant is the bit index inside [`CategorySet`], so iteration order
/// is ascending bit order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Category {
    Physical = 0,
    Fire = 1,
    Cold = 2,
    Lightning = 3,
    Chaos = 4,
    Projectile = 5,
    AreaEffect = 6,
    Duration = 7,
    Melee = 8,
    Combat = 9,
    Core = 10,
    Attribute = 11,
    Resource = 12,
    Offense = 13,
    Defense = 14,
    Damage = 15,
    Elemental = 16,
    Spell = 17,
    Minion = 18,
    Movement = 19,
    Utility = 20,
}

impl Category {
    /// Bit index of this category inside a [`CategorySet`].
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// The one-bit set containing only this category.
    pub const fn set(self) -> CategorySet {
        CategorySet::from_bits_retain(1u64 << self.index())
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        category.set()
    }
}

bitflags! {
    /// A combination of [`Category`] flags.
    ///
    /// The empty set is [`CategorySet::NONE`] and is the identity for union.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CategorySet: u64 {
        const PHYSICAL    = 1 << 0;
        const FIRE        = 1 << 1;
        const COLD        = 1 << 2;
        const LIGHTNING   = 1 << 3;
        const CHAOS       = 1 << 4;
        const PROJECTILE  = 1 << 5;
        const AREA_EFFECT = 1 << 6;
        const DURATION    = 1 << 7;
        const MELEE       = 1 << 8;
        const COMBAT      = 1 << 9;
        const CORE        = 1 << 10;
        const ATTRIBUTE   = 1 << 11;
        const RESOURCE    = 1 << 12;
        const OFFENSE     = 1 << 13;
        const DEFENSE     = 1 << 14;
        const DAMAGE      = 1 << 15;
        const ELEMENTAL   = 1 << 16;
        const SPELL       = 1 << 17;
        const MINION      = 1 << 18;
        const MOVEMENT    = 1 << 19;
        const UTILITY     = 1 << 20;

        /// Core attack context: `CORE | DAMAGE | ELEMENTAL | COMBAT`.
        const ATTACK = Self::CORE.bits()
            | Self::DAMAGE.bits()
            | Self::ELEMENTAL.bits()
            | Self::COMBAT.bits();

        /// `FIRE | COLD | LIGHTNING`.
        const ALL_ELEMENTS = Self::FIRE.bits() | Self::COLD.bits() | Self::LIGHTNING.bits();

        /// Every damage type.
        const ALL_DAMAGE_TYPES = Self::PHYSICAL.bits()
            | Self::FIRE.bits()
            | Self::COLD.bits()
            | Self::LIGHTNING.bits()
            | Self::CHAOS.bits();
    }
}

impl CategorySet {
    /// The empty set.
    pub const NONE: Self = Self::empty();

    /// Builds a set from individual categories.
    pub fn of(categories: impl IntoIterator<Item = Category>) -> Self {
        categories
            .into_iter()
            .fold(Self::NONE, |acc, category| acc | category.set())
    }

    /// True if no flag is set.
    pub const fn is_none(&self) -> bool {
        self.is_empty()
    }

    /// `(self & other) == other`
    pub const fn contains_all(&self, other: Self) -> bool {
        self.contains(other)
    }

    /// `(self & other) != None`
    pub const fn contains_any(&self, other: Self) -> bool {
        self.intersects(other)
    }

    /// True if some bit lies outside the declared [`Category`] universe.
    pub const fn has_unknown_bits(&self) -> bool {
        self.bits() & !Self::all().bits() != 0
    }

    /// The single-bit categories in this set, in ascending bit order.
    ///
    /// Bits outside the declared universe are skipped.
    pub fn decompose(&self) -> Vec<Category> {
        Category::iter()
            .filter(|category| self.contains(category.set()))
            .collect()
    }

    /// Stable, order-independent text form used to build extended stat ids.
    ///
    /// `FIRE | PROJECTILE` renders as `Fire_Projectile`; the empty set as `None`.
    pub fn to_canonical_string(&self) -> String {
        let categories = self.decompose();
        if categories.is_empty() {
            return "None".to_string();
        }

        categories
            .iter()
            .map(|category| category.as_ref())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::of(iter)
    }
}
