//! Enumeration types: stat categories and names, age groups, and the
//! narrative requirements attached to family events.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Stat categories
// ---------------------------------------------------------------------------

/// The three fixed groups a character's statistics are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StatCategory {
    /// Physical and personal attributes (health, beauty, luck, stress, ...).
    Innate,
    /// Learned abilities (education, labor).
    Skills,
    /// Material holdings (money, comfort).
    Possessions,
}

impl StatCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Innate, Self::Skills, Self::Possessions];

    /// The stat names that live under this category, in display order.
    pub const fn stats(self) -> &'static [StatName] {
        match self {
            Self::Innate => &StatName::INNATE,
            Self::Skills => &[StatName::Education, StatName::Labor],
            Self::Possessions => &[StatName::Money, StatName::Comfort],
        }
    }
}

impl core::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Innate => write!(f, "innate"),
            Self::Skills => write!(f, "skills"),
            Self::Possessions => write!(f, "possessions"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stat names
// ---------------------------------------------------------------------------

/// A single named statistic. Each name has exactly one home category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StatName {
    /// Physical health. Low health raises the death chance.
    Health,
    /// Physical attractiveness. Helps when looking for a spouse.
    Beauty,
    /// Social charm. Helps when looking for a spouse.
    Charisma,
    /// Raw intellect.
    Intelligence,
    /// Physical strength.
    Strength,
    /// Physical agility.
    Agility,
    /// Fortune. Drives the reprieve roll when death strikes.
    Luck,
    /// Accumulated stress. High stress raises the death chance.
    Stress,
    /// Formal education.
    Education,
    /// Working experience.
    Labor,
    /// Money on hand.
    Money,
    /// Quality of life.
    Comfort,
}

impl StatName {
    /// The innate stats, in display order.
    pub const INNATE: [Self; 8] = [
        Self::Health,
        Self::Beauty,
        Self::Charisma,
        Self::Intelligence,
        Self::Strength,
        Self::Agility,
        Self::Luck,
        Self::Stress,
    ];

    /// The category this stat is filed under.
    pub const fn category(self) -> StatCategory {
        match self {
            Self::Health
            | Self::Beauty
            | Self::Charisma
            | Self::Intelligence
            | Self::Strength
            | Self::Agility
            | Self::Luck
            | Self::Stress => StatCategory::Innate,
            Self::Education | Self::Labor => StatCategory::Skills,
            Self::Money | Self::Comfort => StatCategory::Possessions,
        }
    }
}

impl core::fmt::Display for StatName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Health => "health",
            Self::Beauty => "beauty",
            Self::Charisma => "charisma",
            Self::Intelligence => "intelligence",
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Luck => "luck",
            Self::Stress => "stress",
            Self::Education => "education",
            Self::Labor => "labor",
            Self::Money => "money",
            Self::Comfort => "comfort",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Age groups
// ---------------------------------------------------------------------------

/// A named band of ages. Drives the available events, the number of free
/// selections per turn, and the base death risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AgeGroup {
    /// Ages 0--2 by default.
    Baby,
    /// Ages 3--12 by default.
    Child,
    /// Ages 13--19 by default.
    Teenager,
    /// Ages 20--65 by default.
    Adult,
    /// Ages 66 and up.
    Elder,
}

impl core::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Baby => write!(f, "Baby"),
            Self::Child => write!(f, "Child"),
            Self::Teenager => write!(f, "Teenager"),
            Self::Adult => write!(f, "Adult"),
            Self::Elder => write!(f, "Elder"),
        }
    }
}

// ---------------------------------------------------------------------------
// Special requirements
// ---------------------------------------------------------------------------

/// Narrative gate attached to family events, checked against the
/// character's marital situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SpecialRequirement {
    /// Searching for a spouse: only while no spouse is selected.
    FindWife,
    /// The wedding: a spouse is selected but the couple is not yet married.
    Wedding,
    /// Trying for children: only once married.
    TryForChildren,
}

impl core::fmt::Display for SpecialRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FindWife => write!(f, "find_wife"),
            Self::Wedding => write!(f, "wedding"),
            Self::TryForChildren => write!(f, "try_for_children"),
        }
    }
}
