use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The six canonical stats, in the catalog's `stat_id` order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatName {
    pub const ALL: [StatName; 6] = [
        StatName::Hp,
        StatName::Attack,
        StatName::Defense,
        StatName::SpecialAttack,
        StatName::SpecialDefense,
        StatName::Speed,
    ];

    /// Name used in `pokemon_v2_stat.name`.
    pub fn api_name(&self) -> &'static str {
        match self {
            StatName::Hp => "hp",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::SpecialAttack => "special-attack",
            StatName::SpecialDefense => "special-defense",
            StatName::Speed => "speed",
        }
    }

    /// The catalog's internal stat ordinal; list queries order stats by it.
    pub fn ordinal(&self) -> u8 {
        match self {
            StatName::Hp => 1,
            StatName::Attack => 2,
            StatName::Defense => 3,
            StatName::SpecialAttack => 4,
            StatName::SpecialDefense => 5,
            StatName::Speed => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Attack => "Attack",
            StatName::Defense => "Defense",
            StatName::SpecialAttack => "Sp. Attack",
            StatName::SpecialDefense => "Sp. Defense",
            StatName::Speed => "Speed",
        }
    }

    /// Compact label for one-line list rows.
    pub fn short_label(&self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Attack => "ATK",
            StatName::Defense => "DEF",
            StatName::SpecialAttack => "SPA",
            StatName::SpecialDefense => "SPD",
            StatName::Speed => "SPE",
        }
    }

    pub fn from_api_name(name: &str) -> Option<StatName> {
        StatName::ALL.into_iter().find(|stat| stat.api_name() == name)
    }
}

/// Upper bound used when rendering stat bars.
pub const MAX_BASE_STAT: u16 = 255;
