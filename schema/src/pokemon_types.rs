use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Type tags as the remote catalog names them (`"fire"`, `"water"`, ...).
///
/// Parsing is case-insensitive so user input like `Fire` maps cleanly.
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
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl PokemonType {
    /// The name the remote catalog uses in its `pokemon_v2_type.name` column.
    pub fn api_name(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fighting => "fighting",
            PokemonType::Flying => "flying",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Rock => "rock",
            PokemonType::Bug => "bug",
            PokemonType::Ghost => "ghost",
            PokemonType::Steel => "steel",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Grass => "grass",
            PokemonType::Electric => "electric",
            PokemonType::Psychic => "psychic",
            PokemonType::Ice => "ice",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Fairy => "fairy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("fire", PokemonType::Fire)]
    #[case("Fire", PokemonType::Fire)]
    #[case("FAIRY", PokemonType::Fairy)]
    fn test_parse_is_case_insensitive(#[case] input: &str, #[case] expected: PokemonType) {
        assert_eq!(input.parse::<PokemonType>().unwrap(), expected);
    }

    #[test]
    fn test_display_matches_api_name() {
        for pokemon_type in PokemonType::iter() {
            assert_eq!(pokemon_type.to_string(), pokemon_type.api_name());
            assert_eq!(pokemon_type.as_ref(), pokemon_type.api_name());
        }
        assert_eq!(PokemonType::iter().count(), 18);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PokemonType::Electric).unwrap();
        assert_eq!(json, "\"electric\"");
        let back: PokemonType = serde_json::from_str("\"ghost\"").unwrap();
        assert_eq!(back, PokemonType::Ghost);
    }

    #[test]
    fn test_unknown_type_fails_to_parse() {
        assert!("shadow".parse::<PokemonType>().is_err());
    }
}
