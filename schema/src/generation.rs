use serde::{Deserialize, Serialize};
use std::fmt;

/// A game generation, 1 through 9 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Generation(u8);

/// Raised when a number outside 1..=9 is offered as a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidGeneration(pub u8);

impl fmt::Display for InvalidGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {} is out of range ({}-{})",
            self.0,
            Generation::FIRST,
            Generation::LAST
        )
    }
}

impl std::error::Error for InvalidGeneration {}

const REGIONS: [&str; 9] = [
    "Kanto", "Johto", "Hoenn", "Sinnoh", "Unova", "Kalos", "Alola", "Galar", "Paldea",
];

const ROMAN: [&str; 9] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];

impl Generation {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 9;

    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST..=Self::LAST)
            .contains(&number)
            .then_some(Generation(number))
    }

    pub fn all() -> impl Iterator<Item = Generation> {
        (Self::FIRST..=Self::LAST).map(Generation)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn roman(&self) -> &'static str {
        ROMAN[self.index()]
    }

    pub fn region(&self) -> &'static str {
        REGIONS[self.index()]
    }

    /// e.g. "Generation I (Kanto)".
    pub fn full_name(&self) -> String {
        format!("Generation {} ({})", self.roman(), self.region())
    }

    /// e.g. "Gen IV".
    pub fn short_name(&self) -> String {
        format!("Gen {}", self.roman())
    }

    /// Name for a raw generation id coming off the wire, which may fall outside
    /// the known range.
    pub fn name_for_id(id: u32) -> String {
        match u8::try_from(id).ok().and_then(Generation::new) {
            Some(generation) => generation.full_name(),
            None => format!("Generation {}", id),
        }
    }
}

impl TryFrom<u8> for Generation {
    type Error = InvalidGeneration;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Generation::new(value).ok_or(InvalidGeneration(value))
    }
}

impl From<Generation> for u8 {
    fn from(generation: Generation) -> u8 {
        generation.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(1))]
    #[case(9, Some(9))]
    #[case(10, None)]
    fn test_range_is_enforced(#[case] input: u8, #[case] expected: Option<u8>) {
        assert_eq!(Generation::new(input).map(|g| g.number()), expected);
    }

    #[rstest]
    #[case(1, "Generation I (Kanto)", "Gen I")]
    #[case(4, "Generation IV (Sinnoh)", "Gen IV")]
    #[case(9, "Generation IX (Paldea)", "Gen IX")]
    fn test_names(#[case] number: u8, #[case] full: &str, #[case] short: &str) {
        let generation = Generation::new(number).unwrap();
        assert_eq!(generation.full_name(), full);
        assert_eq!(generation.short_name(), short);
    }

    #[test]
    fn test_name_for_unknown_id_falls_back() {
        assert_eq!(Generation::name_for_id(3), "Generation III (Hoenn)");
        assert_eq!(Generation::name_for_id(12), "Generation 12");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: Generation = serde_json::from_str("2").unwrap();
        assert_eq!(ok.number(), 2);
        assert!(serde_json::from_str::<Generation>("0").is_err());
        assert!(serde_json::from_str::<Generation>("10").is_err());
    }
}
