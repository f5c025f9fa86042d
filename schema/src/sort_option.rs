use crate::StatName;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The closed set of orderings a result list can be shown in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOption {
    NameAsc,
    NameDesc,
    #[default]
    IdAsc,
    IdDesc,
    HpAsc,
    HpDesc,
    AttackAsc,
    AttackDesc,
}

impl SortOption {
    /// For the stat-based options, the stat to order by and whether the order
    /// is ascending. `None` for name and id orderings.
    pub fn stat_sort(&self) -> Option<(StatName, bool)> {
        match self {
            SortOption::HpAsc => Some((StatName::Hp, true)),
            SortOption::HpDesc => Some((StatName::Hp, false)),
            SortOption::AttackAsc => Some((StatName::Attack, true)),
            SortOption::AttackDesc => Some((StatName::Attack, false)),
            _ => None,
        }
    }

    pub fn is_stat_based(&self) -> bool {
        self.stat_sort().is_some()
    }

    pub fn is_ascending(&self) -> bool {
        matches!(
            self,
            SortOption::NameAsc | SortOption::IdAsc | SortOption::HpAsc | SortOption::AttackAsc
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::IdAsc => "Pokédex Number (Low to High)",
            SortOption::IdDesc => "Pokédex Number (High to Low)",
            SortOption::HpAsc => "HP (Low to High)",
            SortOption::HpDesc => "HP (High to Low)",
            SortOption::AttackAsc => "Attack (Low to High)",
            SortOption::AttackDesc => "Attack (High to Low)",
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
    #[case(SortOption::HpAsc, Some((StatName::Hp, true)))]
    #[case(SortOption::HpDesc, Some((StatName::Hp, false)))]
    #[case(SortOption::AttackAsc, Some((StatName::Attack, true)))]
    #[case(SortOption::AttackDesc, Some((StatName::Attack, false)))]
    #[case(SortOption::NameAsc, None)]
    #[case(SortOption::IdDesc, None)]
    fn test_stat_sort(#[case] option: SortOption, #[case] expected: Option<(StatName, bool)>) {
        assert_eq!(option.stat_sort(), expected);
    }

    #[test]
    fn test_kebab_case_round_trip_through_strings() {
        for option in SortOption::iter() {
            let text = option.to_string();
            assert_eq!(text.parse::<SortOption>().unwrap(), option);
            let json = serde_json::to_string(&option).unwrap();
            assert_eq!(json, format!("\"{}\"", text));
        }
        assert_eq!(SortOption::iter().count(), 8);
        assert_eq!(SortOption::AttackDesc.to_string(), "attack-desc");
    }

    #[test]
    fn test_default_is_id_ascending() {
        assert_eq!(SortOption::default(), SortOption::IdAsc);
        assert!(SortOption::default().is_ascending());
    }
}
