use crate::pokemon::Pokemon;
use schema::StatName;
use serde::{Deserialize, Serialize};

/// Most entities that can be compared side by side.
pub const MAX_COMPARISON: usize = 4;

/// Comparison needs at least this many selections to be meaningful.
pub const MIN_COMPARISON: usize = 2;

/// Bounded, ordered, duplicate-free selection of records to compare.
///
/// Lives beside the search state but is never touched by search resets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSet {
    #[serde(default)]
    selected_pokemon: Vec<Pokemon>,
    #[serde(default)]
    is_comparing: bool,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `pokemon` unless it is already selected or the set is full.
    /// Returns whether it was added.
    pub fn add(&mut self, pokemon: Pokemon) -> bool {
        if self.contains(pokemon.id) || self.is_full() {
            return false;
        }
        self.selected_pokemon.push(pokemon);
        true
    }

    pub fn remove(&mut self, pokemon_id: u32) -> bool {
        let before = self.selected_pokemon.len();
        self.selected_pokemon.retain(|p| p.id != pokemon_id);
        self.selected_pokemon.len() != before
    }

    /// Empties the selection and leaves the comparison view.
    pub fn clear(&mut self) {
        self.selected_pokemon.clear();
        self.is_comparing = false;
    }

    pub fn toggle_comparing(&mut self) -> bool {
        self.is_comparing = !self.is_comparing;
        self.is_comparing
    }

    pub fn contains(&self, pokemon_id: u32) -> bool {
        self.selected_pokemon.iter().any(|p| p.id == pokemon_id)
    }

    pub fn selected(&self) -> &[Pokemon] {
        &self.selected_pokemon
    }

    pub fn len(&self) -> usize {
        self.selected_pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_pokemon.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selected_pokemon.len() >= MAX_COMPARISON
    }

    pub fn is_comparing(&self) -> bool {
        self.is_comparing
    }

    pub fn is_ready(&self) -> bool {
        self.selected_pokemon.len() >= MIN_COMPARISON
    }

    /// Enforces the bound and uniqueness on data restored from storage.
    pub fn normalized(self) -> Self {
        let mut set = ComparisonSet {
            selected_pokemon: Vec::with_capacity(MAX_COMPARISON),
            is_comparing: self.is_comparing,
        };
        for pokemon in self.selected_pokemon {
            set.add(pokemon);
        }
        set
    }

    /// Per-stat rows for the side-by-side table, in canonical stat order.
    pub fn stat_table(&self) -> StatTable {
        let rows = StatName::ALL
            .iter()
            .map(|stat| {
                let values: Vec<u16> = self
                    .selected_pokemon
                    .iter()
                    .map(|p| p.stat_value(*stat))
                    .collect();
                let max = values.iter().copied().max().unwrap_or(0);
                let min = values.iter().copied().min().unwrap_or(0);
                let spread = max != min;
                let cells = values
                    .into_iter()
                    .map(|value| StatCell {
                        value,
                        is_highest: spread && value == max,
                        is_lowest: spread && value == min,
                    })
                    .collect();
                StatRow { stat: *stat, cells }
            })
            .collect();
        StatTable {
            names: self
                .selected_pokemon
                .iter()
                .map(Pokemon::display_name)
                .collect(),
            totals: self
                .selected_pokemon
                .iter()
                .map(Pokemon::base_stat_total)
                .collect(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTable {
    pub names: Vec<String>,
    pub rows: Vec<StatRow>,
    pub totals: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub stat: StatName,
    pub cells: Vec<StatCell>,
}

/// Highest/lowest are only marked when the values actually differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCell {
    pub value: u16,
    pub is_highest: bool,
    pub is_lowest: bool,
}
