use schema::{Generation, PokemonType};
use serde::{Deserialize, Serialize};

/// The two independent filter sets. Neither holds duplicates; order carries no
/// meaning beyond being stable for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub generations: Vec<Generation>,
}

impl FilterState {
    /// Derived on every call, never cached.
    pub fn has_active_filters(&self) -> bool {
        !self.types.is_empty() || !self.generations.is_empty()
    }

    /// Returns whether the set changed.
    pub fn add_type(&mut self, pokemon_type: PokemonType) -> bool {
        if self.types.contains(&pokemon_type) {
            return false;
        }
        self.types.push(pokemon_type);
        true
    }

    pub fn remove_type(&mut self, pokemon_type: PokemonType) -> bool {
        let before = self.types.len();
        self.types.retain(|t| *t != pokemon_type);
        self.types.len() != before
    }

    pub fn add_generation(&mut self, generation: Generation) -> bool {
        if self.generations.contains(&generation) {
            return false;
        }
        self.generations.push(generation);
        true
    }

    pub fn remove_generation(&mut self, generation: Generation) -> bool {
        let before = self.generations.len();
        self.generations.retain(|g| *g != generation);
        self.generations.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.has_active_filters();
        self.types.clear();
        self.generations.clear();
        changed
    }

    /// Drops duplicates that may have crept into a hand-edited state file,
    /// keeping first occurrences.
    pub fn normalized(mut self) -> Self {
        let mut seen_types = Vec::with_capacity(self.types.len());
        self.types.retain(|t| {
            let fresh = !seen_types.contains(t);
            seen_types.push(*t);
            fresh
        });
        let mut seen_generations = Vec::with_capacity(self.generations.len());
        self.generations.retain(|g| {
            let fresh = !seen_generations.contains(g);
            seen_generations.push(*g);
            fresh
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generation(n: u8) -> Generation {
        Generation::new(n).unwrap()
    }

    #[test]
    fn test_adding_same_type_twice_is_idempotent() {
        let mut filters = FilterState::default();
        assert!(filters.add_type(PokemonType::Fire));
        assert!(!filters.add_type(PokemonType::Fire));
        assert_eq!(filters.types, vec![PokemonType::Fire]);
        assert!(filters.has_active_filters());
    }

    #[test]
    fn test_active_flag_tracks_every_mutation() {
        let mut filters = FilterState::default();
        assert!(!filters.has_active_filters());

        filters.add_generation(generation(2));
        assert!(filters.has_active_filters());
        filters.add_type(PokemonType::Water);
        filters.remove_generation(generation(2));
        assert!(filters.has_active_filters());
        filters.remove_type(PokemonType::Water);
        assert!(!filters.has_active_filters());

        filters.add_type(PokemonType::Ice);
        assert!(filters.clear());
        assert!(!filters.has_active_filters());
        assert!(!filters.clear());
    }

    #[test]
    fn test_removing_absent_entry_reports_no_change() {
        let mut filters = FilterState::default();
        assert!(!filters.remove_type(PokemonType::Dragon));
        assert!(!filters.remove_generation(generation(5)));
    }

    #[test]
    fn test_normalized_drops_duplicates() {
        let filters = FilterState {
            types: vec![PokemonType::Fire, PokemonType::Water, PokemonType::Fire],
            generations: vec![generation(1), generation(1)],
        }
        .normalized();
        assert_eq!(filters.types, vec![PokemonType::Fire, PokemonType::Water]);
        assert_eq!(filters.generations, vec![generation(1)]);
    }
}
