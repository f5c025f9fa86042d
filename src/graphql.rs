//! GraphQL documents sent to the remote catalog.
//!
//! List documents share one selection set and differ only in their `where`
//! predicate; each pairs the page of rows with a count aggregate over the same
//! predicate. Stats are limited to the first four by stat ordinal in the
//! filtered/default lists to keep payloads small.

pub const LIST_OPERATION: &str = "GetPokemonList";
pub const TYPE_FILTER_OPERATION: &str = "GetPokemonByTypes";
pub const GENERATION_FILTER_OPERATION: &str = "GetPokemonByGenerations";
pub const COMBINED_FILTER_OPERATION: &str = "GetFilteredPokemonList";
pub const SEARCH_OPERATION: &str = "SearchPokemon";
pub const DETAIL_OPERATION: &str = "GetPokemonById";
pub const SUGGESTIONS_OPERATION: &str = "GetSearchSuggestions";
pub const POPULAR_OPERATION: &str = "GetPopularPokemon";

pub const GET_POKEMON_LIST: &str = r#"
query GetPokemonList($limit: Int = 20, $offset: Int = 0, $orderBy: [pokemon_v2_pokemon_order_by!] = [{ id: asc }]) {
  pokemon_v2_pokemon(
    limit: $limit
    offset: $offset
    order_by: $orderBy
    where: { pokemon_v2_pokemonspecy: { generation_id: { _lte: 9 } } }
  ) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(limit: 4, order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonspecy { generation_id }
  }
  pokemon_v2_pokemon_aggregate(
    where: { pokemon_v2_pokemonspecy: { generation_id: { _lte: 9 } } }
  ) {
    aggregate { count }
  }
}
"#;

pub const GET_POKEMON_BY_TYPES: &str = r#"
query GetPokemonByTypes($limit: Int = 20, $offset: Int = 0, $types: [String!] = [], $orderBy: [pokemon_v2_pokemon_order_by!] = [{ id: asc }]) {
  pokemon_v2_pokemon(
    limit: $limit
    offset: $offset
    order_by: $orderBy
    where: { pokemon_v2_pokemontypes: { pokemon_v2_type: { name: { _in: $types } } } }
  ) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(limit: 4, order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonspecy { generation_id }
  }
  pokemon_v2_pokemon_aggregate(
    where: { pokemon_v2_pokemontypes: { pokemon_v2_type: { name: { _in: $types } } } }
  ) {
    aggregate { count }
  }
}
"#;

pub const GET_POKEMON_BY_GENERATIONS: &str = r#"
query GetPokemonByGenerations($limit: Int = 20, $offset: Int = 0, $generations: [Int!], $orderBy: [pokemon_v2_pokemon_order_by!] = [{ id: asc }]) {
  pokemon_v2_pokemon(
    limit: $limit
    offset: $offset
    order_by: $orderBy
    where: { pokemon_v2_pokemonspecy: { generation_id: { _in: $generations } } }
  ) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(limit: 4, order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonspecy { generation_id }
  }
  pokemon_v2_pokemon_aggregate(
    where: { pokemon_v2_pokemonspecy: { generation_id: { _in: $generations } } }
  ) {
    aggregate { count }
  }
}
"#;

pub const GET_FILTERED_POKEMON_LIST: &str = r#"
query GetFilteredPokemonList($limit: Int = 20, $offset: Int = 0, $types: [String!], $generations: [Int!], $orderBy: [pokemon_v2_pokemon_order_by!] = [{ id: asc }]) {
  pokemon_v2_pokemon(
    limit: $limit
    offset: $offset
    order_by: $orderBy
    where: {
      _and: [
        { pokemon_v2_pokemontypes: { pokemon_v2_type: { name: { _in: $types } } } }
        { pokemon_v2_pokemonspecy: { generation_id: { _in: $generations } } }
      ]
    }
  ) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(limit: 4, order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonspecy { generation_id }
  }
  pokemon_v2_pokemon_aggregate(
    where: {
      _and: [
        { pokemon_v2_pokemontypes: { pokemon_v2_type: { name: { _in: $types } } } }
        { pokemon_v2_pokemonspecy: { generation_id: { _in: $generations } } }
      ]
    }
  ) {
    aggregate { count }
  }
}
"#;

pub const SEARCH_POKEMON: &str = r#"
query SearchPokemon($name: String!, $limit: Int = 20, $offset: Int = 0, $orderBy: [pokemon_v2_pokemon_order_by!] = [{ id: asc }]) {
  pokemon_v2_pokemon(
    limit: $limit
    offset: $offset
    order_by: $orderBy
    where: { name: { _ilike: $name } }
  ) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(limit: 4, order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonspecy { generation_id }
  }
  pokemon_v2_pokemon_aggregate(where: { name: { _ilike: $name } }) {
    aggregate { count }
  }
}
"#;

pub const GET_POKEMON_BY_ID: &str = r#"
query GetPokemonById($id: Int!) {
  pokemon_v2_pokemon_by_pk(id: $id) {
    id
    name
    height
    weight
    base_experience
    pokemon_v2_pokemonsprites { sprites }
    pokemon_v2_pokemontypes { pokemon_v2_type { id name } }
    pokemon_v2_pokemonstats(order_by: { stat_id: asc }) { base_stat pokemon_v2_stat { name } }
    pokemon_v2_pokemonabilities {
      is_hidden
      pokemon_v2_ability {
        id
        name
        pokemon_v2_abilityeffecttexts(where: { language_id: { _eq: 9 } }, limit: 1) { effect short_effect }
      }
    }
    pokemon_v2_pokemonmoves(
      where: { pokemon_v2_movelearnmethod: { name: { _eq: "level-up" } }, level: { _lte: 50 } }
      order_by: [{ level: asc }]
      limit: 20
    ) {
      level
      pokemon_v2_move {
        id
        name
        power
        accuracy
        pp
        pokemon_v2_type { name }
        pokemon_v2_movedamageclass { name }
      }
    }
    pokemon_v2_pokemonspecy {
      name
      generation_id
      evolution_chain_id
      pokemon_v2_pokemonspeciesflavortexts(where: { language_id: { _eq: 9 } }, limit: 1) { flavor_text }
      pokemon_v2_evolutionchain {
        pokemon_v2_pokemonspecies {
          id
          name
          evolves_from_species_id
          pokemon_v2_pokemonevolutions {
            min_level
            pokemon_v2_evolutiontrigger { name }
            pokemon_v2_item { name }
          }
        }
      }
    }
  }
}
"#;

pub const GET_SEARCH_SUGGESTIONS: &str = r#"
query GetSearchSuggestions($name: String!, $limit: Int = 8) {
  pokemon_v2_pokemon(where: { name: { _ilike: $name } }, limit: $limit, order_by: [{ id: asc }]) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
  }
}
"#;

pub const GET_POPULAR_POKEMON: &str = r#"
query GetPopularPokemon($limit: Int = 6) {
  pokemon_v2_pokemon(where: { id: { _lte: 151 } }, order_by: [{ id: asc }], limit: $limit) {
    id
    name
    pokemon_v2_pokemonsprites { sprites }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GET_POKEMON_LIST, LIST_OPERATION)]
    #[case(GET_POKEMON_BY_TYPES, TYPE_FILTER_OPERATION)]
    #[case(GET_POKEMON_BY_GENERATIONS, GENERATION_FILTER_OPERATION)]
    #[case(GET_FILTERED_POKEMON_LIST, COMBINED_FILTER_OPERATION)]
    #[case(SEARCH_POKEMON, SEARCH_OPERATION)]
    fn test_list_documents_name_their_operation_and_count(
        #[case] document: &str,
        #[case] operation: &str,
    ) {
        assert!(document.contains(&format!("query {}(", operation)));
        assert!(document.contains("pokemon_v2_pokemon_aggregate"));
        assert!(document.contains("$orderBy"));
    }

    #[test]
    fn test_braces_balance_in_every_document() {
        for document in [
            GET_POKEMON_LIST,
            GET_POKEMON_BY_TYPES,
            GET_POKEMON_BY_GENERATIONS,
            GET_FILTERED_POKEMON_LIST,
            SEARCH_POKEMON,
            GET_POKEMON_BY_ID,
            GET_SEARCH_SUGGESTIONS,
            GET_POPULAR_POKEMON,
        ] {
            let open = document.matches('{').count();
            let close = document.matches('}').count();
            assert_eq!(open, close);
        }
    }
}
