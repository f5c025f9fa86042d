//! Text rendering and argument parsing shared by the CLI and the MCP server.
//!
//! Every function here is pure: it takes state and returns the text a user
//! sees, so both front ends print the same thing.

use crate::comparison::{ComparisonSet, MAX_COMPARISON, MIN_COMPARISON};
use crate::controller::CompareAdd;
use crate::filters::FilterState;
use crate::pokemon::{capitalize, Pokemon};
use crate::store::{SearchStore, ViewState};
use schema::{Generation, PokemonType, SortOption, StatName};
use std::fmt::Write;
use strum::IntoEnumIterator;

pub fn parse_pokemon_type(name: &str) -> Result<PokemonType, String> {
    name.trim().parse().map_err(|_| {
        let known: Vec<&str> = PokemonType::iter().map(|t| t.api_name()).collect();
        format!("Unknown type '{}'. Known types: {}", name.trim(), known.join(", "))
    })
}

pub fn parse_generation(number: u8) -> Result<Generation, String> {
    Generation::new(number).ok_or_else(|| {
        let known: Vec<String> = Generation::all()
            .map(|g| format!("{} ({})", g.number(), g.region()))
            .collect();
        format!("Unknown generation {}. Known generations: {}", number, known.join(", "))
    })
}

pub fn parse_sort(name: &str) -> Result<SortOption, String> {
    name.trim().parse().map_err(|_| {
        let known: Vec<String> = SortOption::iter().map(|s| s.to_string()).collect();
        format!("Unknown sort '{}'. Options: {}", name.trim(), known.join(", "))
    })
}

/// One line per active filter plus the sort in effect.
pub fn render_filter_summary(filters: &FilterState, sort: SortOption) -> String {
    let mut output = String::new();
    if filters.types.is_empty() {
        output.push_str("Types: any\n");
    } else {
        let names: Vec<String> = filters.types.iter().map(|t| capitalize(t.api_name())).collect();
        let _ = writeln!(output, "Types: {}", names.join(", "));
    }
    if filters.generations.is_empty() {
        output.push_str("Generations: any\n");
    } else {
        let names: Vec<String> = filters.generations.iter().map(|g| g.full_name()).collect();
        let _ = writeln!(output, "Generations: {}", names.join(", "));
    }
    if sort.is_stat_based() {
        let _ = writeln!(output, "Sort: {} (within each page)", sort.description());
    } else {
        let _ = writeln!(output, "Sort: {}", sort.description());
    }
    output
}

/// A single list row. Stats are appended when the preference asks for them.
pub fn render_pokemon_row(pokemon: &Pokemon, show_stats: bool, in_comparison: bool) -> String {
    let marker = if in_comparison { " *" } else { "" };
    if !show_stats {
        return format!("{}{}", pokemon, marker);
    }
    let stats: Vec<String> = [StatName::Hp, StatName::Attack, StatName::Defense, StatName::Speed]
        .iter()
        .map(|stat| format!("{} {}", stat.short_label(), pokemon.stat_value(*stat)))
        .collect();
    format!("{}{}  ({})", pokemon, marker, stats.join(" | "))
}

/// The visible result set with its header and paging footer, or the right
/// empty, loading or error state.
pub fn render_results(store: &SearchStore) -> String {
    let query = store.search_query().trim();
    match store.view_state() {
        ViewState::Error => {
            let mut output = String::from("Search Error\n");
            if let Some(error) = store.error() {
                let _ = writeln!(output, "{}", error);
            }
            output.push_str("Use refresh to try again.\n");
            return output;
        }
        ViewState::Loading => return "Loading Pokémon...\n".to_string(),
        ViewState::NoResults => {
            return if store.has_active_search() {
                format!(
                    "No Pokemon Found\nNo Pokemon found matching \"{}\". Try a different search term.\n",
                    query
                )
            } else {
                "No Pokemon Found\nNo Pokemon match the selected filters. Try removing a filter.\n"
                    .to_string()
            };
        }
        ViewState::Initial => {
            return "No results loaded yet. Use refresh to load the Pokédex.\n".to_string()
        }
        ViewState::Results => {}
    }

    let pagination = store.pagination();
    let shown = store.pokemon().len();
    let mut output = String::new();
    if store.has_active_search() {
        let _ = writeln!(output, "Search Results for \"{}\"", query);
    } else if store.has_active_filters() {
        output.push_str("Filtered Pokemon\n");
    } else {
        output.push_str("All Pokemon\n");
    }
    let _ = write!(
        output,
        "Showing {} of {} Pokemon",
        shown, pagination.total_count
    );
    if pagination.total_pages > 1 {
        let _ = write!(
            output,
            " (Page {} of {})",
            pagination.current_page, pagination.total_pages
        );
    }
    output.push('\n');
    let _ = writeln!(output, "Sorted by {}", store.sort_by().description());
    output.push('\n');

    let show_stats = store.preferences().show_stats;
    for pokemon in store.pokemon() {
        let _ = writeln!(
            output,
            "{}",
            render_pokemon_row(pokemon, show_stats, store.is_in_comparison(pokemon.id))
        );
    }

    output.push('\n');
    if store.is_loading_more() {
        output.push_str("Loading more...\n");
    } else if store.can_load_more() {
        output.push_str("More results available: use load_more or go_to_page.\n");
    } else {
        output.push_str("You've reached the end of the list.\n");
    }
    output
}

/// Everything a detail view shows for one record.
pub fn render_pokemon_detail(pokemon: &Pokemon) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "--- {} ---", pokemon);
    if let Some(generation) = pokemon.generation() {
        let _ = writeln!(output, "{}", generation.full_name());
    }
    let _ = writeln!(
        output,
        "Height: {:.1} m   Weight: {:.1} kg",
        pokemon.height_m(),
        pokemon.weight_kg()
    );
    if let Some(experience) = pokemon.base_experience {
        let _ = writeln!(output, "Base experience: {}", experience);
    }
    let _ = writeln!(output, "Artwork: {}", pokemon.image_url());
    if let Some(description) = pokemon.description() {
        let _ = writeln!(output, "\n{}", description);
    }

    if !pokemon.stats.is_empty() {
        output.push_str("\nBase Stats:\n");
        for stat in StatName::ALL {
            let _ = writeln!(output, "  {:<16}{:>3}", stat.label(), pokemon.stat_value(stat));
        }
        let _ = writeln!(output, "  {:<16}{:>3}", "Total", pokemon.base_stat_total());
    }

    if !pokemon.abilities.is_empty() {
        output.push_str("\nAbilities:\n");
        for slot in &pokemon.abilities {
            let hidden = if slot.is_hidden { " (hidden)" } else { "" };
            let effect = slot
                .ability
                .effect_texts
                .first()
                .map(|e| e.short_effect.as_str())
                .filter(|e| !e.is_empty());
            match effect {
                Some(effect) => {
                    let _ = writeln!(
                        output,
                        "  {}{}: {}",
                        capitalize(&slot.ability.name),
                        hidden,
                        effect
                    );
                }
                None => {
                    let _ = writeln!(output, "  {}{}", capitalize(&slot.ability.name), hidden);
                }
            }
        }
    }

    let stages = pokemon.evolution_stages();
    if stages.len() > 1 {
        output.push_str("\nEvolution:\n");
        for stage in &stages {
            let indent = "  ".repeat(stage.depth + 1);
            let mut how = Vec::new();
            if let Some(level) = stage.min_level {
                how.push(format!("level {}", level));
            }
            if let Some(item) = &stage.item {
                how.push(capitalize(item));
            }
            if how.is_empty() {
                if let Some(trigger) = stage.trigger.as_deref().filter(|_| stage.depth > 0) {
                    how.push(capitalize(trigger));
                }
            }
            if how.is_empty() {
                let _ = writeln!(output, "{}{}", indent, capitalize(&stage.name));
            } else {
                let _ = writeln!(
                    output,
                    "{}{} ({})",
                    indent,
                    capitalize(&stage.name),
                    how.join(", ")
                );
            }
        }
    }

    if !pokemon.moves.is_empty() {
        output.push_str("\nLevel-up Moves:\n");
        for learned in &pokemon.moves {
            let info = &learned.move_info;
            let move_type = info
                .move_type
                .as_ref()
                .map(|t| t.name.as_str())
                .unwrap_or("-");
            let power = info.power.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
            let _ = writeln!(
                output,
                "  Lv {:>2}  {:<18}{:<10}Power {}",
                learned.level,
                capitalize(&info.name),
                move_type,
                power
            );
        }
    }
    output
}

/// Side-by-side stat table with the best and worst value in each row marked.
pub fn render_comparison(set: &ComparisonSet) -> String {
    if set.is_empty() {
        return format!(
            "No Pokémon selected for comparison. Add between {} and {}.\n",
            MIN_COMPARISON, MAX_COMPARISON
        );
    }
    let table = set.stat_table();
    let mut output = String::new();
    let _ = write!(output, "{:<16}", "");
    for name in &table.names {
        let _ = write!(output, "{:>14}", name);
    }
    output.push('\n');

    for row in &table.rows {
        let _ = write!(output, "{:<16}", row.stat.label());
        for cell in &row.cells {
            let mark = if cell.is_highest {
                "+"
            } else if cell.is_lowest {
                "-"
            } else {
                " "
            };
            let _ = write!(output, "{:>13}{}", cell.value, mark);
        }
        output.push('\n');
    }

    let _ = write!(output, "{:<16}", "Total");
    for total in &table.totals {
        let _ = write!(output, "{:>13} ", total);
    }
    output.push('\n');

    if !set.is_ready() {
        let _ = writeln!(
            output,
            "\nAdd at least {} Pokémon to compare.",
            MIN_COMPARISON
        );
    } else {
        output.push_str("\n+ highest   - lowest\n");
    }
    output
}

pub fn render_suggestions(suggestions: &[Pokemon]) -> String {
    if suggestions.is_empty() {
        return "No suggestions.\n".to_string();
    }
    suggestions
        .iter()
        .map(|p| format!("#{:04} {}\n", p.id, p.display_name()))
        .collect()
}

pub fn render_compare_add(outcome: CompareAdd, id: u32) -> String {
    match outcome {
        CompareAdd::Added => format!("Added #{:04} to the comparison.", id),
        CompareAdd::AlreadySelected => format!("#{:04} is already being compared.", id),
        CompareAdd::Full => format!(
            "The comparison already holds {} Pokémon. Remove one first.",
            MAX_COMPARISON
        ),
        CompareAdd::NotFound => format!("No Pokémon with id {}.", id),
    }
}
