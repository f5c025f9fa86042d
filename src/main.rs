//! Command-line Pokédex explorer.
//!
//! Each invocation restores the saved search state, applies the command, and
//! saves the state again, so filters, sort and the comparison set carry over
//! between runs.

use clap::{Args, Parser, Subcommand};
use pokedex_explorer::config::ExplorerConfig;
use pokedex_explorer::controller::SearchController;
use pokedex_explorer::debounce::Debouncer;
use pokedex_explorer::explorer_interface::*;
use pokedex_explorer::filters::FilterState;
use pokedex_explorer::gateway::GraphqlGateway;
use pokedex_explorer::logging::{init_logging, LogConfig};
use pokedex_explorer::persistence::{load_or_default, JsonFileStorage, MemoryStorage, StateStorage};
use pokedex_explorer::store::SearchStore;
use pokedex_explorer::{Generation, PokemonType, SortOption};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

#[derive(Parser)]
#[command(
    name = "pokedex-explorer",
    version,
    about = "Search, filter, sort and compare Pokémon from the PokéAPI catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RON config file (default: ./pokedex.ron when present).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint to query.
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Where the search state is saved between runs.
    #[arg(long = "state-file", value_name = "PATH", global = true)]
    state_file: Option<PathBuf>,

    /// Don't read or write the state file.
    #[arg(long = "no-persist", global = true)]
    no_persist: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the catalog without a search term.
    List(ListArgs),

    /// Search by name.
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Name suggestions for partially typed text.
    Suggest {
        #[arg(default_value = "")]
        text: String,
    },

    /// Full detail for one Pokémon.
    Show { id: u32 },

    /// Search as you type: each line read from stdin replaces the search
    /// text, and the search runs once input pauses. `:more` loads the next
    /// page, `:quit` exits.
    Browse,

    /// Manage the side-by-side comparison.
    #[command(subcommand)]
    Compare(CompareCommand),

    /// Show or hide stats in list rows.
    Stats {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Forget all saved search state.
    Reset,
}

#[derive(Args)]
struct ListArgs {
    /// Only these types (repeatable).
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_type_arg)]
    types: Vec<PokemonType>,

    /// Only these generations, 1-9 (repeatable).
    #[arg(long = "gen", value_name = "N", value_parser = parse_generation_arg)]
    generations: Vec<Generation>,

    /// Drop all saved filters first.
    #[arg(long = "clear-filters")]
    clear_filters: bool,

    /// Sort order, e.g. name-asc or hp-desc.
    #[arg(long, value_parser = parse_sort_arg)]
    sort: Option<SortOption>,

    #[arg(long, default_value_t = 1)]
    page: i64,

    /// Append this many following pages.
    #[arg(long, default_value_t = 0)]
    more: u32,
}

#[derive(Subcommand)]
enum CompareCommand {
    Add { id: u32 },
    Remove { id: u32 },
    Clear,
    Show,
}

fn parse_type_arg(value: &str) -> Result<PokemonType, String> {
    parse_pokemon_type(value)
}

fn parse_generation_arg(value: &str) -> Result<Generation, String> {
    let number: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a generation number", value))?;
    parse_generation(number)
}

fn parse_sort_arg(value: &str) -> Result<SortOption, String> {
    parse_sort(value)
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got '{}'", other)),
    }
}

async fn browse(controller: &SearchController<GraphqlGateway>) -> std::io::Result<()> {
    controller.refresh().await;
    controller.read(|store| print!("{}", render_results(store)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = controller.input_deadline();
        tokio::select! {
            line = lines.next_line() => match line?.as_deref().map(str::trim) {
                None | Some(":quit") => break,
                Some(":more") => {
                    if controller.load_more().await {
                        controller.read(|store| print!("{}", render_results(store)));
                    } else {
                        println!("There are no more results to load.");
                    }
                }
                Some(text) => controller.input_changed(text),
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if controller.settle_input().await {
                    controller.read(|store| print!("{}", render_results(store)));
                }
            }
        }
    }

    // Input that hadn't settled when stdin closed still counts.
    if controller.settle_input().await {
        controller.read(|store| print!("{}", render_results(store)));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(state_file) = &cli.state_file {
        config.state_file = state_file.clone();
    }

    let storage: Arc<dyn StateStorage> = if cli.no_persist {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(JsonFileStorage::new(&config.state_file))
    };
    let store = SearchStore::restore(load_or_default(storage.as_ref()));
    let gateway = GraphqlGateway::new(&config.endpoint, config.request_timeout())?;
    let controller = SearchController::new(gateway, store)
        .with_storage(storage)
        .with_debouncer(Debouncer::new(config.debounce()));

    match cli.command {
        Command::List(args) => {
            controller.update(|store| {
                store.clear_search();
                if args.clear_filters {
                    store.clear_filters();
                }
                if !args.types.is_empty() || !args.generations.is_empty() {
                    let mut filters = if args.clear_filters {
                        FilterState::default()
                    } else {
                        store.filters().clone()
                    };
                    for pokemon_type in &args.types {
                        filters.add_type(*pokemon_type);
                    }
                    for generation in &args.generations {
                        filters.add_generation(*generation);
                    }
                    store.set_filters(filters);
                }
                if let Some(sort) = args.sort {
                    store.set_sort_by(sort);
                }
                store.go_to_page(args.page);
            });
            controller.refresh().await;
            for _ in 0..args.more {
                if !controller.load_more().await {
                    break;
                }
            }
            controller.read(|store| {
                print!("{}", render_filter_summary(store.filters(), store.sort_by()));
                println!();
                print!("{}", render_results(store));
            });
        }
        Command::Search { query, page } => {
            controller.update(|store| {
                store.handle_search(&query);
                store.go_to_page(page);
            });
            controller.refresh().await;
            controller.read(|store| print!("{}", render_results(store)));
        }
        Command::Suggest { text } => match controller.suggest(&text).await {
            Ok(suggestions) => print!("{}", render_suggestions(&suggestions)),
            Err(err) => eprintln!("{}", err.user_message()),
        },
        Command::Show { id } => match controller.lookup(id).await {
            Ok(Some(pokemon)) => print!("{}", render_pokemon_detail(&pokemon)),
            Ok(None) => println!("No Pokémon with id {}.", id),
            Err(err) => eprintln!("{}", err.user_message()),
        },
        Command::Browse => browse(&controller).await?,
        Command::Compare(CompareCommand::Add { id }) => match controller.compare_add(id).await {
            Ok(outcome) => println!("{}", render_compare_add(outcome, id)),
            Err(err) => eprintln!("{}", err.user_message()),
        },
        Command::Compare(CompareCommand::Remove { id }) => {
            if controller.compare_remove(id) {
                println!("Removed #{:04} from the comparison.", id);
            } else {
                println!("#{:04} is not being compared.", id);
            }
        }
        Command::Compare(CompareCommand::Clear) => {
            controller.compare_clear();
            println!("Comparison cleared.");
        }
        Command::Compare(CompareCommand::Show) => {
            print!("{}", render_comparison(&controller.comparison()));
        }
        Command::Stats { enabled } => {
            controller.set_show_stats(enabled);
            println!("Stats in list rows: {}", if enabled { "on" } else { "off" });
        }
        Command::Reset => {
            controller.reset();
            println!("Saved search state cleared.");
        }
    }
    Ok(())
}
