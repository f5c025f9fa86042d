//! Pokédex Explorer
//!
//! A client for the PokéAPI GraphQL catalog: name search, type and generation
//! filters, sorting, paging with "load more", a bounded side-by-side
//! comparison, and persistence of the user's search state between runs.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod comparison;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod errors;
pub mod explorer_interface;
pub mod filters;
pub mod gateway;
pub mod graphql;
pub mod logging;
pub mod pagination;
pub mod persistence;
pub mod pokemon;
pub mod query;
pub mod sorting;
pub mod store;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pokedex-explorer` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Closed vocabularies shared with every front end.
pub use schema::{Generation, PokemonType, SortOption, StatName};

// --- From this crate's modules (`src/`) ---

// The store and its async driver.
pub use controller::{CompareAdd, SearchController};
pub use store::{FetchTicket, PersistentState, Preferences, SearchStore, SortState, ViewState};

// Query building and remote execution.
pub use gateway::{CatalogGateway, CatalogPage, GraphqlGateway};
pub use query::{build_request, FetchRequest, QueryShape, SearchCriteria};

// Core data types.
pub use comparison::ComparisonSet;
pub use filters::FilterState;
pub use pagination::PaginationInfo;
pub use pokemon::Pokemon;

// Persistence and configuration.
pub use config::ExplorerConfig;
pub use persistence::{JsonFileStorage, MemoryStorage, StateStorage};

// Crate-specific error and result types.
pub use errors::{
    CatalogError, CatalogResult, ConfigError, ConfigResult, PersistenceError, PersistenceResult,
};
