// Pokedex Explorer Schema - Shared vocabulary
// This crate holds the closed sets the catalog client reasons about: type tags,
// canonical stat names, generations and sort options. It has no I/O so both the
// library and its binaries can depend on it freely.

pub use generation::*;
pub use pokemon_types::*;
pub use sort_option::*;
pub use stat_names::*;

pub mod generation;
pub mod pokemon_types;
pub mod sort_option;
pub mod stat_names;
