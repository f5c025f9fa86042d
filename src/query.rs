//! Maps the store's search criteria onto exactly one catalog request.
//!
//! Priority is search > combined filter > type filter > generation filter >
//! default list. Building a request has no side effects; executing it is the
//! gateway's job.

use crate::filters::FilterState;
use crate::graphql;
use crate::pagination::offset_for;
use schema::{Generation, PokemonType, SortOption};
use serde_json::{json, Value};
use std::fmt;

/// Ordering the remote service can apply itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOrder {
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
}

impl RemoteOrder {
    /// Stat sorts have no remote equivalent: they ask for id order and are
    /// reordered page-locally after the fetch.
    pub fn for_sort(sort: SortOption) -> RemoteOrder {
        match sort {
            SortOption::NameAsc => RemoteOrder::NameAsc,
            SortOption::NameDesc => RemoteOrder::NameDesc,
            SortOption::IdAsc => RemoteOrder::IdAsc,
            SortOption::IdDesc => RemoteOrder::IdDesc,
            SortOption::HpAsc
            | SortOption::HpDesc
            | SortOption::AttackAsc
            | SortOption::AttackDesc => RemoteOrder::IdAsc,
        }
    }

    /// The `order_by` argument value, e.g. `[{"name": "asc"}]`.
    pub fn to_variable(&self) -> Value {
        match self {
            RemoteOrder::IdAsc => json!([{ "id": "asc" }]),
            RemoteOrder::IdDesc => json!([{ "id": "desc" }]),
            RemoteOrder::NameAsc => json!([{ "name": "asc" }]),
            RemoteOrder::NameDesc => json!([{ "name": "desc" }]),
        }
    }
}

/// Window and ordering shared by every list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub limit: u32,
    pub offset: u32,
    pub order: RemoteOrder,
}

/// Which list query a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    Search,
    CombinedFilter,
    TypeFilter,
    GenerationFilter,
    Default,
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryShape::Search => "search",
            QueryShape::CombinedFilter => "combined-filter",
            QueryShape::TypeFilter => "type-filter",
            QueryShape::GenerationFilter => "generation-filter",
            QueryShape::Default => "default",
        };
        write!(f, "{}", name)
    }
}

/// A fully bound list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Search {
        pattern: String,
        page: PageSpec,
    },
    CombinedFilter {
        types: Vec<PokemonType>,
        generations: Vec<Generation>,
        page: PageSpec,
    },
    TypeFilter {
        types: Vec<PokemonType>,
        page: PageSpec,
    },
    GenerationFilter {
        generations: Vec<Generation>,
        page: PageSpec,
    },
    Default {
        page: PageSpec,
    },
}

impl FetchRequest {
    pub fn shape(&self) -> QueryShape {
        match self {
            FetchRequest::Search { .. } => QueryShape::Search,
            FetchRequest::CombinedFilter { .. } => QueryShape::CombinedFilter,
            FetchRequest::TypeFilter { .. } => QueryShape::TypeFilter,
            FetchRequest::GenerationFilter { .. } => QueryShape::GenerationFilter,
            FetchRequest::Default { .. } => QueryShape::Default,
        }
    }

    pub fn page(&self) -> &PageSpec {
        match self {
            FetchRequest::Search { page, .. }
            | FetchRequest::CombinedFilter { page, .. }
            | FetchRequest::TypeFilter { page, .. }
            | FetchRequest::GenerationFilter { page, .. }
            | FetchRequest::Default { page } => page,
        }
    }

    pub fn document(&self) -> &'static str {
        match self.shape() {
            QueryShape::Search => graphql::SEARCH_POKEMON,
            QueryShape::CombinedFilter => graphql::GET_FILTERED_POKEMON_LIST,
            QueryShape::TypeFilter => graphql::GET_POKEMON_BY_TYPES,
            QueryShape::GenerationFilter => graphql::GET_POKEMON_BY_GENERATIONS,
            QueryShape::Default => graphql::GET_POKEMON_LIST,
        }
    }

    pub fn operation_name(&self) -> &'static str {
        match self.shape() {
            QueryShape::Search => graphql::SEARCH_OPERATION,
            QueryShape::CombinedFilter => graphql::COMBINED_FILTER_OPERATION,
            QueryShape::TypeFilter => graphql::TYPE_FILTER_OPERATION,
            QueryShape::GenerationFilter => graphql::GENERATION_FILTER_OPERATION,
            QueryShape::Default => graphql::LIST_OPERATION,
        }
    }

    /// Bound variables for the request's document.
    pub fn variables(&self) -> Value {
        let page = self.page();
        let mut variables = json!({
            "limit": page.limit,
            "offset": page.offset,
            "orderBy": page.order.to_variable(),
        });
        match self {
            FetchRequest::Search { pattern, .. } => {
                variables["name"] = json!(pattern);
            }
            FetchRequest::CombinedFilter {
                types, generations, ..
            } => {
                variables["types"] = type_names(types);
                variables["generations"] = generation_numbers(generations);
            }
            FetchRequest::TypeFilter { types, .. } => {
                variables["types"] = type_names(types);
            }
            FetchRequest::GenerationFilter { generations, .. } => {
                variables["generations"] = generation_numbers(generations);
            }
            FetchRequest::Default { .. } => {}
        }
        variables
    }
}

fn type_names(types: &[PokemonType]) -> Value {
    json!(types.iter().map(PokemonType::api_name).collect::<Vec<_>>())
}

fn generation_numbers(generations: &[Generation]) -> Value {
    json!(generations.iter().map(Generation::number).collect::<Vec<_>>())
}

/// `%term%` for the catalog's case-insensitive `_ilike` match.
pub fn search_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

/// Everything the builder reads from the store.
#[derive(Debug, Clone, Copy)]
pub struct SearchCriteria<'a> {
    pub search_query: &'a str,
    pub has_searched: bool,
    pub filters: &'a FilterState,
    pub sort: SortOption,
    pub current_page: u32,
    pub page_size: u32,
}

impl SearchCriteria<'_> {
    pub fn has_active_search(&self) -> bool {
        self.has_searched && !self.search_query.trim().is_empty()
    }
}

pub fn build_request(criteria: &SearchCriteria<'_>) -> FetchRequest {
    let page = PageSpec {
        limit: criteria.page_size,
        offset: offset_for(criteria.current_page, criteria.page_size),
        order: RemoteOrder::for_sort(criteria.sort),
    };
    let filters = criteria.filters;
    let has_types = !filters.types.is_empty();
    let has_generations = !filters.generations.is_empty();

    if criteria.has_active_search() {
        FetchRequest::Search {
            pattern: search_pattern(criteria.search_query),
            page,
        }
    } else if has_types && has_generations {
        FetchRequest::CombinedFilter {
            types: filters.types.clone(),
            generations: filters.generations.clone(),
            page,
        }
    } else if has_types {
        FetchRequest::TypeFilter {
            types: filters.types.clone(),
            page,
        }
    } else if has_generations {
        FetchRequest::GenerationFilter {
            generations: filters.generations.clone(),
            page,
        }
    } else {
        FetchRequest::Default { page }
    }
}
