//! The search/filter/sort state store.
//!
//! Mutators are synchronous: each one updates state, and when the visible list
//! must change it returns a [`FetchTicket`] and flips the store into its loading
//! state. Whoever owns the store runs the ticket's request against a gateway
//! and hands the outcome back through [`SearchStore::apply`]. Tickets carry a
//! sequence number; only the most recently issued one may change state, so a
//! slow response for an abandoned page can never overwrite a newer one.

use crate::comparison::ComparisonSet;
use crate::errors::CatalogResult;
use crate::filters::FilterState;
use crate::gateway::CatalogPage;
use crate::pagination::{ListUpdate, PaginationInfo, DEFAULT_PAGE_SIZE};
use crate::pokemon::Pokemon;
use crate::query::{build_request, FetchRequest, SearchCriteria};
use crate::sorting::apply_local_sort;
use schema::{Generation, PokemonType, SortOption};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub show_stats: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences { show_stats: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub sort_by: SortOption,
}

/// The part of the store that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistentState {
    pub preferences: Preferences,
    pub search_query: String,
    pub filters: FilterState,
    pub sort: SortState,
    pub has_searched: bool,
    pub comparison: ComparisonSet,
}

impl PersistentState {
    pub fn normalized(self) -> Self {
        PersistentState {
            filters: self.filters.normalized(),
            comparison: self.comparison.normalized(),
            ..self
        }
    }
}

/// The part of the store rebuilt from scratch on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub pokemon: Vec<Pokemon>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub pagination: PaginationInfo,
    /// Set once a fetch for the current criteria has resolved.
    pub resolved: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            pokemon: Vec::new(),
            loading: false,
            loading_more: false,
            error: None,
            pagination: PaginationInfo::new(DEFAULT_PAGE_SIZE),
            resolved: false,
        }
    }
}

/// A request the store wants executed, tagged for last-request-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: FetchRequest,
    pub mode: ListUpdate,
}

/// Coarse view state, used to tell "nothing matched" apart from "nothing
/// asked yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Initial,
    Loading,
    Results,
    NoResults,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct SearchStore {
    persistent: PersistentState,
    session: SessionState,
    latest_seq: u64,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted state. Session state always starts
    /// fresh.
    pub fn restore(persistent: PersistentState) -> Self {
        SearchStore {
            persistent: persistent.normalized(),
            session: SessionState::default(),
            latest_seq: 0,
        }
    }

    // --- Read access ---

    pub fn persistent(&self) -> &PersistentState {
        &self.persistent
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn pokemon(&self) -> &[Pokemon] {
        &self.session.pokemon
    }

    pub fn search_query(&self) -> &str {
        &self.persistent.search_query
    }

    pub fn has_searched(&self) -> bool {
        self.persistent.has_searched
    }

    pub fn filters(&self) -> &FilterState {
        &self.persistent.filters
    }

    pub fn has_active_filters(&self) -> bool {
        self.persistent.filters.has_active_filters()
    }

    pub fn sort_by(&self) -> SortOption {
        self.persistent.sort.sort_by
    }

    pub fn preferences(&self) -> Preferences {
        self.persistent.preferences
    }

    pub fn pagination(&self) -> &PaginationInfo {
        &self.session.pagination
    }

    pub fn can_load_more(&self) -> bool {
        self.session.pagination.can_load_more()
    }

    pub fn is_loading(&self) -> bool {
        self.session.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.session.loading_more
    }

    pub fn error(&self) -> Option<&str> {
        self.session.error.as_deref()
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.persistent.comparison
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn has_active_search(&self) -> bool {
        self.criteria().has_active_search()
    }

    pub fn view_state(&self) -> ViewState {
        if self.session.error.is_some() {
            ViewState::Error
        } else if self.session.loading {
            ViewState::Loading
        } else if !self.session.pokemon.is_empty() {
            ViewState::Results
        } else if self.session.resolved && (self.has_active_search() || self.has_active_filters())
        {
            ViewState::NoResults
        } else {
            ViewState::Initial
        }
    }

    pub fn criteria(&self) -> SearchCriteria<'_> {
        SearchCriteria {
            search_query: &self.persistent.search_query,
            has_searched: self.persistent.has_searched,
            filters: &self.persistent.filters,
            sort: self.persistent.sort.sort_by,
            current_page: self.session.pagination.current_page,
            page_size: self.session.pagination.page_size,
        }
    }

    // --- Search mutators ---

    /// Starts a new search from page 1.
    pub fn handle_search(&mut self, query: &str) -> FetchTicket {
        self.persistent.search_query = query.to_string();
        self.persistent.has_searched = true;
        self.session.pagination.set_current_page(1);
        self.issue(ListUpdate::Replace)
    }

    /// Drops the search text and results, keeping filters, sort, preferences
    /// and the comparison set, and reloads the unsearched listing.
    pub fn clear_search(&mut self) -> FetchTicket {
        self.persistent.search_query.clear();
        self.persistent.has_searched = false;
        self.session = SessionState::default();
        self.issue(ListUpdate::Replace)
    }

    /// Re-issues the current request, for the first load or a user retry.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue(ListUpdate::Replace)
    }

    /// Jumps to `page`, replacing the visible rows. Pages below 1 are ignored.
    pub fn go_to_page(&mut self, page: i64) -> Option<FetchTicket> {
        if page < 1 {
            return None;
        }
        let page = u32::try_from(page).unwrap_or(u32::MAX);
        self.session.pagination.set_current_page(page);
        Some(self.issue(ListUpdate::Replace))
    }

    /// Fetches the next page and appends it. Ignored when there is no next
    /// page or any fetch is still in flight: appending onto rows that a
    /// pending page jump or criteria change is about to replace would mix
    /// pages.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if !self.can_load_more() || self.session.loading || self.session.loading_more {
            return None;
        }
        let next = self.session.pagination.current_page + 1;
        self.session.pagination.set_current_page(next);
        Some(self.issue(ListUpdate::Append))
    }

    // --- Filter and sort mutators ---
    //
    // These re-fetch the current page under the new criteria; they do not
    // rewind to page 1.

    pub fn add_type_filter(&mut self, pokemon_type: PokemonType) -> Option<FetchTicket> {
        let changed = self.persistent.filters.add_type(pokemon_type);
        self.reissue_if(changed)
    }

    pub fn remove_type_filter(&mut self, pokemon_type: PokemonType) -> Option<FetchTicket> {
        let changed = self.persistent.filters.remove_type(pokemon_type);
        self.reissue_if(changed)
    }

    pub fn add_generation_filter(&mut self, generation: Generation) -> Option<FetchTicket> {
        let changed = self.persistent.filters.add_generation(generation);
        self.reissue_if(changed)
    }

    pub fn remove_generation_filter(&mut self, generation: Generation) -> Option<FetchTicket> {
        let changed = self.persistent.filters.remove_generation(generation);
        self.reissue_if(changed)
    }

    /// Replaces both filter sets at once.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<FetchTicket> {
        let filters = filters.normalized();
        let changed = filters != self.persistent.filters;
        self.persistent.filters = filters;
        self.reissue_if(changed)
    }

    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        let changed = self.persistent.filters.clear();
        self.reissue_if(changed)
    }

    pub fn set_sort_by(&mut self, sort_by: SortOption) -> Option<FetchTicket> {
        let changed = self.persistent.sort.sort_by != sort_by;
        self.persistent.sort.sort_by = sort_by;
        self.reissue_if(changed)
    }

    // --- Preferences ---

    pub fn set_show_stats(&mut self, show_stats: bool) {
        self.persistent.preferences.show_stats = show_stats;
    }

    // --- Comparison ---

    pub fn add_to_comparison(&mut self, pokemon: Pokemon) -> bool {
        self.persistent.comparison.add(pokemon)
    }

    pub fn remove_from_comparison(&mut self, pokemon_id: u32) -> bool {
        self.persistent.comparison.remove(pokemon_id)
    }

    pub fn clear_comparison(&mut self) {
        self.persistent.comparison.clear();
    }

    pub fn toggle_comparison(&mut self) -> bool {
        self.persistent.comparison.toggle_comparing()
    }

    pub fn is_in_comparison(&self, pokemon_id: u32) -> bool {
        self.persistent.comparison.contains(pokemon_id)
    }

    /// Back to initial values, including filters, sort, preferences and the
    /// comparison set. Any fetch still in flight is orphaned.
    pub fn reset(&mut self) {
        self.persistent = PersistentState::default();
        self.session = SessionState::default();
        self.latest_seq += 1;
    }

    // --- Fetch lifecycle ---

    fn reissue_if(&mut self, changed: bool) -> Option<FetchTicket> {
        changed.then(|| self.issue(ListUpdate::Replace))
    }

    fn issue(&mut self, mode: ListUpdate) -> FetchTicket {
        self.latest_seq += 1;
        let request = build_request(&self.criteria());
        match mode {
            ListUpdate::Replace => {
                self.session.loading = true;
                self.session.loading_more = false;
            }
            ListUpdate::Append => {
                self.session.loading_more = true;
            }
        }
        self.session.error = None;
        debug!(
            seq = self.latest_seq,
            shape = %request.shape(),
            page = self.session.pagination.current_page,
            offset = request.page().offset,
            "issued catalog fetch"
        );
        FetchTicket {
            seq: self.latest_seq,
            request,
            mode,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Lands a fetch outcome. Returns `false`, leaving state untouched, when
    /// a newer ticket has been issued since.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: CatalogResult<CatalogPage>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale catalog response"
            );
            return false;
        }
        self.session.loading = false;
        self.session.loading_more = false;
        self.session.resolved = true;
        match outcome {
            Ok(page) => {
                let mut rows = page.rows;
                apply_local_sort(&mut rows, self.persistent.sort.sort_by);
                match ticket.mode {
                    ListUpdate::Replace => self.session.pokemon = rows,
                    ListUpdate::Append => self.session.pokemon.extend(rows),
                }
                self.session.pagination.update_total(page.total_count);
                self.session.error = None;
            }
            Err(err) => {
                warn!(seq = ticket.seq, error = %err, "catalog fetch failed");
                self.session.pokemon.clear();
                self.session.error = Some(err.user_message());
            }
        }
        true
    }
}
