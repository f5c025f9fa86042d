//! Async front door to the store: runs the store's fetch tickets against a
//! gateway, debounces typed input, and autosaves after every mutation.

use crate::comparison::ComparisonSet;
use crate::debounce::Debouncer;
use crate::errors::CatalogResult;
use crate::filters::FilterState;
use crate::gateway::{CatalogGateway, POPULAR_LIMIT, SUGGESTION_LIMIT};
use crate::persistence::StateStorage;
use crate::pokemon::Pokemon;
use crate::store::{FetchTicket, PersistentState, SearchStore};
use schema::{Generation, PokemonType, SortOption};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Typed text shorter than this gets no name suggestions.
pub const MIN_SUGGESTION_CHARS: usize = 2;

/// What happened to a request to add a record to the comparison set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareAdd {
    Added,
    AlreadySelected,
    Full,
    NotFound,
}

pub struct SearchController<G> {
    gateway: G,
    store: Mutex<SearchStore>,
    storage: Option<Arc<dyn StateStorage>>,
    debouncer: Mutex<Debouncer>,
}

impl<G: CatalogGateway> SearchController<G> {
    pub fn new(gateway: G, store: SearchStore) -> Self {
        SearchController {
            gateway,
            store: Mutex::new(store),
            storage: None,
            debouncer: Mutex::new(Debouncer::default()),
        }
    }

    /// Saves the persistent state after every mutation.
    pub fn with_storage(mut self, storage: Arc<dyn StateStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = Mutex::new(debouncer);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn lock_store(&self) -> MutexGuard<'_, SearchStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_debouncer(&self) -> MutexGuard<'_, Debouncer> {
        self.debouncer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the store under its lock.
    pub fn read<T>(&self, f: impl FnOnce(&SearchStore) -> T) -> T {
        f(&self.lock_store())
    }

    pub fn persistent_state(&self) -> PersistentState {
        self.read(|store| store.persistent().clone())
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let state = self.persistent_state();
        if let Err(err) = storage.save(&state) {
            warn!(error = %err, "could not save explorer state");
        }
    }

    /// Applies a synchronous mutation, saves, and runs the fetch it asked
    /// for. Returns whether a fetch result landed in the store.
    async fn mutate(&self, f: impl FnOnce(&mut SearchStore) -> Option<FetchTicket>) -> bool {
        let ticket = f(&mut *self.lock_store());
        self.persist();
        match ticket {
            Some(ticket) => self.dispatch(ticket).await,
            None => false,
        }
    }

    /// Applies several changes at once without fetching. Follow with
    /// [`refresh`](SearchController::refresh) to load the result.
    pub fn update(&self, f: impl FnOnce(&mut SearchStore)) {
        f(&mut *self.lock_store());
        self.persist();
    }

    /// Executes a ticket and lands the outcome. Stale outcomes are dropped.
    pub async fn dispatch(&self, ticket: FetchTicket) -> bool {
        let outcome = self.gateway.fetch_page(&ticket.request).await;
        let applied = self.lock_store().apply(&ticket, outcome);
        if !applied {
            debug!(seq = ticket.seq, "superseded before it landed");
        }
        applied
    }

    // --- Search ---

    pub async fn search(&self, query: &str) -> bool {
        info!(query, "search");
        self.lock_debouncer().cancel();
        self.mutate(|store| Some(store.handle_search(query))).await
    }

    pub async fn clear_search(&self) -> bool {
        self.lock_debouncer().cancel();
        self.mutate(|store| Some(store.clear_search())).await
    }

    /// First load, and retry after an error.
    pub async fn refresh(&self) -> bool {
        self.mutate(|store| Some(store.refresh())).await
    }

    pub async fn go_to_page(&self, page: i64) -> bool {
        self.mutate(|store| store.go_to_page(page)).await
    }

    pub async fn load_more(&self) -> bool {
        self.mutate(SearchStore::load_more).await
    }

    // --- Typed input ---

    /// Records a keystroke. The search itself runs from [`settle_input`].
    ///
    /// [`settle_input`]: SearchController::settle_input
    pub fn input_changed(&self, text: &str) {
        self.lock_debouncer().push(text, Instant::now());
    }

    /// When the pending keystrokes settle, if any are pending.
    pub fn input_deadline(&self) -> Option<Instant> {
        self.lock_debouncer().deadline()
    }

    /// Waits out the debounce window and runs the search for whatever text
    /// is left standing. Settled empty text clears the search instead.
    /// Returns `false` when there was nothing pending.
    pub async fn settle_input(&self) -> bool {
        loop {
            let deadline = self.lock_debouncer().deadline();
            let Some(deadline) = deadline else {
                return false;
            };
            tokio::time::sleep_until(deadline).await;
            let settled = self.lock_debouncer().poll(Instant::now());
            if let Some(text) = settled {
                if text.trim().is_empty() {
                    self.clear_search().await;
                } else {
                    self.search(&text).await;
                }
                return true;
            }
        }
    }

    /// Name suggestions for partially typed text. Empty text offers the
    /// popular list; a single character offers nothing.
    pub async fn suggest(&self, text: &str) -> CatalogResult<Vec<Pokemon>> {
        let term = text.trim();
        if term.is_empty() {
            self.gateway.fetch_popular(POPULAR_LIMIT).await
        } else if term.chars().count() < MIN_SUGGESTION_CHARS {
            Ok(Vec::new())
        } else {
            self.gateway.fetch_suggestions(term, SUGGESTION_LIMIT).await
        }
    }

    pub async fn lookup(&self, id: u32) -> CatalogResult<Option<Pokemon>> {
        self.gateway.fetch_pokemon(id).await
    }

    // --- Filters and sort ---

    pub async fn add_type_filter(&self, pokemon_type: PokemonType) -> bool {
        self.mutate(|store| store.add_type_filter(pokemon_type)).await
    }

    pub async fn remove_type_filter(&self, pokemon_type: PokemonType) -> bool {
        self.mutate(|store| store.remove_type_filter(pokemon_type))
            .await
    }

    pub async fn add_generation_filter(&self, generation: Generation) -> bool {
        self.mutate(|store| store.add_generation_filter(generation))
            .await
    }

    pub async fn remove_generation_filter(&self, generation: Generation) -> bool {
        self.mutate(|store| store.remove_generation_filter(generation))
            .await
    }

    pub async fn set_filters(&self, filters: FilterState) -> bool {
        self.mutate(|store| store.set_filters(filters)).await
    }

    pub async fn clear_filters(&self) -> bool {
        self.mutate(SearchStore::clear_filters).await
    }

    pub async fn set_sort_by(&self, sort_by: SortOption) -> bool {
        self.mutate(|store| store.set_sort_by(sort_by)).await
    }

    pub fn set_show_stats(&self, show_stats: bool) {
        self.lock_store().set_show_stats(show_stats);
        self.persist();
    }

    // --- Comparison ---

    /// Adds a record by id, taking it from the visible results when present
    /// and fetching it otherwise.
    pub async fn compare_add(&self, id: u32) -> CatalogResult<CompareAdd> {
        let visible = self.read(|store| {
            if store.is_in_comparison(id) {
                return Err(CompareAdd::AlreadySelected);
            }
            if store.comparison().is_full() {
                return Err(CompareAdd::Full);
            }
            Ok(store.pokemon().iter().find(|p| p.id == id).cloned())
        });
        let pokemon = match visible {
            Err(outcome) => return Ok(outcome),
            Ok(Some(pokemon)) => pokemon,
            Ok(None) => match self.gateway.fetch_pokemon(id).await? {
                Some(pokemon) => pokemon,
                None => return Ok(CompareAdd::NotFound),
            },
        };
        Ok(self.compare_add_pokemon(pokemon))
    }

    pub fn compare_add_pokemon(&self, pokemon: Pokemon) -> CompareAdd {
        let outcome = {
            let mut store = self.lock_store();
            if store.add_to_comparison(pokemon.clone()) {
                CompareAdd::Added
            } else if store.is_in_comparison(pokemon.id) {
                CompareAdd::AlreadySelected
            } else {
                CompareAdd::Full
            }
        };
        self.persist();
        outcome
    }

    pub fn compare_remove(&self, id: u32) -> bool {
        let removed = self.lock_store().remove_from_comparison(id);
        self.persist();
        removed
    }

    pub fn compare_clear(&self) {
        self.lock_store().clear_comparison();
        self.persist();
    }

    pub fn toggle_comparison(&self) -> bool {
        let comparing = self.lock_store().toggle_comparison();
        self.persist();
        comparing
    }

    pub fn comparison(&self) -> ComparisonSet {
        self.read(|store| store.comparison().clone())
    }

    /// Everything back to defaults. Requests still in flight are ignored
    /// when they land.
    pub fn reset(&self) {
        self.lock_debouncer().cancel();
        self.lock_store().reset();
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatalogError;
    use crate::gateway::CatalogPage;
    use crate::persistence::MemoryStorage;
    use crate::pokemon::test_support::named;
    use crate::query::{FetchRequest, QueryShape};
    use crate::store::ViewState;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Serves `total` numbered rows. Requests for a gated offset wait until
    /// the gate is released.
    #[derive(Default)]
    struct FakeGateway {
        total: u32,
        gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
        fail_next: Mutex<Option<CatalogError>>,
        requests: Mutex<Vec<FetchRequest>>,
        suggestion_calls: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn with_total(total: u32) -> Self {
            FakeGateway {
                total,
                ..FakeGateway::default()
            }
        }

        fn gate(&self, offset: u32) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(offset, rx);
            tx
        }

        fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl CatalogGateway for FakeGateway {
        async fn fetch_page(&self, request: &FetchRequest) -> CatalogResult<CatalogPage> {
            let gate = self.gates.lock().unwrap().remove(&request.page().offset);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.requests.lock().unwrap().push(request.clone());
            if let Some(err) = self.fail_next.lock().unwrap().take() {
                return Err(err);
            }
            let page = request.page();
            let first = page.offset + 1;
            let last = (page.offset + page.limit).min(self.total);
            Ok(CatalogPage {
                rows: (first..=last).map(|id| named(id, "row")).collect(),
                total_count: self.total,
            })
        }

        async fn fetch_pokemon(&self, id: u32) -> CatalogResult<Option<Pokemon>> {
            Ok((id <= self.total).then(|| named(id, "fetched")))
        }

        async fn fetch_suggestions(&self, term: &str, limit: u32) -> CatalogResult<Vec<Pokemon>> {
            self.suggestion_calls.lock().unwrap().push(term.to_string());
            Ok((1..=limit).map(|id| named(id, term)).collect())
        }

        async fn fetch_popular(&self, limit: u32) -> CatalogResult<Vec<Pokemon>> {
            Ok((1..=limit).map(|id| named(id, "popular")).collect())
        }
    }

    fn controller(total: u32) -> SearchController<FakeGateway> {
        SearchController::new(FakeGateway::with_total(total), SearchStore::new())
    }

    fn visible_ids(controller: &SearchController<FakeGateway>) -> Vec<u32> {
        controller.read(|store| store.pokemon().iter().map(|p| p.id).collect())
    }

    #[tokio::test]
    async fn test_refresh_loads_first_page() {
        let controller = controller(45);
        assert!(controller.refresh().await);
        controller.read(|store| {
            assert_eq!(store.pokemon().len(), 20);
            assert_eq!(store.pagination().total_pages, 3);
            assert_eq!(store.view_state(), ViewState::Results);
        });
    }

    #[tokio::test]
    async fn test_slow_earlier_page_cannot_overwrite_later_page() {
        let controller = controller(100);
        controller.refresh().await;
        let release_page_two = controller.gateway().gate(20);

        let (two, three, _) = tokio::join!(
            controller.go_to_page(2),
            controller.go_to_page(3),
            async {
                tokio::task::yield_now().await;
                let _ = release_page_two.send(());
            }
        );

        assert!(!two);
        assert!(three);
        controller.read(|store| {
            assert_eq!(store.pagination().current_page, 3);
            assert_eq!(store.pokemon()[0].id, 41);
            assert!(!store.is_loading());
        });
    }

    #[tokio::test]
    async fn test_load_more_twice_appends_each_page_once() {
        let controller = controller(45);
        controller.refresh().await;
        assert!(controller.load_more().await);
        assert!(controller.load_more().await);
        assert!(!controller.load_more().await);
        let ids = visible_ids(&controller);
        assert_eq!(ids, (1..=45).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrent_load_more_is_ignored() {
        let controller = controller(100);
        controller.refresh().await;
        let release = controller.gateway().gate(20);
        let (first, second, _) = tokio::join!(controller.load_more(), controller.load_more(), async {
            tokio::task::yield_now().await;
            let _ = release.send(());
        });
        assert!(first);
        assert!(!second);
        assert_eq!(visible_ids(&controller).len(), 40);
    }

    #[tokio::test]
    async fn test_filters_pick_the_query_shape() {
        let controller = controller(100);
        controller.add_type_filter(PokemonType::Fire).await;
        controller
            .add_generation_filter(Generation::new(1).unwrap())
            .await;
        controller.search("char").await;
        let shapes: Vec<QueryShape> = controller
            .gateway()
            .requests()
            .iter()
            .map(FetchRequest::shape)
            .collect();
        assert_eq!(
            shapes,
            vec![
                QueryShape::TypeFilter,
                QueryShape::CombinedFilter,
                QueryShape::Search
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_surfaces_message_and_retry_recovers() {
        let controller = controller(10);
        *controller.gateway().fail_next.lock().unwrap() =
            Some(CatalogError::Status { status: 503 });
        controller.search("pika").await;
        controller.read(|store| {
            assert_eq!(store.view_state(), ViewState::Error);
            assert!(store.error().unwrap().contains("503"));
        });
        controller.refresh().await;
        controller.read(|store| {
            assert_eq!(store.error(), None);
            assert_eq!(store.pokemon().len(), 10);
        });
    }

    #[tokio::test]
    async fn test_every_mutation_is_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let controller = controller(10).with_storage(storage.clone());
        controller.set_sort_by(SortOption::NameDesc).await;
        assert_eq!(
            storage.snapshot().unwrap().sort.sort_by,
            SortOption::NameDesc
        );
        controller.set_show_stats(false);
        assert!(!storage.snapshot().unwrap().preferences.show_stats);
        assert_eq!(controller.compare_add(3).await.unwrap(), CompareAdd::Added);
        assert!(storage.snapshot().unwrap().comparison.contains(3));
        controller.reset();
        assert_eq!(storage.snapshot().unwrap(), PersistentState::default());
    }

    #[tokio::test]
    async fn test_compare_add_outcomes() {
        let controller = controller(10);
        controller.refresh().await;
        assert_eq!(controller.compare_add(1).await.unwrap(), CompareAdd::Added);
        assert_eq!(
            controller.compare_add(1).await.unwrap(),
            CompareAdd::AlreadySelected
        );
        assert_eq!(controller.compare_add(99).await.unwrap(), CompareAdd::NotFound);
        for id in 2..=4 {
            assert_eq!(controller.compare_add(id).await.unwrap(), CompareAdd::Added);
        }
        assert_eq!(controller.compare_add(5).await.unwrap(), CompareAdd::Full);
        assert_eq!(controller.comparison().len(), 4);
        // Taken from the visible page rather than fetched.
        assert_eq!(controller.comparison().selected()[0].name, "row");
    }

    #[tokio::test]
    async fn test_suggestion_thresholds() {
        let controller = controller(10);
        assert_eq!(controller.suggest("").await.unwrap().len(), 6);
        assert!(controller.suggest(" p ").await.unwrap().is_empty());
        assert_eq!(controller.suggest(" pi ").await.unwrap().len(), 8);
        assert_eq!(
            *controller.gateway().suggestion_calls.lock().unwrap(),
            vec!["pi".to_string()]
        );
    }

    #[tokio::test]
    async fn test_typing_burst_runs_one_search() {
        let controller = controller(10).with_debouncer(Debouncer::new(Duration::from_millis(20)));
        controller.input_changed("p");
        controller.input_changed("pi");
        controller.input_changed("pika");
        assert!(controller.input_deadline().is_some());
        assert!(controller.settle_input().await);
        assert_eq!(controller.input_deadline(), None);
        assert!(!controller.settle_input().await);

        let requests = controller.gateway().requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            &requests[0],
            FetchRequest::Search { pattern, .. } if pattern == "%pika%"
        ));
    }

    #[tokio::test]
    async fn test_settled_empty_input_clears_search() {
        let controller = controller(10).with_debouncer(Debouncer::new(Duration::from_millis(5)));
        controller.search("mew").await;
        controller.input_changed("  ");
        controller.settle_input().await;
        controller.read(|store| {
            assert_eq!(store.search_query(), "");
            assert!(!store.has_searched());
        });
        assert_eq!(
            controller.gateway().requests().last().map(FetchRequest::shape),
            Some(QueryShape::Default)
        );
    }

    #[tokio::test]
    async fn test_reset_orphans_inflight_fetch() {
        let controller = controller(100);
        let release = controller.gateway().gate(0);
        let (landed, _) = tokio::join!(controller.search("abc"), async {
            tokio::task::yield_now().await;
            controller.reset();
            let _ = release.send(());
        });
        assert!(!landed);
        controller.read(|store| {
            assert!(store.pokemon().is_empty());
            assert_eq!(store.search_query(), "");
        });
    }
}
