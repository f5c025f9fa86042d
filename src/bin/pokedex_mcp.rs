//! Pokédex Explorer MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! exposes catalog search, filtering, sorting, paging and comparison to an
//! LLM client over stdio. State is saved after every change.

use std::borrow::Cow;
use std::sync::Arc;

use pokedex_explorer::config::ExplorerConfig;
use pokedex_explorer::controller::SearchController;
use pokedex_explorer::explorer_interface::*;
use pokedex_explorer::gateway::GraphqlGateway;
use pokedex_explorer::logging::{init_logging, LogConfig};
use pokedex_explorer::persistence::{load_or_default, JsonFileStorage, StateStorage};
use pokedex_explorer::store::{SearchStore, ViewState};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::info;

#[derive(Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    controller: Arc<SearchController<GraphqlGateway>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    #[schemars(description = "Name or partial name to search for")]
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TypeFilterRequest {
    #[schemars(description = "Type name, e.g. 'fire' or 'dragon'")]
    pub type_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerationFilterRequest {
    #[schemars(description = "Generation number (1-9)")]
    pub generation: u8,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SortRequest {
    #[schemars(
        description = "One of: name-asc, name-desc, id-asc, id-desc, hp-asc, hp-desc, attack-asc, attack-desc"
    )]
    pub sort: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PageRequest {
    #[schemars(description = "Page number, starting at 1")]
    pub page: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PokemonIdRequest {
    #[schemars(description = "National Pokédex number")]
    pub id: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestRequest {
    #[schemars(description = "Partially typed name; empty for popular picks")]
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShowStatsRequest {
    #[schemars(description = "Whether list rows include base stats")]
    pub show_stats: bool,
}

fn text(body: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(body.into())]))
}

#[tool_router]
impl PokedexService {
    pub fn new(controller: SearchController<GraphqlGateway>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            controller: Arc::new(controller),
        }
    }

    fn results_text(&self) -> String {
        self.controller.read(render_results)
    }

    async fn ensure_loaded(&self) {
        let initial = self
            .controller
            .read(|store| store.view_state() == ViewState::Initial);
        if initial {
            self.controller.refresh().await;
        }
    }

    #[tool(description = "Search Pokémon by name and show the first page of matches")]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        if request.query.trim().is_empty() {
            self.controller.clear_search().await;
        } else {
            self.controller.search(&request.query).await;
        }
        text(self.results_text())
    }

    #[tool(description = "Clear the search term and return to the full list")]
    async fn clear_search(&self) -> Result<CallToolResult, McpError> {
        self.controller.clear_search().await;
        text(self.results_text())
    }

    #[tool(description = "Only show Pokémon of this type (filters combine)")]
    async fn add_type_filter(
        &self,
        Parameters(request): Parameters<TypeFilterRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_pokemon_type(&request.type_name) {
            Ok(pokemon_type) => {
                self.controller.add_type_filter(pokemon_type).await;
                text(self.results_text())
            }
            Err(e) => text(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Remove a type filter")]
    async fn remove_type_filter(
        &self,
        Parameters(request): Parameters<TypeFilterRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_pokemon_type(&request.type_name) {
            Ok(pokemon_type) => {
                self.controller.remove_type_filter(pokemon_type).await;
                text(self.results_text())
            }
            Err(e) => text(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Only show Pokémon introduced in this generation (filters combine)")]
    async fn add_generation_filter(
        &self,
        Parameters(request): Parameters<GenerationFilterRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_generation(request.generation) {
            Ok(generation) => {
                self.controller.add_generation_filter(generation).await;
                text(self.results_text())
            }
            Err(e) => text(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Remove a generation filter")]
    async fn remove_generation_filter(
        &self,
        Parameters(request): Parameters<GenerationFilterRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_generation(request.generation) {
            Ok(generation) => {
                self.controller.remove_generation_filter(generation).await;
                text(self.results_text())
            }
            Err(e) => text(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Remove every type and generation filter")]
    async fn clear_filters(&self) -> Result<CallToolResult, McpError> {
        self.controller.clear_filters().await;
        text(self.results_text())
    }

    #[tool(description = "Change the sort order of the results")]
    async fn set_sort(
        &self,
        Parameters(request): Parameters<SortRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_sort(&request.sort) {
            Ok(sort) => {
                self.controller.set_sort_by(sort).await;
                text(self.results_text())
            }
            Err(e) => text(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Jump to a page of results")]
    async fn go_to_page(
        &self,
        Parameters(request): Parameters<PageRequest>,
    ) -> Result<CallToolResult, McpError> {
        if request.page < 1 {
            return text(format!("Error: page must be 1 or more, got {}", request.page));
        }
        self.controller.go_to_page(request.page).await;
        text(self.results_text())
    }

    #[tool(description = "Append the next page to the current results")]
    async fn load_more(&self) -> Result<CallToolResult, McpError> {
        self.ensure_loaded().await;
        if !self.controller.load_more().await {
            let at_end = self.controller.read(|store| !store.can_load_more());
            if at_end {
                return text("There are no more results to load.");
            }
        }
        text(self.results_text())
    }

    #[tool(description = "Reload the current results, e.g. after an error")]
    async fn refresh(&self) -> Result<CallToolResult, McpError> {
        self.controller.refresh().await;
        text(self.results_text())
    }

    #[tool(description = "Show the current results, filters and sort")]
    async fn get_results(&self) -> Result<CallToolResult, McpError> {
        self.ensure_loaded().await;
        let summary = self
            .controller
            .read(|store| render_filter_summary(store.filters(), store.sort_by()));
        text(format!("{}\n{}", summary, self.results_text()))
    }

    #[tool(description = "Full details for one Pokémon: stats, abilities, evolutions, moves")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<PokemonIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.controller.lookup(request.id).await {
            Ok(Some(pokemon)) => text(render_pokemon_detail(&pokemon)),
            Ok(None) => text(format!("No Pokémon with id {}.", request.id)),
            Err(e) => Err(McpError {
                code: ErrorCode(-32603),
                message: Cow::from(e.user_message()),
                data: None,
            }),
        }
    }

    #[tool(description = "Name suggestions for partially typed text")]
    async fn suggest(
        &self,
        Parameters(request): Parameters<SuggestRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.controller.suggest(&request.text).await {
            Ok(suggestions) => text(render_suggestions(&suggestions)),
            Err(e) => Err(McpError {
                code: ErrorCode(-32603),
                message: Cow::from(e.user_message()),
                data: None,
            }),
        }
    }

    #[tool(description = "Add a Pokémon to the side-by-side comparison (up to 4)")]
    async fn compare_add(
        &self,
        Parameters(request): Parameters<PokemonIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.controller.compare_add(request.id).await {
            Ok(outcome) => text(render_compare_add(outcome, request.id)),
            Err(e) => text(format!("Error: {}", e.user_message())),
        }
    }

    #[tool(description = "Remove a Pokémon from the comparison")]
    async fn compare_remove(
        &self,
        Parameters(request): Parameters<PokemonIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        if self.controller.compare_remove(request.id) {
            text(format!("Removed #{:04} from the comparison.", request.id))
        } else {
            text(format!("#{:04} is not being compared.", request.id))
        }
    }

    #[tool(description = "Empty the comparison")]
    async fn compare_clear(&self) -> Result<CallToolResult, McpError> {
        self.controller.compare_clear();
        text("Comparison cleared.")
    }

    #[tool(description = "Switch the comparison view on or off")]
    async fn toggle_comparison(&self) -> Result<CallToolResult, McpError> {
        if self.controller.toggle_comparison() {
            text(render_comparison(&self.controller.comparison()))
        } else {
            text("Comparison view closed.")
        }
    }

    #[tool(description = "Show the side-by-side stat table for the selected Pokémon")]
    async fn show_comparison(&self) -> Result<CallToolResult, McpError> {
        text(render_comparison(&self.controller.comparison()))
    }

    #[tool(description = "Choose whether result rows include base stats")]
    async fn set_show_stats(
        &self,
        Parameters(request): Parameters<ShowStatsRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.controller.set_show_stats(request.show_stats);
        text(self.results_text())
    }

    #[tool(description = "Forget the search, filters, sort, preferences and comparison")]
    async fn reset(&self) -> Result<CallToolResult, McpError> {
        self.controller.reset();
        text("Explorer state reset.")
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_verbosity(1).with_ansi(false));

    let config = ExplorerConfig::load(None)?;
    let storage: Arc<dyn StateStorage> = Arc::new(JsonFileStorage::new(&config.state_file));
    let store = SearchStore::restore(load_or_default(storage.as_ref()));
    let gateway = GraphqlGateway::new(&config.endpoint, config.request_timeout())?;
    let controller = SearchController::new(gateway, store).with_storage(storage);

    info!(endpoint = %config.endpoint, state_file = %config.state_file.display(), "Pokédex MCP server starting");
    let service = PokedexService::new(controller);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    info!("server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    info!(?quit_reason, "Pokédex MCP server exiting");
    Ok(())
}
