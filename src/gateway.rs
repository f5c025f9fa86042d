//! Executes catalog requests against the remote GraphQL service.

use crate::errors::{CatalogError, CatalogResult};
use crate::graphql;
use crate::pokemon::Pokemon;
use crate::query::{search_pattern, FetchRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Public PokéAPI GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://beta.pokeapi.co/graphql/v1beta";

/// Suggestions returned per keystroke.
pub const SUGGESTION_LIMIT: u32 = 8;

/// Records offered when the search box is empty.
pub const POPULAR_LIMIT: u32 = 6;

const LIST_ROOT: &str = "pokemon_v2_pokemon";
const AGGREGATE_COUNT_POINTER: &str = "/pokemon_v2_pokemon_aggregate/aggregate/count";
const DETAIL_ROOT: &str = "pokemon_v2_pokemon_by_pk";

/// One resolved list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub rows: Vec<Pokemon>,
    /// Size of the whole matching set, not of this page.
    pub total_count: u32,
}

/// Anything that can answer catalog requests.
pub trait CatalogGateway: Send + Sync {
    fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = CatalogResult<CatalogPage>> + Send;

    /// Full detail for one record. `Ok(None)` when the id doesn't exist.
    fn fetch_pokemon(&self, id: u32)
        -> impl Future<Output = CatalogResult<Option<Pokemon>>> + Send;

    /// Name matches for type-ahead, in id order.
    fn fetch_suggestions(
        &self,
        term: &str,
        limit: u32,
    ) -> impl Future<Output = CatalogResult<Vec<Pokemon>>> + Send;

    /// The first-generation records shown before anything is typed.
    fn fetch_popular(&self, limit: u32) -> impl Future<Output = CatalogResult<Vec<Pokemon>>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

impl GraphqlResponse {
    /// GraphQL errors win over partial data.
    fn into_data(self) -> CatalogResult<Value> {
        if !self.errors.is_empty() {
            return Err(CatalogError::Protocol(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data
            .ok_or_else(|| CatalogError::Decode("response carried no data".to_string()))
    }
}

/// Reads a list response's rows and aggregate count.
///
/// A missing or zero aggregate falls back to the number of rows returned; a
/// missing row list is an empty page rather than an error.
pub fn decode_page(data: &Value) -> CatalogResult<CatalogPage> {
    let rows = decode_rows(data)?;
    let total_count = data
        .pointer(AGGREGATE_COUNT_POINTER)
        .and_then(Value::as_u64)
        .filter(|count| *count > 0)
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or_else(|| u32::try_from(rows.len()).unwrap_or(u32::MAX));
    Ok(CatalogPage { rows, total_count })
}

/// Reads the row list. A row that still fails to decode after null fields
/// fall back to defaults is skipped with a warning; it never fails the page.
pub fn decode_rows(data: &Value) -> CatalogResult<Vec<Pokemon>> {
    let rows = match data.get(LIST_ROOT) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            warn!(root = LIST_ROOT, found = %other, "row list is not an array, treating as empty");
            return Ok(Vec::new());
        }
    };
    let decoded = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match Pokemon::deserialize(row) {
            Ok(pokemon) => Some(pokemon),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable catalog row");
                None
            }
        })
        .collect();
    Ok(decoded)
}

pub fn decode_detail(data: &Value) -> CatalogResult<Option<Pokemon>> {
    match data.get(DETAIL_ROOT) {
        None | Some(Value::Null) => Ok(None),
        Some(row) => Pokemon::deserialize(row)
            .map(Some)
            .map_err(|e| CatalogError::Decode(format!("{}: {}", DETAIL_ROOT, e))),
    }
}

/// The production gateway: JSON POSTs to a GraphQL endpoint over reqwest.
#[derive(Debug, Clone)]
pub struct GraphqlGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GraphqlGateway {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn execute(
        &self,
        operation_name: &str,
        query: &str,
        variables: Value,
    ) -> CatalogResult<Value> {
        let started = Instant::now();
        let body = GraphqlRequest {
            query,
            operation_name,
            variables,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!(operation = operation_name, error = %e, "catalog request failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation = operation_name, status = status.as_u16(), "catalog returned error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: GraphqlResponse = response.json().await?;
        debug!(
            operation = operation_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog query complete"
        );
        envelope.into_data()
    }
}

impl CatalogGateway for GraphqlGateway {
    async fn fetch_page(&self, request: &FetchRequest) -> CatalogResult<CatalogPage> {
        let data = self
            .execute(request.operation_name(), request.document(), request.variables())
            .await?;
        decode_page(&data)
    }

    async fn fetch_pokemon(&self, id: u32) -> CatalogResult<Option<Pokemon>> {
        let data = self
            .execute(
                graphql::DETAIL_OPERATION,
                graphql::GET_POKEMON_BY_ID,
                json!({ "id": id }),
            )
            .await?;
        decode_detail(&data)
    }

    async fn fetch_suggestions(&self, term: &str, limit: u32) -> CatalogResult<Vec<Pokemon>> {
        let data = self
            .execute(
                graphql::SUGGESTIONS_OPERATION,
                graphql::GET_SEARCH_SUGGESTIONS,
                json!({ "name": search_pattern(term), "limit": limit }),
            )
            .await?;
        decode_rows(&data)
    }

    async fn fetch_popular(&self, limit: u32) -> CatalogResult<Vec<Pokemon>> {
        let data = self
            .execute(
                graphql::POPULAR_OPERATION,
                graphql::GET_POPULAR_POKEMON,
                json!({ "limit": limit }),
            )
            .await?;
        decode_rows(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::StatName;

    fn envelope(body: Value) -> CatalogResult<Value> {
        serde_json::from_value::<GraphqlResponse>(body)
            .unwrap()
            .into_data()
    }

    #[test]
    fn test_decode_page_reads_rows_and_aggregate() {
        let data = json!({
            "pokemon_v2_pokemon": [
                { "id": 1, "name": "bulbasaur" },
                { "id": 2, "name": "ivysaur" }
            ],
            "pokemon_v2_pokemon_aggregate": { "aggregate": { "count": 1025 } }
        });
        let page = decode_page(&data).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1].name, "ivysaur");
        assert_eq!(page.total_count, 1025);
    }

    #[test]
    fn test_missing_or_zero_aggregate_falls_back_to_row_count() {
        let missing = json!({ "pokemon_v2_pokemon": [{ "id": 25, "name": "pikachu" }] });
        assert_eq!(decode_page(&missing).unwrap().total_count, 1);

        let zero = json!({
            "pokemon_v2_pokemon": [{ "id": 25, "name": "pikachu" }, { "id": 26, "name": "raichu" }],
            "pokemon_v2_pokemon_aggregate": { "aggregate": { "count": 0 } }
        });
        assert_eq!(decode_page(&zero).unwrap().total_count, 2);
    }

    #[test]
    fn test_missing_rows_is_an_empty_page() {
        let page = decode_page(&json!({})).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_null_nested_field_keeps_the_page() {
        let data = json!({
            "pokemon_v2_pokemon": [
                { "id": 1, "name": "bulbasaur" },
                {
                    "id": 2,
                    "name": "ivysaur",
                    "pokemon_v2_pokemonstats": [
                        { "base_stat": null, "pokemon_v2_stat": { "name": "hp" } },
                        { "base_stat": 62, "pokemon_v2_stat": { "name": "attack" } }
                    ]
                }
            ],
            "pokemon_v2_pokemon_aggregate": { "aggregate": { "count": 2 } }
        });
        let page = decode_page(&data).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1].stat_value(StatName::Hp), 0);
        assert_eq!(page.rows[1].stat_value(StatName::Attack), 62);
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let data = json!({
            "pokemon_v2_pokemon": [
                { "id": "not a number" },
                { "id": 4, "name": "charmander" }
            ]
        });
        let page = decode_page(&data).unwrap();
        assert_eq!(page.rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4]);
        assert_eq!(page.total_count, 1);

        let not_a_list = json!({ "pokemon_v2_pokemon": { "id": 4 } });
        assert!(decode_rows(&not_a_list).unwrap().is_empty());
    }

    #[test]
    fn test_graphql_errors_become_protocol_errors() {
        let result = envelope(json!({
            "data": null,
            "errors": [
                { "message": "field 'foo' not found" },
                { "message": "second" }
            ]
        }));
        assert_eq!(
            result,
            Err(CatalogError::Protocol(vec![
                "field 'foo' not found".to_string(),
                "second".to_string()
            ]))
        );
    }

    #[test]
    fn test_envelope_without_data_is_a_decode_error() {
        assert!(matches!(envelope(json!({})), Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_detail_null_is_not_found() {
        let data = json!({ "pokemon_v2_pokemon_by_pk": null });
        assert_eq!(decode_detail(&data).unwrap(), None);

        let data = json!({ "pokemon_v2_pokemon_by_pk": { "id": 151, "name": "mew", "height": 4 } });
        let mew = decode_detail(&data).unwrap().unwrap();
        assert_eq!(mew.id, 151);
        assert_eq!(mew.height, 4);
    }

    #[test]
    fn test_request_envelope_shape() {
        let body = GraphqlRequest {
            query: graphql::GET_POPULAR_POKEMON,
            operation_name: graphql::POPULAR_OPERATION,
            variables: json!({ "limit": POPULAR_LIMIT }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetPopularPokemon");
        assert_eq!(json["variables"]["limit"], 6);
        assert!(json["query"].as_str().unwrap().contains("_lte: 151"));
    }
}
