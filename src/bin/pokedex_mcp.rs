//! Pokedex MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp)
//! that exposes the Pokedex queries for LLM interaction.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pokedex_api::mcp_interface::*;
use pokedex_api::{init_tracing, FacetSelection, Page, Pokedex, PokedexConfig, ServerError};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};

#[derive(Parser)]
#[command(name = "pokedex-mcp", about = "MCP server for a static Pokemon dataset")]
struct Cli {
    /// RON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON dataset to use instead of the embedded one
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    pokedex: Arc<Pokedex>,
    default_limit: usize,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPokemonRequest {
    #[schemars(description = "Number of Pokemon to skip, in dex order (default 0)")]
    pub skip: Option<i64>,
    #[schemars(description = "Maximum number of Pokemon to return")]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupPokemonRequest {
    #[schemars(description = "Id of the Pokemon to look up, e.g. '25'")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FacetValuesRequest {
    #[schemars(description = "Which facet to list: 'type' or 'weakness'")]
    pub facet: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchPokemonRequest {
    #[schemars(description = "Name to search for; typos and partial names are tolerated")]
    pub query: Option<String>,
    #[schemars(description = "Types every result must have")]
    pub types: Option<Vec<String>>,
    #[schemars(description = "Weaknesses every result must have")]
    pub weaknesses: Option<Vec<String>>,
}

#[tool_router]
impl PokedexService {
    pub fn new(pokedex: Arc<Pokedex>, default_limit: usize) -> Self {
        Self {
            tool_router: Self::tool_router(),
            pokedex,
            default_limit,
        }
    }

    #[tool(description = "List Pokemon in dex order, with optional paging")]
    async fn list_pokemon(
        &self,
        Parameters(request): Parameters<ListPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let page = Page::from_signed(request.skip, request.limit, self.default_limit);
        let text = handle_list_command(&self.pokedex, page);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up a Pokemon by id, including its evolutions")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<LookupPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = handle_lookup_pokemon_command(&self.pokedex, &request.id);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List every type and weakness that can be used as a filter")]
    async fn list_filters(&self) -> Result<CallToolResult, McpError> {
        let text = display_filters(self.pokedex.populate_filters());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List the values of one filter facet")]
    async fn list_facet_values(
        &self,
        Parameters(request): Parameters<FacetValuesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = handle_facet_values_command(self.pokedex.populate_filters(), &request.facet);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Search Pokemon by name and filter by types and weaknesses")]
    async fn search_pokemon(
        &self,
        Parameters(request): Parameters<SearchPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let selection = FacetSelection::new(
            request.types.unwrap_or_default(),
            request.weaknesses.unwrap_or_default(),
        );
        let query = request.query.unwrap_or_default();
        let text = handle_search_command(&self.pokedex, &query, &selection);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = PokedexConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.dataset = Some(data);
    }
    let pokedex = Arc::new(Pokedex::load(&config.dataset_source())?);

    tracing::info!("Pokedex MCP Server starting...");
    let service = PokedexService::new(pokedex, config.default_limit);
    let transport = (stdin(), stdout());

    let server = service
        .serve(transport)
        .await
        .map_err(|e| ServerError::Io(std::io::Error::other(e)))?;

    tracing::info!("Server running, waiting for shutdown...");
    let quit_reason = server
        .waiting()
        .await
        .map_err(|e| ServerError::Io(std::io::Error::other(e)))?;

    tracing::info!("Pokedex MCP Server exiting: {:?}", quit_reason);
    Ok(())
}
