// In: src/lib.rs

//! Pokedex API
//!
//! A read-only query service over a static Pokemon dataset. The dataset is
//! loaded once at startup and shared by the HTTP API, the MCP server and the
//! command line search.

// --- MODULE DECLARATIONS ---
pub mod api_server;
pub mod config;
pub mod errors;
pub mod mcp_interface;
pub mod pokedex;
pub mod query;
pub mod search;
pub mod telemetry;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    EvolutionRef, FacetKind, FacetSelection, Facets, PokemonRecord, PokemonSummary,
};

// --- From this crate's modules (`src/`) ---

// Loading and querying.
pub use pokedex::{DatasetSource, Pokedex};
pub use query::{Page, PokemonDetail, DEFAULT_LIMIT};
pub use search::{filter_by_facets, NameIndex};

// Servers and runtime setup.
pub use api_server::{create_router, AppState};
pub use config::{PokedexConfig, ServerConfig};
pub use telemetry::init_tracing;

// Crate-specific error and result types.
pub use errors::{
    ConfigError, ConfigResult, DatasetError, DatasetResult, SearchError, SearchResult, ServerError,
};
