// Pokedex Schema - Shared type definitions
// This crate contains the record and filter types that are shared between
// the query layer, the HTTP API and the MCP server.

// Re-export the main types
pub use facets::*;
pub use species_data::*;

pub mod facets;
pub mod species_data;
