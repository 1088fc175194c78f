//! MCP interface functions used by the MCP server
//!
//! This module contains the text rendering and command handling behind each
//! MCP tool, kept as library functions so they can be tested without a
//! transport.

use std::fmt;

use crate::pokedex::Pokedex;
use crate::query::Page;
use schema::{FacetKind, FacetSelection, Facets, PokemonRecord, PokemonSummary};
use strum::IntoEnumIterator;

/// A species record with its evolutions, rendered for reading.
pub struct PokemonCard<'a> {
    pub pokedex: &'a Pokedex,
    pub record: &'a PokemonRecord,
}

impl fmt::Display for PokemonCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.record;
        const LABEL_WIDTH: usize = 12;

        // --- 1. Name and Pokedex Number ---
        writeln!(f, "{} (#{})", data.name, data.num)?;
        writeln!(f, "--------------------")?;

        // --- 2. Types and Weaknesses ---
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Type(s)", data.types.join(" / "))?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Weaknesses", data.weaknesses.join(", "))?;
        writeln!(f, "--------------------")?;

        // --- 3. Physical Attributes ---
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Height", data.height)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Weight", data.weight)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Egg", data.egg)?;
        if let Some(candy) = &data.candy {
            match data.candy_count {
                Some(count) => writeln!(f, "{:<LABEL_WIDTH$} : {} ({} to evolve)", "Candy", candy, count)?,
                None => writeln!(f, "{:<LABEL_WIDTH$} : {}", "Candy", candy)?,
            }
        }

        // --- 4. Evolution Line ---
        let prev = self.pokedex.prev_evolutions(data);
        let next = self.pokedex.next_evolutions(data);
        if !prev.is_empty() || !next.is_empty() {
            writeln!(f, "--------------------")?;
        }
        if !prev.is_empty() {
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Evolves from", join_names(&prev))?;
        }
        if !next.is_empty() {
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Evolves into", join_names(&next))?;
        }
        write!(f, "{:<LABEL_WIDTH$} : {}", "Image", data.img)
    }
}

fn join_names(records: &[&PokemonRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} (#{})", r.name, r.num))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// One `name - num` line per record, the way the list screen shows them.
pub fn display_pokemon_list(records: &[&PokemonRecord]) -> String {
    if records.is_empty() {
        return "No Pokemon matched.".to_string();
    }
    let mut output = String::new();
    for record in records {
        output.push_str(&format!("  {}\n", PokemonSummary::from(*record)));
    }
    output
}

/// Handles the "list" command with optional paging
pub fn handle_list_command(pokedex: &Pokedex, page: Page) -> String {
    let records = pokedex.pokemon_many(page);
    if records.is_empty() {
        return format!("No Pokemon after the first {} of {}.", page.skip, pokedex.len());
    }
    let mut output = format!(
        "Pokemon {}-{} of {}:\n",
        page.skip + 1,
        page.skip + records.len(),
        pokedex.len()
    );
    output.push_str(&display_pokemon_list(&records));
    output
}

/// Handles the "lookup pokemon" command for a single id
pub fn handle_lookup_pokemon_command(pokedex: &Pokedex, id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        return "Which Pokemon do you want to look up? (e.g., '25')".to_string();
    }

    match pokedex.pokemon_one(id) {
        Some(record) => format!("--- Pokemon Details ---\n{}", PokemonCard { pokedex, record }),
        None => format!("No Pokemon has the id '{}'.", id),
    }
}

/// Renders both facet lists
pub fn display_filters(facets: &Facets) -> String {
    let mut output = String::from("Available Filters:\n");
    for kind in FacetKind::iter() {
        output.push_str(&format!("  {}: {}\n", kind, facets.values(kind).join(", ")));
    }
    output
}

/// Handles the "facet values" command for one facet name
pub fn handle_facet_values_command(facets: &Facets, facet: &str) -> String {
    match facet.trim().parse::<FacetKind>() {
        Ok(kind) => format!("{} values:\n  {}", kind, facets.values(kind).join("\n  ")),
        Err(_) => {
            let known: Vec<String> = FacetKind::iter().map(|k| k.to_string()).collect();
            format!("Unknown facet '{}'. Use one of: {}.", facet, known.join(", "))
        }
    }
}

/// Handles the "search" command: fuzzy name match narrowed by facets
pub fn handle_search_command(pokedex: &Pokedex, query: &str, selection: &FacetSelection) -> String {
    let results = pokedex.search(query, selection);
    let mut output = format!("Found {} Pokemon", results.len());
    if !query.trim().is_empty() {
        output.push_str(&format!(" matching '{}'", query.trim()));
    }
    for kind in FacetKind::iter() {
        let selected = selection.selected(kind);
        if !selected.is_empty() {
            output.push_str(&format!(" [{}: {}]", kind, selected.join(" & ")));
        }
    }
    output.push_str(":\n");
    output.push_str(&display_pokemon_list(&results));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::LazyLock;

    static POKEDEX: LazyLock<Pokedex> =
        LazyLock::new(|| Pokedex::embedded().expect("embedded dataset should load"));

    #[test]
    fn test_card_shows_attributes_and_evolutions() {
        let text = handle_lookup_pokemon_command(&POKEDEX, "2");

        assert!(text.starts_with("--- Pokemon Details ---\nIvysaur (#002)"));
        assert!(text.contains("Grass / Poison"));
        assert!(text.contains("Bulbasaur Candy (100 to evolve)"));
        assert!(text.contains("Evolves from : Bulbasaur (#001)"));
        assert!(text.contains("Evolves into : Venusaur (#003)"));
    }

    #[test]
    fn test_lookup_miss_and_blank() {
        assert_eq!(
            handle_lookup_pokemon_command(&POKEDEX, "404"),
            "No Pokemon has the id '404'."
        );
        assert!(handle_lookup_pokemon_command(&POKEDEX, " ").starts_with("Which Pokemon"));
    }

    #[test]
    fn test_list_command() {
        let text = handle_list_command(&POKEDEX, Page::new(0, 2));
        assert_eq!(text, "Pokemon 1-2 of 26:\n  Bulbasaur - 001\n  Ivysaur - 002\n");

        let text = handle_list_command(&POKEDEX, Page::new(100, 10));
        assert_eq!(text, "No Pokemon after the first 100 of 26.");
    }

    #[test]
    fn test_facet_values_command() {
        let text = handle_facet_values_command(POKEDEX.facets(), "Type");
        assert!(text.starts_with("type values:\n  Bug\n  Electric"));

        let text = handle_facet_values_command(POKEDEX.facets(), "egg");
        assert_eq!(text, "Unknown facet 'egg'. Use one of: type, weakness.");
    }

    #[test]
    fn test_search_command() {
        let selection = FacetSelection::default().with_type("Electric");
        let text = handle_search_command(&POKEDEX, "pikachi", &selection);

        assert_eq!(
            text,
            "Found 1 Pokemon matching 'pikachi' [type: Electric]:\n  Pikachu - 025\n"
        );
        assert!(handle_search_command(&POKEDEX, "zzzz", &FacetSelection::default())
            .ends_with("No Pokemon matched."));
    }

    #[test]
    fn test_display_filters_lists_both_facets() {
        let text = display_filters(POKEDEX.facets());
        assert!(text.contains("  type: Bug, Electric, Fire"));
        assert!(text.contains("  weakness: "));
    }
}
