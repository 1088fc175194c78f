//! Read operations over a loaded [`Pokedex`].

use crate::pokedex::Pokedex;
use crate::search::search_listing;
use schema::{EvolutionRef, FacetSelection, Facets, PokemonRecord};
use serde::Serialize;

/// Listing size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 999;

/// A `[skip, skip + limit)` window over the numeric listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Page { skip, limit }
    }

    /// Build a page from signed transport arguments. Missing values take
    /// their defaults and negative values are clamped to zero.
    pub fn from_signed(skip: Option<i64>, limit: Option<i64>, default_limit: usize) -> Self {
        let clamp = |value: i64| usize::try_from(value).unwrap_or(0);
        Page {
            skip: skip.map(clamp).unwrap_or(0),
            limit: limit.map(clamp).unwrap_or(default_limit),
        }
    }
}

/// A record with its evolution references resolved to full records.
///
/// Resolved records are serialized as stored, so their own references stay
/// as `{num, name}` pairs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetail<'a> {
    pub id: &'a str,
    pub num: &'a str,
    pub name: &'a str,
    pub img: &'a str,
    pub types: &'a [String],
    pub weaknesses: &'a [String],
    pub height: &'a str,
    pub weight: &'a str,
    pub egg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candy_count: Option<u32>,
    pub prev_evolutions: Vec<&'a PokemonRecord>,
    pub next_evolutions: Vec<&'a PokemonRecord>,
}

impl Pokedex {
    /// Records sorted by ascending numeric id, windowed by `page`.
    /// A window past the end is empty, a window overlapping it is truncated.
    pub fn pokemon_many(&self, page: Page) -> Vec<&PokemonRecord> {
        self.listing().skip(page.skip).take(page.limit).collect()
    }

    /// Exact lookup by id.
    pub fn pokemon_one(&self, id: &str) -> Option<&PokemonRecord> {
        self.get_by_id(id)
    }

    /// Resolve references against the dataset, keeping their order and
    /// dropping the ones that do not resolve.
    pub fn resolve_evolutions(&self, refs: &[EvolutionRef]) -> Vec<&PokemonRecord> {
        refs.iter()
            .filter_map(|evolution| {
                let found = self.get_by_num(&evolution.num);
                if found.is_none() {
                    tracing::debug!(
                        "Evolution reference {} ({}) does not resolve",
                        evolution.num,
                        evolution.name
                    );
                }
                found
            })
            .collect()
    }

    pub fn prev_evolutions(&self, record: &PokemonRecord) -> Vec<&PokemonRecord> {
        self.resolve_evolutions(record.prev_evolution_refs())
    }

    pub fn next_evolutions(&self, record: &PokemonRecord) -> Vec<&PokemonRecord> {
        self.resolve_evolutions(record.next_evolution_refs())
    }

    pub fn detail<'a>(&'a self, record: &'a PokemonRecord) -> PokemonDetail<'a> {
        PokemonDetail {
            id: &record.id,
            num: &record.num,
            name: &record.name,
            img: &record.img,
            types: &record.types,
            weaknesses: &record.weaknesses,
            height: &record.height,
            weight: &record.weight,
            egg: &record.egg,
            candy: record.candy.as_deref(),
            candy_count: record.candy_count,
            prev_evolutions: self.prev_evolutions(record),
            next_evolutions: self.next_evolutions(record),
        }
    }

    /// The distinct facet values, computed at load.
    pub fn populate_filters(&self) -> &Facets {
        self.facets()
    }

    /// Fuzzy name search over the whole listing, narrowed by `selection`.
    pub fn search(&self, query: &str, selection: &FacetSelection) -> Vec<&PokemonRecord> {
        let listing: Vec<&PokemonRecord> = self.listing().collect();
        search_listing(&listing, self.name_index(), query, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::LazyLock;

    static POKEDEX: LazyLock<Pokedex> =
        LazyLock::new(|| Pokedex::embedded().expect("embedded dataset should load"));

    fn names(records: &[&PokemonRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_first_page_of_two() {
        let page = POKEDEX.pokemon_many(Page::new(0, 2));
        assert_eq!(names(&page), vec!["Bulbasaur", "Ivysaur"]);
    }

    #[rstest]
    #[case(0, 5, 5)]
    #[case(3, 4, 4)]
    #[case(24, 10, 2)]
    #[case(26, 10, 0)]
    #[case(500, 1, 0)]
    #[case(0, 0, 0)]
    fn test_pages_are_sorted_and_bounded(
        #[case] skip: usize,
        #[case] limit: usize,
        #[case] expected_len: usize,
    ) {
        let page = POKEDEX.pokemon_many(Page::new(skip, limit));

        assert_eq!(page.len(), expected_len);
        let ids: Vec<u64> = page.iter().map(|r| r.id.parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "unsorted page: {:?}", ids);
        if let Some(first) = ids.first() {
            assert_eq!(*first, skip as u64 + 1);
        }
    }

    #[test]
    fn test_default_page_returns_everything() {
        assert_eq!(POKEDEX.pokemon_many(Page::default()).len(), POKEDEX.len());
    }

    #[rstest]
    #[case(None, None, Page::new(0, 999))]
    #[case(Some(5), Some(10), Page::new(5, 10))]
    #[case(Some(-3), Some(-1), Page::new(0, 0))]
    fn test_page_from_signed(
        #[case] skip: Option<i64>,
        #[case] limit: Option<i64>,
        #[case] expected: Page,
    ) {
        assert_eq!(Page::from_signed(skip, limit, DEFAULT_LIMIT), expected);
    }

    #[test]
    fn test_lookup_by_id() {
        let pikachu = POKEDEX.pokemon_one("25").expect("Pikachu should exist");
        assert_eq!(pikachu.name, "Pikachu");
        assert_eq!(pikachu.id, "25");

        assert!(POKEDEX.pokemon_one("025").is_none());
        assert!(POKEDEX.pokemon_one("9999").is_none());
        assert!(POKEDEX.pokemon_one("pikachu").is_none());
    }

    #[test]
    fn test_evolutions_resolve_in_order() {
        let bulbasaur = POKEDEX.pokemon_one("1").unwrap();
        let venusaur = POKEDEX.pokemon_one("3").unwrap();

        assert_eq!(names(&POKEDEX.next_evolutions(bulbasaur)), vec!["Ivysaur", "Venusaur"]);
        assert!(POKEDEX.prev_evolutions(bulbasaur).is_empty());
        assert_eq!(names(&POKEDEX.prev_evolutions(venusaur)), vec!["Bulbasaur", "Ivysaur"]);
    }

    #[test]
    fn test_evolution_resolution_is_idempotent() {
        for record in POKEDEX.records() {
            assert_eq!(POKEDEX.next_evolutions(record), POKEDEX.next_evolutions(record));
            assert_eq!(POKEDEX.prev_evolutions(record), POKEDEX.prev_evolutions(record));
        }
    }

    #[test]
    fn test_dangling_and_repeated_references() {
        let refs = vec![
            EvolutionRef { num: "026".to_string(), name: "Raichu".to_string() },
            EvolutionRef { num: "999".to_string(), name: "Missingno".to_string() },
            EvolutionRef { num: "026".to_string(), name: "Raichu".to_string() },
        ];

        // Unresolved references are dropped; duplicates are kept.
        assert_eq!(names(&POKEDEX.resolve_evolutions(&refs)), vec!["Raichu", "Raichu"]);
    }

    #[test]
    fn test_detail_embeds_resolved_records_one_level_deep() {
        let ivysaur = POKEDEX.pokemon_one("2").unwrap();
        let value = serde_json::to_value(POKEDEX.detail(ivysaur)).unwrap();

        assert_eq!(value["name"], "Ivysaur");
        assert_eq!(value["candyCount"], 100);
        assert_eq!(value["prevEvolutions"][0]["name"], "Bulbasaur");
        assert_eq!(value["nextEvolutions"][0]["name"], "Venusaur");
        // The resolved record keeps its stored references.
        assert_eq!(value["prevEvolutions"][0]["nextEvolutions"][0]["num"], "002");
    }

    #[test]
    fn test_filters_are_sorted_without_duplicates() {
        let facets = POKEDEX.populate_filters();

        for values in [&facets.types, &facets.weaknesses] {
            let mut expected = values.clone();
            expected.sort();
            expected.dedup();
            assert_eq!(values, &expected);
        }
        assert!(facets.types.contains(&"Fire".to_string()));
        assert!(facets.weaknesses.contains(&"Psychic".to_string()));
    }

    #[test]
    fn test_fire_type_with_water_weakness() {
        let selection = FacetSelection::default()
            .with_type("Fire")
            .with_weakness("Water");

        let found = POKEDEX.search("", &selection);

        assert_eq!(names(&found), vec!["Charmander", "Charmeleon", "Charizard"]);
    }

    #[test]
    fn test_search_tolerates_typos() {
        let found = POKEDEX.search("pikachi", &FacetSelection::default());
        assert_eq!(names(&found), vec!["Pikachu"]);

        let found = POKEDEX.search("bsaur", &FacetSelection::default());
        assert_eq!(names(&found), vec!["Bulbasaur"]);
    }
}
