//! Fuzzy name search over the loaded dataset.
//!
//! Names are lowercased into an `fst::Set`; a query is turned into the union
//! of a subsequence automaton and a typo-tolerant prefix automaton, and
//! every name the union accepts is a hit. Hits are ranked by how closely
//! they match, then by listing order.

use crate::errors::SearchResult;
use fst::automaton::{Levenshtein, Subsequence};
use fst::{Automaton, IntoStreamer, Set, Streamer};
use schema::{FacetSelection, PokemonRecord};
use std::collections::BTreeMap;

/// How closely a name matched the query. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
}

impl MatchTier {
    fn classify(name: &str, needle: &str) -> Self {
        if name == needle {
            MatchTier::Exact
        } else if name.starts_with(needle) {
            MatchTier::Prefix
        } else if name.contains(needle) {
            MatchTier::Substring
        } else {
            MatchTier::Fuzzy
        }
    }
}

/// Edit distance allowed for a query of the given length.
pub fn allowed_edits(needle: &str) -> u32 {
    match needle.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Index over display names. Positions refer to the slice of records the
/// index was built from.
#[derive(Debug)]
pub struct NameIndex {
    names: Set<Vec<u8>>,
    positions: BTreeMap<String, Vec<usize>>,
    len: usize,
    longest_name: usize,
}

impl NameIndex {
    pub fn build<'a, I>(records: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = &'a PokemonRecord>,
    {
        let mut positions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut len = 0;
        let mut longest_name = 0;
        for (position, record) in records.into_iter().enumerate() {
            let name = record.name.to_lowercase();
            longest_name = longest_name.max(name.chars().count());
            positions.entry(name).or_default().push(position);
            len += 1;
        }

        // BTreeMap keys are already sorted and unique, as fst requires.
        let names = Set::from_iter(positions.keys())?;

        Ok(Self {
            names,
            positions,
            len,
            longest_name,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Positions of the records whose names match `query`, best first.
    /// A blank query matches every record in order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return (0..self.len).collect();
        }
        // Neither automaton can accept a needle longer than every name plus
        // the allowed edits, so skip building them.
        let edits = allowed_edits(&needle);
        if needle.chars().count() > self.longest_name + edits as usize {
            return Vec::new();
        }

        let subsequence = Subsequence::new(&needle);
        let keys = match Levenshtein::new(&needle, edits) {
            Ok(typo_prefix) => self.matching_names(subsequence.union(typo_prefix.starts_with())),
            Err(err) => {
                tracing::debug!("Falling back to subsequence search for {:?}: {}", needle, err);
                self.matching_names(subsequence)
            }
        };

        let mut hits: Vec<(MatchTier, usize)> = Vec::new();
        for name in keys {
            let tier = MatchTier::classify(&name, &needle);
            if let Some(found) = self.positions.get(&name) {
                hits.extend(found.iter().map(|&position| (tier, position)));
            }
        }
        hits.sort_unstable();

        hits.into_iter().map(|(_, position)| position).collect()
    }

    fn matching_names<A: Automaton>(&self, automaton: A) -> Vec<String> {
        let mut stream = self.names.search(automaton).into_stream();
        let mut names = Vec::new();
        while let Some(key) = stream.next() {
            names.push(String::from_utf8_lossy(key).into_owned());
        }
        names
    }
}

/// Keep the records that satisfy every selected facet value.
pub fn filter_by_facets<'a, I>(records: I, selection: &FacetSelection) -> Vec<&'a PokemonRecord>
where
    I: IntoIterator<Item = &'a PokemonRecord>,
{
    records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect()
}

/// Fuzzy search over `listing` narrowed by the facet selection.
pub fn search_listing<'a>(
    listing: &[&'a PokemonRecord],
    index: &NameIndex,
    query: &str,
    selection: &FacetSelection,
) -> Vec<&'a PokemonRecord> {
    let ranked = index
        .search(query)
        .into_iter()
        .filter_map(|position| listing.get(position).copied());
    filter_by_facets(ranked, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(id: &str, name: &str, types: &[&str], weaknesses: &[&str]) -> PokemonRecord {
        PokemonRecord {
            id: id.to_string(),
            num: format!("{:0>3}", id),
            name: name.to_string(),
            img: String::new(),
            types: types.iter().map(|s| s.to_string()).collect(),
            weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
            height: String::new(),
            weight: String::new(),
            egg: String::new(),
            candy: None,
            candy_count: None,
            prev_evolutions: None,
            next_evolutions: None,
        }
    }

    fn fixture() -> Vec<PokemonRecord> {
        vec![
            record("1", "Bulbasaur", &["Grass", "Poison"], &["Fire", "Ice", "Flying", "Psychic"]),
            record("4", "Charmander", &["Fire"], &["Water", "Ground", "Rock"]),
            record("5", "Charmeleon", &["Fire"], &["Water", "Ground", "Rock"]),
            record("6", "Charizard", &["Fire", "Flying"], &["Water", "Electric", "Rock"]),
            record("7", "Squirtle", &["Water"], &["Electric", "Grass"]),
            record("25", "Pikachu", &["Electric"], &["Ground"]),
            record("26", "Raichu", &["Electric"], &["Ground"]),
        ]
    }

    fn names(records: &[&PokemonRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[rstest]
    #[case("", 0)]
    #[case("pi", 0)]
    #[case("pik", 1)]
    #[case("pikac", 1)]
    #[case("pikach", 2)]
    #[case("charmeleon", 2)]
    fn test_allowed_edits_scale_with_length(#[case] needle: &str, #[case] expected: u32) {
        assert_eq!(allowed_edits(needle), expected);
    }

    #[rstest]
    #[case("Pikachu", vec!["Pikachu"])]
    #[case("pikachi", vec!["Pikachu"])]
    #[case("bsaur", vec!["Bulbasaur"])]
    #[case("  SQUIRTLE ", vec!["Squirtle"])]
    #[case("zzz", vec![])]
    fn test_search_matches_names(#[case] query: &str, #[case] expected: Vec<&str>) {
        let records = fixture();
        let listing: Vec<&PokemonRecord> = records.iter().collect();
        let index = NameIndex::build(listing.iter().copied()).unwrap();

        let found = search_listing(&listing, &index, query, &FacetSelection::default());

        assert_eq!(names(&found), expected);
    }

    #[test]
    fn test_search_ranks_exact_then_prefix_then_rest() {
        let records = vec![
            record("1", "Charizard", &[], &[]),
            record("2", "Char", &[], &[]),
            record("3", "Scharf", &[], &[]),
            record("4", "Chatot", &[], &[]),
        ];
        let index = NameIndex::build(&records).unwrap();

        // "chatot" is only reachable through the one-edit prefix "chat".
        assert_eq!(index.search("char"), vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_long_query_falls_back_to_subsequence() {
        let long_name: String = "abcdefghijklmnopqrstuvwxyz".repeat(9);
        let needle: String = long_name.chars().filter(|&c| c != 'e').collect();
        let records = vec![
            record("1", "Pikachu", &[], &[]),
            record("2", &long_name, &[], &[]),
        ];
        let index = NameIndex::build(&records).unwrap();

        assert!(Levenshtein::new(&needle, allowed_edits(&needle)).is_err());
        assert_eq!(index.search(&needle), vec![1]);
    }

    #[test]
    fn test_query_longer_than_every_name_matches_nothing() {
        let records = fixture();
        let index = NameIndex::build(&records).unwrap();

        // "charmeleon" is the longest name: 10 chars, plus 2 edits.
        assert_eq!(index.search("charmeleonxx"), vec![2]);
        assert!(index.search("charmeleonxxx").is_empty());
        assert!(index.search(&"pikachu".repeat(150)).is_empty());
    }

    #[test]
    fn test_blank_query_returns_listing_order() {
        let records = fixture();
        let index = NameIndex::build(&records).unwrap();

        assert_eq!(index.search("   "), (0..records.len()).collect::<Vec<_>>());
        assert_eq!(index.len(), records.len());
    }

    #[test]
    fn test_search_and_facets_compose_by_intersection() {
        let records = fixture();
        let listing: Vec<&PokemonRecord> = records.iter().collect();
        let index = NameIndex::build(listing.iter().copied()).unwrap();

        let fire_and_flying = FacetSelection::default().with_type("Fire").with_type("Flying");
        let found = search_listing(&listing, &index, "char", &fire_and_flying);

        assert_eq!(names(&found), vec!["Charizard"]);
    }

    #[test]
    fn test_type_and_weakness_filters() {
        let records = fixture();
        let selection = FacetSelection::default()
            .with_type("Fire")
            .with_weakness("Water");

        let found = filter_by_facets(&records, &selection);

        assert_eq!(names(&found), vec!["Charmander", "Charmeleon", "Charizard"]);
        for record in found {
            assert!(record.types.contains(&"Fire".to_string()));
            assert!(record.weaknesses.contains(&"Water".to_string()));
        }
    }

    #[test]
    fn test_adding_a_type_never_grows_the_result() {
        let records = fixture();
        let mut selection = FacetSelection::default();
        let mut previous = filter_by_facets(&records, &selection).len();

        for type_name in ["Fire", "Flying", "Water"] {
            selection = selection.with_type(type_name);
            let current = filter_by_facets(&records, &selection).len();
            assert!(current <= previous, "adding {} grew the result", type_name);
            previous = current;
        }
        assert_eq!(previous, 0);
    }
}
