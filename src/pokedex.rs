use crate::errors::{DatasetError, DatasetResult};
use crate::search::NameIndex;
use indexmap::IndexMap;
use schema::{Facets, PokemonRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The dataset compiled into the binary.
pub const EMBEDDED_DATASET: &str = include_str!("../data/pokemon.json");

/// Where the species records come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatasetSource {
    #[default]
    Embedded,
    File(PathBuf),
}

impl DatasetSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(DatasetSource::File).unwrap_or_default()
    }
}

/// All species records, loaded once and never mutated.
///
/// Records are kept in document order; `listing` holds the same records
/// ordered by numeric id, which is the order every list view uses.
#[derive(Debug)]
pub struct Pokedex {
    records: Vec<PokemonRecord>,
    by_id: HashMap<String, usize>,
    by_num: HashMap<String, usize>,
    listing: Vec<usize>,
    facets: Facets,
    names: NameIndex,
}

impl Pokedex {
    /// Load the dataset named by `source`.
    pub fn load(source: &DatasetSource) -> DatasetResult<Self> {
        match source {
            DatasetSource::Embedded => Self::embedded(),
            DatasetSource::File(path) => Self::from_path(path),
        }
    }

    pub fn embedded() -> DatasetResult<Self> {
        Self::from_json(EMBEDDED_DATASET)
    }

    pub fn from_path(path: &Path) -> DatasetResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Read dataset from {}", path.display());
        Self::from_json(&content)
    }

    /// Parse a JSON object keyed by id whose values are species records.
    pub fn from_json(json: &str) -> DatasetResult<Self> {
        let keyed: IndexMap<String, PokemonRecord> = serde_json::from_str(json)?;
        Self::from_keyed_records(keyed)
    }

    pub fn from_keyed_records(keyed: IndexMap<String, PokemonRecord>) -> DatasetResult<Self> {
        let mut records = Vec::with_capacity(keyed.len());
        let mut numeric_ids = Vec::with_capacity(keyed.len());

        for (key, record) in keyed {
            if key != record.id {
                return Err(DatasetError::KeyMismatch { key, id: record.id });
            }
            let numeric_id = parse_decimal_id(&record.id)
                .ok_or_else(|| DatasetError::NonNumericId(record.id.clone()))?;
            numeric_ids.push(numeric_id);
            records.push(record);
        }

        let by_id = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id.clone(), index))
            .collect();

        // First record wins when two share a dex number.
        let mut by_num = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            by_num.entry(record.num.clone()).or_insert(index);
        }

        // Stable sort: equal ids keep document order.
        let mut listing: Vec<usize> = (0..records.len()).collect();
        listing.sort_by_key(|&index| numeric_ids[index]);

        let facets = Facets::from_records(&records);
        let names = NameIndex::build(listing.iter().map(|&index| &records[index]))?;

        tracing::info!(
            "Loaded {} Pokemon ({} types, {} weaknesses)",
            records.len(),
            facets.types.len(),
            facets.weaknesses.len()
        );

        Ok(Pokedex {
            records,
            by_id,
            by_num,
            listing,
            facets,
            names,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in document order.
    pub fn records(&self) -> impl Iterator<Item = &PokemonRecord> + '_ {
        self.records.iter()
    }

    /// Records ordered by ascending numeric id.
    pub fn listing(&self) -> impl ExactSizeIterator<Item = &PokemonRecord> + '_ {
        self.listing.iter().map(move |&index| &self.records[index])
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub(crate) fn name_index(&self) -> &NameIndex {
        &self.names
    }

    pub(crate) fn get_by_id(&self, id: &str) -> Option<&PokemonRecord> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }

    pub(crate) fn get_by_num(&self, num: &str) -> Option<&PokemonRecord> {
        self.by_num.get(num).map(|&index| &self.records[index])
    }
}

/// Numeric value of an id made only of ASCII decimal digits, with no sign.
fn parse_decimal_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}
