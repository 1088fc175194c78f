use crate::PokemonRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

/// A filterable attribute dimension of a species record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FacetKind {
    Type,
    Weakness,
}

/// Distinct facet values observed across a dataset, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub types: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl Facets {
    /// Collect the distinct types and weaknesses of `records` in one pass.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PokemonRecord>,
    {
        let (types, weaknesses) = records.into_iter().fold(
            (BTreeSet::new(), BTreeSet::new()),
            |(mut types, mut weaknesses), record| {
                types.extend(record.types.iter().cloned());
                weaknesses.extend(record.weaknesses.iter().cloned());
                (types, weaknesses)
            },
        );

        Facets {
            types: types.into_iter().collect(),
            weaknesses: weaknesses.into_iter().collect(),
        }
    }

    pub fn values(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Type => &self.types,
            FacetKind::Weakness => &self.weaknesses,
        }
    }
}

/// The checkbox state of a filter panel: every selected value must be
/// present on a record for it to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl FacetSelection {
    pub fn new(types: Vec<String>, weaknesses: Vec<String>) -> Self {
        Self { types, weaknesses }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.push(type_name.into());
        self
    }

    pub fn with_weakness(mut self, weakness: impl Into<String>) -> Self {
        self.weaknesses.push(weakness.into());
        self
    }

    pub fn selected(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Type => &self.types,
            FacetKind::Weakness => &self.weaknesses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.weaknesses.is_empty()
    }

    /// AND across selected types, and independently AND across selected weaknesses.
    pub fn matches(&self, record: &PokemonRecord) -> bool {
        self.types.iter().all(|t| record.has_type(t))
            && self.weaknesses.iter().all(|w| record.has_weakness(w))
    }
}
