use serde::{Deserialize, Serialize};
use std::fmt;

/// A pointer from one species to another along its evolution line.
///
/// Only the dex number is used to resolve the reference; the name is carried
/// for display when the target is missing from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionRef {
    pub num: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecord {
    pub id: String,
    pub num: String, // Zero-padded dex number, e.g. "001"
    pub name: String,
    pub img: String,
    pub types: Vec<String>,
    pub weaknesses: Vec<String>,
    pub height: String, // Free text, e.g. "0.71 m"
    pub weight: String, // Free text, e.g. "6.9 kg"
    pub egg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candy_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_evolutions: Option<Vec<EvolutionRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_evolutions: Option<Vec<EvolutionRef>>,
}

/// The projection rendered by list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: String,
    pub num: String,
    pub name: String,
    pub img: String,
}

impl PokemonRecord {
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }

    pub fn has_weakness(&self, weakness: &str) -> bool {
        self.weaknesses.iter().any(|w| w == weakness)
    }

    /// Stored predecessor references, empty when the record has none.
    pub fn prev_evolution_refs(&self) -> &[EvolutionRef] {
        self.prev_evolutions.as_deref().unwrap_or_default()
    }

    /// Stored successor references, empty when the record has none.
    pub fn next_evolution_refs(&self) -> &[EvolutionRef] {
        self.next_evolutions.as_deref().unwrap_or_default()
    }

    pub fn summary(&self) -> PokemonSummary {
        PokemonSummary::from(self)
    }
}

impl From<&PokemonRecord> for PokemonSummary {
    fn from(record: &PokemonRecord) -> Self {
        PokemonSummary {
            id: record.id.clone(),
            num: record.num.clone(),
            name: record.name.clone(),
            img: record.img.clone(),
        }
    }
}

impl fmt::Display for PokemonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.num)
    }
}
