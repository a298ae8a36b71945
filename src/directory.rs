//! Contracts for the person directory and the frequency dataset.

use log::debug;

use crate::ranker::{rank_frequencies, WordItem};

/// Message used when a person has no recorded speech.
pub const NO_SPEECH_MESSAGE: &str = "hasn't spoken in the Commons since the 17th July 2024";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub portrait_url: Option<String>,
}

impl PersonRecord {
    /// Record with an id derived from the name, e.g. `local-keir-starmer`.
    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        Self {
            id: format!("local-{slug}"),
            name,
            category: None,
            location: None,
            portrait_url: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_portrait(mut self, url: impl Into<String>) -> Self {
        self.portrait_url = Some(url.into());
        self
    }

    fn matches(&self, term: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(term);
        hit(&self.name)
            || self.location.as_deref().is_some_and(hit)
            || self.category.as_deref().is_some_and(hit)
    }
}

pub trait PersonDirectory {
    fn search(&self, term: &str) -> Vec<PersonRecord>;
    fn lookup(&self, id: &str) -> Option<PersonRecord>;
}

/// In-memory directory over a fixed list of records.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    records: Vec<PersonRecord>,
}

impl StaticDirectory {
    pub fn new(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }
}

impl PersonDirectory for StaticDirectory {
    /// Case-insensitive substring match on name, location or category.
    fn search(&self, term: &str) -> Vec<PersonRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&term))
            .cloned()
            .collect()
    }

    /// Exact id match, falling back to the name encoded in a `local-` id.
    fn lookup(&self, id: &str) -> Option<PersonRecord> {
        if let Some(record) = self.records.iter().find(|r| r.id == id) {
            return Some(record.clone());
        }
        let name = id.strip_prefix("local-")?.replace('-', " ");
        self.records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(&name))
            .cloned()
    }
}

/// Word counts for one person, or a marker that nothing was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequencies {
    Counts(Vec<(String, u32)>),
    NoData(String),
}

pub trait FrequencySource {
    fn frequencies_for(&self, person_id: &str) -> Frequencies;
}

impl<F> FrequencySource for F
where
    F: Fn(&str) -> Frequencies,
{
    fn frequencies_for(&self, person_id: &str) -> Frequencies {
        self(person_id)
    }
}

/// What the cloud should show for a person.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudData {
    Words(Vec<WordItem>),
    NoData(String),
}

/// Fetches, filters and ranks a person's words for display.
///
/// Single-character words are skipped; colours follow the person's category.
pub fn cloud_data_for<S: FrequencySource + ?Sized>(
    source: &S,
    person: &PersonRecord,
    max_items: usize,
) -> CloudData {
    match source.frequencies_for(&person.id) {
        Frequencies::NoData(message) => {
            debug!("no recorded speech for {}", person.id);
            CloudData::NoData(message)
        }
        Frequencies::Counts(counts) => {
            let counts = counts
                .into_iter()
                .filter(|(word, _)| word.chars().count() > 1);
            CloudData::Words(rank_frequencies(
                counts,
                max_items,
                person.category.as_deref(),
            ))
        }
    }
}
