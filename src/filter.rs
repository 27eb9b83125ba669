//! Listing filter engine.
//!
//! The visible pets are a pure function of the loaded collection and the
//! current [`FilterState`]. Whether anything has been loaded yet is
//! tracked separately by [`Listing`], so an empty result never doubles
//! as "still loading".

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::Db;
use crate::errors::BackendError;
use crate::pet::{PetRecord, Species};

/// The species part of the filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpeciesFilter {
    All,
    Only(Species),
}

impl Default for SpeciesFilter {
    fn default() -> Self {
        SpeciesFilter::All
    }
}

impl SpeciesFilter {
    pub fn matches(&self, species: Species) -> bool {
        match self {
            SpeciesFilter::All => true,
            SpeciesFilter::Only(s) => *s == species,
        }
    }
}

impl fmt::Display for SpeciesFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeciesFilter::All => f.write_str("all"),
            SpeciesFilter::Only(s) => s.fmt(f),
        }
    }
}

impl FromStr for SpeciesFilter {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            Ok(SpeciesFilter::All)
        } else {
            s.parse().map(SpeciesFilter::Only)
        }
    }
}

impl TryFrom<String> for SpeciesFilter {
    type Error = BackendError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SpeciesFilter> for String {
    fn from(filter: SpeciesFilter) -> Self {
        filter.to_string()
    }
}

/// What the visitor has asked to see. The default shows everything.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FilterState {
    pub species: SpeciesFilter,
    pub search: String,
}

impl FilterState {
    pub fn new(species: SpeciesFilter, search: impl Into<String>) -> Self {
        FilterState {
            species,
            search: search.into(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.species == SpeciesFilter::All && self.search.is_empty()
    }

    pub fn matches(&self, pet: &PetRecord) -> bool {
        self.matcher().matches(pet)
    }

    fn matcher(&self) -> Matcher {
        Matcher {
            species: self.species,
            term: if self.search.is_empty() {
                None
            } else {
                Some(self.search.to_lowercase())
            },
        }
    }
}

struct Matcher {
    species: SpeciesFilter,
    term: Option<String>,
}

impl Matcher {
    fn matches(&self, pet: &PetRecord) -> bool {
        self.species.matches(pet.species())
            && match &self.term {
                None => true,
                Some(term) => {
                    pet.name().to_lowercase().contains(term.as_str())
                        || pet.breed().to_lowercase().contains(term.as_str())
                }
            }
    }
}

/// The pets matching `filter`, in their original order.
pub fn compute_visible(records: &[PetRecord], filter: &FilterState) -> Vec<PetRecord> {
    let matcher = filter.matcher();

    records
        .iter()
        .filter(|pet| matcher.matches(pet))
        .cloned()
        .collect()
}

pub fn reset_filter() -> FilterState {
    FilterState::default()
}

/// The first `per_species` dogs followed by the first `per_species` cats.
pub fn featured(records: &[PetRecord], per_species: usize) -> Vec<PetRecord> {
    Species::ALL
        .iter()
        .flat_map(|species| {
            records
                .iter()
                .filter(move |pet| pet.species() == *species)
                .take(per_species)
        })
        .cloned()
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// What a listing page should render.
#[derive(Clone, Debug, PartialEq)]
pub enum ListingView {
    Loading,
    Failed { message: String },
    NoMatches,
    Pets(Vec<PetRecord>),
}

/// The state of one visit to the listing page.
#[derive(Clone, Debug)]
pub struct Listing {
    records: Vec<PetRecord>,
    filter: FilterState,
    status: LoadStatus,
}

impl Default for Listing {
    fn default() -> Self {
        Listing {
            records: vec![],
            filter: FilterState::default(),
            status: LoadStatus::Loading,
        }
    }
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the available pets. On failure the previous records are
    /// dropped and the error is kept for display.
    pub async fn load(&mut self, db: &(dyn Db + Send + Sync)) {
        self.status = LoadStatus::Loading;

        match db.list_available().await {
            Ok(records) => self.set_records(records),
            Err(e) => self.fail(e.user_message()),
        }
    }

    pub fn set_records(&mut self, records: Vec<PetRecord>) {
        self.records = records;
        self.status = LoadStatus::Loaded;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.records.clear();
        self.status = LoadStatus::Failed(message.into());
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn set_species(&mut self, species: SpeciesFilter) {
        self.filter.species = species;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn reset_filter(&mut self) {
        self.filter = reset_filter();
    }

    pub fn view(&self) -> ListingView {
        match &self.status {
            LoadStatus::Loading => ListingView::Loading,
            LoadStatus::Failed(message) => ListingView::Failed {
                message: message.clone(),
            },
            LoadStatus::Loaded => {
                let visible = compute_visible(&self.records, &self.filter);

                if visible.is_empty() {
                    ListingView::NoMatches
                } else {
                    ListingView::Pets(visible)
                }
            }
        }
    }
}
