use serde::Deserialize;

use crate::errors::BackendError;
use crate::filter::FilterState;

/// The filter as it arrives in the query string. The species is parsed
/// by the handler so a bad value gets a proper error response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    pub species: String,
    pub search: String,
}

impl FilterQuery {
    pub fn into_filter(self) -> Result<FilterState, BackendError> {
        Ok(FilterState::new(self.species.parse()?, self.search))
    }
}
